//! Construction-time errors
//!
//! Runtime conditions (budget exhaustion, repeated retire/release) are not
//! errors; only malformed data rejected at construction ends up here.

use thiserror::Error;

use crate::sim::Glyph;

#[derive(Debug, Error)]
pub enum CountdownError {
    #[error("invalid glyph character {0:?}")]
    InvalidGlyph(char),

    #[error("digit value {0} is outside 0-9")]
    DigitOutOfRange(u32),

    #[error("glyph matrix must be 7x4, got {rows}x{cols}")]
    MatrixShape { rows: usize, cols: usize },

    #[error("absent cell at row {row}, column {col} in digit glyph {glyph}")]
    AbsentCell { glyph: Glyph, row: usize, col: usize },

    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    #[error("failed to parse settings: {0}")]
    SettingsJson(#[from] serde_json::Error),
}
