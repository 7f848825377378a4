//! Dot Countdown - a dot-matrix countdown clock with falling digits
//!
//! Core modules:
//! - `sim`: Countdown simulation (glyph matrices, dots, digits, physics, tick loop)
//! - `renderer`: Rendering surfaces (headless recorder, DOM on the web)
//! - `platform`: Browser/native clock and viewport geometry
//! - `settings`: Typed configuration, persisted in LocalStorage on the web
//! - `error`: Construction errors

pub mod error;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::CountdownError;
pub use settings::{ExplosionTrigger, Settings};

use glam::Vec2;

/// Clock configuration constants
pub mod consts {
    /// Tick interval of the countdown driver (milliseconds)
    pub const TICK_INTERVAL_MS: u32 = 30;
    /// Solver iterations per physics step
    pub const SOLVER_ITERATIONS: usize = 10;

    /// Glyph grid dimensions
    pub const MATRIX_ROWS: usize = 7;
    pub const MATRIX_COLS: usize = 4;

    /// Rendered dot size and spacing (pixels)
    pub const DOT_SIZE: f32 = 18.0;
    pub const DOT_PITCH: f32 = DOT_SIZE + 1.0;
    /// Collision radius of a released dot
    pub const DOT_RADIUS: f32 = DOT_SIZE / 2.0;

    /// Horizontal layout advance per glyph: 4 dot columns plus a gap column
    pub const DIGIT_ADVANCE: f32 = 5.0 * DOT_PITCH - 1.0;
    pub const SEPARATOR_ADVANCE: f32 = 2.0 * DOT_SIZE;

    /// Global cap on simultaneously simulated dots
    pub const PARTICLE_BUDGET: usize = 150;

    /// Release speeds (pixels/s, full width of the per-axis velocity range)
    pub const HIGH_RELEASE_SPEED: f32 = 1500.0;
    pub const LOW_RELEASE_SPEED: f32 = 300.0;

    /// Downward gravity (pixels/s²)
    pub const GRAVITY: f32 = 800.0;

    /// Cull margins relative to the page's left edge (pixels)
    pub const CULL_LEFT_MARGIN: f32 = 400.0;
    pub const CULL_RIGHT_EXTENT: f32 = 1400.0;
}

/// Position of a matrix cell relative to its glyph's origin
#[inline]
pub fn cell_offset(row: usize, col: usize) -> Vec2 {
    Vec2::new(col as f32 * consts::DOT_PITCH, row as f32 * consts::DOT_PITCH)
}

#[cfg(test)]
mod tests {
    use super::consts::*;
    use super::*;

    #[test]
    fn test_glyph_advances() {
        assert_eq!(DIGIT_ADVANCE, 94.0);
        assert_eq!(SEPARATOR_ADVANCE, 36.0);
    }

    #[test]
    fn test_cell_offset() {
        assert_eq!(cell_offset(0, 0), Vec2::ZERO);
        assert_eq!(cell_offset(6, 3), Vec2::new(57.0, 114.0));
    }
}
