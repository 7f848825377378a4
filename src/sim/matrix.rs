//! Dot-matrix font for the countdown glyphs
//!
//! Every glyph is drawn on a fixed 7-row x 4-column grid. Cells are lit, unlit
//! (a dark dot is still drawn), or absent (no dot exists at all - separator only).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::{MATRIX_COLS, MATRIX_ROWS};
use crate::error::CountdownError;

/// One of the eleven renderable symbols
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Glyph {
    Zero,
    One,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Separator,
}

impl Glyph {
    pub const DIGITS: [Glyph; 10] = [
        Glyph::Zero,
        Glyph::One,
        Glyph::Two,
        Glyph::Three,
        Glyph::Four,
        Glyph::Five,
        Glyph::Six,
        Glyph::Seven,
        Glyph::Eight,
        Glyph::Nine,
    ];

    pub const ALL: [Glyph; 11] = [
        Glyph::Zero,
        Glyph::One,
        Glyph::Two,
        Glyph::Three,
        Glyph::Four,
        Glyph::Five,
        Glyph::Six,
        Glyph::Seven,
        Glyph::Eight,
        Glyph::Nine,
        Glyph::Separator,
    ];

    pub fn from_digit(value: u32) -> Result<Self, CountdownError> {
        Self::DIGITS
            .get(value as usize)
            .copied()
            .ok_or(CountdownError::DigitOutOfRange(value))
    }

    pub fn from_char(c: char) -> Result<Self, CountdownError> {
        match c {
            ':' => Ok(Glyph::Separator),
            _ => c
                .to_digit(10)
                .map(|d| Self::DIGITS[d as usize])
                .ok_or(CountdownError::InvalidGlyph(c)),
        }
    }

    /// Numeric value, `None` for the separator
    pub fn value(self) -> Option<u8> {
        match self {
            Glyph::Separator => None,
            digit => Self::DIGITS.iter().position(|&d| d == digit).map(|i| i as u8),
        }
    }

    pub fn is_separator(self) -> bool {
        self == Glyph::Separator
    }

    pub fn to_char(self) -> char {
        match self.value() {
            Some(v) => char::from(b'0' + v),
            None => ':',
        }
    }

    /// Horizontal layout advance for this glyph
    pub fn advance(self) -> f32 {
        if self.is_separator() {
            crate::consts::SEPARATOR_ADVANCE
        } else {
            crate::consts::DIGIT_ADVANCE
        }
    }
}

impl fmt::Display for Glyph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// State of one grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Lit,
    Unlit,
    Absent,
}

type Row = [Cell; MATRIX_COLS];
type Grid = [Row; MATRIX_ROWS];

const L: Cell = Cell::Lit;
const U: Cell = Cell::Unlit;
const A: Cell = Cell::Absent;

const FULL: Row = [L, L, L, L];
const BOTH: Row = [L, U, U, L];
const RIGHT: Row = [U, U, U, L];
const LEFT: Row = [L, U, U, U];

const SEP_DARK: Row = [U, U, A, A];
const SEP_DOT: Row = [L, L, A, A];

const FONT: [Grid; 11] = [
    [FULL, BOTH, BOTH, BOTH, BOTH, BOTH, FULL],
    [RIGHT, RIGHT, RIGHT, RIGHT, RIGHT, RIGHT, FULL],
    [FULL, RIGHT, RIGHT, FULL, LEFT, LEFT, FULL],
    [FULL, RIGHT, RIGHT, FULL, RIGHT, RIGHT, FULL],
    [BOTH, BOTH, BOTH, FULL, RIGHT, RIGHT, RIGHT],
    [FULL, LEFT, LEFT, FULL, RIGHT, RIGHT, FULL],
    [FULL, LEFT, LEFT, FULL, BOTH, BOTH, FULL],
    [FULL, RIGHT, RIGHT, RIGHT, RIGHT, RIGHT, RIGHT],
    [FULL, BOTH, BOTH, FULL, BOTH, BOTH, FULL],
    [FULL, BOTH, BOTH, FULL, RIGHT, RIGHT, FULL],
    [SEP_DARK, SEP_DARK, SEP_DOT, SEP_DARK, SEP_DOT, SEP_DARK, SEP_DARK],
];

/// An immutable 7x4 glyph grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DigitMatrix {
    glyph: Glyph,
    cells: Grid,
}

/// Built-in matrix for a glyph
pub fn matrix_for(glyph: Glyph) -> DigitMatrix {
    let index = match glyph.value() {
        Some(v) => v as usize,
        None => 10,
    };
    DigitMatrix {
        glyph,
        cells: FONT[index],
    }
}

impl DigitMatrix {
    /// Build a custom matrix, validating shape and absent-cell placement
    pub fn from_rows(glyph: Glyph, rows: &[Vec<Cell>]) -> Result<Self, CountdownError> {
        let shape_error = || CountdownError::MatrixShape {
            rows: rows.len(),
            cols: rows.iter().map(Vec::len).max().unwrap_or(0),
        };
        if rows.len() != MATRIX_ROWS {
            return Err(shape_error());
        }

        let mut cells = [[Cell::Unlit; MATRIX_COLS]; MATRIX_ROWS];
        for (r, row) in rows.iter().enumerate() {
            if row.len() != MATRIX_COLS {
                return Err(shape_error());
            }
            for (c, &cell) in row.iter().enumerate() {
                if cell == Cell::Absent && !glyph.is_separator() {
                    return Err(CountdownError::AbsentCell { glyph, row: r, col: c });
                }
                cells[r][c] = cell;
            }
        }
        Ok(Self { glyph, cells })
    }

    /// Matrix for `glyph` with every cell dark
    pub fn blank(glyph: Glyph) -> Self {
        Self {
            glyph,
            cells: [[Cell::Unlit; MATRIX_COLS]; MATRIX_ROWS],
        }
    }

    pub fn glyph(&self) -> Glyph {
        self.glyph
    }

    pub fn cell(&self, row: usize, col: usize) -> Cell {
        self.cells[row][col]
    }

    pub fn rows(&self) -> &Grid {
        &self.cells
    }

    /// Row-major iterator over `(row, col, cell)`
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .flat_map(|(r, row)| row.iter().enumerate().map(move |(c, &cell)| (r, c, cell)))
    }

    /// Number of cells in the given state
    pub fn count(&self, state: Cell) -> usize {
        self.iter().filter(|&(_, _, cell)| cell == state).count()
    }

    /// Number of positions where both matrices hold the same state
    pub fn agreeing_cells(&self, other: &DigitMatrix) -> usize {
        self.iter()
            .filter(|&(r, c, cell)| other.cell(r, c) == cell)
            .count()
    }

    /// A cell whose dot may fly away when `other` takes over the slot
    pub fn is_release_candidate(&self, row: usize, col: usize, other: &DigitMatrix) -> bool {
        let mine = self.cell(row, col);
        let theirs = other.cell(row, col);
        mine != theirs && mine != Cell::Absent && theirs != Cell::Absent
    }

    pub fn release_candidates(&self, other: &DigitMatrix) -> usize {
        self.iter()
            .filter(|&(r, c, _)| self.is_release_candidate(r, c, other))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_glyph_is_7x4() {
        for glyph in Glyph::ALL {
            let m = matrix_for(glyph);
            assert_eq!(m.rows().len(), 7);
            assert!(m.rows().iter().all(|row| row.len() == 4));
            assert_eq!(m.iter().count(), 28);
            assert_eq!(m.glyph(), glyph);
        }
    }

    #[test]
    fn test_absent_only_in_separator() {
        for glyph in Glyph::DIGITS {
            assert_eq!(matrix_for(glyph).count(Cell::Absent), 0, "glyph {glyph}");
        }
        assert_eq!(matrix_for(Glyph::Separator).count(Cell::Absent), 14);
        assert_eq!(matrix_for(Glyph::Separator).count(Cell::Lit), 4);
    }

    #[test]
    fn test_glyph_parsing() {
        assert_eq!(Glyph::from_char('7').unwrap(), Glyph::Seven);
        assert_eq!(Glyph::from_char(':').unwrap(), Glyph::Separator);
        assert!(matches!(
            Glyph::from_char('x'),
            Err(CountdownError::InvalidGlyph('x'))
        ));
        assert!(matches!(
            Glyph::from_digit(10),
            Err(CountdownError::DigitOutOfRange(10))
        ));
        for (i, glyph) in Glyph::DIGITS.iter().enumerate() {
            assert_eq!(glyph.value(), Some(i as u8));
            assert_eq!(Glyph::from_char(glyph.to_char()).unwrap(), *glyph);
        }
        assert_eq!(Glyph::Separator.value(), None);
    }

    #[test]
    fn test_from_rows_rejects_bad_shape() {
        let six_rows = vec![vec![Cell::Lit; 4]; 6];
        assert!(matches!(
            DigitMatrix::from_rows(Glyph::Eight, &six_rows),
            Err(CountdownError::MatrixShape { rows: 6, cols: 4 })
        ));

        let mut ragged = vec![vec![Cell::Lit; 4]; 7];
        ragged[3].push(Cell::Lit);
        assert!(matches!(
            DigitMatrix::from_rows(Glyph::Eight, &ragged),
            Err(CountdownError::MatrixShape { rows: 7, cols: 5 })
        ));
    }

    #[test]
    fn test_from_rows_rejects_absent_in_digit() {
        let mut rows = vec![vec![Cell::Lit; 4]; 7];
        rows[2][1] = Cell::Absent;
        assert!(matches!(
            DigitMatrix::from_rows(Glyph::Three, &rows),
            Err(CountdownError::AbsentCell { row: 2, col: 1, .. })
        ));
        // The separator may use absent cells
        assert!(DigitMatrix::from_rows(Glyph::Separator, &rows).is_ok());
    }

    #[test]
    fn test_from_rows_matches_builtin() {
        let builtin = matrix_for(Glyph::Four);
        let rows: Vec<Vec<Cell>> = builtin.rows().iter().map(|r| r.to_vec()).collect();
        assert_eq!(DigitMatrix::from_rows(Glyph::Four, &rows).unwrap(), builtin);
    }

    #[test]
    fn test_candidates_plus_agreement_cover_grid() {
        for a in Glyph::ALL {
            for b in Glyph::ALL {
                let (ma, mb) = (matrix_for(a), matrix_for(b));
                let absent_either = ma
                    .iter()
                    .filter(|&(r, c, cell)| cell == Cell::Absent || mb.cell(r, c) == Cell::Absent)
                    .count();
                let absent_both = ma
                    .iter()
                    .filter(|&(r, c, cell)| cell == Cell::Absent && mb.cell(r, c) == Cell::Absent)
                    .count();
                // Cells absent in both already count as agreeing
                assert_eq!(
                    ma.release_candidates(&mb),
                    28 - ma.agreeing_cells(&mb) - (absent_either - absent_both),
                    "{a} -> {b}"
                );
            }
        }
    }

    #[test]
    fn test_one_to_zero_overlap() {
        let one = matrix_for(Glyph::One);
        let zero = matrix_for(Glyph::Zero);
        // Bottom full row overlaps completely, right-column rows overlap partially
        assert!((0..4).all(|c| one.cell(6, c) == zero.cell(6, c)));
        assert_eq!(one.agreeing_cells(&zero), 20);
        assert_eq!(one.release_candidates(&zero), 8);
    }
}
