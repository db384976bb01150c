//! Error types.
//!
//! [`Contradiction`] is the only way inference can fail: the snapshot handed to the
//! engine does not obey minesweeper's counting rules. [`BoardError`] covers malformed
//! input when a board is built or merged, before any inference runs.

use crate::types::Cell;
use thiserror::Error;

/// The board's digits disagree with the mines inferred so far.
///
/// Usually a stale or partial read (an animation mid-flight). The caller should drop
/// the tick and retry with a fresh snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Contradiction {
    #[error("contradiction at {anchor}: {marked} marked mines around a {digit}")]
    MinesExceedDigit { anchor: Cell, marked: usize, digit: u8 },

    #[error("contradiction at {anchor}: need={need} mines but only {unknowns} unknown neighbors")]
    NeedExceedsUnknowns { anchor: Cell, need: usize, unknowns: usize },

    #[error("subset contradiction: {subset} within {superset} but k={diff_mines}, |D|={diff_cells}")]
    Subset {
        subset: Cell,
        superset: Cell,
        diff_mines: i64,
        diff_cells: usize,
    },
}

impl Contradiction {
    /// Cells whose digits took part in the conflict.
    pub fn anchors(&self) -> Vec<Cell> {
        match *self {
            Contradiction::MinesExceedDigit { anchor, .. }
            | Contradiction::NeedExceedsUnknowns { anchor, .. } => vec![anchor],
            Contradiction::Subset { subset, superset, .. } => vec![subset, superset],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("row {row} has {len} cells, expected {expected}")]
    RaggedRow { row: usize, len: usize, expected: usize },

    #[error("field is {field_rows}x{field_cols} but mine grid is {mine_rows}x{mine_cols}")]
    DimensionMismatch {
        field_rows: usize,
        field_cols: usize,
        mine_rows: usize,
        mine_cols: usize,
    },

    #[error("invalid field value {value} at {cell}")]
    InvalidField { cell: Cell, value: i8 },

    #[error("invalid mine value {value} at {cell}")]
    InvalidMine { cell: Cell, value: i8 },

    #[error("snapshot has {len} cells, expected {expected}")]
    SnapshotLength { len: usize, expected: usize },

    #[error("snapshot shows {cell} opened, but it was inferred to be a mine")]
    OpenedInferredMine { cell: Cell },

    #[error("{cell} is outside the {rows}x{cols} board")]
    OutOfBounds { cell: Cell, rows: usize, cols: usize },
}
