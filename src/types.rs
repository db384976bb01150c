//! Core data types for the inference engine.
//!
//! All grid types use flat `Vec` storage with row-major layout:
//! `cells[row * cols + col]`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Field value of a cell the player has not opened.
pub const CLOSED: i8 = -1;

/// Largest digit an opened cell can show.
pub const MAX_DIGIT: i8 = 8;

/// A (row, column) coordinate, 0-indexed.
///
/// Ordering is row-major, which is what tie-breaks and action order rely on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    #[inline(always)]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl From<(usize, usize)> for Cell {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Revealed state of each cell: -1 = closed, 0-8 = opened with that many adjacent mines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldGrid {
    pub rows: usize,
    pub cols: usize,
    pub cells: Vec<i8>,
}

impl FieldGrid {
    /// Create a new grid with every cell closed.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![CLOSED; rows * cols],
        }
    }

    #[inline(always)]
    pub fn get(&self, cell: Cell) -> i8 {
        self.cells[cell.row * self.cols + cell.col]
    }

    #[inline(always)]
    pub fn set(&mut self, cell: Cell, val: i8) {
        self.cells[cell.row * self.cols + cell.col] = val;
    }

    #[inline(always)]
    pub fn is_closed(&self, cell: Cell) -> bool {
        self.get(cell) == CLOSED
    }

    #[inline(always)]
    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.row < self.rows && cell.col < self.cols
    }

    /// Iterate every coordinate in row-major order.
    pub fn cells_iter(&self) -> impl Iterator<Item = Cell> {
        let cols = self.cols;
        (0..self.rows).flat_map(move |row| (0..cols).map(move |col| Cell::new(row, col)))
    }
}

/// The engine's own belief about a cell. Not the game's flag state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(i8)]
pub enum MineState {
    #[default]
    Unknown = -1,
    /// Known not to be a mine because the cell is opened.
    Clear = 0,
    /// Inferred mine. Never reset within a session.
    Mine = 1,
}

impl MineState {
    /// Decode the `-1 / 0 / 1` wire encoding.
    pub fn from_i8(val: i8) -> Option<Self> {
        match val {
            -1 => Some(MineState::Unknown),
            0 => Some(MineState::Clear),
            1 => Some(MineState::Mine),
            _ => None,
        }
    }

    #[inline(always)]
    pub fn to_i8(self) -> i8 {
        self as i8
    }
}

/// Per-cell inference state, same layout as [`FieldGrid`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MineGrid {
    pub rows: usize,
    pub cols: usize,
    pub cells: Vec<MineState>,
}

impl MineGrid {
    /// Create a new grid with every cell unknown.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![MineState::Unknown; rows * cols],
        }
    }

    #[inline(always)]
    pub fn get(&self, cell: Cell) -> MineState {
        self.cells[cell.row * self.cols + cell.col]
    }

    #[inline(always)]
    pub fn set(&mut self, cell: Cell, val: MineState) {
        self.cells[cell.row * self.cols + cell.col] = val;
    }

    #[inline(always)]
    pub fn is_mine(&self, cell: Cell) -> bool {
        self.get(cell) == MineState::Mine
    }

    /// Mark a cell as an inferred mine. Returns true if it was not marked before.
    pub fn mark_mine(&mut self, cell: Cell) -> bool {
        if self.is_mine(cell) {
            return false;
        }
        self.set(cell, MineState::Mine);
        true
    }

    /// Count inferred mines on the board.
    pub fn count(&self) -> usize {
        self.cells.iter().filter(|&&v| v == MineState::Mine).count()
    }

    /// Flat `-1 / 0 / 1` encoding, row-major.
    pub fn to_i8_vec(&self) -> Vec<i8> {
        self.cells.iter().map(|m| m.to_i8()).collect()
    }
}

/// Pre-computed neighbor cache for all cells.
///
/// Stores the 8-directional neighbors (clipped to grid bounds) for every cell.
/// Indexed by `row * cols + col`, each entry is a slice of coordinates.
#[derive(Debug, Clone)]
pub struct NeighborCache {
    pub rows: usize,
    pub cols: usize,
    /// Flat storage of all neighbors.
    data: Vec<Cell>,
    /// offsets[i] = start index in `data` for cell i.
    /// offsets[i+1] - offsets[i] = number of neighbors for cell i.
    offsets: Vec<usize>,
}

impl NeighborCache {
    /// Build the neighbor cache for a grid of the given dimensions.
    pub fn new(rows: usize, cols: usize) -> Self {
        let total = rows * cols;
        let mut data = Vec::with_capacity(total * 8);
        let mut offsets = Vec::with_capacity(total + 1);

        for row in 0..rows {
            for col in 0..cols {
                offsets.push(data.len());
                for dr in -1i64..=1 {
                    for dc in -1i64..=1 {
                        if dr == 0 && dc == 0 {
                            continue;
                        }
                        let nr = row as i64 + dr;
                        let nc = col as i64 + dc;
                        if nr >= 0 && nr < rows as i64 && nc >= 0 && nc < cols as i64 {
                            data.push(Cell::new(nr as usize, nc as usize));
                        }
                    }
                }
            }
        }
        offsets.push(data.len()); // sentinel

        Self {
            rows,
            cols,
            data,
            offsets,
        }
    }

    /// Get the pre-computed neighbors of `cell`, in row-major order.
    #[inline(always)]
    pub fn get(&self, cell: Cell) -> &[Cell] {
        let idx = cell.row * self.cols + cell.col;
        let start = self.offsets[idx];
        let end = self.offsets[idx + 1];
        &self.data[start..end]
    }
}
