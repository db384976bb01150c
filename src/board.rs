//! Caller-owned board state.
//!
//! A [`BoardState`] lives for a whole game. Each inference pass borrows it, reads the
//! field and writes new mine markings into it in place; that in-place mutation is the
//! only way inferences carry over from one call to the next.

use crate::error::BoardError;
use crate::types::{Cell, FieldGrid, MineGrid, MineState, NeighborCache, CLOSED, MAX_DIGIT};

/// Field grid, mine grid and the neighbor cache for their dimensions.
#[derive(Debug, Clone)]
pub struct BoardState {
    field: FieldGrid,
    mine: MineGrid,
    neighbors: NeighborCache,
}

impl BoardState {
    /// A fresh board: every cell closed, nothing inferred.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            field: FieldGrid::new(rows, cols),
            mine: MineGrid::new(rows, cols),
            neighbors: NeighborCache::new(rows, cols),
        }
    }

    /// Wrap existing grids after checking dimensions and cell values.
    pub fn from_grids(field: FieldGrid, mine: MineGrid) -> Result<Self, BoardError> {
        if field.rows != mine.rows
            || field.cols != mine.cols
            || field.cells.len() != field.rows * field.cols
            || mine.cells.len() != mine.rows * mine.cols
        {
            return Err(BoardError::DimensionMismatch {
                field_rows: field.rows,
                field_cols: field.cols,
                mine_rows: mine.rows,
                mine_cols: mine.cols,
            });
        }
        for cell in field.cells_iter() {
            let value = field.get(cell);
            if !(CLOSED..=MAX_DIGIT).contains(&value) {
                return Err(BoardError::InvalidField { cell, value });
            }
        }
        let neighbors = NeighborCache::new(field.rows, field.cols);
        Ok(Self {
            field,
            mine,
            neighbors,
        })
    }

    /// Build from nested rows using the `-1 / 0..8` field and `-1 / 0 / 1` mine encodings.
    ///
    /// `mine` may be omitted on the first call of a game, in which case every cell is unknown.
    pub fn from_rows(field: &[Vec<i8>], mine: Option<&[Vec<i8>]>) -> Result<Self, BoardError> {
        let field = field_from_rows(field)?;
        let mine = match mine {
            Some(rows) => mine_from_rows(rows)?,
            None => MineGrid::new(field.rows, field.cols),
        };
        Self::from_grids(field, mine)
    }

    pub fn rows(&self) -> usize {
        self.field.rows
    }

    pub fn cols(&self) -> usize {
        self.field.cols
    }

    pub fn field(&self) -> &FieldGrid {
        &self.field
    }

    pub fn mine(&self) -> &MineGrid {
        &self.mine
    }

    pub fn neighbors(&self) -> &NeighborCache {
        &self.neighbors
    }

    /// Split borrow for an inference pass: the field and cache are read-only, the mine
    /// grid receives new markings.
    pub(crate) fn parts_mut(&mut self) -> (&FieldGrid, &mut MineGrid, &NeighborCache) {
        (&self.field, &mut self.mine, &self.neighbors)
    }

    /// True for a game nobody has clicked yet.
    pub fn is_all_closed(&self) -> bool {
        self.field.cells.iter().all(|&v| v == CLOSED)
    }

    pub(crate) fn check_bounds(&self, cell: Cell) -> Result<(), BoardError> {
        if self.field.in_bounds(cell) {
            Ok(())
        } else {
            Err(BoardError::OutOfBounds {
                cell,
                rows: self.rows(),
                cols: self.cols(),
            })
        }
    }

    /// Record that `cell` now shows `value`.
    ///
    /// Already-opened cells keep their value. Returns true if the cell was newly opened.
    pub fn open_cell(&mut self, cell: Cell, value: i8) -> Result<bool, BoardError> {
        self.check_bounds(cell)?;
        if !(0..=MAX_DIGIT).contains(&value) {
            return Err(BoardError::InvalidField { cell, value });
        }
        if !self.field.is_closed(cell) {
            return Ok(false);
        }
        if self.mine.is_mine(cell) {
            return Err(BoardError::OpenedInferredMine { cell });
        }
        self.field.set(cell, value);
        self.mine.set(cell, MineState::Clear);
        Ok(true)
    }

    /// Merge a DOM class-name snapshot (`snapshot[row * cols + col]`) into the board.
    ///
    /// Only cells still closed are re-read, so hover effects on opened cells cannot
    /// undo them. Returns how many cells were newly opened.
    ///
    /// The whole snapshot is checked before anything is written: on error the board is
    /// left exactly as it was.
    pub fn merge_snapshot<S: AsRef<str>>(&mut self, snapshot: &[S]) -> Result<usize, BoardError> {
        let expected = self.rows() * self.cols();
        if snapshot.len() != expected {
            return Err(BoardError::SnapshotLength {
                len: snapshot.len(),
                expected,
            });
        }

        let mut newly_opened = Vec::new();
        for (idx, class_name) in snapshot.iter().enumerate() {
            let cell = Cell::new(idx / self.cols(), idx % self.cols());
            if !self.field.is_closed(cell) {
                continue;
            }
            let value = parse_cell_class(class_name.as_ref());
            if value == CLOSED {
                continue;
            }
            if self.mine.is_mine(cell) {
                return Err(BoardError::OpenedInferredMine { cell });
            }
            newly_opened.push((cell, value));
        }

        for &(cell, value) in &newly_opened {
            self.field.set(cell, value);
            self.mine.set(cell, MineState::Clear);
        }
        log::trace!(target: "board", "snapshot merged, {} cells newly opened", newly_opened.len());
        Ok(newly_opened.len())
    }
}

/// Decode a cell's DOM class list.
///
/// `closed` is a closed cell, `typeN` an opened cell showing N. Skin prefixes `hd_` and
/// `hdd_` are ignored. Anything unrecognised reads as closed.
pub fn parse_cell_class(class_name: &str) -> i8 {
    let lowered = class_name.to_lowercase();
    let classes: Vec<&str> = lowered
        .split_whitespace()
        .map(|c| {
            c.strip_prefix("hdd_")
                .or_else(|| c.strip_prefix("hd_"))
                .unwrap_or(c)
        })
        .collect();

    if classes.contains(&"closed") {
        return CLOSED;
    }
    for digit in 0..=MAX_DIGIT {
        let wanted = format!("type{}", digit);
        if classes.iter().any(|c| *c == wanted) {
            return digit;
        }
    }
    CLOSED
}

fn field_from_rows(rows: &[Vec<i8>]) -> Result<FieldGrid, BoardError> {
    let cols = rows.first().map_or(0, |r| r.len());
    let mut grid = FieldGrid::new(rows.len(), cols);
    for (r, row) in rows.iter().enumerate() {
        if row.len() != cols {
            return Err(BoardError::RaggedRow {
                row: r,
                len: row.len(),
                expected: cols,
            });
        }
        for (c, &value) in row.iter().enumerate() {
            grid.set(Cell::new(r, c), value);
        }
    }
    Ok(grid)
}

fn mine_from_rows(rows: &[Vec<i8>]) -> Result<MineGrid, BoardError> {
    let cols = rows.first().map_or(0, |r| r.len());
    let mut grid = MineGrid::new(rows.len(), cols);
    for (r, row) in rows.iter().enumerate() {
        if row.len() != cols {
            return Err(BoardError::RaggedRow {
                row: r,
                len: row.len(),
                expected: cols,
            });
        }
        for (c, &value) in row.iter().enumerate() {
            let cell = Cell::new(r, c);
            let state = MineState::from_i8(value).ok_or(BoardError::InvalidMine { cell, value })?;
            grid.set(cell, state);
        }
    }
    Ok(grid)
}
