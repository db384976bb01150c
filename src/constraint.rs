//! Constraint construction.
//!
//! Every opened cell contributes one local equation: exactly `need` mines lie among
//! its closed neighbors that are not already inferred mines. Constraints are cheap
//! and rebuilt from the grids on every fixpoint iteration, never cached.

use crate::error::Contradiction;
use crate::types::{Cell, FieldGrid, MineGrid, NeighborCache, MAX_DIGIT};
use std::collections::BTreeSet;

/// `need` mines among `unknowns`, as seen from the opened cell at `anchor`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    pub anchor: Cell,
    /// Digit shown on the anchor cell.
    pub digit: u8,
    /// Closed neighbors not yet marked as mines. Never empty.
    pub unknowns: BTreeSet<Cell>,
    /// Mines still unaccounted for among `unknowns`; `0 <= need <= unknowns.len()`.
    pub need: usize,
}

impl Constraint {
    /// `need / |U|`, the local mine probability of each unknown.
    pub fn density(&self) -> f64 {
        self.need as f64 / self.unknowns.len() as f64
    }
}

/// Scan opened cells in row-major order and build one constraint per cell that still
/// has unresolved neighbors.
///
/// Zeros are included: a zero's closed neighbors form a `need == 0` constraint.
pub fn build_constraints(
    field: &FieldGrid,
    mine: &MineGrid,
    nc: &NeighborCache,
) -> Result<Vec<Constraint>, Contradiction> {
    let mut constraints = Vec::new();

    for anchor in field.cells_iter() {
        let val = field.get(anchor);
        if !(0..=MAX_DIGIT).contains(&val) {
            continue;
        }
        let digit = val as u8;

        let mut marked = 0usize;
        let mut unknowns = BTreeSet::new();
        for &n in nc.get(anchor) {
            if mine.is_mine(n) {
                marked += 1;
            } else if field.is_closed(n) {
                unknowns.insert(n);
            }
        }

        let need = (digit as usize)
            .checked_sub(marked)
            .ok_or(Contradiction::MinesExceedDigit {
                anchor,
                marked,
                digit,
            })?;
        if need > unknowns.len() {
            return Err(Contradiction::NeedExceedsUnknowns {
                anchor,
                need,
                unknowns: unknowns.len(),
            });
        }

        if !unknowns.is_empty() {
            constraints.push(Constraint {
                anchor,
                digit,
                unknowns,
                need,
            });
        }
    }

    Ok(constraints)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardState;

    fn build(field: &[Vec<i8>], mine: Option<&[Vec<i8>]>) -> Result<Vec<Constraint>, Contradiction> {
        let board = BoardState::from_rows(field, mine).unwrap();
        build_constraints(board.field(), board.mine(), board.neighbors())
    }

    #[test]
    fn test_single_digit_constraint() {
        let cons = build(&[vec![-1, 2, -1]], None).unwrap();
        assert_eq!(cons.len(), 1);
        let c = &cons[0];
        assert_eq!(c.anchor, Cell::new(0, 1));
        assert_eq!(c.digit, 2);
        assert_eq!(c.need, 2);
        assert_eq!(
            c.unknowns.iter().copied().collect::<Vec<_>>(),
            vec![Cell::new(0, 0), Cell::new(0, 2)]
        );
    }

    #[test]
    fn test_marked_mines_reduce_need() {
        let cons = build(&[vec![-1, 1, -1]], Some(&[vec![1, 0, -1]])).unwrap();
        assert_eq!(cons.len(), 1);
        assert_eq!(cons[0].need, 0);
        assert_eq!(cons[0].unknowns.len(), 1);
        assert!(cons[0].unknowns.contains(&Cell::new(0, 2)));
    }

    #[test]
    fn test_resolved_cells_are_skipped() {
        // Every digit sees the inferred mine at (0, 0) and nothing else closed.
        let cons = build(&[vec![-1, 1], vec![1, 1]], Some(&[vec![1, 0], vec![0, 0]])).unwrap();
        assert!(cons.is_empty());
    }

    #[test]
    fn test_zero_cell_makes_need_zero_constraint() {
        let cons = build(&[vec![-1, 0, -1]], None).unwrap();
        assert_eq!(cons.len(), 1);
        assert_eq!(cons[0].need, 0);
        assert_eq!(cons[0].unknowns.len(), 2);
    }

    #[test]
    fn test_row_major_order() {
        let field = vec![vec![1, -1, 1], vec![-1, -1, -1], vec![1, -1, 1]];
        let cons = build(&field, None).unwrap();
        let anchors: Vec<Cell> = cons.iter().map(|c| c.anchor).collect();
        assert_eq!(
            anchors,
            vec![Cell::new(0, 0), Cell::new(0, 2), Cell::new(2, 0), Cell::new(2, 2)]
        );
    }

    #[test]
    fn test_too_many_marked_mines() {
        let err = build(&[vec![-1, 1, -1]], Some(&[vec![1, 0, 1]])).unwrap_err();
        assert_eq!(
            err,
            Contradiction::MinesExceedDigit {
                anchor: Cell::new(0, 1),
                marked: 2,
                digit: 1
            }
        );
    }

    #[test]
    fn test_need_exceeds_unknowns() {
        let err = build(&[vec![-1, 3, -1]], None).unwrap_err();
        assert_eq!(
            err,
            Contradiction::NeedExceedsUnknowns {
                anchor: Cell::new(0, 1),
                need: 3,
                unknowns: 2
            }
        );
    }
}
