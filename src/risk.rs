//! Mine-probability estimates for when no cell can be proven safe.
//!
//! Frontier cells get `need / |U|` from each constraint that touches them, keeping the
//! largest. That is an upper-bound style approximation, not the joint posterior over
//! connected constraints. Interior cells, touched by no constraint, get the global prior
//! `mines_left / unknown_cells` when the total mine count is known.

use crate::constraint::build_constraints;
use crate::error::Contradiction;
use crate::types::{Cell, FieldGrid, MineGrid, NeighborCache};
use std::collections::BTreeMap;

/// Estimated mine probability per unresolved cell, in `[0, 1]`.
pub type RiskMap = BTreeMap<Cell, f64>;

pub fn estimate_risk_map(
    field: &FieldGrid,
    mine: &MineGrid,
    nc: &NeighborCache,
    total_mines: Option<usize>,
) -> Result<RiskMap, Contradiction> {
    let mut risk = RiskMap::new();

    for c in build_constraints(field, mine, nc)? {
        let p = c.density();
        for cell in c.unknowns {
            let entry = risk.entry(cell).or_insert(p);
            if p > *entry {
                *entry = p;
            }
        }
    }

    if let Some(total) = total_mines {
        let mines_left = total.saturating_sub(mine.count());
        let unknown: Vec<Cell> = field
            .cells_iter()
            .filter(|&cell| field.is_closed(cell) && !mine.is_mine(cell))
            .collect();

        if !unknown.is_empty() {
            let prior = (mines_left as f64 / unknown.len() as f64).min(1.0);
            for cell in unknown {
                risk.entry(cell).or_insert(prior);
            }
        }
    }

    Ok(risk)
}

/// The cell with strictly minimal risk; ties go to the lowest (row, col).
pub fn pick_min_risk(risk: &RiskMap) -> Option<(Cell, f64)> {
    let mut best: Option<(Cell, f64)> = None;
    // BTreeMap iterates in (row, col) order, so keeping the first strict minimum
    // implements the tie-break.
    for (&cell, &p) in risk {
        match best {
            Some((_, best_p)) if p >= best_p => {}
            _ => best = Some((cell, p)),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardState;

    fn risk_of(field: &[Vec<i8>], mine: Option<&[Vec<i8>]>, total: Option<usize>) -> RiskMap {
        let board = BoardState::from_rows(field, mine).unwrap();
        estimate_risk_map(board.field(), board.mine(), board.neighbors(), total).unwrap()
    }

    #[test]
    fn test_local_density() {
        let risk = risk_of(&[vec![-1, 1, -1, -1]], None, None);
        // (0, 1) sees (0, 0) and (0, 2); (0, 3) touches nothing.
        assert_eq!(risk.len(), 2);
        assert_eq!(risk[&Cell::new(0, 0)], 0.5);
        assert_eq!(risk[&Cell::new(0, 2)], 0.5);
    }

    #[test]
    fn test_overlap_takes_max() {
        // (0, 2) is seen by a 1 over two cells and a 2 over two cells.
        let risk = risk_of(&[vec![-1, 1, -1, 2, -1]], None, None);
        assert_eq!(risk[&Cell::new(0, 0)], 0.5);
        assert_eq!(risk[&Cell::new(0, 2)], 1.0);
        assert_eq!(risk[&Cell::new(0, 4)], 1.0);
    }

    #[test]
    fn test_global_prior_for_interior_cells() {
        let field = vec![vec![1, -1, -1, -1], vec![-1, -1, -1, -1]];
        let risk = risk_of(&field, None, Some(3));
        // 7 closed cells, 3 mines left.
        let prior = 3.0 / 7.0;
        assert_eq!(risk.len(), 7);
        assert!((risk[&Cell::new(0, 1)] - 1.0 / 3.0).abs() < 1e-12);
        assert!((risk[&Cell::new(0, 3)] - prior).abs() < 1e-12);
        assert!((risk[&Cell::new(1, 3)] - prior).abs() < 1e-12);
    }

    #[test]
    fn test_prior_counts_marked_mines() {
        let field = vec![vec![-1, -1, -1]];
        let mine = vec![vec![1, -1, -1]];
        let risk = risk_of(&field, Some(&mine), Some(2));
        assert_eq!(risk.len(), 2);
        assert_eq!(risk[&Cell::new(0, 1)], 0.5);
        assert!(!risk.contains_key(&Cell::new(0, 0)));
    }

    #[test]
    fn test_prior_never_negative() {
        let field = vec![vec![-1, -1]];
        let mine = vec![vec![1, -1]];
        let risk = risk_of(&field, Some(&mine), Some(0));
        assert_eq!(risk[&Cell::new(0, 1)], 0.0);
    }

    #[test]
    fn test_no_total_leaves_interior_out() {
        let risk = risk_of(&[vec![-1, -1, -1]], None, None);
        assert!(risk.is_empty());
    }

    #[test]
    fn test_pick_min_strict_and_tie_break() {
        let mut risk = RiskMap::new();
        risk.insert(Cell::new(0, 0), 0.5);
        risk.insert(Cell::new(2, 1), 0.1);
        risk.insert(Cell::new(1, 4), 0.3);
        assert_eq!(pick_min_risk(&risk), Some((Cell::new(2, 1), 0.1)));

        risk.insert(Cell::new(1, 7), 0.1);
        risk.insert(Cell::new(3, 0), 0.1);
        assert_eq!(pick_min_risk(&risk), Some((Cell::new(1, 7), 0.1)));
    }

    #[test]
    fn test_pick_min_empty() {
        assert_eq!(pick_min_risk(&RiskMap::new()), None);
    }
}
