//! Fixpoint driver: rebuild constraints and run both rule engines until no new mine
//! is marked.

use crate::constraint::build_constraints;
use crate::error::Contradiction;
use crate::rules::{apply_basic_rules, apply_subset_rule};
use crate::types::{Cell, FieldGrid, MineGrid, NeighborCache};
use std::collections::BTreeSet;

/// Result of a deterministic propagation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Propagation {
    /// Every cell proven safe in any iteration.
    ///
    /// New mine markings only add information, so a cell proven safe early stays safe.
    pub safe: BTreeSet<Cell>,
    /// True if any iteration marked a new mine.
    pub mines_changed: bool,
    /// Iterations actually run.
    pub iterations: usize,
}

/// Run basic + subset rules to a fixpoint, at most `max_iterations` times.
///
/// Hitting the cap is not an error; the driver stops with whatever it derived.
pub fn propagate(
    field: &FieldGrid,
    mine: &mut MineGrid,
    nc: &NeighborCache,
    max_iterations: usize,
) -> Result<Propagation, Contradiction> {
    let mut result = Propagation::default();

    while result.iterations < max_iterations {
        result.iterations += 1;

        // Marked mines change neighbor counts, so constraints are rebuilt every round.
        let constraints = build_constraints(field, mine, nc)?;
        log::trace!(
            target: "propagate",
            "iteration {}: {} constraints",
            result.iterations,
            constraints.len()
        );

        let basic = apply_basic_rules(&constraints, mine);
        let subset = apply_subset_rule(&constraints, mine)?;

        result.safe.extend(basic.safe);
        result.safe.extend(subset.safe);

        if !(basic.mines_changed || subset.mines_changed) {
            return Ok(result);
        }
        result.mines_changed = true;
    }

    log::debug!(
        target: "propagate",
        "iteration cap {} reached, stopping with {} safe cells",
        max_iterations,
        result.safe.len()
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardState;
    use crate::options::MAX_FIXPOINT_ITERATIONS;

    /// 1-2-1 along an edge: mines at both ends, the middle is safe, but only after
    /// the subset rule has marked the ends.
    fn one_two_one() -> BoardState {
        BoardState::from_rows(&[vec![-1, -1, -1], vec![1, 2, 1]], None).unwrap()
    }

    #[test]
    fn test_reaches_fixpoint() {
        let mut board = one_two_one();
        let (field, mine, nc) = board.parts_mut();
        let result = propagate(field, mine, nc, MAX_FIXPOINT_ITERATIONS).unwrap();

        assert!(result.mines_changed);
        assert_eq!(result.iterations, 2);
        assert_eq!(result.safe.into_iter().collect::<Vec<_>>(), vec![Cell::new(0, 1)]);
        assert!(board.mine().is_mine(Cell::new(0, 0)));
        assert!(board.mine().is_mine(Cell::new(0, 2)));
    }

    #[test]
    fn test_cap_stops_early() {
        let mut board = one_two_one();
        let (field, mine, nc) = board.parts_mut();
        let result = propagate(field, mine, nc, 1).unwrap();

        assert_eq!(result.iterations, 1);
        assert!(result.mines_changed);
        assert!(result.safe.is_empty());
    }

    #[test]
    fn test_zero_cap_does_nothing() {
        let mut board = one_two_one();
        let (field, mine, nc) = board.parts_mut();
        let result = propagate(field, mine, nc, 0).unwrap();
        assert_eq!(result, Propagation::default());
        assert_eq!(board.mine().count(), 0);
    }

    #[test]
    fn test_second_run_is_stable() {
        let mut board = one_two_one();
        {
            let (field, mine, nc) = board.parts_mut();
            propagate(field, mine, nc, MAX_FIXPOINT_ITERATIONS).unwrap();
        }
        let (field, mine, nc) = board.parts_mut();
        let again = propagate(field, mine, nc, MAX_FIXPOINT_ITERATIONS).unwrap();
        assert!(!again.mines_changed);
        assert_eq!(again.iterations, 1);
        assert!(again.safe.contains(&Cell::new(0, 1)));
    }

    #[test]
    fn test_contradiction_propagates() {
        let mut board = BoardState::from_rows(&[vec![-1, 3, -1]], None).unwrap();
        let (field, mine, nc) = board.parts_mut();
        assert!(matches!(
            propagate(field, mine, nc, MAX_FIXPOINT_ITERATIONS),
            Err(Contradiction::NeedExceedsUnknowns { .. })
        ));
    }
}
