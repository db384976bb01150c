//! Solver step: the public entry point.
//!
//! 1. Propagate basic + subset rules to a fixpoint.
//! 2. Emit every proven-safe cell that is still closed as a [`Action::DeterministicSafe`].
//! 3. If there are none, fall back to the single lowest-risk cell as an
//!    [`Action::MinRiskGuess`].
//!
//! An empty action list is a normal outcome: the board is solved, or stalled with no
//! estimate available.
//!
//! [`solve`] has nothing to reason about on an untouched board and would guess the
//! top-left corner. Drivers ask [`opening_action`] first and click the center instead.

use crate::board::BoardState;
use crate::error::Contradiction;
use crate::options::SolverOptions;
use crate::propagate::propagate;
use crate::risk::{estimate_risk_map, pick_min_risk};
use crate::types::Cell;
use serde::Serialize;
use std::fmt;

/// One recommended open (left click).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Action {
    /// Proven safe by deduction.
    DeterministicSafe { cell: Cell },
    /// No safe cell exists; this one has the lowest estimated mine probability.
    MinRiskGuess { cell: Cell, probability: f64 },
    /// First click of a game, on the center cell.
    Opening { cell: Cell },
}

impl Action {
    pub fn cell(&self) -> Cell {
        match *self {
            Action::DeterministicSafe { cell }
            | Action::MinRiskGuess { cell, .. }
            | Action::Opening { cell } => cell,
        }
    }

    /// Anything not proven safe.
    pub fn is_guess(&self) -> bool {
        !matches!(self, Action::DeterministicSafe { .. })
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::DeterministicSafe { cell } => write!(f, "open {} - SAFE (deterministic)", cell),
            Action::MinRiskGuess { cell, probability } => {
                write!(f, "open {} risk={:.3} - MIN-RISK guess", cell, probability)
            }
            Action::Opening { cell } => write!(f, "open {} - START (center)", cell),
        }
    }
}

/// Output of one [`solve`] call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepResult {
    pub actions: Vec<Action>,
    /// True if this pass marked any new mine. Useful for caller-side change detection.
    pub mines_changed: bool,
}

/// The center click for a board with nothing opened yet, `None` once play has started.
pub fn opening_action(board: &BoardState) -> Option<Action> {
    if board.rows() == 0 || board.cols() == 0 || !board.is_all_closed() {
        return None;
    }
    Some(Action::Opening {
        cell: Cell::new(board.rows() / 2, board.cols() / 2),
    })
}

/// Run one inference pass with default options.
///
/// New mine markings are written into `board` in place; keep the same board for the
/// next call so they persist.
pub fn solve(
    board: &mut BoardState,
    total_mines: Option<usize>,
) -> Result<StepResult, Contradiction> {
    solve_with(board, total_mines, &SolverOptions::default())
}

pub fn solve_with(
    board: &mut BoardState,
    total_mines: Option<usize>,
    options: &SolverOptions,
) -> Result<StepResult, Contradiction> {
    let (field, mine, nc) = board.parts_mut();
    let propagation = propagate(field, mine, nc, options.max_iterations)?;

    // Re-check at emission time: a later iteration may have changed a cell's status.
    let mut actions: Vec<Action> = propagation
        .safe
        .iter()
        .filter(|&&cell| field.is_closed(cell) && !mine.is_mine(cell))
        .map(|&cell| Action::DeterministicSafe { cell })
        .collect();

    if actions.is_empty() {
        let risk = estimate_risk_map(field, mine, nc, total_mines)?;
        if let Some((cell, probability)) = pick_min_risk(&risk) {
            log::debug!(
                target: "solver",
                "no safe cells, guessing {} with p={:.3} out of {} candidates",
                cell,
                probability,
                risk.len()
            );
            actions.push(Action::MinRiskGuess { cell, probability });
        }
    }

    log::debug!(
        target: "solver",
        "{} actions after {} iterations, mines changed: {}",
        actions.len(),
        propagation.iterations,
        propagation.mines_changed
    );

    Ok(StepResult {
        actions,
        mines_changed: propagation.mines_changed,
    })
}
