//! Deduction rules applied to one batch of constraints.
//!
//! - Basic rules: `need == 0` clears every unknown, `need == |U|` makes every unknown a mine.
//! - Subset rule: if `U(A) ⊆ U(B)`, the cells in `U(B) \ U(A)` hold exactly
//!   `need(B) - need(A)` mines.
//!
//! Neither rule touches the field. Mine markings are written into the mine grid in place.

use crate::constraint::Constraint;
use crate::error::Contradiction;
use crate::types::{Cell, MineGrid};
use std::collections::BTreeSet;

/// What a rule pass found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleOutcome {
    /// Cells proven safe by this pass.
    pub safe: BTreeSet<Cell>,
    /// True if at least one cell was newly marked as a mine.
    pub mines_changed: bool,
}

impl RuleOutcome {
    fn mark_mines<'a>(&mut self, mine: &mut MineGrid, cells: impl IntoIterator<Item = &'a Cell>) {
        for &cell in cells {
            if mine.mark_mine(cell) {
                self.mines_changed = true;
            }
        }
    }
}

// ─── Basic Rules ────────────────────────────────────────────────────────────

pub fn apply_basic_rules(constraints: &[Constraint], mine: &mut MineGrid) -> RuleOutcome {
    let mut outcome = RuleOutcome::default();

    for c in constraints {
        if c.need == 0 {
            outcome.safe.extend(c.unknowns.iter().copied());
        } else if c.need == c.unknowns.len() {
            outcome.mark_mines(mine, &c.unknowns);
        }
    }

    log::trace!(
        target: "rules",
        "basic: {} safe, mines changed: {}",
        outcome.safe.len(),
        outcome.mines_changed
    );
    outcome
}

// ─── Subset Rule ────────────────────────────────────────────────────────────

/// Compare every ordered pair of distinct constraints.
///
/// Quadratic in the number of constraints, which is bounded by the board area.
pub fn apply_subset_rule(
    constraints: &[Constraint],
    mine: &mut MineGrid,
) -> Result<RuleOutcome, Contradiction> {
    let mut outcome = RuleOutcome::default();

    for (i, a) in constraints.iter().enumerate() {
        for (j, b) in constraints.iter().enumerate() {
            if i == j {
                continue;
            }
            if a.unknowns.len() >= b.unknowns.len() || !a.unknowns.is_subset(&b.unknowns) {
                continue;
            }

            let diff: Vec<Cell> = b.unknowns.difference(&a.unknowns).copied().collect();
            let diff_mines = b.need as i64 - a.need as i64;
            if diff_mines < 0 || diff_mines > diff.len() as i64 {
                return Err(Contradiction::Subset {
                    subset: a.anchor,
                    superset: b.anchor,
                    diff_mines,
                    diff_cells: diff.len(),
                });
            }

            if diff_mines == 0 {
                outcome.safe.extend(diff);
            } else if diff_mines as usize == diff.len() {
                outcome.mark_mines(mine, &diff);
            }
        }
    }

    log::trace!(
        target: "rules",
        "subset: {} safe, mines changed: {}",
        outcome.safe.len(),
        outcome.mines_changed
    );
    Ok(outcome)
}
