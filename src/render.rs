//! Plain-text diagnostics for operators: board tables and action lists.

use crate::solver::Action;
use crate::types::{Cell, FieldGrid, MineGrid};
use std::fmt::Write;

/// Field values as a right-aligned table, one board row per line.
pub fn field_table(field: &FieldGrid) -> String {
    table(field.rows, field.cols, |cell| field.get(cell).to_string())
}

/// Mine grid as a right-aligned table using the `-1 / 0 / 1` encoding.
pub fn mine_table(mine: &MineGrid) -> String {
    table(mine.rows, mine.cols, |cell| mine.get(cell).to_i8().to_string())
}

/// Up to `limit` actions, one per line.
pub fn action_list(actions: &[Action], limit: usize) -> String {
    if actions.is_empty() {
        return "No actions found.\n".to_string();
    }
    let mut out = String::new();
    for action in actions.iter().take(limit) {
        let _ = writeln!(out, "{}", action);
    }
    if actions.len() > limit {
        let _ = writeln!(out, "... {} more", actions.len() - limit);
    }
    out
}

fn table(rows: usize, cols: usize, text: impl Fn(Cell) -> String) -> String {
    let cells: Vec<Vec<String>> = (0..rows)
        .map(|row| (0..cols).map(|col| text(Cell::new(row, col))).collect())
        .collect();

    let widths: Vec<usize> = (0..cols)
        .map(|col| cells.iter().map(|r| r[col].len()).max().unwrap_or(0))
        .collect();

    let mut out = String::new();
    for row in &cells {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(s, &w)| format!("{:>w$}", s, w = w))
            .collect();
        out.push_str(&line.join("  "));
        out.push('\n');
    }
    out
}
