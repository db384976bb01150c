//! Deterministic Minesweeper inference engine.
//!
//! Given a partially revealed board, finds cells that are certainly safe, marks cells
//! that are certainly mines, and when nothing is certain picks the cell with the lowest
//! estimated mine probability. Entry point: [`solver::solve`].
//!
//! The caller owns the [`board::BoardState`] across calls. Each call writes new mine
//! markings into it in place; that is how inferences persist between ticks.
//!
//! Flat arrays crossing the WASM boundary are row-major: `cells[row * cols + col]`.

pub mod board;
pub mod constraint;
pub mod error;
pub mod geometry;
pub mod options;
pub mod propagate;
pub mod render;
pub mod risk;
pub mod rules;
pub mod sim;
pub mod solver;
pub mod types;

pub use board::BoardState;
pub use error::{BoardError, Contradiction};
pub use options::{Difficulty, Preset, SolverOptions};
pub use solver::{opening_action, solve, solve_with, Action, StepResult};
pub use types::Cell;

// ─── WASM Exports (only compiled for wasm32 target) ─────────────────────────

#[cfg(target_arch = "wasm32")]
mod wasm_exports {
    use crate::board::BoardState;
    use crate::options::{Difficulty, SolverOptions};
    use crate::types::{Cell, FieldGrid, MineGrid, MineState};
    use crate::{risk, solver};
    use serde::Serialize;
    use wasm_bindgen::prelude::*;

    fn js_error(e: impl std::fmt::Display) -> JsValue {
        JsValue::from_str(&e.to_string())
    }

    fn board_from_flat(
        rows: usize,
        cols: usize,
        field_flat: &[i8],
        mine_flat: &[i8],
    ) -> Result<BoardState, JsValue> {
        if mine_flat.len() != rows * cols {
            return Err(js_error(format!(
                "mine array has {} cells, expected {}",
                mine_flat.len(),
                rows * cols
            )));
        }
        let mut mine = MineGrid::new(rows, cols);
        for (idx, &v) in mine_flat.iter().enumerate() {
            let cell = Cell::new(idx / cols, idx % cols);
            let state = MineState::from_i8(v)
                .ok_or_else(|| js_error(format!("invalid mine value {} at {}", v, cell)))?;
            mine.set(cell, state);
        }
        let field = FieldGrid {
            rows,
            cols,
            cells: field_flat.to_vec(),
        };
        BoardState::from_grids(field, mine).map_err(js_error)
    }

    fn parse_options(options: JsValue) -> Result<SolverOptions, JsValue> {
        if options.is_undefined() || options.is_null() {
            return Ok(SolverOptions::default());
        }
        Ok(serde_wasm_bindgen::from_value(options)?)
    }

    /// Run one inference pass. An untouched board gets the center opening click.
    /// Returns JS object: `{ actions: Action[], mine: Int8Array, minesChanged: bool }`.
    /// Throws the contradiction message if the board is inconsistent.
    #[wasm_bindgen(js_name = "solveStep")]
    pub fn wasm_solve_step(
        rows: usize,
        cols: usize,
        field_flat: &[i8],
        mine_flat: &[i8],
        total_mines: Option<u32>,
        options: JsValue,
    ) -> Result<JsValue, JsValue> {
        let mut board = board_from_flat(rows, cols, field_flat, mine_flat)?;
        let options = parse_options(options)?;
        let step = match solver::opening_action(&board) {
            Some(opening) => solver::StepResult {
                actions: vec![opening],
                mines_changed: false,
            },
            None => solver::solve_with(&mut board, total_mines.map(|t| t as usize), &options)
                .map_err(js_error)?,
        };

        let obj = js_sys::Object::new();
        js_sys::Reflect::set(&obj, &"actions".into(), &serde_wasm_bindgen::to_value(&step.actions)?)?;
        js_sys::Reflect::set(&obj, &"minesChanged".into(), &step.mines_changed.into())?;

        let mine = board.mine().to_i8_vec();
        let mine_arr = js_sys::Int8Array::new_with_length(mine.len() as u32);
        mine_arr.copy_from(&mine);
        js_sys::Reflect::set(&obj, &"mine".into(), &mine_arr.into())?;

        Ok(obj.into())
    }

    #[derive(Serialize)]
    struct RiskEntry {
        row: usize,
        col: usize,
        probability: f64,
    }

    /// Mine-probability estimate for every unresolved cell.
    /// Returns `[{ row, col, probability }]` in row-major order.
    #[wasm_bindgen(js_name = "riskMap")]
    pub fn wasm_risk_map(
        rows: usize,
        cols: usize,
        field_flat: &[i8],
        mine_flat: &[i8],
        total_mines: Option<u32>,
    ) -> Result<JsValue, JsValue> {
        let board = board_from_flat(rows, cols, field_flat, mine_flat)?;
        let map = risk::estimate_risk_map(
            board.field(),
            board.mine(),
            board.neighbors(),
            total_mines.map(|t| t as usize),
        )
        .map_err(js_error)?;

        let entries: Vec<RiskEntry> = map
            .into_iter()
            .map(|(cell, probability)| RiskEntry {
                row: cell.row,
                col: cell.col,
                probability,
            })
            .collect();
        Ok(serde_wasm_bindgen::to_value(&entries)?)
    }

    /// Board size, mine count, move budget and screen region for `"small"`, `"medium"`
    /// or `"hard"`.
    #[wasm_bindgen(js_name = "preset")]
    pub fn wasm_preset(difficulty: JsValue) -> Result<JsValue, JsValue> {
        let difficulty: Difficulty = serde_wasm_bindgen::from_value(difficulty)?;
        Ok(serde_wasm_bindgen::to_value(&difficulty.preset())?)
    }

    /// Ping function to verify WASM is loaded.
    #[wasm_bindgen(js_name = "ping")]
    pub fn wasm_ping() -> String {
        "WASM inference engine ready".to_string()
    }
}
