//! Solver configuration and per-difficulty game presets.

use crate::geometry::ScreenRegion;
use serde::{Deserialize, Serialize};

/// Upper bound on fixpoint iterations.
///
/// A termination guard only. Realistic boards settle in a handful of iterations.
pub const MAX_FIXPOINT_ITERATIONS: usize = 50;

/// Tunables for one inference pass. Deserialises from a partial JS object, missing
/// fields take their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SolverOptions {
    /// Cap on constraint rebuild / rule passes before the driver stops early.
    pub max_iterations: usize,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            max_iterations: MAX_FIXPOINT_ITERATIONS,
        }
    }
}

/// Board sizes the engine is tuned against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Small,
    Medium,
    Hard,
}

/// Everything a driver needs to play one difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Preset {
    pub rows: usize,
    pub cols: usize,
    pub total_mines: usize,
    /// Solver calls before a driver gives up on the game.
    pub max_moves: usize,
    /// Where the board sits on screen for the default browser layout.
    pub region: ScreenRegion,
}

impl Difficulty {
    pub fn preset(self) -> Preset {
        match self {
            Difficulty::Small => Preset {
                rows: 8,
                cols: 10,
                total_mines: 10,
                max_moves: 200,
                region: ScreenRegion::new(735, 427, 450, 360),
            },
            Difficulty::Medium => Preset {
                rows: 14,
                cols: 18,
                total_mines: 40,
                max_moves: 800,
                region: ScreenRegion::new(690, 397, 540, 420),
            },
            Difficulty::Hard => Preset {
                rows: 20,
                cols: 24,
                total_mines: 99,
                max_moves: 2000,
                region: ScreenRegion::new(660, 357, 600, 500),
            },
        }
    }
}
