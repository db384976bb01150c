//! Ground-truth game simulator.
//!
//! Plays the role of the board reader and click executor: it knows where the mines
//! are, opens cells with zero flood fill, and writes what a player would see into a
//! [`BoardState`]. [`autoplay`] drives the solver against it end to end.

use crate::board::BoardState;
use crate::error::{BoardError, Contradiction};
use crate::options::{Difficulty, SolverOptions};
use crate::solver::{opening_action, solve_with};
use crate::types::{Cell, FieldGrid, NeighborCache, CLOSED};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

/// Seedable RNG for mine placement.
pub struct SimRng {
    inner: SmallRng,
}

impl SimRng {
    /// Create from system entropy (browser crypto.getRandomValues or OS).
    pub fn new() -> Self {
        Self {
            inner: SmallRng::from_os_rng(),
        }
    }

    /// Create with a specific seed for deterministic replay.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: SmallRng::seed_from_u64(seed),
        }
    }

    /// Generate a random usize in [0, max).
    #[inline(always)]
    pub fn gen_range(&mut self, max: usize) -> usize {
        self.inner.random_range(0..max)
    }
}

impl Default for SimRng {
    fn default() -> Self {
        Self::new()
    }
}

/// Where the mines really are.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MineLayout {
    pub rows: usize,
    pub cols: usize,
    pub cells: Vec<bool>,
}

impl MineLayout {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![false; rows * cols],
        }
    }

    #[inline(always)]
    pub fn get(&self, cell: Cell) -> bool {
        self.cells[cell.row * self.cols + cell.col]
    }

    #[inline(always)]
    pub fn set(&mut self, cell: Cell, val: bool) {
        self.cells[cell.row * self.cols + cell.col] = val;
    }

    pub fn count(&self) -> usize {
        self.cells.iter().filter(|&&m| m).count()
    }
}

/// Place `mine_count` mines at random, keeping every cell within `safe_radius`
/// (Chebyshev distance) of `safe` clear.
///
/// Gives up after a fixed number of draws, so an overfull request yields fewer mines.
pub fn place_mines_random(
    rows: usize,
    cols: usize,
    mine_count: usize,
    safe: Cell,
    safe_radius: usize,
    rng: &mut SimRng,
) -> MineLayout {
    let mut layout = MineLayout::new(rows, cols);
    let mut placed = 0;
    let mut attempts = 0;
    let max_placement_attempts = 100_000;

    while placed < mine_count && attempts < max_placement_attempts {
        attempts += 1;
        let cell = Cell::new(rng.gen_range(rows), rng.gen_range(cols));

        if cell.row.abs_diff(safe.row) <= safe_radius && cell.col.abs_diff(safe.col) <= safe_radius {
            continue;
        }

        if !layout.get(cell) {
            layout.set(cell, true);
            placed += 1;
        }
    }

    layout
}

/// Digit every non-mine cell would show. Mine cells hold 0; nothing reads them.
pub fn calculate_numbers(layout: &MineLayout, nc: &NeighborCache) -> FieldGrid {
    let mut numbers = FieldGrid::new(layout.rows, layout.cols);
    for cell in numbers.cells_iter().collect::<Vec<_>>() {
        let count = if layout.get(cell) {
            0
        } else {
            nc.get(cell).iter().filter(|&&n| layout.get(n)).count() as i8
        };
        numbers.set(cell, count);
    }
    numbers
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealOutcome {
    /// Number of cells opened, flood fill included.
    Opened(usize),
    AlreadyOpen,
    Exploded,
}

/// A game with hidden truth and the player's view of it.
pub struct SimulatedGame {
    layout: MineLayout,
    numbers: FieldGrid,
    board: BoardState,
}

impl SimulatedGame {
    pub fn from_layout(layout: MineLayout) -> Self {
        let board = BoardState::new(layout.rows, layout.cols);
        let numbers = calculate_numbers(&layout, board.neighbors());
        Self {
            layout,
            numbers,
            board,
        }
    }

    /// Random board with a clear zone around `start`, which is then opened.
    pub fn new_random(
        rows: usize,
        cols: usize,
        mine_count: usize,
        start: Cell,
        rng: &mut SimRng,
    ) -> Result<Self, BoardError> {
        let layout = place_mines_random(rows, cols, mine_count, start, 1, rng);
        let mut game = Self::from_layout(layout);
        game.reveal(start)?;
        Ok(game)
    }

    /// Untouched board for a preset. Mines avoid the 3x3 block around the center, where
    /// the opening click lands.
    pub fn for_difficulty(difficulty: Difficulty, rng: &mut SimRng) -> Self {
        let preset = difficulty.preset();
        let center = Cell::new(preset.rows / 2, preset.cols / 2);
        let layout =
            place_mines_random(preset.rows, preset.cols, preset.total_mines, center, 1, rng);
        Self::from_layout(layout)
    }

    pub fn layout(&self) -> &MineLayout {
        &self.layout
    }

    pub fn board(&self) -> &BoardState {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut BoardState {
        &mut self.board
    }

    pub fn total_mines(&self) -> usize {
        self.layout.count()
    }

    /// Open `cell`; zeros open their neighbors too.
    pub fn reveal(&mut self, cell: Cell) -> Result<RevealOutcome, BoardError> {
        self.board.check_bounds(cell)?;
        if !self.board.field().is_closed(cell) {
            return Ok(RevealOutcome::AlreadyOpen);
        }
        if self.layout.get(cell) {
            return Ok(RevealOutcome::Exploded);
        }

        let mut opened = 0;
        let mut stack = vec![cell];
        while let Some(c) = stack.pop() {
            if !self.board.field().is_closed(c) {
                continue;
            }
            let val = self.numbers.get(c);
            self.board.open_cell(c, val)?;
            opened += 1;

            if val == 0 {
                stack.extend(self.board.neighbors().get(c).iter().copied());
            }
        }
        Ok(RevealOutcome::Opened(opened))
    }

    pub fn is_won(&self) -> bool {
        let field = self.board.field();
        let opened = field.cells.iter().filter(|&&v| v != CLOSED).count();
        opened == field.cells.len() - self.layout.count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    Won,
    /// A revealed cell was a mine. `guessed` is false only if a proven-safe cell exploded.
    Lost { cell: Cell, guessed: bool },
    /// The solver returned no action on an unfinished board.
    Stalled,
    OutOfSteps,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Playout {
    pub outcome: PlayOutcome,
    /// Moves made: solver calls plus the opening click.
    pub steps: usize,
    pub guesses: usize,
}

#[derive(Debug, Error)]
pub enum PlayError {
    #[error(transparent)]
    Contradiction(#[from] Contradiction),
    #[error(transparent)]
    Board(#[from] BoardError),
}

/// Call the solver and open every returned action until the game ends or `max_steps`
/// moves have been made. An untouched board gets the center opening click first.
pub fn autoplay(
    game: &mut SimulatedGame,
    max_steps: usize,
    options: &SolverOptions,
) -> Result<Playout, PlayError> {
    let total_mines = Some(game.total_mines());
    let mut steps = 0;
    let mut guesses = 0;

    while steps < max_steps {
        if game.is_won() {
            return Ok(Playout {
                outcome: PlayOutcome::Won,
                steps,
                guesses,
            });
        }

        let actions = match opening_action(game.board()) {
            Some(opening) => vec![opening],
            None => solve_with(game.board_mut(), total_mines, options)?.actions,
        };
        steps += 1;
        if actions.is_empty() {
            return Ok(Playout {
                outcome: PlayOutcome::Stalled,
                steps,
                guesses,
            });
        }

        for action in &actions {
            if action.is_guess() {
                guesses += 1;
            }
            if game.reveal(action.cell())? == RevealOutcome::Exploded {
                log::debug!(target: "sim", "exploded on {} after {} steps", action, steps);
                return Ok(Playout {
                    outcome: PlayOutcome::Lost {
                        cell: action.cell(),
                        guessed: action.is_guess(),
                    },
                    steps,
                    guesses,
                });
            }
        }
    }

    let outcome = if game.is_won() {
        PlayOutcome::Won
    } else {
        PlayOutcome::OutOfSteps
    };
    Ok(Playout {
        outcome,
        steps,
        guesses,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_deterministic() {
        let mut rng1 = SimRng::from_seed(42);
        let mut rng2 = SimRng::from_seed(42);
        for _ in 0..100 {
            assert_eq!(rng1.gen_range(1000), rng2.gen_range(1000));
        }
    }

    #[test]
    fn test_place_mines_count() {
        let mut rng = SimRng::from_seed(42);
        let layout = place_mines_random(16, 30, 99, Cell::new(8, 15), 1, &mut rng);
        assert_eq!(layout.count(), 99);
    }

    #[test]
    fn test_place_mines_safe_zone() {
        let mut rng = SimRng::from_seed(42);
        let layout = place_mines_random(10, 10, 20, Cell::new(5, 5), 2, &mut rng);
        for row in 3..=7 {
            for col in 3..=7 {
                assert!(!layout.get(Cell::new(row, col)), "mine in safe zone at ({}, {})", row, col);
            }
        }
        assert_eq!(layout.count(), 20);
    }

    #[test]
    fn test_calculate_numbers_center_mine() {
        let nc = NeighborCache::new(3, 3);
        let mut layout = MineLayout::new(3, 3);
        layout.set(Cell::new(1, 1), true);
        let numbers = calculate_numbers(&layout, &nc);
        for cell in numbers.cells_iter() {
            if cell != Cell::new(1, 1) {
                assert_eq!(numbers.get(cell), 1);
            }
        }
    }

    #[test]
    fn test_calculate_numbers_corner_mine() {
        let nc = NeighborCache::new(3, 3);
        let mut layout = MineLayout::new(3, 3);
        layout.set(Cell::new(0, 0), true);
        let numbers = calculate_numbers(&layout, &nc);
        assert_eq!(numbers.get(Cell::new(0, 1)), 1);
        assert_eq!(numbers.get(Cell::new(1, 1)), 1);
        assert_eq!(numbers.get(Cell::new(0, 2)), 0);
        assert_eq!(numbers.get(Cell::new(2, 2)), 0);
    }

    #[test]
    fn test_reveal_zero_cascade() {
        let mut layout = MineLayout::new(3, 3);
        layout.set(Cell::new(0, 0), true);
        let mut game = SimulatedGame::from_layout(layout);

        assert_eq!(game.reveal(Cell::new(2, 2)), Ok(RevealOutcome::Opened(8)));
        assert!(game.board().field().is_closed(Cell::new(0, 0)));
        assert!(game.is_won());
        assert_eq!(game.reveal(Cell::new(2, 2)), Ok(RevealOutcome::AlreadyOpen));
        assert_eq!(game.reveal(Cell::new(0, 0)), Ok(RevealOutcome::Exploded));
    }

    #[test]
    fn test_autoplay_marks_mine_then_finishes() {
        // 1 M 1: the left digit pins the mine, the global count clears the rest.
        let mut layout = MineLayout::new(1, 3);
        layout.set(Cell::new(0, 1), true);
        let mut game = SimulatedGame::from_layout(layout);
        game.reveal(Cell::new(0, 0)).unwrap();

        let playout = autoplay(&mut game, 20, &SolverOptions::default()).unwrap();
        assert_eq!(playout.outcome, PlayOutcome::Won);
        assert_eq!(playout.steps, 1);
        assert!(game.board().mine().is_mine(Cell::new(0, 1)));
    }

    #[test]
    fn test_reveal_out_of_bounds() {
        let mut game = SimulatedGame::from_layout(MineLayout::new(2, 2));
        assert_eq!(
            game.reveal(Cell::new(2, 0)),
            Err(BoardError::OutOfBounds {
                cell: Cell::new(2, 0),
                rows: 2,
                cols: 2
            })
        );
    }

    #[test]
    fn test_autoplay_opens_center_first() {
        // The center zero floods everything but the mine.
        let mut layout = MineLayout::new(1, 5);
        layout.set(Cell::new(0, 4), true);
        let mut game = SimulatedGame::from_layout(layout);

        let playout = autoplay(&mut game, 20, &SolverOptions::default()).unwrap();
        assert_eq!(
            playout,
            Playout {
                outcome: PlayOutcome::Won,
                steps: 1,
                guesses: 1
            }
        );
        assert_eq!(game.board().field().cells, vec![0, 0, 0, 1, -1]);
    }

    #[test]
    fn test_for_difficulty_is_untouched_with_clear_center() {
        let mut rng = SimRng::from_seed(7);
        let game = SimulatedGame::for_difficulty(Difficulty::Medium, &mut rng);
        assert!(game.board().is_all_closed());
        assert_eq!(game.total_mines(), 40);
        assert!(!game.layout().get(Cell::new(7, 9)));
    }
}
