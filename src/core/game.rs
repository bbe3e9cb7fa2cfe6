//! The game session: authoritative grid, running score, and tile spawning.
//!
//! A `Game` persists across turns and owns its spawn RNG; agents only ever
//! see an immutable `Snapshot` of it. Spawns follow the standard
//! distribution: 90% a 2, 10% a 4, on a uniformly chosen empty cell.

use serde::{Deserialize, Serialize};

use super::error::AgentError;
use super::grid::{Grid, Move};
use super::rng::GameRng;
use crate::agent::Agent;

/// Probability that a spawned tile is a 2 (otherwise a 4).
pub const SPAWN_TWO_PROBABILITY: f64 = 0.9;

/// Read-only view of the session handed to agents.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Snapshot {
    /// The current board.
    pub grid: Grid,
    /// The running score.
    pub score: u32,
}

/// Outcome of one agent-driven turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepOutcome {
    /// The move the agent chose.
    pub mv: Move,
    /// Whether the move changed the board (and a tile was spawned).
    pub moved: bool,
    /// Whether the game is over after this turn.
    pub game_over: bool,
    /// Score gained by this turn's merges.
    pub score_delta: u32,
    /// The running score after this turn.
    pub score: u32,
}

/// A 2048 game session.
pub struct Game {
    grid: Grid,
    score: u32,
    rng: GameRng,
    last_spawn: Option<(u8, u8)>,
}

impl Game {
    /// Start a new game with two spawned tiles.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        let mut game = Self {
            grid: Grid::EMPTY,
            score: 0,
            rng: GameRng::new(seed),
            last_spawn: None,
        };
        game.spawn_random_tile();
        game.spawn_random_tile();
        game
    }

    /// Reset to a fresh board with two spawned tiles. The RNG stream
    /// continues, so consecutive games from one session differ.
    pub fn reset(&mut self) {
        self.grid = Grid::EMPTY;
        self.score = 0;
        self.last_spawn = None;
        self.spawn_random_tile();
        self.spawn_random_tile();
    }

    /// The current board.
    #[inline]
    #[must_use]
    pub fn grid(&self) -> Grid {
        self.grid
    }

    /// The running score.
    #[inline]
    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Largest tile on the board.
    #[must_use]
    pub fn max_tile(&self) -> u32 {
        self.grid.max_tile()
    }

    /// Position of the most recently spawned tile, if any.
    #[must_use]
    pub fn last_spawn(&self) -> Option<(u8, u8)> {
        self.last_spawn
    }

    /// True iff no legal move remains.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.grid.is_terminal()
    }

    /// An immutable snapshot for agents.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            grid: self.grid,
            score: self.score,
        }
    }

    /// Spawn a 2 (90%) or 4 (10%) on a uniformly chosen empty cell.
    /// Returns false if the board is full.
    pub fn spawn_random_tile(&mut self) -> bool {
        let empties = self.grid.empty_cells();
        let Some(&(r, c)) = self.rng.choose(&empties) else {
            return false;
        };
        let value = if self.rng.gen_bool(SPAWN_TWO_PROBABILITY) {
            2
        } else {
            4
        };
        self.grid = self.grid.with_tile(r as usize, c as usize, value);
        self.last_spawn = Some((r, c));
        true
    }

    /// Run one full turn: ask the agent for a move, apply it, and spawn a
    /// tile if the board changed.
    ///
    /// Returns `AgentError::NoLegalMove` when called on a terminal grid;
    /// the caller decides whether that ends the run or starts a new game.
    pub fn step_with_agent(&mut self, agent: &mut dyn Agent) -> Result<StepOutcome, AgentError> {
        if self.grid.is_terminal() {
            return Err(AgentError::NoLegalMove);
        }

        let mv = agent.get_move(&self.snapshot())?;
        let transition = self.grid.apply(mv);

        if transition.changed {
            self.grid = transition.grid;
            self.score += transition.score_delta;
            self.spawn_random_tile();
        }

        Ok(StepOutcome {
            mv,
            moved: transition.changed,
            game_over: self.grid.is_terminal(),
            score_delta: transition.score_delta,
            score: self.score,
        })
    }
}
