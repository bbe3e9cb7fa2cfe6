//! Core engine types: the grid and its transition engine, the game
//! session, deterministic RNG, and the error taxonomy.

pub mod error;
pub mod game;
pub mod grid;
pub mod rng;

pub use error::AgentError;
pub use game::{Game, Snapshot, StepOutcome, SPAWN_TWO_PROBABILITY};
pub use grid::{Grid, Move, Transition, CELLS, SIZE};
pub use rng::GameRng;
