//! # rust-2048
//!
//! A 2048 game engine and a suite of search agents that play it by
//! simulating candidate futures and scoring them.
//!
//! ## Design Principles
//!
//! 1. **Immutable grids**: every transition produces a new 16-cell board;
//!    search components fan out over successors without defensive copies
//!    or shared mutable state.
//!
//! 2. **One evaluator, many searchers**: greedy lookahead, expectimax,
//!    MCTS rollouts, and the A*/IDA* bounds all score grids through the
//!    same heuristic terms.
//!
//! 3. **Deterministic by seed**: every stochastic component owns a seeded
//!    RNG; the same seed reproduces a whole game or search.
//!
//! ## Modules
//!
//! - `core`: grid, transition engine, game session, RNG, errors
//! - `heuristic`: the shared board evaluator
//! - `agent`: the `Agent` trait, static registry, and simple baselines
//! - `expectimax`: depth-bounded expectimax with optional alpha-beta bounds
//! - `mcts`: Monte Carlo Tree Search over decision/chance nodes
//! - `search`: A* and IDA* best-first lookahead
//! - `td`: TD(0) linear value agent and weight persistence
//! - `sim`: batch simulation and training loops
//!
//! ## Quick start
//!
//! ```
//! use rust_2048::agent::GreedyAgent;
//! use rust_2048::core::Game;
//!
//! let mut game = Game::new(42);
//! let mut agent = GreedyAgent::default();
//!
//! let mut turns = 0;
//! while !game.is_over() && turns < 4 {
//!     let outcome = game.step_with_agent(&mut agent).unwrap();
//!     assert!(outcome.moved);
//!     turns += 1;
//! }
//! assert!(turns > 0);
//! ```

pub mod agent;
pub mod core;
pub mod expectimax;
pub mod heuristic;
pub mod mcts;
pub mod search;
pub mod sim;
pub mod td;

// Re-export commonly used types
pub use crate::core::{AgentError, Game, GameRng, Grid, Move, Snapshot, StepOutcome, Transition};

pub use crate::agent::{Agent, AgentKind, CycleAgent, GreedyAgent, RandomAgent};

pub use crate::expectimax::{ExpectimaxAgent, ExpectimaxConfig};

pub use crate::heuristic::{evaluate, evaluate_with_score, EvalWeights};

pub use crate::mcts::{MctsAgent, MctsConfig, MctsSearch, SearchStats, SearchTree};

pub use crate::search::{AStarAgent, AStarConfig, IdaStarAgent, IdaStarConfig};

pub use crate::td::{TdAgent, TdConfig, TdWeights, FEATURE_LEN};

pub use crate::sim::{
    run_batch, train, SimulationConfig, SimulationReport, TrainingConfig, TrainingReport,
};
