//! Batch simulation and training loops.
//!
//! Everything here is synchronous and self-contained; thread fan-out
//! belongs to external callers, each owning its own runner and seeds.

pub mod runner;
pub mod trainer;

pub use runner::{run_batch, SimulationConfig, SimulationReport};
pub use trainer::{train, TrainingConfig, TrainingReport};
