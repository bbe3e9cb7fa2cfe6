//! MCTS configuration parameters.

use serde::{Deserialize, Serialize};

use crate::heuristic::EvalWeights;

/// MCTS search parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MctsConfig {
    /// Number of select/expand/rollout/backpropagate iterations per
    /// decision. Must be large enough to expand at least one root child.
    pub iterations: u32,

    /// Maximum moves simulated per rollout.
    pub rollout_depth: u32,

    /// UCT exploration constant (default: sqrt(2)).
    /// Higher values favor exploration over exploitation.
    pub exploration_constant: f64,

    /// Scale of the heuristic tie-break added to the max-tile rollout
    /// reward. Small by design so the max tile dominates.
    pub heuristic_tie_break: f64,

    /// Evaluation weights used by the greedy rollout policy.
    pub weights: EvalWeights,

    /// Seed for the sampling RNG. Same seed, same search.
    pub seed: u64,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            iterations: 1000,
            rollout_depth: 15,
            exploration_constant: std::f64::consts::SQRT_2,
            heuristic_tie_break: 1e-3,
            weights: EvalWeights::default(),
            seed: 42,
        }
    }
}

impl MctsConfig {
    /// Override the iteration budget.
    #[must_use]
    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    /// Override the rollout depth cap.
    #[must_use]
    pub fn with_rollout_depth(mut self, depth: u32) -> Self {
        self.rollout_depth = depth;
        self
    }

    /// Override the exploration constant.
    #[must_use]
    pub fn with_exploration(mut self, c: f64) -> Self {
        self.exploration_constant = c;
        self
    }

    /// Override the RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Override the rollout evaluation weights.
    #[must_use]
    pub fn with_weights(mut self, weights: EvalWeights) -> Self {
        self.weights = weights;
        self
    }
}
