//! Expectimax search over alternating MAX and CHANCE layers.
//!
//! MAX layers enumerate the agent's legal moves; CHANCE layers take the
//! probability-weighted expectation over every possible tile spawn (a 2
//! with weight 0.9 and a 4 with weight 0.1, split uniformly across the
//! empty cells). Depth counts full game turns, so it decrements at MAX
//! layers only.
//!
//! With `alpha_beta` enabled, MAX layers cut off once their running
//! maximum reaches the beta bound and tighten alpha as children resolve.
//! Pruning changes how many nodes are visited, never which move wins:
//! expectation values are left exact, so the chosen move is identical to
//! the unpruned search for any fixed grid and depth.
//!
//! Ties between first moves break toward the earlier move in the fixed
//! up/down/left/right enumeration order.

use serde::{Deserialize, Serialize};

use crate::agent::Agent;
use crate::core::{AgentError, Grid, Move, Snapshot};
use crate::heuristic::{evaluate_with_score, EvalWeights};

/// Expectimax parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExpectimaxConfig {
    /// Search depth in full game turns. Must be at least 1.
    pub depth: u32,

    /// Enable alpha-beta bounds at MAX layers.
    pub alpha_beta: bool,

    /// Evaluation weights for leaf scoring.
    pub weights: EvalWeights,
}

impl Default for ExpectimaxConfig {
    fn default() -> Self {
        Self {
            depth: 3,
            alpha_beta: false,
            weights: EvalWeights::default(),
        }
    }
}

impl ExpectimaxConfig {
    /// Override the search depth.
    #[must_use]
    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }

    /// Enable or disable alpha-beta pruning.
    #[must_use]
    pub fn with_alpha_beta(mut self, enabled: bool) -> Self {
        self.alpha_beta = enabled;
        self
    }

    /// Override the evaluation weights.
    #[must_use]
    pub fn with_weights(mut self, weights: EvalWeights) -> Self {
        self.weights = weights;
        self
    }
}

/// Depth-bounded expectimax agent, optionally alpha-beta pruned.
pub struct ExpectimaxAgent {
    config: ExpectimaxConfig,
}

impl ExpectimaxAgent {
    /// Create an expectimax agent, validating the configuration.
    pub fn new(config: ExpectimaxConfig) -> Result<Self, AgentError> {
        if config.depth == 0 {
            return Err(AgentError::InvalidConfig(
                "expectimax depth must be at least 1".into(),
            ));
        }
        Ok(Self { config })
    }

    /// Expected value of the CHANCE layer after a player move.
    fn chance_value(&self, grid: &Grid, score: u32, depth: u32, alpha: f64, beta: f64) -> f64 {
        if depth == 0 || grid.is_terminal() {
            return evaluate_with_score(grid, score, &self.config.weights);
        }

        let empties = grid.empty_cells();
        if empties.is_empty() {
            return evaluate_with_score(grid, score, &self.config.weights);
        }

        let num_empty = empties.len() as f64;
        let prob_two = 0.9 / num_empty;
        let prob_four = 0.1 / num_empty;

        let mut expected = 0.0;
        for &(r, c) in &empties {
            let with_two = grid.with_tile(r as usize, c as usize, 2);
            expected += prob_two * self.max_value(&with_two, score, depth, alpha, beta);

            let with_four = grid.with_tile(r as usize, c as usize, 4);
            expected += prob_four * self.max_value(&with_four, score, depth, alpha, beta);
        }
        expected
    }

    /// Best value over the player's legal moves at a MAX layer.
    fn max_value(&self, grid: &Grid, score: u32, depth: u32, mut alpha: f64, beta: f64) -> f64 {
        if depth == 0 || grid.is_terminal() {
            return evaluate_with_score(grid, score, &self.config.weights);
        }

        let mut best = f64::NEG_INFINITY;
        let mut any_move = false;
        for mv in Move::ALL {
            let t = grid.apply(mv);
            if !t.changed {
                continue;
            }
            any_move = true;

            let value = self.chance_value(&t.grid, score + t.score_delta, depth - 1, alpha, beta);
            if value > best {
                best = value;
            }
            if self.config.alpha_beta {
                if best >= beta {
                    return best;
                }
                alpha = alpha.max(best);
            }
        }

        if any_move {
            best
        } else {
            evaluate_with_score(grid, score, &self.config.weights)
        }
    }
}

impl Agent for ExpectimaxAgent {
    fn name(&self) -> &'static str {
        if self.config.alpha_beta {
            "alpha_beta_expectimax"
        } else {
            "expectimax"
        }
    }

    fn get_move(&mut self, snapshot: &Snapshot) -> Result<Move, AgentError> {
        let mut best: Option<(f64, Move)> = None;
        let mut alpha = f64::NEG_INFINITY;
        let beta = f64::INFINITY;

        for mv in Move::ALL {
            let t = snapshot.grid.apply(mv);
            if !t.changed {
                continue;
            }
            let value = self.chance_value(
                &t.grid,
                snapshot.score + t.score_delta,
                self.config.depth,
                alpha,
                beta,
            );
            if best.map_or(true, |(b, _)| value > b) {
                best = Some((value, mv));
            }
            if self.config.alpha_beta {
                alpha = alpha.max(value);
            }
        }

        best.map(|(_, mv)| mv).ok_or(AgentError::NoLegalMove)
    }
}
