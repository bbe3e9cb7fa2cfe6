//! One-ply heuristic lookahead.

use crate::core::{AgentError, Move, Snapshot};
use crate::heuristic::{evaluate_with_score, EvalWeights};

use super::Agent;

/// Applies the evaluator to each one-step successor and takes the best.
///
/// Ties break toward the earlier move in the fixed up/down/left/right
/// enumeration, which keeps the agent deterministic.
pub struct GreedyAgent {
    weights: EvalWeights,
}

impl GreedyAgent {
    /// Create a greedy agent with the given evaluation weights.
    #[must_use]
    pub fn new(weights: EvalWeights) -> Self {
        Self { weights }
    }
}

impl Default for GreedyAgent {
    fn default() -> Self {
        Self::new(EvalWeights::default())
    }
}

impl Agent for GreedyAgent {
    fn name(&self) -> &'static str {
        "greedy"
    }

    fn get_move(&mut self, snapshot: &Snapshot) -> Result<Move, AgentError> {
        let mut best: Option<(f64, Move)> = None;
        for mv in Move::ALL {
            let t = snapshot.grid.apply(mv);
            if !t.changed {
                continue;
            }
            let value =
                evaluate_with_score(&t.grid, snapshot.score + t.score_delta, &self.weights);
            if best.map_or(true, |(b, _)| value > b) {
                best = Some((value, mv));
            }
        }
        best.map(|(_, mv)| mv).ok_or(AgentError::NoLegalMove)
    }
}
