//! Iterative-deepening A* with an f-cost threshold.
//!
//! Each iteration is a depth-first descent that prunes any node whose
//! `f = g + h` exceeds the current threshold, recording the minimum
//! pruned `f`; that minimum becomes the next threshold, so the sequence
//! of thresholds is strictly increasing and the search needs no
//! persistent closed set. Cycle avoidance checks the active DFS path
//! only: the path stack is pushed before recursing and popped on
//! backtrack. An absolute depth cap bounds each descent.

use serde::{Deserialize, Serialize};

use crate::agent::Agent;
use crate::core::{AgentError, GameRng, Grid, Move, Snapshot};
use crate::heuristic::{evaluate_with_score, EvalWeights};

/// IDA* parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IdaStarConfig {
    /// Absolute depth cap on each descent. Must be at least 1.
    pub max_depth: u32,

    /// Evaluation weights.
    pub weights: EvalWeights,

    /// Seed for the random fallback move.
    pub seed: u64,
}

impl Default for IdaStarConfig {
    fn default() -> Self {
        Self {
            max_depth: 5,
            weights: EvalWeights::default(),
            seed: 42,
        }
    }
}

impl IdaStarConfig {
    /// Override the depth cap.
    #[must_use]
    pub fn with_max_depth(mut self, depth: u32) -> Self {
        self.max_depth = depth;
        self
    }

    /// Override the RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Override the evaluation weights.
    #[must_use]
    pub fn with_weights(mut self, weights: EvalWeights) -> Self {
        self.weights = weights;
        self
    }
}

/// Iterative-deepening best-first agent.
pub struct IdaStarAgent {
    config: IdaStarConfig,
    rng: GameRng,
}

impl IdaStarAgent {
    /// Create an IDA* agent, validating the configuration.
    pub fn new(config: IdaStarConfig) -> Result<Self, AgentError> {
        if config.max_depth == 0 {
            return Err(AgentError::InvalidConfig(
                "IDA* depth cap must be at least 1".into(),
            ));
        }
        let rng = GameRng::new(config.seed);
        Ok(Self { config, rng })
    }

    /// Run threshold iterations from the state after a first move.
    ///
    /// Returns the best heuristic value observed and the threshold
    /// sequence (strictly increasing after the first entry).
    fn deepen(&self, start: Grid, start_score: u32) -> (f64, Vec<f64>) {
        let weights = &self.config.weights;
        let h0 = evaluate_with_score(&start, start_score, weights);
        let mut threshold = 1.0 - h0;
        let mut thresholds = Vec::new();
        let mut best_h = f64::NEG_INFINITY;

        loop {
            thresholds.push(threshold);
            let mut path = vec![start];
            let pruned = self.descend(
                &start,
                start_score,
                1,
                threshold,
                &mut path,
                &mut best_h,
            );
            match pruned {
                // The minimum pruned f is strictly above the threshold, so
                // the sequence keeps increasing and terminates once every
                // reachable node fits under the bound.
                Some(next) => threshold = next,
                None => break,
            }
        }

        (best_h, thresholds)
    }

    /// Depth-first descent under the current threshold. Returns the
    /// minimum pruned `f`, or `None` if nothing was pruned.
    fn descend(
        &self,
        grid: &Grid,
        score: u32,
        depth: u32,
        threshold: f64,
        path: &mut Vec<Grid>,
        best_h: &mut f64,
    ) -> Option<f64> {
        let weights = &self.config.weights;
        let h = evaluate_with_score(grid, score, weights);
        let f = f64::from(depth) - h;
        if f > threshold {
            return Some(f);
        }

        if h > *best_h {
            *best_h = h;
        }
        if depth >= self.config.max_depth {
            return None;
        }

        let mut min_pruned: Option<f64> = None;
        for mv in Move::ALL {
            let t = grid.apply(mv);
            if !t.changed {
                continue;
            }
            // Cycle check against ancestors on the active path only.
            if path.contains(&t.grid) {
                continue;
            }

            path.push(t.grid);
            let pruned = self.descend(
                &t.grid,
                score + t.score_delta,
                depth + 1,
                threshold,
                path,
                best_h,
            );
            path.pop();

            if let Some(p) = pruned {
                min_pruned = Some(min_pruned.map_or(p, |m| m.min(p)));
            }
        }
        min_pruned
    }
}

impl Agent for IdaStarAgent {
    fn name(&self) -> &'static str {
        "ida_star"
    }

    fn get_move(&mut self, snapshot: &Snapshot) -> Result<Move, AgentError> {
        let legal = snapshot.grid.legal_moves();
        if legal.is_empty() {
            return Err(AgentError::NoLegalMove);
        }

        let mut best: Option<(f64, Move)> = None;
        for &mv in &legal {
            let t = snapshot.grid.apply(mv);
            let (value, _) = self.deepen(t.grid, snapshot.score + t.score_delta);
            if best.map_or(true, |(b, _)| value > b) {
                best = Some((value, mv));
            }
        }

        match best {
            Some((_, mv)) => Ok(mv),
            // Nothing improved on the initial bound; any legal move is fine.
            None => self
                .rng
                .choose(&legal)
                .copied()
                .ok_or(AgentError::NoLegalMove),
        }
    }
}
