//! Depth-bounded best-first search with an explicit frontier.
//!
//! 2048 has no goal state, so this is A* machinery rather than true
//! goal-directed A*: the frontier orders states by `f = g + h` with
//! `g` the move depth and `h` the negated evaluator (the frontier is a
//! min-heap while the evaluator is higher-is-better), and the answer is
//! the first move of whichever path reaches the best observed heuristic
//! value within the depth bound.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::agent::Agent;
use crate::core::{AgentError, GameRng, Grid, Move, Snapshot};
use crate::heuristic::{evaluate_with_score, EvalWeights};

/// A* parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AStarConfig {
    /// Maximum number of moves to look ahead. Must be at least 1.
    pub depth_limit: u32,

    /// Evaluation weights.
    pub weights: EvalWeights,

    /// Seed for the random fallback move.
    pub seed: u64,
}

impl Default for AStarConfig {
    fn default() -> Self {
        Self {
            depth_limit: 3,
            weights: EvalWeights::default(),
            seed: 42,
        }
    }
}

impl AStarConfig {
    /// Override the depth limit.
    #[must_use]
    pub fn with_depth_limit(mut self, limit: u32) -> Self {
        self.depth_limit = limit;
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

/// Frontier entry ordered ascending by `f`.
struct FrontierEntry {
    f: f64,
    grid: Grid,
    score: u32,
    depth: u32,
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.f.total_cmp(&other.f) == Ordering::Equal
    }
}

impl Eq for FrontierEntry {}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap; reverse so pop yields the lowest f.
        other.f.total_cmp(&self.f)
    }
}

/// Best-first lookahead agent.
pub struct AStarAgent {
    config: AStarConfig,
    rng: GameRng,
}

impl AStarAgent {
    /// Create an A* agent, validating the configuration.
    pub fn new(config: AStarConfig) -> Result<Self, AgentError> {
        if config.depth_limit == 0 {
            return Err(AgentError::InvalidConfig(
                "A* depth limit must be at least 1".into(),
            ));
        }
        let rng = GameRng::new(config.seed);
        Ok(Self { config, rng })
    }

    /// Expand the bounded frontier from the state after a first move and
    /// return the best heuristic value observed anywhere in it.
    fn bounded_search(&self, start: Grid, start_score: u32) -> f64 {
        let weights = &self.config.weights;
        let mut open = BinaryHeap::new();
        // Closed map from expanded grid to the best depth it was expanded
        // at; equal-or-better entries suppress re-expansion.
        let mut closed: FxHashMap<Grid, u32> = FxHashMap::default();

        let h0 = evaluate_with_score(&start, start_score, weights);
        open.push(FrontierEntry {
            f: 1.0 - h0,
            grid: start,
            score: start_score,
            depth: 1,
        });

        let mut best_h = f64::NEG_INFINITY;

        while let Some(entry) = open.pop() {
            if closed.get(&entry.grid).is_some_and(|&g| g <= entry.depth) {
                continue;
            }
            closed.insert(entry.grid, entry.depth);

            let h = evaluate_with_score(&entry.grid, entry.score, weights);
            best_h = best_h.max(h);

            if entry.depth >= self.config.depth_limit {
                continue;
            }

            for mv in Move::ALL {
                let t = entry.grid.apply(mv);
                if !t.changed {
                    continue;
                }
                let depth = entry.depth + 1;
                if closed.get(&t.grid).is_some_and(|&g| g <= depth) {
                    continue;
                }
                let score = entry.score + t.score_delta;
                let h_next = evaluate_with_score(&t.grid, score, weights);
                open.push(FrontierEntry {
                    f: f64::from(depth) - h_next,
                    grid: t.grid,
                    score,
                    depth,
                });
            }
        }

        best_h
    }
}

impl Agent for AStarAgent {
    fn name(&self) -> &'static str {
        "a_star"
    }

    fn get_move(&mut self, snapshot: &Snapshot) -> Result<Move, AgentError> {
        let legal = snapshot.grid.legal_moves();
        if legal.is_empty() {
            return Err(AgentError::NoLegalMove);
        }

        let mut best: Option<(f64, Move)> = None;
        for &mv in &legal {
            let t = snapshot.grid.apply(mv);
            let value = self.bounded_search(t.grid, snapshot.score + t.score_delta);
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
