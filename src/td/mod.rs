//! TD(0) learning with a linear value function.
//!
//! The agent shares the greedy one-ply selection pattern: it evaluates
//! each legal successor with `w . phi(grid)` and plays the best, with
//! epsilon-greedy exploration while training. After each environment
//! step the update `w += alpha * (r + gamma * V(s') - V(s)) * phi(s)`
//! is applied; non-finite weight entries are clamped back to zero rather
//! than ever reaching move selection.
//!
//! The weight vector is the only durable artifact in the crate: an
//! ordered JSON list of reals whose length must equal `FEATURE_LEN`.
//! Anything else on disk (missing file, wrong length, parse failure)
//! falls back to the zero vector.

pub mod features;

pub use features::{extract, FEATURE_LEN};

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::agent::Agent;
use crate::core::{AgentError, GameRng, Grid, Move, Snapshot};

/// Default on-disk location for learned weights.
pub const DEFAULT_WEIGHTS_FILE: &str = "td_weights.json";

/// TD(0) hyperparameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TdConfig {
    /// Learning rate (alpha).
    pub learning_rate: f64,

    /// Discount factor (gamma).
    pub discount: f64,

    /// Exploration probability while training (epsilon).
    pub epsilon: f64,

    /// Seed for the exploration RNG.
    pub seed: u64,
}

impl Default for TdConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.01,
            discount: 0.95,
            epsilon: 0.1,
            seed: 42,
        }
    }
}

impl TdConfig {
    /// Override the learning rate.
    #[must_use]
    pub fn with_learning_rate(mut self, alpha: f64) -> Self {
        self.learning_rate = alpha;
        self
    }

    /// Override the discount factor.
    #[must_use]
    pub fn with_discount(mut self, gamma: f64) -> Self {
        self.discount = gamma;
        self
    }

    /// Override the exploration probability.
    #[must_use]
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Override the RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// The learned weight vector, always exactly `FEATURE_LEN` entries.
#[derive(Clone, Debug, PartialEq)]
pub struct TdWeights {
    values: Vec<f64>,
}

impl TdWeights {
    /// The zero vector.
    #[must_use]
    pub fn zeros() -> Self {
        Self {
            values: vec![0.0; FEATURE_LEN],
        }
    }

    /// Build from raw values; rejects any length other than `FEATURE_LEN`.
    #[must_use]
    pub fn from_values(values: Vec<f64>) -> Option<Self> {
        (values.len() == FEATURE_LEN).then_some(Self { values })
    }

    /// The raw weight entries.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Load from a JSON list of reals. A missing file, unreadable
    /// content, or a length mismatch all fall back to the zero vector.
    #[must_use]
    pub fn load(path: &Path) -> Self {
        let Ok(contents) = fs::read_to_string(path) else {
            return Self::zeros();
        };
        let Ok(values) = serde_json::from_str::<Vec<f64>>(&contents) else {
            return Self::zeros();
        };
        Self::from_values(values).unwrap_or_else(Self::zeros)
    }

    /// Persist as a JSON list of reals.
    pub fn save(&self, path: &Path) -> io::Result<()> {
        let json = serde_json::to_string(&self.values)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(path, json)
    }

    /// Clamp non-finite entries back to zero. Returns true if any entry
    /// was touched.
    pub fn sanitize(&mut self) -> bool {
        let mut touched = false;
        for w in &mut self.values {
            if !w.is_finite() {
                *w = 0.0;
                touched = true;
            }
        }
        touched
    }

    /// Inner product with a feature vector.
    #[must_use]
    pub fn dot(&self, features: &[f64; FEATURE_LEN]) -> f64 {
        self.values
            .iter()
            .zip(features.iter())
            .map(|(w, f)| w * f)
            .sum()
    }
}

impl Default for TdWeights {
    fn default() -> Self {
        Self::zeros()
    }
}

/// Linear-value agent trained by TD(0).
pub struct TdAgent {
    config: TdConfig,
    weights: TdWeights,
    rng: GameRng,
    training: bool,
}

impl TdAgent {
    /// Create an agent with zero weights.
    #[must_use]
    pub fn new(config: TdConfig) -> Self {
        let rng = GameRng::new(config.seed);
        Self {
            config,
            weights: TdWeights::zeros(),
            rng,
            training: false,
        }
    }

    /// Create an agent with a pre-built weight vector.
    #[must_use]
    pub fn with_weights(config: TdConfig, weights: TdWeights) -> Self {
        let rng = GameRng::new(config.seed);
        Self {
            config,
            weights,
            rng,
            training: false,
        }
    }

    /// Create an agent with weights loaded from disk (zeros on any
    /// mismatch or missing file).
    #[must_use]
    pub fn from_file(config: TdConfig, path: &Path) -> Self {
        let weights = TdWeights::load(path);
        Self::with_weights(config, weights)
    }

    /// Enable or disable epsilon-greedy exploration.
    pub fn set_training(&mut self, training: bool) {
        self.training = training;
    }

    /// The current weight vector.
    #[must_use]
    pub fn weights(&self) -> &TdWeights {
        &self.weights
    }

    /// Estimated value of a grid under the current weights.
    #[must_use]
    pub fn value(&self, grid: &Grid) -> f64 {
        self.weights.dot(&extract(grid))
    }

    /// Apply one TD(0) update from the transition
    /// (features of s, reward, observed s').
    ///
    /// Returns true if the update had to sanitize non-finite weights.
    pub fn learn(&mut self, prev_features: &[f64; FEATURE_LEN], reward: f64, next: &Grid) -> bool {
        let v_s = self.weights.dot(prev_features);
        let v_next = self.value(next);
        let td_error = reward + self.config.discount * v_next - v_s;

        let alpha = self.config.learning_rate;
        for (w, f) in self.weights.values.iter_mut().zip(prev_features.iter()) {
            *w += alpha * td_error * f;
        }
        self.weights.sanitize()
    }
}

impl Agent for TdAgent {
    fn name(&self) -> &'static str {
        "td_learning"
    }

    fn get_move(&mut self, snapshot: &Snapshot) -> Result<Move, AgentError> {
        let legal = snapshot.grid.legal_moves();
        if legal.is_empty() {
            return Err(AgentError::NoLegalMove);
        }

        if self.training && self.rng.gen_bool(self.config.epsilon) {
            return self
                .rng
                .choose(&legal)
                .copied()
                .ok_or(AgentError::NoLegalMove);
        }

        let mut best: Option<(f64, Move)> = None;
        for &mv in &legal {
            let successor = snapshot.grid.apply(mv).grid;
            let value = self.value(&successor);
            if best.map_or(true, |(b, _)| value > b) {
                best = Some((value, mv));
            }
        }
        best.map(|(_, mv)| mv).ok_or(AgentError::NoLegalMove)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Grid;

    #[test]
    fn test_zero_weights_value_is_zero() {
        let agent = TdAgent::new(TdConfig::default());
        assert_eq!(agent.value(&Grid::EMPTY.with_tile(0, 0, 8)), 0.0);
    }

    #[test]
    fn test_returns_legal_move() {
        let mut agent = TdAgent::new(TdConfig::default());
        let snapshot = Snapshot {
            grid: Grid::from_rows([[2, 2, 4, 0], [0, 8, 0, 0], [0, 0, 0, 0], [2, 0, 0, 2]]),
            score: 0,
        };
        let mv = agent.get_move(&snapshot).unwrap();
        assert!(snapshot.grid.is_legal(mv));
    }

    #[test]
    fn test_terminal_grid_errors() {
        let mut agent = TdAgent::new(TdConfig::default());
        let snapshot = Snapshot {
            grid: Grid::from_rows([
                [2, 4, 2, 4],
                [4, 2, 4, 2],
                [2, 4, 2, 4],
                [4, 2, 4, 2],
            ]),
            score: 0,
        };
        assert_eq!(agent.get_move(&snapshot), Err(AgentError::NoLegalMove));
    }

    #[test]
    fn test_learn_moves_weights_toward_reward() {
        let mut agent = TdAgent::new(TdConfig::default());
        let grid = Grid::EMPTY.with_tile(0, 0, 4).with_tile(0, 1, 4);
        let features = extract(&grid);
        let next = grid.apply(Move::Left).grid;

        let before = agent.value(&grid);
        agent.learn(&features, 8.0, &next);
        let after = agent.value(&grid);
        // A positive TD error on positive features raises the estimate.
        assert!(after > before);
    }

    #[test]
    fn test_learn_sanitizes_non_finite_weights() {
        let mut weights = TdWeights::zeros();
        weights.values[0] = f64::INFINITY;
        let mut agent = TdAgent::with_weights(TdConfig::default(), weights);

        let grid = Grid::EMPTY.with_tile(0, 0, 4);
        let features = extract(&grid);
        let touched = agent.learn(&features, 0.0, &grid);

        assert!(touched);
        assert!(agent.weights().values().iter().all(|w| w.is_finite()));
    }

    #[test]
    fn test_weights_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weights.json");

        let mut weights = TdWeights::zeros();
        weights.values[3] = 1.5;
        weights.values[17] = -0.25;
        weights.save(&path).unwrap();

        let loaded = TdWeights::load(&path);
        assert_eq!(loaded, weights);
    }

    #[test]
    fn test_load_missing_file_is_zeros() {
        let loaded = TdWeights::load(Path::new("/nonexistent/weights.json"));
        assert_eq!(loaded, TdWeights::zeros());
    }

    #[test]
    fn test_load_length_mismatch_is_zeros() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weights.json");
        std::fs::write(&path, "[1.0, 2.0, 3.0]").unwrap();

        let loaded = TdWeights::load(&path);
        assert_eq!(loaded, TdWeights::zeros());
    }

    #[test]
    fn test_load_garbage_is_zeros() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weights.json");
        std::fs::write(&path, "not json at all").unwrap();

        let loaded = TdWeights::load(&path);
        assert_eq!(loaded, TdWeights::zeros());
    }

    #[test]
    fn test_epsilon_greedy_only_when_training() {
        // epsilon = 1.0 forces exploration; with training off the agent
        // must stay greedy and deterministic.
        let config = TdConfig::default().with_epsilon(1.0);
        let snapshot = Snapshot {
            grid: Grid::from_rows([[2, 2, 0, 0], [4, 0, 4, 0], [0, 0, 0, 0], [2, 0, 0, 2]]),
            score: 0,
        };
        let mut greedy = TdAgent::new(config.clone());
        let first = greedy.get_move(&snapshot).unwrap();
        for _ in 0..5 {
            assert_eq!(greedy.get_move(&snapshot).unwrap(), first);
        }
    }
}
