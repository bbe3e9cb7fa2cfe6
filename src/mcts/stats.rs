//! MCTS search statistics for diagnostics and tuning.

use serde::{Deserialize, Serialize};

/// Statistics collected during one MCTS decision.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SearchStats {
    /// Iterations performed.
    pub iterations: u32,

    /// Nodes added to the tree.
    pub nodes_expanded: u32,

    /// Rollouts performed.
    pub rollouts: u32,

    /// Total time spent searching (microseconds).
    pub time_us: u64,
}

impl SearchStats {
    /// Reset all counters to zero.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Iterations per second over the last search.
    #[must_use]
    pub fn iterations_per_second(&self) -> f64 {
        if self.time_us == 0 {
            0.0
        } else {
            f64::from(self.iterations) / (self.time_us as f64 / 1_000_000.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_reset() {
        let mut stats = SearchStats {
            iterations: 100,
            nodes_expanded: 50,
            rollouts: 100,
            time_us: 10,
        };
        stats.reset();
        assert_eq!(stats.iterations, 0);
        assert_eq!(stats.rollouts, 0);
    }

    #[test]
    fn test_iterations_per_second() {
        let stats = SearchStats {
            iterations: 1000,
            time_us: 1_000_000,
            ..Default::default()
        };
        assert_eq!(stats.iterations_per_second(), 1000.0);
    }
}
