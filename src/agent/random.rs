//! Uniform random baseline.

use crate::core::{AgentError, GameRng, Move, Snapshot};

use super::Agent;

/// Picks uniformly among the legal moves.
pub struct RandomAgent {
    rng: GameRng,
}

impl RandomAgent {
    /// Create a random agent with its own seeded RNG.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: GameRng::new(seed),
        }
    }
}

impl Agent for RandomAgent {
    fn name(&self) -> &'static str {
        "random"
    }

    fn get_move(&mut self, snapshot: &Snapshot) -> Result<Move, AgentError> {
        let legal = snapshot.grid.legal_moves();
        self.rng
            .choose(&legal)
            .copied()
            .ok_or(AgentError::NoLegalMove)
    }
}
