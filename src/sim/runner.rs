//! Synchronous batch simulation.
//!
//! Runs an agent over a series of independent games and aggregates the
//! outcomes. Single-threaded: callers that want parallel batches run one
//! runner per worker with disjoint seeds, no state is shared.

use serde::{Deserialize, Serialize};

use crate::agent::Agent;
use crate::core::{AgentError, Game};

/// Batch parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Number of games to play.
    pub games: u32,

    /// Per-game move cap, guarding against run-away agents.
    pub max_moves: u32,

    /// Tile value counted as a win.
    pub win_tile: u32,

    /// Base seed; game `i` uses `seed + i`.
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            games: 10,
            max_moves: 5000,
            win_tile: 2048,
            seed: 42,
        }
    }
}

impl SimulationConfig {
    /// Override the game count.
    #[must_use]
    pub fn with_games(mut self, games: u32) -> Self {
        self.games = games;
        self
    }

    /// Override the base seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Override the per-game move cap.
    #[must_use]
    pub fn with_max_moves(mut self, max_moves: u32) -> Self {
        self.max_moves = max_moves;
        self
    }
}

/// Aggregated batch results.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SimulationReport {
    /// Agent identifier.
    pub agent: String,

    /// Games completed.
    pub games: u32,

    /// Mean final score.
    pub mean_score: f64,

    /// Best final score.
    pub max_score: u32,

    /// Worst final score.
    pub min_score: u32,

    /// Population variance of final scores.
    pub score_variance: f64,

    /// Mean of per-game best tiles.
    pub mean_max_tile: f64,

    /// Best tile reached across the batch.
    pub best_tile: u32,

    /// Fraction of games reaching the win tile.
    pub win_rate: f64,

    /// Mean moves per game.
    pub mean_moves: f64,
}

/// Play `config.games` games with the agent and aggregate the outcomes.
///
/// A `NoLegalMove` from the agent ends that game (the board was
/// terminal); other agent errors abort the batch.
pub fn run_batch(
    agent: &mut dyn Agent,
    config: &SimulationConfig,
) -> Result<SimulationReport, AgentError> {
    let mut scores = Vec::with_capacity(config.games as usize);
    let mut max_tiles = Vec::with_capacity(config.games as usize);
    let mut move_counts = Vec::with_capacity(config.games as usize);
    let mut wins = 0u32;

    for i in 0..config.games {
        let mut game = Game::new(config.seed.wrapping_add(u64::from(i)));
        let mut moves = 0u32;

        while !game.is_over() && moves < config.max_moves {
            match game.step_with_agent(agent) {
                Ok(outcome) => {
                    if outcome.moved {
                        moves += 1;
                    }
                    if outcome.game_over {
                        break;
                    }
                }
                Err(AgentError::NoLegalMove) => break,
                Err(err) => return Err(err),
            }
        }

        let max_tile = game.max_tile();
        if max_tile >= config.win_tile {
            wins += 1;
        }
        scores.push(game.score());
        max_tiles.push(max_tile);
        move_counts.push(moves);
    }

    Ok(summarize(agent.name(), &scores, &max_tiles, &move_counts, wins))
}

fn summarize(
    agent: &str,
    scores: &[u32],
    max_tiles: &[u32],
    move_counts: &[u32],
    wins: u32,
) -> SimulationReport {
    let games = scores.len() as u32;
    if games == 0 {
        return SimulationReport {
            agent: agent.to_string(),
            ..SimulationReport::default()
        };
    }

    let n = f64::from(games);
    let mean_score = scores.iter().map(|&s| f64::from(s)).sum::<f64>() / n;
    let score_variance = scores
        .iter()
        .map(|&s| {
            let d = f64::from(s) - mean_score;
            d * d
        })
        .sum::<f64>()
        / n;

    SimulationReport {
        agent: agent.to_string(),
        games,
        mean_score,
        max_score: scores.iter().copied().max().unwrap_or(0),
        min_score: scores.iter().copied().min().unwrap_or(0),
        score_variance,
        mean_max_tile: max_tiles.iter().map(|&t| f64::from(t)).sum::<f64>() / n,
        best_tile: max_tiles.iter().copied().max().unwrap_or(0),
        win_rate: f64::from(wins) / n,
        mean_moves: move_counts.iter().map(|&m| f64::from(m)).sum::<f64>() / n,
    }
}
