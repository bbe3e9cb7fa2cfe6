//! Agent capability and the static agent registry.
//!
//! Every decision maker implements `Agent`: given a snapshot of the
//! session it returns a move that is legal against the snapshot grid, or
//! `AgentError::NoLegalMove` when the grid is terminal. Variants are a
//! closed set of tags (`AgentKind`) resolved at startup; there is no
//! runtime discovery.

pub mod cycle;
pub mod greedy;
pub mod random;

pub use cycle::CycleAgent;
pub use greedy::GreedyAgent;
pub use random::RandomAgent;

use serde::{Deserialize, Serialize};

use crate::core::{AgentError, Move, Snapshot};
use crate::expectimax::{ExpectimaxAgent, ExpectimaxConfig};
use crate::mcts::{MctsAgent, MctsConfig};
use crate::search::{AStarAgent, AStarConfig, IdaStarAgent, IdaStarConfig};
use crate::td::{TdAgent, TdConfig};

/// A decision maker over game snapshots.
pub trait Agent {
    /// Short stable identifier for reports.
    fn name(&self) -> &'static str;

    /// Choose a move that is legal against `snapshot.grid`.
    ///
    /// Must fail with `AgentError::NoLegalMove` when the grid is terminal,
    /// never return a fabricated or illegal move.
    fn get_move(&mut self, snapshot: &Snapshot) -> Result<Move, AgentError>;
}

/// The closed set of agent variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentKind {
    Random,
    Cycle,
    Greedy,
    Expectimax,
    AlphaBetaExpectimax,
    Mcts,
    AStar,
    IdaStar,
    TdLearning,
}

impl AgentKind {
    /// Every variant, in registry order.
    pub const ALL: [AgentKind; 9] = [
        AgentKind::Random,
        AgentKind::Cycle,
        AgentKind::Greedy,
        AgentKind::Expectimax,
        AgentKind::AlphaBetaExpectimax,
        AgentKind::Mcts,
        AgentKind::AStar,
        AgentKind::IdaStar,
        AgentKind::TdLearning,
    ];

    /// Stable tag used by callers to select a variant.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            AgentKind::Random => "random",
            AgentKind::Cycle => "cycle",
            AgentKind::Greedy => "greedy",
            AgentKind::Expectimax => "expectimax",
            AgentKind::AlphaBetaExpectimax => "alpha_beta_expectimax",
            AgentKind::Mcts => "mcts",
            AgentKind::AStar => "a_star",
            AgentKind::IdaStar => "ida_star",
            AgentKind::TdLearning => "td_learning",
        }
    }

    /// Human-readable name for reports.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            AgentKind::Random => "Random Agent",
            AgentKind::Cycle => "Cycle Agent",
            AgentKind::Greedy => "Greedy Agent",
            AgentKind::Expectimax => "Expectimax Agent",
            AgentKind::AlphaBetaExpectimax => "Alpha-Beta Expectimax Agent",
            AgentKind::Mcts => "MCTS Agent",
            AgentKind::AStar => "A* Agent",
            AgentKind::IdaStar => "IDA* Agent",
            AgentKind::TdLearning => "TD Learning Agent",
        }
    }

    /// Resolve a tag to a variant.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }

    /// Construct the variant with its default configuration.
    pub fn build(self, seed: u64) -> Result<Box<dyn Agent>, AgentError> {
        Ok(match self {
            AgentKind::Random => Box::new(RandomAgent::new(seed)),
            AgentKind::Cycle => Box::new(CycleAgent::new()),
            AgentKind::Greedy => Box::new(GreedyAgent::default()),
            AgentKind::Expectimax => {
                Box::new(ExpectimaxAgent::new(ExpectimaxConfig::default())?)
            }
            AgentKind::AlphaBetaExpectimax => Box::new(ExpectimaxAgent::new(
                ExpectimaxConfig::default().with_alpha_beta(true),
            )?),
            AgentKind::Mcts => Box::new(MctsAgent::new(MctsConfig::default().with_seed(seed))?),
            AgentKind::AStar => Box::new(AStarAgent::new(
                AStarConfig::default().with_seed(seed),
            )?),
            AgentKind::IdaStar => Box::new(IdaStarAgent::new(
                IdaStarConfig::default().with_seed(seed),
            )?),
            AgentKind::TdLearning => Box::new(TdAgent::new(TdConfig::default().with_seed(seed))),
        })
    }
}
