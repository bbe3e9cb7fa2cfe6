//! Error taxonomy for move selection.
//!
//! Only genuine failures are errors: a terminal grid handed to an agent,
//! or a configuration that cannot produce a decision. Depth cutoffs,
//! threshold pruning and cycle detection are ordinary control flow and
//! never surface here.

use thiserror::Error;

/// Errors an agent can report from `get_move`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AgentError {
    /// The grid admits no legal move. Callers are expected to check
    /// terminality before asking for a move; an agent never fabricates one.
    #[error("no legal move available")]
    NoLegalMove,

    /// The search cannot run as configured (zero depth, zero iterations,
    /// an MCTS budget that expanded no root children, ...).
    #[error("invalid search configuration: {0}")]
    InvalidConfig(String),
}
