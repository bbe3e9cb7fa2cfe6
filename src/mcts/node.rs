//! MCTS node structures.
//!
//! Nodes live in an arena and reference each other by index (`NodeId`),
//! which gives O(1) parent walks for backpropagation without ownership
//! cycles. Decision nodes and chance nodes alternate by construction: a
//! decision node's children are the chance nodes reached by its moves,
//! and a chance node's children are the decision nodes reached by tile
//! spawns.

use smallvec::SmallVec;

use crate::core::{Grid, Move};

/// Index into the search tree's node arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Sentinel value representing no node.
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check if this is the NONE sentinel.
    #[inline]
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    /// Get the raw index value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// What a node represents in the alternating decision/chance structure.
#[derive(Clone, Debug)]
pub enum NodeKind {
    /// The agent chooses among legal moves. `untried` holds the moves not
    /// yet expanded, pre-shuffled so expansion order is unbiased.
    Decision { untried: SmallVec<[Move; 4]> },

    /// Nature spawns a tile. Chance nodes are never "fully expanded":
    /// every visit may sample a fresh (cell, value) outcome.
    Chance,
}

/// A node in the MCTS tree.
#[derive(Clone, Debug)]
pub struct SearchNode {
    /// The grid snapshot this node owns. No aliasing between nodes.
    pub grid: Grid,

    /// Parent node (NONE for the root); used only for backpropagation.
    pub parent: NodeId,

    /// The player move that produced this node from its parent. Set on
    /// chance nodes; `None` on the root and on spawn-produced decision
    /// nodes.
    pub mv: Option<Move>,

    /// Decision or chance role.
    pub kind: NodeKind,

    /// Visit counter, only incremented by backpropagation.
    pub visits: u32,

    /// Accumulated reward, only increased by backpropagation.
    pub value: f64,

    /// Exclusively owned children, by arena index.
    pub children: SmallVec<[NodeId; 8]>,
}

impl SearchNode {
    /// Create a decision node with a pre-shuffled untried-move list.
    #[must_use]
    pub fn decision(grid: Grid, parent: NodeId, untried: SmallVec<[Move; 4]>) -> Self {
        Self {
            grid,
            parent,
            mv: None,
            kind: NodeKind::Decision { untried },
            visits: 0,
            value: 0.0,
            children: SmallVec::new(),
        }
    }

    /// Create a chance node reached by playing `mv`.
    #[must_use]
    pub fn chance(grid: Grid, parent: NodeId, mv: Move) -> Self {
        Self {
            grid,
            parent,
            mv: Some(mv),
            kind: NodeKind::Chance,
            visits: 0,
            value: 0.0,
            children: SmallVec::new(),
        }
    }

    /// True for decision nodes whose untried-move list is exhausted.
    /// Chance nodes always report false: they are sampled, not exploited.
    #[must_use]
    pub fn is_fully_expanded(&self) -> bool {
        match &self.kind {
            NodeKind::Decision { untried } => untried.is_empty(),
            NodeKind::Chance => false,
        }
    }

    /// Mean reward over visits (0 when unvisited).
    #[must_use]
    pub fn mean_value(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.value / f64::from(self.visits)
        }
    }
}
