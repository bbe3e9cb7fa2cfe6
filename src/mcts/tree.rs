//! Arena-based MCTS tree.
//!
//! Nodes are stored in a flat `Vec` and referenced by `NodeId` indices.
//! The tree is rebuilt from scratch on every decision; nothing persists
//! across turns.

use super::node::{NodeId, SearchNode};

/// Arena holding one search's nodes.
#[derive(Clone, Debug)]
pub struct SearchTree {
    nodes: Vec<SearchNode>,
}

impl SearchTree {
    /// Create a tree seeded with a root node.
    #[must_use]
    pub fn new(root: SearchNode) -> Self {
        let mut nodes = Vec::with_capacity(1024);
        nodes.push(root);
        Self { nodes }
    }

    /// The root node ID (always index 0).
    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Get a node by ID.
    #[inline]
    #[must_use]
    pub fn get(&self, id: NodeId) -> &SearchNode {
        &self.nodes[id.0 as usize]
    }

    /// Get a mutable node by ID.
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut SearchNode {
        &mut self.nodes[id.0 as usize]
    }

    /// Allocate a node, register it with its parent, and return its ID.
    pub fn alloc_child(&mut self, node: SearchNode) -> NodeId {
        let parent = node.parent;
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        if !parent.is_none() {
            self.get_mut(parent).children.push(id);
        }
        id
    }

    /// Number of nodes in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Walk parent links from `from` to the root inclusive, incrementing
    /// visits and adding `reward` to each node's value accumulator.
    ///
    /// This is the only code path that mutates visit counters or value
    /// accumulators.
    pub fn backpropagate(&mut self, from: NodeId, reward: f64) {
        let mut current = from;
        while !current.is_none() {
            let node = self.get_mut(current);
            node.visits += 1;
            node.value += reward;
            current = node.parent;
        }
    }
}
