//! Core MCTS search algorithm.
//!
//! Four phases per iteration. Selection: from the root, descend through
//! fully expanded decision nodes via UCT; chance nodes are always sampled
//! rather than exploited. Expansion: pop one untried move at a decision
//! node, or sample one (cell, value) spawn at a chance node. Simulation:
//! a greedy heuristic rollout (lower variance than uniform-random play)
//! capped at a fixed depth, rewarded with the max tile reached plus a
//! small heuristic tie-break. Backpropagation: walk parent links to the
//! root, incrementing visits and accumulating the reward.
//!
//! The final decision is the root child with the most visits, the robust
//! criterion: visit counts are less sensitive to reward variance than
//! average value.

use std::time::Instant;

use smallvec::SmallVec;

use crate::agent::Agent;
use crate::core::{AgentError, GameRng, Grid, Move, Snapshot, SPAWN_TWO_PROBABILITY};
use crate::heuristic::{evaluate, EvalWeights};

use super::config::MctsConfig;
use super::node::{NodeId, NodeKind, SearchNode};
use super::stats::SearchStats;
use super::tree::SearchTree;

/// One-ply greedy rollout policy: the move whose successor scores highest
/// under the evaluator, or `None` on a terminal grid.
#[must_use]
pub fn greedy_rollout_move(grid: &Grid, weights: &EvalWeights) -> Option<Move> {
    let mut best: Option<(f64, Move)> = None;
    for mv in Move::ALL {
        let t = grid.apply(mv);
        if !t.changed {
            continue;
        }
        let value = evaluate(&t.grid, weights);
        if best.map_or(true, |(b, _)| value > b) {
            best = Some((value, mv));
        }
    }
    best.map(|(_, mv)| mv)
}

/// MCTS search context. The tree is rebuilt from scratch on every call;
/// only the RNG stream and statistics persist between decisions.
pub struct MctsSearch {
    config: MctsConfig,
    rng: GameRng,
    tree: SearchTree,
    stats: SearchStats,
}

impl MctsSearch {
    /// Create a search context from a validated configuration.
    pub fn new(config: MctsConfig) -> Result<Self, AgentError> {
        if config.iterations == 0 {
            return Err(AgentError::InvalidConfig(
                "MCTS iteration budget must be at least 1".into(),
            ));
        }
        let rng = GameRng::new(config.seed);
        Ok(Self {
            config,
            rng,
            tree: SearchTree::new(SearchNode::decision(
                Grid::EMPTY,
                NodeId::NONE,
                SmallVec::new(),
            )),
            stats: SearchStats::default(),
        })
    }

    /// Run the full iteration budget and return the most-visited root move.
    pub fn search(&mut self, grid: Grid) -> Result<Move, AgentError> {
        let start = Instant::now();
        self.stats.reset();

        let mut untried: SmallVec<[Move; 4]> = grid.legal_moves();
        if untried.is_empty() {
            return Err(AgentError::NoLegalMove);
        }
        self.rng.shuffle(&mut untried);

        let mut tree = SearchTree::new(SearchNode::decision(grid, NodeId::NONE, untried));

        for _ in 0..self.config.iterations {
            let leaf = self.select_and_expand(&mut tree);
            let reward = self.rollout(tree.get(leaf).grid);
            tree.backpropagate(leaf, reward);
            self.stats.iterations += 1;
        }

        self.stats.time_us = start.elapsed().as_micros() as u64;
        self.tree = tree;

        let tree = &self.tree;
        let root = tree.root();
        let best = tree
            .get(root)
            .children
            .iter()
            .copied()
            .max_by_key(|&id| tree.get(id).visits)
            .ok_or_else(|| {
                AgentError::InvalidConfig(
                    "MCTS expanded no root children; raise the iteration budget".into(),
                )
            })?;

        tree.get(best).mv.ok_or_else(|| {
            AgentError::InvalidConfig("root child is missing its originating move".into())
        })
    }

    /// Statistics for the most recent search.
    #[must_use]
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// The tree built by the most recent search.
    #[must_use]
    pub fn tree(&self) -> &SearchTree {
        &self.tree
    }

    /// Descend until a node is expanded (or a terminal node is reached),
    /// returning the node to roll out from.
    fn select_and_expand(&mut self, tree: &mut SearchTree) -> NodeId {
        let mut current = tree.root();
        loop {
            if tree.get(current).grid.is_terminal() {
                return current;
            }
            match &tree.get(current).kind {
                NodeKind::Decision { untried } if !untried.is_empty() => {
                    return self.expand_decision(tree, current);
                }
                NodeKind::Chance => {
                    // Chance nodes are sampled on every visit.
                    return match self.expand_chance(tree, current) {
                        Some(child) => child,
                        None => current,
                    };
                }
                NodeKind::Decision { .. } => {
                    current = self.select_uct(tree, current);
                }
            }
        }
    }

    /// Materialize one untried move as a chance child.
    fn expand_decision(&mut self, tree: &mut SearchTree, id: NodeId) -> NodeId {
        let mv = match &mut tree.get_mut(id).kind {
            NodeKind::Decision { untried } => untried.pop(),
            NodeKind::Chance => None,
        };
        let Some(mv) = mv else {
            return id;
        };

        let successor = tree.get(id).grid.apply(mv).grid;
        self.stats.nodes_expanded += 1;
        tree.alloc_child(SearchNode::chance(successor, id, mv))
    }

    /// Sample one random spawn as a decision child.
    fn expand_chance(&mut self, tree: &mut SearchTree, id: NodeId) -> Option<NodeId> {
        let empties = tree.get(id).grid.empty_cells();
        let &(r, c) = self.rng.choose(&empties)?;
        let value = if self.rng.gen_bool(SPAWN_TWO_PROBABILITY) {
            2
        } else {
            4
        };
        let spawned = tree.get(id).grid.with_tile(r as usize, c as usize, value);

        let mut untried: SmallVec<[Move; 4]> = spawned.legal_moves();
        self.rng.shuffle(&mut untried);

        self.stats.nodes_expanded += 1;
        Some(tree.alloc_child(SearchNode::decision(spawned, id, untried)))
    }

    /// Child with the highest UCT score; unvisited children first.
    fn select_uct(&self, tree: &SearchTree, id: NodeId) -> NodeId {
        let node = tree.get(id);
        let ln_parent = f64::from(node.visits.max(1)).ln();
        let c = self.config.exploration_constant;

        let mut best = node.children[0];
        let mut best_score = f64::NEG_INFINITY;
        for &child_id in &node.children {
            let child = tree.get(child_id);
            let score = if child.visits == 0 {
                f64::INFINITY
            } else {
                child.mean_value() + c * (ln_parent / f64::from(child.visits)).sqrt()
            };
            if score > best_score {
                best_score = score;
                best = child_id;
            }
        }
        best
    }

    /// Greedy-policy playout capped at the configured depth. Reward is the
    /// max tile reached plus a scaled heuristic tie-break.
    fn rollout(&mut self, mut grid: Grid) -> f64 {
        let mut max_tile = grid.max_tile();

        for _ in 0..self.config.rollout_depth {
            if grid.is_terminal() {
                break;
            }
            let Some(mv) = greedy_rollout_move(&grid, &self.config.weights) else {
                break;
            };
            grid = grid.apply(mv).grid;

            let empties = grid.empty_cells();
            if let Some(&(r, c)) = self.rng.choose(&empties) {
                let value = if self.rng.gen_bool(SPAWN_TWO_PROBABILITY) {
                    2
                } else {
                    4
                };
                grid = grid.with_tile(r as usize, c as usize, value);
            }
            max_tile = max_tile.max(grid.max_tile());
        }

        self.stats.rollouts += 1;
        f64::from(max_tile)
            + evaluate(&grid, &self.config.weights) * self.config.heuristic_tie_break
    }
}

/// Agent wrapper around `MctsSearch`.
pub struct MctsAgent {
    search: MctsSearch,
}

impl MctsAgent {
    /// Create an MCTS agent, validating the configuration.
    pub fn new(config: MctsConfig) -> Result<Self, AgentError> {
        Ok(Self {
            search: MctsSearch::new(config)?,
        })
    }

    /// Statistics for the most recent decision.
    #[must_use]
    pub fn stats(&self) -> &SearchStats {
        self.search.stats()
    }

    /// The tree built by the most recent decision.
    #[must_use]
    pub fn tree(&self) -> &SearchTree {
        self.search.tree()
    }
}

impl Agent for MctsAgent {
    fn name(&self) -> &'static str {
        "mcts"
    }

    fn get_move(&mut self, snapshot: &Snapshot) -> Result<Move, AgentError> {
        self.search.search(snapshot.grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Grid;

    fn open_grid() -> Grid {
        Grid::from_rows([[2, 2, 4, 0], [0, 8, 0, 0], [0, 0, 16, 0], [2, 0, 0, 2]])
    }

    #[test]
    fn test_zero_iterations_rejected() {
        let err = MctsSearch::new(MctsConfig::default().with_iterations(0));
        assert!(matches!(err, Err(AgentError::InvalidConfig(_))));
    }

    #[test]
    fn test_search_returns_legal_move() {
        let mut search = MctsSearch::new(MctsConfig::default().with_iterations(100)).unwrap();
        let grid = open_grid();
        let mv = search.search(grid).unwrap();
        assert!(grid.is_legal(mv));
    }

    #[test]
    fn test_terminal_grid_errors() {
        let mut search = MctsSearch::new(MctsConfig::default().with_iterations(10)).unwrap();
        let dead = Grid::from_rows([
            [2, 4, 2, 4],
            [4, 2, 4, 2],
            [2, 4, 2, 4],
            [4, 2, 4, 2],
        ]);
        assert_eq!(search.search(dead), Err(AgentError::NoLegalMove));
    }

    #[test]
    fn test_stats_track_iterations() {
        let mut search = MctsSearch::new(MctsConfig::default().with_iterations(50)).unwrap();
        search.search(open_grid()).unwrap();
        assert_eq!(search.stats().iterations, 50);
        assert!(search.stats().rollouts > 0);
        assert!(search.stats().nodes_expanded > 0);
    }

    #[test]
    fn test_root_visit_conservation() {
        // Every iteration backpropagates through the root exactly once.
        let mut search = MctsSearch::new(MctsConfig::default().with_iterations(137)).unwrap();
        search.search(open_grid()).unwrap();
        let tree = search.tree();
        assert_eq!(tree.get(tree.root()).visits, 137);
    }

    #[test]
    fn test_deterministic_with_seed() {
        let grid = open_grid();
        let mut a =
            MctsSearch::new(MctsConfig::default().with_iterations(200).with_seed(7)).unwrap();
        let mut b =
            MctsSearch::new(MctsConfig::default().with_iterations(200).with_seed(7)).unwrap();
        assert_eq!(a.search(grid).unwrap(), b.search(grid).unwrap());
    }

    #[test]
    fn test_greedy_rollout_move_prefers_better_successor() {
        let weights = EvalWeights::default();
        let grid = open_grid();
        let mv = greedy_rollout_move(&grid, &weights).unwrap();
        assert!(grid.is_legal(mv));

        let dead = Grid::from_rows([
            [2, 4, 2, 4],
            [4, 2, 4, 2],
            [2, 4, 2, 4],
            [4, 2, 4, 2],
        ]);
        assert!(greedy_rollout_move(&dead, &weights).is_none());
    }
}
