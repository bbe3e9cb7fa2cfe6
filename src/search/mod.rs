//! Best-first and iterative-deepening lookahead agents.
//!
//! Both order states by `f = g + h` with move depth as the path cost and
//! the negated evaluator as the estimate-to-go. A* keeps an explicit
//! frontier and a closed map; IDA* re-descends under a rising f-cost
//! threshold with path-local cycle detection.

pub mod astar;
pub mod idastar;

pub use astar::{AStarAgent, AStarConfig};
pub use idastar::{IdaStarAgent, IdaStarConfig};
