//! Fixed-rotation baseline.

use crate::core::{AgentError, Move, Snapshot};

use super::Agent;

/// Cycles up, right, down, left, skipping directions that would not change
/// the board. The cursor is per-instance state; two cycle agents never
/// share position.
pub struct CycleAgent {
    order: [Move; 4],
    cursor: usize,
}

impl CycleAgent {
    /// Create a cycle agent starting at "up".
    #[must_use]
    pub fn new() -> Self {
        Self {
            order: [Move::Up, Move::Right, Move::Down, Move::Left],
            cursor: 0,
        }
    }
}

impl Default for CycleAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for CycleAgent {
    fn name(&self) -> &'static str {
        "cycle"
    }

    fn get_move(&mut self, snapshot: &Snapshot) -> Result<Move, AgentError> {
        // At most one full rotation; if nothing in the cycle is legal the
        // grid is terminal.
        for _ in 0..self.order.len() {
            let mv = self.order[self.cursor];
            self.cursor = (self.cursor + 1) % self.order.len();
            if snapshot.grid.is_legal(mv) {
                return Ok(mv);
            }
        }
        Err(AgentError::NoLegalMove)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Grid;

    #[test]
    fn test_cycles_through_directions() {
        let mut agent = CycleAgent::new();
        // Centre tile: every direction is legal.
        let snapshot = Snapshot {
            grid: Grid::EMPTY.with_tile(1, 1, 2),
            score: 0,
        };
        assert_eq!(agent.get_move(&snapshot).unwrap(), Move::Up);
        assert_eq!(agent.get_move(&snapshot).unwrap(), Move::Right);
        assert_eq!(agent.get_move(&snapshot).unwrap(), Move::Down);
        assert_eq!(agent.get_move(&snapshot).unwrap(), Move::Left);
        assert_eq!(agent.get_move(&snapshot).unwrap(), Move::Up);
    }

    #[test]
    fn test_skips_illegal_directions() {
        let mut agent = CycleAgent::new();
        // Top-left corner tile: Up and Left are no-ops.
        let snapshot = Snapshot {
            grid: Grid::EMPTY.with_tile(0, 0, 2),
            score: 0,
        };
        let mv = agent.get_move(&snapshot).unwrap();
        assert!(snapshot.grid.is_legal(mv));
    }

    #[test]
    fn test_instances_do_not_share_state() {
        let mut a = CycleAgent::new();
        let mut b = CycleAgent::new();
        let snapshot = Snapshot {
            grid: Grid::EMPTY.with_tile(1, 1, 2),
            score: 0,
        };
        let _ = a.get_move(&snapshot).unwrap();
        let _ = a.get_move(&snapshot).unwrap();
        // b still starts from the beginning of its own rotation.
        assert_eq!(b.get_move(&snapshot).unwrap(), Move::Up);
    }

    #[test]
    fn test_terminal_grid_errors() {
        let mut agent = CycleAgent::new();
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
}
