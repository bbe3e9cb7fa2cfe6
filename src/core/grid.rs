//! The 4x4 board and its deterministic transition engine.
//!
//! `Grid` is an immutable value type: every move produces a new grid, so
//! search components can fan out over successors without defensive copies.
//! Cells hold raw tile values (0 = empty, otherwise a power of two >= 2)
//! in a fixed 16-slot buffer, which keeps a grid `Copy` and hashable.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Board side length. The engine is specialised to the standard 4x4 game.
pub const SIZE: usize = 4;

/// Cell count of a grid.
pub const CELLS: usize = SIZE * SIZE;

/// A move direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    /// All moves in the fixed enumeration order used for tie-breaking.
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];

    /// Stable lowercase tag, matching the wire names used by callers.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Move::Up => "up",
            Move::Down => "down",
            Move::Left => "left",
            Move::Right => "right",
        }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// Result of applying a move to a grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    /// The successor grid.
    pub grid: Grid,
    /// Sum of merged-tile values produced by the move.
    pub score_delta: u32,
    /// True iff the successor differs structurally from the input.
    pub changed: bool,
}

/// A 4x4 board of tile values.
///
/// Structural equality; row-major cell order.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Grid {
    cells: [u32; CELLS],
}

impl Grid {
    /// The empty board.
    pub const EMPTY: Grid = Grid { cells: [0; CELLS] };

    /// Build a grid from row-major cell values.
    #[must_use]
    pub const fn from_cells(cells: [u32; CELLS]) -> Self {
        Self { cells }
    }

    /// Build a grid from four rows.
    #[must_use]
    pub fn from_rows(rows: [[u32; SIZE]; SIZE]) -> Self {
        let mut cells = [0u32; CELLS];
        for (r, row) in rows.iter().enumerate() {
            cells[r * SIZE..(r + 1) * SIZE].copy_from_slice(row);
        }
        Self { cells }
    }

    /// Tile value at (row, col).
    #[inline]
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> u32 {
        self.cells[row * SIZE + col]
    }

    /// Raw row-major cell values.
    #[inline]
    #[must_use]
    pub fn cells(&self) -> &[u32; CELLS] {
        &self.cells
    }

    /// A copy of this grid with one cell replaced.
    #[must_use]
    pub fn with_tile(&self, row: usize, col: usize, value: u32) -> Self {
        let mut cells = self.cells;
        cells[row * SIZE + col] = value;
        Self { cells }
    }

    /// Coordinates of every empty cell, row-major.
    #[must_use]
    pub fn empty_cells(&self) -> SmallVec<[(u8, u8); CELLS]> {
        let mut out = SmallVec::new();
        for r in 0..SIZE {
            for c in 0..SIZE {
                if self.get(r, c) == 0 {
                    out.push((r as u8, c as u8));
                }
            }
        }
        out
    }

    /// Number of empty cells.
    #[must_use]
    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|&&v| v == 0).count()
    }

    /// Largest tile value on the board (0 for the empty board).
    #[must_use]
    pub fn max_tile(&self) -> u32 {
        self.cells.iter().copied().max().unwrap_or(0)
    }

    /// True iff no move can change this grid: every cell is occupied and
    /// no orthogonally adjacent pair of tiles is equal.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        for r in 0..SIZE {
            for c in 0..SIZE {
                let v = self.get(r, c);
                if v == 0 {
                    return false;
                }
                if c + 1 < SIZE && self.get(r, c + 1) == v {
                    return false;
                }
                if r + 1 < SIZE && self.get(r + 1, c) == v {
                    return false;
                }
            }
        }
        true
    }

    /// Apply one move, returning the successor, the score delta, and
    /// whether anything changed. Pure: the receiver is untouched.
    #[must_use]
    pub fn apply(&self, mv: Move) -> Transition {
        let (grid, score_delta) = match mv {
            Move::Left => self.shift_left(),
            Move::Right => {
                let (g, s) = self.mirrored().shift_left();
                (g.mirrored(), s)
            }
            Move::Up => {
                let (g, s) = self.transposed().shift_left();
                (g.transposed(), s)
            }
            Move::Down => {
                let (g, s) = self.transposed().mirrored().shift_left();
                (g.mirrored().transposed(), s)
            }
        };
        Transition {
            grid,
            score_delta,
            changed: grid != *self,
        }
    }

    /// Moves that would change this grid, in fixed enumeration order.
    ///
    /// A legal-but-no-op direction does not count as a legal move.
    #[must_use]
    pub fn legal_moves(&self) -> SmallVec<[Move; 4]> {
        Move::ALL
            .iter()
            .copied()
            .filter(|&mv| self.apply(mv).changed)
            .collect()
    }

    /// True iff `mv` would change this grid.
    #[must_use]
    pub fn is_legal(&self, mv: Move) -> bool {
        self.apply(mv).changed
    }

    /// Rotate 90 degrees clockwise. Used by the evaluator to score
    /// monotonicity over all four orientations.
    #[must_use]
    pub fn rotated_cw(&self) -> Self {
        let mut cells = [0u32; CELLS];
        for r in 0..SIZE {
            for c in 0..SIZE {
                cells[c * SIZE + (SIZE - 1 - r)] = self.get(r, c);
            }
        }
        Self { cells }
    }

    fn transposed(&self) -> Self {
        let mut cells = [0u32; CELLS];
        for r in 0..SIZE {
            for c in 0..SIZE {
                cells[c * SIZE + r] = self.get(r, c);
            }
        }
        Self { cells }
    }

    fn mirrored(&self) -> Self {
        let mut cells = self.cells;
        for r in 0..SIZE {
            cells[r * SIZE..(r + 1) * SIZE].reverse();
        }
        Self { cells }
    }

    /// Compact and merge every row towards column 0.
    fn shift_left(&self) -> (Self, u32) {
        let mut cells = [0u32; CELLS];
        let mut score = 0;
        for r in 0..SIZE {
            let base = r * SIZE;
            let row = [
                self.cells[base],
                self.cells[base + 1],
                self.cells[base + 2],
                self.cells[base + 3],
            ];
            let (merged, gained) = merge_row_left(row);
            cells[r * SIZE..(r + 1) * SIZE].copy_from_slice(&merged);
            score += gained;
        }
        (Self { cells }, score)
    }
}

/// Slide a row left and merge at most one adjacent equal pair per tile.
///
/// A tile produced by a merge is skipped for the following comparison, so
/// `[2, 2, 2, 2]` becomes `[4, 4, 0, 0]` in one move, never `[8, 0, 0, 0]`.
fn merge_row_left(row: [u32; SIZE]) -> ([u32; SIZE], u32) {
    let mut compact = [0u32; SIZE];
    let mut len = 0;
    for v in row {
        if v != 0 {
            compact[len] = v;
            len += 1;
        }
    }

    let mut out = [0u32; SIZE];
    let mut score = 0;
    let mut write = 0;
    let mut i = 0;
    while i < len {
        if i + 1 < len && compact[i] == compact[i + 1] {
            let merged = compact[i] * 2;
            out[write] = merged;
            score += merged;
            i += 2;
        } else {
            out[write] = compact[i];
            i += 1;
        }
        write += 1;
    }
    (out, score)
}

impl std::fmt::Debug for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Grid [")?;
        for r in 0..SIZE {
            writeln!(
                f,
                "  {:>5} {:>5} {:>5} {:>5}",
                self.get(r, 0),
                self.get(r, 1),
                self.get(r, 2),
                self.get(r, 3)
            )?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_row_single_pair() {
        let (row, score) = merge_row_left([2, 2, 0, 0]);
        assert_eq!(row, [4, 0, 0, 0]);
        assert_eq!(score, 4);
    }

    #[test]
    fn test_merge_row_four_equal_merges_in_pairs() {
        // Single merge per pair, never a chained triple merge.
        let (row, score) = merge_row_left([2, 2, 2, 2]);
        assert_eq!(row, [4, 4, 0, 0]);
        assert_eq!(score, 8);
    }

    #[test]
    fn test_merge_row_two_distinct_pairs() {
        let (row, score) = merge_row_left([2, 2, 4, 4]);
        assert_eq!(row, [4, 8, 0, 0]);
        assert_eq!(score, 12);
    }

    #[test]
    fn test_merge_row_no_chain_after_merge() {
        // The 4 produced from 2+2 must not immediately merge with the
        // existing 4.
        let (row, score) = merge_row_left([2, 2, 4, 0]);
        assert_eq!(row, [4, 4, 0, 0]);
        assert_eq!(score, 4);
    }

    #[test]
    fn test_merge_row_empty() {
        let (row, score) = merge_row_left([0, 0, 0, 0]);
        assert_eq!(row, [0, 0, 0, 0]);
        assert_eq!(score, 0);
    }

    #[test]
    fn test_merge_row_gap_closes() {
        let (row, score) = merge_row_left([2, 0, 0, 2]);
        assert_eq!(row, [4, 0, 0, 0]);
        assert_eq!(score, 4);
    }

    #[test]
    fn test_apply_right_mirrors_left() {
        let g = Grid::from_rows([[2, 2, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]]);
        let t = g.apply(Move::Right);
        assert_eq!(
            t.grid,
            Grid::from_rows([[0, 0, 0, 4], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]])
        );
        assert_eq!(t.score_delta, 4);
        assert!(t.changed);
    }

    #[test]
    fn test_apply_up_and_down() {
        let g = Grid::from_rows([[2, 0, 0, 0], [2, 0, 0, 0], [4, 0, 0, 0], [0, 0, 0, 0]]);
        let up = g.apply(Move::Up);
        assert_eq!(
            up.grid,
            Grid::from_rows([[4, 0, 0, 0], [4, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]])
        );
        assert_eq!(up.score_delta, 4);

        let down = g.apply(Move::Down);
        assert_eq!(
            down.grid,
            Grid::from_rows([[0, 0, 0, 0], [0, 0, 0, 0], [4, 0, 0, 0], [4, 0, 0, 0]])
        );
        assert_eq!(down.score_delta, 4);
    }

    #[test]
    fn test_apply_noop_reports_unchanged() {
        let g = Grid::from_rows([[2, 4, 8, 16], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]]);
        let t = g.apply(Move::Left);
        assert_eq!(t.grid, g);
        assert_eq!(t.score_delta, 0);
        assert!(!t.changed);
    }

    #[test]
    fn test_left_idempotent_once_compacted() {
        let g = Grid::from_rows([[2, 2, 4, 4], [0, 2, 0, 2], [8, 0, 8, 0], [2, 4, 2, 4]]);
        let once = g.apply(Move::Left).grid;
        let twice = once.apply(Move::Left).grid;
        assert_eq!(once, twice);
    }

    #[test]
    fn test_terminal_classification() {
        // Full board, no equal neighbours anywhere.
        let dead = Grid::from_rows([
            [2, 4, 2, 4],
            [4, 2, 4, 2],
            [2, 4, 2, 4],
            [4, 2, 4, 2],
        ]);
        assert!(dead.is_terminal());
        assert!(dead.legal_moves().is_empty());

        // Full board but a merge is available.
        let alive = dead.with_tile(0, 0, 4);
        assert!(!alive.is_terminal());
        assert!(!alive.legal_moves().is_empty());

        // Any empty cell means not terminal.
        assert!(!Grid::EMPTY.is_terminal());
    }

    #[test]
    fn test_legal_moves_order_and_filter() {
        let g = Grid::from_rows([[2, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]]);
        // A tile in the top-left corner: Up and Left are no-ops.
        assert_eq!(g.legal_moves().as_slice(), &[Move::Down, Move::Right]);
    }

    #[test]
    fn test_empty_cells() {
        let g = Grid::EMPTY.with_tile(1, 2, 2);
        let empties = g.empty_cells();
        assert_eq!(empties.len(), 15);
        assert!(!empties.contains(&(1, 2)));
        assert_eq!(g.empty_count(), 15);
    }

    #[test]
    fn test_rotated_cw() {
        let g = Grid::from_rows([[2, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 4]]);
        let r = g.rotated_cw();
        assert_eq!(r.get(0, 3), 2);
        assert_eq!(r.get(3, 0), 4);
        // Four rotations restore the original.
        let full = g.rotated_cw().rotated_cw().rotated_cw().rotated_cw();
        assert_eq!(full, g);
    }

    #[test]
    fn test_max_tile() {
        assert_eq!(Grid::EMPTY.max_tile(), 0);
        let g = Grid::EMPTY.with_tile(2, 2, 64).with_tile(0, 0, 8);
        assert_eq!(g.max_tile(), 64);
    }
}
