//! Static board evaluation shared by every search agent.
//!
//! `evaluate` combines independently weighted terms, all pure functions of
//! the grid: an empty-cell bonus that decays geometrically as the board
//! fills, monotonicity taken as the best orientation over the four
//! rotations, a smoothness penalty on adjacent log2 gaps, a serpentine
//! positional gradient anchored at the top-left corner, and a bonus for
//! immediately mergeable pairs. Higher is better.
//!
//! The weight constants are tuning knobs, not load-bearing values; the
//! defaults are chosen to keep every term within a few orders of magnitude
//! of the others so no single term saturates the score.

use serde::{Deserialize, Serialize};

use crate::core::{Grid, SIZE};

/// Row-major cell indices along the serpentine path from the top-left
/// corner: left-to-right on row 0, right-to-left on row 1, and so on.
const SNAKE_PATH: [usize; 16] = [0, 1, 2, 3, 7, 6, 5, 4, 8, 9, 10, 11, 15, 14, 13, 12];

/// Weights for the evaluation terms.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct EvalWeights {
    /// Per-empty-cell bonus, applied before occupancy decay.
    pub empty: f64,

    /// Geometric decay base for the empty bonus as occupancy rises.
    /// Must stay in (0, 1] for numeric stability.
    pub empty_decay: f64,

    /// Weight on the monotonicity count (best over four rotations).
    pub monotonicity: f64,

    /// Weight on the smoothness penalty (the penalty itself is <= 0).
    pub smoothness: f64,

    /// Weight on the serpentine positional gradient.
    pub positional: f64,

    /// Exponential falloff per step along the serpentine path.
    pub snake_decay: f64,

    /// Weight on the merge-potential bonus.
    pub merge: f64,

    /// Weight on the running score in `evaluate_with_score`. Zero by
    /// default: the score input is available but not required.
    pub score: f64,
}

impl Default for EvalWeights {
    fn default() -> Self {
        Self {
            empty: 2.7,
            empty_decay: 0.95,
            monotonicity: 1.0,
            smoothness: 0.2,
            positional: 1.0,
            snake_decay: 0.5,
            merge: 0.05,
            score: 0.0,
        }
    }
}

impl EvalWeights {
    /// Override the empty-cell weight.
    #[must_use]
    pub fn with_empty(mut self, weight: f64) -> Self {
        self.empty = weight;
        self
    }

    /// Override the monotonicity weight.
    #[must_use]
    pub fn with_monotonicity(mut self, weight: f64) -> Self {
        self.monotonicity = weight;
        self
    }

    /// Override the smoothness weight.
    #[must_use]
    pub fn with_smoothness(mut self, weight: f64) -> Self {
        self.smoothness = weight;
        self
    }

    /// Override the positional-gradient weight.
    #[must_use]
    pub fn with_positional(mut self, weight: f64) -> Self {
        self.positional = weight;
        self
    }
}

/// Score a grid; higher is better. Pure, no side effects.
#[must_use]
pub fn evaluate(grid: &Grid, weights: &EvalWeights) -> f64 {
    weights.empty * empty_term(grid, weights.empty_decay)
        + weights.monotonicity * monotonicity_term(grid)
        + weights.smoothness * smoothness_term(grid)
        + weights.positional * snake_term(grid, weights.snake_decay)
        + weights.merge * merge_term(grid)
}

/// `evaluate` plus an optional contribution from the running score.
///
/// With the default weights this is identical to `evaluate`; agents that
/// track a cumulative score pass it here so the term can be tuned in.
#[must_use]
pub fn evaluate_with_score(grid: &Grid, score: u32, weights: &EvalWeights) -> f64 {
    evaluate(grid, weights) + weights.score * f64::from(score)
}

/// Empty-cell bonus, scaled down geometrically as occupancy rises so
/// board space is rewarded most while the game is still open.
fn empty_term(grid: &Grid, decay: f64) -> f64 {
    let empty = grid.empty_count();
    let occupied = (16 - empty) as i32;
    empty as f64 * decay.powi(occupied)
}

/// Count of non-increasing adjacent pairs along rows and columns, taken
/// as the best of the four 90-degree rotations. A fully monotone board
/// scores 24 (12 row pairs + 12 column pairs).
pub(crate) fn monotonicity_term(grid: &Grid) -> f64 {
    let mut oriented = *grid;
    let mut best = 0u32;
    for _ in 0..4 {
        best = best.max(non_increasing_pairs(&oriented));
        oriented = oriented.rotated_cw();
    }
    f64::from(best)
}

fn non_increasing_pairs(grid: &Grid) -> u32 {
    let mut count = 0;
    for r in 0..SIZE {
        for c in 0..SIZE - 1 {
            if grid.get(r, c) >= grid.get(r, c + 1) {
                count += 1;
            }
        }
    }
    for c in 0..SIZE {
        for r in 0..SIZE - 1 {
            if grid.get(r, c) >= grid.get(r + 1, c) {
                count += 1;
            }
        }
    }
    count
}

/// Negative sum of absolute log2 differences between orthogonally
/// adjacent occupied cells. Jagged boards score lower.
pub(crate) fn smoothness_term(grid: &Grid) -> f64 {
    let mut penalty = 0.0;
    for r in 0..SIZE {
        for c in 0..SIZE {
            let v = grid.get(r, c);
            if v == 0 {
                continue;
            }
            let lv = f64::from(v).log2();
            if c + 1 < SIZE {
                let right = grid.get(r, c + 1);
                if right != 0 {
                    penalty -= (lv - f64::from(right).log2()).abs();
                }
            }
            if r + 1 < SIZE {
                let below = grid.get(r + 1, c);
                if below != 0 {
                    penalty -= (lv - f64::from(below).log2()).abs();
                }
            }
        }
    }
    penalty
}

/// Raw cell values weighted by an exponentially decreasing gradient along
/// the serpentine path. Keeps the largest tile pinned in the corner and
/// rewards a monotone chain behind it.
fn snake_term(grid: &Grid, decay: f64) -> f64 {
    let cells = grid.cells();
    SNAKE_PATH
        .iter()
        .enumerate()
        .map(|(step, &idx)| f64::from(cells[idx]) * decay.powi(step as i32))
        .sum()
}

/// Sum of tile values over orthogonally adjacent equal pairs: merges the
/// next move could cash in.
fn merge_term(grid: &Grid) -> f64 {
    let mut bonus = 0.0;
    for r in 0..SIZE {
        for c in 0..SIZE {
            let v = grid.get(r, c);
            if v == 0 {
                continue;
            }
            if c + 1 < SIZE && grid.get(r, c + 1) == v {
                bonus += f64::from(v);
            }
            if r + 1 < SIZE && grid.get(r + 1, c) == v {
                bonus += f64::from(v);
            }
        }
    }
    bonus
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Grid;

    #[test]
    fn test_empty_board_beats_full_board() {
        let w = EvalWeights::default();
        let sparse = Grid::EMPTY.with_tile(0, 0, 2);
        let crowded = Grid::from_rows([
            [2, 4, 2, 4],
            [4, 2, 4, 2],
            [2, 4, 2, 4],
            [4, 2, 4, 2],
        ]);
        assert!(evaluate(&sparse, &w) > evaluate(&crowded, &w));
    }

    #[test]
    fn test_monotone_board_scores_best_orientation() {
        // Monotone decreasing left-to-right and top-to-bottom: every
        // adjacent pair counts, regardless of which rotation we hand in.
        let g = Grid::from_rows([
            [64, 32, 16, 8],
            [32, 16, 8, 4],
            [16, 8, 4, 2],
            [8, 4, 2, 0],
        ]);
        assert_eq!(monotonicity_term(&g), 24.0);
        assert_eq!(monotonicity_term(&g.rotated_cw()), 24.0);
    }

    #[test]
    fn test_smoothness_prefers_uniform_neighbours() {
        let uniform = Grid::from_rows([[4, 4, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]]);
        let jagged = Grid::from_rows([[2, 128, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]]);
        assert!(smoothness_term(&uniform) > smoothness_term(&jagged));
        assert_eq!(smoothness_term(&uniform), 0.0);
    }

    #[test]
    fn test_snake_rewards_corner_anchor() {
        let w = EvalWeights::default();
        let cornered = Grid::EMPTY.with_tile(0, 0, 512);
        let centred = Grid::EMPTY.with_tile(1, 1, 512);
        assert!(evaluate(&cornered, &w) > evaluate(&centred, &w));
    }

    #[test]
    fn test_merge_term_counts_adjacent_pairs() {
        let g = Grid::from_rows([[8, 8, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]]);
        assert_eq!(merge_term(&g), 8.0);
        assert_eq!(merge_term(&Grid::EMPTY), 0.0);
    }

    #[test]
    fn test_empty_term_decays_with_occupancy() {
        // One empty cell on a nearly full board is worth less than one
        // empty cell on a nearly empty board.
        let near_empty = Grid::EMPTY.with_tile(0, 0, 2);
        let mut near_full = Grid::EMPTY;
        for r in 0..4 {
            for c in 0..4 {
                if (r, c) != (3, 3) {
                    near_full = near_full.with_tile(r, c, if (r + c) % 2 == 0 { 2 } else { 4 });
                }
            }
        }
        let per_cell_sparse = empty_term(&near_empty, 0.95) / 15.0;
        let per_cell_crowded = empty_term(&near_full, 0.95) / 1.0;
        assert!(per_cell_sparse > per_cell_crowded);
    }

    #[test]
    fn test_score_term_defaults_to_zero() {
        let w = EvalWeights::default();
        let g = Grid::EMPTY.with_tile(0, 0, 4);
        assert_eq!(evaluate(&g, &w), evaluate_with_score(&g, 10_000, &w));
    }

    #[test]
    fn test_evaluate_is_finite() {
        let w = EvalWeights::default();
        let maxed = Grid::from_cells([131_072; 16]);
        assert!(evaluate(&maxed, &w).is_finite());
        assert!(evaluate(&Grid::EMPTY, &w).is_finite());
    }
}
