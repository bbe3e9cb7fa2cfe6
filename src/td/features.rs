//! Feature extraction for the linear value function.
//!
//! The vector has one entry per cell (log2 tile values, whose learned
//! weights act as positional weights) followed by four shape summaries:
//! decayed empty count, monotonicity (best over the four rotations),
//! smoothness penalty, and merge potential. Summaries are normalized to
//! roughly unit scale so no single feature dominates early training.

use crate::core::{Grid, CELLS, SIZE};
use crate::heuristic::{monotonicity_term, smoothness_term};

/// Fixed feature-vector length. The persisted weight vector must match
/// this exactly.
pub const FEATURE_LEN: usize = CELLS + 4;

/// Geometric decay base for the empty-count feature.
const EMPTY_DECAY: f64 = 0.95;

/// Extract the feature vector for a grid.
#[must_use]
pub fn extract(grid: &Grid) -> [f64; FEATURE_LEN] {
    let mut features = [0.0; FEATURE_LEN];

    for (i, &v) in grid.cells().iter().enumerate() {
        features[i] = if v > 0 { f64::from(v).log2() } else { 0.0 };
    }

    let empty = grid.empty_count();
    let occupied = (CELLS - empty) as i32;
    features[CELLS] = empty as f64 * EMPTY_DECAY.powi(occupied) / CELLS as f64;
    features[CELLS + 1] = monotonicity_term(grid) / 24.0;
    features[CELLS + 2] = smoothness_term(grid) / CELLS as f64;
    features[CELLS + 3] = merge_potential(grid);

    features
}

/// Log-scaled sum over orthogonally adjacent equal pairs.
fn merge_potential(grid: &Grid) -> f64 {
    let mut total = 0.0;
    for r in 0..SIZE {
        for c in 0..SIZE {
            let v = grid.get(r, c);
            if v == 0 {
                continue;
            }
            if c + 1 < SIZE && grid.get(r, c + 1) == v {
                total += f64::from(v).log2();
            }
            if r + 1 < SIZE && grid.get(r + 1, c) == v {
                total += f64::from(v).log2();
            }
        }
    }
    total / CELLS as f64
}
