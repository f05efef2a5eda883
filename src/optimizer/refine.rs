//! Greedy pairwise-swap refinement (hill climbing).
//!
//! # Algorithm
//!
//! 1. Scan every unordered pair of movable positions.
//! 2. Compute the score delta of exchanging their contents (occupant
//!    with occupant, or occupant with empty).
//! 3. Commit the single best strictly improving swap; the first pair
//!    found with the best delta wins ties.
//! 4. Repeat until no pair improves or the iteration cap is hit.
//!
//! No randomization and no escape from local optima.
//!
//! # Complexity
//! O(m² · r) per iteration, m = movable positions, r = region size.

use super::score::ClusterGrid;
use super::seating::Seating;

/// Outcome of a refinement run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RefineOutcome {
    /// Swaps committed.
    pub swaps: usize,
    /// Total score gained.
    pub gain: i64,
    /// Whether the iteration cap stopped the search.
    pub capped: bool,
}

/// Hill-climbs `seating` in place over the `movable` grid indices.
pub(crate) fn refine(
    grid: &ClusterGrid<'_>,
    seating: &mut Seating<'_>,
    movable: &[usize],
    max_iterations: usize,
) -> RefineOutcome {
    let mut gain = 0;

    for iteration in 0..max_iterations {
        match best_swap(grid, seating, movable) {
            Some((i, j, delta)) => {
                seating.swap(i, j);
                gain += delta;
                tracing::trace!(
                    iteration,
                    a = %grid.position(i).id,
                    b = %grid.position(j).id,
                    delta,
                    "committed swap"
                );
            }
            None => {
                return RefineOutcome {
                    swaps: iteration,
                    gain,
                    capped: false,
                };
            }
        }
    }

    tracing::debug!(max_iterations, gain, "refinement stopped at iteration cap");
    RefineOutcome {
        swaps: max_iterations,
        gain,
        capped: true,
    }
}

/// Best strictly improving swap, if any.
fn best_swap(
    grid: &ClusterGrid<'_>,
    seating: &Seating<'_>,
    movable: &[usize],
) -> Option<(usize, usize, i64)> {
    let mut best: Option<(usize, usize, i64)> = None;

    for (x, &i) in movable.iter().enumerate() {
        for &j in &movable[x + 1..] {
            // Same key on both sides (including empty/unclustered) is a no-op.
            if seating.keys[i] == seating.keys[j] {
                continue;
            }
            let delta = grid.swap_delta(i, j, &seating.keys);
            if delta > best.map_or(0, |(_, _, d)| d) {
                best = Some((i, j, delta));
            }
        }
    }

    best
}
