//! Clustering quality metrics (KPIs).
//!
//! Summarizes how well groups are consolidated in an assignment.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Score | Clustering score (see [`super::score`]) |
//! | Adjacent pairs | Same-group pairs within one row/column |
//! | Region pairs | Same-group pairs sharing only a region |
//! | Group spread | Regions touched per group |
//! | Consolidated groups | Groups living in a single region |

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::models::{Assignment, Layout, Occupant, OccupantDirectory};

use super::score::{ClusterGrid, ADJACENT_WEIGHT, REGION_WEIGHT};

/// Clustering performance indicators.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterKpi {
    /// Clustering score.
    pub score: i64,
    /// Occupied positions inside the layout.
    pub occupied: usize,
    /// Occupied positions whose occupant has a comparable group.
    pub clustered: usize,
    /// Same-group adjacent pairs.
    pub adjacent_pairs: usize,
    /// Same-group same-region non-adjacent pairs.
    pub region_pairs: usize,
    /// Group label → number of regions it occupies.
    pub group_spread: BTreeMap<String, usize>,
}

impl ClusterKpi {
    /// Computes KPIs for an assignment.
    pub fn calculate(assignment: &Assignment, layout: &Layout, occupants: &[Occupant]) -> Self {
        let grid = ClusterGrid::new(layout);
        let directory = OccupantDirectory::new(occupants);
        let keys = grid.keys_for(assignment, &directory);

        let occupied = (0..grid.len())
            .filter(|&i| assignment.occupant_at(&grid.position(i).id).is_some())
            .count();
        let clustered = keys.iter().filter(|k| k.is_some()).count();

        let mut adjacent_pairs = 0;
        let mut region_pairs = 0;
        let mut regions_by_group: BTreeMap<&str, BTreeSet<usize>> = BTreeMap::new();
        for r in 0..grid.region_count() {
            let members = grid.region_members(r);
            for (x, &i) in members.iter().enumerate() {
                let Some(key) = keys[i] else { continue };
                regions_by_group.entry(key).or_default().insert(r);
                for &j in &members[x + 1..] {
                    if keys[j] != Some(key) {
                        continue;
                    }
                    if grid.position(i).is_adjacent(grid.position(j)) {
                        adjacent_pairs += 1;
                    } else {
                        region_pairs += 1;
                    }
                }
            }
        }

        let score = adjacent_pairs as i64 * ADJACENT_WEIGHT + region_pairs as i64 * REGION_WEIGHT;
        debug_assert_eq!(score, grid.score(&keys));

        Self {
            score,
            occupied,
            clustered,
            adjacent_pairs,
            region_pairs,
            group_spread: regions_by_group
                .into_iter()
                .map(|(k, rs)| (k.to_string(), rs.len()))
                .collect(),
        }
    }

    /// Groups living in a single region.
    pub fn consolidated_groups(&self) -> usize {
        self.group_spread.values().filter(|&&n| n == 1).count()
    }

    /// Groups spread across more than one region.
    pub fn fragmented_groups(&self) -> usize {
        self.group_spread.len() - self.consolidated_groups()
    }
}
