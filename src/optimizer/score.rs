//! Clustering score.
//!
//! Every unordered pair of occupied positions in the same region whose
//! occupants share a clustering group contributes:
//!
//! | Relation | Weight |
//! |----------|--------|
//! | Adjacent (≤ 1 row and ≤ 1 column apart) | 3 |
//! | Same region, not adjacent | 1 |
//!
//! Cross-region pairs never score, so the full score is computed per
//! region as a clique: O(Σ region²) instead of O(positions²).
//!
//! Because the score is a sum of independent pair terms, the effect of
//! swapping two positions' occupants only depends on those two positions'
//! regions. [`ClusterGrid::swap_delta`] exploits that.

use std::collections::HashMap;

use crate::models::{Assignment, Layout, Occupant, OccupantDirectory, Position};

/// Score of an adjacent same-group pair.
pub const ADJACENT_WEIGHT: i64 = 3;
/// Score of a non-adjacent same-group pair in the same region.
pub const REGION_WEIGHT: i64 = 1;

/// Indexed view of a layout for scoring.
///
/// Positions are addressed by dense index. A position id that appears
/// more than once in the layout is indexed only at its first occurrence.
#[derive(Debug, Clone)]
pub(crate) struct ClusterGrid<'a> {
    positions: Vec<&'a Position>,
    index: HashMap<&'a str, usize>,
    /// Member indices per region, in layout order.
    regions: Vec<Vec<usize>>,
    region_of: Vec<usize>,
}

impl<'a> ClusterGrid<'a> {
    pub fn new(layout: &'a Layout) -> Self {
        let mut positions = Vec::with_capacity(layout.len());
        let mut index = HashMap::with_capacity(layout.len());
        let mut region_index: HashMap<&str, usize> = HashMap::new();
        let mut regions: Vec<Vec<usize>> = Vec::new();
        let mut region_of = Vec::with_capacity(layout.len());

        for position in &layout.positions {
            if index.contains_key(position.id.as_str()) {
                continue;
            }
            let i = positions.len();
            index.insert(position.id.as_str(), i);
            positions.push(position);

            let r = *region_index
                .entry(position.region.as_str())
                .or_insert_with(|| {
                    regions.push(Vec::new());
                    regions.len() - 1
                });
            regions[r].push(i);
            region_of.push(r);
        }

        Self {
            positions,
            index,
            regions,
            region_of,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn position(&self, i: usize) -> &'a Position {
        self.positions[i]
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    pub fn region_members(&self, r: usize) -> &[usize] {
        &self.regions[r]
    }

    #[inline]
    pub fn region_of(&self, i: usize) -> usize {
        self.region_of[i]
    }

    /// Pair weight, assuming both positions share a region.
    #[inline]
    fn weight(&self, i: usize, j: usize) -> i64 {
        if self.positions[i].is_adjacent(self.positions[j]) {
            ADJACENT_WEIGHT
        } else {
            REGION_WEIGHT
        }
    }

    /// Cluster key per grid index for an assignment.
    pub fn keys_for(
        &self,
        assignment: &Assignment,
        directory: &OccupantDirectory<'a>,
    ) -> Vec<Option<&'a str>> {
        self.positions
            .iter()
            .map(|p| {
                assignment
                    .occupant_at(&p.id)
                    .and_then(|o| directory.cluster_key(o))
            })
            .collect()
    }

    /// Full score over per-index cluster keys.
    pub fn score(&self, keys: &[Option<&str>]) -> i64 {
        let mut total = 0;
        for members in &self.regions {
            for (x, &i) in members.iter().enumerate() {
                let Some(ki) = keys[i] else { continue };
                for &j in &members[x + 1..] {
                    if keys[j] == Some(ki) {
                        total += self.weight(i, j);
                    }
                }
            }
        }
        total
    }

    /// Score contributed by position `i` holding `key`, against every
    /// other position of its region except `skip`.
    fn contribution(&self, i: usize, key: Option<&str>, keys: &[Option<&str>], skip: usize) -> i64 {
        let Some(key) = key else { return 0 };
        self.regions[self.region_of[i]]
            .iter()
            .filter(|&&j| j != i && j != skip && keys[j] == Some(key))
            .map(|&j| self.weight(i, j))
            .sum()
    }

    /// Score change from exchanging the contents of positions `i` and `j`.
    ///
    /// The pair `(i, j)` itself scores the same before and after, so it is
    /// left out of both sides.
    pub fn swap_delta(&self, i: usize, j: usize, keys: &[Option<&str>]) -> i64 {
        if i == j || keys[i] == keys[j] {
            return 0;
        }
        let before =
            self.contribution(i, keys[i], keys, j) + self.contribution(j, keys[j], keys, i);
        let after =
            self.contribution(i, keys[j], keys, j) + self.contribution(j, keys[i], keys, i);
        after - before
    }
}

/// Clustering score of an assignment.
///
/// Positions not in the layout and occupants without a comparable group
/// never contribute.
pub fn clustering_score(
    assignment: &Assignment,
    layout: &Layout,
    occupants: &[Occupant],
) -> i64 {
    let grid = ClusterGrid::new(layout);
    let directory = OccupantDirectory::new(occupants);
    grid.score(&grid.keys_for(assignment, &directory))
}

/// Score change from exchanging the occupants of two positions.
///
/// Returns 0 when either position is not in the layout.
pub fn swap_delta(
    assignment: &Assignment,
    layout: &Layout,
    occupants: &[Occupant],
    a: &str,
    b: &str,
) -> i64 {
    let grid = ClusterGrid::new(layout);
    let (Some(i), Some(j)) = (grid.index_of(a), grid.index_of(b)) else {
        return 0;
    };
    let directory = OccupantDirectory::new(occupants);
    grid.swap_delta(i, j, &grid.keys_for(assignment, &directory))
}
