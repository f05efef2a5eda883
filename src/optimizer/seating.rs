//! Mutable working copy of an assignment, indexed by grid position.

use crate::models::{Assignment, OccupantDirectory};

use super::score::ClusterGrid;

/// Occupant and cluster key per grid index.
///
/// Both vectors are kept in lockstep so that score deltas never need to
/// consult the occupant directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Seating<'a> {
    pub slots: Vec<Option<&'a str>>,
    pub keys: Vec<Option<&'a str>>,
}

impl<'a> Seating<'a> {
    /// Snapshot of `assignment` over the grid's positions.
    pub fn from_assignment(
        grid: &ClusterGrid<'a>,
        assignment: &'a Assignment,
        directory: &OccupantDirectory<'a>,
    ) -> Self {
        let slots: Vec<Option<&'a str>> = (0..grid.len())
            .map(|i| assignment.occupant_at(&grid.position(i).id))
            .collect();
        let keys = slots
            .iter()
            .map(|o| o.and_then(|o| directory.cluster_key(o)))
            .collect();
        Self { slots, keys }
    }

    /// All positions empty.
    pub fn empty(len: usize) -> Self {
        Self {
            slots: vec![None; len],
            keys: vec![None; len],
        }
    }

    #[inline]
    pub fn swap(&mut self, i: usize, j: usize) {
        self.slots.swap(i, j);
        self.keys.swap(i, j);
    }

    #[inline]
    pub fn put(&mut self, i: usize, occupant: Option<&'a str>, key: Option<&'a str>) {
        self.slots[i] = occupant;
        self.keys[i] = key;
    }

    #[inline]
    pub fn is_free(&self, i: usize) -> bool {
        self.slots[i].is_none()
    }

    pub fn score(&self, grid: &ClusterGrid<'_>) -> i64 {
        grid.score(&self.keys)
    }

    /// Writes the seating back over `base`.
    ///
    /// Positions of `base` outside the grid are carried over untouched.
    /// Grid positions unknown to `base` are only added when occupied.
    pub fn to_assignment(&self, grid: &ClusterGrid<'_>, base: &Assignment) -> Assignment {
        let mut out = base.clone();
        for (i, slot) in self.slots.iter().enumerate() {
            let id = &grid.position(i).id;
            if slot.is_some() || out.contains_position(id) {
                out.set(id.clone(), slot.map(str::to_string));
            }
        }
        out
    }
}
