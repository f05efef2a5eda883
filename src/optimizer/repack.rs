//! Full re-pack construction.
//!
//! # Algorithm
//!
//! 1. Locked positions keep their occupant; disabled positions are dropped.
//! 2. Every other occupant goes into the pool, grouped by cluster key.
//! 3. Groups are placed largest first (label order on ties); the
//!    unclustered bucket goes last since it gains nothing from packing.
//! 4. Each group targets the region with the most locked members of the
//!    same group, then the most free capacity, then layout order.
//! 5. Members fill that region's free positions in row-major order; any
//!    overflow targets the next best region.
//!
//! When the pool outnumbers the free movable positions, the surplus can
//! only come from occupants on disabled positions (everyone else already
//! sits on a distinct movable one). The last such occupants in layout
//! order stay where they are, so every pooled occupant gets a slot.
//!
//! The result is a starting point for [`super::refine`].

use std::collections::{BTreeMap, HashMap};

use crate::models::Layout;

use super::score::ClusterGrid;
use super::seating::Seating;

#[derive(Debug, Clone, Copy)]
struct PoolEntry<'a> {
    occupant: &'a str,
    key: Option<&'a str>,
    origin: usize,
}

/// Free movable positions of one region, in row-major order.
#[derive(Debug)]
struct RegionSlots {
    free: Vec<usize>,
    cursor: usize,
}

impl RegionSlots {
    fn remaining(&self) -> usize {
        self.free.len() - self.cursor
    }

    fn take(&mut self) -> Option<usize> {
        let slot = self.free.get(self.cursor).copied();
        if slot.is_some() {
            self.cursor += 1;
        }
        slot
    }
}

/// Builds a fresh seating by packing groups into regions.
pub(crate) fn repack<'a>(
    grid: &ClusterGrid<'_>,
    layout: &Layout,
    current: &Seating<'a>,
) -> Seating<'a> {
    let mut out = Seating::empty(grid.len());
    let mut pool: Vec<PoolEntry<'a>> = Vec::new();
    let mut affinity: HashMap<(usize, &'a str), usize> = HashMap::new();

    for i in 0..grid.len() {
        let Some(occupant) = current.slots[i] else {
            continue;
        };
        let key = current.keys[i];
        if layout.is_locked(&grid.position(i).id) {
            out.put(i, Some(occupant), key);
            if let Some(k) = key {
                *affinity.entry((grid.region_of(i), k)).or_insert(0) += 1;
            }
        } else {
            pool.push(PoolEntry {
                occupant,
                key,
                origin: i,
            });
        }
    }

    let mut regions: Vec<RegionSlots> = (0..grid.region_count())
        .map(|r| {
            let mut free: Vec<usize> = grid
                .region_members(r)
                .iter()
                .copied()
                .filter(|&i| layout.is_movable(&grid.position(i).id))
                .collect();
            free.sort_by_key(|&i| {
                let p = grid.position(i);
                (p.row, p.col)
            });
            RegionSlots { free, cursor: 0 }
        })
        .collect();

    let capacity: usize = regions.iter().map(RegionSlots::remaining).sum();
    let pool = strand_surplus(grid, layout, pool, capacity, &mut out);

    for (key, members) in group_order(&pool) {
        let mut rest = members.as_slice();
        while !rest.is_empty() {
            let Some(r) = pick_region(&regions, &affinity, key) else {
                break;
            };
            let count = rest.len().min(regions[r].remaining());
            for entry in &rest[..count] {
                if let Some(i) = regions[r].take() {
                    out.put(i, Some(entry.occupant), entry.key);
                }
            }
            rest = &rest[count..];
        }
    }

    out
}

/// Leaves the last `pool.len() - capacity` disabled-position occupants in
/// place and returns the rest of the pool.
fn strand_surplus<'a>(
    grid: &ClusterGrid<'_>,
    layout: &Layout,
    pool: Vec<PoolEntry<'a>>,
    capacity: usize,
    out: &mut Seating<'a>,
) -> Vec<PoolEntry<'a>> {
    let mut surplus = pool.len().saturating_sub(capacity);
    if surplus == 0 {
        return pool;
    }

    let mut kept = Vec::with_capacity(capacity);
    for entry in pool.into_iter().rev() {
        let origin = &grid.position(entry.origin).id;
        if surplus > 0 && !layout.is_movable(origin) {
            surplus -= 1;
            tracing::warn!(
                occupant = entry.occupant,
                position = %origin,
                "no free position for occupant, leaving in place"
            );
            out.put(entry.origin, Some(entry.occupant), entry.key);
        } else {
            kept.push(entry);
        }
    }
    kept.reverse();
    kept
}

/// Pool partitioned by cluster key, in placement order.
fn group_order<'a>(pool: &[PoolEntry<'a>]) -> Vec<(Option<&'a str>, Vec<PoolEntry<'a>>)> {
    let mut clustered: BTreeMap<&'a str, Vec<PoolEntry<'a>>> = BTreeMap::new();
    let mut unclustered: Vec<PoolEntry<'a>> = Vec::new();
    for entry in pool {
        match entry.key {
            Some(k) => clustered.entry(k).or_default().push(*entry),
            None => unclustered.push(*entry),
        }
    }

    let mut groups: Vec<(Option<&'a str>, Vec<PoolEntry<'a>>)> = clustered
        .into_iter()
        .map(|(k, members)| (Some(k), members))
        .collect();
    // Stable: equal sizes keep label order.
    groups.sort_by(|a, b| b.1.len().cmp(&a.1.len()));
    if !unclustered.is_empty() {
        groups.push((None, unclustered));
    }
    groups
}

/// Region with free capacity that best fits `key`.
fn pick_region<'k>(
    regions: &[RegionSlots],
    affinity: &HashMap<(usize, &'k str), usize>,
    key: Option<&'k str>,
) -> Option<usize> {
    let mut best: Option<(usize, (usize, usize))> = None;
    for (r, slots) in regions.iter().enumerate() {
        let free = slots.remaining();
        if free == 0 {
            continue;
        }
        let locked = key
            .and_then(|k| affinity.get(&(r, k)).copied())
            .unwrap_or(0);
        let rank = (locked, free);
        if best.map_or(true, |(_, b)| rank > b) {
            best = Some((r, rank));
        }
    }
    best.map(|(r, _)| r)
}
