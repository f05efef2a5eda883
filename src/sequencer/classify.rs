//! Before/after change classification.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::models::Assignment;

/// How one occupant differs between two assignments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Change {
    /// Same position on both sides.
    Unchanged { at: String },
    /// Placed before, absent after.
    Departure { from: String },
    /// Absent before, placed after.
    Arrival { to: String },
    /// Placed on both sides at different positions.
    Relocation { from: String, to: String },
}

/// An occupant with its change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupantChange {
    pub occupant_id: String,
    pub change: Change,
}

/// Classifies every occupant that appears on either side, ordered by id.
///
/// Positions missing from one side are treated as empty there.
pub fn classify(from: &Assignment, to: &Assignment) -> Vec<OccupantChange> {
    let before = from.locations();
    let after = to.locations();
    let ids: BTreeSet<&str> = before.keys().chain(after.keys()).copied().collect();

    ids.into_iter()
        .filter_map(|id| {
            let change = match (before.get(id), after.get(id)) {
                (Some(&a), Some(&b)) if a == b => Change::Unchanged { at: a.to_string() },
                (Some(&a), Some(&b)) => Change::Relocation {
                    from: a.to_string(),
                    to: b.to_string(),
                },
                (Some(&a), None) => Change::Departure { from: a.to_string() },
                (None, Some(&b)) => Change::Arrival { to: b.to_string() },
                (None, None) => return None,
            };
            Some(OccupantChange {
                occupant_id: id.to_string(),
                change,
            })
        })
        .collect()
}
