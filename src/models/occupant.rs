//! Occupant model.
//!
//! Occupants are the entities placed on positions: people, teams, or any
//! other assignable unit. Each occupant carries an optional group label
//! (e.g., a department) that drives clustering.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Group labels that never take part in clustering.
const UNCLUSTERED_LABEL: &str = "unknown";

/// An entity that can be assigned to a position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occupant {
    /// Unique occupant identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Group label used for clustering (e.g., department).
    pub group: Option<String>,
    /// Domain-specific metadata.
    pub attributes: BTreeMap<String, String>,
}

impl Occupant {
    /// Creates a new occupant with no name and no group.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            group: None,
            attributes: BTreeMap::new(),
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the group label.
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Adds a domain-specific attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Returns the group label if it is comparable for clustering.
    ///
    /// Missing, blank, and `"unknown"` labels (any case) are unclustered.
    pub fn cluster_key(&self) -> Option<&str> {
        self.group
            .as_deref()
            .map(str::trim)
            .filter(|g| !g.is_empty() && !g.eq_ignore_ascii_case(UNCLUSTERED_LABEL))
    }

    /// Name to show in plans; falls back to the raw id.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}

/// Read-only id → occupant lookup.
///
/// Built once per planning call from the caller's occupant list. When the
/// list contains the same id twice, the first entry wins.
#[derive(Debug, Clone, Default)]
pub struct OccupantDirectory<'a> {
    by_id: HashMap<&'a str, &'a Occupant>,
}

impl<'a> OccupantDirectory<'a> {
    /// Indexes the given occupants by id.
    pub fn new(occupants: &'a [Occupant]) -> Self {
        let mut by_id = HashMap::with_capacity(occupants.len());
        for occupant in occupants {
            by_id.entry(occupant.id.as_str()).or_insert(occupant);
        }
        Self { by_id }
    }

    /// Looks up an occupant.
    pub fn get(&self, id: &str) -> Option<&'a Occupant> {
        self.by_id.get(id).copied()
    }

    /// Clustering key of an occupant, `None` when unknown or unclustered.
    pub fn cluster_key(&self, id: &str) -> Option<&'a str> {
        self.get(id).and_then(Occupant::cluster_key)
    }

    /// Display name, falling back to the raw id for unknown occupants.
    pub fn display_name<'b>(&self, id: &'b str) -> &'b str
    where
        'a: 'b,
    {
        match self.get(id) {
            Some(occupant) => occupant.display_name(),
            None => id,
        }
    }

    /// Number of indexed occupants.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Whether the directory is empty.
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
