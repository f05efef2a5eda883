//! Assignment (snapshot) model.
//!
//! An assignment maps every known position to an occupant or to nothing.
//! It is the value both the optimizer and the sequencer consume and
//! produce. Iteration order is by position id so that every computation
//! over an assignment is deterministic.
//!
//! An occupant appears at most once. The type does not enforce this on
//! construction; see [`crate::validation`] for snapshot checks.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Position id → occupant id (or empty).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Assignment {
    slots: BTreeMap<String, Option<String>>,
}

impl Assignment {
    /// Creates an empty assignment with no known positions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an assignment from `(position, occupant)` pairs.
    pub fn from_pairs<I, P, O>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (P, Option<O>)>,
        P: Into<String>,
        O: Into<String>,
    {
        Self {
            slots: pairs
                .into_iter()
                .map(|(p, o)| (p.into(), o.map(Into::into)))
                .collect(),
        }
    }

    /// Adds a known position holding `occupant`.
    pub fn with(mut self, position_id: impl Into<String>, occupant_id: impl Into<String>) -> Self {
        self.slots
            .insert(position_id.into(), Some(occupant_id.into()));
        self
    }

    /// Adds a known, empty position.
    pub fn with_empty(mut self, position_id: impl Into<String>) -> Self {
        self.slots.insert(position_id.into(), None);
        self
    }

    /// Places an occupant, returning whoever held the position before.
    pub fn place(
        &mut self,
        position_id: impl Into<String>,
        occupant_id: impl Into<String>,
    ) -> Option<String> {
        self.slots
            .insert(position_id.into(), Some(occupant_id.into()))
            .flatten()
    }

    /// Empties a position (keeping it known), returning its occupant.
    pub fn vacate(&mut self, position_id: &str) -> Option<String> {
        match self.slots.get_mut(position_id) {
            Some(slot) => slot.take(),
            None => None,
        }
    }

    /// Sets a position's content directly.
    pub fn set(&mut self, position_id: impl Into<String>, occupant_id: Option<String>) {
        self.slots.insert(position_id.into(), occupant_id);
    }

    /// Occupant at a position; `None` for empty or unknown positions.
    pub fn occupant_at(&self, position_id: &str) -> Option<&str> {
        self.slots.get(position_id).and_then(|o| o.as_deref())
    }

    /// Whether the position is known to this assignment.
    pub fn contains_position(&self, position_id: &str) -> bool {
        self.slots.contains_key(position_id)
    }

    /// Position currently held by an occupant.
    pub fn position_of(&self, occupant_id: &str) -> Option<&str> {
        self.occupied()
            .find(|(_, o)| *o == occupant_id)
            .map(|(p, _)| p)
    }

    /// All known positions with their content.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.slots.iter().map(|(p, o)| (p.as_str(), o.as_deref()))
    }

    /// Occupied positions only.
    pub fn occupied(&self) -> impl Iterator<Item = (&str, &str)> {
        self.slots
            .iter()
            .filter_map(|(p, o)| o.as_deref().map(|o| (p.as_str(), o)))
    }

    /// Occupant → position index.
    pub fn locations(&self) -> BTreeMap<&str, &str> {
        self.occupied().map(|(p, o)| (o, p)).collect()
    }

    /// Set of placed occupant ids.
    pub fn occupants(&self) -> BTreeSet<&str> {
        self.occupied().map(|(_, o)| o).collect()
    }

    /// Number of occupied positions.
    pub fn occupied_count(&self) -> usize {
        self.occupied().count()
    }

    /// Number of known positions.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no position is known.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of occupants whose position differs between `self` and `other`.
    ///
    /// Occupants present on only one side count as moved.
    pub fn diff_count(&self, other: &Assignment) -> usize {
        let before = self.locations();
        let after = other.locations();
        let mut ids: BTreeSet<&str> = before.keys().copied().collect();
        ids.extend(after.keys().copied());
        ids.into_iter()
            .filter(|id| before.get(id) != after.get(id))
            .count()
    }

    /// Whether both assignments agree on every position either one knows,
    /// treating unknown positions as empty.
    pub fn same_placement(&self, other: &Assignment) -> bool {
        self.slots
            .keys()
            .chain(other.slots.keys())
            .all(|p| self.occupant_at(p) == other.occupant_at(p))
    }
}

impl<P, O> FromIterator<(P, Option<O>)> for Assignment
where
    P: Into<String>,
    O: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (P, Option<O>)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Assignment {
        Assignment::new()
            .with("P1", "A")
            .with("P2", "B")
            .with_empty("P3")
    }

    #[test]
    fn test_lookup() {
        let a = sample();
        assert_eq!(a.len(), 3);
        assert_eq!(a.occupied_count(), 2);
        assert_eq!(a.occupant_at("P1"), Some("A"));
        assert_eq!(a.occupant_at("P3"), None);
        assert_eq!(a.occupant_at("P9"), None);
        assert_eq!(a.position_of("B"), Some("P2"));
        assert_eq!(a.position_of("Z"), None);
        assert!(a.contains_position("P3"));
        assert!(!a.contains_position("P9"));
    }

    #[test]
    fn test_place_and_vacate() {
        let mut a = sample();
        assert_eq!(a.vacate("P1"), Some("A".to_string()));
        assert!(a.contains_position("P1"));
        assert_eq!(a.place("P3", "A"), None);
        assert_eq!(a.place("P2", "C"), Some("B".to_string()));
        assert_eq!(a.vacate("P9"), None);
        assert_eq!(a.occupants(), BTreeSet::from(["A", "C"]));
    }

    #[test]
    fn test_diff_count() {
        let before = sample();
        let after = Assignment::new()
            .with("P1", "A")
            .with("P3", "B")
            .with("P2", "C");
        // B moved, C arrived
        assert_eq!(before.diff_count(&after), 2);
        assert_eq!(before.diff_count(&before), 0);
    }

    #[test]
    fn test_same_placement_ignores_unknown_empty() {
        let a = Assignment::new().with("P1", "A").with_empty("P2");
        let b = Assignment::new().with("P1", "A");
        assert!(a.same_placement(&b));
        assert!(!a.same_placement(&Assignment::new().with("P2", "A")));
    }

    #[test]
    fn test_from_iter() {
        let a: Assignment = vec![("P1", Some("A")), ("P2", None)].into_iter().collect();
        assert_eq!(a.len(), 2);
        assert_eq!(a.occupant_at("P1"), Some("A"));
    }

    #[test]
    fn test_serde_transparent() {
        let a = sample();
        let json = serde_json::to_string(&a).unwrap();
        assert_eq!(json, r#"{"P1":"A","P2":"B","P3":null}"#);
        let back: Assignment = serde_json::from_str(&json).unwrap();
        assert_eq!(back, a);
    }
}
