//! Position and layout model.
//!
//! A position is a single location on a grid that holds at most one
//! occupant. Positions are grouped into regions (rooms, zones, floors);
//! only positions sharing a region count toward clustering.
//!
//! A [`Layout`] is the ordered set of positions plus the optimizer-only
//! constraints: locked positions keep their occupant, disabled positions
//! stay empty.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A single grid location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Unique position identifier.
    pub id: String,
    /// Grid row.
    pub row: i32,
    /// Grid column.
    pub col: i32,
    /// Containing region identifier.
    pub region: String,
    /// Optional human-readable label (e.g., "Desk 4B").
    pub label: Option<String>,
}

impl Position {
    /// Creates a position at `(row, col)` inside `region`.
    pub fn new(id: impl Into<String>, region: impl Into<String>, row: i32, col: i32) -> Self {
        Self {
            id: id.into(),
            row,
            col,
            region: region.into(),
            label: None,
        }
    }

    /// Sets the display label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Whether `other` is within one row and one column in the same region.
    ///
    /// A position is never adjacent to itself.
    #[inline]
    pub fn is_adjacent(&self, other: &Position) -> bool {
        self.region == other.region
            && self.id != other.id
            && (self.row - other.row).abs() <= 1
            && (self.col - other.col).abs() <= 1
    }
}

/// Positions plus optimizer constraints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Layout {
    /// All positions, in caller order.
    pub positions: Vec<Position>,
    /// Positions that must keep their current occupant.
    pub locked: BTreeSet<String>,
    /// Positions that must stay empty.
    pub disabled: BTreeSet<String>,
}

impl Layout {
    /// Creates an empty layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a layout from a list of positions.
    pub fn from_positions(positions: Vec<Position>) -> Self {
        Self {
            positions,
            ..Self::default()
        }
    }

    /// Adds a position.
    pub fn with_position(mut self, position: Position) -> Self {
        self.positions.push(position);
        self
    }

    /// Marks a position as locked.
    pub fn lock(mut self, position_id: impl Into<String>) -> Self {
        self.locked.insert(position_id.into());
        self
    }

    /// Marks a position as disabled.
    pub fn disable(mut self, position_id: impl Into<String>) -> Self {
        self.disabled.insert(position_id.into());
        self
    }

    /// Finds a position by id.
    pub fn position(&self, id: &str) -> Option<&Position> {
        self.positions.iter().find(|p| p.id == id)
    }

    /// Whether the position keeps its current occupant.
    pub fn is_locked(&self, id: &str) -> bool {
        self.locked.contains(id)
    }

    /// Whether the position must stay empty.
    ///
    /// Locked takes precedence: a position both locked and disabled is
    /// treated as locked.
    pub fn is_disabled(&self, id: &str) -> bool {
        self.disabled.contains(id) && !self.locked.contains(id)
    }

    /// Whether the optimizer may change the position's occupant.
    pub fn is_movable(&self, id: &str) -> bool {
        !self.locked.contains(id) && !self.disabled.contains(id)
    }

    /// Indices of movable positions, in layout order.
    pub fn movable_indices(&self) -> Vec<usize> {
        self.positions
            .iter()
            .enumerate()
            .filter(|(_, p)| self.is_movable(&p.id))
            .map(|(i, _)| i)
            .collect()
    }

    /// Region ids in order of first appearance.
    pub fn regions(&self) -> Vec<&str> {
        let mut seen = BTreeSet::new();
        self.positions
            .iter()
            .filter(|p| seen.insert(p.region.as_str()))
            .map(|p| p.region.as_str())
            .collect()
    }

    /// Number of positions.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether the layout has no positions.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjacency() {
        let a = Position::new("a", "R1", 0, 0);
        let b = Position::new("b", "R1", 1, 1);
        let c = Position::new("c", "R1", 0, 2);
        let d = Position::new("d", "R2", 0, 1);

        assert!(a.is_adjacent(&b));
        assert!(b.is_adjacent(&a));
        assert!(b.is_adjacent(&c));
        assert!(!a.is_adjacent(&c));
        assert!(!a.is_adjacent(&d)); // different region
        assert!(!a.is_adjacent(&a));
    }

    #[test]
    fn test_layout_constraints() {
        let layout = Layout::new()
            .with_position(Position::new("p1", "R1", 0, 0))
            .with_position(Position::new("p2", "R1", 0, 1))
            .with_position(Position::new("p3", "R2", 0, 0))
            .with_position(Position::new("p4", "R2", 0, 1))
            .lock("p1")
            .disable("p3")
            .lock("p4")
            .disable("p4");

        assert!(layout.is_locked("p1"));
        assert!(!layout.is_movable("p1"));
        assert!(layout.is_disabled("p3"));
        assert!(!layout.is_disabled("p4")); // locked wins
        assert!(layout.is_movable("p2"));
        assert_eq!(layout.movable_indices(), vec![1]);
    }

    #[test]
    fn test_regions_in_order() {
        let layout = Layout::from_positions(vec![
            Position::new("a", "North", 0, 0),
            Position::new("b", "South", 0, 0),
            Position::new("c", "North", 0, 1),
            Position::new("d", "East", 0, 0),
        ]);
        assert_eq!(layout.regions(), vec!["North", "South", "East"]);
        assert_eq!(layout.position("c").map(|p| p.col), Some(1));
        assert!(layout.position("zz").is_none());
    }
}
