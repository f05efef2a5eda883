//! Move plan (sequencer output) model.
//!
//! A plan is an ordered list of relocation steps. Every step except a
//! swap is executed strictly in order; the steps of one swap group form
//! an atomic unit and are always contiguous.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::Range;

/// Caller-supplied display labels for positions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PositionLabels(BTreeMap<String, String>);

impl PositionLabels {
    /// Creates an empty label set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a label.
    pub fn with_label(mut self, position_id: impl Into<String>, label: impl Into<String>) -> Self {
        self.0.insert(position_id.into(), label.into());
        self
    }

    /// Label for a position, falling back to `"Position {id}"`.
    pub fn label_for(&self, position_id: &str) -> String {
        match self.0.get(position_id) {
            Some(label) if !label.is_empty() => label.clone(),
            _ => format!("Position {position_id}"),
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PositionLabels {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Another occupant moving in the same swap group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoMover {
    /// Occupant id.
    pub occupant_id: String,
    /// Display name (raw id when unknown).
    pub name: String,
}

/// What a single step does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepKind {
    /// Occupant leaves and is not placed anywhere.
    Depart { from: String },
    /// Occupant is placed from outside the layout.
    Arrive { to: String },
    /// Occupant moves to a position that is vacant when the step runs.
    Relocate { from: String, to: String },
    /// Occupant moves as part of an atomic rotation.
    Swap {
        /// Swap group index (0-based, in plan order).
        group: usize,
        from: String,
        to: String,
        /// The other occupants of the group.
        co_movers: Vec<CoMover>,
    },
}

/// One step in a move plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanStep {
    /// Occupant being moved.
    pub occupant_id: String,
    /// Display name of the occupant.
    pub occupant_name: String,
    /// Movement.
    pub kind: StepKind,
    /// Label of the origin position, if any.
    pub from_label: Option<String>,
    /// Label of the destination position, if any.
    pub to_label: Option<String>,
}

impl PlanStep {
    /// Origin position, `None` for arrivals.
    pub fn origin(&self) -> Option<&str> {
        match &self.kind {
            StepKind::Depart { from }
            | StepKind::Relocate { from, .. }
            | StepKind::Swap { from, .. } => Some(from.as_str()),
            StepKind::Arrive { .. } => None,
        }
    }

    /// Destination position, `None` for departures.
    pub fn destination(&self) -> Option<&str> {
        match &self.kind {
            StepKind::Arrive { to }
            | StepKind::Relocate { to, .. }
            | StepKind::Swap { to, .. } => Some(to.as_str()),
            StepKind::Depart { .. } => None,
        }
    }

    /// Co-movers; empty for every step outside a swap group.
    pub fn co_movers(&self) -> &[CoMover] {
        match &self.kind {
            StepKind::Swap { co_movers, .. } => co_movers.as_slice(),
            _ => &[],
        }
    }

    /// Swap group index, if this step belongs to one.
    pub fn swap_group(&self) -> Option<usize> {
        match self.kind {
            StepKind::Swap { group, .. } => Some(group),
            _ => None,
        }
    }

    /// Whether the step must be applied together with its group.
    pub fn is_swap(&self) -> bool {
        matches!(self.kind, StepKind::Swap { .. })
    }

    /// One-line human-readable description.
    pub fn describe(&self) -> String {
        let from = self.from_label.as_deref().unwrap_or("outside");
        let to = self.to_label.as_deref().unwrap_or("outside");
        match &self.kind {
            StepKind::Depart { .. } => format!("{} leaves {}", self.occupant_name, from),
            StepKind::Arrive { .. } => format!("{} arrives at {}", self.occupant_name, to),
            StepKind::Relocate { .. } => {
                format!("{} moves from {} to {}", self.occupant_name, from, to)
            }
            StepKind::Swap { co_movers, .. } => {
                let names: Vec<&str> = co_movers.iter().map(|c| c.name.as_str()).collect();
                format!(
                    "{} moves from {} to {} (swap with {})",
                    self.occupant_name,
                    from,
                    to,
                    names.join(", ")
                )
            }
        }
    }
}

/// Counts describing a plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSummary {
    /// Occupants at the same position on both sides.
    pub unchanged: usize,
    /// Occupants present only before.
    pub departures: usize,
    /// Occupants present only after.
    pub arrivals: usize,
    /// Occupants at different positions, swap participants included.
    pub relocations: usize,
    /// Distinct swap cycles.
    pub cycles: usize,
}

impl PlanSummary {
    /// Occupants that take part in any step.
    pub fn moving(&self) -> usize {
        self.departures + self.arrivals + self.relocations
    }
}

/// Ordered relocation steps plus summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    /// Steps in execution order.
    pub steps: Vec<PlanStep>,
    /// Counts.
    pub summary: PlanSummary,
}

impl Plan {
    /// Whether the plan contains no step.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Index ranges of the swap groups, in plan order.
    pub fn swap_groups(&self) -> Vec<Range<usize>> {
        let mut groups: Vec<Range<usize>> = Vec::new();
        let mut current: Option<(usize, usize)> = None; // (group, start)

        for (i, step) in self.steps.iter().enumerate() {
            let group = step.swap_group();
            match (current, group) {
                (Some((g, _)), Some(h)) if g == h => {}
                (Some((_, start)), _) => {
                    groups.push(start..i);
                    current = group.map(|h| (h, i));
                }
                (None, Some(h)) => current = Some((h, i)),
                (None, None) => {}
            }
        }
        if let Some((_, start)) = current {
            groups.push(start..self.steps.len());
        }
        groups
    }

    /// Human-readable step list.
    pub fn describe(&self) -> Vec<String> {
        self.steps.iter().map(PlanStep::describe).collect()
    }
}
