//! Move-order planner.
//!
//! # Algorithm
//!
//! 1. Classify every occupant (unchanged, departure, arrival, relocation).
//! 2. Build the relocation dependency graph and split it into chains and
//!    cycles.
//! 3. Emit, in order: departures, chained relocations (blocker first),
//!    swap groups (one contiguous block per cycle), arrivals.
//!
//! With that order every non-swap step finds its destination vacant when
//! it runs, and each swap group can be applied as a single atomic unit.
//!
//! A cycle of k positions yields exactly k swap steps with k − 1
//! co-movers each; no holding position is used.

use crate::models::{
    Assignment, CoMover, Occupant, OccupantDirectory, Plan, PlanStep, PlanSummary, PositionLabels,
    StepKind,
};

use super::classify::{classify, Change};
use super::graph::DependencyGraph;

/// Builds move plans between two assignments.
///
/// # Example
///
/// ```
/// use u_seating::models::{Assignment, Occupant};
/// use u_seating::sequencer::MovePlanner;
///
/// let from = Assignment::new().with("P1", "A").with("P2", "B");
/// let to = Assignment::new().with("P1", "B").with("P2", "A");
/// let occupants = vec![Occupant::new("A").with_name("Ann"), Occupant::new("B")];
///
/// let plan = MovePlanner::new().plan(&from, &to, &occupants);
/// assert_eq!(plan.len(), 2);
/// assert_eq!(plan.summary.cycles, 1);
/// assert_eq!(plan.steps[0].co_movers()[0].occupant_id, "B");
/// ```
#[derive(Debug, Clone, Default)]
pub struct MovePlanner {
    labels: PositionLabels,
}

struct Relocation<'a> {
    occupant: &'a str,
    from: &'a str,
    to: &'a str,
}

impl MovePlanner {
    /// Creates a planner with default position labels.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets position labels.
    pub fn with_labels(mut self, labels: PositionLabels) -> Self {
        self.labels = labels;
        self
    }

    /// Computes the ordered move plan that turns `from` into `to`.
    pub fn plan(&self, from: &Assignment, to: &Assignment, occupants: &[Occupant]) -> Plan {
        let directory = OccupantDirectory::new(occupants);
        let changes = classify(from, to);

        let mut summary = PlanSummary::default();
        let mut departures = Vec::new();
        let mut arrivals = Vec::new();
        let mut relocations: Vec<Relocation<'_>> = Vec::new();

        for c in &changes {
            let occupant = c.occupant_id.as_str();
            match &c.change {
                Change::Unchanged { .. } => summary.unchanged += 1,
                Change::Departure { from } => {
                    summary.departures += 1;
                    departures.push(self.step(
                        &directory,
                        occupant,
                        StepKind::Depart { from: from.clone() },
                    ));
                }
                Change::Arrival { to } => {
                    summary.arrivals += 1;
                    arrivals.push(self.step(
                        &directory,
                        occupant,
                        StepKind::Arrive { to: to.clone() },
                    ));
                }
                Change::Relocation { from, to } => {
                    summary.relocations += 1;
                    relocations.push(Relocation {
                        occupant,
                        from: from.as_str(),
                        to: to.as_str(),
                    });
                }
            }
        }

        let moves: Vec<(&str, &str)> = relocations.iter().map(|r| (r.from, r.to)).collect();
        let resolution = DependencyGraph::new(&moves).resolve();
        summary.cycles = resolution.cycles.len();

        let mut steps = departures;
        steps.extend(resolution.chain_order.iter().map(|&k| {
            let r = &relocations[k];
            self.step(
                &directory,
                r.occupant,
                StepKind::Relocate {
                    from: r.from.to_string(),
                    to: r.to.to_string(),
                },
            )
        }));

        for (group, cycle) in resolution.cycles.iter().enumerate() {
            tracing::debug!(
                group,
                size = cycle.len(),
                members = ?cycle.iter().map(|&k| relocations[k].occupant).collect::<Vec<_>>(),
                "swap cycle detected"
            );
            for &k in cycle {
                let r = &relocations[k];
                let co_movers = cycle
                    .iter()
                    .filter(|&&other| other != k)
                    .map(|&other| CoMover {
                        occupant_id: relocations[other].occupant.to_string(),
                        name: directory.display_name(relocations[other].occupant).to_string(),
                    })
                    .collect();
                steps.push(self.step(
                    &directory,
                    r.occupant,
                    StepKind::Swap {
                        group,
                        from: r.from.to_string(),
                        to: r.to.to_string(),
                        co_movers,
                    },
                ));
            }
        }
        steps.extend(arrivals);

        tracing::debug!(
            unchanged = summary.unchanged,
            departures = summary.departures,
            arrivals = summary.arrivals,
            relocations = summary.relocations,
            cycles = summary.cycles,
            steps = steps.len(),
            "move plan computed"
        );

        Plan { steps, summary }
    }

    fn step(&self, directory: &OccupantDirectory<'_>, occupant: &str, kind: StepKind) -> PlanStep {
        let mut step = PlanStep {
            occupant_id: occupant.to_string(),
            occupant_name: directory.display_name(occupant).to_string(),
            kind,
            from_label: None,
            to_label: None,
        };
        step.from_label = step.origin().map(|p| self.labels.label_for(p));
        step.to_label = step.destination().map(|p| self.labels.label_for(p));
        step
    }
}

/// Computes a move plan; `labels` defaults to `"Position {id}"` labels.
///
/// See [`MovePlanner::plan`].
pub fn compute_move_plan(
    from: &Assignment,
    to: &Assignment,
    occupants: &[Occupant],
    labels: Option<&PositionLabels>,
) -> Plan {
    let planner = match labels {
        Some(labels) => MovePlanner::new().with_labels(labels.clone()),
        None => MovePlanner::new(),
    };
    planner.plan(from, to, occupants)
}
