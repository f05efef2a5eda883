//! Clustering optimizer entry point.
//!
//! # Modes
//!
//! | Mode | Start | Search space |
//! |------|-------|--------------|
//! | `FullRepack` | group-by-region packing | movable positions |
//! | `MinimalDisruption` | current assignment | movable positions |
//!
//! Both modes finish with the same greedy swap refinement, which starts
//! from the baseline: the current assignment with occupants moved off
//! disabled positions. The result never scores below that baseline, and a
//! full re-pack that ends up worse falls back to refining it instead.
//! When no disabled position is occupied the baseline is the input, so
//! `new_score >= old_score`.

use serde::{Deserialize, Serialize};

use crate::models::{Assignment, Layout, Occupant, OccupantDirectory};

use super::refine::refine;
use super::repack::repack;
use super::score::ClusterGrid;
use super::seating::Seating;

/// Default refinement iteration cap.
pub const DEFAULT_MAX_ITERATIONS: usize = 200;

/// Optimization strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OptimizeMode {
    /// Re-pack every movable occupant by group, then refine.
    #[default]
    FullRepack,
    /// Refine the current assignment only.
    MinimalDisruption,
}

/// Tunables for the optimizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizerConfig {
    /// Maximum committed swaps during refinement.
    pub max_iterations: usize,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

/// Input container for an optimization call.
#[derive(Debug, Clone)]
pub struct OptimizeRequest {
    /// Positions and constraints.
    pub layout: Layout,
    /// Current assignment.
    pub assignment: Assignment,
    /// Occupant directory (group labels).
    pub occupants: Vec<Occupant>,
    /// Strategy.
    pub mode: OptimizeMode,
}

impl OptimizeRequest {
    /// Creates a full re-pack request.
    pub fn new(layout: Layout, assignment: Assignment, occupants: Vec<Occupant>) -> Self {
        Self {
            layout,
            assignment,
            occupants,
            mode: OptimizeMode::default(),
        }
    }

    /// Sets the mode.
    pub fn with_mode(mut self, mode: OptimizeMode) -> Self {
        self.mode = mode;
        self
    }
}

/// Optimizer output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizeResult {
    /// Improved assignment.
    pub assignment: Assignment,
    /// Occupants whose position changed.
    pub move_count: usize,
    /// Score of the returned assignment.
    pub new_score: i64,
    /// Score of the input assignment.
    pub old_score: i64,
    /// Score after moving occupants off disabled positions. Equals
    /// `old_score` unless the input occupied a disabled position.
    pub baseline_score: i64,
    /// Refinement swaps committed.
    pub iterations: usize,
}

impl OptimizeResult {
    fn unchanged(assignment: &Assignment, score: i64) -> Self {
        Self {
            assignment: assignment.clone(),
            move_count: 0,
            new_score: score,
            old_score: score,
            baseline_score: score,
            iterations: 0,
        }
    }

    /// Score gained over the input.
    pub fn improvement(&self) -> i64 {
        self.new_score - self.old_score
    }
}

/// Deterministic clustering optimizer.
///
/// # Example
///
/// ```
/// use u_seating::models::{Assignment, Layout, Occupant, Position};
/// use u_seating::optimizer::{ClusterOptimizer, OptimizeMode};
///
/// let layout = Layout::new()
///     .with_position(Position::new("P1", "Room", 0, 0))
///     .with_position(Position::new("P2", "Room", 0, 1))
///     .with_position(Position::new("P3", "Room", 0, 5));
/// let occupants = vec![
///     Occupant::new("a").with_group("Sales"),
///     Occupant::new("b").with_group("Sales"),
/// ];
/// let current = Assignment::new()
///     .with("P1", "a")
///     .with_empty("P2")
///     .with("P3", "b");
///
/// let result = ClusterOptimizer::new().optimize(
///     &current,
///     &layout,
///     &occupants,
///     OptimizeMode::MinimalDisruption,
/// );
/// assert_eq!(result.new_score, 3);
/// assert_eq!(result.move_count, 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ClusterOptimizer {
    config: OptimizerConfig,
}

impl ClusterOptimizer {
    /// Creates an optimizer with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the configuration.
    pub fn with_config(mut self, config: OptimizerConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the refinement iteration cap.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.config.max_iterations = max_iterations;
        self
    }

    /// Current configuration.
    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Optimizes from a request.
    pub fn optimize_request(&self, request: &OptimizeRequest) -> OptimizeResult {
        self.optimize(
            &request.assignment,
            &request.layout,
            &request.occupants,
            request.mode,
        )
    }

    /// Searches for an assignment with a higher clustering score.
    ///
    /// Locked positions keep their occupant, disabled positions end up
    /// empty, and the set of placed occupants is preserved. Inputs are
    /// never mutated.
    pub fn optimize(
        &self,
        assignment: &Assignment,
        layout: &Layout,
        occupants: &[Occupant],
        mode: OptimizeMode,
    ) -> OptimizeResult {
        let grid = ClusterGrid::new(layout);
        let directory = OccupantDirectory::new(occupants);
        let current = Seating::from_assignment(&grid, assignment, &directory);
        let old_score = current.score(&grid);

        let movable: Vec<usize> = (0..grid.len())
            .filter(|&i| layout.is_movable(&grid.position(i).id))
            .collect();
        if movable.is_empty() || assignment.occupied_count() == 0 {
            tracing::debug!(movable = movable.len(), "nothing to optimize, returning input");
            return OptimizeResult::unchanged(assignment, old_score);
        }

        tracing::debug!(
            ?mode,
            positions = grid.len(),
            movable = movable.len(),
            old_score,
            "optimizing assignment"
        );

        let baseline = evict_disabled(&grid, layout, &current, &movable);
        let baseline_score = baseline.score(&grid);

        let (seating, iterations) = match mode {
            OptimizeMode::MinimalDisruption => self.refine_from(&grid, baseline, &movable),
            OptimizeMode::FullRepack => {
                let mut packed = repack(&grid, layout, &current);
                let outcome = refine(&grid, &mut packed, &movable, self.config.max_iterations);
                let packed_score = packed.score(&grid);
                if packed_score < baseline_score {
                    tracing::debug!(
                        packed_score,
                        baseline_score,
                        "re-pack scored below baseline, refining current instead"
                    );
                    self.refine_from(&grid, baseline, &movable)
                } else {
                    (packed, outcome.swaps)
                }
            }
        };

        let new_score = seating.score(&grid);
        let out = seating.to_assignment(&grid, assignment);
        let move_count = assignment.diff_count(&out);

        tracing::debug!(
            new_score,
            old_score,
            baseline_score,
            move_count,
            iterations,
            "optimization finished"
        );

        OptimizeResult {
            assignment: out,
            move_count,
            new_score,
            old_score,
            baseline_score,
            iterations,
        }
    }

    fn refine_from<'a>(
        &self,
        grid: &ClusterGrid<'_>,
        mut seating: Seating<'a>,
        movable: &[usize],
    ) -> (Seating<'a>, usize) {
        let outcome = refine(grid, &mut seating, movable, self.config.max_iterations);
        (seating, outcome.swaps)
    }
}

/// Moves occupants off disabled positions into free movable positions.
fn evict_disabled<'a>(
    grid: &ClusterGrid<'_>,
    layout: &Layout,
    current: &Seating<'a>,
    movable: &[usize],
) -> Seating<'a> {
    let mut seating = current.clone();
    let mut free = movable.iter().copied().filter(|&i| current.is_free(i));

    for i in 0..grid.len() {
        if seating.is_free(i) || !layout.is_disabled(&grid.position(i).id) {
            continue;
        }
        match free.next() {
            Some(j) => seating.swap(i, j),
            None => tracing::warn!(
                position = %grid.position(i).id,
                "disabled position occupied and no free position to evict to"
            ),
        }
    }
    seating
}

/// Optimizes with the default configuration.
///
/// See [`ClusterOptimizer::optimize`].
pub fn optimize(
    assignment: &Assignment,
    layout: &Layout,
    occupants: &[Occupant],
    mode: OptimizeMode,
) -> OptimizeResult {
    ClusterOptimizer::new().optimize(assignment, layout, occupants, mode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Position;
    use crate::optimizer::clustering_score;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::{Rng, SeedableRng};
    use std::collections::BTreeSet;

    /// Two rooms, each 3 rows × 4 columns.
    fn office() -> Layout {
        let mut layout = Layout::new();
        for room in ["North", "South"] {
            for r in 0..3 {
                for c in 0..4 {
                    let id = format!("{room}-{r}{c}");
                    layout = layout.with_position(Position::new(id, room, r, c));
                }
            }
        }
        layout
    }

    fn staff() -> Vec<Occupant> {
        let mut out = Vec::new();
        for (dept, n) in [("Eng", 7), ("Sales", 5), ("Ops", 3)] {
            for k in 0..n {
                out.push(Occupant::new(format!("{dept}{k}")).with_group(dept));
            }
        }
        out.push(Occupant::new("Visitor"));
        out
    }

    fn random_assignment(layout: &Layout, occupants: &[Occupant], rng: &mut StdRng) -> Assignment {
        let mut ids: Vec<&str> = layout.positions.iter().map(|p| p.id.as_str()).collect();
        ids.shuffle(rng);
        let count = rng.random_range(0..=occupants.len());
        let mut a = Assignment::new();
        for (k, id) in ids.iter().enumerate() {
            match occupants.get(k).filter(|_| k < count) {
                Some(o) => a = a.with(*id, o.id.clone()),
                None => a = a.with_empty(*id),
            }
        }
        a
    }

    fn random_constraints(layout: Layout, rng: &mut StdRng) -> Layout {
        let ids: Vec<String> = layout.positions.iter().map(|p| p.id.clone()).collect();
        let mut layout = layout;
        for id in ids {
            let roll = rng.random_range(0..10);
            if roll == 0 {
                layout = layout.lock(id);
            } else if roll <= 2 {
                layout = layout.disable(id);
            }
        }
        layout
    }

    fn assert_constraints(layout: &Layout, before: &Assignment, after: &Assignment) {
        assert_eq!(before.occupants(), after.occupants(), "occupant set changed");
        for id in &layout.locked {
            assert_eq!(before.occupant_at(id), after.occupant_at(id), "locked {id} changed");
        }
        // A disabled position may stay occupied only when every movable
        // position is taken.
        let full = layout
            .positions
            .iter()
            .filter(|p| layout.is_movable(&p.id))
            .all(|p| after.occupant_at(&p.id).is_some());
        for id in &layout.disabled {
            if !layout.is_locked(id) && !full {
                assert_eq!(after.occupant_at(id), None, "disabled {id} occupied");
            }
        }
    }

    #[test]
    fn test_minimal_disruption_pairs_up() {
        let layout = Layout::new()
            .with_position(Position::new("P1", "R", 0, 0))
            .with_position(Position::new("P2", "R", 0, 1))
            .with_position(Position::new("P3", "R", 0, 5));
        let occupants = vec![
            Occupant::new("a").with_group("G"),
            Occupant::new("b").with_group("G"),
        ];
        let current = Assignment::new()
            .with("P1", "a")
            .with_empty("P2")
            .with("P3", "b");

        let result = optimize(&current, &layout, &occupants, OptimizeMode::MinimalDisruption);
        assert_eq!(result.old_score, 1);
        assert_eq!(result.new_score, 3);
        assert_eq!(result.move_count, 1);
        assert_eq!(result.iterations, 1);
        assert_eq!(result.improvement(), 2);
    }

    #[test]
    fn test_full_repack_clusters_departments() {
        let layout = office();
        let occupants = staff();
        let mut rng = StdRng::seed_from_u64(7);
        let current = random_assignment(&layout, &occupants, &mut rng);

        let result = optimize(&current, &layout, &occupants, OptimizeMode::FullRepack);
        assert!(result.new_score >= result.old_score);
        assert_eq!(result.new_score, clustering_score(&result.assignment, &layout, &occupants));
        assert_constraints(&layout, &current, &result.assignment);
    }

    #[test]
    fn test_locked_and_disabled_respected() {
        let layout = office()
            .lock("North-00")
            .lock("South-23")
            .disable("North-11");
        let occupants = staff();
        let mut current = Assignment::new();
        for (p, o) in layout.positions.iter().zip(occupants.iter()) {
            current = current.with(p.id.clone(), o.id.clone());
        }
        // Put someone on the disabled desk to exercise eviction.
        assert!(current.occupant_at("North-11").is_some());

        for mode in [OptimizeMode::FullRepack, OptimizeMode::MinimalDisruption] {
            let result = optimize(&current, &layout, &occupants, mode);
            assert_constraints(&layout, &current, &result.assignment);
        }
    }

    #[test]
    fn test_random_inputs_conserve_and_improve() {
        let occupants = staff();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..25 {
            let current = random_assignment(&office(), &occupants, &mut rng);
            let layout = random_constraints(office(), &mut rng);
            for mode in [OptimizeMode::FullRepack, OptimizeMode::MinimalDisruption] {
                let result = optimize(&current, &layout, &occupants, mode);
                assert_constraints(&layout, &current, &result.assignment);
                assert!(
                    result.new_score >= result.baseline_score,
                    "{mode:?} lowered score"
                );
                assert_eq!(result.old_score, clustering_score(&current, &layout, &occupants));
                let disabled_occupied = layout
                    .disabled
                    .iter()
                    .any(|id| !layout.is_locked(id) && current.occupant_at(id).is_some());
                if !disabled_occupied {
                    assert_eq!(result.baseline_score, result.old_score);
                    assert!(result.new_score >= result.old_score);
                }
                assert_eq!(result.move_count, current.diff_count(&result.assignment));
            }
        }
    }

    #[test]
    fn test_full_repack_keeps_everyone_under_capacity_pressure() {
        // R0 is disabled, so two occupants compete for one movable seat.
        let layout = Layout::new()
            .with_position(Position::new("R0", "R", 0, 0))
            .with_position(Position::new("R1", "R", 0, 1))
            .disable("R0");
        let occupants = vec![Occupant::new("a1").with_group("A"), Occupant::new("u")];
        let current = Assignment::new().with("R0", "a1").with("R1", "u");

        for mode in [OptimizeMode::FullRepack, OptimizeMode::MinimalDisruption] {
            let result = optimize(&current, &layout, &occupants, mode);
            assert_eq!(result.assignment.occupants(), current.occupants(), "{mode:?}");
            assert_eq!(result.assignment.occupant_at("R0"), Some("a1"));
            assert_eq!(result.assignment.occupant_at("R1"), Some("u"));
        }
    }

    #[test]
    fn test_full_repack_surplus_does_not_overwrite() {
        let layout = Layout::new()
            .with_position(Position::new("R0", "R", 0, 0))
            .with_position(Position::new("R1", "R", 0, 1))
            .with_position(Position::new("R2", "R", 0, 2))
            .disable("R0");
        let occupants = vec![
            Occupant::new("a1").with_group("A"),
            Occupant::new("a2").with_group("A"),
            Occupant::new("b1").with_group("B"),
        ];
        let current = Assignment::new()
            .with("R0", "a1")
            .with("R1", "b1")
            .with("R2", "a2");

        let result = optimize(&current, &layout, &occupants, OptimizeMode::FullRepack);
        assert_eq!(result.assignment.occupants(), current.occupants());
        assert_constraints(&layout, &current, &result.assignment);
    }

    #[test]
    fn test_eviction_score_measured_from_baseline() {
        // a1 and a2 sit together, but a1's desk is disabled and the only
        // free desk is in another region.
        let layout = Layout::new()
            .with_position(Position::new("R0", "R", 0, 0))
            .with_position(Position::new("R1", "R", 0, 1))
            .with_position(Position::new("S0", "S", 0, 0))
            .disable("R0")
            .lock("R1");
        let occupants = vec![
            Occupant::new("a1").with_group("A"),
            Occupant::new("a2").with_group("A"),
        ];
        let current = Assignment::new()
            .with("R0", "a1")
            .with("R1", "a2")
            .with_empty("S0");

        for mode in [OptimizeMode::FullRepack, OptimizeMode::MinimalDisruption] {
            let result = optimize(&current, &layout, &occupants, mode);
            assert_eq!(result.old_score, 3, "{mode:?}");
            assert_eq!(result.baseline_score, 0);
            assert_eq!(result.new_score, 0);
            assert_eq!(result.assignment.occupant_at("S0"), Some("a1"));
            assert_eq!(result.assignment.occupant_at("R0"), None);
        }
    }

    #[test]
    fn test_deterministic() {
        let layout = office();
        let occupants = staff();
        let mut rng = StdRng::seed_from_u64(3);
        let current = random_assignment(&layout, &occupants, &mut rng);

        for mode in [OptimizeMode::FullRepack, OptimizeMode::MinimalDisruption] {
            let a = optimize(&current, &layout, &occupants, mode);
            let b = optimize(&current, &layout, &occupants, mode);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_degenerate_inputs_unchanged() {
        let occupants = staff();
        let empty = Assignment::new().with_empty("North-00");
        let result = optimize(&empty, &office(), &occupants, OptimizeMode::FullRepack);
        assert_eq!(result.assignment, empty);
        assert_eq!(result.move_count, 0);

        let mut all_locked = Layout::new().with_position(Position::new("P1", "R", 0, 0));
        all_locked = all_locked.lock("P1");
        let a = Assignment::new().with("P1", "Eng0");
        let result = optimize(&a, &all_locked, &occupants, OptimizeMode::FullRepack);
        assert_eq!(result.assignment, a);
        assert_eq!(result.move_count, 0);
        assert_eq!(result.iterations, 0);
    }

    #[test]
    fn test_positions_outside_layout_untouched() {
        let layout = Layout::new()
            .with_position(Position::new("P1", "R", 0, 0))
            .with_position(Position::new("P2", "R", 0, 1));
        let occupants = staff();
        let a = Assignment::new()
            .with("P1", "Eng0")
            .with_empty("P2")
            .with("Elsewhere", "Eng1");
        let result = optimize(&a, &layout, &occupants, OptimizeMode::FullRepack);
        assert_eq!(result.assignment.occupant_at("Elsewhere"), Some("Eng1"));
        let placed: BTreeSet<&str> = result.assignment.occupants();
        assert_eq!(placed, a.occupants());
    }

    #[test]
    fn test_iteration_cap_from_config() {
        let layout = office();
        let occupants = staff();
        let mut rng = StdRng::seed_from_u64(11);
        let current = random_assignment(&layout, &occupants, &mut rng);

        let optimizer = ClusterOptimizer::new().with_max_iterations(1);
        assert_eq!(optimizer.config().max_iterations, 1);
        let result =
            optimizer.optimize(&current, &layout, &occupants, OptimizeMode::MinimalDisruption);
        assert!(result.iterations <= 1);
        assert!(result.move_count <= 2);
    }

    #[test]
    fn test_optimize_request() {
        let layout = office();
        let occupants = staff();
        let mut rng = StdRng::seed_from_u64(5);
        let current = random_assignment(&layout, &occupants, &mut rng);
        let request = OptimizeRequest::new(layout.clone(), current.clone(), occupants.clone())
            .with_mode(OptimizeMode::MinimalDisruption);

        let via_request = ClusterOptimizer::new().optimize_request(&request);
        let direct = optimize(&current, &layout, &occupants, OptimizeMode::MinimalDisruption);
        assert_eq!(via_request, direct);
    }

    #[test]
    fn test_config_serde() {
        let config = OptimizerConfig::default();
        assert_eq!(config.max_iterations, 200);
        let json = serde_json::to_string(&config).unwrap();
        let back: OptimizerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
