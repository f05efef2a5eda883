//! Clustering optimizer.
//!
//! Scores an assignment by how closely same-group occupants sit and
//! searches for a better one under locked/disabled constraints.
//!
//! # Algorithm
//!
//! `ClusterOptimizer` builds a starting point (a group-by-region re-pack,
//! or the current assignment) and improves it with a deterministic
//! best-improvement pairwise-swap hill climb.
//!
//! # KPI
//!
//! `ClusterKpi` breaks the score into adjacent/region pairs and reports
//! how many regions each group spans.
//!
//! # References
//!
//! - Aarts & Lenstra (2003), "Local Search in Combinatorial Optimization", Ch. 1
//! - Muther (1973), "Systematic Layout Planning"

mod engine;
mod kpi;
mod refine;
mod repack;
mod score;
mod seating;

pub use engine::{
    optimize, ClusterOptimizer, OptimizeMode, OptimizeRequest, OptimizeResult, OptimizerConfig,
    DEFAULT_MAX_ITERATIONS,
};
pub use kpi::ClusterKpi;
pub use score::{clustering_score, swap_delta, ADJACENT_WEIGHT, REGION_WEIGHT};
