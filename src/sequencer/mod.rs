//! Move-order sequencer.
//!
//! Turns a before/after pair of assignments into an ordered list of
//! individually executable moves, grouping mutually dependent moves
//! (rotations) into atomic swap groups.
//!
//! # Usage
//!
//! ```
//! use u_seating::models::Assignment;
//! use u_seating::sequencer::compute_move_plan;
//!
//! let from = Assignment::new().with("P1", "A").with_empty("P2");
//! let to = Assignment::new().with_empty("P1").with("P2", "A");
//!
//! let plan = compute_move_plan(&from, &to, &[], None);
//! assert_eq!(plan.len(), 1);
//! assert_eq!(plan.steps[0].origin(), Some("P1"));
//! assert_eq!(plan.steps[0].destination(), Some("P2"));
//! assert!(plan.replay(&from).unwrap().same_placement(&to));
//! ```
//!
//! # References
//!
//! - Cormen et al. (2009), "Introduction to Algorithms", Ch. 22 (DFS, topological sort)
//! - Knuth (1997), "The Art of Computer Programming", Vol. 1, §1.3.3 (permutation cycles)

mod classify;
mod graph;
mod planner;
mod replay;

pub use classify::{classify, Change, OccupantChange};
pub use planner::{compute_move_plan, MovePlanner};
pub use replay::ReplayError;
