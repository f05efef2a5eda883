//! Seat assignment planning for the U-Engine ecosystem.
//!
//! Provides a clustering optimizer that proposes a better assignment of
//! occupants to positions, and a move-order sequencer that turns any
//! before/after pair of assignments into an executable move plan.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Occupant`, `Position`, `Layout`,
//!   `Assignment`, `Plan`, `PlanStep`
//! - **`optimizer`**: Clustering score, group re-packing, and greedy swap
//!   refinement under locked/disabled constraints
//! - **`sequencer`**: Before/after classification, dependency-cycle
//!   detection, and ordered move plans with atomic swap groups
//! - **`validation`**: Input integrity checks for externally sourced
//!   snapshots (duplicate IDs, double placements, unknown references)
//!
//! # Architecture
//!
//! Both the optimizer and the sequencer are pure, synchronous functions
//! over caller-supplied snapshots. Neither depends on the other; a host
//! typically optimizes, then sequences the result against the current
//! assignment to get a human-followable plan.

pub mod models;
pub mod optimizer;
pub mod sequencer;
pub mod validation;
