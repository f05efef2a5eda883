//! Seat assignment domain models.
//!
//! Provides the data types shared by the optimizer and the sequencer.
//! All of them are plain snapshots supplied by the caller; nothing here
//! outlives a single planning call.
//!
//! # Domain Mappings
//!
//! | u-seating | Office | Venue | Warehouse |
//! |-----------|--------|-------|-----------|
//! | Occupant | Employee | Guest | Pallet |
//! | Group | Department | Party | SKU family |
//! | Position | Desk | Seat | Slot |
//! | Region | Room/Zone | Table | Aisle |
//! | Plan | Move list | Reseating order | Pick/put list |

mod assignment;
mod occupant;
mod plan;
mod position;

pub use assignment::Assignment;
pub use occupant::{Occupant, OccupantDirectory};
pub use plan::{CoMover, Plan, PlanStep, PlanSummary, PositionLabels, StepKind};
pub use position::{Layout, Position};
