//! Plan execution against an assignment.
//!
//! Applies steps strictly in order. The steps of a swap group are applied
//! together: every origin is vacated first, then every destination is
//! filled, so no intermediate state is observed.

use thiserror::Error;

use crate::models::{Assignment, Plan, PlanStep};

/// Reasons a plan cannot be applied to an assignment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReplayError {
    /// The step's occupant is not at its stated origin.
    #[error("step {step}: {occupant} is not at {position}")]
    OriginMismatch {
        step: usize,
        occupant: String,
        position: String,
    },

    /// The step's destination is still held by someone else.
    #[error("step {step}: {position} is still held by {holder}")]
    DestinationOccupied {
        step: usize,
        position: String,
        holder: String,
    },
}

impl Plan {
    /// Applies the plan to `from`, returning the resulting assignment.
    ///
    /// The input is not mutated. Fails on the first step whose origin or
    /// destination does not match the state at that point.
    pub fn replay(&self, from: &Assignment) -> Result<Assignment, ReplayError> {
        let mut state = from.clone();
        let mut i = 0;
        while i < self.steps.len() {
            match self.steps[i].swap_group() {
                Some(group) => {
                    let end = self.steps[i..]
                        .iter()
                        .position(|s| s.swap_group() != Some(group))
                        .map_or(self.steps.len(), |n| i + n);
                    apply_group(&mut state, &self.steps[i..end], i)?;
                    i = end;
                }
                None => {
                    apply_group(&mut state, &self.steps[i..=i], i)?;
                    i += 1;
                }
            }
        }
        Ok(state)
    }
}

/// Vacates every origin, then fills every destination.
fn apply_group(
    state: &mut Assignment,
    steps: &[PlanStep],
    first_index: usize,
) -> Result<(), ReplayError> {
    for (offset, step) in steps.iter().enumerate() {
        if let Some(origin) = step.origin() {
            if state.occupant_at(origin) != Some(step.occupant_id.as_str()) {
                return Err(ReplayError::OriginMismatch {
                    step: first_index + offset,
                    occupant: step.occupant_id.clone(),
                    position: origin.to_string(),
                });
            }
            state.vacate(origin);
        }
    }

    for (offset, step) in steps.iter().enumerate() {
        if let Some(destination) = step.destination() {
            if let Some(holder) = state.occupant_at(destination) {
                return Err(ReplayError::DestinationOccupied {
                    step: first_index + offset,
                    position: destination.to_string(),
                    holder: holder.to_string(),
                });
            }
            state.place(destination, step.occupant_id.clone());
        }
    }
    Ok(())
}
