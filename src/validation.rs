//! Input validation for seat assignment snapshots.
//!
//! The optimizer and sequencer never fail: unknown references are treated
//! as empty positions or unnamed occupants. Snapshots that come from
//! outside (shared links, imported files) should be checked here first.
//! Detects:
//! - Duplicate position or occupant IDs
//! - An occupant placed on more than one position
//! - Assignment keys that are not layout positions
//! - Placed occupants missing from the directory
//! - Locked/disabled references to unknown positions
//! - Positions both locked and disabled

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::models::{Assignment, Layout, Occupant};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind:?}: {message}")]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// An occupant appears on more than one position.
    DuplicatePlacement,
    /// A position reference does not match any layout position.
    UnknownPosition,
    /// A placed occupant is not in the occupant directory.
    UnknownOccupant,
    /// A position is both locked and disabled.
    ConflictingConstraint,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a layout, an assignment over it, and the occupant directory.
///
/// Checks:
/// 1. No duplicate position IDs
/// 2. No duplicate occupant IDs
/// 3. Locked/disabled IDs refer to layout positions
/// 4. No position is both locked and disabled
/// 5. Every assignment key is a layout position
/// 6. Every placed occupant is in the directory
/// 7. No occupant is placed twice
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_snapshot(
    layout: &Layout,
    assignment: &Assignment,
    occupants: &[Occupant],
) -> ValidationResult {
    let mut errors = Vec::new();

    let mut position_ids = HashSet::new();
    for p in &layout.positions {
        if !position_ids.insert(p.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate position ID: {}", p.id),
            ));
        }
    }

    let mut occupant_ids = HashSet::new();
    for o in occupants {
        if !occupant_ids.insert(o.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate occupant ID: {}", o.id),
            ));
        }
    }

    for (label, ids) in [("Locked", &layout.locked), ("Disabled", &layout.disabled)] {
        for id in ids {
            if !position_ids.contains(id.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownPosition,
                    format!("{label} position '{id}' is not in the layout"),
                ));
            }
        }
    }

    for id in layout.locked.intersection(&layout.disabled) {
        errors.push(ValidationError::new(
            ValidationErrorKind::ConflictingConstraint,
            format!("Position '{id}' is both locked and disabled"),
        ));
    }

    errors.extend(check_assignment(assignment, &position_ids, &occupant_ids));

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates a bare assignment: no occupant placed twice.
///
/// Useful for sequencer inputs, which need no layout.
pub fn validate_assignment(assignment: &Assignment) -> ValidationResult {
    let errors = duplicate_placements(assignment);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_assignment(
    assignment: &Assignment,
    position_ids: &HashSet<&str>,
    occupant_ids: &HashSet<&str>,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for (position, occupant) in assignment.iter() {
        if !position_ids.contains(position) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownPosition,
                format!("Assignment references unknown position '{position}'"),
            ));
        }
        if let Some(o) = occupant {
            if !occupant_ids.contains(o) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownOccupant,
                    format!("Position '{position}' holds unknown occupant '{o}'"),
                ));
            }
        }
    }

    errors.extend(duplicate_placements(assignment));
    errors
}

fn duplicate_placements(assignment: &Assignment) -> Vec<ValidationError> {
    let mut seen: HashMap<&str, &str> = HashMap::new();
    let mut errors = Vec::new();
    for (position, occupant) in assignment.occupied() {
        if let Some(first) = seen.insert(occupant, position) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicatePlacement,
                format!("Occupant '{occupant}' is placed at both '{first}' and '{position}'"),
            ));
        }
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Position;

    fn sample_layout() -> Layout {
        Layout::new()
            .with_position(Position::new("P1", "R1", 0, 0))
            .with_position(Position::new("P2", "R1", 0, 1))
            .with_position(Position::new("P3", "R2", 0, 0))
    }

    fn sample_occupants() -> Vec<Occupant> {
        vec![
            Occupant::new("A").with_group("Eng"),
            Occupant::new("B").with_group("Ops"),
        ]
    }

    fn has(errors: &[ValidationError], kind: ValidationErrorKind) -> bool {
        errors.iter().any(|e| e.kind == kind)
    }

    #[test]
    fn test_valid_snapshot() {
        let a = Assignment::new()
            .with("P1", "A")
            .with("P2", "B")
            .with_empty("P3");
        assert!(validate_snapshot(&sample_layout(), &a, &sample_occupants()).is_ok());
    }

    #[test]
    fn test_duplicate_position_id() {
        let layout = sample_layout().with_position(Position::new("P1", "R3", 9, 9));
        let errors = validate_snapshot(&layout, &Assignment::new(), &[]).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateId && e.message.contains("position")));
    }

    #[test]
    fn test_duplicate_occupant_id() {
        let occupants = vec![Occupant::new("A"), Occupant::new("A")];
        let errors =
            validate_snapshot(&sample_layout(), &Assignment::new(), &occupants).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateId && e.message.contains("occupant")));
    }

    #[test]
    fn test_duplicate_placement() {
        let a = Assignment::new().with("P1", "A").with("P3", "A");
        let errors = validate_snapshot(&sample_layout(), &a, &sample_occupants()).unwrap_err();
        assert!(has(&errors, ValidationErrorKind::DuplicatePlacement));
        assert!(validate_assignment(&a).is_err());
    }

    #[test]
    fn test_unknown_references() {
        let a = Assignment::new().with("P9", "A").with("P1", "Z");
        let errors = validate_snapshot(&sample_layout(), &a, &sample_occupants()).unwrap_err();
        assert!(has(&errors, ValidationErrorKind::UnknownPosition));
        assert!(has(&errors, ValidationErrorKind::UnknownOccupant));
    }

    #[test]
    fn test_constraint_references() {
        let layout = sample_layout().lock("P1").disable("P1").lock("Nowhere");
        let errors = validate_snapshot(&layout, &Assignment::new(), &[]).unwrap_err();
        assert!(has(&errors, ValidationErrorKind::ConflictingConstraint));
        assert!(errors.iter().any(|e| {
            e.kind == ValidationErrorKind::UnknownPosition && e.message.contains("Nowhere")
        }));
    }

    #[test]
    fn test_multiple_errors() {
        let layout = sample_layout().disable("Ghost");
        let a = Assignment::new()
            .with("P1", "A")
            .with("P2", "A")
            .with("P7", "Q");
        let errors = validate_snapshot(&layout, &a, &sample_occupants()).unwrap_err();
        assert!(errors.len() >= 4);
    }

    #[test]
    fn test_error_display() {
        let a = Assignment::new().with("P1", "A").with("P2", "A");
        let errors = validate_assignment(&a).unwrap_err();
        assert_eq!(
            errors[0].to_string(),
            "DuplicatePlacement: Occupant 'A' is placed at both 'P1' and 'P2'"
        );
    }

    #[test]
    fn test_valid_assignment() {
        let a = Assignment::new().with("P1", "A").with_empty("P2");
        assert!(validate_assignment(&a).is_ok());
    }
}
