//! Input validation for timetabling domains.
//!
//! Checks structural integrity of the domain description before any search
//! runs. Detects:
//! - Duplicate ids
//! - Dangling instructor references
//! - Sections with an empty instructor pool
//! - Sections with a non-positive slot span
//! - Empty timeslot / room universes
//! - Duplicate (day, period) grid cells
//!
//! All problems are collected and reported together rather than failing on
//! the first one.

use crate::models::Domain;
use std::collections::HashSet;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same id.
    DuplicateId,
    /// A section references an instructor that doesn't exist.
    InvalidInstructorReference,
    /// A section has no eligible instructors.
    EmptyInstructorPool,
    /// A section declares a slot span below 1.
    InvalidSlotSpan,
    /// The domain has no rooms or no timeslots.
    EmptyDomain,
    /// No room or timeslot combination can serve a section (e.g., a required
    /// room capability no room provides). Detected during eligible-set
    /// construction.
    UnsatisfiableSection,
    /// Two timeslots occupy the same (day, period) cell.
    DuplicateGridCell,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates the structural integrity of a domain description.
///
/// Checks:
/// 1. At least one room and one timeslot exist
/// 2. No duplicate section / room / instructor / timeslot ids
/// 3. No two timeslots on the same (day, period) cell
/// 4. Every section lists at least one eligible instructor
/// 5. Every eligible-instructor reference resolves
/// 6. Every section's slot span is at least 1
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_domain(domain: &Domain) -> ValidationResult {
    let mut errors = Vec::new();

    if domain.rooms.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyDomain,
            "Domain has no rooms",
        ));
    }
    if domain.timeslots.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyDomain,
            "Domain has no timeslots",
        ));
    }

    let mut room_ids = HashSet::new();
    for r in &domain.rooms {
        if !room_ids.insert(r.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate room id: {}", r.id),
            ));
        }
    }

    let mut instructor_ids = HashSet::new();
    for i in &domain.instructors {
        if !instructor_ids.insert(i.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate instructor id: {}", i.id),
            ));
        }
    }

    let mut timeslot_ids = HashSet::new();
    let mut grid_cells = HashSet::new();
    for t in &domain.timeslots {
        if !timeslot_ids.insert(t.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate timeslot id: {}", t.id),
            ));
        }
        if !grid_cells.insert((t.day, t.period)) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateGridCell,
                format!("Timeslot '{}' duplicates grid cell {:?}/{}", t.id, t.day, t.period),
            ));
        }
    }

    let mut section_ids = HashSet::new();
    for s in &domain.sections {
        if !section_ids.insert(s.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate section id: {}", s.id),
            ));
        }

        if s.eligible_instructors.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyInstructorPool,
                format!("Section '{}' has no eligible instructors", s.id),
            ));
        }

        // The builder clamps to 1, but the field is public.
        if s.slot_span < 1 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidSlotSpan,
                format!("Section '{}' has slot span {}", s.id, s.slot_span),
            ));
        }

        for ins in &s.eligible_instructors {
            if !instructor_ids.contains(ins.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidInstructorReference,
                    format!("Section '{}' references unknown instructor '{}'", s.id, ins),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
