//! Section model.
//!
//! A section is one schedulable offering of a course: it needs a contiguous
//! run of timeslots, a room that seats its enrollment and provides its
//! required equipment, and one instructor from its eligible pool. Sections
//! that share a student cohort must not overlap in time.

use serde::{Deserialize, Serialize};

/// A course section to be placed on the timetable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    /// Unique section identifier.
    pub id: String,
    /// Course name (for display).
    pub name: String,
    /// Number of enrolled students.
    pub enrollment: i32,
    /// Number of contiguous timeslots the section occupies (same day).
    pub slot_span: i32,
    /// Equipment the assigned room must provide.
    pub required_equipment: Vec<String>,
    /// Instructor ids eligible to teach this section. Must be non-empty.
    pub eligible_instructors: Vec<String>,
    /// Student cohort attending the section, if any. Sections sharing a
    /// cohort are mutually exclusive in time.
    pub cohort: Option<String>,
}

impl Section {
    /// Creates a new single-slot section.
    pub fn new(id: impl Into<String>, enrollment: i32) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            enrollment,
            slot_span: 1,
            required_equipment: Vec::new(),
            eligible_instructors: Vec::new(),
            cohort: None,
        }
    }

    /// Sets the course name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the number of contiguous timeslots required (minimum 1).
    pub fn with_slot_span(mut self, span: i32) -> Self {
        self.slot_span = span.max(1);
        self
    }

    /// Adds a required equipment item.
    pub fn with_required_equipment(mut self, item: impl Into<String>) -> Self {
        self.required_equipment.push(item.into());
        self
    }

    /// Adds an eligible instructor.
    pub fn with_instructor(mut self, instructor_id: impl Into<String>) -> Self {
        self.eligible_instructors.push(instructor_id.into());
        self
    }

    /// Sets the student cohort.
    pub fn with_cohort(mut self, cohort: impl Into<String>) -> Self {
        self.cohort = Some(cohort.into());
        self
    }
}
