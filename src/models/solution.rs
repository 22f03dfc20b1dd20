//! Timetable solution model.
//!
//! The decoded, human-consumable form of a chromosome: a list of session
//! assignments mapping each section to its timeslot, room, and instructor.
//! Produced only at read-out time and never mutated during search.

use serde::{Deserialize, Serialize};

/// One section's placement on the timetable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionAssignment {
    /// Section being placed.
    pub section_id: String,
    /// Start timeslot of the section's contiguous run.
    pub timeslot_id: String,
    /// Assigned room.
    pub room_id: String,
    /// Assigned instructor.
    pub instructor_id: String,
}

impl SessionAssignment {
    /// Creates a new assignment.
    pub fn new(
        section_id: impl Into<String>,
        timeslot_id: impl Into<String>,
        room_id: impl Into<String>,
        instructor_id: impl Into<String>,
    ) -> Self {
        Self {
            section_id: section_id.into(),
            timeslot_id: timeslot_id.into(),
            room_id: room_id.into(),
            instructor_id: instructor_id.into(),
        }
    }
}

/// A complete decoded timetable: one assignment per section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimetableSolution {
    /// Session assignments, in section order.
    pub assignments: Vec<SessionAssignment>,
}

impl TimetableSolution {
    /// Creates an empty solution.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an assignment.
    pub fn add_assignment(&mut self, assignment: SessionAssignment) {
        self.assignments.push(assignment);
    }

    /// Finds the assignment for a given section.
    pub fn assignment_for_section(&self, section_id: &str) -> Option<&SessionAssignment> {
        self.assignments
            .iter()
            .find(|a| a.section_id == section_id)
    }

    /// Returns all assignments held by a given instructor.
    pub fn assignments_for_instructor(&self, instructor_id: &str) -> Vec<&SessionAssignment> {
        self.assignments
            .iter()
            .filter(|a| a.instructor_id == instructor_id)
            .collect()
    }

    /// Returns all assignments placed in a given room.
    pub fn assignments_for_room(&self, room_id: &str) -> Vec<&SessionAssignment> {
        self.assignments
            .iter()
            .filter(|a| a.room_id == room_id)
            .collect()
    }

    /// Number of assignments.
    pub fn assignment_count(&self) -> usize {
        self.assignments.len()
    }
}
