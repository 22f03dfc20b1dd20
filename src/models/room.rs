//! Room model.
//!
//! Rooms are the spatial resources of a timetable: lecture halls, seminar
//! rooms, labs. Each room has a seating capacity and a set of equipment
//! capabilities (projector, lab benches, ...) that sections may require.

use serde::{Deserialize, Serialize};

/// A room that sections can be scheduled into.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    /// Unique room identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Maximum number of students.
    pub capacity: i32,
    /// Equipment capabilities (e.g., "projector", "lab").
    pub equipment: Vec<String>,
}

impl Room {
    /// Creates a new room with the given capacity.
    pub fn new(id: impl Into<String>, capacity: i32) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            capacity,
            equipment: Vec::new(),
        }
    }

    /// Sets the room name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Adds an equipment capability.
    pub fn with_equipment(mut self, item: impl Into<String>) -> Self {
        self.equipment.push(item.into());
        self
    }

    /// Whether the room provides a given equipment item.
    pub fn has_equipment(&self, item: &str) -> bool {
        self.equipment.iter().any(|e| e == item)
    }

    /// Whether the room satisfies all of the given equipment requirements.
    pub fn satisfies(&self, required: &[String]) -> bool {
        required.iter().all(|item| self.has_equipment(item))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_builder() {
        let r = Room::new("R101", 60)
            .with_name("Lecture Hall 101")
            .with_equipment("projector")
            .with_equipment("whiteboard");

        assert_eq!(r.id, "R101");
        assert_eq!(r.capacity, 60);
        assert!(r.has_equipment("projector"));
        assert!(!r.has_equipment("lab"));
    }

    #[test]
    fn test_satisfies() {
        let r = Room::new("L1", 30).with_equipment("lab").with_equipment("projector");

        assert!(r.satisfies(&["lab".into()]));
        assert!(r.satisfies(&["lab".into(), "projector".into()]));
        assert!(!r.satisfies(&["lab".into(), "smartboard".into()]));
        assert!(r.satisfies(&[]));
    }
}
