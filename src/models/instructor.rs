//! Instructor model.
//!
//! Instructors carry an availability set (the timeslots they can teach in at
//! all — a hard restriction) and optional preference weights over timeslots
//! (a soft quality signal).

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// An instructor who can be assigned to sections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instructor {
    /// Unique instructor identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Timeslot ids the instructor may teach in. Assignments outside this
    /// set are hard violations.
    pub available: HashSet<String>,
    /// Preference weight per timeslot id, in [0, 1] (1.0 = most preferred).
    /// An empty map means the instructor is indifferent.
    pub preferences: HashMap<String, f64>,
}

impl Instructor {
    /// Creates a new instructor with no availability.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            available: HashSet::new(),
            preferences: HashMap::new(),
        }
    }

    /// Sets the instructor name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Marks a timeslot as available.
    pub fn with_availability(mut self, timeslot_id: impl Into<String>) -> Self {
        self.available.insert(timeslot_id.into());
        self
    }

    /// Marks several timeslots as available.
    pub fn with_availabilities<I, S>(mut self, timeslot_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.available.extend(timeslot_ids.into_iter().map(Into::into));
        self
    }

    /// Sets a preference weight for a timeslot (clamped to [0, 1]).
    pub fn with_preference(mut self, timeslot_id: impl Into<String>, weight: f64) -> Self {
        self.preferences
            .insert(timeslot_id.into(), weight.clamp(0.0, 1.0));
        self
    }

    /// Whether the instructor may teach in the given timeslot.
    pub fn is_available(&self, timeslot_id: &str) -> bool {
        self.available.contains(timeslot_id)
    }

    /// Preference weight for a timeslot.
    ///
    /// Returns 1.0 (neutral) when no preferences are declared at all;
    /// otherwise the declared weight, or 0.0 for an unlisted slot.
    pub fn preference(&self, timeslot_id: &str) -> f64 {
        if self.preferences.is_empty() {
            return 1.0;
        }
        self.preferences.get(timeslot_id).copied().unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instructor_builder() {
        let i = Instructor::new("I1")
            .with_name("Dr. Smith")
            .with_availability("MON_1")
            .with_availability("MON_2")
            .with_preference("MON_1", 0.9);

        assert_eq!(i.id, "I1");
        assert!(i.is_available("MON_1"));
        assert!(!i.is_available("TUE_1"));
    }

    #[test]
    fn test_preference_neutral_when_empty() {
        let i = Instructor::new("I1").with_availability("MON_1");
        assert!((i.preference("MON_1") - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_preference_unlisted_slot() {
        let i = Instructor::new("I1").with_preference("MON_1", 0.8);
        assert!((i.preference("MON_1") - 0.8).abs() < 1e-10);
        assert!((i.preference("MON_2") - 0.0).abs() < 1e-10);
    }

    #[test]
    fn test_preference_clamping() {
        let i = Instructor::new("I1")
            .with_preference("over", 1.5)
            .with_preference("under", -0.5);
        assert!((i.preference("over") - 1.0).abs() < 1e-10);
        assert!((i.preference("under") - 0.0).abs() < 1e-10);
    }

    #[test]
    fn test_with_availabilities() {
        let i = Instructor::new("I1").with_availabilities(["A", "B", "C"]);
        assert_eq!(i.available.len(), 3);
        assert!(i.is_available("B"));
    }
}
