//! Timeslot model.
//!
//! The schedulable time axis is a finite grid of discrete slots, one per
//! (day, period) cell. Sections that need more than one period occupy a
//! contiguous run of slots on the same day.
//!
//! # Reference
//! Schaerf (1999), "A Survey of Automated Timetabling"

use serde::{Deserialize, Serialize};

/// Day of the week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Day {
    /// All days, in week order.
    pub const ALL: [Day; 7] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
        Day::Sunday,
    ];
}

/// A discrete schedulable interval: one period on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeslot {
    /// Unique timeslot identifier.
    pub id: String,
    /// Day of the week.
    pub day: Day,
    /// Period index within the day (0-based, consecutive periods are adjacent).
    pub period: i32,
}

impl Timeslot {
    /// Creates a new timeslot.
    pub fn new(id: impl Into<String>, day: Day, period: i32) -> Self {
        Self {
            id: id.into(),
            day,
            period,
        }
    }

    /// Whether `other` is the slot immediately after this one on the same day.
    pub fn precedes(&self, other: &Timeslot) -> bool {
        self.day == other.day && other.period == self.period + 1
    }
}
