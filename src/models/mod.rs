//! Timetabling domain models.
//!
//! Core data types for describing a university timetabling instance and its
//! solutions. All input types are immutable for the duration of a search run.
//!
//! # Entity Overview
//!
//! | Type | Role |
//! |------|------|
//! | `Section` | Course offering needing a slot run, room, instructor |
//! | `Timeslot` | Discrete (day, period) cell on the time grid |
//! | `Room` | Capacity + equipment capabilities |
//! | `Instructor` | Availability set + preference weights |
//! | `Domain` | Immutable container with index lookup tables |
//! | `TimetableSolution` | Decoded output mapping, produced at read-out |

mod domain;
mod instructor;
mod room;
mod section;
mod solution;
mod timeslot;

pub use domain::Domain;
pub use instructor::Instructor;
pub use room::Room;
pub use section::Section;
pub use solution::{SessionAssignment, TimetableSolution};
pub use timeslot::{Day, Timeslot};
