//! Genetic-algorithm engine for university course timetabling.
//!
//! Places course sections into (timeslot, room, instructor) assignments that
//! satisfy hard constraints (no double-booked instructors, rooms, or student
//! cohorts; capacity, equipment, and availability respected) and minimize
//! weighted soft penalties (instructor preferences, cohort compactness,
//! balanced teaching loads).
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Section`, `Room`, `Instructor`,
//!   `Timeslot`, `Domain`, `TimetableSolution`
//! - **`constraints`**: The rule catalog and the evaluator that scores
//!   candidates against it, with full and incremental paths
//! - **`ga`**: Chromosome codec, genetic operators, population management,
//!   and the generational engine loop
//! - **`validation`**: Input integrity checks (duplicate IDs, dangling
//!   references, unsatisfiable sections)
//!
//! # Ranking
//!
//! Candidates rank lexicographically: fewer hard violations always wins,
//! soft penalty only breaks ties. A feasible timetable with poor preferences
//! therefore always outranks an infeasible one with perfect preferences.
//!
//! # References
//!
//! - Burke & Petrovic (2002), "Recent research directions in automated
//!   timetabling"
//! - Colorni, Dorigo & Maniezzo (1998), "Metaheuristics for high school
//!   timetabling"

pub mod constraints;
pub mod error;
pub mod ga;
pub mod models;
pub mod validation;
