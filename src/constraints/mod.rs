//! Timetabling constraints.
//!
//! Defines the rule catalog a timetable is scored against and the evaluator
//! that applies it. Hard rules make a timetable unusable when violated; soft
//! rules degrade its quality by a weighted penalty.
//!
//! The active rule set is configuration data, not hard-coded logic: the
//! evaluator only applies the rules listed in [`ConstraintConfig`].
//!
//! # Reference
//! Burke & Petrovic (2002), "Recent research directions in automated
//! timetabling"

mod evaluator;

pub use evaluator::{Evaluator, EvaluationBreakdown};

use serde::{Deserialize, Serialize};

/// A hard constraint rule. One violation of any active hard rule makes the
/// timetable infeasible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HardRule {
    /// An instructor teaches two overlapping sections.
    InstructorConflict,
    /// A room hosts two overlapping sections.
    RoomConflict,
    /// Two sections of the same student cohort overlap.
    CohortConflict,
    /// A room seats fewer students than the section enrolls.
    RoomCapacity,
    /// A room is missing equipment the section requires.
    RoomEquipment,
    /// A section occupies a slot outside its instructor's availability.
    InstructorAvailability,
}

impl HardRule {
    /// All hard rules.
    pub const ALL: [HardRule; 6] = [
        HardRule::InstructorConflict,
        HardRule::RoomConflict,
        HardRule::CohortConflict,
        HardRule::RoomCapacity,
        HardRule::RoomEquipment,
        HardRule::InstructorAvailability,
    ];
}

/// A soft constraint category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoftRuleKind {
    /// Penalize slots the instructor does not prefer.
    InstructorPreference,
    /// Penalize idle periods inside a cohort's day.
    CohortCompactness,
    /// Penalize uneven daily teaching load per instructor.
    InstructorLoadBalance,
}

/// A weighted soft constraint rule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoftRule {
    /// Rule category.
    pub kind: SoftRuleKind,
    /// Penalty weight (multiplies the rule's raw penalty).
    pub weight: f64,
}

impl SoftRule {
    /// Creates a weighted soft rule.
    pub fn new(kind: SoftRuleKind, weight: f64) -> Self {
        Self { kind, weight }
    }
}

/// The active constraint set for a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConstraintConfig {
    /// Active hard rules.
    pub hard: Vec<HardRule>,
    /// Active soft rules with weights.
    pub soft: Vec<SoftRule>,
}

impl ConstraintConfig {
    /// Creates an empty configuration (no rules active).
    pub fn new() -> Self {
        Self {
            hard: Vec::new(),
            soft: Vec::new(),
        }
    }

    /// The standard catalog: every hard rule, all soft rules at weight 1.0.
    pub fn standard() -> Self {
        Self {
            hard: HardRule::ALL.to_vec(),
            soft: vec![
                SoftRule::new(SoftRuleKind::InstructorPreference, 1.0),
                SoftRule::new(SoftRuleKind::CohortCompactness, 1.0),
                SoftRule::new(SoftRuleKind::InstructorLoadBalance, 1.0),
            ],
        }
    }

    /// Only hard rules, no soft scoring.
    pub fn hard_only() -> Self {
        Self {
            hard: HardRule::ALL.to_vec(),
            soft: Vec::new(),
        }
    }

    /// Adds a hard rule.
    pub fn with_hard(mut self, rule: HardRule) -> Self {
        self.hard.push(rule);
        self
    }

    /// Adds a weighted soft rule.
    pub fn with_soft(mut self, kind: SoftRuleKind, weight: f64) -> Self {
        self.soft.push(SoftRule::new(kind, weight));
        self
    }

    /// Whether a hard rule is active.
    pub fn has_hard(&self, rule: HardRule) -> bool {
        self.hard.contains(&rule)
    }

    /// Weight of a soft rule, or `None` when inactive.
    pub fn soft_weight(&self, kind: SoftRuleKind) -> Option<f64> {
        self.soft.iter().find(|r| r.kind == kind).map(|r| r.weight)
    }
}

impl Default for ConstraintConfig {
    fn default() -> Self {
        Self::standard()
    }
}
