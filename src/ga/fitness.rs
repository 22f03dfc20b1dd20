//! Fitness scoring.
//!
//! An [`Evaluation`] is the constraint evaluator's verdict on one chromosome:
//! the hard-violation count and the accumulated soft penalty. Ranking is
//! lexicographic — fewer hard violations always wins, soft penalty only
//! breaks ties among equally-feasible candidates — so the search drives
//! toward feasibility before it optimizes preferences.
//!
//! Soft penalties are accumulated in integer milli-units so that incremental
//! re-evaluation after a single-gene change is bit-identical to a full
//! recompute (integer addition is order-independent; float summation is not).

use serde::{Deserialize, Serialize};

/// Scalar-fitness weight of one hard violation. Large enough that any
/// feasible candidate's scalar fitness exceeds any infeasible one's in
/// practice; ranking itself never relies on it.
pub const HARD_PENALTY: f64 = 1_000_000.0;

/// Soft penalty milli-unit scale.
pub const SOFT_SCALE: f64 = 1000.0;

/// Constraint evaluation of a single chromosome.
///
/// Ordering is derived lexicographically over (hard violations, soft units):
/// `a < b` means `a` is the better timetable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Evaluation {
    /// Total count of hard-rule violations.
    pub hard_violations: u32,
    /// Weighted soft penalty in milli-units.
    pub soft_units: i64,
}

impl Evaluation {
    /// A perfect score: no violations, no penalty.
    pub fn zero() -> Self {
        Self {
            hard_violations: 0,
            soft_units: 0,
        }
    }

    /// Creates an evaluation from raw counts.
    pub fn new(hard_violations: u32, soft_units: i64) -> Self {
        Self {
            hard_violations,
            soft_units,
        }
    }

    /// Weighted soft penalty as a float.
    pub fn soft_penalty(&self) -> f64 {
        self.soft_units as f64 / SOFT_SCALE
    }

    /// Whether the timetable satisfies every active hard rule.
    pub fn is_feasible(&self) -> bool {
        self.hard_violations == 0
    }

    /// Scalar fitness: higher is better, feasible solutions dominate.
    ///
    /// Used for diagnostics history and fitness-proportional selection;
    /// ranking decisions use the lexicographic `Ord` instead.
    pub fn fitness(&self) -> f64 {
        -(HARD_PENALTY * self.hard_violations as f64 + self.soft_penalty())
    }

    /// Strictly positive selection weight for fitness-proportional sampling.
    ///
    /// Never zero, so an all-infeasible population still has a valid
    /// sampling distribution.
    pub fn selection_weight(&self) -> f64 {
        1.0 / (1.0 + HARD_PENALTY * self.hard_violations as f64 + self.soft_penalty())
    }

    /// Whether `self` strictly outranks `other`.
    pub fn ranks_above(&self, other: &Evaluation) -> bool {
        self < other
    }
}

/// Converts a weighted soft penalty term to milli-units.
pub(crate) fn soft_units(term: f64) -> i64 {
    (term * SOFT_SCALE).round() as i64
}
