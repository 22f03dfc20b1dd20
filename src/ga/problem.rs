//! Timetabling GA problem definition.
//!
//! Bridges the domain model to the search: precomputes per-section eligible
//! sets (the only universe operators draw from), owns the chromosome codec
//! (encode / decode / validate), and exposes constraint evaluation.
//!
//! # Reference
//! Colorni, Dorigo & Maniezzo (1998), "Metaheuristics for high school
//! timetabling"

use std::collections::HashMap;

use rand::Rng;

use super::chromosome::{Chromosome, Gene};
use super::fitness::Evaluation;
use crate::constraints::{ConstraintConfig, Evaluator, EvaluationBreakdown};
use crate::error::EngineError;
use crate::models::{Domain, SessionAssignment, TimetableSolution};
use crate::validation::{validate_domain, ValidationError, ValidationErrorKind};

/// Compact per-section descriptor for GA encoding.
///
/// Extracted once from the domain so operators never touch full model
/// objects in the hot path.
#[derive(Debug, Clone)]
pub struct SectionInfo {
    /// Section id (for decode).
    pub section_id: String,
    /// Contiguous slots required.
    pub span: i32,
    /// Enrolled students.
    pub enrollment: i32,
    /// Timeslot indices a run may start at.
    pub eligible_starts: Vec<usize>,
    /// Expanded contiguous run per eligible start (parallel vector).
    pub eligible_runs: Vec<Vec<usize>>,
    /// Room indices meeting capacity and equipment requirements.
    pub eligible_rooms: Vec<usize>,
    /// Instructor indices from the section's pool.
    pub eligible_instructors: Vec<usize>,
    /// Interned cohort index, shared by sections of the same cohort.
    pub cohort: Option<usize>,
}

/// GA problem definition for one timetabling instance.
///
/// Owns the immutable domain, the active constraint configuration, and the
/// precomputed eligible sets. Construction fails with
/// [`EngineError::InvalidDomainData`] when the instance is structurally
/// broken or unsatisfiable by construction.
#[derive(Debug, Clone)]
pub struct TimetableProblem {
    domain: Domain,
    constraints: ConstraintConfig,
    infos: Vec<SectionInfo>,
}

impl TimetableProblem {
    /// Builds a problem from a domain and constraint configuration.
    pub fn new(domain: Domain, constraints: ConstraintConfig) -> Result<Self, EngineError> {
        validate_domain(&domain).map_err(EngineError::InvalidDomainData)?;

        let infos = Self::build_infos(&domain)?;
        Ok(Self {
            domain,
            constraints,
            infos,
        })
    }

    fn build_infos(domain: &Domain) -> Result<Vec<SectionInfo>, EngineError> {
        let mut errors: Vec<ValidationError> = Vec::new();
        let mut cohorts: HashMap<&str, usize> = HashMap::new();
        let mut infos = Vec::with_capacity(domain.section_count());

        for section in &domain.sections {
            let eligible_rooms: Vec<usize> = domain
                .rooms
                .iter()
                .enumerate()
                .filter(|(_, room)| {
                    room.capacity >= section.enrollment
                        && room.satisfies(&section.required_equipment)
                })
                .map(|(idx, _)| idx)
                .collect();
            if eligible_rooms.is_empty() {
                errors.push(ValidationError {
                    kind: ValidationErrorKind::UnsatisfiableSection,
                    message: format!(
                        "Section '{}' has no room meeting capacity {} and equipment {:?}",
                        section.id, section.enrollment, section.required_equipment
                    ),
                });
            }

            // Validation guarantees the references resolve; still refuse to
            // build a section whose resolved pool came out empty rather than
            // hand the operators an empty eligible set.
            let eligible_instructors: Vec<usize> = section
                .eligible_instructors
                .iter()
                .filter_map(|id| domain.instructor_idx(id))
                .collect();
            if eligible_instructors.is_empty() {
                errors.push(ValidationError {
                    kind: ValidationErrorKind::UnsatisfiableSection,
                    message: format!(
                        "Section '{}' has no resolvable eligible instructors",
                        section.id
                    ),
                });
            }

            // A start is eligible when the run fits inside the day and at
            // least one pool instructor is available for the whole run.
            let mut eligible_starts = Vec::new();
            let mut eligible_runs = Vec::new();
            for start in 0..domain.timeslots.len() {
                let Some(run) = domain.contiguous_run(start, section.slot_span) else {
                    continue;
                };
                let covered = eligible_instructors.iter().any(|&ins| {
                    run.iter().all(|&slot| {
                        domain.instructors[ins].is_available(&domain.timeslots[slot].id)
                    })
                });
                if covered {
                    eligible_starts.push(start);
                    eligible_runs.push(run);
                }
            }
            if eligible_starts.is_empty() && !eligible_instructors.is_empty() {
                errors.push(ValidationError {
                    kind: ValidationErrorKind::UnsatisfiableSection,
                    message: format!(
                        "Section '{}' has no feasible start slot for span {}",
                        section.id, section.slot_span
                    ),
                });
            }

            let cohort = section.cohort.as_deref().map(|name| {
                let next = cohorts.len();
                *cohorts.entry(name).or_insert(next)
            });

            infos.push(SectionInfo {
                section_id: section.id.clone(),
                span: section.slot_span,
                enrollment: section.enrollment,
                eligible_starts,
                eligible_runs,
                eligible_rooms,
                eligible_instructors,
                cohort,
            });
        }

        if errors.is_empty() {
            Ok(infos)
        } else {
            Err(EngineError::InvalidDomainData(errors))
        }
    }

    /// The immutable domain description.
    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    /// The active constraint configuration.
    pub fn constraints(&self) -> &ConstraintConfig {
        &self.constraints
    }

    /// Per-section eligible sets.
    pub fn infos(&self) -> &[SectionInfo] {
        &self.infos
    }

    /// Creates an initial chromosome: 50% uniform random, 50% load-balanced.
    pub fn create_chromosome<R: Rng>(&self, rng: &mut R) -> Chromosome {
        if rng.random_bool(0.5) {
            Chromosome::random(&self.infos, rng)
        } else {
            Chromosome::balanced(&self.infos, rng)
        }
    }

    /// Structural validity: length and eligible-set membership per gene.
    pub fn validate_chromosome(&self, chromosome: &Chromosome) -> bool {
        chromosome.is_valid(&self.infos)
    }

    // ======================== Codec ========================

    /// Decodes a chromosome into its human-consumable timetable.
    pub fn decode(&self, chromosome: &Chromosome) -> TimetableSolution {
        let mut solution = TimetableSolution::new();
        for (info, gene) in self.infos.iter().zip(&chromosome.genes) {
            solution.add_assignment(SessionAssignment::new(
                &info.section_id,
                &self.domain.timeslots[gene.timeslot].id,
                &self.domain.rooms[gene.room].id,
                &self.domain.instructors[gene.instructor].id,
            ));
        }
        solution
    }

    /// Encodes a timetable back into a chromosome.
    ///
    /// Fails with [`EngineError::InvalidDomainData`] on a missing section
    /// assignment or a dangling id — malformed input is never silently
    /// repaired.
    pub fn encode(&self, solution: &TimetableSolution) -> Result<Chromosome, EngineError> {
        let mut genes = Vec::with_capacity(self.infos.len());
        for info in &self.infos {
            let assignment = solution
                .assignment_for_section(&info.section_id)
                .ok_or_else(|| {
                    EngineError::unsatisfiable(format!(
                        "Solution has no assignment for section '{}'",
                        info.section_id
                    ))
                })?;
            let timeslot = self
                .domain
                .timeslot_idx(&assignment.timeslot_id)
                .ok_or_else(|| {
                    EngineError::unsatisfiable(format!(
                        "Unknown timeslot id '{}'",
                        assignment.timeslot_id
                    ))
                })?;
            let room = self.domain.room_idx(&assignment.room_id).ok_or_else(|| {
                EngineError::unsatisfiable(format!("Unknown room id '{}'", assignment.room_id))
            })?;
            let instructor = self
                .domain
                .instructor_idx(&assignment.instructor_id)
                .ok_or_else(|| {
                    EngineError::unsatisfiable(format!(
                        "Unknown instructor id '{}'",
                        assignment.instructor_id
                    ))
                })?;
            genes.push(Gene {
                timeslot,
                room,
                instructor,
            });
        }
        Ok(Chromosome { genes })
    }

    // ======================== Evaluation ========================

    /// Full constraint evaluation of a chromosome.
    pub fn evaluate(&self, chromosome: &Chromosome) -> Evaluation {
        Evaluator::new(&self.domain, &self.constraints, &self.infos).evaluate(chromosome)
    }

    /// Incremental re-evaluation after replacing one gene.
    ///
    /// `base` must be the evaluation of `chromosome` as-is; the result is
    /// the evaluation of the chromosome with `new_gene` at `section`,
    /// bit-identical to a full recompute.
    pub fn evaluate_delta(
        &self,
        chromosome: &Chromosome,
        section: usize,
        new_gene: Gene,
        base: Evaluation,
    ) -> Evaluation {
        Evaluator::new(&self.domain, &self.constraints, &self.infos)
            .evaluate_delta(chromosome, section, new_gene, base)
    }

    /// Per-rule evaluation breakdown, for result diagnostics.
    pub fn breakdown(&self, chromosome: &Chromosome) -> EvaluationBreakdown {
        Evaluator::new(&self.domain, &self.constraints, &self.infos).breakdown(chromosome)
    }
}
