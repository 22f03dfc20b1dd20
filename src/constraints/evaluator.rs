//! Constraint evaluation.
//!
//! Scores a chromosome against the active rule set. Two paths exist and
//! must agree exactly: [`Evaluator::evaluate`] recomputes from scratch,
//! [`Evaluator::evaluate_delta`] updates a known evaluation after a single
//! gene replacement by re-scoring only the touched section's pairwise terms
//! and the affected instructor/cohort aggregates.
//!
//! Evaluation is deterministic: no randomness, and soft penalties accumulate
//! in integer milli-units so summation order cannot perturb the result.

use std::collections::{BTreeSet, HashMap};

use super::{ConstraintConfig, HardRule, SoftRuleKind};
use crate::ga::{soft_units, Chromosome, Evaluation, Gene, SectionInfo};
use crate::models::{Day, Domain};

/// Per-rule score breakdown, produced at read-out time.
#[derive(Debug, Clone)]
pub struct EvaluationBreakdown {
    /// Violation count per active hard rule.
    pub hard: Vec<(HardRule, u32)>,
    /// Weighted penalty per active soft rule.
    pub soft: Vec<(SoftRuleKind, f64)>,
}

/// Applies a [`ConstraintConfig`] to chromosomes of one problem instance.
pub struct Evaluator<'a> {
    domain: &'a Domain,
    config: &'a ConstraintConfig,
    infos: &'a [SectionInfo],
}

impl<'a> Evaluator<'a> {
    /// Creates an evaluator over the given domain, rule set, and section
    /// descriptors.
    pub fn new(domain: &'a Domain, config: &'a ConstraintConfig, infos: &'a [SectionInfo]) -> Self {
        Self {
            domain,
            config,
            infos,
        }
    }

    /// Occupied slot run for a gene. A start that cannot host the section's
    /// span is a structural invariant violation and aborts.
    fn run_of(&self, section: usize, gene: Gene) -> Vec<usize> {
        self.domain
            .contiguous_run(gene.timeslot, self.infos[section].span)
            .expect("gene start slot does not admit the section's slot span")
    }

    /// Full evaluation of a chromosome.
    pub fn evaluate(&self, chromosome: &Chromosome) -> Evaluation {
        let runs: Vec<Vec<usize>> = chromosome
            .genes
            .iter()
            .enumerate()
            .map(|(i, &g)| self.run_of(i, g))
            .collect();

        let mut hard = 0u32;
        let mut units = 0i64;

        for (i, &gene) in chromosome.genes.iter().enumerate() {
            hard += self.unary_hard(i, gene, &runs[i]);
            units += self.preference_units(gene, &runs[i]);
        }

        for i in 0..chromosome.genes.len() {
            for j in (i + 1)..chromosome.genes.len() {
                hard += self.pair_hard(
                    i,
                    chromosome.genes[i],
                    &runs[i],
                    j,
                    chromosome.genes[j],
                    &runs[j],
                );
            }
        }

        for cohort in 0..self.cohort_count() {
            units += self.cohort_units(cohort, chromosome, None);
        }
        for instructor in 0..self.domain.instructors.len() {
            units += self.instructor_units(instructor, chromosome, None);
        }

        Evaluation::new(hard, units)
    }

    /// Incremental evaluation: the score of `chromosome` with `new_gene`
    /// substituted at `section`, derived from `base` (the score of
    /// `chromosome` unchanged).
    pub fn evaluate_delta(
        &self,
        chromosome: &Chromosome,
        section: usize,
        new_gene: Gene,
        base: Evaluation,
    ) -> Evaluation {
        let old_gene = chromosome.genes[section];
        if old_gene == new_gene {
            return base;
        }

        let old_run = self.run_of(section, old_gene);
        let new_run = self.run_of(section, new_gene);

        let mut hard = base.hard_violations as i64;
        let mut units = base.soft_units;

        hard -= self.unary_hard(section, old_gene, &old_run) as i64;
        hard += self.unary_hard(section, new_gene, &new_run) as i64;
        units -= self.preference_units(old_gene, &old_run);
        units += self.preference_units(new_gene, &new_run);

        for (j, &other) in chromosome.genes.iter().enumerate() {
            if j == section {
                continue;
            }
            let other_run = self.run_of(j, other);
            hard -= self.pair_hard(section, old_gene, &old_run, j, other, &other_run) as i64;
            hard += self.pair_hard(section, new_gene, &new_run, j, other, &other_run) as i64;
        }

        if let Some(cohort) = self.infos[section].cohort {
            units -= self.cohort_units(cohort, chromosome, None);
            units += self.cohort_units(cohort, chromosome, Some((section, new_gene)));
        }

        units -= self.instructor_units(old_gene.instructor, chromosome, None);
        units += self.instructor_units(old_gene.instructor, chromosome, Some((section, new_gene)));
        if new_gene.instructor != old_gene.instructor {
            units -= self.instructor_units(new_gene.instructor, chromosome, None);
            units +=
                self.instructor_units(new_gene.instructor, chromosome, Some((section, new_gene)));
        }

        Evaluation::new(hard as u32, units)
    }

    /// Per-rule breakdown for diagnostics.
    pub fn breakdown(&self, chromosome: &Chromosome) -> EvaluationBreakdown {
        let runs: Vec<Vec<usize>> = chromosome
            .genes
            .iter()
            .enumerate()
            .map(|(i, &g)| self.run_of(i, g))
            .collect();

        let mut hard_counts: HashMap<HardRule, u32> = HashMap::new();
        for (i, &gene) in chromosome.genes.iter().enumerate() {
            for (rule, count) in self.unary_hard_by_rule(i, gene, &runs[i]) {
                *hard_counts.entry(rule).or_insert(0) += count;
            }
        }
        for i in 0..chromosome.genes.len() {
            for j in (i + 1)..chromosome.genes.len() {
                for (rule, count) in self.pair_hard_by_rule(
                    i,
                    chromosome.genes[i],
                    &runs[i],
                    j,
                    chromosome.genes[j],
                    &runs[j],
                ) {
                    *hard_counts.entry(rule).or_insert(0) += count;
                }
            }
        }

        let hard = self
            .config
            .hard
            .iter()
            .map(|&rule| (rule, hard_counts.get(&rule).copied().unwrap_or(0)))
            .collect();

        let soft = self
            .config
            .soft
            .iter()
            .map(|rule| {
                let value = match rule.kind {
                    SoftRuleKind::InstructorPreference => {
                        let total: i64 = chromosome
                            .genes
                            .iter()
                            .enumerate()
                            .map(|(i, &g)| self.preference_units(g, &runs[i]))
                            .sum();
                        total
                    }
                    SoftRuleKind::CohortCompactness => (0..self.cohort_count())
                        .map(|c| self.cohort_units(c, chromosome, None))
                        .sum(),
                    SoftRuleKind::InstructorLoadBalance => (0..self.domain.instructors.len())
                        .map(|ins| self.instructor_units(ins, chromosome, None))
                        .sum(),
                };
                (rule.kind, value as f64 / crate::ga::SOFT_SCALE)
            })
            .collect();

        EvaluationBreakdown { hard, soft }
    }

    fn cohort_count(&self) -> usize {
        self.infos
            .iter()
            .filter_map(|i| i.cohort)
            .max()
            .map(|m| m + 1)
            .unwrap_or(0)
    }

    fn unary_hard(&self, section: usize, gene: Gene, run: &[usize]) -> u32 {
        self.unary_hard_by_rule(section, gene, run)
            .into_iter()
            .map(|(_, c)| c)
            .sum()
    }

    fn unary_hard_by_rule(&self, section: usize, gene: Gene, run: &[usize]) -> Vec<(HardRule, u32)> {
        let mut out = Vec::new();
        let info = &self.infos[section];
        let room = &self.domain.rooms[gene.room];

        if self.config.has_hard(HardRule::RoomCapacity) && room.capacity < info.enrollment {
            out.push((HardRule::RoomCapacity, 1));
        }
        if self.config.has_hard(HardRule::RoomEquipment)
            && !room.satisfies(&self.domain.sections[section].required_equipment)
        {
            out.push((HardRule::RoomEquipment, 1));
        }
        if self.config.has_hard(HardRule::InstructorAvailability) {
            let instructor = &self.domain.instructors[gene.instructor];
            let outside = run
                .iter()
                .filter(|&&slot| !instructor.is_available(&self.domain.timeslots[slot].id))
                .count() as u32;
            if outside > 0 {
                out.push((HardRule::InstructorAvailability, outside));
            }
        }
        out
    }

    fn pair_hard(
        &self,
        i: usize,
        gi: Gene,
        run_i: &[usize],
        j: usize,
        gj: Gene,
        run_j: &[usize],
    ) -> u32 {
        self.pair_hard_by_rule(i, gi, run_i, j, gj, run_j)
            .into_iter()
            .map(|(_, c)| c)
            .sum()
    }

    fn pair_hard_by_rule(
        &self,
        i: usize,
        gi: Gene,
        run_i: &[usize],
        j: usize,
        gj: Gene,
        run_j: &[usize],
    ) -> Vec<(HardRule, u32)> {
        let mut out = Vec::new();
        if !run_i.iter().any(|slot| run_j.contains(slot)) {
            return out;
        }

        if self.config.has_hard(HardRule::InstructorConflict) && gi.instructor == gj.instructor {
            out.push((HardRule::InstructorConflict, 1));
        }
        if self.config.has_hard(HardRule::RoomConflict) && gi.room == gj.room {
            out.push((HardRule::RoomConflict, 1));
        }
        if self.config.has_hard(HardRule::CohortConflict)
            && self.infos[i].cohort.is_some()
            && self.infos[i].cohort == self.infos[j].cohort
        {
            out.push((HardRule::CohortConflict, 1));
        }
        out
    }

    /// Preference penalty for one section's assignment, in milli-units.
    fn preference_units(&self, gene: Gene, run: &[usize]) -> i64 {
        let Some(weight) = self.config.soft_weight(SoftRuleKind::InstructorPreference) else {
            return 0;
        };
        let instructor = &self.domain.instructors[gene.instructor];
        let dissatisfaction: f64 = run
            .iter()
            .map(|&slot| 1.0 - instructor.preference(&self.domain.timeslots[slot].id))
            .sum();
        soft_units(weight * dissatisfaction)
    }

    /// Compactness penalty for one cohort, in milli-units. `subst` overrides
    /// one section's gene, for the incremental path.
    fn cohort_units(
        &self,
        cohort: usize,
        chromosome: &Chromosome,
        subst: Option<(usize, Gene)>,
    ) -> i64 {
        let Some(weight) = self.config.soft_weight(SoftRuleKind::CohortCompactness) else {
            return 0;
        };

        let mut periods_by_day: HashMap<Day, BTreeSet<i32>> = HashMap::new();
        for (j, info) in self.infos.iter().enumerate() {
            if info.cohort != Some(cohort) {
                continue;
            }
            let gene = match subst {
                Some((idx, g)) if idx == j => g,
                _ => chromosome.genes[j],
            };
            for slot in self.run_of(j, gene) {
                let t = &self.domain.timeslots[slot];
                periods_by_day.entry(t.day).or_default().insert(t.period);
            }
        }

        let gaps: i64 = periods_by_day
            .values()
            .map(|periods| {
                let first = *periods.first().unwrap();
                let last = *periods.last().unwrap();
                (last - first + 1) as i64 - periods.len() as i64
            })
            .sum();

        soft_units(weight * gaps as f64)
    }

    /// Load-balance penalty for one instructor, in milli-units: peak daily
    /// slot count above the mean over active days.
    fn instructor_units(
        &self,
        instructor: usize,
        chromosome: &Chromosome,
        subst: Option<(usize, Gene)>,
    ) -> i64 {
        let Some(weight) = self.config.soft_weight(SoftRuleKind::InstructorLoadBalance) else {
            return 0;
        };

        let mut day_counts: HashMap<Day, i32> = HashMap::new();
        for j in 0..self.infos.len() {
            let gene = match subst {
                Some((idx, g)) if idx == j => g,
                _ => chromosome.genes[j],
            };
            if gene.instructor != instructor {
                continue;
            }
            for slot in self.run_of(j, gene) {
                *day_counts.entry(self.domain.timeslots[slot].day).or_insert(0) += 1;
            }
        }

        if day_counts.is_empty() {
            return 0;
        }
        let total: i32 = day_counts.values().sum();
        let peak = *day_counts.values().max().unwrap();
        let mean = total as f64 / day_counts.len() as f64;
        soft_units(weight * (peak as f64 - mean).max(0.0))
    }
}
