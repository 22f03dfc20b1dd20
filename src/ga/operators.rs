//! Selection, crossover dispatch, and mutation.
//!
//! Strategies are plain configuration enums: a run picks one selection and
//! one crossover strategy up front, and the engine dispatches through them
//! each generation. Selection assumes a fully evaluated population.

use rand::seq::index;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::chromosome::{
    resample_gene, single_point_crossover, two_point_crossover, uniform_crossover, Chromosome,
};
use super::population::Individual;
use super::problem::TimetableProblem;

/// Parent selection strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionType {
    /// Sample `size` distinct individuals, keep the best.
    Tournament {
        /// Tournament size. Must be at least 1; larger means stronger
        /// selection pressure.
        size: usize,
    },
    /// Fitness-proportional sampling over strictly positive weights, so an
    /// all-infeasible population still selects.
    Roulette,
}

impl SelectionType {
    /// Picks one parent from an evaluated population.
    pub fn select<'a, R: Rng>(
        &self,
        individuals: &'a [Individual],
        rng: &mut R,
    ) -> &'a Individual {
        match *self {
            SelectionType::Tournament { size } => {
                let entrants = size.max(1).min(individuals.len());
                let picked = index::sample(rng, individuals.len(), entrants);
                let winner = picked
                    .into_iter()
                    .min_by_key(|&i| (individuals[i].evaluation(), i))
                    .expect("tournament over an empty population");
                &individuals[winner]
            }
            SelectionType::Roulette => {
                let total: f64 = individuals
                    .iter()
                    .map(|ind| ind.evaluation().selection_weight())
                    .sum();
                let mut ticket = rng.random_range(0.0..total);
                for individual in individuals {
                    ticket -= individual.evaluation().selection_weight();
                    if ticket <= 0.0 {
                        return individual;
                    }
                }
                // Float round-off can leave a sliver of ticket unspent.
                individuals.last().expect("roulette over an empty population")
            }
        }
    }
}

/// Crossover strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrossoverType {
    /// Each gene position from either parent with equal probability.
    Uniform,
    /// One cut point; prefix from parent 1, suffix from parent 2.
    SinglePoint,
    /// Two cut points; the middle segment from parent 2.
    TwoPoint,
}

impl CrossoverType {
    /// Recombines two parents into one child.
    pub fn recombine<R: Rng>(
        &self,
        parent1: &Chromosome,
        parent2: &Chromosome,
        rng: &mut R,
    ) -> Chromosome {
        match self {
            CrossoverType::Uniform => uniform_crossover(parent1, parent2, rng),
            CrossoverType::SinglePoint => single_point_crossover(parent1, parent2, rng),
            CrossoverType::TwoPoint => two_point_crossover(parent1, parent2, rng),
        }
    }
}

/// Mutates an individual in place: each gene is independently resampled from
/// its section's eligible sets with probability `rate`.
///
/// When the individual carries a cached evaluation, the cache is kept current
/// through incremental re-evaluation, so mutating a scored elite costs one
/// delta pass per flipped gene instead of a full recompute.
pub fn mutate_individual<R: Rng>(
    problem: &TimetableProblem,
    individual: &mut Individual,
    rate: f64,
    rng: &mut R,
) {
    for section in 0..individual.chromosome.len() {
        if !rng.random_bool(rate) {
            continue;
        }
        let new_gene = resample_gene(&problem.infos()[section], rng);
        if let Some(base) = individual.evaluation {
            individual.evaluation = Some(problem.evaluate_delta(
                &individual.chromosome,
                section,
                new_gene,
                base,
            ));
        }
        individual.chromosome.genes[section] = new_gene;
    }
}
