//! Population management.
//!
//! Holds the current generation's individuals with their cached evaluations.
//! Evaluation caching is the contract the engine relies on: an individual is
//! scored once, elites carry their score across generations unchanged, and
//! mutation keeps caches current through incremental re-evaluation.

use rayon::prelude::*;

use super::chromosome::Chromosome;
use super::fitness::Evaluation;
use super::problem::TimetableProblem;

/// A chromosome paired with its cached evaluation, if scored.
#[derive(Debug, Clone)]
pub struct Individual {
    /// Candidate timetable.
    pub chromosome: Chromosome,
    /// Cached score. `None` until the population evaluates it.
    pub evaluation: Option<Evaluation>,
}

impl Individual {
    /// Wraps a chromosome with no cached score.
    pub fn new(chromosome: Chromosome) -> Self {
        Self {
            chromosome,
            evaluation: None,
        }
    }

    /// Cached evaluation. Reading an unscored individual is a programming
    /// error and aborts.
    pub fn evaluation(&self) -> Evaluation {
        self.evaluation
            .expect("individual read before it was evaluated")
    }
}

/// One generation of candidate timetables.
#[derive(Debug, Clone)]
pub struct Population {
    individuals: Vec<Individual>,
}

impl Population {
    /// Creates a population from pre-built individuals.
    pub fn new(individuals: Vec<Individual>) -> Self {
        Self { individuals }
    }

    /// Number of individuals.
    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    /// Whether the population is empty.
    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// All individuals, in insertion order.
    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    /// Scores every individual that has no cached evaluation.
    ///
    /// Evaluation is pure, so the parallel path produces the same scores as
    /// the sequential one and never touches the run's RNG stream.
    pub fn evaluate_all(&mut self, problem: &TimetableProblem, parallel: bool) {
        let score = |individual: &mut Individual| {
            if individual.evaluation.is_none() {
                individual.evaluation = Some(problem.evaluate(&individual.chromosome));
            }
        };
        if parallel {
            self.individuals.par_iter_mut().for_each(score);
        } else {
            self.individuals.iter_mut().for_each(score);
        }
    }

    /// The best individual. Ties resolve to the earliest position, so the
    /// result is deterministic.
    pub fn best(&self) -> &Individual {
        let (idx, _) = self
            .individuals
            .iter()
            .enumerate()
            .min_by_key(|(i, ind)| (ind.evaluation(), *i))
            .expect("population is empty");
        &self.individuals[idx]
    }

    /// Indices of the `k` best individuals, best first. Ties resolve to the
    /// earliest position.
    pub fn best_indices(&self, k: usize) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.individuals.len()).collect();
        order.sort_by_key(|&i| (self.individuals[i].evaluation(), i));
        order.truncate(k);
        order
    }

    /// Mean scalar fitness over the population.
    pub fn mean_fitness(&self) -> f64 {
        if self.individuals.is_empty() {
            return 0.0;
        }
        let total: f64 = self
            .individuals
            .iter()
            .map(|ind| ind.evaluation().fitness())
            .sum();
        total / self.individuals.len() as f64
    }

    /// Installs the next generation.
    pub fn replace(&mut self, next: Vec<Individual>) {
        self.individuals = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::ConstraintConfig;
    use crate::ga::Gene;
    use crate::models::{Day, Domain, Instructor, Room, Section, Timeslot};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn sample_problem() -> TimetableProblem {
        let domain = Domain::new(
            vec![
                Section::new("S1", 20).with_instructor("I1"),
                Section::new("S2", 20).with_instructor("I1").with_instructor("I2"),
            ],
            vec![Room::new("R1", 30), Room::new("R2", 30)],
            vec![
                Instructor::new("I1").with_availabilities(["MON_1", "MON_2"]),
                Instructor::new("I2").with_availabilities(["MON_1", "MON_2"]),
            ],
            vec![
                Timeslot::new("MON_1", Day::Monday, 1),
                Timeslot::new("MON_2", Day::Monday, 2),
            ],
        );
        TimetableProblem::new(domain, ConstraintConfig::standard()).unwrap()
    }

    fn random_population(problem: &TimetableProblem, size: usize, seed: u64) -> Population {
        let mut rng = SmallRng::seed_from_u64(seed);
        Population::new(
            (0..size)
                .map(|_| Individual::new(problem.create_chromosome(&mut rng)))
                .collect(),
        )
    }

    #[test]
    fn test_parallel_matches_sequential_evaluation() {
        let problem = sample_problem();
        let mut seq = random_population(&problem, 20, 42);
        let mut par = seq.clone();

        seq.evaluate_all(&problem, false);
        par.evaluate_all(&problem, true);

        for (a, b) in seq.individuals().iter().zip(par.individuals()) {
            assert_eq!(a.evaluation(), b.evaluation());
        }
    }

    #[test]
    fn test_evaluate_all_keeps_cached_scores() {
        let problem = sample_problem();
        let mut population = random_population(&problem, 5, 42);
        population.evaluate_all(&problem, false);

        // Poison one cache; a second pass must not overwrite it.
        let marker = Evaluation::new(999, 0);
        let mut individuals = population.individuals().to_vec();
        individuals[0].evaluation = Some(marker);
        population.replace(individuals);

        population.evaluate_all(&problem, false);
        assert_eq!(population.individuals()[0].evaluation(), marker);
    }

    #[test]
    fn test_best_prefers_fewer_hard_violations() {
        let problem = sample_problem();
        // Same instructor, same slot: conflict. Disjoint slots: clean.
        let conflicted = Chromosome {
            genes: vec![
                Gene { timeslot: 0, room: 0, instructor: 0 },
                Gene { timeslot: 0, room: 1, instructor: 0 },
            ],
        };
        let clean = Chromosome {
            genes: vec![
                Gene { timeslot: 0, room: 0, instructor: 0 },
                Gene { timeslot: 1, room: 1, instructor: 0 },
            ],
        };
        let mut population = Population::new(vec![
            Individual::new(conflicted),
            Individual::new(clean.clone()),
        ]);
        population.evaluate_all(&problem, false);

        assert_eq!(population.best().chromosome, clean);
        assert_eq!(population.best_indices(1), vec![1]);
    }

    #[test]
    fn test_best_indices_tie_breaks_by_position() {
        let problem = sample_problem();
        let mut population = random_population(&problem, 1, 42);
        let only = population.individuals()[0].clone();
        population.replace(vec![only.clone(), only.clone(), only]);
        population.evaluate_all(&problem, false);

        assert_eq!(population.best_indices(2), vec![0, 1]);
    }

    #[test]
    fn test_mean_fitness() {
        let mut population = Population::new(vec![
            Individual {
                chromosome: Chromosome { genes: vec![] },
                evaluation: Some(Evaluation::new(0, 1000)),
            },
            Individual {
                chromosome: Chromosome { genes: vec![] },
                evaluation: Some(Evaluation::new(0, 3000)),
            },
        ]);
        assert!((population.mean_fitness() - (-2.0)).abs() < 1e-10);
        population.replace(vec![]);
        assert_eq!(population.mean_fitness(), 0.0);
    }
}
