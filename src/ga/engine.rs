//! The generational GA loop.
//!
//! A run is a deterministic function of (problem, config): all randomness
//! flows from one seeded [`SmallRng`], offspring are bred sequentially on
//! that stream, and parallelism is confined to pure fitness evaluation.
//! Re-running with the same seed reproduces the result bit for bit.
//!
//! # Reference
//! Eiben & Smith (2015), "Introduction to Evolutionary Computing", ch. 3

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::convergence::ConvergenceMonitor;
use super::operators::{mutate_individual, CrossoverType, SelectionType};
use super::population::{Individual, Population};
use super::problem::TimetableProblem;
use crate::constraints::EvaluationBreakdown;
use crate::error::EngineError;
use crate::ga::Evaluation;
use crate::models::TimetableSolution;

/// Run parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GaConfig {
    /// Population size. Must be positive.
    pub population_size: usize,
    /// Individuals copied unchanged into the next generation. Must be
    /// smaller than the population.
    pub elite_count: usize,
    /// Probability that a bred child comes from crossover rather than a
    /// cloned parent. In [0, 1].
    pub crossover_rate: f64,
    /// Per-gene mutation probability. In [0, 1].
    pub mutation_rate: f64,
    /// Parent selection strategy.
    pub selection: SelectionType,
    /// Crossover strategy.
    pub crossover: CrossoverType,
    /// Generation cap.
    pub max_generations: usize,
    /// Stagnation window in generations.
    pub stagnation_window: usize,
    /// Minimum fitness improvement per window to count as progress.
    pub stagnation_epsilon: f64,
    /// Stop early once the best fitness reaches this value, if set.
    pub target_fitness: Option<f64>,
    /// Master RNG seed.
    pub seed: u64,
    /// Evaluate fitness on the rayon pool.
    pub parallel: bool,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            elite_count: 2,
            crossover_rate: 0.9,
            mutation_rate: 0.05,
            selection: SelectionType::Tournament { size: 3 },
            crossover: CrossoverType::Uniform,
            max_generations: 500,
            stagnation_window: 50,
            stagnation_epsilon: 1e-6,
            target_fitness: None,
            seed: 0,
            parallel: true,
        }
    }
}

impl GaConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size;
        self
    }

    /// Sets the elite count.
    pub fn with_elite_count(mut self, count: usize) -> Self {
        self.elite_count = count;
        self
    }

    /// Sets the crossover rate.
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate;
        self
    }

    /// Sets the per-gene mutation rate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate;
        self
    }

    /// Sets the selection strategy.
    pub fn with_selection(mut self, selection: SelectionType) -> Self {
        self.selection = selection;
        self
    }

    /// Sets the crossover strategy.
    pub fn with_crossover(mut self, crossover: CrossoverType) -> Self {
        self.crossover = crossover;
        self
    }

    /// Sets the generation cap.
    pub fn with_max_generations(mut self, generations: usize) -> Self {
        self.max_generations = generations;
        self
    }

    /// Sets the stagnation window.
    pub fn with_stagnation_window(mut self, window: usize) -> Self {
        self.stagnation_window = window;
        self
    }

    /// Sets the stagnation epsilon.
    pub fn with_stagnation_epsilon(mut self, epsilon: f64) -> Self {
        self.stagnation_epsilon = epsilon;
        self
    }

    /// Sets an early-exit fitness target.
    pub fn with_target_fitness(mut self, target: f64) -> Self {
        self.target_fitness = Some(target);
        self
    }

    /// Sets the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Enables or disables parallel fitness evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Rejects parameter combinations the loop cannot run with.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.population_size == 0 {
            return Err(EngineError::InvalidConfiguration(
                "population_size must be positive".into(),
            ));
        }
        if self.elite_count >= self.population_size {
            return Err(EngineError::InvalidConfiguration(format!(
                "elite_count ({}) must be smaller than population_size ({})",
                self.elite_count, self.population_size
            )));
        }
        if !(0.0..=1.0).contains(&self.crossover_rate) {
            return Err(EngineError::InvalidConfiguration(format!(
                "crossover_rate must be in [0, 1], got {}",
                self.crossover_rate
            )));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(EngineError::InvalidConfiguration(format!(
                "mutation_rate must be in [0, 1], got {}",
                self.mutation_rate
            )));
        }
        if let SelectionType::Tournament { size: 0 } = self.selection {
            return Err(EngineError::InvalidConfiguration(
                "tournament size must be at least 1".into(),
            ));
        }
        if self.stagnation_window == 0 {
            return Err(EngineError::InvalidConfiguration(
                "stagnation_window must be at least 1".into(),
            ));
        }
        if !self.stagnation_epsilon.is_finite() {
            return Err(EngineError::InvalidConfiguration(format!(
                "stagnation_epsilon must be finite, got {}",
                self.stagnation_epsilon
            )));
        }
        if let Some(target) = self.target_fitness {
            if !target.is_finite() {
                return Err(EngineError::InvalidConfiguration(format!(
                    "target_fitness must be finite, got {target}"
                )));
            }
        }
        Ok(())
    }
}

/// Cooperative cancellation flag, checked at generation boundaries.
///
/// Clones share the flag, so one handle can be kept by the caller while the
/// engine polls another.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    /// Creates an uncancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. The engine finishes the current generation and
    /// returns its best result so far.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminationReason {
    /// The generation cap was reached.
    MaxGenerations,
    /// Best fitness reached the configured target.
    TargetReached,
    /// The stagnation window elapsed without improvement.
    Stagnation,
    /// The cancellation token was triggered.
    Cancelled,
}

/// Per-generation diagnostics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Generation number, starting at 0.
    pub generation: usize,
    /// Best fitness seen so far in the run.
    pub best_fitness: f64,
    /// Mean fitness of the current population.
    pub mean_fitness: f64,
    /// Hard violations of the best individual so far.
    pub best_hard_violations: u32,
}

/// Outcome of a run: the best timetable found plus diagnostics.
#[derive(Debug, Clone)]
pub struct RunResult {
    /// Decoded best timetable.
    pub solution: TimetableSolution,
    /// Its evaluation.
    pub evaluation: Evaluation,
    /// Its per-rule score breakdown.
    pub breakdown: EvaluationBreakdown,
    /// Whether the timetable satisfies every active hard rule.
    pub feasible: bool,
    /// Generations evaluated before stopping.
    pub generations: usize,
    /// Why the run stopped.
    pub termination: TerminationReason,
    /// One stats entry per evaluated generation.
    pub history: Vec<GenerationStats>,
}

/// Generational GA over one timetabling problem.
#[derive(Debug)]
pub struct GaEngine {
    problem: TimetableProblem,
    config: GaConfig,
}

impl GaEngine {
    /// Creates an engine, rejecting invalid run parameters up front.
    pub fn new(problem: TimetableProblem, config: GaConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self { problem, config })
    }

    /// The problem this engine optimizes.
    pub fn problem(&self) -> &TimetableProblem {
        &self.problem
    }

    /// Runs to completion.
    pub fn run(&self) -> RunResult {
        self.run_with_cancellation(&CancellationToken::new())
    }

    /// Runs until a termination condition or the token fires.
    pub fn run_with_cancellation(&self, token: &CancellationToken) -> RunResult {
        let config = &self.config;
        let mut rng = SmallRng::seed_from_u64(config.seed);

        let mut population = Population::new(
            (0..config.population_size)
                .map(|_| Individual::new(self.problem.create_chromosome(&mut rng)))
                .collect(),
        );
        population.evaluate_all(&self.problem, config.parallel);

        let mut monitor = ConvergenceMonitor::new(config.stagnation_window, config.stagnation_epsilon);
        let mut history: Vec<GenerationStats> = Vec::new();
        let mut best = population.best().clone();
        let mut termination = TerminationReason::MaxGenerations;

        for generation in 0..config.max_generations {
            let generation_best = population.best();
            if generation_best.evaluation().ranks_above(&best.evaluation()) {
                best = generation_best.clone();
            }

            let best_eval = best.evaluation();
            history.push(GenerationStats {
                generation,
                best_fitness: best_eval.fitness(),
                mean_fitness: population.mean_fitness(),
                best_hard_violations: best_eval.hard_violations,
            });
            monitor.record(best_eval.fitness());

            if let Some(target) = config.target_fitness {
                if best_eval.fitness() >= target {
                    termination = TerminationReason::TargetReached;
                    break;
                }
            }
            if monitor.is_stagnant() {
                termination = TerminationReason::Stagnation;
                break;
            }
            if token.is_cancelled() {
                termination = TerminationReason::Cancelled;
                break;
            }
            if generation + 1 == config.max_generations {
                break;
            }

            population = self.breed(&population, &mut rng);
            population.evaluate_all(&self.problem, config.parallel);
        }

        let evaluation = best.evaluation();
        RunResult {
            solution: self.problem.decode(&best.chromosome),
            breakdown: self.problem.breakdown(&best.chromosome),
            feasible: evaluation.is_feasible(),
            evaluation,
            generations: history.len(),
            termination,
            history,
        }
    }

    /// Builds the next generation: elites carried over with their cached
    /// scores, the rest bred by selection, crossover, and mutation.
    fn breed(&self, population: &Population, rng: &mut SmallRng) -> Population {
        let config = &self.config;
        let mut next: Vec<Individual> = population
            .best_indices(config.elite_count)
            .into_iter()
            .map(|i| population.individuals()[i].clone())
            .collect();

        while next.len() < config.population_size {
            let parent1 = config.selection.select(population.individuals(), rng);
            let parent2 = config.selection.select(population.individuals(), rng);

            let mut child = if rng.random_bool(config.crossover_rate) {
                Individual::new(config.crossover.recombine(
                    &parent1.chromosome,
                    &parent2.chromosome,
                    rng,
                ))
            } else {
                parent1.clone()
            };

            mutate_individual(&self.problem, &mut child, config.mutation_rate, rng);
            // A structurally invalid offspring is an operator bug; abort
            // rather than search over a corrupted candidate.
            assert!(
                child.chromosome.is_valid(self.problem.infos()),
                "offspring failed structural validation"
            );
            next.push(child);
        }

        Population::new(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::ConstraintConfig;
    use crate::models::{Day, Domain, Instructor, Room, Section, Timeslot};

    fn campus_slots() -> Vec<Timeslot> {
        let mut slots = Vec::new();
        for (day, tag) in [(Day::Monday, "MON"), (Day::Tuesday, "TUE")] {
            for period in 1..=5 {
                slots.push(Timeslot::new(format!("{tag}_{period}"), day, period));
            }
        }
        slots
    }

    fn all_slot_ids() -> Vec<String> {
        campus_slots().into_iter().map(|t| t.id).collect()
    }

    fn campus_problem() -> TimetableProblem {
        let domain = Domain::new(
            vec![
                Section::new("CS101", 30)
                    .with_instructor("I1")
                    .with_cohort("CS-1"),
                Section::new("CS102", 30)
                    .with_instructor("I1")
                    .with_instructor("I2")
                    .with_cohort("CS-1"),
                Section::new("MA101", 45)
                    .with_instructor("I2")
                    .with_cohort("MA-1"),
                Section::new("MA201", 25)
                    .with_instructor("I2")
                    .with_instructor("I3")
                    .with_cohort("MA-1"),
                Section::new("PH101", 40).with_instructor("I3"),
            ],
            vec![
                Room::new("R1", 35),
                Room::new("R2", 50),
                Room::new("R3", 50),
            ],
            vec![
                Instructor::new("I1").with_availabilities(all_slot_ids()),
                Instructor::new("I2").with_availabilities(all_slot_ids()),
                Instructor::new("I3").with_availabilities(all_slot_ids()),
            ],
            campus_slots(),
        );
        TimetableProblem::new(domain, ConstraintConfig::standard()).unwrap()
    }

    fn quick_config() -> GaConfig {
        GaConfig::default()
            .with_population_size(40)
            .with_max_generations(200)
            .with_seed(42)
            .with_parallel(false)
    }

    #[test]
    fn test_finds_feasible_timetable() {
        let engine = GaEngine::new(campus_problem(), quick_config()).unwrap();
        let result = engine.run();

        assert!(result.feasible);
        assert_eq!(result.evaluation.hard_violations, 0);
        assert_eq!(result.solution.assignment_count(), 5);
    }

    #[test]
    fn test_small_campus_scenario() {
        // Tight instance: 6 room-slot cells for 5 sections, two of which
        // only fit the large room.
        let slot_ids = ["MON_1", "MON_2", "MON_3"];
        let domain = Domain::new(
            vec![
                Section::new("S1", 25).with_instructor("I1").with_instructor("I2"),
                Section::new("S2", 25).with_instructor("I1").with_instructor("I2"),
                Section::new("S3", 25).with_instructor("I1").with_instructor("I2"),
                Section::new("S4", 45).with_instructor("I1").with_instructor("I2"),
                Section::new("S5", 45).with_instructor("I1").with_instructor("I2"),
            ],
            vec![Room::new("R1", 30), Room::new("R2", 60)],
            vec![
                Instructor::new("I1").with_availabilities(slot_ids),
                Instructor::new("I2").with_availabilities(slot_ids),
            ],
            vec![
                Timeslot::new("MON_1", Day::Monday, 1),
                Timeslot::new("MON_2", Day::Monday, 2),
                Timeslot::new("MON_3", Day::Monday, 3),
            ],
        );
        let problem = TimetableProblem::new(domain, ConstraintConfig::standard()).unwrap();
        let config = GaConfig::default()
            .with_population_size(50)
            .with_max_generations(200)
            .with_seed(42)
            .with_parallel(false);

        let result = GaEngine::new(problem, config).unwrap().run();
        assert!(result.feasible);
        assert_eq!(result.evaluation.hard_violations, 0);
        assert!(result.generations <= 200);
    }

    #[test]
    fn test_same_seed_reproduces_run() {
        let config = quick_config().with_max_generations(30);
        let a = GaEngine::new(campus_problem(), config.clone()).unwrap().run();
        let b = GaEngine::new(campus_problem(), config).unwrap().run();

        assert_eq!(a.evaluation, b.evaluation);
        assert_eq!(a.generations, b.generations);
        assert_eq!(a.termination, b.termination);
        assert_eq!(a.solution.assignments, b.solution.assignments);
        for (sa, sb) in a.history.iter().zip(&b.history) {
            assert_eq!(sa.best_fitness, sb.best_fitness);
            assert_eq!(sa.mean_fitness, sb.mean_fitness);
        }
    }

    #[test]
    fn test_parallel_evaluation_is_deterministic() {
        let base = quick_config().with_max_generations(30);
        let seq = GaEngine::new(campus_problem(), base.clone().with_parallel(false))
            .unwrap()
            .run();
        let par = GaEngine::new(campus_problem(), base.with_parallel(true))
            .unwrap()
            .run();

        assert_eq!(seq.evaluation, par.evaluation);
        assert_eq!(seq.solution.assignments, par.solution.assignments);
    }

    #[test]
    fn test_best_fitness_never_regresses() {
        let engine = GaEngine::new(campus_problem(), quick_config()).unwrap();
        let result = engine.run();

        for pair in result.history.windows(2) {
            assert!(pair[1].best_fitness >= pair[0].best_fitness);
        }
    }

    #[test]
    fn test_generation_cap() {
        let config = quick_config()
            .with_max_generations(5)
            .with_stagnation_window(100);
        let result = GaEngine::new(campus_problem(), config).unwrap().run();

        assert_eq!(result.generations, 5);
        assert_eq!(result.termination, TerminationReason::MaxGenerations);
    }

    #[test]
    fn test_target_fitness_stops_immediately_when_met() {
        let config = quick_config().with_target_fitness(f64::MIN);
        let result = GaEngine::new(campus_problem(), config).unwrap().run();

        assert_eq!(result.termination, TerminationReason::TargetReached);
        assert_eq!(result.generations, 1);
    }

    #[test]
    fn test_stagnation_stops_run() {
        let config = quick_config()
            .with_stagnation_window(1)
            .with_stagnation_epsilon(f64::MAX);
        let result = GaEngine::new(campus_problem(), config).unwrap().run();

        assert_eq!(result.termination, TerminationReason::Stagnation);
        assert_eq!(result.generations, 2);
    }

    #[test]
    fn test_cancellation_before_run() {
        let token = CancellationToken::new();
        token.cancel();

        let engine = GaEngine::new(campus_problem(), quick_config()).unwrap();
        let result = engine.run_with_cancellation(&token);

        assert_eq!(result.termination, TerminationReason::Cancelled);
        assert_eq!(result.generations, 1);
        assert_eq!(result.solution.assignment_count(), 5);
    }

    #[test]
    fn test_cancellation_token_shared_across_clones() {
        let token = CancellationToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }

    #[test]
    fn test_rejects_zero_population() {
        let config = GaConfig::default().with_population_size(0);
        let err = GaEngine::new(campus_problem(), config).unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_rejects_elite_count_at_population_size() {
        let config = GaConfig::default()
            .with_population_size(10)
            .with_elite_count(10);
        let err = GaEngine::new(campus_problem(), config).unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_rejects_out_of_range_rates() {
        for config in [
            GaConfig::default().with_mutation_rate(1.5),
            GaConfig::default().with_mutation_rate(-0.1),
            GaConfig::default().with_crossover_rate(2.0),
            GaConfig::default().with_mutation_rate(f64::NAN),
        ] {
            assert!(config.validate().is_err());
        }
    }

    #[test]
    fn test_rejects_zero_tournament() {
        let config = GaConfig::default().with_selection(SelectionType::Tournament { size: 0 });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_stagnation_window() {
        let config = GaConfig::default().with_stagnation_window(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_non_finite_thresholds() {
        for config in [
            GaConfig::default().with_stagnation_epsilon(f64::NAN),
            GaConfig::default().with_stagnation_epsilon(f64::INFINITY),
            GaConfig::default().with_target_fitness(f64::NAN),
            GaConfig::default().with_target_fitness(f64::NEG_INFINITY),
        ] {
            assert!(config.validate().is_err());
        }
    }

    #[test]
    fn test_runs_from_deserialized_domain() {
        let original = campus_problem();
        let json = serde_json::to_string(original.domain()).unwrap();
        let domain: Domain = serde_json::from_str(&json).unwrap();
        let problem = TimetableProblem::new(domain, ConstraintConfig::standard()).unwrap();

        let config = quick_config().with_max_generations(10);
        let result = GaEngine::new(problem, config).unwrap().run();
        assert_eq!(result.solution.assignment_count(), 5);
    }

    #[test]
    fn test_elitism_preserves_best_with_heavy_mutation() {
        let config = quick_config()
            .with_mutation_rate(0.8)
            .with_max_generations(40);
        let result = GaEngine::new(campus_problem(), config).unwrap().run();

        for pair in result.history.windows(2) {
            assert!(pair[1].best_fitness >= pair[0].best_fitness);
        }
    }
}
