//! Genetic algorithm engine for timetable construction.
//!
//! The pipeline: a [`TimetableProblem`] compiles the domain into per-section
//! eligible sets and a chromosome codec, a [`Population`] of candidates is
//! scored by the constraint evaluator, and the [`GaEngine`] breeds
//! generations through selection, crossover, and mutation until a
//! termination condition fires.
//!
//! # Reference
//! Colorni, Dorigo & Maniezzo (1998), "Metaheuristics for high school
//! timetabling"

mod chromosome;
mod convergence;
mod engine;
mod fitness;
mod operators;
mod population;
mod problem;

pub use chromosome::{
    resample_gene, single_point_crossover, two_point_crossover, uniform_crossover, Chromosome,
    Gene,
};
pub use convergence::ConvergenceMonitor;
pub use engine::{
    CancellationToken, GaConfig, GaEngine, GenerationStats, RunResult, TerminationReason,
};
pub use fitness::{Evaluation, HARD_PENALTY, SOFT_SCALE};
pub(crate) use fitness::soft_units;
pub use operators::{mutate_individual, CrossoverType, SelectionType};
pub use population::{Individual, Population};
pub use problem::{SectionInfo, TimetableProblem};
