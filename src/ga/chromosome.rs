//! Fixed-length gene-per-section chromosome.
//!
//! # Encoding
//!
//! One gene per section, at a fixed position (position k = section k in the
//! domain's section vector). A gene is the (start timeslot, room, instructor)
//! triple chosen for that section, stored as indices into the domain tables.
//! Sections spanning several periods expand to a contiguous same-day run at
//! evaluation time, so gene validity stays positional and crossover needs no
//! repair step.
//!
//! # Reference
//! Colorni, Dorigo & Maniezzo (1998), "Metaheuristics for high school
//! timetabling"

use std::collections::HashMap;

use rand::prelude::{IndexedRandom, SliceRandom};
use rand::Rng;

use super::problem::SectionInfo;

/// One section's (timeslot, room, instructor) assignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Gene {
    /// Start timeslot index.
    pub timeslot: usize,
    /// Room index.
    pub room: usize,
    /// Instructor index.
    pub instructor: usize,
}

/// A candidate timetable: one gene per section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chromosome {
    /// Genes, in section order. Length is fixed for the whole run.
    pub genes: Vec<Gene>,
}

impl Chromosome {
    /// Creates a chromosome by sampling each gene uniformly from the
    /// section's eligible sets.
    pub fn random<R: Rng>(infos: &[SectionInfo], rng: &mut R) -> Self {
        let genes = infos
            .iter()
            .map(|info| Gene {
                timeslot: *info.eligible_starts.choose(rng).unwrap(),
                room: *info.eligible_rooms.choose(rng).unwrap(),
                instructor: *info.eligible_instructors.choose(rng).unwrap(),
            })
            .collect();
        Self { genes }
    }

    /// Creates a load-balanced chromosome: sections are placed in random
    /// order, each into the least-loaded eligible (room, slot) cells and
    /// under the least-loaded eligible instructor. Ties break randomly.
    pub fn balanced<R: Rng>(infos: &[SectionInfo], rng: &mut R) -> Self {
        let mut order: Vec<usize> = (0..infos.len()).collect();
        order.shuffle(rng);

        let mut cell_load: HashMap<(usize, usize), i32> = HashMap::new();
        let mut instructor_load: HashMap<usize, i32> = HashMap::new();
        let mut genes = vec![Gene::default(); infos.len()];

        for &idx in &order {
            let info = &infos[idx];

            // Least-loaded (start, room) pair over the section's run cells
            let mut candidates: Vec<(usize, usize)> = Vec::new();
            let mut best_load = i32::MAX;
            for (start_pos, &start) in info.eligible_starts.iter().enumerate() {
                let run = &info.eligible_runs[start_pos];
                for &room in &info.eligible_rooms {
                    let load: i32 = run
                        .iter()
                        .map(|&slot| cell_load.get(&(room, slot)).copied().unwrap_or(0))
                        .sum();
                    if load < best_load {
                        best_load = load;
                        candidates.clear();
                    }
                    if load == best_load {
                        candidates.push((start, room));
                    }
                }
            }
            let &(start, room) = candidates.choose(rng).unwrap();

            // Least-loaded eligible instructor
            let mut best_instructors: Vec<usize> = Vec::new();
            let mut least = i32::MAX;
            for &ins in &info.eligible_instructors {
                let load = instructor_load.get(&ins).copied().unwrap_or(0);
                if load < least {
                    least = load;
                    best_instructors.clear();
                }
                if load == least {
                    best_instructors.push(ins);
                }
            }
            let instructor = *best_instructors.choose(rng).unwrap();

            let start_pos = info.eligible_starts.iter().position(|&s| s == start).unwrap();
            for &slot in &info.eligible_runs[start_pos] {
                *cell_load.entry((room, slot)).or_insert(0) += 1;
            }
            *instructor_load.entry(instructor).or_insert(0) += info.span;

            genes[idx] = Gene {
                timeslot: start,
                room,
                instructor,
            };
        }

        Self { genes }
    }

    /// Validates length and that every gene stays within its section's
    /// eligible sets. Malformed chromosomes are a programming error, never
    /// repaired here.
    pub fn is_valid(&self, infos: &[SectionInfo]) -> bool {
        if self.genes.len() != infos.len() {
            return false;
        }
        self.genes.iter().zip(infos).all(|(gene, info)| {
            info.eligible_starts.contains(&gene.timeslot)
                && info.eligible_rooms.contains(&gene.room)
                && info.eligible_instructors.contains(&gene.instructor)
        })
    }

    /// Chromosome length (= section count).
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    /// Whether the chromosome has no genes.
    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }
}

// ======================== Crossover operators ========================

/// Uniform crossover: each gene position is taken from either parent with
/// equal probability.
pub fn uniform_crossover<R: Rng>(p1: &Chromosome, p2: &Chromosome, rng: &mut R) -> Chromosome {
    let genes = p1
        .genes
        .iter()
        .zip(&p2.genes)
        .map(|(a, b)| if rng.random_bool(0.5) { *a } else { *b })
        .collect();
    Chromosome { genes }
}

/// Single-point crossover: positions before the cut come from parent 1,
/// the rest from parent 2.
pub fn single_point_crossover<R: Rng>(
    p1: &Chromosome,
    p2: &Chromosome,
    rng: &mut R,
) -> Chromosome {
    let len = p1.genes.len();
    if len < 2 {
        return p1.clone();
    }
    let cut = rng.random_range(1..len);
    let genes = p1.genes[..cut]
        .iter()
        .chain(&p2.genes[cut..])
        .copied()
        .collect();
    Chromosome { genes }
}

/// Two-point crossover: the segment between the cuts comes from parent 2.
pub fn two_point_crossover<R: Rng>(p1: &Chromosome, p2: &Chromosome, rng: &mut R) -> Chromosome {
    let len = p1.genes.len();
    if len < 3 {
        return single_point_crossover(p1, p2, rng);
    }
    let mut a = rng.random_range(1..len);
    let mut b = rng.random_range(1..len);
    if a > b {
        std::mem::swap(&mut a, &mut b);
    }
    let mut genes = p1.genes.clone();
    genes[a..b].copy_from_slice(&p2.genes[a..b]);
    Chromosome { genes }
}

// ======================== Mutation ========================

/// Resamples one gene from its section's eligible sets.
///
/// Draws only from the eligible start × room × instructor universe, keeping
/// mutation biased toward structurally satisfiable assignments.
pub fn resample_gene<R: Rng>(info: &SectionInfo, rng: &mut R) -> Gene {
    Gene {
        timeslot: *info.eligible_starts.choose(rng).unwrap(),
        room: *info.eligible_rooms.choose(rng).unwrap(),
        instructor: *info.eligible_instructors.choose(rng).unwrap(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn sample_infos() -> Vec<SectionInfo> {
        vec![
            SectionInfo {
                section_id: "S1".into(),
                span: 1,
                enrollment: 20,
                eligible_starts: vec![0, 1, 2],
                eligible_runs: vec![vec![0], vec![1], vec![2]],
                eligible_rooms: vec![0, 1],
                eligible_instructors: vec![0],
                cohort: None,
            },
            SectionInfo {
                section_id: "S2".into(),
                span: 1,
                enrollment: 40,
                eligible_starts: vec![0, 2],
                eligible_runs: vec![vec![0], vec![2]],
                eligible_rooms: vec![1],
                eligible_instructors: vec![0, 1],
                cohort: Some(0),
            },
        ]
    }

    #[test]
    fn test_random_chromosome_is_valid() {
        let infos = sample_infos();
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..20 {
            let ch = Chromosome::random(&infos, &mut rng);
            assert_eq!(ch.len(), 2);
            assert!(ch.is_valid(&infos));
        }
    }

    #[test]
    fn test_balanced_chromosome_is_valid() {
        let infos = sample_infos();
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..20 {
            let ch = Chromosome::balanced(&infos, &mut rng);
            assert!(ch.is_valid(&infos));
        }
    }

    #[test]
    fn test_balanced_spreads_cells() {
        // Two sections forced into room 1: balanced init should avoid
        // stacking them on the same slot when a free slot exists.
        let infos = sample_infos();
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..10 {
            let ch = Chromosome::balanced(&infos, &mut rng);
            if ch.genes[0].room == 1 {
                assert_ne!(ch.genes[0].timeslot, ch.genes[1].timeslot);
            }
        }
    }

    #[test]
    fn test_wrong_length_invalid() {
        let infos = sample_infos();
        let ch = Chromosome {
            genes: vec![Gene::default()],
        };
        assert!(!ch.is_valid(&infos));
    }

    #[test]
    fn test_out_of_pool_gene_invalid() {
        let infos = sample_infos();
        let ch = Chromosome {
            genes: vec![
                Gene {
                    timeslot: 0,
                    room: 0,
                    instructor: 0,
                },
                // Room 0 is not eligible for S2
                Gene {
                    timeslot: 0,
                    room: 0,
                    instructor: 0,
                },
            ],
        };
        assert!(!ch.is_valid(&infos));
    }

    #[test]
    fn test_uniform_crossover_mixes_parents() {
        let infos = sample_infos();
        let mut rng = SmallRng::seed_from_u64(42);
        let p1 = Chromosome::random(&infos, &mut rng);
        let p2 = Chromosome::random(&infos, &mut rng);

        let child = uniform_crossover(&p1, &p2, &mut rng);
        assert_eq!(child.len(), 2);
        for (i, gene) in child.genes.iter().enumerate() {
            assert!(*gene == p1.genes[i] || *gene == p2.genes[i]);
        }
        assert!(child.is_valid(&infos));
    }

    #[test]
    fn test_single_point_crossover_positional() {
        let infos = sample_infos();
        let mut rng = SmallRng::seed_from_u64(42);
        let p1 = Chromosome::random(&infos, &mut rng);
        let p2 = Chromosome::random(&infos, &mut rng);

        let child = single_point_crossover(&p1, &p2, &mut rng);
        assert_eq!(child.len(), 2);
        assert!(child.is_valid(&infos));
    }

    #[test]
    fn test_two_point_crossover_positional() {
        let infos = sample_infos();
        let mut rng = SmallRng::seed_from_u64(42);
        let p1 = Chromosome::random(&infos, &mut rng);
        let p2 = Chromosome::random(&infos, &mut rng);

        let child = two_point_crossover(&p1, &p2, &mut rng);
        assert_eq!(child.len(), 2);
        assert!(child.is_valid(&infos));
    }

    #[test]
    fn test_resample_gene_stays_eligible() {
        let infos = sample_infos();
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..50 {
            let g = resample_gene(&infos[1], &mut rng);
            assert!(infos[1].eligible_starts.contains(&g.timeslot));
            assert_eq!(g.room, 1);
            assert!(infos[1].eligible_instructors.contains(&g.instructor));
        }
    }
}
