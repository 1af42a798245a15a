//! Seeded random instance generators.
//!
//! # Taillard
//! Processing times are drawn per (machine, job); each job's routing is a
//! random permutation built by swapping position `i` with a uniform
//! `k ∈ [i, m-1]`. Times and routings use separate seeds.
//!
//! # Demirkol
//! Processing times are drawn per (job, position); routings are shuffled
//! permutations, either over all machines (`Classic`) or over the first and
//! second half of the machines in turn (`TwoSet`).
//!
//! The generators use `StdRng`, so instances are reproducible per seed but
//! not identical to the published benchmark sets.
//!
//! # References
//! - Taillard (1993), "Benchmarks for basic scheduling problems"
//! - Demirkol, Mehta & Uzsoy (1998), "Benchmarks for shop scheduling problems"

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::{Instance, Routing};

/// Taillard-style instance generator.
#[derive(Debug, Clone)]
pub struct TaillardGenerator {
    /// Number of jobs.
    pub jobs: usize,
    /// Number of machines.
    pub machines: usize,
    /// Seed for processing times.
    pub time_seed: u64,
    /// Seed for machine routings.
    pub machine_seed: u64,
    /// Smallest processing time (default 1).
    pub min_time: u64,
    /// Largest processing time (default 99).
    pub max_time: u64,
}

impl TaillardGenerator {
    /// Creates a generator with times in `[1, 99]`.
    pub fn new(jobs: usize, machines: usize, time_seed: u64, machine_seed: u64) -> Self {
        Self {
            jobs,
            machines,
            time_seed,
            machine_seed,
            min_time: 1,
            max_time: 99,
        }
    }

    /// Sets the processing time range (inclusive, minimum 1).
    pub fn with_time_range(mut self, min_time: u64, max_time: u64) -> Self {
        self.min_time = min_time.max(1);
        self.max_time = max_time.max(self.min_time);
        self
    }

    /// Generates an instance.
    pub fn generate(&self, name: impl Into<String>) -> Instance {
        let mut time_rng = StdRng::seed_from_u64(self.time_seed);
        let times: Vec<Vec<u64>> = (0..self.machines)
            .map(|_| {
                (0..self.jobs)
                    .map(|_| time_rng.random_range(self.min_time..=self.max_time))
                    .collect()
            })
            .collect();

        let mut machine_rng = StdRng::seed_from_u64(self.machine_seed);
        let jobs = (0..self.jobs)
            .map(|job| {
                let mut order: Vec<usize> = (0..self.machines).collect();
                for i in 0..self.machines {
                    let k = machine_rng.random_range(i..self.machines);
                    order.swap(i, k);
                }
                order
                    .into_iter()
                    .map(|machine| (machine, times[machine][job]))
                    .collect::<Routing>()
            })
            .collect();

        Instance::new(name, self.jobs, self.machines, jobs)
    }
}

/// Routing structure of Demirkol instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoutingKind {
    /// Any permutation of all machines.
    #[default]
    Classic,
    /// A permutation of the first half of the machines, then of the second half.
    TwoSet,
}

/// Demirkol-style instance generator.
#[derive(Debug, Clone)]
pub struct DemirkolGenerator {
    /// Number of jobs.
    pub jobs: usize,
    /// Number of machines.
    pub machines: usize,
    /// Smallest processing time (default 1).
    pub min_time: u64,
    /// Largest processing time (default 200).
    pub max_time: u64,
    /// Routing structure.
    pub kind: RoutingKind,
    /// Seed for times and routings.
    pub seed: u64,
}

impl DemirkolGenerator {
    /// Creates a classic generator with times in `[1, 200]` and seed 0.
    pub fn new(jobs: usize, machines: usize) -> Self {
        Self {
            jobs,
            machines,
            min_time: 1,
            max_time: 200,
            kind: RoutingKind::Classic,
            seed: 0,
        }
    }

    /// Sets the processing time range (inclusive, minimum 1).
    pub fn with_time_range(mut self, min_time: u64, max_time: u64) -> Self {
        self.min_time = min_time.max(1);
        self.max_time = max_time.max(self.min_time);
        self
    }

    /// Sets the routing structure.
    pub fn with_kind(mut self, kind: RoutingKind) -> Self {
        self.kind = kind;
        self
    }

    /// Sets the seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Generates an instance from the configured seed.
    pub fn generate(&self, name: impl Into<String>) -> Instance {
        let mut rng = StdRng::seed_from_u64(self.seed);
        self.generate_with_rng(name, &mut rng)
    }

    /// Generates an instance from a caller-owned generator.
    pub fn generate_with_rng<R: Rng>(&self, name: impl Into<String>, rng: &mut R) -> Instance {
        let times: Vec<Vec<u64>> = (0..self.jobs)
            .map(|_| {
                (0..self.machines)
                    .map(|_| rng.random_range(self.min_time..=self.max_time))
                    .collect()
            })
            .collect();

        let jobs = times
            .iter()
            .map(|job_times| {
                self.routing(rng)
                    .into_iter()
                    .zip(job_times.iter().copied())
                    .collect::<Routing>()
            })
            .collect();

        Instance::new(name, self.jobs, self.machines, jobs)
    }

    fn routing<R: Rng>(&self, rng: &mut R) -> Vec<usize> {
        match self.kind {
            RoutingKind::Classic => {
                let mut order: Vec<usize> = (0..self.machines).collect();
                order.shuffle(rng);
                order
            }
            RoutingKind::TwoSet => {
                let half = self.machines / 2;
                let mut first: Vec<usize> = (0..half).collect();
                let mut second: Vec<usize> = (half..self.machines).collect();
                first.shuffle(rng);
                second.shuffle(rng);
                first.extend(second);
                first
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate_instance;

    fn is_permutation(routing: &Routing, machines: usize) -> bool {
        let mut seen: Vec<usize> = routing.iter().map(|&(m, _)| m).collect();
        seen.sort_unstable();
        seen == (0..machines).collect::<Vec<_>>()
    }

    #[test]
    fn test_taillard_shape_and_validity() {
        let inst = TaillardGenerator::new(15, 15, 840_612_802, 398_197_754).generate("ta_like");
        assert_eq!(inst.job_count, 15);
        assert_eq!(inst.machine_count, 15);
        assert!(validate_instance(&inst).is_ok());
        for routing in &inst.jobs {
            assert!(is_permutation(routing, 15));
            assert!(routing.iter().all(|&(_, p)| (1..=99).contains(&p)));
        }
    }

    #[test]
    fn test_taillard_reproducible() {
        let a = TaillardGenerator::new(5, 4, 1, 2).generate("a");
        let b = TaillardGenerator::new(5, 4, 1, 2).generate("a");
        let c = TaillardGenerator::new(5, 4, 1, 3).generate("a");
        assert_eq!(a, b);
        assert_ne!(a.jobs, c.jobs);
    }

    #[test]
    fn test_taillard_time_per_machine_and_job() {
        // Times are keyed by (machine, job), so changing only the routing
        // seed keeps each job's multiset of times.
        let a = TaillardGenerator::new(4, 3, 9, 1).generate("a");
        let b = TaillardGenerator::new(4, 3, 9, 2).generate("b");
        for job in 0..4 {
            let mut ta: Vec<(usize, u64)> = a.jobs[job].clone();
            let mut tb: Vec<(usize, u64)> = b.jobs[job].clone();
            ta.sort_unstable();
            tb.sort_unstable();
            assert_eq!(ta, tb);
        }
    }

    #[test]
    fn test_time_range_is_clamped() {
        let gen = TaillardGenerator::new(2, 2, 0, 0).with_time_range(0, 0);
        assert_eq!((gen.min_time, gen.max_time), (1, 1));
        let inst = gen.generate("ones");
        assert!(inst.jobs.iter().flatten().all(|&(_, p)| p == 1));
    }

    #[test]
    fn test_demirkol_classic() {
        let inst = DemirkolGenerator::new(6, 5).with_seed(7).generate("dmu_like");
        assert!(validate_instance(&inst).is_ok());
        for routing in &inst.jobs {
            assert!(is_permutation(routing, 5));
            assert!(routing.iter().all(|&(_, p)| (1..=200).contains(&p)));
        }
    }

    #[test]
    fn test_demirkol_two_set() {
        let inst = DemirkolGenerator::new(4, 6)
            .with_kind(RoutingKind::TwoSet)
            .with_seed(3)
            .with_time_range(10, 20)
            .generate("two_set");
        assert!(validate_instance(&inst).is_ok());
        for routing in &inst.jobs {
            assert!(routing[..3].iter().all(|&(m, _)| m < 3));
            assert!(routing[3..].iter().all(|&(m, _)| m >= 3));
            assert!(routing.iter().all(|&(_, p)| (10..=20).contains(&p)));
        }
    }

    #[test]
    fn test_demirkol_reproducible() {
        let gen = DemirkolGenerator::new(3, 3).with_seed(11);
        assert_eq!(gen.generate("x"), gen.generate("x"));
    }
}
