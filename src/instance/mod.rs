//! Job-shop instances: the immutable per-instance template.
//!
//! An [`Instance`] describes what has to be scheduled: for each job, its
//! operations as `(machine_id, processing_time)` pairs in precedence order.
//! It carries no schedule state; [`crate::models::ShopState`] is built from
//! it for every run.
//!
//! # Sources
//!
//! - **`parser`**: the plain-text benchmark format (header + one line per job)
//! - **`registry`**: named benchmark instances with known optima and bounds
//! - **`generator`**: seeded random instances (Taillard, Demirkol)
//!
//! # References
//! - Taillard (1993), "Benchmarks for basic scheduling problems"
//! - Demirkol et al. (1998), "Benchmarks for shop scheduling problems"

mod generator;
mod parser;
mod registry;

pub use generator::{DemirkolGenerator, RoutingKind, TaillardGenerator};
pub use parser::{load_instance, parse_instance};
pub use registry::{BenchmarkEntry, BenchmarkRegistry, Bounds, EntryCheck, EntryStatus};

use serde::{Deserialize, Serialize};

/// One job's routing: `(machine_id, processing_time)` pairs in precedence order.
pub type Routing = Vec<(usize, u64)>;

/// A job-shop problem instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instance {
    /// Instance name (benchmark key or file stem).
    pub name: String,
    /// Declared number of jobs.
    pub job_count: usize,
    /// Declared number of machines.
    pub machine_count: usize,
    /// Per-job routings.
    pub jobs: Vec<Routing>,
}

impl Instance {
    /// Creates an instance from its routings.
    ///
    /// No validation is performed here; it happens when a shop is built.
    pub fn new(
        name: impl Into<String>,
        job_count: usize,
        machine_count: usize,
        jobs: Vec<Routing>,
    ) -> Self {
        Self {
            name: name.into(),
            job_count,
            machine_count,
            jobs,
        }
    }

    /// Total number of operations across all jobs.
    pub fn total_operations(&self) -> usize {
        self.jobs.iter().map(Vec::len).sum()
    }

    /// Total processing time of one job.
    pub fn job_length(&self, job_id: usize) -> u64 {
        self.jobs
            .get(job_id)
            .map(|r| r.iter().map(|&(_, p)| p).sum())
            .unwrap_or(0)
    }

    /// Total processing time assigned to one machine.
    pub fn machine_load(&self, machine_id: usize) -> u64 {
        self.jobs
            .iter()
            .flatten()
            .filter(|&&(m, _)| m == machine_id)
            .map(|&(_, p)| p)
            .sum()
    }

    /// Trivial makespan lower bound: the longest job or the busiest machine.
    pub fn lower_bound(&self) -> u64 {
        let longest_job = (0..self.jobs.len())
            .map(|j| self.job_length(j))
            .max()
            .unwrap_or(0);
        let busiest_machine = (0..self.machine_count)
            .map(|m| self.machine_load(m))
            .max()
            .unwrap_or(0);
        longest_job.max(busiest_machine)
    }

    /// Renders the instance in the plain-text benchmark format.
    pub fn to_text(&self) -> String {
        let mut out = format!("{} {}\n", self.job_count, self.machine_count);
        for routing in &self.jobs {
            let line = routing
                .iter()
                .map(|(m, p)| format!("{m} {p}"))
                .collect::<Vec<_>>()
                .join(" ");
            out.push_str(&line);
            out.push('\n');
        }
        out
    }
}
