//! Schedule (solution) model.
//!
//! A [`Schedule`] is a detached snapshot of the operations committed during a
//! dispatch run: one [`Assignment`] per scheduled operation, i.e. the
//! `(job, machine, start, end)` tuples a Gantt renderer or exporter consumes.
//!
//! # Reference
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 3

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// A schedule produced by one dispatch run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    /// Instance name.
    pub instance: String,
    /// Name of the dispatching rule that produced the schedule, if known.
    pub rule: Option<String>,
    /// One entry per scheduled operation.
    pub assignments: Vec<Assignment>,
}

/// A scheduled operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// Operation ID.
    pub operation_id: usize,
    /// Parent job ID.
    pub job_id: usize,
    /// Machine ID.
    pub machine_id: usize,
    /// Start time.
    pub start_time: u64,
    /// End time (exclusive).
    pub end_time: u64,
}

/// A schedule consistency violation found by verification.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum Violation {
    /// Two operations overlap on one machine.
    #[error("Overlap on machine {machine_id} between operations {op_a} and {op_b}")]
    MachineOverlap {
        machine_id: usize,
        op_a: usize,
        op_b: usize,
    },
    /// An operation starts before its job predecessor ends.
    #[error("Order violation in job {job_id}: operation {op_b} starts before {op_a} ends")]
    PrecedenceViolation {
        job_id: usize,
        op_a: usize,
        op_b: usize,
    },
}

impl Assignment {
    /// Duration (end - start).
    #[inline]
    pub fn duration(&self) -> u64 {
        self.end_time - self.start_time
    }
}

impl Schedule {
    /// Creates an empty schedule for an instance.
    pub fn new(instance: impl Into<String>) -> Self {
        Self {
            instance: instance.into(),
            ..Default::default()
        }
    }

    /// Sets the producing rule name.
    pub fn with_rule(mut self, rule: impl Into<String>) -> Self {
        self.rule = Some(rule.into());
        self
    }

    /// Adds an assignment.
    pub fn add_assignment(&mut self, assignment: Assignment) {
        self.assignments.push(assignment);
    }

    /// Makespan: latest end time across all assignments.
    pub fn makespan(&self) -> u64 {
        self.assignments.iter().map(|a| a.end_time).max().unwrap_or(0)
    }

    /// Assignments of one job, in job sequence order.
    pub fn assignments_for_job(&self, job_id: usize) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .filter(|a| a.job_id == job_id)
            .collect()
    }

    /// Assignments on one machine, sorted by start time.
    pub fn assignments_for_machine(&self, machine_id: usize) -> Vec<&Assignment> {
        let mut on_machine: Vec<&Assignment> = self
            .assignments
            .iter()
            .filter(|a| a.machine_id == machine_id)
            .collect();
        on_machine.sort_by_key(|a| a.start_time);
        on_machine
    }

    /// Busy time of a machine over the makespan.
    ///
    /// Returns `None` for an empty schedule.
    pub fn machine_utilization(&self, machine_id: usize) -> Option<f64> {
        let horizon = self.makespan();
        if horizon == 0 {
            return None;
        }
        let busy: u64 = self
            .assignments_for_machine(machine_id)
            .iter()
            .map(|a| a.duration())
            .sum();
        Some(busy as f64 / horizon as f64)
    }

    /// Utilization of every machine that has assignments, keyed by machine ID.
    pub fn all_utilizations(&self) -> BTreeMap<usize, f64> {
        let horizon = self.makespan();
        if horizon == 0 {
            return BTreeMap::new();
        }

        let mut busy: BTreeMap<usize, u64> = BTreeMap::new();
        for a in &self.assignments {
            *busy.entry(a.machine_id).or_insert(0) += a.duration();
        }

        busy.into_iter()
            .map(|(id, b)| (id, b as f64 / horizon as f64))
            .collect()
    }

    /// Completion time of a job (latest end of its assignments).
    pub fn job_completion_time(&self, job_id: usize) -> Option<u64> {
        self.assignments_for_job(job_id)
            .iter()
            .map(|a| a.end_time)
            .max()
    }

    /// Number of assignments.
    pub fn assignment_count(&self) -> usize {
        self.assignments.len()
    }
}
