//! Shop state: jobs, machines and the per-job time ledger.
//!
//! `ShopState` is the mutable per-run state built from an immutable
//! [`Instance`]. It performs the two transitions that keep the schedule
//! consistent: the feasibility check and the commit.
//!
//! # Runs and Reset
//! A dispatch run mutates job cursors, machine logs and the ledger in place.
//! Call [`ShopState::reset`] before running another rule on the same shop;
//! otherwise the second run starts from the first run's leftovers.

use tracing::trace;

use super::{Assignment, Job, Machine, Operation, Schedule, Violation};
use crate::error::{Result, ShopError};
use crate::instance::Instance;
use crate::validation::{validate_instance, verify_schedule};

/// Jobs, machines and ledger of one job-shop instance.
#[derive(Debug, Clone)]
pub struct ShopState {
    template: Instance,
    jobs: Vec<Job>,
    machines: Vec<Machine>,
    /// End time of each job's most recently scheduled operation.
    current_time: Vec<u64>,
}

impl ShopState {
    /// Builds the shop for an instance.
    ///
    /// Fails with [`ShopError::InvalidInstance`] if the instance does not
    /// pass [`validate_instance`]; nothing is built in that case.
    pub fn new(instance: &Instance) -> Result<Self> {
        validate_instance(instance).map_err(|errors| ShopError::InvalidInstance {
            name: instance.name.clone(),
            errors,
        })?;

        let mut next_op_id = 0;
        let jobs = instance
            .jobs
            .iter()
            .enumerate()
            .map(|(job_id, routing)| {
                let ops = routing
                    .iter()
                    .map(|&(machine_id, processing_time)| {
                        let op = Operation::new(next_op_id, job_id, machine_id, processing_time);
                        next_op_id += 1;
                        op
                    })
                    .collect();
                Job::new(job_id, ops)
            })
            .collect::<Vec<_>>();
        let machines = (0..instance.machine_count).map(Machine::new).collect();

        Ok(Self {
            template: instance.clone(),
            current_time: vec![0; jobs.len()],
            jobs,
            machines,
        })
    }

    /// Instance this shop was built from.
    pub fn instance(&self) -> &Instance {
        &self.template
    }

    /// Instance name.
    pub fn name(&self) -> &str {
        &self.template.name
    }

    /// All jobs, indexed by job ID.
    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    /// A job by ID.
    pub fn job(&self, job_id: usize) -> Option<&Job> {
        self.jobs.get(job_id)
    }

    /// All machines, indexed by machine ID.
    pub fn machines(&self) -> &[Machine] {
        &self.machines
    }

    /// A machine by ID.
    pub fn machine(&self, machine_id: usize) -> Option<&Machine> {
        self.machines.get(machine_id)
    }

    /// Ledger entry of a job: end of its last scheduled operation, 0 initially.
    pub fn current_time(&self, job_id: usize) -> u64 {
        self.current_time.get(job_id).copied().unwrap_or(0)
    }

    /// Whether `operation`, the current operation of `job`, may be dispatched.
    ///
    /// Two conditions:
    /// 1. The operation's machine is available at the machine's own earliest
    ///    free time (not at the time this job could actually arrive; the
    ///    real start is computed by [`ShopState::commit`]).
    /// 2. The operation is the job's first, or the preceding one is scheduled.
    pub fn is_feasible(&self, job: &Job, operation: &Operation) -> bool {
        let machine_available = self
            .machines
            .get(operation.machine_id)
            .is_some_and(|m| m.is_available(m.earliest_free_time()));

        let precedence_satisfied = match job.cursor() {
            0 => true,
            _ => job.previous_operation().is_some_and(Operation::is_scheduled),
        };

        machine_available && precedence_satisfied
    }

    /// Feasibility of a job's current operation; `false` once the job is done.
    pub fn is_job_feasible(&self, job_id: usize) -> bool {
        self.jobs
            .get(job_id)
            .and_then(|job| job.current_operation().map(|op| (job, op)))
            .is_some_and(|(job, op)| self.is_feasible(job, op))
    }

    /// Schedules the current operation of a job and advances the job.
    ///
    /// The start is `max(ledger[job], machine.earliest_free_time())`.
    /// Returns the new end time, or `None` if the job has nothing left.
    pub fn commit(&mut self, job_id: usize) -> Option<u64> {
        let ready_at = self.current_time(job_id);
        let job = self.jobs.get_mut(job_id)?;
        let operation = job.current_operation_mut()?;
        let machine = self.machines.get_mut(operation.machine_id)?;

        let start_time = ready_at.max(machine.earliest_free_time());
        let end_time = machine.commit(operation, start_time);
        trace!(
            job = job_id,
            operation = operation.id,
            machine = machine.id,
            start = start_time,
            end = end_time,
            "committed operation"
        );

        job.advance();
        self.current_time[job_id] = end_time;
        Some(end_time)
    }

    /// Checks machine mutual exclusion and job precedence.
    pub fn verify(&self) -> std::result::Result<(), Violation> {
        verify_schedule(&self.jobs, &self.machines)
    }

    /// Whether every operation of every job is scheduled.
    pub fn is_complete(&self) -> bool {
        self.jobs.iter().all(|j| !j.has_remaining())
    }

    /// Latest end time over all machines.
    pub fn completion_time(&self) -> u64 {
        self.machines
            .iter()
            .map(Machine::earliest_free_time)
            .max()
            .unwrap_or(0)
    }

    /// Snapshot of every scheduled operation, in job order.
    pub fn schedule(&self) -> Schedule {
        let mut schedule = Schedule::new(self.name());
        for op in self.jobs.iter().flat_map(|j| j.operations()) {
            if let Some((start_time, end_time)) = op.interval() {
                schedule.add_assignment(Assignment {
                    operation_id: op.id,
                    job_id: op.job_id,
                    machine_id: op.machine_id,
                    start_time,
                    end_time,
                });
            }
        }
        schedule
    }

    /// Restores the freshly built state: cursors at 0, every operation
    /// unscheduled, machine logs empty, ledger zeroed.
    pub fn reset(&mut self) {
        for job in &mut self.jobs {
            job.reset();
        }
        for machine in &mut self.machines {
            machine.reset();
        }
        self.current_time.iter_mut().for_each(|t| *t = 0);
    }

    #[cfg(test)]
    pub(crate) fn job_mut(&mut self, job_id: usize) -> Option<&mut Job> {
        self.jobs.get_mut(job_id)
    }
}
