//! Schedule quality metrics (KPIs).
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Makespan (C_max) | Latest completion time |
//! | Avg Utilization | Mean machine busyness over the makespan |
//! | Total Idle Time | Sum over machines of (makespan - busy time) |
//! | Optimality Gap | (makespan - best known) / best known |
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 1.2: Performance Measures

use std::collections::BTreeMap;

use crate::models::Schedule;

/// Schedule performance indicators.
#[derive(Debug, Clone)]
pub struct ScheduleKpi {
    /// Makespan: latest completion time.
    pub makespan: u64,
    /// Average machine utilization (0.0..1.0).
    pub avg_utilization: f64,
    /// Per-machine utilization.
    pub utilization_by_machine: BTreeMap<usize, f64>,
    /// Idle time summed over machines that have assignments.
    pub total_idle_time: u64,
    /// Relative gap to the best known makespan, if one was given.
    pub optimality_gap: Option<f64>,
}

impl ScheduleKpi {
    /// Computes KPIs from a schedule.
    ///
    /// # Arguments
    /// * `schedule` - The dispatched schedule.
    /// * `best_known` - Optimum or best known upper bound, if any.
    pub fn calculate(schedule: &Schedule, best_known: Option<u64>) -> Self {
        let makespan = schedule.makespan();
        let utilization_by_machine = schedule.all_utilizations();

        let avg_utilization = if utilization_by_machine.is_empty() {
            0.0
        } else {
            let sum: f64 = utilization_by_machine.values().sum();
            sum / utilization_by_machine.len() as f64
        };

        let total_idle_time = utilization_by_machine
            .keys()
            .map(|&m| {
                let busy: u64 = schedule
                    .assignments_for_machine(m)
                    .iter()
                    .map(|a| a.duration())
                    .sum();
                makespan.saturating_sub(busy)
            })
            .sum();

        let optimality_gap = best_known
            .filter(|&best| best > 0)
            .map(|best| (makespan as f64 - best as f64) / best as f64);

        Self {
            makespan,
            avg_utilization,
            utilization_by_machine,
            total_idle_time,
            optimality_gap,
        }
    }
}
