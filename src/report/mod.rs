//! Reporting: KPIs and exports.
//!
//! `ScheduleKpi` summarizes a dispatched schedule; the export functions
//! write the results table (CSV) and per-rule schedules (JSON) consumed by
//! external tooling such as Gantt renderers.
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 1
//! - Baker & Trietsch (2019), "Principles of Sequencing and Scheduling"

mod export;
mod kpi;

pub use export::{write_csv, write_csv_file, write_schedule_json, ResultRow};
pub use kpi::ScheduleKpi;
