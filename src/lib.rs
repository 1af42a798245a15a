//! Job-shop scheduling with priority dispatching rules.
//!
//! A job-shop instance has `n` jobs, each a fixed sequence of operations,
//! one per machine, with a processing time. A dispatcher repeatedly picks a
//! job whose next operation may start, commits that operation at the
//! earliest time both its job and its machine are free, and stops when every
//! operation is scheduled. The makespan is the completion time of the last
//! operation.
//!
//! # Modules
//!
//! - **`instance`**: Problem templates: text parser, benchmark registry,
//!   Taillard/Demirkol generators
//! - **`models`**: Per-run state: `Operation`, `Job`, `Machine`, `ShopState`,
//!   and the exported `Schedule`
//! - **`dispatching`**: `Rule` (FIFO, LIFO, MWKR, LWKR, RANDOM) and the
//!   `Dispatcher` loop
//! - **`validation`**: Instance integrity checks and schedule verification
//! - **`report`**: KPIs, CSV results and JSON schedule export
//!
//! # Example
//! ```
//! use u_jobshop::dispatching::{Dispatcher, Rule};
//! use u_jobshop::instance::parse_instance;
//! use u_jobshop::models::ShopState;
//!
//! let instance = parse_instance("tiny", "2 2\n0 3 1 2\n1 2 0 4\n").unwrap();
//! let mut shop = ShopState::new(&instance).unwrap();
//! let report = Dispatcher::new(Rule::Mwkr).run(&mut shop).unwrap();
//! assert_eq!(report.makespan, 7);
//! assert!(shop.verify().is_ok());
//! ```
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"
//! - Panwalkar & Iskander (1977), "A Survey of Scheduling Rules"
//! - Taillard (1993), "Benchmarks for basic scheduling problems"

pub mod dispatching;
pub mod error;
pub mod instance;
pub mod models;
pub mod report;
pub mod validation;

pub use error::{Result, ShopError};
