//! Greedy dispatching over a shop state.
//!
//! Each round, every unfinished job whose current operation is feasible is
//! a candidate; the active [`Rule`] picks one, and its operation is
//! committed. The run ends when all jobs are done (Finished) or when jobs
//! remain but none is feasible (Stalled, reported as an error).
//!
//! # Usage
//!
//! ```
//! use u_jobshop::dispatching::{Dispatcher, Rule};
//! use u_jobshop::instance::Instance;
//! use u_jobshop::models::ShopState;
//!
//! let instance = Instance::new("demo", 2, 2, vec![
//!     vec![(0, 3), (1, 2)],
//!     vec![(1, 2), (0, 4)],
//! ]);
//! let mut shop = ShopState::new(&instance).unwrap();
//!
//! let report = Dispatcher::new(Rule::Fifo).run(&mut shop).unwrap();
//! assert_eq!(report.makespan, 7);
//! assert!(shop.verify().is_ok());
//! ```
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 4
//! - Haupt (1989), "A Survey of Priority Rule-Based Scheduling"

mod dispatcher;
pub mod rules;

pub use dispatcher::{run_all, DispatchReport, DispatchState, Dispatcher, Makespan};
pub use rules::{Rule, SortOrder, UnknownRule};

/// Key computed by a dispatching rule for one job.
pub type RuleScore = f64;
