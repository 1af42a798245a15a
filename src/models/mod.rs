//! Job-shop domain models.
//!
//! Leaves first:
//!
//! | Type | Role |
//! |------|------|
//! | `Operation` | One job step on one machine; unscheduled or scheduled |
//! | `Job` | Ordered operations (precedence) plus a cursor |
//! | `Machine` | Append-only log of committed operations |
//! | `ShopState` | Jobs + machines + per-job time ledger |
//! | `Schedule` | Detached per-operation snapshot for reporting |

mod job;
mod machine;
mod operation;
mod schedule;
mod shop;

pub use job::Job;
pub use machine::{Machine, MachineSlot};
pub use operation::{Operation, OperationState};
pub use schedule::{Assignment, Schedule, Violation};
pub use shop::ShopState;
