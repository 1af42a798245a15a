//! Machine model.
//!
//! A machine processes one operation at a time. It keeps an append-only log
//! of the operations committed to it, in commit order.
//!
//! The log is sorted by start time and non-overlapping only because the
//! dispatcher commits to each machine in non-decreasing start order; this is
//! not re-checked on append. [`crate::models::ShopState::verify`] checks it
//! after the fact.

use serde::{Deserialize, Serialize};

use super::Operation;

/// One committed entry in a machine log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineSlot {
    /// Operation identifier.
    pub operation_id: usize,
    /// Owning job of the operation.
    pub job_id: usize,
    /// Start time.
    pub start_time: u64,
    /// End time (exclusive).
    pub end_time: u64,
}

/// A machine and its committed operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Machine {
    /// Machine identifier.
    pub id: usize,
    log: Vec<MachineSlot>,
}

impl Machine {
    /// Creates an idle machine.
    pub fn new(id: usize) -> Self {
        Self {
            id,
            log: Vec::new(),
        }
    }

    /// Committed operations in commit order.
    pub fn log(&self) -> &[MachineSlot] {
        &self.log
    }

    /// Whether an operation could start at `at_time` after everything
    /// already committed.
    pub fn is_available(&self, at_time: u64) -> bool {
        self.log
            .last()
            .map_or(true, |slot| slot.end_time <= at_time)
    }

    /// End of the last committed operation, or 0 when idle.
    pub fn earliest_free_time(&self) -> u64 {
        self.log.last().map_or(0, |slot| slot.end_time)
    }

    /// Schedules `operation` at `start_time` and appends it to the log.
    ///
    /// `start_time` must be at least [`Machine::earliest_free_time`].
    /// Returns the operation's end time.
    pub fn commit(&mut self, operation: &mut Operation, start_time: u64) -> u64 {
        debug_assert!(start_time >= self.earliest_free_time());
        operation.commit(start_time);
        let end_time = start_time + operation.processing_time;
        self.log.push(MachineSlot {
            operation_id: operation.id,
            job_id: operation.job_id,
            start_time,
            end_time,
        });
        end_time
    }

    /// Clears the log.
    pub fn reset(&mut self) {
        self.log.clear();
    }
}
