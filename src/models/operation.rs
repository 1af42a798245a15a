//! Operation model.
//!
//! An operation is the smallest schedulable unit of work: one job step on
//! one machine for a fixed processing time. Its identity and work content
//! never change; only its schedule state does.
//!
//! # Schedule State
//!
//! The start/end pair is held in a single tagged [`OperationState`], so an
//! operation is either fully unscheduled or fully scheduled with
//! `end_time = start_time + processing_time`.

use serde::{Deserialize, Serialize};

/// Schedule state of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OperationState {
    /// Not yet placed on its machine.
    #[default]
    Unscheduled,
    /// Placed on its machine during `[start_time, end_time)`.
    Scheduled { start_time: u64, end_time: u64 },
}

/// A single processing step of a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    /// Instance-wide operation identifier.
    pub id: usize,
    /// Owning job.
    pub job_id: usize,
    /// Machine that must process this operation.
    pub machine_id: usize,
    /// Processing time in time units.
    pub processing_time: u64,
    state: OperationState,
}

impl Operation {
    /// Creates an unscheduled operation.
    pub fn new(id: usize, job_id: usize, machine_id: usize, processing_time: u64) -> Self {
        Self {
            id,
            job_id,
            machine_id,
            processing_time,
            state: OperationState::Unscheduled,
        }
    }

    /// Current schedule state.
    #[inline]
    pub fn state(&self) -> OperationState {
        self.state
    }

    /// Places the operation at `start_time`.
    ///
    /// Calling this on an already scheduled operation overwrites the prior
    /// placement; the dispatcher commits each operation exactly once.
    pub fn commit(&mut self, start_time: u64) {
        self.state = OperationState::Scheduled {
            start_time,
            end_time: start_time + self.processing_time,
        };
    }

    /// Returns the operation to `Unscheduled`.
    pub fn reset(&mut self) {
        self.state = OperationState::Unscheduled;
    }

    /// Whether the operation has been placed.
    #[inline]
    pub fn is_scheduled(&self) -> bool {
        matches!(self.state, OperationState::Scheduled { .. })
    }

    /// Scheduled start time, if placed.
    pub fn start_time(&self) -> Option<u64> {
        match self.state {
            OperationState::Scheduled { start_time, .. } => Some(start_time),
            OperationState::Unscheduled => None,
        }
    }

    /// Scheduled end time, if placed.
    pub fn end_time(&self) -> Option<u64> {
        match self.state {
            OperationState::Scheduled { end_time, .. } => Some(end_time),
            OperationState::Unscheduled => None,
        }
    }

    /// Scheduled `(start, end)` interval, if placed.
    pub fn interval(&self) -> Option<(u64, u64)> {
        match self.state {
            OperationState::Scheduled {
                start_time,
                end_time,
            } => Some((start_time, end_time)),
            OperationState::Unscheduled => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_unscheduled() {
        let op = Operation::new(0, 1, 2, 5);
        assert_eq!(op.state(), OperationState::Unscheduled);
        assert!(!op.is_scheduled());
        assert_eq!(op.start_time(), None);
        assert_eq!(op.end_time(), None);
    }

    #[test]
    fn test_commit_sets_both_times() {
        let mut op = Operation::new(0, 0, 0, 7);
        op.commit(3);
        assert_eq!(
            op.state(),
            OperationState::Scheduled {
                start_time: 3,
                end_time: 10
            }
        );
        assert_eq!(op.interval(), Some((3, 10)));
    }

    #[test]
    fn test_commit_twice_overwrites() {
        let mut op = Operation::new(0, 0, 0, 2);
        op.commit(0);
        op.commit(5);
        assert_eq!(op.interval(), Some((5, 7)));
    }

    #[test]
    fn test_reset() {
        let mut op = Operation::new(0, 0, 0, 2);
        op.commit(4);
        op.reset();
        assert!(!op.is_scheduled());
        assert_eq!(op.interval(), None);
    }
}
