//! Job model.
//!
//! A job is a strictly ordered sequence of operations. Sequence order is
//! precedence order: operation `i + 1` may not start before operation `i`
//! has finished.
//!
//! # Cursor
//! The cursor marks the first unscheduled operation. Operations before the
//! cursor are scheduled, operations at or after it are not. The cursor only
//! moves forward during a run and returns to 0 on [`Job::reset`].

use serde::{Deserialize, Serialize};

use super::Operation;

/// A job: an ordered operation sequence plus scheduling progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    /// Job identifier (index into the shop's job list).
    pub id: usize,
    operations: Vec<Operation>,
    cursor: usize,
}

impl Job {
    /// Creates a job with the given operations in precedence order.
    pub fn new(id: usize, operations: Vec<Operation>) -> Self {
        Self {
            id,
            operations,
            cursor: 0,
        }
    }

    /// All operations in precedence order.
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Number of operations.
    pub fn operation_count(&self) -> usize {
        self.operations.len()
    }

    /// Index of the first unscheduled operation.
    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The operation at the cursor, or `None` once every operation is scheduled.
    pub fn current_operation(&self) -> Option<&Operation> {
        self.operations.get(self.cursor)
    }

    pub(crate) fn current_operation_mut(&mut self) -> Option<&mut Operation> {
        self.operations.get_mut(self.cursor)
    }

    /// The operation right before the cursor, if any.
    pub fn previous_operation(&self) -> Option<&Operation> {
        self.cursor
            .checked_sub(1)
            .and_then(|i| self.operations.get(i))
    }

    /// Moves the cursor past the current operation.
    ///
    /// The caller must have scheduled the current operation first.
    pub fn advance(&mut self) {
        debug_assert!(
            self.current_operation().is_some_and(Operation::is_scheduled),
            "advancing past an unscheduled operation"
        );
        self.cursor = (self.cursor + 1).min(self.operations.len());
    }

    /// Whether any operation is still unscheduled.
    #[inline]
    pub fn has_remaining(&self) -> bool {
        self.cursor < self.operations.len()
    }

    /// Sum of processing times from the cursor onward.
    pub fn remaining_processing_time(&self) -> u64 {
        self.operations[self.cursor..]
            .iter()
            .map(|op| op.processing_time)
            .sum()
    }

    /// Sum of processing times over all operations.
    pub fn total_processing_time(&self) -> u64 {
        self.operations.iter().map(|op| op.processing_time).sum()
    }

    /// Remaining work as a fraction of total work, in `[0, 1]`.
    ///
    /// Returns 0 for a job without work.
    pub fn normalized_remaining_processing_time(&self) -> f64 {
        let total = self.total_processing_time();
        if total == 0 {
            return 0.0;
        }
        self.remaining_processing_time() as f64 / total as f64
    }

    /// Rewinds the cursor and unschedules every operation.
    pub fn reset(&mut self) {
        self.cursor = 0;
        for op in &mut self.operations {
            op.reset();
        }
    }

    #[cfg(test)]
    pub(crate) fn force_cursor(&mut self, cursor: usize) {
        self.cursor = cursor;
    }
}
