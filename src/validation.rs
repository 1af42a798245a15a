//! Integrity checks for instances and schedules.
//!
//! Two checks live here:
//! - [`validate_instance`]: structural checks on an instance before a shop
//!   is built from it (counts, machine references, processing times). All
//!   problems are collected.
//! - [`verify_schedule`]: post-hoc checks on a (possibly partial) schedule:
//!   machine mutual exclusion and job precedence. Stops at the first
//!   violation.

use crate::instance::Instance;
use crate::models::{Job, Machine, Violation};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// No jobs or no machines.
    EmptyInstance,
    /// Text could not be read as integers in the expected layout.
    Malformed,
    /// Number of job records differs from the declared job count.
    JobCountMismatch,
    /// A job does not have one operation per machine.
    OperationCountMismatch,
    /// An operation references a machine outside `0..machine_count`.
    MachineOutOfRange,
    /// An operation has no processing time.
    ZeroProcessingTime,
    /// The summed processing time does not fit the time type.
    ProcessingTimeOverflow,
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates the structure of an instance.
///
/// Checks:
/// 1. At least one job and one machine
/// 2. Number of job records matches `job_count`
/// 3. Every job has exactly `machine_count` operations
/// 4. Every machine id is below `machine_count`
/// 5. Every processing time is positive
/// 6. The sum of all processing times fits in `u64`, which bounds every
///    start and end time a dispatch run can produce
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_instance(instance: &Instance) -> ValidationResult {
    let mut errors = Vec::new();

    if instance.job_count == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyInstance,
            "Instance declares no jobs",
        ));
    }
    if instance.machine_count == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyInstance,
            "Instance declares no machines",
        ));
    }

    if instance.jobs.len() != instance.job_count {
        errors.push(ValidationError::new(
            ValidationErrorKind::JobCountMismatch,
            format!(
                "Expected {} job records, found {}",
                instance.job_count,
                instance.jobs.len()
            ),
        ));
    }

    for (job_id, routing) in instance.jobs.iter().enumerate() {
        if routing.len() != instance.machine_count {
            errors.push(ValidationError::new(
                ValidationErrorKind::OperationCountMismatch,
                format!(
                    "Job {job_id} has {} operations, expected {}",
                    routing.len(),
                    instance.machine_count
                ),
            ));
        }

        for (position, &(machine_id, processing_time)) in routing.iter().enumerate() {
            if machine_id >= instance.machine_count {
                errors.push(ValidationError::new(
                    ValidationErrorKind::MachineOutOfRange,
                    format!(
                        "Job {job_id} operation {position} references machine {machine_id} \
                         (machine count {})",
                        instance.machine_count
                    ),
                ));
            }
            if processing_time == 0 {
                errors.push(ValidationError::new(
                    ValidationErrorKind::ZeroProcessingTime,
                    format!("Job {job_id} operation {position} has zero processing time"),
                ));
            }
        }
    }

    let total = instance
        .jobs
        .iter()
        .flatten()
        .try_fold(0u64, |acc, &(_, p)| acc.checked_add(p));
    if total.is_none() {
        errors.push(ValidationError::new(
            ValidationErrorKind::ProcessingTimeOverflow,
            "Total processing time exceeds the representable time range",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Verifies machine mutual exclusion and job precedence.
///
/// Machine logs are scanned in start-time order; job operations in sequence
/// order, skipping pairs where either side is unscheduled. Jobs are
/// identified by their `id` field.
pub fn verify_schedule(jobs: &[Job], machines: &[Machine]) -> Result<(), Violation> {
    for machine in machines {
        let mut slots = machine.log().to_vec();
        slots.sort_by_key(|s| s.start_time);
        for pair in slots.windows(2) {
            let (prev, curr) = (&pair[0], &pair[1]);
            if curr.start_time < prev.end_time {
                return Err(Violation::MachineOverlap {
                    machine_id: machine.id,
                    op_a: prev.operation_id,
                    op_b: curr.operation_id,
                });
            }
        }
    }

    for job in jobs {
        for pair in job.operations().windows(2) {
            let (prev, curr) = (&pair[0], &pair[1]);
            if let (Some(prev_end), Some(curr_start)) = (prev.end_time(), curr.start_time()) {
                if curr_start < prev_end {
                    return Err(Violation::PrecedenceViolation {
                        job_id: job.id,
                        op_a: prev.id,
                        op_b: curr.id,
                    });
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Operation;

    fn sample_instance() -> Instance {
        Instance::new(
            "sample",
            2,
            2,
            vec![vec![(0, 3), (1, 2)], vec![(1, 2), (0, 4)]],
        )
    }

    fn error_kinds(instance: &Instance) -> Vec<ValidationErrorKind> {
        validate_instance(instance)
            .unwrap_err()
            .into_iter()
            .map(|e| e.kind)
            .collect()
    }

    #[test]
    fn test_valid_instance() {
        assert!(validate_instance(&sample_instance()).is_ok());
    }

    #[test]
    fn test_empty_instance() {
        let inst = Instance::new("empty", 0, 0, Vec::new());
        let kinds = error_kinds(&inst);
        assert_eq!(
            kinds,
            vec![
                ValidationErrorKind::EmptyInstance,
                ValidationErrorKind::EmptyInstance
            ]
        );
    }

    #[test]
    fn test_job_count_mismatch() {
        let mut inst = sample_instance();
        inst.job_count = 3;
        assert_eq!(error_kinds(&inst), vec![ValidationErrorKind::JobCountMismatch]);
    }

    #[test]
    fn test_operation_count_mismatch() {
        let mut inst = sample_instance();
        inst.jobs[1].pop();
        assert_eq!(
            error_kinds(&inst),
            vec![ValidationErrorKind::OperationCountMismatch]
        );
    }

    #[test]
    fn test_machine_out_of_range() {
        let mut inst = sample_instance();
        inst.jobs[0][1] = (5, 2);
        let errors = validate_instance(&inst).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::MachineOutOfRange);
        assert!(errors[0].message.contains("machine 5"));
    }

    #[test]
    fn test_zero_processing_time() {
        let mut inst = sample_instance();
        inst.jobs[0][0] = (0, 0);
        assert_eq!(
            error_kinds(&inst),
            vec![ValidationErrorKind::ZeroProcessingTime]
        );
    }

    #[test]
    fn test_total_processing_time_overflow() {
        let half = u64::MAX / 2 + 1;
        let inst = Instance::new("overflow", 2, 1, vec![vec![(0, half)], vec![(0, half)]]);
        assert_eq!(
            error_kinds(&inst),
            vec![ValidationErrorKind::ProcessingTimeOverflow]
        );

        // Exactly u64::MAX in total is still representable.
        let edge = Instance::new(
            "edge",
            2,
            1,
            vec![vec![(0, u64::MAX - 1)], vec![(0, 1)]],
        );
        assert!(validate_instance(&edge).is_ok());
    }

    #[test]
    fn test_multiple_errors() {
        let mut inst = sample_instance();
        inst.jobs[0][0] = (9, 0);
        inst.jobs[1].push((0, 1));
        assert!(validate_instance(&inst).unwrap_err().len() >= 3);
    }

    fn job_with(id: usize, intervals: &[(usize, u64, Option<u64>)]) -> Job {
        let ops = intervals
            .iter()
            .enumerate()
            .map(|(i, &(machine, p, start))| {
                let mut op = Operation::new(id * 10 + i, id, machine, p);
                if let Some(s) = start {
                    op.commit(s);
                }
                op
            })
            .collect();
        Job::new(id, ops)
    }

    #[test]
    fn test_verify_accepts_valid_schedule() {
        let mut ops = vec![Operation::new(0, 0, 0, 3), Operation::new(1, 0, 1, 2)];
        let mut machines = vec![Machine::new(0), Machine::new(1)];
        machines[0].commit(&mut ops[0], 0);
        machines[1].commit(&mut ops[1], 3);
        let job = Job::new(0, ops);

        assert!(verify_schedule(&[job], &machines).is_ok());
    }

    // Machine::commit refuses overlapping starts in debug builds, so the
    // overlapping log is injected through serde.
    fn overlapping_machine() -> Machine {
        let mut machine = Machine::new(0);
        let mut first = Operation::new(0, 0, 0, 5);
        machine.commit(&mut first, 0);

        let mut value = serde_json::to_value(&machine).unwrap();
        value["log"].as_array_mut().unwrap().push(serde_json::json!({
            "operation_id": 1,
            "job_id": 1,
            "start_time": 2,
            "end_time": 7
        }));
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_verify_detects_machine_overlap() {
        let violation = verify_schedule(&[], &[overlapping_machine()]).unwrap_err();
        assert_eq!(
            violation,
            Violation::MachineOverlap {
                machine_id: 0,
                op_a: 0,
                op_b: 1
            }
        );
    }

    #[test]
    fn test_verify_detects_precedence_violation() {
        let job = job_with(4, &[(0, 5, Some(0)), (1, 2, Some(3))]);
        let violation = verify_schedule(&[job], &[]).unwrap_err();
        assert_eq!(
            violation,
            Violation::PrecedenceViolation {
                job_id: 4,
                op_a: 40,
                op_b: 41
            }
        );
    }

    #[test]
    fn test_verify_skips_unscheduled_pairs() {
        let job = job_with(1, &[(0, 5, Some(0)), (1, 2, None), (0, 1, Some(1))]);
        assert!(verify_schedule(&[job], &[]).is_ok());
    }
}
