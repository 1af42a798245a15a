//! Crate-level error type.

use thiserror::Error;

use crate::validation::ValidationError;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ShopError>;

/// Errors surfaced by instance loading, registry lookup and dispatching.
#[derive(Debug, Error)]
pub enum ShopError {
    /// No benchmark entry is registered under this name.
    #[error("Instance '{0}' not found in benchmark registry")]
    InstanceNotFound(String),

    /// The instance description is structurally invalid.
    #[error("Invalid instance '{name}': {}", join_messages(.errors))]
    InvalidInstance {
        name: String,
        errors: Vec<ValidationError>,
    },

    /// Jobs remain but none of them has a feasible operation.
    #[error(
        "Dispatch stalled with {jobs_remaining} job(s) remaining (partial makespan {partial_makespan})"
    )]
    DispatchStalled {
        jobs_remaining: usize,
        partial_makespan: u64,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ShopError {
    /// Builds an `InvalidInstance` error from a single problem.
    pub(crate) fn invalid(name: impl Into<String>, error: ValidationError) -> Self {
        Self::InvalidInstance {
            name: name.into(),
            errors: vec![error],
        }
    }
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
