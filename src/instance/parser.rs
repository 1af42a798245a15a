//! Plain-text instance format.
//!
//! ```text
//! 2 2            <- job_count machine_count
//! 0 3 1 2        <- job 0: (machine 0, 3) then (machine 1, 2)
//! 1 2 0 4        <- job 1
//! ```
//!
//! Blank lines and lines starting with `#` are skipped.

use std::path::Path;

use tracing::debug;

use super::{Instance, Routing};
use crate::error::{Result, ShopError};
use crate::validation::{validate_instance, ValidationError, ValidationErrorKind};

/// Parses an instance from text.
///
/// Fails with [`ShopError::InvalidInstance`] on any malformed line and on
/// every problem [`validate_instance`] reports; a returned instance is
/// always structurally valid.
pub fn parse_instance(name: &str, text: &str) -> Result<Instance> {
    let mut lines = text
        .lines()
        .map(str::trim)
        .enumerate()
        .filter(|(_, l)| !l.is_empty() && !l.starts_with('#'));

    let (header_no, header) = lines.next().ok_or_else(|| {
        ShopError::invalid(
            name,
            ValidationError::new(ValidationErrorKind::EmptyInstance, "Missing header line"),
        )
    })?;
    let header = parse_integers(name, header_no, header)?;
    if header.len() != 2 {
        return Err(malformed(
            name,
            header_no,
            format!("header needs 2 integers, found {}", header.len()),
        ));
    }
    let job_count = to_usize(name, header_no, header[0])?;
    let machine_count = to_usize(name, header_no, header[1])?;

    let mut jobs: Vec<Routing> = Vec::new();
    for (line_no, line) in lines {
        let values = parse_integers(name, line_no, line)?;
        if values.len() % 2 != 0 {
            return Err(malformed(
                name,
                line_no,
                format!("odd number of integers ({})", values.len()),
            ));
        }
        let routing = values
            .chunks_exact(2)
            .map(|pair| -> Result<(usize, u64)> {
                Ok((to_usize(name, line_no, pair[0])?, pair[1]))
            })
            .collect::<Result<Routing>>()?;
        jobs.push(routing);
    }

    let instance = Instance::new(name, job_count, machine_count, jobs);
    validate_instance(&instance).map_err(|errors| ShopError::InvalidInstance {
        name: name.to_string(),
        errors,
    })?;

    debug!(
        instance = name,
        jobs = job_count,
        machines = machine_count,
        "parsed instance"
    );
    Ok(instance)
}

/// Reads and parses an instance file, naming it after the file stem.
pub fn load_instance(path: impl AsRef<Path>) -> Result<Instance> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    parse_instance(&name, &text)
}

fn parse_integers(name: &str, line_no: usize, line: &str) -> Result<Vec<u64>> {
    line.split_whitespace()
        .map(|token| {
            token.parse::<u64>().map_err(|_| {
                malformed(name, line_no, format!("'{token}' is not a non-negative integer"))
            })
        })
        .collect()
}

fn to_usize(name: &str, line_no: usize, value: u64) -> Result<usize> {
    usize::try_from(value)
        .map_err(|_| malformed(name, line_no, format!("{value} does not fit an index")))
}

fn malformed(name: &str, line_no: usize, detail: String) -> ShopError {
    ShopError::invalid(
        name,
        ValidationError::new(
            ValidationErrorKind::Malformed,
            format!("Line {}: {detail}", line_no + 1),
        ),
    )
}
