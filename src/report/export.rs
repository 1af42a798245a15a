//! Result and schedule export.
//!
//! - CSV rows `Algorithm,Instance,Makespan`, one per dispatch run.
//! - JSON schedules: the per-operation `(job, machine, start, end)` tuples
//!   for external Gantt rendering.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::Schedule;

/// One line of the results table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRow {
    /// Rule name, lowercase (e.g. "fifo").
    pub rule: String,
    /// Instance name.
    pub instance: String,
    /// Makespan of the run.
    pub makespan: u64,
}

impl ResultRow {
    pub fn new(rule: impl Into<String>, instance: impl Into<String>, makespan: u64) -> Self {
        Self {
            rule: rule.into(),
            instance: instance.into(),
            makespan,
        }
    }
}

/// Writes the results table as CSV.
pub fn write_csv<W: Write>(mut writer: W, rows: &[ResultRow]) -> Result<()> {
    writeln!(writer, "Algorithm,Instance,Makespan")?;
    for row in rows {
        writeln!(
            writer,
            "{},{},{}",
            csv_field(&row.rule),
            csv_field(&row.instance),
            row.makespan
        )?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes the results table to a CSV file, creating parent directories.
pub fn write_csv_file(path: impl AsRef<Path>, rows: &[ResultRow]) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    write_csv(BufWriter::new(File::create(path)?), rows)
}

/// Writes a schedule as pretty-printed JSON.
pub fn write_schedule_json<W: Write>(writer: W, schedule: &Schedule) -> Result<()> {
    serde_json::to_writer_pretty(writer, schedule)?;
    Ok(())
}

// Quotes a field if it contains a delimiter, quote or newline.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
