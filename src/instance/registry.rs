//! Benchmark registry.
//!
//! A JSON array describing named benchmark instances:
//!
//! ```json
//! [
//!   { "name": "ft06", "jobs": 6, "machines": 6, "optimum": 55,
//!     "path": "instances/ft06", "author": "Fisher and Thompson" },
//!   { "name": "ta51", "jobs": 50, "machines": 15, "optimum": null,
//!     "bounds": { "upper": 2760, "lower": 2760 }, "path": "instances/ta51" }
//! ]
//! ```
//!
//! Names are matched case-insensitively. Relative paths are resolved
//! against the registry file's directory.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{load_instance, Instance};
use crate::error::{Result, ShopError};

/// Known makespan bounds of an instance whose optimum is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    /// Best known makespan.
    pub upper: u64,
    /// Best proven lower bound.
    pub lower: u64,
}

/// One registered benchmark instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchmarkEntry {
    /// Lookup key.
    pub name: String,
    /// Number of jobs.
    pub jobs: usize,
    /// Number of machines.
    pub machines: usize,
    /// Proven optimal makespan, if known.
    #[serde(default)]
    pub optimum: Option<u64>,
    /// Makespan bounds, if the optimum is open.
    #[serde(default)]
    pub bounds: Option<Bounds>,
    /// Instance file location.
    pub path: PathBuf,
    /// Benchmark author(s).
    #[serde(default)]
    pub author: Option<String>,
    /// Free-form notes.
    #[serde(default)]
    pub info: Option<String>,
}

impl BenchmarkEntry {
    /// The optimum, or else the best known upper bound.
    pub fn best_known(&self) -> Option<u64> {
        self.optimum.or(self.bounds.map(|b| b.upper))
    }
}

/// Outcome of checking one registry entry against its file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryCheck {
    /// Entry name.
    pub name: String,
    /// Result of the check.
    pub status: EntryStatus,
}

/// Result of checking an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryStatus {
    /// File exists, parses, and matches the registered counts.
    Ok,
    /// File does not exist.
    Missing(PathBuf),
    /// File header disagrees with the registered counts.
    CountMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },
    /// File exists but could not be read or parsed.
    Unreadable(String),
}

/// A set of named benchmark instances.
#[derive(Debug, Clone, Default)]
pub struct BenchmarkRegistry {
    entries: Vec<BenchmarkEntry>,
    base_dir: PathBuf,
}

impl BenchmarkRegistry {
    /// Creates a registry from entries; relative paths resolve against `base_dir`.
    pub fn new(entries: Vec<BenchmarkEntry>, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            entries,
            base_dir: base_dir.into(),
        }
    }

    /// Parses a registry from JSON; relative paths resolve against the
    /// working directory.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let entries: Vec<BenchmarkEntry> = serde_json::from_str(json)?;
        Ok(Self::new(entries, PathBuf::new()))
    }

    /// Reads a registry file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let entries: Vec<BenchmarkEntry> = serde_json::from_str(&text)?;
        debug!(
            registry = %path.display(),
            entries = entries.len(),
            "loaded benchmark registry"
        );
        let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(Self::new(entries, base_dir))
    }

    /// All entries, in file order.
    pub fn entries(&self) -> &[BenchmarkEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Finds an entry by name (case-insensitive).
    pub fn lookup(&self, name: &str) -> Result<&BenchmarkEntry> {
        self.entries
            .iter()
            .find(|e| e.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| ShopError::InstanceNotFound(name.to_string()))
    }

    /// Resolved file path of an entry.
    pub fn resolve_path(&self, entry: &BenchmarkEntry) -> PathBuf {
        if entry.path.is_absolute() {
            entry.path.clone()
        } else {
            self.base_dir.join(&entry.path)
        }
    }

    /// Looks up and loads an instance; the instance takes the entry's name.
    pub fn load_instance(&self, name: &str) -> Result<Instance> {
        let entry = self.lookup(name)?;
        let mut instance = load_instance(self.resolve_path(entry))?;
        instance.name = entry.name.clone();
        Ok(instance)
    }

    /// Entries grouped by author, preserving file order within each group.
    pub fn by_author(&self) -> BTreeMap<String, Vec<&BenchmarkEntry>> {
        let mut groups: BTreeMap<String, Vec<&BenchmarkEntry>> = BTreeMap::new();
        for entry in &self.entries {
            let author = entry.author.clone().unwrap_or_else(|| "unknown".into());
            groups.entry(author).or_default().push(entry);
        }
        groups
    }

    /// Checks every entry's file against its registered job and machine counts.
    pub fn verify_entries(&self) -> Vec<EntryCheck> {
        self.entries
            .iter()
            .map(|entry| EntryCheck {
                name: entry.name.clone(),
                status: self.check_entry(entry),
            })
            .collect()
    }

    fn check_entry(&self, entry: &BenchmarkEntry) -> EntryStatus {
        let path = self.resolve_path(entry);
        if !path.is_file() {
            return EntryStatus::Missing(path);
        }
        match load_instance(&path) {
            Ok(inst) if (inst.job_count, inst.machine_count) == (entry.jobs, entry.machines) => {
                EntryStatus::Ok
            }
            Ok(inst) => EntryStatus::CountMismatch {
                expected: (entry.jobs, entry.machines),
                found: (inst.job_count, inst.machine_count),
            },
            Err(e) => EntryStatus::Unreadable(e.to_string()),
        }
    }
}
