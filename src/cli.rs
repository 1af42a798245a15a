//! Command-line interface built on clap.
//!
//! Subcommands: `run`, `list`, `verify`, `generate`; global `--verbose`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use u_jobshop::dispatching::Rule;

/// Job-shop dispatching simulator.
#[derive(Debug, Parser)]
#[command(name = "u-jobshop", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable debug logging (overridden by RUST_LOG).
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Dispatch an instance with one rule or all of them.
    Run(RunArgs),

    /// List registered benchmark instances, grouped by author.
    List {
        /// Benchmark registry file.
        #[arg(long, default_value = "instances.json")]
        registry: PathBuf,
    },

    /// Check that every registered instance file exists and matches its entry.
    Verify {
        /// Benchmark registry file.
        #[arg(long, default_value = "instances.json")]
        registry: PathBuf,
    },

    /// Write a random instance in the plain-text format.
    Generate {
        #[command(subcommand)]
        family: GenerateCommand,
    },
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Registered instance name (case-insensitive).
    #[arg(long, conflicts_with = "file", required_unless_present = "file")]
    pub instance: Option<String>,

    /// Instance file in the plain-text format.
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Benchmark registry file.
    #[arg(long, default_value = "instances.json")]
    pub registry: PathBuf,

    /// Dispatching rule.
    #[arg(long, value_enum, default_value_t = RuleArg::Fifo)]
    pub rule: RuleArg,

    /// Seed for the random rule.
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Results table (CSV) to write.
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Directory receiving one JSON schedule per rule.
    #[arg(long)]
    pub schedule_dir: Option<PathBuf>,
}

/// Rule selection accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RuleArg {
    Fifo,
    Lifo,
    Mwkr,
    Lwkr,
    Random,
    /// Every rule in turn, on a reset shop.
    All,
}

impl RuleArg {
    /// Rules to run, in order.
    pub fn rules(self) -> Vec<Rule> {
        match self {
            RuleArg::Fifo => vec![Rule::Fifo],
            RuleArg::Lifo => vec![Rule::Lifo],
            RuleArg::Mwkr => vec![Rule::Mwkr],
            RuleArg::Lwkr => vec![Rule::Lwkr],
            RuleArg::Random => vec![Rule::Random],
            RuleArg::All => Rule::ALL.to_vec(),
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum GenerateCommand {
    /// Taillard-style instance (separate time and routing seeds).
    Taillard {
        #[arg(long)]
        jobs: usize,
        #[arg(long)]
        machines: usize,
        #[arg(long, default_value_t = 0)]
        time_seed: u64,
        #[arg(long, default_value_t = 0)]
        machine_seed: u64,
        /// Output file.
        #[arg(long, short)]
        output: PathBuf,
    },

    /// Demirkol-style instance.
    Demirkol {
        #[arg(long)]
        jobs: usize,
        #[arg(long)]
        machines: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Split routings into two machine halves.
        #[arg(long, default_value_t = false)]
        two_set: bool,
        /// Output file.
        #[arg(long, short)]
        output: PathBuf,
    },
}
