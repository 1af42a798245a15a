mod cli;

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{bail, Context};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cli::{Cli, Command, GenerateCommand, RunArgs};
use u_jobshop::dispatching::Dispatcher;
use u_jobshop::instance::{
    load_instance, BenchmarkRegistry, DemirkolGenerator, EntryStatus, Instance, RoutingKind,
    TaillardGenerator,
};
use u_jobshop::models::ShopState;
use u_jobshop::report::{write_csv_file, write_schedule_json, ResultRow, ScheduleKpi};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Run(args) => run(args),
        Command::List { registry } => list(&registry),
        Command::Verify { registry } => verify(&registry),
        Command::Generate { family } => generate(family),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

fn run(args: RunArgs) -> anyhow::Result<()> {
    let (instance, best_known) = match (&args.instance, &args.file) {
        (Some(name), _) => {
            let registry = BenchmarkRegistry::load(&args.registry).with_context(|| {
                format!("failed to read registry {}", args.registry.display())
            })?;
            let best_known = registry.lookup(name)?.best_known();
            (registry.load_instance(name)?, best_known)
        }
        (None, Some(path)) => (load_instance(path)?, None),
        (None, None) => bail!("either --instance or --file is required"),
    };

    info!(
        instance = %instance.name,
        jobs = instance.job_count,
        machines = instance.machine_count,
        lower_bound = instance.lower_bound(),
        "instance loaded"
    );

    let mut shop = ShopState::new(&instance)?;
    let mut rows = Vec::new();
    let mut failures = 0usize;

    for rule in args.rule.rules() {
        shop.reset();
        let mut dispatcher = Dispatcher::new(rule).with_seed(args.seed);
        let report = match dispatcher.run(&mut shop) {
            Ok(report) => report,
            Err(e) => {
                error!(%rule, "{e}");
                failures += 1;
                continue;
            }
        };

        let verified = match dispatcher.verify(&shop) {
            Ok(()) => "valid".to_string(),
            Err(violation) => {
                failures += 1;
                format!("INVALID: {violation}")
            }
        };

        let schedule = shop.schedule().with_rule(rule.name());
        let kpi = ScheduleKpi::calculate(&schedule, best_known);
        let gap = kpi
            .optimality_gap
            .map(|g| format!(", gap {:.2}%", g * 100.0))
            .unwrap_or_default();
        println!(
            "{:<7}{}: makespan {} (avg utilization {:.1}%{}) [{}]",
            rule.name(),
            instance.name,
            report.makespan,
            kpi.avg_utilization * 100.0,
            gap,
            verified
        );

        if let Some(dir) = &args.schedule_dir {
            std::fs::create_dir_all(dir)?;
            let path = dir.join(format!(
                "{}_{}.json",
                instance.name,
                rule.name().to_lowercase()
            ));
            write_schedule_json(BufWriter::new(File::create(&path)?), &schedule)
                .with_context(|| format!("failed to write {}", path.display()))?;
        }

        rows.push(ResultRow::new(
            rule.name().to_lowercase(),
            &instance.name,
            report.makespan,
        ));
    }

    if let Some(output) = &args.output {
        write_csv_file(output, &rows)
            .with_context(|| format!("failed to write {}", output.display()))?;
        info!(path = %output.display(), rows = rows.len(), "results written");
    }

    if failures > 0 {
        bail!("{failures} rule run(s) failed");
    }
    Ok(())
}

fn list(registry: &Path) -> anyhow::Result<()> {
    let registry = BenchmarkRegistry::load(registry)
        .with_context(|| format!("failed to read registry {}", registry.display()))?;
    for (author, entries) in registry.by_author() {
        println!("{author}");
        for entry in entries {
            let best = entry
                .best_known()
                .map(|b| b.to_string())
                .unwrap_or_else(|| "-".into());
            let kind = if entry.optimum.is_some() { "opt" } else { "ub" };
            println!(
                "  {:<10} {:>4} x {:<4} {kind} {best}",
                entry.name, entry.jobs, entry.machines
            );
        }
    }
    Ok(())
}

fn verify(registry: &Path) -> anyhow::Result<()> {
    let registry = BenchmarkRegistry::load(registry)
        .with_context(|| format!("failed to read registry {}", registry.display()))?;
    let mut problems = 0usize;
    for check in registry.verify_entries() {
        match check.status {
            EntryStatus::Ok => println!("ok       {}", check.name),
            EntryStatus::Missing(path) => {
                problems += 1;
                println!("missing  {} ({})", check.name, path.display());
            }
            EntryStatus::CountMismatch { expected, found } => {
                problems += 1;
                println!(
                    "mismatch {} (registered {}x{}, file {}x{})",
                    check.name, expected.0, expected.1, found.0, found.1
                );
            }
            EntryStatus::Unreadable(reason) => {
                problems += 1;
                println!("error    {} ({reason})", check.name);
            }
        }
    }
    if problems > 0 {
        bail!("{problems} of {} entries failed verification", registry.len());
    }
    Ok(())
}

fn generate(family: GenerateCommand) -> anyhow::Result<()> {
    let (instance, output): (Instance, _) = match family {
        GenerateCommand::Taillard {
            jobs,
            machines,
            time_seed,
            machine_seed,
            output,
        } => {
            let name = file_stem(&output);
            let instance =
                TaillardGenerator::new(jobs, machines, time_seed, machine_seed).generate(name);
            (instance, output)
        }
        GenerateCommand::Demirkol {
            jobs,
            machines,
            seed,
            two_set,
            output,
        } => {
            let kind = if two_set {
                RoutingKind::TwoSet
            } else {
                RoutingKind::Classic
            };
            let name = file_stem(&output);
            let instance = DemirkolGenerator::new(jobs, machines)
                .with_kind(kind)
                .with_seed(seed)
                .generate(name);
            (instance, output)
        }
    };

    // Reject degenerate sizes before writing anything.
    ShopState::new(&instance)?;
    std::fs::write(&output, instance.to_text())
        .with_context(|| format!("failed to write {}", output.display()))?;
    info!(
        path = %output.display(),
        jobs = instance.job_count,
        machines = instance.machine_count,
        "instance generated"
    );
    Ok(())
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "generated".into())
}
