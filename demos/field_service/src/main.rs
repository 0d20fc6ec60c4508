//! field_service: runs the field-service support network on the qnet kernel.
//!
//! ```bash
//! # One 8-hour shift with a fixed seed, CSV trace into ./out
//! field_service --seed 42 --output ./out
//!
//! # A custom topology, per-event logging
//! RUST_LOG=debug field_service --topology network.json --end-time 40
//! ```

mod network;


use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use qn_core::SimConfig;
use qn_output::{CsvWriter, TraceOutputObserver};
use qn_sim::{RunSummary, SimObserver, Simulation, TopologyConfig, TracingObserver};
use tracing::{info, warn};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use network::{RepairAccounting, field_service};

/// Field-service call-center simulation.
#[derive(Parser, Debug)]
#[command(name = "field_service")]
#[command(version, about, long_about = None)]
struct Args {
    /// Simulation horizon in hours.
    #[arg(long, default_value = "8.0")]
    end_time: f64,

    /// Random seed for reproducible results.  When omitted, a random seed is used.
    #[arg(long)]
    seed: Option<u64>,

    /// Load the network from a JSON topology file instead of the built-in one.
    #[arg(long)]
    topology: Option<PathBuf>,

    /// Directory for `trace.csv` and `station_summary.csv`.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Print the built-in topology as JSON and exit.
    #[arg(long)]
    dump_topology: bool,

    /// Print the run summary as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = SimConfig::new(args.end_time, args.seed);

    if args.dump_topology {
        println!("{}", field_service(config).topology().to_json_pretty()?);
        return Ok(());
    }

    let mut sim = build(&args, config)?;
    info!(end_time = args.end_time, "beginning simulation");

    let summary = match &args.output {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating output directory {}", dir.display()))?;
            let writer = CsvWriter::new(dir)?;
            let mut observers = (TracingObserver::new(), TraceOutputObserver::new(writer));
            let summary = run(&mut sim, &mut observers)?;
            if let Some(e) = observers.1.take_error() {
                warn!(error = %e, "output incomplete");
            }
            info!(dir = %dir.display(), "wrote trace.csv and station_summary.csv");
            summary
        }
        None => run(&mut sim, &mut TracingObserver::new())?,
    };

    let repair_center = RepairAccounting::from_summary(&summary);
    if args.json {
        let report = Report { summary: &summary, repair_center };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&summary, repair_center.as_ref());
    }
    Ok(())
}

/// `--json` output: the run summary plus the repair-center figures.
#[derive(Serialize)]
struct Report<'a> {
    #[serde(flatten)]
    summary:       &'a RunSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    repair_center: Option<RepairAccounting>,
}

fn build(args: &Args, config: SimConfig) -> Result<Simulation> {
    let sim = match &args.topology {
        Some(path) => TopologyConfig::from_json_file(path)
            .with_context(|| format!("loading topology {}", path.display()))?
            .build(&config)?,
        None => field_service(config).build()?,
    };
    Ok(sim)
}

fn run<O: SimObserver>(sim: &mut Simulation, observer: &mut O) -> Result<RunSummary> {
    sim.run(observer).context("simulation aborted")
}

fn print_summary(summary: &RunSummary, repair_center: Option<&RepairAccounting>) {
    println!();
    println!("SIMULATION COMPLETE");
    println!(
        "seed {}  horizon {:.2} h  last event {:.3} h  events {}",
        summary.seed, summary.end_time, summary.final_time, summary.events_executed
    );
    println!(
        "jobs: created {}  absorbed {}  retired {}  waiting {}  in service {}",
        summary.jobs_created,
        summary.jobs_absorbed,
        summary.jobs_retired,
        summary.jobs_waiting,
        summary.jobs_in_service
    );
    println!();
    println!(
        "{:<24} {:>4} {:>9} {:>6} {:>6} {:>5} {:>5} {:>7}",
        "station", "srv", "rate", "in", "done", "busy", "queue", "util"
    );
    for s in &summary.stations {
        println!(
            "{:<24} {:>4} {:>9.3} {:>6} {:>6} {:>5} {:>5} {:>6.1}%",
            s.name,
            s.capacity,
            s.service_rate,
            s.arrivals,
            s.completed,
            s.busy,
            s.backlog,
            s.utilisation * 100.0
        );
    }
    for t in &summary.sinks {
        println!(
            "{:<24} absorbed {}  mean time in system {:.3} h  max {:.3} h",
            t.name, t.absorbed, t.mean_sojourn, t.max_sojourn
        );
    }
    if let Some(rc) = repair_center {
        println!();
        println!(
            "repair center: stock used {}  replacements {}  repaired {}  labour {:.3} h",
            rc.stock_used, rc.replacements, rc.repairs, rc.labour_hours
        );
    }
}
