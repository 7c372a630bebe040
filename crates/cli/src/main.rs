//! cadencectl - OpenCadence demonstration CLI
//!
//! Drives the pacing engine with a scripted bursty workload so the paced
//! output stream, the extrapolation fallback and the observability counters
//! can be watched from a terminal.

#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]

mod sink;
mod workload;

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use opencadence_pacer::{PacerConfig, PacerSnapshot, RateController, StartMode};

use crate::sink::EmissionLog;

#[derive(Parser)]
#[command(name = "cadencectl")]
#[command(about = "OpenCadence CLI - Drive and observe fixed-rate paced output streams")]
#[command(version)]
struct Cli {
    /// Output the final counter snapshot as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Verbose logging
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scripted bursty workload through a paced stream
    Demo(DemoArgs),
}

#[derive(Args)]
struct DemoArgs {
    /// Target output rate in Hz
    #[arg(long, default_value_t = 10)]
    rate: u32,

    /// Staleness tolerance in milliseconds
    #[arg(long, default_value_t = 400)]
    freshness: u32,

    /// How long to keep pacing before the cooperative stop, in milliseconds
    #[arg(long, default_value_t = 3_000)]
    duration_ms: u64,

    /// Emit the first item immediately instead of after one period
    #[arg(long)]
    immediate: bool,

    /// Request elevated scheduling priority for the pacing thread
    #[arg(long)]
    elevate_priority: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("cadencectl={log_level},opencadence_pacer={log_level}").into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match cli.command {
        Commands::Demo(args) => run_demo(&args, cli.json),
    }
}

fn run_demo(args: &DemoArgs, json: bool) -> Result<()> {
    let config = PacerConfig::builder()
        .rate_hz(args.rate)
        .freshness_ms(args.freshness)
        .elevate_priority(args.elevate_priority)
        .build()
        .context("invalid pacing parameters")?;

    let pacer = Arc::new(RateController::<u32>::new(config)?);
    let mode = if args.immediate {
        StartMode::Immediate
    } else {
        StartMode::Deferred
    };

    let worker = {
        let pacer = Arc::clone(&pacer);
        thread::spawn(move || {
            let mut sink = EmissionLog::new(Arc::clone(&pacer));
            pacer.run(mode, &mut sink)
        })
    };

    workload::run_scripted(&pacer, &workload::BURST_SCHEDULE);

    let elapsed = pacer.init_time().map(|t| t.elapsed()).unwrap_or_default();
    let remaining = Duration::from_millis(args.duration_ms).saturating_sub(elapsed);
    thread::sleep(remaining);

    pacer.stop();
    worker
        .join()
        .map_err(|_| anyhow!("pacing thread panicked"))??;

    let snapshot = pacer.metrics();
    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        print_summary(&snapshot);
    }
    Ok(())
}

fn print_summary(snapshot: &PacerSnapshot) {
    println!("Pacing summary:");
    println!("  ticks:              {}", snapshot.ticks_total);
    println!(
        "  extrapolated ticks: {} ({:.1}%)",
        snapshot.ticks_extrapolated,
        snapshot.extrapolation_rate() * 100.0
    );
    println!("  real emissions:     {}", snapshot.items_emitted);
    println!("  items inserted:     {}", snapshot.items_inserted);
    println!("  items evicted:      {}", snapshot.items_evicted);
    println!("  stale discards:     {}", snapshot.items_discarded_stale);
    println!("  sink errors:        {}", snapshot.sink_errors);
    println!("  missed deadlines:   {}", snapshot.missed_deadlines);
}
