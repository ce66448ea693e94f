use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use dispatch_core::snapshot::Snapshot;
use dispatch_core::{Clock, DistributionConfig, SystemClock};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod replay;

use replay::Replay;

#[derive(Parser)]
#[command(
    name = "dispatch-replay",
    about = "Run ride distribution against a recorded driver/ride export",
    long_about = "Loads a JSON export of the drivers and rideRequests collections and\n\
                  reports which driver each waiting ride would be offered to."
)]
struct Cli {
    /// Enable debug logging (per-driver scores)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SnapshotArgs {
    /// Path to the JSON export
    #[arg(long, env = "DISPATCH_SNAPSHOT")]
    snapshot: PathBuf,
    /// Evaluation time (RFC 3339); defaults to the current time
    #[arg(long)]
    now: Option<DateTime<Utc>>,
    /// Optional distribution config (JSON)
    #[arg(long, env = "DISPATCH_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Dispatch a single waiting ride and print the assignment
    Select {
        #[command(flatten)]
        input: SnapshotArgs,
        /// Ride request id; defaults to the first waiting request
        #[arg(long)]
        ride: Option<String>,
    },
    /// Dispatch every waiting ride in order, accepting each assignment
    Replay {
        #[command(flatten)]
        input: SnapshotArgs,
    },
}

fn load_config(path: Option<&Path>) -> Result<DistributionConfig> {
    match path {
        Some(path) => DistributionConfig::from_json_file(path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => Ok(DistributionConfig::default()),
    }
}

fn load_inputs(input: &SnapshotArgs) -> Result<(Snapshot, DistributionConfig, DateTime<Utc>)> {
    let snapshot = Snapshot::from_json_file(&input.snapshot)
        .with_context(|| format!("failed to load snapshot from {}", input.snapshot.display()))?;
    let config = load_config(input.config.as_deref())?;
    let now = input.now.unwrap_or_else(|| SystemClock.now());
    Ok((snapshot, config, now))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("dispatch_replay={log_level},dispatch_core={log_level}").into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Select { input, ride } => {
            let (snapshot, config, now) = load_inputs(&input)?;
            let doc = match ride.as_deref() {
                Some(id) => snapshot
                    .ride_request(id)
                    .with_context(|| format!("ride request {id} not found in snapshot"))?,
                None => match snapshot.pending_requests().next() {
                    Some(doc) => doc,
                    None => bail!("snapshot has no waiting ride requests"),
                },
            };
            let replay = Replay::new(&snapshot, config, now)?;
            let outcome = replay.select(doc);
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        Commands::Replay { input } => {
            let (snapshot, config, now) = load_inputs(&input)?;
            let replay = Replay::new(&snapshot, config, now)?;
            let report = replay.run();
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}
