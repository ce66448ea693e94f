use std::process::{exit, Command, ExitStatus};

use clap::{Parser, Subcommand, ValueEnum};

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "xtask",
    about = "Task runner for the dispatch workspace",
    long_about = "A unified CLI for replays, benchmarks, load tests,\n\
                  and CI checks in the dispatch workspace."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay every waiting ride in a snapshot export
    Replay {
        /// Path to the JSON export
        snapshot: String,
        /// Optional distribution config (JSON)
        #[arg(long)]
        config: Option<String>,
        /// Evaluation time (RFC 3339)
        #[arg(long)]
        now: Option<String>,
    },
    /// Run Criterion benchmarks
    Bench,
    /// Run CI checks (fmt, clippy, tests, benchmarks)
    Ci {
        /// Job to run
        #[arg(value_enum, default_value_t = CiJob::Check)]
        job: CiJob,
    },
    /// Run load tests (ignored tests in dispatch_core)
    LoadTest,
}

#[derive(Clone, ValueEnum)]
enum CiJob {
    /// Formatting, clippy, and tests
    Check,
    /// Run benchmarks
    Bench,
    /// Run check + bench
    All,
}

// ── helpers ────────────────────────────────────────────────────────

fn step(label: &str) {
    eprintln!("\n=== {label} ===");
}

fn cargo(args: &[&str]) -> ExitStatus {
    eprintln!("+ cargo {}", args.join(" "));
    Command::new("cargo")
        .args(args)
        .status()
        .unwrap_or_else(|error| {
            eprintln!("failed to execute cargo: {error}");
            exit(1);
        })
}

fn run_cargo(args: &[&str]) {
    let status = cargo(args);
    if !status.success() {
        exit(status.code().unwrap_or(1));
    }
}

// ── CI jobs ────────────────────────────────────────────────────────

fn ci_check() {
    step("Check formatting");
    run_cargo(&["fmt", "--all", "--", "--check"]);

    step("Clippy");
    run_cargo(&[
        "clippy",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ]);

    step("Test dispatch_core");
    run_cargo(&["test", "-p", "dispatch_core"]);

    step("Test dispatch_replay");
    run_cargo(&["test", "-p", "dispatch_replay"]);
}

fn ci_bench() {
    step("Run benchmarks");
    run_cargo(&["bench", "--package", "dispatch_core", "--bench", "performance"]);
}

// ── main ───────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Replay {
            snapshot,
            config,
            now,
        } => {
            let mut args = vec![
                "run",
                "-p",
                "dispatch_replay",
                "--",
                "replay",
                "--snapshot",
                snapshot.as_str(),
            ];
            if let Some(config) = config.as_deref() {
                args.extend(["--config", config]);
            }
            if let Some(now) = now.as_deref() {
                args.extend(["--now", now]);
            }
            run_cargo(&args);
        }
        Commands::Bench => ci_bench(),
        Commands::Ci { job } => {
            match job {
                CiJob::Check => ci_check(),
                CiJob::Bench => ci_bench(),
                CiJob::All => {
                    ci_check();
                    ci_bench();
                }
            }
            eprintln!("\nCI job passed.");
        }
        Commands::LoadTest => {
            run_cargo(&[
                "test",
                "-p",
                "dispatch_core",
                "--test",
                "load_tests",
                "--",
                "--ignored",
            ]);
        }
    }
}
