//! Headless decision engine runner.
//!
//! # Usage
//!
//! ```bash
//! # Answer snapshots on stdin with commands on stdout
//! cargo run -p vanguard_headless -- run --config tuning.ron < match.jsonl
//!
//! # Record the run for later verification
//! cargo run -p vanguard_headless -- run --record match.bin < match.jsonl
//!
//! # Replay a recording and check the command stream is unchanged
//! cargo run -p vanguard_headless -- verify match.bin
//!
//! # Print the default configuration as RON
//! cargo run -p vanguard_headless -- config
//! ```
//!
//! Logs go to stderr; stdout is reserved for protocol output.

use std::io::{self, BufWriter};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vanguard_core::config::EngineConfig;
use vanguard_core::recording::MatchRecording;
use vanguard_headless::{HeadlessError, HeadlessRunner, Result};

#[derive(Parser)]
#[command(name = "vanguard_headless")]
#[command(about = "Headless runner for the Vanguard decision engine")]
#[command(version)]
struct Cli {
    /// Enable verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer JSON-line snapshots from stdin
    Run {
        /// Engine config (RON); defaults are used when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write a match recording to this path when input ends
        #[arg(short, long)]
        record: Option<PathBuf>,
    },

    /// Replay a match recording and compare the command stream
    Verify {
        /// Recording file
        recording: PathBuf,
    },

    /// Print the default engine config as RON
    Config,
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging to stderr (stdout is for protocol)
    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_ansi(false),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(log_level))
        .init();

    let result = match cli.command {
        Commands::Run { config, record } => cmd_run(config, record),
        Commands::Verify { recording } => cmd_verify(recording),
        Commands::Config => cmd_config(),
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "Headless run failed");
        std::process::exit(1);
    }
}

fn load_config(path: Option<PathBuf>) -> Result<EngineConfig> {
    match path {
        Some(path) => {
            tracing::info!("Loading config from: {}", path.display());
            Ok(EngineConfig::load(&path)?)
        }
        None => Ok(EngineConfig::default()),
    }
}

fn cmd_run(config: Option<PathBuf>, record: Option<PathBuf>) -> Result<()> {
    let config = load_config(config)?;
    let mut runner = HeadlessRunner::new(config)?;
    if record.is_some() {
        runner = runner.with_recording();
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    runner.run(stdin.lock(), BufWriter::new(stdout.lock()))?;

    if let (Some(path), Some(recording)) = (record, runner.into_recording()) {
        recording.save(&path)?;
        tracing::info!(frames = recording.len(), "Recording saved to {}", path.display());
    }
    Ok(())
}

fn cmd_verify(path: PathBuf) -> Result<()> {
    let recording = MatchRecording::load(&path)?;
    tracing::info!(frames = recording.len(), "Verifying {}", path.display());
    match recording.verify()? {
        None => {
            tracing::info!("Replay matches recording");
            Ok(())
        }
        Some(index) => Err(HeadlessError::Diverged(index)),
    }
}

fn cmd_config() -> Result<()> {
    let ron = EngineConfig::default().to_ron_string()?;
    println!("{ron}");
    Ok(())
}
