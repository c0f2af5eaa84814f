//! Run the daily monster pipeline once.
//!
//! Usage:
//!   monster-pipeline [--num-monsters N]
//!
//! Endpoint, output path, worker count, and failure policy come from the
//! `MONSTER_*` environment variables (see `monsterflow::config`). Logging
//! honours `RUST_LOG` and defaults to `info`.

use anyhow::{Context, Result};
use clap::Parser;
use monsterflow::{DEFAULT_SAMPLE_COUNT, Settings, http_pipeline, today_seed_key};
use std::io::IsTerminal;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "monster-pipeline")]
#[command(version, about = "Run the D&D monster data pipeline.")]
struct Cli {
    /// The number of random monsters to select.
    #[arg(long = "num-monsters", default_value_t = DEFAULT_SAMPLE_COUNT)]
    num_monsters: usize,
}

fn main() {
    init_tracing();
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(std::io::stderr().is_terminal())
                .with_writer(std::io::stderr),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let settings = Settings::from_env().context("reading MONSTER_* settings")?;
    let pipeline = http_pipeline(&settings, cli.num_monsters)?;

    let report = pipeline
        .run(&today_seed_key())
        .context("dnd-monster-pipeline run failed")?;

    if !report.rejected.is_empty() || !report.failed.is_empty() {
        tracing::warn!(
            "{} rejected by validation, {} failed to load",
            report.rejected.len(),
            report.failed.len()
        );
    }
    Ok(())
}
