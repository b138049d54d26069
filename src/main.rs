use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use nba_box_scores::{IngestConfig, logging, process_directory};

/// Load per-game box score JSON files into the SQLite stats store.
#[derive(Debug, Parser)]
#[command(name = "nba_box_scores")]
struct Cli {
    /// Directory holding one JSON document per game.
    data_dir: PathBuf,
    /// SQLite database file; created when missing.
    db_path: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = IngestConfig::from_env();
    logging::init_tracing("info")?;

    let report = process_directory(&cli.data_dir, &cli.db_path, &cfg)
        .with_context(|| format!("load box scores into {}", cli.db_path.display()))?;

    info!(
        "box score load complete: {} committed ({} facts), {} already processed, {} failed",
        report.committed.len(),
        report.facts_committed(),
        report.skipped.len(),
        report.failed.len()
    );
    for (name, err) in report.failed.iter().take(8) {
        error!(" - {name}: {err}");
    }
    Ok(())
}
