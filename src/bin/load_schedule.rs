use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use nba_box_scores::{IngestConfig, logging, schedule, store};

/// Load a completed-games schedule document into the stats store.
#[derive(Debug, Parser)]
struct Cli {
    /// JSON array of completed games.
    schedule_file: PathBuf,
    db_path: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = IngestConfig::from_env();
    logging::init_tracing("info")?;

    let mut conn = store::open_store(&cli.db_path, &cfg)
        .with_context(|| format!("open store {}", cli.db_path.display()))?;
    let summary = schedule::load_schedule_file(&mut conn, &cli.schedule_file)?;

    println!("Schedule load complete");
    println!("DB: {}", cli.db_path.display());
    println!(
        "Games: {} upserted, {} preseason skipped, {} total",
        summary.games_upserted, summary.preseason_skipped, summary.games_total
    );
    Ok(())
}
