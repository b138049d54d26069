use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Parser;

use nba_box_scores::{IngestConfig, box_score, logging, store};

/// Print the derived per-period box score of one game as JSON.
///
/// Without a game id, lists the games present in the store.
#[derive(Debug, Parser)]
struct Cli {
    db_path: PathBuf,
    game_id: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = IngestConfig {
        wal: false,
        ..IngestConfig::from_env()
    };
    logging::init_tracing("warn")?;

    if !cli.db_path.exists() {
        return Err(anyhow!("no store at {}", cli.db_path.display()));
    }
    let conn = store::open_store(&cli.db_path, &cfg)
        .with_context(|| format!("open store {}", cli.db_path.display()))?;

    let json = match cli.game_id.as_deref() {
        Some(game_id) => {
            let rows = box_score::load_game_box_score(&conn, game_id)?;
            if rows.is_empty() {
                return Err(anyhow!("no box score rows for game {game_id}"));
            }
            serde_json::to_string_pretty(&rows).context("serialize box score")?
        }
        None => {
            let games = box_score::list_games(&conn)?;
            serde_json::to_string_pretty(&games).context("serialize game list")?
        }
    };
    println!("{json}");
    Ok(())
}
