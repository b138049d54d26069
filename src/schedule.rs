use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{Connection, Transaction, params};
use serde::Deserialize;
use tracing::{debug, info};

const PRESEASON_PREFIX: &str = "001";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledGame {
    pub game_id: String,
    pub game_date_est: String,
    #[serde(default)]
    pub game_status_text: String,
    pub home_team: ScheduledTeam,
    pub away_team: ScheduledTeam,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledTeam {
    pub team_tricode: String,
    #[serde(default)]
    pub score: Option<i64>,
}

impl ScheduledGame {
    pub fn is_preseason(&self) -> bool {
        self.game_id.starts_with(PRESEASON_PREFIX)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScheduleLoadSummary {
    pub games_total: usize,
    pub preseason_skipped: usize,
    pub games_upserted: usize,
}

pub fn init_schedule_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schedule (
            game_id TEXT PRIMARY KEY,
            game_date TEXT NOT NULL,
            home_team_abbreviation TEXT NOT NULL,
            away_team_abbreviation TEXT NOT NULL,
            home_team_score INTEGER NULL,
            away_team_score INTEGER NULL,
            status TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_schedule_game_date ON schedule(game_date);
        "#,
    )
    .context("create schedule schema")?;
    Ok(())
}

pub fn parse_schedule_json(raw: &str) -> Result<Vec<ScheduledGame>> {
    serde_json::from_str::<Vec<ScheduledGame>>(raw.trim()).context("invalid schedule json")
}

/// Loads a completed-games document, skipping preseason ids. Reloads upsert in place.
pub fn load_schedule_file(conn: &mut Connection, path: &Path) -> Result<ScheduleLoadSummary> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("read schedule {}", path.display()))?;
    let games = parse_schedule_json(&raw)?;
    init_schedule_schema(conn)?;

    let mut summary = ScheduleLoadSummary {
        games_total: games.len(),
        ..ScheduleLoadSummary::default()
    };

    let tx = conn.transaction().context("begin schedule transaction")?;
    for game in &games {
        if game.is_preseason() {
            summary.preseason_skipped += 1;
            continue;
        }
        upsert_game(&tx, game)?;
        debug!(game_id = %game.game_id, "upserted scheduled game");
        summary.games_upserted += 1;
    }
    tx.commit().context("commit schedule transaction")?;

    info!(
        total = summary.games_total,
        preseason = summary.preseason_skipped,
        upserted = summary.games_upserted,
        "schedule loaded"
    );
    Ok(summary)
}

fn upsert_game(tx: &Transaction<'_>, game: &ScheduledGame) -> Result<()> {
    tx.execute(
        r#"
        INSERT INTO schedule (
            game_id, game_date, home_team_abbreviation, away_team_abbreviation,
            home_team_score, away_team_score, status, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        ON CONFLICT(game_id) DO UPDATE SET
            game_date = excluded.game_date,
            home_team_abbreviation = excluded.home_team_abbreviation,
            away_team_abbreviation = excluded.away_team_abbreviation,
            home_team_score = excluded.home_team_score,
            away_team_score = excluded.away_team_score,
            status = excluded.status,
            updated_at = excluded.updated_at
        "#,
        params![
            game.game_id,
            game.game_date_est,
            game.home_team.team_tricode,
            game.away_team.team_tricode,
            game.home_team.score,
            game.away_team.score,
            game.game_status_text,
            Utc::now().to_rfc3339(),
        ],
    )
    .with_context(|| format!("upsert scheduled game {}", game.game_id))?;
    Ok(())
}
