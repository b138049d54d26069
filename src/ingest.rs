use std::fmt;
use std::path::Path;

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, Transaction, params, params_from_iter};
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::error::{IngestError, Result};
use crate::flatten::{RawStatFact, flatten};
use crate::metadata::extract_metadata;

const FACT_COLUMNS: usize = 9;

/// Where a file is in its ingestion; failures report the stage they left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Unprocessed,
    Parsed,
    Flattened,
    Committed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Stage::Unprocessed => "unprocessed",
            Stage::Parsed => "parsed",
            Stage::Flattened => "flattened",
            Stage::Committed => "committed",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    Committed { facts: usize },
    AlreadyProcessed,
}

pub fn is_file_processed(conn: &Connection, file_name: &str) -> Result<bool> {
    let hit = conn
        .query_row(
            "SELECT 1 FROM processed_files WHERE file_name = ?1",
            params![file_name],
            |_| Ok(()),
        )
        .optional()
        .map_err(IngestError::StoreRead)?;
    Ok(hit.is_some())
}

/// Ingests one box-score file. Skips it when the ledger already lists its name.
#[instrument(skip_all, fields(file = %file_name(path)))]
pub fn ingest_file(
    conn: &mut Connection,
    path: &Path,
    insert_chunk_rows: usize,
) -> Result<IngestOutcome> {
    let name = file_name(path);
    debug!(stage = %Stage::Unprocessed);
    if is_file_processed(conn, &name)? {
        info!("skipping already processed file");
        return Ok(IngestOutcome::AlreadyProcessed);
    }

    let raw = std::fs::read_to_string(path).map_err(|err| IngestError::io(path, err))?;
    let doc = serde_json::from_str::<Value>(&raw)
        .map_err(|err| IngestError::malformed(format!("invalid json: {err}")))?;
    debug!(stage = %Stage::Parsed);

    let facts = facts_from_document(&doc)?;
    debug!(stage = %Stage::Flattened, facts = facts.len());

    let inserted = commit_file(conn, &name, &facts, insert_chunk_rows)?;
    info!(stage = %Stage::Committed, facts = inserted, "processed file");
    Ok(IngestOutcome::Committed { facts: inserted })
}

/// Flattens every side and period of a parsed box-score document.
pub fn facts_from_document(doc: &Value) -> Result<Vec<RawStatFact>> {
    let game = doc
        .get("game")
        .ok_or_else(|| IngestError::malformed("missing game"))?;
    let metadata = extract_metadata(game)?;

    let sides = doc
        .get("boxScore")
        .and_then(|b| b.get("stats"))
        .and_then(|s| s.as_object())
        .ok_or_else(|| IngestError::malformed("missing boxScore.stats"))?;

    let mut all = Vec::new();
    for (side, periods) in sides {
        let team = metadata
            .team_for_side(side)
            .ok_or_else(|| IngestError::malformed(format!("unknown team side {side:?}")))?;
        let periods = periods.as_object().ok_or_else(|| {
            IngestError::malformed(format!("boxScore.stats.{side} is not an object"))
        })?;
        for (period, players) in periods {
            all.extend(flatten(players, &metadata, team, period)?);
        }
    }
    Ok(all)
}

/// Inserts the facts and the ledger row in one transaction, ledger last.
///
/// Returns the number of fact rows actually written; natural-key conflicts
/// do not count.
pub fn commit_file(
    conn: &mut Connection,
    file_name: &str,
    facts: &[RawStatFact],
    insert_chunk_rows: usize,
) -> Result<usize> {
    let tx = conn.transaction().map_err(IngestError::StoreWrite)?;
    let inserted = insert_facts(&tx, facts, insert_chunk_rows)?;
    mark_file_processed(&tx, file_name)?;
    tx.commit().map_err(IngestError::StoreWrite)?;
    Ok(inserted)
}

/// Multi-row insert; natural-key conflicts are dropped silently.
pub fn insert_facts(
    tx: &Transaction<'_>,
    facts: &[RawStatFact],
    insert_chunk_rows: usize,
) -> Result<usize> {
    let mut inserted = 0usize;
    for chunk in facts.chunks(insert_chunk_rows.max(1)) {
        let sql = insert_sql(chunk.len());
        let values = chunk.iter().flat_map(|f| {
            [
                f.season.clone(),
                f.game_id.clone(),
                f.game_date.format("%Y-%m-%d").to_string(),
                f.team.clone(),
                f.player_id.clone(),
                f.player_name.clone(),
                f.period.clone(),
                f.stat_name.clone(),
                f.stat_value.clone(),
            ]
        });
        inserted += tx
            .execute(&sql, params_from_iter(values))
            .map_err(IngestError::StoreWrite)?;
    }
    Ok(inserted)
}

fn mark_file_processed(tx: &Transaction<'_>, file_name: &str) -> Result<()> {
    tx.execute(
        "INSERT INTO processed_files(file_name, processed_at) VALUES (?1, ?2)",
        params![file_name, Utc::now().to_rfc3339()],
    )
    .map_err(IngestError::StoreWrite)?;
    Ok(())
}

fn insert_sql(rows: usize) -> String {
    let row = format!("({})", vec!["?"; FACT_COLUMNS].join(", "));
    let values = vec![row.as_str(); rows].join(", ");
    format!(
        "INSERT INTO player_stats (
            season, game_id, game_date, team, player_id,
            player_name, period, stat_name, stat_value
        ) VALUES {values}
        ON CONFLICT DO NOTHING"
    )
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
