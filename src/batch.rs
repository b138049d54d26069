use std::path::{Path, PathBuf};

use rusqlite::Connection;
use tracing::{error, info, warn};

use crate::config::IngestConfig;
use crate::error::{IngestError, Result};
use crate::ingest::{IngestOutcome, ingest_file};
use crate::schema::ensure_schema;
use crate::store::open_store;

#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub committed: Vec<(String, usize)>,
    pub skipped: Vec<String>,
    pub failed: Vec<(String, String)>,
}

impl BatchReport {
    pub fn files_seen(&self) -> usize {
        self.committed.len() + self.skipped.len() + self.failed.len()
    }

    pub fn facts_committed(&self) -> usize {
        self.committed.iter().map(|(_, n)| *n).sum()
    }
}

/// Opens the store at `db_path` for the lifetime of one batch and ingests
/// every `*.json` file under `data_dir`.
pub fn process_directory(
    data_dir: &Path,
    db_path: &Path,
    cfg: &IngestConfig,
) -> Result<BatchReport> {
    let mut conn = open_store(db_path, cfg)?;
    process_directory_with(&mut conn, data_dir, cfg)
}

/// Same as [`process_directory`] against an already open handle.
///
/// Only schema and directory-listing errors escape; per-file failures are
/// logged and recorded in the report. Files are visited in directory order,
/// which is not sorted.
pub fn process_directory_with(
    conn: &mut Connection,
    data_dir: &Path,
    cfg: &IngestConfig,
) -> Result<BatchReport> {
    ensure_schema(conn)?;

    let files = json_files(data_dir)?;
    info!("found {} box score files in {}", files.len(), data_dir.display());

    let mut report = BatchReport::default();
    for path in files {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        match ingest_file(conn, &path, cfg.insert_chunk_rows) {
            Ok(IngestOutcome::Committed { facts }) => report.committed.push((name, facts)),
            Ok(IngestOutcome::AlreadyProcessed) => report.skipped.push(name),
            Err(err) => {
                error!(file = %name, error = %err, "failed to process file");
                report.failed.push((name, err.to_string()));
            }
        }
    }

    info!(
        committed = report.committed.len(),
        skipped = report.skipped.len(),
        failed = report.failed.len(),
        "batch finished"
    );
    Ok(report)
}

fn json_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|err| IngestError::io(dir, err))?;
    let mut out = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("skipping unreadable entry in {}: {err}", dir.display());
                continue;
            }
        };
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            out.push(path);
        }
    }
    Ok(out)
}
