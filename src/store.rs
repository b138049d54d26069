use std::path::Path;

use rusqlite::Connection;
use tracing::debug;

use crate::config::IngestConfig;
use crate::error::{IngestError, Result};

/// Opens the SQLite store at `path`, creating parent directories as needed.
///
/// The handle closes when dropped, so callers scope it to one batch.
pub fn open_store(path: &Path, cfg: &IngestConfig) -> Result<Connection> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|err| IngestError::io(parent, err))?;
    }
    let conn = Connection::open(path).map_err(IngestError::StoreRead)?;
    if cfg.wal {
        let mode: String = conn
            .query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))
            .map_err(IngestError::StoreWrite)?;
        debug!(journal_mode = %mode, "opened {}", path.display());
    }
    Ok(conn)
}
