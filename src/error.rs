use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, IngestError>;

#[derive(Debug, Error)]
pub enum IngestError {
    /// JSON decode failure or a required field missing from a game document.
    #[error("malformed document: {0}")]
    MalformedDocument(String),

    /// DDL failed; nothing can be stored, so the whole batch stops.
    #[error("schema error: {0}")]
    Schema(#[source] rusqlite::Error),

    #[error("store write failed: {0}")]
    StoreWrite(#[source] rusqlite::Error),

    #[error("store read failed: {0}")]
    StoreRead(#[source] rusqlite::Error),

    #[error("io error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl IngestError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedDocument(reason.into())
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Schema(_))
    }
}
