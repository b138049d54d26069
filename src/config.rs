const DEFAULT_INSERT_CHUNK_ROWS: usize = 1000;
// 9 bound columns per fact; SQLite caps a statement at 32766 parameters.
const MAX_INSERT_CHUNK_ROWS: usize = 3000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestConfig {
    pub insert_chunk_rows: usize,
    pub wal: bool,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            insert_chunk_rows: DEFAULT_INSERT_CHUNK_ROWS,
            wal: true,
        }
    }
}

impl IngestConfig {
    /// Reads overrides from the environment, loading `.env` first when present.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let insert_chunk_rows = lookup("BOX_SCORES_INSERT_CHUNK_ROWS")
            .and_then(|val| val.trim().parse::<usize>().ok())
            .unwrap_or(defaults.insert_chunk_rows)
            .clamp(1, MAX_INSERT_CHUNK_ROWS);
        let wal = lookup("BOX_SCORES_SQLITE_WAL")
            .map(|raw| parse_flag(&raw))
            .unwrap_or(defaults.wal);
        Self {
            insert_chunk_rows,
            wal,
        }
    }
}

fn parse_flag(raw: &str) -> bool {
    let v = raw.trim().to_ascii_lowercase();
    matches!(v.as_str(), "1" | "true" | "on" | "yes")
}
