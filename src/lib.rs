pub mod batch;
pub mod box_score;
pub mod config;
pub mod error;
pub mod flatten;
pub mod ingest;
pub mod logging;
pub mod metadata;
pub mod period;
pub mod schedule;
pub mod schema;
pub mod store;

pub use batch::{BatchReport, process_directory};
pub use config::IngestConfig;
pub use error::IngestError;
