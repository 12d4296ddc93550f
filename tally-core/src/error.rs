use std::path::PathBuf;
use thiserror::Error;

/// Failure to read or write the category store file.
///
/// Reads degrade to defaults inside the store; this type mostly surfaces
/// failed writes, after which the in-memory state is still authoritative.
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// The store file could not be read, written, or renamed into place.
    #[error("category store {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The store file is not a category -> keywords JSON object.
    #[error("category store {path} is not valid JSON: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Rejected single-row re-categorization.
#[derive(Error, Debug)]
pub enum CorrectionError {
    #[error("unknown category: {0}")]
    UnknownCategory(String),

    #[error("no transaction at row {row} (batch has {len})")]
    NoSuchRow { row: usize, len: usize },

    /// The row was updated and the keyword learned in memory, but saving failed.
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}
