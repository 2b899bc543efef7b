//! Stop index error types.

use std::path::PathBuf;

/// Errors that can occur while loading the stop index.
#[derive(Debug, thiserror::Error)]
pub enum StopIndexError {
    /// Stops file could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Stops JSON is malformed
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Two stops share an id
    #[error("duplicate stop id: {0}")]
    DuplicateId(String),

    /// A stop has an out-of-range coordinate
    #[error("stop {id} has an invalid coordinate")]
    InvalidCoordinate { id: String },
}
