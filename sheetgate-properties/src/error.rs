//! Error types for the property store.

use thiserror::Error;

/// All errors that can occur in property store operations.
#[derive(Debug, Error)]
pub enum PropertyError {
    #[error("DuckDB error: {0}")]
    DuckDb(#[from] duckdb::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored value is present but is not the JSON the caller expected.
    #[error("corrupt property {key}: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type PropertyResult<T> = Result<T, PropertyError>;
