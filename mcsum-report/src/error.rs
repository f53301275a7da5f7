//! Report errors

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while emitting tables
#[derive(Debug, Error)]
pub enum ReportError {
    /// Creating or writing an output file failed
    #[error("Failed to write {path}: {source}")]
    Io {
        /// File or directory being written
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Serializing the JSON document failed
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Tables were requested before finalization
    #[error("Aggregation state must be finalized before reporting")]
    NotFinalized,
}
