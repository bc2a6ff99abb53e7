//! Error types for snapshot loading.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for snapshot operations.
pub type SnapshotResult<T> = Result<T, LoadError>;

/// Errors that can occur while loading a snapshot file.
///
/// Navigation of a loaded snapshot never fails; these are the only
/// failure modes of the snapshot layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read metrics file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse metrics file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("unexpected document shape: {0}")]
    Shape(String),
}
