//! Snapshot documents and the file loader that produces them.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{LoadError, SnapshotResult};
use crate::field::Field;
use crate::value::Value;

/// One fully-loaded instance of the producer's state document.
///
/// Immutable once built. A new load produces a new `Snapshot`.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    root: Value,
}

impl Snapshot {
    /// Wrap an already-decoded document. The root must be an object.
    pub fn from_value(root: Value) -> SnapshotResult<Self> {
        match root {
            Value::Tree(_) => Ok(Self { root }),
            other => Err(LoadError::Shape(format!(
                "root must be an object, found {}",
                kind_name(&other)
            ))),
        }
    }

    /// Decode a snapshot from raw JSON bytes.
    pub fn from_slice(bytes: &[u8]) -> SnapshotResult<Self> {
        let root: Value = serde_json::from_slice(bytes)?;
        Self::from_value(root)
    }

    /// Cursor at the document root.
    pub fn root(&self) -> Field<'_> {
        Field::new(&self.root)
    }

    /// Shorthand for `self.root().get(path)`.
    pub fn get(&self, path: &[&str]) -> Field<'_> {
        self.root().get(path)
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Tree(_) => "an object",
    }
}

/// Reads the snapshot file written by the game-side producer.
///
/// The whole file is read in one operation and parsed in memory; there is
/// no streaming and no partial application.
#[derive(Debug, Clone)]
pub struct SnapshotLoader {
    path: PathBuf,
}

impl SnapshotLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> SnapshotResult<Snapshot> {
        let bytes = std::fs::read(&self.path).map_err(|source| LoadError::Read {
            path: self.path.clone(),
            source,
        })?;
        let snapshot = Snapshot::from_slice(&bytes)?;
        debug!(path = ?self.path, bytes = bytes.len(), "snapshot loaded");
        Ok(snapshot)
    }
}
