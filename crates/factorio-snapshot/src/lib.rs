//! factorio-snapshot — the producer's state document, as loaded from disk.
//!
//! The game-side mod periodically rewrites a JSON file describing game time,
//! players, forces, pollution, surfaces, entities and rocket launches. This
//! crate reads that file into an untyped tree and offers total, default-
//! tolerant reads over it.
//!
//! # Architecture
//!
//! ```text
//! SnapshotLoader::load() → Snapshot (immutable Value tree)
//!                             │
//!                             ├── SnapshotStore::replace() keeps the latest
//!                             └── Snapshot::get(path) → Field (number/bool/keys)
//! ```

pub mod error;
pub mod field;
pub mod snapshot;
pub mod store;
pub mod value;

pub use error::{LoadError, SnapshotResult};
pub use field::Field;
pub use snapshot::{Snapshot, SnapshotLoader};
pub use store::SnapshotStore;
pub use value::{Tree, Value};
