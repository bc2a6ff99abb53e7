//! factorio-metrics — snapshot-to-metric translation for the Factorio exporter.
//!
//! Walks the producer's snapshot tree and turns it into a fixed set of
//! Prometheus metric families, then renders them in text exposition format.
//!
//! # Architecture
//!
//! ```text
//! ScrapeCoordinator::scrape()        ← called per /metrics request
//!   ├── SnapshotLoader::load()       (under the coordinator's lock)
//!   ├── SnapshotStore::replace()
//!   └── extract()                    → Vec<Sample>
//!         time → player → force → pollution → surface → entity → rocket
//!
//! Prometheus exposition
//!   └── render_prometheus() → text/plain for /metrics endpoint
//! ```

pub mod collector;
pub mod extract;
pub mod family;
pub mod prometheus;

pub use collector::ScrapeCoordinator;
pub use extract::extract;
pub use family::{FAMILIES, MetricFamily, MetricKind, Sample};
pub use prometheus::{CONTENT_TYPE, render_prometheus};
