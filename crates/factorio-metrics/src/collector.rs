//! Scrape coordinator — one load + extract pass per scrape request.
//!
//! A single mutex guards the snapshot store for the whole pass (file read,
//! replace, extraction), so scrapes never overlap and every returned sample
//! set comes from exactly one load.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, error};

use factorio_snapshot::{Snapshot, SnapshotLoader, SnapshotStore};

use crate::extract::extract;
use crate::family::Sample;

/// Serializes scrapes over a snapshot file.
pub struct ScrapeCoordinator {
    loader: SnapshotLoader,
    store: Mutex<SnapshotStore>,
}

impl ScrapeCoordinator {
    pub fn new(loader: SnapshotLoader) -> Self {
        Self {
            loader,
            store: Mutex::new(SnapshotStore::new()),
        }
    }

    /// Coordinator reading the snapshot file at `path`.
    pub fn for_path(path: impl AsRef<Path>) -> Self {
        Self::new(SnapshotLoader::new(path.as_ref()))
    }

    pub fn path(&self) -> &Path {
        self.loader.path()
    }

    /// Load the snapshot file and translate it into samples.
    ///
    /// Blocks until any in-flight scrape finishes. A failed load is logged
    /// and yields an empty sample set; the previously installed snapshot is
    /// kept. There is no retry: the next scrape tries again.
    pub fn scrape(&self) -> Vec<Sample> {
        debug!("collecting metrics");
        let mut store = self.lock_store();

        let snapshot = match self.loader.load() {
            Ok(snapshot) => store.replace(snapshot),
            Err(e) => {
                error!(error = %e, path = ?self.loader.path(), "error reading metrics data");
                store.record_error(&e);
                return Vec::new();
            }
        };

        let samples = extract(&snapshot);
        drop(store);

        debug!(samples = samples.len(), "collected metrics");
        samples
    }

    /// The last successfully loaded snapshot.
    pub fn current(&self) -> Option<Arc<Snapshot>> {
        self.lock_store().current()
    }

    /// The error of the most recent load, if it failed.
    pub fn last_error(&self) -> Option<String> {
        self.lock_store().last_error().map(str::to_string)
    }

    /// Number of snapshots installed since startup.
    pub fn loads(&self) -> u64 {
        self.lock_store().loads()
    }

    // A panic mid-scrape cannot leave a torn store: snapshots are swapped
    // wholesale, so a poisoned lock is safe to reuse.
    fn lock_store(&self) -> MutexGuard<'_, SnapshotStore> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::fs;
    use std::path::PathBuf;
    use std::thread;

    use super::*;

    fn write_snapshot(path: &Path, json: &str) {
        // Write-then-rename so readers never see a partially written file.
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, json).unwrap();
        fs::rename(&tmp, path).unwrap();
    }

    fn tick_of(samples: &[Sample]) -> Option<f64> {
        samples
            .iter()
            .find(|s| s.family.name == "factorio_game_tick")
            .map(|s| s.value)
    }

    fn metrics_path(dir: &tempfile::TempDir) -> PathBuf {
        dir.path().join("metrics.json")
    }

    #[test]
    fn scrape_reads_current_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = metrics_path(&dir);
        write_snapshot(&path, r#"{"game": {"time": {"tick": 100}}}"#);

        let coordinator = ScrapeCoordinator::for_path(&path);
        assert_eq!(tick_of(&coordinator.scrape()), Some(100.0));

        write_snapshot(&path, r#"{"game": {"time": {"tick": 200}}}"#);
        assert_eq!(tick_of(&coordinator.scrape()), Some(200.0));
        assert_eq!(coordinator.loads(), 2);
    }

    #[test]
    fn missing_file_yields_empty_scrape() {
        let dir = tempfile::tempdir().unwrap();
        let coordinator = ScrapeCoordinator::for_path(metrics_path(&dir));

        assert!(coordinator.scrape().is_empty());
        assert!(coordinator.current().is_none());
        assert!(coordinator.last_error().is_some());
    }

    #[test]
    fn failed_load_keeps_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = metrics_path(&dir);
        let coordinator = ScrapeCoordinator::for_path(&path);

        write_snapshot(&path, r#"{"game": {"time": {"tick": 1}}, "players": {"alice": {}}}"#);
        assert!(!coordinator.scrape().is_empty());

        // Producer caught mid-write: truncated document.
        write_snapshot(&path, r#"{"game": {"time": "#);
        assert!(coordinator.scrape().is_empty());

        let kept = coordinator.current().unwrap();
        assert_eq!(kept.get(&["game", "time", "tick"]).number(), 1.0);
        assert_eq!(kept.get(&["players"]).keys().collect::<Vec<_>>(), vec!["alice"]);
        assert!(coordinator.last_error().unwrap().contains("parse"));

        write_snapshot(&path, r#"{"game": {"time": {"tick": 3}}}"#);
        assert_eq!(tick_of(&coordinator.scrape()), Some(3.0));
        assert!(coordinator.last_error().is_none());
    }

    #[test]
    fn repeated_scrapes_of_same_file_are_identical() {
        let dir = tempfile::tempdir().unwrap();
        let path = metrics_path(&dir);
        write_snapshot(
            &path,
            r#"{"forces": {"player": {"items": {"nauvis": {"gear": {"production": 9}}}}}}"#,
        );

        let coordinator = ScrapeCoordinator::for_path(&path);
        assert_eq!(coordinator.scrape(), coordinator.scrape());
    }

    #[test]
    fn concurrent_scrapes_see_whole_snapshots() {
        let dir = tempfile::tempdir().unwrap();
        let path = metrics_path(&dir);
        let snapshot = |n: u32| {
            format!(
                r#"{{"game": {{"time": {{"tick": {n}}}}}, "players": {{"p{n}": {{"connected": true}}}}}}"#
            )
        };
        write_snapshot(&path, &snapshot(0));

        let coordinator = Arc::new(ScrapeCoordinator::for_path(&path));

        let writer = {
            let path = path.clone();
            thread::spawn(move || {
                for n in 1..=50 {
                    write_snapshot(&path, &snapshot(n));
                }
            })
        };

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let coordinator = Arc::clone(&coordinator);
                thread::spawn(move || (0..25).map(|_| coordinator.scrape()).collect::<Vec<_>>())
            })
            .collect();

        writer.join().unwrap();
        for reader in readers {
            for samples in reader.join().unwrap() {
                if samples.is_empty() {
                    continue;
                }
                let tick = tick_of(&samples).unwrap();
                let players: HashSet<_> = samples
                    .iter()
                    .filter_map(|s| s.label("username"))
                    .collect();
                let expected = format!("p{tick}");
                assert_eq!(players, HashSet::from([expected.as_str()]));
            }
        }
    }
}
