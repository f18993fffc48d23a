//! Owner of the live snapshot.
//!
//! Reload builds a complete new snapshot first and only then swaps the shared
//! reference, so searches already holding the old `Arc` finish against a
//! consistent view and a failed reload leaves the old snapshot in place.

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tracing::{info, warn};

use super::dataset::LoadError;
use super::snapshot::Snapshot;

#[derive(Debug)]
pub struct RegistryStore {
    current: RwLock<Option<Arc<Snapshot>>>,
    dataset: PathBuf,
}

impl RegistryStore {
    /// Create an empty (not ready) store for a dataset path.
    pub fn new(dataset: impl Into<PathBuf>) -> Self {
        Self {
            current: RwLock::new(None),
            dataset: dataset.into(),
        }
    }

    /// Create a store that is ready immediately.
    pub fn with_snapshot(dataset: impl Into<PathBuf>, snapshot: Snapshot) -> Self {
        Self {
            current: RwLock::new(Some(Arc::new(snapshot))),
            dataset: dataset.into(),
        }
    }

    /// Load the configured dataset. Returns the new record count.
    pub fn load(&self) -> Result<usize, LoadError> {
        self.reload_from(&self.dataset)
    }

    /// Load another dataset file and swap it in. On error the previous
    /// snapshot (if any) keeps serving.
    pub fn reload_from(&self, path: &Path) -> Result<usize, LoadError> {
        let snapshot = match Snapshot::load(path) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "dataset load failed, keeping previous snapshot");
                return Err(e);
            }
        };
        let count = snapshot.len();
        self.swap(snapshot);
        info!(path = %path.display(), records = count, "snapshot swapped");
        Ok(count)
    }

    /// Replace the live snapshot.
    pub fn swap(&self, snapshot: Snapshot) {
        let next = Arc::new(snapshot);
        let mut guard = self.current.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = Some(next);
    }

    /// The live snapshot, or `None` before the first successful load.
    pub fn current(&self) -> Option<Arc<Snapshot>> {
        self.current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn is_ready(&self) -> bool {
        self.current().is_some()
    }

    /// Records in the live snapshot (0 when not ready).
    pub fn record_count(&self) -> usize {
        self.current().map_or(0, |s| s.len())
    }

    pub fn dataset(&self) -> &Path {
        &self.dataset
    }
}
