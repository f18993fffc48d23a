//! Immutable, fully-built view of the registry.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::dataset::{load_records, LoadError};
use crate::config::{DEFAULT_LIMIT, DEFAULT_THRESHOLD};
use crate::matching::index::{BlockingIndex, IndexedRecord, Record};
use crate::matching::normalize::{normalize_with, NormalizeOptions};
use crate::matching::ranker::{rank, SearchHit};

/// Knobs for a single search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchOptions {
    /// Minimum similarity percentage (inclusive).
    pub threshold: f64,
    /// Maximum number of hits returned.
    pub limit: usize,
    /// Only score records sharing the query's blocking key. Off means a full
    /// scan: slower, but a typo in the first two letters can still match.
    pub use_blocking: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            limit: DEFAULT_LIMIT,
            use_blocking: true,
        }
    }
}

/// Records, their blocking index and an id lookup. Never mutated after build;
/// share it behind an `Arc`.
#[derive(Debug)]
pub struct Snapshot {
    index: BlockingIndex,
    by_id: HashMap<u64, usize>,
    source: Option<PathBuf>,
    loaded_at: DateTime<Utc>,
}

impl Snapshot {
    /// Build a snapshot from records already in memory.
    pub fn from_records(records: Vec<Record>) -> Self {
        let index = BlockingIndex::build(records);
        let by_id = index
            .records()
            .iter()
            .enumerate()
            .map(|(pos, r)| (r.id, pos))
            .collect();

        Self {
            index,
            by_id,
            source: None,
            loaded_at: Utc::now(),
        }
    }

    /// Read, normalize and index a dataset file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let records = load_records(path)?;
        let mut snapshot = Self::from_records(records);
        snapshot.source = Some(path.to_path_buf());

        info!(
            path = %path.display(),
            records = snapshot.len(),
            buckets = snapshot.index.bucket_count(),
            "dataset loaded"
        );
        Ok(snapshot)
    }

    /// Ranked matches for a raw query.
    pub fn search(&self, query: &str, options: &SearchOptions) -> Vec<SearchHit> {
        let canonical = normalize_with(query, NormalizeOptions::PLAIN);

        let hits = if options.use_blocking {
            let candidates = self.index.bucket(crate::matching::blocking_key(&canonical));
            debug!(query, candidates = candidates.len(), "blocked search");
            rank(&canonical, candidates, options.threshold, options.limit)
        } else {
            debug!(query, candidates = self.len(), "full scan");
            rank(&canonical, self.index.records(), options.threshold, options.limit)
        };

        debug!(query, hits = hits.len(), "search done");
        hits
    }

    /// Candidate records for a query (blocking path only).
    pub fn candidates_for(&self, query: &str) -> Vec<&IndexedRecord> {
        self.index.candidates_for(query)
    }

    /// Display name for an id.
    pub fn get(&self, id: u64) -> Option<&str> {
        self.by_id
            .get(&id)
            .map(|&pos| self.index.records()[pos].name.as_str())
    }

    /// Every record in load order.
    pub fn iter(&self) -> impl Iterator<Item = &IndexedRecord> {
        self.index.records().iter()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn index(&self) -> &BlockingIndex {
        &self.index
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> Snapshot {
        Snapshot::from_records(vec![
            Record::new(1, "Juan García López"),
            Record::new(2, "María Rodríguez"),
            Record::new(3, "Pedro Martínez"),
            Record::new(4, "José González"),
            Record::new(5, "Ana Fernández"),
            Record::new(6, "Juan Carlos Pérez"),
            Record::new(7, "Juana Sánchez"),
        ])
    }

    #[test]
    fn test_get_and_len() {
        let snap = snapshot();
        assert_eq!(snap.len(), 7);
        assert_eq!(snap.get(1), Some("Juan García López"));
        assert_eq!(snap.get(2), Some("María Rodríguez"));
        assert_eq!(snap.get(99), None);
        assert_eq!(snap.iter().count(), 7);
        assert!(snap.source().is_none());
    }

    #[test]
    fn test_candidates_share_prefix() {
        let snap = snapshot();
        let ids: Vec<u64> = snap.candidates_for("Juan García").iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 6, 7]);
    }

    #[test]
    fn test_search_defaults() {
        let snap = snapshot();
        let hits = snap.search("Juan García", &SearchOptions::default());
        assert_eq!(hits[0].id, 1);
        assert!(hits.iter().all(|h| h.similarity >= DEFAULT_THRESHOLD));
    }

    #[test]
    fn test_no_bucket_means_no_hits() {
        let snap = snapshot();
        assert!(snap.search("Zzz", &SearchOptions::default()).is_empty());
    }

    #[test]
    fn test_full_scan_recovers_first_letter_typo() {
        let snap = snapshot();
        let blocked = snap.search("Uan García López", &SearchOptions::default());
        assert!(blocked.is_empty());

        let full = snap.search(
            "Uan García López",
            &SearchOptions {
                use_blocking: false,
                ..SearchOptions::default()
            },
        );
        assert_eq!(full.first().map(|h| h.id), Some(1));
    }

    #[test]
    fn test_empty_query_is_not_an_error() {
        let snap = snapshot();
        assert!(snap.search("", &SearchOptions::default()).is_empty());
        let full = SearchOptions {
            threshold: 0.0,
            use_blocking: false,
            ..SearchOptions::default()
        };
        assert!(snap.search("", &full).iter().all(|h| h.similarity == 0.0));
    }

    #[test]
    fn test_load_from_disk() {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "ID,Full Name\n1,Juan García López\n6,Juan Carlos Pérez\n7,Juana Sánchez\n").unwrap();

        let snap = Snapshot::load(file.path()).unwrap();
        assert_eq!(snap.len(), 3);
        assert_eq!(snap.source(), Some(file.path()));
        assert_eq!(snap.index().bucket_count(), 1);
    }
}
