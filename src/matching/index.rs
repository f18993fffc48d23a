//! Prefix blocking index.
//!
//! Records are bucketed by the first two characters of their canonical form,
//! so a query is only scored against records that start the same way.
//!
//! Known limitation: a query and a true match that differ in their first two
//! canonical characters ("Juan" vs "Uan", a typo in the first letter) land in
//! different buckets and are never compared. Callers that need full recall
//! skip the index and scan every record.

use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashMap;

use super::normalize::{normalize_with, NormalizeOptions};

/// Number of leading canonical characters that form a blocking key.
pub const BLOCKING_KEY_CHARS: usize = 2;

/// A registry entry as loaded from the dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    pub id: u64,
    pub name: String,
}

impl Record {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// A record with its canonical form computed once at build time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexedRecord {
    pub id: u64,
    pub name: String,
    pub canonical: String,
}

/// Blocking key for an already-canonical string.
///
/// First two characters, the whole string if shorter, `""` if empty.
pub fn blocking_key(canonical: &str) -> &str {
    match canonical.char_indices().nth(BLOCKING_KEY_CHARS) {
        Some((end, _)) => &canonical[..end],
        None => canonical,
    }
}

/// Records in load order plus key → positions of the records in that bucket.
#[derive(Debug, Default)]
pub struct BlockingIndex {
    records: Vec<IndexedRecord>,
    buckets: HashMap<String, Vec<usize>>,
}

impl BlockingIndex {
    /// Normalize every record and bucket it by its own key.
    ///
    /// Normalization runs in parallel; the collected order is the input order,
    /// so bucket order always matches load order.
    pub fn build(records: Vec<Record>) -> Self {
        let records: Vec<IndexedRecord> = records
            .into_par_iter()
            .map(|r| IndexedRecord {
                canonical: normalize_with(&r.name, NormalizeOptions::PLAIN),
                id: r.id,
                name: r.name,
            })
            .collect();

        let mut buckets: HashMap<String, Vec<usize>> = HashMap::new();
        for (pos, record) in records.iter().enumerate() {
            buckets
                .entry(blocking_key(&record.canonical).to_string())
                .or_default()
                .push(pos);
        }

        Self { records, buckets }
    }

    /// Records in the query's bucket, in load order. Empty when no record
    /// shares the query's key.
    pub fn candidates_for(&self, query: &str) -> Vec<&IndexedRecord> {
        let canonical = normalize_with(query, NormalizeOptions::PLAIN);
        self.bucket(blocking_key(&canonical))
    }

    /// Records stored under an exact key.
    pub fn bucket(&self, key: &str) -> Vec<&IndexedRecord> {
        self.buckets
            .get(key)
            .map(|positions| positions.iter().map(|&p| &self.records[p]).collect())
            .unwrap_or_default()
    }

    /// Every record, in load order (full-scan path).
    pub fn records(&self) -> &[IndexedRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Size of the biggest bucket (worst-case blocked candidate set).
    pub fn largest_bucket(&self) -> usize {
        self.buckets.values().map(Vec::len).max().unwrap_or(0)
    }
}
