//! Similarity scoring and ranking.
//!
//! CHANGELOG:
//! - 10/16/2026 - Parallel scoring for large candidate sets
//! - 10/15/2026 - Initial implementation

use rayon::prelude::*;
use serde::Serialize;

use super::fuzzy::jaro_winkler;
use super::index::IndexedRecord;
use super::normalize::{normalize_with, NormalizeOptions};

/// Candidate sets at least this large are scored on the rayon pool.
pub const PARALLEL_THRESHOLD: usize = 4096;

/// One ranked match.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub id: u64,
    pub name: String,
    /// Percentage, 0.0 - 100.0.
    pub similarity: f64,
}

/// Score two canonical forms as a percentage.
///
/// Equal forms short-circuit to exactly 100.0.
pub fn score_canonical(a: &str, b: &str) -> f64 {
    if a == b {
        return 100.0;
    }
    jaro_winkler(a, b) * 100.0
}

/// Similarity percentage (0.0 - 100.0) between two raw names.
///
/// Both sides go through the plain pipeline (no particles, no nicknames).
pub fn calculate_similarity(name_a: &str, name_b: &str) -> f64 {
    let a = normalize_with(name_a, NormalizeOptions::PLAIN);
    let b = normalize_with(name_b, NormalizeOptions::PLAIN);
    score_canonical(&a, &b)
}

/// Score candidates against an already-canonical query.
///
/// Keeps scores `>= threshold`, sorts by descending score (stable, so ties
/// keep candidate order) and truncates to `limit`.
pub fn rank<'a, I>(canonical_query: &str, candidates: I, threshold: f64, limit: usize) -> Vec<SearchHit>
where
    I: IntoIterator<Item = &'a IndexedRecord>,
{
    let candidates: Vec<&IndexedRecord> = candidates.into_iter().collect();

    let score = |record: &&IndexedRecord| {
        let similarity = score_canonical(canonical_query, &record.canonical);
        (similarity >= threshold).then(|| SearchHit {
            id: record.id,
            name: record.name.clone(),
            similarity,
        })
    };

    // Both paths collect in candidate order, which the stable sort relies on.
    let mut hits: Vec<SearchHit> = if candidates.len() >= PARALLEL_THRESHOLD {
        candidates.par_iter().filter_map(score).collect()
    } else {
        candidates.iter().filter_map(score).collect()
    };

    hits.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
    hits.truncate(limit);
    hits
}

/// Rank raw-name candidates against a raw query.
pub fn search<'a, I>(query: &str, candidates: I, threshold: f64, limit: usize) -> Vec<SearchHit>
where
    I: IntoIterator<Item = &'a IndexedRecord>,
{
    let canonical = normalize_with(query, NormalizeOptions::PLAIN);
    rank(&canonical, candidates, threshold, limit)
}

/// Round a percentage to 2 decimals for presentation.
pub fn round_similarity(similarity: f64) -> f64 {
    (similarity * 100.0).round() / 100.0
}
