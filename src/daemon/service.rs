//! Daemon service - dispatches requests to the matching engine.
//!
//! Holds the registry store (hot snapshot) so every request skips the CSV
//! load and index build.
//!
//! CHANGELOG:
//! - 10/18/2026 - reload rejects relative paths
//! - 10/17/2026 - reload/get/normalize/similarity methods
//! - 10/15/2026 - Initial implementation: health + search

use serde_json::{json, Map, Value};
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

use crate::config::{self, DEFAULT_LIMIT, DEFAULT_THRESHOLD, MAX_LIMIT};
use crate::daemon::protocol::codes;
use crate::matching::normalize::{normalize_with, NormalizeOptions};
use crate::matching::ranker::{calculate_similarity, round_similarity, SearchHit};
use crate::registry::{LoadError, RegistryStore, SearchOptions};

type Params = HashMap<String, Value>;

/// Request failures, each mapped to a protocol error code.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Unknown method: {0}")]
    UnknownMethod(String),

    #[error("Invalid params: {0}")]
    InvalidParams(String),

    #[error("Record {0} not found")]
    NotFound(u64),

    #[error("Service not initialized: no dataset loaded")]
    Unavailable,

    #[error("Reload failed: {0}")]
    LoadFailed(#[from] LoadError),
}

impl ServiceError {
    /// Protocol error code for this failure.
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownMethod(_) => codes::UNKNOWN_METHOD,
            Self::InvalidParams(_) => codes::INVALID_PARAMS,
            Self::NotFound(_) => codes::NOT_FOUND,
            Self::Unavailable => codes::SERVICE_UNAVAILABLE,
            Self::LoadFailed(_) => codes::LOAD_FAILED,
        }
    }
}

type ServiceResult = Result<Value, ServiceError>;

/// Search service shared by every connection thread.
pub struct SearchService {
    store: RegistryStore,
    started_at: String, // ISO timestamp
}

impl SearchService {
    /// Wrap a store. The store may still be empty; searches are rejected
    /// until it holds a snapshot.
    pub fn new(store: RegistryStore) -> Self {
        Self {
            store,
            started_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn store(&self) -> &RegistryStore {
        &self.store
    }

    /// Dispatch request to appropriate handler.
    pub fn dispatch(&self, method: &str, params: Params) -> ServiceResult {
        debug!(method, "dispatch");
        match method {
            "health" => Ok(self.health()),
            "search" => self.search(&params),
            "get" => self.get(&params),
            "reload" => self.reload(&params),
            "normalize" => normalize_text(&params),
            "similarity" => similarity(&params),
            _ => Err(ServiceError::UnknownMethod(method.to_string())),
        }
    }

    // ========================================================================
    // Health Check
    // ========================================================================

    /// Readiness and snapshot stats. Always answers, even before a load.
    fn health(&self) -> Value {
        let snapshot = self.store.current();
        let status = if snapshot.is_some() { "healthy" } else { "unavailable" };
        json!({
            "status": status,
            "ready": snapshot.is_some(),
            "records_loaded": snapshot.as_ref().map_or(0, |s| s.len()),
            "buckets": snapshot.as_ref().map_or(0, |s| s.index().bucket_count()),
            "largest_bucket": snapshot.as_ref().map_or(0, |s| s.index().largest_bucket()),
            "dataset": self.store.dataset().display().to_string(),
            "loaded_at": snapshot.as_ref().map(|s| s.loaded_at().to_rfc3339()),
            "started_at": self.started_at,
            "pid": std::process::id(),
            "version": "v1",
        })
    }

    // ========================================================================
    // Registry handlers: search, get, reload
    // ========================================================================

    /// Ranked fuzzy search.
    /// Params: name (required), threshold (default 70), limit (default 100,
    /// max 1000), use_blocking (default true)
    fn search(&self, params: &Params) -> ServiceResult {
        let name = required_str(params, "name")?;
        if name.is_empty() {
            return Err(ServiceError::InvalidParams("name must not be empty".into()));
        }
        let options = search_options(params)?;

        let snapshot = self.store.current().ok_or(ServiceError::Unavailable)?;
        let hits = snapshot.search(name, &options);
        Ok(hits_to_json(&hits))
    }

    /// Display name for a record id.
    /// Params: id (required)
    fn get(&self, params: &Params) -> ServiceResult {
        let id = params
            .get("id")
            .and_then(|v| v.as_u64())
            .ok_or_else(|| ServiceError::InvalidParams("id must be a non-negative integer".into()))?;

        let snapshot = self.store.current().ok_or(ServiceError::Unavailable)?;
        let name = snapshot.get(id).ok_or(ServiceError::NotFound(id))?;
        Ok(json!({ "id": id, "name": name }))
    }

    /// Rebuild the snapshot from disk and swap it in.
    /// Params: path (optional, absolute or `~/`, defaults to the configured dataset)
    fn reload(&self, params: &Params) -> ServiceResult {
        let path = match params.get("path") {
            None | Some(Value::Null) => self.store.dataset().to_path_buf(),
            Some(v) => {
                let raw = v
                    .as_str()
                    .ok_or_else(|| ServiceError::InvalidParams("path must be a string".into()))?;
                // The daemon's working directory is not the caller's.
                let path = config::expand_path(raw);
                if !path.is_absolute() {
                    return Err(ServiceError::InvalidParams(format!(
                        "path must be absolute, got {}",
                        raw
                    )));
                }
                path
            }
        };

        let count = self.store.reload_from(&path)?;
        Ok(json!({
            "records_loaded": count,
            "dataset": path.display().to_string(),
        }))
    }
}

// ============================================================================
// Stateless handlers
// ============================================================================

/// Canonical form of a text.
/// Params: text (required), remove_particles (default false), spanish (default false)
fn normalize_text(params: &Params) -> ServiceResult {
    let text = required_str(params, "text")?;
    let options = if optional_bool(params, "spanish")?.unwrap_or(false) {
        NormalizeOptions::SPANISH
    } else {
        NormalizeOptions {
            strip_particles: optional_bool(params, "remove_particles")?.unwrap_or(false),
            resolve_nicknames: false,
        }
    };

    Ok(json!({
        "input": text,
        "normalized": normalize_with(text, options),
    }))
}

/// Similarity percentage between two names.
/// Params: a, b (required)
fn similarity(params: &Params) -> ServiceResult {
    let a = required_str(params, "a")?;
    let b = required_str(params, "b")?;
    Ok(json!({
        "a": a,
        "b": b,
        "similarity": round_similarity(calculate_similarity(a, b)),
    }))
}

// ============================================================================
// Param parsing
// ============================================================================

fn required_str<'a>(params: &'a Params, key: &str) -> Result<&'a str, ServiceError> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| ServiceError::InvalidParams(format!("{} is required and must be a string", key)))
}

fn optional_bool(params: &Params, key: &str) -> Result<Option<bool>, ServiceError> {
    match params.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => v
            .as_bool()
            .map(Some)
            .ok_or_else(|| ServiceError::InvalidParams(format!("{} must be a boolean", key))),
    }
}

/// Validate threshold/limit/use_blocking against the query-layer bounds.
pub fn search_options(params: &Params) -> Result<SearchOptions, ServiceError> {
    let threshold = match params.get("threshold") {
        None | Some(Value::Null) => DEFAULT_THRESHOLD,
        Some(v) => v
            .as_f64()
            .filter(|t| (0.0..=100.0).contains(t))
            .ok_or_else(|| ServiceError::InvalidParams("threshold must be a number in 0..=100".into()))?,
    };

    let limit = match params.get("limit") {
        None | Some(Value::Null) => DEFAULT_LIMIT,
        Some(v) => v
            .as_u64()
            .map(|l| l as usize)
            .filter(|l| (1..=MAX_LIMIT).contains(l))
            .ok_or_else(|| {
                ServiceError::InvalidParams(format!("limit must be an integer in 1..={}", MAX_LIMIT))
            })?,
    };

    let use_blocking = optional_bool(params, "use_blocking")?.unwrap_or(true);

    Ok(SearchOptions {
        threshold,
        limit,
        use_blocking,
    })
}

/// `{id: {name, similarity}}` in ranking order, similarity rounded to 2 decimals.
pub fn hits_to_json(hits: &[SearchHit]) -> Value {
    let mut map = Map::new();
    for hit in hits {
        map.insert(
            hit.id.to_string(),
            json!({
                "name": hit.name,
                "similarity": round_similarity(hit.similarity),
            }),
        );
    }
    Value::Object(map)
}
