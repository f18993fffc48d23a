//! Registry commands: search, stats.
//!
//! One-shot: each invocation loads the dataset, builds the index and exits.
//! Use the daemon to keep the snapshot hot between queries.
//!
//! CHANGELOG:
//! - 10/16/2026 - Initial implementation

use anyhow::{Context, Result};
use serde_json::json;
use std::path::Path;
use std::time::Instant;

use name_similarity::daemon::service::hits_to_json;
use name_similarity::output::{format_hits, OutputControls};
use name_similarity::registry::{SearchOptions, Snapshot};

fn load(dataset: &Path) -> Result<Snapshot> {
    Snapshot::load(dataset).with_context(|| format!("Failed to load dataset {:?}", dataset))
}

/// Ranked fuzzy search against the dataset.
pub fn search(dataset: &Path, name: &str, options: SearchOptions, output: &OutputControls) -> Result<()> {
    let snapshot = load(dataset)?;

    let start = Instant::now();
    let hits = snapshot.search(name, &options);
    tracing::debug!(elapsed_ms = start.elapsed().as_secs_f64() * 1000.0, "search timed");

    if output.json {
        output.print(&hits_to_json(&hits));
    } else {
        println!("{}", format_hits(&hits));
    }
    Ok(())
}

/// Dataset and index statistics.
pub fn stats(dataset: &Path, output: &OutputControls) -> Result<()> {
    let start = Instant::now();
    let snapshot = load(dataset)?;
    let load_ms = start.elapsed().as_secs_f64() * 1000.0;
    let index = snapshot.index();

    if output.json {
        output.print(&json!({
            "dataset": dataset.display().to_string(),
            "records_loaded": snapshot.len(),
            "buckets": index.bucket_count(),
            "largest_bucket": index.largest_bucket(),
            "load_ms": (load_ms * 10.0).round() / 10.0,
        }));
    } else {
        println!("Dataset:        {}", dataset.display());
        println!("Records:        {}", snapshot.len());
        println!("Buckets:        {}", index.bucket_count());
        println!("Largest bucket: {}", index.largest_bucket());
        println!("Load time:      {:.1} ms", load_ms);
    }
    Ok(())
}
