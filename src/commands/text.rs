//! Text commands: normalize, compare. No dataset needed.

use anyhow::Result;
use serde_json::json;

use name_similarity::matching::normalize::{normalize_with, NormalizeOptions};
use name_similarity::matching::ranker::{calculate_similarity, round_similarity};
use name_similarity::output::OutputControls;

/// Print the canonical form of a name.
pub fn normalize(text: &str, particles: bool, spanish: bool, output: &OutputControls) -> Result<()> {
    let options = if spanish {
        NormalizeOptions::SPANISH
    } else {
        NormalizeOptions {
            strip_particles: particles,
            resolve_nicknames: false,
        }
    };
    let normalized = normalize_with(text, options);

    if output.json {
        output.print(&json!({ "input": text, "normalized": normalized }));
    } else {
        println!("{}", normalized);
    }
    Ok(())
}

/// Print the similarity percentage of two names.
pub fn compare(a: &str, b: &str, output: &OutputControls) -> Result<()> {
    let similarity = round_similarity(calculate_similarity(a, b));

    if output.json {
        output.print(&json!({ "a": a, "b": b, "similarity": similarity }));
    } else {
        println!("{:.2}", similarity);
    }
    Ok(())
}
