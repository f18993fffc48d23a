//! Output formatting and control utilities for the CLI.
//!
//! CHANGELOG:
//! - 10/17/2026 - Plain-text rendering for ranked hits
//! - 10/14/2026 - Initial implementation

use serde::Serialize;
use serde_json::{json, Value};

use crate::matching::ranker::{round_similarity, SearchHit};

/// Output control settings from CLI flags.
#[derive(Debug, Clone, Default)]
pub struct OutputControls {
    pub json: bool,
    pub compact: bool,
    pub fields: Option<String>,
}

impl OutputControls {
    /// Render data according to output controls.
    pub fn emit<T: Serialize>(&self, data: &T) -> String {
        let value = serde_json::to_value(data).unwrap_or(json!(null));

        let filtered = match self.fields {
            Some(ref fields) => filter_fields(&value, fields),
            None => value,
        };

        if self.compact {
            serde_json::to_string(&filtered).unwrap_or_else(|_| "{}".to_string())
        } else {
            serde_json::to_string_pretty(&filtered).unwrap_or_else(|_| "{}".to_string())
        }
    }

    /// Print data to stdout according to output controls.
    pub fn print<T: Serialize>(&self, data: &T) {
        println!("{}", self.emit(data));
    }
}

/// Filter JSON value to only include specified fields.
///
/// Applies to every object nested in arrays or object values, so
/// `--fields similarity` works on both hit lists and `{id: hit}` maps.
fn filter_fields(value: &Value, fields: &str) -> Value {
    let field_list: Vec<&str> = fields.split(',').map(|s| s.trim()).collect();

    match value {
        Value::Array(arr) => Value::Array(arr.iter().map(|v| filter_fields(v, fields)).collect()),
        Value::Object(map) => {
            if map.values().all(Value::is_object) && !map.is_empty() {
                return Value::Object(
                    map.iter()
                        .map(|(k, v)| (k.clone(), filter_fields(v, fields)))
                        .collect(),
                );
            }
            let mut filtered = serde_json::Map::new();
            for field in &field_list {
                if let Some(v) = map.get(*field) {
                    filtered.insert(field.to_string(), v.clone());
                }
            }
            Value::Object(filtered)
        }
        _ => value.clone(),
    }
}

/// Plain-text table of ranked hits.
pub fn format_hits(hits: &[SearchHit]) -> String {
    if hits.is_empty() {
        return "No matches.".to_string();
    }

    let id_width = hits.iter().map(|h| h.id.to_string().len()).max().unwrap_or(2).max(2);
    let mut out = format!("{:>id_width$}  {:>7}  {}\n", "ID", "SCORE", "NAME");
    out.push_str(&"-".repeat(50));
    for hit in hits {
        out.push('\n');
        out.push_str(&format!(
            "{:>id_width$}  {:>7.2}  {}",
            hit.id,
            round_similarity(hit.similarity),
            hit.name
        ));
    }
    out
}

/// Format error as JSON.
pub fn format_error(error: &str) -> String {
    serde_json::to_string(&json!({
        "error": error,
        "success": false
    }))
    .unwrap_or_else(|_| format!(r#"{{"error":"{}"}}"#, error))
}
