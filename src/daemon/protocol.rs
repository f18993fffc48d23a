//! Daemon protocol types for NDJSON communication over UNIX socket.
//!
//! CHANGELOG:
//! - 10/17/2026 - Error codes for the search service
//! - 10/14/2026 - Initial implementation

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Current protocol version.
pub const PROTOCOL_VERSION: u8 = 1;

/// Error codes sent back to clients.
pub mod codes {
    pub const INVALID_JSON: &str = "INVALID_JSON";
    pub const UNKNOWN_METHOD: &str = "UNKNOWN_METHOD";
    pub const INVALID_PARAMS: &str = "INVALID_PARAMS";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const SERVICE_UNAVAILABLE: &str = "SERVICE_UNAVAILABLE";
    pub const LOAD_FAILED: &str = "LOAD_FAILED";
}

/// NDJSON request from client to daemon.
#[derive(Debug, Serialize, Deserialize)]
pub struct Request {
    /// Unique request ID (UUID)
    pub id: String,
    /// Protocol version (currently 1)
    pub v: u8,
    /// Method name (e.g., "search", "health", "reload")
    pub method: String,
    /// Method parameters (flexible key-value map)
    #[serde(default)]
    pub params: HashMap<String, serde_json::Value>,
}

/// NDJSON response from daemon to client.
#[derive(Debug, Serialize, Deserialize)]
pub struct Response {
    /// Request ID (matches request)
    pub id: String,
    /// Success flag
    pub ok: bool,
    /// Result data (if successful)
    pub result: Option<serde_json::Value>,
    /// Error information (if failed)
    pub error: Option<ErrorInfo>,
    /// Response metadata
    pub meta: ResponseMeta,
}

/// Error details in response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Error code (see [`codes`])
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Additional error details (optional)
    pub details: Option<serde_json::Value>,
}

/// Response metadata.
#[derive(Debug, Serialize, Deserialize)]
pub struct ResponseMeta {
    /// Server execution time in milliseconds
    pub server_ms: f64,
    /// Protocol version
    pub protocol_v: u8,
}

impl Request {
    /// Build a request with a fresh UUID.
    pub fn new(method: impl Into<String>, params: HashMap<String, serde_json::Value>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            v: PROTOCOL_VERSION,
            method: method.into(),
            params,
        }
    }

    /// Parse request from NDJSON line.
    pub fn from_ndjson_line(line: &str) -> Result<Self> {
        serde_json::from_str(line).context("Failed to parse request JSON")
    }

    /// Serialize request to NDJSON line.
    pub fn to_ndjson_line(&self) -> Result<String> {
        let json = serde_json::to_string(self)?;
        Ok(format!("{}\n", json))
    }
}

impl Response {
    /// Create a success response.
    pub fn success(id: String, result: serde_json::Value, server_ms: f64) -> Self {
        Self {
            id,
            ok: true,
            result: Some(result),
            error: None,
            meta: ResponseMeta {
                server_ms,
                protocol_v: PROTOCOL_VERSION,
            },
        }
    }

    /// Create an error response.
    pub fn error(id: String, code: &str, message: String, server_ms: f64) -> Self {
        Self {
            id,
            ok: false,
            result: None,
            error: Some(ErrorInfo {
                code: code.to_string(),
                message,
                details: None,
            }),
            meta: ResponseMeta {
                server_ms,
                protocol_v: PROTOCOL_VERSION,
            },
        }
    }

    /// Parse response from NDJSON line.
    pub fn from_ndjson_line(line: &str) -> Result<Self> {
        serde_json::from_str(line).context("Failed to parse response JSON")
    }

    /// Serialize response to NDJSON line.
    pub fn to_ndjson_line(&self) -> Result<String> {
        let json = serde_json::to_string(self)?;
        Ok(format!("{}\n", json))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_without_params() {
        let req = Request::from_ndjson_line(r#"{"id":"a","v":1,"method":"health"}"#).unwrap();
        assert_eq!(req.method, "health");
        assert!(req.params.is_empty());
    }

    #[test]
    fn test_request_line_round_trip() {
        let mut params = HashMap::new();
        params.insert("name".to_string(), serde_json::json!("Juan García"));
        let line = Request::new("search", params).to_ndjson_line().unwrap();
        assert!(line.ends_with('\n'));

        let parsed = Request::from_ndjson_line(&line).unwrap();
        assert_eq!(parsed.v, PROTOCOL_VERSION);
        assert_eq!(parsed.params["name"], "Juan García");
    }

    #[test]
    fn test_error_response_shape() {
        let resp = Response::error("x".into(), codes::SERVICE_UNAVAILABLE, "not ready".into(), 0.1);
        let value: serde_json::Value = serde_json::from_str(&resp.to_ndjson_line().unwrap()).unwrap();
        assert_eq!(value["ok"], false);
        assert_eq!(value["error"]["code"], "SERVICE_UNAVAILABLE");
        assert!(value["result"].is_null());
        assert_eq!(value["meta"]["protocol_v"], 1);
    }

    #[test]
    fn test_garbage_line_fails() {
        assert!(Request::from_ndjson_line("not json").is_err());
    }
}
