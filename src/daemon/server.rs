//! UNIX socket server for daemon mode.
//!
//! Listens on a UNIX socket, accepts connections, and dispatches requests
//! to SearchService. Each connection gets its own thread; all of them read
//! the same shared snapshot.
//!
//! CHANGELOG:
//! - 10/17/2026 - Thread per connection, INVALID_JSON responses
//! - 10/14/2026 - Initial implementation

use anyhow::Result;
use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

use crate::daemon::protocol::{self, codes};
use crate::daemon::service::SearchService;
use crate::registry::RegistryStore;

/// Daemon server listening on UNIX socket.
pub struct DaemonServer {
    service: Arc<SearchService>,
    socket_path: String,
}

impl DaemonServer {
    /// Create a server and attempt the initial dataset load.
    ///
    /// A failed load is logged and the server still starts: health reports
    /// not-ready and searches are refused until a `reload` succeeds.
    pub fn new(socket_path: impl AsRef<Path>, dataset: impl AsRef<Path>) -> Self {
        let store = RegistryStore::new(dataset.as_ref());
        match store.load() {
            Ok(count) => info!(records = count, "initial load complete"),
            Err(e) => error!(error = %e, "initial load failed, serving as not ready"),
        }
        Self::with_service(socket_path, SearchService::new(store))
    }

    /// Create a server around an existing service.
    pub fn with_service(socket_path: impl AsRef<Path>, service: SearchService) -> Self {
        Self {
            service: Arc::new(service),
            socket_path: socket_path.as_ref().to_string_lossy().to_string(),
        }
    }

    /// Start serving requests (blocking).
    pub fn serve(&self) -> Result<()> {
        // Clean up stale socket
        let _ = std::fs::remove_file(&self.socket_path);

        let listener = UnixListener::bind(&self.socket_path)?;

        // Owner-only (0600)
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.socket_path, std::fs::Permissions::from_mode(0o600))?;
        }

        info!(
            socket = %self.socket_path,
            ready = self.service.store().is_ready(),
            "listening"
        );

        for stream in listener.incoming() {
            match stream {
                Ok(stream) => {
                    let service = Arc::clone(&self.service);
                    std::thread::spawn(move || {
                        if let Err(e) = handle_connection(&service, stream) {
                            warn!(error = %e, "connection error");
                        }
                    });
                }
                Err(e) => {
                    error!(error = %e, "accept error");
                }
            }
        }

        Ok(())
    }
}

/// Handle a single client connection: one NDJSON request, one response.
pub fn handle_connection(service: &SearchService, stream: UnixStream) -> Result<()> {
    let mut writer = stream.try_clone()?;
    let mut reader = BufReader::new(&stream);

    let mut line = String::new();
    reader.read_line(&mut line)?;

    if line.trim().is_empty() {
        return Ok(()); // Client disconnected
    }

    let response = handle_line(service, &line);
    writer.write_all(response.to_ndjson_line()?.as_bytes())?;
    writer.flush()?;

    Ok(())
}

/// Turn one request line into a response. Never fails: malformed input
/// becomes an INVALID_JSON error response.
pub fn handle_line(service: &SearchService, line: &str) -> protocol::Response {
    let start = Instant::now();
    let elapsed_ms = || start.elapsed().as_secs_f64() * 1000.0;

    let request = match protocol::Request::from_ndjson_line(line) {
        Ok(request) => request,
        Err(e) => {
            return protocol::Response::error(
                String::new(),
                codes::INVALID_JSON,
                format!("{:#}", e),
                elapsed_ms(),
            );
        }
    };

    let response = match service.dispatch(&request.method, request.params) {
        Ok(result) => protocol::Response::success(request.id, result, elapsed_ms()),
        Err(e) => protocol::Response::error(request.id, e.code(), e.to_string(), elapsed_ms()),
    };

    debug!(
        method = %request.method,
        ok = response.ok,
        server_ms = response.meta.server_ms,
        "request handled"
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::Record;
    use crate::registry::Snapshot;

    fn service() -> SearchService {
        SearchService::new(RegistryStore::with_snapshot(
            "/unused.csv",
            Snapshot::from_records(vec![Record::new(1, "Juan García López"), Record::new(7, "Juana Sánchez")]),
        ))
    }

    #[test]
    fn test_handle_line_success() {
        let line = r#"{"id":"r1","v":1,"method":"search","params":{"name":"Juan Garcia"}}"#;
        let response = handle_line(&service(), line);
        assert!(response.ok);
        assert_eq!(response.id, "r1");
        assert!(response.result.unwrap().get("1").is_some());
    }

    #[test]
    fn test_handle_line_invalid_json() {
        let response = handle_line(&service(), "{not json");
        assert!(!response.ok);
        assert_eq!(response.error.unwrap().code, codes::INVALID_JSON);
    }

    #[test]
    fn test_handle_line_service_error() {
        let line = r#"{"id":"r2","v":1,"method":"explode","params":{}}"#;
        let response = handle_line(&service(), line);
        assert_eq!(response.id, "r2");
        assert_eq!(response.error.unwrap().code, codes::UNKNOWN_METHOD);
    }

    #[test]
    fn test_socket_round_trip() {
        let service = service();
        let (client, server) = UnixStream::pair().unwrap();

        let handle = std::thread::spawn(move || handle_connection(&service, server));

        let mut writer = client.try_clone().unwrap();
        writer
            .write_all(b"{\"id\":\"r3\",\"v\":1,\"method\":\"health\",\"params\":{}}\n")
            .unwrap();

        let mut reader = BufReader::new(&client);
        let mut line = String::new();
        reader.read_line(&mut line).unwrap();
        handle.join().unwrap().unwrap();

        let response = protocol::Response::from_ndjson_line(&line).unwrap();
        assert!(response.ok);
        assert_eq!(response.result.unwrap()["records_loaded"], 2);
    }
}
