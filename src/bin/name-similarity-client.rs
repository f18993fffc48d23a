//! name-similarity-client - Thin client for daemon mode.
//!
//! CHANGELOG:
//! - 10/18/2026 - Validated --timeout, absolute reload paths
//! - 10/14/2026 - Initial implementation

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::collections::HashMap;
use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::UnixStream;
use std::time::Duration;

use name_similarity::config::{self, DEFAULT_SOCKET};
use name_similarity::daemon::protocol::{Request, Response};

#[derive(Parser)]
#[command(name = "name-similarity-client")]
#[command(about = "Thin client for name-similarity daemon")]
struct Cli {
    /// Method to call (search, health, get, reload, normalize, similarity)
    method: String,

    /// Socket path
    #[arg(long, default_value = DEFAULT_SOCKET)]
    socket: String,

    /// JSON parameters (as string), e.g. '{"name": "Juan García"}'
    #[arg(long)]
    params: Option<String>,

    /// Request timeout (seconds, > 0)
    #[arg(long, default_value = "5.0", value_parser = config::parse_timeout)]
    timeout: Duration,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut params: HashMap<String, serde_json::Value> = match cli.params {
        Some(p) => serde_json::from_str(&p).context("--params must be a JSON object")?,
        None => HashMap::new(),
    };

    // The daemon only accepts absolute reload paths; anchor ours here.
    if cli.method == "reload" {
        if let Some(raw) = params.get("path").and_then(|v| v.as_str()) {
            let resolved = config::resolve_path(raw)
                .with_context(|| format!("Invalid reload path {}", raw))?;
            params.insert("path".to_string(), resolved.display().to_string().into());
        }
    }
    let request = Request::new(cli.method, params);

    let socket_path = config::expand_path(&cli.socket);
    let stream = UnixStream::connect(&socket_path)
        .with_context(|| format!("Daemon not reachable at {}", socket_path.display()))?;

    let timeout = Some(cli.timeout);
    stream.set_read_timeout(timeout)?;
    stream.set_write_timeout(timeout)?;

    (&stream).write_all(request.to_ndjson_line()?.as_bytes())?;

    let mut reader = BufReader::new(&stream);
    let mut response_line = String::new();
    reader.read_line(&mut response_line)?;
    if response_line.trim().is_empty() {
        bail!("Empty response from daemon");
    }

    let response = Response::from_ndjson_line(&response_line)?;

    if response.ok {
        // Success: print result only
        println!("{}", serde_json::to_string_pretty(&response.result)?);
        Ok(())
    } else {
        let (code, message) = response
            .error
            .map(|e| (e.code, e.message))
            .unwrap_or_else(|| ("ERROR".to_string(), "unknown".to_string()));
        eprintln!("Error [{}]: {}", code, message);
        std::process::exit(1);
    }
}
