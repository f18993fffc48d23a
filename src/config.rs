//! Default paths and search limits.

use std::path::PathBuf;
use std::time::Duration;

/// Env var that overrides the dataset location.
pub const DATASET_ENV: &str = "NAME_SIMILARITY_DATASET";

/// Dataset file name looked up in the default locations.
pub const DATASET_FILE: &str = "names_dataset.csv";

/// Default daemon socket (tilde-expanded by the binaries).
pub const DEFAULT_SOCKET: &str = "~/.name-similarity/daemon.sock";

/// Minimum similarity percentage when a caller doesn't pass one.
pub const DEFAULT_THRESHOLD: f64 = 70.0;

/// Result count when a caller doesn't pass one.
pub const DEFAULT_LIMIT: usize = 100;

/// Largest accepted result count.
pub const MAX_LIMIT: usize = 1000;

/// Default dataset path.
///
/// Tries multiple locations in order:
/// 1. NAME_SIMILARITY_DATASET env var
/// 2. ~/.name-similarity/names_dataset.csv (if it exists)
/// 3. names_dataset.csv next to the crate manifest
pub fn default_dataset_path() -> PathBuf {
    if let Ok(path) = std::env::var(DATASET_ENV) {
        return PathBuf::from(path);
    }

    if let Some(home) = dirs::home_dir() {
        let user_path = home.join(".name-similarity").join(DATASET_FILE);
        if user_path.exists() {
            return user_path;
        }
    }

    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(DATASET_FILE)
}

/// Expand `~` in a user-supplied path.
pub fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}

/// Expand `~` and anchor relative paths at the current directory.
///
/// The daemon changes its working directory when it detaches, so every path
/// it is handed must be resolved before that.
pub fn resolve_path(path: &str) -> std::io::Result<PathBuf> {
    std::path::absolute(expand_path(path))
}

/// Clap value parser for socket timeouts in seconds. Must be finite and > 0.
pub fn parse_timeout(raw: &str) -> Result<Duration, String> {
    let secs: f64 = raw.parse().map_err(|_| format!("not a number: {}", raw))?;
    if !secs.is_finite() || secs <= 0.0 {
        return Err(format!("timeout must be a positive number of seconds, got {}", raw));
    }
    Duration::try_from_secs_f64(secs).map_err(|e| format!("timeout out of range: {}", e))
}
