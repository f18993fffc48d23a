//! name-similarity-daemon - Persistent daemon with a hot registry snapshot.
//!
//! CHANGELOG:
//! - 10/18/2026 - Resolve relative --socket/--dataset before detaching
//! - 10/17/2026 - --dataset flag, tracing instead of eprintln
//! - 10/14/2026 - Initial implementation

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use name_similarity::config::{self, DEFAULT_SOCKET};
use name_similarity::daemon::server::DaemonServer;

#[derive(Parser)]
#[command(name = "name-similarity-daemon")]
#[command(about = "Persistent search daemon for name-similarity")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the daemon
    Start {
        /// Socket path
        #[arg(long, default_value = DEFAULT_SOCKET)]
        socket: String,

        /// Dataset CSV (default: $NAME_SIMILARITY_DATASET, ~/.name-similarity/names_dataset.csv)
        #[arg(long)]
        dataset: Option<String>,

        /// Run in foreground (don't daemonize)
        #[arg(long)]
        foreground: bool,
    },

    /// Stop the daemon
    Stop {
        /// Socket path
        #[arg(long, default_value = DEFAULT_SOCKET)]
        socket: String,
    },

    /// Check daemon status
    Status {
        /// Socket path
        #[arg(long, default_value = DEFAULT_SOCKET)]
        socket: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Start { socket, dataset, foreground } => cmd_start(socket, dataset, foreground),
        Commands::Stop { socket } => cmd_stop(socket),
        Commands::Status { socket } => cmd_status(socket),
    }
}

fn cmd_start(socket: String, dataset: Option<String>, foreground: bool) -> Result<()> {
    // Resolved before daemonizing: the child runs from /tmp.
    let socket_path = config::resolve_path(&socket)
        .with_context(|| format!("Invalid socket path {}", socket))?;
    let dataset: PathBuf = match dataset {
        Some(raw) => config::resolve_path(&raw),
        None => std::path::absolute(config::default_dataset_path()),
    }
    .context("Invalid dataset path")?;

    // Create parent directory if needed
    if let Some(parent) = Path::new(&socket_path).parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create socket directory {:?}", parent))?;
    }

    if foreground {
        tracing::info!(dataset = %dataset.display(), "starting in foreground");
        DaemonServer::new(&socket_path, &dataset).serve()?;
    } else {
        use daemonize::Daemonize;

        let pid_file = format!("{}.pid", socket_path.display());

        let daemonize = Daemonize::new().pid_file(&pid_file).working_directory("/tmp");

        match daemonize.start() {
            Ok(_) => {
                // Child process: load the dataset and serve
                DaemonServer::new(&socket_path, &dataset).serve()?;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to daemonize");
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

fn cmd_stop(socket: String) -> Result<()> {
    let socket_path = config::expand_path(&socket);
    let pid_file = format!("{}.pid", socket_path.display());

    let pid_str = std::fs::read_to_string(&pid_file)
        .with_context(|| format!("Failed to read PID file {}", pid_file))?;
    let pid: i32 = pid_str.trim().parse().context("Malformed PID file")?;

    // Send SIGTERM
    let rc = unsafe { libc::kill(pid, libc::SIGTERM) };
    if rc != 0 {
        tracing::warn!(pid, "SIGTERM failed, process may already be gone");
    }

    // Clean up files
    let _ = std::fs::remove_file(&pid_file);
    let _ = std::fs::remove_file(&socket_path);

    println!("Daemon stopped (pid {})", pid);

    Ok(())
}

fn cmd_status(socket: String) -> Result<()> {
    let socket_path = config::expand_path(&socket);

    match std::os::unix::net::UnixStream::connect(&socket_path) {
        Ok(_) => {
            println!("Daemon running at {}", socket_path.display());
            Ok(())
        }
        Err(_) => {
            println!("Daemon not running");
            std::process::exit(1);
        }
    }
}
