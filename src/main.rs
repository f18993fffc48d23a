//! name-similarity - fuzzy lookup over a historical name registry
//!
//! One-shot CLI: load the dataset, run one command, exit. The daemon binary
//! keeps the index hot for repeated queries.
//!
//! CHANGELOG:
//! - 10/16/2026 - Initial CLI: search, stats, normalize, compare

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use name_similarity::config::{self, DEFAULT_LIMIT, DEFAULT_THRESHOLD, MAX_LIMIT};
use name_similarity::output::{self, OutputControls};
use name_similarity::registry::SearchOptions;

mod commands;

/// Find registry names close to a query name (Jaro-Winkler, prefix blocking).
#[derive(Parser, Debug)]
#[command(name = "name-similarity")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Compact JSON output (no whitespace)
    #[arg(long, global = true)]
    compact: bool,

    /// Comma-separated field allowlist for JSON output
    #[arg(long, global = true)]
    fields: Option<String>,

    /// Dataset CSV (default: $NAME_SIMILARITY_DATASET, ~/.name-similarity/names_dataset.csv)
    #[arg(long, global = true)]
    dataset: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search the registry for names similar to NAME
    Search {
        /// Full name to search for
        name: String,

        /// Minimum similarity percentage (0-100)
        #[arg(short, long, default_value_t = DEFAULT_THRESHOLD, value_parser = parse_threshold)]
        threshold: f64,

        /// Max results (1-1000)
        #[arg(short, long, default_value_t = DEFAULT_LIMIT as u64,
              value_parser = clap::value_parser!(u64).range(1..=MAX_LIMIT as u64))]
        limit: u64,

        /// Scan every record instead of only those sharing the first two letters
        #[arg(long)]
        no_blocking: bool,
    },

    /// Show record and bucket counts for the dataset
    Stats,

    /// Print the canonical form of a name
    Normalize {
        /// Raw name
        text: String,

        /// Drop Spanish particles (de, del, de la, y, ...)
        #[arg(short, long)]
        particles: bool,

        /// Spanish-aware: drop particles and resolve nicknames (pepe -> jose)
        #[arg(short, long)]
        spanish: bool,
    },

    /// Similarity percentage between two names
    Compare {
        /// First name
        a: String,

        /// Second name
        b: String,
    },
}

fn parse_threshold(raw: &str) -> Result<f64, String> {
    let value: f64 = raw.parse().map_err(|_| format!("not a number: {}", raw))?;
    if (0.0..=100.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("threshold must be between 0 and 100, got {}", value))
    }
}

fn main() -> ExitCode {
    // Initialize tracing/logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();

    let output_controls = OutputControls {
        json: cli.json,
        compact: cli.compact,
        fields: cli.fields.clone(),
    };

    let dataset: PathBuf = cli
        .dataset
        .as_deref()
        .map(config::expand_path)
        .unwrap_or_else(config::default_dataset_path);

    let result = match cli.command {
        Command::Search { name, threshold, limit, no_blocking } => {
            let options = SearchOptions {
                threshold,
                limit: limit as usize,
                use_blocking: !no_blocking,
            };
            commands::search::search(&dataset, &name, options, &output_controls)
        }
        Command::Stats => commands::search::stats(&dataset, &output_controls),
        Command::Normalize { text, particles, spanish } => {
            commands::text::normalize(&text, particles, spanish, &output_controls)
        }
        Command::Compare { a, b } => commands::text::compare(&a, &b, &output_controls),
    };

    match result {
        Ok(()) => ExitCode::from(0),
        Err(e) => {
            if cli.json {
                eprintln!("{}", output::format_error(&format!("{:#}", e)));
            } else {
                eprintln!("Error: {:#}", e);
            }
            ExitCode::from(1)
        }
    }
}
