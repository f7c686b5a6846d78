//! # Main — CLI Entry Point
//!
//! Parses arguments, loads the optional TOML config, initializes logging and
//! the rayon pool, then hands off to the per-subcommand runners in `cli.rs`.
//!
//! ## Global Options
//!
//! - `--config` / `ERATOS_CONFIG`: TOML file with `[sieve]`, `[output]`,
//!   `[runtime]` sections.
//! - `--json`: emit JSON Lines instead of text (overrides `output.format`).
//! - `--threads`: rayon pool size for parallel queries (0 = all cores).
//!
//! Logging goes to stderr; `LOG_FORMAT=json` switches to structured JSON and
//! `RUST_LOG` sets the filter (default `warn`).

mod cli;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use eratos::config::{self, Config, OutputFormat};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "eratos", about = "Primality, counting and factoring from a bit-packed sieve")]
struct Cli {
    /// Path to a TOML config file (or set ERATOS_CONFIG env var)
    #[arg(long, env = "ERATOS_CONFIG")]
    config: Option<PathBuf>,

    /// Emit one JSON object per result line
    #[arg(long)]
    json: bool,

    /// Number of rayon worker threads (defaults to all logical cores)
    #[arg(long)]
    threads: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every prime up to a limit
    Primes {
        /// Largest number to sieve
        #[arg(long)]
        limit: u64,
    },
    /// Count the primes up to a limit, pi(limit)
    Count {
        /// Largest number to sieve
        #[arg(long)]
        limit: u64,
    },
    /// Find the n-th prime (1-indexed)
    Nth {
        /// Index of the prime to find
        n: u64,
    },
    /// Sum the first n primes
    Sum {
        /// Number of primes to add up
        count: u64,
    },
    /// Test values for primality (prime, composite, or unknown)
    IsPrime {
        /// Values to test
        #[arg(required = true)]
        values: Vec<u64>,
        /// Sieve limit to use instead of sizing from the largest value
        #[arg(long)]
        limit: Option<u64>,
    },
    /// Factor values into primes
    Factor {
        /// Values to factor
        #[arg(required = true)]
        values: Vec<u64>,
        /// Collapse repeated primes into p^k
        #[arg(long)]
        unique: bool,
    },
    /// Count the positive divisors of values
    Divisors {
        /// Values to inspect
        #[arg(required = true)]
        values: Vec<u64>,
    },
    /// Test values for square-freeness
    SquareFree {
        /// Values to test
        #[arg(required = true)]
        values: Vec<u64>,
    },
    /// Count twin primes (p, p+2) with p <= limit
    Twins {
        /// Largest p to consider
        #[arg(long)]
        limit: u64,
    },
    /// Count prime constellations with the given offsets, e.g. 0,2,6
    Constellation {
        /// Largest p to consider
        #[arg(long)]
        limit: u64,
        /// Comma-separated offsets from p
        #[arg(long, value_delimiter = ',', required = true)]
        offsets: Vec<u64>,
    },
    /// Count n in [2, upper] for which 2n^2-1 is prime
    Polynomial {
        /// Largest n to consider
        #[arg(long)]
        upper: u64,
    },
}

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => config::parse_toml_file(path)?,
        None => Config::default(),
    };
    if cli.json {
        config.output.format = OutputFormat::Json;
    }
    if cli.threads.is_some() {
        config.runtime.threads = cli.threads;
    }

    // Initialize structured logging: LOG_FORMAT=json (or runtime.log_format) for
    // log shippers, human-readable otherwise
    let log_format = std::env::var("LOG_FORMAT")
        .ok()
        .or_else(|| config.runtime.log_format.clone())
        .unwrap_or_default();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    if log_format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }

    cli::configure_rayon(config.runtime.threads);
    cli::run(&cli.command, &config)
}
