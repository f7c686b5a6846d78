//! TOML configuration structs, parsing, and validation.
//!
//! The config file tunes how the CLI sizes sieves and where it writes. Every
//! section is optional; a missing file section falls back to the built-in
//! defaults, and command-line flags override whatever the file says.
//!
//! ```toml
//! [sieve]
//! factor_margin = 32
//! count_floor = 64
//! max_limit = 4294967296
//!
//! [output]
//! format = "json"
//!
//! [runtime]
//! threads = 4
//! log_format = "text"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::sieve::{DEFAULT_COUNT_FLOOR, DEFAULT_FACTOR_MARGIN};

/// Largest limit the CLI will allocate by default (2^32, a 256 MB table).
pub const DEFAULT_MAX_LIMIT: u64 = 1 << 32;

// ── TOML Configuration Structs ──────────────────────────────────

/// Top-level configuration parsed from TOML files.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub sieve: SieveConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub runtime: RuntimeConfig,
}

/// The `[sieve]` section: sizing parameters for the constructors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SieveConfig {
    /// Cushion above `⌈√n⌉` when sizing a sieve to factor `n`.
    #[serde(default = "default_factor_margin")]
    pub factor_margin: u64,
    /// Minimum limit when sizing from a prime count.
    #[serde(default = "default_count_floor")]
    pub count_floor: u64,
    /// Refuse to build sieves above this limit.
    #[serde(default = "default_max_limit")]
    pub max_limit: u64,
}

fn default_factor_margin() -> u64 {
    DEFAULT_FACTOR_MARGIN
}

fn default_count_floor() -> u64 {
    DEFAULT_COUNT_FLOOR
}

fn default_max_limit() -> u64 {
    DEFAULT_MAX_LIMIT
}

impl Default for SieveConfig {
    fn default() -> Self {
        SieveConfig {
            factor_margin: DEFAULT_FACTOR_MARGIN,
            count_floor: DEFAULT_COUNT_FLOOR,
            max_limit: DEFAULT_MAX_LIMIT,
        }
    }
}

/// Result rendering: one line of text per query, or JSON records.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// The `[output]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

/// The `[runtime]` section: thread pool and logging.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RuntimeConfig {
    /// Rayon worker threads for parallel queries (0 or absent = all cores).
    pub threads: Option<usize>,
    /// `"json"` for structured logs, anything else for human-readable.
    pub log_format: Option<String>,
}

// ── TOML Parsing ────────────────────────────────────────────────

/// Parse a configuration from a TOML string.
pub fn parse_toml(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content)?;
    validate_config(&config)?;
    Ok(config)
}

/// Parse a configuration from a TOML file path.
pub fn parse_toml_file(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading config file {}", path.display()))?;
    parse_toml(&content).with_context(|| format!("parsing config file {}", path.display()))
}

/// Validate a configuration for logical consistency.
fn validate_config(config: &Config) -> Result<()> {
    if config.sieve.factor_margin < DEFAULT_FACTOR_MARGIN {
        anyhow::bail!(
            "sieve.factor_margin must be at least {}, got {}",
            DEFAULT_FACTOR_MARGIN,
            config.sieve.factor_margin
        );
    }
    if config.sieve.count_floor < 2 {
        anyhow::bail!(
            "sieve.count_floor must be at least 2, got {}",
            config.sieve.count_floor
        );
    }
    if config.sieve.max_limit < DEFAULT_COUNT_FLOOR {
        anyhow::bail!(
            "sieve.max_limit must be at least {}, got {}",
            DEFAULT_COUNT_FLOOR,
            config.sieve.max_limit
        );
    }
    if let Some(fmt) = &config.runtime.log_format {
        if fmt != "json" && fmt != "text" {
            anyhow::bail!("Unknown runtime.log_format '{}'. Valid formats: text, json", fmt);
        }
    }
    Ok(())
}

impl Config {
    /// Error out if `limit` exceeds the configured `max_limit`.
    pub fn check_limit(&self, limit: u64) -> Result<()> {
        if limit > self.sieve.max_limit {
            anyhow::bail!(
                "sieve limit {} exceeds max_limit {} (raise [sieve].max_limit to allow it)",
                limit,
                self.sieve.max_limit
            );
        }
        Ok(())
    }
}
