//! # CLI Execution Functions
//!
//! Extracted from `main.rs` to keep the entry point slim. Each subcommand
//! sizes a sieve (checked against `[sieve].max_limit` before allocating),
//! answers its queries, and writes report records to stdout.

use anyhow::{bail, Result};
use eratos::config::Config;
use eratos::patterns;
use eratos::report::{
    self, ConstellationRecord, CountRecord, DivisorRecord, FactorRecord, Factorization,
    NthRecord, PolynomialRecord, PrimalityRecord, PrimesRecord, SquareFreeRecord, SumRecord,
};
use eratos::sieve::{self, Sieve};
use rayon::prelude::*;
use serde::Serialize;
use std::fmt::Display;
use std::time::Instant;
use tracing::{info, warn};

use super::Commands;

// ── Dispatch ────────────────────────────────────────────────────

/// Run one subcommand to completion.
pub fn run(command: &Commands, config: &Config) -> Result<()> {
    let start = Instant::now();
    match command {
        Commands::Primes { limit } => {
            let sieve = build(config, *limit)?;
            let record = PrimesRecord {
                limit: *limit,
                count: sieve.prime_count(),
                primes: sieve.primes().collect(),
            };
            emit(config, &[record])?;
        }
        Commands::Count { limit } => {
            let sieve = build(config, *limit)?;
            let record = CountRecord {
                limit: *limit,
                count: sieve.prime_count(),
            };
            emit(config, &[record])?;
        }
        Commands::Nth { n } => {
            let sieve = build(config, sieve::limit_for_count(*n, config.sieve.count_floor))?;
            let prime = sieve.nth_prime(*n);
            let record = NthRecord {
                n: *n,
                prime: (prime != 0).then_some(prime),
                limit: sieve.limit(),
            };
            emit(config, &[record])?;
        }
        Commands::Sum { count } => {
            let sieve = build(config, sieve::limit_for_count(*count, config.sieve.count_floor))?;
            let sum = sieve.sum_first(*count);
            let record = SumRecord {
                count: *count,
                sum: (sum != 0 || *count == 0).then_some(sum),
            };
            emit(config, &[record])?;
        }
        Commands::IsPrime { values, limit } => {
            let sieve = match limit {
                Some(limit) => build(config, *limit)?,
                None => build_for_values(config, values)?,
            };
            let records = query_all(values, |value| PrimalityRecord {
                value,
                primality: sieve.primality(value),
            });
            emit(config, &records)?;
        }
        Commands::Factor { values, unique } => {
            let sieve = build_for_values(config, values)?;
            let records = query_all(values, |value| FactorRecord {
                value,
                factors: if *unique {
                    Factorization::Unique(sieve.factor_unique(value))
                } else {
                    Factorization::Flat(sieve.factor(value))
                },
            });
            emit(config, &records)?;
        }
        Commands::Divisors { values } => {
            let sieve = build_for_values(config, values)?;
            let records = query_all(values, |value| DivisorRecord {
                value,
                divisors: sieve.divisor_count(value),
            });
            emit(config, &records)?;
        }
        Commands::SquareFree { values } => {
            let sieve = build_for_values(config, values)?;
            let records = query_all(values, |value| SquareFreeRecord {
                value,
                square_free: sieve.is_square_free(value),
            });
            emit(config, &records)?;
        }
        Commands::Twins { limit } => {
            let record = run_constellation(config, patterns::TWINS, *limit)?;
            emit(config, &[record])?;
        }
        Commands::Constellation { limit, offsets } => {
            let record = run_constellation(config, offsets, *limit)?;
            emit(config, &[record])?;
        }
        Commands::Polynomial { upper } => {
            if *upper > patterns::POLYNOMIAL_MAX_UPPER {
                bail!(
                    "polynomial upper {} exceeds {} (2n^2-1 would overflow u64)",
                    upper,
                    patterns::POLYNOMIAL_MAX_UPPER
                );
            }
            config.check_limit(patterns::polynomial_sieve_limit(*upper))?;
            let record = PolynomialRecord {
                upper: *upper,
                count: patterns::count_polynomial_primes(*upper),
            };
            emit(config, &[record])?;
        }
    }
    info!(elapsed_ms = start.elapsed().as_millis() as u64, "done");
    Ok(())
}

// ── Helpers ─────────────────────────────────────────────────────

/// Build a sieve to `limit` after checking it against the configured maximum.
fn build(config: &Config, limit: u64) -> Result<Sieve> {
    config.check_limit(limit)?;
    info!(limit, "building sieve");
    Ok(Sieve::new(limit))
}

/// Build the smallest sieve (plus margin) that can factor every value.
fn build_for_values(config: &Config, values: &[u64]) -> Result<Sieve> {
    let largest = values.iter().copied().max().unwrap_or(0);
    build(
        config,
        sieve::limit_for_factoring(largest, config.sieve.factor_margin),
    )
}

/// Answer `query` for every value in parallel, keeping input order.
fn query_all<R, F>(values: &[u64], query: F) -> Vec<R>
where
    R: Send,
    F: Fn(u64) -> R + Sync,
{
    values.par_iter().map(|&v| query(v)).collect()
}

fn run_constellation(config: &Config, offsets: &[u64], upto: u64) -> Result<ConstellationRecord> {
    if !offsets.contains(&0) {
        warn!(?offsets, "offsets do not include 0; p itself is not required to be prime");
    }
    let reach = offsets.iter().copied().max().unwrap_or(0);
    let sieve = build(config, upto.saturating_add(reach))?;
    Ok(ConstellationRecord {
        offsets: offsets.to_vec(),
        upto,
        count: patterns::count_constellation(&sieve, offsets, upto),
    })
}

fn emit<R: Serialize + Display>(config: &Config, records: &[R]) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    report::write_records(&mut out, records, config.output.format)
}

// ── Rayon Configuration ─────────────────────────────────────────

/// Configure the global rayon pool. `None` or 0 keeps rayon's default of one
/// thread per logical core.
pub fn configure_rayon(threads: Option<usize>) {
    let num_threads = threads.unwrap_or(0);
    if num_threads > 0 {
        if let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
        {
            warn!(error = %e, "Could not configure rayon thread pool");
        }
    }
}
