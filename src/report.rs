//! # Report — CLI Result Records
//!
//! One serializable record per answered query. Text mode prints each record's
//! `Display` form on its own line; JSON mode prints one `serde_json` object per
//! line so output can be piped into `jq` or loaded as JSON Lines.

use anyhow::Result;
use serde::Serialize;
use std::fmt;
use std::io::Write;

use crate::config::OutputFormat;
use crate::factor::PrimePower;
use crate::sieve::Primality;

/// Write `records` to `out` in the requested format.
pub fn write_records<W, R>(out: &mut W, records: &[R], format: OutputFormat) -> Result<()>
where
    W: Write,
    R: Serialize + fmt::Display,
{
    for record in records {
        match format {
            OutputFormat::Text => writeln!(out, "{}", record)?,
            OutputFormat::Json => writeln!(out, "{}", serde_json::to_string(record)?)?,
        }
    }
    out.flush()?;
    Ok(())
}

/// Every prime up to a limit.
#[derive(Debug, Serialize)]
pub struct PrimesRecord {
    pub limit: u64,
    pub count: u64,
    pub primes: Vec<u64>,
}

impl fmt::Display for PrimesRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sep = "";
        for p in &self.primes {
            write!(f, "{}{}", sep, p)?;
            sep = " ";
        }
        Ok(())
    }
}

/// π(limit).
#[derive(Debug, Serialize)]
pub struct CountRecord {
    pub limit: u64,
    pub count: u64,
}

impl fmt::Display for CountRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pi({}) = {}", self.limit, self.count)
    }
}

/// The `n`th prime; `None` when the sieve ran out of range.
#[derive(Debug, Serialize)]
pub struct NthRecord {
    pub n: u64,
    pub prime: Option<u64>,
    pub limit: u64,
}

impl fmt::Display for NthRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.prime {
            Some(p) => write!(f, "prime({}) = {}", self.n, p),
            None => write!(f, "prime({}) not found below {}", self.n, self.limit),
        }
    }
}

/// Sum of the first `count` primes; `None` when the sieve ran out of range.
#[derive(Debug, Serialize)]
pub struct SumRecord {
    pub count: u64,
    pub sum: Option<u64>,
}

impl fmt::Display for SumRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.sum {
            Some(s) => write!(f, "sum of first {} primes = {}", self.count, s),
            None => write!(f, "sum of first {} primes: insufficient range", self.count),
        }
    }
}

/// Primality verdict for one value.
#[derive(Debug, Serialize)]
pub struct PrimalityRecord {
    pub value: u64,
    pub primality: Primality,
}

impl fmt::Display for PrimalityRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.value, self.primality)
    }
}

/// Factorization of one value, flat or collapsed into prime powers.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Factorization {
    Flat(Vec<u64>),
    Unique(Vec<PrimePower>),
}

#[derive(Debug, Serialize)]
pub struct FactorRecord {
    pub value: u64,
    pub factors: Factorization,
}

impl fmt::Display for FactorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.value)?;
        match &self.factors {
            Factorization::Flat(fs) => {
                for p in fs {
                    write!(f, " {}", p)?;
                }
            }
            Factorization::Unique(pps) => {
                for pp in pps {
                    write!(f, " {}", pp)?;
                }
            }
        }
        Ok(())
    }
}

/// Divisor count of one value (0 when out of range).
#[derive(Debug, Serialize)]
pub struct DivisorRecord {
    pub value: u64,
    pub divisors: u64,
}

impl fmt::Display for DivisorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.value, self.divisors)
    }
}

#[derive(Debug, Serialize)]
pub struct SquareFreeRecord {
    pub value: u64,
    pub square_free: bool,
}

impl fmt::Display for SquareFreeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.value, self.square_free)
    }
}

/// Count of a prime constellation up to `upto`.
#[derive(Debug, Serialize)]
pub struct ConstellationRecord {
    pub offsets: Vec<u64>,
    pub upto: u64,
    pub count: u64,
}

impl fmt::Display for ConstellationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let offsets: Vec<String> = self.offsets.iter().map(|o| o.to_string()).collect();
        write!(f, "[{}] <= {}: {}", offsets.join(","), self.upto, self.count)
    }
}

/// Count of primes `2n² - 1` for `n` in `[2, upper]`.
#[derive(Debug, Serialize)]
pub struct PolynomialRecord {
    pub upper: u64,
    pub count: u64,
}

impl fmt::Display for PolynomialRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "2n^2-1 primes for n in [2, {}]: {}", self.upper, self.count)
    }
}
