//! # Factor — Sieve-Backed Trial Division
//!
//! Factorization queries for any `n <= limit²` of a [`Sieve`]. Factors of 2
//! are stripped by shifting; odd trial divisors are drawn only from the
//! sieve's own primes and stop once `d² > n`. Whatever cofactor survives the
//! loop is prime, since every smaller factor has already been divided out.
//!
//! Out-of-range inputs return empty/zero/false sentinels rather than errors;
//! callers check [`Sieve::can_factor`] when they need to tell the cases apart.
//! Degenerate inputs follow one convention throughout: `n <= 3` factors as
//! `[n]`.

use serde::Serialize;
use std::fmt;

use crate::sieve::Sieve;

/// One distinct prime factor and its multiplicity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PrimePower {
    pub prime: u64,
    pub exponent: u32,
}

impl fmt::Display for PrimePower {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.exponent == 1 {
            write!(f, "{}", self.prime)
        } else {
            write!(f, "{}^{}", self.prime, self.exponent)
        }
    }
}

impl Sieve {
    /// Walk the prime factorization of `n` (assumed `4 <= n <= limit²`),
    /// calling `emit(prime, exponent)` once per distinct prime in ascending
    /// order.
    fn for_each_prime_power(&self, mut n: u64, mut emit: impl FnMut(u64, u32)) {
        let twos = n.trailing_zeros();
        if twos > 0 {
            n >>= twos;
            emit(2, twos);
        }

        let mut d = 3u64;
        while d <= self.limit() && d <= n / d {
            if self.odd_is_prime(d) && n.is_multiple_of(d) {
                let mut exponent = 0u32;
                while n.is_multiple_of(d) {
                    n /= d;
                    exponent += 1;
                }
                emit(d, exponent);
            }
            d += 2;
        }

        if n > 1 {
            emit(n, 1);
        }
    }

    /// Prime factors of `n` with multiplicity, ascending: `factor(12) == [2, 2, 3]`.
    ///
    /// Empty when `n > limit²`.
    pub fn factor(&self, n: u64) -> Vec<u64> {
        if !self.can_factor(n) {
            return Vec::new();
        }
        if n <= 3 {
            return vec![n];
        }
        let mut factors = Vec::with_capacity(64);
        self.for_each_prime_power(n, |p, k| {
            factors.extend(std::iter::repeat_n(p, k as usize));
        });
        factors
    }

    /// Distinct prime factors of `n` with multiplicities, ascending.
    ///
    /// Same range and degenerate-input rules as [`Sieve::factor`].
    pub fn factor_unique(&self, n: u64) -> Vec<PrimePower> {
        if !self.can_factor(n) {
            return Vec::new();
        }
        if n <= 3 {
            return vec![PrimePower {
                prime: n,
                exponent: 1,
            }];
        }
        let mut powers = Vec::new();
        self.for_each_prime_power(n, |prime, exponent| {
            powers.push(PrimePower { prime, exponent });
        });
        powers
    }

    /// Number of positive divisors of `n`: `divisor_count(6) == 4`.
    ///
    /// 0 when `n > limit²` or `n == 0`.
    pub fn divisor_count(&self, n: u64) -> u64 {
        match n {
            0 => 0,
            1 => 1,
            _ if !self.can_factor(n) => 0,
            _ => self
                .factor_unique(n)
                .iter()
                .map(|pp| pp.exponent as u64 + 1)
                .product(),
        }
    }

    /// True when no prime divides `n` more than once (OEIS A005117).
    ///
    /// False when `n > limit²`, and for 0 (divisible by every square).
    pub fn is_square_free(&self, n: u64) -> bool {
        if n == 0 || !self.can_factor(n) {
            return false;
        }
        self.factor(n).windows(2).all(|w| w[0] != w[1])
    }

    /// Compact factorization string: `factor_string(360) == "2^3 3^2 5"`.
    ///
    /// Empty when `n > limit²`.
    pub fn factor_string(&self, n: u64) -> String {
        self.factor_unique(n)
            .iter()
            .map(|pp| pp.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
