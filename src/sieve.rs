//! # Sieve — Odd-Only Sieve of Eratosthenes
//!
//! A fixed-range prime table built once and queried many times. Only odd
//! candidates are stored (see [`crate::bits`]); 2 is special-cased in every
//! query.
//!
//! ## Algorithm
//!
//! For each odd `i` with `i*i <= limit` that is still unmarked, strike the odd
//! multiples `3i, 5i, 7i, ...` (step `2i`). Even multiples are never
//! represented, and the outer loop stops at `√limit` because every composite
//! `<= limit` has a prime factor no larger than that.
//! Complexity: O(n log log n) time, O(n/16) bytes of space.
//!
//! ## Two-Tier Primality
//!
//! Values up to `limit` are a single bit lookup. Values in `(limit, limit²]`
//! fall back to trial division by the table's own primes, so one sieve answers
//! primality and factoring queries over a quadratically larger range than it
//! stores. Beyond `limit²` the sieve cannot decide; the boolean API answers
//! `false` and [`Sieve::primality`] answers [`Primality::Unknown`].
//!
//! ## Sizing Constructors
//!
//! - [`Sieve::with_prime_count`] sizes from the prime number theorem so the
//!   first `n` primes are resident.
//! - [`Sieve::for_factoring`] sizes to `⌈√n⌉ + 32` so every value `<= n` can be
//!   factored.

use std::fmt;
use std::sync::OnceLock;
use std::time::Instant;

use serde::Serialize;
use tracing::debug;

use crate::bits::OddBitTable;

/// Safety cushion added to `⌈√n⌉` by [`Sieve::for_factoring`].
pub const DEFAULT_FACTOR_MARGIN: u64 = 32;

/// Smallest limit produced by [`Sieve::with_prime_count`].
pub const DEFAULT_COUNT_FLOOR: u64 = 64;

/// Over-estimate factor for `n ln n` when sizing for the first `n` primes.
const COUNT_SCALE: f64 = 1.25506;

/// Outcome of a primality query that distinguishes "cannot tell" from "no".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Primality {
    Prime,
    Composite,
    /// The value lies beyond `limit²`; the sieve holds no witness either way.
    Unknown,
}

/// Prime table for all numbers `<= limit`.
pub struct Sieve {
    limit: u64,
    table: OddBitTable,
    count: OnceLock<u64>,
    #[cfg(test)]
    count_scans: std::sync::atomic::AtomicUsize,
}

impl Sieve {
    /// Build a sieve deciding primality for every number `<= limit`.
    pub fn new(limit: u64) -> Self {
        let start = Instant::now();
        let mut table = OddBitTable::with_limit(limit);

        let mut i = 3u64;
        while i * i <= limit {
            if !table.is_composite(i) {
                let step = 2 * i;
                let mut j = 3 * i;
                while j <= limit {
                    table.mark_composite(j);
                    j += step;
                }
            }
            i += 2;
        }

        debug!(
            limit,
            words = table.word_count(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "sieve built"
        );

        Sieve {
            limit,
            table,
            count: OnceLock::new(),
            #[cfg(test)]
            count_scans: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    /// Build a sieve large enough to hold the first `n` primes.
    pub fn with_prime_count(n: u64) -> Self {
        Self::with_prime_count_floor(n, DEFAULT_COUNT_FLOOR)
    }

    /// Like [`Sieve::with_prime_count`], with an explicit minimum limit.
    pub fn with_prime_count_floor(n: u64, floor: u64) -> Self {
        Self::new(limit_for_count(n, floor))
    }

    /// Build a sieve able to test and factor every value `<= n`.
    pub fn for_factoring(n: u64) -> Self {
        Self::for_factoring_with_margin(n, DEFAULT_FACTOR_MARGIN)
    }

    /// Like [`Sieve::for_factoring`], with an explicit cushion above `⌈√n⌉`.
    pub fn for_factoring_with_margin(n: u64, margin: u64) -> Self {
        Self::new(limit_for_factoring(n, margin))
    }

    /// Largest number whose primality is read directly from the table.
    ///
    /// Factor-family queries accept values up to `limit()²`.
    #[inline]
    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Whether `n` is inside the factoring domain `[0, limit²]`.
    #[inline]
    pub fn can_factor(&self, n: u64) -> bool {
        (n as u128) <= (self.limit as u128) * (self.limit as u128)
    }

    /// Table lookup for an odd `k` in `[3, limit]`.
    #[inline]
    pub(crate) fn odd_is_prime(&self, k: u64) -> bool {
        !self.table.is_composite(k)
    }

    /// Primality test. Definitive for `n <= limit²`; `false` beyond that,
    /// which means "not proven prime", not "composite".
    pub fn is_prime(&self, n: u64) -> bool {
        self.primality(n) == Primality::Prime
    }

    /// Primality test that reports out-of-range values as [`Primality::Unknown`].
    pub fn primality(&self, n: u64) -> Primality {
        let verdict = |prime: bool| {
            if prime {
                Primality::Prime
            } else {
                Primality::Composite
            }
        };

        if n < 2 {
            return Primality::Composite;
        }
        if n == 2 {
            return Primality::Prime;
        }
        if n & 1 == 0 {
            return Primality::Composite;
        }
        if n <= self.limit {
            return verdict(self.odd_is_prime(n));
        }
        if !self.can_factor(n) {
            return Primality::Unknown;
        }

        let root = n.isqrt();
        if root * root == n {
            return Primality::Composite;
        }
        let mut d = 3u64;
        while d <= root {
            if self.odd_is_prime(d) && n.is_multiple_of(d) {
                return Primality::Composite;
            }
            d += 2;
        }
        Primality::Prime
    }

    /// Number of primes `<= limit`, computed once and memoized.
    pub fn prime_count(&self) -> u64 {
        *self.count.get_or_init(|| {
            #[cfg(test)]
            self.count_scans
                .fetch_add(1, std::sync::atomic::Ordering::Relaxed);

            if self.limit < 2 {
                return 0;
            }
            // 2 plus every odd candidate in [3, limit] that survived
            let odd_candidates = (self.limit - 1) / 2;
            1 + odd_candidates - self.table.composite_count()
        })
    }

    /// The `n`th prime (1-indexed), or 0 if the sieve holds fewer than `n`.
    /// `n = 1` is always 2, whatever the limit.
    pub fn nth_prime(&self, n: u64) -> u64 {
        match n {
            0 => 0,
            1 => 2,
            _ => self.primes().nth((n - 1) as usize).unwrap_or(0),
        }
    }

    /// All primes `<= limit` in ascending order.
    pub fn primes(&self) -> impl Iterator<Item = u64> + '_ {
        let two = (self.limit >= 2).then_some(2u64);
        two.into_iter().chain(self.table.iter_clear(self.limit))
    }

    /// Sum of the first `n` primes, or 0 if the sieve holds fewer than `n`
    /// or the sum does not fit in a `u64`.
    pub fn sum_first(&self, n: u64) -> u64 {
        sum_prefix(self.primes(), n)
    }

    /// Space-separated list of every prime `<= limit`.
    pub fn render_primes(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Sieve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sep = "";
        for p in self.primes() {
            write!(f, "{}{}", sep, p)?;
            sep = " ";
        }
        Ok(())
    }
}

impl fmt::Display for Primality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Primality::Prime => write!(f, "prime"),
            Primality::Composite => write!(f, "composite"),
            Primality::Unknown => write!(f, "unknown"),
        }
    }
}

impl fmt::Debug for Sieve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sieve")
            .field("limit", &self.limit)
            .field("words", &self.table.word_count())
            .field("count", &self.count.get())
            .finish()
    }
}

/// Sum of the first `n` items, or 0 if there are fewer than `n` or the sum overflows.
fn sum_prefix(items: impl Iterator<Item = u64>, n: u64) -> u64 {
    let mut taken = 0u64;
    let mut sum = 0u64;
    for p in items.take(n as usize) {
        let Some(next) = sum.checked_add(p) else {
            return 0;
        };
        sum = next;
        taken += 1;
    }
    if taken < n {
        return 0;
    }
    sum
}

/// Limit estimate from the prime number theorem: `1.25506 · n · ln n`.
pub fn limit_for_count(n: u64, floor: u64) -> u64 {
    let nf = n as f64;
    let estimate = if n > 1 { COUNT_SCALE * nf * nf.ln() } else { 0.0 };
    (estimate as u64).max(floor)
}

/// Smallest sieve limit (plus `margin`) whose square covers `n`.
pub fn limit_for_factoring(n: u64, margin: u64) -> u64 {
    let root = n.isqrt();
    let ceil_root = if root * root == n { root } else { root + 1 };
    ceil_root + margin
}

#[cfg(test)]
mod tests {
    //! # Sieve Tests
    //!
    //! - **Construction**: agreement with naive trial division for every
    //!   `n <= 2000`, degenerate limits 0/1/2, and the sizing constructors.
    //! - **Primality**: both tiers (table lookup and trial division up to
    //!   `limit²`), the perfect-square short circuit, and `Unknown` beyond.
    //! - **Counting**: π(x) reference values, nth prime, prime sums, and the
    //!   memoized count (second call must not rescan).
    //! - **Display**: the primes below 100 and the empty rendering.

    use super::*;
    use std::sync::atomic::Ordering;

    fn naive_is_prime(n: u64) -> bool {
        if n < 2 {
            return false;
        }
        let mut d = 2;
        while d * d <= n {
            if n % d == 0 {
                return false;
            }
            d += 1;
        }
        true
    }

    // ── Construction ───────────────────────────────────────────────

    #[test]
    fn table_matches_trial_division() {
        let s = Sieve::new(2000);
        for n in 0..=2000 {
            assert_eq!(s.is_prime(n), naive_is_prime(n), "is_prime({}) mismatch", n);
        }
    }

    #[test]
    fn degenerate_limits_hold_no_primes() {
        for limit in [0u64, 1] {
            let s = Sieve::new(limit);
            assert_eq!(s.prime_count(), 0);
            assert_eq!(s.render_primes(), "");
            assert_eq!(s.primes().count(), 0);
            assert_eq!(s.nth_prime(1), 2);
            assert_eq!(s.nth_prime(2), 0);
        }
        let s = Sieve::new(2);
        assert_eq!(s.prime_count(), 1);
        assert_eq!(s.render_primes(), "2");
    }

    #[test]
    fn with_prime_count_uses_floor_for_small_n() {
        assert_eq!(Sieve::with_prime_count(0).limit(), 64);
        assert_eq!(Sieve::with_prime_count(1).limit(), 64);
        assert_eq!(Sieve::with_prime_count(10).limit(), 64);
        assert_eq!(Sieve::with_prime_count_floor(10, 2).limit(), 28);
    }

    #[test]
    fn with_prime_count_holds_enough_primes() {
        for n in [1u64, 10, 25, 100, 1000, 5000, 10_000] {
            let s = Sieve::with_prime_count(n);
            assert!(
                s.prime_count() >= n,
                "with_prime_count({}) has only {} primes",
                n,
                s.prime_count()
            );
        }
    }

    #[test]
    fn for_factoring_sizes_from_square_root() {
        assert_eq!(limit_for_factoring(100, 32), 42);
        assert_eq!(limit_for_factoring(101, 32), 43);
        assert_eq!(limit_for_factoring(0, 32), 32);
        let s = Sieve::for_factoring(1_000_000);
        assert_eq!(s.limit(), 1032);
        assert!(s.can_factor(1_000_000));
    }

    // ── Primality ──────────────────────────────────────────────────

    #[test]
    fn trial_division_tier_beyond_limit() {
        let s = Sieve::new(100);
        assert_eq!(s.primality(9973), Primality::Prime); // largest prime < 10^4
        assert_eq!(s.primality(9991), Primality::Composite); // 97 * 103
        assert_eq!(s.primality(10_000), Primality::Composite);
        assert_eq!(s.primality(101), Primality::Prime);
    }

    #[test]
    fn perfect_square_short_circuit() {
        let s = Sieve::new(100);
        assert_eq!(s.primality(97 * 97), Primality::Composite);
        assert_eq!(s.primality(101 * 101), Primality::Unknown);
    }

    #[test]
    fn beyond_square_is_unknown_and_not_prime() {
        let s = Sieve::new(10);
        assert_eq!(s.primality(101), Primality::Unknown);
        assert!(!s.is_prime(101));
        assert!(!s.can_factor(101));
        assert!(s.can_factor(100));
    }

    #[test]
    fn two_and_even_special_cases() {
        let s = Sieve::new(0);
        assert!(s.is_prime(2));
        assert!(!s.is_prime(4));
        assert!(!s.is_prime(0));
        assert!(!s.is_prime(1));
        assert_eq!(s.primality(u64::MAX - 1), Primality::Composite);
    }

    #[test]
    fn huge_values_do_not_overflow() {
        let s = Sieve::new(1000);
        assert_eq!(s.primality(u64::MAX), Primality::Unknown);
        assert!(!s.can_factor(u64::MAX));
    }

    // ── Counting ───────────────────────────────────────────────────

    #[test]
    fn prime_count_known_values() {
        // pi(x), OEIS A000720
        let cases = [(10u64, 4u64), (100, 25), (1000, 168), (10_000, 1229), (100_000, 9592)];
        for (limit, expected) in cases {
            assert_eq!(Sieve::new(limit).prime_count(), expected, "pi({})", limit);
        }
    }

    #[test]
    fn prime_count_memoized() {
        let s = Sieve::new(10_000);
        assert_eq!(s.prime_count(), 1229);
        assert_eq!(s.prime_count(), 1229);
        assert_eq!(s.count_scans.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn prime_count_agrees_with_iterator() {
        for limit in [2u64, 3, 4, 127, 128, 129, 130, 4097] {
            let s = Sieve::new(limit);
            assert_eq!(s.prime_count(), s.primes().count() as u64, "limit {}", limit);
        }
    }

    #[test]
    fn nth_prime_values() {
        let s = Sieve::new(1000);
        assert_eq!(s.nth_prime(0), 0);
        assert_eq!(s.nth_prime(1), 2);
        assert_eq!(s.nth_prime(2), 3);
        assert_eq!(s.nth_prime(10), 29);
        assert_eq!(s.nth_prime(100), 541);
        assert_eq!(s.nth_prime(168), 997);
        assert_eq!(s.nth_prime(169), 0);
    }

    #[test]
    fn sum_first_values() {
        let s = Sieve::new(29);
        assert_eq!(s.sum_first(10), 129);
        assert_eq!(s.sum_first(11), 0);
        assert_eq!(s.sum_first(0), 0);
        assert_eq!(s.sum_first(1), 2);
    }

    #[test]
    fn sum_prefix_overflow_is_zero() {
        assert_eq!(sum_prefix([u64::MAX - 2, 2].into_iter(), 2), u64::MAX);
        assert_eq!(sum_prefix([u64::MAX - 2, 3].into_iter(), 2), 0);
        assert_eq!(sum_prefix([u64::MAX, 3].into_iter(), 1), u64::MAX);
    }

    // ── Display ────────────────────────────────────────────────────

    #[test]
    fn render_primes_to_100() {
        assert_eq!(
            Sieve::new(100).render_primes(),
            "2 3 5 7 11 13 17 19 23 29 31 37 41 43 47 53 59 61 67 71 73 79 83 89 97"
        );
        assert_eq!(format!("{}", Sieve::new(10)), "2 3 5 7");
    }

    #[test]
    fn sieve_is_send_and_sync() {
        fn assert_sync<T: Send + Sync>() {}
        assert_sync::<Sieve>();
    }
}
