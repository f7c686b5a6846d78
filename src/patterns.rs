//! # Patterns — Prime Constellations and Polynomial Primes
//!
//! Read-only counting queries layered on a built [`Sieve`]:
//!
//! - **Constellations**: odd `p` such that `p + o` is prime for every offset
//!   `o` in a pattern. Twin primes are `[0, 2]`; the admissible prime triples
//!   are `[0, 2, 6]` and `[0, 4, 6]`. `[0, 2, 4]` always contains a multiple of
//!   3, so `(3, 5, 7)` is its only instance.
//! - **Polynomial primes**: how many of `2n² - 1` for `2 <= n <= upper` are
//!   prime (Project Euler 216). The sieve only needs to reach `√2 · upper`,
//!   since every candidate is `< (√2 · upper)²`.
//!
//! Candidates are split across the rayon pool. The sieve is immutable once
//! built, so workers share it by reference.
//!
//! ## References
//!
//! - Thomas R. Nicely, prime constellation counts: <http://www.trnicely.net>
//! - OEIS A007508 (twin prime pairs below 10^n).

use rayon::prelude::*;
use tracing::debug;

use crate::sieve::Sieve;

/// √2 to double precision.
pub const SQRT_2: f64 = std::f64::consts::SQRT_2;

/// Offsets of twin primes `(p, p + 2)`.
pub const TWINS: &[u64] = &[0, 2];

/// Offsets of the `(p, p + 2, p + 4)` triple.
pub const TRIPLE_024: &[u64] = &[0, 2, 4];

/// Offsets of the `(p, p + 2, p + 6)` triple.
pub const TRIPLE_026: &[u64] = &[0, 2, 6];

/// Offsets of the `(p, p + 4, p + 6)` triple.
pub const TRIPLE_046: &[u64] = &[0, 4, 6];

/// Count odd `p` in `[3, upto]` with `p + o` prime for every `o` in `offsets`.
///
/// Members past `sieve.limit()` are tested by trial division, so the result
/// is exact while `upto + max(offsets) <= limit²`. Build the sieve to
/// `upto + max(offsets)` to keep every lookup in the table. A member past
/// `u64::MAX` disqualifies its `p`.
pub fn count_constellation(sieve: &Sieve, offsets: &[u64], upto: u64) -> u64 {
    if upto < 3 {
        return 0;
    }
    let count = (1..=(upto - 1) / 2)
        .into_par_iter()
        .map(|i| 2 * i + 1)
        .filter(|&p| {
            offsets
                .iter()
                .all(|&o| p.checked_add(o).is_some_and(|v| sieve.is_prime(v)))
        })
        .count() as u64;

    debug!(?offsets, upto, count, "constellation counted");
    count
}

/// Number of twin prime pairs `(p, p + 2)` with `p <= upto`.
pub fn count_twins(sieve: &Sieve, upto: u64) -> u64 {
    count_constellation(sieve, TWINS, upto)
}

/// Largest `n` for which `2n² - 1` fits in a `u64` (`⌊√(u64::MAX / 2)⌋`).
pub const POLYNOMIAL_MAX_UPPER: u64 = 3_037_000_499;

/// `2n² - 1`, or `None` when `n == 0` or the value does not fit in a `u64`.
pub fn polynomial_candidate(n: u64) -> Option<u64> {
    n.checked_mul(n)?.checked_mul(2)?.checked_sub(1)
}

/// Smallest sieve limit able to decide `2n² - 1` for every `n <= upper`.
pub fn polynomial_sieve_limit(upper: u64) -> u64 {
    1 + (SQRT_2 * upper as f64) as u64
}

/// Count `n` in `[2, upper]` for which `2n² - 1` is prime.
///
/// Builds its own minimal sieve via [`polynomial_sieve_limit`]. `upper` is
/// capped at [`POLYNOMIAL_MAX_UPPER`].
pub fn count_polynomial_primes(upper: u64) -> u64 {
    if upper < 2 {
        return 0;
    }
    let upper = upper.min(POLYNOMIAL_MAX_UPPER);
    let sieve = Sieve::new(polynomial_sieve_limit(upper));
    let count = (2..=upper)
        .into_par_iter()
        .filter(|&n| polynomial_candidate(n).is_some_and(|v| sieve.is_prime(v)))
        .count() as u64;

    debug!(upper, limit = sieve.limit(), count, "polynomial primes counted");
    count
}
