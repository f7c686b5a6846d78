//! # eratos — Bit-Packed Sieve of Eratosthenes
//!
//! A single immutable prime table answering primality, counting, enumeration,
//! factorization, divisor-count and square-free queries.
//!
//! ```
//! use eratos::sieve::Sieve;
//!
//! let sieve = Sieve::new(100);
//! assert_eq!(sieve.prime_count(), 25);
//! assert!(sieve.is_prime(9973)); // beyond the table, decided by trial division
//! assert_eq!(sieve.factor(360), vec![2, 2, 2, 3, 3, 5]);
//! ```

pub mod bits;
pub mod config;
pub mod factor;
pub mod patterns;
pub mod report;
pub mod sieve;

pub use factor::PrimePower;
pub use sieve::{Primality, Sieve};
