//! # Bits — Odd-Only Packed Bit Table
//!
//! Storage layer behind [`crate::sieve::Sieve`]. Only odd candidates are
//! represented: odd `k` lives at bit position `k >> 1`, so the table needs
//! `limit / 16` bytes instead of the `limit` bytes of a `Vec<bool>`.
//!
//! Bit layout: position `i` is stored in word `i / 64`, bit `i % 64`.
//! A set bit (1) means the odd number is **composite**; a clear bit (0) means
//! it is prime (or, before sieving finishes, not yet struck). The position of
//! `1` (bit 0) and positions past the sieve limit are never set, which lets
//! survivor counts come straight from hardware `POPCNT`.

const WORD_BITS: usize = 64;

/// Packed bit array indexed by odd numbers.
#[derive(Clone, Debug)]
pub struct OddBitTable {
    words: Vec<u64>,
}

impl OddBitTable {
    /// Allocate a cleared table with room for every odd number `<= limit`.
    ///
    /// Always holds at least one word, so a degenerate limit of 0 or 1 still
    /// yields a valid (empty) table.
    pub fn with_limit(limit: u64) -> Self {
        let positions = (limit >> 1) as usize + 1;
        let num_words = positions.div_ceil(WORD_BITS);
        OddBitTable {
            words: vec![0u64; num_words],
        }
    }

    /// Number of backing `u64` words.
    #[inline]
    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// Returns `true` if odd `k` has been marked composite.
    #[inline]
    pub fn is_composite(&self, k: u64) -> bool {
        debug_assert!(k & 1 == 1, "OddBitTable only stores odd numbers, got {}", k);
        let pos = (k >> 1) as usize;
        self.words[pos / WORD_BITS] & (1u64 << (pos % WORD_BITS)) != 0
    }

    /// Mark odd `k` as composite.
    #[inline]
    pub fn mark_composite(&mut self, k: u64) {
        debug_assert!(k & 1 == 1, "OddBitTable only stores odd numbers, got {}", k);
        let pos = (k >> 1) as usize;
        self.words[pos / WORD_BITS] |= 1u64 << (pos % WORD_BITS);
    }

    /// Count of odd numbers marked composite, via `count_ones()`.
    pub fn composite_count(&self) -> u64 {
        self.words.iter().map(|w| w.count_ones() as u64).sum()
    }

    /// Iterate over the odd numbers in `[3, limit]` whose bit is clear, ascending.
    ///
    /// Walks the complement of each word and skips straight to clear bits, so
    /// a dense run of composites costs one word read.
    pub fn iter_clear(&self, limit: u64) -> impl Iterator<Item = u64> + '_ {
        self.words
            .iter()
            .enumerate()
            .flat_map(|(wi, &word)| ClearBits {
                word: !word,
                base: (wi * WORD_BITS) as u64,
            })
            .map(|pos| 2 * pos + 1)
            .skip_while(|&k| k < 3)
            .take_while(move |&k| k <= limit)
    }
}

/// Iterator over clear bit positions within a single (inverted) word.
struct ClearBits {
    word: u64,
    base: u64,
}

impl Iterator for ClearBits {
    type Item = u64;

    #[inline]
    fn next(&mut self) -> Option<u64> {
        if self.word == 0 {
            return None;
        }
        let tz = self.word.trailing_zeros() as u64;
        self.word &= self.word - 1; // clear lowest set bit
        Some(self.base + tz)
    }
}
