//! A fixed-size page of bits, the unit of allocation inside a sparse bitset.

/// Width of a word in bits.
pub const WORD_BITS: u64 = u64::BITS as u64;

/// Iterates the set bits of a single word, low to high or high to low.
#[derive(Clone, Debug)]
struct WordBits(u64);

impl Iterator for WordBits {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        if self.0 == 0 {
            return None;
        }
        let bit = self.0.trailing_zeros() as u64;
        self.0 &= self.0 - 1;
        Some(bit)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.0.count_ones() as usize;
        (n, Some(n))
    }
}

impl DoubleEndedIterator for WordBits {
    fn next_back(&mut self) -> Option<u64> {
        if self.0 == 0 {
            return None;
        }
        let bit = (WORD_BITS - 1) - self.0.leading_zeros() as u64;
        self.0 &= !(1 << bit);
        Some(bit)
    }
}

/// `N` words of bits recording membership of offsets `[0, N * 64)`, with a
/// cached population count.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Page<const N: usize> {
    words: [u64; N],
    len: u32,
}

impl<const N: usize> Page<N> {
    /// Bits per page (N words × bits per word).
    pub(crate) const BITS: u64 = N as u64 * WORD_BITS;

    pub(crate) fn new() -> Self {
        Page {
            words: [0; N],
            len: 0,
        }
    }

    #[inline]
    fn locate(offset: u64) -> (usize, u64) {
        ((offset / WORD_BITS) as usize, offset % WORD_BITS)
    }

    #[inline]
    fn bit_index(word: usize, bit: u64) -> u64 {
        word as u64 * WORD_BITS + bit
    }

    pub(crate) fn len(&self) -> u32 {
        self.len
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn recompute_len(&mut self) {
        self.len = self.words.iter().map(|w| w.count_ones()).sum();
    }

    pub(crate) fn contains(&self, offset: u64) -> bool {
        let (w, b) = Self::locate(offset);
        (self.words[w] >> b) & 1 != 0
    }

    /// Returns `true` if the offset was not already set.
    pub(crate) fn insert(&mut self, offset: u64) -> bool {
        let (w, b) = Self::locate(offset);
        let mask = 1u64 << b;
        let is_new = self.words[w] & mask == 0;
        self.words[w] |= mask;
        self.len += is_new as u32;
        is_new
    }

    /// Returns `true` if the offset was set.
    pub(crate) fn remove(&mut self, offset: u64) -> bool {
        let (w, b) = Self::locate(offset);
        let mask = 1u64 << b;
        let was_set = self.words[w] & mask != 0;
        self.words[w] &= !mask;
        self.len -= was_set as u32;
        was_set
    }

    pub(crate) fn first(&self) -> Option<u64> {
        self.words
            .iter()
            .position(|&w| w != 0)
            .map(|wi| Self::bit_index(wi, self.words[wi].trailing_zeros() as u64))
    }

    pub(crate) fn last(&self) -> Option<u64> {
        self.words.iter().rposition(|&w| w != 0).map(|wi| {
            Self::bit_index(wi, (WORD_BITS - 1) - self.words[wi].leading_zeros() as u64)
        })
    }

    /// First set offset ≥ `offset`.
    pub(crate) fn next_set_ge(&self, offset: u64) -> Option<u64> {
        let (start_w, b) = Self::locate(offset);
        let masked = self.words[start_w] & (!0u64 << b);
        if masked != 0 {
            return Some(Self::bit_index(start_w, masked.trailing_zeros() as u64));
        }
        (start_w + 1..N)
            .find(|&wi| self.words[wi] != 0)
            .map(|wi| Self::bit_index(wi, self.words[wi].trailing_zeros() as u64))
    }

    /// Last set offset ≤ `offset`.
    pub(crate) fn prev_set_le(&self, offset: u64) -> Option<u64> {
        let (start_w, b) = Self::locate(offset);
        let masked = self.words[start_w] & (!0u64 >> (WORD_BITS - 1 - b));
        if masked != 0 {
            return Some(Self::bit_index(
                start_w,
                (WORD_BITS - 1) - masked.leading_zeros() as u64,
            ));
        }
        (0..start_w).rev().find(|&wi| self.words[wi] != 0).map(|wi| {
            Self::bit_index(wi, (WORD_BITS - 1) - self.words[wi].leading_zeros() as u64)
        })
    }

    /// First unset offset ≥ `offset`.
    pub(crate) fn next_clear_ge(&self, offset: u64) -> Option<u64> {
        let (start_w, b) = Self::locate(offset);
        let inv = !self.words[start_w] & (!0u64 << b);
        if inv != 0 {
            return Some(Self::bit_index(start_w, inv.trailing_zeros() as u64));
        }
        (start_w + 1..N)
            .find(|&wi| self.words[wi] != u64::MAX)
            .map(|wi| Self::bit_index(wi, (!self.words[wi]).trailing_zeros() as u64))
    }

    /// The `n`th smallest set offset.
    pub(crate) fn nth(&self, mut n: u32) -> Option<u64> {
        for (wi, &w) in self.words.iter().enumerate() {
            let ones = w.count_ones();
            if n < ones {
                return WordBits(w)
                    .nth(n as usize)
                    .map(|bit| Self::bit_index(wi, bit));
            }
            n -= ones;
        }
        None
    }

    pub(crate) fn iter(&self) -> impl DoubleEndedIterator<Item = u64> + '_ {
        self.words
            .iter()
            .enumerate()
            .filter(|(_, w)| **w != 0)
            .flat_map(|(wi, &w)| WordBits(w).map(move |bit| Self::bit_index(wi, bit)))
    }

    pub(crate) fn union(&mut self, other: &Self) {
        for (a, b) in self.words.iter_mut().zip(other.words.iter()) {
            *a |= *b;
        }
        self.recompute_len();
    }

    pub(crate) fn intersect(&mut self, other: &Self) {
        for (a, b) in self.words.iter_mut().zip(other.words.iter()) {
            *a &= *b;
        }
        self.recompute_len();
    }

    pub(crate) fn subtract(&mut self, other: &Self) {
        for (a, b) in self.words.iter_mut().zip(other.words.iter()) {
            *a &= !*b;
        }
        self.recompute_len();
    }
}
