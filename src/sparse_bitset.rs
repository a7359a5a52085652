//! A sorted set of 64-bit indices backed by a sparse, paged bitmap.

use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::hash::{BuildHasher, Hash, Hasher};
use std::iter;
use std::ops::{Bound, RangeBounds};

use itertools::{EitherOrBoth, Itertools};
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::page::Page;

/// Default number of 64-bit words per page (1024 bits).
pub const WORDS_PER_PAGE: usize = 16;

/// Largest storable index.
pub const MAX_INDEX: u64 = i64::MAX as u64;

/// Exclusive upper sentinel for open-ended ranges.
pub const END: u64 = MAX_INDEX + 1;

/// Largest cardinality `size()` can report.
pub const MAX_SIZE: u64 = i32::MAX as u64;

pub type DefaultSparseBitSet = SparseBitSet<WORDS_PER_PAGE>;

pub(crate) fn check_index(name: &'static str, index: u64) -> Result<()> {
    if index > MAX_INDEX {
        return Err(Error::invalid_arg(
            name,
            format!("{index} is outside [0, {MAX_INDEX}]"),
        ));
    }
    Ok(())
}

pub(crate) fn narrow_size(count: u64) -> Result<u32> {
    if count > MAX_SIZE {
        return Err(Error::illegal_state(format!(
            "cardinality {count} does not fit in size(); use bit_count()"
        )));
    }
    Ok(count as u32)
}

pub(crate) fn hash_code_of(members: impl Iterator<Item = u64>) -> i32 {
    members.fold(0i32, |acc, v| acc.wrapping_add((v ^ (v >> 32)) as i32))
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct PageEntry<const N: usize> {
    major: u64,
    page: Page<N>,
}

impl<const N: usize> PageEntry<N> {
    fn base(&self) -> u64 {
        self.major * Page::<N>::BITS
    }
}

/// Sorted set of indices in `[0, MAX_INDEX]`.
///
/// Indices are split into pages of `N` words; only pages holding at least one
/// member are stored, ordered by page number. Every change of membership bumps
/// a modification counter which [`SharedBitSet`](crate::SharedBitSet) cursors
/// use to detect concurrent modification.
///
/// `N` must be at least 1; a zero-word page is rejected at compile time:
///
/// ```compile_fail
/// let _ = sparsebits::SparseBitSet::<0>::new();
/// ```
#[derive(Clone)]
pub struct SparseBitSet<const N: usize = WORDS_PER_PAGE> {
    pages: Vec<PageEntry<N>>,
    mod_count: u64,
}

impl<const N: usize> Default for SparseBitSet<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> SparseBitSet<N> {
    /// Bits per page.
    pub const PAGE_BITS: u64 = Page::<N>::BITS;

    const NON_EMPTY_PAGE: () = assert!(N > 0, "a page needs at least one word");

    pub fn new() -> Self {
        let () = Self::NON_EMPTY_PAGE;
        SparseBitSet {
            pages: Vec::new(),
            mod_count: 0,
        }
    }

    /// Create an empty set with room for `pages` pages before reallocating.
    pub fn with_capacity(pages: usize) -> Self {
        let () = Self::NON_EMPTY_PAGE;
        SparseBitSet {
            pages: Vec::with_capacity(pages),
            mod_count: 0,
        }
    }

    /// Build a set from `indices`; duplicates collapse.
    pub fn from_indices(indices: &[u64]) -> Result<Self> {
        Self::try_from_iter(indices.iter().copied())
    }

    pub fn try_from_iter<I: IntoIterator<Item = u64>>(indices: I) -> Result<Self> {
        let mut set = Self::new();
        set.try_extend(indices)?;
        Ok(set)
    }

    /// Set every index yielded by `indices`, stopping at the first invalid one.
    pub fn try_extend<I: IntoIterator<Item = u64>>(&mut self, indices: I) -> Result<()> {
        for index in indices {
            self.set(index)?;
        }
        Ok(())
    }

    #[inline]
    fn locate(index: u64) -> (u64, u64) {
        (index / Self::PAGE_BITS, index % Self::PAGE_BITS)
    }

    fn page_position(&self, major: u64) -> std::result::Result<usize, usize> {
        self.pages.binary_search_by_key(&major, |e| e.major)
    }

    pub(crate) fn mod_count(&self) -> u64 {
        self.mod_count
    }

    fn bump(&mut self) {
        self.mod_count = self.mod_count.wrapping_add(1);
    }

    pub fn get(&self, index: u64) -> Result<bool> {
        check_index("index", index)?;
        let (major, offset) = Self::locate(index);
        Ok(self
            .page_position(major)
            .is_ok_and(|pos| self.pages[pos].page.contains(offset)))
    }

    pub fn contains(&self, index: u64) -> Result<bool> {
        self.get(index)
    }

    /// Set `index`, returning whether it was previously unset.
    pub fn set(&mut self, index: u64) -> Result<bool> {
        self.set_to(index, true)
    }

    pub fn add(&mut self, index: u64) -> Result<bool> {
        self.set_to(index, true)
    }

    /// Clear `index`, returning whether it was previously set.
    pub fn clear(&mut self, index: u64) -> Result<bool> {
        self.set_to(index, false)
    }

    pub fn remove(&mut self, index: u64) -> Result<bool> {
        self.set_to(index, false)
    }

    /// Store `value` at `index`. Returns whether the stored value changed.
    pub fn set_to(&mut self, index: u64, value: bool) -> Result<bool> {
        check_index("index", index)?;
        let (major, offset) = Self::locate(index);
        let changed = match (self.page_position(major), value) {
            (Ok(pos), true) => self.pages[pos].page.insert(offset),
            (Err(pos), true) => {
                trace!(page = major, "allocating page");
                let mut page = Page::new();
                page.insert(offset);
                self.pages.insert(pos, PageEntry { major, page });
                true
            }
            (Ok(pos), false) => {
                let removed = self.pages[pos].page.remove(offset);
                if self.pages[pos].page.is_empty() {
                    trace!(page = major, "releasing empty page");
                    self.pages.remove(pos);
                }
                removed
            }
            (Err(_), false) => false,
        };
        if changed {
            self.bump();
        }
        Ok(changed)
    }

    /// Drop every page.
    pub fn clear_all(&mut self) {
        debug!(pages = self.pages.len(), "clearing sparse bitset");
        self.pages.clear();
        self.bump();
    }

    /// Number of set bits, summed over live pages.
    pub fn bit_count(&self) -> u64 {
        self.pages.iter().map(|e| e.page.len() as u64).sum()
    }

    /// `bit_count()` narrowed to the `i32` range; fails beyond it.
    pub fn size(&self) -> Result<u32> {
        narrow_size(self.bit_count())
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Number of allocated pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn first(&self) -> Result<u64> {
        self.pages
            .first()
            .and_then(|e| e.page.first().map(|o| e.base() + o))
            .ok_or_else(|| Error::not_found("first() of an empty set"))
    }

    pub fn last(&self) -> Result<u64> {
        self.pages
            .last()
            .and_then(|e| e.page.last().map(|o| e.base() + o))
            .ok_or_else(|| Error::not_found("last() of an empty set"))
    }

    /// First set index ≥ `from`; any `from` is accepted.
    pub(crate) fn next_set_from(&self, from: u64) -> Option<u64> {
        let (major, offset) = Self::locate(from);
        let mut pos = self.pages.partition_point(|e| e.major < major);
        if let Some(e) = self.pages.get(pos) {
            if e.major == major {
                if let Some(o) = e.page.next_set_ge(offset) {
                    return Some(e.base() + o);
                }
                pos += 1;
            }
        }
        self.pages
            .get(pos)
            .and_then(|e| e.page.first().map(|o| e.base() + o))
    }

    /// Last set index ≤ `from`; any `from` is accepted.
    pub(crate) fn prev_set_from(&self, from: u64) -> Option<u64> {
        let (major, offset) = Self::locate(from);
        let mut pos = self.pages.partition_point(|e| e.major <= major);
        if pos == 0 {
            return None;
        }
        let e = &self.pages[pos - 1];
        if e.major == major {
            if let Some(o) = e.page.prev_set_le(offset) {
                return Some(e.base() + o);
            }
            pos -= 1;
            if pos == 0 {
                return None;
            }
        }
        let e = &self.pages[pos - 1];
        e.page.last().map(|o| e.base() + o)
    }

    /// First set index ≥ `from`.
    pub fn next_set_bit(&self, from: u64) -> Result<Option<u64>> {
        check_index("from", from)?;
        Ok(self.next_set_from(from))
    }

    /// Last set index ≤ `from`.
    pub fn prev_set_bit(&self, from: u64) -> Result<Option<u64>> {
        check_index("from", from)?;
        Ok(self.prev_set_from(from))
    }

    /// First unset index ≥ `from`, or `None` if every index up to `MAX_INDEX`
    /// is set.
    pub fn next_clear_bit(&self, from: u64) -> Result<Option<u64>> {
        check_index("from", from)?;
        let mut from = from;
        loop {
            let (major, offset) = Self::locate(from);
            let Ok(pos) = self.page_position(major) else {
                return Ok(Some(from));
            };
            let e = &self.pages[pos];
            if let Some(o) = e.page.next_clear_ge(offset) {
                return Ok(Some(e.base() + o).filter(|&i| i <= MAX_INDEX));
            }
            from = (major + 1) * Self::PAGE_BITS;
            if from > MAX_INDEX {
                return Ok(None);
            }
        }
    }

    /// The `n`th smallest member.
    pub fn nth(&self, n: u64) -> Option<u64> {
        let mut n = n;
        for e in &self.pages {
            let len = e.page.len() as u64;
            if n < len {
                return e.page.nth(n as u32).map(|o| e.base() + o);
            }
            n -= len;
        }
        None
    }

    /// Members in ascending order; `.rev()` walks them descending.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = u64> + '_ {
        self.pages.iter().flat_map(|e| {
            let base = e.base();
            e.page.iter().map(move |o| base + o)
        })
    }

    pub fn descending_iter(&self) -> impl Iterator<Item = u64> + '_ {
        self.iter().rev()
    }

    /// Members inside `range`, ascending. Stops as soon as the upper bound is
    /// passed.
    pub fn range<R: RangeBounds<u64>>(&self, range: R) -> impl Iterator<Item = u64> + '_ {
        let start = match range.start_bound() {
            Bound::Included(&s) => Some(s),
            Bound::Excluded(&s) => s.checked_add(1),
            Bound::Unbounded => Some(0),
        };
        let end = match range.end_bound() {
            Bound::Included(&e) => e.checked_add(1),
            Bound::Excluded(&e) => Some(e),
            Bound::Unbounded => None,
        };
        let mut next = start;
        iter::from_fn(move || {
            let found = self.next_set_from(next?)?;
            if end.is_some_and(|e| found >= e) {
                next = None;
                return None;
            }
            next = found.checked_add(1);
            Some(found)
        })
    }

    /// Merge `other` into `self` page-wise, keeping non-empty results. Returns
    /// whether membership changed.
    fn merge_pages<F>(&mut self, other: &Self, op_name: &'static str, op: F) -> bool
    where
        F: FnMut(EitherOrBoth<PageEntry<N>, &PageEntry<N>>) -> Option<PageEntry<N>>,
    {
        let before = self.bit_count();
        let pages = std::mem::take(&mut self.pages);
        self.pages = pages
            .into_iter()
            .merge_join_by(other.pages.iter(), |a, b| a.major.cmp(&b.major))
            .filter_map(op)
            .filter(|e| !e.page.is_empty())
            .collect();
        let after = self.bit_count();
        debug!(op = op_name, before, after, "bulk page operation");
        let changed = before != after;
        if changed {
            self.bump();
        }
        changed
    }

    /// In-place union: `self |= other`.
    pub fn union_with(&mut self, other: &Self) -> bool {
        self.merge_pages(other, "union", |pair| match pair {
            EitherOrBoth::Left(a) => Some(a),
            EitherOrBoth::Right(b) => Some(b.clone()),
            EitherOrBoth::Both(mut a, b) => {
                a.page.union(&b.page);
                Some(a)
            }
        })
    }

    /// In-place intersection: `self &= other`.
    pub fn intersect_with(&mut self, other: &Self) -> bool {
        self.merge_pages(other, "intersect", |pair| match pair {
            EitherOrBoth::Both(mut a, b) => {
                a.page.intersect(&b.page);
                Some(a)
            }
            EitherOrBoth::Left(_) | EitherOrBoth::Right(_) => None,
        })
    }

    /// In-place difference: `self &= !other`.
    pub fn difference_with(&mut self, other: &Self) -> bool {
        self.merge_pages(other, "difference", |pair| match pair {
            EitherOrBoth::Left(a) => Some(a),
            EitherOrBoth::Both(mut a, b) => {
                a.page.subtract(&b.page);
                Some(a)
            }
            EitherOrBoth::Right(_) => None,
        })
    }

    /// Sum of the member hash codes under the generic set contract, where a
    /// 64-bit value hashes to `(v ^ (v >> 32)) as i32`.
    pub fn hash_code(&self) -> i32 {
        hash_code_of(self.iter())
    }
}

impl<const N: usize> PartialEq for SparseBitSet<N> {
    fn eq(&self, other: &Self) -> bool {
        // Empty pages are never stored, so the page lists are canonical.
        self.pages == other.pages
    }
}

impl<const N: usize> Eq for SparseBitSet<N> {}

impl<const N: usize> PartialEq<BTreeSet<u64>> for SparseBitSet<N> {
    fn eq(&self, other: &BTreeSet<u64>) -> bool {
        self.bit_count() == other.len() as u64 && self.iter().eq(other.iter().copied())
    }
}

impl<const N: usize, S: BuildHasher> PartialEq<HashSet<u64, S>> for SparseBitSet<N> {
    fn eq(&self, other: &HashSet<u64, S>) -> bool {
        self.bit_count() == other.len() as u64 && self.iter().all(|i| other.contains(&i))
    }
}

impl<const N: usize> Hash for SparseBitSet<N> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.bit_count() as usize);
        for index in self.iter() {
            index.hash(state);
        }
    }
}

impl<const N: usize> fmt::Display for SparseBitSet<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.iter().format(", "))
    }
}

impl<const N: usize> fmt::Debug for SparseBitSet<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
