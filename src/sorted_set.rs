use std::fmt;

use crate::cursor::Cursor;
use crate::error::{Error, Result};
use crate::shared::SharedBitSet;
use crate::sparse_bitset::{check_index, hash_code_of, narrow_size, END, MAX_INDEX};
use crate::subset::SubSet;

/// Half-open index range `[from, to)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Span {
    pub from: u64,
    pub to: u64,
}

impl Span {
    /// Every storable index.
    pub const FULL: Span = Span { from: 0, to: END };

    pub fn contains(&self, index: u64) -> bool {
        self.from <= index && index < self.to
    }

    pub fn is_empty(&self) -> bool {
        self.from >= self.to
    }

    /// The sub-range `[from, to)`, which must lie inside `self`.
    pub fn narrow(&self, from: u64, to: u64) -> Result<Span> {
        if from > MAX_INDEX {
            return Err(Error::invalid_arg(
                "from",
                format!("{from} is outside [0, {MAX_INDEX}]"),
            ));
        }
        if to > END {
            return Err(Error::invalid_arg("to", format!("{to} is beyond {END}")));
        }
        if from > to {
            return Err(Error::invalid_arg("from", format!("{from} > to ({to})")));
        }
        if from < self.from || to > self.to {
            return Err(Error::invalid_arg(
                "range",
                format!("[{from}, {to}) is not within {self}"),
            ));
        }
        Ok(Span { from, to })
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.from, self.to)
    }
}

/// The read/write contract shared by a [`SharedBitSet`] and every range view
/// derived from it.
///
/// Implementors only name their backing set and their range; everything else
/// filters the backing set at call time.
pub trait SortedSetT {
    fn backing(&self) -> &SharedBitSet;

    fn span(&self) -> Span;

    fn contains(&self, index: u64) -> Result<bool> {
        check_index("index", index)?;
        if !self.span().contains(index) {
            return Ok(false);
        }
        self.backing().get(index)
    }

    /// Insert `index`, which must lie inside `span()`.
    fn add(&self, index: u64) -> Result<bool> {
        check_index("index", index)?;
        let span = self.span();
        if !span.contains(index) {
            return Err(Error::invalid_arg(
                "index",
                format!("{index} is outside the view range {span}"),
            ));
        }
        self.backing().set(index)
    }

    /// Remove `index`. Out-of-range indices are simply not members.
    fn remove(&self, index: u64) -> Result<bool> {
        check_index("index", index)?;
        if !self.span().contains(index) {
            return Ok(false);
        }
        self.backing().clear(index)
    }

    /// Number of members in range, counted by walking them.
    fn len(&self) -> u64 {
        let span = self.span();
        self.backing().borrow().range(span.from..span.to).count() as u64
    }

    fn size(&self) -> Result<u32> {
        narrow_size(self.len())
    }

    fn is_empty(&self) -> bool {
        let span = self.span();
        self.backing()
            .borrow()
            .range(span.from..span.to)
            .next()
            .is_none()
    }

    fn first(&self) -> Result<u64> {
        let span = self.span();
        self.backing()
            .borrow()
            .next_set_from(span.from)
            .filter(|&i| i < span.to)
            .ok_or_else(|| Error::not_found("first() of an empty view"))
    }

    fn last(&self) -> Result<u64> {
        let span = self.span();
        if span.is_empty() {
            return Err(Error::not_found("last() of an empty view"));
        }
        self.backing()
            .borrow()
            .prev_set_from(span.to - 1)
            .filter(|&i| i >= span.from)
            .ok_or_else(|| Error::not_found("last() of an empty view"))
    }

    fn iter(&self) -> Cursor {
        Cursor::ascending(self.backing().clone(), self.span())
    }

    fn descending_iter(&self) -> Cursor {
        Cursor::descending(self.backing().clone(), self.span())
    }

    /// Remove every member in range, one at a time through a cursor.
    fn clear_all(&self) -> Result<()> {
        let mut cursor = self.iter();
        while let Some(index) = cursor.next() {
            index?;
            cursor.remove()?;
        }
        Ok(())
    }

    fn sub_set(&self, from: u64, to: u64) -> Result<SubSet> {
        let span = self.span().narrow(from, to)?;
        Ok(SubSet::new(self.backing().clone(), span))
    }

    fn head_set(&self, to: u64) -> Result<SubSet> {
        self.sub_set(self.span().from, to)
    }

    fn tail_set(&self, from: u64) -> Result<SubSet> {
        self.sub_set(from, self.span().to)
    }

    /// Members in range, ascending.
    fn to_vec(&self) -> Vec<u64> {
        let span = self.span();
        self.backing().borrow().range(span.from..span.to).collect()
    }

    /// Sum of the member hash codes, matching
    /// [`SparseBitSet::hash_code`](crate::SparseBitSet::hash_code) for equal
    /// member sets.
    fn hash_code(&self) -> i32 {
        let span = self.span();
        hash_code_of(self.backing().borrow().range(span.from..span.to))
    }
}
