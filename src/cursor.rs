use std::iter::FusedIterator;

use crate::error::{Error, Result};
use crate::shared::SharedBitSet;
use crate::sorted_set::Span;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Direction {
    Ascending,
    Descending,
}

/// Fail-fast cursor over the members of a [`SharedBitSet`] inside a [`Span`].
///
/// The cursor snapshots the set's modification count when created. Any change
/// of membership made by other means afterwards makes `has_next`, `remove`
/// and iteration fail with [`Error::ConcurrentModification`]; as an iterator
/// it yields that error once and then ends. Removing through the cursor
/// itself keeps it valid.
#[derive(Debug)]
pub struct Cursor {
    set: SharedBitSet,
    span: Span,
    direction: Direction,
    expected_mod_count: u64,
    // Where the next search starts: the lowest candidate when ascending, the
    // highest when descending. `None` once the span is exhausted.
    position: Option<u64>,
    last_returned: Option<u64>,
    failed: bool,
    ended: bool,
}

impl Cursor {
    pub(crate) fn ascending(set: SharedBitSet, span: Span) -> Self {
        let position = (!span.is_empty()).then_some(span.from);
        Self::create(set, span, Direction::Ascending, position)
    }

    pub(crate) fn descending(set: SharedBitSet, span: Span) -> Self {
        let position = (!span.is_empty()).then(|| span.to - 1);
        Self::create(set, span, Direction::Descending, position)
    }

    fn create(
        set: SharedBitSet,
        span: Span,
        direction: Direction,
        position: Option<u64>,
    ) -> Self {
        let expected_mod_count = set.mod_count();
        Cursor {
            set,
            span,
            direction,
            expected_mod_count,
            position,
            last_returned: None,
            failed: false,
            ended: false,
        }
    }

    fn check(&mut self) -> Result<()> {
        let actual = self.set.mod_count();
        if self.failed || actual != self.expected_mod_count {
            self.failed = true;
            return Err(Error::ConcurrentModification {
                expected: self.expected_mod_count,
                actual,
            });
        }
        Ok(())
    }

    fn peek(&self) -> Option<u64> {
        let position = self.position?;
        let set = self.set.borrow();
        match self.direction {
            Direction::Ascending => set.next_set_from(position).filter(|&i| i < self.span.to),
            Direction::Descending => set.prev_set_from(position).filter(|&i| i >= self.span.from),
        }
    }

    pub fn has_next(&mut self) -> Result<bool> {
        self.check()?;
        Ok(self.peek().is_some())
    }

    /// Remove the member most recently returned by `next`.
    pub fn remove(&mut self) -> Result<()> {
        self.check()?;
        let index = self.last_returned.take().ok_or_else(|| {
            Error::illegal_state("remove() without a preceding next(), or called twice")
        })?;
        self.set.clear(index)?;
        self.expected_mod_count = self.set.mod_count();
        Ok(())
    }

    pub fn span(&self) -> Span {
        self.span
    }
}

impl Iterator for Cursor {
    type Item = Result<u64>;

    fn next(&mut self) -> Option<Result<u64>> {
        if self.ended {
            return None;
        }
        if let Err(e) = self.check() {
            self.ended = true;
            return Some(Err(e));
        }
        let Some(found) = self.peek() else {
            self.position = None;
            self.ended = true;
            return None;
        };
        self.position = match self.direction {
            Direction::Ascending => Some(found + 1).filter(|&p| p < self.span.to),
            Direction::Descending => (found > self.span.from).then(|| found - 1),
        };
        self.last_returned = Some(found);
        Some(Ok(found))
    }
}

impl FusedIterator for Cursor {}
