use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::hash::BuildHasher;

use itertools::Itertools;

use crate::shared::SharedBitSet;
use crate::sorted_set::{SortedSetT, Span};

/// A live window `[from, to)` over a [`SharedBitSet`].
///
/// Head sets start at 0 and tail sets end at [`END`](crate::END). The view
/// holds no members of its own: reads filter the backing set, and writes go
/// straight through to it.
#[derive(Clone)]
pub struct SubSet {
    set: SharedBitSet,
    span: Span,
}

impl SubSet {
    pub(crate) fn new(set: SharedBitSet, span: Span) -> Self {
        SubSet { set, span }
    }
}

impl SortedSetT for SubSet {
    fn backing(&self) -> &SharedBitSet {
        &self.set
    }

    fn span(&self) -> Span {
        self.span
    }
}

impl PartialEq for SubSet {
    fn eq(&self, other: &Self) -> bool {
        self.to_vec() == other.to_vec()
    }
}

impl PartialEq<BTreeSet<u64>> for SubSet {
    fn eq(&self, other: &BTreeSet<u64>) -> bool {
        self.to_vec().into_iter().eq(other.iter().copied())
    }
}

impl<S: BuildHasher> PartialEq<HashSet<u64, S>> for SubSet {
    fn eq(&self, other: &HashSet<u64, S>) -> bool {
        let members = self.to_vec();
        members.len() == other.len() && members.iter().all(|i| other.contains(i))
    }
}

impl PartialEq<SharedBitSet> for SubSet {
    fn eq(&self, other: &SharedBitSet) -> bool {
        let span = self.span;
        let this = self.set.borrow();
        let other = other.borrow();
        this.range(span.from..span.to).eq(other.iter())
    }
}

impl fmt::Display for SubSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.to_vec().iter().format(", "))
    }
}

impl fmt::Debug for SubSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubSet")
            .field("span", &self.span)
            .field("members", &self.to_vec())
            .finish()
    }
}
