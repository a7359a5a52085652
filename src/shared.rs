use std::cell::{Ref, RefCell, RefMut};
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::hash::BuildHasher;
use std::rc::Rc;

use crate::error::Result;
use crate::sorted_set::{SortedSetT, Span};
use crate::sparse_bitset::{DefaultSparseBitSet, SparseBitSet};
use crate::subset::SubSet;

/// A shared handle to a [`SparseBitSet`].
///
/// Cloning the handle shares the underlying set. Views derived through
/// [`SortedSetT`] and the cursors they hand out hold clones of this handle, so
/// every change made through one of them is visible through all the others.
#[derive(Clone, Default)]
pub struct SharedBitSet(Rc<RefCell<SparseBitSet>>);

impl SharedBitSet {
    pub fn new() -> Self {
        SharedBitSet(Rc::new(RefCell::new(SparseBitSet::new())))
    }

    pub fn with_capacity(pages: usize) -> Self {
        DefaultSparseBitSet::with_capacity(pages).into()
    }

    pub fn from_indices(indices: &[u64]) -> Result<Self> {
        Ok(DefaultSparseBitSet::from_indices(indices)?.into())
    }

    // Never held across a call that mutates; public reads go through
    // `snapshot()` or the query methods.
    pub(crate) fn borrow(&self) -> Ref<'_, SparseBitSet> {
        self.0.borrow()
    }

    pub(crate) fn borrow_mut(&self) -> RefMut<'_, SparseBitSet> {
        self.0.borrow_mut()
    }

    /// Whether both handles point at the same set.
    pub fn ptr_eq(&self, other: &SharedBitSet) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// A detached copy of the current contents.
    pub fn snapshot(&self) -> SparseBitSet {
        self.borrow().clone()
    }

    pub fn mod_count(&self) -> u64 {
        self.borrow().mod_count()
    }

    pub fn get(&self, index: u64) -> Result<bool> {
        self.borrow().get(index)
    }

    pub fn set(&self, index: u64) -> Result<bool> {
        self.borrow_mut().set(index)
    }

    pub fn set_to(&self, index: u64, value: bool) -> Result<bool> {
        self.borrow_mut().set_to(index, value)
    }

    pub fn clear(&self, index: u64) -> Result<bool> {
        self.borrow_mut().clear(index)
    }

    pub fn bit_count(&self) -> u64 {
        self.borrow().bit_count()
    }
}

impl From<SparseBitSet> for SharedBitSet {
    fn from(set: SparseBitSet) -> Self {
        SharedBitSet(Rc::new(RefCell::new(set)))
    }
}

impl SortedSetT for SharedBitSet {
    fn backing(&self) -> &SharedBitSet {
        self
    }

    fn span(&self) -> Span {
        Span::FULL
    }

    fn len(&self) -> u64 {
        self.bit_count()
    }

    fn is_empty(&self) -> bool {
        self.borrow().is_empty()
    }

    fn first(&self) -> Result<u64> {
        self.borrow().first()
    }

    fn last(&self) -> Result<u64> {
        self.borrow().last()
    }

    fn clear_all(&self) -> Result<()> {
        self.borrow_mut().clear_all();
        Ok(())
    }

    fn hash_code(&self) -> i32 {
        self.borrow().hash_code()
    }
}

impl PartialEq for SharedBitSet {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || *self.borrow() == *other.borrow()
    }
}

impl Eq for SharedBitSet {}

impl PartialEq<SparseBitSet> for SharedBitSet {
    fn eq(&self, other: &SparseBitSet) -> bool {
        *self.borrow() == *other
    }
}

impl PartialEq<BTreeSet<u64>> for SharedBitSet {
    fn eq(&self, other: &BTreeSet<u64>) -> bool {
        *self.borrow() == *other
    }
}

impl<S: BuildHasher> PartialEq<HashSet<u64, S>> for SharedBitSet {
    fn eq(&self, other: &HashSet<u64, S>) -> bool {
        *self.borrow() == *other
    }
}

impl PartialEq<SubSet> for SharedBitSet {
    fn eq(&self, other: &SubSet) -> bool {
        other == self
    }
}

impl fmt::Display for SharedBitSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.borrow(), f)
    }
}

impl fmt::Debug for SharedBitSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.borrow(), f)
    }
}
