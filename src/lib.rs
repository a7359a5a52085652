//! Sparse paged bitsets over 64-bit indices, with live range views and
//! fail-fast cursors.

pub mod cursor;
pub mod error;
mod page;
pub mod shared;
pub mod sorted_set;
pub mod sparse_bitset;
pub mod subset;

pub use cursor::Cursor;
pub use error::{Error, Result};
pub use page::WORD_BITS;
pub use shared::SharedBitSet;
pub use sorted_set::{SortedSetT, Span};
pub use sparse_bitset::{
    DefaultSparseBitSet, SparseBitSet, END, MAX_INDEX, MAX_SIZE, WORDS_PER_PAGE,
};
pub use subset::SubSet;
