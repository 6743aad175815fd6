//! Ordered maps and sets with stable bidirectional cursors.
//!
//! [OrdMap] and [OrdSet] keep their keys sorted by a comparator, which is the
//! `Ord` order by default. Every entry has a position named by a [Cursor],
//! which is a `Copy` handle that stays valid until that entry is removed, no
//! matter what else is inserted or removed in the meantime. Positions are kept
//! in a sequence in key order, so stepping a cursor with
//! [next](OrdBase::next) or [prev](OrdBase::prev) is `O(1)`, while lookups go
//! through a rank-balanced tree in `O(log n)`.
//!
//! ```
//! use cursor_tree::OrdMap;
//!
//! let mut map = OrdMap::new();
//! for (i, word) in ["delta", "alpha", "charlie", "bravo"].into_iter().enumerate() {
//!     map.insert((word, i));
//! }
//! let mut c = map.find(&"bravo");
//! // removing other entries does not affect `c`
//! map.erase_key(&"alpha");
//! map.erase_key(&"charlie");
//! assert_eq!(map.get_at(c), Some((&"bravo", &3)));
//! c = map.next(c);
//! assert_eq!(map.key_at(c), Some(&"delta"));
//! c = map.next(c);
//! assert!(c.is_end());
//! ```

// all structure is index based, there is no need for unsafe code
#![deny(unsafe_code)]

mod arena;
mod base;
pub mod compare;
mod cursor;
mod error;
pub mod iterators;
mod map;
mod ptr;
mod seq;
mod set;
mod tree;
mod unique;

pub use base::OrdBase;
pub use crate::compare::{natural, Compare, LessThan, Natural};
pub use cursor::Cursor;
pub use error::Error;
pub use map::OrdMap;
pub use set::OrdSet;
