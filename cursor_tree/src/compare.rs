//! Comparators for the containers of this crate.
//!
//! Ordering is defined by the [Compare] trait of the `compare` crate, which
//! `Fn(&K, &K) -> Ordering` closures already implement. [LessThan] adapts a
//! strict weak ordering predicate ("is `a` strictly before `b`") into a
//! comparator, with keys that are not less in either direction considered
//! equivalent.
//!
//! ```
//! use cursor_tree::{compare::LessThan, OrdSet};
//!
//! let mut set = OrdSet::with_cmp(LessThan(|a: &i32, b: &i32| a.abs() < b.abs()));
//! set.insert_range([-3, 1, 2, 3]);
//! // `3` is equivalent to `-3` and is rejected
//! assert_eq!(set.iter().copied().collect::<Vec<_>>(), vec![1, 2, -3]);
//! ```

use core::cmp::Ordering;

pub use ::compare::{natural, Compare, Natural};

/// Adapts a `less` predicate into a [Compare] implementation
#[derive(Debug, Clone, Copy, Default)]
pub struct LessThan<F>(pub F);

impl<K: ?Sized, F: Fn(&K, &K) -> bool> Compare<K> for LessThan<F> {
    fn compare(&self, l: &K, r: &K) -> Ordering {
        if (self.0)(l, r) {
            Ordering::Less
        } else if (self.0)(r, l) {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn less_than_adapter() {
        let cmp = LessThan(|a: &u8, b: &u8| a < b);
        assert_eq!(cmp.compare(&1, &2), Ordering::Less);
        assert_eq!(cmp.compare(&2, &1), Ordering::Greater);
        assert_eq!(cmp.compare(&2, &2), Ordering::Equal);
        let rev = LessThan(|a: &u8, b: &u8| a > b);
        assert!(rev.compares_lt(&3, &1));
        let len = LessThan(|a: &str, b: &str| a.len() < b.len());
        assert_eq!(len.compare("ab", "cd"), Ordering::Equal);
    }
}
