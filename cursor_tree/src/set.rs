use core::{
    fmt,
    ops::{Deref, DerefMut},
};

use crate::{
    base::OrdBase,
    compare::{natural, Compare, LessThan, Natural},
    cursor::Cursor,
    iterators::{IntoIter, Keys, SetIntoIter},
    unique::Unique,
    Error,
};

/// An ordered set with stable cursors. This is an [OrdMap](crate::OrdMap)
/// without values, and dereferences to [OrdBase] with `()` values.
///
/// ```
/// use cursor_tree::OrdSet;
///
/// let mut set = OrdSet::new();
/// for k in [5, 3, 8, 1, 4] {
///     set.insert(k);
/// }
/// assert_eq!(set.iter().copied().collect::<Vec<_>>(), [1, 3, 4, 5, 8]);
///
/// let c = set.find(&3);
/// set.erase(c);
/// assert_eq!(set.iter().copied().collect::<Vec<_>>(), [1, 4, 5, 8]);
/// assert_eq!(set.count(&3), 0);
///
/// assert_eq!(set.lower_bound(&4), set.find(&4));
/// assert_eq!(set.upper_bound(&4), set.find(&5));
/// assert!(set.upper_bound(&8).is_end());
/// ```
pub struct OrdSet<K, C = Natural<K>> {
    u: Unique<K, (), C>,
}

impl<K: Ord> OrdSet<K> {
    /// Creates an empty set ordered by `Ord`
    pub fn new() -> Self {
        Self::with_cmp(natural())
    }

    /// Creates an empty set ordered by `Ord` with room for `capacity` keys
    pub fn with_capacity(capacity: usize) -> Self {
        let mut res = Self::new();
        res.reserve(capacity);
        res
    }
}

impl<K, F: Fn(&K, &K) -> bool> OrdSet<K, LessThan<F>> {
    /// Creates an empty set ordered by the strict weak ordering `less`
    pub fn with_less(less: F) -> Self {
        Self::with_cmp(LessThan(less))
    }
}

impl<K, C> OrdSet<K, C> {
    /// Creates an empty set ordered by `cmp`
    pub fn with_cmp(cmp: C) -> Self {
        Self {
            u: Unique::with_cmp(cmp),
        }
    }

    /// Returns the key at `c`
    pub fn get_at(&self, c: Cursor) -> Option<&K> {
        self.u.base.key_at(c)
    }

    /// Returns the least key
    pub fn first(&self) -> Option<&K> {
        self.get_at(self.begin())
    }

    /// Returns the greatest key
    pub fn last(&self) -> Option<&K> {
        self.get_at(self.rbegin())
    }

    /// Iterates over the keys in order
    pub fn iter(&self) -> Keys<'_, K, ()> {
        self.u.base.keys()
    }

    /// Removes the key at `c`, returning the cursor that followed it and the
    /// key. Extracting the end cursor or a cursor that is not live returns the
    /// end cursor and `None`.
    pub fn extract_at(&mut self, c: Cursor) -> (Cursor, Option<K>) {
        let (next, entry) = self.u.extract_at(c);
        (next, entry.map(|(k, ())| k))
    }
}

impl<K, C: Compare<K>> OrdSet<K, C> {
    /// Inserts `k` if no equivalent key is present. Returns a cursor to the
    /// equivalent key and if the insertion happened.
    pub fn insert(&mut self, k: K) -> (Cursor, bool) {
        self.u.emplace(k, ())
    }

    /// Inserts `k` with the search for the insertion point starting at
    /// `hint`, and returns the cursor to the equivalent key
    pub fn insert_with_hint(&mut self, hint: Cursor, k: K) -> Cursor {
        self.u.emplace_hint(hint, k, ()).0
    }

    /// Inserts every key of `keys` that is not yet present
    pub fn insert_range<I: IntoIterator<Item = K>>(&mut self, keys: I) {
        let mut hint = self.end();
        for k in keys {
            hint = self.u.emplace_hint(hint, k, ()).0;
        }
    }

    /// The same as [OrdSet::insert]
    pub fn emplace(&mut self, k: K) -> (Cursor, bool) {
        self.u.emplace(k, ())
    }

    /// The same as [OrdSet::insert_with_hint], also returning if the
    /// insertion happened
    pub fn emplace_hint(&mut self, hint: Cursor, k: K) -> (Cursor, bool) {
        self.u.emplace_hint(hint, k, ())
    }

    /// Returns if a key equivalent to `k` is present
    pub fn contains(&self, k: &K) -> bool {
        self.u.base.contains_key(k)
    }

    /// Removes and returns the key equivalent to `k`
    ///
    /// # Errors
    ///
    /// [Error::NotFound] if the key is absent
    pub fn extract(&mut self, k: &K) -> Result<K, Error> {
        self.u.extract(k).map(|(k, ())| k)
    }

    /// Moves every key of `source` that is absent in `self` into `self`
    pub fn merge(&mut self, source: &mut Self) {
        self.u.merge(&mut source.u)
    }
}

impl<K, C> Deref for OrdSet<K, C> {
    type Target = OrdBase<K, (), C>;

    fn deref(&self) -> &Self::Target {
        &self.u.base
    }
}

impl<K, C> DerefMut for OrdSet<K, C> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.u.base
    }
}

impl<K: Clone, C: Clone> Clone for OrdSet<K, C> {
    fn clone(&self) -> Self {
        Self { u: self.u.clone() }
    }
}

impl<K: Ord> Default for OrdSet<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, C> fmt::Debug for OrdSet<K, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<K: PartialEq, C> PartialEq for OrdSet<K, C> {
    fn eq(&self, other: &Self) -> bool {
        self.u.base == other.u.base
    }
}

impl<K: Eq, C> Eq for OrdSet<K, C> {}

impl<K: Ord> FromIterator<K> for OrdSet<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut res = Self::new();
        res.insert_range(iter);
        res
    }
}

impl<K, C: Compare<K>> Extend<K> for OrdSet<K, C> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        self.insert_range(iter)
    }
}

impl<K, C> IntoIterator for OrdSet<K, C> {
    type IntoIter = SetIntoIter<K>;
    type Item = K;

    fn into_iter(self) -> Self::IntoIter {
        SetIntoIter {
            iter: IntoIter {
                seq: self.u.base.tree.seq,
            },
        }
    }
}

impl<'a, K, C> IntoIterator for &'a OrdSet<K, C> {
    type IntoIter = Keys<'a, K, ()>;
    type Item = &'a K;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reverse_walk() {
        let set: OrdSet<i32> = (0..10).rev().collect();
        let mut c = set.rbegin();
        let mut keys = vec![];
        while c != set.rend() {
            keys.push(*set.get_at(c).unwrap());
            c = set.prev(c);
        }
        assert_eq!(keys, (0..10).rev().collect::<Vec<_>>());
        assert_eq!(set.prev(set.end()), set.rbegin());
        assert!(set.prev(set.begin()).is_end());
        assert!(set.next(set.end()).is_end());
    }

    #[test]
    fn with_less_and_extract() {
        let mut set = OrdSet::with_less(|a: &u32, b: &u32| a > b);
        set.insert_range([1, 5, 3, 5]);
        assert_eq!(set.len(), 3);
        assert_eq!(set.first(), Some(&5));
        assert_eq!(set.last(), Some(&1));
        assert_eq!(set.extract(&3), Ok(3));
        assert_eq!(set.extract(&3), Err(Error::NotFound { op: "extract" }));
        assert_eq!(format!("{set:?}"), "{5, 1}");
        OrdBase::_check_invariants(&*set).unwrap();
    }

    #[test]
    fn erase_range_and_range() {
        let mut set: OrdSet<u8> = (0..10).collect();
        let first = set.find(&2);
        let last = set.find(&7);
        assert_eq!(set.range(first, last).count(), 5);
        assert_eq!(set.erase_range(first, last), last);
        assert_eq!(set.iter().copied().collect::<Vec<_>>(), [0, 1, 7, 8, 9]);
        assert_eq!(set.erase_key(&8), 1);
        assert_eq!(set.erase_key(&8), 0);
        assert_eq!(set.into_iter().rev().collect::<Vec<_>>(), [9, 7, 1, 0]);
    }
}
