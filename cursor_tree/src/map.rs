use core::{
    fmt,
    ops::{Deref, DerefMut, Index},
};

use crate::{
    base::OrdBase,
    compare::{natural, Compare, LessThan, Natural},
    cursor::Cursor,
    iterators::{IntoIter, Iter},
    unique::Unique,
    Error,
};

/// An ordered map with unique keys and stable cursors.
///
/// Entries are kept sorted by the comparator `C`, which defaults to the `Ord`
/// implementation of `K`. Lookups are `O(log n)`, cursor steps are `O(1)`, and
/// a [Cursor] to an entry stays valid until that entry is removed. The shared
/// surface for lookups, bounds, cursors, erasure, and iteration is on
/// [OrdBase], which `OrdMap` dereferences to.
///
/// ```
/// use cursor_tree::OrdMap;
///
/// let mut map = OrdMap::new();
/// map.insert_or_assign("a", 1);
/// let (c, inserted) = map.insert_or_assign("a", 2);
/// assert!(!inserted);
/// assert_eq!(map.get(&"a"), Ok(&2));
/// assert_eq!(map.value_at(c), Some(&2));
/// assert_eq!(map.len(), 1);
///
/// map.insert(("c", 3));
/// // `emplace` does not overwrite
/// let (c, inserted) = map.emplace("c", 30);
/// assert!(!inserted);
/// assert_eq!(map.get_at(c), Some((&"c", &3)));
///
/// // cursors survive unrelated removal
/// map.insert(("b", 2));
/// assert_eq!(map.extract(&"b"), Ok(("b", 2)));
/// assert_eq!(map.prev(c), map.find(&"a"));
/// assert!(map.extract(&"b").is_err());
/// ```
pub struct OrdMap<K, V, C = Natural<K>> {
    u: Unique<K, V, C>,
}

impl<K: Ord, V> OrdMap<K, V> {
    /// Creates an empty map ordered by `Ord`
    pub fn new() -> Self {
        Self::with_cmp(natural())
    }

    /// Creates an empty map ordered by `Ord` with room for `capacity` entries
    pub fn with_capacity(capacity: usize) -> Self {
        let mut res = Self::new();
        res.reserve(capacity);
        res
    }
}

impl<K, V, F: Fn(&K, &K) -> bool> OrdMap<K, V, LessThan<F>> {
    /// Creates an empty map ordered by the strict weak ordering `less`, which
    /// returns if its first argument is strictly before its second
    pub fn with_less(less: F) -> Self {
        Self::with_cmp(LessThan(less))
    }
}

impl<K, V, C> OrdMap<K, V, C> {
    /// Creates an empty map ordered by `cmp`
    pub fn with_cmp(cmp: C) -> Self {
        Self {
            u: Unique::with_cmp(cmp),
        }
    }

    /// Removes the entry at `c`, returning the cursor that followed it and
    /// the entry. Extracting the end cursor or a cursor that is not live
    /// returns the end cursor and `None`.
    pub fn extract_at(&mut self, c: Cursor) -> (Cursor, Option<(K, V)>) {
        self.u.extract_at(c)
    }
}

impl<K, V, C: Compare<K>> OrdMap<K, V, C> {
    /// Inserts `k` and `v` if no equivalent key is present. Returns a cursor
    /// to the entry with the key and if the insertion happened. On collision
    /// the map is unchanged and `k` and `v` are dropped.
    pub fn emplace(&mut self, k: K, v: V) -> (Cursor, bool) {
        self.u.emplace(k, v)
    }

    /// The same as [OrdMap::emplace], except the search for the insertion
    /// point starts at `hint`. Results are the same for any `hint`, but an
    /// accurate hint (such as the cursor where the previous insertion of a
    /// sorted run landed) avoids a search from the root.
    pub fn emplace_hint(&mut self, hint: Cursor, k: K, v: V) -> (Cursor, bool) {
        self.u.emplace_hint(hint, k, v)
    }

    /// Inserts `entry` if no equivalent key is present, see
    /// [OrdMap::emplace]
    pub fn insert(&mut self, entry: (K, V)) -> (Cursor, bool) {
        self.u.emplace(entry.0, entry.1)
    }

    /// Inserts `entry` if no equivalent key is present and returns the cursor
    /// to the entry with the key, see [OrdMap::emplace_hint]
    pub fn insert_with_hint(&mut self, hint: Cursor, entry: (K, V)) -> Cursor {
        self.u.emplace_hint(hint, entry.0, entry.1).0
    }

    /// Inserts every entry of `entries` whose key is not yet present. Runs of
    /// sorted entries are inserted without searching from the root.
    pub fn insert_range<I: IntoIterator<Item = (K, V)>>(&mut self, entries: I) {
        let mut hint = self.end();
        for (k, v) in entries {
            hint = self.u.emplace_hint(hint, k, v).0;
        }
    }

    /// Inserts `k` and `v`, or overwrites the value of the entry with an
    /// equivalent key. The existing key is kept in that case. Returns the
    /// cursor to the entry and if a new entry was inserted.
    pub fn insert_or_assign(&mut self, k: K, v: V) -> (Cursor, bool) {
        self.u.insert_or_assign(k, v)
    }

    /// [OrdMap::insert_or_assign] with a search starting at `hint`
    pub fn insert_or_assign_with_hint(&mut self, hint: Cursor, k: K, v: V) -> Cursor {
        self.u.insert_or_assign_with_hint(hint, k, v)
    }

    /// Sets the value of `k` to `v`, inserting if needed. This is the same as
    /// [OrdMap::insert_or_assign] returning only the cursor.
    pub fn set(&mut self, k: K, v: V) -> Cursor {
        self.u.insert_or_assign(k, v).0
    }

    /// Returns the value of the key equivalent to `k`
    ///
    /// # Errors
    ///
    /// [Error::NotFound] if the key is absent
    pub fn get(&self, k: &K) -> Result<&V, Error> {
        self.u.get(k)
    }

    /// Returns the value of the key equivalent to `k` mutably
    ///
    /// # Errors
    ///
    /// [Error::NotFound] if the key is absent
    pub fn get_mut(&mut self, k: &K) -> Result<&mut V, Error> {
        self.u.get_mut(k)
    }

    /// Removes and returns the entry with the key equivalent to `k`
    ///
    /// # Errors
    ///
    /// [Error::NotFound] if the key is absent
    pub fn extract(&mut self, k: &K) -> Result<(K, V), Error> {
        self.u.extract(k)
    }

    /// Moves every entry of `source` whose key is absent in `self` into
    /// `self`. Entries whose keys collide are left in `source`.
    ///
    /// ```
    /// use cursor_tree::OrdMap;
    ///
    /// let mut a: OrdMap<u8, char> = [(1, 'a'), (3, 'a')].into_iter().collect();
    /// let mut b: OrdMap<u8, char> = [(2, 'b'), (3, 'b')].into_iter().collect();
    /// a.merge(&mut b);
    /// assert_eq!(a.iter().collect::<Vec<_>>(), [(&1, &'a'), (&2, &'b'), (&3, &'a')]);
    /// assert_eq!(b.iter().collect::<Vec<_>>(), [(&3, &'b')]);
    /// ```
    pub fn merge(&mut self, source: &mut Self) {
        self.u.merge(&mut source.u)
    }
}

impl<K, V, C> Deref for OrdMap<K, V, C> {
    type Target = OrdBase<K, V, C>;

    fn deref(&self) -> &Self::Target {
        &self.u.base
    }
}

impl<K, V, C> DerefMut for OrdMap<K, V, C> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.u.base
    }
}

impl<K, V, C: Compare<K>> Index<&K> for OrdMap<K, V, C> {
    type Output = V;

    /// Returns the value of the key equivalent to `k`
    ///
    /// # Panics
    ///
    /// If the key is absent
    fn index(&self, k: &K) -> &V {
        match self.u.get(k) {
            Ok(v) => v,
            Err(e) => panic!("{e}"),
        }
    }
}

impl<K: Clone, V: Clone, C: Clone> Clone for OrdMap<K, V, C> {
    fn clone(&self) -> Self {
        Self { u: self.u.clone() }
    }
}

impl<K: Ord, V> Default for OrdMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for OrdMap<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.u.base, f)
    }
}

impl<K: PartialEq, V: PartialEq, C> PartialEq for OrdMap<K, V, C> {
    fn eq(&self, other: &Self) -> bool {
        self.u.base == other.u.base
    }
}

impl<K: Eq, V: Eq, C> Eq for OrdMap<K, V, C> {}

impl<K: Ord, V> FromIterator<(K, V)> for OrdMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut res = Self::new();
        res.insert_range(iter);
        res
    }
}

impl<K, V, C: Compare<K>> Extend<(K, V)> for OrdMap<K, V, C> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.insert_range(iter)
    }
}

impl<K, V, C> IntoIterator for OrdMap<K, V, C> {
    type IntoIter = IntoIter<K, V>;
    type Item = (K, V);

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            seq: self.u.base.tree.seq,
        }
    }
}

impl<'a, K, V, C> IntoIterator for &'a OrdMap<K, V, C> {
    type IntoIter = Iter<'a, K, V>;
    type Item = (&'a K, &'a V);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_and_set() {
        let mut m = OrdMap::new();
        m.set(2u8, "two");
        m.set(1, "one");
        m.set(2, "deux");
        assert_eq!(m[&2], "deux");
        assert_eq!(m.len(), 2);
        *m.get_mut(&1).unwrap() = "un";
        assert_eq!(m.values().copied().collect::<Vec<_>>(), ["un", "deux"]);
        assert_eq!(m.get(&3), Err(Error::NotFound { op: "get" }));
        OrdBase::_check_invariants(&*m).unwrap();
    }

    #[test]
    #[should_panic]
    fn index_missing() {
        let m: OrdMap<u8, u8> = OrdMap::new();
        let _ = m[&0];
    }

    #[test]
    fn extract_at_end_is_noop() {
        let mut m: OrdMap<u8, u8> = (0..4).map(|i| (i, i)).collect();
        let end = m.end();
        assert_eq!(m.extract_at(end), (end, None));
        let c = m.find(&1);
        let (next, entry) = m.extract_at(c);
        assert_eq!(entry, Some((1, 1)));
        assert_eq!(m.key_at(next), Some(&2));
        // stale now
        assert_eq!(m.extract_at(c), (end, None));
        assert_eq!(m.len(), 3);
    }

    #[test]
    fn clone_is_independent() {
        let mut a: OrdMap<u8, u8> = (0..4).map(|i| (i, i)).collect();
        let b = a.clone();
        assert_eq!(a, b);
        let c = a.find(&2);
        assert!(!b.contains_cursor(c));
        a.erase(c);
        assert_ne!(a, b);
        assert_eq!(format!("{b:?}"), "{0: 0, 1: 1, 2: 2, 3: 3}");
    }
}
