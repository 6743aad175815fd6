use core::fmt;

use crate::{
    compare::Compare,
    cursor::{Cursor, SourceId},
    iterators::{Iter, IterMut, Keys, Range, Values, ValuesMut},
    ptr::{PSeq, Ptr},
    tree::Tree,
    Error,
};

/// The shared surface of the ordered containers. [OrdMap](crate::OrdMap) and
/// [OrdSet](crate::OrdSet) dereference to this.
///
/// Keys are kept in the order given by the comparator `C`, and every entry
/// has a position that can be named by a [Cursor]. The positions form a
/// sequence in key order that is walked in `O(1)` per step, separately from
/// the balanced index used for `O(log n)` lookups.
///
/// Cursors are checked against the container they are used with. A cursor
/// from a different container or to a removed entry is never dereferenced,
/// getters return `None` and navigation returns [OrdBase::end].
pub struct OrdBase<K, V, C> {
    pub(crate) tree: Tree<K, V, C>,
    pub(crate) id: SourceId,
}

/// Unrestricted functions
impl<K, V, C> OrdBase<K, V, C> {
    /// Creates an empty container ordered by `cmp`
    pub fn with_cmp(cmp: C) -> Self {
        Self {
            tree: Tree::new(cmp),
            id: SourceId::new(),
        }
    }

    /// Returns the number of entries
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns if the container is empty
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Returns the number of entries that can be held without reallocating
    pub fn capacity(&self) -> usize {
        self.tree.capacity()
    }

    /// Reserves capacity for at least `additional` more entries
    pub fn reserve(&mut self, additional: usize) {
        self.tree.reserve(additional)
    }

    /// Removes all entries without deallocating. All cursors except for end
    /// cursors become stale.
    pub fn clear(&mut self) {
        self.tree.clear()
    }

    /// Removes all entries and deallocates
    pub fn clear_and_shrink(&mut self) {
        self.tree.clear_and_shrink()
    }

    /// Returns the comparator
    pub fn cmp(&self) -> &C {
        &self.tree.cmp
    }

    #[inline]
    pub(crate) fn cursor(&self, p: Option<PSeq>) -> Cursor {
        Cursor { p, source: self.id }
    }

    /// Returns the position of `c` if it is a live position of this container
    #[inline]
    pub(crate) fn resolve(&self, c: Cursor) -> Option<PSeq> {
        if c.source != self.id {
            return None
        }
        let p = c.p?;
        if self.tree.seq.contains(p) {
            Some(p)
        } else {
            None
        }
    }

    /// Returns a cursor to the entry with the least key, or the end cursor if
    /// the container is empty
    pub fn begin(&self) -> Cursor {
        self.cursor(self.tree.seq.first())
    }

    /// Returns the end cursor, which is one past the entry with the greatest
    /// key
    pub fn end(&self) -> Cursor {
        self.cursor(None)
    }

    /// Returns a cursor to the entry with the greatest key, or the end cursor
    /// if the container is empty
    pub fn rbegin(&self) -> Cursor {
        self.cursor(self.tree.seq.last())
    }

    /// Returns the end cursor. Reverse walks with [OrdBase::prev] from
    /// [OrdBase::rbegin] stop here after the least entry.
    pub fn rend(&self) -> Cursor {
        self.cursor(None)
    }

    /// Returns the entry with the least key
    pub fn first(&self) -> Option<(&K, &V)> {
        self.get_at(self.begin())
    }

    /// Returns the entry with the greatest key
    pub fn last(&self) -> Option<(&K, &V)> {
        self.get_at(self.rbegin())
    }

    /// Returns if `c` points to a live entry of this container
    pub fn contains_cursor(&self, c: Cursor) -> bool {
        self.resolve(c).is_some()
    }

    /// Returns the cursor following `c`. The end cursor follows the greatest
    /// entry and itself.
    pub fn next(&self, c: Cursor) -> Cursor {
        match self.resolve(c) {
            Some(p) => self.cursor(self.tree.seq.get_inx_unwrap(p.inx()).next()),
            None => self.end(),
        }
    }

    /// Returns the cursor preceding `c`. The end cursor precedes the least
    /// entry, and the greatest entry precedes the end cursor.
    pub fn prev(&self, c: Cursor) -> Cursor {
        if (c.source == self.id) && c.p.is_none() {
            return self.rbegin()
        }
        match self.resolve(c) {
            Some(p) => self.cursor(self.tree.seq.get_inx_unwrap(p.inx()).prev()),
            None => self.end(),
        }
    }

    /// Moves `c` by `n` positions, forwards if `n` is positive and backwards
    /// if negative. Stepping from the end cursor in either direction stays at
    /// the end cursor.
    ///
    /// ```
    /// use cursor_tree::OrdSet;
    ///
    /// let set: OrdSet<u8> = [1, 2, 3].into_iter().collect();
    /// let c = set.advance(set.begin(), 2);
    /// assert_eq!(set.get_at(c), Some(&3));
    /// assert_eq!(set.get_at(set.advance(c, -1)), Some(&2));
    /// assert!(set.advance(c, 5).is_end());
    /// assert!(set.advance(set.end(), -1).is_end());
    /// ```
    pub fn advance(&self, c: Cursor, n: isize) -> Cursor {
        let mut c = c;
        for _ in 0..n.unsigned_abs() {
            if self.resolve(c).is_none() {
                return self.end()
            }
            c = if n >= 0 { self.next(c) } else { self.prev(c) };
        }
        c
    }

    /// Returns the entry at `c`
    pub fn get_at(&self, c: Cursor) -> Option<(&K, &V)> {
        let link = self.tree.get_link(self.resolve(c)?)?;
        Some((&link.k, &link.v))
    }

    /// Returns the key at `c`
    pub fn key_at(&self, c: Cursor) -> Option<&K> {
        self.get_at(c).map(|(k, _)| k)
    }

    /// Returns the value at `c`
    pub fn value_at(&self, c: Cursor) -> Option<&V> {
        self.get_at(c).map(|(_, v)| v)
    }

    /// Returns a mutable reference to the value at `c`. Keys are never
    /// mutably accessible, that could break the ordering.
    pub fn value_at_mut(&mut self, c: Cursor) -> Option<&mut V> {
        let p = self.resolve(c)?;
        self.tree.seq.get_mut(p).map(|entry| &mut entry.v)
    }

    /// Removes the entry at `c` and returns the cursor that followed it. Other
    /// cursors are unaffected. If `c` is not a live position, nothing is
    /// removed and the end cursor is returned.
    pub fn erase(&mut self, c: Cursor) -> Cursor {
        let p = match self.resolve(c) {
            Some(p) => p,
            None => return self.end(),
        };
        match self.tree.remove(p) {
            Some(link) => self.cursor(link.next()),
            None => self.end(),
        }
    }

    /// Removes the entries from `first` up to but not including `last`, and
    /// returns `last`. Removal stops early at the end or at a position that is
    /// not live.
    pub fn erase_range(&mut self, first: Cursor, last: Cursor) -> Cursor {
        let mut c = first;
        while (c != last) && self.contains_cursor(c) {
            c = self.erase(c);
        }
        last
    }

    /// Iterates over all entries in key order
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.tree.seq)
    }

    /// Iterates over all entries in key order, with mutable access to values.
    ///
    /// Unlike [OrdBase::iter], this collects the entries up front, so every
    /// call allocates `O(len)` memory and takes `O(len log len)` time before
    /// the first item.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            iter: self.tree.seq.vals_mut_ordered().into_iter(),
        }
    }

    /// Iterates over all keys in order
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { iter: self.iter() }
    }

    /// Iterates over all values in key order
    pub fn values(&self) -> Values<'_, K, V> {
        Values { iter: self.iter() }
    }

    /// Iterates mutably over all values in key order
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut {
            iter: self.iter_mut(),
        }
    }

    /// Iterates over the entries from `first` up to but not including `last`.
    /// If `first` is not a live position the iterator is empty, and if `last`
    /// is never reached the iterator runs to the end.
    pub fn range(&self, first: Cursor, last: Cursor) -> Range<'_, K, V> {
        Range {
            seq: &self.tree.seq,
            front: self.resolve(first),
            last: self.resolve(last),
        }
    }
}

impl<K, V, C: Compare<K>> OrdBase<K, V, C> {
    /// Used by tests
    #[doc(hidden)]
    pub fn _check_invariants(this: &Self) -> Result<(), Error> {
        Tree::_check_invariants(&this.tree)
    }

    /// Returns a cursor to the entry with a key equivalent to `k`, or the end
    /// cursor if there is none
    pub fn find(&self, k: &K) -> Cursor {
        self.cursor(self.tree.find_key(k))
    }

    /// Returns if a key equivalent to `k` is present
    pub fn contains_key(&self, k: &K) -> bool {
        self.tree.find_key(k).is_some()
    }

    /// Returns the number of entries with a key equivalent to `k`, which for
    /// the unique-key containers is 0 or 1
    pub fn count(&self, k: &K) -> usize {
        usize::from(self.contains_key(k))
    }

    /// Returns a cursor to the first entry whose key does not order before
    /// `k`, or the end cursor
    pub fn lower_bound(&self, k: &K) -> Cursor {
        self.cursor(self.tree.lower_bound(k))
    }

    /// Returns a cursor to the first entry whose key orders after `k`, or the
    /// end cursor
    pub fn upper_bound(&self, k: &K) -> Cursor {
        self.cursor(self.tree.upper_bound(k))
    }

    /// Returns `(lower_bound(k), upper_bound(k))`, the range of entries with
    /// keys equivalent to `k`
    ///
    /// ```
    /// use cursor_tree::OrdSet;
    ///
    /// let set: OrdSet<u8> = [2, 4, 6].into_iter().collect();
    /// let (lo, hi) = set.equal_range(&4);
    /// assert_eq!(set.get_at(lo), Some(&4));
    /// assert_eq!(set.get_at(hi), Some(&6));
    /// // an absent key gives an empty range
    /// let (lo, hi) = set.equal_range(&5);
    /// assert_eq!(lo, hi);
    /// ```
    pub fn equal_range(&self, k: &K) -> (Cursor, Cursor) {
        (self.lower_bound(k), self.upper_bound(k))
    }

    /// Removes the entry with a key equivalent to `k` and returns the number
    /// of entries removed
    pub fn erase_key(&mut self, k: &K) -> usize {
        match self.tree.find_key(k) {
            Some(p) => usize::from(self.tree.remove(p).is_some()),
            None => 0,
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C> OrdBase<K, V, C> {
    /// Returns a multiline dump of the internal tree, listing every entry in
    /// key order with its node, rank, and tree links
    pub fn debug(&self) -> String {
        self.tree.debug()
    }
}

/// The clone is a separate container, cursors of `self` are foreign to it
impl<K: Clone, V: Clone, C: Clone> Clone for OrdBase<K, V, C> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree.clone(),
            id: SourceId::new(),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for OrdBase<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: PartialEq, V: PartialEq, C> PartialEq for OrdBase<K, V, C> {
    fn eq(&self, other: &Self) -> bool {
        (self.len() == other.len()) && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq, C> Eq for OrdBase<K, V, C> {}
