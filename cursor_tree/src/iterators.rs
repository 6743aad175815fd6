//! Iterators for the containers of this crate. All of them iterate from the
//! least key to the greatest key.

use core::iter::FusedIterator;
use std::vec;

use crate::{
    ptr::{PSeq, Ptr},
    seq::Seq,
    tree::Entry,
};

/// An iterator over `(&K, &V)`
pub struct Iter<'a, K, V> {
    pub(crate) seq: &'a Seq<Entry<K, V>>,
    pub(crate) front: Option<PSeq>,
    pub(crate) back: Option<PSeq>,
    pub(crate) len: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new(seq: &'a Seq<Entry<K, V>>) -> Self {
        Self {
            seq,
            front: seq.first(),
            back: seq.last(),
            len: seq.len(),
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None
        }
        let link = self.seq.get_inx_unwrap(self.front?.inx());
        self.front = link.next();
        self.len -= 1;
        Some((&link.k, &link.v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<'a, K, V> DoubleEndedIterator for Iter<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None
        }
        let link = self.seq.get_inx_unwrap(self.back?.inx());
        self.back = link.prev();
        self.len -= 1;
        Some((&link.k, &link.v))
    }
}

impl<'a, K, V> ExactSizeIterator for Iter<'a, K, V> {}

impl<'a, K, V> FusedIterator for Iter<'a, K, V> {}

impl<'a, K, V> Clone for Iter<'a, K, V> {
    fn clone(&self) -> Self {
        Self { ..*self }
    }
}

/// An iterator over `(&K, &V)` between two cursors, from the first up to but
/// not including the last
pub struct Range<'a, K, V> {
    pub(crate) seq: &'a Seq<Entry<K, V>>,
    pub(crate) front: Option<PSeq>,
    pub(crate) last: Option<PSeq>,
}

impl<'a, K, V> Iterator for Range<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let p = self.front?;
        if Some(p) == self.last {
            self.front = None;
            return None
        }
        let link = self.seq.get_inx_unwrap(p.inx());
        self.front = link.next();
        Some((&link.k, &link.v))
    }
}

impl<'a, K, V> FusedIterator for Range<'a, K, V> {}

/// An iterator over `&K`
pub struct Keys<'a, K, V> {
    pub(crate) iter: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<'a, K, V> DoubleEndedIterator for Keys<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.iter.next_back().map(|(k, _)| k)
    }
}

impl<'a, K, V> ExactSizeIterator for Keys<'a, K, V> {}

impl<'a, K, V> FusedIterator for Keys<'a, K, V> {}

/// An iterator over `&V`
pub struct Values<'a, K, V> {
    pub(crate) iter: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<'a, K, V> DoubleEndedIterator for Values<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.iter.next_back().map(|(_, v)| v)
    }
}

impl<'a, K, V> ExactSizeIterator for Values<'a, K, V> {}

impl<'a, K, V> FusedIterator for Values<'a, K, V> {}

/// A mutable iterator over `(&K, &mut V)`
pub struct IterMut<'a, K, V> {
    pub(crate) iter: vec::IntoIter<&'a mut Entry<K, V>>,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|entry| (&entry.k, &mut entry.v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<'a, K, V> DoubleEndedIterator for IterMut<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.iter.next_back().map(|entry| (&entry.k, &mut entry.v))
    }
}

impl<'a, K, V> ExactSizeIterator for IterMut<'a, K, V> {}

/// A mutable iterator over `&mut V`
pub struct ValuesMut<'a, K, V> {
    pub(crate) iter: IterMut<'a, K, V>,
}

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<'a, K, V> DoubleEndedIterator for ValuesMut<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.iter.next_back().map(|(_, v)| v)
    }
}

impl<'a, K, V> ExactSizeIterator for ValuesMut<'a, K, V> {}

/// A consuming iterator over `(K, V)`
pub struct IntoIter<K, V> {
    pub(crate) seq: Seq<Entry<K, V>>,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.seq.pop_first().map(|entry| (entry.k, entry.v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.seq.len(), Some(self.seq.len()))
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.seq.pop_last().map(|entry| (entry.k, entry.v))
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

impl<K, V> FusedIterator for IntoIter<K, V> {}

/// A consuming iterator over the keys of an `OrdSet`
pub struct SetIntoIter<K> {
    pub(crate) iter: IntoIter<K, ()>,
}

impl<K> Iterator for SetIntoIter<K> {
    type Item = K;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<K> DoubleEndedIterator for SetIntoIter<K> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.iter.next_back().map(|(k, _)| k)
    }
}

impl<K> ExactSizeIterator for SetIntoIter<K> {}

impl<K> FusedIterator for SetIntoIter<K> {}
