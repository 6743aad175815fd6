use core::cmp::Ordering;

use super::Tree;
use crate::{
    compare::Compare,
    ptr::{Inx, PSeq, Ptr},
};

/// The maximum number of comparisons a hinted search makes before falling
/// back to a search from the root
const LINEAR_STEPS: usize = 16;

impl<K, V, C: Compare<K>> Tree<K, V, C> {
    /// Descends from the root and returns the node with a key equivalent to
    /// `k` with `Ordering::Equal`. If there is no such key, the last visited
    /// node is returned, with `Ordering::Less` if `k` orders before it or
    /// `Ordering::Greater` if after it. `k` would be inserted immediately next
    /// to the position of that node. Returns `None` if the tree is empty.
    pub fn nearest_by_key(&self, k: &K) -> Option<(Inx, Ordering)> {
        let mut p = self.root?;
        loop {
            let node = self.node(p);
            match self.cmp.compare(k, self.node_key(p)) {
                Ordering::Less => {
                    if let Some(p_tree0) = node.p_tree0 {
                        p = p_tree0;
                    } else {
                        break Some((p, Ordering::Less))
                    }
                }
                Ordering::Equal => break Some((p, Ordering::Equal)),
                Ordering::Greater => {
                    if let Some(p_tree1) = node.p_tree1 {
                        p = p_tree1;
                    } else {
                        break Some((p, Ordering::Greater))
                    }
                }
            }
        }
    }

    /// Has the same results as [Tree::nearest_by_key], except it searches
    /// linearly along the sequence starting at `p_init`. Returns `None` if
    /// `p_init` is invalid or if the result is not found within a small number
    /// of comparisons.
    pub fn nearest_linear(&self, p_init: PSeq, k: &K) -> Option<(Inx, Ordering)> {
        if !self.seq.contains(p_init) {
            return None
        }
        let mut p = p_init.inx();
        // `Some(true)` if going towards greater keys
        let mut direction = None;
        for _ in 0..LINEAR_STEPS {
            let link = self.seq.get_inx_unwrap(p);
            let ordering = self.cmp.compare(k, &link.k);
            let step = match ordering {
                Ordering::Less => {
                    if direction == Some(true) {
                        None
                    } else {
                        direction = Some(false);
                        link.prev()
                    }
                }
                Ordering::Equal => None,
                Ordering::Greater => {
                    if direction == Some(false) {
                        None
                    } else {
                        direction = Some(true);
                        link.next()
                    }
                }
            };
            match step {
                Some(p_step) => p = p_step.inx(),
                None => return Some((link.p_node, ordering)),
            }
        }
        None
    }

    /// Finds the position of the key equivalent to `k`
    pub fn find_key(&self, k: &K) -> Option<PSeq> {
        match self.nearest_by_key(k)? {
            (p, Ordering::Equal) => Some(self.node_pos(p)),
            _ => None,
        }
    }

    /// Returns the first position whose key does not order before `k`, or
    /// `None` if there is no such position
    pub fn lower_bound(&self, k: &K) -> Option<PSeq> {
        let (p, ordering) = self.nearest_by_key(k)?;
        match ordering {
            Ordering::Less | Ordering::Equal => Some(self.node_pos(p)),
            Ordering::Greater => self.seq.get_inx_unwrap(self.node(p).p_seq).next(),
        }
    }

    /// Returns the first position whose key orders after `k`, or `None` if
    /// there is no such position
    pub fn upper_bound(&self, k: &K) -> Option<PSeq> {
        let (p, ordering) = self.nearest_by_key(k)?;
        match ordering {
            Ordering::Less => Some(self.node_pos(p)),
            Ordering::Equal | Ordering::Greater => {
                self.seq.get_inx_unwrap(self.node(p).p_seq).next()
            }
        }
    }
}
