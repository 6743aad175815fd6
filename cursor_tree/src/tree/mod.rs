use core::{cmp::Ordering, fmt::Debug, fmt::Write};

use crate::{
    arena::Arena,
    compare::Compare,
    ptr::{Inx, PNode, PSeq, Ptr},
    seq::{Link, Seq},
    Error,
};

mod find;
mod insert;
mod remove;

// The index is a rank-balanced tree following "Rank-balanced trees" by
// Haeupler, Sen, and Tarjan (2015). Entries live in a `Seq` in key order, and
// every entry owns exactly one tree `Node` that points back at its position.
// Cursors name positions, never nodes, so the tree is free to move position
// payloads between nodes during removal. The rank rules are:
//
// 0. Rank difference calculations count the rank of a `None` child as 0.
// 1. If a node's children are both `None`, its rank can only be 1.
// 2. Rank differences can only be 1 or 2.

/// The payload of a sequence position
#[derive(Clone)]
pub(crate) struct Entry<K, V> {
    pub k: K,
    pub v: V,
    // the node currently indexing this position
    pub p_node: Inx,
}

/// Internal node of a `Tree`
#[derive(Clone)]
pub(crate) struct Node {
    // the indexed position
    pub p_seq: Inx,
    pub p_back: Option<Inx>,
    pub p_tree0: Option<Inx>,
    pub p_tree1: Option<Inx>,
    // the root rank is at most `2 * log2(len)`, which cannot overflow
    pub rank: u8,
}

/// The ordered element sequence together with its balancing index
#[derive(Clone)]
pub(crate) struct Tree<K, V, C> {
    pub(crate) seq: Seq<Entry<K, V>>,
    pub(crate) nodes: Arena<PNode, Node>,
    pub(crate) root: Option<Inx>,
    pub(crate) cmp: C,
}

impl<K, V, C> Tree<K, V, C> {
    pub fn new(cmp: C) -> Self {
        Self {
            seq: Seq::new(),
            nodes: Arena::new(),
            root: None,
            cmp,
        }
    }

    pub fn len(&self) -> usize {
        self.seq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.seq.capacity()
    }

    pub fn reserve(&mut self, additional: usize) {
        self.seq.reserve(additional);
        self.nodes.reserve(additional);
    }

    pub fn clear(&mut self) {
        self.seq.clear();
        self.nodes.clear();
        self.root = None;
    }

    pub fn clear_and_shrink(&mut self) {
        self.seq.clear_and_shrink();
        self.nodes.clear_and_shrink();
        self.root = None;
    }

    #[inline]
    pub(crate) fn node(&self, p: Inx) -> &Node {
        self.nodes.get_inx_unwrap(p)
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, p: Inx) -> &mut Node {
        self.nodes.get_inx_mut_unwrap(p)
    }

    #[inline]
    pub(crate) fn rank(&self, p: Option<Inx>) -> u8 {
        match p {
            Some(p) => self.node(p).rank,
            None => 0,
        }
    }

    /// The key of the position indexed by node `p`
    #[inline]
    pub(crate) fn node_key(&self, p: Inx) -> &K {
        &self.seq.get_inx_unwrap(self.node(p).p_seq).k
    }

    /// The full `PSeq` of the position indexed by node `p`
    pub(crate) fn node_pos(&self, p: Inx) -> PSeq {
        self.seq.ptr_unwrap(self.node(p).p_seq)
    }

    /// The node indexing the sequence neighbor of the position of node `p`,
    /// which is the in-order successor if `next` and the predecessor
    /// otherwise
    pub(crate) fn neighbor_node(&self, p: Inx, next: bool) -> Option<Inx> {
        let link = self.seq.get_inx_unwrap(self.node(p).p_seq);
        let p_seq = if next { link.next() } else { link.prev() }?;
        Some(self.seq.get_inx_unwrap(p_seq.inx()).p_node)
    }

    /// Replaces the `p_old` child pointer of `p_parent` with `p_new`, or
    /// makes `p_new` the root if there is no parent
    pub(crate) fn replace_child(&mut self, p_parent: Option<Inx>, p_old: Inx, p_new: Inx) {
        match p_parent {
            Some(p_parent) => {
                let parent = self.node_mut(p_parent);
                if parent.p_tree1 == Some(p_old) {
                    parent.p_tree1 = Some(p_new);
                } else {
                    parent.p_tree0 = Some(p_new);
                }
            }
            None => self.root = Some(p_new),
        }
    }

    /// Returns the link of the position `p`
    pub fn get_link(&self, p: PSeq) -> Option<&Link<Entry<K, V>>> {
        self.seq.get(p)
    }
}

impl<K, V, C: Compare<K>> Tree<K, V, C> {
    /// Used by tests
    pub fn _check_invariants(this: &Self) -> Result<(), Error> {
        Seq::_check_invariants(&this.seq)?;
        Arena::_check_invariants(&this.nodes)?;
        if this.nodes.len() != this.seq.len() {
            return Err(Error::InvariantViolation("node count != position count"))
        }
        let root = match this.root {
            Some(root) => root,
            None => {
                if this.seq.is_empty() {
                    return Ok(())
                }
                return Err(Error::InvariantViolation("nonempty tree has no root"))
            }
        };
        if this.nodes.get_ignore_gen(root).is_none() {
            return Err(Error::InvariantViolation("root is broken"))
        }
        if this.node(root).p_back.is_some() {
            return Err(Error::InvariantViolation("root node has a back pointer"))
        }
        // pairing and ordering along the sequence
        let mut prev: Option<Inx> = None;
        let mut p = this.seq.first();
        while let Some(p_seq) = p {
            let link = this.seq.get_inx_unwrap(p_seq.inx());
            match this.nodes.get_ignore_gen(link.p_node) {
                Some((_, node)) if node.p_seq == p_seq.inx() => (),
                _ => return Err(Error::InvariantViolation("position and node are not paired")),
            }
            if let Some(prev) = prev {
                let prev_k = &this.seq.get_inx_unwrap(prev).k;
                if this.cmp.compare(prev_k, &link.k) != Ordering::Less {
                    return Err(Error::InvariantViolation("incorrect ordering"))
                }
            }
            prev = Some(p_seq.inx());
            p = link.next();
        }
        // tree links and ranks
        let mut p = this.seq.first();
        while let Some(p_seq) = p {
            let link = this.seq.get_inx_unwrap(p_seq.inx());
            let p_node = link.p_node;
            let node = this.node(p_node);
            if let Some(p_back) = node.p_back {
                match this.nodes.get_ignore_gen(p_back) {
                    Some((_, parent))
                        if (parent.p_tree0 == Some(p_node)) || (parent.p_tree1 == Some(p_node)) => {}
                    _ => return Err(Error::InvariantViolation("broken tree")),
                }
            } else if p_node != root {
                return Err(Error::InvariantViolation("more than one root node"))
            }
            if node.p_tree0.is_some() && (node.p_tree0 == node.p_tree1) {
                return Err(Error::InvariantViolation("`p_tree0` and `p_tree1` are the same"))
            }
            for child in [node.p_tree0, node.p_tree1].into_iter().flatten() {
                match this.nodes.get_ignore_gen(child) {
                    Some((_, child)) if child.p_back == Some(p_node) => (),
                    _ => return Err(Error::InvariantViolation("broken tree")),
                }
            }
            let rank0 = this.rank(node.p_tree0);
            let rank1 = this.rank(node.p_tree1);
            if (node.rank <= rank0) || (node.rank <= rank1) {
                return Err(Error::InvariantViolation("rank difference is zero or negative"))
            }
            if node.rank > rank0.min(rank1).wrapping_add(2) {
                return Err(Error::InvariantViolation("rank difference is greater than 2"))
            }
            if node.p_tree0.is_none() && node.p_tree1.is_none() && (node.rank != 1) {
                return Err(Error::InvariantViolation("leaf node is not rank 1"))
            }
            p = link.next();
        }
        // the in-order traversal of the tree must visit the sequence in order
        let mut stack = vec![];
        let mut p_node = Some(root);
        let mut p = this.seq.first();
        loop {
            while let Some(tmp) = p_node {
                stack.push(tmp);
                p_node = this.node(tmp).p_tree0;
            }
            let Some(tmp) = stack.pop() else { break };
            match p {
                Some(p_seq) if this.node(tmp).p_seq == p_seq.inx() => {
                    p = this.seq.get_inx_unwrap(p_seq.inx()).next();
                }
                _ => return Err(Error::InvariantViolation("tree order differs from sequence")),
            }
            p_node = this.node(tmp).p_tree1;
        }
        if p.is_some() {
            return Err(Error::InvariantViolation("unreachable nodes"))
        }
        Ok(())
    }
}

impl<K: Debug, V: Debug, C> Tree<K, V, C> {
    /// Multiline dump of every node in key order
    pub fn debug(&self) -> String {
        let mut s = String::new();
        let _ = writeln!(s, "root: {:?}", self.root);
        let mut p = self.seq.first();
        while let Some(p_seq) = p {
            let link = self.seq.get_inx_unwrap(p_seq.inx());
            let n = self.node(link.p_node);
            let _ = writeln!(
                s,
                "({p_seq:?}, node: {:2?}, k: {:3?}, v: {:3?}, rank: {:2?}, p_back: {:2?}, \
                 p_tree0: {:2?}, p_tree1: {:2?})",
                link.p_node, link.k, link.v, n.rank, n.p_back, n.p_tree0, n.p_tree1,
            );
            p = link.next();
        }
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::natural;

    #[test]
    fn positions_survive_rebalancing() {
        let mut t = Tree::new(natural::<u32>());
        let mut ps = vec![];
        for i in 0..512u32 {
            // scrambled, so that both rotation directions happen
            let k = (i * 7919) % 512;
            ps.push((t.insert(k, i).unwrap(), k));
            Tree::_check_invariants(&t).unwrap();
        }
        let (p, k) = ps[7];
        let (p_existing, ..) = t.insert(k, 0).unwrap_err();
        assert_eq!(p_existing, p);
        assert_eq!(t.find_key(&k), Some(p));

        let mut kept = vec![];
        for (i, (p, k)) in ps.into_iter().enumerate() {
            if (i % 3) == 0 {
                kept.push((p, k));
            } else {
                assert_eq!(t.remove(p).unwrap().t.k, k);
                Tree::_check_invariants(&t).unwrap();
            }
        }
        assert_eq!(t.len(), kept.len());
        for (p, k) in &kept {
            assert_eq!(t.get_link(*p).map(|link| link.k), Some(*k));
        }
        assert!(t.debug().starts_with("root: Some("));
        for (p, _) in kept {
            t.remove(p).unwrap();
        }
        assert!(t.is_empty());
        assert_eq!(t.root, None);
        Tree::_check_invariants(&t).unwrap();
    }
}
