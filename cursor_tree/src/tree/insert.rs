use core::cmp::Ordering;

use super::{Entry, Node, Tree};
use crate::{
    compare::Compare,
    ptr::{Inx, PSeq, Ptr},
};

impl<K, V, C: Compare<K>> Tree<K, V, C> {
    /// Inserts `k` and `v` and returns the new position.
    ///
    /// # Errors
    ///
    /// If an equivalent key is already present nothing is mutated, and the
    /// position of that key is returned along with ownership of `k` and `v`
    pub fn insert(&mut self, k: K, v: V) -> Result<PSeq, (PSeq, K, V)> {
        let nearest = self.nearest_by_key(&k);
        self.insert_at_nearest(nearest, k, v)
    }

    /// The same as [Tree::insert], except the search starts linearly from
    /// `p_init`. If `p_init` is invalid or far from where `k` belongs, a
    /// normal search is used.
    pub fn insert_linear(&mut self, p_init: PSeq, k: K, v: V) -> Result<PSeq, (PSeq, K, V)> {
        let nearest = self
            .nearest_linear(p_init, &k)
            .or_else(|| self.nearest_by_key(&k));
        self.insert_at_nearest(nearest, k, v)
    }

    fn insert_at_nearest(
        &mut self,
        nearest: Option<(Inx, Ordering)>,
        k: K,
        v: V,
    ) -> Result<PSeq, (PSeq, K, V)> {
        match nearest {
            None => Ok(self.insert_empty(k, v)),
            Some((p, Ordering::Equal)) => Err((self.node_pos(p), k, v)),
            Some((p, Ordering::Less)) => Ok(self.insert_inx_manual_unwrap(k, v, p, false)),
            Some((p, Ordering::Greater)) => Ok(self.insert_inx_manual_unwrap(k, v, p, true)),
        }
    }

    fn insert_empty(&mut self, k: K, v: V) -> PSeq {
        let nodes = &mut self.nodes;
        let res = self.seq.insert_with((None, None), |p_seq| Entry {
            k,
            v,
            p_node: nodes.insert(Node {
                p_seq: p_seq.inx(),
                p_back: None,
                p_tree0: None,
                p_tree1: None,
                rank: 1,
            })
            .inx(),
        });
        match res {
            Ok(p_new) => {
                self.root = Some(self.seq.get_inx_unwrap(p_new.inx()).p_node);
                p_new
            }
            Err(_) => unreachable!(),
        }
    }

    /// Inserts a new position immediately after (if `after`) or before the
    /// position of node `p`, and attaches its node as a leaf
    fn insert_inx_manual_unwrap(&mut self, k: K, v: V, p: Inx, after: bool) -> PSeq {
        // the new node must go in a `None` child slot, if the slot is taken then the
        // neighbor in that direction has a free slot on the opposite side
        let node = self.node(p);
        let (p, after) = match (after, node.p_tree1.is_some(), node.p_tree0.is_some()) {
            (true, true, _) => match self.neighbor_node(p, true) {
                Some(p_next) => (p_next, false),
                None => unreachable!(),
            },
            (false, _, true) => match self.neighbor_node(p, false) {
                Some(p_prev) => (p_prev, true),
                None => unreachable!(),
            },
            _ => (p, after),
        };
        let p_anchor = self.node_pos(p);
        let link = self.seq.get_inx_unwrap(p_anchor.inx());
        let prev_next = if after {
            (Some(p_anchor), link.next())
        } else {
            (link.prev(), Some(p_anchor))
        };
        let nodes = &mut self.nodes;
        let res = self.seq.insert_with(prev_next, |p_seq| Entry {
            k,
            v,
            p_node: nodes.insert(Node {
                p_seq: p_seq.inx(),
                p_back: Some(p),
                p_tree0: None,
                p_tree1: None,
                rank: 1,
            })
            .inx(),
        });
        let p_new = match res {
            Ok(p_new) => p_new,
            Err(_) => unreachable!(),
        };
        let p_new_node = self.seq.get_inx_unwrap(p_new.inx()).p_node;
        if after {
            self.node_mut(p).p_tree1 = Some(p_new_node);
        } else {
            self.node_mut(p).p_tree0 = Some(p_new_node);
        }
        self.rebalance_inserted(p_new_node);
        p_new
    }

    /// Rebalances starting from the newly attached leaf `p`
    fn rebalance_inserted(&mut self, p: Inx) {
        // `p0`, `p1`, and `p2` are a child, parent, and grandparent chain. `d01` is
        // true if `n0` is the `p_tree1` child of `n1`, `d12` likewise.
        let mut p0 = p;

        // the parent cannot be rank 3, the slot `n0` took was a `None` child
        let mut p1 = match self.node(p0).p_back {
            Some(p1) => p1,
            // single node tree
            None => return,
        };
        let n1 = self.node_mut(p1);
        if n1.rank == 2 {
            // the new rank 1 leaf is within a rank difference of 2 of any sibling
            return
        }
        // `n1` was a leaf and gets promoted, leaving no violations at or below it
        n1.rank = 2;
        let mut d01 = n1.p_tree1 == Some(p0);
        let mut p2 = match n1.p_back {
            Some(p2) => p2,
            // a height 2 tree is correct with the root at rank 2
            None => return,
        };
        let mut d12 = self.node(p2).p_tree1 == Some(p1);
        loop {
            // entering here the only possible violation is a rank difference of 0
            // between `n1` and `n2`, and `n1`'s other child `s0` is 2 below `n1`
            //
            //    n2 (r+1,r+2)
            //        /
            //    n1 (r+1)
            //    /     \
            // n0 (r)   s0 (r-1)
            let rank0 = self.node(p0).rank;
            let rank1 = self.node(p1).rank;
            let n2 = self.node(p2);
            let rank2 = n2.rank;
            let p3 = n2.p_back;
            if rank1 < rank2 {
                break
            }
            let p_s1 = if d12 { n2.p_tree0 } else { n2.p_tree1 };
            let rank_s1 = self.rank(p_s1);
            if rank_s1.wrapping_add(1) == rank2 {
                // promoting `n2` keeps its sibling edge legal, then the violation can only
                // be one level up
                self.node_mut(p2).rank = rank1.wrapping_add(1);
                match p3 {
                    Some(p3) => {
                        p0 = p1;
                        p1 = p2;
                        p2 = p3;
                        d01 = d12;
                        d12 = self.node(p2).p_tree1 == Some(p1);
                        continue
                    }
                    None => break,
                }
            }

            //      n2 (r+1)
            //     /       \
            //  n1 (r+1)  s1 (r-1)
            //   /    \
            // n0 (r)  s0 (r-1)
            //
            // a single or double rotation fixes everything at once
            if d01 == d12 {
                // single rotation, `n1` takes the place of `n2`
                //
                //     n1 (r+1)
                //    /     \
                // n0 (r)   n2 (r)
                //          /    \
                //     s0 (r-1) s1 (r-1)
                let n1 = self.node(p1);
                let p_s0 = if d01 { n1.p_tree0 } else { n1.p_tree1 };
                if let Some(p_s0) = p_s0 {
                    self.node_mut(p_s0).p_back = Some(p2);
                }
                let n1 = self.node_mut(p1);
                n1.p_back = p3;
                let n2 = if d01 {
                    n1.p_tree0 = Some(p2);
                    let n2 = self.node_mut(p2);
                    n2.p_tree1 = p_s0;
                    n2
                } else {
                    n1.p_tree1 = Some(p2);
                    let n2 = self.node_mut(p2);
                    n2.p_tree0 = p_s0;
                    n2
                };
                n2.p_back = Some(p1);
                n2.rank = rank0;
                self.replace_child(p3, p2, p1);
            } else {
                // double rotation, `n0` takes the place of `n2`
                //
                //          n0 (r+1)
                //         /      \
                //     n1 (r)    n2 (r)
                //     /  \      /   \
                //   s0    a    b    s1
                //
                // where `a` and `b` were children of `n0`, `a` on the side towards `n1`
                let n0 = self.node(p0);
                let (p_a, p_b) = if d01 {
                    (n0.p_tree0, n0.p_tree1)
                } else {
                    (n0.p_tree1, n0.p_tree0)
                };
                if let Some(p_a) = p_a {
                    self.node_mut(p_a).p_back = Some(p1);
                }
                if let Some(p_b) = p_b {
                    self.node_mut(p_b).p_back = Some(p2);
                }
                let n0 = self.node_mut(p0);
                n0.p_back = p3;
                n0.rank = rank1;
                if d01 {
                    n0.p_tree0 = Some(p1);
                    n0.p_tree1 = Some(p2);
                    self.node_mut(p1).p_tree1 = p_a;
                    self.node_mut(p2).p_tree0 = p_b;
                } else {
                    n0.p_tree0 = Some(p2);
                    n0.p_tree1 = Some(p1);
                    self.node_mut(p1).p_tree0 = p_a;
                    self.node_mut(p2).p_tree1 = p_b;
                }
                let n1 = self.node_mut(p1);
                n1.p_back = Some(p0);
                n1.rank = rank0;
                let n2 = self.node_mut(p2);
                n2.p_back = Some(p0);
                n2.rank = rank0;
                self.replace_child(p3, p2, p0);
            }
            break
        }
    }
}
