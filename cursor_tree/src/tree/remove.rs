use super::{Entry, Tree};
use crate::{
    ptr::{Inx, PSeq},
    seq::Link,
};

impl<K, V, C> Tree<K, V, C> {
    /// Removes the position `p` and returns its link, whose interlinks are the
    /// neighbors `p` had. Returns `None` if `p` is invalid. No other position
    /// is invalidated.
    pub fn remove(&mut self, p: PSeq) -> Option<Link<Entry<K, V>>> {
        let mut p_d = self.seq.get(p)?.p_node;
        // Only a leaf node can be detached directly. While the displaced node `d` has
        // children, it takes over the position of its in-order neighbor inside its
        // subtree (which is at most 2 levels down in a rank-balanced tree), and the
        // neighbor's node becomes the displaced one.
        loop {
            let d = self.node(p_d);
            if d.p_tree0.is_none() && d.p_tree1.is_none() {
                break
            }
            let p_r = match self.neighbor_node(p_d, d.p_tree1.is_some()) {
                Some(p_r) => p_r,
                None => unreachable!(),
            };
            let p_seq_r = self.node(p_r).p_seq;
            self.node_mut(p_d).p_seq = p_seq_r;
            self.seq.get_inx_mut_unwrap_t(p_seq_r).p_node = p_d;
            p_d = p_r;
        }
        let p_back = self.nodes.remove_inx_unwrap(p_d).p_back;
        let link = self.seq.remove(p)?;
        let p1 = match p_back {
            Some(p1) => p1,
            None => {
                // the last node was removed
                self.root = None;
                return Some(link)
            }
        };
        let n1 = self.node_mut(p1);
        if n1.p_tree1 == Some(p_d) {
            n1.p_tree1 = None;
        } else {
            n1.p_tree0 = None;
        }
        if n1.p_tree0.is_none() && n1.p_tree1.is_none() {
            n1.rank = 1;
        }
        self.rebalance_removed(p1);
        Some(link)
    }

    /// Fixes rank violations after a leaf child of `p` was detached
    fn rebalance_removed(&mut self, p: Inx) {
        // `n0` is the child subtree that lost rank (`None` at first), `n1` its parent,
        // and `s0` the sibling of `n0`
        let mut p0: Option<Inx> = None;
        let mut p1 = p;
        loop {
            let n1 = self.node(p1);
            let rank1 = n1.rank;
            let p2 = n1.p_back;
            let d01 = n1.p_tree1 == p0;
            let p_s0 = if d01 { n1.p_tree0 } else { n1.p_tree1 };
            let rank0 = self.rank(p0);
            let p_s0 = match p_s0 {
                Some(p_s0) => p_s0,
                None => {
                    // only possible at the exterior of the tree, where `n1` must become a
                    // rank 1 leaf
                    self.node_mut(p1).rank = 1;
                    match p2 {
                        Some(p2) => {
                            p0 = Some(p1);
                            p1 = p2;
                            continue
                        }
                        None => break,
                    }
                }
            };
            if rank0.wrapping_add(2) >= rank1 {
                // no violation
                break
            }
            // `n0` is 3 below `n1`
            let s0 = self.node(p_s0);
            let rank_s0 = s0.rank;
            if rank_s0.wrapping_add(2) == rank1 {
                // the sibling is 2 below, so demoting `n1` is enough locally
                self.node_mut(p1).rank = rank_s0.wrapping_add(1);
                match p2 {
                    Some(p2) => {
                        p0 = Some(p1);
                        p1 = p2;
                        continue
                    }
                    None => break,
                }
            }
            //     n1 (r+3)
            //    /       \
            // n0 (r)     s0 (r+2)
            //           /     \
            //          a       b
            //
            // `a` is the child of `s0` nearer to `n0`
            let (p_a, p_b) = if d01 {
                (s0.p_tree1, s0.p_tree0)
            } else {
                (s0.p_tree0, s0.p_tree1)
            };
            let rank_a = self.rank(p_a);
            let rank_b = self.rank(p_b);
            if rank_b.wrapping_add(1) == rank_s0 {
                // single rotation, `s0` takes the place of `n1`
                //
                //            s0 (r+3)
                //           /     \
                //      n1 (r(a)+1)  b (r+1)
                //      /    \
                //   n0 (r)   a
                if let Some(p_a) = p_a {
                    self.node_mut(p_a).p_back = Some(p1);
                }
                let n1 = self.node_mut(p1);
                n1.p_back = Some(p_s0);
                n1.rank = rank_a.wrapping_add(1);
                if d01 {
                    n1.p_tree0 = p_a;
                    self.node_mut(p_s0).p_tree1 = Some(p1);
                } else {
                    n1.p_tree1 = p_a;
                    self.node_mut(p_s0).p_tree0 = Some(p1);
                }
                let s0 = self.node_mut(p_s0);
                s0.p_back = p2;
                s0.rank = rank1;
                self.replace_child(p2, p1, p_s0);
                break
            }
            if rank_a.wrapping_add(2) == rank_s0 {
                // both children of `s0` are 2 below it, double demotion
                self.node_mut(p_s0).rank = rank0.wrapping_add(1);
                self.node_mut(p1).rank = rank0.wrapping_add(2);
                match p2 {
                    Some(p2) => {
                        p0 = Some(p1);
                        p1 = p2;
                        continue
                    }
                    None => break,
                }
            }
            // double rotation, `a` (which is 1 below `s0`, and `b` 2 below) takes the
            // place of `n1`
            //
            //             a (r+3)
            //           /      \
            //     n1 (r+1)    s0 (r+1)
            //     /    \       /    \
            //  n0 (r)   c     e     b (r)
            //
            // where `c` and `e` were children of `a`, `c` on the side towards `n0`
            let p_a = match p_a {
                Some(p_a) => p_a,
                None => unreachable!(),
            };
            let a = self.node(p_a);
            let (p_c, p_e) = if d01 {
                (a.p_tree1, a.p_tree0)
            } else {
                (a.p_tree0, a.p_tree1)
            };
            if let Some(p_c) = p_c {
                self.node_mut(p_c).p_back = Some(p1);
            }
            if let Some(p_e) = p_e {
                self.node_mut(p_e).p_back = Some(p_s0);
            }
            if d01 {
                self.node_mut(p1).p_tree0 = p_c;
                self.node_mut(p_s0).p_tree1 = p_e;
                let a = self.node_mut(p_a);
                a.p_tree0 = Some(p_s0);
                a.p_tree1 = Some(p1);
            } else {
                self.node_mut(p1).p_tree1 = p_c;
                self.node_mut(p_s0).p_tree0 = p_e;
                let a = self.node_mut(p_a);
                a.p_tree0 = Some(p1);
                a.p_tree1 = Some(p_s0);
            }
            let a = self.node_mut(p_a);
            a.p_back = p2;
            a.rank = rank1;
            let n1 = self.node_mut(p1);
            n1.p_back = Some(p_a);
            n1.rank = rank_a;
            let s0 = self.node_mut(p_s0);
            s0.p_back = Some(p_a);
            s0.rank = rank_a;
            self.replace_child(p2, p1, p_a);
            break
        }
    }
}
