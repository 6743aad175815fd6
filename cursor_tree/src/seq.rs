use core::ops::{Deref, DerefMut};

use crate::{
    arena::Arena,
    ptr::{Inx, PSeq, Ptr},
    Error,
};

/// A link in a `Seq`, with a public `t: T` field and the interlinks to the
/// previous and next links
#[derive(Clone)]
pub(crate) struct Link<T> {
    prev_next: (Option<PSeq>, Option<PSeq>),
    pub t: T,
}

impl<T> Link<T> {
    /// Get a `PSeq` to the previous `Link` in the sequence. Returns `None` if
    /// `self` is at the start.
    pub fn prev(&self) -> Option<PSeq> {
        self.prev_next.0
    }

    /// Get a `PSeq` to the next `Link` in the sequence. Returns `None` if
    /// `self` is at the end.
    pub fn next(&self) -> Option<PSeq> {
        self.prev_next.1
    }
}

impl<T> Deref for Link<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.t
    }
}

impl<T> DerefMut for Link<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.t
    }
}

/// A single doubly linked sequence of links stored in an `Arena`. Insertion
/// and removal are `O(1)` and do not invalidate `PSeq`s to other links.
#[derive(Clone)]
pub(crate) struct Seq<T> {
    a: Arena<PSeq, Link<T>>,
    first: Option<PSeq>,
    last: Option<PSeq>,
}

impl<T> Seq<T> {
    /// Used by tests
    pub fn _check_invariants(this: &Self) -> Result<(), Error> {
        Arena::_check_invariants(&this.a)?;
        let mut count = 0usize;
        let mut prev: Option<PSeq> = None;
        let mut p = this.first;
        while let Some(p_link) = p {
            let link = match this.a.get(p_link) {
                Some(link) => link,
                None => return Err(Error::InvariantViolation("invalid interlink")),
            };
            if link.prev() != prev {
                return Err(Error::InvariantViolation("interlinks are not mirrored"))
            }
            count += 1;
            if count > this.a.len() {
                return Err(Error::InvariantViolation("cyclic sequence"))
            }
            prev = p;
            p = link.next();
        }
        if prev != this.last {
            return Err(Error::InvariantViolation("`last` is not correct"))
        }
        if count != this.a.len() {
            return Err(Error::InvariantViolation("links outside of the sequence"))
        }
        Ok(())
    }

    pub fn new() -> Self {
        Self {
            a: Arena::new(),
            first: None,
            last: None,
        }
    }

    pub fn len(&self) -> usize {
        self.a.len()
    }

    pub fn is_empty(&self) -> bool {
        self.a.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.a.capacity()
    }

    pub fn reserve(&mut self, additional: usize) {
        self.a.reserve(additional);
    }

    pub fn first(&self) -> Option<PSeq> {
        self.first
    }

    pub fn last(&self) -> Option<PSeq> {
        self.last
    }

    pub fn contains(&self, p: PSeq) -> bool {
        self.a.contains(p)
    }

    /// Checks that `prev_next` are adjacent ends of a possible insertion point
    fn is_insertion_point(&self, prev_next: (Option<PSeq>, Option<PSeq>)) -> bool {
        match prev_next {
            (None, None) => self.is_empty(),
            (Some(prev), None) => self.last == Some(prev) && self.a.contains(prev),
            (None, Some(next)) => self.first == Some(next) && self.a.contains(next),
            (Some(prev), Some(next)) => {
                matches!(self.a.get(prev), Some(link) if link.next() == Some(next))
            }
        }
    }

    /// Inserts the `T` returned by `create` between the links of `prev_next`.
    /// `create` is given the `PSeq` that is returned.
    ///
    /// # Errors
    ///
    /// Does not run `create` and returns it if `prev_next` are not neighbors
    /// (`None` meaning the start or end of the sequence)
    pub fn insert_with<F: FnOnce(PSeq) -> T>(
        &mut self,
        prev_next: (Option<PSeq>, Option<PSeq>),
        create: F,
    ) -> Result<PSeq, F> {
        if !self.is_insertion_point(prev_next) {
            return Err(create)
        }
        let p_new = self.a.insert_with(|p| Link {
            prev_next,
            t: create(p),
        });
        match prev_next.0 {
            Some(prev) => self.a.get_inx_mut_unwrap(prev.inx()).prev_next.1 = Some(p_new),
            None => self.first = Some(p_new),
        }
        match prev_next.1 {
            Some(next) => self.a.get_inx_mut_unwrap(next.inx()).prev_next.0 = Some(p_new),
            None => self.last = Some(p_new),
        }
        Ok(p_new)
    }

    /// Removes the link at `p` and connects its neighbors. Returns `None` if
    /// `p` is invalid.
    pub fn remove(&mut self, p: PSeq) -> Option<Link<T>> {
        let link = self.a.remove(p)?;
        match link.prev() {
            Some(prev) => self.a.get_inx_mut_unwrap(prev.inx()).prev_next.1 = link.next(),
            None => self.first = link.next(),
        }
        match link.next() {
            Some(next) => self.a.get_inx_mut_unwrap(next.inx()).prev_next.0 = link.prev(),
            None => self.last = link.prev(),
        }
        Some(link)
    }

    pub fn get(&self, p: PSeq) -> Option<&Link<T>> {
        self.a.get(p)
    }

    pub fn get_mut(&mut self, p: PSeq) -> Option<&mut T> {
        self.a.get_mut(p).map(|link| &mut link.t)
    }

    pub fn ptr_unwrap(&self, inx: Inx) -> PSeq {
        self.a.ptr_unwrap(inx)
    }

    pub fn get_inx_unwrap(&self, inx: Inx) -> &Link<T> {
        self.a.get_inx_unwrap(inx)
    }

    /// Only the `t` is reachable mutably, the interlinks are managed by
    /// `Seq`
    pub fn get_inx_mut_unwrap_t(&mut self, inx: Inx) -> &mut T {
        &mut self.a.get_inx_mut_unwrap(inx).t
    }

    pub fn clear(&mut self) {
        self.a.clear();
        self.first = None;
        self.last = None;
    }

    pub fn clear_and_shrink(&mut self) {
        self.a.clear_and_shrink();
        self.first = None;
        self.last = None;
    }

    /// Removes the first link and returns its `T`
    pub fn pop_first(&mut self) -> Option<T> {
        self.remove(self.first?).map(|link| link.t)
    }

    /// Removes the last link and returns its `T`
    pub fn pop_last(&mut self) -> Option<T> {
        self.remove(self.last?).map(|link| link.t)
    }

    /// Returns the mutable `T`s in sequence order. This needs to allocate
    /// because the order is only known through the interlinks. The buffers
    /// are sized by `len`, not by the arena capacity.
    pub fn vals_mut_ordered(&mut self) -> Vec<&mut T> {
        let mut order = Vec::with_capacity(self.len());
        let mut p = self.first;
        while let Some(p_link) = p {
            order.push(p_link.inx());
            p = self.a.get_inx_unwrap(p_link.inx()).next();
        }
        // `vals_mut` is in increasing index order
        let mut slots: Vec<(Inx, Option<&mut T>)> = self
            .a
            .vals_mut()
            .map(|(inx, link)| (inx, Some(&mut link.t)))
            .collect();
        order
            .into_iter()
            .filter_map(|inx| {
                let i = slots.binary_search_by_key(&inx, |slot| slot.0).ok()?;
                slots[i].1.take()
            })
            .collect()
    }
}
