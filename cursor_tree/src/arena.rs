use core::{fmt, marker::PhantomData, mem};

use InternalEntry::*;

use crate::{
    ptr::{gen_increment, gen_two, Gen, Inx, Ptr},
    Error,
};

/// Internal entry for an `Arena`.
#[derive(Clone)]
pub(crate) enum InternalEntry<T> {
    /// A free entry with no `T`. The `Inx` points to the next free entry,
    /// except if it points to the self entry in which case it is the last free
    /// entry.
    Free(Inx),
    /// An entry allocated for a `(Gen, T)` pair in the arena.
    Allocated(Gen, T),
}

/// Generation counted storage with a freelist. Entry `i` of `m` is addressed
/// by the `Inx` `i + 1`.
///
/// # Invariants
///
/// - The generation value starts at 2 in a new arena, so that `Ptr::invalid`
///   never points to a valid entry
/// - All `Free` entries are in a single linked list with the start being
///   `freelist_root` and the end pointing to itself
/// - If there are no free entries, `freelist_root` is `None`
/// - Every invalidating operation increments `gen`, and newer allocations use
///   the new value
pub(crate) struct Arena<P: Ptr, T> {
    m: Vec<InternalEntry<T>>,
    len: usize,
    freelist_root: Option<Inx>,
    gen: Gen,
    _boo: PhantomData<P>,
}

impl<P: Ptr, T> Arena<P, T> {
    /// Used by tests
    pub fn _check_invariants(this: &Self) -> Result<(), Error> {
        if this.gen < gen_two() {
            return Err(Error::InvariantViolation("bad generation"))
        }
        let n_allocated = this
            .m
            .iter()
            .filter(|entry| matches!(entry, Allocated(..)))
            .count();
        if this.len != n_allocated {
            return Err(Error::InvariantViolation("len != n_allocated"))
        }
        let mut freelist_len = 0usize;
        if let Some(root) = this.freelist_root {
            let mut inx = root;
            loop {
                if let Some(Free(next)) = this.m_get(inx) {
                    freelist_len += 1;
                    if *next == inx {
                        break
                    }
                    inx = *next;
                } else {
                    return Err(Error::InvariantViolation("bad freelist node"))
                }
                if freelist_len > this.m.len() {
                    return Err(Error::InvariantViolation("endless freelist"))
                }
            }
        }
        if freelist_len != (this.m.len() - n_allocated) {
            return Err(Error::InvariantViolation("freelist discontinuous"))
        }
        Ok(())
    }

    pub fn new() -> Self {
        Self {
            m: Vec::new(),
            len: 0,
            freelist_root: None,
            gen: gen_two(),
            _boo: PhantomData,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.m.len()
    }

    fn inc_gen(&mut self) {
        self.gen = gen_increment(self.gen);
    }

    #[inline]
    fn m_get(&self, inx: Inx) -> Option<&InternalEntry<T>> {
        self.m.get(inx.get().wrapping_sub(1))
    }

    #[inline]
    fn m_get_mut(&mut self, inx: Inx) -> Option<&mut InternalEntry<T>> {
        self.m.get_mut(inx.get().wrapping_sub(1))
    }

    /// Reserves capacity such that `self.capacity()` becomes at least
    /// `self.len() + additional`, and puts the new entries on the freelist
    pub fn reserve(&mut self, additional: usize) {
        let old_cap = self.m.len();
        let free = old_cap.wrapping_sub(self.len);
        if free >= additional {
            return
        }
        let target = match self.len.checked_add(additional) {
            Some(target) => target,
            None => panic!("wanted arena capacity exceeds `usize::MAX`"),
        };
        self.m.reserve_exact(target.wrapping_sub(old_cap));
        let old_root = self.freelist_root;
        // the new root is the first new entry, and each new entry points to the next
        for i in (old_cap + 2)..=target {
            self.m.push(Free(inx_from(i)));
        }
        self.m.push(Free(old_root.unwrap_or(inx_from(target))));
        self.freelist_root = Some(inx_from(old_cap + 1));
    }

    /// Inserts `t` and returns a `Ptr` to it, doubling the capacity if there
    /// are no free entries
    pub fn insert(&mut self, t: T) -> P {
        let inx = match self.freelist_root {
            Some(inx) => inx,
            None => {
                self.reserve(self.m.len().max(1));
                match self.freelist_root {
                    Some(inx) => inx,
                    None => unreachable!(),
                }
            }
        };
        let gen = self.gen;
        let next = match self.m_get_mut(inx).map(|entry| mem::replace(entry, Allocated(gen, t))) {
            Some(Free(next)) => next,
            _ => unreachable!(),
        };
        self.freelist_root = if next == inx { None } else { Some(next) };
        self.len += 1;
        P::_from_raw(inx, gen)
    }

    /// Inserts the `T` returned by `create`, which is given the `Ptr` that
    /// will be returned
    pub fn insert_with<F: FnOnce(P) -> T>(&mut self, create: F) -> P {
        if self.freelist_root.is_none() {
            self.reserve(self.m.len().max(1));
        }
        let inx = match self.freelist_root {
            Some(inx) => inx,
            None => unreachable!(),
        };
        let t = create(P::_from_raw(inx, self.gen));
        self.insert(t)
    }

    pub fn contains(&self, p: P) -> bool {
        matches!(self.m_get(p.inx()), Some(Allocated(gen, _)) if *gen == p.gen())
    }

    pub fn get(&self, p: P) -> Option<&T> {
        match self.m_get(p.inx()) {
            Some(Allocated(gen, t)) if *gen == p.gen() => Some(t),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, p: P) -> Option<&mut T> {
        match self.m_get_mut(p.inx()) {
            Some(Allocated(gen, t)) if *gen == p.gen() => Some(t),
            _ => None,
        }
    }

    /// Like [Arena::get], except generation counters are ignored and the
    /// existing generation is returned
    pub fn get_ignore_gen(&self, inx: Inx) -> Option<(Gen, &T)> {
        match self.m_get(inx) {
            Some(Allocated(gen, t)) => Some((*gen, t)),
            _ => None,
        }
    }

    /// Returns the full `Ptr` of the entry at `inx`
    ///
    /// # Panics
    ///
    /// If `inx` is unallocated
    pub fn ptr_unwrap(&self, inx: Inx) -> P {
        match self.m_get(inx) {
            Some(Allocated(gen, _)) => P::_from_raw(inx, *gen),
            _ => panic!("ptr_unwrap of unallocated entry"),
        }
    }

    /// Like [Arena::get], except generation counters are ignored and the
    /// result is unwrapped internally
    pub fn get_inx_unwrap(&self, inx: Inx) -> &T {
        match self.m_get(inx) {
            Some(Allocated(_, t)) => t,
            _ => panic!("get_inx_unwrap of unallocated entry"),
        }
    }

    /// Like [Arena::get_mut], except generation counters are ignored and the
    /// result is unwrapped internally
    pub fn get_inx_mut_unwrap(&mut self, inx: Inx) -> &mut T {
        match self.m_get_mut(inx) {
            Some(Allocated(_, t)) => t,
            _ => panic!("get_inx_mut_unwrap of unallocated entry"),
        }
    }

    /// Removes the `T` pointed to by `p`, returns it, and invalidates old
    /// `Ptr`s to it. Does no invalidation and returns `None` if `p` is
    /// invalid.
    pub fn remove(&mut self, p: P) -> Option<T> {
        if !self.contains(p) {
            return None
        }
        Some(self.remove_inx_unwrap(p.inx()))
    }

    /// Like [Arena::remove], except generation counters are ignored
    ///
    /// # Panics
    ///
    /// If `inx` is unallocated
    pub fn remove_inx_unwrap(&mut self, inx: Inx) -> T {
        // the new root is the entry we remove
        let next_free = self.freelist_root.unwrap_or(inx);
        let old = match self.m_get_mut(inx) {
            Some(entry) if matches!(entry, Allocated(..)) => mem::replace(entry, Free(next_free)),
            _ => panic!("remove_inx_unwrap of unallocated entry"),
        };
        self.freelist_root = Some(inx);
        self.len -= 1;
        self.inc_gen();
        match old {
            Allocated(_, t) => t,
            Free(_) => unreachable!(),
        }
    }

    /// Drops all `T` and invalidates all pointers previously created from the
    /// arena. This has no effect on allocated capacity.
    pub fn clear(&mut self) {
        let cap = self.m.len();
        self.m.clear();
        self.len = 0;
        self.freelist_root = None;
        self.reserve(cap);
        self.inc_gen();
    }

    /// Performs an [Arena::clear] and resets capacity to 0
    pub fn clear_and_shrink(&mut self) {
        self.m = Vec::new();
        self.len = 0;
        self.freelist_root = None;
        self.inc_gen();
    }

    /// Mutable iteration over the allocated `T`s in storage order
    pub fn vals_mut(&mut self) -> impl Iterator<Item = (Inx, &mut T)> {
        self.m
            .iter_mut()
            .enumerate()
            .filter_map(|(i, entry)| match entry {
                Allocated(_, t) => Some((inx_from(i + 1), t)),
                Free(_) => None,
            })
    }
}

#[inline]
fn inx_from(i: usize) -> Inx {
    match Inx::new(i) {
        Some(inx) => inx,
        None => unreachable!(),
    }
}

impl<P: Ptr, T: Clone> Clone for Arena<P, T> {
    /// `Ptr`s to the original arena are initially valid on the clone
    fn clone(&self) -> Self {
        Self {
            m: self.m.clone(),
            len: self.len,
            freelist_root: self.freelist_root,
            gen: self.gen,
            _boo: PhantomData,
        }
    }
}

impl<P: Ptr, T: fmt::Debug> fmt::Debug for Arena<P, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.m.iter().enumerate().filter_map(|(i, entry)| match entry {
                Allocated(gen, t) => Some((P::_from_raw(inx_from(i + 1), *gen), t)),
                Free(_) => None,
            }))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ptr::PNode;

    #[test]
    fn freelist_reuse() {
        let mut a: Arena<PNode, &str> = Arena::new();
        let p0 = a.insert("a");
        let p1 = a.insert("b");
        let p2 = a.insert("c");
        assert_eq!(a.len(), 3);
        assert_eq!(a.gen.get(), 2);
        assert_eq!(a.remove(p1), Some("b"));
        assert_eq!(a.remove(p1), None);
        assert_eq!(a.gen.get(), 3);
        Arena::_check_invariants(&a).unwrap();
        // the freed entry is reused with the new generation
        let p3 = a.insert("d");
        assert_eq!(p3.inx(), p1.inx());
        assert_ne!(p3, p1);
        assert!(a.get(p1).is_none());
        assert_eq!(a.get(p3), Some(&"d"));
        assert_eq!(*a.get_inx_unwrap(p0.inx()), "a");
        assert_eq!(a.get_ignore_gen(p2.inx()), Some((p2.gen(), &"c")));
        Arena::_check_invariants(&a).unwrap();
        assert_eq!(
            format!("{a:?}"),
            "{PNode[1](2): \"a\", PNode[2](3): \"d\", PNode[3](2): \"c\"}"
        );
    }

    #[test]
    fn clear_keeps_capacity() {
        let mut a: Arena<PNode, u64> = Arena::new();
        let ptrs: Vec<PNode> = (0..10).map(|i| a.insert(i)).collect();
        let cap = a.capacity();
        assert!(cap >= 10);
        a.clear();
        Arena::_check_invariants(&a).unwrap();
        assert!(a.is_empty());
        assert_eq!(a.capacity(), cap);
        for p in ptrs {
            assert!(!a.contains(p));
        }
        let p = a.insert_with(|p| p.inx().get() as u64);
        assert_eq!(a.get(p), Some(&(p.inx().get() as u64)));
        a.clear_and_shrink();
        assert_eq!(a.capacity(), 0);
        Arena::_check_invariants(&a).unwrap();
    }

    #[test]
    fn reserve_chains_old_freelist() {
        let mut a: Arena<PNode, u8> = Arena::new();
        a.reserve(2);
        let p = a.insert(0);
        a.reserve(8);
        assert!(a.capacity() >= 9);
        Arena::_check_invariants(&a).unwrap();
        a.remove(p).unwrap();
        for i in 0..9 {
            a.insert(i);
        }
        assert_eq!(a.len(), 9);
        assert_eq!(a.capacity(), 9);
        Arena::_check_invariants(&a).unwrap();
    }
}
