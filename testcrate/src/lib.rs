use std::{cell::Cell, cmp::Ordering, collections::BTreeSet};

use rand_xoshiro::{rand_core::RngCore, Xoshiro128StarStar};

thread_local!(static CMP_COUNT: Cell<u64> = const { Cell::new(0) });

/// Returns the number of `CKey` comparisons made on this thread so far
pub fn get_cmp_count() -> u64 {
    CMP_COUNT.with(|c| c.get())
}

pub fn reset_cmp_count() {
    CMP_COUNT.with(|c| c.set(0))
}

/// A key that counts how many times it is compared
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CKey {
    pub k: u64,
}

impl PartialOrd for CKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CKey {
    fn cmp(&self, other: &Self) -> Ordering {
        CMP_COUNT.with(|c| c.set(c.get() + 1));
        self.k.cmp(&other.k)
    }
}

/// An instruction of a randomized workload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inst {
    /// Insert a key that is not present
    Insert(u64),
    /// Remove the live key at this index of the list of live keys, with the
    /// list kept in insertion order except for `swap_remove`s
    Remove(usize),
}

/// Makes a workload that inserts `fill` keys, then makes `2 * fill` random
/// insertions and removals, then drains everything
pub fn workload(rng: &mut Xoshiro128StarStar, fill: usize) -> Vec<Inst> {
    let mut insts = vec![];
    let mut used = BTreeSet::new();
    let mut live = 0usize;
    let mut new_key = |rng: &mut Xoshiro128StarStar| loop {
        let k = rng.next_u64();
        if used.insert(k) {
            break k
        }
    };
    for _ in 0..fill {
        insts.push(Inst::Insert(new_key(rng)));
        live += 1;
    }
    for _ in 0..(2 * fill) {
        if (live == 0) || ((rng.next_u32() % 2) == 0) {
            insts.push(Inst::Insert(new_key(rng)));
            live += 1;
        } else {
            insts.push(Inst::Remove(rng.next_u32() as usize % live));
            live -= 1;
        }
    }
    while live != 0 {
        insts.push(Inst::Remove(rng.next_u32() as usize % live));
        live -= 1;
    }
    insts
}
