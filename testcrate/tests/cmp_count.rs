use cursor_tree::{Cursor, OrdBase, OrdMap};
use rand_xoshiro::{rand_core::SeedableRng, Xoshiro128StarStar};
use testcrate::{get_cmp_count, reset_cmp_count, workload, CKey, Inst};

const N: u64 = 1 << 10;

#[test]
fn hinted_sorted_insertion() {
    reset_cmp_count();
    let mut a = OrdMap::new();
    a.insert_range((0..N).map(|k| (CKey { k }, ())));
    // the previous insertion is always the exact neighbor, and the first
    // insertion into an empty map compares nothing
    assert_eq!(get_cmp_count(), N - 1);
    let hinted = get_cmp_count();

    reset_cmp_count();
    let mut b = OrdMap::new();
    for k in 0..N {
        b.insert((CKey { k }, ()));
    }
    let from_root = get_cmp_count();
    assert!(from_root > (2 * hinted));
    assert_eq!(a, b);
}

#[test]
fn search_depth_is_logarithmic() {
    let mut rng = Xoshiro128StarStar::seed_from_u64(0);
    let mut a = OrdMap::new();
    let mut live: Vec<(Cursor, u64)> = vec![];
    let mut max_len = 0;
    for inst in workload(&mut rng, N as usize) {
        match inst {
            Inst::Insert(k) => {
                let (c, inserted) = a.insert((CKey { k }, k));
                assert!(inserted);
                live.push((c, k));
            }
            Inst::Remove(i) => {
                let (c, k) = live.swap_remove(i);
                assert_eq!(a.extract_at(c).1, Some((CKey { k }, k)));
            }
        }
        max_len = max_len.max(a.len());
        if (a.len() % 64) == 0 {
            OrdBase::_check_invariants(&*a).unwrap();
        }
    }
    assert!(a.is_empty());
    assert!(max_len >= (N as usize));

    // rebuild and check that every lookup is within the height bound of
    // `2 * log2(len)` plus the final comparison
    for k in 0..N {
        a.insert((CKey { k: k * 2 }, k));
    }
    let bound = 2 * u64::from(N.ilog2() + 1) + 1;
    for k in 0..(2 * N) {
        reset_cmp_count();
        let found = a.contains_key(&CKey { k });
        assert_eq!(found, (k % 2) == 0);
        assert!(get_cmp_count() <= bound);
    }
}

#[test]
fn cursor_steps_do_not_compare() {
    let mut a = OrdMap::new();
    for k in 0..N {
        a.insert((CKey { k }, ()));
    }
    reset_cmp_count();
    let mut c = a.begin();
    let mut steps = 0;
    while !c.is_end() {
        c = a.next(c);
        steps += 1;
    }
    assert_eq!(steps, N);
    assert_eq!(a.iter().count(), N as usize);
    let c = a.find(&CKey { k: 0 });
    let before = get_cmp_count();
    a.erase(c);
    // erasing through a cursor needs no search
    assert_eq!(get_cmp_count(), before);
}
