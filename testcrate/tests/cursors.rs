use cursor_tree::{Cursor, OrdBase, OrdMap, OrdSet};

#[test]
fn cursors_survive_other_removals() {
    let mut a = OrdMap::new();
    let mut cursors = vec![];
    for i in 0..1000u32 {
        // scrambled insertion order
        let k = (i * 7919) % 1000;
        cursors.push((a.insert((k, k * 2)).0, k));
    }
    OrdBase::_check_invariants(&*a).unwrap();
    // erase every even key through its own cursor
    for (c, k) in &cursors {
        if (k % 2) == 0 {
            a.erase(*c);
        }
    }
    OrdBase::_check_invariants(&*a).unwrap();
    assert_eq!(a.len(), 500);
    for (c, k) in &cursors {
        if (k % 2) == 0 {
            assert!(!a.contains_cursor(*c));
            assert_eq!(a.get_at(*c), None);
        } else {
            assert_eq!(a.get_at(*c), Some((k, &(k * 2))));
            // neighbors are now 2 apart
            if *k != 999 {
                assert_eq!(a.key_at(a.next(*c)), Some(&(k + 2)));
            }
        }
    }
    // reinserting does not revive stale cursors
    for (c, k) in &cursors {
        if (k % 2) == 0 {
            let (new, inserted) = a.emplace(*k, 0);
            assert!(inserted);
            assert_ne!(new, *c);
            assert!(!a.contains_cursor(*c));
        }
    }
    OrdBase::_check_invariants(&*a).unwrap();
}

#[test]
fn walk_both_ways() {
    let set: OrdSet<i64> = (-50..50).map(|i| i * 3).collect();
    let mut c = set.begin();
    let mut expected = -150;
    while !c.is_end() {
        assert_eq!(set.get_at(c), Some(&expected));
        expected += 3;
        c = set.next(c);
    }
    assert_eq!(expected, 150);
    assert_eq!(c, set.end());
    // `prev` from the end wraps to the greatest entry, `prev` from the least
    // entry reaches the end
    c = set.prev(c);
    assert_eq!(set.get_at(c), Some(&147));
    let mut count = 0;
    while !c.is_end() {
        count += 1;
        c = set.prev(c);
    }
    assert_eq!(count, 100);
    assert_eq!(set.rend(), set.end());
}

#[test]
fn advance_clamps_at_end() {
    let set: OrdSet<u8> = (0..10).collect();
    let c = set.find(&5);
    assert_eq!(set.get_at(set.advance(c, 0)), Some(&5));
    assert_eq!(set.get_at(set.advance(c, 4)), Some(&9));
    assert!(set.advance(c, 5).is_end());
    assert!(set.advance(c, 100).is_end());
    assert_eq!(set.get_at(set.advance(c, -5)), Some(&0));
    assert!(set.advance(c, -6).is_end());
    assert!(set.advance(set.end(), 3).is_end());
    assert!(set.advance(set.end(), -3).is_end());
}

#[test]
fn foreign_cursors() {
    let a: OrdSet<u8> = (0..4).collect();
    let b: OrdSet<u8> = (0..4).collect();
    let c = a.find(&2);
    // same keys in the same order, but a different container
    assert!(!b.contains_cursor(c));
    assert_eq!(b.get_at(c), None);
    assert!(b.next(c).is_end());
    assert_ne!(a.end(), b.end());
    let ca = a.clone();
    assert!(!ca.contains_cursor(c));
    assert_eq!(ca.get_at(ca.find(&2)), Some(&2));
}

#[test]
fn erase_range_and_iteration() {
    let mut a: OrdMap<u16, ()> = (0..100).map(|i| (i, ())).collect();
    let first = a.lower_bound(&10);
    let last = a.upper_bound(&89);
    let keys: Vec<u16> = a.range(first, last).map(|(k, _)| *k).collect();
    assert_eq!(keys, (10..90).collect::<Vec<_>>());
    assert_eq!(a.erase_range(first, last), last);
    assert_eq!(a.len(), 20);
    assert_eq!(a.key_at(last), Some(&90));
    assert_eq!(a.key_at(a.prev(last)), Some(&9));
    // erasing up to the end
    let from = a.find(&95);
    let end = a.end();
    assert!(a.erase_range(from, end).is_end());
    assert_eq!(a.keys().copied().collect::<Vec<_>>(), [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 90, 91, 92, 93, 94]);
    OrdBase::_check_invariants(&*a).unwrap();
}

#[test]
fn cursor_debug() {
    let mut set = OrdSet::new();
    let c: Cursor = set.insert('a').0;
    assert_eq!(format!("{:?}", set.end()), "Cursor(end)");
    assert!(format!("{c:?}").starts_with("Cursor(PSeq["));
}

#[test]
fn identities_across_threads() {
    let handles: Vec<_> = (0..4)
        .map(|_| std::thread::spawn(|| (0..4).collect::<OrdSet<u8>>()))
        .collect();
    let sets: Vec<OrdSet<u8>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    for (i, a) in sets.iter().enumerate() {
        let c = a.find(&2);
        for (j, b) in sets.iter().enumerate() {
            assert_eq!(b.contains_cursor(c), i == j);
            assert_eq!(a.end() == b.end(), i == j);
        }
    }
}
