use compare::{natural, Compare};
use cursor_tree::{Error, OrdBase, OrdMap, OrdSet};
use rand_xoshiro::{
    rand_core::{RngCore, SeedableRng},
    Xoshiro128StarStar,
};

#[test]
fn set_scenario() {
    let mut set = OrdSet::new();
    for k in [5, 3, 8, 1, 4] {
        assert!(set.insert(k).1);
    }
    assert_eq!(set.iter().copied().collect::<Vec<_>>(), [1, 3, 4, 5, 8]);
    let c = set.find(&3);
    let next = set.erase(c);
    assert_eq!(set.get_at(next), Some(&4));
    assert_eq!(set.iter().copied().collect::<Vec<_>>(), [1, 4, 5, 8]);
    assert_eq!(set.count(&3), 0);
    assert_eq!(set.get_at(set.lower_bound(&4)), Some(&4));
    assert_eq!(set.get_at(set.upper_bound(&4)), Some(&5));
    assert_eq!(set.get_at(set.lower_bound(&2)), Some(&4));
    assert!(set.lower_bound(&9).is_end());
    // rejected insertions point at the existing key
    let (c, inserted) = set.insert(5);
    assert!(!inserted);
    assert_eq!(c, set.find(&5));
    assert_eq!(set.len(), 4);
}

#[test]
fn map_upsert() {
    let mut map = OrdMap::new();
    let (c0, inserted) = map.insert_or_assign("a", 1);
    assert!(inserted);
    let (c1, inserted) = map.insert_or_assign("a", 2);
    assert!(!inserted);
    assert_eq!(c0, c1);
    assert_eq!(map.get(&"a"), Ok(&2));
    assert_eq!(map.len(), 1);
    // `insert` and `emplace` never overwrite
    let (_, inserted) = map.insert(("a", 3));
    assert!(!inserted);
    assert_eq!(map[&"a"], 2);
    let c = map.set("b", 4);
    assert_eq!(map.get_at(c), Some((&"b", &4)));
    let hint = map.begin();
    let c = map.insert_or_assign_with_hint(hint, "b", 5);
    assert_eq!(map.value_at(c), Some(&5));
    assert_eq!(map.extract(&"b"), Ok(("b", 5)));
    assert_eq!(map.extract(&"b"), Err(Error::NotFound { op: "extract" }));
    assert_eq!(
        map.get(&"z").unwrap_err().to_string(),
        "key not found by `get`"
    );
}

#[test]
fn hints_do_not_change_results() {
    let mut rng = Xoshiro128StarStar::seed_from_u64(0);
    let mut plain = OrdMap::new();
    let mut hinted = OrdMap::new();
    let mut cursors = vec![];
    for i in 0..2000u64 {
        let k = rng.next_u64() % 1000;
        let (_, inserted) = plain.emplace(k, i);
        let hint = match rng.next_u32() % 3 {
            0 => hinted.end(),
            1 if !cursors.is_empty() => cursors[rng.next_u32() as usize % cursors.len()],
            // a cursor to a nearby key is the best case
            _ => hinted.lower_bound(&k),
        };
        let (c, inserted_hinted) = hinted.emplace_hint(hint, k, i);
        assert_eq!(inserted, inserted_hinted);
        assert_eq!(hinted.key_at(c), Some(&k));
        cursors.push(c);
        if (i % 5) == 0 {
            let c = cursors.swap_remove(rng.next_u32() as usize % cursors.len());
            if let Some(k) = hinted.key_at(c).copied() {
                hinted.erase(c);
                plain.erase_key(&k);
            }
        }
    }
    assert_eq!(plain, hinted);
    OrdBase::_check_invariants(&*hinted).unwrap();
}

#[test]
fn sorted_runs() {
    let mut a = OrdSet::with_capacity(64);
    assert!(a.capacity() >= 64);
    a.insert_range(0..32u32);
    a.insert_range((32..64).rev());
    a.extend([10, 70, 65]);
    assert_eq!(a.len(), 66);
    assert!(a.iter().copied().eq((0..64).chain([65, 70])));
    let hint = a.find(&65);
    let c = a.insert_with_hint(hint, 66);
    assert_eq!(a.get_at(c), Some(&66));
    let (_, inserted) = a.emplace_hint(hint, 66);
    assert!(!inserted);
    OrdBase::_check_invariants(&*a).unwrap();
}

#[test]
fn extract_keeps_other_entries() {
    let mut set: OrdSet<u32> = (0..100).collect();
    for k in (0..100).step_by(3) {
        assert_eq!(set.extract(&k), Ok(k));
        assert!(!set.contains(&k));
    }
    assert_eq!(set.len(), 66);
    let c = set.find(&1);
    let (next, k) = set.extract_at(c);
    assert_eq!(k, Some(1));
    assert_eq!(set.get_at(next), Some(&2));
    let end = set.end();
    assert_eq!(set.extract_at(end), (end, None));
    assert!(set.iter().all(|k| (k % 3) != 0));
    OrdBase::_check_invariants(&*set).unwrap();
}

#[test]
fn merge_moves_absent_keys() {
    let mut a: OrdMap<u32, char> = (0..20).step_by(2).map(|k| (k, 'a')).collect();
    let mut b: OrdMap<u32, char> = (0..20).step_by(3).map(|k| (k, 'b')).collect();
    a.merge(&mut b);
    OrdBase::_check_invariants(&*a).unwrap();
    OrdBase::_check_invariants(&*b).unwrap();
    // `a` has the union with its own values kept
    for k in 0..20 {
        let expected = if (k % 2) == 0 {
            Some(&'a')
        } else if (k % 3) == 0 {
            Some(&'b')
        } else {
            None
        };
        assert_eq!(a.get(&k).ok(), expected);
    }
    // `b` has exactly the colliding keys
    assert_eq!(b.keys().copied().collect::<Vec<_>>(), [0, 6, 12, 18]);
    assert!(b.values().all(|v| *v == 'b'));

    let mut s0: OrdSet<u8> = OrdSet::new();
    let mut s1: OrdSet<u8> = (0..10).collect();
    s0.merge(&mut s1);
    assert!(s1.is_empty());
    assert_eq!(s0.len(), 10);
}

#[test]
fn custom_comparators() {
    // descending through the comparator combinators of `compare`
    let mut desc = OrdSet::with_cmp(natural::<i32>().rev());
    desc.insert_range([3, 1, 4, 1, 5, 9, 2, 6]);
    assert_eq!(desc.iter().copied().collect::<Vec<_>>(), [9, 6, 5, 4, 3, 2, 1]);
    assert_eq!(desc.get_at(desc.lower_bound(&7)), Some(&6));

    // case insensitive keys through a strict weak ordering predicate
    let mut map =
        OrdMap::with_less(|a: &String, b: &String| a.to_lowercase() < b.to_lowercase());
    map.insert(("Beta".to_owned(), 1));
    map.insert(("alpha".to_owned(), 2));
    assert!(!map.insert(("BETA".to_owned(), 3)).1);
    assert_eq!(map.get(&"beta".to_owned()), Ok(&1));
    assert_eq!(
        map.keys().cloned().collect::<Vec<_>>(),
        ["alpha".to_owned(), "Beta".to_owned()]
    );
    assert_eq!(format!("{map:?}"), r#"{"alpha": 2, "Beta": 1}"#);
}

#[test]
fn clear_and_capacity() {
    let mut a: OrdSet<u64> = (0..100).collect();
    let cap = a.capacity();
    assert!(cap >= 100);
    let c = a.begin();
    a.clear();
    assert!(a.is_empty());
    assert_eq!(a.capacity(), cap);
    assert!(!a.contains_cursor(c));
    a.insert(5);
    assert!(!a.contains_cursor(c));
    a.clear_and_shrink();
    assert_eq!(a.capacity(), 0);
    a.reserve(10);
    assert!(a.capacity() >= 10);
    assert_eq!(a.first(), None);
    assert_eq!(a, OrdSet::default());
}
