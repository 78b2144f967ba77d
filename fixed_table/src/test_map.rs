#![allow(missing_docs)]
use std::hash::{BuildHasher, Hasher};

use super::*;

// Hashes every key to the same fixed value, forcing all keys onto one probe chain.
struct ConstHash(u64);

impl BuildHasher for ConstHash {
    type Hasher = ConstHasher;

    fn build_hasher(&self) -> ConstHasher {
        ConstHasher(self.0)
    }
}

struct ConstHasher(u64);

impl Hasher for ConstHasher {
    fn finish(&self) -> u64 {
        self.0
    }

    fn write(&mut self, _bytes: &[u8]) {}
}

#[test]
fn test_basic() {
    let mut map: FixedMap<String, usize> = FixedMap::with_capacity(16);
    assert!(map.is_empty());
    assert_eq!(map.capacity(), 16);
    assert_eq!(map.insert("adam".into(), 10), Ok(None));
    assert_eq!(map.insert("eve".into(), 25), Ok(None));
    assert_eq!(map.insert("mallory".into(), 8), Ok(None));
    assert_eq!(map.insert("jim".into(), 14), Ok(None));
    assert_eq!(map.len(), 4);

    assert_eq!(map.get("adam"), Some(&10));
    assert_eq!(map.get("susan"), None);
    assert!(map.contains_key("eve"));
    assert!(!map.contains_key("susan"));
    assert_eq!(map.get_key_value("jim"), Some((&"jim".to_string(), &14)));

    assert_eq!(map.insert("jim".into(), 15), Ok(Some(14)));
    assert_eq!(map.len(), 4);
    assert_eq!(map.get("jim"), Some(&15));

    assert_eq!(map.remove("eve"), Some(25));
    assert_eq!(map.get("eve"), None);
    assert_eq!(map.remove("eve"), None);
    assert_eq!(map.len(), 3);
    map.check();
}

#[test]
#[should_panic(expected = "capacity must be at least 1")]
fn test_zero_capacity() {
    FixedMap::<u32, u32>::with_capacity(0);
}

#[test]
fn test_get_or() {
    let mut map: FixedMap<&str, u32> = FixedMap::with_capacity(8);
    map.insert("hits", 3).unwrap();
    assert_eq!(map.get_or("hits", &0), &3);
    assert_eq!(map.get_or("misses", &0), &0);
}

#[test]
fn test_get_mut() {
    let mut map: FixedMap<&str, u32> = FixedMap::with_capacity(8);
    map.insert("count", 1).unwrap();
    *map.get_mut("count").unwrap() += 1;
    assert_eq!(map.get("count"), Some(&2));
    assert_eq!(map.get_mut("missing"), None);
}

#[test]
fn test_colliding_keys() {
    let mut map = FixedMap::with_capacity_and_hasher(10, ConstHash(3));
    map.insert("cat", 1).unwrap();
    map.insert("dog", 2).unwrap();
    assert_eq!(map.get("cat"), Some(&1));
    assert_eq!(map.get("dog"), Some(&2));
    assert_eq!(map.len(), 2);
    map.check();
}

#[test]
fn test_removal_keeps_colliding_keys_reachable() {
    let mut map = FixedMap::with_capacity_and_hasher(10, ConstHash(5));
    map.insert("a", 1).unwrap();
    map.insert("b", 2).unwrap();
    map.insert("c", 3).unwrap();

    assert_eq!(map.remove("b"), Some(2));
    assert_eq!(map.get("c"), Some(&3));
    assert_eq!(map.get("a"), Some(&1));
    assert_eq!(map.get("b"), None);
    assert_eq!(map.load_factor(), 0.3);

    // the tombstoned slot is reused for the next colliding key
    map.insert("d", 4).unwrap();
    assert_eq!(map.load_factor(), 0.3);
    assert_eq!(map.get("c"), Some(&3));
    assert_eq!(map.get("d"), Some(&4));
    map.check();
}

#[test]
fn test_full_map_rejects_new_keys() {
    let mut map = FixedMap::with_capacity_and_hasher(3, ConstHash(2));
    map.insert('a', 1).unwrap();
    map.insert('b', 2).unwrap();
    map.insert('c', 3).unwrap();
    assert!(map.is_full());
    assert_eq!(map.load_factor(), 1.0);

    assert_eq!(map.insert('d', 4), Err(CapacityError(('d', 4))));
    assert_eq!(map.len(), 3);
    for (key, value) in [('a', 1), ('b', 2), ('c', 3)] {
        assert_eq!(map.get(&key), Some(&value));
    }
    // updating a present key succeeds on a full map
    assert_eq!(map.insert('a', 10), Ok(Some(1)));
    assert_eq!(map.get(&'a'), Some(&10));
    map.check();
}

#[test]
fn test_churn_exhausts_capacity_until_clear() {
    let mut map: FixedMap<u32, u32> = FixedMap::with_capacity(4);
    for key in 0..4u32 {
        assert_eq!(map.insert(key, key), Ok(None));
    }
    for key in 0..4u32 {
        assert_eq!(map.remove(&key), Some(key));
    }
    assert!(map.is_empty());
    assert_eq!(map.load_factor(), 1.0);
    assert_eq!(map.insert(9, 9), Err(CapacityError((9, 9))));

    map.clear();
    assert_eq!(map.load_factor(), 0.0);
    assert_eq!(map.insert(9, 9), Ok(None));
    map.check();
}

#[test]
fn test_equality_ignores_capacity_and_order() {
    let mut left: FixedMap<u32, &str> = FixedMap::with_capacity(4);
    left.insert(1, "one").unwrap();
    left.insert(2, "two").unwrap();

    let mut right: FixedMap<u32, &str> = FixedMap::with_capacity(64);
    right.insert(2, "two").unwrap();
    right.insert(7, "seven").unwrap();
    right.insert(1, "one").unwrap();
    assert_ne!(left, right);
    assert_eq!(right.remove(&7), Some("seven"));
    assert_eq!(left, right);

    right.insert(1, "uno").unwrap();
    assert_ne!(left, right);
    right.insert(1, "one").unwrap();
    assert_eq!(left, right);
    assert_eq!(right.remove(&2), Some("two"));
    assert_ne!(left, right);
}

#[test]
fn test_debug() {
    let mut map = FixedMap::with_capacity_and_hasher(4, ConstHash(0));
    assert_eq!(format!("{map:?}"), "{}");
    map.insert(1, 2).unwrap();
    assert_eq!(format!("{map:?}"), "{1: 2}");
    map.insert(3, 4).unwrap();
    assert_eq!(format!("{map:?}"), "{1: 2, 3: 4}");
}

#[test]
fn test_index() {
    let mut map: FixedMap<&str, u32> = FixedMap::with_capacity(8);
    map.insert("a", 1).unwrap();
    assert_eq!(map["a"], 1);
}

#[test]
#[should_panic(expected = "no entry found for key")]
fn test_index_missing_key() {
    let map: FixedMap<&str, u32> = FixedMap::with_capacity(8);
    let _ = map["b"];
}

#[test]
fn test_from_pairs() {
    let map: FixedMap<&str, u32> = FixedMap::from_pairs([("a", 1), ("b", 2), ("a", 3)]);
    assert_eq!(map.capacity(), 30);
    assert_eq!(map.len(), 2);
    assert_eq!(map.get("a"), Some(&3));
    assert_eq!(map.get("b"), Some(&2));

    let empty: FixedMap<&str, u32> = FixedMap::from_pairs([]);
    assert_eq!(empty.capacity(), 1);
    assert!(empty.is_empty());

    let map: FixedMap<u32, u32> = [(1, 1), (2, 2)].into_iter().collect();
    assert_eq!(map.capacity(), 20);
    assert_eq!(map.len(), 2);
}

#[test]
fn test_from_pairs_with_capacity() {
    let map = FixedMap::<u32, u32>::from_pairs_with_capacity([(1, 10), (2, 20)], 2).unwrap();
    assert!(map.is_full());
    assert_eq!(map.get(&1), Some(&10));

    let result = FixedMap::<u32, u32>::from_pairs_with_capacity([(1, 10), (2, 20), (3, 30)], 2);
    assert_eq!(result.unwrap_err(), CapacityError((3, 30)));
}

#[test]
fn test_pairs_snapshot() {
    let mut map: FixedMap<u32, u32> = FixedMap::with_capacity(8);
    map.insert(1, 10).unwrap();
    map.insert(2, 20).unwrap();
    let mut pairs = map.pairs();
    pairs.sort();
    assert_eq!(pairs, [(1, 10), (2, 20)]);

    // the snapshot is detached from the map
    map.insert(1, 99).unwrap();
    assert_eq!(pairs, [(1, 10), (2, 20)]);
}

#[test]
fn test_iterators() {
    let mut map: FixedMap<u32, u32> = FixedMap::with_capacity(16);
    for key in 0..5u32 {
        map.insert(key, key * 10).unwrap();
    }
    assert_eq!(map.iter().len(), 5);
    assert_eq!(map.keys().len(), 5);

    let mut keys: Vec<u32> = map.keys().copied().collect();
    keys.sort();
    assert_eq!(keys, [0, 1, 2, 3, 4]);

    let mut values: Vec<u32> = map.values().copied().collect();
    values.sort();
    assert_eq!(values, [0, 10, 20, 30, 40]);

    for value in map.values_mut() {
        *value += 1;
    }
    for (key, value) in map.iter_mut() {
        *value += *key;
    }
    let mut pairs: Vec<(u32, u32)> = map.iter().map(|(&k, &v)| (k, v)).collect();
    pairs.sort();
    assert_eq!(pairs, [(0, 1), (1, 12), (2, 23), (3, 34), (4, 45)]);

    let mut owned: Vec<(u32, u32)> = map.into_iter().collect();
    owned.sort();
    assert_eq!(owned, [(0, 1), (1, 12), (2, 23), (3, 34), (4, 45)]);
}

#[test]
fn test_retain() {
    let mut map: FixedMap<u32, u32> = FixedMap::with_capacity(16);
    for key in 0..10u32 {
        map.insert(key, key).unwrap();
    }
    let load_before = map.load_factor();
    map.retain(|key, value| {
        *value += 1;
        key % 3 == 0
    });
    assert_eq!(map.len(), 4);
    assert_eq!(map.load_factor(), load_before);
    let mut pairs = map.pairs();
    pairs.sort();
    assert_eq!(pairs, [(0, 1), (3, 4), (6, 7), (9, 10)]);
    map.check();
}

#[test]
fn test_clone_is_independent() {
    let mut map: FixedMap<String, u32> = FixedMap::with_capacity(8);
    map.insert("a".into(), 1).unwrap();
    let mut copy = map.clone();
    assert_eq!(copy, map);
    copy.insert("b".into(), 2).unwrap();
    assert_ne!(copy, map);
    assert_eq!(map.len(), 1);
}
