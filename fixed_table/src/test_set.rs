#![allow(missing_docs)]
use std::hash::{BuildHasher, Hasher};

use super::*;

// Hashes every value to the same fixed value, forcing all values onto one probe chain.
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

// Equality and hashing only look at `id`, making insert vs replace observable via `tag`.
#[derive(Debug, Clone, Copy)]
struct Tagged {
    id: u32,
    tag: char,
}

impl PartialEq for Tagged {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Tagged {}

impl Hash for Tagged {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[test]
fn test_basic() {
    let mut set: FixedSet<String> = FixedSet::with_capacity(16);
    assert!(set.is_empty());
    assert_eq!(set.capacity(), 16);
    assert_eq!(set.insert("adam".into()), Ok(true));
    assert_eq!(set.insert("eve".into()), Ok(true));
    assert_eq!(set.insert("adam".into()), Ok(false));
    assert_eq!(set.len(), 2);

    assert!(set.contains("adam"));
    assert!(!set.contains("susan"));
    assert_eq!(set.get("eve"), Some(&"eve".to_string()));
    assert_eq!(set.get("susan"), None);

    assert!(set.remove("adam"));
    assert!(!set.remove("adam"));
    assert_eq!(set.take("eve"), Some("eve".to_string()));
    assert_eq!(set.take("eve"), None);
    assert!(set.is_empty());
    set.check();
}

#[test]
#[should_panic(expected = "capacity must be at least 1")]
fn test_zero_capacity() {
    FixedSet::<u32>::with_capacity(0);
}

#[test]
fn test_insert_keeps_existing_replace_swaps() {
    let mut set: FixedSet<Tagged> = FixedSet::with_capacity(8);
    assert_eq!(set.insert(Tagged { id: 1, tag: 'a' }), Ok(true));
    assert_eq!(set.insert(Tagged { id: 1, tag: 'b' }), Ok(false));
    let probe = Tagged { id: 1, tag: 'x' };
    assert_eq!(set.get(&probe).map(|value| value.tag), Some('a'));

    let replaced = set.replace(Tagged { id: 1, tag: 'b' }).unwrap();
    assert_eq!(replaced.map(|value| value.tag), Some('a'));
    assert_eq!(set.get(&probe).map(|value| value.tag), Some('b'));
    assert_eq!(set.len(), 1);

    assert_eq!(set.replace(Tagged { id: 2, tag: 'c' }), Ok(None));
    assert_eq!(set.len(), 2);
    set.check();
}

#[test]
fn test_removal_keeps_colliding_values_reachable() {
    let mut set = FixedSet::with_capacity_and_hasher(10, ConstHash(5));
    set.insert("a").unwrap();
    set.insert("b").unwrap();
    set.insert("c").unwrap();

    assert!(set.remove("b"));
    assert!(set.contains("a"));
    assert!(set.contains("c"));
    assert_eq!(set.load_factor(), 0.3);

    // the tombstoned slot is reused for the next colliding value
    set.insert("d").unwrap();
    assert_eq!(set.load_factor(), 0.3);
    assert!(set.contains("c"));
    assert!(set.contains("d"));
    set.check();
}

#[test]
fn test_full_set_rejects_new_values() {
    let mut set: FixedSet<u32> = FixedSet::with_capacity(2);
    set.insert(1).unwrap();
    set.insert(2).unwrap();
    assert!(set.is_full());

    assert_eq!(set.insert(3), Err(CapacityError(3)));
    // duplicates are still detected on a full set
    assert_eq!(set.insert(1), Ok(false));

    assert!(set.remove(&1));
    assert_eq!(set.load_factor(), 1.0);
    assert_eq!(set.insert(3), Err(CapacityError(3)));

    set.clear();
    assert_eq!(set.load_factor(), 0.0);
    assert_eq!(set.insert(3), Ok(true));
    set.check();
}

#[test]
fn test_equality_ignores_capacity_and_order() {
    let mut left: FixedSet<u32> = FixedSet::with_capacity(4);
    left.insert(1).unwrap();
    left.insert(2).unwrap();

    let mut right: FixedSet<u32> = FixedSet::with_capacity(64);
    right.insert(2).unwrap();
    right.insert(7).unwrap();
    right.insert(1).unwrap();
    assert_ne!(left, right);
    assert!(right.remove(&7));
    assert_eq!(left, right);

    assert!(right.remove(&2));
    assert_ne!(left, right);
}

#[test]
fn test_debug() {
    let mut set = FixedSet::with_capacity_and_hasher(4, ConstHash(0));
    assert_eq!(format!("{set:?}"), "{}");
    set.insert(1).unwrap();
    set.insert(2).unwrap();
    assert_eq!(format!("{set:?}"), "{1, 2}");
}

#[test]
fn test_retain() {
    let mut set: FixedSet<u32> = FixedSet::with_capacity(16);
    for value in 0..10u32 {
        set.insert(value).unwrap();
    }
    let load_before = set.load_factor();
    set.retain(|value| value % 2 == 0);
    assert_eq!(set.len(), 5);
    assert_eq!(set.load_factor(), load_before);
    let mut values: Vec<u32> = set.iter().copied().collect();
    values.sort();
    assert_eq!(values, [0, 2, 4, 6, 8]);
    set.check();
}

#[test]
fn test_from_values() {
    let set: FixedSet<u32> = FixedSet::from_values([1, 2, 2, 3]);
    assert_eq!(set.capacity(), 40);
    assert_eq!(set.len(), 3);
    assert!(set.contains(&2));

    let empty: FixedSet<u32> = FixedSet::from_values([]);
    assert_eq!(empty.capacity(), 1);
    assert!(empty.is_empty());

    let set: FixedSet<u32> = (0..5).collect();
    assert_eq!(set.capacity(), 50);
    assert_eq!(set.len(), 5);

    let result = FixedSet::<u32>::from_values_with_capacity([1, 2, 3], 2);
    assert_eq!(result.unwrap_err(), CapacityError(3));
}

#[test]
fn test_iterators() {
    let mut set: FixedSet<u32> = FixedSet::with_capacity(16);
    for value in 0..5u32 {
        set.insert(value).unwrap();
    }
    assert_eq!(set.iter().len(), 5);

    let mut values: Vec<u32> = (&set).into_iter().copied().collect();
    values.sort();
    assert_eq!(values, [0, 1, 2, 3, 4]);

    let mut owned: Vec<u32> = set.into_iter().collect();
    owned.sort();
    assert_eq!(owned, [0, 1, 2, 3, 4]);
}
