#![allow(missing_docs)]
use super::*;

#[test]
fn test_basic() {
    let mut table: FixedTable<u64> = FixedTable::with_capacity(8);
    assert_eq!(table.len(), 0);
    assert!(table.is_empty());
    assert!(!table.is_full());
    assert_eq!(table.capacity(), 8);
    assert_eq!(table.tombstones(), 0);
    assert_eq!(table.find(1, |&found| found == 10), None);

    for value in [10u64, 20, 30] {
        let (entry, rejected) = table.insert(value / 10, value, |a, b| a == b).unwrap();
        assert_eq!(*entry, value);
        assert!(rejected.is_none());
    }
    assert_eq!(table.len(), 3);
    assert!(!table.is_empty());
    assert_eq!(table.find(2, |&found| found == 20), Some(&20));
    assert_eq!(table.find(2, |&found| found == 25), None);
    assert_eq!(table.find_mut(3, |&found| found == 30), Some(&mut 30));
    table.check();
}

#[test]
#[should_panic(expected = "capacity must be at least 1")]
fn test_zero_capacity() {
    FixedTable::<u64>::with_capacity(0);
}

#[test]
fn test_colliding_entries() {
    let mut table: FixedTable<&str> = FixedTable::with_capacity(10);
    table.insert(3, "first", |a, b| a == b).unwrap();
    table.insert(3, "second", |a, b| a == b).unwrap();
    assert_eq!(table.find(3, |&found| found == "first"), Some(&"first"));
    assert_eq!(table.find(3, |&found| found == "second"), Some(&"second"));
    assert_eq!(table.len(), 2);
    table.check();
}

#[test]
fn test_insert_existing() {
    let mut table: FixedTable<(u64, u64)> = FixedTable::with_capacity(4);
    table.insert(7, (7, 1), |a, b| a.0 == b.0).unwrap();
    let (entry, rejected) = table.insert(7, (7, 2), |a, b| a.0 == b.0).unwrap();
    assert_eq!(rejected, Some((7, 2)));
    assert_eq!(*entry, (7, 1));
    entry.1 = 3;
    assert_eq!(table.find(7, |found| found.0 == 7), Some(&(7, 3)));
    assert_eq!(table.len(), 1);
    table.check();
}

#[test]
fn test_remove_keeps_chain_reachable() {
    let mut table: FixedTable<&str> = FixedTable::with_capacity(10);
    table.insert(5, "a", |a, b| a == b).unwrap();
    table.insert(5, "b", |a, b| a == b).unwrap();
    table.insert(5, "c", |a, b| a == b).unwrap();

    assert_eq!(table.remove(5, |&found| found == "b"), Some("b"));
    assert_eq!(table.tombstones(), 1);
    assert_eq!(table.find(5, |&found| found == "c"), Some(&"c"));
    assert_eq!(table.find(5, |&found| found == "b"), None);
    assert_eq!(table.remove(5, |&found| found == "b"), None);
    assert_eq!(table.len(), 2);
    table.check();
}

#[test]
fn test_insert_reuses_tombstone() {
    let mut table: FixedTable<&str> = FixedTable::with_capacity(10);
    table.insert(5, "a", |a, b| a == b).unwrap();
    table.insert(5, "b", |a, b| a == b).unwrap();
    table.insert(5, "c", |a, b| a == b).unwrap();
    assert_eq!(table.remove(5, |&found| found == "b"), Some("b"));

    table.insert(5, "d", |a, b| a == b).unwrap();
    assert_eq!(table.tombstones(), 0);
    assert_eq!(table.len(), 3);
    for value in ["a", "c", "d"] {
        assert_eq!(table.find(5, |&found| found == value), Some(&value));
    }
    table.check();
}

#[test]
fn test_full_table_rejects_new_entries() {
    let mut table: FixedTable<u32> = FixedTable::with_capacity(3);
    for value in [1u32, 2, 3] {
        table.insert(2, value, |a, b| a == b).unwrap();
    }
    assert!(table.is_full());

    let Err(CapacityError(rejected)) = table.insert(2, 4, |a, b| a == b) else {
        panic!("insert into a full table succeeded");
    };
    assert_eq!(rejected, 4);
    assert_eq!(table.len(), 3);

    // entries placed by wraparound stay reachable
    for value in [1u32, 2, 3] {
        assert_eq!(table.find(2, |&found| found == value), Some(&value));
    }
    // replacing a present entry still works on a full table
    let (entry, rejected) = table.insert(2, 3, |a, b| a == b).unwrap();
    assert_eq!(*entry, 3);
    assert_eq!(rejected, Some(3));
    table.check();
}

#[test]
fn test_tombstones_block_new_entries_until_clear() {
    let mut table: FixedTable<u32> = FixedTable::with_capacity(2);
    table.insert(0, 1, |a, b| a == b).unwrap();
    table.insert(0, 2, |a, b| a == b).unwrap();
    assert_eq!(table.remove(0, |&found| found == 1), Some(1));
    assert_eq!(table.remove(0, |&found| found == 2), Some(2));

    assert!(table.is_empty());
    assert!(!table.is_full());
    assert_eq!(table.load_factor(), 1.0);
    assert!(table.insert(0, 3, |a, b| a == b).is_err());

    table.clear();
    assert_eq!(table.load_factor(), 0.0);
    table.insert(0, 3, |a, b| a == b).unwrap();
    table.insert(0, 4, |a, b| a == b).unwrap();
    table.check();
}

#[test]
fn test_capacity_one() {
    let mut table: FixedTable<u8> = FixedTable::with_capacity(1);
    table.insert(u64::MAX, 7, |a, b| a == b).unwrap();
    assert!(table.is_full());
    assert_eq!(table.find(u64::MAX, |&found| found == 7), Some(&7));
    assert!(table.insert(0, 8, |a, b| a == b).is_err());
    let (_, rejected) = table.insert(123, 7, |a, b| a == b).unwrap();
    assert_eq!(rejected, Some(7));
    table.check();
}

#[test]
fn test_load_factor_counts_tombstones() {
    let mut table: FixedTable<u32> = FixedTable::with_capacity(4);
    assert_eq!(table.load_factor(), 0.0);
    table.insert(0, 1, |a, b| a == b).unwrap();
    assert_eq!(table.load_factor(), 0.25);
    table.insert(1, 2, |a, b| a == b).unwrap();
    assert_eq!(table.load_factor(), 0.5);
    assert_eq!(table.remove(0, |&found| found == 1), Some(1));
    assert_eq!(table.load_factor(), 0.5);
    table.clear();
    assert_eq!(table.load_factor(), 0.0);
    table.check();
}

#[test]
fn test_iter() {
    let mut table: FixedTable<u64> = FixedTable::with_capacity(16);
    for value in 0..6u64 {
        table.insert(value * 31 % 16, value, |a, b| a == b).unwrap();
    }
    assert_eq!(table.remove(3 * 31 % 16, |&found| found == 3), Some(3));
    table.check();

    assert_eq!(table.iter().len(), 5);
    let mut seen: Vec<u64> = table.iter().copied().collect();
    seen.sort();
    assert_eq!(seen, [0, 1, 2, 4, 5]);

    for entry in table.iter_mut() {
        *entry += 100;
    }
    let mut seen: Vec<u64> = (&table).into_iter().copied().collect();
    seen.sort();
    assert_eq!(seen, [100, 101, 102, 104, 105]);

    let mut seen: Vec<u64> = table.into_iter().collect();
    seen.sort();
    assert_eq!(seen, [100, 101, 102, 104, 105]);
}

#[test]
fn test_retain() {
    let mut table: FixedTable<u32> = FixedTable::with_capacity(16);
    for value in 0..10u32 {
        table.insert(value as u64, value, |a, b| a == b).unwrap();
    }
    table.retain(|entry| *entry % 2 == 0);
    assert_eq!(table.len(), 5);
    assert_eq!(table.tombstones(), 5);
    let mut seen: Vec<u32> = table.iter().copied().collect();
    seen.sort();
    assert_eq!(seen, [0, 2, 4, 6, 8]);
    table.check();
}

#[test]
fn test_clone_is_independent() {
    let mut table: FixedTable<u32> = FixedTable::with_capacity(4);
    table.insert(1, 11, |a, b| a == b).unwrap();
    let mut copy = table.clone();
    assert_eq!(copy.remove(1, |&found| found == 11), Some(11));
    assert_eq!(table.find(1, |&found| found == 11), Some(&11));
    assert_eq!(copy.capacity(), 4);
    assert_eq!(copy.tombstones(), 1);
    copy.check();
    table.check();
}

#[test]
fn test_debug() {
    let mut table: FixedTable<u32> = FixedTable::with_capacity(4);
    assert_eq!(format!("{table:?}"), "{}");
    table.insert(1, 11, |a, b| a == b).unwrap();
    table.insert(2, 22, |a, b| a == b).unwrap();
    assert_eq!(format!("{table:?}"), "{11, 22}");
}

#[test]
fn test_error_formatting() {
    let error = CapacityError(42u32);
    assert_eq!(format!("{error:?}"), "CapacityError(..)");
    assert_eq!(error.to_string(), "table capacity exhausted");
    assert_eq!(error.0, 42);
}
