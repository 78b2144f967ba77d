#![allow(missing_docs)] // test only
use std::{fmt::Debug, hash::Hash};

use fixed_table::{CapacityError, DefaultHashBuilder, FixedMap, FixedSet};
use hashbrown::{HashMap, HashSet};
use rand::prelude::*;

struct CheckedMap<K, V> {
    dut: FixedMap<K, V>,
    ref_map: HashMap<K, V, DefaultHashBuilder>,
}

impl<K: Hash + Eq + Clone + Debug, V: Eq + Clone + Debug> CheckedMap<K, V> {
    fn with_capacity(capacity: usize) -> Self {
        CheckedMap {
            dut: FixedMap::with_capacity(capacity),
            ref_map: HashMap::default(),
        }
    }
    fn len(&self) -> usize {
        self.ref_map.len()
    }
    fn insert(&mut self, key: K, value: V) -> Result<Option<V>, CapacityError<(K, V)>> {
        let result = self.dut.insert(key.clone(), value.clone());
        match &result {
            Ok(replaced) => {
                let ref_replaced = self.ref_map.insert(key, value);
                assert_eq!(replaced, &ref_replaced);
            }
            Err(CapacityError(rejected)) => {
                // a failed insertion implies the key is absent and no slot is left empty
                assert!(!self.ref_map.contains_key(&key));
                assert_eq!(self.dut.load_factor(), 1.0);
                assert_eq!(rejected, &(key, value));
            }
        }
        result
    }
    fn get(&self, key: &K) -> Option<&V> {
        let result = self.dut.get(key);
        assert_eq!(result, self.ref_map.get(key));
        result
    }
    fn get_or<'a>(&'a self, key: &K, default: &'a V) -> &'a V {
        let result = self.dut.get_or(key, default);
        assert_eq!(result, self.ref_map.get(key).unwrap_or(default));
        result
    }
    fn get_mut(&mut self, key: &K) -> Option<(&mut V, &mut V)> {
        match (self.dut.get_mut(key), self.ref_map.get_mut(key)) {
            (None, None) => None,
            (Some(dut_value), Some(ref_value)) => {
                assert_eq!(dut_value, ref_value);
                Some((dut_value, ref_value))
            }
            _ => panic!(),
        }
    }
    fn contains_key(&self, key: &K) -> bool {
        let result = self.dut.contains_key(key);
        assert_eq!(result, self.ref_map.contains_key(key));
        result
    }
    fn remove(&mut self, key: &K) -> Option<V> {
        let result = self.dut.remove(key);
        assert_eq!(result, self.ref_map.remove(key));
        result
    }
    fn retain(&mut self, f: impl Fn(&K, &mut V) -> bool) {
        let load_factor = self.dut.load_factor();
        self.dut.retain(&f);
        self.ref_map.retain(|k, v| f(k, v));
        // retaining tombstones the failures, it never frees slots
        assert_eq!(self.dut.load_factor(), load_factor);
        self.check();
    }
    fn clear(&mut self) {
        self.dut.clear();
        self.ref_map.clear();
        assert_eq!(self.dut.load_factor(), 0.0);
    }
    fn check(&self) {
        assert_eq!(self.dut.len(), self.ref_map.len());
        assert_eq!(self.dut.is_empty(), self.ref_map.is_empty());
        assert!(self.dut.load_factor() <= 1.0);
        for (key, value) in &self.ref_map {
            assert_eq!(self.dut.get(key), Some(value));
        }
        for (key, value) in self.dut.iter() {
            assert_eq!(self.ref_map.get(key), Some(value));
        }
    }
    /// NB: `random_likelihood` is **not** a probability. `random_likelihood == 2.0` would be 2:1 odds random:present, i.e. 2/3 probability.
    fn present_or_random_key<R: Rng + SeedableRng>(
        &self,
        random_likelihood: f64,
        rng: &mut R,
        mut rand_k: impl FnMut(&mut R) -> K,
    ) -> K {
        debug_assert!(random_likelihood >= 0.0);
        if self.len() == 0 || rng.gen_range(0.0..1.0 + random_likelihood) >= 1.0 {
            rand_k(rng)
        } else {
            self.ref_map.iter().choose(rng).unwrap().0.clone()
        }
    }
}

struct CheckedSet<T> {
    dut: FixedSet<T>,
    ref_set: HashSet<T, DefaultHashBuilder>,
}

impl<T: Hash + Eq + Clone + Debug> CheckedSet<T> {
    fn with_capacity(capacity: usize) -> Self {
        CheckedSet {
            dut: FixedSet::with_capacity(capacity),
            ref_set: HashSet::default(),
        }
    }
    fn len(&self) -> usize {
        self.ref_set.len()
    }
    fn insert(&mut self, value: T) -> Result<bool, CapacityError<T>> {
        let result = self.dut.insert(value.clone());
        match &result {
            Ok(inserted) => {
                assert_eq!(*inserted, self.ref_set.insert(value));
            }
            Err(CapacityError(rejected)) => {
                assert!(!self.ref_set.contains(&value));
                assert_eq!(self.dut.load_factor(), 1.0);
                assert_eq!(rejected, &value);
            }
        }
        result
    }
    fn replace(&mut self, value: T) -> Result<Option<T>, CapacityError<T>> {
        let result = self.dut.replace(value.clone());
        match &result {
            Ok(replaced) => {
                assert_eq!(replaced, &self.ref_set.replace(value));
            }
            Err(CapacityError(rejected)) => {
                assert!(!self.ref_set.contains(&value));
                assert_eq!(self.dut.load_factor(), 1.0);
                assert_eq!(rejected, &value);
            }
        }
        result
    }
    fn contains(&self, value: &T) -> bool {
        let result = self.dut.contains(value);
        assert_eq!(result, self.ref_set.contains(value));
        result
    }
    fn remove(&mut self, value: &T) -> bool {
        let result = self.dut.remove(value);
        assert_eq!(result, self.ref_set.remove(value));
        result
    }
    fn take(&mut self, value: &T) -> Option<T> {
        let result = self.dut.take(value);
        assert_eq!(result, self.ref_set.take(value));
        result
    }
    fn retain(&mut self, f: impl Fn(&T) -> bool) {
        let load_factor = self.dut.load_factor();
        self.dut.retain(&f);
        self.ref_set.retain(|value| f(value));
        assert_eq!(self.dut.load_factor(), load_factor);
        self.check();
    }
    fn clear(&mut self) {
        self.dut.clear();
        self.ref_set.clear();
        assert_eq!(self.dut.load_factor(), 0.0);
    }
    fn check(&self) {
        assert_eq!(self.dut.len(), self.ref_set.len());
        assert!(self.dut.load_factor() <= 1.0);
        for value in &self.ref_set {
            assert_eq!(self.dut.get(value), Some(value));
        }
        for value in self.dut.iter() {
            assert!(self.ref_set.contains(value));
        }
    }
    fn present_or_random_value<R: Rng + SeedableRng>(
        &self,
        random_likelihood: f64,
        rng: &mut R,
        mut rand_t: impl FnMut(&mut R) -> T,
    ) -> T {
        debug_assert!(random_likelihood >= 0.0);
        if self.len() == 0 || rng.gen_range(0.0..1.0 + random_likelihood) >= 1.0 {
            rand_t(rng)
        } else {
            self.ref_set.iter().choose(rng).unwrap().clone()
        }
    }
}

macro_rules! weighted_choose {
    ($rng:expr, $($name:ident: $weight:expr => $body:expr),+) => {
        {
            enum Branches { $( $name,  )* }
            let weights = [$((Branches::$name, $weight)),+];
            match weights.choose_weighted($rng, |x| x.1).unwrap().0 {
                $(Branches::$name => $body),*
            }
        }
    }
}

fn map_test_suite<K, V, R>(
    capacity: usize,
    mut rand_k: impl FnMut(&mut R) -> K,
    mut rand_v: impl FnMut(&mut R) -> V,
    retain_fn: impl Fn(&K, &mut V) -> bool,
) where
    K: Hash + Eq + Clone + Debug,
    V: Eq + Clone + Debug,
    R: Rng + SeedableRng,
{
    let mut map: CheckedMap<K, V> = CheckedMap::with_capacity(capacity);
    let mut rng = R::seed_from_u64(39);
    let mut max_size = 0;
    let mut rejections = 0;
    let verbosity = 1;
    for _ in 0..5000 {
        weighted_choose! {&mut rng,
            Insert: 2.0 => {
                let k = map.present_or_random_key(6.0, &mut rng, &mut rand_k);
                let v = rand_v(&mut rng);
                let result = map.insert(k.clone(), v.clone());
                if result.is_err() {
                    rejections += 1;
                }
                if verbosity > 0 {
                    println!("inserting {k:?}: {v:?} -> {result:?}");
                }
            },
            Get: 0.5 => {
                let k = map.present_or_random_key(1.0, &mut rng, &mut rand_k);
                let result = map.get(&k);
                if verbosity > 0 {
                    println!("getting {k:?} -> {result:?}");
                }
            },
            GetOr: 0.2 => {
                let k = map.present_or_random_key(1.0, &mut rng, &mut rand_k);
                let default = rand_v(&mut rng);
                let result = map.get_or(&k, &default);
                if verbosity > 0 {
                    println!("get_or {k:?} -> {result:?}");
                }
            },
            GetMut: 0.3 => {
                let k = map.present_or_random_key(1.0, &mut rng, &mut rand_k);
                let v = rand_v(&mut rng);
                let updated = if let Some((dut_value, ref_value)) = map.get_mut(&k) {
                    *dut_value = v.clone();
                    *ref_value = v;
                    true
                } else {
                    false
                };
                if verbosity > 0 {
                    println!("get_mut {k:?} -> {updated:?}");
                }
            },
            Contains: 0.3 => {
                let k = map.present_or_random_key(1.0, &mut rng, &mut rand_k);
                let result = map.contains_key(&k);
                if verbosity > 0 {
                    println!("contains {k:?} -> {result:?}");
                }
            },
            Remove: 0.5 => {
                let k = map.present_or_random_key(1.0, &mut rng, &mut rand_k);
                let result = map.remove(&k);
                if verbosity > 0 {
                    println!("removing {k:?} -> {result:?}");
                }
            },
            Retain: 0.05 => {
                let old_len = map.len();
                map.retain(&retain_fn);
                let new_len = map.len();
                if verbosity > 0 {
                    println!("retaining, {old_len} -> {new_len}");
                }
            },
            Clear: 0.02 => {
                map.clear();
                if verbosity > 0 {
                    println!("clearing");
                }
            },
            Check: 0.15 => {
                map.check();
            }
        };
        max_size = std::cmp::max(max_size, map.len());
    }
    map.check();
    assert!(max_size > capacity / 2);
    assert!(rejections > 0);
    println!("max size {max_size}, rejections {rejections}");
}

fn set_test_suite<T, R>(
    capacity: usize,
    mut rand_t: impl FnMut(&mut R) -> T,
    retain_fn: impl Fn(&T) -> bool,
) where
    T: Hash + Eq + Clone + Debug,
    R: Rng + SeedableRng,
{
    let mut set: CheckedSet<T> = CheckedSet::with_capacity(capacity);
    let mut rng = R::seed_from_u64(41);
    let mut max_size = 0;
    let mut rejections = 0;
    let verbosity = 1;
    for _ in 0..5000 {
        weighted_choose! {&mut rng,
            Insert: 2.0 => {
                let value = set.present_or_random_value(6.0, &mut rng, &mut rand_t);
                let result = set.insert(value.clone());
                if result.is_err() {
                    rejections += 1;
                }
                if verbosity > 0 {
                    println!("inserting {value:?} -> {result:?}");
                }
            },
            Replace: 0.3 => {
                let value = set.present_or_random_value(1.0, &mut rng, &mut rand_t);
                let result = set.replace(value.clone());
                if verbosity > 0 {
                    println!("replacing {value:?} -> {result:?}");
                }
            },
            Contains: 0.5 => {
                let value = set.present_or_random_value(1.0, &mut rng, &mut rand_t);
                let result = set.contains(&value);
                if verbosity > 0 {
                    println!("contains {value:?} -> {result:?}");
                }
            },
            Remove: 0.5 => {
                let value = set.present_or_random_value(1.0, &mut rng, &mut rand_t);
                let result = set.remove(&value);
                if verbosity > 0 {
                    println!("removing {value:?} -> {result:?}");
                }
            },
            Take: 0.3 => {
                let value = set.present_or_random_value(1.0, &mut rng, &mut rand_t);
                let result = set.take(&value);
                if verbosity > 0 {
                    println!("taking {value:?} -> {result:?}");
                }
            },
            Retain: 0.05 => {
                let old_len = set.len();
                set.retain(&retain_fn);
                let new_len = set.len();
                if verbosity > 0 {
                    println!("retaining, {old_len} -> {new_len}");
                }
            },
            Clear: 0.02 => {
                set.clear();
                if verbosity > 0 {
                    println!("clearing");
                }
            },
            Check: 0.15 => {
                set.check();
            }
        };
        max_size = std::cmp::max(max_size, set.len());
    }
    set.check();
    assert!(max_size > capacity / 2);
    assert!(rejections > 0);
    println!("max size {max_size}, rejections {rejections}");
}

#[test]
fn test_map_suite_usize_usize() {
    map_test_suite::<usize, usize, rand_pcg::Pcg64>(
        48,
        |rng| rng.gen::<usize>() >> rng.gen_range(0..usize::BITS),
        |rng| rng.gen(),
        |k, v| {
            *v = v.wrapping_add(3);
            k % 7 < 6
        },
    );
}

#[test]
fn test_map_suite_string_u64() {
    map_test_suite::<String, u64, rand_pcg::Pcg64>(
        31,
        |rng| {
            let len = rng.gen_range(4..16);
            String::from_iter((0..len).map(|_| rng.gen_range('!'..'~')))
        },
        |rng| rng.gen(),
        |k: &String, v| {
            *v = (*v).wrapping_add(3);
            !k.contains('!')
        },
    );
}

#[test]
fn test_set_suite_usize() {
    set_test_suite::<usize, rand_pcg::Pcg64>(
        48,
        |rng| rng.gen::<usize>() >> rng.gen_range(0..usize::BITS),
        |value| value % 7 < 6,
    );
}

#[test]
fn test_set_suite_string() {
    set_test_suite::<String, rand_pcg::Pcg64>(
        31,
        |rng| {
            let len = rng.gen_range(4..16);
            String::from_iter((0..len).map(|_| rng.gen_range('!'..'~')))
        },
        |value| !value.contains('!'),
    );
}

fn dedup_vec<K: Hash + Eq + Clone, V>(vec: &mut Vec<(K, V)>) {
    let mut seen = std::collections::HashSet::new();
    vec.retain(|item| seen.insert(item.0.clone()));
}

#[test]
fn test_equality_across_capacities() {
    let mut rng = rand_pcg::Pcg64::seed_from_u64(10);
    let mut pairs: Vec<(u32, u64)> = (0..25).map(|_| (rng.gen(), rng.gen())).collect();
    dedup_vec(&mut pairs);

    let small: FixedMap<u32, u64> =
        FixedMap::from_pairs_with_capacity(pairs.iter().copied(), 31).unwrap();
    pairs.shuffle(&mut rng);
    let large: FixedMap<u32, u64> =
        FixedMap::from_pairs_with_capacity(pairs.iter().copied(), 97).unwrap();
    assert_ne!(small.capacity(), large.capacity());
    assert_eq!(small, large);

    let mut small_pairs = small.pairs();
    small_pairs.sort();
    let mut expected = pairs.clone();
    expected.sort();
    assert_eq!(small_pairs, expected);
}

#[test]
fn test_retain_matches_reference() {
    let mut rng = rand_pcg::Pcg64::seed_from_u64(11);
    let mut in_data: Vec<(u32, u64)> = (0..300).map(|_| (rng.gen(), rng.gen())).collect();
    dedup_vec(&mut in_data);
    let mut map: FixedMap<u32, u64> =
        FixedMap::from_pairs_with_capacity(in_data.iter().copied(), 400).unwrap();
    map.retain(|key, value| (*key as u64).wrapping_add(*value) % 7 == 4);
    let mut out_data = in_data.clone();
    out_data.retain(|&(key, value)| (key as u64).wrapping_add(value) % 7 == 4);
    let mut pairs = map.pairs();
    pairs.sort();
    out_data.sort();
    assert_eq!(pairs, out_data);
}
