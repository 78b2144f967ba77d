//! Fixed-capacity hash map and associated helper types.
use core::fmt;
use std::{
    borrow::Borrow,
    hash::{BuildHasher, Hash},
    mem,
};

use crate::{
    fixed_table::{self, CapacityError, FixedTable},
    DefaultHashBuilder,
};

#[cfg(test)]
#[path = "test_map.rs"]
mod test_map;

#[derive(Clone)]
struct MapEntry<K, V> {
    key: K,
    value: V,
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for MapEntry<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {:?}", self.key, self.value)
    }
}

/// Fixed-capacity hash map using open addressing with linear probing.
///
/// In `FixedMap<K, V, S>`, `K: Hash + Eq` is the key type, `V` is the value type and
/// `S: BuildHasher` supplies the hash function (`S` should usually be omitted, it then defaults
/// to the deterministic [`DefaultHashBuilder`]).
///
/// The map holds at most [`capacity`][Self::capacity] entries, as chosen at construction.
/// Inserting a new key into a map whose slots are used up fails with a [`CapacityError`]
/// instead of growing the table, while updates of present keys always succeed. Removed entries
/// leave tombstones behind that keep counting toward the used slots until
/// [`clear`][Self::clear] is called, so a long insert and remove churn can exhaust a map that
/// holds few entries.
///
/// Comparing maps with `==` compares the contained key-value pairs, ignoring capacity,
/// insertion order and tombstones.
#[derive(Clone)]
pub struct FixedMap<K, V, S = DefaultHashBuilder> {
    table: FixedTable<MapEntry<K, V>>,
    build_hasher: S,
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for FixedMap<K, V, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, S: Default> FixedMap<K, V, S> {
    /// Returns an empty map with room for exactly `capacity` entries.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    ///
    /// # Examples
    ///
    /// ```should_panic
    /// # use fixed_table::FixedMap;
    /// // a map needs at least one slot
    /// FixedMap::<u32, u32>::with_capacity(0);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        FixedMap {
            table: FixedTable::with_capacity(capacity),
            build_hasher: S::default(),
        }
    }
}

impl<K, V, S> FixedMap<K, V, S> {
    /// Returns an empty map with the specified capacity and provided BuildHasher.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn with_capacity_and_hasher(capacity: usize, build_hasher: S) -> Self {
        FixedMap {
            table: FixedTable::with_capacity(capacity),
            build_hasher,
        }
    }

    /// Returns the number of entries in the map.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the map is empty.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns `true` when every slot of the map holds an entry.
    ///
    /// A map that is not full can still reject new keys when all slots not holding an entry
    /// are tombstoned, see [`insert`][Self::insert].
    #[inline(always)]
    pub fn is_full(&self) -> bool {
        self.table.is_full()
    }

    /// Returns the number of entries the map can hold, as fixed at construction.
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Returns the fraction of slots in use, counting tombstoned slots.
    ///
    /// Removal does not lower the load factor, only [`clear`][Self::clear] resets it. An
    /// insertion of a new key fails exactly when the load factor is `1.0`.
    #[inline(always)]
    pub fn load_factor(&self) -> f64 {
        self.table.load_factor()
    }

    /// Returns a reference to the map's BuildHasher.
    #[inline(always)]
    pub fn hasher(&self) -> &S {
        &self.build_hasher
    }

    /// Removes all entries from the map, freeing tombstoned slots as well.
    ///
    /// The capacity is unchanged.
    #[inline(always)]
    pub fn clear(&mut self) {
        self.table.clear()
    }

    /// Returns an iterator over all key-value pairs, in slot order.
    #[inline(always)]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Returns an iterator over all keys.
    #[inline(always)]
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys {
            inner: self.table.iter(),
        }
    }

    /// Returns an iterator over all values.
    #[inline(always)]
    pub fn values(&self) -> Values<'_, K, V> {
        Values {
            inner: self.table.iter(),
        }
    }

    /// Returns an iterator over all values, allowing mutation.
    #[inline(always)]
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut {
            inner: self.table.iter_mut(),
        }
    }

    /// Returns an iterator over all key-value pairs, allowing mutation of values.
    #[inline(always)]
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            inner: self.table.iter_mut(),
        }
    }

    /// Returns a snapshot of all key-value pairs as a fresh vector.
    ///
    /// The snapshot is independent of the map: neither later map updates nor mutation of the
    /// vector affect the other. The pairs follow the slot order, which is not otherwise
    /// meaningful.
    pub fn pairs(&self) -> Vec<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        self.iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> FixedMap<K, V, S> {
    /// Returns `true` if the map contains an entry for the given key.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.build_hasher.hash_one(key);
        self.table
            .find(hash, |found| found.key.borrow() == key)
            .is_some()
    }

    /// Returns a reference to the value corresponding to the given key.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get_key_value(key).map(|(_, value)| value)
    }

    /// Returns a reference to the key-value pair corresponding to the given key.
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.build_hasher.hash_one(key);
        self.table
            .find(hash, |found| found.key.borrow() == key)
            .map(|entry| (&entry.key, &entry.value))
    }

    /// Returns a reference to the value corresponding to the given key, or the provided
    /// default when the key is absent.
    pub fn get_or<'a, Q>(&'a self, key: &Q, default: &'a V) -> &'a V
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get(key).unwrap_or(default)
    }

    /// Returns a mutable reference to the value corresponding to the given key.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.build_hasher.hash_one(key);
        self.table
            .find_mut(hash, |found| found.key.borrow() == key)
            .map(|entry| &mut entry.value)
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the map did have this key present, the value is updated and the old value is
    /// returned as `Ok(Some(old))`. The key is not updated, though; this matters for types
    /// that can be `==` without being identical. Updates succeed on any map, including a full
    /// one.
    ///
    /// If the map did not have this key present and a slot is available, the pair is inserted
    /// and `Ok(None)` is returned. When no slot is available, the pair is handed back as a
    /// [`CapacityError`] and the map is left unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use fixed_table::FixedMap;
    ///
    /// let mut map: FixedMap<&str, u32> = FixedMap::with_capacity(2);
    /// assert_eq!(map.insert("a", 1), Ok(None));
    /// assert_eq!(map.insert("b", 2), Ok(None));
    ///
    /// // the map is full now, updates still succeed while new keys are rejected
    /// assert_eq!(map.insert("a", 10), Ok(Some(1)));
    /// let Err(err) = map.insert("c", 3) else { unreachable!() };
    /// assert_eq!(err.0, ("c", 3));
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Result<Option<V>, CapacityError<(K, V)>> {
        let hash = self.build_hasher.hash_one(&key);
        match self.table.insert(hash, MapEntry { key, value }, |found, inserting| {
            found.key == inserting.key
        }) {
            Ok((entry, rejected)) => {
                Ok(rejected.map(|MapEntry { value, .. }| mem::replace(&mut entry.value, value)))
            }
            Err(CapacityError(MapEntry { key, value })) => Err(CapacityError((key, value))),
        }
    }

    /// Removes a key from the map, returning the value at the key if the key was previously in
    /// the map.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.remove_entry(key).map(|(_, value)| value)
    }

    /// Removes a key from the map, returning the stored key and value if the key was
    /// previously in the map.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.build_hasher.hash_one(key);
        self.table
            .remove(hash, |found| found.key.borrow() == key)
            .map(|entry| (entry.key, entry.value))
    }

    /// Removes all entries for which `f` evaluates to `false`.
    ///
    /// `f` may mutate the values. The slots of removed entries are tombstoned, like for
    /// [`remove`][Self::remove].
    pub fn retain(&mut self, mut f: impl FnMut(&K, &mut V) -> bool) {
        self.table.retain(|entry| f(&entry.key, &mut entry.value));
    }

    #[cfg(test)]
    pub(crate) fn check(&self) {
        self.table.check();
        for (key, _) in self.iter() {
            let hash = self.build_hasher.hash_one(key);
            assert!(self.table.find(hash, |found| &found.key == key).is_some());
        }
    }
}

impl<K: Hash + Eq, V, S: BuildHasher + Default> FixedMap<K, V, S> {
    /// Builds a map from the given key-value pairs, sizing the table at ten times the number
    /// of pairs.
    ///
    /// Pairs are inserted in order, so a later pair overwrites the value stored for an earlier
    /// equal key. The spare capacity keeps the map usable for further insertions; use
    /// [`from_pairs_with_capacity`][Self::from_pairs_with_capacity] to control the size
    /// exactly.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (K, V)>) -> Self {
        let pairs: Vec<(K, V)> = pairs.into_iter().collect();
        let capacity = (pairs.len() * 10).max(1);
        let Ok(map) = Self::from_pairs_with_capacity(pairs, capacity) else {
            unreachable!()
        };
        map
    }

    /// Builds a map with the given capacity from the given key-value pairs.
    ///
    /// Pairs are inserted in order, so a later pair overwrites the value stored for an earlier
    /// equal key. When the pairs contain more distinct keys than `capacity`, the first
    /// rejected pair is handed back as a [`CapacityError`].
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn from_pairs_with_capacity(
        pairs: impl IntoIterator<Item = (K, V)>,
        capacity: usize,
    ) -> Result<Self, CapacityError<(K, V)>> {
        let mut map = Self::with_capacity(capacity);
        for (key, value) in pairs {
            map.insert(key, value)?;
        }
        Ok(map)
    }
}

impl<K: Hash + Eq, V: PartialEq, S: BuildHasher> PartialEq for FixedMap<K, V, S> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(key, value)| other.get(key) == Some(value))
    }
}

impl<K: Hash + Eq, V: Eq, S: BuildHasher> Eq for FixedMap<K, V, S> {}

impl<K, Q, V, S> std::ops::Index<&Q> for FixedMap<K, V, S>
where
    K: Hash + Eq + Borrow<Q>,
    Q: Hash + Eq + ?Sized,
    S: BuildHasher,
{
    type Output = V;

    fn index(&self, index: &Q) -> &Self::Output {
        self.get(index).expect("no entry found for key")
    }
}

impl<K: Hash + Eq, V, S: BuildHasher + Default> FromIterator<(K, V)> for FixedMap<K, V, S> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}

/// An iterator over the entries of a [`FixedMap`].
///
/// This struct is created by the [`iter`](FixedMap::iter) method on [`FixedMap`].
pub struct Iter<'a, K, V> {
    inner: fixed_table::Iter<'a, MapEntry<K, V>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[inline(always)]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|entry| (&entry.key, &entry.value))
    }

    #[inline(always)]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {
    #[inline(always)]
    fn len(&self) -> usize {
        self.inner.len()
    }
}

/// An iterator over the keys of a [`FixedMap`].
///
/// This struct is created by the [`keys`](FixedMap::keys) method on [`FixedMap`].
pub struct Keys<'a, K, V> {
    inner: fixed_table::Iter<'a, MapEntry<K, V>>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    #[inline(always)]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|entry| &entry.key)
    }

    #[inline(always)]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {
    #[inline(always)]
    fn len(&self) -> usize {
        self.inner.len()
    }
}

/// An iterator over the values of a [`FixedMap`].
///
/// This struct is created by the [`values`](FixedMap::values) method on [`FixedMap`].
pub struct Values<'a, K, V> {
    inner: fixed_table::Iter<'a, MapEntry<K, V>>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    #[inline(always)]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|entry| &entry.value)
    }

    #[inline(always)]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {
    #[inline(always)]
    fn len(&self) -> usize {
        self.inner.len()
    }
}

/// An iterator over the values of a [`FixedMap`], allowing mutation.
///
/// This struct is created by the [`values_mut`](FixedMap::values_mut) method on [`FixedMap`].
pub struct ValuesMut<'a, K, V> {
    inner: fixed_table::IterMut<'a, MapEntry<K, V>>,
}

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;

    #[inline(always)]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|entry| &mut entry.value)
    }

    #[inline(always)]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for ValuesMut<'_, K, V> {
    #[inline(always)]
    fn len(&self) -> usize {
        self.inner.len()
    }
}

/// An iterator over the entries of a [`FixedMap`], allowing mutation of values.
///
/// This struct is created by the [`iter_mut`](FixedMap::iter_mut) method on [`FixedMap`].
pub struct IterMut<'a, K, V> {
    inner: fixed_table::IterMut<'a, MapEntry<K, V>>,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    #[inline(always)]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|entry| (&entry.key, &mut entry.value))
    }

    #[inline(always)]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {
    #[inline(always)]
    fn len(&self) -> usize {
        self.inner.len()
    }
}

/// An iterator moving entries out of a [`FixedMap`].
///
/// This struct is created by the `into_iter` method on [`FixedMap`].
pub struct IntoIter<K, V> {
    inner: fixed_table::IntoIter<MapEntry<K, V>>,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    #[inline(always)]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|entry| (entry.key, entry.value))
    }

    #[inline(always)]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {
    #[inline(always)]
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V, S> IntoIterator for FixedMap<K, V, S> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.table.into_iter(),
        }
    }
}

impl<'a, K, V, S> IntoIterator for &'a FixedMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, S> IntoIterator for &'a mut FixedMap<K, V, S> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
