//! Fixed-capacity hash set and associated helper types.
use core::fmt;
use std::{
    borrow::Borrow,
    hash::{BuildHasher, Hash},
    mem::replace,
};

use crate::{
    fixed_table::{self, CapacityError, FixedTable},
    DefaultHashBuilder,
};

#[cfg(test)]
#[path = "test_set.rs"]
mod test_set;

/// Fixed-capacity hash set using open addressing with linear probing.
///
/// In `FixedSet<T, S>`, `T: Hash + Eq` is the element type and `S: BuildHasher` supplies the
/// hash function (`S` should usually be omitted, it then defaults to the deterministic
/// [`DefaultHashBuilder`]).
///
/// The set holds at most [`capacity`][Self::capacity] elements, as chosen at construction.
/// Inserting a new element into a set whose slots are used up fails with a [`CapacityError`]
/// instead of growing the table. Removed elements leave tombstones behind that keep counting
/// toward the used slots until [`clear`][Self::clear] is called.
///
/// Comparing sets with `==` compares the contained elements, ignoring capacity, insertion
/// order and tombstones.
#[derive(Clone)]
pub struct FixedSet<T, S = DefaultHashBuilder> {
    table: FixedTable<T>,
    build_hasher: S,
}

impl<T: fmt::Debug, S> fmt::Debug for FixedSet<T, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T, S: Default> FixedSet<T, S> {
    /// Returns an empty set with room for exactly `capacity` elements.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Self {
        FixedSet {
            table: FixedTable::with_capacity(capacity),
            build_hasher: S::default(),
        }
    }
}

impl<T, S> FixedSet<T, S> {
    /// Returns an empty set with the specified capacity and provided BuildHasher.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn with_capacity_and_hasher(capacity: usize, build_hasher: S) -> Self {
        FixedSet {
            table: FixedTable::with_capacity(capacity),
            build_hasher,
        }
    }

    /// Returns the number of elements the set contains.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` when the set is empty.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns `true` when every slot of the set holds an element.
    ///
    /// A set that is not full can still reject new elements when all slots not holding an
    /// element are tombstoned, see [`insert`][Self::insert].
    #[inline(always)]
    pub fn is_full(&self) -> bool {
        self.table.is_full()
    }

    /// Returns the number of elements the set can hold, as fixed at construction.
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Returns the fraction of slots in use, counting tombstoned slots.
    ///
    /// Removal does not lower the load factor, only [`clear`][Self::clear] resets it. An
    /// insertion of a new element fails exactly when the load factor is `1.0`.
    #[inline(always)]
    pub fn load_factor(&self) -> f64 {
        self.table.load_factor()
    }

    /// Returns a reference to the set's BuildHasher.
    #[inline(always)]
    pub fn hasher(&self) -> &S {
        &self.build_hasher
    }

    /// Removes all elements from the set, freeing tombstoned slots as well.
    ///
    /// The capacity is unchanged.
    #[inline(always)]
    pub fn clear(&mut self) {
        self.table.clear()
    }

    /// Returns an iterator over the elements of the set, in slot order.
    #[inline(always)]
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.table.iter(),
        }
    }
}

impl<T: Hash + Eq, S: BuildHasher> FixedSet<T, S> {
    /// Checks whether a given value is an element of the set.
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.build_hasher.hash_one(value);
        self.table
            .find(hash, |found| found.borrow() == value)
            .is_some()
    }

    /// Returns a reference to a given value of the set.
    pub fn get<Q>(&self, value: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.build_hasher.hash_one(value);
        self.table.find(hash, |found| found.borrow() == value)
    }

    /// Inserts a value into the set.
    ///
    /// If the value is already present, the given value is discarded and the set is not
    /// modified. Returns `Ok(true)` when a new element was inserted and `Ok(false)` when the
    /// value was already present.
    ///
    /// When the value is not present and no slot is available, the value is handed back as a
    /// [`CapacityError`] and the set is left unchanged.
    pub fn insert(&mut self, value: T) -> Result<bool, CapacityError<T>> {
        let hash = self.build_hasher.hash_one(&value);
        let (_, rejected) = self
            .table
            .insert(hash, value, |found, inserting| found == inserting)?;
        Ok(rejected.is_none())
    }

    /// Inserts a value into the set, replacing an existing equal value.
    ///
    /// If the value is already present, the already present value is removed from the set
    /// before inserting the new value and returned as `Ok(Some(old))`.
    ///
    /// When the value is not present and no slot is available, the value is handed back as a
    /// [`CapacityError`] and the set is left unchanged.
    pub fn replace(&mut self, value: T) -> Result<Option<T>, CapacityError<T>> {
        let hash = self.build_hasher.hash_one(&value);
        let (entry, rejected) = self
            .table
            .insert(hash, value, |found, inserting| found == inserting)?;
        Ok(rejected.map(|value| replace(entry, value)))
    }

    /// Removes a given value from the set.
    ///
    /// Returns `true` when the value was removed and `false` if the value was not present.
    pub fn remove<Q>(&mut self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.build_hasher.hash_one(value);
        self.table
            .remove(hash, |found| found.borrow() == value)
            .is_some()
    }

    /// Removes and returns a given value from the set.
    ///
    /// Returns `None` when the given value was not present.
    pub fn take<Q>(&mut self, value: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.build_hasher.hash_one(value);
        self.table.remove(hash, |found| found.borrow() == value)
    }

    /// Removes all elements for which `f` evaluates to `false`.
    ///
    /// The slots of removed elements are tombstoned, like for [`remove`][Self::remove].
    pub fn retain(&mut self, mut f: impl FnMut(&T) -> bool) {
        self.table.retain(|entry| f(entry));
    }

    #[cfg(test)]
    pub(crate) fn check(&self) {
        self.table.check();
        for value in self.iter() {
            let hash = self.build_hasher.hash_one(value);
            assert!(self.table.find(hash, |found| found == value).is_some());
        }
    }
}

impl<T: Hash + Eq, S: BuildHasher + Default> FixedSet<T, S> {
    /// Builds a set from the given values, sizing the table at ten times the number of values.
    ///
    /// Duplicate values are discarded like for repeated [`insert`][Self::insert] calls. The
    /// spare capacity keeps the set usable for further insertions; use
    /// [`from_values_with_capacity`][Self::from_values_with_capacity] to control the size
    /// exactly.
    pub fn from_values(values: impl IntoIterator<Item = T>) -> Self {
        let values: Vec<T> = values.into_iter().collect();
        let capacity = (values.len() * 10).max(1);
        let Ok(set) = Self::from_values_with_capacity(values, capacity) else {
            unreachable!()
        };
        set
    }

    /// Builds a set with the given capacity from the given values.
    ///
    /// Duplicate values are discarded like for repeated [`insert`][Self::insert] calls. When
    /// the values contain more distinct elements than `capacity`, the first rejected value is
    /// handed back as a [`CapacityError`].
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn from_values_with_capacity(
        values: impl IntoIterator<Item = T>,
        capacity: usize,
    ) -> Result<Self, CapacityError<T>> {
        let mut set = Self::with_capacity(capacity);
        for value in values {
            set.insert(value)?;
        }
        Ok(set)
    }
}

impl<T: Hash + Eq, S: BuildHasher> PartialEq for FixedSet<T, S> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|value| other.contains(value))
    }
}

impl<T: Hash + Eq, S: BuildHasher> Eq for FixedSet<T, S> {}

impl<T: Hash + Eq, S: BuildHasher + Default> FromIterator<T> for FixedSet<T, S> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_values(iter)
    }
}

/// An iterator over the elements of a [`FixedSet`].
///
/// This struct is created by the [`iter`](FixedSet::iter) method on [`FixedSet`].
pub struct Iter<'a, T> {
    inner: fixed_table::Iter<'a, T>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    #[inline(always)]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    #[inline(always)]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {
    #[inline(always)]
    fn len(&self) -> usize {
        self.inner.len()
    }
}

/// An iterator moving elements out of a [`FixedSet`].
///
/// This struct is created by the `into_iter` method on [`FixedSet`].
pub struct IntoIter<T> {
    inner: fixed_table::IntoIter<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    #[inline(always)]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    #[inline(always)]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {
    #[inline(always)]
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<T, S> IntoIterator for FixedSet<T, S> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.table.into_iter(),
        }
    }
}

impl<'a, T, S> IntoIterator for &'a FixedSet<T, S> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
