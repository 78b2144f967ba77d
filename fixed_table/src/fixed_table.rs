//! Fixed-capacity low-level hash table with explicit hashing and associated helper types.
use core::fmt;
use std::mem::replace;

#[cfg(test)]
#[path = "test_table.rs"]
mod test_table;

/// Error returned when an insertion finds no slot for a new entry.
///
/// Carries the rejected entry so that the caller keeps ownership of it. The table is left
/// unchanged by the failed insertion.
#[derive(Clone, PartialEq, Eq)]
pub struct CapacityError<T>(pub T);

impl<T> fmt::Debug for CapacityError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CapacityError(..)")
    }
}

impl<T> fmt::Display for CapacityError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "table capacity exhausted")
    }
}

impl<T> std::error::Error for CapacityError<T> {}

#[derive(Clone)]
enum Slot<T> {
    Empty,
    Tombstone,
    Occupied(T),
}

// Yields at most `capacity` indices, so every probe walk terminates.
struct ProbeSeq {
    index: usize,
    remaining: usize,
    capacity: usize,
}

impl Iterator for ProbeSeq {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let index = self.index;
        self.index += 1;
        if self.index == self.capacity {
            self.index = 0;
        }
        Some(index)
    }
}

/// Fixed-capacity hash table with explicit hashing.
///
/// The table stores entries of type `T` directly in a backing array whose length is chosen at
/// construction and never changes. Collisions are resolved by open addressing with linear
/// probing: starting from the slot selected by the hash value, consecutive slots are examined,
/// wrapping around at the end of the array, until the walk finds the entry, a free slot, or has
/// visited every slot. Removal leaves a tombstone in place of the entry so that probe chains
/// running through the removed slot stay intact.
///
/// The provided API follows the explicit hashing style of hashbrown's `HashTable`: methods take
/// a caller supplied hash value and equality closures instead of constraining `T` itself. The
/// [`FixedMap`][crate::FixedMap] and [`FixedSet`][crate::FixedSet] wrappers provide the usual
/// map and set interfaces on top.
///
/// Since the table never grows, inserting a new entry can fail. Once every slot of the probed
/// chain is occupied or tombstoned, [`insert`][Self::insert] hands the entry back as a
/// [`CapacityError`]. Tombstoned slots are reused by later insertions, but only
/// [`clear`][Self::clear] returns them to the free state.
#[derive(Clone)]
pub struct FixedTable<T> {
    slots: Box<[Slot<T>]>,
    len: usize,
    tombstones: usize,
}

impl<T: fmt::Debug> fmt::Debug for FixedTable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T> FixedTable<T> {
    /// Returns an empty table with room for exactly `capacity` entries.
    ///
    /// The capacity is fixed for the lifetime of the table.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "capacity must be at least 1");
        FixedTable {
            slots: (0..capacity).map(|_| Slot::Empty).collect(),
            len: 0,
            tombstones: 0,
        }
    }

    /// Returns the number of entries in the table.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the table contains no entries.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns `true` when every slot holds an entry.
    ///
    /// A table that is not full can still reject new entries when all slots not holding an
    /// entry are tombstoned, see [`insert`][Self::insert].
    #[inline(always)]
    pub fn is_full(&self) -> bool {
        self.len == self.slots.len()
    }

    /// Returns the number of slots, as fixed at construction.
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of tombstoned slots.
    #[inline(always)]
    pub fn tombstones(&self) -> usize {
        self.tombstones
    }

    /// Returns the fraction of slots in use, counting tombstoned slots.
    ///
    /// Removal does not lower the load factor since removed entries leave tombstones behind;
    /// only [`clear`][Self::clear] resets it. An insertion of a new entry fails exactly when
    /// the load factor is `1.0`.
    pub fn load_factor(&self) -> f64 {
        (self.len + self.tombstones) as f64 / self.slots.len() as f64
    }

    /// Discards all entries and returns every slot to the free state.
    ///
    /// This is the only operation that frees tombstoned slots. The capacity is unchanged.
    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = Slot::Empty;
        }
        self.len = 0;
        self.tombstones = 0;
    }

    fn probe(&self, hash: u64) -> ProbeSeq {
        let capacity = self.slots.len();
        ProbeSeq {
            index: (hash % capacity as u64) as usize,
            remaining: capacity,
            capacity,
        }
    }

    fn find_index(&self, hash: u64, mut eq: impl FnMut(&T) -> bool) -> Option<usize> {
        for index in self.probe(hash) {
            match &self.slots[index] {
                Slot::Empty => return None,
                Slot::Tombstone => {}
                Slot::Occupied(entry) => {
                    if eq(entry) {
                        return Some(index);
                    }
                }
            }
        }
        None
    }

    /// Finds an entry using the given hash value and returns a reference to it.
    ///
    /// Tombstoned slots are skipped, so entries stored past a removed entry of the same chain
    /// are still found. The walk stops at the first free slot or after visiting every slot.
    ///
    /// This method calls `eq` to determine if a candidate entry should be returned.
    pub fn find(&self, hash: u64, eq: impl FnMut(&T) -> bool) -> Option<&T> {
        let index = self.find_index(hash, eq)?;
        let Slot::Occupied(entry) = &self.slots[index] else {
            unreachable!()
        };
        Some(entry)
    }

    /// Finds an entry using the given hash value and returns a mutable reference to it.
    ///
    /// This method calls `eq` to determine if a candidate entry should be returned.
    pub fn find_mut(&mut self, hash: u64, eq: impl FnMut(&T) -> bool) -> Option<&mut T> {
        let index = self.find_index(hash, eq)?;
        let Slot::Occupied(entry) = &mut self.slots[index] else {
            unreachable!()
        };
        Some(entry)
    }

    /// Inserts an entry using the given hash value.
    ///
    /// When an equivalent entry is already present, the table is not modified. The method
    /// returns a mutable reference to the present entry together with the passed value, letting
    /// the caller decide how to combine the two.
    ///
    /// When no equivalent entry is found, the new entry is written to the first tombstoned slot
    /// the walk crossed, reusing it, or to the free slot terminating the walk when there was no
    /// tombstone.
    ///
    /// When the walk visits every slot without finding an equivalent entry or a free slot, the
    /// entry is handed back as a [`CapacityError`] and the table is left unchanged. Entries
    /// already present always remain reachable and replaceable, even in a table that rejects
    /// new entries.
    ///
    /// This method calls `eq` with a present entry and the new entry to determine if the two
    /// are equivalent.
    pub fn insert(
        &mut self,
        hash: u64,
        entry: T,
        mut eq: impl FnMut(&T, &T) -> bool,
    ) -> Result<(&mut T, Option<T>), CapacityError<T>> {
        let mut first_tombstone = None;
        let mut existing = None;
        let mut dest = None;

        for index in self.probe(hash) {
            match &self.slots[index] {
                Slot::Empty => {
                    dest = Some(first_tombstone.unwrap_or(index));
                    break;
                }
                Slot::Tombstone => {
                    if first_tombstone.is_none() {
                        first_tombstone = Some(index);
                    }
                }
                Slot::Occupied(present) => {
                    if eq(present, &entry) {
                        existing = Some(index);
                        break;
                    }
                }
            }
        }

        if let Some(index) = existing {
            let Slot::Occupied(present) = &mut self.slots[index] else {
                unreachable!()
            };
            return Ok((present, Some(entry)));
        }

        let Some(index) = dest else {
            return Err(CapacityError(entry));
        };

        if matches!(self.slots[index], Slot::Tombstone) {
            self.tombstones -= 1;
        }
        self.len += 1;
        self.slots[index] = Slot::Occupied(entry);
        let Slot::Occupied(entry) = &mut self.slots[index] else {
            unreachable!()
        };
        Ok((entry, None))
    }

    /// Finds and removes an entry using the given hash value.
    ///
    /// When no equivalent entry is found, the table is not modified, otherwise the value of the
    /// found entry is returned and its slot is tombstoned. Probe chains running through the
    /// slot stay intact and later insertions may reuse it.
    ///
    /// This method calls `eq` to determine if a candidate entry is equivalent.
    pub fn remove(&mut self, hash: u64, eq: impl FnMut(&T) -> bool) -> Option<T> {
        let index = self.find_index(hash, eq)?;
        let Slot::Occupied(entry) = replace(&mut self.slots[index], Slot::Tombstone) else {
            unreachable!()
        };
        self.len -= 1;
        self.tombstones += 1;
        Some(entry)
    }

    /// Removes all entries for which `f` evaluates to `false`.
    ///
    /// `f` is called exactly once for each entry, in slot order, and may mutate the entries.
    /// The slots of removed entries are tombstoned, like for [`remove`][Self::remove].
    pub fn retain(&mut self, mut f: impl FnMut(&mut T) -> bool) {
        for slot in self.slots.iter_mut() {
            if let Slot::Occupied(entry) = slot {
                if !f(entry) {
                    *slot = Slot::Tombstone;
                    self.len -= 1;
                    self.tombstones += 1;
                }
            }
        }
    }

    /// Returns an iterator over the entries of the table, in slot order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            slots: self.slots.iter(),
            remaining: self.len,
        }
    }

    /// Returns an iterator over the entries of the table, in slot order, yielding mutable
    /// references.
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut {
            slots: self.slots.iter_mut(),
            remaining: self.len,
        }
    }

    #[cfg(test)]
    pub(crate) fn check(&self) {
        let mut len = 0;
        let mut tombstones = 0;
        for slot in self.slots.iter() {
            match slot {
                Slot::Empty => {}
                Slot::Tombstone => tombstones += 1,
                Slot::Occupied(_) => len += 1,
            }
        }
        assert_eq!(self.len, len);
        assert_eq!(self.tombstones, tombstones);
    }
}

/// Iterator yielding references to a table's entries.
pub struct Iter<'a, T> {
    slots: std::slice::Iter<'a, Slot<T>>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        while self.remaining > 0 {
            if let Slot::Occupied(entry) = self.slots.next()? {
                self.remaining -= 1;
                return Some(entry);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {
    fn len(&self) -> usize {
        self.remaining
    }
}

/// Iterator yielding mutable references to a table's entries.
pub struct IterMut<'a, T> {
    slots: std::slice::IterMut<'a, Slot<T>>,
    remaining: usize,
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<Self::Item> {
        while self.remaining > 0 {
            if let Slot::Occupied(entry) = self.slots.next()? {
                self.remaining -= 1;
                return Some(entry);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {
    fn len(&self) -> usize {
        self.remaining
    }
}

/// Iterator moving entries out of a table.
pub struct IntoIter<T> {
    slots: std::vec::IntoIter<Slot<T>>,
    remaining: usize,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        while self.remaining > 0 {
            if let Slot::Occupied(entry) = self.slots.next()? {
                self.remaining -= 1;
                return Some(entry);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<T> IntoIterator for FixedTable<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            slots: self.slots.into_vec().into_iter(),
            remaining: self.len,
        }
    }
}

impl<'a, T> IntoIterator for &'a FixedTable<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut FixedTable<T> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
