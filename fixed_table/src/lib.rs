//! Fixed-capacity hash map and hash set built on open addressing with linear probing.
//!
//! All containers in this crate are sized once, at construction, and never reallocate. A
//! [`FixedMap`] or [`FixedSet`] therefore rejects insertions of new entries once its slots are
//! used up instead of growing, which makes it suitable for preallocated and memory-budgeted
//! contexts where spilling into the allocator is not acceptable.
//!
//! Collisions are resolved by walking the slot array linearly from the slot selected by the
//! hash, wrapping around at the end. Removal tombstones the occupied slot instead of freeing it
//! so that probe chains crossing the removed entry keep working. Tombstoned slots are reused by
//! later insertions; they only return to the free state when the container is cleared.
//!
//! The probing itself is done by [`FixedTable`], a low-level table in the style of hashbrown's
//! `HashTable` that takes explicit hash values and equality closures instead of constraining
//! the entry type. [`FixedMap`] and [`FixedSet`] pair it with a
//! [`BuildHasher`][std::hash::BuildHasher] to provide the usual map and set interfaces.

use std::hash::BuildHasherDefault;

use zwohash::ZwoHasher;

pub mod fixed_map;
pub mod fixed_set;
pub mod fixed_table;

pub use fixed_map::FixedMap;
pub use fixed_set::FixedSet;
pub use fixed_table::{CapacityError, FixedTable};

/// Default [`BuildHasher`][std::hash::BuildHasher] used by [`FixedMap`] and [`FixedSet`].
///
/// ZwoHash is fast and fully deterministic, so lookups and iteration order behave identically
/// from run to run.
pub type DefaultHashBuilder = BuildHasherDefault<ZwoHasher>;
