#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

/// A fixed-capacity HashMap using quadratic probing.
///
/// This module provides a `HashMap` that stores its slots inline, marks
/// removed entries with tombstones, and refuses insertions past a 3/4 load
/// factor instead of growing.
pub mod hash_map;

pub mod hash;

pub mod probe;

pub mod slot;

pub mod sponge;

pub use hash::BuildHasher;
#[cfg(any(feature = "std", feature = "foldhash"))]
pub use hash::DefaultHashBuilder;
pub use hash::Hash;
pub use hash::Hasher;
pub use hash_map::CapacityError;
pub use hash_map::HashMap;
pub use slot::Slot;

/// A [`HashMap`] using the [`DefaultHashBuilder`].
#[cfg(any(feature = "std", feature = "foldhash"))]
pub type DefaultHashMap<K, V, const N: usize> = HashMap<K, V, N, DefaultHashBuilder>;
