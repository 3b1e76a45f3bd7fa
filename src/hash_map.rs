use core::fmt::Debug;

use crate::hash::BuildHasher;
use crate::hash::Hash;
use crate::probe::ProbeSeq;
use crate::probe::exceeds_load_factor;
use crate::slot::Slot;

/// The error returned by [`HashMap::try_insert`] when an entry cannot be
/// placed.
///
/// Both variants mean the map was built with too small a capacity for its
/// workload. They are not transient: retrying the same insertion fails the
/// same way.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum CapacityError {
    /// One more entry would push occupancy to 3/4 of the capacity or beyond.
    #[error("load factor exceeded: map holds {len} entries with capacity {capacity}")]
    LoadFactor {
        /// Entries held when the insertion was attempted.
        len: usize,
        /// Slots in the table.
        capacity: usize,
    },

    /// Every slot along the key's probe sequence holds another key.
    ///
    /// Only possible for capacities that are not a power of two, where the
    /// quadratic sequence does not reach every slot.
    #[error("probe sequence exhausted: no free slot reachable in a table of capacity {capacity}")]
    ProbeExhausted {
        /// Slots in the table.
        capacity: usize,
    },
}

/// A fixed-capacity hash map using open addressing with quadratic probing.
///
/// `HashMap<K, V, N, S>` stores at most `N` slots inline and never allocates.
/// Keys implement [`Hash`] and [`Eq`]; the hasher builder `S` hands out a
/// fresh [`Hasher`](crate::hash::Hasher) for every key hashed.
///
/// Removal leaves a tombstone behind so lookups can keep probing past it.
/// The table never grows: an insertion that would bring occupancy to 3/4 of
/// `N` fails. Choose `N` prime or a power of two; only power-of-two
/// capacities guarantee that a key's probe sequence reaches every slot.
///
/// # Examples
///
/// ```rust
/// # use bounded_hash::HashMap;
/// # use bounded_hash::hash::CoreBuildHasher;
/// # use siphasher::sip::SipHasher;
/// # type SimpleHasher = CoreBuildHasher<core::hash::BuildHasherDefault<SipHasher>>;
/// let mut scores: HashMap<&str, u32, 16, SimpleHasher> = HashMap::new();
/// scores.insert("alice", 10);
/// scores.insert("bob", 7);
///
/// assert_eq!(scores.get(&"alice"), Some(&10));
/// assert_eq!(scores.len(), 2);
/// assert_eq!(scores.capacity(), 16);
/// ```
#[derive(Clone)]
pub struct HashMap<K, V, const N: usize, S> {
    slots: [Slot<K, V>; N],
    len: usize,
    hash_builder: S,
}

impl<K, V, const N: usize, S> Debug for HashMap<K, V, N, S>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, const N: usize, S> HashMap<K, V, N, S> {
    /// Creates an empty map using the given hasher builder.
    ///
    /// Capacities below 2 are rejected at compile time, since such a table
    /// could never hold an entry.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use bounded_hash::HashMap;
    /// # use bounded_hash::hash::CoreBuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// # type SimpleHasher = CoreBuildHasher<core::hash::BuildHasherDefault<SipHasher>>;
    /// let map: HashMap<i32, String, 32, _> = HashMap::with_hasher(SimpleHasher::default());
    /// assert!(map.is_empty());
    /// ```
    pub fn with_hasher(hash_builder: S) -> Self {
        const { assert!(N > 1, "a bounded map needs a capacity of at least 2") };

        Self {
            slots: core::array::from_fn(|_| Slot::Empty),
            len: 0,
            hash_builder,
        }
    }

    /// Returns the number of entries in the map.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the map holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of slots in the table, `N`.
    ///
    /// Fewer than `N * 3 / 4` entries fit before insertions start failing.
    pub fn capacity(&self) -> usize {
        N
    }

    /// Returns a reference to the map's hasher builder.
    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }

    /// Returns the physical table, in slot order.
    ///
    /// Useful for inspecting where collisions landed.
    pub fn slots(&self) -> &[Slot<K, V>; N] {
        &self.slots
    }

    /// Removes every entry and tombstone, returning the map to the state it
    /// had right after construction.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use bounded_hash::HashMap;
    /// # use bounded_hash::hash::CoreBuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// # type SimpleHasher = CoreBuildHasher<core::hash::BuildHasherDefault<SipHasher>>;
    /// let mut map: HashMap<i32, &str, 8, SimpleHasher> = HashMap::new();
    /// map.insert(1, "a");
    /// map.clear();
    /// assert!(map.is_empty());
    /// assert!(map.slots().iter().all(|slot| slot.key().is_none()));
    /// ```
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            slot.take();
        }
        self.len = 0;
    }

    /// Returns an iterator over the entries, in slot order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.slots.iter(),
            remaining: self.len,
        }
    }

    /// Returns an iterator over the keys, in slot order.
    pub fn iter_keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Returns an iterator over the values, in slot order.
    pub fn iter_values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Returns every entry in a fixed-length array.
    ///
    /// The table is scanned in slot order; the first [`len`](Self::len)
    /// positions hold the entries and the rest are `None`.
    ///
    /// # Panics
    ///
    /// Panics if the number of live slots disagrees with `len`, which
    /// indicates a corrupted table.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use bounded_hash::HashMap;
    /// # use bounded_hash::hash::CoreBuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// # type SimpleHasher = CoreBuildHasher<core::hash::BuildHasherDefault<SipHasher>>;
    /// let mut map: HashMap<i32, &str, 8, SimpleHasher> = HashMap::new();
    /// map.insert(1, "a");
    /// map.insert(2, "b");
    ///
    /// let entries = map.entries();
    /// assert_eq!(entries.len(), 8);
    /// assert!(entries[..2].iter().all(Option::is_some));
    /// assert!(entries[2..].iter().all(Option::is_none));
    /// ```
    pub fn entries(&self) -> [Option<(&K, &V)>; N] {
        let mut entries = [None; N];
        let mut populated = 0;
        for entry in self.slots.iter().filter_map(Slot::key_value) {
            entries[populated] = Some(entry);
            populated += 1;
        }
        assert_eq!(
            populated, self.len,
            "live slot count disagrees with the stored length"
        );
        entries
    }

    /// Returns every key in a fixed-length array, laid out like
    /// [`entries`](Self::entries).
    pub fn keys(&self) -> [Option<&K>; N] {
        self.entries().map(|entry| entry.map(|(key, _)| key))
    }

    /// Returns every value in a fixed-length array, laid out like
    /// [`entries`](Self::entries).
    pub fn values(&self) -> [Option<&V>; N] {
        self.entries().map(|entry| entry.map(|(_, value)| value))
    }

    /// Applies `f` to every value in place.
    ///
    /// Keys are untouched, so no entry moves.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use bounded_hash::HashMap;
    /// # use bounded_hash::hash::CoreBuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// # type SimpleHasher = CoreBuildHasher<core::hash::BuildHasherDefault<SipHasher>>;
    /// let mut map: HashMap<i32, i32, 8, SimpleHasher> = HashMap::new();
    /// map.insert(1, 10);
    /// map.iter_values_mut(|v| *v *= 2);
    /// assert_eq!(map.get(&1), Some(&20));
    /// ```
    pub fn iter_values_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut V),
    {
        for (_, value) in self.slots.iter_mut().filter_map(Slot::key_value_mut) {
            f(value);
        }
    }

    /// Removes every entry for which `f` returns `false`.
    ///
    /// Removed entries become tombstones; nothing is moved or rehashed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use bounded_hash::HashMap;
    /// # use bounded_hash::hash::CoreBuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// # type SimpleHasher = CoreBuildHasher<core::hash::BuildHasherDefault<SipHasher>>;
    /// let mut map: HashMap<i32, i32, 16, SimpleHasher> = HashMap::new();
    /// for i in 0..8 {
    ///     map.insert(i, i * 10);
    /// }
    /// map.retain(|k, _| k % 2 == 0);
    /// assert_eq!(map.len(), 4);
    /// assert!(!map.contains_key(&3));
    /// ```
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&K, &V) -> bool,
    {
        for slot in &mut self.slots {
            let keep = match slot.key_value() {
                Some((key, value)) => f(key, value),
                None => continue,
            };
            if !keep {
                slot.mark_deleted();
                self.len -= 1;
            }
        }
    }
}

impl<K, V, const N: usize, S> HashMap<K, V, N, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Hashes `key` with a fresh hasher from the map's builder.
    pub fn hash(&self, key: &K) -> u64 {
        self.hash_builder.hash_one(key)
    }

    fn find_index(&self, key: &K) -> Option<usize> {
        let hash = self.hash(key);
        for index in ProbeSeq::new(hash, N) {
            match &self.slots[index] {
                Slot::Occupied(k, _) if k == key => return Some(index),
                // Insertion always takes the first available slot, so no
                // entry lives past an empty one.
                Slot::Empty => return None,
                Slot::Occupied(..) | Slot::Deleted => {}
            }
        }
        None
    }

    /// Returns a reference to the value stored for `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use bounded_hash::HashMap;
    /// # use bounded_hash::hash::CoreBuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// # type SimpleHasher = CoreBuildHasher<core::hash::BuildHasherDefault<SipHasher>>;
    /// let mut map: HashMap<i32, &str, 8, SimpleHasher> = HashMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.get(&1), Some(&"a"));
    /// assert_eq!(map.get(&2), None);
    /// ```
    pub fn get(&self, key: &K) -> Option<&V> {
        self.get_key_value(key).map(|(_, value)| value)
    }

    /// Returns the stored key and value for `key`.
    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        let index = self.find_index(key)?;
        Some(self.slots[index].key_value_unchecked())
    }

    /// Returns a mutable reference to the value stored for `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use bounded_hash::HashMap;
    /// # use bounded_hash::hash::CoreBuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// # type SimpleHasher = CoreBuildHasher<core::hash::BuildHasherDefault<SipHasher>>;
    /// let mut map: HashMap<i32, &str, 8, SimpleHasher> = HashMap::new();
    /// map.insert(1, "a");
    /// if let Some(x) = map.get_mut(&1) {
    ///     *x = "b";
    /// }
    /// assert_eq!(map.get(&1), Some(&"b"));
    /// ```
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let index = self.find_index(key)?;
        self.slots[index].value_mut()
    }

    /// Returns `true` if the map holds an entry for `key`.
    pub fn contains_key(&self, key: &K) -> bool {
        self.find_index(key).is_some()
    }

    /// Inserts a key-value pair, returning the value it replaced.
    ///
    /// # Panics
    ///
    /// Panics if the map already holds so many entries that one more would
    /// reach 3/4 of the capacity. The check assumes the insertion grows the
    /// map, so overwriting an existing key is refused at that point too.
    ///
    /// Also panics if no free slot is reachable along the key's probe
    /// sequence. See [`try_insert`](Self::try_insert) for a non-panicking
    /// variant.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use bounded_hash::HashMap;
    /// # use bounded_hash::hash::CoreBuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// # type SimpleHasher = CoreBuildHasher<core::hash::BuildHasherDefault<SipHasher>>;
    /// let mut map: HashMap<i32, &str, 8, SimpleHasher> = HashMap::new();
    /// assert_eq!(map.insert(37, "a"), None);
    /// assert_eq!(map.insert(37, "b"), Some("a"));
    /// assert_eq!(map.get(&37), Some(&"b"));
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.try_insert(key, value) {
            Ok(replaced) => replaced,
            Err(err) => panic!("{err}"),
        }
    }

    /// Inserts a key-value pair, reporting a full table as an error instead
    /// of panicking.
    ///
    /// On success returns the value the entry replaced, if any. On failure
    /// the map is left unchanged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use bounded_hash::CapacityError;
    /// # use bounded_hash::HashMap;
    /// # use bounded_hash::hash::CoreBuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// # type SimpleHasher = CoreBuildHasher<core::hash::BuildHasherDefault<SipHasher>>;
    /// let mut map: HashMap<i32, &str, 4, SimpleHasher> = HashMap::new();
    /// assert_eq!(map.try_insert(1, "a"), Ok(None));
    /// assert_eq!(map.try_insert(2, "b"), Ok(None));
    /// assert_eq!(
    ///     map.try_insert(3, "c"),
    ///     Err(CapacityError::LoadFactor { len: 2, capacity: 4 })
    /// );
    /// ```
    pub fn try_insert(&mut self, key: K, value: V) -> Result<Option<V>, CapacityError> {
        if exceeds_load_factor(self.len + 1, N) {
            return Err(CapacityError::LoadFactor {
                len: self.len,
                capacity: N,
            });
        }

        let hash = self.hash(&key);
        let mut vacant = None;
        for index in ProbeSeq::new(hash, N) {
            let slot = &self.slots[index];
            if slot.key() == Some(&key) {
                return Ok(self.slots[index].set(key, value));
            }
            if slot.is_available() && vacant.is_none() {
                vacant = Some(index);
            }
            if matches!(slot, Slot::Empty) {
                break;
            }
        }

        let index = vacant.ok_or(CapacityError::ProbeExhausted { capacity: N })?;
        self.slots[index].set(key, value);
        self.len += 1;
        Ok(None)
    }

    /// Removes `key` from the map, returning its value.
    ///
    /// Removing an absent key changes nothing.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use bounded_hash::HashMap;
    /// # use bounded_hash::hash::CoreBuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// # type SimpleHasher = CoreBuildHasher<core::hash::BuildHasherDefault<SipHasher>>;
    /// let mut map: HashMap<i32, &str, 8, SimpleHasher> = HashMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.remove(&1), Some("a"));
    /// assert_eq!(map.remove(&1), None);
    /// ```
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_, value)| value)
    }

    /// Removes `key` from the map, returning the stored key and value.
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        let index = self.find_index(key)?;
        let entry = self.slots[index].mark_deleted();
        self.len -= 1;
        entry
    }

    /// Rebuilds the table from `f` applied to every entry.
    ///
    /// Entries are moved out in slot order, the table is reset, and the
    /// mapped pairs are inserted again with the same hasher builder. Since
    /// keys may change, entries can land in different slots than before, and
    /// two entries mapped to the same key collapse into one.
    ///
    /// # Panics
    ///
    /// Panics if a mapped pair cannot be placed, as [`insert`](Self::insert)
    /// does.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use bounded_hash::HashMap;
    /// # use bounded_hash::hash::CoreBuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// # type SimpleHasher = CoreBuildHasher<core::hash::BuildHasherDefault<SipHasher>>;
    /// let mut map: HashMap<i32, i32, 16, SimpleHasher> = HashMap::new();
    /// map.insert(1, 10);
    /// map.insert(2, 20);
    /// map.iter_mut(|k, v| (k + 100, v + 1));
    /// assert_eq!(map.get(&101), Some(&11));
    /// assert_eq!(map.get(&1), None);
    /// ```
    pub fn iter_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(K, V) -> (K, V),
    {
        let slots = core::mem::replace(&mut self.slots, core::array::from_fn(|_| Slot::Empty));
        self.len = 0;
        for (key, value) in slots.into_iter().filter_map(|mut slot| slot.take()) {
            let (key, value) = f(key, value);
            self.insert(key, value);
        }
    }

    /// Rebuilds the table with every key replaced by `f(key)`.
    ///
    /// Behaves like [`iter_mut`](Self::iter_mut) with values passed through.
    pub fn iter_keys_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(K) -> K,
    {
        self.iter_mut(|key, value| (f(key), value));
    }
}

impl<K, V, const N: usize, S> HashMap<K, V, N, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    /// Creates an empty map using the default hasher builder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use bounded_hash::HashMap;
    /// # use bounded_hash::hash::CoreBuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// # type SimpleHasher = CoreBuildHasher<core::hash::BuildHasherDefault<SipHasher>>;
    /// let map: HashMap<i32, String, 64, SimpleHasher> = HashMap::new();
    /// assert!(map.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K, V, const N: usize, S> Default for HashMap<K, V, N, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, const N: usize, S> PartialEq for HashMap<K, V, N, S>
where
    K: Hash + Eq,
    V: PartialEq,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        // Keys are unique on both sides, so equal lengths plus one-way
        // inclusion is enough.
        self.iter().all(|(key, value)| other.get(key) == Some(value))
    }
}

impl<K, V, const N: usize, S> Eq for HashMap<K, V, N, S>
where
    K: Hash + Eq,
    V: Eq,
    S: BuildHasher,
{
}

impl<'a, K, V, const N: usize, S> IntoIterator for &'a HashMap<K, V, N, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Probe statistics for a map.
///
/// Only available with the `stats` feature.
#[cfg(feature = "stats")]
#[derive(Debug, Clone)]
pub struct DebugStats {
    /// Number of entries in the map
    pub populated: usize,
    /// Number of slots in the table
    pub capacity: usize,
    /// Number of tombstoned slots
    pub tombstones: usize,
    /// Number of never-written slots
    pub empty: usize,
    /// Load factor (populated / capacity)
    pub load_factor: f64,
    /// `probe_histogram[i]` counts the entries found on probe attempt `i`
    pub probe_histogram: alloc::vec::Vec<usize>,
}

#[cfg(feature = "stats")]
impl DebugStats {
    /// Longest probe sequence any entry needs, in attempts.
    pub fn max_probe_length(&self) -> usize {
        self.probe_histogram
            .iter()
            .rposition(|&count| count > 0)
            .map_or(0, |attempt| attempt + 1)
    }

    /// Pretty-print the debug statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Bounded Map Debug Statistics ===");
        println!(
            "Population: {}/{} ({:.2}% load factor)",
            self.populated,
            self.capacity,
            self.load_factor * 100.0
        );
        println!(
            "Slots: {} live, {} tombstoned, {} empty",
            self.populated, self.tombstones, self.empty
        );
        println!("Probe length histogram:");
        for (attempt, count) in self.probe_histogram.iter().enumerate() {
            if *count > 0 {
                println!("  attempt {attempt:>3}: {count}");
            }
        }
    }
}

#[cfg(feature = "stats")]
impl<K, V, const N: usize, S> HashMap<K, V, N, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Collects occupancy and probe-length statistics.
    pub fn debug_stats(&self) -> DebugStats {
        let mut probe_histogram = alloc::vec![0; N];
        let mut tombstones = 0;
        let mut empty = 0;
        for (index, slot) in self.slots.iter().enumerate() {
            match slot {
                Slot::Occupied(key, _) => {
                    let attempt = ProbeSeq::new(self.hash(key), N)
                        .position(|probed| probed == index)
                        .unwrap_or(N - 1);
                    probe_histogram[attempt] += 1;
                }
                Slot::Deleted => tombstones += 1,
                Slot::Empty => empty += 1,
            }
        }

        DebugStats {
            populated: self.len,
            capacity: N,
            tombstones,
            empty,
            load_factor: self.len as f64 / N as f64,
            probe_histogram,
        }
    }
}

/// An iterator over the entries of a [`HashMap`], in slot order.
#[derive(Clone)]
pub struct Iter<'a, K, V> {
    inner: core::slice::Iter<'a, Slot<K, V>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.inner.by_ref().find_map(Slot::key_value)?;
        self.remaining -= 1;
        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

/// An iterator over the keys of a [`HashMap`].
#[derive(Clone)]
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

/// An iterator over the values of a [`HashMap`].
#[derive(Clone)]
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}
