//! Storage cells of the table.

/// A single cell of a [`HashMap`](crate::HashMap)'s table.
///
/// A slot starts out [`Empty`](Slot::Empty), becomes
/// [`Occupied`](Slot::Occupied) on insertion and turns into a
/// [`Deleted`](Slot::Deleted) tombstone on removal. Tombstones keep probe
/// sequences intact for lookups and are reused by later insertions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Slot<K, V> {
    /// Never written since the last clear.
    Empty,
    /// Holds a live entry.
    Occupied(K, V),
    /// Held an entry that was removed.
    Deleted,
}

impl<K, V> Default for Slot<K, V> {
    fn default() -> Self {
        Slot::Empty
    }
}

impl<K, V> Slot<K, V> {
    /// Returns `true` if the slot holds a live entry.
    #[inline]
    pub fn is_valid(&self) -> bool {
        matches!(self, Slot::Occupied(..))
    }

    /// Returns `true` if a fresh entry may be written here.
    #[inline]
    pub fn is_available(&self) -> bool {
        !self.is_valid()
    }

    /// Returns the live entry, if any.
    #[inline]
    pub fn key_value(&self) -> Option<(&K, &V)> {
        match self {
            Slot::Occupied(key, value) => Some((key, value)),
            Slot::Empty | Slot::Deleted => None,
        }
    }

    /// Returns the live entry of a slot already known to be valid.
    ///
    /// # Panics
    ///
    /// Panics if the slot is empty or tombstoned. Gate calls behind
    /// [`is_valid`](Slot::is_valid).
    #[inline]
    pub fn key_value_unchecked(&self) -> (&K, &V) {
        match self {
            Slot::Occupied(key, value) => (key, value),
            Slot::Empty | Slot::Deleted => unreachable!("slot does not hold an entry"),
        }
    }

    /// Returns the key of the live entry, if any.
    #[inline]
    pub fn key(&self) -> Option<&K> {
        self.key_value().map(|(k, _)| k)
    }

    #[inline]
    pub(crate) fn value_mut(&mut self) -> Option<&mut V> {
        match self {
            Slot::Occupied(_, value) => Some(value),
            Slot::Empty | Slot::Deleted => None,
        }
    }

    #[inline]
    pub(crate) fn key_value_mut(&mut self) -> Option<(&K, &mut V)> {
        match self {
            Slot::Occupied(key, value) => Some((key, value)),
            Slot::Empty | Slot::Deleted => None,
        }
    }

    /// Writes an entry, clearing any tombstone. Returns the value previously
    /// held by a live entry.
    #[inline]
    pub fn set(&mut self, key: K, value: V) -> Option<V> {
        match core::mem::replace(self, Slot::Occupied(key, value)) {
            Slot::Occupied(_, old) => Some(old),
            Slot::Empty | Slot::Deleted => None,
        }
    }

    /// Turns a live entry into a tombstone and hands the entry back. Empty
    /// slots and tombstones are left alone.
    #[inline]
    pub fn mark_deleted(&mut self) -> Option<(K, V)> {
        if !self.is_valid() {
            return None;
        }
        match core::mem::replace(self, Slot::Deleted) {
            Slot::Occupied(key, value) => Some((key, value)),
            Slot::Empty | Slot::Deleted => None,
        }
    }

    /// Resets the slot to [`Empty`](Slot::Empty), returning the live entry if
    /// there was one.
    #[inline]
    pub fn take(&mut self) -> Option<(K, V)> {
        match core::mem::take(self) {
            Slot::Occupied(key, value) => Some((key, value)),
            Slot::Empty | Slot::Deleted => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle() {
        let mut slot: Slot<u32, &str> = Slot::default();
        assert_eq!(slot, Slot::Empty);
        assert!(slot.is_available());
        assert!(!slot.is_valid());
        assert_eq!(slot.key_value(), None);

        assert_eq!(slot.set(1, "one"), None);
        assert!(slot.is_valid());
        assert!(!slot.is_available());
        assert_eq!(slot.key_value(), Some((&1, &"one")));
        assert_eq!(slot.key_value_unchecked(), (&1, &"one"));

        assert_eq!(slot.set(1, "uno"), Some("one"));

        assert_eq!(slot.mark_deleted(), Some((1, "uno")));
        assert_eq!(slot, Slot::Deleted);
        assert!(slot.is_available());
        assert_eq!(slot.key(), None);
        assert_eq!(slot.mark_deleted(), None);

        assert_eq!(slot.set(2, "two"), None);
        assert_eq!(slot.key(), Some(&2));
    }

    #[test]
    fn take_resets_to_empty() {
        let mut slot = Slot::Occupied('k', 3);
        assert_eq!(slot.take(), Some(('k', 3)));
        assert_eq!(slot, Slot::Empty);

        let mut tombstone: Slot<char, i32> = Slot::Deleted;
        assert_eq!(tombstone.take(), None);
        assert_eq!(tombstone, Slot::Empty);
    }

    #[test]
    fn never_valid_and_available_at_once() {
        let slots: [Slot<u8, u8>; 3] = [Slot::Empty, Slot::Occupied(0, 0), Slot::Deleted];
        for slot in &slots {
            assert_ne!(slot.is_valid(), slot.is_available());
        }
    }

    #[test]
    #[should_panic(expected = "slot does not hold an entry")]
    fn unchecked_access_on_tombstone_panics() {
        let slot: Slot<u8, u8> = Slot::Deleted;
        let _ = slot.key_value_unchecked();
    }
}
