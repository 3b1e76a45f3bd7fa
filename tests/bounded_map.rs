use bounded_hash::CapacityError;
use bounded_hash::HashMap;
use bounded_hash::Hasher;
use bounded_hash::Slot;
use bounded_hash::hash::BuildHasherDefault;
use bounded_hash::sponge::SpongeBuildHasher;

/// Digest is the last word written, so integer keys pick their own slot.
#[derive(Default)]
struct Identity(u64);

impl Hasher for Identity {
    fn write(&mut self, word: u64) {
        self.0 = word;
    }

    fn finish(self) -> u64 {
        self.0
    }
}

type IdentityMap<const N: usize> = HashMap<u64, &'static str, N, BuildHasherDefault<Identity>>;

#[test]
fn colliding_digests_land_on_triangular_offsets() {
    let mut map = IdentityMap::<7>::new();
    map.insert(3, "a");
    map.insert(10, "b");
    map.insert(17, "c");

    assert_eq!(map.slots()[3], Slot::Occupied(3, "a"));
    assert_eq!(map.slots()[4], Slot::Occupied(10, "b"));
    assert_eq!(map.slots()[6], Slot::Occupied(17, "c"));

    for (key, value) in [(3, "a"), (10, "b"), (17, "c")] {
        assert_eq!(map.get(&key), Some(&value));
    }
}

#[test]
#[should_panic(expected = "load factor exceeded")]
fn capacity_four_holds_two_entries() {
    let mut map = IdentityMap::<4>::new();
    map.insert(0, "a");
    map.insert(1, "b");
    map.insert(2, "c");
}

#[test]
fn failed_insert_leaves_map_untouched() {
    let mut map = IdentityMap::<4>::new();
    map.insert(0, "a");
    map.insert(1, "b");
    let before = map.clone();

    assert_eq!(
        map.try_insert(2, "c"),
        Err(CapacityError::LoadFactor {
            len: 2,
            capacity: 4
        })
    );
    assert_eq!(map, before);
    assert_eq!(map.slots(), before.slots());
}

#[test]
fn removing_an_absent_key_changes_nothing() {
    let mut map = IdentityMap::<8>::new();
    map.insert(1, "a");
    map.insert(9, "b");
    let before = map.clone();

    assert_eq!(map.remove(&17), None);
    assert_eq!(map.slots(), before.slots());
    assert_eq!(map.len(), 2);
}

#[test]
fn sponge_hashed_map_round_trips_string_keys() {
    let mut map: HashMap<String, usize, 64, SpongeBuildHasher> = HashMap::new();
    let words = ["alpha", "beta", "gamma", "delta", "epsilon", "zeta"];
    for (i, word) in words.iter().enumerate() {
        map.insert(word.to_string(), i);
    }

    assert_eq!(map.len(), words.len());
    for (i, word) in words.iter().enumerate() {
        assert_eq!(map.get(&word.to_string()), Some(&i));
    }

    map.iter_values_mut(|v| *v += 100);
    assert_eq!(map.get(&"gamma".to_string()), Some(&102));
}

#[cfg(feature = "foldhash")]
#[test]
fn default_map_is_reproducible() {
    use bounded_hash::DefaultHashMap;

    let mut first = DefaultHashMap::<u32, u32, 32>::new();
    let mut second = DefaultHashMap::<u32, u32, 32>::new();
    for i in 0..20 {
        first.insert(i, i);
        second.insert(i, i);
    }

    assert_eq!(first.slots(), second.slots());
}
