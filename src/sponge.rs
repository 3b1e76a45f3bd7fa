//! A sponge-construction [`Hasher`].
//!
//! Words are absorbed into a cache of `RATE` lanes. Once the cache is full
//! and another word arrives, the cache is added into the rate lanes of a
//! `WIDTH`-lane state and the state is permuted. Squeezing flushes the cache
//! the same way and returns lane 0.
//!
//! The last lane is the capacity lane. It is seeded with the declared input
//! length, so inputs of different declared lengths start from different
//! states. Variable-length inputs additionally absorb a sentinel `1` before
//! squeezing.
//!
//! [`SipPermutation`] is provided so the sponge is usable out of the box. It
//! is a mixing permutation, not a vetted cryptographic one; plug in your own
//! [`Permutation`] when collision resistance against adversaries matters.

use crate::hash::BuildHasher;
use crate::hash::Hasher;

/// A fixed, invertible transformation of a sponge's state.
pub trait Permutation<const WIDTH: usize> {
    /// Permutes `state` in place.
    fn permute(&self, state: &mut [u64; WIDTH]);
}

/// Absorb/squeeze state machine over a [`Permutation`].
#[derive(Clone, Debug)]
pub struct Sponge<P, const RATE: usize, const WIDTH: usize> {
    state: [u64; WIDTH],
    cache: [u64; RATE],
    cache_size: usize,
    permutation: P,
}

impl<P, const RATE: usize, const WIDTH: usize> Sponge<P, RATE, WIDTH>
where
    P: Permutation<WIDTH>,
{
    /// Creates a sponge whose capacity lane is seeded with `iv`.
    pub fn new(permutation: P, iv: u64) -> Self {
        const { assert!(RATE > 0 && RATE < WIDTH, "sponge rate must leave a capacity lane") };

        let mut state = [0; WIDTH];
        state[WIDTH - 1] = iv;
        Sponge {
            state,
            cache: [0; RATE],
            cache_size: 0,
            permutation,
        }
    }

    fn perform_duplex(&mut self) {
        for (lane, cached) in self.state.iter_mut().zip(&self.cache[..self.cache_size]) {
            *lane = lane.wrapping_add(*cached);
        }
        self.permutation.permute(&mut self.state);
    }

    /// Absorbs a single word.
    pub fn absorb(&mut self, word: u64) {
        if self.cache_size == RATE {
            self.perform_duplex();
            self.cache[0] = word;
            self.cache_size = 1;
        } else {
            self.cache[self.cache_size] = word;
            self.cache_size += 1;
        }
    }

    /// Flushes pending input and returns the first output lane.
    pub fn squeeze(mut self) -> u64 {
        self.perform_duplex();
        self.state[0]
    }

    /// Hashes an input whose length is part of its type.
    pub fn hash_fixed(permutation: P, input: &[u64]) -> u64 {
        let mut sponge = Self::new(permutation, input.len() as u64);
        for &word in input {
            sponge.absorb(word);
        }
        sponge.squeeze()
    }

    /// Hashes the first `len` words of `input`, treating the input as
    /// variable-length.
    ///
    /// # Panics
    ///
    /// Panics if `len` exceeds `input.len()`.
    pub fn hash_variable(permutation: P, input: &[u64], len: usize) -> u64 {
        let mut sponge = Self::new(permutation, len as u64);
        for &word in &input[..len] {
            sponge.absorb(word);
        }
        sponge.absorb(1);
        sponge.squeeze()
    }
}

/// SipHash's ARX round used as a four-lane permutation.
#[derive(Clone, Copy, Debug)]
pub struct SipPermutation {
    rounds: usize,
}

impl SipPermutation {
    /// Creates a permutation applying `rounds` SipRounds per call.
    pub const fn new(rounds: usize) -> Self {
        SipPermutation { rounds }
    }
}

impl Default for SipPermutation {
    fn default() -> Self {
        Self::new(4)
    }
}

impl Permutation<4> for SipPermutation {
    fn permute(&self, state: &mut [u64; 4]) {
        let [mut v0, mut v1, mut v2, mut v3] = *state;
        for _ in 0..self.rounds {
            v0 = v0.wrapping_add(v1);
            v1 = v1.rotate_left(13);
            v1 ^= v0;
            v0 = v0.rotate_left(32);
            v2 = v2.wrapping_add(v3);
            v3 = v3.rotate_left(16);
            v3 ^= v2;
            v0 = v0.wrapping_add(v3);
            v3 = v3.rotate_left(21);
            v3 ^= v0;
            v2 = v2.wrapping_add(v1);
            v1 = v1.rotate_left(17);
            v1 ^= v2;
            v2 = v2.rotate_left(32);
        }
        *state = [v0, v1, v2, v3];
    }
}

/// A streaming [`Hasher`] backed by a three-lane-rate sponge.
///
/// The total input length is unknown while streaming, so the hasher runs in
/// variable-length mode with a zero initial capacity lane.
#[derive(Clone, Debug)]
pub struct SpongeHasher<P = SipPermutation> {
    sponge: Sponge<P, 3, 4>,
}

impl<P: Permutation<4>> SpongeHasher<P> {
    /// Creates a hasher over the given permutation.
    pub fn new(permutation: P) -> Self {
        SpongeHasher {
            sponge: Sponge::new(permutation, 0),
        }
    }
}

impl<P: Permutation<4> + Default> Default for SpongeHasher<P> {
    fn default() -> Self {
        Self::new(P::default())
    }
}

impl<P: Permutation<4>> Hasher for SpongeHasher<P> {
    #[inline]
    fn write(&mut self, word: u64) {
        self.sponge.absorb(word);
    }

    fn finish(mut self) -> u64 {
        self.sponge.absorb(1);
        self.sponge.squeeze()
    }
}

/// Factory for [`SpongeHasher`]s sharing one permutation.
///
/// # Examples
///
/// ```rust
/// use bounded_hash::HashMap;
/// use bounded_hash::sponge::SpongeBuildHasher;
///
/// let mut map: HashMap<&str, u32, 31, SpongeBuildHasher> = HashMap::new();
/// map.insert("answer", 42);
/// assert_eq!(map.get(&"answer"), Some(&42));
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct SpongeBuildHasher<P = SipPermutation> {
    permutation: P,
}

impl<P> SpongeBuildHasher<P> {
    /// Creates a factory over the given permutation.
    pub const fn new(permutation: P) -> Self {
        SpongeBuildHasher { permutation }
    }
}

impl<P: Permutation<4> + Clone> BuildHasher for SpongeBuildHasher<P> {
    type Hasher = SpongeHasher<P>;

    fn build_hasher(&self) -> SpongeHasher<P> {
        SpongeHasher::new(self.permutation.clone())
    }
}

#[cfg(test)]
mod tests {
    use core::cell::Cell;

    use super::*;

    /// Counts how many times it was applied; rotates lanes so each call is
    /// visible in the output.
    #[derive(Default)]
    struct Counting<'a> {
        calls: Option<&'a Cell<usize>>,
    }

    impl Permutation<4> for Counting<'_> {
        fn permute(&self, state: &mut [u64; 4]) {
            if let Some(calls) = self.calls {
                calls.set(calls.get() + 1);
            }
            state.rotate_left(1);
        }
    }

    #[test]
    fn permutes_only_when_the_cache_overflows() {
        let calls = Cell::new(0);
        let mut sponge: Sponge<_, 3, 4> = Sponge::new(Counting { calls: Some(&calls) }, 0);
        for word in 1..=3 {
            sponge.absorb(word);
        }
        assert_eq!(calls.get(), 0);

        sponge.absorb(4);
        assert_eq!(calls.get(), 1);

        sponge.squeeze();
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn squeeze_returns_lane_zero_after_flushing() {
        let mut sponge: Sponge<_, 3, 4> = Sponge::new(Counting::default(), 9);
        sponge.absorb(5);
        sponge.absorb(6);
        // state [5, 6, 0, 9] rotated left once
        assert_eq!(sponge.squeeze(), 6);
    }

    #[test]
    fn declared_length_changes_the_digest() {
        let input = [1, 2, 3];
        let fixed = Sponge::<_, 3, 4>::hash_fixed(SipPermutation::default(), &input);
        let variable = Sponge::<_, 3, 4>::hash_variable(SipPermutation::default(), &input, 3);
        let shorter = Sponge::<_, 3, 4>::hash_variable(SipPermutation::default(), &input, 2);

        assert_ne!(fixed, variable);
        assert_ne!(variable, shorter);
        assert_eq!(
            variable,
            Sponge::<_, 3, 4>::hash_variable(SipPermutation::default(), &[1, 2, 3, 99], 3)
        );
    }

    #[test]
    fn sip_permutation_mixes_zero_state_deterministically() {
        let permutation = SipPermutation::default();
        let mut a = [1, 0, 0, 0];
        let mut b = [1, 0, 0, 0];
        permutation.permute(&mut a);
        permutation.permute(&mut b);
        assert_eq!(a, b);
        assert_ne!(a, [1, 0, 0, 0]);

        let mut zero = [0; 4];
        permutation.permute(&mut zero);
        assert_eq!(zero, [0; 4]);
    }

    #[test]
    fn hashers_from_one_factory_are_independent() {
        let builder = SpongeBuildHasher::<SipPermutation>::default();
        let mut first = builder.build_hasher();
        first.write(7);
        let _ = builder.build_hasher();
        let mut second = builder.build_hasher();
        second.write(7);
        assert_eq!(first.finish(), second.finish());
        assert_ne!(builder.hash_one(&7u64), builder.hash_one(&8u64));
    }
}
