//! Hashing capabilities consumed by [`HashMap`](crate::HashMap).
//!
//! The traits mirror the shape of [`core::hash`], with two differences: a
//! [`Hasher`] digests a stream of 64-bit words rather than bytes, and
//! [`Hasher::finish`] consumes the hasher so that every digest comes from a
//! fresh instance handed out by a [`BuildHasher`].
//!
//! Any `core::hash` hasher can be plugged in through [`CoreBuildHasher`].

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Debug;
use core::marker::PhantomData;

/// A stateful accumulator that turns a stream of words into a single digest.
pub trait Hasher {
    /// Appends one word to the hasher's input.
    fn write(&mut self, word: u64);

    /// Appends every word of `words`, in order.
    #[inline]
    fn write_words(&mut self, words: &[u64]) {
        for &word in words {
            self.write(word);
        }
    }

    /// Consumes the hasher and returns the digest of everything written.
    fn finish(self) -> u64;
}

/// A value that can feed its representation into a [`Hasher`].
///
/// Values that compare equal must write identical word streams.
pub trait Hash {
    /// Feeds this value into the given hasher.
    fn hash<H: Hasher>(&self, state: &mut H);

    /// Feeds a slice of values into the given hasher, without a length
    /// prefix.
    #[inline]
    fn hash_slice<H: Hasher>(data: &[Self], state: &mut H)
    where
        Self: Sized,
    {
        for piece in data {
            piece.hash(state);
        }
    }
}

/// A factory producing independent [`Hasher`] instances.
pub trait BuildHasher {
    /// The hasher type produced by this factory.
    type Hasher: Hasher;

    /// Creates a fresh hasher. Hashers returned by separate calls share no
    /// state.
    fn build_hasher(&self) -> Self::Hasher;

    /// Hashes a single value with a fresh hasher.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bounded_hash::hash::BuildHasher;
    /// use bounded_hash::hash::BuildHasherDefault;
    /// use bounded_hash::hash::Hasher;
    ///
    /// #[derive(Default)]
    /// struct Sum(u64);
    ///
    /// impl Hasher for Sum {
    ///     fn write(&mut self, word: u64) {
    ///         self.0 = self.0.wrapping_add(word);
    ///     }
    ///
    ///     fn finish(self) -> u64 {
    ///         self.0
    ///     }
    /// }
    ///
    /// let builder = BuildHasherDefault::<Sum>::new();
    /// assert_eq!(builder.hash_one(&(2u8, 3u32)), 5);
    /// ```
    #[inline]
    fn hash_one<T: Hash + ?Sized>(&self, value: &T) -> u64 {
        let mut hasher = self.build_hasher();
        value.hash(&mut hasher);
        hasher.finish()
    }
}

/// A [`BuildHasher`] that creates hashers through their [`Default`] impl.
pub struct BuildHasherDefault<H>(PhantomData<fn() -> H>);

impl<H> BuildHasherDefault<H> {
    /// Creates the factory.
    pub const fn new() -> Self {
        BuildHasherDefault(PhantomData)
    }
}

impl<H> Default for BuildHasherDefault<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> Clone for BuildHasherDefault<H> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<H> Copy for BuildHasherDefault<H> {}

impl<H> Debug for BuildHasherDefault<H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BuildHasherDefault").finish()
    }
}

impl<H: Default + Hasher> BuildHasher for BuildHasherDefault<H> {
    type Hasher = H;

    #[inline]
    fn build_hasher(&self) -> H {
        H::default()
    }
}

/// Adapts a [`core::hash::Hasher`] to the word-oriented [`Hasher`] trait.
///
/// Each word is forwarded through `write_u64`.
#[derive(Clone, Debug, Default)]
pub struct CoreHasher<H>(H);

impl<H> CoreHasher<H> {
    /// Wraps a `core::hash` hasher.
    pub const fn new(inner: H) -> Self {
        CoreHasher(inner)
    }

    /// Returns the wrapped hasher.
    pub fn into_inner(self) -> H {
        self.0
    }
}

impl<H: core::hash::Hasher> Hasher for CoreHasher<H> {
    #[inline]
    fn write(&mut self, word: u64) {
        self.0.write_u64(word);
    }

    #[inline]
    fn finish(self) -> u64 {
        self.0.finish()
    }
}

/// Adapts a [`core::hash::BuildHasher`] to [`BuildHasher`].
///
/// # Examples
///
/// ```rust
/// use bounded_hash::HashMap;
/// use bounded_hash::hash::CoreBuildHasher;
/// use siphasher::sip::SipHasher;
///
/// let builder = CoreBuildHasher::new(core::hash::BuildHasherDefault::<SipHasher>::default());
/// let mut map: HashMap<u32, &str, 16, _> = HashMap::with_hasher(builder);
/// map.insert(7, "seven");
/// assert_eq!(map.get(&7), Some(&"seven"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct CoreBuildHasher<S>(S);

impl<S> CoreBuildHasher<S> {
    /// Wraps a `core::hash` hasher factory.
    pub const fn new(inner: S) -> Self {
        CoreBuildHasher(inner)
    }
}

impl<S: core::hash::BuildHasher> BuildHasher for CoreBuildHasher<S> {
    type Hasher = CoreHasher<S::Hasher>;

    #[inline]
    fn build_hasher(&self) -> Self::Hasher {
        CoreHasher(self.0.build_hasher())
    }
}

cfg_if::cfg_if! {
    if #[cfg(feature = "foldhash")] {
        /// The hasher factory used when none is named explicitly.
        ///
        /// Backed by foldhash with a fixed seed, so table layouts are
        /// reproducible from run to run.
        pub type DefaultHashBuilder = CoreBuildHasher<foldhash::fast::FixedState>;
    } else if #[cfg(feature = "std")] {
        /// The hasher factory used when none is named explicitly.
        pub type DefaultHashBuilder = CoreBuildHasher<std::hash::RandomState>;
    }
}

macro_rules! impl_hash_word {
    ($($ty:ty)*) => {
        $(
            impl Hash for $ty {
                #[inline]
                fn hash<H: Hasher>(&self, state: &mut H) {
                    state.write(*self as u64);
                }
            }
        )*
    };
}

impl_hash_word!(u8 u16 u32 u64 usize i8 i16 i32 i64 isize);

macro_rules! impl_hash_wide {
    ($($ty:ty)*) => {
        $(
            impl Hash for $ty {
                #[inline]
                fn hash<H: Hasher>(&self, state: &mut H) {
                    let bits = *self as u128;
                    state.write(bits as u64);
                    state.write((bits >> 64) as u64);
                }
            }
        )*
    };
}

impl_hash_wide!(u128 i128);

impl Hash for bool {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write(u64::from(*self));
    }
}

impl Hash for char {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write(u64::from(u32::from(*self)));
    }
}

impl Hash for () {
    #[inline]
    fn hash<H: Hasher>(&self, _state: &mut H) {}
}

impl Hash for str {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let bytes = self.as_bytes();
        state.write(bytes.len() as u64);
        for chunk in bytes.chunks(8) {
            let mut word = [0u8; 8];
            word[..chunk.len()].copy_from_slice(chunk);
            state.write(u64::from_le_bytes(word));
        }
    }
}

impl Hash for String {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl<T: Hash> Hash for [T] {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write(self.len() as u64);
        T::hash_slice(self, state);
    }
}

impl<T: Hash, const M: usize> Hash for [T; M] {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        T::hash_slice(self, state);
    }
}

impl<T: Hash> Hash for Vec<T> {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}

impl<T: Hash + ?Sized> Hash for Box<T> {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        (**self).hash(state);
    }
}

impl<T: Hash + ?Sized> Hash for &T {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        (**self).hash(state);
    }
}

impl<T: Hash + ?Sized> Hash for &mut T {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        (**self).hash(state);
    }
}

impl<T: Hash> Hash for Option<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            None => state.write(0),
            Some(value) => {
                state.write(1);
                value.hash(state);
            }
        }
    }
}

macro_rules! impl_hash_tuple {
    ($($name:ident)+) => {
        impl<$($name: Hash),+> Hash for ($($name,)+) {
            #[allow(non_snake_case)]
            #[inline]
            fn hash<H: Hasher>(&self, state: &mut H) {
                let ($($name,)+) = self;
                $($name.hash(state);)+
            }
        }
    };
}

impl_hash_tuple!(A);
impl_hash_tuple!(A B);
impl_hash_tuple!(A B C);
impl_hash_tuple!(A B C D);
impl_hash_tuple!(A B C D E);
impl_hash_tuple!(A B C D E F);
