//! Probe arithmetic and the load-factor guard.

/// Occupancy ceiling as a fraction: tables must stay below 3/4 full.
const MAX_LOAD_NUMERATOR: u128 = 3;
const MAX_LOAD_DENOMINATOR: u128 = 4;

/// Returns the table index visited on probe `attempt` for `hash`.
///
/// The offsets are the triangular numbers 0, 1, 3, 6, 10, ... so colliding
/// keys spread out quadratically. For power-of-two capacities the first
/// `capacity` attempts visit every slot; for other capacities (primes
/// included) some slots may be visited twice and others skipped.
///
/// ```rust
/// use bounded_hash::probe::quadratic_probe;
///
/// let visited: Vec<usize> = (0..4).map(|attempt| quadratic_probe(2, attempt, 7)).collect();
/// assert_eq!(visited, [2, 3, 5, 1]);
/// ```
#[inline]
pub fn quadratic_probe(hash: u64, attempt: usize, capacity: usize) -> usize {
    debug_assert!(capacity > 0);
    let capacity = capacity as u128;
    let attempt = attempt as u128;
    let offset = (attempt + attempt * attempt) / 2;
    ((hash as u128 % capacity + offset % capacity) % capacity) as usize
}

/// Returns `true` if a table of `capacity` slots holding `len` entries is at
/// or above the 3/4 occupancy ceiling.
///
/// Computed by cross-multiplication, `len * 4 >= capacity * 3`.
#[inline]
pub fn exceeds_load_factor(len: usize, capacity: usize) -> bool {
    len as u128 * MAX_LOAD_DENOMINATOR >= capacity as u128 * MAX_LOAD_NUMERATOR
}

/// The quadratic probe sequence of one hash, one index per attempt.
#[derive(Clone, Debug)]
pub struct ProbeSeq {
    hash: u64,
    attempt: usize,
    capacity: usize,
}

impl ProbeSeq {
    /// Starts the sequence for `hash` in a table of `capacity` slots.
    #[inline]
    pub fn new(hash: u64, capacity: usize) -> Self {
        ProbeSeq {
            hash,
            attempt: 0,
            capacity,
        }
    }
}

impl Iterator for ProbeSeq {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        if self.attempt == self.capacity {
            return None;
        }
        let index = quadratic_probe(self.hash, self.attempt, self.capacity);
        self.attempt += 1;
        Some(index)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.capacity - self.attempt;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ProbeSeq {}
