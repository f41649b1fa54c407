//! Seedable random source for the search.
//!
//! The only randomness in the engine is the uniform choice of which freshly
//! expanded child gets evaluated. The generator is passed into the search
//! explicitly, so a fixed seed reproduces a run exactly.
//!
//! ```
//! use knight_tour::core::TourRng;
//!
//! let mut a = TourRng::new(42);
//! let mut b = TourRng::new(42);
//! assert_eq!(a.gen_index(100), b.gen_index(100));
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Deterministic RNG used for child selection.
///
/// Uses ChaCha8 for speed while keeping a reproducible, serializable state.
#[derive(Clone, Debug)]
pub struct TourRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl TourRng {
    /// Seeded generator; the same seed replays the same choices.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create an RNG seeded from the operating system.
    ///
    /// The chosen seed is still recorded so the run can be replayed.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(rand::thread_rng().gen())
    }

    /// The seed this generator started from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform index in `0..len`. `len` must be non-zero.
    pub fn gen_index(&mut self, len: usize) -> usize {
        self.inner.gen_range(0..len)
    }

    /// Uniform pick from `slice`, `None` when it is empty.
    #[must_use]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose(&mut self.inner)
    }

    /// Snapshot of the stream position.
    #[must_use]
    pub fn state(&self) -> TourRngState {
        TourRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
        }
    }

    /// Resume a generator from a snapshot taken with [`TourRng::state`].
    #[must_use]
    pub fn from_state(state: &TourRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
        }
    }
}

/// Seed plus stream position; enough to resume a generator exactly.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TourRngState {
    /// Seed the generator started from.
    pub seed: u64,
    /// Words consumed from the ChaCha8 stream.
    pub word_pos: u128,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let mut rng1 = TourRng::new(42);
        let mut rng2 = TourRng::new(42);

        for _ in 0..100 {
            assert_eq!(rng1.gen_index(1000), rng2.gen_index(1000));
        }
    }

    #[test]
    fn test_seeds_diverge() {
        let mut a = TourRng::new(1);
        let mut b = TourRng::new(2);

        let first: Vec<_> = (0..10).map(|_| a.gen_index(1000)).collect();
        let second: Vec<_> = (0..10).map(|_| b.gen_index(1000)).collect();

        assert_ne!(first, second);
    }

    #[test]
    fn test_from_entropy_records_seed() {
        let rng = TourRng::from_entropy();
        let mut replay = TourRng::new(rng.seed());
        let mut original = rng.clone();

        assert_eq!(original.gen_index(1000), replay.gen_index(1000));
    }

    #[test]
    fn test_choose() {
        let mut rng = TourRng::new(42);
        let squares = [(2, 1), (1, 2)];

        for _ in 0..20 {
            let picked = rng.choose(&squares[..]).copied();
            assert!(matches!(picked, Some((2, 1)) | Some((1, 2))));
        }
        assert_eq!(rng.choose::<(u8, u8)>(&[]), None);
    }

    #[test]
    fn test_state_restores_sequence() {
        let mut rng = TourRng::new(42);
        for _ in 0..100 {
            rng.gen_index(1000);
        }

        let state = rng.state();
        let expected: Vec<_> = (0..10).map(|_| rng.gen_index(1000)).collect();

        let mut restored = TourRng::from_state(&state);
        let actual: Vec<_> = (0..10).map(|_| restored.gen_index(1000)).collect();

        assert_eq!(expected, actual);
    }

    #[test]
    fn test_state_serde() {
        let state = TourRngState {
            seed: 42,
            word_pos: 12345,
        };

        let json = serde_json::to_string(&state).unwrap();

        assert_eq!(serde_json::from_str::<TourRngState>(&json).unwrap(), state);
    }
}
