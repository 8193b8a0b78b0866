//! Energy-barrier searches over the bit-flip graph `{0,1}^n`.
//!
//! The barrier of a target `c` is the minimum, over all walks from the zero vector to `c`
//! that flip one bit per step, of the largest energy met along the walk. Two independent
//! engines compute it:
//! - [`barrier_best_first`]: a Dijkstra-style search ordered by running peak energy
//! - [`barrier_exhaustive`]: depth-first backtracking with dominance pruning
//!
//! They must agree on every input, and the tests check that they do. Both are exponential
//! in `n` in the worst case; a [`SearchConfig`] can bound the work they do.
//!
//! The searches do not require the target to be a codeword: every vertex of the hypercube
//! is reachable, so the barrier is well defined for any state of the right length.

mod best_first;
mod exhaustive;
mod store;

pub use best_first::{barrier_best_first, barrier_best_first_with};
pub use exhaustive::{barrier_exhaustive, barrier_exhaustive_with};
pub use store::{DenseStore, HashStore, VisitedStore, AUTO_DENSE_MAX_BITS, DENSE_MAX_BITS};

use crate::{BarrierError, BitMatrix, BitVector, LinearCode};
use std::time::Instant;

/// Which [`VisitedStore`] a search keeps its best-known peaks in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StoreKind {
    /// Hash map keyed by the packed state; works for any `n`.
    Hash,
    /// Array of `2^n` slots indexed by the state's integer value; `n <= DENSE_MAX_BITS`.
    Dense,
    /// `Dense` when `n <= AUTO_DENSE_MAX_BITS`, `Hash` otherwise.
    #[default]
    Auto,
}

/// Tuning and limits for a single barrier search.
#[derive(Clone, Debug, Default)]
pub struct SearchConfig {
    pub store: StoreKind,

    /// Give up after this many expansions (queue pops or DFS frames).
    pub max_expansions: Option<usize>,

    /// Give up once this instant has passed. Checked once per expansion.
    pub deadline: Option<Instant>,
}

impl SearchConfig {
    pub fn with_store(mut self, store: StoreKind) -> Self {
        self.store = store;
        self
    }

    pub fn with_max_expansions(mut self, max_expansions: usize) -> Self {
        self.max_expansions = Some(max_expansions);
        self
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    fn resolve_store(&self, bits: usize) -> StoreKind {
        match self.store {
            StoreKind::Auto if bits <= AUTO_DENSE_MAX_BITS => StoreKind::Dense,
            StoreKind::Auto => StoreKind::Hash,
            kind => kind,
        }
    }
}

/// Counts expansions and enforces the limits of a [`SearchConfig`].
#[derive(Debug)]
pub(crate) struct Budget {
    expansions: usize,
    max_expansions: Option<usize>,
    deadline: Option<Instant>,
}

impl Budget {
    pub(crate) fn new(config: &SearchConfig) -> Self {
        Budget {
            expansions: 0,
            max_expansions: config.max_expansions,
            deadline: config.deadline,
        }
    }

    #[inline]
    pub(crate) fn tick(&mut self) -> Result<(), BarrierError> {
        if self.max_expansions.is_some_and(|max| self.expansions >= max) {
            return Err(BarrierError::LimitExceeded {
                expansions: self.expansions,
            });
        }
        if self.deadline.is_some_and(|d| Instant::now() >= d) {
            return Err(BarrierError::DeadlineExceeded);
        }
        self.expansions += 1;
        Ok(())
    }

    pub(crate) fn expansions(&self) -> usize {
        self.expansions
    }
}

/// Selects one of the two barrier engines.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BarrierEngine {
    #[default]
    BestFirst,
    Exhaustive,
}

impl BarrierEngine {
    /// Computes the barrier of `target` with this engine.
    ///
    /// # Errors
    ///
    /// See [`barrier_best_first_with`] and [`barrier_exhaustive_with`].
    pub fn barrier(
        self,
        h: &BitMatrix,
        target: &BitVector,
        config: &SearchConfig,
    ) -> Result<usize, BarrierError> {
        match self {
            BarrierEngine::BestFirst => barrier_best_first_with(h, target, config),
            BarrierEngine::Exhaustive => barrier_exhaustive_with(h, target, config),
        }
    }
}

/// Checks that `target` lives in the state space of `h`.
fn check_target(h: &BitMatrix, target: &BitVector) -> Result<(), BarrierError> {
    if target.len() != h.cols() {
        return Err(BarrierError::LengthMismatch {
            expected: h.cols(),
            found: target.len(),
        });
    }
    Ok(())
}

/// Runs `search` against the store selected by `config` for an `n`-bit state space.
fn with_store<T>(
    bits: usize,
    config: &SearchConfig,
    search: impl FnOnce(&mut dyn VisitedStore) -> Result<T, BarrierError>,
) -> Result<T, BarrierError> {
    match config.resolve_store(bits) {
        StoreKind::Dense => search(&mut DenseStore::new(bits)?),
        _ => search(&mut HashStore::default()),
    }
}

/// The smallest barrier over all non-zero codewords of the code, with a codeword that
/// attains it (the lexicographically first one on ties).
///
/// Returns `None` for the trivial code.
///
/// # Errors
///
/// Propagates enumeration and search errors.
pub fn code_barrier(
    code: &LinearCode,
    engine: BarrierEngine,
    config: &SearchConfig,
) -> Result<Option<(usize, BitVector)>, BarrierError> {
    let mut best: Option<(usize, BitVector)> = None;
    for word in code.sorted_codewords()? {
        if word.is_zero() {
            continue;
        }
        let e = engine.barrier(code.parity_check(), &word, config)?;
        if best.as_ref().map_or(true, |(b, _)| e < *b) {
            best = Some((e, word));
        }
    }
    Ok(best)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::code::enumerate_codewords;
    use rand::{rngs::SmallRng, SeedableRng};
    use std::time::Duration;

    fn cyclic3() -> BitMatrix {
        BitMatrix::from_rows(&[[1u8, 1, 0], [0, 1, 1], [1, 0, 1]]).unwrap()
    }

    #[test]
    fn engines_agree_on_random_codes() {
        let mut rng = SmallRng::seed_from_u64(1);
        for (rows, cols) in [(3, 6), (4, 8), (5, 9), (6, 10), (4, 11)] {
            let h = BitMatrix::random(&mut rng, rows, cols);
            for word in enumerate_codewords(&h).unwrap() {
                let a = barrier_best_first(&h, &word).unwrap();
                let b = barrier_exhaustive(&h, &word).unwrap();
                assert_eq!(a, b, "engines disagree on {word} for\n{h}");
            }
        }
    }

    #[test]
    fn stores_agree() {
        let mut rng = SmallRng::seed_from_u64(5);
        let h = BitMatrix::random(&mut rng, 5, 10);
        for word in enumerate_codewords(&h).unwrap() {
            let mut results = vec![];
            for store in [StoreKind::Hash, StoreKind::Dense, StoreKind::Auto] {
                let config = SearchConfig::default().with_store(store);
                for engine in [BarrierEngine::BestFirst, BarrierEngine::Exhaustive] {
                    results.push(engine.barrier(&h, &word, &config).unwrap());
                }
            }
            assert!(results.windows(2).all(|w| w[0] == w[1]), "{results:?}");
        }
    }

    #[test]
    fn code_barrier_of_cyclic_code() {
        let code = LinearCode::new(cyclic3());
        let (e, word) = code_barrier(&code, BarrierEngine::BestFirst, &SearchConfig::default())
            .unwrap()
            .unwrap();
        assert_eq!(word.to_string(), "111");
        assert_eq!(e, 2);

        let trivial = LinearCode::new(BitMatrix::identity(3));
        assert_eq!(
            code_barrier(&trivial, BarrierEngine::Exhaustive, &SearchConfig::default()),
            Ok(None)
        );
    }

    #[test]
    fn expansion_limit_is_enforced() {
        let h = BitMatrix::build(11, 12, |i, j| j == i || j == i + 1);
        let target = BitVector::build(12, |_| true);
        let config = SearchConfig::default().with_max_expansions(3);
        for engine in [BarrierEngine::BestFirst, BarrierEngine::Exhaustive] {
            assert_eq!(
                engine.barrier(&h, &target, &config),
                Err(BarrierError::LimitExceeded { expansions: 3 })
            );
        }
    }

    #[test]
    fn past_deadline_stops_immediately() {
        let h = cyclic3();
        let target: BitVector = "111".parse().unwrap();
        let deadline = Instant::now() - Duration::from_millis(1);
        let config = SearchConfig::default().with_deadline(deadline);
        assert_eq!(
            barrier_best_first_with(&h, &target, &config),
            Err(BarrierError::DeadlineExceeded)
        );
        assert_eq!(
            barrier_exhaustive_with(&h, &target, &config),
            Err(BarrierError::DeadlineExceeded)
        );
    }

    #[test]
    fn auto_store_is_dense_only_for_small_spaces() {
        let config = SearchConfig::default();
        assert_eq!(config.resolve_store(AUTO_DENSE_MAX_BITS), StoreKind::Dense);
        assert_eq!(config.resolve_store(AUTO_DENSE_MAX_BITS + 1), StoreKind::Hash);
        assert_eq!(config.resolve_store(DENSE_MAX_BITS), StoreKind::Hash);
        let dense = config.with_store(StoreKind::Dense);
        assert_eq!(dense.resolve_store(DENSE_MAX_BITS), StoreKind::Dense);
    }

    #[test]
    fn short_walks_at_24_bits_are_cheap() {
        // every flip is free, so the target is found after about 25 pops
        let h = BitMatrix::zeros(2, 24);
        let target = BitVector::build(24, |i| i == 23);
        let start = Instant::now();
        for _ in 0..50 {
            assert_eq!(barrier_best_first(&h, &target), Ok(0));
        }
        assert!(start.elapsed() < Duration::from_secs(1), "{:?}", start.elapsed());

        let config = SearchConfig::default().with_store(StoreKind::Dense);
        assert_eq!(barrier_best_first_with(&h, &target, &config), Ok(0));
    }

    #[test]
    fn dense_store_ceiling() {
        let h = BitMatrix::zeros(1, DENSE_MAX_BITS + 1);
        let target = BitVector::build(DENSE_MAX_BITS + 1, |i| i == 0);
        let config = SearchConfig::default().with_store(StoreKind::Dense);
        assert_eq!(
            barrier_best_first_with(&h, &target, &config),
            Err(BarrierError::StateSpaceTooLarge {
                bits: DENSE_MAX_BITS + 1,
                max: DENSE_MAX_BITS
            })
        );
        // the hash store has no ceiling
        let config = SearchConfig::default().with_store(StoreKind::Hash);
        assert_eq!(barrier_best_first_with(&h, &target, &config), Ok(0));
    }
}
