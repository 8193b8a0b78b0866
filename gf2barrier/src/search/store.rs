use crate::{BarrierError, BitVector};
use rustc_hash::FxHashMap;

/// Largest `n` the [`DenseStore`] accepts: `2^24` slots of `u32`, 64 MiB.
pub const DENSE_MAX_BITS: usize = 24;

/// Largest `n` for which `StoreKind::Auto` picks the [`DenseStore`]: 256 KiB of slots.
pub const AUTO_DENSE_MAX_BITS: usize = 16;

const UNVISITED: u32 = 0;

/// Best-known (lowest) running peak for every state a search has reached.
///
/// The searches only talk to this trait, so the storage strategy can change without
/// touching search logic.
pub trait VisitedStore {
    /// Lowest peak recorded for `state`, if it was reached.
    fn best(&self, state: &BitVector) -> Option<usize>;

    /// Records `peak` for `state`, replacing any previous value.
    fn record(&mut self, state: &BitVector, peak: usize);

    /// Number of distinct states recorded.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Records `peak` for `state` unless a value `<= peak` is already recorded.
    ///
    /// Returns true if the value was recorded, i.e. the state should be (re)explored.
    fn improve(&mut self, state: &BitVector, peak: usize) -> bool {
        match self.best(state) {
            Some(best) if best <= peak => false,
            _ => {
                self.record(state, peak);
                true
            }
        }
    }
}

/// Hash map from packed states to peaks. No limit on `n` beyond memory.
#[derive(Debug, Default)]
pub struct HashStore {
    peaks: FxHashMap<BitVector, usize>,
}

impl VisitedStore for HashStore {
    #[inline]
    fn best(&self, state: &BitVector) -> Option<usize> {
        self.peaks.get(state).copied()
    }

    #[inline]
    fn record(&mut self, state: &BitVector, peak: usize) {
        self.peaks.insert(state.clone(), peak);
    }

    fn len(&self) -> usize {
        self.peaks.len()
    }

    fn improve(&mut self, state: &BitVector, peak: usize) -> bool {
        match self.peaks.get_mut(state) {
            Some(best) if *best <= peak => false,
            Some(best) => {
                *best = peak;
                true
            }
            None => {
                self.peaks.insert(state.clone(), peak);
                true
            }
        }
    }
}

/// One slot per state, indexed by [`BitVector::to_index`].
///
/// Allocates `2^n` zeroed slots up front, so it is only available for
/// `n <= DENSE_MAX_BITS`. A slot holds `peak + 1`, with 0 meaning unvisited.
#[derive(Debug)]
pub struct DenseStore {
    peaks: Vec<u32>,
    visited: usize,
}

impl DenseStore {
    /// # Errors
    ///
    /// If `bits > DENSE_MAX_BITS`.
    pub fn new(bits: usize) -> Result<Self, BarrierError> {
        if bits > DENSE_MAX_BITS {
            return Err(BarrierError::StateSpaceTooLarge {
                bits,
                max: DENSE_MAX_BITS,
            });
        }
        Ok(DenseStore {
            peaks: vec![UNVISITED; 1 << bits],
            visited: 0,
        })
    }

    #[inline]
    fn slot(state: &BitVector) -> usize {
        state.to_index().map_or(usize::MAX, |i| i as usize)
    }
}

impl VisitedStore for DenseStore {
    #[inline]
    fn best(&self, state: &BitVector) -> Option<usize> {
        match self.peaks.get(Self::slot(state)) {
            Some(&UNVISITED) | None => None,
            Some(&slot) => Some(slot as usize - 1),
        }
    }

    #[inline]
    fn record(&mut self, state: &BitVector, peak: usize) {
        let slot = Self::slot(state);
        debug_assert!(slot < self.peaks.len(), "state {state} outside dense store");
        if let Some(entry) = self.peaks.get_mut(slot) {
            if *entry == UNVISITED {
                self.visited += 1;
            }
            // energies never exceed the number of checks, far below u32::MAX
            *entry = u32::try_from(peak + 1).unwrap_or(u32::MAX);
        }
    }

    fn len(&self) -> usize {
        self.visited
    }
}
