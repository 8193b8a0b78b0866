use super::{check_target, with_store, Budget, SearchConfig, VisitedStore};
use crate::energy::Landscape;
use crate::{BarrierError, BitMatrix, BitVector};
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use tracing::{debug, error};

/// A state waiting in the frontier, with the peak energy of the walk that reached it.
#[derive(Debug, Clone, PartialEq, Eq)]
struct FrontierEntry {
    peak: usize,
    seq: u64,
    state: BitVector,
    syndrome: BitVector,
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for a min-heap: lowest peak first, then insertion order.
        other
            .peak
            .cmp(&self.peak)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Minimal peak energy over all bit-flip walks from 0 to `target`, by best-first search.
///
/// Uses the default [`SearchConfig`]: no limits, dense store for `n <= 16`.
///
/// # Errors
///
/// See [`barrier_best_first_with`].
pub fn barrier_best_first(h: &BitMatrix, target: &BitVector) -> Result<usize, BarrierError> {
    barrier_best_first_with(h, target, &SearchConfig::default())
}

/// Minimal peak energy over all bit-flip walks from 0 to `target`, by best-first search.
///
/// States are popped in non-decreasing order of the peak of the walk that reached them,
/// so the first time `target` is popped its peak is the barrier. A successor is queued
/// only when it improves on the best peak recorded for it, and queue entries that no
/// longer match the recorded value are skipped when popped.
///
/// # Errors
///
/// - [`BarrierError::LengthMismatch`] if `target` does not have one bit per column of `h`
/// - [`BarrierError::StateSpaceTooLarge`] if a dense store was requested for too many bits
/// - [`BarrierError::LimitExceeded`] / [`BarrierError::DeadlineExceeded`] from `config`
/// - [`BarrierError::Unreachable`] if the frontier empties first, which indicates a bug
pub fn barrier_best_first_with(
    h: &BitMatrix,
    target: &BitVector,
    config: &SearchConfig,
) -> Result<usize, BarrierError> {
    check_target(h, target)?;
    if target.is_zero() {
        return Ok(0);
    }
    let landscape = Landscape::new(h);
    let mut budget = Budget::new(config);
    let result = with_store(h.cols(), config, |store| {
        search(&landscape, target, store, &mut budget)
    });
    debug!(
        bits = h.cols(),
        checks = h.rows(),
        expansions = budget.expansions(),
        barrier = ?result.as_ref().ok(),
        "best-first barrier search finished"
    );
    result
}

fn search(
    landscape: &Landscape,
    target: &BitVector,
    store: &mut dyn VisitedStore,
    budget: &mut Budget,
) -> Result<usize, BarrierError> {
    let n = landscape.bits();
    let start = BitVector::zeros(n);
    let syndrome = landscape.syndrome_of(&start);
    let peak = syndrome.weight();
    store.record(&start, peak);

    let mut seq = 0;
    let mut frontier = BinaryHeap::new();
    frontier.push(FrontierEntry {
        peak,
        seq,
        state: start,
        syndrome,
    });

    while let Some(entry) = frontier.pop() {
        budget.tick()?;
        if entry.state == *target {
            return Ok(entry.peak);
        }
        if store.best(&entry.state).is_some_and(|best| best < entry.peak) {
            continue;
        }

        for bit in 0..n {
            let next = entry.state.flipped(bit);
            let mut next_syndrome = entry.syndrome.clone();
            let energy = landscape.flip(&mut next_syndrome, bit);
            let next_peak = entry.peak.max(energy);
            if store.improve(&next, next_peak) {
                seq += 1;
                frontier.push(FrontierEntry {
                    peak: next_peak,
                    seq,
                    state: next,
                    syndrome: next_syndrome,
                });
            }
        }
    }

    error!(bits = n, visited = store.len(), "best-first search exhausted the hypercube");
    Err(BarrierError::Unreachable { bits: n })
}
