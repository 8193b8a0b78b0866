use super::{check_target, with_store, Budget, SearchConfig, VisitedStore};
use crate::energy::Landscape;
use crate::{BarrierError, BitMatrix, BitVector};
use tracing::{debug, error, trace};

/// A state on the DFS path, with the next bit to try flipping from it.
#[derive(Debug)]
struct Frame {
    state: BitVector,
    syndrome: BitVector,
    peak: usize,
    next_bit: usize,
}

impl Frame {
    fn new(state: BitVector, syndrome: BitVector, peak: usize) -> Self {
        Frame {
            state,
            syndrome,
            peak,
            next_bit: 0,
        }
    }
}

/// Minimal peak energy over all bit-flip walks from 0 to `target`, by exhaustive
/// depth-first search.
///
/// Uses the default [`SearchConfig`].
///
/// # Errors
///
/// See [`barrier_exhaustive_with`].
pub fn barrier_exhaustive(h: &BitMatrix, target: &BitVector) -> Result<usize, BarrierError> {
    barrier_exhaustive_with(h, target, &SearchConfig::default())
}

/// Minimal peak energy over all bit-flip walks from 0 to `target`, by exhaustive
/// depth-first search.
///
/// A state is (re)explored whenever it is reached with a strictly lower running peak than
/// any earlier visit, and a branch is cut as soon as its peak can no longer beat the best
/// barrier found so far. Bits are tried in increasing order. The DFS path lives on an
/// explicit stack, so deep walks do not grow the call stack.
///
/// This is slower than [`barrier_best_first`](super::barrier_best_first) on most inputs;
/// it exists as an independent check on it.
///
/// # Errors
///
/// The same as [`barrier_best_first_with`](super::barrier_best_first_with).
pub fn barrier_exhaustive_with(
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
    let mut best = None;
    let result = with_store(h.cols(), config, |store| {
        search(&landscape, target, store, &mut budget, &mut best)
    });
    debug!(
        bits = h.cols(),
        checks = h.rows(),
        expansions = budget.expansions(),
        barrier = ?best,
        "exhaustive barrier search finished"
    );
    result?;
    best.ok_or_else(|| {
        error!(bits = h.cols(), "exhaustive search never reached the target");
        BarrierError::Unreachable { bits: h.cols() }
    })
}

fn search(
    landscape: &Landscape,
    target: &BitVector,
    store: &mut dyn VisitedStore,
    budget: &mut Budget,
    best: &mut Option<usize>,
) -> Result<(), BarrierError> {
    let n = landscape.bits();
    let start = BitVector::zeros(n);
    let syndrome = landscape.syndrome_of(&start);
    let peak = syndrome.weight();
    store.record(&start, peak);

    let mut stack = vec![Frame::new(start, syndrome, peak)];
    while let Some(frame) = stack.last_mut() {
        if frame.next_bit == 0 {
            budget.tick()?;
            if frame.state == *target {
                trace!(peak = frame.peak, "reached target");
                *best = Some(best.map_or(frame.peak, |b| b.min(frame.peak)));
                stack.pop();
                continue;
            }
        }

        let cannot_improve = best.is_some_and(|b| frame.peak >= b);
        let superseded = store.best(&frame.state).is_some_and(|b| b < frame.peak);
        if frame.next_bit == n || cannot_improve || superseded {
            stack.pop();
            continue;
        }

        let bit = frame.next_bit;
        frame.next_bit += 1;
        let mut next_syndrome = frame.syndrome.clone();
        let energy = landscape.flip(&mut next_syndrome, bit);
        let next_peak = frame.peak.max(energy);
        if best.is_some_and(|b| next_peak >= b) {
            continue;
        }
        let next = frame.state.flipped(bit);
        if store.improve(&next, next_peak) {
            stack.push(Frame::new(next, next_syndrome, next_peak));
        }
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn zero_target_has_zero_barrier() {
        let h = BitMatrix::from_rows(&[[1u8, 1]]).unwrap();
        assert_eq!(barrier_exhaustive(&h, &BitVector::zeros(2)), Ok(0));
    }

    #[test]
    fn repetition_code_barrier_is_one() {
        let h = BitMatrix::build(4, 5, |i, j| j == i || j == i + 1);
        assert_eq!(barrier_exhaustive(&h, &"11111".parse().unwrap()), Ok(1));
    }

    #[test]
    fn cyclic_code_barrier_is_two() {
        let h = BitMatrix::from_rows(&[[1u8, 1, 0], [0, 1, 1], [1, 0, 1]]).unwrap();
        assert_eq!(barrier_exhaustive(&h, &"111".parse().unwrap()), Ok(2));
    }

    #[test]
    fn unconstrained_bits_cost_nothing() {
        // the last two bits appear in no check
        let h = BitMatrix::from_rows(&[[1u8, 1, 0, 0]]).unwrap();
        assert_eq!(barrier_exhaustive(&h, &"0011".parse().unwrap()), Ok(0));
        assert_eq!(barrier_exhaustive(&h, &"1111".parse().unwrap()), Ok(1));
    }

    #[test]
    fn rejects_wrong_length() {
        let h = BitMatrix::zeros(1, 2);
        assert!(matches!(
            barrier_exhaustive(&h, &BitVector::zeros(3)),
            Err(BarrierError::LengthMismatch { .. })
        ));
    }
}
