//! Random sparse parity-check matrices with bounded row and column weights.

use crate::{BarrierError, BitMatrix};
use rand::{seq::SliceRandom, Rng};
use tracing::{debug, trace};

/// Whole-matrix attempts made by [`random_parity_check`] before giving up
pub const MAX_ATTEMPTS: usize = 100;

/// Attempts per row within one whole-matrix attempt
pub const ROW_ATTEMPTS: usize = 10;

/// Samples an `m × n` parity-check matrix for a code with at least one non-zero codeword.
///
/// Rows are filled one at a time. Each row draws a weight uniformly from `2..=min(w, n)`
/// and places that many 1s on a random subset of the columns whose weight is still below
/// `w`, or on all of them if fewer remain (never fewer than 2). If the finished matrix has
/// full column rank, its last row is replaced by the sum of a random subset of the earlier
/// rows, padded with random 1s up to weight 2. That replacement row is not held to the
/// weight bounds, so callers that need them should check [`satisfies_degree_bound`].
///
/// A `w` below 2 is treated as 2.
///
/// # Errors
///
/// - [`BarrierError::InvalidParameter`] if `n < 2`
/// - [`BarrierError::SamplerExhausted`] if no attempt produces a matrix of rank below `n`
pub fn random_parity_check(
    rng: &mut impl Rng,
    m: usize,
    n: usize,
    w: usize,
) -> Result<BitMatrix, BarrierError> {
    if n < 2 {
        return Err(BarrierError::InvalidParameter(format!(
            "a parity-check matrix needs at least 2 columns, got {n}"
        )));
    }
    let w = w.max(2);

    for attempt in 0..MAX_ATTEMPTS {
        let Some(mut h) = sample_rows(rng, m, n, w) else {
            trace!(attempt, "ran out of columns below the weight bound");
            continue;
        };
        if h.rank() >= n {
            debug!(attempt, m, n, "full column rank, replacing the last row");
            make_last_row_dependent(rng, &mut h);
            if h.rank() >= n {
                continue;
            }
        }
        return Ok(h);
    }

    Err(BarrierError::SamplerExhausted {
        attempts: MAX_ATTEMPTS,
    })
}

fn sample_rows(rng: &mut impl Rng, m: usize, n: usize, w: usize) -> Option<BitMatrix> {
    let mut h = BitMatrix::zeros(m, n);
    let mut col_weights = vec![0; n];

    for i in 0..m {
        let placed = (0..ROW_ATTEMPTS).any(|_| {
            let row_weight = rng.random_range(2..=w.min(n));
            let mut valid: Vec<usize> = (0..n).filter(|&c| col_weights[c] < w).collect();
            if valid.len() < 2 {
                return false;
            }
            valid.shuffle(rng);
            for &c in valid.iter().take(row_weight) {
                h.set_bit(i, c, true);
                col_weights[c] += 1;
            }
            true
        });
        if !placed {
            return None;
        }
    }

    Some(h)
}

fn make_last_row_dependent(rng: &mut impl Rng, h: &mut BitMatrix) {
    let (m, n) = (h.rows(), h.cols());
    let Some(last) = m.checked_sub(1) else {
        return;
    };
    for c in 0..n {
        h.set_bit(last, c, false);
    }
    for row in 0..last {
        if rng.random() {
            h.add_row(row, last);
        }
    }

    let ones = h.row_weight(last);
    if ones < 2 {
        let mut zeros: Vec<usize> = (0..n).filter(|&c| !h.bit(last, c)).collect();
        zeros.shuffle(rng);
        for &c in zeros.iter().take(2 - ones) {
            h.set_bit(last, c, true);
        }
    }
}

/// Returns true if `h` is non-empty and every row and column has weight at most `w`.
pub fn satisfies_degree_bound(h: &BitMatrix, w: usize) -> bool {
    h.rows() > 0
        && (0..h.rows()).all(|i| h.row_weight(i) <= w)
        && (0..h.cols()).all(|j| h.col_weight(j) <= w)
}
