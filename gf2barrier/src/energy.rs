//! The energy of a state: the number of parity checks it violates.

use crate::{BarrierError, BitMatrix, BitVector};

/// Returns the syndrome `H * x` over GF(2).
///
/// # Errors
///
/// If `x` does not have one entry per column of `h`.
#[inline]
pub fn syndrome(h: &BitMatrix, x: &BitVector) -> Result<BitVector, BarrierError> {
    h.try_mul_vector(x)
}

/// Returns the Hamming weight of the syndrome of `x`, i.e. the number of violated checks.
///
/// This evaluates every row of `h` and costs `O(l * n / 64)`. The barrier searches use a
/// [`Landscape`] instead, which updates the syndrome incrementally after each bit flip.
///
/// # Errors
///
/// If `x` does not have one entry per column of `h`.
pub fn energy(h: &BitMatrix, x: &BitVector) -> Result<usize, BarrierError> {
    if x.len() != h.cols() {
        return Err(BarrierError::LengthMismatch {
            expected: h.cols(),
            found: x.len(),
        });
    }
    let xr = x.as_range();
    Ok((0..h.rows()).filter(|&r| h.row(r).dot(xr)).count())
}

/// Returns true if `x` satisfies every check of `h`.
///
/// # Errors
///
/// If `x` does not have one entry per column of `h`.
pub fn is_codeword(h: &BitMatrix, x: &BitVector) -> Result<bool, BarrierError> {
    Ok(energy(h, x)? == 0)
}

#[inline]
pub fn hamming_weight(x: &BitVector) -> usize {
    x.weight()
}

/// The energy landscape over `{0,1}^n` defined by a parity-check matrix.
///
/// Holds the columns of `H`, so flipping bit `i` of a state changes its syndrome by XOR
/// with column `i`. A search carries each state's syndrome alongside the state and never
/// re-evaluates `H` from scratch.
#[derive(Clone, Debug)]
pub struct Landscape {
    columns: Vec<BitVector>,
    checks: usize,
}

impl Landscape {
    pub fn new(h: &BitMatrix) -> Self {
        Landscape {
            columns: (0..h.cols()).map(|j| h.column(j)).collect(),
            checks: h.rows(),
        }
    }

    /// Number of bits `n` in a state
    #[inline]
    pub fn bits(&self) -> usize {
        self.columns.len()
    }

    /// Number of checks `l`
    #[inline]
    pub fn checks(&self) -> usize {
        self.checks
    }

    /// Syndrome of an arbitrary state, assembled from the columns in its support
    pub fn syndrome_of(&self, x: &BitVector) -> BitVector {
        debug_assert_eq!(x.len(), self.bits());
        let mut s = BitVector::zeros(self.checks);
        for i in x.support() {
            s ^= &self.columns[i];
        }
        s
    }

    /// Updates `syndrome` for a flip of bit `bit` and returns the new energy
    #[inline]
    pub fn flip(&self, syndrome: &mut BitVector, bit: usize) -> usize {
        *syndrome ^= &self.columns[bit];
        syndrome.weight()
    }
}
