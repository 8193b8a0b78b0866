//! Linear codes given by a parity-check matrix: null-space basis, codeword enumeration and
//! minimum distance.
//!
//! A parity-check matrix with no rows says nothing about the code length, so callers that
//! mean "no checks on `n` bits" should build it with [`BitMatrix::zeros`]`(0, n)`; the
//! 0×0 matrix from an empty row list describes the code of length 0, whose single codeword
//! is the empty vector.

use crate::{BarrierError, BitMatrix, BitVector, Rref};

/// Largest code dimension whose `2^k` codewords can be enumerated.
pub const MAX_ENUMERATION_BITS: usize = 63;

/// Computes the reduced row-echelon form of `h`, its pivot columns and its rank.
#[inline]
pub fn row_reduce(h: &BitMatrix) -> Rref {
    h.reduced()
}

/// One basis vector of the null space per free column of the RREF.
///
/// The basis vector for free column `f` has a 1 at `f`, 0 at every other free column, and
/// its pivot entries solved from the RREF rows.
fn basis_from_rref(rref: &Rref) -> Vec<BitVector> {
    let n = rref.matrix.cols();
    rref.free_columns()
        .into_iter()
        .map(|f| {
            let mut v = BitVector::zeros(n);
            v.set_bit(f, true);
            for (row, &p) in rref.pivots.iter().enumerate() {
                if rref.matrix.bit(row, f) {
                    v.set_bit(p, true);
                }
            }
            v
        })
        .collect()
}

/// Returns a basis of the null space of `h`, of size `n - rank(h)`.
pub fn null_space_basis(h: &BitMatrix) -> Vec<BitVector> {
    basis_from_rref(&h.reduced())
}

/// Returns one non-zero codeword of `h`, or `None` if the code is trivial (`rank == n`).
///
/// The codeword sets the first free variable to 1 and all other free variables to 0.
pub fn find_one_codeword(h: &BitMatrix) -> Option<BitVector> {
    let rref = h.reduced();
    let f = *rref.free_columns().first()?;
    let mut v = BitVector::zeros(h.cols());
    v.set_bit(f, true);
    for (row, &p) in rref.pivots.iter().enumerate() {
        if rref.matrix.bit(row, f) {
            v.set_bit(p, true);
        }
    }
    Some(v)
}

/// Returns all `2^k` codewords of `h`, sorted lexicographically.
///
/// # Errors
///
/// [`BarrierError::StateSpaceTooLarge`] if the code dimension exceeds
/// [`MAX_ENUMERATION_BITS`].
pub fn enumerate_codewords(h: &BitMatrix) -> Result<Vec<BitVector>, BarrierError> {
    let basis = null_space_basis(h);
    let mut words: Vec<BitVector> = Codewords::new(h.cols(), &basis)?.collect();
    words.sort_unstable();
    words.dedup();
    Ok(words)
}

/// Minimum Hamming weight of a non-zero codeword, or `None` if the only codeword is 0.
///
/// # Errors
///
/// As for [`enumerate_codewords`].
pub fn minimum_distance(h: &BitMatrix) -> Result<Option<usize>, BarrierError> {
    let basis = null_space_basis(h);
    Ok(min_weight(Codewords::new(h.cols(), &basis)?))
}

fn min_weight(words: Codewords<'_>) -> Option<usize> {
    words.filter(|w| !w.is_zero()).map(|w| w.weight()).min()
}

/// Iterator over every GF(2) combination of a basis, in Gray-code order.
///
/// Consecutive items differ by exactly one basis vector, so each step costs a single XOR.
/// The zero vector comes first.
pub struct Codewords<'a> {
    basis: &'a [BitVector],
    current: BitVector,
    step: u64,
    total: u64,
}

impl<'a> Codewords<'a> {
    /// # Errors
    ///
    /// [`BarrierError::StateSpaceTooLarge`] if `basis.len() > MAX_ENUMERATION_BITS`.
    pub fn new(n: usize, basis: &'a [BitVector]) -> Result<Self, BarrierError> {
        if basis.len() > MAX_ENUMERATION_BITS {
            return Err(BarrierError::StateSpaceTooLarge {
                bits: basis.len(),
                max: MAX_ENUMERATION_BITS,
            });
        }
        Ok(Codewords {
            basis,
            current: BitVector::zeros(n),
            step: 0,
            total: 1 << basis.len(),
        })
    }
}

impl Iterator for Codewords<'_> {
    type Item = BitVector;

    fn next(&mut self) -> Option<BitVector> {
        if self.step == self.total {
            return None;
        }
        if self.step > 0 {
            self.current ^= &self.basis[self.step.trailing_zeros() as usize];
        }
        self.step += 1;
        Some(self.current.clone())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = usize::try_from(self.total - self.step).ok();
        (left.unwrap_or(usize::MAX), left)
    }
}

/// A binary linear code given as the null space of a parity-check matrix.
#[derive(Clone, Debug)]
pub struct LinearCode {
    parity_check: BitMatrix,
    rref: Rref,
    basis: Vec<BitVector>,
}

impl LinearCode {
    pub fn new(parity_check: BitMatrix) -> Self {
        let rref = parity_check.reduced();
        let basis = basis_from_rref(&rref);
        LinearCode {
            parity_check,
            rref,
            basis,
        }
    }

    /// Builds the code from rows of 0/1 entries.
    ///
    /// # Errors
    ///
    /// See [`BitMatrix::from_rows`].
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self, BarrierError> {
        Ok(Self::new(BitMatrix::from_rows(rows)?))
    }

    pub fn parity_check(&self) -> &BitMatrix {
        &self.parity_check
    }

    pub fn rref(&self) -> &Rref {
        &self.rref
    }

    /// Codeword length
    pub fn n(&self) -> usize {
        self.parity_check.cols()
    }

    /// Code dimension `n - rank`
    pub fn k(&self) -> usize {
        self.basis.len()
    }

    pub fn rank(&self) -> usize {
        self.rref.rank
    }

    pub fn basis(&self) -> &[BitVector] {
        &self.basis
    }

    /// Iterates over all codewords in Gray-code order, starting with 0.
    ///
    /// # Errors
    ///
    /// [`BarrierError::StateSpaceTooLarge`] if `k > MAX_ENUMERATION_BITS`.
    pub fn codewords(&self) -> Result<Codewords<'_>, BarrierError> {
        Codewords::new(self.n(), &self.basis)
    }

    /// All codewords, sorted lexicographically
    pub fn sorted_codewords(&self) -> Result<Vec<BitVector>, BarrierError> {
        let mut words: Vec<_> = self.codewords()?.collect();
        words.sort_unstable();
        Ok(words)
    }

    /// Minimum weight of a non-zero codeword, `None` for the trivial code
    pub fn minimum_distance(&self) -> Result<Option<usize>, BarrierError> {
        Ok(min_weight(self.codewords()?))
    }

    /// The standard `[n, k, d]` parameters, with `d = None` for the trivial code
    pub fn n_k_d(&self) -> Result<(usize, usize, Option<usize>), BarrierError> {
        Ok((self.n(), self.k(), self.minimum_distance()?))
    }

    /// Rate of information transfer `k/n`.
    pub fn rate(&self) -> f64 {
        if self.n() == 0 {
            0.0
        } else {
            self.k() as f64 / self.n() as f64
        }
    }

    /// Returns true if `x` is a codeword
    ///
    /// # Errors
    ///
    /// If `x` does not have length `n`.
    pub fn contains(&self, x: &BitVector) -> Result<bool, BarrierError> {
        crate::energy::is_codeword(&self.parity_check, x)
    }
}
