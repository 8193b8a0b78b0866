//! Tensor-product construction of a parity-check matrix and codeword from two smaller ones.
//!
//! States of the product code are `n1 × n2` arrays flattened row-major, so bit `i * n2 + j`
//! sits at row `i`, column `j`. The top block of checks applies `H1` down every column of
//! the array and the bottom block applies `H2` along every row.

use crate::{BitMatrix, BitVector};

/// Returns the stacked matrix `[H1 ⊗ I_{n2}; I_{n1} ⊗ H2]`, of size
/// `(m1·n2 + n1·m2) × (n1·n2)`.
pub fn tensor_parity_check(h1: &BitMatrix, h2: &BitMatrix) -> BitMatrix {
    let (m1, n1) = (h1.rows(), h1.cols());
    let (m2, n2) = (h2.rows(), h2.cols());
    let mut h3 = BitMatrix::zeros(m1 * n2 + n1 * m2, n1 * n2);

    // each 1 at (i, j) of H1 places an n2 × n2 identity block
    for i in 0..m1 {
        for j in h1.row(i).ones().filter(|&j| j < n1) {
            for k in 0..n2 {
                h3.set_bit(i * n2 + k, j * n2 + k, true);
            }
        }
    }

    // a copy of H2 on every diagonal block
    let offset = m1 * n2;
    for block in 0..n1 {
        for r in 0..m2 {
            for c in h2.row(r).ones().filter(|&c| c < n2) {
                h3.set_bit(offset + block * m2 + r, block * n2 + c, true);
            }
        }
    }

    h3
}

/// Returns `c1 ⊗ c2`: the vector of length `n1·n2` with bit `i·n2 + j` equal to
/// `c1[i] & c2[j]`.
///
/// If `c1` and `c2` are codewords of `h1` and `h2`, the result is a codeword of
/// [`tensor_parity_check`]`(h1, h2)`.
pub fn tensor_codeword(c1: &BitVector, c2: &BitVector) -> BitVector {
    let n2 = c2.len();
    BitVector::build(c1.len() * n2, |idx| c1.bit(idx / n2) && c2.bit(idx % n2))
}
