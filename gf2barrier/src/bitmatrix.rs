use crate::bitvec::*;
use crate::bitvector::BitVector;
use crate::error::BarrierError;
use rand::Rng;
use std::{fmt, ops::Index};

/// A matrix of bits, represented as a vector of blocks of bits
///
/// The matrix is stored in row-major order, with each row occupying `col_blocks` many
/// [`BitBlock`]s. If the number of columns is not a multiple of [`BLOCKSIZE`], the last
/// block in each row is padded with 0s, and those padding bits are always kept at 0.
///
/// Used as a parity-check matrix, rows are checks and columns are bit positions.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BitMatrix {
    /// the number of logical rows in the matrix
    rows: usize,

    /// the number of logical columns in the matrix
    cols: usize,

    /// the number of [`BitBlock`]s used to store each row
    col_blocks: usize,

    /// a [`BitVec`] containing the data of the matrix, stored in row-major order
    data: BitVec,
}

/// Reduced row-echelon form of a matrix over GF(2).
///
/// Row `i` of `matrix` (for `i < rank`) has its leading 1 in column `pivots[i]`, and that
/// column is zero in every other row. Rows `rank..` are zero.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rref {
    pub matrix: BitMatrix,
    pub pivots: Vec<usize>,
    pub rank: usize,
}

impl Rref {
    /// Columns that carry no pivot, in increasing order.
    pub fn free_columns(&self) -> Vec<usize> {
        let mut is_pivot = vec![false; self.matrix.cols()];
        for &p in &self.pivots {
            is_pivot[p] = true;
        }
        (0..self.matrix.cols()).filter(|&c| !is_pivot[c]).collect()
    }
}

impl BitMatrix {
    #[inline]
    pub fn bit(&self, i: usize, j: usize) -> bool {
        debug_assert!(i < self.rows && j < self.cols);
        self.data.bit(self.col_blocks * BLOCKSIZE * i + j)
    }

    #[inline]
    pub fn set_bit(&mut self, i: usize, j: usize, b: bool) {
        debug_assert!(i < self.rows && j < self.cols);
        self.data.set_bit(self.col_blocks * BLOCKSIZE * i + j, b);
    }

    pub fn build(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> bool) -> Self {
        let mut m = Self::zeros(rows, cols);
        for i in 0..rows {
            for j in 0..cols {
                if f(i, j) {
                    m.set_bit(i, j, true);
                }
            }
        }
        m
    }

    pub fn zeros(rows: usize, cols: usize) -> Self {
        let col_blocks = min_blocks(cols);
        BitMatrix {
            rows,
            cols,
            col_blocks,
            data: BitVec::zeros(rows * col_blocks),
        }
    }

    pub fn identity(size: usize) -> Self {
        Self::build(size, size, |i, j| i == j)
    }

    /// Builds a matrix from rows of 0/1 entries.
    ///
    /// The number of columns is taken from the first row; an empty slice gives the 0×0
    /// matrix. Use [`BitMatrix::from_rows_with_cols`] when the width must be known even
    /// without any rows.
    ///
    /// # Errors
    ///
    /// If the rows do not all have the same length, or an entry is not 0 or 1.
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self, BarrierError> {
        let cols = rows.first().map_or(0, |r| r.as_ref().len());
        Self::from_rows_with_cols(cols, rows)
    }

    /// Builds a matrix with exactly `cols` columns from rows of 0/1 entries.
    ///
    /// # Errors
    ///
    /// If some row does not have `cols` entries, or an entry is not 0 or 1.
    pub fn from_rows_with_cols<R: AsRef<[u8]>>(
        cols: usize,
        rows: &[R],
    ) -> Result<Self, BarrierError> {
        let mut m = Self::zeros(rows.len(), cols);
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != cols {
                return Err(BarrierError::RaggedMatrix {
                    row: i,
                    expected: cols,
                    found: row.len(),
                });
            }
            for (j, &value) in row.iter().enumerate() {
                match value {
                    0 => {}
                    1 => m.set_bit(i, j, true),
                    _ => return Err(BarrierError::NonBinaryEntry { row: i, col: j, value }),
                }
            }
        }
        Ok(m)
    }

    /// Returns the entries as rows of 0/1 values
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        (0..self.rows)
            .map(|i| (0..self.cols).map(|j| u8::from(self.bit(i, j))).collect())
            .collect()
    }

    #[inline]
    pub fn random(rng: &mut impl Rng, rows: usize, cols: usize) -> Self {
        Self::build(rows, cols, |_, _| rng.random())
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn row(&self, row: usize) -> &BitRange {
        &self.data[row * self.col_blocks..(row + 1) * self.col_blocks]
    }

    /// Returns row `row` as a [`BitVector`] of length `cols`
    pub fn row_vector(&self, row: usize) -> BitVector {
        BitVector::from_raw(self.cols, self.row(row).to_vec())
    }

    /// Returns column `col` as a [`BitVector`] of length `rows`
    pub fn column(&self, col: usize) -> BitVector {
        BitVector::build(self.rows, |i| self.bit(i, col))
    }

    #[inline]
    pub fn row_weight(&self, row: usize) -> usize {
        self.row(row).count_ones()
    }

    pub fn col_weight(&self, col: usize) -> usize {
        (0..self.rows).filter(|&i| self.bit(i, col)).count()
    }

    /// Returns true if every entry is 0
    pub fn is_zero(&self) -> bool {
        self.data.is_zero()
    }

    /// XORs `bits` into row `row`
    #[inline]
    pub fn add_bits_to_row(&mut self, bits: &BitRange, row: usize) {
        self.data.xor_in(bits, row * self.col_blocks);
    }

    /// Adds row `from` to row `to`
    #[inline]
    pub fn add_row(&mut self, from: usize, to: usize) {
        self.data.xor_range(
            from * self.col_blocks,
            to * self.col_blocks,
            self.col_blocks,
        );
    }

    #[inline]
    pub fn swap_rows(&mut self, from: usize, to: usize) {
        self.data.swap_range(
            from * self.col_blocks,
            to * self.col_blocks,
            self.col_blocks,
        );
    }

    /// Perform gaussian elimination in place, returning the pivot columns
    ///
    /// Columns are scanned left to right. For each column the first row at or below the
    /// current pivot row with a 1 is swapped into place and the column is cleared below it.
    /// If `full` is true, a backward pass then clears every pivot column above its pivot,
    /// giving reduced echelon form.
    fn gauss_helper(&mut self, full: bool) -> Vec<usize> {
        let mut row = 0;
        let mut pcols = vec![];
        for pcol in 0..self.cols {
            if row == self.rows {
                break;
            }
            let Some(row1) = (row..self.rows).find(|&i| self[(i, pcol)]) else {
                continue;
            };
            if row != row1 {
                self.swap_rows(row, row1);
            }
            let row_vec = self.row(row).to_vec();
            for i in (row1 + 1)..self.rows {
                if self[(i, pcol)] {
                    self.add_bits_to_row(&row_vec, i);
                }
            }
            pcols.push(pcol);
            row += 1;
        }

        if full {
            for row in (0..pcols.len()).rev() {
                let pcol = pcols[row];
                let row_vec = self.row(row).to_vec();
                for i in 0..row {
                    if self[(i, pcol)] {
                        self.add_bits_to_row(&row_vec, i);
                    }
                }
            }
        }

        pcols
    }

    /// Returns the reduced row-echelon form together with its pivot columns and rank
    pub fn reduced(&self) -> Rref {
        let mut matrix = self.clone();
        let pivots = matrix.gauss_helper(true);
        let rank = pivots.len();
        debug_assert!(pivots.iter().enumerate().all(|(r, &p)| matrix.col_weight(p) == 1
            && matrix.bit(r, p)));
        Rref {
            matrix,
            pivots,
            rank,
        }
    }

    /// Compute the rank of the matrix using gaussian elimination
    #[inline]
    pub fn rank(&self) -> usize {
        self.clone().gauss_helper(false).len()
    }

    /// Computes `self * x` over GF(2), i.e. the syndrome of `x`
    ///
    /// # Errors
    ///
    /// If `x` does not have one entry per column.
    pub fn try_mul_vector(&self, x: &BitVector) -> Result<BitVector, BarrierError> {
        if x.len() != self.cols {
            return Err(BarrierError::LengthMismatch {
                expected: self.cols,
                found: x.len(),
            });
        }
        let xr = x.as_range();
        Ok(BitVector::build(self.rows, |i| self.row(i).dot(xr)))
    }
}

impl Index<(usize, usize)> for BitMatrix {
    type Output = bool;

    #[inline]
    fn index(&self, index: (usize, usize)) -> &Self::Output {
        if self.bit(index.0, index.1) {
            &true
        } else {
            &false
        }
    }
}

impl fmt::Display for BitMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for i in 0..self.rows {
            for j in 0..self.cols {
                write!(f, " {} ", if self[(i, j)] { 1 } else { 0 })?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}
