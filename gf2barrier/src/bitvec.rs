//! Packed bit storage shared by [`crate::BitVector`] and [`crate::BitMatrix`].
//!
//! Bits are stored most significant bit first in 64-bit blocks, so the first bit of a
//! [`BitVec`] is the top bit of block 0. With this layout the derived ordering on blocks
//! coincides with the lexicographic ordering of the `0`/`1` strings they encode.

use ref_cast::RefCast;
use std::fmt;
use std::ops::{BitXorAssign, Deref, DerefMut, Index, IndexMut, Range};

/// A block of bits. This is an alias for [`u64`]
pub type BitBlock = u64;

/// Number of bits in a [`BitBlock`]
pub const BLOCKSIZE: usize = 64;

/// Bitwise OR with this constant to set most significant bit to one
pub const MSB_ON: BitBlock = 0x8000000000000000;

/// Returns the minimum number of [`BitBlock`]s required to store the given number of bits.
#[inline]
pub fn min_blocks(bits: usize) -> usize {
    bits.div_ceil(BLOCKSIZE)
}

/// A vector of bits stored as [`BitBlock`]s.
///
/// The number of logical bits is not tracked here; see [`crate::BitVector`] for that.
/// Most methods come from dereferencing to [`BitRange`].
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub struct BitVec(Vec<BitBlock>);

/// A borrowed run of [`BitBlock`]s, e.g. one row of a matrix.
#[derive(RefCast, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[repr(transparent)]
pub struct BitRange([BitBlock]);

/// Iterator over the positions of the 1-bits in a [`BitRange`], in increasing order.
pub struct Ones<'a> {
    blocks: &'a [BitBlock],
    block_index: usize,
    current: BitBlock,
}

impl Iterator for Ones<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        while self.current == 0 {
            self.block_index += 1;
            self.current = *self.blocks.get(self.block_index)?;
        }
        let offset = self.current.leading_zeros() as usize;
        self.current &= !(MSB_ON >> offset);
        Some(self.block_index * BLOCKSIZE + offset)
    }
}

impl BitRange {
    /// Returns a copy of the range as a [`BitVec`].
    #[inline]
    pub fn to_vec(&self) -> BitVec {
        self.0.to_vec().into()
    }

    /// Returns an iterator over the [`BitBlock`]s in this range.
    #[inline]
    pub fn block_iter(&self) -> impl Iterator<Item = BitBlock> + '_ {
        self.0.iter().copied()
    }

    /// Returns an iterator over the indices of the bits set to 1.
    #[inline]
    pub fn ones(&self) -> Ones<'_> {
        Ones {
            blocks: &self.0,
            block_index: 0,
            current: self.0.first().copied().unwrap_or(0),
        }
    }

    /// Counts the number of bits set to 1 in the entire range.
    #[inline]
    pub fn count_ones(&self) -> usize {
        self.block_iter().map(|b| b.count_ones() as usize).sum()
    }

    /// Returns `true` if every bit in the range is 0.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&b| b == 0)
    }

    /// Computes the dot product (mod 2) of two ranges.
    #[inline]
    pub fn dot(&self, rhs: &BitRange) -> bool {
        let mut c = 0;
        for (bits0, bits1) in self.0.iter().zip(rhs.0.iter()) {
            c ^= (*bits0 & *bits1).count_ones() & 1;
        }
        c == 1
    }

    /// Returns the value of the bit at the specified index.
    ///
    /// # Panics
    ///
    /// Panics if the index is out of range.
    #[inline]
    pub fn bit(&self, index: usize) -> bool {
        self.0[index / BLOCKSIZE] & (MSB_ON >> (index % BLOCKSIZE)) != 0
    }

    /// Sets the bit at the given index to the provided value.
    ///
    /// # Panics
    ///
    /// Panics if the index is out of range.
    #[inline]
    pub fn set_bit(&mut self, index: usize, value: bool) {
        let mask = MSB_ON >> (index % BLOCKSIZE);
        let block = &mut self.0[index / BLOCKSIZE];
        if value {
            *block |= mask;
        } else {
            *block &= !mask;
        }
    }

    /// Flips the bit at the given index.
    #[inline]
    pub fn flip_bit(&mut self, index: usize) {
        self.0[index / BLOCKSIZE] ^= MSB_ON >> (index % BLOCKSIZE);
    }

    /// XORs `source` into this range, starting at block `target_pos`.
    pub fn xor_in(&mut self, source: &BitRange, target_pos: usize) {
        for (i, bits) in source.0.iter().enumerate() {
            self.0[target_pos + i] ^= bits;
        }
    }

    /// XORs the `len` blocks starting at `source` into the `len` blocks starting at `target`.
    pub fn xor_range(&mut self, source: usize, target: usize, len: usize) {
        for i in 0..len {
            self.0[target + i] ^= self.0[source + i];
        }
    }

    #[inline]
    pub fn swap_range(&mut self, source: usize, target: usize, len: usize) {
        for i in 0..len {
            self.0.swap(source + i, target + i);
        }
    }

    /// Number of blocks in the range.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Index<Range<usize>> for BitRange {
    type Output = BitRange;

    fn index(&self, index: Range<usize>) -> &Self::Output {
        BitRange::ref_cast(&self.0[index])
    }
}

impl IndexMut<Range<usize>> for BitRange {
    fn index_mut(&mut self, index: Range<usize>) -> &mut Self::Output {
        BitRange::ref_cast_mut(&mut self.0[index])
    }
}

impl Index<usize> for BitRange {
    type Output = BitBlock;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl IndexMut<usize> for BitRange {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.0[index]
    }
}

impl BitVec {
    #[inline]
    pub fn zeros(num_blocks: usize) -> Self {
        BitVec(vec![0; num_blocks])
    }
}

impl fmt::Display for BitVec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bits in self.0.iter() {
            write!(f, "{:064b}", bits)?;
        }
        Ok(())
    }
}

impl BitXorAssign<&BitRange> for BitRange {
    #[inline]
    fn bitxor_assign(&mut self, rhs: &BitRange) {
        for (bits0, bits1) in self.0.iter_mut().zip(rhs.0.iter()) {
            *bits0 ^= bits1;
        }
    }
}

impl From<Vec<BitBlock>> for BitVec {
    fn from(value: Vec<BitBlock>) -> Self {
        BitVec(value)
    }
}

impl FromIterator<BitBlock> for BitVec {
    fn from_iter<T: IntoIterator<Item = BitBlock>>(iter: T) -> Self {
        BitVec(Vec::from_iter(iter))
    }
}

/// Packs booleans MSB-first, padding the final block with zeros.
impl FromIterator<bool> for BitVec {
    fn from_iter<T: IntoIterator<Item = bool>>(iter: T) -> Self {
        let mut v = vec![];
        let mut c = 0;
        let mut block: BitBlock = 0;
        for bit in iter {
            if bit {
                block |= MSB_ON >> c;
            }
            c += 1;
            if c == BLOCKSIZE {
                v.push(block);
                block = 0;
                c = 0;
            }
        }
        if c != 0 {
            v.push(block);
        }
        BitVec(v)
    }
}

impl Deref for BitVec {
    type Target = BitRange;

    fn deref(&self) -> &Self::Target {
        BitRange::ref_cast(&self.0)
    }
}

impl DerefMut for BitVec {
    fn deref_mut(&mut self) -> &mut Self::Target {
        BitRange::ref_cast_mut(&mut self.0)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::{rngs::SmallRng, Rng, SeedableRng};

    #[test]
    fn bit_get_set_flip() {
        let sz = 4;
        let bits = vec![0, 3, 100, 201, 255];

        let mut vec0 = BitVec::zeros(sz);
        for &b in &bits {
            vec0.set_bit(b, true);
        }
        for i in 0..(sz * BLOCKSIZE) {
            assert_eq!(vec0.bit(i), bits.contains(&i));
        }

        for &b in &bits {
            vec0.flip_bit(b);
        }
        assert!(vec0.is_zero());
    }

    #[test]
    fn ones_matches_bits() {
        let mut rng = SmallRng::seed_from_u64(1);
        let bools: Vec<bool> = (0..300).map(|_| rng.random()).collect();
        let vec: BitVec = bools.iter().copied().collect();
        let expected: Vec<usize> = (0..300).filter(|&i| bools[i]).collect();
        assert_eq!(vec.ones().collect::<Vec<_>>(), expected);
        assert_eq!(vec.count_ones(), expected.len());
    }

    #[test]
    fn packing_is_msb_first() {
        let vec: BitVec = [true, false, true].into_iter().collect();
        assert_eq!(vec.len(), 1);
        assert_eq!(vec[0], 0b101 << 61);
    }

    #[test]
    fn block_order_is_lexicographic() {
        let a: BitVec = [false, true, true].into_iter().collect();
        let b: BitVec = [true, false, false].into_iter().collect();
        assert!(a < b);
    }

    #[test]
    fn xor_range() {
        let i = BitBlock::MAX;
        let vec0: BitVec = vec![0, i, 0, i, 0, 0, i, i, 0, 0].into();

        let mut vec1 = vec0.clone();
        vec1.xor_range(1, 5, 3);
        let vec2: BitVec = vec![0, i, 0, i, 0, i, i, 0, 0, 0].into();
        assert_eq!(vec1, vec2);

        vec1.xor_range(1, 5, 3);
        assert_eq!(vec0, vec1);
    }

    #[test]
    fn dot_parity() {
        let a: BitVec = [true, true, false, true].into_iter().collect();
        let b: BitVec = [true, false, false, true].into_iter().collect();
        assert!(!a.dot(&b));
        let c: BitVec = [true, false, false, false].into_iter().collect();
        assert!(a.dot(&c));
    }
}
