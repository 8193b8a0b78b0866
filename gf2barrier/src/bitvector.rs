use crate::bitvec::{min_blocks, BitRange, BitVec, BLOCKSIZE};
use crate::error::BarrierError;
use std::fmt;
use std::ops::{BitXor, BitXorAssign, Index};
use std::str::FromStr;

/// A vector over GF(2) of fixed logical length.
///
/// This is the type of states, codewords and syndromes. Bits past `len` in the backing
/// storage are always 0, so the derived `Eq`, `Hash` and `Ord` only depend on the logical
/// contents. For vectors of equal length, `Ord` is the lexicographic order of their
/// `0`/`1` strings.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub struct BitVector {
    len: usize,
    bits: BitVec,
}

impl BitVector {
    /// Creates a new `BitVector` of size `length` initialized to zero
    pub fn zeros(length: usize) -> Self {
        Self {
            len: length,
            bits: BitVec::zeros(min_blocks(length)),
        }
    }

    /// Builds a `BitVector` from a function `f` that determines the value of each bit
    pub fn build(length: usize, mut f: impl FnMut(usize) -> bool) -> Self {
        let mut v = Self::zeros(length);
        for i in 0..length {
            if f(i) {
                v.bits.set_bit(i, true);
            }
        }
        v
    }

    /// Creates a new `BitVector` from a slice of 0/1 entries
    ///
    /// # Errors
    ///
    /// If any entry is neither 0 nor 1.
    pub fn from_bits(data: &[u8]) -> Result<Self, BarrierError> {
        if let Some((col, &value)) = data.iter().enumerate().find(|&(_, &b)| b > 1) {
            return Err(BarrierError::NonBinaryEntry { row: 0, col, value });
        }
        Ok(Self::build(data.len(), |i| data[i] == 1))
    }

    /// Creates a new `BitVector` from a slice of bools
    pub fn from_bool_vec(data: &[bool]) -> Self {
        Self::build(data.len(), |i| data[i])
    }

    /// Creates a new random `BitVector` of specified length
    pub fn random(rng: &mut impl rand::Rng, length: usize) -> Self {
        Self::build(length, |_| rng.random())
    }

    /// Decodes the integer key produced by [`BitVector::to_index`].
    ///
    /// # Panics
    ///
    /// If `length > 64`.
    pub fn from_index(length: usize, index: u64) -> Self {
        assert!(length <= BLOCKSIZE, "index keys address at most 64 bits");
        let mut v = Self::zeros(length);
        if length > 0 {
            v.bits[0] = index << (BLOCKSIZE - length);
        }
        v
    }

    /// Gets the bit at position `i`
    #[inline]
    pub fn bit(&self, i: usize) -> bool {
        debug_assert!(i < self.len);
        self.bits.bit(i)
    }

    /// Sets the bit at position `i` to `b`
    #[inline]
    pub fn set_bit(&mut self, i: usize, b: bool) {
        debug_assert!(i < self.len);
        self.bits.set_bit(i, b);
    }

    /// Flips the bit at position `i`
    #[inline]
    pub fn flip(&mut self, i: usize) {
        debug_assert!(i < self.len);
        self.bits.flip_bit(i);
    }

    /// Returns a copy with bit `i` flipped
    #[inline]
    pub fn flipped(&self, i: usize) -> Self {
        let mut next = self.clone();
        next.flip(i);
        next
    }

    /// Returns the length of the vector
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the vector has length 0
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Checks if the vector consists of all zero bits
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.bits.is_zero()
    }

    /// Returns the number of 1s in the vector (Hamming weight)
    #[inline]
    pub fn weight(&self) -> usize {
        self.bits.count_ones()
    }

    /// Indices of the 1s in the vector, in increasing order
    pub fn support(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits.ones()
    }

    /// XORs another `BitVector` into this one
    ///
    /// # Panics
    ///
    /// If the lengths differ.
    #[inline]
    pub fn xor_with(&mut self, other: &BitVector) {
        assert_eq!(
            self.len, other.len,
            "BitVectors must have the same length for XOR"
        );
        *self.bits ^= &*other.bits;
    }

    /// Packs the vector into an integer whose most significant used bit is bit 0.
    ///
    /// Returns `None` for vectors longer than 64 bits.
    #[inline]
    pub fn to_index(&self) -> Option<u64> {
        match self.len {
            0 => Some(0),
            l if l <= BLOCKSIZE => Some(self.bits[0] >> (BLOCKSIZE - l)),
            _ => None,
        }
    }

    /// Returns the bits as a vector of 0/1 entries
    pub fn to_bits(&self) -> Vec<u8> {
        (0..self.len).map(|i| u8::from(self.bit(i))).collect()
    }

    /// Returns an immutable reference to the underlying blocks
    #[inline]
    pub fn as_range(&self) -> &BitRange {
        &self.bits
    }

    pub(crate) fn from_raw(len: usize, bits: BitVec) -> Self {
        debug_assert_eq!(bits.len(), min_blocks(len));
        Self { len, bits }
    }
}

/// Formats the vector as a string of `0`s and `1`s
impl fmt::Display for BitVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.len {
            f.write_str(if self.bit(i) { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Parses a string of `0`s and `1`s
impl FromStr for BitVector {
    type Err = BarrierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bits = s
            .chars()
            .map(|c| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                other => Err(BarrierError::InvalidBitString(other)),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_bool_vec(&bits))
    }
}

impl BitXor for &BitVector {
    type Output = BitVector;

    fn bitxor(self, rhs: Self) -> Self::Output {
        let mut result = self.clone();
        result.xor_with(rhs);
        result
    }
}

impl BitXorAssign<&BitVector> for BitVector {
    fn bitxor_assign(&mut self, rhs: &BitVector) {
        self.xor_with(rhs);
    }
}

/// `v[i]` is equivalent to `v.bit(i)`
impl Index<usize> for BitVector {
    type Output = bool;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        if self.bit(index) {
            &true
        } else {
            &false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::SmallRng, SeedableRng};

    #[test]
    fn parse_and_display() {
        let v: BitVector = "0110100".parse().unwrap();
        assert_eq!(v.len(), 7);
        assert_eq!(v.weight(), 3);
        assert_eq!(v.to_string(), "0110100");
        assert_eq!(v.support().collect::<Vec<_>>(), vec![1, 2, 4]);
        assert_eq!(
            "01x".parse::<BitVector>(),
            Err(BarrierError::InvalidBitString('x'))
        );
    }

    #[test]
    fn from_bits_rejects_non_binary() {
        assert_eq!(
            BitVector::from_bits(&[0, 1, 2]),
            Err(BarrierError::NonBinaryEntry {
                row: 0,
                col: 2,
                value: 2
            })
        );
        assert_eq!(BitVector::from_bits(&[1, 0, 1]).unwrap().to_bits(), vec![1, 0, 1]);
    }

    #[test]
    fn index_round_trip() {
        let v: BitVector = "1011".parse().unwrap();
        assert_eq!(v.to_index(), Some(0b1011));
        assert_eq!(BitVector::from_index(4, 0b1011), v);
        assert_eq!(BitVector::zeros(0).to_index(), Some(0));
        assert_eq!(BitVector::zeros(65).to_index(), None);

        let w = BitVector::from_index(64, u64::MAX);
        assert_eq!(w.weight(), 64);
    }

    #[test]
    fn ordering_is_lexicographic() {
        let mut words: Vec<BitVector> = ["110", "001", "100", "011"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        words.sort();
        let sorted: Vec<String> = words.iter().map(|w| w.to_string()).collect();
        assert_eq!(sorted, vec!["001", "011", "100", "110"]);
    }

    #[test]
    fn xor_and_flip() {
        let mut rng = SmallRng::seed_from_u64(123);
        let a = BitVector::random(&mut rng, 130);
        let b = BitVector::random(&mut rng, 130);
        let c = &a ^ &b;
        for i in 0..130 {
            assert_eq!(c[i], a[i] ^ b[i]);
        }
        assert!((&c ^ &c).is_zero());

        let mut d = a.flipped(129);
        assert_ne!(d, a);
        d.flip(129);
        assert_eq!(d, a);
    }

    #[test]
    #[should_panic(expected = "same length")]
    fn xor_length_mismatch() {
        let _ = &BitVector::zeros(3) ^ &BitVector::zeros(4);
    }
}
