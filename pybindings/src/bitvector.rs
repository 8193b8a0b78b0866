use pyo3::exceptions::{PyIndexError, PyValueError};
use pyo3::prelude::*;

use gf2barrier::BitVector;

use crate::to_py_err;

/// A state, codeword or syndrome over GF(2).
#[pyclass(name = "BitVector")]
#[derive(Clone)]
pub struct PyBitVector {
    pub(crate) inner: BitVector,
}

impl PyBitVector {
    fn check_index(&self, i: usize) -> PyResult<()> {
        if i >= self.inner.len() {
            return Err(PyIndexError::new_err(format!(
                "bit {i} out of range for length {}",
                self.inner.len()
            )));
        }
        Ok(())
    }
}

#[pymethods]
impl PyBitVector {
    /// Creates a new BitVector of specified length initialized to zero
    #[new]
    pub fn new(length: usize) -> Self {
        PyBitVector {
            inner: BitVector::zeros(length),
        }
    }

    /// Parses a string of '0' and '1' characters
    #[staticmethod]
    pub fn parse(s: &str) -> PyResult<Self> {
        s.parse::<BitVector>().map(Self::from).map_err(to_py_err)
    }

    /// Creates a BitVector from a list of 0/1 integers
    #[staticmethod]
    pub fn from_list(data: Vec<u8>) -> PyResult<Self> {
        BitVector::from_bits(&data)
            .map(Self::from)
            .map_err(to_py_err)
    }

    /// Converts the vector to a list of 0/1 integers
    pub fn to_list(&self) -> Vec<u8> {
        self.inner.to_bits()
    }

    pub fn bit(&self, i: usize) -> PyResult<bool> {
        self.check_index(i)?;
        Ok(self.inner.bit(i))
    }

    pub fn set_bit(&mut self, i: usize, b: bool) -> PyResult<()> {
        self.check_index(i)?;
        self.inner.set_bit(i, b);
        Ok(())
    }

    pub fn flip(&mut self, i: usize) -> PyResult<()> {
        self.check_index(i)?;
        self.inner.flip(i);
        Ok(())
    }

    #[getter]
    pub fn length(&self) -> usize {
        self.inner.len()
    }

    /// Returns the number of 1s in the vector (Hamming weight)
    pub fn weight(&self) -> usize {
        self.inner.weight()
    }

    pub fn is_zero(&self) -> bool {
        self.inner.is_zero()
    }

    pub fn __str__(&self) -> String {
        self.inner.to_string()
    }

    pub fn __repr__(&self) -> String {
        format!("BitVector('{}')", self.inner)
    }

    pub fn __len__(&self) -> usize {
        self.inner.len()
    }

    pub fn __getitem__(&self, i: usize) -> PyResult<bool> {
        self.bit(i)
    }

    pub fn __setitem__(&mut self, i: usize, value: bool) -> PyResult<()> {
        self.set_bit(i, value)
    }

    pub fn __xor__(&self, other: &PyBitVector) -> PyResult<Self> {
        if self.inner.len() != other.inner.len() {
            return Err(PyValueError::new_err(
                "BitVectors must have the same length for XOR",
            ));
        }
        Ok(PyBitVector {
            inner: &self.inner ^ &other.inner,
        })
    }

    pub fn __eq__(&self, other: &PyBitVector) -> bool {
        self.inner == other.inner
    }

    pub fn __lt__(&self, other: &PyBitVector) -> bool {
        self.inner < other.inner
    }
}

impl From<BitVector> for PyBitVector {
    fn from(inner: BitVector) -> Self {
        PyBitVector { inner }
    }
}

impl From<PyBitVector> for BitVector {
    fn from(py_vector: PyBitVector) -> Self {
        py_vector.inner
    }
}
