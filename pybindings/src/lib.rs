// There seems to be some issues with the pyo3 bindings generation on methods returning
// a `PyResult<T>`.
#![allow(clippy::useless_conversion)]

pub mod bitvector;
pub mod code;

use crate::bitvector::PyBitVector;
use crate::code::PyLinearCode;
use gf2barrier::BarrierError;
use pyo3::exceptions::{PyRuntimeError, PyTimeoutError, PyValueError};
use pyo3::prelude::*;

/// Maps library errors onto the closest Python exception.
pub(crate) fn to_py_err(err: BarrierError) -> PyErr {
    match err {
        BarrierError::LimitExceeded { .. } | BarrierError::DeadlineExceeded => {
            PyTimeoutError::new_err(err.to_string())
        }
        BarrierError::Unreachable { .. } | BarrierError::SamplerExhausted { .. } => {
            PyRuntimeError::new_err(err.to_string())
        }
        _ => PyValueError::new_err(err.to_string()),
    }
}

#[pymodule]
#[pyo3(name = "gf2barrier")]
fn py_gf2barrier(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyBitVector>()?;
    m.add_class::<PyLinearCode>()?;
    m.add_function(wrap_pyfunction!(code::tensor_codeword, m)?)?;
    m.add_function(wrap_pyfunction!(code::run_trials, m)?)?;
    Ok(())
}
