use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use gf2barrier::{
    code_barrier, energy, random_parity_check, tensor_parity_check, BarrierEngine, BitMatrix,
    LinearCode, SearchConfig, TrialConfig,
};
use rand::{rngs::SmallRng, SeedableRng};
use std::time::{Duration, Instant};

use crate::bitvector::PyBitVector;
use crate::to_py_err;

fn parse_engine(engine: &str) -> PyResult<BarrierEngine> {
    match engine {
        "best_first" => Ok(BarrierEngine::BestFirst),
        "exhaustive" => Ok(BarrierEngine::Exhaustive),
        other => Err(PyValueError::new_err(format!(
            "unknown engine '{other}', expected 'best_first' or 'exhaustive'"
        ))),
    }
}

fn search_config(max_expansions: Option<usize>, timeout: Option<f64>) -> PyResult<SearchConfig> {
    let mut config = SearchConfig::default();
    if let Some(max) = max_expansions {
        config = config.with_max_expansions(max);
    }
    if let Some(secs) = timeout {
        let timeout = Duration::try_from_secs_f64(secs)
            .map_err(|err| PyValueError::new_err(format!("invalid timeout: {err}")))?;
        config = config.with_deadline(Instant::now() + timeout);
    }
    Ok(config)
}

/// A binary linear code given by its parity-check matrix.
#[pyclass(name = "LinearCode")]
#[derive(Clone)]
pub struct PyLinearCode {
    pub(crate) inner: LinearCode,
}

#[pymethods]
impl PyLinearCode {
    /// Builds the code from rows of 0/1 entries. Pass `n` to fix the code length when there
    /// are no rows.
    #[new]
    #[pyo3(signature = (rows, n=None))]
    pub fn new(rows: Vec<Vec<u8>>, n: Option<usize>) -> PyResult<Self> {
        let h = match n {
            Some(n) => BitMatrix::from_rows_with_cols(n, &rows),
            None => BitMatrix::from_rows(&rows),
        }
        .map_err(to_py_err)?;
        Ok(LinearCode::new(h).into())
    }

    /// Samples a sparse code with row and column weights at most `w`
    #[staticmethod]
    #[pyo3(signature = (m, n, w=3, seed=None))]
    pub fn random(m: usize, n: usize, w: usize, seed: Option<u64>) -> PyResult<Self> {
        let mut rng = if let Some(s) = seed {
            SmallRng::seed_from_u64(s)
        } else {
            SmallRng::from_os_rng()
        };
        let h = random_parity_check(&mut rng, m, n, w).map_err(to_py_err)?;
        Ok(LinearCode::new(h).into())
    }

    /// The tensor-product code of `self` and `other`
    pub fn tensor(&self, other: &PyLinearCode) -> Self {
        let h3 = tensor_parity_check(self.inner.parity_check(), other.inner.parity_check());
        LinearCode::new(h3).into()
    }

    #[getter]
    pub fn n(&self) -> usize {
        self.inner.n()
    }

    #[getter]
    pub fn k(&self) -> usize {
        self.inner.k()
    }

    #[getter]
    pub fn rank(&self) -> usize {
        self.inner.rank()
    }

    /// The parity-check matrix as rows of 0/1 entries
    pub fn parity_check(&self) -> Vec<Vec<u8>> {
        self.inner.parity_check().to_rows()
    }

    /// Returns `(rows, pivots, rank)` of the reduced row-echelon form
    pub fn rref(&self) -> (Vec<Vec<u8>>, Vec<usize>, usize) {
        let rref = self.inner.rref();
        (rref.matrix.to_rows(), rref.pivots.clone(), rref.rank)
    }

    /// All codewords, sorted lexicographically
    pub fn codewords(&self) -> PyResult<Vec<PyBitVector>> {
        let words = self.inner.sorted_codewords().map_err(to_py_err)?;
        Ok(words.into_iter().map(PyBitVector::from).collect())
    }

    pub fn minimum_distance(&self) -> PyResult<Option<usize>> {
        self.inner.minimum_distance().map_err(to_py_err)
    }

    /// One non-zero codeword, or None for the trivial code
    pub fn find_one_codeword(&self) -> Option<PyBitVector> {
        gf2barrier::find_one_codeword(self.inner.parity_check()).map(PyBitVector::from)
    }

    pub fn energy(&self, x: &PyBitVector) -> PyResult<usize> {
        energy(self.inner.parity_check(), &x.inner).map_err(to_py_err)
    }

    pub fn contains(&self, x: &PyBitVector) -> PyResult<bool> {
        self.inner.contains(&x.inner).map_err(to_py_err)
    }

    /// Energy barrier of `target`; raises TimeoutError if a limit is hit
    #[pyo3(signature = (target, engine="best_first", max_expansions=None, timeout=None))]
    pub fn barrier(
        &self,
        py: Python<'_>,
        target: &PyBitVector,
        engine: &str,
        max_expansions: Option<usize>,
        timeout: Option<f64>,
    ) -> PyResult<usize> {
        let engine = parse_engine(engine)?;
        let config = search_config(max_expansions, timeout)?;
        let h = self.inner.parity_check();
        py.allow_threads(|| engine.barrier(h, &target.inner, &config))
            .map_err(to_py_err)
    }

    /// The smallest barrier over all non-zero codewords, with a codeword attaining it
    #[pyo3(signature = (engine="best_first", max_expansions=None, timeout=None))]
    pub fn code_barrier(
        &self,
        py: Python<'_>,
        engine: &str,
        max_expansions: Option<usize>,
        timeout: Option<f64>,
    ) -> PyResult<Option<(usize, PyBitVector)>> {
        let engine = parse_engine(engine)?;
        let config = search_config(max_expansions, timeout)?;
        let best = py
            .allow_threads(|| code_barrier(&self.inner, engine, &config))
            .map_err(to_py_err)?;
        Ok(best.map(|(e, word)| (e, word.into())))
    }

    pub fn __repr__(&self) -> String {
        format!(
            "LinearCode(n={}, k={}, rank={})",
            self.inner.n(),
            self.inner.k(),
            self.inner.rank()
        )
    }
}

impl From<LinearCode> for PyLinearCode {
    fn from(inner: LinearCode) -> Self {
        PyLinearCode { inner }
    }
}

/// The tensor-product codeword `c1 ⊗ c2`
#[pyfunction]
pub fn tensor_codeword(c1: &PyBitVector, c2: &PyBitVector) -> PyBitVector {
    gf2barrier::tensor_codeword(&c1.inner, &c2.inner).into()
}

/// Runs the tensor barrier bound experiment.
///
/// Returns `(completed, skipped, failed, counterexample)` where `counterexample` is the
/// index of the first trial with `E3 < min(d1*E2, E1*d2)`, or None.
#[pyfunction]
#[pyo3(signature = (trials=100, seed=0, min_dim=5, max_dim=6, w=3, threads=None))]
pub fn run_trials(
    py: Python<'_>,
    trials: usize,
    seed: u64,
    min_dim: usize,
    max_dim: usize,
    w: usize,
    threads: Option<usize>,
) -> PyResult<(usize, usize, usize, Option<usize>)> {
    let mut config = TrialConfig {
        max_weight: w,
        ..TrialConfig::default()
    }
    .with_dimensions(min_dim..=max_dim, min_dim..=max_dim)
    .with_trials(trials)
    .with_seed(seed);
    if let Some(threads) = threads {
        config = config.with_threads(threads);
    }
    let summary = py
        .allow_threads(|| gf2barrier::run_trials(&config))
        .map_err(to_py_err)?;
    Ok((
        summary.completed,
        summary.skipped,
        summary.failed,
        summary.counterexample.map(|(trial, _)| trial),
    ))
}
