//! Monte-Carlo test of the tensor-product barrier bound.
//!
//! A trial samples two sparse codes, takes one non-zero codeword of each, and compares the
//! barrier `E3` of their tensor product against `min(d1·E2, E1·d2)`. A trial with
//! `E3` below that bound is a counterexample.

use crate::code::{find_one_codeword, minimum_distance};
use crate::sampler::{random_parity_check, satisfies_degree_bound};
use crate::search::{BarrierEngine, SearchConfig};
use crate::tensor::{tensor_codeword, tensor_parity_check};
use crate::{BarrierError, BitMatrix, BitVector};
use rand::{rngs::SmallRng, Rng, SeedableRng};
use rayon::prelude::*;
use std::ops::RangeInclusive;
use tracing::{debug, info, warn};

/// Parameters of a batch of trials.
#[derive(Clone, Debug)]
pub struct TrialConfig {
    /// Number of checks of each sampled code, drawn uniformly from this range
    pub rows: RangeInclusive<usize>,

    /// Length of each sampled code, drawn uniformly from this range
    pub cols: RangeInclusive<usize>,

    /// Row and column weight bound passed to the sampler
    pub max_weight: usize,

    pub trials: usize,

    /// Trial `t` of [`run_trials`] uses an RNG seeded with `seed + t`.
    pub seed: u64,

    /// Worker threads for [`run_trials`]; `None` uses the global rayon pool.
    pub threads: Option<usize>,

    /// Limits applied to each of the three barrier searches in a trial
    pub search: SearchConfig,
}

impl Default for TrialConfig {
    fn default() -> Self {
        TrialConfig {
            rows: 5..=6,
            cols: 5..=6,
            max_weight: 3,
            trials: 100,
            seed: 0,
            threads: None,
            search: SearchConfig::default(),
        }
    }
}

impl TrialConfig {
    pub fn with_dimensions(
        mut self,
        rows: RangeInclusive<usize>,
        cols: RangeInclusive<usize>,
    ) -> Self {
        self.rows = rows;
        self.cols = cols;
        self
    }

    pub fn with_trials(mut self, trials: usize) -> Self {
        self.trials = trials;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    pub fn with_search(mut self, search: SearchConfig) -> Self {
        self.search = search;
        self
    }

    fn validate(&self) -> Result<(), BarrierError> {
        if self.rows.is_empty() || self.cols.is_empty() {
            return Err(BarrierError::InvalidParameter(format!(
                "empty dimension range: rows {:?}, cols {:?}",
                self.rows, self.cols
            )));
        }
        if *self.cols.start() < 2 {
            return Err(BarrierError::InvalidParameter(
                "codes need at least 2 columns".to_string(),
            ));
        }
        Ok(())
    }
}

/// Everything measured in a completed trial.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrialReport {
    pub h1: BitMatrix,
    pub h2: BitMatrix,
    pub c1: BitVector,
    pub c2: BitVector,
    pub d1: usize,
    pub d2: usize,
    pub e1: usize,
    pub e2: usize,
    pub e3: usize,
}

impl TrialReport {
    /// `min(d1·E2, E1·d2)`
    pub fn bound(&self) -> usize {
        (self.d1 * self.e2).min(self.e1 * self.d2)
    }

    pub fn is_counterexample(&self) -> bool {
        self.e3 < self.bound()
    }
}

/// Why a trial did not produce a report.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// A sampled matrix violates the row or column weight bound
    DegreeBound,
    /// A sampled code has no non-zero codeword
    TrivialCode,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TrialOutcome {
    Completed(Box<TrialReport>),
    Skipped(SkipReason),
}

/// Measures `d`, `E` for one codeword of each code, and `E3` for their tensor product.
///
/// # Errors
///
/// Propagates search errors, e.g. when `search` limits are hit.
pub fn evaluate_pair(
    h1: BitMatrix,
    h2: BitMatrix,
    search: &SearchConfig,
) -> Result<TrialOutcome, BarrierError> {
    let (Some(d1), Some(d2)) = (minimum_distance(&h1)?, minimum_distance(&h2)?) else {
        return Ok(TrialOutcome::Skipped(SkipReason::TrivialCode));
    };
    let (Some(c1), Some(c2)) = (find_one_codeword(&h1), find_one_codeword(&h2)) else {
        return Ok(TrialOutcome::Skipped(SkipReason::TrivialCode));
    };

    let engine = BarrierEngine::BestFirst;
    let e1 = engine.barrier(&h1, &c1, search)?;
    let e2 = engine.barrier(&h2, &c2, search)?;
    let h3 = tensor_parity_check(&h1, &h2);
    let c3 = tensor_codeword(&c1, &c2);
    let e3 = engine.barrier(&h3, &c3, search)?;

    Ok(TrialOutcome::Completed(Box::new(TrialReport {
        h1,
        h2,
        c1,
        c2,
        d1,
        d2,
        e1,
        e2,
        e3,
    })))
}

/// Samples two codes according to `config` and evaluates them with [`evaluate_pair`].
///
/// # Errors
///
/// - [`BarrierError::InvalidParameter`] for empty dimension ranges or fewer than 2 columns
/// - sampler and search errors
pub fn run_trial(rng: &mut impl Rng, config: &TrialConfig) -> Result<TrialOutcome, BarrierError> {
    config.validate()?;
    let m1 = rng.random_range(config.rows.clone());
    let n1 = rng.random_range(config.cols.clone());
    let m2 = rng.random_range(config.rows.clone());
    let n2 = rng.random_range(config.cols.clone());
    let h1 = random_parity_check(rng, m1, n1, config.max_weight)?;
    let h2 = random_parity_check(rng, m2, n2, config.max_weight)?;
    if !satisfies_degree_bound(&h1, config.max_weight)
        || !satisfies_degree_bound(&h2, config.max_weight)
    {
        return Ok(TrialOutcome::Skipped(SkipReason::DegreeBound));
    }
    evaluate_pair(h1, h2, &config.search)
}

/// Aggregate of a batch of trials.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TrialSummary {
    pub completed: usize,
    pub skipped: usize,
    pub failed: usize,

    /// The counterexample with the lowest trial index, if any
    pub counterexample: Option<(usize, Box<TrialReport>)>,

    /// The error of the failed trial with the lowest index, if any
    pub first_error: Option<(usize, BarrierError)>,
}

impl TrialSummary {
    pub fn trials(&self) -> usize {
        self.completed + self.skipped + self.failed
    }

    fn record(mut self, trial: usize, result: Result<TrialOutcome, BarrierError>) -> Self {
        match result {
            Ok(TrialOutcome::Completed(report)) => {
                self.completed += 1;
                if report.is_counterexample() {
                    warn!(
                        trial,
                        e3 = report.e3,
                        bound = report.bound(),
                        "tensor barrier below min(d1*E2, E1*d2)"
                    );
                    self.counterexample = earliest(self.counterexample, Some((trial, report)));
                }
            }
            Ok(TrialOutcome::Skipped(reason)) => {
                debug!(trial, ?reason, "trial skipped");
                self.skipped += 1;
            }
            Err(err) => {
                warn!(trial, %err, "trial failed");
                self.failed += 1;
                self.first_error = earliest(self.first_error, Some((trial, err)));
            }
        }
        self
    }

    /// Combines two partial summaries, keeping the earliest counterexample and error.
    pub fn merge(self, other: Self) -> Self {
        TrialSummary {
            completed: self.completed + other.completed,
            skipped: self.skipped + other.skipped,
            failed: self.failed + other.failed,
            counterexample: earliest(self.counterexample, other.counterexample),
            first_error: earliest(self.first_error, other.first_error),
        }
    }
}

fn earliest<T>(a: Option<(usize, T)>, b: Option<(usize, T)>) -> Option<(usize, T)> {
    match (a, b) {
        (Some(a), Some(b)) => Some(if b.0 < a.0 { b } else { a }),
        (a, b) => a.or(b),
    }
}

/// Runs `config.trials` independent trials in parallel.
///
/// Each trial gets its own RNG, so the summary does not depend on scheduling.
///
/// # Errors
///
/// Only configuration errors; errors inside a trial are counted in the summary.
pub fn run_trials(config: &TrialConfig) -> Result<TrialSummary, BarrierError> {
    config.validate()?;
    info!(
        trials = config.trials,
        rows = ?config.rows,
        cols = ?config.cols,
        max_weight = config.max_weight,
        "starting tensor bound trials"
    );

    let batch = || {
        (0..config.trials)
            .into_par_iter()
            .map(|trial| {
                let mut rng = SmallRng::seed_from_u64(config.seed.wrapping_add(trial as u64));
                (trial, run_trial(&mut rng, config))
            })
            .fold(TrialSummary::default, |acc, (trial, result)| {
                acc.record(trial, result)
            })
            .reduce(TrialSummary::default, TrialSummary::merge)
    };

    let summary = match config.threads {
        Some(threads) => rayon::ThreadPoolBuilder::new()
            .num_threads(threads.max(1))
            .build()
            .map_err(|err| BarrierError::InvalidParameter(err.to_string()))?
            .install(batch),
        None => batch(),
    };

    info!(
        completed = summary.completed,
        skipped = summary.skipped,
        failed = summary.failed,
        counterexample = ?summary.counterexample.as_ref().map(|(t, _)| *t),
        "tensor bound trials finished"
    );
    Ok(summary)
}
