//! `gf2barrier` computes energy barriers of classical binary linear codes. Some features include:
//! - packed bit vectors and matrices over GF(2), with reduced row-echelon form, rank and
//!   null-space bases
//! - enumeration of all codewords of a code and its minimum distance
//! - the energy (syndrome weight) of a state, with incremental updates under bit flips
//! - two independent searches for the energy barrier of a codeword: a best-first search
//!   ordered by running peak energy, and an exhaustive depth-first search
//! - the tensor-product construction of a parity-check matrix and codeword from two codes
//! - a random sparse parity-check sampler and a parallel Monte-Carlo driver that tests
//!   the bound `E3 >= min(d1·E2, E1·d2)` on tensor-product codes
//!
//! The energy barrier of a codeword `c` of a code with parity-check matrix `H` is the
//! smallest possible maximum of `|H x|` over the states `x` of a walk from `0` to `c` that
//! flips one bit per step.
//!
//! ```
//! use gf2barrier::{barrier_best_first, BitMatrix, LinearCode};
//!
//! let h = BitMatrix::from_rows(&[[1u8, 1, 0], [0, 1, 1], [1, 0, 1]]).unwrap();
//! let code = LinearCode::new(h.clone());
//! assert_eq!(code.n_k_d(), Ok((3, 1, Some(3))));
//!
//! let word = "111".parse().unwrap();
//! assert_eq!(barrier_best_first(&h, &word), Ok(2));
//! ```

#![allow(
    clippy::needless_range_loop,
    clippy::uninlined_format_args,
    clippy::bool_assert_comparison,
    clippy::cast_possible_truncation,
    clippy::must_use_candidate,
    clippy::return_self_not_must_use
)]
pub mod bitmatrix;
pub mod bitvec;
pub mod bitvector;
pub mod code;
pub mod energy;
pub mod error;
pub mod experiment;
pub mod sampler;
pub mod search;
pub mod tensor;

pub use bitmatrix::{BitMatrix, Rref};
pub use bitvec::{BitBlock, BitRange, BitVec};
pub use bitvector::BitVector;
pub use code::{
    enumerate_codewords, find_one_codeword, minimum_distance, null_space_basis, row_reduce,
    Codewords, LinearCode, MAX_ENUMERATION_BITS,
};
pub use energy::{energy, hamming_weight, is_codeword, syndrome, Landscape};
pub use error::BarrierError;
pub use experiment::{
    evaluate_pair, run_trial, run_trials, SkipReason, TrialConfig, TrialOutcome, TrialReport,
    TrialSummary,
};
pub use sampler::{random_parity_check, satisfies_degree_bound};
pub use search::{
    barrier_best_first, barrier_best_first_with, barrier_exhaustive, barrier_exhaustive_with,
    code_barrier, BarrierEngine, SearchConfig, StoreKind,
};
pub use tensor::{tensor_codeword, tensor_parity_check};

/// Rank of `h` over GF(2).
#[inline]
pub fn rank(h: &BitMatrix) -> usize {
    h.rank()
}
