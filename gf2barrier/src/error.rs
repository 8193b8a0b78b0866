use thiserror::Error;

/// Errors reported by the linear-algebra routines, the barrier searches and the samplers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BarrierError {
    /// A row of the supplied matrix does not have the same length as the first row.
    #[error("ragged matrix: row {row} has {found} entries, expected {expected}")]
    RaggedMatrix {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// A matrix or vector entry is neither 0 nor 1.
    #[error("entry ({row}, {col}) is {value}, expected 0 or 1")]
    NonBinaryEntry { row: usize, col: usize, value: u8 },

    /// A vector does not match the number of columns (or another vector) it is combined with.
    #[error("length mismatch: expected {expected}, found {found}")]
    LengthMismatch { expected: usize, found: usize },

    /// A bit string contained a character other than '0' or '1'.
    #[error("invalid character {0:?} in bit string")]
    InvalidBitString(char),

    /// `2^bits` states cannot be stored or enumerated.
    #[error("state space of {bits} bits exceeds the ceiling of {max} bits")]
    StateSpaceTooLarge { bits: usize, max: usize },

    /// The search exhausted the hypercube without reaching the target.
    ///
    /// Every vertex of the n-cube is reachable by single-bit flips, so this
    /// always indicates a bug rather than a property of the input.
    #[error("target not reachable in the {bits}-bit hypercube (internal consistency failure)")]
    Unreachable { bits: usize },

    /// The search was stopped after the configured number of expansions.
    #[error("search stopped after {expansions} expansions")]
    LimitExceeded { expansions: usize },

    /// The search was stopped because the configured deadline passed.
    #[error("search deadline exceeded")]
    DeadlineExceeded,

    /// A parameter is outside the range an operation accepts.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The random sampler could not satisfy its degree constraints.
    #[error("failed to sample a parity-check matrix after {attempts} attempts")]
    SamplerExhausted { attempts: usize },
}
