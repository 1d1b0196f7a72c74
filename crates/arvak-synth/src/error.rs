//! Error types for the synth crate.

use thiserror::Error;

/// Errors produced while validating or synthesising block circuits.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SynthError {
    /// A gate was given no qubits to act on.
    #[error("Gate location is empty")]
    EmptyLocation,

    /// A qubit index appears more than once in a gate location.
    #[error("Duplicate qubit {qubit} in gate location")]
    DuplicateQubit {
        /// The repeated qubit index.
        qubit: usize,
    },

    /// Matrix is not square.
    #[error("Matrix is not square ({rows}x{cols})")]
    NotSquare {
        /// Number of rows.
        rows: usize,
        /// Number of columns.
        cols: usize,
    },

    /// Matrix contains NaN or infinite entries.
    #[error("Matrix contains non-finite entries")]
    NonFinite,

    /// Matrix is not unitary within tolerance.
    #[error("Matrix is not unitary (|U·U† - I| exceeds tolerance)")]
    NotUnitary,

    /// Matrix dimension does not match the number of qubits it acts on.
    #[error("Matrix dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Expected dimension (2^|location|).
        expected: usize,
        /// Actual dimension.
        got: usize,
    },

    /// A location spans more qubits than a matrix index can address.
    #[error("Gate location of {len} qubits is too large for a dense unitary")]
    LocationTooLarge {
        /// Length of the offending location.
        len: usize,
    },

    /// A gate references a qubit outside the operator.
    #[error("Qubit {qubit} is out of range for a {num_qubits}-qubit operator")]
    QubitOutOfRange {
        /// The offending qubit index.
        qubit: usize,
        /// Number of qubits of the operator.
        num_qubits: usize,
    },

    /// Only two-qubit blocks can be contracted into a circuit tensor.
    #[error("Expected a two-qubit block location, got {len} qubits")]
    InvalidBlockLocation {
        /// Length of the offending location.
        len: usize,
    },

    /// Operator dimension is not a power of two.
    #[error("Matrix dimension {0} is not a power of two")]
    NotPowerOfTwo(usize),

    /// Operator width is outside the supported tensor ranks.
    #[error("Unsupported qubit count {0}: block synthesis supports 3 to 5 qubits")]
    UnsupportedQubitCount(usize),

    /// A replacement gate does not sit where the gate it replaces did.
    #[error("Replacement gate at index {index} changes the block location")]
    LocationChanged {
        /// Position in the gate list.
        index: usize,
    },

    /// Gate list index out of bounds.
    #[error("Gate index {index} out of range for a list of {len} gates")]
    GateIndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Length of the gate list.
        len: usize,
    },

    /// Synthesis configuration is invalid.
    #[error("Invalid synthesis configuration: {0}")]
    InvalidConfig(String),

    /// Singular value decomposition of an environment matrix failed.
    #[error("SVD of the environment matrix did not converge")]
    SvdFailed,

    /// Tensor reshape failed.
    #[error("Tensor shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

/// Result type for synthesis operations.
pub type SynthResult<T> = Result<T, SynthError>;
