//! Error types for the solver crate.
//!
//! Configuration and shape problems are detected before any worker thread is
//! spawned and abort the solve synchronously. Hitting the iteration cap is not
//! an error; see [`Termination`](crate::types::Termination).

/// Primary error type for solver operations.
#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    /// A zero (or non-finite) diagonal entry was found during normalization.
    #[error("degenerate diagonal at row {row}: a[{row}][{row}] = {value}")]
    DegenerateDiagonal {
        /// Row whose diagonal entry cannot be divided by.
        row: usize,
        /// The offending diagonal value.
        value: f64,
    },

    /// The worker count cannot be mapped onto the matrix rows.
    #[error("cannot partition {order} rows across {workers} workers: {reason}")]
    InvalidPartition {
        /// Matrix order.
        order: usize,
        /// Requested worker count.
        workers: usize,
        /// Human-readable explanation.
        reason: String,
    },

    /// The caller supplied invalid input (dimensions, parameters, etc.).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    /// The operating system refused to start a worker thread.
    #[error("failed to spawn worker {worker}: {source}")]
    WorkerSpawn {
        /// Index of the worker that could not be started.
        worker: usize,
        /// Underlying spawn error.
        #[source]
        source: std::io::Error,
    },

    /// A worker thread panicked while iterating.
    #[error("worker {worker} panicked during iteration")]
    WorkerPanicked {
        /// Index of the worker that panicked.
        worker: usize,
    },
}

/// Validation errors for solver inputs.
///
/// These are raised eagerly before any computation begins so that callers get
/// clear diagnostics rather than mysterious numerical failures.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// Matrix or vector dimensions are inconsistent.
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// A value is NaN or infinite where a finite number is required.
    #[error("non-finite value detected: {0}")]
    NonFiniteValue(String),

    /// A parameter is outside its valid range.
    #[error("parameter out of range: {name} = {value} (expected {expected})")]
    ParameterOutOfRange {
        /// Name of the parameter.
        name: String,
        /// The invalid value (as a string for flexibility).
        value: String,
        /// Human-readable description of the valid range.
        expected: String,
    },

    /// Matrix order exceeds the implementation limit.
    #[error("matrix order {order} exceeds maximum supported {max_order}")]
    MatrixTooLarge {
        /// Requested order.
        order: usize,
        /// Maximum supported order.
        max_order: usize,
    },
}

/// Errors raised while reading a problem file.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The underlying reader failed.
    #[error("failed to read problem: {0}")]
    Io(#[from] std::io::Error),

    /// The input ended before all declared values were read.
    #[error("unexpected end of input while reading {expected}")]
    UnexpectedEof {
        /// What the loader was trying to read.
        expected: String,
    },

    /// A token could not be parsed as the expected number type.
    #[error("invalid number {token:?} at token {position}")]
    InvalidNumber {
        /// The raw token.
        token: String,
        /// Zero-based token position in the input.
        position: usize,
    },

    /// The parsed problem failed validation.
    #[error("invalid problem: {0}")]
    Invalid(#[from] ValidationError),
}
