//! Input validation for solver operations.
//!
//! All validation functions run eagerly before any computation begins, so
//! callers receive clear diagnostics instead of numerical garbage or a stuck
//! thread pool. Every function returns [`ValidationError`] on failure, which
//! converts into [`SolverError::InvalidInput`](crate::error::SolverError) via
//! `From`.
//!
//! # Limits
//!
//! | Resource     | Limit      | Constant           |
//! |--------------|------------|--------------------|
//! | Matrix order | 65,536     | [`MAX_ORDER`]      |
//! | Iterations   | 10,000,000 | [`MAX_ITERATIONS`] |
//! | Workers      | 1,024      | [`MAX_WORKERS`]    |

use crate::error::ValidationError;
use crate::types::DenseMatrix;

// ---------------------------------------------------------------------------
// Resource limits
// ---------------------------------------------------------------------------

/// Maximum matrix order. A dense matrix of this order is 32 GiB of `f64`.
pub const MAX_ORDER: usize = 65_536;

/// Maximum solver iterations to prevent runaway computation.
pub const MAX_ITERATIONS: usize = 10_000_000;

/// Maximum number of worker threads.
pub const MAX_WORKERS: usize = 1_024;

// ---------------------------------------------------------------------------
// Matrix / vector validation
// ---------------------------------------------------------------------------

/// Validate a dense coefficient matrix.
///
/// 1. The order is non-zero and within [`MAX_ORDER`].
/// 2. No `NaN` or `Inf` entries.
///
/// # Errors
///
/// Returns [`ValidationError`] describing the first violation found.
///
/// # Examples
///
/// ```
/// use jacobi_solver::types::DenseMatrix;
/// use jacobi_solver::validation::validate_matrix;
///
/// assert!(validate_matrix(&DenseMatrix::identity(3)).is_ok());
/// assert!(validate_matrix(&DenseMatrix::zeros(0)).is_err());
/// ```
pub fn validate_matrix(matrix: &DenseMatrix) -> Result<(), ValidationError> {
    let order = matrix.order();
    if order == 0 {
        return Err(ValidationError::ParameterOutOfRange {
            name: "order".into(),
            value: "0".into(),
            expected: ">= 1".into(),
        });
    }
    if order > MAX_ORDER {
        return Err(ValidationError::MatrixTooLarge {
            order,
            max_order: MAX_ORDER,
        });
    }

    for (idx, &v) in matrix.as_slice().iter().enumerate() {
        if !v.is_finite() {
            return Err(ValidationError::NonFiniteValue(format!(
                "matrix[{}][{}] = {}",
                idx / order,
                idx % order,
                v,
            )));
        }
    }

    Ok(())
}

/// Validate a right-hand-side vector for a system of the given order.
///
/// Checks the length and finiteness. An all-zero rhs is valid but emits a
/// [`tracing::warn`], since the solution is trivially zero.
///
/// # Errors
///
/// Returns [`ValidationError`] on dimension mismatch or non-finite values.
pub fn validate_rhs(rhs: &[f64], expected_len: usize) -> Result<(), ValidationError> {
    if rhs.len() != expected_len {
        return Err(ValidationError::DimensionMismatch(format!(
            "rhs length {} does not match matrix order {}",
            rhs.len(),
            expected_len,
        )));
    }

    let mut all_zero = true;
    for (i, &v) in rhs.iter().enumerate() {
        if !v.is_finite() {
            return Err(ValidationError::NonFiniteValue(format!("rhs[{i}] = {v}")));
        }
        if v != 0.0 {
            all_zero = false;
        }
    }

    if all_zero {
        tracing::warn!("rhs vector is all zeros; solution will be trivially zero");
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Parameter validation
// ---------------------------------------------------------------------------

/// Validate the verification row index.
pub fn validate_test_row(test_row: usize, order: usize) -> Result<(), ValidationError> {
    if test_row >= order {
        return Err(ValidationError::ParameterOutOfRange {
            name: "test_row".into(),
            value: test_row.to_string(),
            expected: format!("[0, {order})"),
        });
    }
    Ok(())
}

/// Validate the convergence tolerance: finite and strictly positive.
pub fn validate_tolerance(tolerance: f64) -> Result<(), ValidationError> {
    if !tolerance.is_finite() || tolerance <= 0.0 {
        return Err(ValidationError::ParameterOutOfRange {
            name: "tolerance".into(),
            value: format!("{tolerance:.2e}"),
            expected: "finite positive value".into(),
        });
    }
    Ok(())
}

/// Validate the iteration cap: in `[1, MAX_ITERATIONS]`.
pub fn validate_max_iterations(max_iterations: usize) -> Result<(), ValidationError> {
    if max_iterations == 0 || max_iterations > MAX_ITERATIONS {
        return Err(ValidationError::ParameterOutOfRange {
            name: "max_iterations".into(),
            value: max_iterations.to_string(),
            expected: format!("[1, {MAX_ITERATIONS}]"),
        });
    }
    Ok(())
}

/// Validate the worker count: in `[1, min(order, MAX_WORKERS)]`.
///
/// # Errors
///
/// Returns [`ValidationError::ParameterOutOfRange`] otherwise.
pub fn validate_workers(workers: usize, order: usize) -> Result<(), ValidationError> {
    let upper = order.min(MAX_WORKERS);
    if workers == 0 || workers > upper {
        return Err(ValidationError::ParameterOutOfRange {
            name: "workers".into(),
            value: workers.to_string(),
            expected: format!("[1, {upper}]"),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
