//! Core types for the Jacobi-Richardson solver.
//!
//! Provides [`DenseMatrix`] row-major storage, the validated [`LinearSystem`]
//! problem description, and the result types produced by a solve.

use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ValidationError;
use crate::validation;

// ---------------------------------------------------------------------------
// DenseMatrix
// ---------------------------------------------------------------------------

/// Square dense matrix stored in row-major order.
///
/// Row `i` occupies `values[i * order .. (i + 1) * order]`, so a row can be
/// handed out as a contiguous slice for the dot products in the hot loop.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseMatrix {
    order: usize,
    values: Vec<f64>,
}

impl DenseMatrix {
    /// Create an `order x order` matrix filled with zeros.
    pub fn zeros(order: usize) -> Self {
        Self {
            order,
            values: vec![0.0; order * order],
        }
    }

    /// Build a square identity matrix of dimension `order`.
    pub fn identity(order: usize) -> Self {
        let mut m = Self::zeros(order);
        for i in 0..order {
            m.set(i, i, 1.0);
        }
        m
    }

    /// Build a matrix from row-major values.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DimensionMismatch`] if `values.len()` is not
    /// `order * order`.
    pub fn from_row_major(order: usize, values: Vec<f64>) -> Result<Self, ValidationError> {
        if values.len() != order * order {
            return Err(ValidationError::DimensionMismatch(format!(
                "expected {} values for a {order}x{order} matrix, got {}",
                order * order,
                values.len(),
            )));
        }
        Ok(Self { order, values })
    }

    /// Build a matrix from a list of rows. Every row must have as many entries
    /// as there are rows.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DimensionMismatch`] on a ragged or
    /// non-square input.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, ValidationError> {
        let order = rows.len();
        let mut values = Vec::with_capacity(order * order);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != order {
                return Err(ValidationError::DimensionMismatch(format!(
                    "row {i} has {} entries, expected {order}",
                    row.len(),
                )));
            }
            values.extend(row);
        }
        Ok(Self { order, values })
    }

    /// Matrix dimension.
    #[inline]
    pub fn order(&self) -> usize {
        self.order
    }

    /// Entry at `(row, col)`.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.order + col]
    }

    /// Overwrite the entry at `(row, col)`.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.values[row * self.order + col] = value;
    }

    /// Row `i` as a contiguous slice.
    #[inline]
    pub fn row(&self, i: usize) -> &[f64] {
        &self.values[i * self.order..(i + 1) * self.order]
    }

    /// Row `i` as a mutable slice.
    #[inline]
    pub fn row_mut(&mut self, i: usize) -> &mut [f64] {
        let order = self.order;
        &mut self.values[i * order..(i + 1) * order]
    }

    /// All entries in row-major order.
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Dense matrix-vector multiply: `y = A * x`.
    ///
    /// # Panics
    ///
    /// Debug-asserts that `x` and `y` have length `order`.
    pub fn matvec(&self, x: &[f64], y: &mut [f64]) {
        debug_assert_eq!(x.len(), self.order, "matvec: x.len() != order");
        debug_assert_eq!(y.len(), self.order, "matvec: y.len() != order");
        for (i, out) in y.iter_mut().enumerate() {
            *out = dot(self.row(i), x);
        }
    }
}

/// Left-to-right dot product.
///
/// The summation order is fixed so that results are bit-for-bit reproducible
/// regardless of how rows are distributed across workers.
#[inline]
pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    let mut sum = 0.0;
    for (x, y) in a.iter().zip(b) {
        sum += x * y;
    }
    sum
}

// ---------------------------------------------------------------------------
// LinearSystem
// ---------------------------------------------------------------------------

/// A square system `A x = b` together with the parameters of one solve.
///
/// Constructed through [`LinearSystem::new`], which validates every field
/// eagerly. A non-zero diagonal is *not* checked here; that is the job of
/// [`normalize`](crate::precondition::normalize).
#[derive(Debug, Clone)]
pub struct LinearSystem {
    matrix: DenseMatrix,
    rhs: Vec<f64>,
    test_row: usize,
    tolerance: f64,
    max_iterations: usize,
    workers: usize,
}

impl LinearSystem {
    /// Create and validate a system.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if the order is zero or too large, the rhs
    /// length differs from the order, any value is non-finite, `test_row` is
    /// out of range, `tolerance` is not positive, `max_iterations` is zero, or
    /// `workers` is outside `1..=order`.
    pub fn new(
        matrix: DenseMatrix,
        rhs: Vec<f64>,
        test_row: usize,
        tolerance: f64,
        max_iterations: usize,
        workers: usize,
    ) -> Result<Self, ValidationError> {
        validation::validate_matrix(&matrix)?;
        validation::validate_rhs(&rhs, matrix.order())?;
        validation::validate_test_row(test_row, matrix.order())?;
        validation::validate_tolerance(tolerance)?;
        validation::validate_max_iterations(max_iterations)?;
        validation::validate_workers(workers, matrix.order())?;

        Ok(Self {
            matrix,
            rhs,
            test_row,
            tolerance,
            max_iterations,
            workers,
        })
    }

    /// Return a copy of this system that runs on a different number of
    /// workers.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ParameterOutOfRange`] if `workers` is not in
    /// `1..=order`.
    pub fn with_workers(mut self, workers: usize) -> Result<Self, ValidationError> {
        validation::validate_workers(workers, self.order())?;
        self.workers = workers;
        Ok(self)
    }

    /// Matrix dimension.
    pub fn order(&self) -> usize {
        self.matrix.order()
    }

    /// Coefficient matrix `A`.
    pub fn matrix(&self) -> &DenseMatrix {
        &self.matrix
    }

    /// Right-hand side `b`.
    pub fn rhs(&self) -> &[f64] {
        &self.rhs
    }

    /// Row used to verify the final iterate.
    pub fn test_row(&self) -> usize {
        self.test_row
    }

    /// Maximum acceptable per-component relative error.
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Iteration cap.
    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Number of worker threads.
    pub fn workers(&self) -> usize {
        self.workers
    }

    pub(crate) fn into_parts(self) -> (DenseMatrix, Vec<f64>, SolveParams) {
        let params = SolveParams {
            test_row: self.test_row,
            tolerance: self.tolerance,
            max_iterations: self.max_iterations,
            workers: self.workers,
        };
        (self.matrix, self.rhs, params)
    }
}

/// Scalar parameters carried from a [`LinearSystem`] into its normalized form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolveParams {
    /// Row used for post-solve verification.
    pub test_row: usize,
    /// Convergence threshold on the maximum per-row error.
    pub tolerance: f64,
    /// Iteration cap.
    pub max_iterations: usize,
    /// Number of worker threads.
    pub workers: usize,
}

// ---------------------------------------------------------------------------
// Solve results
// ---------------------------------------------------------------------------

/// How an iteration run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Termination {
    /// The maximum per-row error fell to or below the tolerance.
    Converged,
    /// The iteration cap was reached before the tolerance was met.
    IterationLimitReached,
}

impl std::fmt::Display for Termination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Termination::Converged => write!(f, "converged"),
            Termination::IterationLimitReached => write!(f, "iteration-limit"),
        }
    }
}

// ---------------------------------------------------------------------------
// Serde helpers
// ---------------------------------------------------------------------------

// JSON has no representation for non-finite floats; `serde_json` writes them
// as `null`. These read a `null` back as the value it stood for.

/// Maximum errors are never NaN (see [`reduce_errors`](crate::state::reduce_errors)),
/// so `null` means `+inf`.
pub(crate) fn null_as_infinity<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::INFINITY))
}

/// `null` becomes NaN.
pub(crate) fn null_as_nan<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

/// Per-round convergence snapshot recorded by the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConvergenceInfo {
    /// Iteration number (1-based: the round that just finished).
    pub iteration: usize,
    /// Maximum per-row error for the round (`inf` if any row was non-finite).
    #[serde(deserialize_with = "null_as_infinity")]
    pub max_error: f64,
}

/// Comparison of one raw row of `A` against the final iterate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Verification {
    /// Index of the verified row.
    pub row: usize,
    /// Raw `b[row]` captured before normalization.
    pub expected: f64,
    /// `A[row] . x_final` using the raw row.
    #[serde(deserialize_with = "null_as_nan")]
    pub computed: f64,
}

impl Verification {
    /// Absolute difference between the computed and expected values.
    pub fn difference(&self) -> f64 {
        (self.computed - self.expected).abs()
    }
}

/// Outcome of a solve. Produced once per run, consumed by the reporter.
#[derive(Debug, Clone)]
pub struct SolveOutcome {
    /// Final iterate `x`.
    pub solution: Vec<f64>,
    /// Number of completed iterations.
    pub iterations: usize,
    /// Why the iteration stopped.
    pub termination: Termination,
    /// Maximum per-row error of the last round.
    pub max_error: f64,
    /// Wall-clock time spent in the parallel phase.
    pub wall_time: Duration,
    /// Per-round convergence history.
    pub convergence_history: Vec<ConvergenceInfo>,
    /// Number of workers used.
    pub workers: usize,
    /// Verification row result.
    pub verification: Verification,
}

impl SolveOutcome {
    /// `true` if the run stopped because the tolerance was met.
    pub fn converged(&self) -> bool {
        self.termination == Termination::Converged
    }
}
