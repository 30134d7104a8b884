//! Jacobi splitting of a [`LinearSystem`].
//!
//! Writing `A = D + L + R` and scaling every row by `D^{-1}` gives
//! `A* = I + L* + R*` and `b* = D^{-1} b`. The fixed point of
//!
//! ```text
//! x_{k+1} = -(L* + R*) x_k + b*
//! ```
//!
//! solves `A x = b`. [`normalize`] produces the scaled matrix with its
//! diagonal zeroed, so one dense row product per component computes
//! `(L* + R*) x` without skipping the diagonal.

use tracing::{debug, instrument};

use crate::error::SolverError;
use crate::types::{dot, DenseMatrix, LinearSystem, SolveParams};

/// Raw row of `A` and entry of `b` kept for post-solve verification.
///
/// Normalization destroys the diagonal, so this snapshot is taken first.
#[derive(Debug, Clone, PartialEq)]
pub struct VerificationRow {
    /// Index of the captured row.
    pub index: usize,
    /// Unscaled `A[index][..]`.
    pub coefficients: Vec<f64>,
    /// Unscaled `b[index]`.
    pub expected: f64,
}

impl VerificationRow {
    /// Evaluate the raw row against an iterate.
    pub fn evaluate(&self, x: &[f64]) -> f64 {
        dot(&self.coefficients, x)
    }
}

/// A system after Jacobi splitting: `matrix = L* + R*` (zero diagonal) and
/// `rhs = b*`.
///
/// There is deliberately no way to normalize a `NormalizedSystem` again; the
/// zero diagonal would be a division by zero.
#[derive(Debug, Clone)]
pub struct NormalizedSystem {
    matrix: DenseMatrix,
    rhs: Vec<f64>,
    verification: VerificationRow,
    params: SolveParams,
    decoupled: bool,
}

impl NormalizedSystem {
    /// Matrix dimension.
    pub fn order(&self) -> usize {
        self.matrix.order()
    }

    /// Off-diagonal iteration matrix `L* + R*`.
    pub fn matrix(&self) -> &DenseMatrix {
        &self.matrix
    }

    /// Scaled right-hand side `b*`.
    pub fn rhs(&self) -> &[f64] {
        &self.rhs
    }

    /// Verification snapshot taken before scaling.
    pub fn verification(&self) -> &VerificationRow {
        &self.verification
    }

    /// Convergence threshold.
    pub fn tolerance(&self) -> f64 {
        self.params.tolerance
    }

    /// Iteration cap.
    pub fn max_iterations(&self) -> usize {
        self.params.max_iterations
    }

    /// Worker count requested by the originating [`LinearSystem`].
    pub fn workers(&self) -> usize {
        self.params.workers
    }

    /// `true` if every off-diagonal entry is zero.
    ///
    /// The iteration matrix is then zero and the first iterate `b*` is the
    /// exact solution.
    pub fn is_decoupled(&self) -> bool {
        self.decoupled
    }
}

/// Split and scale a system for the Jacobi-Richardson iteration.
///
/// Captures the verification row from the unscaled data, then for every row
/// `i` divides `A[i][..]` and `b[i]` by `A[i][i]` and sets `A[i][i] = 0`. The
/// input buffers are reused in place.
///
/// # Errors
///
/// Returns [`SolverError::DegenerateDiagonal`] for the first row whose
/// diagonal entry is zero or non-finite. The check runs over all rows before
/// any division, so no partially scaled state is produced.
#[instrument(skip(system), fields(order = system.order()))]
pub fn normalize(system: LinearSystem) -> Result<NormalizedSystem, SolverError> {
    let (mut matrix, mut rhs, params) = system.into_parts();
    let order = matrix.order();

    for i in 0..order {
        let diag = matrix.get(i, i);
        if diag == 0.0 || !diag.is_finite() {
            return Err(SolverError::DegenerateDiagonal { row: i, value: diag });
        }
    }

    let verification = VerificationRow {
        index: params.test_row,
        coefficients: matrix.row(params.test_row).to_vec(),
        expected: rhs[params.test_row],
    };

    let mut decoupled = true;
    for i in 0..order {
        let diag = matrix.get(i, i);
        rhs[i] /= diag;
        let row = matrix.row_mut(i);
        for v in row.iter_mut() {
            *v /= diag;
        }
        row[i] = 0.0;
        if row.iter().any(|&v| v != 0.0) {
            decoupled = false;
        }
    }

    debug!(decoupled, "normalized system");

    Ok(NormalizedSystem {
        matrix,
        rhs,
        verification,
        params,
        decoupled,
    })
}
