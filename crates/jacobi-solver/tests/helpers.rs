//! Shared test helpers for the jacobi-solver integration test suite.
//!
//! Provides deterministic random system generators, a dense reference solver,
//! and floating-point comparison utilities used across all test modules.

#![allow(dead_code)]

use jacobi_solver::types::{DenseMatrix, LinearSystem};

// ---------------------------------------------------------------------------
// Random number generator (simple LCG for deterministic reproducibility)
// ---------------------------------------------------------------------------

/// A minimal linear congruential generator for deterministic test data.
pub struct Lcg {
    state: u64,
}

impl Lcg {
    /// Create a new LCG with the given seed.
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Generate the next u64 value.
    pub fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.state
    }

    /// Generate a uniform f64 in [0, 1).
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Generate a uniform f64 in [lo, hi).
    pub fn next_f64_range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }
}

// ---------------------------------------------------------------------------
// System generators
// ---------------------------------------------------------------------------

/// Generate a random strictly diagonally dominant dense matrix of order `n`.
///
/// Off-diagonal entries are uniform in `[-1, 1)`; each diagonal entry is
/// `1 + sum_of_abs_off_diag + U[0, 1)`, with a random sign.
pub fn random_diag_dominant(n: usize, seed: u64) -> DenseMatrix {
    let mut rng = Lcg::new(seed);
    let mut m = DenseMatrix::zeros(n);
    for i in 0..n {
        let mut off_diag_sum = 0.0;
        for j in 0..n {
            if i != j {
                let v = rng.next_f64_range(-1.0, 1.0);
                m.set(i, j, v);
                off_diag_sum += v.abs();
            }
        }
        let sign = if rng.next_f64() < 0.5 { -1.0 } else { 1.0 };
        m.set(i, i, sign * (off_diag_sum + 1.0 + rng.next_f64()));
    }
    m
}

/// Generate a deterministic random vector of length `n`.
pub fn random_vector(n: usize, seed: u64) -> Vec<f64> {
    let mut rng = Lcg::new(seed);
    (0..n).map(|_| rng.next_f64_range(-1.0, 1.0)).collect()
}

/// A system with a known solution: `b = A * x_true`.
pub fn system_with_solution(
    matrix: DenseMatrix,
    x_true: &[f64],
    tolerance: f64,
    max_iterations: usize,
    workers: usize,
) -> LinearSystem {
    let mut rhs = vec![0.0; matrix.order()];
    matrix.matvec(x_true, &mut rhs);
    LinearSystem::new(matrix, rhs, 0, tolerance, max_iterations, workers).unwrap()
}

/// The order-3 system whose solution is `[1, 1, 1]`.
pub fn sample_system(max_iterations: usize, workers: usize) -> LinearSystem {
    let a = DenseMatrix::from_rows(vec![
        vec![4.0, 1.0, 1.0],
        vec![1.0, 3.0, 1.0],
        vec![1.0, 1.0, 5.0],
    ])
    .unwrap();
    LinearSystem::new(a, vec![6.0, 5.0, 7.0], 2, 1e-6, max_iterations, workers).unwrap()
}

// ---------------------------------------------------------------------------
// Dense reference solver
// ---------------------------------------------------------------------------

/// Solve `Ax = b` using dense Gaussian elimination with partial pivoting.
///
/// # Panics
///
/// Panics if the matrix is singular or dimensions are inconsistent.
pub fn dense_solve(matrix: &DenseMatrix, rhs: &[f64]) -> Vec<f64> {
    let n = matrix.order();
    assert_eq!(rhs.len(), n, "rhs length must match matrix dimension");

    let mut aug: Vec<Vec<f64>> = (0..n)
        .map(|i| {
            let mut row = matrix.row(i).to_vec();
            row.push(rhs[i]);
            row
        })
        .collect();

    for col in 0..n {
        let mut max_row = col;
        let mut max_val = aug[col][col].abs();
        for row in (col + 1)..n {
            if aug[row][col].abs() > max_val {
                max_val = aug[row][col].abs();
                max_row = row;
            }
        }
        assert!(max_val > 1e-15, "matrix is singular or near-singular");
        aug.swap(col, max_row);

        let pivot = aug[col][col];
        for row in (col + 1)..n {
            let factor = aug[row][col] / pivot;
            for j in col..=n {
                aug[row][j] -= factor * aug[col][j];
            }
        }
    }

    let mut x = vec![0.0f64; n];
    for i in (0..n).rev() {
        let mut sum = aug[i][n];
        for j in (i + 1)..n {
            sum -= aug[i][j] * x[j];
        }
        x[i] = sum / aug[i][i];
    }
    x
}

// ---------------------------------------------------------------------------
// Floating-point comparison utilities
// ---------------------------------------------------------------------------

/// Largest absolute component difference.
pub fn max_abs_diff(a: &[f64], b: &[f64]) -> f64 {
    assert_eq!(a.len(), b.len(), "vectors must have same length");
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max)
}

/// Infinity norm of the residual `b - A x`.
pub fn residual_inf_norm(matrix: &DenseMatrix, x: &[f64], rhs: &[f64]) -> f64 {
    let mut ax = vec![0.0; matrix.order()];
    matrix.matvec(x, &mut ax);
    max_abs_diff(&ax, rhs)
}
