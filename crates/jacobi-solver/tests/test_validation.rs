//! Integration tests for input validation.
//!
//! Tests cover rejection of NaN and Inf values, dimension mismatches,
//! out-of-range parameters, and oversized inputs, all of which must surface
//! before a single worker thread is started.

use jacobi_solver::error::{SolverError, ValidationError};
use jacobi_solver::solver::JacobiSolver;
use jacobi_solver::traits::LinearSolver;
use jacobi_solver::types::{DenseMatrix, LinearSystem};
use jacobi_solver::validation::{validate_workers, MAX_ITERATIONS, MAX_ORDER, MAX_WORKERS};

fn diag3() -> DenseMatrix {
    DenseMatrix::from_rows(vec![
        vec![2.0, -0.5, 0.0],
        vec![-0.5, 2.0, -0.5],
        vec![0.0, -0.5, 2.0],
    ])
    .unwrap()
}

fn build(
    rhs: Vec<f64>,
    test_row: usize,
    tolerance: f64,
    max_iterations: usize,
    workers: usize,
) -> Result<LinearSystem, ValidationError> {
    LinearSystem::new(diag3(), rhs, test_row, tolerance, max_iterations, workers)
}

fn assert_out_of_range(result: Result<LinearSystem, ValidationError>, param: &str) {
    match result {
        Err(ValidationError::ParameterOutOfRange { name, .. }) => assert_eq!(name, param),
        other => panic!("expected ParameterOutOfRange for {param}, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Non-finite values
// ---------------------------------------------------------------------------

#[test]
fn test_reject_nan_in_matrix() {
    let mut a = diag3();
    a.set(2, 0, f64::NAN);
    let err = LinearSystem::new(a, vec![1.0; 3], 0, 1e-6, 10, 1).unwrap_err();
    assert!(
        matches!(err, ValidationError::NonFiniteValue(ref msg) if msg.contains("[2][0]")),
        "got {err:?}"
    );
}

#[test]
fn test_reject_inf_in_rhs() {
    let err = build(vec![1.0, f64::NEG_INFINITY, 1.0], 0, 1e-6, 10, 1).unwrap_err();
    assert!(
        matches!(err, ValidationError::NonFiniteValue(ref msg) if msg.contains("rhs[1]")),
        "got {err:?}"
    );
}

// ---------------------------------------------------------------------------
// Dimensions
// ---------------------------------------------------------------------------

#[test]
fn test_reject_rhs_length_mismatch() {
    let err = build(vec![1.0, 2.0], 0, 1e-6, 10, 1).unwrap_err();
    assert!(matches!(err, ValidationError::DimensionMismatch(_)));
}

#[test]
fn test_reject_ragged_rows() {
    let err = DenseMatrix::from_rows(vec![vec![1.0, 2.0], vec![3.0]]).unwrap_err();
    assert!(matches!(err, ValidationError::DimensionMismatch(_)));
}

#[test]
fn test_reject_empty_matrix() {
    let err = LinearSystem::new(DenseMatrix::zeros(0), vec![], 0, 1e-6, 10, 1).unwrap_err();
    assert!(matches!(err, ValidationError::ParameterOutOfRange { .. }));
}

// ---------------------------------------------------------------------------
// Parameters
// ---------------------------------------------------------------------------

#[test]
fn test_reject_test_row_out_of_range() {
    assert_out_of_range(build(vec![1.0; 3], 3, 1e-6, 10, 1), "test_row");
}

#[test]
fn test_reject_bad_tolerance() {
    for tol in [0.0, -1e-6, f64::NAN, f64::INFINITY] {
        assert_out_of_range(build(vec![1.0; 3], 0, tol, 10, 1), "tolerance");
    }
}

#[test]
fn test_reject_bad_iteration_cap() {
    assert_out_of_range(build(vec![1.0; 3], 0, 1e-6, 0, 1), "max_iterations");
    assert_out_of_range(
        build(vec![1.0; 3], 0, 1e-6, MAX_ITERATIONS + 1, 1),
        "max_iterations",
    );
}

#[test]
fn test_reject_bad_worker_count() {
    assert_out_of_range(build(vec![1.0; 3], 0, 1e-6, 10, 0), "workers");
    assert_out_of_range(build(vec![1.0; 3], 0, 1e-6, 10, 4), "workers");
}

#[test]
fn test_worker_limit_caps_large_orders() {
    assert!(validate_workers(MAX_WORKERS, MAX_ORDER).is_ok());
    assert!(validate_workers(MAX_WORKERS + 1, MAX_ORDER).is_err());
}

#[test]
fn test_with_workers_revalidates() {
    let sys = build(vec![1.0; 3], 0, 1e-6, 10, 1).unwrap();
    let sys = sys.with_workers(3).unwrap();
    assert_eq!(sys.workers(), 3);
    assert!(sys.with_workers(5).is_err());
}

#[test]
fn test_solver_override_rejected_as_invalid_input() {
    let sys = build(vec![1.0; 3], 0, 1e-6, 10, 1).unwrap();
    let err = JacobiSolver::with_workers(8).solve(sys).unwrap_err();
    assert!(matches!(err, SolverError::InvalidInput(_)), "got {err:?}");
}

#[test]
fn test_all_zero_rhs_is_accepted() {
    assert!(build(vec![0.0; 3], 0, 1e-6, 10, 1).is_ok());
}

#[test]
fn test_error_messages_are_descriptive() {
    let err = build(vec![1.0; 3], 7, 1e-6, 10, 1).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("test_row"), "{msg}");
    assert!(msg.contains("[0, 3)"), "{msg}");
}
