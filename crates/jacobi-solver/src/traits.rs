//! Solver trait.
//!
//! [`LinearSolver`] is the seam between problem sources (loader, CLI,
//! benchmarks) and the solve pipeline, so callers can hold a
//! `&dyn LinearSolver` without caring how the iteration is scheduled.

use crate::error::SolverError;
use crate::types::{LinearSystem, SolveOutcome};

/// Core trait for solvers of dense square systems.
pub trait LinearSolver: Send + Sync {
    /// Solve `A x = b` as described by `system`.
    ///
    /// Running out of iterations is not an error; inspect
    /// [`SolveOutcome::termination`].
    ///
    /// # Errors
    ///
    /// Returns [`SolverError`] for degenerate diagonals, invalid worker
    /// counts, or thread failures.
    fn solve(&self, system: LinearSystem) -> Result<SolveOutcome, SolverError>;

    /// Short identifier used in reports and logs.
    fn name(&self) -> &'static str;
}
