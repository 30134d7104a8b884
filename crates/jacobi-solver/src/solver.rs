//! Parallel Jacobi-Richardson solver.
//!
//! [`solve`] runs the fixed-point iteration
//!
//! ```text
//! x_{k+1} = -(L* + R*) x_k + b*
//! ```
//!
//! on a [`NormalizedSystem`] with a fixed pool of scoped worker threads, one
//! per [`Partition`] range. The pool is created once per solve and joined at
//! the end; rounds are synchronized by a single [`Barrier`] waited twice per
//! round (see [`worker`](crate::worker)).
//!
//! Run states: `INIT` (allocate, spawn) → `ITERATING` → `CONVERGED` or
//! `ITERATION_LIMIT` → `DONE` (join, verify).
//!
//! Reaching the iteration cap is not an error. It is reported as
//! [`Termination::IterationLimitReached`] on an `Ok` outcome.

use std::sync::Barrier;
use std::thread;
use std::time::Instant;

use tracing::{info, instrument, warn};

use crate::error::SolverError;
use crate::partition::{partition, Partition};
use crate::precondition::{normalize, NormalizedSystem};
use crate::state::IterationState;
use crate::traits::LinearSolver;
use crate::types::{LinearSystem, SolveOutcome, Termination, Verification};
use crate::worker::{StartGate, Worker, WorkerStats};

/// Solve a normalized system with `workers` threads over `partition`.
///
/// # Errors
///
/// - [`SolverError::InvalidPartition`] if `partition` does not have exactly
///   `workers` ranges or covers a different order than `system`.
/// - [`SolverError::WorkerSpawn`] if a thread cannot be started. Workers that
///   were already started exit without iterating.
/// - [`SolverError::WorkerPanicked`] if a worker panicked.
#[instrument(skip(system, partition), fields(order = system.order()))]
pub fn solve(
    system: &NormalizedSystem,
    partition: &Partition,
    workers: usize,
) -> Result<SolveOutcome, SolverError> {
    let order = system.order();
    if partition.len() != workers {
        return Err(SolverError::InvalidPartition {
            order,
            workers,
            reason: format!("partition has {} ranges", partition.len()),
        });
    }
    if partition.order() != order {
        return Err(SolverError::InvalidPartition {
            order,
            workers,
            reason: format!("partition covers {} rows", partition.order()),
        });
    }

    let start = Instant::now();
    let state = IterationState::new(order, system.max_iterations());
    let barrier = Barrier::new(workers);
    let gate = StartGate::new();

    let joined: Result<Vec<WorkerStats>, SolverError> = thread::scope(|s| {
        let mut handles = Vec::with_capacity(workers);
        for (id, &rows) in partition.ranges().iter().enumerate() {
            let worker = Worker {
                id,
                rows,
                system,
                state: &state,
                barrier: &barrier,
                gate: &gate,
            };
            let spawned = thread::Builder::new()
                .name(format!("jacobi-worker-{id}"))
                .spawn_scoped(s, move || worker.run());
            match spawned {
                Ok(handle) => handles.push(handle),
                Err(source) => {
                    gate.open(false);
                    return Err(SolverError::WorkerSpawn { worker: id, source });
                }
            }
        }
        gate.open(true);

        let mut stats = Vec::with_capacity(workers);
        let mut panicked = None;
        for (id, handle) in handles.into_iter().enumerate() {
            match handle.join() {
                Ok(s) => stats.push(s),
                Err(_) => {
                    panicked.get_or_insert(id);
                }
            }
        }
        match panicked {
            Some(worker) => Err(SolverError::WorkerPanicked { worker }),
            None => Ok(stats),
        }
    });
    let stats = joined?;
    let wall_time = start.elapsed();

    let fin = state.into_final();
    let termination = fin
        .termination
        .unwrap_or(Termination::IterationLimitReached);
    let verification_row = system.verification();
    let verification = Verification {
        row: verification_row.index,
        expected: verification_row.expected,
        computed: verification_row.evaluate(&fin.solution),
    };

    match termination {
        Termination::Converged => info!(
            iterations = fin.iterations,
            max_error = fin.max_error,
            ?wall_time,
            "converged"
        ),
        Termination::IterationLimitReached => warn!(
            iterations = fin.iterations,
            max_error = fin.max_error,
            tolerance = system.tolerance(),
            "iteration limit reached before tolerance"
        ),
    }
    tracing::debug!(
        coordinated = ?stats.iter().map(|s| s.coordinated).collect::<Vec<_>>(),
        "coordinator rounds per worker"
    );

    Ok(SolveOutcome {
        solution: fin.solution,
        iterations: fin.iterations,
        termination,
        max_error: fin.max_error,
        wall_time,
        convergence_history: fin.history,
        workers,
        verification,
    })
}

// ---------------------------------------------------------------------------
// JacobiSolver
// ---------------------------------------------------------------------------

/// Full pipeline for a raw [`LinearSystem`]: normalize, partition, solve.
///
/// # Example
///
/// ```rust
/// use jacobi_solver::solver::JacobiSolver;
/// use jacobi_solver::traits::LinearSolver;
/// use jacobi_solver::types::{DenseMatrix, LinearSystem, Termination};
///
/// let a = DenseMatrix::from_rows(vec![
///     vec![4.0, 1.0, 1.0],
///     vec![1.0, 3.0, 1.0],
///     vec![1.0, 1.0, 5.0],
/// ]).unwrap();
/// let system = LinearSystem::new(a, vec![6.0, 5.0, 7.0], 2, 1e-6, 100, 2).unwrap();
///
/// let outcome = JacobiSolver::new().solve(system).unwrap();
/// assert_eq!(outcome.termination, Termination::Converged);
/// assert!((outcome.verification.computed - 7.0).abs() < 1e-4);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JacobiSolver {
    /// Overrides the worker count stored in the system when set.
    pub workers: Option<usize>,
}

impl JacobiSolver {
    /// Solver that uses each system's own worker count.
    pub fn new() -> Self {
        Self { workers: None }
    }

    /// Solver that always uses `workers` threads.
    pub fn with_workers(workers: usize) -> Self {
        Self {
            workers: Some(workers),
        }
    }
}

impl LinearSolver for JacobiSolver {
    fn solve(&self, system: LinearSystem) -> Result<SolveOutcome, SolverError> {
        let system = match self.workers {
            Some(w) => system.with_workers(w)?,
            None => system,
        };
        let workers = system.workers();
        let normalized = normalize(system)?;
        let partition = partition(normalized.order(), workers)?;
        solve(&normalized, &partition, workers)
    }

    fn name(&self) -> &'static str {
        "jacobi-richardson"
    }
}
