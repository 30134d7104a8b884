//! Shared iteration state.
//!
//! [`IterationState`] holds the two iterate buffers, the per-row error buffer
//! and a ledger owned by the round coordinator. Access alternates between two
//! phases, separated by barrier waits:
//!
//! | Phase       | Who                | Reads                     | Writes                         |
//! |-------------|--------------------|---------------------------|--------------------------------|
//! | compute     | every worker       | ledger, all of `current`  | `next[i]`, `error[i]` own rows |
//! | coordinate  | barrier leader     | all of `error`            | ledger                         |
//!
//! No buffer is ever written by two threads in the same phase, and nothing
//! written in one phase is read in that same phase by another thread. The
//! barrier between phases provides the happens-before edge. This discipline
//! is what makes the `unsafe impl Sync` below sound; the `unsafe` methods
//! spell out which phase they belong to.

use std::cell::UnsafeCell;

use tracing::{debug, warn};

use crate::partition::RowRange;
use crate::precondition::NormalizedSystem;
use crate::types::{dot, ConvergenceInfo, Termination};

/// Below this magnitude of the new component, the per-row error falls back
/// from relative `|next - current| / |next|` to absolute `|next - current|`.
pub const RELATIVE_ERROR_FLOOR: f64 = 1e-12;

/// Upper bound on the convergence history capacity reserved up front.
const HISTORY_PREALLOC: usize = 256;

type Cells = Box<[UnsafeCell<f64>]>;

fn zeroed(len: usize) -> Cells {
    (0..len).map(|_| UnsafeCell::new(0.0)).collect()
}

/// View a cell slice as plain values.
///
/// # Safety
///
/// No thread may write any of these cells while the returned slice is alive.
unsafe fn values(cells: &[UnsafeCell<f64>]) -> &[f64] {
    // UnsafeCell<f64> is repr(transparent) over f64.
    &*(cells as *const [UnsafeCell<f64>] as *const [f64])
}

/// Per-component convergence measure.
///
/// Relative error `|next - current| / |next|`, or the absolute difference
/// when `|next| <= RELATIVE_ERROR_FLOOR`, so a zero component never divides
/// by zero. Non-finite inputs produce a non-finite result, which the round
/// reduction treats as "not converged".
#[inline]
pub fn component_error(next: f64, current: f64) -> f64 {
    let diff = (next - current).abs();
    let scale = next.abs();
    if scale > RELATIVE_ERROR_FLOOR {
        diff / scale
    } else {
        diff
    }
}

/// Result of reducing the per-row error buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErrorReduction {
    /// Largest error, or `+inf` if any entry was non-finite.
    pub max_error: f64,
    /// Number of NaN/infinite entries.
    pub non_finite: usize,
}

/// Maximum of the per-row errors.
///
/// `f64::max` silently drops NaN, which would let a NaN row look converged;
/// here any non-finite entry forces the result to `+inf`.
pub fn reduce_errors(errors: &[f64]) -> ErrorReduction {
    let mut max_error = 0.0f64;
    let mut non_finite = 0;
    for &e in errors {
        if !e.is_finite() {
            non_finite += 1;
        } else if e > max_error {
            max_error = e;
        }
    }
    if non_finite > 0 {
        max_error = f64::INFINITY;
    }
    ErrorReduction {
        max_error,
        non_finite,
    }
}

/// Coordinator-owned control data.
#[derive(Debug)]
struct Ledger {
    /// Index into `buffers` of the buffer holding the current iterate.
    current: usize,
    iteration: usize,
    termination: Option<Termination>,
    max_error: f64,
    history: Vec<ConvergenceInfo>,
}

/// Snapshot of the ledger fields workers need between rounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Round {
    pub current: usize,
    pub iteration: usize,
    pub termination: Option<Termination>,
}

/// Final contents of an [`IterationState`] once every worker has exited.
#[derive(Debug, Clone)]
pub struct FinalState {
    /// The iterate held in the `current` role.
    pub solution: Vec<f64>,
    /// Completed iterations.
    pub iterations: usize,
    /// Termination reason, `None` if no round ever ran.
    pub termination: Option<Termination>,
    /// Maximum per-row error of the last round.
    pub max_error: f64,
    /// Per-round history.
    pub history: Vec<ConvergenceInfo>,
}

/// Vectors, error buffer and control ledger shared by all workers of a solve.
pub struct IterationState {
    buffers: [Cells; 2],
    errors: Cells,
    ledger: UnsafeCell<Ledger>,
}

// SAFETY: all interior mutation follows the phase discipline in the module
// docs. Within a phase, writes target disjoint cells (compute) or happen on a
// single thread while all others are parked on the barrier (coordinate).
unsafe impl Sync for IterationState {}

impl IterationState {
    /// Allocate state for a system of `order` rows with `x_0 = 0`.
    pub fn new(order: usize, max_iterations: usize) -> Self {
        Self {
            buffers: [zeroed(order), zeroed(order)],
            errors: zeroed(order),
            ledger: UnsafeCell::new(Ledger {
                current: 0,
                iteration: 0,
                termination: None,
                max_error: f64::INFINITY,
                history: Vec::with_capacity(max_iterations.min(HISTORY_PREALLOC)),
            }),
        }
    }

    /// Number of rows.
    pub fn order(&self) -> usize {
        self.errors.len()
    }

    /// Read the ledger fields workers act on.
    ///
    /// # Safety
    ///
    /// Must not overlap a coordinate phase.
    pub(crate) unsafe fn round(&self) -> Round {
        let ledger = &*self.ledger.get();
        Round {
            current: ledger.current,
            iteration: ledger.iteration,
            termination: ledger.termination,
        }
    }

    /// Compute phase: update `next` and `error` for `rows`.
    ///
    /// For each row `i`: `next[i] = -(row_i . current) + b*[i]` and
    /// `error[i] = component_error(next[i], current[i])`.
    ///
    /// # Safety
    ///
    /// Must run in a compute phase, and no other thread may be updating an
    /// overlapping row range in the same phase.
    pub(crate) unsafe fn update_rows(&self, rows: RowRange, system: &NormalizedSystem) {
        let current_idx = self.round().current;
        // Nobody writes the current buffer during a compute phase.
        let current = values(&self.buffers[current_idx]);
        let next = &self.buffers[current_idx ^ 1];
        let matrix = system.matrix();
        let rhs = system.rhs();

        for i in rows.rows() {
            let value = -dot(matrix.row(i), current) + rhs[i];
            *next[i].get() = value;
            *self.errors[i].get() = component_error(value, current[i]);
        }
    }

    /// Coordinate phase: swap roles, reduce errors, advance the counter and
    /// decide termination. Returns the updated round.
    ///
    /// # Safety
    ///
    /// Must be called by exactly one thread while every other participant is
    /// waiting between the two barriers of the round.
    pub(crate) unsafe fn coordinate(&self, system: &NormalizedSystem) -> Round {
        let reduction = reduce_errors(values(&self.errors));
        let ledger = &mut *self.ledger.get();

        ledger.current ^= 1;
        ledger.iteration += 1;
        ledger.max_error = reduction.max_error;
        ledger.history.push(ConvergenceInfo {
            iteration: ledger.iteration,
            max_error: reduction.max_error,
        });

        if reduction.non_finite > 0 {
            warn!(
                iteration = ledger.iteration,
                rows = reduction.non_finite,
                "non-finite per-row error; round treated as not converged"
            );
        }
        debug!(
            iteration = ledger.iteration,
            max_error = reduction.max_error,
            "jacobi round"
        );

        // A decoupled system is exact after one round, unless scaling by the
        // diagonal overflowed; non-finite rows never count as converged.
        let exact = system.is_decoupled() && reduction.non_finite == 0;
        ledger.termination = if exact || reduction.max_error <= system.tolerance() {
            Some(Termination::Converged)
        } else if ledger.iteration >= system.max_iterations() {
            Some(Termination::IterationLimitReached)
        } else {
            None
        };

        Round {
            current: ledger.current,
            iteration: ledger.iteration,
            termination: ledger.termination,
        }
    }

    /// Take the final iterate and ledger. Requires exclusive ownership, so
    /// every worker must have been joined.
    pub fn into_final(self) -> FinalState {
        let ledger = self.ledger.into_inner();
        let [a, b] = self.buffers;
        let current = if ledger.current == 0 { a } else { b };
        FinalState {
            solution: current.into_vec().into_iter().map(UnsafeCell::into_inner).collect(),
            iterations: ledger.iteration,
            termination: ledger.termination,
            max_error: ledger.max_error,
            history: ledger.history,
        }
    }
}

impl std::fmt::Debug for IterationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IterationState")
            .field("order", &self.order())
            .finish_non_exhaustive()
    }
}
