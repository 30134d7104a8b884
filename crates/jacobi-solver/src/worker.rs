//! Per-thread compute loop.
//!
//! Every worker runs the same lock-step round:
//!
//! ```text
//! compute own rows ──► barrier A ──► leader: coordinate ──► barrier B ──► done? ──┐
//!        ▲                                                                         │
//!        └─────────────────────────────── no ◄────────────────────────────────────┘
//! ```
//!
//! The leader is whichever thread [`std::sync::Barrier::wait`] reports via
//! [`BarrierWaitResult::is_leader`](std::sync::BarrierWaitResult::is_leader);
//! exactly one per generation. Termination is decided by the leader before
//! barrier B, so all workers see it in the same round and exit together.

use std::sync::{Barrier, Condvar, Mutex};

use tracing::trace;

use crate::partition::RowRange;
use crate::precondition::NormalizedSystem;
use crate::state::IterationState;

/// One-shot gate holding spawned workers until the whole pool exists.
///
/// If a spawn fails part-way, the workers already started would otherwise
/// wait forever on a barrier sized for the full pool. They wait here instead
/// and are released with `proceed = false`.
#[derive(Debug, Default)]
pub(crate) struct StartGate {
    decision: Mutex<Option<bool>>,
    cvar: Condvar,
}

impl StartGate {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Release every waiter. `proceed = false` makes them exit without
    /// iterating.
    pub(crate) fn open(&self, proceed: bool) {
        let mut decision = self
            .decision
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *decision = Some(proceed);
        self.cvar.notify_all();
    }

    /// Block until [`open`](Self::open) is called; returns its decision.
    pub(crate) fn wait(&self) -> bool {
        let mut decision = self
            .decision
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        loop {
            if let Some(proceed) = *decision {
                return proceed;
            }
            decision = self
                .cvar
                .wait(decision)
                .unwrap_or_else(|poisoned| poisoned.into_inner());
        }
    }
}

/// Per-worker counters returned when the loop exits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct WorkerStats {
    /// Rounds this worker took part in.
    pub rounds: usize,
    /// Rounds in which this worker was the elected coordinator.
    pub coordinated: usize,
}

/// A worker bound to one row range of a solve.
pub(crate) struct Worker<'a> {
    pub id: usize,
    pub rows: RowRange,
    pub system: &'a NormalizedSystem,
    pub state: &'a IterationState,
    pub barrier: &'a Barrier,
    pub gate: &'a StartGate,
}

impl Worker<'_> {
    /// Run rounds until the coordinator sets a termination.
    ///
    /// All workers sharing `barrier` must run this concurrently with disjoint
    /// `rows`, and the barrier must be sized to exactly that many workers.
    pub(crate) fn run(self) -> WorkerStats {
        let mut stats = WorkerStats::default();
        if !self.gate.wait() {
            trace!(worker = self.id, "start aborted");
            return stats;
        }

        loop {
            // SAFETY: compute phase. Every worker is past the previous
            // barrier B and row ranges are disjoint.
            unsafe { self.state.update_rows(self.rows, self.system) };
            stats.rounds += 1;

            if self.barrier.wait().is_leader() {
                // SAFETY: coordinate phase. This is the only leader of the
                // generation and every other worker is blocked until the
                // barrier below.
                unsafe { self.state.coordinate(self.system) };
                stats.coordinated += 1;
            }

            self.barrier.wait();

            // SAFETY: between barrier B and the next barrier A nobody
            // coordinates.
            let round = unsafe { self.state.round() };
            if round.termination.is_some() {
                trace!(
                    worker = self.id,
                    iteration = round.iteration,
                    coordinated = stats.coordinated,
                    "worker exiting"
                );
                return stats;
            }
        }
    }
}
