//! Rendering of solve outcomes.
//!
//! The solver core never formats anything; this module turns a
//! [`SolveOutcome`] into either a plain-text summary or a JSON document
//! ([`SolveReport`]) and writes it to a file or stdout.

use std::fmt::Write as _;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::types::{ConvergenceInfo, SolveOutcome, Termination, Verification};

/// Knobs for [`render_text`] and [`SolveReport::from_outcome`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    /// Include the full solution vector.
    pub show_solution: bool,
    /// Include the per-round convergence history (JSON only).
    pub show_history: bool,
    /// Decimal places for values in the text report.
    pub precision: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            show_solution: false,
            show_history: false,
            precision: 6,
        }
    }
}

/// Serializable summary of one solve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveReport {
    /// Matrix order.
    pub order: usize,
    /// Worker threads used.
    pub workers: usize,
    /// Completed iterations.
    pub iterations: usize,
    /// Why the run stopped.
    pub termination: Termination,
    /// Maximum per-row error of the last round.
    #[serde(deserialize_with = "crate::types::null_as_infinity")]
    pub max_error: f64,
    /// Wall time of the parallel phase in milliseconds.
    pub wall_time_ms: f64,
    /// Verification row comparison.
    pub verification: Verification,
    /// Final iterate, if requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solution: Option<Vec<f64>>,
    /// Per-round history, if requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history: Option<Vec<ConvergenceInfo>>,
}

impl SolveReport {
    /// Build a report from an outcome.
    pub fn from_outcome(outcome: &SolveOutcome, options: &ReportOptions) -> Self {
        Self {
            order: outcome.solution.len(),
            workers: outcome.workers,
            iterations: outcome.iterations,
            termination: outcome.termination,
            max_error: outcome.max_error,
            wall_time_ms: outcome.wall_time.as_secs_f64() * 1e3,
            verification: outcome.verification,
            solution: options.show_solution.then(|| outcome.solution.clone()),
            history: options
                .show_history
                .then(|| outcome.convergence_history.clone()),
        }
    }
}

/// Plain-text report.
///
/// ```text
/// Iterations: 17
/// Termination: converged
/// Max error: 7.1e-7
/// Workers: 2
/// Elapsed: 0.412 ms
/// RowTest: 2 => [6.999998] =? [7.000000]
/// ```
pub fn render_text(outcome: &SolveOutcome, options: &ReportOptions) -> String {
    let p = options.precision;
    let v = &outcome.verification;
    let mut out = String::new();

    // Writing to a String cannot fail.
    let _ = writeln!(out, "Iterations: {}", outcome.iterations);
    let _ = writeln!(out, "Termination: {}", outcome.termination);
    let _ = writeln!(out, "Max error: {:.1e}", outcome.max_error);
    let _ = writeln!(out, "Workers: {}", outcome.workers);
    let _ = writeln!(
        out,
        "Elapsed: {:.3} ms",
        outcome.wall_time.as_secs_f64() * 1e3
    );
    let _ = writeln!(
        out,
        "RowTest: {} => [{:.p$}] =? [{:.p$}]",
        v.row, v.computed, v.expected
    );

    if options.show_solution {
        let _ = writeln!(out, "Solution:");
        for (i, x) in outcome.solution.iter().enumerate() {
            let _ = writeln!(out, "  x[{i}] = {x:.p$}");
        }
    }

    out
}

/// Pretty-printed JSON report.
///
/// # Errors
///
/// Returns the `serde_json` error if serialization fails.
///
/// Non-finite floats are written as `null`. [`SolveReport`] reads a `null`
/// max error back as `+inf` and a `null` computed verification value back as
/// NaN, so reports of diverged runs still deserialize.
pub fn render_json(
    outcome: &SolveOutcome,
    options: &ReportOptions,
) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&SolveReport::from_outcome(outcome, options))
}

/// Write a rendered report to `path`, or to stdout when `path` is `None`.
pub fn write_report(rendered: &str, path: Option<&Path>) -> io::Result<()> {
    match path {
        Some(path) => fs::write(path, rendered),
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            lock.write_all(rendered.as_bytes())?;
            lock.flush()
        }
    }
}
