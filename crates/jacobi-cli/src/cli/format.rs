//! Output formatting utilities

use colored::*;
use jacobi_solver::types::{SolveOutcome, Termination};

/// Format error message
pub fn format_error(msg: &str) -> String {
    format!("{} {}", "Error:".red().bold(), msg)
}

/// Format success message
pub fn format_success(msg: &str) -> String {
    format!("{} {}", "✓".green().bold(), msg)
}

/// Format warning message
pub fn format_warning(msg: &str) -> String {
    format!("{} {}", "Warning:".yellow().bold(), msg)
}

/// One-line status for a finished solve
pub fn format_status(outcome: &SolveOutcome) -> String {
    match outcome.termination {
        Termination::Converged => format_success(&format!(
            "Converged after {} iterations on {} workers",
            outcome.iterations.to_string().cyan(),
            outcome.workers.to_string().cyan()
        )),
        Termination::IterationLimitReached => format_warning(&format!(
            "Stopped at the iteration limit ({}) with max error {:.3e}",
            outcome.iterations.to_string().cyan(),
            outcome.max_error
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jacobi_solver::types::Verification;
    use std::time::Duration;

    fn outcome(termination: Termination) -> SolveOutcome {
        SolveOutcome {
            solution: vec![1.0],
            iterations: 4,
            termination,
            max_error: 2.5e-3,
            wall_time: Duration::from_millis(1),
            convergence_history: Vec::new(),
            workers: 1,
            verification: Verification {
                row: 0,
                expected: 1.0,
                computed: 1.0,
            },
        }
    }

    #[test]
    fn test_status_lines() {
        colored::control::set_override(false);
        assert_eq!(
            format_status(&outcome(Termination::Converged)),
            "✓ Converged after 4 iterations on 1 workers"
        );
        assert_eq!(
            format_status(&outcome(Termination::IterationLimitReached)),
            "Warning: Stopped at the iteration limit (4) with max error 2.500e-3"
        );
        assert_eq!(format_error("boom"), "Error: boom");
    }
}
