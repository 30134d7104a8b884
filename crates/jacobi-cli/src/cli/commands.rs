//! Command implementations

use anyhow::{bail, Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use tracing::{info, warn};

use jacobi_solver::loader::{load_system, write_system};
use jacobi_solver::report::{render_json, render_text, write_report, ReportOptions};
use jacobi_solver::solver::JacobiSolver;
use jacobi_solver::traits::LinearSolver;
use jacobi_solver::types::{DenseMatrix, LinearSystem};
use jacobi_solver::validation::{MAX_ORDER, MAX_WORKERS};

use crate::cli::format::{format_status, format_success, format_warning};
use crate::config::{Config, OutputFormat};

/// Arguments of `jacobi solve`
#[derive(Debug, Clone)]
pub struct SolveArgs {
    pub matrix_file: PathBuf,
    pub output: Option<PathBuf>,
    pub threads: Option<usize>,
    pub format: Option<OutputFormat>,
    pub show_solution: bool,
    pub show_history: bool,
}

/// Arguments of `jacobi generate`
#[derive(Debug, Clone)]
pub struct GenerateArgs {
    pub order: usize,
    pub output: Option<PathBuf>,
    pub seed: Option<u64>,
    pub test_row: usize,
    pub tolerance: f64,
    pub max_iterations: usize,
}

/// Load a problem file, solve it and write the report
pub fn solve_problem(args: &SolveArgs, config: &Config) -> Result<()> {
    // Load single-threaded first; the worker count can only be checked
    // against the order once the header has been read.
    let system = load_system(&args.matrix_file, 1)
        .with_context(|| format!("Failed to load {}", args.matrix_file.display()))?;

    let requested = config.resolve_threads(args.threads);
    if requested == 0 {
        bail!("threads must be > 0");
    }
    let order = system.order();
    let threads = clamp_threads(requested, order);
    if threads != requested {
        warn!(requested, order, threads, "clamping thread count");
        eprintln!(
            "{}",
            format_warning(&format!(
                "{requested} threads requested for {order} rows; using {threads}"
            ))
        );
    }
    let system = system.with_workers(threads)?;

    info!(order, threads, "solving {}", args.matrix_file.display());
    let outcome = JacobiSolver::new()
        .solve(system)
        .context("Solver failed")?;

    let options = ReportOptions {
        show_solution: args.show_solution || config.show_solution,
        show_history: args.show_history || config.show_history,
        precision: config.precision,
    };
    let format = args.format.unwrap_or(config.format);
    let rendered = match format {
        OutputFormat::Text => render_text(&outcome, &options),
        OutputFormat::Json => {
            let mut json = render_json(&outcome, &options)?;
            json.push('\n');
            json
        }
    };

    write_report(&rendered, args.output.as_deref()).context("Failed to write report")?;

    eprintln!("{}", format_status(&outcome));
    if let Some(path) = &args.output {
        eprintln!(
            "{}",
            format_success(&format!("Report written to {}", path.display()))
        );
    }
    Ok(())
}

/// Largest usable worker count: one row per worker at most, and no more
/// than the solver's thread limit.
pub fn clamp_threads(requested: usize, order: usize) -> usize {
    requested.min(order).min(MAX_WORKERS)
}

/// Build a random strictly diagonally dominant system whose exact solution
/// is the all-ones vector.
pub fn random_system(args: &GenerateArgs) -> Result<LinearSystem> {
    if args.order == 0 || args.order > MAX_ORDER {
        bail!("order must be in [1, {MAX_ORDER}], got {}", args.order);
    }
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let n = args.order;
    let mut matrix = DenseMatrix::zeros(n);
    for i in 0..n {
        let mut off_diagonal = 0.0;
        for j in 0..n {
            if i != j {
                let v: f64 = rng.gen_range(-1.0..1.0);
                matrix.set(i, j, v);
                off_diagonal += v.abs();
            }
        }
        matrix.set(i, i, off_diagonal + rng.gen_range(1.0..2.0));
    }

    let mut rhs = vec![0.0; n];
    matrix.matvec(&vec![1.0; n], &mut rhs);

    Ok(LinearSystem::new(
        matrix,
        rhs,
        args.test_row,
        args.tolerance,
        args.max_iterations,
        1,
    )?)
}

/// Write a random problem file
pub fn generate_problem(args: &GenerateArgs) -> Result<()> {
    let system = random_system(args)?;
    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            write_system(&system, BufWriter::new(file))?;
            eprintln!(
                "{}",
                format_success(&format!(
                    "Wrote order-{} problem to {}",
                    system.order(),
                    path.display()
                ))
            );
        }
        None => write_system(&system, io::stdout().lock())?,
    }
    Ok(())
}
