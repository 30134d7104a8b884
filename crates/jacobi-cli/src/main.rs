//! Jacobi CLI - parallel Jacobi-Richardson solver for dense linear systems

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod cli;
mod config;

use crate::cli::commands::{generate_problem, solve_problem, GenerateArgs, SolveArgs};
use crate::config::{Config, OutputFormat};

#[derive(Parser)]
#[command(name = "jacobi")]
#[command(about = "Parallel Jacobi-Richardson solver for dense linear systems", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug mode
    #[arg(short, long, global = true)]
    debug: bool,

    /// Disable colors
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve the system described by a problem file
    Solve {
        /// Problem file: header, matrix rows, right-hand side
        #[arg(value_name = "MATRIX_FILE")]
        matrix_file: PathBuf,

        /// Write the report here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Worker threads (default: available parallelism, capped at the order)
        #[arg(short, long)]
        threads: Option<usize>,

        /// Report format
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Print the full solution vector
        #[arg(long)]
        show_solution: bool,

        /// Include per-iteration history (JSON only)
        #[arg(long)]
        show_history: bool,
    },

    /// Write a random strictly diagonally dominant problem file
    Generate {
        /// Matrix order
        #[arg(short = 'n', long)]
        order: usize,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// RNG seed for reproducible problems
        #[arg(short, long)]
        seed: Option<u64>,

        /// Row used for the verification check
        #[arg(long, default_value = "0")]
        test_row: usize,

        /// Convergence tolerance
        #[arg(long, default_value = "1e-6")]
        tolerance: f64,

        /// Iteration limit
        #[arg(short = 'm', long, default_value = "1000")]
        max_iterations: usize,
    },
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("jacobi=debug,jacobi_solver=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_tracing(cli.debug);

    // Disable colors if requested
    if cli.no_color {
        colored::control::set_override(false);
    }

    // Execute command
    let result = Config::load(cli.config).and_then(|config| match cli.command {
        Commands::Solve {
            matrix_file,
            output,
            threads,
            format,
            show_solution,
            show_history,
        } => solve_problem(
            &SolveArgs {
                matrix_file,
                output,
                threads,
                format,
                show_solution,
                show_history,
            },
            &config,
        ),
        Commands::Generate {
            order,
            output,
            seed,
            test_row,
            tolerance,
            max_iterations,
        } => generate_problem(&GenerateArgs {
            order,
            output,
            seed,
            test_row,
            tolerance,
            max_iterations,
        }),
    });

    // Handle errors
    if let Err(e) = result {
        eprintln!("{}", cli::format::format_error(&format!("{e:#}")));
        if cli.debug {
            eprintln!("\n{:#?}", e);
        } else {
            eprintln!("\n{}", "Run with --debug for more details".dimmed());
        }
        std::process::exit(1);
    }

    Ok(())
}
