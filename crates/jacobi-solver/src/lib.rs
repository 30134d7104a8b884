//! Parallel Jacobi-Richardson solver for dense linear systems.
//!
//! Solves `A x = b` by splitting `A` into its diagonal and off-diagonal parts
//! and iterating `x_{k+1} = -(L* + R*) x_k + b*` on a fixed pool of worker
//! threads until the maximum per-component relative error drops to the
//! tolerance or the iteration cap is reached.
//!
//! # Pipeline
//!
//! | Stage | Module | Operation |
//! |-------|--------|-----------|
//! | Load | [`loader`] | [`parse_system`](loader::parse_system) |
//! | Split | [`precondition`] | [`normalize`](precondition::normalize) |
//! | Partition | [`partition`] | [`partition`](partition::partition()) |
//! | Iterate | [`solver`] | [`solve`](solver::solve) |
//! | Report | [`report`] | [`render_text`](report::render_text) |
//!
//! # Example
//!
//! ```rust
//! use jacobi_solver::partition::partition;
//! use jacobi_solver::precondition::normalize;
//! use jacobi_solver::solver::solve;
//! use jacobi_solver::types::{DenseMatrix, LinearSystem};
//!
//! let a = DenseMatrix::from_rows(vec![
//!     vec![4.0, 1.0, 1.0],
//!     vec![1.0, 3.0, 1.0],
//!     vec![1.0, 1.0, 5.0],
//! ]).unwrap();
//! let system = LinearSystem::new(a, vec![6.0, 5.0, 7.0], 2, 1e-6, 100, 2).unwrap();
//!
//! let normalized = normalize(system).unwrap();
//! let rows = partition(normalized.order(), 2).unwrap();
//! let outcome = solve(&normalized, &rows, 2).unwrap();
//! assert!(outcome.converged());
//! assert!(outcome.solution.iter().all(|x| (x - 1.0).abs() < 1e-5));
//! ```

pub mod error;
pub mod loader;
pub mod partition;
pub mod precondition;
pub mod report;
pub mod solver;
pub mod state;
pub mod traits;
pub mod types;
pub mod validation;

mod worker;
