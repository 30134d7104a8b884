//! Benchmarks for the parallel Jacobi-Richardson solver.
//!
//! Measures how a fixed problem scales with the worker count, how a fixed
//! worker count scales with the matrix order, and where the barrier overhead
//! stops paying off against a single-threaded sweep of the same iteration.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use jacobi_solver::partition::partition;
use jacobi_solver::precondition::{normalize, NormalizedSystem};
use jacobi_solver::solver::solve;
use jacobi_solver::state::component_error;
use jacobi_solver::types::{dot, DenseMatrix, LinearSystem};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Strictly diagonally dominant dense matrix: each diagonal entry is the sum
/// of absolute off-diagonal values in its row plus 1.0.
fn diag_dominant_dense(n: usize, seed: u64) -> DenseMatrix {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut m = DenseMatrix::zeros(n);
    for i in 0..n {
        let mut off = 0.0;
        for j in 0..n {
            if i != j {
                let v: f64 = rng.gen_range(-0.3..0.3);
                m.set(i, j, v);
                off += v.abs();
            }
        }
        m.set(i, i, off + 1.0);
    }
    m
}

/// Random vector with deterministic seed.
fn random_vector(n: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n).map(|_| rng.gen_range(-1.0..1.0)).collect()
}

fn normalized(n: usize, tolerance: f64, max_iterations: usize) -> NormalizedSystem {
    let system = LinearSystem::new(
        diag_dominant_dense(n, 42),
        random_vector(n, 43),
        0,
        tolerance,
        max_iterations,
        1,
    )
    .expect("benchmark system is valid");
    normalize(system).expect("benchmark system has a non-zero diagonal")
}

/// Single-threaded sweep of the same iteration, without barriers.
#[inline(never)]
fn sequential_jacobi(system: &NormalizedSystem) -> (Vec<f64>, usize) {
    let n = system.order();
    let mut current = vec![0.0f64; n];
    let mut next = vec![0.0f64; n];

    for k in 1..=system.max_iterations() {
        let mut max_error = 0.0f64;
        for i in 0..n {
            next[i] = -dot(system.matrix().row(i), &current) + system.rhs()[i];
            max_error = max_error.max(component_error(next[i], current[i]));
        }
        std::mem::swap(&mut current, &mut next);
        if max_error <= system.tolerance() {
            return (current, k);
        }
    }
    (current, system.max_iterations())
}

// ---------------------------------------------------------------------------
// Benchmark: scaling with worker count
// ---------------------------------------------------------------------------

fn jacobi_workers(c: &mut Criterion) {
    let mut group = c.benchmark_group("jacobi_workers");
    group.warm_up_time(Duration::from_secs(3));
    group.sample_size(30);

    let n = 512;
    let system = normalized(n, 1e-8, 1_000);
    let max_workers = std::thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(4);

    for workers in [1usize, 2, 4, 8, 16] {
        if workers > max_workers {
            break;
        }
        let rows = partition(n, workers).expect("workers <= order");
        group.bench_with_input(BenchmarkId::new("workers", workers), &workers, |b, &w| {
            b.iter(|| solve(criterion::black_box(&system), &rows, w));
        });
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// Benchmark: scaling with problem size
// ---------------------------------------------------------------------------

fn jacobi_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("jacobi_scaling");
    group.warm_up_time(Duration::from_secs(3));

    let workers = 4;
    for &n in &[64usize, 256, 1024, 2048] {
        let system = normalized(n, 1e-6, 1_000);
        let rows = partition(n, workers).expect("workers <= order");

        group.sample_size(if n >= 1024 { 20 } else { 50 });
        group.throughput(Throughput::Elements((n * n) as u64));

        group.bench_with_input(BenchmarkId::new("n", n), &n, |b, _| {
            b.iter(|| solve(criterion::black_box(&system), &rows, workers));
        });
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// Benchmark: parallel vs sequential crossover
// ---------------------------------------------------------------------------

fn jacobi_vs_sequential(c: &mut Criterion) {
    let mut group = c.benchmark_group("jacobi_vs_sequential");
    group.warm_up_time(Duration::from_secs(3));
    group.sample_size(20);

    let workers = 4;
    for &n in &[32usize, 128, 512, 1024] {
        let system = normalized(n, 1e-8, 1_000);
        let rows = partition(n, workers).expect("workers <= order");

        group.bench_with_input(BenchmarkId::new("parallel", n), &n, |b, _| {
            b.iter(|| solve(criterion::black_box(&system), &rows, workers));
        });
        group.bench_with_input(BenchmarkId::new("sequential", n), &n, |b, _| {
            b.iter(|| sequential_jacobi(criterion::black_box(&system)));
        });
    }
    group.finish();
}

criterion_group!(jacobi, jacobi_workers, jacobi_scaling, jacobi_vs_sequential);
criterion_main!(jacobi);
