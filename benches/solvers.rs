//! Sequential vs. barrier-parallel Jacobi on generated diagonally dominant systems.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::time::Duration;

use jacobi_solver::generate::diagonally_dominant_system;
use jacobi_solver::{JacobiSolver, ParallelSolver, SequentialSolver};

const TOLERANCE: f64 = 1e-4;

fn jacobi_solvers(c: &mut Criterion) {
    let mut group = c.benchmark_group("jacobi");
    group.warm_up_time(Duration::from_millis(500));
    group.measurement_time(Duration::from_secs(3));
    group.sample_size(10);

    let workers = std::thread::available_parallelism().map_or(2, |n| n.get());

    for &n in &[50usize, 200, 500] {
        let system = diagonally_dominant_system(n, 1.0, 10.0, 42).unwrap();
        group.throughput(Throughput::Elements((n * n) as u64));

        group.bench_with_input(BenchmarkId::new("single", n), &system, |b, system| {
            let solver = SequentialSolver::new(system);
            b.iter(|| black_box(solver.solve(TOLERANCE).unwrap()));
        });

        group.bench_with_input(
            BenchmarkId::new(format!("barrier_{workers}"), n),
            &system,
            |b, system| {
                let solver = ParallelSolver::new(system, workers);
                b.iter(|| black_box(solver.solve(TOLERANCE).unwrap()));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, jacobi_solvers);
criterion_main!(benches);
