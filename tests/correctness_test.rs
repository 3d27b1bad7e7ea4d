use approx::assert_abs_diff_eq;

use jacobi_solver::generate::{diagonally_dominant_system, reference_system};
use jacobi_solver::{JacobiSolver, LinearSystem, ParallelSolver, SequentialSolver};

const E: f64 = 0.000005;

/// 2つの解ベクトルの全要素が `epsilon` 以内で一致するかチェック
fn vectors_are_close(x1: &[f64], x2: &[f64], epsilon: f64) -> bool {
    if x1.len() != x2.len() {
        return false;
    }

    for i in 0..x1.len() {
        let diff = (x1[i] - x2[i]).abs();
        if diff > epsilon {
            eprintln!("Mismatch at index {}: {} vs {} (diff: {})", i, x1[i], x2[i], diff);
            return false;
        }
    }

    true
}

fn round4(v: f64) -> f64 {
    (v * 1e4).round() / 1e4
}

#[test]
fn test_reference_15x15_single_vs_barrier() {
    let system = reference_system().unwrap();

    let single = SequentialSolver::new(&system).solve(E).unwrap();
    let multi = ParallelSolver::new(&system, 4).solve(E).unwrap();

    // 小数第4位まで一致
    let a: Vec<f64> = single.x.iter().copied().map(round4).collect();
    let b: Vec<f64> = multi.x.iter().copied().map(round4).collect();
    assert_eq!(a, b);

    assert!(single.delta < E);
    assert!(system.residual_norm(&single.x).unwrap() < 1e-3);

    println!("✓ 15x15 reference: Results match to 4 decimals!");
}

#[test]
fn test_reference_15x15_every_worker_count() {
    let system = reference_system().unwrap();
    let single = SequentialSolver::new(&system).solve(E).unwrap();

    for workers in 1..=system.size() {
        let multi = ParallelSolver::new(&system, workers).solve(E).unwrap();
        assert!(
            vectors_are_close(&single.x, &multi.x, 2.0 * E),
            "Single-thread and Barrier ({workers} workers) produce different results"
        );
    }

    println!("✓ 15x15 reference: workers 1..=15 match!");
}

#[test]
fn test_generated_system_single_vs_barrier() {
    let system = diagonally_dominant_system(120, 1.0, 10.0, 2024).unwrap();
    let single = SequentialSolver::new(&system).solve(1e-8).unwrap();

    for workers in [1, 2, 3, 7, 16] {
        let multi = ParallelSolver::new(&system, workers).solve(1e-8).unwrap();
        // 加算順序が同じなのでビット単位で一致する
        assert_eq!(single.x, multi.x, "workers = {workers}");
        assert_eq!(single.iterations, multi.iterations);
    }

    assert!(system.residual_norm(&single.x).unwrap() < 1e-4);
    println!("✓ Generated 120x120: Single vs Barrier match!");
}

#[test]
fn test_identity_converges_in_one_iteration() {
    let b = vec![3.0, 5.0, 21.0, 8.0, 3.0, 15.0, 45.0];
    let n = b.len();
    let mut a = vec![0.0; n * n];
    for i in 0..n {
        a[i * n + i] = 1.0;
    }
    let system = LinearSystem::new(n, a, b.clone()).unwrap();

    for tolerance in [1.0, 1e-3, 1e-12] {
        let single = SequentialSolver::new(&system).solve(tolerance).unwrap();
        assert_eq!(single.x, b);
        assert_eq!(single.iterations, 1);

        let multi = ParallelSolver::new(&system, 3).solve(tolerance).unwrap();
        assert_eq!(multi.x, b);
        assert_eq!(multi.iterations, 1);
    }

    println!("✓ Identity: x == b after one iteration!");
}

#[test]
fn test_idempotent_fresh_solvers() {
    let system = diagonally_dominant_system(60, 1.0, 10.0, 11).unwrap();

    let first = SequentialSolver::new(&system).solve(1e-7).unwrap();
    let second = SequentialSolver::new(&system).solve(1e-7).unwrap();
    assert_eq!(first, second);

    let first = ParallelSolver::new(&system, 5).solve(1e-7).unwrap();
    let second = ParallelSolver::new(&system, 5).solve(1e-7).unwrap();
    assert_eq!(first, second);

    println!("✓ Idempotence: repeated solves are identical!");
}

#[test]
fn test_same_solver_instance_can_solve_twice() {
    let system = reference_system().unwrap();
    let solver = ParallelSolver::new(&system, 3);

    let coarse = solver.solve(1e-2).unwrap();
    let fine = solver.solve(E).unwrap();
    assert!(fine.iterations >= coarse.iterations);
    for (c, f) in coarse.x.iter().zip(&fine.x) {
        assert_abs_diff_eq!(*c, *f, epsilon = 1e-1);
    }
}

#[test]
fn test_more_workers_than_rows() {
    let system = diagonally_dominant_system(5, 1.0, 10.0, 3).unwrap();
    let single = SequentialSolver::new(&system).solve(1e-9).unwrap();
    let multi = ParallelSolver::new(&system, 12).solve(1e-9).unwrap();

    assert_eq!(single.x, multi.x);
    println!("✓ 12 workers on 5 rows: no crash, results match!");
}
