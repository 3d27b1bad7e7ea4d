use clap::Parser;
use tracing_subscriber::EnvFilter;

use jacobi_solver::generate::reference_system;
use jacobi_solver::{JacobiSolver, ParallelSolver, SequentialSolver, Solution};

/// 15×15 の参照系を両ソルバーで解き、解ベクトルを表示する
#[derive(Parser, Debug)]
struct Args {
    /// 許容誤差 E
    #[arg(short = 'e', long, default_value_t = 0.000005)]
    tolerance: f64,

    /// 並列版のワーカー数
    #[arg(short, long, default_value_t = 4)]
    workers: usize,

    /// 係数行列も表示する
    #[arg(long)]
    show_system: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let system = reference_system()?;

    println!("=== 15x15 参照系の解 ===");
    println!("E: {}, ワーカー数: {}", args.tolerance, args.workers);
    if args.show_system {
        system.print();
    }
    println!();

    let single = SequentialSolver::new(&system).solve(args.tolerance)?;
    let multi = ParallelSolver::new(&system, args.workers).solve(args.tolerance)?;

    print_solution("single", &single);
    print_solution("barrier", &multi);

    let max_diff = single
        .x
        .iter()
        .zip(&multi.x)
        .map(|(a, b)| (a - b).abs())
        .fold(0.0, f64::max);
    println!("max |single - barrier| = {max_diff:e}");
    println!("residual ‖Ax - b‖∞ = {:e}", system.residual_norm(&single.x)?);

    Ok(())
}

fn print_solution(name: &str, solution: &Solution) {
    println!("{name} ({} iterations, delta = {:e}):", solution.iterations, solution.delta);
    for (i, v) in solution.x.iter().enumerate() {
        println!("  x[{i:2}] = {v:.6}");
    }
    println!();
}
