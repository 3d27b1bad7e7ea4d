use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{bail, Context};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use jacobi_solver::generate::{diagonally_dominant_system, reference_system};
use jacobi_solver::report::{self, BenchRecord, ReportPaths};
use jacobi_solver::{
    JacobiSolver, ParallelSolver, SequentialSolver, SolverConfig, SolverError,
    DEFAULT_MAX_ITERATIONS,
};

const DEFAULT_SIZES: &[usize] = &[
    5, 10, 50, 100, 200, 500, 800, 1000, 1500, 2000, 2500, 3500, 5000,
];

/// Jacobi 法ベンチマーク：逐次版とバリア並列版の実行時間を比較する
#[derive(Parser, Debug)]
#[command(name = "jacobi-bench", version, about, long_about = None)]
struct Args {
    /// ワーカースレッド数（省略時は CPU 数）
    #[arg(short, long)]
    threads: Option<usize>,

    /// 収束判定の許容誤差 E
    #[arg(short = 'e', long, default_value_t = 0.01)]
    tolerance: f64,

    /// 反復回数の上限
    #[arg(long, default_value_t = DEFAULT_MAX_ITERATIONS)]
    max_iterations: usize,

    /// 行列サイズ（カンマ区切り）
    #[arg(long, value_delimiter = ',', default_values_t = DEFAULT_SIZES.to_vec())]
    sizes: Vec<usize>,

    /// 各サイズの計測回数（中央値を採用）
    #[arg(long, default_value_t = 3)]
    repeats: usize,

    /// 乱数シード
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// 結果ファイルの出力先
    #[arg(long, default_value = "results")]
    out_dir: PathBuf,

    /// 出力後に gnuplot を実行する
    #[arg(long)]
    plot: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    if args.repeats == 0 {
        bail!("--repeats must be at least 1");
    }

    // Rayonのスレッド数を設定（入力生成とワーカー数の既定値に使う）
    let mut pool = rayon::ThreadPoolBuilder::new();
    if let Some(threads) = args.threads {
        if threads == 0 {
            bail!("--threads must be at least 1");
        }
        pool = pool.num_threads(threads);
    }
    pool.build_global()
        .context("failed to configure the global rayon pool")?;
    let workers = rayon::current_num_threads();

    let config = SolverConfig::default().with_max_iterations(args.max_iterations);

    println!("=== Jacobi法 ベンチマーク ===");
    println!(
        "E: {}, 上限: {}, 測定回数: {}, スレッド数: {}\n",
        args.tolerance, args.max_iterations, args.repeats, workers
    );

    check_reference(workers, &config)?;

    let mut records = Vec::with_capacity(args.sizes.len());
    for &n in &args.sizes {
        let system = diagonally_dominant_system(n, 1.0, 10.0, args.seed ^ n as u64)
            .with_context(|| format!("failed to generate a {n}x{n} system"))?;

        let sequential = SequentialSolver::with_config(&system, config.clone());
        let parallel = ParallelSolver::with_config(&system, workers, config.clone());

        let t1 = run_benchmark(&sequential, args.tolerance, args.repeats)?;
        let t2 = run_benchmark(&parallel, args.tolerance, args.repeats)?;

        let record = BenchRecord {
            n,
            sequential_ms: t1.as_secs_f64() * 1e3,
            parallel_ms: t2.as_secs_f64() * 1e3,
        };
        println!("n = {n}");
        println!("  Single-threaded Jacobi time: {:.4} ms", record.sequential_ms);
        println!("  Multi-threaded Jacobi time:  {:.4} ms", record.parallel_ms);
        println!("  Speedup: {:.3}x", record.speedup());
        println!("  ------------------------------");
        records.push(record);
    }

    write_reports(&args, &records)?;

    println!("\n=== ベンチマーク完了 ===");
    Ok(())
}

/// 15×15 の参照系で両ソルバーの解が一致することを確認する。
fn check_reference(workers: usize, config: &SolverConfig) -> anyhow::Result<()> {
    const E: f64 = 0.000005;
    let system = reference_system()?;

    let single = SequentialSolver::with_config(&system, config.clone()).solve(E)?;
    let multi = ParallelSolver::with_config(&system, workers, config.clone()).solve(E)?;

    let diff = single
        .x
        .iter()
        .zip(&multi.x)
        .map(|(a, b)| (a - b).abs())
        .fold(0.0, f64::max);

    println!("Check out for matrix 15x15 (E = {E}):");
    println!("  x = {}", format_vector(&single.x));
    println!(
        "  iterations: {} (single), {} (multi), max |diff| = {:e}\n",
        single.iterations, multi.iterations, diff
    );
    if diff > E {
        bail!("sequential and parallel solutions differ by {diff}");
    }
    Ok(())
}

fn run_benchmark<S: JacobiSolver>(
    solver: &S,
    tolerance: f64,
    repeats: usize,
) -> anyhow::Result<Duration> {
    // ウォームアップ
    timed_solve(solver, tolerance)?;

    let mut times = Vec::with_capacity(repeats);
    for _ in 0..repeats {
        times.push(timed_solve(solver, tolerance)?);
    }
    times.sort();
    Ok(times[repeats / 2])
}

fn timed_solve<S: JacobiSolver>(solver: &S, tolerance: f64) -> anyhow::Result<Duration> {
    let start = Instant::now();
    let outcome = solver.solve(tolerance);
    let elapsed = start.elapsed();

    match outcome {
        Ok(_) => Ok(elapsed),
        // 上限到達でも時間は計測済みなので記録は続ける
        Err(err @ SolverError::DidNotConverge { .. }) => {
            warn!(solver = solver.name(), %err, "using unconverged run");
            Ok(elapsed)
        }
        Err(err) => Err(err).with_context(|| format!("{} solver failed", solver.name())),
    }
}

fn write_reports(args: &Args, records: &[BenchRecord]) -> anyhow::Result<()> {
    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("failed to create {}", args.out_dir.display()))?;
    let paths = ReportPaths::new(&args.out_dir, args.tolerance);

    report::write_data(&paths.data, args.tolerance, records)
        .with_context(|| format!("failed to write {}", paths.data.display()))?;
    report::write_html(&paths.html, args.tolerance, records)
        .with_context(|| format!("failed to write {}", paths.html.display()))?;
    report::write_gnuplot_script(&paths, args.tolerance)
        .with_context(|| format!("failed to write {}", paths.script.display()))?;
    info!(data = %paths.data.display(), html = %paths.html.display(), "results written");

    if args.plot {
        let status = report::run_gnuplot(&paths.script).context("failed to run gnuplot")?;
        if !status.success() {
            bail!("gnuplot exited with {status}");
        }
        info!(image = %paths.image.display(), "plot generated");
    }
    Ok(())
}

fn format_vector(x: &[f64]) -> String {
    let parts: Vec<String> = x.iter().map(|v| format!("{v:.6}")).collect();
    format!("[{}]", parts.join(", "))
}
