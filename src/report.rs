//! ベンチマーク結果の出力（.dat / HTML / gnuplot スクリプト）。

use std::fmt::Write as _;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

/// 1 サイズ分の計測結果（ミリ秒）。
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BenchRecord {
    pub n: usize,
    pub sequential_ms: f64,
    pub parallel_ms: f64,
}

impl BenchRecord {
    /// 逐次 / 並列。1 より大きければ並列版が速い
    pub fn speedup(&self) -> f64 {
        self.sequential_ms / self.parallel_ms
    }
}

/// 出力ファイル一式のパス。ファイル名には許容誤差を小数 4 桁で埋め込む。
#[derive(Clone, Debug)]
pub struct ReportPaths {
    pub data: PathBuf,
    pub html: PathBuf,
    pub script: PathBuf,
    pub image: PathBuf,
}

impl ReportPaths {
    pub fn new(dir: &Path, tolerance: f64) -> Self {
        ReportPaths {
            data: dir.join(format!("jacobi_results_E={tolerance:.4}.dat")),
            html: dir.join(format!("jacobi_table_E={tolerance:.4}.html")),
            script: dir.join("plot.gp"),
            image: dir.join(format!("jacobi_plot_E={tolerance:.4}.png")),
        }
    }
}

/// タブ区切りの .dat ファイルを書く。
pub fn write_data(path: &Path, tolerance: f64, records: &[BenchRecord]) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    writeln!(out, "maximum error = {tolerance}")?;
    writeln!(out, "# n\tSingleThreaded\tMultiThreaded\tTimeDifference")?;
    for r in records {
        writeln!(
            out,
            "{}\t{}\t{}\t{}",
            r.n,
            r.sequential_ms,
            r.parallel_ms,
            r.speedup()
        )?;
    }
    out.flush()
}

pub fn render_html(tolerance: f64, records: &[BenchRecord]) -> String {
    let mut html = String::new();
    html.push_str("<table border=\"1\">\n");
    let _ = writeln!(html, "<h3>maximum error = {tolerance}</h3>");
    html.push_str(
        "<tr><th>n</th><th>SingleThreaded</th><th>MultiThreaded</th><th>TimeDifference</th></tr>\n",
    );
    for r in records {
        let _ = writeln!(
            html,
            "<tr><td>{}</td><td>{:.4}</td><td>{:.4}</td><td>{:.4}</td></tr>",
            r.n,
            r.sequential_ms,
            r.parallel_ms,
            r.speedup()
        );
    }
    html.push_str("</table>\n");
    html
}

pub fn write_html(path: &Path, tolerance: f64, records: &[BenchRecord]) -> io::Result<()> {
    fs::write(path, render_html(tolerance, records))
}

/// 両方の実行時間を折れ線で描く gnuplot スクリプト。
pub fn gnuplot_script(paths: &ReportPaths, tolerance: f64) -> String {
    let data = paths.data.display();
    let mut script = String::new();
    script.push_str("set terminal pngcairo size 800,600\n");
    let _ = writeln!(script, "set output '{}'", paths.image.display());
    let _ = writeln!(script, "set title 'Jacobi Method Execution Time (E={tolerance})'");
    script.push_str("set xlabel 'Matrix size (n)'\n");
    script.push_str("set ylabel 'Execution time (ms)'\n");
    script.push_str("set grid\n");
    script.push_str("set key left top\n");
    let _ = writeln!(
        script,
        "plot '{data}' using 1:2 with linespoints title 'Single-threaded', \\"
    );
    let _ = writeln!(
        script,
        "     '{data}' using 1:3 with linespoints title 'Multi-threaded'"
    );
    script
}

pub fn write_gnuplot_script(paths: &ReportPaths, tolerance: f64) -> io::Result<()> {
    fs::write(&paths.script, gnuplot_script(paths, tolerance))
}

/// 外部の `gnuplot` を起動する（PATH に無ければ io::Error）。
pub fn run_gnuplot(script: &Path) -> io::Result<ExitStatus> {
    Command::new("gnuplot").arg(script).status()
}
