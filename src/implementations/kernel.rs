//! 逐次版・並列版で共有する Jacobi 更新。
//!
//! 前ラウンドのベクトルはパーティションごとのセグメント列 `&[Vec<f64>]` で受け取る。
//! 逐次版はセグメント 1 本、並列版はワーカー数ぶん。列方向の加算順序は
//! どちらも `j = 0..n` で同じなので、結果はビット単位で一致する。

use crate::config::InitialGuess;
use crate::error::{Result, SolverError};
use crate::implementations::partition::Partition;
use crate::system::LinearSystem;

/// 1 ラウンド後の判定。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Step {
    Converged,
    Exhausted,
    Continue,
}

/// `iteration` は 1 始まりの完了ラウンド数。
pub(crate) fn judge(delta: f64, tolerance: f64, iteration: usize, max_iterations: usize) -> Step {
    if delta < tolerance {
        Step::Converged
    } else if iteration >= max_iterations {
        Step::Exhausted
    } else {
        Step::Continue
    }
}

/// 初期ベクトルを作る。`Diagonal` ではゼロ対角をここで検出する。
pub(crate) fn initial_estimate(system: &LinearSystem, guess: &InitialGuess) -> Result<Vec<f64>> {
    let n = system.size();
    match guess {
        InitialGuess::Zero => Ok(vec![0.0; n]),
        InitialGuess::Given(x0) => {
            if x0.len() != n {
                return Err(SolverError::InvalidDimensions(format!(
                    "initial guess has length {}, expected {n}",
                    x0.len()
                )));
            }
            Ok(x0.clone())
        }
        InitialGuess::Diagonal => system
            .rhs()
            .iter()
            .enumerate()
            .map(|(i, &b)| {
                let diag = system.diagonal(i);
                if diag == 0.0 {
                    Err(SolverError::DivisionByZero { row: i })
                } else {
                    Ok(b / diag)
                }
            })
            .collect(),
    }
}

/// `rows` の各行を前ラウンドの値から更新し `out` に書き出す。
///
/// 戻り値はこの範囲での `max |x_new[i] - x_old[i]|`。
/// NaN が出た場合は発散とみなして `INFINITY` を返す。
pub(crate) fn relax_rows(
    system: &LinearSystem,
    previous: &[Vec<f64>],
    rows: Partition,
    out: &mut Vec<f64>,
) -> Result<f64> {
    out.clear();
    out.reserve(rows.len());

    let b = system.rhs();
    let mut delta: f64 = 0.0;

    for i in rows.rows() {
        let diag = system.diagonal(i);
        if diag == 0.0 {
            return Err(SolverError::DivisionByZero { row: i });
        }

        let row = system.row(i);
        let mut sigma = 0.0;
        let mut old = 0.0;
        let mut j = 0;
        for segment in previous {
            for &x in segment {
                if j == i {
                    old = x;
                } else {
                    sigma += row[j] * x;
                }
                j += 1;
            }
        }

        let next = (b[i] - sigma) / diag;
        let diff = (next - old).abs();
        if diff.is_nan() {
            delta = f64::INFINITY;
        } else if diff > delta {
            delta = diff;
        }
        out.push(next);
    }

    Ok(delta)
}
