//! Jacobi ソルバーの実装。
//!
//! - [`single::SequentialSolver`]: 1 スレッドの参照実装
//! - [`barrier::ParallelSolver`]: 行分割 + ラウンドごとのバリア同期

pub mod barrier;
pub(crate) mod kernel;
pub mod partition;
pub mod single;

use crate::error::Result;

/// 収束した解。
#[derive(Clone, Debug, PartialEq)]
pub struct Solution {
    pub x: Vec<f64>,
    /// 完了したラウンド数（初期ベクトルの構築は数えない）
    pub iterations: usize,
    /// 最終ラウンドの無限ノルム差分（`< tolerance`）
    pub delta: f64,
}

/// 両ソルバー共通の入口。呼び出しは収束か反復上限まで戻らない。
pub trait JacobiSolver {
    fn solve(&self, tolerance: f64) -> Result<Solution>;

    /// ログ・レポート用の表示名
    fn name(&self) -> &'static str;
}
