//! ソルバーのエラー型。
//!
//! 次元・設定・ピボットのエラーは反復前または即時に返す。
//! 反復上限に達した場合は `DidNotConverge` に最後の推定値を載せて返す。

/// 逐次版・並列版で共通のエラー。
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SolverError {
    /// 対角成分がゼロ。解は信頼できないので推定値は返さない。
    #[error("zero pivot on the diagonal at row {row}")]
    DivisionByZero {
        /// ゼロ対角を持つ行。
        row: usize,
    },

    /// 反復上限に到達した。`estimate` は最後に計算したベクトル。
    #[error(
        "did not converge after {iterations} iterations (delta={delta:.3e}, tol={tolerance:.3e})"
    )]
    DidNotConverge {
        iterations: usize,
        /// 最終ラウンドの無限ノルム差分。
        delta: f64,
        tolerance: f64,
        estimate: Vec<f64>,
    },

    /// 非正方行列、長さ不一致、空の系など。
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// パラメータが範囲外（負の許容誤差、ワーカー数 0 など）。
    #[error("invalid config: {name} = {value} (expected {expected})")]
    InvalidConfig {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
}

impl SolverError {
    /// 収束しなかった場合の最善推定値。
    pub fn estimate(&self) -> Option<&[f64]> {
        match self {
            SolverError::DidNotConverge { estimate, .. } => Some(estimate),
            _ => None,
        }
    }

    /// 反復上限による失敗かどうか（推定値は利用可能）。
    pub fn is_soft(&self) -> bool {
        matches!(self, SolverError::DidNotConverge { .. })
    }
}

pub type Result<T> = std::result::Result<T, SolverError>;
