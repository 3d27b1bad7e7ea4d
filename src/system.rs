use crate::error::{Result, SolverError};

/// 連立一次方程式 `A·x = b`。
///
/// `A` は n×n を行優先で 1 本の `Vec<f64>` に格納する（`row(i)` で行スライスを取る）。
/// 構築後は読み取り専用。対角優位性は検査しない。
#[derive(Clone, Debug, PartialEq)]
pub struct LinearSystem {
    n: usize,
    a: Vec<f64>,
    b: Vec<f64>,
}

impl LinearSystem {
    /// 行優先のフラットな係数列から構築する。
    pub fn new(n: usize, a: Vec<f64>, b: Vec<f64>) -> Result<Self> {
        if n == 0 {
            return Err(SolverError::InvalidDimensions(
                "system must have at least one equation".into(),
            ));
        }
        if a.len() != n * n {
            return Err(SolverError::InvalidDimensions(format!(
                "matrix has {} coefficients, expected {n}x{n} = {}",
                a.len(),
                n * n
            )));
        }
        if b.len() != n {
            return Err(SolverError::InvalidDimensions(format!(
                "right-hand side has length {}, expected {n}",
                b.len()
            )));
        }
        Ok(Self { n, a, b })
    }

    /// 行ごとのネストした `Vec` から構築する。
    pub fn from_rows(rows: Vec<Vec<f64>>, b: Vec<f64>) -> Result<Self> {
        let n = rows.len();
        let mut a = Vec::with_capacity(n * n);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != n {
                return Err(SolverError::InvalidDimensions(format!(
                    "row {i} has {} columns, matrix is not square ({n} rows)",
                    row.len()
                )));
            }
            a.extend(row);
        }
        Self::new(n, a, b)
    }

    pub fn size(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn row(&self, i: usize) -> &[f64] {
        &self.a[i * self.n..(i + 1) * self.n]
    }

    #[inline]
    pub fn diagonal(&self, i: usize) -> f64 {
        self.a[i * self.n + i]
    }

    pub fn rhs(&self) -> &[f64] {
        &self.b
    }

    /// 全行で `|a_ii| > Σ_{j≠i} |a_ij|` が成り立つか。
    pub fn is_diagonally_dominant(&self) -> bool {
        (0..self.n).all(|i| {
            let off: f64 = self
                .row(i)
                .iter()
                .enumerate()
                .filter(|&(j, _)| j != i)
                .map(|(_, v)| v.abs())
                .sum();
            self.diagonal(i).abs() > off
        })
    }

    /// `‖A·x − b‖_∞`。
    pub fn residual_norm(&self, x: &[f64]) -> Result<f64> {
        if x.len() != self.n {
            return Err(SolverError::InvalidDimensions(format!(
                "vector has length {}, expected {}",
                x.len(),
                self.n
            )));
        }
        Ok((0..self.n)
            .map(|i| {
                let ax: f64 = self.row(i).iter().zip(x).map(|(a, x)| a * x).sum();
                (ax - self.b[i]).abs()
            })
            .fold(0.0, f64::max))
    }

    // 拡大係数行列を表示
    pub fn print(&self) {
        for i in 0..self.n {
            for v in self.row(i) {
                print!("{:8.2} ", v);
            }
            println!("| {:8.2}", self.b[i]);
        }
    }
}
