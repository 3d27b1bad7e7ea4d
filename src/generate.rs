//! ベンチマーク用の入力生成。
//!
//! 行ごとに独立したシードで乱数を引くので、rayon のスレッド数に関係なく
//! 同じシードから同じ系が得られる。

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::error::{Result, SolverError};
use crate::system::LinearSystem;

fn check_range(lo: f64, hi: f64) -> Result<()> {
    if !(lo.is_finite() && hi.is_finite() && lo < hi) {
        return Err(SolverError::InvalidConfig {
            name: "value range",
            value: format!("[{lo}, {hi})"),
            expected: "finite bounds with lo < hi",
        });
    }
    Ok(())
}

#[inline]
fn row_seed(seed: u64, row: usize) -> u64 {
    seed ^ (row as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

/// 狭義対角優位な n×n の系を作る。
///
/// 非対角成分は `[lo, hi)` の一様乱数、対角成分は行の非対角成分の絶対値和に
/// `[lo, hi)` の乱数の絶対値と 1 を足した値。`b` は [`random_vector`] で同じ範囲から引く。
pub fn diagonally_dominant_system(n: usize, lo: f64, hi: f64, seed: u64) -> Result<LinearSystem> {
    check_range(lo, hi)?;
    if n == 0 {
        return Err(SolverError::InvalidDimensions(
            "system must have at least one equation".into(),
        ));
    }

    let mut a = vec![0.0; n * n];
    // 行単位で分割して並列に埋める（各行は別のスレッドが書く）
    a.par_chunks_mut(n).enumerate().for_each(|(i, row)| {
        let mut rng = StdRng::seed_from_u64(row_seed(seed, i));
        let mut off_diagonal = 0.0;
        for (j, v) in row.iter_mut().enumerate() {
            if j != i {
                *v = rng.gen_range(lo..hi);
                off_diagonal += v.abs();
            }
        }
        row[i] = off_diagonal + rng.gen_range(lo..hi).abs() + 1.0;
    });

    let b = random_vector(n, lo, hi, seed.wrapping_add(1))?;
    LinearSystem::new(n, a, b)
}

/// `[lo, hi)` の一様乱数ベクトル。
pub fn random_vector(n: usize, lo: f64, hi: f64, seed: u64) -> Result<Vec<f64>> {
    check_range(lo, hi)?;
    let mut rng = StdRng::seed_from_u64(seed);
    Ok((0..n).map(|_| rng.gen_range(lo..hi)).collect())
}

/// 動作確認用の 15×15 系（対角成分は 50 以上、非対角和との差は 18 以上）。
pub fn reference_system() -> Result<LinearSystem> {
    const A: [[f64; 15]; 15] = [
        [55., 4., 3., 2., 5., 3., 2., 1., 4., 2., 1., 2., 1., 3., 1.],
        [3., 60., 4., 3., 2., 4., 3., 2., 1., 3., 2., 2., 2., 1., 2.],
        [4., 2., 50., 2., 1., 3., 2., 2., 3., 4., 2., 1., 2., 3., 1.],
        [2., 3., 2., 58., 3., 2., 4., 3., 2., 1., 3., 2., 2., 1., 3.],
        [3., 4., 1., 2., 56., 4., 3., 2., 1., 3., 2., 1., 3., 4., 2.],
        [2., 2., 3., 4., 2., 52., 4., 3., 2., 1., 2., 3., 2., 2., 1.],
        [1., 3., 2., 3., 4., 3., 53., 2., 1., 3., 3., 1., 2., 2., 2.],
        [3., 2., 1., 3., 2., 1., 4., 57., 3., 2., 1., 3., 2., 1., 3.],
        [2., 1., 3., 2., 1., 2., 1., 2., 54., 3., 2., 2., 1., 2., 1.],
        [2., 3., 2., 1., 3., 2., 3., 1., 2., 59., 1., 2., 2., 3., 2.],
        [1., 2., 1., 3., 2., 3., 2., 2., 3., 1., 51., 3., 2., 2., 3.],
        [2., 2., 1., 2., 3., 1., 2., 2., 2., 2., 3., 50., 3., 2., 1.],
        [3., 1., 2., 2., 1., 2., 1., 3., 2., 3., 2., 3., 56., 1., 2.],
        [1., 2., 3., 1., 2., 3., 2., 1., 3., 2., 1., 2., 2., 53., 1.],
        [2., 2., 1., 3., 1., 1., 3., 2., 1., 2., 3., 1., 2., 3., 55.],
    ];
    const B: [f64; 15] = [
        3., 5., 21., 8., 3., 15., 45., 12., 7., 91., 11., 24., 54., 11., 15.,
    ];

    LinearSystem::new(15, A.iter().flatten().copied().collect(), B.to_vec())
}
