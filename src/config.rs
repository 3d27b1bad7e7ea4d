use crate::error::{Result, SolverError};

/// 反復回数の上限（既定値）
pub const DEFAULT_MAX_ITERATIONS: usize = 10_000;

/// 反復の初期ベクトル。
#[derive(Clone, Debug, Default, PartialEq)]
pub enum InitialGuess {
    /// `x0[i] = b[i] / a_ii`（ゼロベクトルから 1 ステップ進めた値と同じ）
    #[default]
    Diagonal,
    Zero,
    Given(Vec<f64>),
}

/// 両ソルバー共通の設定。
#[derive(Clone, Debug, PartialEq)]
pub struct SolverConfig {
    pub max_iterations: usize,
    pub initial_guess: InitialGuess,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            initial_guess: InitialGuess::default(),
        }
    }
}

impl SolverConfig {
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_initial_guess(mut self, initial_guess: InitialGuess) -> Self {
        self.initial_guess = initial_guess;
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(SolverError::InvalidConfig {
                name: "max_iterations",
                value: "0".into(),
                expected: ">= 1",
            });
        }
        Ok(())
    }
}

/// 許容誤差 E は非負の有限値（NaN・負値は反復前に弾く）。
pub(crate) fn check_tolerance(tolerance: f64) -> Result<()> {
    if tolerance.is_nan() || tolerance < 0.0 {
        return Err(SolverError::InvalidConfig {
            name: "tolerance",
            value: tolerance.to_string(),
            expected: "a non-negative number",
        });
    }
    Ok(())
}
