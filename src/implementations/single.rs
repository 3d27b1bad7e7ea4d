use std::mem;

use tracing::{debug, instrument, trace, warn};

use crate::config::{check_tolerance, SolverConfig};
use crate::error::{Result, SolverError};
use crate::implementations::kernel::{initial_estimate, judge, relax_rows, Step};
use crate::implementations::partition::Partition;
use crate::implementations::{JacobiSolver, Solution};
use crate::system::LinearSystem;

/// 1 スレッドの Jacobi 反復（参照実装）。
#[derive(Clone, Debug)]
pub struct SequentialSolver<'a> {
    system: &'a LinearSystem,
    config: SolverConfig,
}

impl<'a> SequentialSolver<'a> {
    pub fn new(system: &'a LinearSystem) -> Self {
        Self::with_config(system, SolverConfig::default())
    }

    pub fn with_config(system: &'a LinearSystem, config: SolverConfig) -> Self {
        SequentialSolver { system, config }
    }
}

impl JacobiSolver for SequentialSolver<'_> {
    #[instrument(skip(self), fields(n = self.system.size()))]
    fn solve(&self, tolerance: f64) -> Result<Solution> {
        check_tolerance(tolerance)?;
        self.config.validate()?;

        let n = self.system.size();
        let all_rows = Partition { lo: 0, hi: n };

        // src: 前ラウンド、dst: 今ラウンド。毎ラウンド入れ替える
        let mut src = vec![initial_estimate(self.system, &self.config.initial_guess)?];
        let mut dst = vec![Vec::with_capacity(n)];

        let mut iteration = 0;
        loop {
            iteration += 1;
            let delta = relax_rows(self.system, &src, all_rows, &mut dst[0])?;
            mem::swap(&mut src, &mut dst);
            trace!(iteration, delta, "round complete");

            match judge(delta, tolerance, iteration, self.config.max_iterations) {
                Step::Continue => {}
                Step::Converged => {
                    debug!(iterations = iteration, delta, "converged");
                    return Ok(Solution {
                        x: src.swap_remove(0),
                        iterations: iteration,
                        delta,
                    });
                }
                Step::Exhausted => {
                    warn!(iterations = iteration, delta, tolerance, "iteration cap reached");
                    return Err(SolverError::DidNotConverge {
                        iterations: iteration,
                        delta,
                        tolerance,
                        estimate: src.swap_remove(0),
                    });
                }
            }
        }
    }

    fn name(&self) -> &'static str {
        "Single Thread"
    }
}
