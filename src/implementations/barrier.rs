use std::mem;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use parking_lot::{Mutex, RwLock};
use tracing::{debug, instrument, trace, warn};

use crate::config::{check_tolerance, SolverConfig};
use crate::error::{Result, SolverError};
use crate::implementations::kernel::{initial_estimate, judge, relax_rows, Step};
use crate::implementations::partition::{partition_rows, Partition};
use crate::implementations::{JacobiSolver, Solution};
use crate::system::LinearSystem;

/*
  バリア同期版の並列 Jacobi

  - 行を連続区間に分割し、各ワーカーが 1 区間を担当（ワーカーは solve の間ずっと生存）
  - 前ラウンドのベクトルは Arc<Vec<セグメント>> として公開し、ラウンド中は誰も書き換えない
  - 各ワーカーは自分のセグメントを新しく書き、自分のスロットに所有権ごと渡す
  - 呼び出しスレッドがコーディネーター：
      バリア(1) 全ワーカーの書き込み完了を待つ
      差分の最大値を集約して判定し、新しいフレームを公開
      バリア(2) ワーカーを次のラウンドへ解放（停止フラグが立っていれば終了）
  - 古いフレームのバッファは次ラウンドの書き込み先として各スロットに戻す（要素コピーなし）
*/

/// パーティションごとのセグメント列。連結すると x になる。
type Frame = Arc<Vec<Vec<f64>>>;

#[derive(Default)]
struct Slot {
    /// ワーカーが今ラウンドに書いたセグメント
    fresh: Vec<f64>,
    /// 次ラウンドの書き込み先（前々ラウンドのバッファを再利用）
    spare: Vec<f64>,
    outcome: Option<Result<f64>>,
}

struct Exchange {
    frame: RwLock<Frame>,
    slots: Vec<Mutex<Slot>>,
    stop: AtomicBool,
}

impl Exchange {
    fn new(seed: &[f64], partitions: &[Partition]) -> Self {
        let segments = partitions.iter().map(|p| seed[p.rows()].to_vec()).collect();
        Exchange {
            frame: RwLock::new(Arc::new(segments)),
            slots: partitions.iter().map(|_| Mutex::new(Slot::default())).collect(),
            stop: AtomicBool::new(false),
        }
    }

    /// 全スロットの結果を集約する。
    ///
    /// 差分は全パーティションの最大値、エラーはパーティション番号が最小のものを採用。
    /// 完了順には依存しない。
    fn collect(&self) -> Result<(Vec<Vec<f64>>, f64)> {
        let mut segments = Vec::with_capacity(self.slots.len());
        let mut delta: f64 = 0.0;
        let mut failure = None;

        for slot in &self.slots {
            let mut slot = slot.lock();
            match slot.outcome.take() {
                Some(Ok(local)) => delta = delta.max(local),
                Some(Err(err)) => {
                    if failure.is_none() {
                        failure = Some(err);
                    }
                }
                // バリア(1)の後なので全ワーカーが報告済み
                None => {}
            }
            segments.push(mem::take(&mut slot.fresh));
        }

        match failure {
            Some(err) => Err(err),
            None => Ok((segments, delta)),
        }
    }

    /// 新しいフレームを公開し、古いフレームのバッファをスロットに戻す。
    fn publish(&self, segments: Vec<Vec<f64>>) {
        let old = mem::replace(&mut *self.frame.write(), Arc::new(segments));
        // ワーカーはバリア(1)の前に clone を手放しているので通常は唯一の参照
        if let Ok(buffers) = Arc::try_unwrap(old) {
            for (slot, buf) in self.slots.iter().zip(buffers) {
                slot.lock().spare = buf;
            }
        }
    }

    fn solution(&self) -> Vec<f64> {
        self.frame.read().concat()
    }
}

/// 行分割 + バリア同期の並列 Jacobi 反復。
///
/// パーティションは構築時に `n` とワーカー数から一度だけ計算する。
#[derive(Clone, Debug)]
pub struct ParallelSolver<'a> {
    system: &'a LinearSystem,
    partitions: Vec<Partition>,
    config: SolverConfig,
}

impl<'a> ParallelSolver<'a> {
    pub fn new(system: &'a LinearSystem, workers: usize) -> Self {
        Self::with_config(system, workers, SolverConfig::default())
    }

    pub fn with_config(system: &'a LinearSystem, workers: usize, config: SolverConfig) -> Self {
        ParallelSolver {
            system,
            partitions: partition_rows(system.size(), workers),
            config,
        }
    }

    pub fn workers(&self) -> usize {
        self.partitions.len()
    }

    pub fn partitions(&self) -> &[Partition] {
        &self.partitions
    }

    fn run_worker(&self, index: usize, part: Partition, exchange: &Exchange, barrier: &Barrier) {
        loop {
            let mut next = mem::take(&mut exchange.slots[index].lock().spare);

            let outcome = {
                let previous = Arc::clone(&*exchange.frame.read());
                relax_rows(self.system, &previous, part, &mut next)
            };
            trace!(worker = index, rows = part.len(), "segment written");

            {
                let mut slot = exchange.slots[index].lock();
                slot.fresh = next;
                slot.outcome = Some(outcome);
            }

            // (1) 書き込み完了
            barrier.wait();
            // (2) 判定・公開完了
            barrier.wait();

            if exchange.stop.load(Ordering::Acquire) {
                break;
            }
        }
    }

    fn coordinate(&self, tolerance: f64, exchange: &Exchange, barrier: &Barrier) -> Result<Solution> {
        let mut iteration = 0;
        loop {
            iteration += 1;
            barrier.wait();

            let (segments, delta) = match exchange.collect() {
                Ok(merged) => merged,
                Err(err) => {
                    // 次のバリアで全ワーカーを止める
                    exchange.stop.store(true, Ordering::Release);
                    barrier.wait();
                    return Err(err);
                }
            };
            exchange.publish(segments);

            let step = judge(delta, tolerance, iteration, self.config.max_iterations);
            if step != Step::Continue {
                exchange.stop.store(true, Ordering::Release);
            }
            barrier.wait();
            trace!(iteration, delta, "round complete");

            match step {
                Step::Continue => {}
                Step::Converged => {
                    debug!(iterations = iteration, delta, "converged");
                    return Ok(Solution {
                        x: exchange.solution(),
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
                        estimate: exchange.solution(),
                    });
                }
            }
        }
    }
}

impl JacobiSolver for ParallelSolver<'_> {
    #[instrument(skip(self), fields(n = self.system.size(), workers = self.workers()))]
    fn solve(&self, tolerance: f64) -> Result<Solution> {
        check_tolerance(tolerance)?;
        self.config.validate()?;
        if self.partitions.is_empty() {
            return Err(SolverError::InvalidConfig {
                name: "workers",
                value: "0".into(),
                expected: ">= 1",
            });
        }

        let seed = initial_estimate(self.system, &self.config.initial_guess)?;
        let exchange = Exchange::new(&seed, &self.partitions);
        // ワーカー + コーディネーター
        let barrier = Barrier::new(self.partitions.len() + 1);

        thread::scope(|scope| {
            for (index, &part) in self.partitions.iter().enumerate() {
                let exchange = &exchange;
                let barrier = &barrier;
                scope.spawn(move || self.run_worker(index, part, exchange, barrier));
            }
            self.coordinate(tolerance, &exchange, &barrier)
        })
    }

    fn name(&self) -> &'static str {
        "Barrier"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::implementations::single::SequentialSolver;

    fn tridiagonal(n: usize) -> LinearSystem {
        let mut rows = vec![vec![0.0; n]; n];
        for (i, row) in rows.iter_mut().enumerate() {
            row[i] = 4.0;
            if i > 0 {
                row[i - 1] = -1.0;
            }
            if i + 1 < n {
                row[i + 1] = -1.0;
            }
        }
        let b = (0..n).map(|i| (i % 7) as f64 + 1.0).collect();
        LinearSystem::from_rows(rows, b).unwrap()
    }

    #[test]
    fn matches_sequential_bit_for_bit() {
        let sys = tridiagonal(11);
        let expected = SequentialSolver::new(&sys).solve(1e-9).unwrap();
        for workers in [1, 2, 3, 4, 11] {
            let sol = ParallelSolver::new(&sys, workers).solve(1e-9).unwrap();
            assert_eq!(sol.x, expected.x, "workers = {workers}");
            assert_eq!(sol.iterations, expected.iterations);
        }
    }

    #[test]
    fn more_workers_than_rows() {
        let sys = tridiagonal(3);
        let solver = ParallelSolver::new(&sys, 8);
        assert_eq!(solver.workers(), 8);
        let sol = solver.solve(1e-9).unwrap();
        let expected = SequentialSolver::new(&sys).solve(1e-9).unwrap();
        assert_eq!(sol.x, expected.x);
    }

    #[test]
    fn zero_workers_is_rejected() {
        let sys = tridiagonal(4);
        assert!(matches!(
            ParallelSolver::new(&sys, 0).solve(1e-6),
            Err(SolverError::InvalidConfig { name: "workers", .. })
        ));
    }

    #[test]
    fn lowest_failing_partition_wins() {
        let partitions = partition_rows(4, 2);
        let exchange = Exchange::new(&[0.0; 4], &partitions);
        exchange.slots[1].lock().outcome = Some(Err(SolverError::DivisionByZero { row: 3 }));
        exchange.slots[0].lock().outcome = Some(Err(SolverError::DivisionByZero { row: 0 }));
        assert_eq!(
            exchange.collect().unwrap_err(),
            SolverError::DivisionByZero { row: 0 }
        );
    }

    #[test]
    fn publish_recycles_previous_frame() {
        let partitions = partition_rows(4, 2);
        let exchange = Exchange::new(&[1.0, 2.0, 3.0, 4.0], &partitions);
        exchange.publish(vec![vec![5.0, 6.0], vec![7.0, 8.0]]);
        assert_eq!(exchange.solution(), vec![5.0, 6.0, 7.0, 8.0]);
        assert_eq!(exchange.slots[0].lock().spare, vec![1.0, 2.0]);
        assert_eq!(exchange.slots[1].lock().spare, vec![3.0, 4.0]);
    }
}
