//! Jacobi 法による連立一次方程式 `A·x = b` のソルバー。
//!
//! 1 スレッドの参照実装 [`SequentialSolver`] と、行分割 + バリア同期の
//! [`ParallelSolver`] を同じ収束条件（`‖x_k − x_{k−1}‖_∞ < E`）で提供する。
//!
//! ```
//! use jacobi_solver::{JacobiSolver, LinearSystem, ParallelSolver, SequentialSolver};
//!
//! let system = LinearSystem::from_rows(
//!     vec![vec![4.0, 1.0], vec![1.0, 3.0]],
//!     vec![1.0, 2.0],
//! ).unwrap();
//!
//! let single = SequentialSolver::new(&system).solve(1e-10).unwrap();
//! let parallel = ParallelSolver::new(&system, 2).solve(1e-10).unwrap();
//! assert_eq!(single.x, parallel.x);
//! ```

pub mod config;
pub mod error;
pub mod generate;
pub mod implementations;
pub mod report;
pub mod system;

pub use config::{InitialGuess, SolverConfig, DEFAULT_MAX_ITERATIONS};
pub use error::{Result, SolverError};
pub use implementations::barrier::ParallelSolver;
pub use implementations::partition::{partition_rows, Partition};
pub use implementations::single::SequentialSolver;
pub use implementations::{JacobiSolver, Solution};
pub use system::LinearSystem;
