//! Steady-state flowsheet solver: topological sweeps with tear-stream
//! fixed-point iteration, cooperative cancellation and a hard deadline.

pub mod error;
pub mod solve;

pub use error::{SolveError, SolveResult};
pub use solve::{solve, solve_with_deadline, CancelToken, Solution, SolveOptions, SolveReport};
