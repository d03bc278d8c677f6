//! Solver errors.

use pf_graph::GraphError;
use pf_ops::OpError;
use thiserror::Error;

pub type SolveResult<T> = Result<T, SolveError>;

/// Hard failures of a flowsheet solve. Running out of iterations is not an
/// error; it is reported as `converged: false` on the solve report.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolveError {
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("Unit '{unit}' failed: {source}")]
    UnitFailed { unit: String, source: OpError },

    #[error("Tear stream '{stream}' guess could not be flashed: {source}")]
    TearSeed { stream: String, source: OpError },

    #[error("Solve cancelled")]
    Cancelled,

    #[error("Solve deadline exceeded")]
    Timeout,
}
