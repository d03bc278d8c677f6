//! Flowsheet construction and validation errors.

use thiserror::Error;

pub type GraphResult<T> = Result<T, GraphError>;

/// Errors detected while building or validating a flowsheet.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("Duplicate stream name '{0}'")]
    DuplicateStreamName(String),

    #[error("Duplicate unit name '{0}'")]
    DuplicateUnitName(String),

    #[error("Unknown stream id")]
    UnknownStream,

    #[error("Stream '{stream}' already has a producing unit")]
    StreamAlreadyProduced { stream: String },

    #[error("Unit '{unit}' reads stream '{stream}' which no unit produces")]
    UnconnectedInlet { unit: String, stream: String },

    #[error("Tear stream '{stream}' is not consumed by any unit")]
    DanglingTear { stream: String },

    #[error("Unit '{unit}' expects {expected} inlet(s), got {got}")]
    InletArity {
        unit: String,
        expected: usize,
        got: usize,
    },

    #[error("Unit '{unit}' expects {expected} outlet(s), got {got}")]
    OutletArity {
        unit: String,
        expected: usize,
        got: usize,
    },

    #[error("Tear stream '{stream}' must be produced by exactly one recycle unit")]
    TearNotOwnedByRecycle { stream: String },

    #[error("Recycle unit '{unit}' must produce a tear stream")]
    RecycleWithoutTear { unit: String },

    #[error("Tear stream '{stream}' has no initial guess")]
    TearWithoutGuess { stream: String },

    #[error("Flowsheet stays cyclic after tear removal; cycle involves: {units:?}")]
    CyclicAfterTearRemoval { units: Vec<String> },
}
