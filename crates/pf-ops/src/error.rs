//! Unit-operation errors.

use pf_thermo::ThermoError;
use thiserror::Error;

pub type OpResult<T> = Result<T, OpError>;

/// Errors raised while solving a single unit operation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OpError {
    /// Property calculation failed underneath the unit.
    #[error("Property calculation failed: {0}")]
    Thermo(#[from] ThermoError),

    /// Unit parameters are invalid for this feed or by themselves.
    #[error("Invalid specification: {what}")]
    InvalidSpec { what: &'static str },

    /// The unit was handed the wrong number of inlets for its kind.
    #[error("Expected {expected} inlet(s), got {got}")]
    InletArity { expected: usize, got: usize },

    /// An inlet state was not flashed before the unit ran.
    #[error("Inlet stream has no phase data")]
    UnflashedInlet,
}
