//! Property-provider errors.

use thiserror::Error;

/// Result type for thermodynamic operations.
pub type ThermoResult<T> = Result<T, ThermoError>;

/// Errors that can occur during property calculations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ThermoError {
    /// Non-physical values (negative pressure, empty composition, etc.).
    #[error("Non-physical value for {what}")]
    NonPhysical { what: &'static str },

    /// Invalid argument.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// Component name not present in the catalog or component set.
    #[error("Unknown component '{name}'")]
    UnknownComponent { name: String },

    /// An iterative kernel exceeded its iteration cap.
    ///
    /// `what` names the kernel (tp flash, ph flash, bubble pressure, ...).
    #[error("Convergence failed in {what}")]
    ConvergenceFailed { what: &'static str },

    /// No physically valid solution exists for the requested specification.
    #[error("Infeasible specification: {what}")]
    Infeasible { what: &'static str },
}
