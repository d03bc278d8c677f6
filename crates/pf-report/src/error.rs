//! Report query errors.

use pf_core::UnitError;
use pf_thermo::ThermoError;
use thiserror::Error;

pub type QueryResult<T> = Result<T, QueryError>;

/// Errors answering a report query. Every failure is explicit; a query
/// never silently falls back to a default value.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    #[error("Flowsheet did not converge ({iterations} sweeps, worst delta {worst_delta})")]
    NotConverged { iterations: usize, worst_delta: f64 },

    #[error("Unknown stream '{0}'")]
    UnknownStream(String),

    #[error("Unknown unit '{0}'")]
    UnknownUnit(String),

    #[error("Unit '{unit}' records no {metric}")]
    NoMetric { unit: String, metric: &'static str },

    #[error("Stream '{0}' has no solved state")]
    UnsolvedStream(String),

    #[error(transparent)]
    Unit(#[from] UnitError),

    #[error("Property calculation failed: {0}")]
    Thermo(#[from] ThermoError),
}
