//! Property reports over converged flowsheet solutions.
//!
//! A [`Report`] can only be opened on a converged solution; every metric
//! query names its stream or unit and its output unit string explicitly.

pub mod error;
pub mod report;

pub use error::{QueryError, QueryResult};
pub use report::{Report, StreamRow, Summary};
