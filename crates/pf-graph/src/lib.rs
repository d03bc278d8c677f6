//! Flowsheet graph: streams, units, validation and evaluation order.
//!
//! Building is the mutable phase; [`Flowsheet`] is immutable afterwards.
//! Recycle loops are broken by tear streams owned by Recycle units, so the
//! tear-reduced graph is always a DAG.

pub mod builder;
pub mod error;
pub mod graph;
mod order;

pub use builder::FlowsheetBuilder;
pub use error::{GraphError, GraphResult};
pub use graph::{Flowsheet, Stream, TearGuess, Unit};
