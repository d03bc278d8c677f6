//! pf-core: stable foundation for procflow.
//!
//! Contains:
//! - units (uom SI types + constructors, standard-condition constants)
//! - quantity (unit-of-measure strings for the build/query contract)
//! - numeric (Real + tolerances + float helpers)
//! - ids (stable compact IDs for flowsheet objects)

pub mod ids;
pub mod numeric;
pub mod quantity;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use ids::*;
pub use numeric::*;
pub use quantity::{Quantity, UnitError};
pub use units::*;
