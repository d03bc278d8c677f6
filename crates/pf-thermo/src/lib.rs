//! Fluid property engine: Peng-Robinson equation of state, flash kernels and
//! phase-envelope queries behind the [`PropertyProvider`] trait.
//!
//! Everything works on molar quantities in SI base units: pressure Pa,
//! temperature K, enthalpy J/mol, entropy J/(mol·K). Compositions are mole
//! fractions index-aligned with a [`ComponentSet`].

pub mod composition;
pub mod envelope;
pub mod eos;
pub mod error;
pub mod flash;
pub mod phase;
pub mod provider;
pub mod species;

pub use composition::Composition;
pub use eos::{PengRobinson, ZRoot};
pub use error::{ThermoError, ThermoResult};
pub use phase::{Phase, PhaseKind, PhaseSplit};
pub use provider::{PengRobinsonProvider, PropertyProvider};
pub use species::{ComponentData, ComponentSet, Family};
