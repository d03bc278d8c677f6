//! Feed stream definition.

use pf_thermo::{Composition, PropertyProvider};

use crate::error::{OpError, OpResult};
use crate::state::StreamState;

/// Fixed feed: composition, conditions and molar flow are given, the solve
/// just flashes the definition.
#[derive(Debug, Clone)]
pub struct Source {
    pub composition: Composition,
    /// Feed pressure [Pa].
    pub pressure: f64,
    /// Feed temperature [K].
    pub temperature: f64,
    /// Molar flow [mol/s].
    pub molar_flow: f64,
}

impl Source {
    pub fn new(
        composition: Composition,
        pressure: f64,
        temperature: f64,
        molar_flow: f64,
    ) -> OpResult<Self> {
        if !(pressure.is_finite() && pressure > 0.0) {
            return Err(OpError::InvalidSpec {
                what: "source pressure must be positive",
            });
        }
        if !(temperature.is_finite() && temperature > 0.0) {
            return Err(OpError::InvalidSpec {
                what: "source temperature must be positive",
            });
        }
        if !(molar_flow.is_finite() && molar_flow >= 0.0) {
            return Err(OpError::InvalidSpec {
                what: "source molar flow must be non-negative",
            });
        }
        Ok(Self {
            composition,
            pressure,
            temperature,
            molar_flow,
        })
    }

    pub fn solve(&self, provider: &dyn PropertyProvider) -> OpResult<StreamState> {
        StreamState::flashed(
            provider,
            self.composition.clone(),
            self.pressure,
            self.temperature,
            self.molar_flow,
        )
    }
}
