//! Throttling valve: isenthalpic expansion to a set outlet pressure.

use pf_thermo::PropertyProvider;

use crate::error::{OpError, OpResult};
use crate::state::StreamState;

#[derive(Debug, Clone, Copy)]
pub struct Valve {
    /// Outlet pressure [Pa].
    pub p_out: f64,
}

impl Valve {
    pub fn new(p_out: f64) -> OpResult<Self> {
        if !(p_out.is_finite() && p_out > 0.0) {
            return Err(OpError::InvalidSpec {
                what: "valve outlet pressure must be positive",
            });
        }
        Ok(Self { p_out })
    }

    /// Flash the feed at the outlet pressure holding mixture enthalpy;
    /// the outlet temperature floats (Joule-Thomson effect included).
    pub fn solve(
        &self,
        provider: &dyn PropertyProvider,
        inlet: &StreamState,
    ) -> OpResult<StreamState> {
        if self.p_out > inlet.pressure {
            return Err(OpError::InvalidSpec {
                what: "valve cannot raise pressure",
            });
        }
        let h = inlet.molar_enthalpy()?;
        let (t, split) = provider.flash_ph(&inlet.composition, self.p_out, h)?;
        Ok(StreamState {
            composition: inlet.composition.clone(),
            pressure: self.p_out,
            temperature: t,
            molar_flow: inlet.molar_flow,
            split: Some(split),
        })
    }
}
