//! Gas compressor with isentropic efficiency.

use pf_thermo::PropertyProvider;

use crate::error::{OpError, OpResult};
use crate::pump::Driven;
use crate::state::StreamState;

#[derive(Debug, Clone, Copy)]
pub struct Compressor {
    /// Discharge pressure [Pa].
    pub p_out: f64,
    /// Isentropic efficiency in (0, 1].
    pub efficiency: f64,
}

impl Compressor {
    pub fn new(p_out: f64, efficiency: f64) -> OpResult<Self> {
        if !(p_out.is_finite() && p_out > 0.0) {
            return Err(OpError::InvalidSpec {
                what: "compressor discharge pressure must be positive",
            });
        }
        if !(efficiency > 0.0 && efficiency <= 1.0) {
            return Err(OpError::InvalidSpec {
                what: "compressor efficiency must be in (0, 1]",
            });
        }
        Ok(Self { p_out, efficiency })
    }

    /// Isentropic reference path: flash at (p_out, s_in) gives the ideal
    /// outlet enthalpy; the actual enthalpy rise is Δh_s/η.
    pub fn solve(&self, provider: &dyn PropertyProvider, inlet: &StreamState) -> OpResult<Driven> {
        if self.p_out < inlet.pressure {
            return Err(OpError::InvalidSpec {
                what: "compressor cannot lower pressure",
            });
        }
        let h_in = inlet.molar_enthalpy()?;
        let s_in = inlet.molar_entropy()?;
        let (_, ideal) = provider.flash_ps(&inlet.composition, self.p_out, s_in)?;
        let dh = (ideal.mixture_enthalpy() - h_in) / self.efficiency;
        let (t, split) = provider.flash_ph(&inlet.composition, self.p_out, h_in + dh)?;
        Ok(Driven {
            outlet: StreamState {
                composition: inlet.composition.clone(),
                pressure: self.p_out,
                temperature: t,
                molar_flow: inlet.molar_flow,
                split: Some(split),
            },
            power: inlet.molar_flow * dh,
        })
    }
}
