//! Liquid pump with isentropic efficiency.

use pf_thermo::{PhaseKind, PropertyProvider};

use crate::error::{OpError, OpResult};
use crate::state::StreamState;

/// Outcome of a pump or compressor solve: outlet plus shaft power [W].
#[derive(Debug, Clone)]
pub struct Driven {
    pub outlet: StreamState,
    /// Shaft power added to the fluid [W].
    pub power: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct Pump {
    /// Discharge pressure [Pa].
    pub p_out: f64,
    /// Isentropic efficiency in (0, 1].
    pub efficiency: f64,
}

impl Pump {
    pub fn new(p_out: f64, efficiency: f64) -> OpResult<Self> {
        if !(p_out.is_finite() && p_out > 0.0) {
            return Err(OpError::InvalidSpec {
                what: "pump discharge pressure must be positive",
            });
        }
        if !(efficiency > 0.0 && efficiency <= 1.0) {
            return Err(OpError::InvalidSpec {
                what: "pump efficiency must be in (0, 1]",
            });
        }
        Ok(Self { p_out, efficiency })
    }

    /// Incompressible work w = v·ΔP/η per mole of feed, added to the feed
    /// enthalpy before the outlet flash.
    pub fn solve(&self, provider: &dyn PropertyProvider, inlet: &StreamState) -> OpResult<Driven> {
        if self.p_out < inlet.pressure {
            return Err(OpError::InvalidSpec {
                what: "pump cannot lower pressure",
            });
        }
        let split = inlet.split()?;
        let v_liq = split
            .liquid()
            .or_else(|| {
                split
                    .phases
                    .first()
                    .filter(|p| split.is_single_phase() && p.kind != PhaseKind::Vapor)
            })
            .map(|p| p.molar_volume)
            .ok_or(OpError::InvalidSpec {
                what: "pump requires a liquid feed",
            })?;

        let w = v_liq * (self.p_out - inlet.pressure) / self.efficiency;
        let h_out = inlet.molar_enthalpy()? + w;
        let (t, out_split) = provider.flash_ph(&inlet.composition, self.p_out, h_out)?;
        Ok(Driven {
            outlet: StreamState {
                composition: inlet.composition.clone(),
                pressure: self.p_out,
                temperature: t,
                molar_flow: inlet.molar_flow,
                split: Some(out_split),
            },
            power: inlet.molar_flow * w,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pf_thermo::{ComponentData, ComponentSet, Composition, PengRobinsonProvider};

    fn provider() -> PengRobinsonProvider {
        PengRobinsonProvider::new(
            ComponentSet::new(vec![ComponentData::library("n-pentane").unwrap()]).unwrap(),
        )
    }

    fn liquid_feed(pr: &PengRobinsonProvider) -> StreamState {
        StreamState::flashed(pr, Composition::new(vec![1.0]).unwrap(), 2.0e5, 300.0, 10.0).unwrap()
    }

    #[test]
    fn pumping_costs_power_and_warms_slightly() {
        let pr = provider();
        let inlet = liquid_feed(&pr);
        let out = Pump::new(15.0e5, 0.75).unwrap().solve(&pr, &inlet).unwrap();
        assert!(out.power > 0.0);
        assert!((out.outlet.pressure - 15.0e5).abs() < 1e-6);
        // Liquid is nearly incompressible: small temperature rise only.
        assert!(out.outlet.temperature >= inlet.temperature);
        assert!(out.outlet.temperature < inlet.temperature + 5.0);
    }

    #[test]
    fn lower_efficiency_costs_more_power() {
        let pr = provider();
        let inlet = liquid_feed(&pr);
        let a = Pump::new(15.0e5, 1.0).unwrap().solve(&pr, &inlet).unwrap();
        let b = Pump::new(15.0e5, 0.5).unwrap().solve(&pr, &inlet).unwrap();
        assert!(b.power > a.power);
    }

    #[test]
    fn vapor_feed_rejected() {
        let pr = PengRobinsonProvider::new(
            ComponentSet::new(vec![ComponentData::library("methane").unwrap()]).unwrap(),
        );
        let gas =
            StreamState::flashed(&pr, Composition::new(vec![1.0]).unwrap(), 2.0e5, 300.0, 1.0)
                .unwrap();
        assert!(Pump::new(10.0e5, 0.75).unwrap().solve(&pr, &gas).is_err());
    }

    #[test]
    fn bad_parameters_rejected() {
        assert!(Pump::new(10.0e5, 0.0).is_err());
        assert!(Pump::new(10.0e5, 1.2).is_err());
        assert!(Pump::new(-1.0, 0.8).is_err());
    }
}
