//! Stream state: the fluid condition carried on a flowsheet edge.

use pf_thermo::{Composition, PhaseSplit, PropertyProvider};

use crate::error::{OpError, OpResult};

/// Molar flow below this threshold counts as a dead (zero-flow) stream
/// [mol/s].
pub const ZERO_FLOW: f64 = 1.0e-9;

/// Fluid condition on one stream: composition, pressure [Pa], temperature
/// [K], molar flow [mol/s] and, once a unit has produced it, the phase
/// split at (P, T).
#[derive(Debug, Clone)]
pub struct StreamState {
    pub composition: Composition,
    pub pressure: f64,
    pub temperature: f64,
    pub molar_flow: f64,
    pub split: Option<PhaseSplit>,
}

impl StreamState {
    /// Build a state and flash it at its own (P, T).
    pub fn flashed(
        provider: &dyn PropertyProvider,
        composition: Composition,
        pressure: f64,
        temperature: f64,
        molar_flow: f64,
    ) -> OpResult<Self> {
        if !(molar_flow.is_finite() && molar_flow >= 0.0) {
            return Err(OpError::InvalidSpec {
                what: "molar flow must be finite and non-negative",
            });
        }
        let split = provider.flash_pt(&composition, pressure, temperature)?;
        Ok(Self {
            composition,
            pressure,
            temperature,
            molar_flow,
            split: Some(split),
        })
    }

    /// True when the stream carries no material.
    pub fn is_zero_flow(&self) -> bool {
        self.molar_flow < ZERO_FLOW
    }

    /// Phase split, or an error when the producing unit never flashed.
    pub fn split(&self) -> OpResult<&PhaseSplit> {
        self.split.as_ref().ok_or(OpError::UnflashedInlet)
    }

    /// Mixture molar enthalpy [J/mol].
    pub fn molar_enthalpy(&self) -> OpResult<f64> {
        Ok(self.split()?.mixture_enthalpy())
    }

    /// Mixture molar entropy [J/(mol·K)].
    pub fn molar_entropy(&self) -> OpResult<f64> {
        Ok(self.split()?.mixture_entropy())
    }

    /// Mass flow [kg/s] via the mixture molar mass.
    pub fn mass_flow(&self, provider: &dyn PropertyProvider) -> f64 {
        self.molar_flow * provider.molar_mass(&self.composition)
    }

    /// Per-component molar flows [mol/s], index-aligned with the basis.
    pub fn component_flows(&self) -> Vec<f64> {
        self.composition
            .fractions()
            .iter()
            .map(|x| x * self.molar_flow)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pf_thermo::{ComponentData, ComponentSet, PengRobinsonProvider};

    fn provider() -> PengRobinsonProvider {
        PengRobinsonProvider::new(
            ComponentSet::new(vec![
                ComponentData::library("methane").unwrap(),
                ComponentData::library("ethane").unwrap(),
            ])
            .unwrap(),
        )
    }

    #[test]
    fn flashed_state_has_split_and_mass_flow() {
        let pr = provider();
        let comp = Composition::new(vec![0.9, 0.1]).unwrap();
        let s = StreamState::flashed(&pr, comp, 10.0e5, 300.0, 100.0).unwrap();
        assert!(s.split.is_some());
        assert!(!s.is_zero_flow());
        let m = s.mass_flow(&pr);
        assert!((m - 100.0 * (0.9 * 0.016043 + 0.1 * 0.03007)).abs() < 1e-9);
    }

    #[test]
    fn component_flows_scale_with_total() {
        let pr = provider();
        let comp = Composition::new(vec![0.5, 0.5]).unwrap();
        let s = StreamState::flashed(&pr, comp, 10.0e5, 300.0, 10.0).unwrap();
        let f = s.component_flows();
        assert!((f[0] - 5.0).abs() < 1e-12);
        assert!((f[1] - 5.0).abs() < 1e-12);
    }

    #[test]
    fn negative_flow_rejected() {
        let pr = provider();
        let comp = Composition::new(vec![1.0, 0.0]).unwrap();
        assert!(StreamState::flashed(&pr, comp, 10.0e5, 300.0, -1.0).is_err());
    }
}
