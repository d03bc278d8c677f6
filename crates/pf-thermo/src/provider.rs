//! The property-provider seam between the equation of state and the rest of
//! the flowsheet engine.

use tracing::trace;

use crate::composition::Composition;
use crate::eos::PengRobinson;
use crate::error::ThermoResult;
use crate::phase::PhaseSplit;
use crate::species::ComponentSet;
use crate::{envelope, flash};

/// Thermodynamic services a flowsheet needs from a fluid model.
///
/// All methods are pure with respect to provider state, so one provider is
/// shared across the whole flowsheet (and across rayon workers).
pub trait PropertyProvider: Send + Sync {
    /// The component basis every composition is index-aligned with.
    fn components(&self) -> &ComponentSet;

    /// Isothermal flash at (P [Pa], T [K]).
    fn flash_pt(&self, z: &Composition, p: f64, t: f64) -> ThermoResult<PhaseSplit>;

    /// Flash at pressure and mixture molar enthalpy [J/mol]; returns the
    /// solved temperature with the split.
    fn flash_ph(&self, z: &Composition, p: f64, h: f64) -> ThermoResult<(f64, PhaseSplit)>;

    /// Flash at pressure and mixture molar entropy [J/(mol·K)].
    fn flash_ps(&self, z: &Composition, p: f64, s: f64) -> ThermoResult<(f64, PhaseSplit)>;

    /// Decant free water from the liquid of an existing split.
    fn three_phase(&self, split: &PhaseSplit, p: f64, t: f64) -> ThermoResult<PhaseSplit>;

    /// Bubble-point (true vapor) pressure of a liquid at `t` [Pa].
    fn bubble_pressure(&self, x: &Composition, t: f64) -> ThermoResult<f64>;

    /// Highest two-phase pressure over the whole envelope [Pa].
    fn cricondenbar(&self, z: &Composition) -> ThermoResult<f64>;

    /// Water mole fraction of a saturated vapor at (P, T).
    fn water_saturation_y(&self, p: f64, t: f64) -> f64;

    /// Mixture molar mass [kg/mol].
    fn molar_mass(&self, z: &Composition) -> f64;
}

/// Peng-Robinson implementation of [`PropertyProvider`].
pub struct PengRobinsonProvider {
    model: PengRobinson,
}

impl PengRobinsonProvider {
    pub fn new(set: ComponentSet) -> Self {
        Self {
            model: PengRobinson::new(set),
        }
    }

    pub fn model(&self) -> &PengRobinson {
        &self.model
    }
}

impl PropertyProvider for PengRobinsonProvider {
    fn components(&self) -> &ComponentSet {
        self.model.components()
    }

    fn flash_pt(&self, z: &Composition, p: f64, t: f64) -> ThermoResult<PhaseSplit> {
        trace!(p, t, "pt flash");
        flash::flash_pt(&self.model, z, p, t)
    }

    fn flash_ph(&self, z: &Composition, p: f64, h: f64) -> ThermoResult<(f64, PhaseSplit)> {
        trace!(p, h, "ph flash");
        flash::flash_ph(&self.model, z, p, h)
    }

    fn flash_ps(&self, z: &Composition, p: f64, s: f64) -> ThermoResult<(f64, PhaseSplit)> {
        trace!(p, s, "ps flash");
        flash::flash_ps(&self.model, z, p, s)
    }

    fn three_phase(&self, split: &PhaseSplit, p: f64, t: f64) -> ThermoResult<PhaseSplit> {
        flash::three_phase(&self.model, split, p, t)
    }

    fn bubble_pressure(&self, x: &Composition, t: f64) -> ThermoResult<f64> {
        trace!(t, "bubble pressure");
        envelope::bubble_pressure(&self.model, x, t)
    }

    fn cricondenbar(&self, z: &Composition) -> ThermoResult<f64> {
        trace!("cricondenbar scan");
        envelope::cricondenbar(&self.model, z)
    }

    fn water_saturation_y(&self, p: f64, t: f64) -> f64 {
        flash::water_saturation_y(p, t)
    }

    fn molar_mass(&self, z: &Composition) -> f64 {
        z.molar_mass(self.model.components())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::species::ComponentData;

    fn provider(names: &[&str]) -> PengRobinsonProvider {
        let comps = names
            .iter()
            .map(|n| ComponentData::library(n).unwrap())
            .collect();
        PengRobinsonProvider::new(ComponentSet::new(comps).unwrap())
    }

    #[test]
    fn provider_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PengRobinsonProvider>();
    }

    #[test]
    fn trait_object_usable() {
        let p = provider(&["methane", "ethane"]);
        let dyn_p: &dyn PropertyProvider = &p;
        let z = Composition::new(vec![0.9, 0.1]).unwrap();
        let split = dyn_p.flash_pt(&z, 10.0e5, 300.0).unwrap();
        assert!(split.is_single_phase());
        assert!(dyn_p.molar_mass(&z) > 0.016);
    }
}
