//! Phase-split result types.

use crate::composition::Composition;
use crate::error::ThermoResult;
use crate::species::ComponentSet;

/// Physical kind of an equilibrium phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseKind {
    Vapor,
    Liquid,
    /// Free-water phase decanted from the hydrocarbon liquid.
    Aqueous,
}

/// One equilibrium phase with its molar properties.
#[derive(Debug, Clone)]
pub struct Phase {
    pub kind: PhaseKind,
    /// Molar phase fraction of the total fluid (0..=1).
    pub fraction: f64,
    pub composition: Composition,
    /// Compressibility factor.
    pub z_factor: f64,
    /// Molar volume [m³/mol].
    pub molar_volume: f64,
    /// Molar enthalpy [J/mol] (ideal-gas reference 298.15 K).
    pub molar_enthalpy: f64,
    /// Molar entropy [J/(mol·K)].
    pub molar_entropy: f64,
    /// Mass density [kg/m³].
    pub mass_density: f64,
}

/// Result of a flash: one, two or three phases whose fractions sum to one.
#[derive(Debug, Clone)]
pub struct PhaseSplit {
    pub phases: Vec<Phase>,
}

impl PhaseSplit {
    pub fn single(phase: Phase) -> Self {
        Self {
            phases: vec![phase],
        }
    }

    pub fn phase(&self, kind: PhaseKind) -> Option<&Phase> {
        self.phases.iter().find(|p| p.kind == kind)
    }

    pub fn vapor(&self) -> Option<&Phase> {
        self.phase(PhaseKind::Vapor)
    }

    pub fn liquid(&self) -> Option<&Phase> {
        self.phase(PhaseKind::Liquid)
    }

    pub fn aqueous(&self) -> Option<&Phase> {
        self.phase(PhaseKind::Aqueous)
    }

    /// Molar vapor fraction (0 when no vapor phase present).
    pub fn vapor_fraction(&self) -> f64 {
        self.vapor().map(|p| p.fraction).unwrap_or(0.0)
    }

    pub fn is_single_phase(&self) -> bool {
        self.phases.len() == 1
    }

    /// Phase-fraction-weighted molar enthalpy [J/mol].
    pub fn mixture_enthalpy(&self) -> f64 {
        self.phases
            .iter()
            .map(|p| p.fraction * p.molar_enthalpy)
            .sum()
    }

    /// Phase-fraction-weighted molar entropy [J/(mol·K)].
    pub fn mixture_entropy(&self) -> f64 {
        self.phases
            .iter()
            .map(|p| p.fraction * p.molar_entropy)
            .sum()
    }

    /// Overall composition reconstructed from the phases.
    pub fn overall_composition(&self, set: &ComponentSet) -> ThermoResult<Composition> {
        let n = set.len();
        let mut z = vec![0.0; n];
        for p in &self.phases {
            for (i, x) in p.composition.fractions().iter().enumerate() {
                z[i] += p.fraction * x;
            }
        }
        Composition::new(z)
    }

    /// Debug invariant: fractions sum to one.
    pub fn fractions_sum(&self) -> f64 {
        self.phases.iter().map(|p| p.fraction).sum()
    }
}
