//! Component definitions: library species and TBP pseudo-fractions.

use crate::error::{ThermoError, ThermoResult};

/// Chemical family, used to pick binary interaction parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    Hydrocarbon,
    Nitrogen,
    CarbonDioxide,
    Water,
}

/// Pure or pseudo component with the data the equation of state needs.
#[derive(Debug, Clone)]
pub struct ComponentData {
    pub name: String,
    /// Molar mass [kg/mol].
    pub molar_mass: f64,
    /// Critical temperature [K].
    pub tc: f64,
    /// Critical pressure [Pa].
    pub pc: f64,
    /// Acentric factor.
    pub acentric: f64,
    /// Ideal-gas heat capacity polynomial cp = a + bT + cT^2 + dT^3 [J/(mol·K)].
    pub cp_ig: [f64; 4],
    pub family: Family,
}

// (name, M g/mol, Tc K, Pc bar, omega, cp a, b, c, d), Reid, Prausnitz & Poling.
const LIBRARY: &[(&str, f64, f64, f64, f64, [f64; 4], Family)] = &[
    (
        "nitrogen",
        28.014,
        126.20,
        33.98,
        0.037,
        [31.15, -1.357e-2, 2.680e-5, -1.168e-8],
        Family::Nitrogen,
    ),
    (
        "CO2",
        44.010,
        304.13,
        73.77,
        0.224,
        [19.80, 7.344e-2, -5.602e-5, 1.715e-8],
        Family::CarbonDioxide,
    ),
    (
        "methane",
        16.043,
        190.56,
        45.99,
        0.011,
        [19.25, 5.213e-2, 1.197e-5, -1.132e-8],
        Family::Hydrocarbon,
    ),
    (
        "ethane",
        30.070,
        305.32,
        48.72,
        0.099,
        [5.409, 1.781e-1, -6.938e-5, 8.713e-9],
        Family::Hydrocarbon,
    ),
    (
        "propane",
        44.097,
        369.83,
        42.48,
        0.152,
        [-4.224, 3.063e-1, -1.586e-4, 3.215e-8],
        Family::Hydrocarbon,
    ),
    (
        "i-butane",
        58.123,
        407.85,
        36.40,
        0.186,
        [-1.390, 3.847e-1, -1.846e-4, 2.895e-8],
        Family::Hydrocarbon,
    ),
    (
        "n-butane",
        58.123,
        425.12,
        37.96,
        0.200,
        [9.487, 3.313e-1, -1.108e-4, -2.822e-9],
        Family::Hydrocarbon,
    ),
    (
        "i-pentane",
        72.150,
        460.40,
        33.80,
        0.229,
        [-9.525, 5.066e-1, -2.729e-4, 5.723e-8],
        Family::Hydrocarbon,
    ),
    (
        "n-pentane",
        72.150,
        469.70,
        33.70,
        0.252,
        [-3.626, 4.873e-1, -2.580e-4, 5.305e-8],
        Family::Hydrocarbon,
    ),
    (
        "n-hexane",
        86.177,
        507.60,
        30.25,
        0.301,
        [-4.413, 5.820e-1, -3.119e-4, 6.494e-8],
        Family::Hydrocarbon,
    ),
    (
        "water",
        18.015,
        647.10,
        220.64,
        0.344,
        [32.24, 1.924e-3, 1.055e-5, -3.596e-9],
        Family::Water,
    ),
];

impl ComponentData {
    /// Look up a library component by name.
    pub fn library(name: &str) -> ThermoResult<Self> {
        LIBRARY
            .iter()
            .find(|(n, ..)| *n == name)
            .map(|(n, m, tc, pc, w, cp, fam)| Self {
                name: (*n).to_string(),
                molar_mass: m / 1000.0,
                tc: *tc,
                pc: pc * 1.0e5,
                acentric: *w,
                cp_ig: *cp,
                family: *fam,
            })
            .ok_or_else(|| ThermoError::UnknownComponent {
                name: name.to_string(),
            })
    }

    /// Characterize a TBP pseudo-fraction from molar mass [kg/mol] and
    /// liquid density [kg/m³].
    ///
    /// Normal boiling point and criticals from the Riazi–Daubert
    /// correlations, acentric factor from Edmister. The ideal-gas heat
    /// capacity uses a per-mass linear fit typical of heavy paraffin cuts.
    pub fn tbp_fraction(name: &str, molar_mass: f64, density: f64) -> ThermoResult<Self> {
        if !(molar_mass > 0.0 && molar_mass.is_finite()) {
            return Err(ThermoError::InvalidArg {
                what: "TBP fraction molar mass must be positive",
            });
        }
        if !(density > 300.0 && density < 1200.0) {
            return Err(ThermoError::InvalidArg {
                what: "TBP fraction density must be a liquid density in kg/m3",
            });
        }
        let m_g = molar_mass * 1000.0;
        let sg = density / 999.0; // specific gravity vs water at 15.6 C

        // Riazi–Daubert: M = 1.6607e-4 Tb^2.1962 SG^-1.0164 (Tb in K), inverted.
        let tb = (m_g * sg.powf(1.0164) / 1.6607e-4).powf(1.0 / 2.1962);

        let tc = 9.5233
            * (-9.314e-4 * tb - 0.544442 * sg + 6.4791e-4 * tb * sg).exp()
            * tb.powf(0.81067)
            * sg.powf(0.53691);

        // Pc in bar.
        let pc_bar = 3.1958e5
            * (-8.505e-3 * tb - 4.8014 * sg + 5.749e-3 * tb * sg).exp()
            * tb.powf(-0.4844)
            * sg.powf(4.0846);

        // Edmister, with Pc in atm.
        let pc_atm = pc_bar * 1.0e5 / 101_325.0;
        let acentric = (3.0 / 7.0) * pc_atm.log10() / (tc / tb - 1.0) - 1.0;

        // cp per unit mass ~ 0.60 + 0.0035 T [J/(g·K)] for paraffinic cuts.
        let cp_ig = [0.597 * m_g, 3.5e-3 * m_g, 0.0, 0.0];

        Ok(Self {
            name: name.to_string(),
            molar_mass,
            tc,
            pc: pc_bar * 1.0e5,
            acentric: acentric.clamp(0.0, 1.5),
            cp_ig,
            family: Family::Hydrocarbon,
        })
    }

    /// Ideal-gas enthalpy above the 298.15 K reference [J/mol].
    pub fn h_ig(&self, t: f64) -> f64 {
        const T0: f64 = 298.15;
        let [a, b, c, d] = self.cp_ig;
        a * (t - T0)
            + b / 2.0 * (t * t - T0 * T0)
            + c / 3.0 * (t * t * t - T0 * T0 * T0)
            + d / 4.0 * (t * t * t * t - T0 * T0 * T0 * T0)
    }

    /// Ideal-gas entropy above the 298.15 K reference, at reference pressure
    /// [J/(mol·K)].
    pub fn s_ig(&self, t: f64) -> f64 {
        const T0: f64 = 298.15;
        let [a, b, c, d] = self.cp_ig;
        a * (t / T0).ln()
            + b * (t - T0)
            + c / 2.0 * (t * t - T0 * T0)
            + d / 3.0 * (t * t * t - T0 * T0 * T0)
    }
}

/// Ordered, immutable set of components defining a fluid basis.
///
/// All compositions, streams and phase splits in one flowsheet are index-
/// aligned with a single `ComponentSet`.
#[derive(Debug, Clone, Default)]
pub struct ComponentSet {
    components: Vec<ComponentData>,
}

impl ComponentSet {
    pub fn new(components: Vec<ComponentData>) -> ThermoResult<Self> {
        if components.is_empty() {
            return Err(ThermoError::InvalidArg {
                what: "component set must not be empty",
            });
        }
        for (i, c) in components.iter().enumerate() {
            if components[..i].iter().any(|o| o.name == c.name) {
                return Err(ThermoError::InvalidArg {
                    what: "duplicate component name in set",
                });
            }
        }
        Ok(Self { components })
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn get(&self, i: usize) -> &ComponentData {
        &self.components[i]
    }

    pub fn iter(&self) -> impl Iterator<Item = &ComponentData> {
        self.components.iter()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.components.iter().position(|c| c.name == name)
    }

    /// Index of the water component, if the set carries one.
    pub fn water_index(&self) -> Option<usize> {
        self.components.iter().position(|c| c.family == Family::Water)
    }
}
