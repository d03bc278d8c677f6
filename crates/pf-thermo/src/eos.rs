//! Peng-Robinson equation of state for multi-component mixtures.
//!
//! Classic mixing rules with a small binary-interaction table keyed on
//! chemical family. All quantities are molar (J/mol) with pressure in Pa and
//! temperature in K.

use crate::composition::Composition;
use crate::error::{ThermoError, ThermoResult};
use crate::phase::{Phase, PhaseKind};
use crate::species::{ComponentSet, Family};
use pf_core::units::constants::R_GAS;

const SQRT_2: f64 = std::f64::consts::SQRT_2;
/// Reference pressure for the ideal-gas entropy term [Pa].
const P_REF: f64 = 101_325.0;

/// Which compressibility root to evaluate a phase at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZRoot {
    Liquid,
    Vapor,
    /// Pick the root with the lower total Gibbs energy.
    MinGibbs,
}

/// Density-independent state of the mixing rules at one (x, T).
struct MixParams {
    /// a(T) of the mixture [Pa·m⁶/mol²].
    a: f64,
    /// Covolume b of the mixture [m³/mol].
    b: f64,
    /// d a(T)/dT of the mixture.
    da_dt: f64,
    /// Cross terms Σ_j x_j a_ij, one per component.
    a_cross: Vec<f64>,
}

/// Volumetric and caloric properties of one phase at (x, P, T).
#[derive(Debug, Clone, Copy)]
pub struct PhaseProps {
    pub z: f64,
    /// Molar volume [m³/mol].
    pub v: f64,
    /// Molar enthalpy [J/mol].
    pub h: f64,
    /// Molar entropy [J/(mol·K)].
    pub s: f64,
    /// Mass density [kg/m³].
    pub rho: f64,
}

/// Peng-Robinson model bound to one component set.
pub struct PengRobinson {
    set: ComponentSet,
    a_c: Vec<f64>,
    b: Vec<f64>,
    kappa: Vec<f64>,
    /// Binary interaction parameters, row-major n×n.
    k_ij: Vec<f64>,
}

fn binary_k(a: Family, b: Family) -> f64 {
    use Family::*;
    match (a, b) {
        (Hydrocarbon, Hydrocarbon) => 0.0,
        (Nitrogen, Hydrocarbon) | (Hydrocarbon, Nitrogen) => 0.08,
        (CarbonDioxide, Hydrocarbon) | (Hydrocarbon, CarbonDioxide) => 0.12,
        (Water, Hydrocarbon) | (Hydrocarbon, Water) => 0.48,
        (Water, Nitrogen) | (Nitrogen, Water) => 0.32,
        (Water, CarbonDioxide) | (CarbonDioxide, Water) => 0.19,
        (Nitrogen, CarbonDioxide) | (CarbonDioxide, Nitrogen) => -0.017,
        _ => 0.0,
    }
}

impl PengRobinson {
    pub fn new(set: ComponentSet) -> Self {
        let n = set.len();
        let mut a_c = Vec::with_capacity(n);
        let mut b = Vec::with_capacity(n);
        let mut kappa = Vec::with_capacity(n);
        for c in set.iter() {
            a_c.push(0.45724 * R_GAS * R_GAS * c.tc * c.tc / c.pc);
            b.push(0.07780 * R_GAS * c.tc / c.pc);
            kappa.push(0.37464 + (1.54226 - 0.26992 * c.acentric) * c.acentric);
        }
        let mut k_ij = vec![0.0; n * n];
        for i in 0..n {
            for j in 0..n {
                k_ij[i * n + j] = binary_k(set.get(i).family, set.get(j).family);
            }
        }
        Self {
            set,
            a_c,
            b,
            kappa,
            k_ij,
        }
    }

    pub fn components(&self) -> &ComponentSet {
        &self.set
    }

    /// Per-component a_i(T) and its temperature derivative.
    fn a_of_t(&self, t: f64) -> (Vec<f64>, Vec<f64>) {
        let n = self.set.len();
        let mut a = Vec::with_capacity(n);
        let mut da = Vec::with_capacity(n);
        for i in 0..n {
            let tc = self.set.get(i).tc;
            let sqrt_alpha = 1.0 + self.kappa[i] * (1.0 - (t / tc).sqrt());
            let alpha = sqrt_alpha * sqrt_alpha;
            a.push(self.a_c[i] * alpha);
            da.push(-self.a_c[i] * self.kappa[i] * sqrt_alpha / (t * tc).sqrt());
        }
        (a, da)
    }

    fn mix_params(&self, x: &[f64], t: f64) -> MixParams {
        let n = self.set.len();
        let (ai, dai) = self.a_of_t(t);
        let mut a = 0.0;
        let mut da_dt = 0.0;
        let mut a_cross = vec![0.0; n];
        for i in 0..n {
            for j in 0..n {
                let kij = self.k_ij[i * n + j];
                let sqrt_aij = (ai[i] * ai[j]).sqrt();
                let aij = (1.0 - kij) * sqrt_aij;
                a += x[i] * x[j] * aij;
                a_cross[i] += x[j] * aij;
                if sqrt_aij > 0.0 {
                    da_dt += x[i] * x[j] * (1.0 - kij) * (ai[j] * dai[i] + ai[i] * dai[j])
                        / (2.0 * sqrt_aij);
                }
            }
        }
        let b = x
            .iter()
            .zip(self.b.iter())
            .map(|(xi, bi)| xi * bi)
            .sum::<f64>();
        MixParams {
            a,
            b,
            da_dt,
            a_cross,
        }
    }

    /// Covolume of the mixture [m³/mol]; used for phase labeling.
    pub fn b_mix(&self, x: &[f64]) -> f64 {
        x.iter()
            .zip(self.b.iter())
            .map(|(xi, bi)| xi * bi)
            .sum::<f64>()
    }

    /// Real roots of z³ + c2 z² + c1 z + c0 = 0.
    fn cubic_roots(c2: f64, c1: f64, c0: f64) -> Vec<f64> {
        let p = c1 - c2 * c2 / 3.0;
        let q = 2.0 * c2 * c2 * c2 / 27.0 - c2 * c1 / 3.0 + c0;
        let disc = (q / 2.0) * (q / 2.0) + (p / 3.0) * (p / 3.0) * (p / 3.0);
        let shift = -c2 / 3.0;
        if disc > 0.0 {
            let sq = disc.sqrt();
            let u = (-q / 2.0 + sq).cbrt();
            let v = (-q / 2.0 - sq).cbrt();
            vec![u + v + shift]
        } else {
            let r = (-p * p * p / 27.0).sqrt();
            let theta = (-q / (2.0 * r)).clamp(-1.0, 1.0).acos();
            let m = 2.0 * (-p / 3.0).sqrt();
            (0..3)
                .map(|k| m * ((theta + 2.0 * std::f64::consts::PI * k as f64) / 3.0).cos() + shift)
                .collect()
        }
    }

    /// Liquid-like and vapor-like compressibility candidates at (A, B).
    fn z_candidates(a_dim: f64, b_dim: f64) -> ThermoResult<(f64, f64)> {
        let c2 = -(1.0 - b_dim);
        let c1 = a_dim - 3.0 * b_dim * b_dim - 2.0 * b_dim;
        let c0 = -(a_dim * b_dim - b_dim * b_dim - b_dim * b_dim * b_dim);
        let mut roots: Vec<f64> = Self::cubic_roots(c2, c1, c0)
            .into_iter()
            .filter(|z| *z > b_dim * (1.0 + 1e-12) && z.is_finite())
            .collect();
        roots.sort_by(f64::total_cmp);
        match roots.as_slice() {
            [] => Err(ThermoError::NonPhysical {
                what: "no compressibility root above covolume",
            }),
            [z] => Ok((*z, *z)),
            [zl, .., zv] => Ok((*zl, *zv)),
        }
    }

    fn ln_phi_at_z(mix: &MixParams, a_dim: f64, b_dim: f64, z: f64, b: &[f64]) -> Vec<f64> {
        let l = ((z + (1.0 + SQRT_2) * b_dim) / (z + (1.0 - SQRT_2) * b_dim)).ln();
        b.iter()
            .zip(mix.a_cross.iter())
            .map(|(bi, a_cross_i)| {
                let br = bi / mix.b;
                br * (z - 1.0)
                    - (z - b_dim).ln()
                    - a_dim / (2.0 * SQRT_2 * b_dim) * (2.0 * a_cross_i / mix.a - br) * l
            })
            .collect()
    }

    /// Fugacity coefficients (ln φ_i) and the compressibility used.
    pub fn ln_phi(&self, x: &[f64], p: f64, t: f64, root: ZRoot) -> ThermoResult<(Vec<f64>, f64)> {
        if x.len() != self.set.len() {
            return Err(ThermoError::InvalidArg {
                what: "composition length does not match component set",
            });
        }
        let mix = self.mix_params(x, t);
        let a_dim = mix.a * p / (R_GAS * R_GAS * t * t);
        let b_dim = mix.b * p / (R_GAS * t);
        let (zl, zv) = Self::z_candidates(a_dim, b_dim)?;
        let z = match root {
            ZRoot::Liquid => zl,
            ZRoot::Vapor => zv,
            ZRoot::MinGibbs => {
                if (zl - zv).abs() < 1e-12 {
                    zv
                } else {
                    // Lower Σ x_i ln φ_i wins.
                    let gl: f64 = Self::ln_phi_at_z(&mix, a_dim, b_dim, zl, &self.b)
                        .iter()
                        .zip(x.iter())
                        .map(|(lp, xi)| xi * lp)
                        .sum();
                    let gv: f64 = Self::ln_phi_at_z(&mix, a_dim, b_dim, zv, &self.b)
                        .iter()
                        .zip(x.iter())
                        .map(|(lp, xi)| xi * lp)
                        .sum();
                    if gl < gv {
                        zl
                    } else {
                        zv
                    }
                }
            }
        };
        if z - b_dim <= 0.0 {
            return Err(ThermoError::NonPhysical {
                what: "compressibility root at or below covolume",
            });
        }
        Ok((Self::ln_phi_at_z(&mix, a_dim, b_dim, z, &self.b), z))
    }

    /// Molar volume, enthalpy, entropy and mass density of one phase.
    pub fn phase_props(&self, x: &[f64], p: f64, t: f64, root: ZRoot) -> ThermoResult<PhaseProps> {
        let mix = self.mix_params(x, t);
        let b_dim = mix.b * p / (R_GAS * t);
        let (_, z) = self.ln_phi(x, p, t, root)?;
        let l = ((z + (1.0 + SQRT_2) * b_dim) / (z + (1.0 - SQRT_2) * b_dim)).ln();

        let h_dep = R_GAS * t * (z - 1.0) + (t * mix.da_dt - mix.a) / (2.0 * SQRT_2 * mix.b) * l;
        let s_dep = R_GAS * (z - b_dim).ln() + mix.da_dt / (2.0 * SQRT_2 * mix.b) * l;

        let mut h_ig = 0.0;
        let mut s_ig = 0.0;
        let mut molar_mass = 0.0;
        for (i, c) in self.set.iter().enumerate() {
            h_ig += x[i] * c.h_ig(t);
            s_ig += x[i] * c.s_ig(t);
            if x[i] > 0.0 {
                s_ig -= R_GAS * x[i] * x[i].ln();
            }
            molar_mass += x[i] * c.molar_mass;
        }
        s_ig -= R_GAS * (p / P_REF).ln();

        let v = z * R_GAS * t / p;
        Ok(PhaseProps {
            z,
            v,
            h: h_ig + h_dep,
            s: s_ig + s_dep,
            rho: molar_mass / v,
        })
    }

    /// Build a full `Phase` record, labeling the phase from its molar volume
    /// (liquid-like when v is close to the covolume) and its water content.
    pub fn make_phase(
        &self,
        composition: Composition,
        fraction: f64,
        p: f64,
        t: f64,
        root: ZRoot,
    ) -> ThermoResult<Phase> {
        let props = self.phase_props(composition.fractions(), p, t, root)?;
        let b = self.b_mix(composition.fractions());
        let kind = if props.v / b < 1.75 {
            let water_heavy = self
                .set
                .water_index()
                .map(|iw| composition.fraction(iw) > 0.5)
                .unwrap_or(false);
            if water_heavy {
                PhaseKind::Aqueous
            } else {
                PhaseKind::Liquid
            }
        } else {
            PhaseKind::Vapor
        };
        Ok(Phase {
            kind,
            fraction,
            composition,
            z_factor: props.z,
            molar_volume: props.v,
            molar_enthalpy: props.h,
            molar_entropy: props.s,
            mass_density: props.rho,
        })
    }
}
