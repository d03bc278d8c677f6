//! Flash kernels: PT, PH, PS, and the free-water decant.

use crate::composition::Composition;
use crate::eos::{PengRobinson, ZRoot};
use crate::error::{ThermoError, ThermoResult};
use crate::phase::{Phase, PhaseKind, PhaseSplit};

const MAX_SS_ITER: usize = 200;
const K_TOL: f64 = 1.0e-9;
/// Below this distance of every K from 1 the flash has collapsed onto the
/// trivial solution and the mixture is single phase.
const TRIVIAL_TOL: f64 = 1.0e-4;

/// Temperature bracket for the PH/PS searches [K].
const T_MIN: f64 = 150.0;
const T_MAX: f64 = 1200.0;

/// Water mole fraction tolerated in a hydrocarbon liquid before the excess
/// decants as a free aqueous phase.
const WATER_SOLUBILITY_FLOOR: f64 = 1.0e-3;

/// Water vapor pressure [Pa], DIPPR 101 form, valid 273..=647 K.
pub fn water_psat(t: f64) -> f64 {
    (73.649 - 7258.2 / t - 7.3037 * t.ln() + 4.1653e-6 * t * t).exp()
}

/// Water mole fraction of a vapor at saturation, Raoult estimate.
pub fn water_saturation_y(p: f64, t: f64) -> f64 {
    (water_psat(t) / p).min(1.0)
}

fn check_pt(p: f64, t: f64) -> ThermoResult<()> {
    if !(p.is_finite() && p > 0.0) {
        return Err(ThermoError::NonPhysical {
            what: "pressure must be positive and finite",
        });
    }
    if !(t.is_finite() && t > 0.0) {
        return Err(ThermoError::NonPhysical {
            what: "temperature must be positive and finite",
        });
    }
    Ok(())
}

/// Wilson correlation K-value initial estimate.
fn wilson_k(pr: &PengRobinson, p: f64, t: f64) -> Vec<f64> {
    pr.components()
        .iter()
        .map(|c| c.pc / p * (5.373 * (1.0 + c.acentric) * (1.0 - c.tc / t)).exp())
        .collect()
}

/// Solve the Rachford-Rice equation for the vapor fraction.
///
/// The caller guarantees f(0) > 0 and f(1) < 0, so a root exists in (0, 1);
/// Newton steps are taken when they stay inside the shrinking bisection
/// bracket.
fn rachford_rice(z: &[f64], k: &[f64]) -> ThermoResult<f64> {
    let mut lo = 0.0_f64;
    let mut hi = 1.0_f64;
    let mut beta = 0.5;
    for _ in 0..100 {
        let mut f = 0.0;
        let mut df = 0.0;
        for (zi, ki) in z.iter().zip(k.iter()) {
            let d = ki - 1.0;
            let denom = 1.0 + beta * d;
            f += zi * d / denom;
            df -= zi * d * d / (denom * denom);
        }
        if f.abs() < 1.0e-12 {
            return Ok(beta);
        }
        if f > 0.0 {
            lo = beta;
        } else {
            hi = beta;
        }
        let newton = beta - f / df;
        beta = if df != 0.0 && newton > lo && newton < hi {
            newton
        } else {
            0.5 * (lo + hi)
        };
        if hi - lo < 1.0e-14 {
            return Ok(beta);
        }
    }
    Err(ThermoError::ConvergenceFailed {
        what: "rachford-rice",
    })
}

fn build_phase(
    pr: &PengRobinson,
    kind: PhaseKind,
    fraction: f64,
    composition: Composition,
    p: f64,
    t: f64,
    root: ZRoot,
) -> ThermoResult<Phase> {
    let props = pr.phase_props(composition.fractions(), p, t, root)?;
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

fn single_phase(
    pr: &PengRobinson,
    z: &Composition,
    p: f64,
    t: f64,
) -> ThermoResult<PhaseSplit> {
    Ok(PhaseSplit::single(pr.make_phase(
        z.clone(),
        1.0,
        p,
        t,
        ZRoot::MinGibbs,
    )?))
}

/// Two-phase isothermal flash at (P, T).
///
/// Successive substitution on K-values with Wilson initialization. Returns a
/// single-phase split when the Rachford-Rice bounds put the feed outside the
/// two-phase region or when the iteration collapses onto K = 1.
pub fn flash_pt(
    pr: &PengRobinson,
    z: &Composition,
    p: f64,
    t: f64,
) -> ThermoResult<PhaseSplit> {
    check_pt(p, t)?;
    if z.len() != pr.components().len() {
        return Err(ThermoError::InvalidArg {
            what: "composition length does not match component set",
        });
    }

    let zf = z.fractions();
    let mut k = wilson_k(pr, p, t);

    for _ in 0..MAX_SS_ITER {
        let f0: f64 = zf.iter().zip(k.iter()).map(|(zi, ki)| zi * (ki - 1.0)).sum();
        let f1: f64 = zf
            .iter()
            .zip(k.iter())
            .map(|(zi, ki)| zi * (ki - 1.0) / ki)
            .sum();
        if f0 <= 0.0 || f1 >= 0.0 {
            // Subcooled liquid (f0 <= 0) or superheated vapor (f1 >= 0).
            return single_phase(pr, z, p, t);
        }

        let beta = rachford_rice(zf, &k)?;
        if !(1.0e-10..=1.0 - 1.0e-10).contains(&beta) {
            return single_phase(pr, z, p, t);
        }

        let x: Vec<f64> = zf
            .iter()
            .zip(k.iter())
            .map(|(zi, ki)| zi / (1.0 + beta * (ki - 1.0)))
            .collect();
        let y: Vec<f64> = x.iter().zip(k.iter()).map(|(xi, ki)| xi * ki).collect();
        let xs: f64 = x.iter().sum();
        let ys: f64 = y.iter().sum();
        let xn: Vec<f64> = x.iter().map(|v| v / xs).collect();
        let yn: Vec<f64> = y.iter().map(|v| v / ys).collect();

        let (ln_phi_l, _) = pr.ln_phi(&xn, p, t, ZRoot::Liquid)?;
        let (ln_phi_v, _) = pr.ln_phi(&yn, p, t, ZRoot::Vapor)?;

        let mut err = 0.0_f64;
        let mut trivial = 0.0_f64;
        let mut k_new = Vec::with_capacity(k.len());
        for i in 0..k.len() {
            let kn = (ln_phi_l[i] - ln_phi_v[i]).exp();
            if zf[i] > 0.0 {
                err = err.max((kn.ln() - k[i].ln()).abs());
                trivial = trivial.max((kn - 1.0).abs());
            }
            k_new.push(kn);
        }
        k = k_new;

        if trivial < TRIVIAL_TOL {
            return single_phase(pr, z, p, t);
        }
        if err < K_TOL {
            let liquid = build_phase(
                pr,
                PhaseKind::Liquid,
                1.0 - beta,
                Composition::new(xn)?,
                p,
                t,
                ZRoot::Liquid,
            )?;
            let vapor = build_phase(
                pr,
                PhaseKind::Vapor,
                beta,
                Composition::new(yn)?,
                p,
                t,
                ZRoot::Vapor,
            )?;
            return Ok(PhaseSplit {
                phases: vec![vapor, liquid],
            });
        }
    }
    Err(ThermoError::ConvergenceFailed { what: "pt flash" })
}

/// Flash at fixed pressure and mixture molar enthalpy [J/mol].
///
/// Mixture enthalpy is monotone in temperature, so a plain bisection over a
/// wide bracket is robust; returns the solved temperature with the split.
pub fn flash_ph(
    pr: &PengRobinson,
    z: &Composition,
    p: f64,
    h: f64,
) -> ThermoResult<(f64, PhaseSplit)> {
    flash_target(pr, z, p, h, "ph flash", |split| split.mixture_enthalpy())
}

/// Flash at fixed pressure and mixture molar entropy [J/(mol·K)].
pub fn flash_ps(
    pr: &PengRobinson,
    z: &Composition,
    p: f64,
    s: f64,
) -> ThermoResult<(f64, PhaseSplit)> {
    flash_target(pr, z, p, s, "ps flash", |split| split.mixture_entropy())
}

fn flash_target(
    pr: &PengRobinson,
    z: &Composition,
    p: f64,
    target: f64,
    kernel: &'static str,
    value: impl Fn(&PhaseSplit) -> f64,
) -> ThermoResult<(f64, PhaseSplit)> {
    if !target.is_finite() {
        return Err(ThermoError::NonPhysical {
            what: "flash target must be finite",
        });
    }
    let mut lo = T_MIN;
    let mut hi = T_MAX;
    let v_lo = value(&flash_pt(pr, z, p, lo)?);
    let v_hi = value(&flash_pt(pr, z, p, hi)?);
    if target < v_lo || target > v_hi {
        return Err(ThermoError::Infeasible {
            what: "flash target outside the temperature bracket",
        });
    }

    let scale = 1.0_f64.max(target.abs());
    for _ in 0..100 {
        let mid = 0.5 * (lo + hi);
        let split = flash_pt(pr, z, p, mid)?;
        let v = value(&split);
        if (v - target).abs() < 1.0e-9 * scale || hi - lo < 1.0e-7 {
            return Ok((mid, split));
        }
        if v < target {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    Err(ThermoError::ConvergenceFailed { what: kernel })
}

/// Decant free water from the hydrocarbon liquid of a flash result.
///
/// Water above the solubility floor leaves the liquid as a (nearly) pure
/// aqueous phase; per-component molar amounts are conserved exactly.
pub fn three_phase(
    pr: &PengRobinson,
    split: &PhaseSplit,
    p: f64,
    t: f64,
) -> ThermoResult<PhaseSplit> {
    check_pt(p, t)?;
    let iw = match pr.components().water_index() {
        Some(iw) => iw,
        None => return Ok(split.clone()),
    };
    let liquid = match split.liquid() {
        Some(l) if l.fraction > 0.0 => l,
        _ => return Ok(split.clone()),
    };
    let x_w = liquid.composition.fraction(iw);
    if x_w <= WATER_SOLUBILITY_FLOOR {
        return Ok(split.clone());
    }

    let l_tot = liquid.fraction;
    // Shrink the liquid until its water content sits at the floor; the
    // surplus becomes pure water. The split l' = L(1-x_w)/(1-x_floor)
    // conserves every component.
    let l_new = l_tot * (1.0 - x_w) / (1.0 - WATER_SOLUBILITY_FLOOR);
    let a_new = l_tot - l_new;

    let n = pr.components().len();
    let mut x_liq = vec![0.0; n];
    for i in 0..n {
        if i == iw {
            x_liq[i] = WATER_SOLUBILITY_FLOOR;
        } else {
            x_liq[i] = l_tot * liquid.composition.fraction(i) / l_new;
        }
    }
    let mut x_aq = vec![0.0; n];
    x_aq[iw] = 1.0;

    let mut phases = Vec::with_capacity(3);
    if let Some(v) = split.vapor() {
        phases.push(v.clone());
    }
    phases.push(build_phase(
        pr,
        PhaseKind::Liquid,
        l_new,
        Composition::new(x_liq)?,
        p,
        t,
        ZRoot::Liquid,
    )?);
    phases.push(build_phase(
        pr,
        PhaseKind::Aqueous,
        a_new,
        Composition::new(x_aq)?,
        p,
        t,
        ZRoot::Liquid,
    )?);
    Ok(PhaseSplit { phases })
}


#[cfg(test)]
mod proptests {
    use super::rachford_rice;
    use proptest::prelude::*;

    proptest! {
        /// Whenever the feed sits strictly inside the two-phase bounds
        /// (f(0) > 0 and f(1) < 0), the solver finds an interior root.
        #[test]
        fn interior_root_when_bounds_allow(
            z0 in 0.05_f64..0.95,
            k0 in 1.5_f64..20.0,
            k1 in 0.05_f64..0.9,
        ) {
            let z = [z0, 1.0 - z0];
            let k = [k0, k1];
            let f0: f64 = z.iter().zip(k.iter()).map(|(zi, ki)| zi * (ki - 1.0)).sum();
            let f1: f64 = z
                .iter()
                .zip(k.iter())
                .map(|(zi, ki)| zi * (ki - 1.0) / ki)
                .sum();
            prop_assume!(f0 > 1e-9 && f1 < -1e-9);

            let beta = rachford_rice(&z, &k).unwrap();
            prop_assert!(beta > 0.0 && beta < 1.0);
            let f: f64 = z
                .iter()
                .zip(k.iter())
                .map(|(zi, ki)| zi * (ki - 1.0) / (1.0 + beta * (ki - 1.0)))
                .sum();
            prop_assert!(f.abs() < 1e-8);
        }
    }
}
