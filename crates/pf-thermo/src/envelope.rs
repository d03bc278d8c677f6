//! Phase-envelope queries: bubble-point pressure and cricondenbar.

use rayon::prelude::*;

use crate::composition::Composition;
use crate::eos::{PengRobinson, ZRoot};
use crate::error::{ThermoError, ThermoResult};
use crate::flash::flash_pt;

const MAX_BUBBLE_ITER: usize = 200;

/// Temperature grid for the cricondenbar scan [K].
const SCAN_T_LO: f64 = 200.0;
const SCAN_T_HI: f64 = 620.0;
const SCAN_T_STEP: f64 = 10.0;
/// Pressure scan bounds [Pa] and geometric descent factor.
const SCAN_P_HI: f64 = 300.0e5;
const SCAN_P_LO: f64 = 0.5e5;
const SCAN_P_FACTOR: f64 = 0.93;

/// Bubble-point pressure of a liquid of composition `x` at temperature `t`.
///
/// Successive substitution: at each step the incipient vapor is
/// y_i = K_i x_i with K from the fugacity-coefficient ratio, and the
/// pressure is scaled by Σ y_i until it reaches one.
pub fn bubble_pressure(pr: &PengRobinson, x: &Composition, t: f64) -> ThermoResult<f64> {
    if !(t.is_finite() && t > 0.0) {
        return Err(ThermoError::NonPhysical {
            what: "temperature must be positive and finite",
        });
    }
    if x.len() != pr.components().len() {
        return Err(ThermoError::InvalidArg {
            what: "composition length does not match component set",
        });
    }

    // Raoult/Wilson starting point.
    let mut p: f64 = x
        .fractions()
        .iter()
        .zip(pr.components().iter())
        .map(|(xi, c)| xi * c.pc * (5.373 * (1.0 + c.acentric) * (1.0 - c.tc / t)).exp())
        .sum();
    p = p.clamp(1.0e3, 5.0e8);

    let xf = x.fractions();
    let mut y: Vec<f64> = xf.to_vec();
    for _ in 0..MAX_BUBBLE_ITER {
        let (ln_phi_l, _) = pr.ln_phi(xf, p, t, ZRoot::Liquid)?;
        let (ln_phi_v, _) = pr.ln_phi(&y, p, t, ZRoot::Vapor)?;
        let ky: Vec<f64> = xf
            .iter()
            .enumerate()
            .map(|(i, xi)| xi * (ln_phi_l[i] - ln_phi_v[i]).exp())
            .collect();
        let s: f64 = ky.iter().sum();
        if !(s.is_finite() && s > 0.0) {
            return Err(ThermoError::NonPhysical {
                what: "bubble-point K-value sum",
            });
        }
        y = ky.iter().map(|v| v / s).collect();
        let p_new = (p * s).clamp(1.0e3, 5.0e8);
        if (s - 1.0).abs() < 1.0e-8 {
            return Ok(p_new);
        }
        p = p_new;
    }
    Err(ThermoError::ConvergenceFailed {
        what: "bubble pressure",
    })
}

fn is_two_phase(pr: &PengRobinson, z: &Composition, p: f64, t: f64) -> bool {
    // Flash failures near the critical region count as "not two-phase";
    // the scan simply moves on.
    flash_pt(pr, z, p, t)
        .map(|s| !s.is_single_phase())
        .unwrap_or(false)
}

/// Highest pressure at which the mixture is two-phase at temperature `t`.
fn envelope_top_at(pr: &PengRobinson, z: &Composition, t: f64) -> Option<f64> {
    let mut prev = SCAN_P_HI;
    let mut p = SCAN_P_HI;
    while p > SCAN_P_LO {
        if is_two_phase(pr, z, p, t) {
            let (mut lo, mut hi) = (p, prev);
            for _ in 0..50 {
                let mid = 0.5 * (lo + hi);
                if is_two_phase(pr, z, mid, t) {
                    lo = mid;
                } else {
                    hi = mid;
                }
                if hi - lo < 100.0 {
                    break;
                }
            }
            return Some(0.5 * (lo + hi));
        }
        prev = p;
        p *= SCAN_P_FACTOR;
    }
    None
}

/// Cricondenbar: the highest pressure of the two-phase envelope over all
/// temperatures, located by a parallel grid scan with per-point refinement.
pub fn cricondenbar(pr: &PengRobinson, z: &Composition) -> ThermoResult<f64> {
    if z.len() != pr.components().len() {
        return Err(ThermoError::InvalidArg {
            what: "composition length does not match component set",
        });
    }
    let points = ((SCAN_T_HI - SCAN_T_LO) / SCAN_T_STEP) as usize + 1;
    let best = (0..points)
        .into_par_iter()
        .filter_map(|i| envelope_top_at(pr, z, SCAN_T_LO + SCAN_T_STEP * i as f64))
        .max_by(f64::total_cmp);
    best.ok_or(ThermoError::Infeasible {
        what: "no two-phase region found in the scan window",
    })
}
