//! Stream mixer: per-component molar sum with an enthalpy-conserving flash.

use pf_thermo::{Composition, PropertyProvider};

use crate::error::{OpError, OpResult};
use crate::state::StreamState;

/// Combine streams at a shared pressure. Zero-flow inlets are skipped so
/// dead separator outlets do not poison the balance; with every inlet dead
/// the outlet is a zero-flow copy of the first.
pub(crate) fn merge_states(
    provider: &dyn PropertyProvider,
    inlets: &[&StreamState],
    p_out: Option<f64>,
) -> OpResult<StreamState> {
    if inlets.is_empty() {
        return Err(OpError::InletArity {
            expected: 1,
            got: 0,
        });
    }
    let live: Vec<&StreamState> = inlets
        .iter()
        .copied()
        .filter(|s| !s.is_zero_flow())
        .collect();
    if live.is_empty() {
        let mut out = inlets[0].clone();
        out.molar_flow = 0.0;
        return Ok(out);
    }

    let p = match p_out {
        Some(p) if p.is_finite() && p > 0.0 => p,
        Some(_) => {
            return Err(OpError::InvalidSpec {
                what: "mixer outlet pressure must be positive",
            })
        }
        None => live
            .iter()
            .map(|s| s.pressure)
            .fold(f64::INFINITY, f64::min),
    };

    let n_comp = live[0].composition.len();
    let mut flows = vec![0.0; n_comp];
    let mut total = 0.0;
    let mut h_flow = 0.0;
    for s in &live {
        for (i, f) in s.component_flows().iter().enumerate() {
            flows[i] += f;
        }
        total += s.molar_flow;
        h_flow += s.molar_flow * s.molar_enthalpy()?;
    }
    let composition = Composition::new(flows)?;
    let h_mix = h_flow / total;
    let (t, split) = provider.flash_ph(&composition, p, h_mix)?;
    Ok(StreamState {
        composition,
        pressure: p,
        temperature: t,
        molar_flow: total,
        split: Some(split),
    })
}

/// N-to-1 adiabatic mixer. Outlet pressure defaults to the lowest live
/// inlet pressure.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mixer {
    /// Explicit outlet pressure [Pa]; `None` picks the lowest inlet.
    pub p_out: Option<f64>,
}

impl Mixer {
    pub fn at_pressure(p_out: f64) -> Self {
        Self { p_out: Some(p_out) }
    }

    pub fn solve(
        &self,
        provider: &dyn PropertyProvider,
        inlets: &[&StreamState],
    ) -> OpResult<StreamState> {
        merge_states(provider, inlets, self.p_out)
    }
}
