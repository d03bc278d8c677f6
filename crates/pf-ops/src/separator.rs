//! Phase separators: two-phase gas/liquid and three-phase gas/oil/water.

use pf_thermo::{Phase, PhaseKind, PropertyProvider};

use crate::error::{OpError, OpResult};
use crate::mixer::merge_states;
use crate::state::StreamState;

/// Build one separator outlet from a set of phases, falling back to a
/// zero-flow stream carrying the feed composition when no phase matched.
fn phase_outlet(
    provider: &dyn PropertyProvider,
    feed: &StreamState,
    phases: &[&Phase],
) -> OpResult<StreamState> {
    let frac: f64 = phases.iter().map(|p| p.fraction).sum();
    if frac <= 0.0 {
        let mut dead = feed.clone();
        dead.molar_flow = 0.0;
        return Ok(dead);
    }
    let n = feed.composition.len();
    let mut x = vec![0.0; n];
    for p in phases {
        for (i, xi) in p.composition.fractions().iter().enumerate() {
            x[i] += p.fraction * xi;
        }
    }
    StreamState::flashed(
        provider,
        pf_thermo::Composition::new(x)?,
        feed.pressure,
        feed.temperature,
        feed.molar_flow * frac,
    )
}

/// Two-phase separator: vapor to the gas outlet, everything else (liquid
/// and any free water) to the liquid outlet.
#[derive(Debug, Clone, Copy, Default)]
pub struct Separator;

/// Gas and liquid outlets of a two-phase separation.
#[derive(Debug, Clone)]
pub struct Separated {
    pub gas: StreamState,
    pub liquid: StreamState,
}

impl Separator {
    pub fn solve(
        &self,
        provider: &dyn PropertyProvider,
        inlet: &StreamState,
    ) -> OpResult<Separated> {
        let split = inlet.split()?.clone();
        let vapor: Vec<&Phase> = split
            .phases
            .iter()
            .filter(|p| p.kind == PhaseKind::Vapor)
            .collect();
        let heavy: Vec<&Phase> = split
            .phases
            .iter()
            .filter(|p| p.kind != PhaseKind::Vapor)
            .collect();
        Ok(Separated {
            gas: phase_outlet(provider, inlet, &vapor)?,
            liquid: phase_outlet(provider, inlet, &heavy)?,
        })
    }
}

/// Three-phase separator with open fan-in: merges all inlets at the lowest
/// live inlet pressure, flashes, decants free water.
#[derive(Debug, Clone, Copy, Default)]
pub struct Separator3;

/// Gas, oil and water outlets of a three-phase separation.
#[derive(Debug, Clone)]
pub struct Separated3 {
    pub gas: StreamState,
    pub oil: StreamState,
    pub water: StreamState,
}

impl Separator3 {
    pub fn solve(
        &self,
        provider: &dyn PropertyProvider,
        inlets: &[&StreamState],
    ) -> OpResult<Separated3> {
        if inlets.is_empty() {
            return Err(OpError::InletArity {
                expected: 1,
                got: 0,
            });
        }
        let merged = merge_states(provider, inlets, None)?;
        let split = match merged.split.as_ref() {
            Some(s) => {
                provider.three_phase(s, merged.pressure, merged.temperature)?
            }
            None => return Err(OpError::UnflashedInlet),
        };

        let pick = |kind: PhaseKind| -> Vec<&Phase> {
            split.phases.iter().filter(|p| p.kind == kind).collect()
        };
        Ok(Separated3 {
            gas: phase_outlet(provider, &merged, &pick(PhaseKind::Vapor))?,
            oil: phase_outlet(provider, &merged, &pick(PhaseKind::Liquid))?,
            water: phase_outlet(provider, &merged, &pick(PhaseKind::Aqueous))?,
        })
    }
}
