//! Closed set of unit-operation kinds with a single solve dispatch.

use pf_thermo::PropertyProvider;

use crate::compressor::Compressor;
use crate::error::{OpError, OpResult};
use crate::heat::{Cooler, Heater};
use crate::mixer::Mixer;
use crate::pump::Pump;
use crate::recycle::Recycle;
use crate::saturator::Saturator;
use crate::separator::{Separator, Separator3};
use crate::source::Source;
use crate::state::StreamState;
use crate::valve::Valve;

/// How many inlets a unit kind accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exactly(usize),
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(&self, got: usize) -> bool {
        match *self {
            Arity::Exactly(n) => got == n,
            Arity::AtLeast(n) => got >= n,
        }
    }

    fn expected(&self) -> usize {
        match *self {
            Arity::Exactly(n) | Arity::AtLeast(n) => n,
        }
    }
}

/// Everything a unit solve can produce: outlet states in declaration order
/// plus the recorded metrics for the kinds that have them.
#[derive(Debug, Clone, Default)]
pub struct Solved {
    pub outlets: Vec<StreamState>,
    /// Shaft power [W] (pumps, compressors).
    pub power: Option<f64>,
    /// Heat duty [W] (heaters, coolers).
    pub duty: Option<f64>,
    /// Tear convergence delta (recycles).
    pub delta: Option<f64>,
}

/// The closed set of unit operations a flowsheet can contain.
#[derive(Debug, Clone)]
pub enum UnitKind {
    Source(Source),
    Saturator(Saturator),
    Heater(Heater),
    Cooler(Cooler),
    Valve(Valve),
    Pump(Pump),
    Compressor(Compressor),
    Separator(Separator),
    Separator3(Separator3),
    Mixer(Mixer),
    Recycle(Recycle),
}

impl UnitKind {
    /// Kind name for logs and error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            UnitKind::Source(_) => "source",
            UnitKind::Saturator(_) => "saturator",
            UnitKind::Heater(_) => "heater",
            UnitKind::Cooler(_) => "cooler",
            UnitKind::Valve(_) => "valve",
            UnitKind::Pump(_) => "pump",
            UnitKind::Compressor(_) => "compressor",
            UnitKind::Separator(_) => "separator",
            UnitKind::Separator3(_) => "separator3",
            UnitKind::Mixer(_) => "mixer",
            UnitKind::Recycle(_) => "recycle",
        }
    }

    pub fn inlet_arity(&self) -> Arity {
        match self {
            UnitKind::Source(_) => Arity::Exactly(0),
            UnitKind::Separator3(_) | UnitKind::Mixer(_) => Arity::AtLeast(1),
            _ => Arity::Exactly(1),
        }
    }

    pub fn n_outlets(&self) -> usize {
        match self {
            UnitKind::Separator(_) => 2,
            UnitKind::Separator3(_) => 3,
            _ => 1,
        }
    }

    /// Evaluate the unit against its (already flashed) inlets.
    ///
    /// `tear` is the current tear-stream guess; only Recycle units use it.
    pub fn solve(
        &self,
        provider: &dyn PropertyProvider,
        inlets: &[&StreamState],
        tear: Option<&StreamState>,
    ) -> OpResult<Solved> {
        let arity = self.inlet_arity();
        if !arity.accepts(inlets.len()) {
            return Err(OpError::InletArity {
                expected: arity.expected(),
                got: inlets.len(),
            });
        }

        tracing::trace!(kind = self.kind_name(), inlets = inlets.len(), "solve unit");

        match self {
            UnitKind::Source(op) => Ok(Solved {
                outlets: vec![op.solve(provider)?],
                ..Default::default()
            }),
            UnitKind::Saturator(op) => Ok(Solved {
                outlets: vec![op.solve(provider, inlets[0])?],
                ..Default::default()
            }),
            UnitKind::Heater(op) => {
                let heated = op.solve(provider, inlets[0])?;
                Ok(Solved {
                    outlets: vec![heated.outlet],
                    duty: Some(heated.duty),
                    ..Default::default()
                })
            }
            UnitKind::Cooler(op) => {
                let heated = op.solve(provider, inlets[0])?;
                Ok(Solved {
                    outlets: vec![heated.outlet],
                    duty: Some(heated.duty),
                    ..Default::default()
                })
            }
            UnitKind::Valve(op) => Ok(Solved {
                outlets: vec![op.solve(provider, inlets[0])?],
                ..Default::default()
            }),
            UnitKind::Pump(op) => {
                let driven = op.solve(provider, inlets[0])?;
                Ok(Solved {
                    outlets: vec![driven.outlet],
                    power: Some(driven.power),
                    ..Default::default()
                })
            }
            UnitKind::Compressor(op) => {
                let driven = op.solve(provider, inlets[0])?;
                Ok(Solved {
                    outlets: vec![driven.outlet],
                    power: Some(driven.power),
                    ..Default::default()
                })
            }
            UnitKind::Separator(op) => {
                let sep = op.solve(provider, inlets[0])?;
                Ok(Solved {
                    outlets: vec![sep.gas, sep.liquid],
                    ..Default::default()
                })
            }
            UnitKind::Separator3(op) => {
                let sep = op.solve(provider, inlets)?;
                Ok(Solved {
                    outlets: vec![sep.gas, sep.oil, sep.water],
                    ..Default::default()
                })
            }
            UnitKind::Mixer(op) => Ok(Solved {
                outlets: vec![op.solve(provider, inlets)?],
                ..Default::default()
            }),
            UnitKind::Recycle(op) => {
                let tear = tear.ok_or(OpError::InvalidSpec {
                    what: "recycle unit solved without a tear guess",
                })?;
                let upd = op.solve(provider, inlets[0], tear)?;
                Ok(Solved {
                    outlets: vec![upd.guess],
                    delta: Some(upd.delta),
                    ..Default::default()
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pf_thermo::{ComponentData, ComponentSet, Composition, PengRobinsonProvider};

    fn provider() -> PengRobinsonProvider {
        PengRobinsonProvider::new(
            ComponentSet::new(vec![ComponentData::library("methane").unwrap()]).unwrap(),
        )
    }

    #[test]
    fn arity_enforced_by_dispatch() {
        let pr = provider();
        let src = Source::new(Composition::new(vec![1.0]).unwrap(), 10.0e5, 300.0, 1.0).unwrap();
        let state = src.solve(&pr).unwrap();
        let kind = UnitKind::Source(src);
        assert!(kind.solve(&pr, &[&state], None).is_err());
        assert!(kind.solve(&pr, &[], None).is_ok());
    }

    #[test]
    fn metrics_routed_per_kind() {
        let pr = provider();
        let feed = StreamState::flashed(&pr, Composition::new(vec![1.0]).unwrap(), 10.0e5, 300.0, 1.0)
            .unwrap();

        let heater = UnitKind::Heater(crate::heat::Heater::to_temperature(330.0));
        let solved = heater.solve(&pr, &[&feed], None).unwrap();
        assert!(solved.duty.is_some() && solved.power.is_none());

        let comp = UnitKind::Compressor(Compressor::new(30.0e5, 0.75).unwrap());
        let solved = comp.solve(&pr, &[&feed], None).unwrap();
        assert!(solved.power.is_some() && solved.duty.is_none());

        let rec = UnitKind::Recycle(Recycle::default());
        assert!(rec.solve(&pr, &[&feed], None).is_err());
        let solved = rec.solve(&pr, &[&feed], Some(&feed)).unwrap();
        assert_eq!(solved.delta, Some(0.0));
    }
}
