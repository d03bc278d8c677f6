//! Incremental flowsheet builder.

use pf_core::{StreamId, UnitId};
use pf_ops::UnitKind;
use tracing::debug;

use crate::error::{GraphError, GraphResult};
use crate::graph::{Flowsheet, Stream, TearGuess, Unit};
use crate::order;

/// Builds a flowsheet incrementally, then validates and freezes it.
///
/// Streams are declared first, units connect them; `build()` checks names,
/// arities, connectivity and tear ownership and computes the evaluation
/// order.
#[derive(Debug, Default)]
pub struct FlowsheetBuilder {
    streams: Vec<Stream>,
    units: Vec<Unit>,
}

impl FlowsheetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an ordinary stream.
    pub fn add_stream(&mut self, name: impl Into<String>) -> StreamId {
        let id = StreamId::from_index(self.streams.len() as u32);
        self.streams.push(Stream {
            id,
            name: name.into(),
            producer: None,
            is_tear: false,
            guess: None,
        });
        id
    }

    /// Declare a tear stream with its initial guess. The stream must be
    /// produced by a Recycle unit and consumed somewhere downstream.
    pub fn add_tear_stream(&mut self, name: impl Into<String>, guess: TearGuess) -> StreamId {
        let id = StreamId::from_index(self.streams.len() as u32);
        self.streams.push(Stream {
            id,
            name: name.into(),
            producer: None,
            is_tear: true,
            guess: Some(guess),
        });
        id
    }

    /// Add a unit with its ordered inlet and outlet streams. The unit
    /// becomes the producer of each outlet.
    pub fn add_unit(
        &mut self,
        name: impl Into<String>,
        kind: UnitKind,
        inlets: &[StreamId],
        outlets: &[StreamId],
    ) -> GraphResult<UnitId> {
        let name = name.into();
        let id = UnitId::from_index(self.units.len() as u32);
        for &sid in inlets.iter().chain(outlets) {
            if sid.index() as usize >= self.streams.len() {
                return Err(GraphError::UnknownStream);
            }
        }
        for &sid in outlets {
            let s = &mut self.streams[sid.index() as usize];
            if s.producer.is_some() {
                return Err(GraphError::StreamAlreadyProduced {
                    stream: s.name.clone(),
                });
            }
            s.producer = Some(id);
        }
        self.units.push(Unit {
            id,
            name,
            kind,
            inlets: inlets.to_vec(),
            outlets: outlets.to_vec(),
        });
        Ok(id)
    }

    /// Validate the flowsheet and freeze it.
    pub fn build(self) -> GraphResult<Flowsheet> {
        let Self { streams, units } = self;

        for (i, s) in streams.iter().enumerate() {
            if streams[..i].iter().any(|o| o.name == s.name) {
                return Err(GraphError::DuplicateStreamName(s.name.clone()));
            }
        }
        for (i, u) in units.iter().enumerate() {
            if units[..i].iter().any(|o| o.name == u.name) {
                return Err(GraphError::DuplicateUnitName(u.name.clone()));
            }
        }

        for u in &units {
            let arity = u.kind.inlet_arity();
            if !arity.accepts(u.inlets.len()) {
                return Err(GraphError::InletArity {
                    unit: u.name.clone(),
                    expected: match arity {
                        pf_ops::Arity::Exactly(n) | pf_ops::Arity::AtLeast(n) => n,
                    },
                    got: u.inlets.len(),
                });
            }
            if u.outlets.len() != u.kind.n_outlets() {
                return Err(GraphError::OutletArity {
                    unit: u.name.clone(),
                    expected: u.kind.n_outlets(),
                    got: u.outlets.len(),
                });
            }
            for &sid in &u.inlets {
                let s = &streams[sid.index() as usize];
                if s.producer.is_none() && !s.is_tear {
                    return Err(GraphError::UnconnectedInlet {
                        unit: u.name.clone(),
                        stream: s.name.clone(),
                    });
                }
            }
        }

        let mut tears = Vec::new();
        for s in &streams {
            if !s.is_tear {
                continue;
            }
            let owner = s.producer.map(|p| &units[p.index() as usize]);
            match owner {
                Some(u) if matches!(u.kind, UnitKind::Recycle(_)) => {}
                _ => {
                    return Err(GraphError::TearNotOwnedByRecycle {
                        stream: s.name.clone(),
                    })
                }
            }
            if s.guess.is_none() {
                return Err(GraphError::TearWithoutGuess {
                    stream: s.name.clone(),
                });
            }
            if !units.iter().any(|u| u.inlets.contains(&s.id)) {
                return Err(GraphError::DanglingTear {
                    stream: s.name.clone(),
                });
            }
            tears.push(s.id);
        }
        for u in &units {
            if matches!(u.kind, UnitKind::Recycle(_))
                && !streams[u.outlets[0].index() as usize].is_tear
            {
                return Err(GraphError::RecycleWithoutTear {
                    unit: u.name.clone(),
                });
            }
        }

        let order = order::evaluation_order(&units, &streams)?;
        debug!(
            units = units.len(),
            streams = streams.len(),
            tears = tears.len(),
            "flowsheet built"
        );
        Ok(Flowsheet {
            streams,
            units,
            order,
            tears,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pf_ops::{Heater, Mixer, Recycle, Separator, Source, Valve};
    use pf_thermo::Composition;

    fn source_kind() -> UnitKind {
        UnitKind::Source(
            Source::new(Composition::new(vec![1.0]).unwrap(), 50.0e5, 300.0, 10.0).unwrap(),
        )
    }

    fn guess() -> TearGuess {
        TearGuess {
            composition: Composition::new(vec![1.0]).unwrap(),
            pressure: 10.0e5,
            temperature: 300.0,
            molar_flow: 0.0,
        }
    }

    #[test]
    fn linear_chain_orders_by_flow_direction() {
        let mut b = FlowsheetBuilder::new();
        let feed = b.add_stream("feed");
        let hot = b.add_stream("hot");
        let gas = b.add_stream("gas");
        let liq = b.add_stream("liq");
        // Declare the separator before the heater to prove ordering comes
        // from topology, not declaration.
        let sep = b
            .add_unit(
                "sep",
                UnitKind::Separator(Separator),
                &[hot],
                &[gas, liq],
            )
            .unwrap();
        let src = b.add_unit("src", source_kind(), &[], &[feed]).unwrap();
        let htr = b
            .add_unit(
                "htr",
                UnitKind::Heater(Heater::to_temperature(350.0)),
                &[feed],
                &[hot],
            )
            .unwrap();
        let fs = b.build().unwrap();
        assert_eq!(fs.evaluation_order(), &[src, htr, sep]);
        assert!(fs.is_acyclic());
    }

    #[test]
    fn duplicate_names_rejected() {
        let mut b = FlowsheetBuilder::new();
        b.add_stream("s");
        b.add_stream("s");
        assert!(matches!(
            b.build(),
            Err(GraphError::DuplicateStreamName(_))
        ));
    }

    #[test]
    fn double_producer_rejected() {
        let mut b = FlowsheetBuilder::new();
        let s = b.add_stream("s");
        b.add_unit("a", source_kind(), &[], &[s]).unwrap();
        assert!(matches!(
            b.add_unit("b", source_kind(), &[], &[s]),
            Err(GraphError::StreamAlreadyProduced { .. })
        ));
    }

    #[test]
    fn unconnected_inlet_rejected() {
        let mut b = FlowsheetBuilder::new();
        let nowhere = b.add_stream("nowhere");
        let out = b.add_stream("out");
        b.add_unit(
            "v",
            UnitKind::Valve(Valve::new(1.0e5).unwrap()),
            &[nowhere],
            &[out],
        )
        .unwrap();
        assert!(matches!(
            b.build(),
            Err(GraphError::UnconnectedInlet { .. })
        ));
    }

    #[test]
    fn untorn_cycle_rejected() {
        let mut b = FlowsheetBuilder::new();
        let feed = b.add_stream("feed");
        let back = b.add_stream("back");
        let mixed = b.add_stream("mixed");
        b.add_unit("src", source_kind(), &[], &[feed]).unwrap();
        b.add_unit(
            "mix",
            UnitKind::Mixer(Mixer::default()),
            &[feed, back],
            &[mixed],
        )
        .unwrap();
        b.add_unit(
            "v",
            UnitKind::Valve(Valve::new(1.0e5).unwrap()),
            &[mixed],
            &[back],
        )
        .unwrap();
        assert!(matches!(
            b.build(),
            Err(GraphError::CyclicAfterTearRemoval { .. })
        ));
    }

    #[test]
    fn torn_cycle_builds_and_orders() {
        let mut b = FlowsheetBuilder::new();
        let feed = b.add_stream("feed");
        let tear = b.add_tear_stream("tear", guess());
        let mixed = b.add_stream("mixed");
        let out = b.add_stream("loop out");
        let src = b.add_unit("src", source_kind(), &[], &[feed]).unwrap();
        let mix = b
            .add_unit(
                "mix",
                UnitKind::Mixer(Mixer::default()),
                &[feed, tear],
                &[mixed],
            )
            .unwrap();
        let v = b
            .add_unit(
                "v",
                UnitKind::Valve(Valve::new(1.0e5).unwrap()),
                &[mixed],
                &[out],
            )
            .unwrap();
        let rec = b
            .add_unit("rec", UnitKind::Recycle(Recycle::default()), &[out], &[tear])
            .unwrap();
        let fs = b.build().unwrap();
        assert_eq!(fs.evaluation_order(), &[src, mix, v, rec]);
        assert_eq!(fs.tears(), &[tear]);
        assert!(!fs.is_acyclic());
    }

    #[test]
    fn tear_produced_by_non_recycle_rejected() {
        let mut b = FlowsheetBuilder::new();
        let tear = b.add_tear_stream("tear", guess());
        let out = b.add_stream("out");
        b.add_unit("src", source_kind(), &[], &[tear]).unwrap();
        b.add_unit(
            "v",
            UnitKind::Valve(Valve::new(1.0e5).unwrap()),
            &[tear],
            &[out],
        )
        .unwrap();
        assert!(matches!(
            b.build(),
            Err(GraphError::TearNotOwnedByRecycle { .. })
        ));
    }
}
