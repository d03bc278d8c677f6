//! Immutable flowsheet: the validated arena of streams and units.

use pf_core::{StreamId, UnitId};
use pf_ops::UnitKind;
use pf_thermo::Composition;

/// Initial condition for a tear stream, provided by the caller at build
/// time (typically cloned from the definition of a nearby stream).
#[derive(Debug, Clone)]
pub struct TearGuess {
    pub composition: Composition,
    /// [Pa]
    pub pressure: f64,
    /// [K]
    pub temperature: f64,
    /// [mol/s]
    pub molar_flow: f64,
}

/// Named edge of the flowsheet. Exactly one producing unit; any number of
/// consumers.
#[derive(Debug, Clone)]
pub struct Stream {
    pub id: StreamId,
    pub name: String,
    /// The unit whose outlet slot owns this stream (set during build).
    pub producer: Option<UnitId>,
    /// Tear streams break recycle loops; their producer is a Recycle unit.
    pub is_tear: bool,
    /// Present iff `is_tear`.
    pub guess: Option<TearGuess>,
}

/// Named node of the flowsheet with its operation and ordered ports.
#[derive(Debug, Clone)]
pub struct Unit {
    pub id: UnitId,
    pub name: String,
    pub kind: UnitKind,
    pub inlets: Vec<StreamId>,
    pub outlets: Vec<StreamId>,
}

/// A validated, immutable flowsheet.
///
/// Built by [`crate::FlowsheetBuilder::build`]; the solver walks
/// `evaluation_order` and writes stream states into its own slot vector,
/// never back into the graph.
#[derive(Debug, Clone)]
pub struct Flowsheet {
    pub(crate) streams: Vec<Stream>,
    pub(crate) units: Vec<Unit>,
    /// Topological order of the tear-reduced unit graph.
    pub(crate) order: Vec<UnitId>,
    pub(crate) tears: Vec<StreamId>,
}

impl Flowsheet {
    pub fn stream(&self, id: StreamId) -> &Stream {
        &self.streams[id.index() as usize]
    }

    pub fn unit(&self, id: UnitId) -> &Unit {
        &self.units[id.index() as usize]
    }

    pub fn streams(&self) -> &[Stream] {
        &self.streams
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    pub fn stream_by_name(&self, name: &str) -> Option<&Stream> {
        self.streams.iter().find(|s| s.name == name)
    }

    pub fn unit_by_name(&self, name: &str) -> Option<&Unit> {
        self.units.iter().find(|u| u.name == name)
    }

    /// Units in evaluation order (tear-reduced toposort, ties by
    /// declaration index).
    pub fn evaluation_order(&self) -> &[UnitId] {
        &self.order
    }

    /// All tear streams, in declaration order.
    pub fn tears(&self) -> &[StreamId] {
        &self.tears
    }

    /// True when no recycle loop exists.
    pub fn is_acyclic(&self) -> bool {
        self.tears.is_empty()
    }
}
