//! Unit operations for steady-state flowsheets.
//!
//! Every operation is a deterministic function from flashed inlet states to
//! flashed outlet states plus optional recorded metrics (power, duty, tear
//! delta). Per-component molar flow is conserved by construction in every
//! kind.

pub mod compressor;
pub mod error;
pub mod heat;
pub mod kind;
pub mod mixer;
pub mod pump;
pub mod recycle;
pub mod saturator;
pub mod separator;
pub mod source;
pub mod state;
pub mod valve;

pub use compressor::Compressor;
pub use error::{OpError, OpResult};
pub use heat::{Cooler, HeatSpec, Heated, Heater};
pub use kind::{Arity, Solved, UnitKind};
pub use mixer::Mixer;
pub use pump::{Driven, Pump};
pub use recycle::{Recycle, RecycleUpdate};
pub use saturator::Saturator;
pub use separator::{Separated, Separated3, Separator, Separator3};
pub use source::Source;
pub use state::{StreamState, ZERO_FLOW};
pub use valve::Valve;
