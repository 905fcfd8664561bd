//! Trading state machine.
//!
//! The evaluators here decide; ports do the work. Each pair is driven by a
//! [`PairEngine`] that never awaits the venue on its tick path.

pub mod command;
pub mod context;
pub mod engine;
pub mod entry;
pub mod gate;
pub mod policy;
pub mod reconcile;
pub mod signals;
pub mod supervisor;

pub use command::{Action, Command, Completion};
pub use context::{Collaborators, StrategyContext};
pub use engine::PairEngine;
pub use entry::{EntryReadings, EntryThresholds, Setup};
pub use gate::{GateOutcome, GateReadings, GateThresholds};
pub use policy::{TimingPolicy, TradeSettings};
pub use signals::MarketSignals;
