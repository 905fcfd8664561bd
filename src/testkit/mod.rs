//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`market`] - `FakeMarket`: in-memory charts with switchable freshness.
//! - [`indicators`] - `ScriptedIndicators`: canned gate and entry readings.
//! - [`exchange`] - `ScriptedExchange`: scripted venue results plus a call log.
//! - [`notifier`] - `RecordingNotifier`: keeps every event.
//! - [`harness`] - `Harness`: a wired strategy context over all of the above.

pub mod exchange;
pub mod harness;
pub mod indicators;
pub mod market;
pub mod notifier;

pub use exchange::{ExchangeCall, ScriptedExchange, AMOUNT_SCALE};
pub use harness::{Harness, START_CLOSE};
pub use indicators::ScriptedIndicators;
pub use market::{FakeMarket, FAST_BARS, MEDIUM_BARS, SLOW_BARS};
pub use notifier::RecordingNotifier;
