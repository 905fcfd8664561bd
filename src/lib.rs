//! dipcatch - per-pair dip-buying state machine for spot trading.
//!
//! Each configured pair moves through a fixed lifecycle: an indicator gate
//! decides whether the pair is worth watching, an entry evaluator looks for
//! an oversold dip and buys, and an order supervisor shepherds the buy and
//! then the sell order until the position is flat.
//!
//! # Architecture
//!
//! - [`domain`] - Exchange-agnostic types: bars, orders, phases, positions
//! - [`port`] - Traits for market data, indicators, the venue, order
//!   bookkeeping, notifications and strategy hooks
//! - [`application`] - The state machine: gate, entry, supervisor,
//!   reconciliation, and the per-pair [`PairEngine`](application::PairEngine)
//! - [`adapter`] - In-memory order store and standard strategy hooks
//! - [`runtime`] - One actor per pair and the [`Fleet`](runtime::Fleet)
//!   that drives them
//! - [`config`] - Configuration loading from TOML
//! - [`error`] - Error types for the crate
//!
//! Venue calls never block a tick: the engine emits a
//! [`Command`](application::Command), the runtime executes it in the
//! background and feeds the [`Completion`](application::Completion) back.

pub mod adapter;
pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod port;
pub mod runtime;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
