//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports are the seams between the per-pair state machine and the systems
//! it drives or reads from.
//!
//! ```text
//!   ┌──────────┐  ┌────────────┐  ┌──────────┐  ┌────────────┐  ┌──────────┐
//!   │MarketData│  │ Indicators │  │ Exchange │  │ OrderStore │  │ Notifier │
//!   └────┬─────┘  └─────┬──────┘  └────┬─────┘  └─────┬──────┘  └────┬─────┘
//!        └──────────────┴──────┬──────┴──────────────┴──────────────┘
//!                              ▼
//!                     ┌─────────────────┐
//!                     │   PairEngine    │◄── TradeHooks
//!                     └─────────────────┘
//! ```
//!
//! # Available Ports
//!
//! - [`MarketData`] - Charts and chart-update subscriptions
//! - [`Indicators`] - Oscillator and volume math
//! - [`Exchange`] - Order placement and cancellation
//! - [`OrderStore`] - Registry of placed orders and their fill state
//! - [`Notifier`] - Event notifications
//! - [`TradeHooks`] - Stop-loss policy and trade completion

mod exchange;
mod hooks;
mod indicator;
mod market;
mod notifier;
mod order_store;

pub use exchange::{BuyPlacement, Exchange, SellPlacement};
pub use hooks::TradeHooks;
pub use indicator::Indicators;
pub use market::MarketData;
pub use notifier::{Event, LogNotifier, Notifier, NotifierRegistry, NullNotifier, Severity};
pub use order_store::OrderStore;
