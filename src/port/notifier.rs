//! Notifier port for event notifications.
//!
//! This module defines the trait for sending notifications about trade
//! lifecycle events and operator warnings. Rendering events into text is
//! left to the implementations.

use rust_decimal::Decimal;

use crate::domain::{Amount, OrderId, PairId, Price, Warning};

/// How loudly an event should be surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Routine progress.
    Info,
    /// Needs operator attention.
    Warning,
}

/// Events that can trigger notifications.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A buy order was accepted by the venue.
    TradingStarted {
        pair: PairId,
        price: Price,
        quantity: Amount,
    },
    /// An unresolved condition needs manual attention.
    Warning { pair: PairId, warning: Warning },
    /// A stale buy order was cancelled.
    BuyCanceled {
        pair: PairId,
        order_id: OrderId,
        part_fill: Decimal,
    },
    /// The stop loss fired and the sell target was lowered.
    StopLossActivated {
        pair: PairId,
        last_close: Price,
        sell_price: Price,
    },
    /// The trade cycle completed.
    TradeFinished {
        pair: PairId,
        entry_price: Price,
        sell_target: Price,
    },
}

impl Event {
    #[must_use]
    pub fn pair(&self) -> &PairId {
        match self {
            Event::TradingStarted { pair, .. }
            | Event::Warning { pair, .. }
            | Event::BuyCanceled { pair, .. }
            | Event::StopLossActivated { pair, .. }
            | Event::TradeFinished { pair, .. } => pair,
        }
    }

    #[must_use]
    pub fn severity(&self) -> Severity {
        match self {
            Event::Warning { .. } | Event::StopLossActivated { .. } => Severity::Warning,
            _ => Severity::Info,
        }
    }
}

/// Trait for notification handlers.
///
/// Implementations must be thread-safe (`Send + Sync`) and should return
/// quickly; slow delivery belongs in a spawned task.
pub trait Notifier: Send + Sync {
    /// Handle an event.
    fn notify(&self, event: Event);
}

/// Registry of notifiers (composite pattern).
///
/// Broadcasts events to all registered notifiers.
pub struct NotifierRegistry {
    notifiers: Vec<Box<dyn Notifier>>,
}

impl NotifierRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self { notifiers: vec![] }
    }

    /// Register a notifier.
    pub fn register(&mut self, notifier: Box<dyn Notifier>) {
        self.notifiers.push(notifier);
    }

    /// Notify all registered notifiers.
    pub fn notify_all(&self, event: Event) {
        for notifier in &self.notifiers {
            notifier.notify(event.clone());
        }
    }

    /// Number of registered notifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.notifiers.len()
    }

    /// Check if registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notifiers.is_empty()
    }
}

impl Default for NotifierRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// A no-op notifier for when notifications are disabled.
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _event: Event) {}
}

/// A logging notifier that logs events via tracing.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, event: Event) {
        use tracing::{info, warn};
        match event {
            Event::TradingStarted {
                pair,
                price,
                quantity,
            } => {
                info!(pair = %pair, price = %price, quantity = %quantity, "Trading started");
            }
            Event::Warning { pair, warning } => match warning {
                Warning::UnsellablePartialFill {
                    order_id,
                    part_fill,
                } => {
                    warn!(
                        pair = %pair,
                        order_id = %order_id,
                        part_fill = %part_fill,
                        "Can't cancel order, amount bought not enough to be sold"
                    );
                }
            },
            Event::BuyCanceled {
                pair,
                order_id,
                part_fill,
            } => {
                info!(pair = %pair, order_id = %order_id, part_fill = %part_fill, "Buy order canceled");
            }
            Event::StopLossActivated {
                pair,
                last_close,
                sell_price,
            } => {
                warn!(pair = %pair, last_close = %last_close, sell_price = %sell_price, "Stop loss activated");
            }
            Event::TradeFinished {
                pair,
                entry_price,
                sell_target,
            } => {
                info!(pair = %pair, entry = %entry_price, exit = %sell_target, "Trade finished");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Counting(Arc<AtomicUsize>);

    impl Notifier for Counting {
        fn notify(&self, _event: Event) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn registry_broadcasts_to_every_notifier() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut registry = NotifierRegistry::new();
        registry.register(Box::new(Counting(count.clone())));
        registry.register(Box::new(Counting(count.clone())));
        registry.register(Box::new(NullNotifier));

        registry.notify_all(Event::TradeFinished {
            pair: PairId::from("ETHBTC"),
            entry_price: Decimal::ONE,
            sell_target: Decimal::TWO,
        });

        assert_eq!(registry.len(), 3);
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn log_notifier_handles_every_event() {
        let pair = PairId::from("ETHBTC");
        let events = vec![
            Event::TradingStarted {
                pair: pair.clone(),
                price: Decimal::ONE,
                quantity: Decimal::TWO,
            },
            Event::BuyCanceled {
                pair: pair.clone(),
                order_id: OrderId::from("1"),
                part_fill: Decimal::ZERO,
            },
            Event::StopLossActivated {
                pair: pair.clone(),
                last_close: Decimal::ONE,
                sell_price: Decimal::ONE,
            },
            Event::TradeFinished {
                pair,
                entry_price: Decimal::ONE,
                sell_target: Decimal::TWO,
            },
        ];
        for event in events {
            assert_eq!(event.severity() == Severity::Warning, matches!(event, Event::StopLossActivated { .. }));
            LogNotifier.notify(event);
        }
    }

    #[test]
    fn warnings_are_loud() {
        let event = Event::Warning {
            pair: PairId::from("ETHBTC"),
            warning: Warning::UnsellablePartialFill {
                order_id: OrderId::from("1"),
                part_fill: Decimal::ONE,
            },
        };
        assert_eq!(event.severity(), Severity::Warning);
        assert_eq!(event.pair().as_str(), "ETHBTC");
    }
}
