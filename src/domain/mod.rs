//! Exchange-agnostic domain types.

mod bar;
mod debounce;
mod id;
mod money;
mod order;
mod phase;
mod position;
mod warning;

pub use bar::{last_close, Bar, Timeframe, VALIDATION_TIMEFRAMES, WATCH_TIMEFRAMES};
pub use debounce::{elapsed, Debounce};
pub use id::{OrderId, PairId, RequestId};
pub use money::{price_from_f64, quote, Amount, Price, PRICE_SCALE};
pub use order::{Order, Side};
pub use phase::Phase;
pub use position::{Position, StopLoss};
pub use warning::{Warning, WarningLatch};
