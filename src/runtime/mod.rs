//! Actor runtime: one task per pair, and the fleet that drives them.

mod fleet;
mod worker;

pub use fleet::Fleet;
pub use worker::{spawn_worker, PairHandle, PairMessage, MAILBOX_CAPACITY};
