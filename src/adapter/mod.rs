//! Concrete implementations of the ports that need no venue connection.

mod hooks;
mod order_store;

pub use hooks::StandardHooks;
pub use order_store::MemoryOrderStore;
