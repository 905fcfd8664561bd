use thiserror::Error;

use crate::domain::{OrderId, PairId};

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Errors reported by the execution venue.
///
/// None of these are fatal: the state machine logs them and retries the
/// same action on a later tick.
#[derive(Error, Debug, Clone)]
pub enum ExecutionError {
    #[error("order rejected for {pair}: {reason}")]
    Rejected { pair: PairId, reason: String },

    #[error("order {order_id} not found on {pair}")]
    OrderNotFound { pair: PairId, order_id: OrderId },

    #[error("insufficient balance for {pair}")]
    InsufficientBalance { pair: PairId },

    #[error("transport error: {0}")]
    Transport(String),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Execution(#[from] ExecutionError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unknown pair: {0}")]
    UnknownPair(PairId),

    #[error("worker for {0} is no longer running")]
    WorkerStopped(PairId),
}

pub type Result<T> = std::result::Result<T, Error>;
