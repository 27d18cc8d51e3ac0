//! Transit-subsystem error type.

use thiserror::Error;

use gt_core::StopKey;

/// Errors produced by `gt-transit`.
#[derive(Debug, Error)]
pub enum TransitError {
    #[error("stop {from} declares a connection to undeclared stop {to}")]
    DanglingReference { from: StopKey, to: StopKey },

    #[error("stop {0} is declared more than once")]
    DuplicateStop(StopKey),

    #[error("stop {0} not found in network")]
    UnknownStop(StopKey),

    #[error("no route from {from} to {to}")]
    NoRoute { from: StopKey, to: StopKey },

    #[error("route persistence error: {0}")]
    Persist(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type TransitResult<T> = Result<T, TransitError>;
