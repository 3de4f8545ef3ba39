//! Bus error types.

use market_events::WireError;
use thiserror::Error;

/// Errors surfaced to publishers and bus operators. Decode and callback
/// failures inside the dispatch loop are logged and contained instead
/// (see `dispatch`).
#[derive(Debug, Error)]
pub enum BusError {
    /// `publish` was called while the bus is not Running.
    #[error("bus is not running")]
    NotRunning,

    /// The outbound endpoint was never initialized. Should not occur if
    /// the `start()` contract is honored.
    #[error("outbound endpoint is not initialized")]
    Uninitialized,

    #[error("invalid bus configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to encode event: {0}")]
    Encode(#[from] WireError),

    #[error("transport failure: {0}")]
    Transport(#[source] anyhow::Error),
}
