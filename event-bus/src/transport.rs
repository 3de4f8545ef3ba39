//! Abstraction for the transport layer, framed as topic + payload.
//!
//! Implementation details (ZMQ, Memory) are hidden behind these traits.

use anyhow::Result;
use async_trait::async_trait;

/// One message on the wire: a topic string (equal to the event kind) and
/// an opaque payload blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireFrame {
    pub topic: String,
    pub payload: Vec<u8>,
}

/// Abstraction for the outgoing transport layer (sending frames).
#[async_trait]
pub trait TransportOutput: Send + Sync {
    /// Send one topic-labeled frame.
    async fn send_frame(&self, topic: &str, payload: &[u8]) -> Result<()>;
}

/// Abstraction for the incoming transport layer (reading frames).
#[async_trait]
pub trait TransportInput: Send {
    /// Receive the next frame.
    ///
    /// Returns `Ok(None)` when the receive timeout elapses with nothing
    /// to read; the dispatch loop uses these ticks to observe a pending
    /// stop request.
    async fn recv_frame(&mut self) -> Result<Option<WireFrame>>;
}
