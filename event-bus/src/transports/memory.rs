//! In-memory loopback transport for tests and intra-process wiring.
//!
//! Implements the transport traits over a Tokio MPSC channel.

use crate::transport::{TransportInput, TransportOutput, WireFrame};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::mpsc;

/// Creates a linked output/input pair sharing one bounded channel.
///
/// # Arguments
///
/// * `capacity` - Channel capacity before `send_frame` backpressures.
/// * `recv_timeout` - Upper bound on a single blocking receive, matching
///   the ZMQ transport's timeout-tick behavior.
pub fn pair(
    capacity: usize,
    recv_timeout: Duration,
) -> (MemoryTransportOutput, MemoryTransportInput) {
    let (sender, receiver) = mpsc::channel(capacity);
    (
        MemoryTransportOutput { sender },
        MemoryTransportInput {
            receiver,
            recv_timeout,
        },
    )
}

/// Sending half of the loopback channel.
pub struct MemoryTransportOutput {
    sender: mpsc::Sender<WireFrame>,
}

#[async_trait]
impl TransportOutput for MemoryTransportOutput {
    async fn send_frame(&self, topic: &str, payload: &[u8]) -> Result<()> {
        self.sender
            .send(WireFrame {
                topic: topic.to_string(),
                payload: payload.to_vec(),
            })
            .await
            .map_err(|_| anyhow!("Memory channel closed"))
    }
}

/// Receiving half of the loopback channel.
pub struct MemoryTransportInput {
    receiver: mpsc::Receiver<WireFrame>,
    recv_timeout: Duration,
}

#[async_trait]
impl TransportInput for MemoryTransportInput {
    async fn recv_frame(&mut self) -> Result<Option<WireFrame>> {
        match tokio::time::timeout(self.recv_timeout, self.receiver.recv()).await {
            // Timeout tick: nothing arrived within the interval
            Err(_) => Ok(None),
            Ok(Some(frame)) => Ok(Some(frame)),
            Ok(None) => Err(anyhow!("Memory channel closed")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn frames_pass_through_in_order() -> Result<()> {
        let (output, mut input) = pair(16, Duration::from_millis(50));
        output.send_frame("market_data", b"first").await?;
        output.send_frame("market_data", b"second").await?;

        let first = input.recv_frame().await?.unwrap();
        let second = input.recv_frame().await?.unwrap();
        assert_eq!(first.payload, b"first");
        assert_eq!(second.payload, b"second");
        Ok(())
    }

    #[tokio::test]
    async fn empty_channel_yields_timeout_tick() -> Result<()> {
        let (_output, mut input) = pair(16, Duration::from_millis(10));
        assert_eq!(input.recv_frame().await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn closed_channel_is_an_error() {
        let (output, mut input) = pair(16, Duration::from_millis(10));
        drop(output);
        assert!(input.recv_frame().await.is_err());
    }
}
