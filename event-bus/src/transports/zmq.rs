//! ZMQ PUB/SUB transport.
//!
//! The publisher binds, subscribers connect; frames travel as two-part
//! multipart messages (topic, payload) so SUB-side topic filtering stays
//! possible even though the dispatch loop subscribes to everything.

use crate::transport::{TransportInput, TransportOutput, WireFrame};
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;
use zmq::{Context as ZmqContext, Socket, SocketType};

/// A thread-safe ZMQ publisher wrapper.
///
/// Implements `TransportOutput` by wrapping a synchronous `zmq::Socket`
/// in a Mutex.
pub struct ZmqPublisher {
    socket: Mutex<Socket>,
}

impl ZmqPublisher {
    /// Binds a PUB socket on the given endpoint.
    pub fn bind(endpoint: &str) -> Result<Self> {
        let context = ZmqContext::new();
        let socket = context.socket(SocketType::PUB)?;
        socket
            .bind(endpoint)
            .with_context(|| format!("Failed to bind PUB socket on {}", endpoint))?;
        Ok(Self {
            socket: Mutex::new(socket),
        })
    }
}

#[async_trait]
impl TransportOutput for ZmqPublisher {
    async fn send_frame(&self, topic: &str, payload: &[u8]) -> Result<()> {
        let socket = self.socket.lock().unwrap();
        // ZMQ is fast enough that we can use the blocking calls inside the lock
        socket
            .send(topic.as_bytes(), zmq::SNDMORE)
            .context("Failed to send topic frame")?;
        socket
            .send(payload, 0)
            .context("Failed to send payload frame")
    }
}

/// A thread-safe ZMQ subscriber wrapper.
///
/// The receive timeout is set on the socket (`RCVTIMEO`) so a blocking
/// receive wakes up at least once per interval, which is what makes the
/// dispatch loop's stop request observable.
pub struct ZmqSubscriber {
    socket: Mutex<Socket>,
}

impl ZmqSubscriber {
    /// Connects a SUB socket to the given endpoint, subscribed to all
    /// topics.
    pub fn connect(endpoint: &str, recv_timeout: Duration) -> Result<Self> {
        let context = ZmqContext::new();
        let socket = context.socket(SocketType::SUB)?;
        socket.set_rcvtimeo(recv_timeout.as_millis() as i32)?;
        socket
            .connect(endpoint)
            .with_context(|| format!("Failed to connect SUB socket to {}", endpoint))?;
        // Subscribe to everything; kind filtering happens in the registry
        socket.set_subscribe(b"")?;
        Ok(Self {
            socket: Mutex::new(socket),
        })
    }
}

#[async_trait]
impl TransportInput for ZmqSubscriber {
    async fn recv_frame(&mut self) -> Result<Option<WireFrame>> {
        let socket = self.socket.lock().unwrap();
        let topic = match socket.recv_bytes(0) {
            Ok(bytes) => bytes,
            // RCVTIMEO elapsed: a timeout tick, not an error
            Err(zmq::Error::EAGAIN) => return Ok(None),
            Err(err) => return Err(err).context("Failed to receive topic frame"),
        };
        if !socket.get_rcvmore()? {
            bail!("received single-part message, expected topic + payload");
        }
        let payload = socket
            .recv_bytes(0)
            .context("Failed to receive payload frame")?;
        Ok(Some(WireFrame {
            topic: String::from_utf8_lossy(&topic).into_owned(),
            payload,
        }))
    }
}
