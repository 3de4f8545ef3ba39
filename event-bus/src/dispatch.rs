//! The dedicated dispatch loop.
//!
//! One logical consumer per dispatcher: it receives frames from the
//! inbound transport, decodes them, and invokes every registered
//! callback for the envelope's kind. Per-envelope failures (unknown
//! topic, malformed payload, failing callback) are logged and contained;
//! nothing short of a transport failure or a stop request ends the loop.

use crate::registry::SubscriberRegistry;
use crate::transport::{TransportInput, WireFrame};
use market_events::{codec, WireError};
use std::sync::Arc;
use tokio::sync::watch;

/// The consuming side of the bus. Built by `EventBus::dispatcher` (or
/// `dispatcher_with_transport`) and typically moved onto its own task:
///
/// ```ignore
/// let dispatcher = bus.dispatcher()?;
/// tokio::spawn(dispatcher.run());
/// ```
pub struct Dispatcher {
    input: Box<dyn TransportInput>,
    registry: Arc<SubscriberRegistry>,
    shutdown: watch::Receiver<bool>,
}

impl Dispatcher {
    pub(crate) fn new(
        input: Box<dyn TransportInput>,
        registry: Arc<SubscriberRegistry>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            input,
            registry,
            shutdown,
        }
    }

    /// Runs until the bus is stopped or the transport fails.
    ///
    /// The stop request is checked on every receive-timeout tick, so it
    /// is observed within one timeout interval even when no traffic is
    /// flowing.
    pub async fn run(mut self) {
        log::info!("dispatch loop started");
        loop {
            if *self.shutdown.borrow() {
                break;
            }
            match self.input.recv_frame().await {
                Ok(Some(frame)) => self.handle_frame(frame),
                // Timeout tick: loop back and re-check the stop flag
                Ok(None) => continue,
                Err(err) => {
                    log::error!("transport receive failed, stopping dispatch loop: {:#}", err);
                    break;
                }
            }
        }
        log::info!("dispatch loop stopped");
    }

    fn handle_frame(&self, frame: WireFrame) {
        match codec::decode(&frame.topic, &frame.payload) {
            Ok(envelope) => self.registry.dispatch(&envelope),
            Err(WireError::UnknownKind(kind)) => {
                log::warn!("dropping envelope with unknown event kind '{}'", kind);
            }
            Err(err) => {
                log::warn!("dropping undecodable '{}' envelope: {}", frame.topic, err);
            }
        }
    }
}
