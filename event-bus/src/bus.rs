//! The `EventBus`: state machine, publish path, and dispatcher wiring.

use crate::config::BusConfig;
use crate::dispatch::Dispatcher;
use crate::error::BusError;
use crate::registry::{EventCallback, SubscriberRegistry, SubscriptionId};
use crate::transport::{TransportInput, TransportOutput};
use crate::transports;
use market_events::{codec, EventKind, MarketEvent};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;

/// Bus lifecycle states.
///
/// Transitions: Stopped → Starting → Running → Stopping → Stopped.
/// `start` while Running and `stop` while Stopped are no-ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusState {
    Stopped,
    Starting,
    Running,
    Stopping,
}

type OutputFactory =
    Box<dyn Fn(&BusConfig) -> anyhow::Result<Arc<dyn TransportOutput>> + Send + Sync>;

/// A process-wide publish/subscribe transport for typed market events.
///
/// Constructed once by the orchestration layer and shared by reference
/// with all producers and consumers; there is no global instance.
/// `publish` is safe to call concurrently from many tasks while the
/// dispatch loop runs.
pub struct EventBus {
    config: BusConfig,
    state: Mutex<BusState>,
    outbound: Mutex<Option<Arc<dyn TransportOutput>>>,
    registry: Arc<SubscriberRegistry>,
    output_factory: OutputFactory,
    shutdown: watch::Sender<bool>,
}

impl EventBus {
    /// Creates a bus publishing over ZMQ per `config`. The configuration
    /// is validated eagerly; the socket is not bound until `start`.
    pub fn new(config: BusConfig) -> Result<Self, BusError> {
        config.validate()?;
        let factory: OutputFactory =
            Box::new(|cfg: &BusConfig| transports::build_publisher(&cfg.publish_address()));
        Ok(Self::with_factory(config, factory))
    }

    /// Creates a bus that publishes on the given transport instead of a
    /// ZMQ socket (in-process wiring and tests). The same transport is
    /// re-installed across stop/start cycles.
    pub fn with_transport(
        config: BusConfig,
        output: Arc<dyn TransportOutput>,
    ) -> Result<Self, BusError> {
        config.validate()?;
        let factory: OutputFactory = Box::new(move |_| Ok(output.clone()));
        Ok(Self::with_factory(config, factory))
    }

    fn with_factory(config: BusConfig, output_factory: OutputFactory) -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            config,
            state: Mutex::new(BusState::Stopped),
            outbound: Mutex::new(None),
            registry: Arc::new(SubscriberRegistry::new()),
            output_factory,
            shutdown,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> BusState {
        *self.state.lock().unwrap()
    }

    /// Binds the outbound endpoint and moves the bus to Running.
    ///
    /// Idempotent while Running. Subscriptions registered before `start`
    /// (or across a stop/start cycle) are preserved.
    pub fn start(&self) -> Result<(), BusError> {
        let mut state = self.state.lock().unwrap();
        if *state == BusState::Running {
            return Ok(());
        }
        *state = BusState::Starting;
        let output = match (self.output_factory)(&self.config) {
            Ok(output) => output,
            Err(err) => {
                *state = BusState::Stopped;
                return Err(BusError::Transport(err));
            }
        };
        *self.outbound.lock().unwrap() = Some(output);
        let _ = self.shutdown.send(false);
        *state = BusState::Running;
        log::info!("event bus running on {}", self.config.publish_address());
        Ok(())
    }

    /// Releases the outbound endpoint, signals any dispatch loop to
    /// stop, and moves the bus to Stopped.
    ///
    /// Idempotent while Stopped. The stop request is observed by the
    /// dispatch loop within one receive-timeout interval.
    pub fn stop(&self) {
        let mut state = self.state.lock().unwrap();
        if *state == BusState::Stopped {
            return;
        }
        *state = BusState::Stopping;
        self.outbound.lock().unwrap().take();
        let _ = self.shutdown.send(true);
        *state = BusState::Stopped;
        log::info!("event bus stopped");
    }

    /// Serializes `event` into a topic-labeled envelope stamped with the
    /// current UTC time and sends it on the outbound endpoint.
    ///
    /// Fire-and-forget: returns as soon as the frame is handed to the
    /// transport, without waiting on any subscriber.
    ///
    /// # Returns
    ///
    /// * `Err(BusError::NotRunning)` if the bus is not Running.
    /// * `Err(BusError::Uninitialized)` if the endpoint was never bound.
    pub async fn publish(&self, event: &MarketEvent) -> Result<(), BusError> {
        if self.state() != BusState::Running {
            return Err(BusError::NotRunning);
        }
        // Clone the handle out of the lock; the send must not hold it.
        let output = self
            .outbound
            .lock()
            .unwrap()
            .clone()
            .ok_or(BusError::Uninitialized)?;

        let (topic, payload) = codec::encode(event)?;
        output
            .send_frame(topic, &payload)
            .await
            .map_err(BusError::Transport)
    }

    /// Registers `callback` for every future envelope of `kind`.
    pub fn subscribe(&self, kind: EventKind, callback: EventCallback) -> SubscriptionId {
        self.registry.subscribe(kind, callback)
    }

    /// Removes a registration; no-op if not currently registered.
    pub fn unsubscribe(&self, kind: EventKind, id: SubscriptionId) {
        self.registry.unsubscribe(kind, id);
    }

    /// The shared subscriber registry.
    pub fn registry(&self) -> Arc<SubscriberRegistry> {
        self.registry.clone()
    }

    /// Builds the consuming side: a dispatcher connected to the inbound
    /// ZMQ endpoint, sharing this bus's registry and stop signal.
    pub fn dispatcher(&self) -> Result<Dispatcher, BusError> {
        let input =
            transports::build_subscriber(&self.config.subscribe_address(), self.config.recv_timeout)
                .map_err(BusError::Transport)?;
        Ok(self.dispatcher_with_transport(input))
    }

    /// Builds a dispatcher over an explicit inbound transport (memory
    /// pair wiring and tests).
    pub fn dispatcher_with_transport(&self, input: Box<dyn TransportInput>) -> Dispatcher {
        Dispatcher::new(input, self.registry.clone(), self.shutdown.subscribe())
    }
}
