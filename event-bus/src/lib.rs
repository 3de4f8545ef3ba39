//! # Event Bus Library
//!
//! Topic-labeled publish/subscribe transport for typed market events.
//!
//! ## Modules
//! - `address`: Transport address abstraction (ZMQ, Memory).
//! - `config`: Explicit bus configuration with eager validation.
//! - `transport`: Raw byte-frame transport traits.
//! - `transports`: ZMQ and in-memory transport implementations.
//! - `registry`: Thread-safe subscriber registry.
//! - `bus`: The `EventBus` state machine and publish path.
//! - `dispatch`: The dedicated dispatch loop.

pub mod address;
pub mod bus;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod registry;
pub mod transport;
pub mod transports;

pub use address::Address;
pub use bus::{BusState, EventBus};
pub use config::BusConfig;
pub use dispatch::Dispatcher;
pub use error::BusError;
pub use registry::{EventCallback, SubscriberRegistry, SubscriptionId};
pub use transport::{TransportInput, TransportOutput, WireFrame};
