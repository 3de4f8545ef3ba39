//! Explicit bus configuration.
//!
//! Fields are typed, defaults are resolved at construction time, and
//! validation runs eagerly in `EventBus::new` so misconfiguration fails
//! fast instead of on first use.

use crate::address::Address;
use crate::error::BusError;
use std::time::Duration;

/// Configuration for one bus instance.
///
/// The publish and subscribe ports are independent: the publisher binds
/// `pub_port`, the dispatch loop connects to `sub_port`. Bridging the two
/// (a forwarder) is orchestration-layer glue; tests either point both at
/// the same port or use the in-memory transport pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusConfig {
    /// Host for both endpoints.
    pub host: String,
    /// Port the outbound PUB socket binds.
    pub pub_port: u16,
    /// Port the inbound SUB socket connects to.
    pub sub_port: u16,
    /// Receive timeout of the dispatch loop; a stop request is observed
    /// within one such interval.
    pub recv_timeout: Duration,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            pub_port: 5556,
            sub_port: 5557,
            recv_timeout: Duration::from_millis(100),
        }
    }
}

impl BusConfig {
    /// Checks the configuration for obviously unusable values.
    pub fn validate(&self) -> Result<(), BusError> {
        if self.host.is_empty() {
            return Err(BusError::InvalidConfig("host must not be empty".to_string()));
        }
        if self.pub_port == 0 || self.sub_port == 0 {
            return Err(BusError::InvalidConfig("ports must be non-zero".to_string()));
        }
        if self.recv_timeout.is_zero() {
            return Err(BusError::InvalidConfig(
                "recv_timeout must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// The outbound (bind) endpoint address.
    pub fn publish_address(&self) -> Address {
        Address::zmq_tcp(&self.host, self.pub_port)
    }

    /// The inbound (connect) endpoint address.
    pub fn subscribe_address(&self) -> Address {
        Address::zmq_tcp(&self.host, self.sub_port)
    }
}
