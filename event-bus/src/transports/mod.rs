//! Transport implementations and factory functions.
//!
//! Abstracts the creation of transport endpoints based on `Address`.

pub mod memory;
pub mod zmq;

use crate::address::Address;
use crate::transport::{TransportInput, TransportOutput};
use anyhow::{bail, Result};
use std::sync::Arc;
use std::time::Duration;

/// Factory to create publisher endpoints.
///
/// # Arguments
///
/// * `address` - The endpoint to bind and publish on.
///
/// # Returns
///
/// * `Ok(Arc<dyn TransportOutput>)` if successful.
/// * `Err` if the address type is unsupported or the bind fails.
pub fn build_publisher(address: &Address) -> Result<Arc<dyn TransportOutput>> {
    match address {
        Address::Zmq(endpoint) => {
            let publisher = zmq::ZmqPublisher::bind(endpoint)?;
            Ok(Arc::new(publisher))
        }
        Address::Memory(name) => {
            bail!(
                "memory address '{}' needs an explicit channel pair; use memory::pair",
                name
            );
        }
    }
}

/// Factory to create subscriber endpoints.
///
/// # Arguments
///
/// * `address` - The endpoint to connect and subscribe to.
/// * `recv_timeout` - Upper bound on a single blocking receive.
pub fn build_subscriber(
    address: &Address,
    recv_timeout: Duration,
) -> Result<Box<dyn TransportInput>> {
    match address {
        Address::Zmq(endpoint) => {
            let subscriber = zmq::ZmqSubscriber::connect(endpoint, recv_timeout)?;
            Ok(Box::new(subscriber))
        }
        Address::Memory(name) => {
            bail!(
                "memory address '{}' needs an explicit channel pair; use memory::pair",
                name
            );
        }
    }
}
