//! Order state change records.

use crate::error::{require_non_empty, require_positive, require_positive_opt, ValidationError};
use crate::trade::TradeDirection;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderType {
    Market,
    Limit,
    Stop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    Pending,
    Filled,
    Cancelled,
    Rejected,
}

/// The state of an order as reported by the execution side.
///
/// `price` is optional: LIMIT/STOP orders carry one in practice, but the
/// relation is not enforced cross-field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderEvent {
    order_id: String,
    timestamp: DateTime<Utc>,
    symbol: String,
    order_type: OrderType,
    direction: TradeDirection,
    volume: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    price: Option<f64>,
    status: OrderStatus,
}

impl OrderEvent {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        order_id: impl Into<String>,
        timestamp: DateTime<Utc>,
        symbol: impl Into<String>,
        order_type: OrderType,
        direction: TradeDirection,
        volume: f64,
        price: Option<f64>,
        status: OrderStatus,
    ) -> Result<Self, ValidationError> {
        let event = Self {
            order_id: order_id.into(),
            timestamp,
            symbol: symbol.into(),
            order_type,
            direction,
            volume,
            price,
            status,
        };
        event.validate()?;
        Ok(event)
    }

    pub(crate) fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty("order_id", &self.order_id)?;
        require_non_empty("symbol", &self.symbol)?;
        require_positive("volume", self.volume)?;
        require_positive_opt("price", self.price)?;
        Ok(())
    }

    pub fn order_id(&self) -> &str {
        &self.order_id
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn order_type(&self) -> OrderType {
        self.order_type
    }

    pub fn direction(&self) -> TradeDirection {
        self.direction
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn price(&self) -> Option<f64> {
        self.price
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn market_order_without_price_is_valid() {
        OrderEvent::new(
            "ord-7",
            Utc::now(),
            "EURUSD",
            OrderType::Market,
            TradeDirection::Sell,
            0.5,
            None,
            OrderStatus::Pending,
        )
        .unwrap();
    }

    #[test]
    fn zero_price_rejected() {
        let err = OrderEvent::new(
            "ord-7",
            Utc::now(),
            "EURUSD",
            OrderType::Limit,
            TradeDirection::Buy,
            0.5,
            Some(0.0),
            OrderStatus::Pending,
        )
        .unwrap_err();
        assert_eq!(err, ValidationError::NotPositive("price", 0.0));
    }
}
