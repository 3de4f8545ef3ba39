//! Trade execution records.

use crate::error::{require_non_empty, require_positive, ValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Direction of a trade or order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeDirection {
    Buy,
    Sell,
}

/// A filled trade reported by an execution venue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeEvent {
    symbol: String,
    timestamp: DateTime<Utc>,
    direction: TradeDirection,
    price: f64,
    volume: f64,
    order_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    strategy_id: Option<String>,
}

impl TradeEvent {
    pub fn new(
        symbol: impl Into<String>,
        timestamp: DateTime<Utc>,
        direction: TradeDirection,
        price: f64,
        volume: f64,
        order_id: impl Into<String>,
        strategy_id: Option<String>,
    ) -> Result<Self, ValidationError> {
        let event = Self {
            symbol: symbol.into(),
            timestamp,
            direction,
            price,
            volume,
            order_id: order_id.into(),
            strategy_id,
        };
        event.validate()?;
        Ok(event)
    }

    pub(crate) fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty("symbol", &self.symbol)?;
        require_non_empty("order_id", &self.order_id)?;
        require_positive("price", self.price)?;
        require_positive("volume", self.volume)?;
        Ok(())
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn direction(&self) -> TradeDirection {
        self.direction
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn order_id(&self) -> &str {
        &self.order_id
    }

    pub fn strategy_id(&self) -> Option<&str> {
        self.strategy_id.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&TradeDirection::Buy).unwrap(), "\"BUY\"");
        assert_eq!(serde_json::to_string(&TradeDirection::Sell).unwrap(), "\"SELL\"");
    }

    #[test]
    fn sideways_direction_rejected_by_serde() {
        assert!(serde_json::from_str::<TradeDirection>("\"SIDEWAYS\"").is_err());
    }

    #[test]
    fn zero_volume_rejected() {
        let err = TradeEvent::new(
            "EURUSD",
            Utc::now(),
            TradeDirection::Buy,
            1.0850,
            0.0,
            "ord-1",
            None,
        )
        .unwrap_err();
        assert_eq!(err, ValidationError::NotPositive("volume", 0.0));
    }
}
