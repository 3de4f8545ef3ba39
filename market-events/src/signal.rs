//! Strategy signal records.

use crate::error::{require_in_range, require_non_empty, require_positive_opt, ValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Entry, exit and reversal signals a strategy can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalType {
    Buy,
    Sell,
    CloseBuy,
    CloseSell,
    Reverse,
}

/// A trading signal with a confidence score in `[0.0, 1.0]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalEvent {
    symbol: String,
    timestamp: DateTime<Utc>,
    signal_type: SignalType,
    confidence: f64,
    strategy_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    target_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    stop_loss: Option<f64>,
}

impl SignalEvent {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        symbol: impl Into<String>,
        timestamp: DateTime<Utc>,
        signal_type: SignalType,
        confidence: f64,
        strategy_id: impl Into<String>,
        price: Option<f64>,
        target_price: Option<f64>,
        stop_loss: Option<f64>,
    ) -> Result<Self, ValidationError> {
        let event = Self {
            symbol: symbol.into(),
            timestamp,
            signal_type,
            confidence,
            strategy_id: strategy_id.into(),
            price,
            target_price,
            stop_loss,
        };
        event.validate()?;
        Ok(event)
    }

    pub(crate) fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty("symbol", &self.symbol)?;
        require_non_empty("strategy_id", &self.strategy_id)?;
        require_in_range("confidence", 0.0, 1.0, self.confidence)?;
        require_positive_opt("price", self.price)?;
        require_positive_opt("target_price", self.target_price)?;
        require_positive_opt("stop_loss", self.stop_loss)?;
        Ok(())
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn signal_type(&self) -> SignalType {
        self.signal_type
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn strategy_id(&self) -> &str {
        &self.strategy_id
    }

    pub fn price(&self) -> Option<f64> {
        self.price
    }

    pub fn target_price(&self) -> Option<f64> {
        self.target_price
    }

    pub fn stop_loss(&self) -> Option<f64> {
        self.stop_loss
    }
}
