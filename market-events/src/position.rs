//! Position state change records.

use crate::error::{require_non_empty, require_positive, ValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PositionDirection {
    Long,
    Short,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PositionStatus {
    Open,
    Closed,
}

/// The state of an open or closed position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionEvent {
    position_id: String,
    timestamp: DateTime<Utc>,
    symbol: String,
    direction: PositionDirection,
    volume: f64,
    entry_price: f64,
    current_price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    profit_loss: Option<f64>,
    status: PositionStatus,
}

impl PositionEvent {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        position_id: impl Into<String>,
        timestamp: DateTime<Utc>,
        symbol: impl Into<String>,
        direction: PositionDirection,
        volume: f64,
        entry_price: f64,
        current_price: f64,
        profit_loss: Option<f64>,
        status: PositionStatus,
    ) -> Result<Self, ValidationError> {
        let event = Self {
            position_id: position_id.into(),
            timestamp,
            symbol: symbol.into(),
            direction,
            volume,
            entry_price,
            current_price,
            profit_loss,
            status,
        };
        event.validate()?;
        Ok(event)
    }

    pub(crate) fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty("position_id", &self.position_id)?;
        require_non_empty("symbol", &self.symbol)?;
        require_positive("volume", self.volume)?;
        require_positive("entry_price", self.entry_price)?;
        require_positive("current_price", self.current_price)?;
        Ok(())
    }

    pub fn position_id(&self) -> &str {
        &self.position_id
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn direction(&self) -> PositionDirection {
        self.direction
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn entry_price(&self) -> f64 {
        self.entry_price
    }

    pub fn current_price(&self) -> f64 {
        self.current_price
    }

    pub fn profit_loss(&self) -> Option<f64> {
        self.profit_loss
    }

    pub fn status(&self) -> PositionStatus {
        self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn losing_position_is_valid() {
        // profit_loss is unconstrained; losses are negative.
        let event = PositionEvent::new(
            "pos-1",
            Utc::now(),
            "EURUSD",
            PositionDirection::Long,
            1.0,
            1.0850,
            1.0820,
            Some(-30.0),
            PositionStatus::Open,
        )
        .unwrap();
        assert_eq!(event.profit_loss(), Some(-30.0));
    }

    #[test]
    fn zero_entry_price_rejected() {
        let err = PositionEvent::new(
            "pos-1",
            Utc::now(),
            "EURUSD",
            PositionDirection::Short,
            1.0,
            0.0,
            1.0820,
            None,
            PositionStatus::Open,
        )
        .unwrap_err();
        assert_eq!(err, ValidationError::NotPositive("entry_price", 0.0));
    }
}
