//! Market data (tick/quote) records.

use crate::error::{require_non_empty, require_non_negative_opt, require_positive, ValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed allow-list of feed origins a tick may come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedOrigin {
    Mt5,
    Demo,
    Sim,
    Replay,
}

impl FeedOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedOrigin::Mt5 => "mt5",
            FeedOrigin::Demo => "demo",
            FeedOrigin::Sim => "sim",
            FeedOrigin::Replay => "replay",
        }
    }
}

impl fmt::Display for FeedOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeedOrigin {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mt5" => Ok(FeedOrigin::Mt5),
            "demo" => Ok(FeedOrigin::Demo),
            "sim" => Ok(FeedOrigin::Sim),
            "replay" => Ok(FeedOrigin::Replay),
            other => Err(format!("unknown feed origin: {}", other)),
        }
    }
}

/// A single bid/ask quote for one instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketDataEvent {
    symbol: String,
    timestamp: DateTime<Utc>,
    bid: f64,
    ask: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    volume: Option<f64>,
    source: FeedOrigin,
}

impl MarketDataEvent {
    /// Creates a validated market data event.
    ///
    /// # Returns
    ///
    /// * `Ok(MarketDataEvent)` if every constraint holds.
    /// * `Err(ValidationError)` on an empty symbol, non-positive bid or
    ///   ask, or a negative volume.
    pub fn new(
        symbol: impl Into<String>,
        timestamp: DateTime<Utc>,
        bid: f64,
        ask: f64,
        volume: Option<f64>,
        source: FeedOrigin,
    ) -> Result<Self, ValidationError> {
        let event = Self {
            symbol: symbol.into(),
            timestamp,
            bid,
            ask,
            volume,
            source,
        };
        event.validate()?;
        Ok(event)
    }

    pub(crate) fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty("symbol", &self.symbol)?;
        require_positive("bid", self.bid)?;
        require_positive("ask", self.ask)?;
        require_non_negative_opt("volume", self.volume)?;
        Ok(())
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn bid(&self) -> f64 {
        self.bid
    }

    pub fn ask(&self) -> f64 {
        self.ask
    }

    pub fn volume(&self) -> Option<f64> {
        self.volume
    }

    pub fn source(&self) -> FeedOrigin {
        self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts() -> DateTime<Utc> {
        "2024-01-15T10:30:00Z".parse().unwrap()
    }

    #[test]
    fn valid_tick_constructs() {
        let event =
            MarketDataEvent::new("EURUSD", ts(), 1.0850, 1.0851, Some(100.0), FeedOrigin::Mt5)
                .unwrap();
        assert_eq!(event.symbol(), "EURUSD");
        assert_eq!(event.bid(), 1.0850);
    }

    #[test]
    fn negative_bid_rejected() {
        let err = MarketDataEvent::new("EURUSD", ts(), -1.0, 1.0851, None, FeedOrigin::Mt5)
            .unwrap_err();
        assert_eq!(err, ValidationError::NotPositive("bid", -1.0));
    }

    #[test]
    fn empty_symbol_rejected() {
        let err = MarketDataEvent::new("", ts(), 1.0, 1.1, None, FeedOrigin::Demo).unwrap_err();
        assert_eq!(err, ValidationError::Empty("symbol"));
    }

    #[test]
    fn negative_volume_rejected() {
        let err = MarketDataEvent::new("EURUSD", ts(), 1.0, 1.1, Some(-5.0), FeedOrigin::Sim)
            .unwrap_err();
        assert_eq!(err, ValidationError::Negative("volume", -5.0));
    }

    #[test]
    fn feed_origin_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&FeedOrigin::Mt5).unwrap(),
            "\"mt5\""
        );
        assert_eq!("replay".parse::<FeedOrigin>().unwrap(), FeedOrigin::Replay);
    }
}
