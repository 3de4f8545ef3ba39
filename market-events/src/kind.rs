//! The closed set of event kinds routed by the bus.
//!
//! Adding a kind is a compile-time-checked change: every decode site
//! matches exhaustively on `EventKind`. Unknown topic strings can only
//! appear at the wire edge, where `from_topic` returns `None`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Tag selecting which typed record a message carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    MarketData,
    Trade,
    Signal,
    SystemLog,
    Order,
    Position,
}

impl EventKind {
    /// Every registered kind, in a stable order.
    pub const ALL: [EventKind; 6] = [
        EventKind::MarketData,
        EventKind::Trade,
        EventKind::Signal,
        EventKind::SystemLog,
        EventKind::Order,
        EventKind::Position,
    ];

    /// The wire topic this kind is published under.
    pub fn topic(&self) -> &'static str {
        match self {
            EventKind::MarketData => "market_data",
            EventKind::Trade => "trade",
            EventKind::Signal => "signal",
            EventKind::SystemLog => "system_log",
            EventKind::Order => "order",
            EventKind::Position => "position",
        }
    }

    /// Resolves a wire topic back to a kind. `None` for unregistered
    /// topics; the caller decides whether to log and drop.
    pub fn from_topic(topic: &str) -> Option<Self> {
        match topic {
            "market_data" => Some(EventKind::MarketData),
            "trade" => Some(EventKind::Trade),
            "signal" => Some(EventKind::Signal),
            "system_log" => Some(EventKind::SystemLog),
            "order" => Some(EventKind::Order),
            "position" => Some(EventKind::Position),
            _ => None,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.topic())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topic_round_trip() {
        for kind in EventKind::ALL {
            assert_eq!(EventKind::from_topic(kind.topic()), Some(kind));
        }
    }

    #[test]
    fn unknown_topic_is_none() {
        assert_eq!(EventKind::from_topic("weather_report"), None);
        assert_eq!(EventKind::from_topic(""), None);
    }
}
