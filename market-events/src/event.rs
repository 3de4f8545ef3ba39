//! The tagged union over all registered event records, plus the
//! transport-level envelope.

use crate::error::ValidationError;
use crate::kind::EventKind;
use crate::market_data::MarketDataEvent;
use crate::order::OrderEvent;
use crate::position::PositionEvent;
use crate::signal::SignalEvent;
use crate::system_log::SystemLogEvent;
use crate::trade::TradeEvent;
use chrono::{DateTime, Utc};

/// One variant per registered event kind. The mapping to `EventKind` is
/// total; matching on this enum is how application code consumes events.
#[derive(Debug, Clone, PartialEq)]
pub enum MarketEvent {
    MarketData(MarketDataEvent),
    Trade(TradeEvent),
    Signal(SignalEvent),
    SystemLog(SystemLogEvent),
    Order(OrderEvent),
    Position(PositionEvent),
}

impl MarketEvent {
    /// The kind tag this event is routed under.
    pub fn kind(&self) -> EventKind {
        match self {
            MarketEvent::MarketData(_) => EventKind::MarketData,
            MarketEvent::Trade(_) => EventKind::Trade,
            MarketEvent::Signal(_) => EventKind::Signal,
            MarketEvent::SystemLog(_) => EventKind::SystemLog,
            MarketEvent::Order(_) => EventKind::Order,
            MarketEvent::Position(_) => EventKind::Position,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ValidationError> {
        match self {
            MarketEvent::MarketData(e) => e.validate(),
            MarketEvent::Trade(e) => e.validate(),
            MarketEvent::Signal(e) => e.validate(),
            MarketEvent::SystemLog(e) => e.validate(),
            MarketEvent::Order(e) => e.validate(),
            MarketEvent::Position(e) => e.validate(),
        }
    }
}

impl From<MarketDataEvent> for MarketEvent {
    fn from(event: MarketDataEvent) -> Self {
        MarketEvent::MarketData(event)
    }
}

impl From<TradeEvent> for MarketEvent {
    fn from(event: TradeEvent) -> Self {
        MarketEvent::Trade(event)
    }
}

impl From<SignalEvent> for MarketEvent {
    fn from(event: SignalEvent) -> Self {
        MarketEvent::Signal(event)
    }
}

impl From<SystemLogEvent> for MarketEvent {
    fn from(event: SystemLogEvent) -> Self {
        MarketEvent::SystemLog(event)
    }
}

impl From<OrderEvent> for MarketEvent {
    fn from(event: OrderEvent) -> Self {
        MarketEvent::Order(event)
    }
}

impl From<PositionEvent> for MarketEvent {
    fn from(event: PositionEvent) -> Self {
        MarketEvent::Position(event)
    }
}

/// The wrapper every message crosses the bus in: the kind tag, the UTC
/// publish time (independent of any timestamp inside the payload), and
/// the typed record itself.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub kind: EventKind,
    pub published_at: DateTime<Utc>,
    pub event: MarketEvent,
}
