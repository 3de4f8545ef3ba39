//! Wire codec: topic string + self-describing JSON payload.
//!
//! The payload is the record's field map plus two injected metadata
//! fields: `_event_type` (mirrors the topic) and `_timestamp` (UTC
//! ISO-8601 publish time). Decoding strips every `_`-prefixed key before
//! reconstructing the typed record, then re-runs record validation so a
//! malformed payload can never surface a partially-valid record.

use crate::error::WireError;
use crate::event::{Envelope, MarketEvent};
use crate::kind::EventKind;
use crate::market_data::MarketDataEvent;
use crate::order::OrderEvent;
use crate::position::PositionEvent;
use crate::signal::SignalEvent;
use crate::system_log::SystemLogEvent;
use crate::trade::TradeEvent;
use chrono::{DateTime, Utc};
use serde_json::Value;

const EVENT_TYPE_KEY: &str = "_event_type";
const TIMESTAMP_KEY: &str = "_timestamp";

/// Serializes an event into `(topic, payload)`, stamping the payload
/// with the current UTC publish time.
pub fn encode(event: &MarketEvent) -> Result<(&'static str, Vec<u8>), WireError> {
    encode_at(event, Utc::now())
}

/// Like [`encode`] but with an explicit publish time. Exposed for
/// deterministic tests.
pub fn encode_at(
    event: &MarketEvent,
    published_at: DateTime<Utc>,
) -> Result<(&'static str, Vec<u8>), WireError> {
    let topic = event.kind().topic();
    let mut value = match event {
        MarketEvent::MarketData(e) => serde_json::to_value(e),
        MarketEvent::Trade(e) => serde_json::to_value(e),
        MarketEvent::Signal(e) => serde_json::to_value(e),
        MarketEvent::SystemLog(e) => serde_json::to_value(e),
        MarketEvent::Order(e) => serde_json::to_value(e),
        MarketEvent::Position(e) => serde_json::to_value(e),
    }
    .map_err(WireError::Serialize)?;

    let map = value.as_object_mut().ok_or(WireError::NotAnObject)?;
    map.insert(EVENT_TYPE_KEY.to_string(), Value::String(topic.to_string()));
    map.insert(
        TIMESTAMP_KEY.to_string(),
        Value::String(published_at.to_rfc3339()),
    );

    let payload = serde_json::to_vec(&value).map_err(WireError::Serialize)?;
    Ok((topic, payload))
}

/// Decodes a `(topic, payload)` pair back into an [`Envelope`].
///
/// # Returns
///
/// * `Err(WireError::UnknownKind)` for unregistered topics; the caller
///   logs and drops. This must never panic or crash a dispatch loop.
/// * `Err(WireError::Malformed | Invalid)` for undecodable payloads.
pub fn decode(topic: &str, payload: &[u8]) -> Result<Envelope, WireError> {
    let kind =
        EventKind::from_topic(topic).ok_or_else(|| WireError::UnknownKind(topic.to_string()))?;

    let mut value: Value = serde_json::from_slice(payload).map_err(|source| {
        WireError::Malformed {
            kind: kind.topic(),
            source,
        }
    })?;

    let published_at = {
        let map = value.as_object_mut().ok_or(WireError::NotAnObject)?;
        let published_at = map
            .remove(TIMESTAMP_KEY)
            .as_ref()
            .and_then(Value::as_str)
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|parsed| parsed.with_timezone(&Utc))
            // Metadata is best-effort: a missing publish time falls back
            // to the receive time rather than failing the envelope.
            .unwrap_or_else(Utc::now);
        map.retain(|key, _| !key.starts_with('_'));
        published_at
    };

    let malformed = |source| WireError::Malformed {
        kind: kind.topic(),
        source,
    };
    let event = match kind {
        EventKind::MarketData => {
            MarketEvent::MarketData(serde_json::from_value::<MarketDataEvent>(value).map_err(malformed)?)
        }
        EventKind::Trade => {
            MarketEvent::Trade(serde_json::from_value::<TradeEvent>(value).map_err(malformed)?)
        }
        EventKind::Signal => {
            MarketEvent::Signal(serde_json::from_value::<SignalEvent>(value).map_err(malformed)?)
        }
        EventKind::SystemLog => {
            MarketEvent::SystemLog(serde_json::from_value::<SystemLogEvent>(value).map_err(malformed)?)
        }
        EventKind::Order => {
            MarketEvent::Order(serde_json::from_value::<OrderEvent>(value).map_err(malformed)?)
        }
        EventKind::Position => {
            MarketEvent::Position(serde_json::from_value::<PositionEvent>(value).map_err(malformed)?)
        }
    };
    event.validate()?;

    Ok(Envelope {
        kind,
        published_at,
        event,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::FeedOrigin;
    use crate::signal::SignalType;
    use crate::system_log::LogLevel;
    use crate::trade::TradeDirection;

    fn ts() -> DateTime<Utc> {
        "2024-01-15T10:30:00Z".parse().unwrap()
    }

    fn sample_events() -> Vec<MarketEvent> {
        vec![
            MarketDataEvent::new("EURUSD", ts(), 1.0850, 1.0851, Some(12.0), FeedOrigin::Mt5)
                .unwrap()
                .into(),
            TradeEvent::new(
                "EURUSD",
                ts(),
                TradeDirection::Buy,
                1.0851,
                0.1,
                "ord-1",
                Some("trend".to_string()),
            )
            .unwrap()
            .into(),
            SignalEvent::new(
                "EURUSD",
                ts(),
                SignalType::Buy,
                0.82,
                "trend",
                Some(1.0851),
                Some(1.0900),
                Some(1.0800),
            )
            .unwrap()
            .into(),
            SystemLogEvent::new(ts(), LogLevel::Info, "collector", "connected", None)
                .unwrap()
                .into(),
            crate::order::OrderEvent::new(
                "ord-1",
                ts(),
                "EURUSD",
                crate::order::OrderType::Limit,
                TradeDirection::Buy,
                0.1,
                Some(1.0851),
                crate::order::OrderStatus::Pending,
            )
            .unwrap()
            .into(),
            crate::position::PositionEvent::new(
                "pos-1",
                ts(),
                "EURUSD",
                crate::position::PositionDirection::Long,
                0.1,
                1.0851,
                1.0860,
                Some(9.0),
                crate::position::PositionStatus::Open,
            )
            .unwrap()
            .into(),
        ]
    }

    #[test]
    fn every_kind_round_trips() {
        for event in sample_events() {
            let (topic, payload) = encode(&event).unwrap();
            assert_eq!(topic, event.kind().topic());
            let envelope = decode(topic, &payload).unwrap();
            assert_eq!(envelope.kind, event.kind());
            assert_eq!(envelope.event, event);
        }
    }

    #[test]
    fn metadata_fields_are_injected_and_stripped() {
        let event: MarketEvent = MarketDataEvent::new(
            "EURUSD",
            ts(),
            1.0850,
            1.0851,
            None,
            FeedOrigin::Mt5,
        )
        .unwrap()
        .into();
        let published_at = ts();
        let (topic, payload) = encode_at(&event, published_at).unwrap();

        let raw: Value = serde_json::from_slice(&payload).unwrap();
        assert_eq!(raw["_event_type"], "market_data");
        assert_eq!(raw["_timestamp"], published_at.to_rfc3339());

        let envelope = decode(topic, &payload).unwrap();
        assert_eq!(envelope.published_at, published_at);
        assert_eq!(envelope.event, event);
    }

    #[test]
    fn unknown_topic_is_reported_not_panicked() {
        let err = decode("weather_report", b"{}").unwrap_err();
        assert!(matches!(err, WireError::UnknownKind(t) if t == "weather_report"));
    }

    #[test]
    fn malformed_payload_is_reported() {
        let err = decode("market_data", b"not json at all").unwrap_err();
        assert!(matches!(err, WireError::Malformed { kind: "market_data", .. }));
    }

    #[test]
    fn invalid_field_values_fail_decode() {
        // Hand-built payload with a negative bid: deserializes, but the
        // post-decode validation must reject it.
        let payload = serde_json::json!({
            "symbol": "EURUSD",
            "timestamp": ts().to_rfc3339(),
            "bid": -1.0,
            "ask": 1.0851,
            "source": "mt5",
        });
        let err = decode("market_data", payload.to_string().as_bytes()).unwrap_err();
        assert!(matches!(err, WireError::Invalid(_)));
    }

    #[test]
    fn missing_timestamp_metadata_is_tolerated() {
        let payload = serde_json::json!({
            "symbol": "EURUSD",
            "timestamp": ts().to_rfc3339(),
            "bid": 1.0850,
            "ask": 1.0851,
            "source": "mt5",
        });
        let envelope = decode("market_data", payload.to_string().as_bytes()).unwrap();
        assert_eq!(envelope.kind, EventKind::MarketData);
    }
}
