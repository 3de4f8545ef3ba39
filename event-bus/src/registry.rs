//! Thread-safe subscriber registry.
//!
//! The registry is mutated by `subscribe`/`unsubscribe` from arbitrary
//! caller threads while the dispatch loop reads it to deliver envelopes;
//! a reader-writer lock keeps registration changes race-free against an
//! in-progress dispatch iteration.

use market_events::{Envelope, EventKind};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

/// A subscriber callback. Returning `Err` marks this delivery as failed;
/// the failure is logged and the remaining callbacks for the same
/// envelope still run.
pub type EventCallback = Box<dyn Fn(&Envelope) -> anyhow::Result<()> + Send + Sync>;

/// Opaque handle identifying one registration, returned by `subscribe`
/// and accepted by `unsubscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Registrations per event kind, owned by the bus for its lifetime.
pub struct SubscriberRegistry {
    subscribers: RwLock<HashMap<EventKind, Vec<(SubscriptionId, EventCallback)>>>,
    next_id: AtomicU64,
}

impl SubscriberRegistry {
    pub fn new() -> Self {
        Self {
            subscribers: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Registers `callback` for every future envelope of `kind`.
    ///
    /// Multiple callbacks may be registered for the same kind; they are
    /// invoked in registration order, but only "all will be invoked" is
    /// contractual.
    pub fn subscribe(&self, kind: EventKind, callback: EventCallback) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let mut subscribers = self.subscribers.write().unwrap();
        subscribers.entry(kind).or_default().push((id, callback));
        id
    }

    /// Removes a registration. No-op (not an error) if the id is not
    /// currently registered under `kind`.
    pub fn unsubscribe(&self, kind: EventKind, id: SubscriptionId) {
        let mut subscribers = self.subscribers.write().unwrap();
        if let Some(entries) = subscribers.get_mut(&kind) {
            entries.retain(|(entry_id, _)| *entry_id != id);
        }
    }

    /// Invokes every callback registered for the envelope's kind.
    ///
    /// Callbacks run on the caller's (dispatch loop's) thread; a failing
    /// callback is logged and does not prevent the remaining callbacks
    /// from running.
    pub fn dispatch(&self, envelope: &Envelope) {
        let subscribers = self.subscribers.read().unwrap();
        let Some(entries) = subscribers.get(&envelope.kind) else {
            log::debug!("no subscribers for '{}', envelope dropped", envelope.kind);
            return;
        };
        for (id, callback) in entries {
            if let Err(err) = callback(envelope) {
                log::error!(
                    "subscriber {:?} for '{}' failed: {:#}",
                    id,
                    envelope.kind,
                    err
                );
            }
        }
    }

    /// Number of callbacks currently registered for `kind`.
    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        self.subscribers
            .read()
            .unwrap()
            .get(&kind)
            .map_or(0, Vec::len)
    }
}

impl Default for SubscriberRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use market_events::{FeedOrigin, MarketDataEvent, MarketEvent};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn envelope() -> Envelope {
        let event: MarketEvent = MarketDataEvent::new(
            "EURUSD",
            Utc::now(),
            1.0850,
            1.0851,
            None,
            FeedOrigin::Mt5,
        )
        .unwrap()
        .into();
        Envelope {
            kind: event.kind(),
            published_at: Utc::now(),
            event,
        }
    }

    #[test]
    fn all_callbacks_for_kind_are_invoked() {
        let registry = SubscriberRegistry::new();
        let hits = Arc::new(AtomicUsize::new(0));
        for _ in 0..3 {
            let hits = hits.clone();
            registry.subscribe(
                EventKind::MarketData,
                Box::new(move |_| {
                    hits.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }),
            );
        }

        registry.dispatch(&envelope());
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn failing_callback_does_not_block_later_ones() {
        let registry = SubscriberRegistry::new();
        let hits = Arc::new(AtomicUsize::new(0));
        registry.subscribe(
            EventKind::MarketData,
            Box::new(|_| Err(anyhow::anyhow!("boom"))),
        );
        {
            let hits = hits.clone();
            registry.subscribe(
                EventKind::MarketData,
                Box::new(move |_| {
                    hits.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }),
            );
        }

        registry.dispatch(&envelope());
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unsubscribe_is_noop_for_unknown_id() {
        let registry = SubscriberRegistry::new();
        let id = registry.subscribe(EventKind::Trade, Box::new(|_| Ok(())));
        // Wrong kind: nothing removed
        registry.unsubscribe(EventKind::MarketData, id);
        assert_eq!(registry.subscriber_count(EventKind::Trade), 1);
        // Right kind: removed
        registry.unsubscribe(EventKind::Trade, id);
        assert_eq!(registry.subscriber_count(EventKind::Trade), 0);
        // Again: no-op
        registry.unsubscribe(EventKind::Trade, id);
    }

    #[test]
    fn dispatch_without_subscribers_is_silent() {
        let registry = SubscriberRegistry::new();
        registry.dispatch(&envelope());
    }
}
