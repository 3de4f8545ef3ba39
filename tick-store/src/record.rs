use chrono::{DateTime, NaiveDate, Utc};

/// One market tick as held in memory.
///
/// The `source` label is free-form (for example "mt5" or "sim") and is
/// persisted alongside the prices so replayed data stays attributable.
#[derive(Debug, Clone, PartialEq)]
pub struct TickRecord {
    pub timestamp: DateTime<Utc>,
    pub bid: f64,
    pub ask: f64,
    pub volume: Option<f64>,
    pub source: String,
}

impl TickRecord {
    /// The UTC calendar day this tick partitions into.
    pub fn day(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }
}
