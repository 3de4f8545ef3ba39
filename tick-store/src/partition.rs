//! Hive-style partition layout.
//!
//! One file per symbol and UTC day:
//!
//! ```text
//! <base>/<SYMBOL>/tick/year=YYYY/month=MM/day=DD/data.arrow
//! ```
//!
//! Symbols are normalized to uppercase so "eurusd" and "EURUSD" land in
//! the same partition.

use chrono::{Datelike, NaiveDate};
use std::path::{Path, PathBuf};

/// File name of the per-day data file.
pub const DATA_FILE: &str = "data.arrow";

/// Directory name separating tick data from other per-symbol series.
pub const SERIES_DIR: &str = "tick";

/// Absolute path of the data file for one symbol and day.
pub fn partition_path(base: &Path, symbol: &str, day: NaiveDate) -> PathBuf {
    base.join(symbol.to_uppercase())
        .join(SERIES_DIR)
        .join(format!("year={:04}", day.year()))
        .join(format!("month={:02}", day.month()))
        .join(format!("day={:02}", day.day()))
        .join(DATA_FILE)
}

/// All days from `start` through `end`, inclusive. Empty when the range
/// is inverted.
pub fn days_in_range(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut days = Vec::new();
    let mut day = start;
    while day <= end {
        days.push(day);
        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }
    days
}

/// Parses one hive directory component, e.g. `("year=", "year=2024")`.
pub fn parse_component(prefix: &str, name: &str) -> Option<u32> {
    name.strip_prefix(prefix)?.parse().ok()
}
