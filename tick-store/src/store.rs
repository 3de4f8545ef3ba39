//! The `TickStore` operations: store, range read, and health probes.

use crate::columnar;
use crate::error::StoreError;
use crate::partition::{self, DATA_FILE, SERIES_DIR};
use crate::record::TickRecord;
use chrono::NaiveDate;
use futures::future::join_all;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Aggregate sizes per symbol, as reported by `storage_stats`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolStats {
    pub file_count: u64,
    pub total_bytes: u64,
}

/// Storage breakdown across symbols.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StorageStats {
    pub symbols: BTreeMap<String, SymbolStats>,
}

impl StorageStats {
    pub fn total_files(&self) -> u64 {
        self.symbols.values().map(|s| s.file_count).sum()
    }

    pub fn total_bytes(&self) -> u64 {
        self.symbols.values().map(|s| s.total_bytes).sum()
    }
}

/// File-backed tick persistence, partitioned per symbol and UTC day.
///
/// Every call runs on the caller's thread except `read`, which loads
/// independent daily partitions concurrently. Concurrent `store` calls
/// against the same (symbol, day) are not coordinated; the partition is
/// single-writer by contract and the last writer wins.
pub struct TickStore {
    base: PathBuf,
}

impl TickStore {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// Base directory of the partition tree.
    pub fn base(&self) -> &Path {
        &self.base
    }

    fn partition_path(&self, symbol: &str, day: NaiveDate) -> PathBuf {
        partition::partition_path(&self.base, symbol, day)
    }

    /// Writes one day's ticks, replacing any prior content for that
    /// partition. Callers provide `records` sorted by timestamp; the
    /// store persists them as given.
    ///
    /// # Returns
    ///
    /// * `Err(StoreError::EmptyInput)` if `records` is empty.
    /// * `Err` on encoding or filesystem failure.
    pub fn store(
        &self,
        symbol: &str,
        day: NaiveDate,
        records: &[TickRecord],
    ) -> Result<(), StoreError> {
        if records.is_empty() {
            return Err(StoreError::EmptyInput);
        }
        let path = self.partition_path(symbol, day);
        let bytes = columnar::write_file(&path, records)?;
        log::info!(
            "stored {} ticks for {} on {} ({} bytes)",
            records.len(),
            symbol.to_uppercase(),
            day,
            bytes
        );
        Ok(())
    }

    /// Loads every existing partition in `[start, end]` inclusive and
    /// returns the concatenated rows restricted to that date window.
    ///
    /// Days without a partition are skipped; a range with no data yields
    /// an empty vector, not an error. Partition files are loaded
    /// concurrently and reassembled in day order, so the result is
    /// timestamp-sorted whenever each partition was sorted on write.
    pub async fn read(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<TickRecord>, StoreError> {
        let loads: Vec<_> = partition::days_in_range(start, end)
            .into_iter()
            .map(|day| {
                let path = self.partition_path(symbol, day);
                tokio::task::spawn_blocking(move || columnar::read_file(&path))
            })
            .collect();

        let mut records = Vec::new();
        for result in join_all(loads).await {
            match result? {
                Ok(rows) => records.extend(rows),
                Err(StoreError::NotFound(_)) => {}
                Err(err) => return Err(err),
            }
        }
        // Partition-day granularity can include edge rows outside the
        // requested window; drop them without reordering.
        records.retain(|r| {
            let day = r.day();
            day >= start && day <= end
        });
        Ok(records)
    }

    /// Sorted list of days with a stored partition for `symbol`. Empty
    /// when the symbol has no partitions yet.
    pub fn available_dates(&self, symbol: &str) -> Result<Vec<NaiveDate>, StoreError> {
        let series_dir = self.base.join(symbol.to_uppercase()).join(SERIES_DIR);
        if !series_dir.exists() {
            return Ok(Vec::new());
        }
        let mut dates: Vec<NaiveDate> = walk_partitions(&series_dir)?
            .into_iter()
            .map(|(day, _)| day)
            .collect();
        dates.sort_unstable();
        Ok(dates)
    }

    /// Hex-encoded SHA-256 over the partition's core columns (timestamp
    /// nanoseconds, bid, ask) in on-disk order.
    ///
    /// A missing or unreadable partition yields the empty string; this
    /// probe never fails.
    pub fn checksum(&self, symbol: &str, day: NaiveDate) -> String {
        let path = self.partition_path(symbol, day);
        let records = match columnar::read_file(&path) {
            Ok(records) => records,
            Err(err) => {
                log::debug!("checksum unavailable for {}: {}", path.display(), err);
                return String::new();
            }
        };
        let mut hasher = Sha256::new();
        for record in &records {
            hasher.update(
                record
                    .timestamp
                    .timestamp_nanos_opt()
                    .unwrap_or(0)
                    .to_le_bytes(),
            );
            hasher.update(record.bid.to_le_bytes());
            hasher.update(record.ask.to_le_bytes());
        }
        hex::encode(hasher.finalize())
    }

    /// Structural health check for one partition: it must exist, decode,
    /// be non-empty, carry the mandatory columns, and be sorted ascending
    /// by timestamp.
    ///
    /// Any failure is logged with its cause and reported as `false`; this
    /// probe never fails.
    pub fn verify_integrity(&self, symbol: &str, day: NaiveDate) -> bool {
        let path = self.partition_path(symbol, day);
        let records = match columnar::read_file(&path) {
            Ok(records) => records,
            Err(err) => {
                log::warn!("integrity check failed for {}: {}", path.display(), err);
                return false;
            }
        };
        if records.is_empty() {
            log::warn!("integrity check failed for {}: no rows", path.display());
            return false;
        }
        let sorted = records.windows(2).all(|w| w[0].timestamp <= w[1].timestamp);
        if !sorted {
            log::warn!(
                "integrity check failed for {}: timestamps not sorted",
                path.display()
            );
            return false;
        }
        true
    }

    /// File count and total size of the partition tree, per symbol,
    /// optionally scoped to one symbol. Unreadable entries are skipped.
    pub fn storage_stats(&self, symbol: Option<&str>) -> StorageStats {
        let mut stats = StorageStats::default();
        let symbols: Vec<String> = match symbol {
            Some(symbol) => vec![symbol.to_uppercase()],
            None => list_dirs(&self.base),
        };
        for symbol in symbols {
            let series_dir = self.base.join(&symbol).join(SERIES_DIR);
            if !series_dir.exists() {
                continue;
            }
            let partitions = match walk_partitions(&series_dir) {
                Ok(partitions) => partitions,
                Err(err) => {
                    log::debug!("skipping stats for {}: {}", symbol, err);
                    continue;
                }
            };
            let entry = stats.symbols.entry(symbol).or_default();
            for (_, path) in partitions {
                if let Ok(meta) = std::fs::metadata(&path) {
                    entry.file_count += 1;
                    entry.total_bytes += meta.len();
                }
            }
        }
        stats
    }
}

/// Names of the immediate subdirectories of `dir`; empty on any error.
fn list_dirs(dir: &Path) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    entries
        .flatten()
        .filter(|e| e.path().is_dir())
        .filter_map(|e| e.file_name().into_string().ok())
        .collect()
}

/// Every (day, data file path) pair under one symbol's series directory.
/// Directories that do not follow the hive naming are ignored.
fn walk_partitions(series_dir: &Path) -> Result<Vec<(NaiveDate, PathBuf)>, StoreError> {
    let io_err = |source| StoreError::Io {
        path: series_dir.to_path_buf(),
        source,
    };

    let mut partitions = Vec::new();
    for year_entry in std::fs::read_dir(series_dir).map_err(io_err)? {
        let year_entry = year_entry.map_err(io_err)?;
        let Some(year) = dir_component(&year_entry, "year=") else {
            continue;
        };
        for month_entry in std::fs::read_dir(year_entry.path()).map_err(io_err)? {
            let month_entry = month_entry.map_err(io_err)?;
            let Some(month) = dir_component(&month_entry, "month=") else {
                continue;
            };
            for day_entry in std::fs::read_dir(month_entry.path()).map_err(io_err)? {
                let day_entry = day_entry.map_err(io_err)?;
                let Some(day) = dir_component(&day_entry, "day=") else {
                    continue;
                };
                let data_path = day_entry.path().join(DATA_FILE);
                let date = NaiveDate::from_ymd_opt(year as i32, month, day);
                if let Some(date) = date.filter(|_| data_path.is_file()) {
                    partitions.push((date, data_path));
                }
            }
        }
    }
    Ok(partitions)
}

fn dir_component(entry: &std::fs::DirEntry, prefix: &str) -> Option<u32> {
    if !entry.path().is_dir() {
        return None;
    }
    partition::parse_component(prefix, entry.file_name().to_str()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn ticks_on(day: NaiveDate, count: usize) -> Vec<TickRecord> {
        (0..count)
            .map(|i| TickRecord {
                timestamp: day
                    .and_hms_opt(9, 0, 0)
                    .unwrap()
                    .and_utc()
                    + chrono::Duration::seconds(i as i64),
                bid: 1.0850,
                ask: 1.0851,
                volume: Some(1.0),
                source: "mt5".to_string(),
            })
            .collect()
    }

    #[test]
    fn empty_input_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = TickStore::new(dir.path());
        let day = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let err = store.store("EURUSD", day, &[]).unwrap_err();
        assert!(matches!(err, StoreError::EmptyInput));
    }

    #[test]
    fn store_is_whole_file_replace() {
        let dir = tempfile::tempdir().unwrap();
        let store = TickStore::new(dir.path());
        let day = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();

        store.store("EURUSD", day, &ticks_on(day, 5)).unwrap();
        store.store("EURUSD", day, &ticks_on(day, 2)).unwrap();

        let checksum = store.checksum("EURUSD", day);
        let expected = {
            let mut hasher = Sha256::new();
            for record in ticks_on(day, 2) {
                hasher.update(record.timestamp.timestamp_nanos_opt().unwrap().to_le_bytes());
                hasher.update(record.bid.to_le_bytes());
                hasher.update(record.ask.to_le_bytes());
            }
            hex::encode(hasher.finalize())
        };
        assert_eq!(checksum, expected);
    }

    #[test]
    fn checksum_of_missing_partition_is_empty_sentinel() {
        let dir = tempfile::tempdir().unwrap();
        let store = TickStore::new(dir.path());
        let day = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(store.checksum("EURUSD", day), "");
    }

    #[test]
    fn available_dates_sorted_across_months() {
        let dir = tempfile::tempdir().unwrap();
        let store = TickStore::new(dir.path());
        let feb = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let jan_a = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let jan_b = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();

        for day in [feb, jan_a, jan_b] {
            store.store("eurusd", day, &ticks_on(day, 1)).unwrap();
        }

        assert_eq!(
            store.available_dates("EURUSD").unwrap(),
            vec![jan_b, jan_a, feb]
        );
        assert!(store.available_dates("GBPUSD").unwrap().is_empty());
    }

    #[tokio::test]
    async fn read_filters_rows_outside_the_window() {
        let dir = tempfile::tempdir().unwrap();
        let store = TickStore::new(dir.path());
        let day = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();

        // A partition polluted with a row from the previous day
        let mut rows = vec![TickRecord {
            timestamp: Utc.with_ymd_and_hms(2024, 1, 14, 23, 59, 59).unwrap(),
            bid: 1.0,
            ask: 1.1,
            volume: None,
            source: "mt5".to_string(),
        }];
        rows.extend(ticks_on(day, 3));
        store.store("EURUSD", day, &rows).unwrap();

        let read = store.read("EURUSD", day, day).await.unwrap();
        assert_eq!(read.len(), 3);
        assert!(read.iter().all(|r| r.day() == day));
    }

    #[test]
    fn stats_are_broken_down_per_symbol() {
        let dir = tempfile::tempdir().unwrap();
        let store = TickStore::new(dir.path());
        let day = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let next = NaiveDate::from_ymd_opt(2024, 1, 16).unwrap();

        store.store("EURUSD", day, &ticks_on(day, 3)).unwrap();
        store.store("EURUSD", next, &ticks_on(next, 3)).unwrap();
        store.store("GBPUSD", day, &ticks_on(day, 3)).unwrap();

        let all = store.storage_stats(None);
        assert_eq!(all.total_files(), 3);
        assert_eq!(all.symbols["EURUSD"].file_count, 2);
        assert_eq!(all.symbols["GBPUSD"].file_count, 1);
        assert!(all.total_bytes() > 0);

        let scoped = store.storage_stats(Some("gbpusd"));
        assert_eq!(scoped.total_files(), 1);
        assert!(!scoped.symbols.contains_key("EURUSD"));
    }

    #[test]
    fn stats_on_empty_base_are_zero() {
        let dir = tempfile::tempdir().unwrap();
        let store = TickStore::new(dir.path());
        let stats = store.storage_stats(None);
        assert_eq!(stats.total_files(), 0);
        assert_eq!(stats.total_bytes(), 0);
    }
}
