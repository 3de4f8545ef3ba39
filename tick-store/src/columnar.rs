//! Columnar encoding of one day of ticks.
//!
//! Each partition file is an Arrow IPC file with LZ4-compressed record
//! batches. Timestamps are stored as UTC nanoseconds in an `Int64`
//! column; prices and volume are `Float64`, the feed label is `Utf8`.
//! Files are written to a temp path and renamed into place so a crashed
//! write never leaves a truncated partition behind.

use crate::error::StoreError;
use crate::record::TickRecord;
use arrow::array::{Array, ArrayRef, Float64Array, Int64Array, RecordBatch, StringArray};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::ipc::reader::FileReader;
use arrow::ipc::writer::{FileWriter, IpcWriteOptions};
use arrow::ipc::CompressionType;
use chrono::DateTime;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

/// Columns every partition file must carry. `volume` is nullable.
pub const REQUIRED_COLUMNS: [&str; 4] = ["timestamp", "bid", "ask", "source"];

fn tick_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new("timestamp", DataType::Int64, false),
        Field::new("bid", DataType::Float64, false),
        Field::new("ask", DataType::Float64, false),
        Field::new("volume", DataType::Float64, true),
        Field::new("source", DataType::Utf8, false),
    ]))
}

fn to_batch(records: &[TickRecord]) -> Result<RecordBatch, StoreError> {
    let timestamps: ArrayRef = Arc::new(Int64Array::from(
        records
            .iter()
            .map(|r| r.timestamp.timestamp_nanos_opt().unwrap_or(0))
            .collect::<Vec<i64>>(),
    ));
    let bids: ArrayRef = Arc::new(Float64Array::from(
        records.iter().map(|r| r.bid).collect::<Vec<f64>>(),
    ));
    let asks: ArrayRef = Arc::new(Float64Array::from(
        records.iter().map(|r| r.ask).collect::<Vec<f64>>(),
    ));
    let volumes: ArrayRef = Arc::new(Float64Array::from(
        records.iter().map(|r| r.volume).collect::<Vec<Option<f64>>>(),
    ));
    let sources: ArrayRef = Arc::new(StringArray::from(
        records.iter().map(|r| r.source.as_str()).collect::<Vec<&str>>(),
    ));

    RecordBatch::try_new(tick_schema(), vec![timestamps, bids, asks, volumes, sources])
        .map_err(StoreError::Encode)
}

/// Writes `records` as one compressed partition file, replacing any
/// existing file at `path`. Returns the file size in bytes.
pub fn write_file(path: &Path, records: &[TickRecord]) -> Result<u64, StoreError> {
    let io_err = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }

    let batch = to_batch(records)?;
    let options = IpcWriteOptions::default()
        .try_with_compression(Some(CompressionType::LZ4_FRAME))
        .map_err(StoreError::Encode)?;

    // Write to a sibling temp file, then rename over the target
    let temp_path = path.with_extension("tmp");
    let temp_file = File::create(&temp_path).map_err(io_err)?;
    let mut writer = FileWriter::try_new_with_options(temp_file, batch.schema_ref(), options)
        .map_err(StoreError::Encode)?;
    writer.write(&batch).map_err(StoreError::Encode)?;
    writer.finish().map_err(StoreError::Encode)?;
    let temp_file = writer.into_inner().map_err(StoreError::Encode)?;
    temp_file.sync_all().map_err(io_err)?;
    drop(temp_file);

    std::fs::rename(&temp_path, path).map_err(io_err)?;
    let bytes = std::fs::metadata(path).map_err(io_err)?.len();
    Ok(bytes)
}

/// Reads one partition file back into tick rows, preserving file order.
///
/// # Returns
///
/// * `Err(StoreError::NotFound)` if the file does not exist.
/// * `Err(StoreError::MissingColumns)` if a required column is absent.
pub fn read_file(path: &Path) -> Result<Vec<TickRecord>, StoreError> {
    if !path.exists() {
        return Err(StoreError::NotFound(path.to_path_buf()));
    }
    let file = File::open(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = FileReader::try_new(file, None).map_err(StoreError::Decode)?;

    let schema = reader.schema();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|name| schema.column_with_name(name).is_none())
        .map(|name| name.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(StoreError::MissingColumns(missing));
    }

    let mut records = Vec::new();
    for batch in reader {
        let batch = batch.map_err(StoreError::Decode)?;
        decode_batch(&batch, &mut records)?;
    }
    Ok(records)
}

fn decode_batch(batch: &RecordBatch, out: &mut Vec<TickRecord>) -> Result<(), StoreError> {
    let timestamps = batch
        .column_by_name("timestamp")
        .and_then(|c| c.as_any().downcast_ref::<Int64Array>())
        .ok_or(StoreError::ColumnType("timestamp"))?;
    let bids = batch
        .column_by_name("bid")
        .and_then(|c| c.as_any().downcast_ref::<Float64Array>())
        .ok_or(StoreError::ColumnType("bid"))?;
    let asks = batch
        .column_by_name("ask")
        .and_then(|c| c.as_any().downcast_ref::<Float64Array>())
        .ok_or(StoreError::ColumnType("ask"))?;
    let volumes = batch
        .column_by_name("volume")
        .and_then(|c| c.as_any().downcast_ref::<Float64Array>());
    let sources = batch
        .column_by_name("source")
        .and_then(|c| c.as_any().downcast_ref::<StringArray>())
        .ok_or(StoreError::ColumnType("source"))?;

    out.reserve(batch.num_rows());
    for i in 0..batch.num_rows() {
        let volume = match volumes {
            Some(col) if !col.is_null(i) => Some(col.value(i)),
            _ => None,
        };
        out.push(TickRecord {
            timestamp: DateTime::from_timestamp_nanos(timestamps.value(i)),
            bid: bids.value(i),
            ask: asks.value(i),
            volume,
            source: sources.value(i).to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample(n: usize) -> Vec<TickRecord> {
        (0..n)
            .map(|i| TickRecord {
                timestamp: Utc::now() + chrono::Duration::milliseconds(i as i64),
                bid: 1.0850 + i as f64 * 0.0001,
                ask: 1.0851 + i as f64 * 0.0001,
                volume: if i % 2 == 0 { Some(i as f64) } else { None },
                source: "mt5".to_string(),
            })
            .collect()
    }

    #[test]
    fn write_then_read_preserves_rows_and_nulls() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.arrow");
        let records = sample(10);

        let bytes = write_file(&path, &records).unwrap();
        assert!(bytes > 0);

        let loaded = read_file(&path).unwrap();
        assert_eq!(loaded.len(), 10);
        assert_eq!(loaded[0].bid, records[0].bid);
        assert_eq!(loaded[1].volume, None);
        assert_eq!(loaded[2].volume, Some(2.0));
        assert_eq!(loaded[0].source, "mt5");
        // Nanosecond precision survives the round trip
        assert_eq!(loaded[0].timestamp, records[0].timestamp);
    }

    #[test]
    fn rewrite_replaces_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.arrow");

        write_file(&path, &sample(10)).unwrap();
        write_file(&path, &sample(3)).unwrap();
        assert_eq!(read_file(&path).unwrap().len(), 3);
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_file(&dir.path().join("data.arrow")).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[test]
    fn foreign_file_missing_columns_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.arrow");

        // A well-formed file from some other producer, lacking "ask"
        let schema = Arc::new(Schema::new(vec![
            Field::new("timestamp", DataType::Int64, false),
            Field::new("bid", DataType::Float64, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Int64Array::from(vec![1_i64])) as ArrayRef,
                Arc::new(Float64Array::from(vec![1.0_f64])) as ArrayRef,
            ],
        )
        .unwrap();
        let file = File::create(&path).unwrap();
        let mut writer = FileWriter::try_new(file, &schema).unwrap();
        writer.write(&batch).unwrap();
        writer.finish().unwrap();

        match read_file(&path).unwrap_err() {
            StoreError::MissingColumns(cols) => {
                assert_eq!(cols, vec!["ask".to_string(), "source".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
