use arrow::error::ArrowError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the tick store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("cannot store an empty batch of ticks")]
    EmptyInput,

    #[error("data file is missing required columns: {0:?}")]
    MissingColumns(Vec<String>),

    #[error("column '{0}' has an unexpected type")]
    ColumnType(&'static str),

    #[error("no data file at {0}")]
    NotFound(PathBuf),

    #[error("io failure on {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode columnar data")]
    Encode(#[source] ArrowError),

    #[error("failed to decode columnar data")]
    Decode(#[source] ArrowError),

    #[error("background read task failed")]
    Task(#[from] tokio::task::JoinError),
}
