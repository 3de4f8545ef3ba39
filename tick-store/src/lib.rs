//! # Tick Store Library
//!
//! Date-partitioned persistence for market tick series.
//!
//! Ticks are laid out per symbol and day under a hive-style directory
//! tree and stored in a compressed columnar file per day. Reads
//! reassemble a date range back into a single in-memory series.
//!
//! ## Modules
//! - `record`: The in-memory tick row.
//! - `partition`: Path layout and date arithmetic.
//! - `columnar`: Columnar file encoding and decoding.
//! - `store`: The `TickStore` operations.

pub mod columnar;
pub mod error;
pub mod partition;
pub mod record;
pub mod store;

pub use error::StoreError;
pub use record::TickRecord;
pub use store::{StorageStats, SymbolStats, TickStore};
