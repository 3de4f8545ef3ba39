//! # Market Events Library
//!
//! The closed event schema shared by every component of the tick platform.
//!
//! ## Modules
//! - `kind`: The `EventKind` tag set and its wire topic mapping.
//! - `market_data`, `trade`, `signal`, `system_log`, `order`, `position`:
//!   One validated record type per event kind.
//! - `event`: The `MarketEvent` tagged union and the `Envelope` wrapper.
//! - `codec`: Topic + JSON payload wire codec with metadata injection.
//! - `error`: Validation and wire error types.

pub mod codec;
pub mod error;
pub mod event;
pub mod kind;
pub mod market_data;
pub mod order;
pub mod position;
pub mod signal;
pub mod system_log;
pub mod trade;

pub use error::{ValidationError, WireError};
pub use event::{Envelope, MarketEvent};
pub use kind::EventKind;
pub use market_data::{FeedOrigin, MarketDataEvent};
pub use order::{OrderEvent, OrderStatus, OrderType};
pub use position::{PositionDirection, PositionEvent, PositionStatus};
pub use signal::{SignalEvent, SignalType};
pub use system_log::{LogLevel, SystemLogEvent};
pub use trade::{TradeDirection, TradeEvent};
