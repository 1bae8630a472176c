//! Domain models shared across the service.

pub mod trade;

pub use trade::{parse_timestamp, ModelError, Side, Trade, TradeDetails, TradeDraft};
