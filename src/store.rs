//! # store
//!
//! The backing collection of trade records.
//!
//! The query engine only sees the [`TradeStore`] trait, handed to it as an
//! `Arc<dyn TradeStore>` at startup.  [`InMemoryTradeStore`] is the only
//! implementation: it is filled once (from [`sample_trades`] or a JSON seed
//! file) and never written to afterwards, so reads need no locking.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;
use tracing::info;

use crate::models::{ModelError, Side, Trade, TradeDetails, TradeDraft};

// ─── Errors ───────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("duplicate tradeId '{0}'")]
    DuplicateTradeId(String),

    #[error("failed to read trades file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse trades file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

// ─── TradeStore ───────────────────────────────────────────────────────────────

/// Read access to trade records.
///
/// `list_all` must return records in the store's iteration order; the engine
/// treats that order as the default result order.
pub trait TradeStore: Send + Sync {
    fn get_by_id(&self, trade_id: &str) -> Option<Trade>;

    fn list_all(&self) -> Vec<Trade>;

    fn len(&self) -> usize {
        self.list_all().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ─── InMemoryTradeStore ───────────────────────────────────────────────────────

/// Insertion-ordered trades with an id index.
#[derive(Debug, Default)]
pub struct InMemoryTradeStore {
    trades: Vec<Trade>,
    index: HashMap<String, usize>,
}

impl InMemoryTradeStore {
    pub fn new(trades: Vec<Trade>) -> Result<Self, StoreError> {
        let mut index = HashMap::with_capacity(trades.len());

        for (pos, trade) in trades.iter().enumerate() {
            if index.insert(trade.trade_id().to_string(), pos).is_some() {
                return Err(StoreError::DuplicateTradeId(trade.trade_id().to_string()));
            }
        }

        Ok(Self { trades, index })
    }

    /// Loads a JSON array of trades.  Every record is validated on the way in.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();

        let raw = std::fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let trades: Vec<Trade> =
            serde_json::from_str(&raw).map_err(|source| StoreError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        info!(path = %path.display(), count = trades.len(), "Loaded trades file");
        Self::new(trades)
    }
}

impl TradeStore for InMemoryTradeStore {
    fn get_by_id(&self, trade_id: &str) -> Option<Trade> {
        self.index.get(trade_id).map(|&pos| self.trades[pos].clone())
    }

    fn list_all(&self) -> Vec<Trade> {
        self.trades.clone()
    }

    fn len(&self) -> usize {
        self.trades.len()
    }
}

// ─── Sample data ──────────────────────────────────────────────────────────────

fn executed_at(hour: u32, min: u32, sec: u32, micro: u32) -> Result<NaiveDateTime, ModelError> {
    NaiveDate::from_ymd_opt(2022, 12, 28)
        .and_then(|d| d.and_hms_micro_opt(hour, min, sec, micro))
        .ok_or_else(|| ModelError::InvalidTimestamp(format!("2022-12-28 {hour}:{min}:{sec}.{micro}")))
}

/// The three canonical records served when no `TRADES_FILE` is configured.
#[allow(clippy::approx_constant)]
pub fn sample_trades() -> Result<Vec<Trade>, ModelError> {
    let drafts = vec![
        TradeDraft {
            asset_class: Some("Tech".into()),
            counterparty: Some("Pranay".into()),
            instrument_id: "1".into(),
            instrument_name: "Tata Elxsi".into(),
            trade_date_time: executed_at(23, 55, 59, 342_380)?,
            details: TradeDetails::new(Side::Sell, 100.0, 10)?,
            trade_id: "1".into(),
            trader: "Shalu".into(),
        },
        TradeDraft {
            asset_class: Some("Food".into()),
            counterparty: Some("Balaji".into()),
            instrument_id: "2".into(),
            instrument_name: "Tata Consumer Products".into(),
            trade_date_time: executed_at(23, 54, 59, 342_380)?,
            details: TradeDetails::new(Side::Sell, 200.0, 1)?,
            trade_id: "2".into(),
            trader: "Aman Chandel".into(),
        },
        TradeDraft {
            asset_class: Some("Automobile".into()),
            // Literal string, not an absent counterparty.
            counterparty: Some("Null".into()),
            instrument_id: "3".into(),
            instrument_name: "Tata Automobiles".into(),
            trade_date_time: executed_at(23, 53, 59, 342_380)?,
            details: TradeDetails::new(Side::Buy, 3.14, 5)?,
            trade_id: "3".into(),
            trader: "Shivani".into(),
        },
    ];

    drafts.into_iter().map(Trade::try_from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_store() -> InMemoryTradeStore {
        InMemoryTradeStore::new(sample_trades().unwrap()).unwrap()
    }

    #[test]
    fn test_sample_set_shape() {
        let store = sample_store();
        assert_eq!(store.len(), 3);

        let ids: Vec<_> = store.list_all().iter().map(|t| t.trade_id().to_string()).collect();
        assert_eq!(ids, ["1", "2", "3"]);
    }

    #[test]
    fn test_get_by_id() {
        let store = sample_store();

        let trade = store.get_by_id("2").unwrap();
        assert_eq!(trade.instrument_name(), "Tata Consumer Products");
        assert_eq!(trade.counterparty(), Some("Balaji"));

        assert!(store.get_by_id("99").is_none());
        assert!(store.get_by_id("").is_none());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let mut trades = sample_trades().unwrap();
        trades.push(trades[0].clone());

        match InMemoryTradeStore::new(trades) {
            Err(StoreError::DuplicateTradeId(id)) => assert_eq!(id, "1"),
            other => panic!("expected duplicate id error, got {other:?}"),
        }
    }

    #[test]
    fn test_from_json_file_round_trip() {
        let path = std::env::temp_dir().join(format!("trade-query-store-{}.json", std::process::id()));
        let json = serde_json::to_string(&sample_trades().unwrap()).unwrap();
        std::fs::write(&path, json).unwrap();

        let store = InMemoryTradeStore::from_json_file(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(store.list_all(), sample_trades().unwrap());
    }

    #[test]
    fn test_from_json_file_errors() {
        let missing = std::env::temp_dir().join("trade-query-definitely-missing.json");
        assert!(matches!(
            InMemoryTradeStore::from_json_file(&missing),
            Err(StoreError::Io { .. })
        ));

        let path = std::env::temp_dir().join(format!("trade-query-bad-{}.json", std::process::id()));
        std::fs::write(&path, "[{\"tradeId\": 1}]").unwrap();
        let result = InMemoryTradeStore::from_json_file(&path);
        let _ = std::fs::remove_file(&path);

        assert!(matches!(result, Err(StoreError::Parse { .. })));
    }
}
