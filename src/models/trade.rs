//! # models::trade
//!
//! Defines [`Trade`] and its embedded [`TradeDetails`], the read-only records
//! served by every endpoint.
//!
//! Both types are immutable once built.  Construction always goes through
//! validation, including deserialisation from a seed file (`serde(try_from)`),
//! so a `Trade` in memory is known to satisfy:
//!
//! * `tradeId` is non-empty
//! * `price` is finite and `>= 0`
//! * `quantity` is `> 0`

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ─── Errors ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("tradeId must not be empty")]
    EmptyTradeId,

    #[error("price must be a finite, non-negative number (got {0})")]
    InvalidPrice(f64),

    #[error("quantity must be greater than zero")]
    InvalidQuantity,

    #[error("unknown trade side '{0}', expected BUY or SELL")]
    UnknownSide(String),

    #[error("unrecognised timestamp '{0}'")]
    InvalidTimestamp(String),
}

// ─── Side ─────────────────────────────────────────────────────────────────────

/// Buy/sell indicator of a trade.  Travels on the wire as `"BUY"` / `"SELL"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "BUY",
            Side::Sell => "SELL",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = ModelError;

    /// Exact match only: `"buy"` is not a side, same as on the wire.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BUY" => Ok(Side::Buy),
            "SELL" => Ok(Side::Sell),
            other => Err(ModelError::UnknownSide(other.to_string())),
        }
    }
}

// ─── TradeDetails ─────────────────────────────────────────────────────────────

/// Economic terms of a trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTradeDetails")]
pub struct TradeDetails {
    #[serde(rename = "buySellIndicator")]
    side: Side,
    price: f64,
    quantity: u64,
}

impl TradeDetails {
    pub fn new(side: Side, price: f64, quantity: u64) -> Result<Self, ModelError> {
        if !price.is_finite() || price < 0.0 {
            return Err(ModelError::InvalidPrice(price));
        }
        if quantity == 0 {
            return Err(ModelError::InvalidQuantity);
        }
        Ok(Self { side, price, quantity })
    }

    #[inline]
    pub fn side(&self) -> Side {
        self.side
    }

    #[inline]
    pub fn price(&self) -> f64 {
        self.price
    }

    #[inline]
    pub fn quantity(&self) -> u64 {
        self.quantity
    }
}

#[derive(Deserialize)]
struct RawTradeDetails {
    #[serde(rename = "buySellIndicator")]
    side: Side,
    price: f64,
    quantity: u64,
}

impl TryFrom<RawTradeDetails> for TradeDetails {
    type Error = ModelError;

    fn try_from(raw: RawTradeDetails) -> Result<Self, Self::Error> {
        TradeDetails::new(raw.side, raw.price, raw.quantity)
    }
}

// ─── Trade ────────────────────────────────────────────────────────────────────

/// A single executed trade.
///
/// Field order matches the wire order.  Build one from a [`TradeDraft`]:
///
/// ```ignore
/// let trade = Trade::try_from(draft)?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "TradeDraft")]
pub struct Trade {
    asset_class: Option<String>,
    counterparty: Option<String>,
    instrument_id: String,
    instrument_name: String,
    trade_date_time: NaiveDateTime,
    #[serde(rename = "tradeDetails")]
    details: TradeDetails,
    trade_id: String,
    trader: String,
}

/// Unvalidated input for a [`Trade`].  Also the deserialisation shape.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeDraft {
    #[serde(default)]
    pub asset_class: Option<String>,
    #[serde(default)]
    pub counterparty: Option<String>,
    pub instrument_id: String,
    pub instrument_name: String,
    pub trade_date_time: NaiveDateTime,
    #[serde(rename = "tradeDetails")]
    pub details: TradeDetails,
    pub trade_id: String,
    pub trader: String,
}

impl TryFrom<TradeDraft> for Trade {
    type Error = ModelError;

    fn try_from(draft: TradeDraft) -> Result<Self, Self::Error> {
        if draft.trade_id.is_empty() {
            return Err(ModelError::EmptyTradeId);
        }
        Ok(Self {
            asset_class: draft.asset_class,
            counterparty: draft.counterparty,
            instrument_id: draft.instrument_id,
            instrument_name: draft.instrument_name,
            trade_date_time: draft.trade_date_time,
            details: draft.details,
            trade_id: draft.trade_id,
            trader: draft.trader,
        })
    }
}

impl Trade {
    pub fn trade_id(&self) -> &str {
        &self.trade_id
    }

    pub fn asset_class(&self) -> Option<&str> {
        self.asset_class.as_deref()
    }

    pub fn counterparty(&self) -> Option<&str> {
        self.counterparty.as_deref()
    }

    pub fn instrument_id(&self) -> &str {
        &self.instrument_id
    }

    pub fn instrument_name(&self) -> &str {
        &self.instrument_name
    }

    pub fn trade_date_time(&self) -> NaiveDateTime {
        self.trade_date_time
    }

    pub fn trader(&self) -> &str {
        &self.trader
    }

    pub fn details(&self) -> &TradeDetails {
        &self.details
    }
}

// ─── Timestamp parsing ────────────────────────────────────────────────────────

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parses a query-string timestamp into the naive clock used by trade records.
///
/// Offsets are normalised to UTC.  A bare date means midnight.
pub fn parse_timestamp(input: &str) -> Result<NaiveDateTime, ModelError> {
    let input = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.naive_utc());
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(input, fmt) {
            return Ok(dt);
        }
    }

    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map(|date| date.and_time(NaiveTime::MIN))
        .map_err(|_| ModelError::InvalidTimestamp(input.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ts(s: &str) -> NaiveDateTime {
        parse_timestamp(s).unwrap()
    }

    fn draft(trade_id: &str) -> TradeDraft {
        TradeDraft {
            asset_class: Some("Equity".into()),
            counterparty: None,
            instrument_id: "TSLA".into(),
            instrument_name: "Tesla Inc".into(),
            trade_date_time: ts("2023-01-02T10:00:00.5"),
            details: TradeDetails::new(Side::Buy, 12.5, 4).unwrap(),
            trade_id: trade_id.into(),
            trader: "Jo".into(),
        }
    }

    #[test]
    fn test_details_reject_negative_price() {
        assert_eq!(
            TradeDetails::new(Side::Sell, -0.01, 1),
            Err(ModelError::InvalidPrice(-0.01))
        );
        assert!(TradeDetails::new(Side::Sell, f64::NAN, 1).is_err());
    }

    #[test]
    fn test_details_reject_zero_quantity() {
        assert_eq!(
            TradeDetails::new(Side::Buy, 1.0, 0),
            Err(ModelError::InvalidQuantity)
        );
    }

    #[test]
    fn test_zero_price_is_allowed() {
        assert!(TradeDetails::new(Side::Buy, 0.0, 1).is_ok());
    }

    #[test]
    fn test_trade_rejects_empty_id() {
        assert_eq!(Trade::try_from(draft("")), Err(ModelError::EmptyTradeId));
    }

    #[test]
    fn test_side_parsing_is_exact() {
        assert_eq!("BUY".parse::<Side>(), Ok(Side::Buy));
        assert_eq!("SELL".parse::<Side>(), Ok(Side::Sell));
        assert!("buy".parse::<Side>().is_err());
    }

    #[test]
    fn test_wire_names() {
        let trade = Trade::try_from(draft("7")).unwrap();
        let value = serde_json::to_value(&trade).unwrap();

        assert_eq!(
            value,
            json!({
                "assetClass": "Equity",
                "counterparty": null,
                "instrumentId": "TSLA",
                "instrumentName": "Tesla Inc",
                "tradeDateTime": "2023-01-02T10:00:00.500",
                "tradeDetails": { "buySellIndicator": "BUY", "price": 12.5, "quantity": 4 },
                "tradeId": "7",
                "trader": "Jo",
            })
        );
    }

    #[test]
    fn test_deserialize_validates() {
        let bad_quantity = json!({
            "instrumentId": "X",
            "instrumentName": "X",
            "tradeDateTime": "2023-01-02T10:00:00",
            "tradeDetails": { "buySellIndicator": "SELL", "price": 1.0, "quantity": 0 },
            "tradeId": "1",
            "trader": "T",
        });
        assert!(serde_json::from_value::<Trade>(bad_quantity).is_err());

        let empty_id = json!({
            "instrumentId": "X",
            "instrumentName": "X",
            "tradeDateTime": "2023-01-02T10:00:00",
            "tradeDetails": { "buySellIndicator": "SELL", "price": 1.0, "quantity": 3 },
            "tradeId": "",
            "trader": "T",
        });
        assert!(serde_json::from_value::<Trade>(empty_id).is_err());
    }

    #[test]
    fn test_deserialize_defaults_optional_fields() {
        let value = json!({
            "instrumentId": "X",
            "instrumentName": "Y",
            "tradeDateTime": "2023-01-02T10:00:00.123456",
            "tradeDetails": { "buySellIndicator": "BUY", "price": 2.0, "quantity": 3 },
            "tradeId": "9",
            "trader": "T",
        });
        let trade: Trade = serde_json::from_value(value).unwrap();
        assert_eq!(trade.asset_class(), None);
        assert_eq!(trade.counterparty(), None);
        assert_eq!(trade.details().quantity(), 3);
    }

    #[test]
    fn test_parse_timestamp_forms() {
        let expected = NaiveDate::from_ymd_opt(2022, 12, 28)
            .unwrap()
            .and_hms_micro_opt(23, 54, 59, 342_380)
            .unwrap();

        assert_eq!(ts("2022-12-28T23:54:59.342380"), expected);
        assert_eq!(ts("2022-12-28 23:54:59.342380"), expected);
        assert_eq!(ts("2022-12-29T01:54:59.342380+02:00"), expected);
        assert_eq!(ts("2022-12-28T23:54:59.342380Z"), expected);
        assert_eq!(
            ts("2022-12-28"),
            NaiveDate::from_ymd_opt(2022, 12, 28).unwrap().and_time(NaiveTime::MIN)
        );
        assert!(parse_timestamp("yesterday").is_err());
    }
}
