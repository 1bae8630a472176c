//! # engine::query
//!
//! **Trade Query Engine** — every read the HTTP layer can ask for.
//!
//! All operations are pure functions of the current store snapshot and their
//! arguments.  Nothing here mutates shared state, so handlers may call the
//! engine concurrently without coordination.
//!
//! ## Deliberate quirks
//!
//! * [`TradeQueryEngine::filter`] with no criteria returns **nothing**, not
//!   every record.  Use [`TradeQueryEngine::list_all`] for the full set.
//! * Trader search is a case-sensitive substring match; every other search
//!   field is exact equality.
//! * An unsupported search field yields an empty result, not an error.

use std::cmp::Ordering;
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use super::predicate::{matches_all, FilterCriteria};
use crate::models::Trade;
use crate::store::TradeStore;

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_LIMIT: usize = 10;

// ─── Errors ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    #[error("trade '{0}' not found")]
    NotFound(String),
}

// ─── SearchField ──────────────────────────────────────────────────────────────

/// Attributes the free-text search endpoint can match on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    Trader,
    Counterparty,
    InstrumentId,
    InstrumentName,
}

impl SearchField {
    /// Accepts the published `intrumentId` / `intrumentName` spellings as well
    /// as the correctly spelled names.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "trader" => Some(SearchField::Trader),
            "counterparty" => Some(SearchField::Counterparty),
            "intrumentId" | "instrumentId" => Some(SearchField::InstrumentId),
            "intrumentName" | "instrumentName" => Some(SearchField::InstrumentName),
            _ => None,
        }
    }

    fn matches(&self, trade: &Trade, value: &str) -> bool {
        match self {
            SearchField::Trader => trade.trader().contains(value),
            SearchField::Counterparty => trade.counterparty() == Some(value),
            SearchField::InstrumentId => trade.instrument_id() == value,
            SearchField::InstrumentName => trade.instrument_name() == value,
        }
    }
}

// ─── Sorting ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    TradeId,
    Trader,
    InstrumentId,
    InstrumentName,
    AssetClass,
    Counterparty,
    TradeDateTime,
    Price,
    Quantity,
    Side,
}

impl SortField {
    pub fn parse(name: &str) -> Option<Self> {
        let field = match name {
            "tradeId" => SortField::TradeId,
            "trader" => SortField::Trader,
            "instrumentId" => SortField::InstrumentId,
            "instrumentName" => SortField::InstrumentName,
            "assetClass" => SortField::AssetClass,
            "counterparty" => SortField::Counterparty,
            "tradeDateTime" => SortField::TradeDateTime,
            "details.price" | "tradeDetails.price" => SortField::Price,
            "details.quantity" | "tradeDetails.quantity" => SortField::Quantity,
            "details.side" | "tradeDetails.side" | "tradeDetails.buySellIndicator" => {
                SortField::Side
            }
            _ => return None,
        };
        Some(field)
    }

    /// Ascending comparison.  `None` sorts before any present value.
    fn compare(&self, a: &Trade, b: &Trade) -> Ordering {
        match self {
            SortField::TradeId => a.trade_id().cmp(b.trade_id()),
            SortField::Trader => a.trader().cmp(b.trader()),
            SortField::InstrumentId => a.instrument_id().cmp(b.instrument_id()),
            SortField::InstrumentName => a.instrument_name().cmp(b.instrument_name()),
            SortField::AssetClass => a.asset_class().cmp(&b.asset_class()),
            SortField::Counterparty => a.counterparty().cmp(&b.counterparty()),
            SortField::TradeDateTime => a.trade_date_time().cmp(&b.trade_date_time()),
            SortField::Price => a.details().price().total_cmp(&b.details().price()),
            SortField::Quantity => a.details().quantity().cmp(&b.details().quantity()),
            SortField::Side => a.details().side().cmp(&b.details().side()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// Only `desc` (any case) flips the order.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.eq_ignore_ascii_case("desc") => SortOrder::Desc,
            _ => SortOrder::Asc,
        }
    }
}

/// Requested ordering.  `field == None` keeps store order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortSpec {
    pub field: Option<SortField>,
    pub order: SortOrder,
}

impl SortSpec {
    pub fn parse(sort_by: Option<&str>, sort_order: Option<&str>) -> Self {
        Self {
            field: sort_by.and_then(SortField::parse),
            order: SortOrder::parse(sort_order),
        }
    }

    /// Stable sort; ties keep their relative order in both directions.
    pub fn apply(&self, trades: &mut [Trade]) {
        let Some(field) = self.field else { return };

        match self.order {
            SortOrder::Asc => trades.sort_by(|a, b| field.compare(a, b)),
            SortOrder::Desc => trades.sort_by(|a, b| field.compare(b, a)),
        }
    }
}

// ─── Pagination ───────────────────────────────────────────────────────────────

/// 1-indexed page of `limit` records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub limit: usize,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: DEFAULT_PAGE, limit: DEFAULT_LIMIT }
    }
}

impl PageRequest {
    pub fn new(page: Option<usize>, limit: Option<usize>) -> Self {
        Self {
            page: page.unwrap_or(DEFAULT_PAGE),
            limit: limit.unwrap_or(DEFAULT_LIMIT),
        }
    }

    /// Positions `[(page-1)*limit, page*limit)`.  Anything out of range is empty.
    pub fn apply(&self, trades: Vec<Trade>) -> Vec<Trade> {
        if self.page == 0 || self.limit == 0 {
            return Vec::new();
        }

        match (self.page - 1).checked_mul(self.limit) {
            Some(offset) if offset < trades.len() => {
                trades.into_iter().skip(offset).take(self.limit).collect()
            }
            _ => Vec::new(),
        }
    }
}

// ─── TradeQueryEngine ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct TradeQueryEngine {
    store: Arc<dyn TradeStore>,
}

impl TradeQueryEngine {
    pub fn new(store: Arc<dyn TradeStore>) -> Self {
        Self { store }
    }

    pub fn store_len(&self) -> usize {
        self.store.len()
    }

    pub fn get_by_id(&self, trade_id: &str) -> Result<Trade, QueryError> {
        self.store
            .get_by_id(trade_id)
            .ok_or_else(|| QueryError::NotFound(trade_id.to_string()))
    }

    pub fn list_all(&self) -> Vec<Trade> {
        self.store.list_all()
    }

    /// Free-text search on one attribute.
    ///
    /// An absent or empty `value` returns every record, whatever `field` is.
    pub fn search_by_field(&self, value: Option<&str>, field: &str) -> Vec<Trade> {
        let value = match value {
            Some(v) if !v.is_empty() => v,
            _ => return self.list_all(),
        };

        let Some(field) = SearchField::parse(field) else {
            debug!(field, "Unsupported search field — no matches");
            return Vec::new();
        };

        let found: Vec<Trade> = self
            .store
            .list_all()
            .into_iter()
            .filter(|t| field.matches(t, value))
            .collect();

        debug!(?field, value, count = found.len(), "Search evaluated");
        found
    }

    /// AND of every supplied criterion over all records.
    ///
    /// With no criteria at all the result is empty.  This mirrors the published
    /// contract of `/trades` and is not the same as [`Self::list_all`].
    pub fn filter(&self, criteria: &FilterCriteria) -> Vec<Trade> {
        if criteria.is_empty() {
            debug!("No filter criteria supplied, returning empty result");
            return Vec::new();
        }
        let predicates = criteria.predicates();

        let found: Vec<Trade> = self
            .store
            .list_all()
            .into_iter()
            .filter(|t| matches_all(&predicates, t))
            .collect();

        debug!(criteria = predicates.len(), count = found.len(), "Filter evaluated");
        found
    }

    /// [`Self::filter`], then sort, then slice out one page.
    pub fn filter_with_pagination_and_sort(
        &self,
        criteria: &FilterCriteria,
        sort: &SortSpec,
        page: &PageRequest,
    ) -> Vec<Trade> {
        let mut found = self.filter(criteria);
        sort.apply(&mut found);
        page.apply(found)
    }
}
