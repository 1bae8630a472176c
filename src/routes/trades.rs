//! # routes::trades
//!
//! Axum route handlers for the **trade query interface**.
//!
//! ## Endpoints
//!
//! | Method | Path                       | Description                                   |
//! |--------|----------------------------|-----------------------------------------------|
//! | GET    | `/list-of-trades/`         | Every trade, store order                      |
//! | GET    | `/trades/:trade_id`        | One trade, `404` if unknown                   |
//! | GET    | `/searching-trades/`       | `search` + `search_by` field search           |
//! | GET    | `/trades`                  | Criteria filter (empty when no criteria)      |
//! | GET    | `/trades-with-pagination`  | Criteria filter + `sort_by`/`sort_order` + page |
//! | GET    | `/health`                  | Liveness and record count                     |
//!
//! Handlers only translate query strings into engine calls; all decisions live
//! in [`crate::engine`].

use std::fmt;
use std::str::FromStr;

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde::{de, Deserialize, Deserializer};
use serde_json::json;
use tracing::{debug, info};

use crate::{
    engine::{FilterCriteria, PageRequest, SortSpec},
    error::AppError,
    models::{parse_timestamp, Side, Trade},
    state::SharedState,
};

const DEFAULT_SEARCH_FIELD: &str = "trader";

// ─── Query strings ────────────────────────────────────────────────────────────

/// `?key=` is treated the same as leaving `key` out.
fn empty_as_none<'de, D, T>(de: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let raw: Option<String> = Option::deserialize(de)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse::<T>().map(Some).map_err(de::Error::custom),
    }
}

/// Page numbers and sizes never fail on range: negatives become `0` and values
/// past `usize::MAX` saturate, both of which [`PageRequest`] treats as an
/// empty page.  Only non-integers are rejected.
fn page_bound<'de, D>(de: D) -> Result<Option<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(de)?;
    let Some(s) = raw.as_deref().map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(de::Error::custom(format!("expected an integer, got '{s}'")));
    }

    if negative {
        return Ok(Some(0));
    }
    Ok(Some(digits.parse::<usize>().unwrap_or(usize::MAX)))
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub search_by: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FilterParams {
    #[serde(rename = "assetClass", default, deserialize_with = "empty_as_none")]
    pub asset_class: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub start: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub end: Option<String>,
    #[serde(rename = "minPrice", default, deserialize_with = "empty_as_none")]
    pub min_price: Option<f64>,
    #[serde(rename = "maxPrice", default, deserialize_with = "empty_as_none")]
    pub max_price: Option<f64>,
    #[serde(rename = "tradeType", default, deserialize_with = "empty_as_none")]
    pub trade_type: Option<Side>,
}

impl FilterParams {
    pub fn into_criteria(self) -> Result<FilterCriteria, AppError> {
        Ok(FilterCriteria {
            asset_class: self.asset_class,
            start: self.start.as_deref().map(parse_timestamp).transpose()?,
            end: self.end.as_deref().map(parse_timestamp).transpose()?,
            min_price: self.min_price,
            max_price: self.max_price,
            trade_type: self.trade_type,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PaginatedFilterParams {
    #[serde(flatten)]
    pub filter: FilterParams,
    #[serde(default, deserialize_with = "page_bound")]
    pub page: Option<usize>,
    #[serde(default, deserialize_with = "page_bound")]
    pub limit: Option<usize>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub sort_by: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub sort_order: Option<String>,
}

// ─── GET /list-of-trades/ ─────────────────────────────────────────────────────

pub async fn list_trades(State(state): State<SharedState>) -> Json<Vec<Trade>> {
    let trades = state.engine.list_all();
    debug!(count = trades.len(), "Listing all trades");
    Json(trades)
}

// ─── GET /trades/:trade_id ────────────────────────────────────────────────────

pub async fn get_trade(
    State(state): State<SharedState>,
    Path(trade_id): Path<String>,
) -> Result<Json<Trade>, AppError> {
    let trade = state.engine.get_by_id(&trade_id).inspect_err(|_| {
        info!(trade_id = %trade_id, "Trade not found");
    })?;
    Ok(Json(trade))
}

// ─── GET /searching-trades/ ───────────────────────────────────────────────────

/// `search_by` defaults to `trader`.  Field names are taken as received,
/// including the `intrumentId` / `intrumentName` spellings.
pub async fn search_trades(
    State(state): State<SharedState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<Vec<Trade>>, AppError> {
    let Query(params) = params?;
    let field = params.search_by.as_deref().unwrap_or(DEFAULT_SEARCH_FIELD);

    let trades = state.engine.search_by_field(params.search.as_deref(), field);
    Ok(Json(trades))
}

// ─── GET /trades ──────────────────────────────────────────────────────────────

pub async fn filter_trades(
    State(state): State<SharedState>,
    params: Result<Query<FilterParams>, QueryRejection>,
) -> Result<Json<Vec<Trade>>, AppError> {
    let Query(params) = params?;
    let criteria = params.into_criteria()?;

    Ok(Json(state.engine.filter(&criteria)))
}

// ─── GET /trades-with-pagination ──────────────────────────────────────────────

pub async fn filter_trades_paginated(
    State(state): State<SharedState>,
    params: Result<Query<PaginatedFilterParams>, QueryRejection>,
) -> Result<Json<Vec<Trade>>, AppError> {
    let Query(params) = params?;

    let sort = SortSpec::parse(params.sort_by.as_deref(), params.sort_order.as_deref());
    let page = PageRequest::new(params.page, params.limit);
    let criteria = params.filter.into_criteria()?;

    debug!(?sort, ?page, "Paginated filter");
    Ok(Json(state.engine.filter_with_pagination_and_sort(&criteria, &sort, &page)))
}

// ─── GET /health ──────────────────────────────────────────────────────────────

pub async fn health_check(State(state): State<SharedState>) -> impl IntoResponse {
    Json(json!({
        "ok":     true,
        "trades": state.engine.store_len(),
    }))
}
