//! # routes
//!
//! Router assembly.  [`build_router`] is shared by `main` and the tests below,
//! so tests exercise the exact routes and middleware the server runs.

pub mod trades;

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::state::SharedState;
use trades::{
    filter_trades, filter_trades_paginated, get_trade, health_check, list_trades, search_trades,
};

pub fn build_router(state: SharedState) -> Router {
    // Read-only GET API; any origin may call it.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // ── Listing & lookup ─────────────────────────────────────────────────
        .route("/list-of-trades/",        get(list_trades))
        .route("/list-of-trades",         get(list_trades))
        .route("/trades/:trade_id",       get(get_trade))
        // ── Search & filter ──────────────────────────────────────────────────
        .route("/searching-trades/",      get(search_trades))
        .route("/searching-trades",       get(search_trades))
        .route("/trades",                 get(filter_trades))
        .route("/trades-with-pagination", get(filter_trades_paginated))
        // ── Ops ──────────────────────────────────────────────────────────────
        .route("/health",                 get(health_check))
        // ── Middleware ───────────────────────────────────────────────────────
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
