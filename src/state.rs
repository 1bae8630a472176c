//! # state
//!
//! The shared application state handed to every Axum handler.
//!
//! ## Design Decisions
//!
//! * `Arc<AppState>` is cloned cheaply into every handler via
//!   `axum::extract::State`.
//! * The trade store is seeded once before the router is built and is never
//!   written to, so there is no lock here.  A store that accepts writes would
//!   need its own read/write exclusion behind the [`TradeStore`] trait.

use std::sync::Arc;

use crate::engine::TradeQueryEngine;
use crate::store::TradeStore;

// ─── AppState ─────────────────────────────────────────────────────────────────

/// Top-level shared state injected into every Axum handler.
#[derive(Clone)]
pub struct AppState {
    /// Query core over the injected store.
    pub engine: TradeQueryEngine,
}

impl AppState {
    pub fn new(store: Arc<dyn TradeStore>) -> Self {
        Self {
            engine: TradeQueryEngine::new(store),
        }
    }
}

/// Convenience type alias so callers can write `SharedState` instead of the
/// full generic form.
pub type SharedState = Arc<AppState>;

/// Wrap a seeded store in shared state ready for the router.
pub fn build_state(store: Arc<dyn TradeStore>) -> SharedState {
    Arc::new(AppState::new(store))
}
