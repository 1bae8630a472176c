//! # Trade Query — read-only HTTP service over trade records
//!
//! ```text
//!  ┌─────────────┐  GET /list-of-trades/          ┌──────────────────────────┐
//!  │  Client     │  GET /trades/:trade_id         │ AppState                 │
//!  │             │ ─────────────────────────────▶ │ └─ TradeQueryEngine      │
//!  └─────────────┘  GET /searching-trades/        │     └─ Arc<dyn TradeStore>│
//!                   GET /trades                   └──────────────────────────┘
//!                   GET /trades-with-pagination              ▲
//!                                                            │ seeded once
//!                                          TRADES_FILE (JSON) or sample set
//! ```
//!
//! ## Environment Variables
//!
//! | Variable      | Default              | Description                          |
//! |---------------|----------------------|--------------------------------------|
//! | `BIND_ADDR`   | `0.0.0.0:3000`       | Address Axum listens on              |
//! | `TRADES_FILE` | *(unset)*            | JSON array of trades to serve        |
//! | `RUST_LOG`    | `trade_query=debug`  | Tracing filter                       |

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;
mod engine;
mod error;
mod models;
mod routes;
mod state;
mod store;

use config::AppConfig;
use routes::build_router;
use state::build_state;
use store::{sample_trades, InMemoryTradeStore, TradeStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Load .env ──────────────────────────────────────────────────────────
    dotenvy::dotenv().ok();

    // ── 2. Structured logging ─────────────────────────────────────────────────
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::from_default_env()
                .add_directive("trade_query=debug".parse()?)
                .add_directive("tower_http=info".parse()?),
        )
        .init();

    // ── 3. Config ─────────────────────────────────────────────────────────────
    let config = AppConfig::from_env()?;

    // ── 4. Seed the store (once, before serving) ──────────────────────────────
    let store = match &config.trades_file {
        Some(path) => InMemoryTradeStore::from_json_file(path)
            .with_context(|| format!("Failed to load TRADES_FILE {}", path.display()))?,
        None => {
            let trades = sample_trades().context("Built-in sample trades are invalid")?;
            InMemoryTradeStore::new(trades)?
        }
    };
    if store.is_empty() {
        warn!("Trade store is empty — every query will return no records");
    }
    info!(count = store.len(), "📒 Trade store seeded");

    // ── 5. Router ─────────────────────────────────────────────────────────────
    let app = build_router(build_state(Arc::new(store)));

    // ── 6. Bind & Serve ───────────────────────────────────────────────────────
    info!(addr = ?config.bind_addr, "🚀 Trade query server starting");
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
