//! Point Ledger Server Library
//!
//! Gamified to-do tracking: users earn points by completing tasks and spend
//! them on rewards. This module exports the core types, the HTTP router and
//! the helpers used by tests.

pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod security;

pub use config::Config;
pub use db::{open_database, Db, LedgerStore};
pub use error::{AppError, Result};

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: LedgerStore,
    pub config: Config,
}

impl AppState {
    /// Create a new AppState with the given database and configuration
    pub fn new(db: Db, config: Config) -> Self {
        Self {
            store: LedgerStore::new(db),
            config,
        }
    }
}

/// Build the application router
pub fn app(state: AppState) -> Router {
    use routes::*;

    Router::new()
        .route("/health", get(health_check))
        .route("/api/register", post(register_user))
        .route("/api/login", post(login))
        .route("/api/delete_account", post(delete_account))
        .route("/api/heartbeat", get(heartbeat))
        .route("/api/index", get(index))
        .route("/api/reward/add", post(add_reward))
        .route("/api/task/add", post(add_task))
        .route("/api/remove", get(list_removable).post(remove_items))
        .route("/api/point", post(point))
        .route("/api/timer_submit", post(timer_submit))
        .route("/api/settings", post(update_settings))
        .route("/api/quote_seed", post(update_quote_seed))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
