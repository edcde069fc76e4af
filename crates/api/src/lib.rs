//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST routes under `/v1` for accounts, entries, and API keys
//! - Bearer API-key authentication middleware
//! - Request/response DTOs with `PascalCase` wire names
//! - Uniform conversion of ledger/app errors into JSON responses

pub mod dto;
pub mod error_response;
pub mod middleware;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use netledger_core::ledger::{ApiKeyRegistry, LedgerEngine};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The ledger engine: accounts, entries, commit, verify, enumeration.
    pub engine: Arc<LedgerEngine>,
    /// The API key registry: key lifecycle and authentication.
    pub api_keys: Arc<ApiKeyRegistry>,
}

/// Creates the main application router.
#[must_use]
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/v1", routes::api_routes(state.clone()))
        .merge(routes::health::routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
