//! API route definitions.

use axum::Router;
use axum::middleware as axum_middleware;

use crate::AppState;
use crate::middleware::auth::auth_middleware;

pub mod accounts;
pub mod api_keys;
pub mod entries;
pub mod health;

/// Creates the `/v1` router: every route here requires a valid bearer API
/// key, checked once via [`auth_middleware`] rather than per-handler.
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(accounts::routes())
        .merge(entries::routes())
        .merge(api_keys::routes())
        .route_layer(axum_middleware::from_fn_with_state(state, auth_middleware))
}
