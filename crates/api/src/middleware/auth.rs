//! Bearer API-key authentication middleware.

use axum::{
    Json,
    extract::{FromRequestParts, Request, State},
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use netledger_core::ledger::types::ApiKey;
use serde_json::json;

use crate::AppState;

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "Error": { "Code": "UNAUTHORIZED", "Message": message } })),
    )
        .into_response()
}

/// Authenticates the bearer API key and injects the resolved [`ApiKey`]
/// into request extensions. Every route except health checks runs behind
/// this middleware.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let Some(token) = auth_header.and_then(extract_bearer_token) else {
        return unauthorized("Authorization header with Bearer token is required");
    };

    match state.api_keys.authenticate(token).await {
        Ok(Some(key)) => {
            request.extensions_mut().insert(key);
            next.run(request).await
        }
        Ok(None) => unauthorized("invalid or revoked api key"),
        Err(err) => {
            tracing::error!(%err, "api key authentication failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "Error": { "Code": "INTERNAL_ERROR", "Message": "authentication failed" } })),
            )
                .into_response()
        }
    }
}

/// Extractor for the authenticated API key. Use in handlers that need the
/// caller's identity or admin flag.
#[derive(Debug, Clone)]
pub struct AuthenticatedKey(pub ApiKey);

impl<S> FromRequestParts<S> for AuthenticatedKey
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<serde_json::Value>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<ApiKey>()
            .cloned()
            .map(AuthenticatedKey)
            .ok_or_else(|| {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({ "Error": { "Code": "UNAUTHORIZED", "Message": "authentication required" } })),
                )
            })
    }
}

/// Rejects the request unless the authenticated key carries `is_admin`.
/// Used as a second middleware layer on admin-only routes (API-key
/// management itself).
pub async fn require_admin(request: Request, next: Next) -> Response {
    let is_admin = request
        .extensions()
        .get::<ApiKey>()
        .is_some_and(|k| k.is_admin);

    if !is_admin {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "Error": { "Code": "UNAUTHORIZED", "Message": "admin privileges required" } })),
        )
            .into_response();
    }
    next.run(request).await
}
