//! API key lifecycle management. Every route here is admin-only, layered
//! on top of the bearer-auth check already applied to all of `/v1`.

use axum::extract::{Path, State};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use uuid::Uuid;

use netledger_shared::types::ApiKeyId;

use crate::AppState;
use crate::dto::{ApiKeyDto, CreateApiKeyRequest, CreateApiKeyResponse};
use crate::error_response::ApiError;
use crate::middleware::auth::require_admin;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/apikeys", put(create_api_key).get(list_api_keys))
        .route("/apikeys/{id}", axum::routing::delete(delete_api_key))
        .route("/apikeys/{id}/revoke", post(revoke_api_key))
        .route_layer(axum::middleware::from_fn(require_admin))
}

async fn create_api_key(
    State(state): State<AppState>,
    Json(req): Json<CreateApiKeyRequest>,
) -> Result<Json<CreateApiKeyResponse>, ApiError> {
    let (key, plaintext) = state.api_keys.create(req.name, req.is_admin).await?;
    Ok(Json(CreateApiKeyResponse { key: key.into(), plaintext }))
}

async fn list_api_keys(State(state): State<AppState>) -> Result<Json<Vec<ApiKeyDto>>, ApiError> {
    let keys = state.api_keys.list().await?;
    Ok(Json(keys.into_iter().map(Into::into).collect()))
}

async fn revoke_api_key(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiKeyDto>, ApiError> {
    let key = state.api_keys.revoke(ApiKeyId::from_uuid(id)).await?;
    Ok(Json(key.into()))
}

async fn delete_api_key(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<(), ApiError> {
    state.api_keys.delete(ApiKeyId::from_uuid(id)).await?;
    Ok(())
}
