//! Account CRUD and enumeration.

use axum::extract::{Path, Query, State};
use axum::routing::{get, patch, put};
use axum::{Json, Router};
use uuid::Uuid;

use netledger_shared::types::AccountId;

use crate::AppState;
use crate::dto::{AccountDto, CreateAccountRequest, EnumerateAccountsRequest, EnumerationResultDto, UpdateAccountNotesRequest};
use crate::error_response::ApiError;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/accounts", put(create_account).get(enumerate_accounts))
        .route("/accounts/by-name/{name}", get(get_account_by_name))
        .route(
            "/accounts/{id}",
            get(get_account).patch(update_account_notes).delete(delete_account),
        )
}

async fn create_account(
    State(state): State<AppState>,
    Json(req): Json<CreateAccountRequest>,
) -> Result<Json<AccountDto>, ApiError> {
    let account = state.engine.create_account(req.name, req.notes).await?;
    Ok(Json(account.into()))
}

async fn enumerate_accounts(
    State(state): State<AppState>,
    Query(req): Query<EnumerateAccountsRequest>,
) -> Result<Json<EnumerationResultDto<AccountDto>>, ApiError> {
    let query = req.into();
    let result = state.engine.enumerate_accounts(&query).await?;
    Ok(Json(result.into()))
}

async fn get_account(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AccountDto>, ApiError> {
    let account = state.engine.get_account(AccountId::from_uuid(id)).await?;
    Ok(Json(account.into()))
}

async fn get_account_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<AccountDto>, ApiError> {
    let account = state.engine.get_account_by_name(&name).await?;
    Ok(Json(account.into()))
}

async fn update_account_notes(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateAccountNotesRequest>,
) -> Result<Json<AccountDto>, ApiError> {
    let account = state
        .engine
        .update_account_notes(AccountId::from_uuid(id), req.notes)
        .await?;
    Ok(Json(account.into()))
}

async fn delete_account(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<(), ApiError> {
    state.engine.delete_account(AccountId::from_uuid(id)).await?;
    Ok(())
}
