//! Credit/debit posting, commit, balance, verification, and entry
//! enumeration — all scoped under a single account.

use axum::extract::{Path, Query, State};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use uuid::Uuid;

use netledger_core::ledger::LedgerError;
use netledger_shared::types::{AccountId, EntryId};

use crate::AppState;
use crate::dto::{
    AddEntriesRequest, AddEntryRequest, BalanceAsOfQuery, BalanceAsOfResponse, BalanceViewDto,
    CommitRequest, EnumerateEntriesRequest, EntryDto, EnumerationResultDto, VerifyResponse,
};
use crate::error_response::ApiError;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/accounts/{id}/credits", put(add_credit).post(add_credits))
        .route("/accounts/{id}/debits", put(add_debit).post(add_debits))
        .route("/accounts/{id}/commit", post(commit))
        .route("/accounts/{id}/balance", get(get_balance))
        .route("/accounts/{id}/balance/asof", get(balance_as_of))
        .route("/accounts/{id}/verify", get(verify_balance_chain))
        .route("/accounts/{id}/entries/enumerate", post(enumerate_entries))
        .route("/accounts/{id}/entries/{entry_id}", axum::routing::delete(cancel_pending))
}

async fn add_credit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<AddEntryRequest>,
) -> Result<Json<EntryDto>, ApiError> {
    let entry = state
        .engine
        .add_credit(AccountId::from_uuid(id), req.amount, req.notes, req.already_committed)
        .await?;
    Ok(Json(entry.into()))
}

async fn add_debit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<AddEntryRequest>,
) -> Result<Json<EntryDto>, ApiError> {
    let entry = state
        .engine
        .add_debit(AccountId::from_uuid(id), req.amount, req.notes, req.already_committed)
        .await?;
    Ok(Json(entry.into()))
}

async fn add_credits(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<AddEntriesRequest>,
) -> Result<Json<Vec<EntryDto>>, ApiError> {
    let items = req.entries.into_iter().map(|e| (e.amount, e.notes)).collect();
    let entries = state
        .engine
        .add_credits(AccountId::from_uuid(id), items, req.already_committed)
        .await?;
    Ok(Json(entries.into_iter().map(Into::into).collect()))
}

async fn add_debits(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<AddEntriesRequest>,
) -> Result<Json<Vec<EntryDto>>, ApiError> {
    let items = req.entries.into_iter().map(|e| (e.amount, e.notes)).collect();
    let entries = state
        .engine
        .add_debits(AccountId::from_uuid(id), items, req.already_committed)
        .await?;
    Ok(Json(entries.into_iter().map(Into::into).collect()))
}

async fn commit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<CommitRequest>,
) -> Result<Json<BalanceViewDto>, ApiError> {
    let entry_guids = req
        .entry_guids
        .map(|guids| guids.into_iter().map(EntryId::from_uuid).collect());
    let view = state.engine.commit(AccountId::from_uuid(id), entry_guids).await?;
    Ok(Json(view.into()))
}

async fn get_balance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BalanceViewDto>, ApiError> {
    let view = state.engine.get_balance(AccountId::from_uuid(id)).await?;
    Ok(Json(view.into()))
}

async fn balance_as_of(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<BalanceAsOfQuery>,
) -> Result<Json<BalanceAsOfResponse>, ApiError> {
    let balance = state
        .engine
        .balance_as_of(AccountId::from_uuid(id), query.t)
        .await?;
    Ok(Json(BalanceAsOfResponse { balance }))
}

async fn verify_balance_chain(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<VerifyResponse>, ApiError> {
    let valid = state
        .engine
        .verify_balance_chain(AccountId::from_uuid(id))
        .await?;
    if !valid {
        return Err(LedgerError::VerificationFailed(id).into());
    }
    Ok(Json(VerifyResponse { valid }))
}

async fn enumerate_entries(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<EnumerateEntriesRequest>,
) -> Result<Json<EnumerationResultDto<EntryDto>>, ApiError> {
    let query = req.into();
    let result = state
        .engine
        .enumerate_entries(AccountId::from_uuid(id), &query)
        .await?;
    Ok(Json(result.into()))
}

async fn cancel_pending(
    State(state): State<AppState>,
    Path((id, entry_id)): Path<(Uuid, Uuid)>,
) -> Result<(), ApiError> {
    state
        .engine
        .cancel_pending(AccountId::from_uuid(id), EntryId::from_uuid(entry_id))
        .await?;
    Ok(())
}
