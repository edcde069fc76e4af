//! HTTP-boundary tests: auth gating and the health check, against an
//! in-memory ledger so no database is needed.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode, header::AUTHORIZATION};
use chrono::{DateTime, Utc};
use http_body_util::BodyExt;
use rstest::rstest;
use rust_decimal::Decimal;
use tokio::sync::Mutex as TokioMutex;
use tower::ServiceExt;

use netledger_core::ledger::adapter::{AccountsAdapter, ApiKeysAdapter, EntriesAdapter};
use netledger_core::ledger::types::{Account, ApiKey, Entry, EntryFilter, EntryType};
use netledger_core::ledger::{ApiKeyRegistry, LedgerEngine, LedgerError};
use netledger_shared::clock::ManualClock;
use netledger_shared::types::{AccountId, ApiKeyId, EntryId};
use netledger_api::{AppState, create_router};

/// An `AccountsAdapter`/`EntriesAdapter` pair that is never actually
/// exercised by these tests — only enough to satisfy `LedgerEngine::new`.
#[derive(Default)]
struct EmptyAccounts;

#[async_trait]
impl AccountsAdapter for EmptyAccounts {
    async fn create(&self, account: Account) -> Result<Account, LedgerError> {
        Ok(account)
    }
    async fn read_by_guid(&self, _guid: AccountId) -> Result<Option<Account>, LedgerError> {
        Ok(None)
    }
    async fn read_by_name(&self, _name: &str) -> Result<Option<Account>, LedgerError> {
        Ok(None)
    }
    async fn read_all(&self) -> Result<Vec<Account>, LedgerError> {
        Ok(Vec::new())
    }
    async fn search_by_name(&self, _term: &str) -> Result<Vec<Account>, LedgerError> {
        Ok(Vec::new())
    }
    async fn update_notes(&self, guid: AccountId, _notes: Option<String>) -> Result<Account, LedgerError> {
        Err(LedgerError::AccountNotFound(guid.to_string()))
    }
    async fn delete_with_entries(&self, _guid: AccountId) -> Result<(), LedgerError> {
        Ok(())
    }
    async fn exists_by_guid(&self, _guid: AccountId) -> Result<bool, LedgerError> {
        Ok(false)
    }
    async fn exists_by_name(&self, _name: &str) -> Result<bool, LedgerError> {
        Ok(false)
    }
    async fn count(&self) -> Result<u64, LedgerError> {
        Ok(0)
    }
}

#[derive(Default)]
struct EmptyEntries;

#[async_trait]
impl EntriesAdapter for EmptyEntries {
    async fn insert(&self, entry: Entry) -> Result<Entry, LedgerError> {
        Ok(entry)
    }
    async fn get_by_guid(&self, _account_guid: AccountId, entry_guid: EntryId) -> Result<Option<Entry>, LedgerError> {
        let _ = entry_guid;
        Ok(None)
    }
    async fn list_by_account(&self, _account_guid: AccountId, _filter: &EntryFilter) -> Result<Vec<Entry>, LedgerError> {
        Ok(Vec::new())
    }
    async fn count_by_account(&self, _account_guid: AccountId, _filter: &EntryFilter) -> Result<u64, LedgerError> {
        Ok(0)
    }
    async fn latest_balance(&self, _account_guid: AccountId) -> Result<Option<Entry>, LedgerError> {
        Ok(None)
    }
    async fn balance_chain(&self, _account_guid: AccountId) -> Result<Vec<Entry>, LedgerError> {
        Ok(Vec::new())
    }
    async fn balance_as_of(&self, _account_guid: AccountId, _t: DateTime<Utc>) -> Result<Option<Entry>, LedgerError> {
        Ok(None)
    }
    async fn sum_pending(&self, _account_guid: AccountId, _entry_type: EntryType) -> Result<Decimal, LedgerError> {
        Ok(Decimal::ZERO)
    }
    async fn count_pending(&self, _account_guid: AccountId, _entry_type: EntryType) -> Result<u64, LedgerError> {
        Ok(0)
    }
    async fn committed_by_balance(&self, _balance_guid: EntryId) -> Result<Vec<Entry>, LedgerError> {
        Ok(Vec::new())
    }
    async fn commit_batch(&self, _account_guid: AccountId, balance_entry: Entry, _entry_guids: &[EntryId]) -> Result<Entry, LedgerError> {
        Ok(balance_entry)
    }
    async fn delete_pending(&self, _account_guid: AccountId, _entry_guid: EntryId) -> Result<(), LedgerError> {
        Ok(())
    }
    async fn delete_by_account(&self, _account_guid: AccountId) -> Result<(), LedgerError> {
        Ok(())
    }
}

#[derive(Default)]
struct MemApiKeys {
    keys: TokioMutex<Vec<ApiKey>>,
}

#[async_trait]
impl ApiKeysAdapter for MemApiKeys {
    async fn create(&self, key: ApiKey) -> Result<ApiKey, LedgerError> {
        self.keys.lock().await.push(key.clone());
        Ok(key)
    }
    async fn read_by_guid(&self, guid: ApiKeyId) -> Result<Option<ApiKey>, LedgerError> {
        Ok(self.keys.lock().await.iter().find(|k| k.guid == guid).cloned())
    }
    async fn read_by_prefix(&self, prefix: &str) -> Result<Vec<ApiKey>, LedgerError> {
        Ok(self.keys.lock().await.iter().filter(|k| k.key_prefix == prefix).cloned().collect())
    }
    async fn list(&self) -> Result<Vec<ApiKey>, LedgerError> {
        Ok(self.keys.lock().await.clone())
    }
    async fn set_active(&self, guid: ApiKeyId, active: bool) -> Result<ApiKey, LedgerError> {
        let mut keys = self.keys.lock().await;
        let key = keys
            .iter_mut()
            .find(|k| k.guid == guid)
            .ok_or_else(|| LedgerError::ApiKeyNotFound(guid.into_inner()))?;
        key.active = active;
        Ok(key.clone())
    }
    async fn delete(&self, guid: ApiKeyId) -> Result<(), LedgerError> {
        self.keys.lock().await.retain(|k| k.guid != guid);
        Ok(())
    }
}

/// Builds a router plus a plaintext non-admin key already registered in it.
async fn test_app() -> (axum::Router, String, String) {
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let engine = Arc::new(LedgerEngine::new(Arc::new(EmptyAccounts), Arc::new(EmptyEntries), clock.clone()));
    let api_keys = Arc::new(ApiKeyRegistry::new(Arc::new(MemApiKeys::default()), clock));

    let (_, member_plaintext) = api_keys.create("member".to_string(), false).await.unwrap();
    let (_, admin_plaintext) = api_keys.create("admin".to_string(), true).await.unwrap();

    let state = AppState { engine, api_keys };
    (create_router(state), member_plaintext, admin_plaintext)
}

#[tokio::test]
async fn test_health_check_requires_no_auth() {
    let (app, _, _) = test_app().await;
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "healthy");
}

#[rstest]
#[case::no_header(None)]
#[case::garbage_token(Some("Bearer not-a-real-key"))]
#[tokio::test]
async fn test_v1_routes_reject_missing_or_invalid_key(#[case] header: Option<&str>) {
    let (app, _, _) = test_app().await;
    let mut builder = Request::builder().uri("/v1/accounts");
    if let Some(header) = header {
        builder = builder.header(AUTHORIZATION, header);
    }
    let response = app.oneshot(builder.body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_v1_routes_accept_valid_key() {
    let (app, member_plaintext, _) = test_app().await;
    let response = app
        .oneshot(
            Request::builder()
                .uri("/v1/accounts")
                .header(AUTHORIZATION, format!("Bearer {member_plaintext}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_api_key_management_rejects_non_admin() {
    let (app, member_plaintext, _) = test_app().await;
    let response = app
        .oneshot(
            Request::builder()
                .uri("/v1/apikeys")
                .header(AUTHORIZATION, format!("Bearer {member_plaintext}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_api_key_management_allows_admin() {
    let (app, _, admin_plaintext) = test_app().await;
    let response = app
        .oneshot(
            Request::builder()
                .uri("/v1/apikeys")
                .header(AUTHORIZATION, format!("Bearer {admin_plaintext}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
