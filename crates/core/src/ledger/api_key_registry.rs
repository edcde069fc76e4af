//! API Key Registry: key lifecycle and authentication.
//!
//! Independent of the account lock table — keys have no relationship to any
//! account.

use std::sync::Arc;

use netledger_shared::Clock;
use netledger_shared::types::ApiKeyId;

use crate::auth::{generate_api_key, hash_password, key_prefix, verify_password};

use super::adapter::ApiKeysAdapter;
use super::error::LedgerError;
use super::types::ApiKey;

/// Layer over the persistence adapter for API key lifecycle and auth.
pub struct ApiKeyRegistry {
    adapter: Arc<dyn ApiKeysAdapter>,
    clock: Arc<dyn Clock>,
}

impl ApiKeyRegistry {
    /// Wraps an adapter implementation.
    #[must_use]
    pub fn new(adapter: Arc<dyn ApiKeysAdapter>, clock: Arc<dyn Clock>) -> Self {
        Self { adapter, clock }
    }

    /// Generates and stores a new key, returning the record and the
    /// plaintext. The plaintext is never persisted or retrievable again.
    pub async fn create(
        &self,
        name: String,
        is_admin: bool,
    ) -> Result<(ApiKey, String), LedgerError> {
        let plaintext = generate_api_key();
        let key = self.store(name, &plaintext, is_admin).await?;
        Ok((key, plaintext))
    }

    /// Stores a key for a caller-supplied plaintext rather than generating
    /// one. Used to seed a known admin key from configuration at startup.
    pub async fn create_with_plaintext(
        &self,
        name: String,
        plaintext: &str,
        is_admin: bool,
    ) -> Result<ApiKey, LedgerError> {
        self.store(name, plaintext, is_admin).await
    }

    async fn store(&self, name: String, plaintext: &str, is_admin: bool) -> Result<ApiKey, LedgerError> {
        if name.trim().is_empty() {
            return Err(LedgerError::InvalidArgument(
                "api key name must not be empty".to_string(),
            ));
        }

        let key_hash = hash_password(plaintext)
            .map_err(|e| LedgerError::Internal(format!("failed to hash api key: {e}")))?;

        let key = ApiKey {
            guid: ApiKeyId::new(),
            name,
            key_hash,
            key_prefix: key_prefix(plaintext),
            active: true,
            is_admin,
            created_utc: self.clock.now_utc(),
        };
        self.adapter.create(key).await
    }

    /// Looks up candidates by the presented key's prefix and verifies the
    /// hash of each active candidate. Never distinguishes "wrong key" from
    /// "revoked key" to the caller — returns `None` for any failure.
    pub async fn authenticate(&self, presented_key: &str) -> Result<Option<ApiKey>, LedgerError> {
        let prefix = key_prefix(presented_key);
        let candidates = self.adapter.read_by_prefix(&prefix).await?;

        for candidate in candidates {
            if !candidate.active {
                continue;
            }
            if verify_password(presented_key, &candidate.key_hash).unwrap_or(false) {
                return Ok(Some(candidate));
            }
        }
        Ok(None)
    }

    /// Lists every key.
    pub async fn list(&self) -> Result<Vec<ApiKey>, LedgerError> {
        self.adapter.list().await
    }

    /// Deactivates a key so it can no longer authenticate.
    pub async fn revoke(&self, guid: ApiKeyId) -> Result<ApiKey, LedgerError> {
        self.adapter.set_active(guid, false).await
    }

    /// Deletes a key permanently.
    pub async fn delete(&self, guid: ApiKeyId) -> Result<(), LedgerError> {
        self.adapter.delete(guid).await
    }
}
