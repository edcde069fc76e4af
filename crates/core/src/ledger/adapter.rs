//! The persistence adapter contract the ledger engine is built against.
//!
//! The engine never depends on a concrete store; it only calls through these
//! traits. A SeaORM-backed implementation lives in the `db` crate. Methods
//! that must be atomic (the cascade delete, the commit batch) are
//! responsible for their own transaction scope internally — the engine
//! composes calls but never manages a transaction handle itself.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use netledger_shared::types::{AccountId, ApiKeyId, EntryId};

use super::error::LedgerError;
use super::types::{Account, ApiKey, Entry, EntryFilter, EntryType};

/// CRUD and lookup over accounts.
#[async_trait]
pub trait AccountsAdapter: Send + Sync {
    /// Persists a new account. Caller has already checked name uniqueness.
    async fn create(&self, account: Account) -> Result<Account, LedgerError>;

    /// Looks up an account by guid.
    async fn read_by_guid(&self, guid: AccountId) -> Result<Option<Account>, LedgerError>;

    /// Looks up an account by its exact, unique name.
    async fn read_by_name(&self, name: &str) -> Result<Option<Account>, LedgerError>;

    /// Returns every account, in an adapter-defined stable order.
    async fn read_all(&self) -> Result<Vec<Account>, LedgerError>;

    /// Case-insensitive substring search on name.
    async fn search_by_name(&self, term: &str) -> Result<Vec<Account>, LedgerError>;

    /// Updates the `notes` field of an existing account.
    async fn update_notes(
        &self,
        guid: AccountId,
        notes: Option<String>,
    ) -> Result<Account, LedgerError>;

    /// Deletes the account and all of its entries as a single atomic step.
    async fn delete_with_entries(&self, guid: AccountId) -> Result<(), LedgerError>;

    /// True if an account with this guid exists.
    async fn exists_by_guid(&self, guid: AccountId) -> Result<bool, LedgerError>;

    /// True if an account with this exact name exists.
    async fn exists_by_name(&self, name: &str) -> Result<bool, LedgerError>;

    /// Total number of accounts.
    async fn count(&self) -> Result<u64, LedgerError>;
}

/// CRUD and typed aggregations over entries.
#[async_trait]
pub trait EntriesAdapter: Send + Sync {
    /// Persists a new entry. Caller has already checked I1–I4.
    async fn insert(&self, entry: Entry) -> Result<Entry, LedgerError>;

    /// Looks up a single entry, scoped to its owning account.
    async fn get_by_guid(
        &self,
        account_guid: AccountId,
        entry_guid: EntryId,
    ) -> Result<Option<Entry>, LedgerError>;

    /// Lists entries for an account matching the filter, in an
    /// adapter-defined stable order (callers re-sort as needed).
    async fn list_by_account(
        &self,
        account_guid: AccountId,
        filter: &EntryFilter,
    ) -> Result<Vec<Entry>, LedgerError>;

    /// Counts entries for an account matching the filter.
    async fn count_by_account(
        &self,
        account_guid: AccountId,
        filter: &EntryFilter,
    ) -> Result<u64, LedgerError>;

    /// The Balance entry with the greatest `created_utc`, tiebroken by guid.
    async fn latest_balance(&self, account_guid: AccountId) -> Result<Option<Entry>, LedgerError>;

    /// Every Balance entry for the account, in chain order from genesis.
    async fn balance_chain(&self, account_guid: AccountId) -> Result<Vec<Entry>, LedgerError>;

    /// The Balance entry with the greatest `created_utc <= t`, or `None`.
    async fn balance_as_of(
        &self,
        account_guid: AccountId,
        t: DateTime<Utc>,
    ) -> Result<Option<Entry>, LedgerError>;

    /// Sum of amounts for pending entries of the given type.
    async fn sum_pending(
        &self,
        account_guid: AccountId,
        entry_type: EntryType,
    ) -> Result<Decimal, LedgerError>;

    /// Count of pending entries of the given type.
    async fn count_pending(
        &self,
        account_guid: AccountId,
        entry_type: EntryType,
    ) -> Result<u64, LedgerError>;

    /// All Credit/Debit entries committed by the given Balance guid.
    async fn committed_by_balance(&self, balance_guid: EntryId) -> Result<Vec<Entry>, LedgerError>;

    /// Atomically inserts `balance_entry` and marks every guid in
    /// `entry_guids` committed by it. All-or-nothing.
    async fn commit_batch(
        &self,
        account_guid: AccountId,
        balance_entry: Entry,
        entry_guids: &[EntryId],
    ) -> Result<Entry, LedgerError>;

    /// Deletes a pending Credit/Debit entry.
    async fn delete_pending(
        &self,
        account_guid: AccountId,
        entry_guid: EntryId,
    ) -> Result<(), LedgerError>;

    /// Deletes every entry owned by the account. Used only by the account
    /// cascade delete, which wraps this together with the account row.
    async fn delete_by_account(&self, account_guid: AccountId) -> Result<(), LedgerError>;
}

/// CRUD and lookup over API keys.
#[async_trait]
pub trait ApiKeysAdapter: Send + Sync {
    /// Persists a new API key record.
    async fn create(&self, key: ApiKey) -> Result<ApiKey, LedgerError>;

    /// Looks up a key by guid.
    async fn read_by_guid(&self, guid: ApiKeyId) -> Result<Option<ApiKey>, LedgerError>;

    /// Returns every active key whose stored prefix matches, for the
    /// caller to narrow down before hashing the full candidate.
    async fn read_by_prefix(&self, prefix: &str) -> Result<Vec<ApiKey>, LedgerError>;

    /// Lists every key.
    async fn list(&self) -> Result<Vec<ApiKey>, LedgerError>;

    /// Flips the active flag on a key (used by revoke).
    async fn set_active(&self, guid: ApiKeyId, active: bool) -> Result<ApiKey, LedgerError>;

    /// Deletes a key permanently.
    async fn delete(&self, guid: ApiKeyId) -> Result<(), LedgerError>;
}
