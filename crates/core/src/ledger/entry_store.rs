//! Entry Store: CRUD over entries plus the aggregations the engine needs
//! for commit and balance computation.

use std::sync::Arc;

use rust_decimal::Decimal;

use netledger_shared::types::{AccountId, EntryId};

use super::adapter::EntriesAdapter;
use super::error::LedgerError;
use super::types::{Entry, EntryFilter, EntryType};

/// Validates invariants I1–I4 for a freshly-constructed entry before it is
/// handed to the adapter.
fn check_insert_invariants(entry: &Entry) -> Result<(), LedgerError> {
    if entry.amount < Decimal::ZERO {
        return Err(LedgerError::InvalidArgument(
            "entry amount must be non-negative".to_string(),
        ));
    }

    match entry.entry_type {
        EntryType::Balance => {
            if entry.committed_by_guid.is_some() {
                return Err(LedgerError::InvalidArgument(
                    "a Balance entry cannot itself be committed by another entry".to_string(),
                ));
            }
            if !entry.is_committed {
                return Err(LedgerError::InvalidArgument(
                    "a Balance entry must be committed at creation".to_string(),
                ));
            }
        }
        EntryType::Credit | EntryType::Debit => {
            if entry.is_committed {
                if entry.committed_by_guid.is_none() || entry.committed_utc.is_none() {
                    return Err(LedgerError::InvalidArgument(
                        "a committed Credit/Debit must reference its Balance and commit time"
                            .to_string(),
                    ));
                }
            } else if entry.committed_by_guid.is_some() || entry.committed_utc.is_some() {
                return Err(LedgerError::InvalidArgument(
                    "a pending Credit/Debit must not carry commit metadata".to_string(),
                ));
            }
        }
    }

    Ok(())
}

/// Layer over the persistence adapter that understands entry semantics.
pub struct EntryStore {
    adapter: Arc<dyn EntriesAdapter>,
}

impl EntryStore {
    /// Wraps an adapter implementation.
    #[must_use]
    pub fn new(adapter: Arc<dyn EntriesAdapter>) -> Self {
        Self { adapter }
    }

    /// Validates I1–I4 and persists the entry.
    pub async fn insert(&self, entry: Entry) -> Result<Entry, LedgerError> {
        check_insert_invariants(&entry)?;
        self.adapter.insert(entry).await
    }

    /// Fetches a single entry, scoped to its account.
    pub async fn get_by_guid(
        &self,
        account_guid: AccountId,
        entry_guid: EntryId,
    ) -> Result<Entry, LedgerError> {
        self.adapter
            .get_by_guid(account_guid, entry_guid)
            .await?
            .ok_or_else(|| LedgerError::EntryNotFound(entry_guid.into_inner()))
    }

    /// Lists entries matching the filter.
    pub async fn list_by_account(
        &self,
        account_guid: AccountId,
        filter: &EntryFilter,
    ) -> Result<Vec<Entry>, LedgerError> {
        self.adapter.list_by_account(account_guid, filter).await
    }

    /// Counts entries matching the filter.
    pub async fn count_by_account(
        &self,
        account_guid: AccountId,
        filter: &EntryFilter,
    ) -> Result<u64, LedgerError> {
        self.adapter.count_by_account(account_guid, filter).await
    }

    /// The latest Balance entry for the account, if any.
    pub async fn latest_balance(&self, account_guid: AccountId) -> Result<Option<Entry>, LedgerError> {
        self.adapter.latest_balance(account_guid).await
    }

    /// The full Balance chain, genesis first.
    pub async fn balance_chain(&self, account_guid: AccountId) -> Result<Vec<Entry>, LedgerError> {
        self.adapter.balance_chain(account_guid).await
    }

    /// The Balance entry effective at instant `t`.
    pub async fn balance_as_of(
        &self,
        account_guid: AccountId,
        t: chrono::DateTime<chrono::Utc>,
    ) -> Result<Option<Entry>, LedgerError> {
        self.adapter.balance_as_of(account_guid, t).await
    }

    /// Sum of pending amounts for `entry_type`.
    pub async fn sum_pending(
        &self,
        account_guid: AccountId,
        entry_type: EntryType,
    ) -> Result<Decimal, LedgerError> {
        self.adapter.sum_pending(account_guid, entry_type).await
    }

    /// Count of pending entries for `entry_type`.
    pub async fn count_pending(
        &self,
        account_guid: AccountId,
        entry_type: EntryType,
    ) -> Result<u64, LedgerError> {
        self.adapter.count_pending(account_guid, entry_type).await
    }

    /// Entries committed by a specific Balance.
    pub async fn committed_by_balance(&self, balance_guid: EntryId) -> Result<Vec<Entry>, LedgerError> {
        self.adapter.committed_by_balance(balance_guid).await
    }

    /// Atomically inserts the Balance entry and marks the batch committed.
    pub async fn commit_batch(
        &self,
        account_guid: AccountId,
        balance_entry: Entry,
        entry_guids: &[EntryId],
    ) -> Result<Entry, LedgerError> {
        check_insert_invariants(&balance_entry)?;
        self.adapter
            .commit_batch(account_guid, balance_entry, entry_guids)
            .await
    }

    /// Deletes a pending entry, enforcing that it is eligible.
    pub async fn delete_pending(
        &self,
        account_guid: AccountId,
        entry_guid: EntryId,
    ) -> Result<(), LedgerError> {
        let entry = self.get_by_guid(account_guid, entry_guid).await?;
        if !entry.is_pending() {
            return Err(LedgerError::EntryNotEligible(entry_guid.into_inner()));
        }
        self.adapter.delete_pending(account_guid, entry_guid).await
    }

    /// Deletes every entry owned by an account (cascade delete support).
    pub async fn delete_by_account(&self, account_guid: AccountId) -> Result<(), LedgerError> {
        self.adapter.delete_by_account(account_guid).await
    }
}
