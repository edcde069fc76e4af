//! Ledger domain types: accounts, entries, and the derived balance view.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use netledger_shared::types::{AccountId, EntryId, Ordering};

/// A ledger account: the unit that owns entries and accumulates a balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier.
    pub guid: AccountId,
    /// Display name, unique within the registry.
    pub name: String,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Creation instant.
    pub created_utc: DateTime<Utc>,
}

/// The kind of ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum EntryType {
    /// Increases the account balance once committed.
    Credit,
    /// Decreases the account balance once committed.
    Debit,
    /// A chain checkpoint summarizing a commit; never pending.
    Balance,
}

/// The atomic ledger record: a Credit, Debit, or Balance row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    /// Unique identifier.
    pub guid: EntryId,
    /// Owning account.
    pub account_guid: AccountId,
    /// Credit, Debit, or Balance.
    pub entry_type: EntryType,
    /// Non-negative amount.
    pub amount: Decimal,
    /// Optional free-text description.
    pub description: Option<String>,
    /// Optional free-text notes.
    pub notes: Option<String>,
    /// For Balance entries: the prior Balance this one supersedes, if any.
    pub replaces: Option<EntryId>,
    /// Whether this entry has been folded into a Balance.
    pub is_committed: bool,
    /// For committed Credit/Debit entries: the Balance guid that committed them.
    pub committed_by_guid: Option<EntryId>,
    /// For committed Credit/Debit entries: the commit instant.
    pub committed_utc: Option<DateTime<Utc>>,
    /// Creation instant.
    pub created_utc: DateTime<Utc>,
}

impl Entry {
    /// True if this entry is a Credit or Debit awaiting commit.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        !self.is_committed && self.entry_type != EntryType::Balance
    }
}

/// An opaque API credential plus display metadata.
///
/// Not part of ledger semantics; the same persistence adapter stores it
/// because it shares the schema's transactional boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiKey {
    /// Unique identifier.
    pub guid: netledger_shared::types::ApiKeyId,
    /// Display name.
    pub name: String,
    /// Argon2id hash of the key material; the plaintext is never stored.
    pub key_hash: String,
    /// First 8 characters of the plaintext key, for fast candidate lookup.
    pub key_prefix: String,
    /// Whether the key is active (can authenticate).
    pub active: bool,
    /// Whether the key carries admin privileges.
    pub is_admin: bool,
    /// Creation instant.
    pub created_utc: DateTime<Utc>,
}

/// The derived, non-persisted balance view for an account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceView {
    /// The account this view describes.
    pub account_guid: AccountId,
    /// Amount of the latest Balance entry, or 0 if none exists yet.
    pub committed_balance: Decimal,
    /// `committed_balance` plus the net of all pending Credits and Debits.
    pub pending_balance: Decimal,
    /// Count of pending Credit entries.
    pub pending_credit_count: u64,
    /// Count of pending Debit entries.
    pub pending_debit_count: u64,
    /// Guid of the latest Balance entry, if any.
    pub entry_guid: Option<EntryId>,
    /// Guids of the entries the latest Balance committed.
    pub committed_entry_guids: Vec<EntryId>,
}

/// AND-composed filter dimensions for `ListByAccount`/entry enumeration.
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    /// Only entries created at or after this instant.
    pub created_after_utc: Option<DateTime<Utc>>,
    /// Only entries created at or before this instant.
    pub created_before_utc: Option<DateTime<Utc>>,
    /// Only entries with amount >= this value.
    pub amount_min: Option<Decimal>,
    /// Only entries with amount <= this value.
    pub amount_max: Option<Decimal>,
    /// Only entries of this type.
    pub entry_type: Option<EntryType>,
    /// Only entries with this committed state.
    pub is_committed: Option<bool>,
}

/// A paginated entry enumeration request.
#[derive(Debug, Clone)]
pub struct EntryQuery {
    /// Filter dimensions, AND-composed.
    pub filter: EntryFilter,
    /// Maximum objects to return, clamped to `[MIN_MAX_RESULTS, MAX_MAX_RESULTS]`.
    pub max_results: u32,
    /// Number of matching records to skip before the page starts.
    pub skip: u64,
    /// Resume after the entry with this guid, in the query's order.
    pub continuation_token: Option<EntryId>,
    /// Sort order; ties are broken by guid ascending.
    pub ordering: Ordering,
}

impl Default for EntryQuery {
    fn default() -> Self {
        Self {
            filter: EntryFilter::default(),
            max_results: netledger_shared::types::DEFAULT_MAX_RESULTS,
            skip: 0,
            continuation_token: None,
            ordering: Ordering::default(),
        }
    }
}

/// A paginated account enumeration request.
#[derive(Debug, Clone)]
pub struct AccountQuery {
    /// Case-insensitive substring match on name.
    pub search_term: Option<String>,
    /// Minimum committed balance, applied post-filter.
    pub balance_min: Option<Decimal>,
    /// Maximum committed balance, applied post-filter.
    pub balance_max: Option<Decimal>,
    /// Maximum objects to return, clamped to `[MIN_MAX_RESULTS, MAX_MAX_RESULTS]`.
    pub max_results: u32,
    /// Number of matching records to skip before the page starts.
    pub skip: u64,
    /// Resume after the account with this guid, in the query's order.
    pub continuation_token: Option<AccountId>,
}

impl Default for AccountQuery {
    fn default() -> Self {
        Self {
            search_term: None,
            balance_min: None,
            balance_max: None,
            max_results: netledger_shared::types::DEFAULT_MAX_RESULTS,
            skip: 0,
            continuation_token: None,
        }
    }
}
