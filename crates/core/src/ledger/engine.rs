//! Ledger Core: the orchestration component higher layers talk to.
//!
//! Composes the Entry Store and Account Registry under the per-account
//! lock discipline from the concurrency model, and implements commit,
//! verify, historical balance, and enumeration.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use netledger_shared::Clock;
use netledger_shared::types::{AccountId, EnumerationResult, EntryId, Ordering};

use super::account_registry::AccountRegistry;
use super::adapter::{AccountsAdapter, EntriesAdapter};
use super::entry_store::EntryStore;
use super::error::LedgerError;
use super::events::{EventBus, EventSubscriber, LedgerEvent};
use super::locks::AccountLockTable;
use super::types::{Account, BalanceView, Entry, EntryFilter, EntryQuery, EntryType};

/// The ledger engine: the single entry point for all ledger mutations and
/// reads. Construct once per process and share behind an `Arc`.
pub struct LedgerEngine {
    entries: EntryStore,
    accounts: AccountRegistry,
    locks: AccountLockTable,
    events: EventBus,
    clock: Arc<dyn Clock>,
}

impl LedgerEngine {
    /// Builds an engine over the given adapters and clock.
    #[must_use]
    pub fn new(
        accounts_adapter: Arc<dyn AccountsAdapter>,
        entries_adapter: Arc<dyn EntriesAdapter>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            entries: EntryStore::new(entries_adapter),
            accounts: AccountRegistry::new(accounts_adapter, clock.clone()),
            locks: AccountLockTable::new(),
            events: EventBus::new(),
            clock,
        }
    }

    /// Registers an event subscriber. Not thread-safe against concurrent
    /// ledger operations; call during startup wiring only.
    pub fn subscribe(&mut self, subscriber: Arc<dyn EventSubscriber>) {
        self.events.subscribe(subscriber);
    }

    // ---- Account lifecycle -------------------------------------------

    /// Creates a new account.
    pub async fn create_account(
        &self,
        name: String,
        notes: Option<String>,
    ) -> Result<Account, LedgerError> {
        let account = self.accounts.create(name, notes).await?;
        self.events.publish(LedgerEvent::AccountCreated {
            account_guid: account.guid,
        });
        Ok(account)
    }

    /// Reads an account by guid.
    pub async fn get_account(&self, guid: AccountId) -> Result<Account, LedgerError> {
        self.accounts.read_by_guid(guid).await
    }

    /// Reads an account by its exact name.
    pub async fn get_account_by_name(&self, name: &str) -> Result<Account, LedgerError> {
        self.accounts.read_by_name(name).await
    }

    /// Updates an account's notes.
    pub async fn update_account_notes(
        &self,
        guid: AccountId,
        notes: Option<String>,
    ) -> Result<Account, LedgerError> {
        let _guard = self.locks.acquire(guid).await;
        self.accounts.update_notes(guid, notes).await
    }

    /// Deletes an account and all of its entries atomically, holding the
    /// account's lock for the duration of the cascade.
    pub async fn delete_account(&self, guid: AccountId) -> Result<(), LedgerError> {
        let _guard = self.locks.acquire(guid).await;
        self.accounts.delete(guid).await?;
        self.events
            .publish(LedgerEvent::AccountDeleted { account_guid: guid });
        Ok(())
    }

    /// Paginated account enumeration.
    pub async fn enumerate_accounts(
        &self,
        query: &super::types::AccountQuery,
    ) -> Result<EnumerationResult<Account>, LedgerError> {
        self.accounts.enumerate(query, &self.entries).await
    }

    // ---- Credit/Debit addition ----------------------------------------

    /// Adds a single Credit entry. See [`Self::add_entry`].
    pub async fn add_credit(
        &self,
        account_guid: AccountId,
        amount: Decimal,
        notes: Option<String>,
        already_committed: bool,
    ) -> Result<Entry, LedgerError> {
        self.add_entry(account_guid, EntryType::Credit, amount, notes, already_committed)
            .await
    }

    /// Adds a single Debit entry. See [`Self::add_entry`].
    pub async fn add_debit(
        &self,
        account_guid: AccountId,
        amount: Decimal,
        notes: Option<String>,
        already_committed: bool,
    ) -> Result<Entry, LedgerError> {
        self.add_entry(account_guid, EntryType::Debit, amount, notes, already_committed)
            .await
    }

    /// Adds a batch of Credit entries under a single lock acquisition, in
    /// input order.
    pub async fn add_credits(
        &self,
        account_guid: AccountId,
        items: Vec<(Decimal, Option<String>)>,
        already_committed: bool,
    ) -> Result<Vec<Entry>, LedgerError> {
        self.add_entries(account_guid, EntryType::Credit, items, already_committed)
            .await
    }

    /// Adds a batch of Debit entries under a single lock acquisition, in
    /// input order.
    pub async fn add_debits(
        &self,
        account_guid: AccountId,
        items: Vec<(Decimal, Option<String>)>,
        already_committed: bool,
    ) -> Result<Vec<Entry>, LedgerError> {
        self.add_entries(account_guid, EntryType::Debit, items, already_committed)
            .await
    }

    async fn add_entry(
        &self,
        account_guid: AccountId,
        entry_type: EntryType,
        amount: Decimal,
        notes: Option<String>,
        already_committed: bool,
    ) -> Result<Entry, LedgerError> {
        let _guard = self.locks.acquire(account_guid).await;
        self.accounts.read_by_guid(account_guid).await?;
        self.add_entry_locked(account_guid, entry_type, amount, notes, already_committed)
            .await
    }

    async fn add_entries(
        &self,
        account_guid: AccountId,
        entry_type: EntryType,
        items: Vec<(Decimal, Option<String>)>,
        already_committed: bool,
    ) -> Result<Vec<Entry>, LedgerError> {
        let _guard = self.locks.acquire(account_guid).await;
        self.accounts.read_by_guid(account_guid).await?;

        let mut created = Vec::with_capacity(items.len());
        for (amount, notes) in items {
            let entry = self
                .add_entry_locked(account_guid, entry_type, amount, notes, already_committed)
                .await?;
            created.push(entry);
        }
        Ok(created)
    }

    /// Inserts one Credit/Debit entry. Caller must already hold the
    /// account's lock and have verified the account exists.
    async fn add_entry_locked(
        &self,
        account_guid: AccountId,
        entry_type: EntryType,
        amount: Decimal,
        notes: Option<String>,
        already_committed: bool,
    ) -> Result<Entry, LedgerError> {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::InvalidArgument(
                "amount must be strictly positive".to_string(),
            ));
        }

        let now = self.clock.now_utc();
        let entry = Entry {
            guid: EntryId::new(),
            account_guid,
            entry_type,
            amount,
            description: None,
            notes,
            replaces: None,
            is_committed: false,
            committed_by_guid: None,
            committed_utc: None,
            created_utc: now,
        };
        let inserted = self.entries.insert(entry).await?;

        self.events.publish(LedgerEvent::EntryAdded {
            account_guid,
            entry_guid: inserted.guid,
        });

        if already_committed {
            self.commit_locked(account_guid, Some(vec![inserted.guid])).await?;
            return self.entries.get_by_guid(account_guid, inserted.guid).await;
        }

        Ok(inserted)
    }

    // ---- Commit ---------------------------------------------------------

    /// Commits the given entry guids (or all pending entries, if `None` or
    /// empty) into a new Balance entry extending the chain.
    pub async fn commit(
        &self,
        account_guid: AccountId,
        entry_guids: Option<Vec<EntryId>>,
    ) -> Result<BalanceView, LedgerError> {
        let _guard = self.locks.acquire(account_guid).await;
        self.accounts.read_by_guid(account_guid).await?;
        self.commit_locked(account_guid, entry_guids).await
    }

    async fn commit_locked(
        &self,
        account_guid: AccountId,
        entry_guids: Option<Vec<EntryId>>,
    ) -> Result<BalanceView, LedgerError> {
        let candidates = self.resolve_commit_candidates(account_guid, entry_guids).await?;

        if candidates.is_empty() {
            return self.current_balance_view(account_guid).await;
        }

        let prev = self.entries.latest_balance(account_guid).await?;
        let prev_amount = prev.as_ref().map(|b| b.amount).unwrap_or(Decimal::ZERO);

        let delta: Decimal = candidates
            .iter()
            .map(|e| match e.entry_type {
                EntryType::Credit => e.amount,
                EntryType::Debit => -e.amount,
                EntryType::Balance => Decimal::ZERO,
            })
            .sum();
        let new_amount = prev_amount + delta;
        let now = self.clock.now_utc();

        let balance_entry = Entry {
            guid: EntryId::new(),
            account_guid,
            entry_type: EntryType::Balance,
            amount: new_amount,
            description: None,
            notes: None,
            replaces: prev.as_ref().map(|b| b.guid),
            is_committed: true,
            committed_by_guid: None,
            committed_utc: Some(now),
            created_utc: now,
        };

        let candidate_guids: Vec<EntryId> = candidates.iter().map(|e| e.guid).collect();
        let committed_balance = self
            .entries
            .commit_batch(account_guid, balance_entry, &candidate_guids)
            .await?;

        self.events.publish(LedgerEvent::EntriesCommitted {
            account_guid,
            balance_guid: committed_balance.guid,
            entry_guids: candidate_guids,
            new_balance: committed_balance.amount,
            committed_utc: now,
        });

        self.current_balance_view(account_guid).await
    }

    async fn resolve_commit_candidates(
        &self,
        account_guid: AccountId,
        entry_guids: Option<Vec<EntryId>>,
    ) -> Result<Vec<Entry>, LedgerError> {
        // An omitted or empty guid list both mean "all pending entries".
        let entry_guids = entry_guids.filter(|guids| !guids.is_empty());
        match entry_guids {
            None => {
                let mut pending = self
                    .entries
                    .list_by_account(
                        account_guid,
                        &EntryFilter {
                            is_committed: Some(false),
                            ..Default::default()
                        },
                    )
                    .await?;
                pending.retain(|e| e.entry_type != EntryType::Balance);
                Ok(pending)
            }
            Some(guids) => {
                let mut seen = std::collections::HashSet::new();
                let mut resolved = Vec::with_capacity(guids.len());
                for guid in guids {
                    if !seen.insert(guid) {
                        continue;
                    }
                    let entry = self
                        .entries
                        .get_by_guid(account_guid, guid)
                        .await
                        .map_err(|_| LedgerError::EntryNotEligible(guid.into_inner()))?;
                    if !entry.is_pending() {
                        return Err(LedgerError::EntryNotEligible(guid.into_inner()));
                    }
                    resolved.push(entry);
                }
                Ok(resolved)
            }
        }
    }

    // ---- Balance & verification -----------------------------------------

    /// The current derived balance view for an account.
    pub async fn get_balance(&self, account_guid: AccountId) -> Result<BalanceView, LedgerError> {
        self.current_balance_view(account_guid).await
    }

    async fn current_balance_view(&self, account_guid: AccountId) -> Result<BalanceView, LedgerError> {
        let latest = self.entries.latest_balance(account_guid).await?;
        let committed_balance = latest.as_ref().map(|b| b.amount).unwrap_or(Decimal::ZERO);

        let pending_credits = self.entries.sum_pending(account_guid, EntryType::Credit).await?;
        let pending_debits = self.entries.sum_pending(account_guid, EntryType::Debit).await?;
        let pending_credit_count = self
            .entries
            .count_pending(account_guid, EntryType::Credit)
            .await?;
        let pending_debit_count = self
            .entries
            .count_pending(account_guid, EntryType::Debit)
            .await?;

        let committed_entry_guids = match &latest {
            Some(b) => self
                .entries
                .committed_by_balance(b.guid)
                .await?
                .into_iter()
                .map(|e| e.guid)
                .collect(),
            None => Vec::new(),
        };

        Ok(BalanceView {
            account_guid,
            committed_balance,
            pending_balance: committed_balance + pending_credits - pending_debits,
            pending_credit_count,
            pending_debit_count,
            entry_guid: latest.map(|b| b.guid),
            committed_entry_guids,
        })
    }

    /// The committed balance as observed at instant `t`. Pending entries
    /// never contribute regardless of their `created_utc`.
    pub async fn balance_as_of(
        &self,
        account_guid: AccountId,
        t: DateTime<Utc>,
    ) -> Result<Decimal, LedgerError> {
        Ok(self
            .entries
            .balance_as_of(account_guid, t)
            .await?
            .map(|b| b.amount)
            .unwrap_or(Decimal::ZERO))
    }

    /// Walks the Balance chain from genesis, verifying links and arithmetic.
    pub async fn verify_balance_chain(&self, account_guid: AccountId) -> Result<bool, LedgerError> {
        let _guard = self.locks.acquire(account_guid).await;
        self.accounts.read_by_guid(account_guid).await?;

        let chain = self.entries.balance_chain(account_guid).await?;
        let mut prev_guid: Option<EntryId> = None;
        let mut prev_amount = Decimal::ZERO;

        for balance in &chain {
            if balance.replaces != prev_guid {
                return Ok(false);
            }

            let members = self.entries.committed_by_balance(balance.guid).await?;
            let delta: Decimal = members
                .iter()
                .map(|e| match e.entry_type {
                    EntryType::Credit => e.amount,
                    EntryType::Debit => -e.amount,
                    EntryType::Balance => Decimal::ZERO,
                })
                .sum();

            if balance.amount != prev_amount + delta {
                return Ok(false);
            }

            prev_guid = Some(balance.guid);
            prev_amount = balance.amount;
        }

        Ok(true)
    }

    // ---- Enumeration ------------------------------------------------------

    /// Paginated entry enumeration for an account.
    pub async fn enumerate_entries(
        &self,
        account_guid: AccountId,
        query: &EntryQuery,
    ) -> Result<EnumerationResult<Entry>, LedgerError> {
        self.accounts.read_by_guid(account_guid).await?;

        let mut candidates = self
            .entries
            .list_by_account(account_guid, &query.filter)
            .await?;

        sort_entries(&mut candidates, query.ordering);

        if query.max_results == 0 {
            return Err(LedgerError::InvalidArgument(
                "max_results must be greater than zero".to_string(),
            ));
        }

        let total_records = candidates.len() as u64;
        let max_results = query
            .max_results
            .clamp(
                netledger_shared::types::MIN_MAX_RESULTS,
                netledger_shared::types::MAX_MAX_RESULTS,
            ) as usize;

        let start = match &query.continuation_token {
            Some(token) => candidates
                .iter()
                .position(|e| e.guid == *token)
                .map(|idx| idx + 1)
                .unwrap_or(0),
            None => query.skip as usize,
        };

        let page: Vec<Entry> = candidates.into_iter().skip(start).take(max_results).collect();
        let continuation_token = page.last().map(|e| e.guid.to_string());

        Ok(EnumerationResult::new(
            total_records,
            page,
            start as u64,
            continuation_token,
        ))
    }

    // ---- Cancellation -------------------------------------------------

    /// Cancels a pending Credit/Debit entry.
    pub async fn cancel_pending(
        &self,
        account_guid: AccountId,
        entry_guid: EntryId,
    ) -> Result<(), LedgerError> {
        let _guard = self.locks.acquire(account_guid).await;
        self.accounts.read_by_guid(account_guid).await?;
        self.entries.delete_pending(account_guid, entry_guid).await?;

        self.events.publish(LedgerEvent::EntryCanceled {
            account_guid,
            entry_guid,
        });
        Ok(())
    }
}

fn sort_entries(entries: &mut [Entry], ordering: Ordering) {
    entries.sort_by(|a, b| {
        let primary = match ordering {
            Ordering::CreatedAscending => a.created_utc.cmp(&b.created_utc),
            Ordering::CreatedDescending => b.created_utc.cmp(&a.created_utc),
            Ordering::AmountAscending => a.amount.cmp(&b.amount),
            Ordering::AmountDescending => b.amount.cmp(&a.amount),
        };
        primary.then_with(|| a.guid.cmp(&b.guid))
    });
}
