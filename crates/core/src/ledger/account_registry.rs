//! Account Registry: account lifecycle and name/guid lookup.

use std::sync::Arc;

use rust_decimal::Decimal;

use netledger_shared::Clock;
use netledger_shared::types::AccountId;

use super::adapter::AccountsAdapter;
use super::entry_store::EntryStore;
use super::error::LedgerError;
use super::types::{Account, AccountQuery};

/// Layer over the persistence adapter for account lifecycle.
pub struct AccountRegistry {
    adapter: Arc<dyn AccountsAdapter>,
    clock: Arc<dyn Clock>,
}

impl AccountRegistry {
    /// Wraps an adapter implementation.
    #[must_use]
    pub fn new(adapter: Arc<dyn AccountsAdapter>, clock: Arc<dyn Clock>) -> Self {
        Self { adapter, clock }
    }

    /// Creates a new account. Fails with `AccountNameConflict` if the exact
    /// name is already taken.
    pub async fn create(&self, name: String, notes: Option<String>) -> Result<Account, LedgerError> {
        if name.trim().is_empty() {
            return Err(LedgerError::InvalidArgument(
                "account name must not be empty".to_string(),
            ));
        }
        if self.adapter.exists_by_name(&name).await? {
            return Err(LedgerError::AccountNameConflict(name));
        }

        let account = Account {
            guid: AccountId::new(),
            name,
            notes,
            created_utc: self.clock.now_utc(),
        };
        self.adapter.create(account).await
    }

    /// Reads an account by guid.
    pub async fn read_by_guid(&self, guid: AccountId) -> Result<Account, LedgerError> {
        self.adapter
            .read_by_guid(guid)
            .await?
            .ok_or_else(|| LedgerError::AccountNotFound(guid.to_string()))
    }

    /// Reads an account by its exact name.
    pub async fn read_by_name(&self, name: &str) -> Result<Account, LedgerError> {
        self.adapter
            .read_by_name(name)
            .await?
            .ok_or_else(|| LedgerError::AccountNotFound(name.to_string()))
    }

    /// Updates an account's notes.
    pub async fn update_notes(
        &self,
        guid: AccountId,
        notes: Option<String>,
    ) -> Result<Account, LedgerError> {
        self.read_by_guid(guid).await?;
        self.adapter.update_notes(guid, notes).await
    }

    /// Deletes the account and all of its entries atomically. The caller is
    /// expected to hold the account's lock for the duration of the cascade.
    pub async fn delete(&self, guid: AccountId) -> Result<(), LedgerError> {
        self.read_by_guid(guid).await?;
        self.adapter.delete_with_entries(guid).await
    }

    /// Paginated account enumeration with optional name and balance filters.
    ///
    /// The balance predicate cannot be pushed to storage cheaply (it
    /// requires each candidate's committed balance), so this fetches all
    /// name-matching accounts in a deterministic order, filters by balance
    /// in memory, then slices by `skip`/`max_results`.
    pub async fn enumerate(
        &self,
        query: &AccountQuery,
        entry_store: &EntryStore,
    ) -> Result<netledger_shared::types::EnumerationResult<Account>, LedgerError> {
        let mut candidates = match &query.search_term {
            Some(term) if !term.is_empty() => self.adapter.search_by_name(term).await?,
            _ => self.adapter.read_all().await?,
        };
        candidates.sort_by(|a, b| {
            a.created_utc
                .cmp(&b.created_utc)
                .then_with(|| a.guid.cmp(&b.guid))
        });

        if query.balance_min.is_some() || query.balance_max.is_some() {
            let mut filtered = Vec::with_capacity(candidates.len());
            for account in candidates {
                let balance = match entry_store.latest_balance(account.guid).await? {
                    Some(entry) => entry.amount,
                    None => Decimal::ZERO,
                };
                if let Some(min) = query.balance_min {
                    if balance < min {
                        continue;
                    }
                }
                if let Some(max) = query.balance_max {
                    if balance > max {
                        continue;
                    }
                }
                filtered.push(account);
            }
            candidates = filtered;
        }

        if query.max_results == 0 {
            return Err(LedgerError::InvalidArgument(
                "max_results must be greater than zero".to_string(),
            ));
        }

        let total_records = candidates.len() as u64;
        let max_results = query.max_results.clamp(
            netledger_shared::types::MIN_MAX_RESULTS,
            netledger_shared::types::MAX_MAX_RESULTS,
        ) as usize;

        let start = match query.continuation_token {
            Some(token) => candidates
                .iter()
                .position(|a| a.guid == token)
                .map(|idx| idx + 1)
                .unwrap_or(0),
            None => query.skip as usize,
        };

        let page: Vec<Account> = candidates.into_iter().skip(start).take(max_results).collect();
        let continuation_token = page.last().map(|a| a.guid.to_string());

        Ok(netledger_shared::types::EnumerationResult::new(
            total_records,
            page,
            start as u64,
            continuation_token,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use netledger_shared::clock::ManualClock;
    use std::collections::HashMap;
    use tokio::sync::Mutex as TokioMutex;

    #[derive(Default)]
    struct MemAccounts {
        by_guid: TokioMutex<HashMap<AccountId, Account>>,
    }

    #[async_trait]
    impl AccountsAdapter for MemAccounts {
        async fn create(&self, account: Account) -> Result<Account, LedgerError> {
            self.by_guid.lock().await.insert(account.guid, account.clone());
            Ok(account)
        }
        async fn read_by_guid(&self, guid: AccountId) -> Result<Option<Account>, LedgerError> {
            Ok(self.by_guid.lock().await.get(&guid).cloned())
        }
        async fn read_by_name(&self, name: &str) -> Result<Option<Account>, LedgerError> {
            Ok(self.by_guid.lock().await.values().find(|a| a.name == name).cloned())
        }
        async fn read_all(&self) -> Result<Vec<Account>, LedgerError> {
            Ok(self.by_guid.lock().await.values().cloned().collect())
        }
        async fn search_by_name(&self, term: &str) -> Result<Vec<Account>, LedgerError> {
            Ok(self
                .by_guid
                .lock()
                .await
                .values()
                .filter(|a| a.name.to_lowercase().contains(&term.to_lowercase()))
                .cloned()
                .collect())
        }
        async fn update_notes(&self, guid: AccountId, notes: Option<String>) -> Result<Account, LedgerError> {
            let mut map = self.by_guid.lock().await;
            let account = map
                .get_mut(&guid)
                .ok_or_else(|| LedgerError::AccountNotFound(guid.to_string()))?;
            account.notes = notes;
            Ok(account.clone())
        }
        async fn delete_with_entries(&self, guid: AccountId) -> Result<(), LedgerError> {
            self.by_guid.lock().await.remove(&guid);
            Ok(())
        }
        async fn exists_by_guid(&self, guid: AccountId) -> Result<bool, LedgerError> {
            Ok(self.by_guid.lock().await.contains_key(&guid))
        }
        async fn exists_by_name(&self, name: &str) -> Result<bool, LedgerError> {
            Ok(self.by_guid.lock().await.values().any(|a| a.name == name))
        }
        async fn count(&self) -> Result<u64, LedgerError> {
            Ok(self.by_guid.lock().await.len() as u64)
        }
    }

    fn make_registry() -> AccountRegistry {
        AccountRegistry::new(Arc::new(MemAccounts::default()), Arc::new(ManualClock::new(Utc::now())))
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_name() {
        let registry = make_registry();
        registry.create("Checking".to_string(), None).await.unwrap();
        let result = registry.create("Checking".to_string(), None).await;
        assert!(matches!(result, Err(LedgerError::AccountNameConflict(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_empty_name() {
        let registry = make_registry();
        let result = registry.create("   ".to_string(), None).await;
        assert!(matches!(result, Err(LedgerError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn test_read_by_guid_not_found() {
        let registry = make_registry();
        let result = registry.read_by_guid(AccountId::new()).await;
        assert!(matches!(result, Err(LedgerError::AccountNotFound(_))));
    }

    #[tokio::test]
    async fn test_enumerate_search_term_filters_by_substring() {
        let registry = make_registry();
        registry.create("Checking".to_string(), None).await.unwrap();
        registry.create("Savings".to_string(), None).await.unwrap();

        let entries = crate::ledger::entry_store::EntryStore::new(Arc::new(NoEntries));
        let query = AccountQuery {
            search_term: Some("check".to_string()),
            ..Default::default()
        };
        let result = registry.enumerate(&query, &entries).await.unwrap();
        assert_eq!(result.objects.len(), 1);
        assert_eq!(result.objects[0].name, "Checking");
    }

    struct NoEntries;

    #[async_trait]
    impl super::super::adapter::EntriesAdapter for NoEntries {
        async fn insert(&self, entry: super::super::types::Entry) -> Result<super::super::types::Entry, LedgerError> {
            Ok(entry)
        }
        async fn get_by_guid(
            &self,
            _account_guid: AccountId,
            _entry_guid: netledger_shared::types::EntryId,
        ) -> Result<Option<super::super::types::Entry>, LedgerError> {
            Ok(None)
        }
        async fn list_by_account(
            &self,
            _account_guid: AccountId,
            _filter: &super::super::types::EntryFilter,
        ) -> Result<Vec<super::super::types::Entry>, LedgerError> {
            Ok(Vec::new())
        }
        async fn count_by_account(
            &self,
            _account_guid: AccountId,
            _filter: &super::super::types::EntryFilter,
        ) -> Result<u64, LedgerError> {
            Ok(0)
        }
        async fn latest_balance(
            &self,
            _account_guid: AccountId,
        ) -> Result<Option<super::super::types::Entry>, LedgerError> {
            Ok(None)
        }
        async fn balance_chain(
            &self,
            _account_guid: AccountId,
        ) -> Result<Vec<super::super::types::Entry>, LedgerError> {
            Ok(Vec::new())
        }
        async fn balance_as_of(
            &self,
            _account_guid: AccountId,
            _t: chrono::DateTime<Utc>,
        ) -> Result<Option<super::super::types::Entry>, LedgerError> {
            Ok(None)
        }
        async fn sum_pending(
            &self,
            _account_guid: AccountId,
            _entry_type: super::super::types::EntryType,
        ) -> Result<Decimal, LedgerError> {
            Ok(Decimal::ZERO)
        }
        async fn count_pending(
            &self,
            _account_guid: AccountId,
            _entry_type: super::super::types::EntryType,
        ) -> Result<u64, LedgerError> {
            Ok(0)
        }
        async fn committed_by_balance(
            &self,
            _balance_guid: netledger_shared::types::EntryId,
        ) -> Result<Vec<super::super::types::Entry>, LedgerError> {
            Ok(Vec::new())
        }
        async fn commit_batch(
            &self,
            _account_guid: AccountId,
            balance_entry: super::super::types::Entry,
            _entry_guids: &[netledger_shared::types::EntryId],
        ) -> Result<super::super::types::Entry, LedgerError> {
            Ok(balance_entry)
        }
        async fn delete_pending(
            &self,
            _account_guid: AccountId,
            _entry_guid: netledger_shared::types::EntryId,
        ) -> Result<(), LedgerError> {
            Ok(())
        }
        async fn delete_by_account(&self, _account_guid: AccountId) -> Result<(), LedgerError> {
            Ok(())
        }
    }
}

