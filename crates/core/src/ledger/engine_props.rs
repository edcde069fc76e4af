//! Property-based tests for `LedgerEngine`'s quantified invariants.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use tokio::sync::Mutex as TokioMutex;

use netledger_shared::clock::ManualClock;
use netledger_shared::types::{AccountId, EntryId};

use super::adapter::{AccountsAdapter, EntriesAdapter};
use super::engine::LedgerEngine;
use super::error::LedgerError;
use super::types::{Account, Entry, EntryFilter, EntryType};

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
    async fn search_by_name(&self, _term: &str) -> Result<Vec<Account>, LedgerError> {
        Ok(Vec::new())
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

#[derive(Default)]
struct MemEntries {
    by_guid: TokioMutex<HashMap<EntryId, Entry>>,
}

#[async_trait]
impl EntriesAdapter for MemEntries {
    async fn insert(&self, entry: Entry) -> Result<Entry, LedgerError> {
        self.by_guid.lock().await.insert(entry.guid, entry.clone());
        Ok(entry)
    }
    async fn get_by_guid(&self, account_guid: AccountId, entry_guid: EntryId) -> Result<Option<Entry>, LedgerError> {
        Ok(self
            .by_guid
            .lock()
            .await
            .get(&entry_guid)
            .filter(|e| e.account_guid == account_guid)
            .cloned())
    }
    async fn list_by_account(&self, account_guid: AccountId, filter: &EntryFilter) -> Result<Vec<Entry>, LedgerError> {
        Ok(self
            .by_guid
            .lock()
            .await
            .values()
            .filter(|e| e.account_guid == account_guid)
            .filter(|e| filter.is_committed.is_none_or(|c| e.is_committed == c))
            .filter(|e| filter.entry_type.is_none_or(|t| e.entry_type == t))
            .cloned()
            .collect())
    }
    async fn count_by_account(&self, account_guid: AccountId, filter: &EntryFilter) -> Result<u64, LedgerError> {
        Ok(self.list_by_account(account_guid, filter).await?.len() as u64)
    }
    async fn latest_balance(&self, account_guid: AccountId) -> Result<Option<Entry>, LedgerError> {
        Ok(self
            .by_guid
            .lock()
            .await
            .values()
            .filter(|e| e.account_guid == account_guid && e.entry_type == EntryType::Balance)
            .max_by(|a, b| a.created_utc.cmp(&b.created_utc).then(a.guid.cmp(&b.guid)))
            .cloned())
    }
    async fn balance_chain(&self, account_guid: AccountId) -> Result<Vec<Entry>, LedgerError> {
        let mut chain: Vec<Entry> = self
            .by_guid
            .lock()
            .await
            .values()
            .filter(|e| e.account_guid == account_guid && e.entry_type == EntryType::Balance)
            .cloned()
            .collect();
        chain.sort_by(|a, b| a.created_utc.cmp(&b.created_utc).then(a.guid.cmp(&b.guid)));
        Ok(chain)
    }
    async fn balance_as_of(&self, account_guid: AccountId, t: DateTime<Utc>) -> Result<Option<Entry>, LedgerError> {
        Ok(self
            .by_guid
            .lock()
            .await
            .values()
            .filter(|e| e.account_guid == account_guid && e.entry_type == EntryType::Balance && e.created_utc <= t)
            .max_by(|a, b| a.created_utc.cmp(&b.created_utc).then(a.guid.cmp(&b.guid)))
            .cloned())
    }
    async fn sum_pending(&self, account_guid: AccountId, entry_type: EntryType) -> Result<Decimal, LedgerError> {
        Ok(self
            .by_guid
            .lock()
            .await
            .values()
            .filter(|e| e.account_guid == account_guid && e.entry_type == entry_type && !e.is_committed)
            .map(|e| e.amount)
            .sum())
    }
    async fn count_pending(&self, account_guid: AccountId, entry_type: EntryType) -> Result<u64, LedgerError> {
        Ok(self
            .by_guid
            .lock()
            .await
            .values()
            .filter(|e| e.account_guid == account_guid && e.entry_type == entry_type && !e.is_committed)
            .count() as u64)
    }
    async fn committed_by_balance(&self, balance_guid: EntryId) -> Result<Vec<Entry>, LedgerError> {
        Ok(self
            .by_guid
            .lock()
            .await
            .values()
            .filter(|e| e.committed_by_guid == Some(balance_guid))
            .cloned()
            .collect())
    }
    async fn commit_batch(&self, _account_guid: AccountId, balance_entry: Entry, entry_guids: &[EntryId]) -> Result<Entry, LedgerError> {
        let mut map = self.by_guid.lock().await;
        for guid in entry_guids {
            if let Some(e) = map.get_mut(guid) {
                e.is_committed = true;
                e.committed_by_guid = Some(balance_entry.guid);
                e.committed_utc = balance_entry.committed_utc;
            }
        }
        map.insert(balance_entry.guid, balance_entry.clone());
        Ok(balance_entry)
    }
    async fn delete_pending(&self, _account_guid: AccountId, entry_guid: EntryId) -> Result<(), LedgerError> {
        self.by_guid.lock().await.remove(&entry_guid);
        Ok(())
    }
    async fn delete_by_account(&self, account_guid: AccountId) -> Result<(), LedgerError> {
        self.by_guid.lock().await.retain(|_, e| e.account_guid != account_guid);
        Ok(())
    }
}

fn make_engine() -> LedgerEngine {
    let clock = Arc::new(ManualClock::new(Utc::now()));
    LedgerEngine::new(Arc::new(MemAccounts::default()), Arc::new(MemEntries::default()), clock)
}

/// Strategy for a positive amount with up to 8 fractional digits, matching
/// the smallest unit the amount column supports.
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|units| Decimal::new(units, 8))
}

fn block_on<F: std::future::Future>(fut: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("build single-threaded runtime")
        .block_on(fut)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Committing a set of credits and debits moves the committed balance
    /// by exactly the net of what was committed.
    #[test]
    fn prop_commit_delta_equals_credits_minus_debits(
        credits in prop::collection::vec(positive_amount(), 0..5),
        debits in prop::collection::vec(positive_amount(), 0..5),
    ) {
        block_on(async {
            let engine = make_engine();
            let account = engine.create_account("props-account".to_string(), None).await.unwrap();

            for amount in &credits {
                engine.add_credit(account.guid, *amount, None, false).await.unwrap();
            }
            for amount in &debits {
                engine.add_debit(account.guid, *amount, None, false).await.unwrap();
            }

            let before = engine.get_balance(account.guid).await.unwrap().committed_balance;
            engine.commit(account.guid, None).await.unwrap();
            let after = engine.get_balance(account.guid).await.unwrap().committed_balance;

            let expected_delta: Decimal = credits.iter().sum::<Decimal>() - debits.iter().sum::<Decimal>();
            prop_assert_eq!(after - before, expected_delta);
        });
    }

    /// `Commit` with nothing pending is a no-op: no new Balance row, balance
    /// unchanged.
    #[test]
    fn prop_commit_with_no_pending_is_noop(_dummy in 0..1i32) {
        block_on(async {
            let engine = make_engine();
            let account = engine.create_account("props-noop".to_string(), None).await.unwrap();

            let before = engine.get_balance(account.guid).await.unwrap();
            engine.commit(account.guid, None).await.unwrap();
            let after = engine.get_balance(account.guid).await.unwrap();

            prop_assert_eq!(before.committed_balance, after.committed_balance);
            prop_assert_eq!(before.pending_balance, after.pending_balance);
        });
    }

    /// `pending_balance = committed_balance + sum(pending credits) - sum(pending debits)`
    /// holds at any point between operations.
    #[test]
    fn prop_pending_balance_formula(
        committed_credits in prop::collection::vec(positive_amount(), 0..4),
        pending_credits in prop::collection::vec(positive_amount(), 0..4),
        pending_debits in prop::collection::vec(positive_amount(), 0..4),
    ) {
        block_on(async {
            let engine = make_engine();
            let account = engine.create_account("props-pending".to_string(), None).await.unwrap();

            for amount in &committed_credits {
                engine.add_credit(account.guid, *amount, None, true).await.unwrap();
            }
            for amount in &pending_credits {
                engine.add_credit(account.guid, *amount, None, false).await.unwrap();
            }
            for amount in &pending_debits {
                engine.add_debit(account.guid, *amount, None, false).await.unwrap();
            }

            let view = engine.get_balance(account.guid).await.unwrap();
            let expected = view.committed_balance + pending_credits.iter().sum::<Decimal>()
                - pending_debits.iter().sum::<Decimal>();
            prop_assert_eq!(view.pending_balance, expected);
        });
    }

    /// `VerifyBalanceChain` is true after any sequence of credit/debit/commit
    /// operations that never tampers with a Balance row directly.
    #[test]
    fn prop_verify_holds_after_normal_operations(
        rounds in prop::collection::vec((positive_amount(), positive_amount()), 1..4),
    ) {
        block_on(async {
            let engine = make_engine();
            let account = engine.create_account("props-verify".to_string(), None).await.unwrap();

            for (credit, debit) in rounds {
                engine.add_credit(account.guid, credit, None, false).await.unwrap();
                engine.add_debit(account.guid, debit, None, false).await.unwrap();
                engine.commit(account.guid, None).await.unwrap();
            }

            prop_assert!(engine.verify_balance_chain(account.guid).await.unwrap());
        });
    }

    /// `amount = 0` is always rejected; the smallest representable positive
    /// amount is always accepted.
    #[test]
    fn prop_zero_amount_rejected_min_unit_accepted(_dummy in 0..1i32) {
        block_on(async {
            let engine = make_engine();
            let account = engine.create_account("props-boundary".to_string(), None).await.unwrap();

            let zero_result = engine.add_credit(account.guid, Decimal::ZERO, None, false).await;
            prop_assert!(matches!(zero_result, Err(LedgerError::InvalidArgument(_))));

            let min_unit = Decimal::new(1, 8);
            let min_result = engine.add_credit(account.guid, min_unit, None, false).await;
            prop_assert!(min_result.is_ok());
        });
    }
}

#[cfg(test)]
mod unit_tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn commit_delta_matches_a_concrete_mixed_batch() {
        block_on(async {
            let engine = make_engine();
            let account = engine.create_account("unit-mixed".to_string(), None).await.unwrap();

            engine.add_credit(account.guid, dec!(200), None, false).await.unwrap();
            engine.add_credit(account.guid, dec!(50), None, false).await.unwrap();
            engine.add_debit(account.guid, dec!(75), None, false).await.unwrap();

            let view = engine.commit(account.guid, None).await.unwrap();
            assert_eq!(view.committed_balance, dec!(175));
            assert!(engine.verify_balance_chain(account.guid).await.unwrap());
        });
    }
}
