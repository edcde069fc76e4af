//! Per-account mutual exclusion.
//!
//! A keyed lock table, not a global ledger lock: concurrent operations on
//! different accounts never block each other. Entries persist for the
//! process lifetime once a key is first touched.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use netledger_shared::types::AccountId;

/// Process-lifetime table of per-account exclusive locks.
#[derive(Debug, Default)]
pub struct AccountLockTable {
    locks: DashMap<AccountId, Arc<Mutex<()>>>,
}

impl AccountLockTable {
    /// Creates an empty lock table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            locks: DashMap::new(),
        }
    }

    /// Acquires the exclusive lock for `account_guid`, suspending until
    /// available. Safe to call concurrently for distinct or identical keys.
    pub async fn acquire(&self, account_guid: AccountId) -> OwnedMutexGuard<()> {
        let mutex = self
            .locks
            .entry(account_guid)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        mutex.lock_owned().await
    }
}
