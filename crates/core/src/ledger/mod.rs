//! Double-entry ledger engine.
//!
//! This module implements the account/entry data model, the persistence
//! adapter contract the engine is built against, the per-account lock
//! discipline, the fire-and-forget event bus, and the orchestration
//! component (`LedgerEngine`) that higher layers talk to exclusively.

pub mod account_registry;
pub mod adapter;
pub mod api_key_registry;
pub mod engine;
pub mod entry_store;
pub mod error;
pub mod events;
pub mod locks;
pub mod types;

#[cfg(test)]
mod engine_props;

pub use account_registry::AccountRegistry;
pub use adapter::{AccountsAdapter, ApiKeysAdapter, EntriesAdapter};
pub use api_key_registry::ApiKeyRegistry;
pub use engine::LedgerEngine;
pub use entry_store::EntryStore;
pub use error::LedgerError;
pub use events::{EventBus, EventSubscriber, LedgerEvent};
pub use locks::AccountLockTable;
pub use types::{
    Account, AccountQuery, ApiKey, BalanceView, Entry, EntryFilter, EntryQuery, EntryType,
};
