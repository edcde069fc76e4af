//! Repository implementations of the core's persistence adapter traits.
//!
//! Each repository implements one of `netledger_core::ledger::adapter`'s
//! traits against `SeaORM` entities, hiding SQL details from the engine.

pub mod account;
pub mod api_key;
pub mod entry;

pub use account::AccountRepository;
pub use api_key::ApiKeyRepository;
pub use entry::EntryRepository;
