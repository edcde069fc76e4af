//! `SeaORM` entities for the NetLedger schema.

pub mod accounts;
pub mod api_keys;
pub mod entries;

pub mod prelude {
    pub use super::accounts::Entity as Accounts;
    pub use super::api_keys::Entity as ApiKeys;
    pub use super::entries::Entity as Entries;
}
