//! `SeaORM`-backed implementation of [`AccountsAdapter`].

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};

use netledger_core::ledger::adapter::AccountsAdapter;
use netledger_core::ledger::error::LedgerError;
use netledger_core::ledger::types::Account;
use netledger_shared::types::AccountId;

use crate::entities::accounts;

/// Account repository backed by Postgres via `SeaORM`.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_domain(model: accounts::Model) -> Account {
    Account {
        guid: AccountId::from_uuid(model.guid),
        name: model.name,
        notes: model.notes,
        created_utc: model.created_utc.with_timezone(&Utc),
    }
}

fn db_err(err: sea_orm::DbErr) -> LedgerError {
    LedgerError::Internal(err.to_string())
}

#[async_trait]
impl AccountsAdapter for AccountRepository {
    async fn create(&self, account: Account) -> Result<Account, LedgerError> {
        let active = accounts::ActiveModel {
            id: sea_orm::ActiveValue::NotSet,
            guid: Set(account.guid.into_inner()),
            name: Set(account.name),
            notes: Set(account.notes),
            created_utc: Set(account.created_utc.into()),
        };
        let inserted = active.insert(&self.db).await.map_err(db_err)?;
        Ok(to_domain(inserted))
    }

    async fn read_by_guid(&self, guid: AccountId) -> Result<Option<Account>, LedgerError> {
        let found = accounts::Entity::find()
            .filter(accounts::Column::Guid.eq(guid.into_inner()))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(found.map(to_domain))
    }

    async fn read_by_name(&self, name: &str) -> Result<Option<Account>, LedgerError> {
        let found = accounts::Entity::find()
            .filter(accounts::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(found.map(to_domain))
    }

    async fn read_all(&self) -> Result<Vec<Account>, LedgerError> {
        let rows = accounts::Entity::find()
            .order_by_asc(accounts::Column::CreatedUtc)
            .order_by_asc(accounts::Column::Guid)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(to_domain).collect())
    }

    async fn search_by_name(&self, term: &str) -> Result<Vec<Account>, LedgerError> {
        let pattern = format!("%{term}%");
        let rows = accounts::Entity::find()
            .filter(accounts::Column::Name.icontains(&pattern))
            .order_by_asc(accounts::Column::CreatedUtc)
            .order_by_asc(accounts::Column::Guid)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(to_domain).collect())
    }

    async fn update_notes(
        &self,
        guid: AccountId,
        notes: Option<String>,
    ) -> Result<Account, LedgerError> {
        let model = accounts::Entity::find()
            .filter(accounts::Column::Guid.eq(guid.into_inner()))
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| LedgerError::AccountNotFound(guid.to_string()))?;

        let mut active: accounts::ActiveModel = model.into();
        active.notes = Set(notes);
        let updated = active.update(&self.db).await.map_err(db_err)?;
        Ok(to_domain(updated))
    }

    async fn delete_with_entries(&self, guid: AccountId) -> Result<(), LedgerError> {
        // `entries.account_guid` carries `ON DELETE CASCADE`, so deleting the
        // account row alone removes its entries atomically.
        accounts::Entity::delete_many()
            .filter(accounts::Column::Guid.eq(guid.into_inner()))
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn exists_by_guid(&self, guid: AccountId) -> Result<bool, LedgerError> {
        let count = accounts::Entity::find()
            .filter(accounts::Column::Guid.eq(guid.into_inner()))
            .count(&self.db)
            .await
            .map_err(db_err)?;
        Ok(count > 0)
    }

    async fn exists_by_name(&self, name: &str) -> Result<bool, LedgerError> {
        let count = accounts::Entity::find()
            .filter(accounts::Column::Name.eq(name))
            .count(&self.db)
            .await
            .map_err(db_err)?;
        Ok(count > 0)
    }

    async fn count(&self) -> Result<u64, LedgerError> {
        accounts::Entity::find().count(&self.db).await.map_err(db_err)
    }
}
