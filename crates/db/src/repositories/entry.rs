//! `SeaORM`-backed implementation of [`EntriesAdapter`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

use netledger_core::ledger::adapter::EntriesAdapter;
use netledger_core::ledger::error::LedgerError;
use netledger_core::ledger::types::{Entry, EntryFilter, EntryType};
use netledger_shared::types::{AccountId, EntryId};

use crate::entities::entries::{self, EntryTypeDb};

/// Entry repository backed by Postgres via `SeaORM`.
#[derive(Debug, Clone)]
pub struct EntryRepository {
    db: DatabaseConnection,
}

impl EntryRepository {
    /// Creates a new entry repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn db_err(err: sea_orm::DbErr) -> LedgerError {
    LedgerError::Internal(err.to_string())
}

fn type_to_db(entry_type: EntryType) -> EntryTypeDb {
    match entry_type {
        EntryType::Credit => EntryTypeDb::Credit,
        EntryType::Debit => EntryTypeDb::Debit,
        EntryType::Balance => EntryTypeDb::Balance,
    }
}

fn type_from_db(entry_type: EntryTypeDb) -> EntryType {
    match entry_type {
        EntryTypeDb::Credit => EntryType::Credit,
        EntryTypeDb::Debit => EntryType::Debit,
        EntryTypeDb::Balance => EntryType::Balance,
    }
}

fn to_domain(model: entries::Model) -> Entry {
    Entry {
        guid: EntryId::from_uuid(model.guid),
        account_guid: AccountId::from_uuid(model.account_guid),
        entry_type: type_from_db(model.entry_type),
        amount: model.amount,
        description: model.description,
        notes: model.notes,
        replaces: model.replaces.map(EntryId::from_uuid),
        is_committed: model.is_committed,
        committed_by_guid: model.committed_by_guid.map(EntryId::from_uuid),
        committed_utc: model.committed_utc.map(|t| t.with_timezone(&Utc)),
        created_utc: model.created_utc.with_timezone(&Utc),
    }
}

fn to_active(entry: &Entry) -> entries::ActiveModel {
    entries::ActiveModel {
        id: sea_orm::ActiveValue::NotSet,
        guid: Set(entry.guid.into_inner()),
        account_guid: Set(entry.account_guid.into_inner()),
        entry_type: Set(type_to_db(entry.entry_type)),
        amount: Set(entry.amount),
        description: Set(entry.description.clone()),
        notes: Set(entry.notes.clone()),
        replaces: Set(entry.replaces.map(EntryId::into_inner)),
        is_committed: Set(entry.is_committed),
        committed_by_guid: Set(entry.committed_by_guid.map(EntryId::into_inner)),
        committed_utc: Set(entry.committed_utc.map(Into::into)),
        created_utc: Set(entry.created_utc.into()),
    }
}

fn apply_filter(
    mut query: sea_orm::Select<entries::Entity>,
    filter: &EntryFilter,
) -> sea_orm::Select<entries::Entity> {
    if let Some(after) = filter.created_after_utc {
        query = query.filter(entries::Column::CreatedUtc.gte(DateTime::<Utc>::from(after)));
    }
    if let Some(before) = filter.created_before_utc {
        query = query.filter(entries::Column::CreatedUtc.lte(DateTime::<Utc>::from(before)));
    }
    if let Some(min) = filter.amount_min {
        query = query.filter(entries::Column::Amount.gte(min));
    }
    if let Some(max) = filter.amount_max {
        query = query.filter(entries::Column::Amount.lte(max));
    }
    if let Some(entry_type) = filter.entry_type {
        query = query.filter(entries::Column::EntryType.eq(type_to_db(entry_type)));
    }
    if let Some(is_committed) = filter.is_committed {
        query = query.filter(entries::Column::IsCommitted.eq(is_committed));
    }
    query
}

#[async_trait]
impl EntriesAdapter for EntryRepository {
    async fn insert(&self, entry: Entry) -> Result<Entry, LedgerError> {
        let inserted = to_active(&entry).insert(&self.db).await.map_err(db_err)?;
        Ok(to_domain(inserted))
    }

    async fn get_by_guid(
        &self,
        account_guid: AccountId,
        entry_guid: EntryId,
    ) -> Result<Option<Entry>, LedgerError> {
        let found = entries::Entity::find()
            .filter(entries::Column::AccountGuid.eq(account_guid.into_inner()))
            .filter(entries::Column::Guid.eq(entry_guid.into_inner()))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(found.map(to_domain))
    }

    async fn list_by_account(
        &self,
        account_guid: AccountId,
        filter: &EntryFilter,
    ) -> Result<Vec<Entry>, LedgerError> {
        let query = entries::Entity::find()
            .filter(entries::Column::AccountGuid.eq(account_guid.into_inner()));
        let rows = apply_filter(query, filter)
            .order_by_asc(entries::Column::CreatedUtc)
            .order_by_asc(entries::Column::Guid)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(to_domain).collect())
    }

    async fn count_by_account(
        &self,
        account_guid: AccountId,
        filter: &EntryFilter,
    ) -> Result<u64, LedgerError> {
        let query = entries::Entity::find()
            .filter(entries::Column::AccountGuid.eq(account_guid.into_inner()));
        apply_filter(query, filter).count(&self.db).await.map_err(db_err)
    }

    async fn latest_balance(&self, account_guid: AccountId) -> Result<Option<Entry>, LedgerError> {
        let found = entries::Entity::find()
            .filter(entries::Column::AccountGuid.eq(account_guid.into_inner()))
            .filter(entries::Column::EntryType.eq(EntryTypeDb::Balance))
            .order_by_desc(entries::Column::CreatedUtc)
            .order_by_desc(entries::Column::Guid)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(found.map(to_domain))
    }

    async fn balance_chain(&self, account_guid: AccountId) -> Result<Vec<Entry>, LedgerError> {
        let rows = entries::Entity::find()
            .filter(entries::Column::AccountGuid.eq(account_guid.into_inner()))
            .filter(entries::Column::EntryType.eq(EntryTypeDb::Balance))
            .order_by_asc(entries::Column::CreatedUtc)
            .order_by_asc(entries::Column::Guid)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(to_domain).collect())
    }

    async fn balance_as_of(
        &self,
        account_guid: AccountId,
        t: DateTime<Utc>,
    ) -> Result<Option<Entry>, LedgerError> {
        let found = entries::Entity::find()
            .filter(entries::Column::AccountGuid.eq(account_guid.into_inner()))
            .filter(entries::Column::EntryType.eq(EntryTypeDb::Balance))
            .filter(entries::Column::CreatedUtc.lte(t))
            .order_by_desc(entries::Column::CreatedUtc)
            .order_by_desc(entries::Column::Guid)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(found.map(to_domain))
    }

    async fn sum_pending(
        &self,
        account_guid: AccountId,
        entry_type: EntryType,
    ) -> Result<Decimal, LedgerError> {
        let rows = entries::Entity::find()
            .filter(entries::Column::AccountGuid.eq(account_guid.into_inner()))
            .filter(entries::Column::EntryType.eq(type_to_db(entry_type)))
            .filter(entries::Column::IsCommitted.eq(false))
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(rows.iter().map(|r| r.amount).sum())
    }

    async fn count_pending(
        &self,
        account_guid: AccountId,
        entry_type: EntryType,
    ) -> Result<u64, LedgerError> {
        entries::Entity::find()
            .filter(entries::Column::AccountGuid.eq(account_guid.into_inner()))
            .filter(entries::Column::EntryType.eq(type_to_db(entry_type)))
            .filter(entries::Column::IsCommitted.eq(false))
            .count(&self.db)
            .await
            .map_err(db_err)
    }

    async fn committed_by_balance(&self, balance_guid: EntryId) -> Result<Vec<Entry>, LedgerError> {
        let rows = entries::Entity::find()
            .filter(entries::Column::CommittedByGuid.eq(balance_guid.into_inner()))
            .order_by_asc(entries::Column::CreatedUtc)
            .order_by_asc(entries::Column::Guid)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(to_domain).collect())
    }

    async fn commit_batch(
        &self,
        _account_guid: AccountId,
        balance_entry: Entry,
        entry_guids: &[EntryId],
    ) -> Result<Entry, LedgerError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let inserted = to_active(&balance_entry)
            .insert(&txn)
            .await
            .map_err(db_err)?;

        let committed_utc = balance_entry.committed_utc.unwrap_or(balance_entry.created_utc);
        for guid in entry_guids {
            let model = entries::Entity::find()
                .filter(entries::Column::Guid.eq(guid.into_inner()))
                .one(&txn)
                .await
                .map_err(db_err)?
                .ok_or_else(|| LedgerError::EntryNotFound(guid.into_inner()))?;

            let mut active: entries::ActiveModel = model.into();
            active.is_committed = Set(true);
            active.committed_by_guid = Set(Some(balance_entry.guid.into_inner()));
            active.committed_utc = Set(Some(committed_utc.into()));
            active.update(&txn).await.map_err(db_err)?;
        }

        txn.commit().await.map_err(db_err)?;
        Ok(to_domain(inserted))
    }

    async fn delete_pending(
        &self,
        account_guid: AccountId,
        entry_guid: EntryId,
    ) -> Result<(), LedgerError> {
        entries::Entity::delete_many()
            .filter(entries::Column::AccountGuid.eq(account_guid.into_inner()))
            .filter(entries::Column::Guid.eq(entry_guid.into_inner()))
            .filter(entries::Column::IsCommitted.eq(false))
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn delete_by_account(&self, account_guid: AccountId) -> Result<(), LedgerError> {
        entries::Entity::delete_many()
            .filter(entries::Column::AccountGuid.eq(account_guid.into_inner()))
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(())
    }
}
