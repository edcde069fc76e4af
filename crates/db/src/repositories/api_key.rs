//! `SeaORM`-backed implementation of [`ApiKeysAdapter`].

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};

use netledger_core::ledger::adapter::ApiKeysAdapter;
use netledger_core::ledger::error::LedgerError;
use netledger_core::ledger::types::ApiKey;
use netledger_shared::types::ApiKeyId;

use crate::entities::api_keys;

/// API key repository backed by Postgres via `SeaORM`.
#[derive(Debug, Clone)]
pub struct ApiKeyRepository {
    db: DatabaseConnection,
}

impl ApiKeyRepository {
    /// Creates a new API key repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_domain(model: api_keys::Model) -> ApiKey {
    ApiKey {
        guid: ApiKeyId::from_uuid(model.guid),
        name: model.name,
        key_hash: model.apikey,
        key_prefix: model.key_prefix,
        active: model.active,
        is_admin: model.is_admin,
        created_utc: model.created_utc.with_timezone(&Utc),
    }
}

fn db_err(err: sea_orm::DbErr) -> LedgerError {
    LedgerError::Internal(err.to_string())
}

#[async_trait]
impl ApiKeysAdapter for ApiKeyRepository {
    async fn create(&self, key: ApiKey) -> Result<ApiKey, LedgerError> {
        let active = api_keys::ActiveModel {
            id: sea_orm::ActiveValue::NotSet,
            guid: Set(key.guid.into_inner()),
            name: Set(key.name),
            apikey: Set(key.key_hash),
            key_prefix: Set(key.key_prefix),
            active: Set(key.active),
            is_admin: Set(key.is_admin),
            created_utc: Set(key.created_utc.into()),
        };
        let inserted = active.insert(&self.db).await.map_err(db_err)?;
        Ok(to_domain(inserted))
    }

    async fn read_by_guid(&self, guid: ApiKeyId) -> Result<Option<ApiKey>, LedgerError> {
        let found = api_keys::Entity::find()
            .filter(api_keys::Column::Guid.eq(guid.into_inner()))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(found.map(to_domain))
    }

    async fn read_by_prefix(&self, prefix: &str) -> Result<Vec<ApiKey>, LedgerError> {
        let rows = api_keys::Entity::find()
            .filter(api_keys::Column::KeyPrefix.eq(prefix))
            .filter(api_keys::Column::Active.eq(true))
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(to_domain).collect())
    }

    async fn list(&self) -> Result<Vec<ApiKey>, LedgerError> {
        let rows = api_keys::Entity::find()
            .order_by_asc(api_keys::Column::CreatedUtc)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(to_domain).collect())
    }

    async fn set_active(&self, guid: ApiKeyId, active: bool) -> Result<ApiKey, LedgerError> {
        let model = api_keys::Entity::find()
            .filter(api_keys::Column::Guid.eq(guid.into_inner()))
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| LedgerError::ApiKeyNotFound(guid.into_inner()))?;

        let mut active_model: api_keys::ActiveModel = model.into();
        active_model.active = Set(active);
        let updated = active_model.update(&self.db).await.map_err(db_err)?;
        Ok(to_domain(updated))
    }

    async fn delete(&self, guid: ApiKeyId) -> Result<(), LedgerError> {
        api_keys::Entity::delete_many()
            .filter(api_keys::Column::Guid.eq(guid.into_inner()))
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(())
    }
}
