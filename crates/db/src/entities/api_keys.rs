//! `SeaORM` entity for the apikeys table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "apikeys")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique, indexed)]
    pub guid: Uuid,
    pub name: String,
    /// Argon2id hash of the secret, never the secret itself.
    pub apikey: String,
    #[sea_orm(indexed)]
    pub key_prefix: String,
    pub active: bool,
    pub is_admin: bool,
    pub created_utc: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
