//! `SeaORM` entity for the entries table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
pub enum EntryTypeDb {
    #[sea_orm(string_value = "Credit")]
    Credit,
    #[sea_orm(string_value = "Debit")]
    Debit,
    #[sea_orm(string_value = "Balance")]
    Balance,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "entries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique, indexed)]
    pub guid: Uuid,
    #[sea_orm(indexed)]
    pub account_guid: Uuid,
    #[sea_orm(indexed, column_name = "type")]
    pub entry_type: EntryTypeDb,
    pub amount: Decimal,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub replaces: Option<Uuid>,
    #[sea_orm(indexed)]
    pub is_committed: bool,
    pub committed_by_guid: Option<Uuid>,
    pub committed_utc: Option<DateTimeWithTimeZone>,
    #[sea_orm(indexed)]
    pub created_utc: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::AccountGuid",
        to = "super::accounts::Column::Guid"
    )]
    Accounts,
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accounts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
