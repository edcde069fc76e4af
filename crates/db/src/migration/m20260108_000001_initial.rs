//! Initial database migration.
//!
//! Creates the accounts, entries, and apikeys tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(ACCOUNTS_SQL).await?;
        db.execute_unprepared(ENTRIES_SQL).await?;
        db.execute_unprepared(APIKEYS_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared("DROP TABLE IF EXISTS entries CASCADE;")
            .await?;
        db.execute_unprepared("DROP TABLE IF EXISTS accounts CASCADE;")
            .await?;
        db.execute_unprepared("DROP TABLE IF EXISTS apikeys CASCADE;")
            .await?;
        Ok(())
    }
}

const ACCOUNTS_SQL: &str = r"
CREATE TABLE accounts (
    id BIGSERIAL PRIMARY KEY,
    guid UUID NOT NULL UNIQUE DEFAULT gen_random_uuid(),
    name VARCHAR(256) NOT NULL,
    notes TEXT,
    created_utc TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE UNIQUE INDEX idx_accounts_guid ON accounts(guid);
CREATE UNIQUE INDEX idx_accounts_name ON accounts(name);
CREATE INDEX idx_accounts_created ON accounts(created_utc);
";

const ENTRIES_SQL: &str = r"
CREATE TYPE entry_type AS ENUM ('Credit', 'Debit', 'Balance');

CREATE TABLE entries (
    id BIGSERIAL PRIMARY KEY,
    guid UUID NOT NULL UNIQUE DEFAULT gen_random_uuid(),
    account_guid UUID NOT NULL REFERENCES accounts(guid) ON DELETE CASCADE,
    type entry_type NOT NULL,
    amount DECIMAL(18,8) NOT NULL CHECK (amount >= 0),
    description TEXT,
    notes TEXT,
    replaces UUID REFERENCES entries(guid),
    is_committed BOOLEAN NOT NULL DEFAULT false,
    committed_by_guid UUID REFERENCES entries(guid),
    committed_utc TIMESTAMPTZ,
    created_utc TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_balance_committed CHECK (type != 'Balance' OR is_committed),
    CONSTRAINT chk_balance_no_committer CHECK (type != 'Balance' OR committed_by_guid IS NULL)
);

CREATE UNIQUE INDEX idx_entries_guid ON entries(guid);
CREATE INDEX idx_entries_account ON entries(account_guid);
CREATE INDEX idx_entries_type ON entries(type);
CREATE INDEX idx_entries_committed ON entries(is_committed);
CREATE INDEX idx_entries_created ON entries(created_utc);
CREATE INDEX idx_entries_account_type ON entries(account_guid, type);
CREATE INDEX idx_entries_account_committed ON entries(account_guid, is_committed);
";

const APIKEYS_SQL: &str = r"
CREATE TABLE apikeys (
    id BIGSERIAL PRIMARY KEY,
    guid UUID NOT NULL UNIQUE DEFAULT gen_random_uuid(),
    name VARCHAR(256) NOT NULL,
    apikey VARCHAR(256) NOT NULL,
    key_prefix VARCHAR(16) NOT NULL,
    active BOOLEAN NOT NULL DEFAULT true,
    is_admin BOOLEAN NOT NULL DEFAULT false,
    created_utc TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE UNIQUE INDEX idx_apikeys_guid ON apikeys(guid);
CREATE INDEX idx_apikeys_prefix ON apikeys(key_prefix);
";
