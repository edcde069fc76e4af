//! Wire DTOs. Property names are `PascalCase`, independent of the core's
//! internal (snake_case) `Serialize`/`Deserialize` derives.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use netledger_core::ledger::types::{
    Account, AccountQuery, ApiKey, BalanceView, Entry, EntryFilter, EntryQuery, EntryType,
};
use netledger_shared::types::{AccountId, EntryId, EnumerationResult, Ordering};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccountDto {
    pub guid: Uuid,
    pub name: String,
    pub notes: Option<String>,
    pub created_utc: DateTime<Utc>,
}

impl From<Account> for AccountDto {
    fn from(a: Account) -> Self {
        Self {
            guid: a.guid.into_inner(),
            name: a.name,
            notes: a.notes,
            created_utc: a.created_utc,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateAccountRequest {
    pub name: String,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateAccountNotesRequest {
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EnumerateAccountsRequest {
    #[serde(default)]
    pub search_term: Option<String>,
    #[serde(default)]
    pub balance_min: Option<Decimal>,
    #[serde(default)]
    pub balance_max: Option<Decimal>,
    #[serde(default)]
    pub max_results: Option<u32>,
    #[serde(default)]
    pub skip: Option<u64>,
    #[serde(default)]
    pub continuation_token: Option<Uuid>,
}

impl From<EnumerateAccountsRequest> for AccountQuery {
    fn from(req: EnumerateAccountsRequest) -> Self {
        let default = Self::default();
        Self {
            search_term: req.search_term,
            balance_min: req.balance_min,
            balance_max: req.balance_max,
            max_results: req.max_results.unwrap_or(default.max_results),
            skip: req.skip.unwrap_or(default.skip),
            continuation_token: req.continuation_token.map(AccountId::from_uuid),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum EntryTypeDto {
    Credit,
    Debit,
    Balance,
}

impl From<EntryType> for EntryTypeDto {
    fn from(t: EntryType) -> Self {
        match t {
            EntryType::Credit => Self::Credit,
            EntryType::Debit => Self::Debit,
            EntryType::Balance => Self::Balance,
        }
    }
}

impl From<EntryTypeDto> for EntryType {
    fn from(t: EntryTypeDto) -> Self {
        match t {
            EntryTypeDto::Credit => Self::Credit,
            EntryTypeDto::Debit => Self::Debit,
            EntryTypeDto::Balance => Self::Balance,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct EntryDto {
    pub guid: Uuid,
    pub account_guid: Uuid,
    #[serde(rename = "Type")]
    pub entry_type: EntryTypeDto,
    pub amount: Decimal,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub replaces: Option<Uuid>,
    pub is_committed: bool,
    pub committed_by_guid: Option<Uuid>,
    pub committed_utc: Option<DateTime<Utc>>,
    pub created_utc: DateTime<Utc>,
}

impl From<Entry> for EntryDto {
    fn from(e: Entry) -> Self {
        Self {
            guid: e.guid.into_inner(),
            account_guid: e.account_guid.into_inner(),
            entry_type: e.entry_type.into(),
            amount: e.amount,
            description: e.description,
            notes: e.notes,
            replaces: e.replaces.map(EntryId::into_inner),
            is_committed: e.is_committed,
            committed_by_guid: e.committed_by_guid.map(EntryId::into_inner),
            committed_utc: e.committed_utc,
            created_utc: e.created_utc,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AddEntryRequest {
    pub amount: Decimal,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub already_committed: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AddEntriesRequest {
    pub entries: Vec<AddEntryRequest>,
    #[serde(default)]
    pub already_committed: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CommitRequest {
    #[serde(default)]
    pub entry_guids: Option<Vec<Uuid>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct BalanceViewDto {
    pub account_guid: Uuid,
    pub committed_balance: Decimal,
    pub pending_balance: Decimal,
    pub pending_credit_count: u64,
    pub pending_debit_count: u64,
    pub entry_guid: Option<Uuid>,
    pub committed_entry_guids: Vec<Uuid>,
}

impl From<BalanceView> for BalanceViewDto {
    fn from(v: BalanceView) -> Self {
        Self {
            account_guid: v.account_guid.into_inner(),
            committed_balance: v.committed_balance,
            pending_balance: v.pending_balance,
            pending_credit_count: v.pending_credit_count,
            pending_debit_count: v.pending_debit_count,
            entry_guid: v.entry_guid.map(EntryId::into_inner),
            committed_entry_guids: v
                .committed_entry_guids
                .into_iter()
                .map(EntryId::into_inner)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BalanceAsOfQuery {
    #[serde(rename = "T")]
    pub t: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct BalanceAsOfResponse {
    pub balance: Decimal,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct VerifyResponse {
    pub valid: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum OrderingDto {
    CreatedAscending,
    CreatedDescending,
    AmountAscending,
    AmountDescending,
}

impl From<OrderingDto> for Ordering {
    fn from(o: OrderingDto) -> Self {
        match o {
            OrderingDto::CreatedAscending => Self::CreatedAscending,
            OrderingDto::CreatedDescending => Self::CreatedDescending,
            OrderingDto::AmountAscending => Self::AmountAscending,
            OrderingDto::AmountDescending => Self::AmountDescending,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EnumerateEntriesRequest {
    #[serde(default)]
    pub created_after_utc: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_before_utc: Option<DateTime<Utc>>,
    #[serde(default)]
    pub amount_min: Option<Decimal>,
    #[serde(default)]
    pub amount_max: Option<Decimal>,
    #[serde(default)]
    #[serde(rename = "Type")]
    pub entry_type: Option<EntryTypeDto>,
    #[serde(default)]
    pub is_committed: Option<bool>,
    #[serde(default)]
    pub max_results: Option<u32>,
    #[serde(default)]
    pub skip: Option<u64>,
    #[serde(default)]
    pub continuation_token: Option<Uuid>,
    #[serde(default)]
    pub ordering: Option<OrderingDto>,
}

impl From<EnumerateEntriesRequest> for EntryQuery {
    fn from(req: EnumerateEntriesRequest) -> Self {
        let default = Self::default();
        Self {
            filter: EntryFilter {
                created_after_utc: req.created_after_utc,
                created_before_utc: req.created_before_utc,
                amount_min: req.amount_min,
                amount_max: req.amount_max,
                entry_type: req.entry_type.map(Into::into),
                is_committed: req.is_committed,
            },
            max_results: req.max_results.unwrap_or(default.max_results),
            skip: req.skip.unwrap_or(default.skip),
            continuation_token: req.continuation_token.map(EntryId::from_uuid),
            ordering: req.ordering.map_or(default.ordering, Into::into),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct EnumerationResultDto<T> {
    pub total_records: u64,
    pub objects: Vec<T>,
    pub records_remaining: u64,
    pub end_of_results: bool,
    pub continuation_token: Option<String>,
}

impl<T, U: From<T>> From<EnumerationResult<T>> for EnumerationResultDto<U> {
    fn from(r: EnumerationResult<T>) -> Self {
        Self {
            total_records: r.total_records,
            objects: r.objects.into_iter().map(U::from).collect(),
            records_remaining: r.records_remaining,
            end_of_results: r.end_of_results,
            continuation_token: r.continuation_token,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApiKeyDto {
    pub guid: Uuid,
    pub name: String,
    pub key_prefix: String,
    pub active: bool,
    pub is_admin: bool,
    pub created_utc: DateTime<Utc>,
}

impl From<ApiKey> for ApiKeyDto {
    fn from(k: ApiKey) -> Self {
        Self {
            guid: k.guid.into_inner(),
            name: k.name,
            key_prefix: k.key_prefix,
            active: k.active,
            is_admin: k.is_admin,
            created_utc: k.created_utc,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateApiKeyRequest {
    pub name: String,
    #[serde(default)]
    pub is_admin: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateApiKeyResponse {
    pub key: ApiKeyDto,
    pub plaintext: String,
}
