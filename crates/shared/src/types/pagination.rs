//! Pagination types for enumeration endpoints.
//!
//! Unlike a page-number scheme, NetLedger enumeration is skip/limit with an
//! optional continuation token, matching the engine's `Enumerate` contract.

use serde::{Deserialize, Serialize};

/// Minimum allowed `max_results` for an enumeration request.
pub const MIN_MAX_RESULTS: u32 = 1;
/// Maximum allowed `max_results` for an enumeration request.
pub const MAX_MAX_RESULTS: u32 = 1000;
/// Default `max_results` when the caller does not specify one.
pub const DEFAULT_MAX_RESULTS: u32 = 100;

/// Sort ordering for enumeration queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum Ordering {
    /// Oldest-created first.
    CreatedAscending,
    /// Newest-created first (the default).
    CreatedDescending,
    /// Smallest amount first.
    AmountAscending,
    /// Largest amount first.
    AmountDescending,
}

impl Default for Ordering {
    fn default() -> Self {
        Self::CreatedDescending
    }
}

/// A page of enumerated results plus the contract's pagination metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnumerationResult<T> {
    /// Total records matching the filter, ignoring pagination.
    pub total_records: u64,
    /// The ordered page of objects, size <= `max_results`.
    pub objects: Vec<T>,
    /// Records remaining after this page.
    pub records_remaining: u64,
    /// True when `records_remaining == 0`.
    pub end_of_results: bool,
    /// Guid of the last object in this page, present unless `end_of_results`.
    pub continuation_token: Option<String>,
}

impl<T> EnumerationResult<T> {
    /// Builds a result, deriving `records_remaining`/`end_of_results` from
    /// `total_records`, `skip`, and the page returned.
    #[must_use]
    pub fn new(
        total_records: u64,
        objects: Vec<T>,
        skip: u64,
        continuation_token: Option<String>,
    ) -> Self {
        let consumed = skip.saturating_add(objects.len() as u64);
        let records_remaining = total_records.saturating_sub(consumed);
        let end_of_results = records_remaining == 0;

        Self {
            total_records,
            objects,
            records_remaining,
            end_of_results,
            continuation_token: if end_of_results {
                None
            } else {
                continuation_token
            },
        }
    }
}
