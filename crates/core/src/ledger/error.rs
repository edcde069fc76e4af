//! Ledger error taxonomy.
//!
//! Every core operation returns one of these kinds; the HTTP boundary maps
//! each to a status code via [`LedgerError::http_status_code`].

use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Non-positive amount, malformed guid, unparseable date, bad pagination.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Account with this guid or name was not found.
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    /// Entry with this guid was not found on the account.
    #[error("Entry not found: {0}")]
    EntryNotFound(Uuid),

    /// Api key was not found.
    #[error("Api key not found: {0}")]
    ApiKeyNotFound(Uuid),

    /// An account with this name already exists.
    #[error("Account already exists: {0}")]
    AccountNameConflict(String),

    /// The named entries are not all pending Credit/Debit entries.
    #[error("Entry is not eligible for this operation: {0}")]
    EntryNotEligible(Uuid),

    /// `VerifyBalanceChain` found a broken link or a mismatched amount.
    #[error("Balance chain verification failed for account {0}")]
    VerificationFailed(Uuid),

    /// Caller-side cancellation or deadline exceeded.
    #[error("Operation timed out")]
    Timeout,

    /// Persistence failure or invariant violation detected at runtime.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "INVALID_ARGUMENT",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::EntryNotFound(_) => "ENTRY_NOT_FOUND",
            Self::ApiKeyNotFound(_) => "API_KEY_NOT_FOUND",
            Self::AccountNameConflict(_) => "ACCOUNT_NAME_CONFLICT",
            Self::EntryNotEligible(_) => "ENTRY_NOT_ELIGIBLE",
            Self::VerificationFailed(_) => "VERIFICATION_FAILED",
            Self::Timeout => "TIMEOUT",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::InvalidArgument(_) => 400,
            Self::AccountNotFound(_) | Self::EntryNotFound(_) | Self::ApiKeyNotFound(_) => 404,
            Self::AccountNameConflict(_) | Self::EntryNotEligible(_) | Self::VerificationFailed(_) => 409,
            Self::Timeout => 408,
            Self::Internal(_) => 500,
        }
    }

    /// Returns true if retrying the same operation might succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout)
    }
}

impl From<LedgerError> for netledger_shared::AppError {
    fn from(err: LedgerError) -> Self {
        let message = err.to_string();
        match err {
            LedgerError::InvalidArgument(_) => Self::InvalidArgument(message),
            LedgerError::AccountNotFound(_)
            | LedgerError::EntryNotFound(_)
            | LedgerError::ApiKeyNotFound(_) => Self::NotFound(message),
            LedgerError::AccountNameConflict(_)
            | LedgerError::EntryNotEligible(_)
            | LedgerError::VerificationFailed(_) => Self::Conflict(message),
            LedgerError::Timeout => Self::Timeout(message),
            LedgerError::Internal(_) => Self::Internal(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(LedgerError::InvalidArgument("x".into()).error_code(), "INVALID_ARGUMENT");
        assert_eq!(LedgerError::AccountNotFound(Uuid::nil().to_string()).error_code(), "ACCOUNT_NOT_FOUND");
        assert_eq!(LedgerError::VerificationFailed(Uuid::nil()).error_code(), "VERIFICATION_FAILED");
    }

    #[rstest]
    #[case::invalid_argument(LedgerError::InvalidArgument("x".into()), 400)]
    #[case::account_not_found(LedgerError::AccountNotFound(Uuid::nil().to_string()), 404)]
    #[case::entry_not_found(LedgerError::EntryNotFound(Uuid::nil()), 404)]
    #[case::api_key_not_found(LedgerError::ApiKeyNotFound(Uuid::nil()), 404)]
    #[case::account_name_conflict(LedgerError::AccountNameConflict("a".into()), 409)]
    #[case::entry_not_eligible(LedgerError::EntryNotEligible(Uuid::nil()), 409)]
    #[case::verification_failed(LedgerError::VerificationFailed(Uuid::nil()), 409)]
    #[case::timeout(LedgerError::Timeout, 408)]
    #[case::internal(LedgerError::Internal("x".into()), 500)]
    fn test_http_status_codes(#[case] error: LedgerError, #[case] expected: u16) {
        assert_eq!(error.http_status_code(), expected);
    }

    #[test]
    fn test_retryable() {
        assert!(LedgerError::Timeout.is_retryable());
        assert!(!LedgerError::InvalidArgument("x".into()).is_retryable());
    }
}
