//! Application-wide error types.
//!
//! This is the umbrella error type the HTTP layer converts to a response.
//! It mirrors the taxonomy in the ledger core's own `LedgerError`, plus the
//! cases (auth, config, request parsing) that originate outside the ledger
//! engine.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed request: bad guid, unparseable date, invalid pagination.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Authentication failed or credential missing/invalid.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Conflict with current state.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Caller-side cancellation/deadline exceeded.
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Persistence failure or invariant violation detected at runtime.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::InvalidArgument(_) => 400,
            Self::Unauthorized(_) => 401,
            Self::NotFound(_) => 404,
            Self::Conflict(_) => 409,
            Self::Timeout(_) => 408,
            Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "INVALID_ARGUMENT",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::Timeout(_) => "TIMEOUT",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}
