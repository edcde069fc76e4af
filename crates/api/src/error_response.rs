//! Uniform error-to-JSON conversion at the HTTP boundary.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use netledger_core::ledger::LedgerError;
use netledger_shared::AppError;
use serde::Serialize;

#[derive(Serialize)]
struct ErrorBody {
    #[serde(rename = "Error")]
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    #[serde(rename = "Code")]
    code: &'static str,
    #[serde(rename = "Message")]
    message: String,
}

fn respond(status: u16, code: &'static str, message: String) -> Response {
    let status_code = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status_code.is_server_error() {
        tracing::error!(code, message = %message, "request failed");
    } else {
        tracing::warn!(code, message = %message, "request rejected");
    }
    (status_code, Json(ErrorBody {
        error: ErrorDetail { code, message },
    }))
        .into_response()
}

/// Wraps a [`LedgerError`] so it can be returned directly from a handler.
pub struct ApiError(pub AppError);

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        Self(AppError::from(err))
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        respond(self.0.status_code(), self.0.error_code(), self.0.to_string())
    }
}
