//! Error handling module
//!
//! Centralized error types and HTTP response conversion.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::domain::DomainError;
use crate::ledger::LedgerError;
use crate::validation::Violation;

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Client errors (4xx)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    // Rejected transfers
    #[error(transparent)]
    Domain(#[from] DomainError),

    // Storage failures
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<Violation>,
    /// Set on storage failures: nothing was written, the request may be repeated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retryable: Option<bool>,
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            // 400 Bad Request
            AppError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
            AppError::Domain(DomainError::InvalidTransfer { .. }) => {
                (StatusCode::BAD_REQUEST, "invalid_transfer")
            }

            // 404 Not Found
            AppError::Domain(DomainError::AccountNotFound(_)) => {
                (StatusCode::NOT_FOUND, "account_not_found")
            }

            // Storage
            AppError::Ledger(e) => match e {
                LedgerError::ConcurrencyConflict { .. } | LedgerError::MaxRetriesExceeded => {
                    (StatusCode::CONFLICT, "concurrency_conflict")
                }
                LedgerError::AccountNotFound(_) => (StatusCode::NOT_FOUND, "account_not_found"),
                LedgerError::Database(_) | LedgerError::Storage(_) => {
                    (StatusCode::SERVICE_UNAVAILABLE, "storage_failure")
                }
                LedgerError::Balance(_) | LedgerError::InvalidRecord(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "ledger_error")
                }
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_code) = self.status_and_code();

        if status.is_server_error() {
            tracing::error!(error = ?self, error_code, "Request failed");
        }

        let (details, violations, retryable) = match &self {
            AppError::InvalidRequest(msg) => (Some(msg.clone()), Vec::new(), None),
            AppError::Domain(DomainError::InvalidTransfer { violations }) => {
                (None, violations.clone(), None)
            }
            AppError::Domain(DomainError::AccountNotFound(id)) => {
                (Some(id.to_string()), Vec::new(), None)
            }
            AppError::Ledger(e) => (None, Vec::new(), Some(e.is_retryable())),
        };

        // Server-side detail stays in the log
        let error = if status.is_server_error() {
            status
                .canonical_reason()
                .unwrap_or("Internal Server Error")
                .to_string()
        } else {
            self.to_string()
        };

        let body = ErrorResponse {
            error,
            error_code: error_code.to_string(),
            details,
            violations,
            retryable,
        };

        (status, Json(body)).into_response()
    }
}
