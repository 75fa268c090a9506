//! Error types and HTTP error response handling.
//!
//! This module defines the errors produced by the account store and the
//! account service, and how they are converted into HTTP responses with
//! appropriate status codes and JSON bodies.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Failure to read or write the account snapshot.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The snapshot file (or its temp sibling) could not be read, written or renamed.
    #[error("Snapshot I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The snapshot exists but is not a valid list of accounts.
    #[error("Snapshot is malformed: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Two records share an account number.
    #[error("Duplicate account number {0}")]
    DuplicateAccountNumber(String),

    /// The snapshot parsed but a record has an empty or badly formatted field.
    #[error("Snapshot is corrupt: {0}")]
    Corrupt(String),
}

impl StorageError {
    /// Only raw I/O failures are worth retrying; a malformed file stays malformed.
    pub fn is_transient(&self) -> bool {
        matches!(self, StorageError::Io(_))
    }
}

/// Application-wide error type.
///
/// Every use case of the account service returns `Result<T, AppError>`.
///
/// # Error Categories
///
/// - **Validation Errors**: malformed input, the caller must re-prompt
/// - **Authentication Errors**: account number and PIN do not match a record
/// - **Business Rule Errors**: deposit cap, insufficient funds
/// - **Storage Errors**: the snapshot could not be read or written
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Request data is invalid.
    ///
    /// Returns HTTP 400 Bad Request.
    /// The String describes the first field that failed.
    #[error("{0}")]
    Validation(String),

    /// Account number and PIN do not match any account.
    ///
    /// The same error is returned whether the account is missing or the PIN
    /// is wrong. Returns HTTP 401 Unauthorized.
    #[error("Invalid account number or PIN")]
    InvalidCredentials,

    /// A single deposit exceeded the per-transaction cap.
    ///
    /// Returns HTTP 422 Unprocessable Entity.
    #[error("Maximum deposit is {limit} per transaction")]
    LimitExceeded { limit: u64 },

    /// A withdrawal asked for more than the current balance.
    ///
    /// Returns HTTP 422 Unprocessable Entity.
    #[error("Insufficient balance, available: {available}")]
    InsufficientFunds { available: u64 },

    /// Every generated account number collided with an existing one.
    ///
    /// Returns HTTP 503 Service Unavailable.
    #[error("Could not allocate a unique account number after {attempts} attempts")]
    AccountNumbersExhausted { attempts: u32 },

    /// Snapshot could not be loaded or saved.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// A request body that could not be decoded is a validation failure.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

/// Convert AppError into an HTTP response.
///
/// # Response Format
///
/// ```json
/// {
///   "error": {
///     "code": "error_type",
///     "message": "Human-readable error message"
///   }
/// }
/// ```
///
/// Storage failures return 500 and hide their details from the client.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::Validation(ref msg) => {
                (StatusCode::BAD_REQUEST, "validation_error", msg.clone())
            }
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "invalid_credentials",
                self.to_string(),
            ),
            AppError::LimitExceeded { .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "limit_exceeded",
                self.to_string(),
            ),
            AppError::InsufficientFunds { .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "insufficient_funds",
                self.to_string(),
            ),
            AppError::AccountNumbersExhausted { .. } => (
                StatusCode::SERVICE_UNAVAILABLE,
                "account_numbers_exhausted",
                self.to_string(),
            ),
            AppError::Storage(ref err) => {
                tracing::error!(error = %err, "storage failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
