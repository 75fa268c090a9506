//! Request body extraction.

use axum::extract::FromRequest;

use crate::error::AppError;

/// `Json` body extractor whose rejections use the standard error body.
///
/// A malformed body (bad JSON, negative or non-numeric amount, wrong
/// content type) becomes `AppError::Validation` instead of axum's plain-text
/// rejection.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);
