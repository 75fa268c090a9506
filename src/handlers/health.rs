//! Health check endpoint for service monitoring.

use crate::{error::AppError, services::account_service::AccountService};
use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall service status
    pub status: String,

    /// Snapshot status
    pub storage: String,

    /// Number of accounts in the snapshot
    pub accounts: usize,

    /// Current server timestamp
    pub timestamp: DateTime<Utc>,
}

/// Health check handler.
///
/// # Response (200 OK)
///
/// ```json
/// {
///   "status": "healthy",
///   "storage": "readable",
///   "accounts": 3,
///   "timestamp": "2025-12-21T19:00:00Z"
/// }
/// ```
///
/// If the snapshot cannot be loaded, returns the standard error response.
pub async fn health_check(
    State(service): State<AccountService>,
) -> Result<Json<HealthResponse>, AppError> {
    let accounts = service.store().load().await?;

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        storage: "readable".to_string(),
        accounts: accounts.len(),
        timestamp: Utc::now(),
    }))
}
