//! Ledger Store - Application Entry Point
//!
//! Serves the account ledger over HTTP. The ledger itself lives in the
//! `ledger_store` library; this binary only wires configuration, logging and
//! the router together.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Storage**: one JSON snapshot file, rewritten atomically on every change
//! - **Authentication**: account number + 4-digit PIN per request
//! - **Format**: JSON requests/responses
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Open the account store and check the snapshot loads
//! 3. Build HTTP router with routes and middleware
//! 4. Start server on configured port

use std::sync::Arc;

use ledger_store::{
    config::Config, router, services::account_service::AccountService, store::AccountStore,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Reads RUST_LOG environment variable (defaults to "info" level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env()?;
    tracing::info!(
        data_file = %config.data_file.display(),
        pin_policy = ?config.pin_policy,
        "Configuration loaded"
    );

    let store = Arc::new(AccountStore::from_config(&config));

    // Fail fast on an unreadable or corrupt snapshot
    let accounts = store.load().await?;
    tracing::info!(accounts = accounts.len(), "Account snapshot loaded");

    let app = router::app(AccountService::new(store, &config));

    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
