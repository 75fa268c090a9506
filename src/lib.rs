//! Flat-file account ledger.
//!
//! Accounts are kept in a single JSON snapshot owned by [`store::AccountStore`].
//! [`services::account_service::AccountService`] implements the account use cases
//! (create, deposit, withdraw, view, update, delete) on top of it and is the
//! only entry point for front ends. [`router::app`] exposes the service over HTTP.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod router;
pub mod services;
pub mod store;
