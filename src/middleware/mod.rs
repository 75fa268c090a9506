//! HTTP middleware components.
//!
//! Middleware are functions that run before route handlers.
//! They can:
//! - Extract request context (account credentials)
//! - Short-circuit requests (reject missing credentials)

/// Account credential extraction middleware
pub mod credentials;
