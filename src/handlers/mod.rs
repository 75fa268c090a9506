//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Receives HTTP request data (JSON body, credentials extension)
//! 2. Calls one account service operation
//! 3. Returns HTTP response (JSON, status code)

/// Account use case endpoints
pub mod accounts;
/// JSON body extraction with standard error bodies
pub mod extract;
/// Service health endpoint
pub mod health;
