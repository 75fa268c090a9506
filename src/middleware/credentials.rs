//! Account credential extraction middleware.
//!
//! This middleware intercepts every account-scoped request to:
//! 1. Read the account number and PIN headers
//! 2. Inject them into the request as a `Credentials` extension
//! 3. Reject requests missing either header with HTTP 401
//!
//! It does not check the pair against the store. Each service call verifies
//! the credentials inside its own store transaction.

use crate::error::AppError;
use axum::{extract::Request, http::HeaderMap, middleware::Next, response::Response};

pub const ACCOUNT_NUMBER_HEADER: &str = "X-Account-Number";
pub const PIN_HEADER: &str = "X-Account-Pin";

/// Account credentials attached to account-scoped requests.
#[derive(Clone)]
pub struct Credentials {
    pub account_number: String,
    pub pin: String,
}

/// Keeps the PIN out of logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("account_number", &self.account_number)
            .field("pin", &"****")
            .finish()
    }
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Result<&'a str, AppError> {
    headers
        .get(name)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(AppError::InvalidCredentials)
}

/// Credential extraction middleware function.
///
/// # Headers
///
/// ```text
/// X-Account-Number: AB12CD3E4
/// X-Account-Pin: 1234
/// ```
///
/// # Returns
///
/// - `Ok(Response)` from the next handler when both headers are present
/// - `Err(AppError::InvalidCredentials)` otherwise (returns 401)
pub async fn credentials_middleware(mut request: Request, next: Next) -> Result<Response, AppError> {
    let credentials = Credentials {
        account_number: header(request.headers(), ACCOUNT_NUMBER_HEADER)?.to_string(),
        pin: header(request.headers(), PIN_HEADER)?.to_string(),
    };

    // Route handlers extract this with Extension<Credentials>
    request.extensions_mut().insert(credentials);

    Ok(next.run(request).await)
}
