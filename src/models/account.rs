//! Account data models and API request/response types.
//!
//! This module defines:
//! - `Account`: a persisted account record in the snapshot
//! - `PinPolicy`: how PINs are stored and compared
//! - Request bodies for the account use cases
//! - `AccountResponse`: the account view returned to clients

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::digits;

/// An account record as it is persisted in the snapshot.
///
/// # Snapshot Layout
///
/// Field names match the historical `database.json` layout, including the
/// `"phone number"` key. Field order is fixed, so saving a freshly loaded
/// snapshot reproduces the same bytes.
///
/// # Balance Storage
///
/// Balances are whole minor currency units and can never go negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Trimmed, non-empty holder name
    pub name: String,

    /// Trimmed, non-empty email, kept as an opaque string
    pub email: String,

    /// Exactly 10 ASCII digits
    #[serde(rename = "phone number", deserialize_with = "digits::phone")]
    pub phone: String,

    /// The PIN as sealed by the store's `PinPolicy`
    #[serde(deserialize_with = "digits::pin")]
    pub pin: String,

    /// 9-character identifier, 5 uppercase letters and 4 digits in random order.
    ///
    /// Unique across the snapshot and never changed after creation.
    pub account_number: String,

    pub balance: u64,
}

/// How PINs are stored in the snapshot and compared on lookup.
///
/// `Plaintext` keeps the historical format. `Sha256` stores
/// `hex(sha256("<account_number>:<pin>"))` instead. Switching policy changes
/// the persisted format, and accounts written under one policy will not
/// authenticate under the other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PinPolicy {
    #[default]
    Plaintext,
    Sha256,
}

impl PinPolicy {
    /// Produce the stored form of `pin` for `account_number`.
    pub fn seal(self, account_number: &str, pin: &str) -> String {
        match self {
            PinPolicy::Plaintext => pin.to_string(),
            PinPolicy::Sha256 => {
                let mut hasher = Sha256::new();
                hasher.update(account_number.as_bytes());
                hasher.update(b":");
                hasher.update(pin.as_bytes());
                hex::encode(hasher.finalize())
            }
        }
    }

    /// Check a candidate PIN against an account's stored PIN.
    pub fn verify(self, account: &Account, pin: &str) -> bool {
        account.pin == self.seal(&account.account_number, pin)
    }
}

/// Request body for creating a new account.
///
/// # JSON Example
///
/// ```json
/// {
///   "name": "Ann",
///   "email": "a@x.com",
///   "phone": "9876543210",
///   "pin": "1234"
/// }
/// ```
///
/// Missing fields deserialize as empty strings so that the service reports
/// them as validation errors rather than the extractor rejecting the body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateAccountRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub pin: String,
}

/// Request body for deposits and withdrawals.
#[derive(Debug, Clone, Deserialize)]
pub struct AmountRequest {
    pub amount: u64,
}

/// Request body for updating account details.
///
/// Every field is optional; blank or absent fields are left unchanged.
///
/// ```json
/// {
///   "email": "new@x.com",
///   "pin": "4321"
/// }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateDetailsRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub pin: Option<String>,
}

/// Response for account creation.
#[derive(Debug, Serialize)]
pub struct AccountNumberResponse {
    pub account_number: String,
}

/// Response for deposits and withdrawals.
#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    pub balance: u64,
}

/// Account view returned to clients.
///
/// ```json
/// {
///   "account_number": "A1BC2D3E4",
///   "name": "Ann",
///   "email": "a@x.com",
///   "phone": "9876543210",
///   "balance": 2000
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub account_number: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub balance: u64,
}

/// Convert a stored Account to the client view, dropping the PIN.
impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            account_number: account.account_number,
            name: account.name,
            email: account.email,
            phone: account.phone,
            balance: account.balance,
        }
    }
}
