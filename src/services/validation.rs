//! Field validation for account creation and updates.
//!
//! Validation is pure: nothing here touches the store, so it can run before
//! the store lock is taken.

use crate::{
    error::AppError,
    models::{
        account::{Account, CreateAccountRequest, PinPolicy, UpdateDetailsRequest},
        digits::{self, PHONE_LEN, PIN_LEN},
    },
};

/// Creation input that passed validation. The PIN is still in clear here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub pin: String,
}

/// Validate creation input. The first failing rule wins:
/// all fields present, then the phone, then the PIN.
pub fn validate_new_account(request: &CreateAccountRequest) -> Result<NewAccount, AppError> {
    let name = request.name.trim();
    let email = request.email.trim();
    let phone = request.phone.trim();
    let pin = request.pin.trim();

    if [name, email, phone, pin].iter().any(|f| f.is_empty()) {
        return Err(AppError::Validation("All fields are required".to_string()));
    }

    Ok(NewAccount {
        name: name.to_string(),
        email: email.to_string(),
        phone: validate_phone(phone)?,
        pin: validate_pin(pin)?,
    })
}

pub fn validate_phone(phone: &str) -> Result<String, AppError> {
    if digits::is_digits(phone, PHONE_LEN) {
        Ok(phone.to_string())
    } else {
        Err(AppError::Validation(
            "Phone number must be exactly 10 digits".to_string(),
        ))
    }
}

pub fn validate_pin(pin: &str) -> Result<String, AppError> {
    if digits::is_digits(pin, PIN_LEN) {
        Ok(pin.to_string())
    } else {
        Err(AppError::Validation("PIN must be exactly 4 digits".to_string()))
    }
}

/// A detail update where every supplied field has already been validated.
///
/// Built with [`StagedUpdate::stage`], applied with [`StagedUpdate::apply`].
/// Either every supplied field is applied or, if any fails validation, none.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StagedUpdate {
    name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    pin: Option<String>,
}

impl StagedUpdate {
    /// Validate every non-blank field of `request`.
    pub fn stage(request: &UpdateDetailsRequest) -> Result<Self, AppError> {
        Ok(Self {
            name: supplied(&request.name).map(str::to_string),
            email: supplied(&request.email).map(str::to_string),
            phone: supplied(&request.phone).map(validate_phone).transpose()?,
            pin: supplied(&request.pin).map(validate_pin).transpose()?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.phone.is_none() && self.pin.is_none()
    }

    /// Write the staged fields into `account`, sealing a new PIN under `policy`.
    pub fn apply(self, account: &mut Account, policy: PinPolicy) {
        if let Some(name) = self.name {
            account.name = name;
        }
        if let Some(email) = self.email {
            account.email = email;
        }
        if let Some(phone) = self.phone {
            account.phone = phone;
        }
        if let Some(pin) = self.pin {
            account.pin = policy.seal(&account.account_number, &pin);
        }
    }
}

/// Blank means "leave unchanged".
fn supplied(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|f| !f.is_empty())
}
