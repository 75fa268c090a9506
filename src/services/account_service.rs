//! Account service - business rules for the six account use cases.
//!
//! This service handles:
//! - Input validation (field formats, amounts)
//! - Credential checks (account number + PIN)
//! - Deposit cap and balance checks
//! - Account number allocation
//!
//! # Atomicity Guarantees
//!
//! Every mutating use case runs inside one `StoreTransaction`: load, validate,
//! mutate and save all happen under the store's write lock, so concurrent
//! calls never lose updates. A failed check drops the transaction and nothing
//! is written.

use std::sync::Arc;

use crate::{
    config::Config,
    error::AppError,
    models::account::{Account, CreateAccountRequest, UpdateDetailsRequest},
    services::{
        account_number,
        validation::{StagedUpdate, validate_new_account},
    },
    store::AccountStore,
};

/// Entry point for every front end. Cheap to clone.
#[derive(Debug, Clone)]
pub struct AccountService {
    store: Arc<AccountStore>,
    deposit_limit: u64,
    account_number_attempts: u32,
}

impl AccountService {
    pub fn new(store: Arc<AccountStore>, config: &Config) -> Self {
        Self {
            store,
            deposit_limit: config.deposit_limit,
            account_number_attempts: config.account_number_attempts,
        }
    }

    pub fn store(&self) -> &AccountStore {
        &self.store
    }

    /// Open a new zero-balance account.
    ///
    /// # Returns
    ///
    /// The generated account number.
    ///
    /// # Errors
    ///
    /// - `Validation`: a field is missing, or the phone/PIN has the wrong format
    /// - `AccountNumbersExhausted`: no unique number could be drawn
    /// - `Storage`: snapshot could not be read or written
    pub async fn create_account(&self, request: &CreateAccountRequest) -> Result<String, AppError> {
        let new = validate_new_account(request)?;

        let mut tx = self.store.begin().await?;

        let number = {
            let mut rng = rand::rng();
            account_number::generate_unique(&mut rng, self.account_number_attempts, |n| {
                tx.contains(n)
            })?
        };

        tx.insert(Account {
            name: new.name,
            email: new.email,
            phone: new.phone,
            pin: self.store.pin_policy().seal(&number, &new.pin),
            account_number: number.clone(),
            balance: 0,
        })?;
        tx.commit().await?;

        tracing::info!(account_number = %number, "account created");
        Ok(number)
    }

    /// Add `amount` to the balance.
    ///
    /// # Errors
    ///
    /// - `InvalidCredentials`: account number and PIN do not match
    /// - `Validation`: amount is zero
    /// - `LimitExceeded`: amount is above the single-transaction cap
    pub async fn deposit(&self, account_number: &str, pin: &str, amount: u64) -> Result<u64, AppError> {
        let mut tx = self.store.begin().await?;
        let account = tx
            .find_by_credentials_mut(account_number, pin)
            .ok_or_else(|| auth_failed(account_number))?;

        if amount == 0 {
            return Err(AppError::Validation("Amount must be positive".to_string()));
        }
        if amount > self.deposit_limit {
            return Err(AppError::LimitExceeded {
                limit: self.deposit_limit,
            });
        }

        account.balance = account
            .balance
            .checked_add(amount)
            .ok_or_else(|| AppError::Validation("Balance would overflow".to_string()))?;
        let balance = account.balance;
        tx.commit().await?;

        tracing::info!(account_number, amount, balance, "deposit");
        Ok(balance)
    }

    /// Remove `amount` from the balance. Withdrawals are rejected, never clamped.
    ///
    /// # Errors
    ///
    /// - `InvalidCredentials`: account number and PIN do not match
    /// - `Validation`: amount is zero
    /// - `InsufficientFunds`: amount is above the current balance
    pub async fn withdraw(&self, account_number: &str, pin: &str, amount: u64) -> Result<u64, AppError> {
        let mut tx = self.store.begin().await?;
        let account = tx
            .find_by_credentials_mut(account_number, pin)
            .ok_or_else(|| auth_failed(account_number))?;

        if amount == 0 {
            return Err(AppError::Validation("Amount must be positive".to_string()));
        }
        account.balance = account
            .balance
            .checked_sub(amount)
            .ok_or(AppError::InsufficientFunds {
                available: account.balance,
            })?;
        let balance = account.balance;
        tx.commit().await?;

        tracing::info!(account_number, amount, balance, "withdrawal");
        Ok(balance)
    }

    /// Look up an account. Never mutates the snapshot.
    pub async fn get_details(&self, account_number: &str, pin: &str) -> Result<Account, AppError> {
        let accounts = self.store.load().await?;

        self.store
            .find_by_credentials(&accounts, account_number, pin)
            .cloned()
            .ok_or_else(|| auth_failed(account_number))
    }

    /// Replace any supplied non-blank fields.
    ///
    /// All supplied fields are validated before any is applied, so a bad PIN
    /// does not leave a changed name behind.
    pub async fn update_details(
        &self,
        account_number: &str,
        pin: &str,
        request: &UpdateDetailsRequest,
    ) -> Result<(), AppError> {
        let staged = StagedUpdate::stage(request)?;

        let mut tx = self.store.begin().await?;
        let account = tx
            .find_by_credentials_mut(account_number, pin)
            .ok_or_else(|| auth_failed(account_number))?;

        if staged.is_empty() {
            return Ok(());
        }
        staged.apply(account, self.store.pin_policy());
        tx.commit().await?;

        tracing::info!(account_number, "account details updated");
        Ok(())
    }

    /// Permanently remove an account.
    pub async fn delete_account(&self, account_number: &str, pin: &str) -> Result<(), AppError> {
        let mut tx = self.store.begin().await?;
        let removed = tx
            .remove_by_credentials(account_number, pin)
            .ok_or_else(|| auth_failed(account_number))?;
        tx.commit().await?;

        tracing::info!(account_number, balance = removed.balance, "account deleted");
        Ok(())
    }
}

fn auth_failed(account_number: &str) -> AppError {
    tracing::debug!(account_number, "credential check failed");
    AppError::InvalidCredentials
}
