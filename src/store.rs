//! Flat-file account store.
//!
//! The whole account collection lives in one JSON snapshot file. There are no
//! partial updates: every mutation loads the full collection, changes it in
//! memory and writes the full collection back.
//!
//! # Atomicity
//!
//! - Saves go to a uniquely named temp file next to the snapshot, are fsynced,
//!   then renamed over it, so readers see either the old or the new snapshot.
//! - A `StoreTransaction` holds the store's write lock from load to commit, so
//!   concurrent read-modify-write cycles cannot lose updates.

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
    time::Duration,
};

use tokio::{
    fs,
    io::AsyncWriteExt,
    sync::{RwLock, RwLockWriteGuard},
};
use uuid::Uuid;

use crate::{
    config::Config,
    error::StorageError,
    models::{
        account::{Account, PinPolicy},
        digits::{self, PHONE_LEN, PIN_LEN},
    },
    services::account_number,
};

const RETRY_BACKOFF: Duration = Duration::from_millis(20);

/// Owner of the persisted account collection.
#[derive(Debug)]
pub struct AccountStore {
    path: PathBuf,
    pin_policy: PinPolicy,
    retries: u32,
    lock: RwLock<()>,
}

impl AccountStore {
    /// Create a store over `path`. The file does not need to exist yet.
    pub fn open(path: impl Into<PathBuf>, pin_policy: PinPolicy, retries: u32) -> Self {
        Self {
            path: path.into(),
            pin_policy,
            retries,
            lock: RwLock::new(()),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::open(
            config.data_file.clone(),
            config.pin_policy,
            config.storage_retries,
        )
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn pin_policy(&self) -> PinPolicy {
        self.pin_policy
    }

    /// Load the persisted collection, or an empty one if no snapshot exists yet.
    ///
    /// Takes the read lock, so it never runs alongside an open transaction.
    pub async fn load(&self) -> Result<Vec<Account>, StorageError> {
        let _guard = self.lock.read().await;
        self.read_snapshot().await
    }

    /// Atomically replace the snapshot with `accounts`.
    ///
    /// Fails with `DuplicateAccountNumber` without touching the file if the
    /// collection breaks uniqueness.
    pub async fn save(&self, accounts: &[Account]) -> Result<(), StorageError> {
        let _guard = self.lock.write().await;
        check_integrity(accounts, self.pin_policy)?;
        self.write_snapshot(accounts).await
    }

    /// Start a read-modify-write cycle.
    ///
    /// The write lock is held until the returned transaction is committed or
    /// dropped. Dropping it without `commit` discards every change.
    pub async fn begin(&self) -> Result<StoreTransaction<'_>, StorageError> {
        let guard = self.lock.write().await;
        let accounts = self.read_snapshot().await?;

        Ok(StoreTransaction {
            store: self,
            _guard: guard,
            accounts,
        })
    }

    /// Exact match on account number and PIN (under this store's PIN policy).
    pub fn find_by_credentials<'a>(
        &self,
        accounts: &'a [Account],
        account_number: &str,
        pin: &str,
    ) -> Option<&'a Account> {
        position(accounts, self.pin_policy, account_number, pin).map(|i| &accounts[i])
    }

    async fn read_snapshot(&self) -> Result<Vec<Account>, StorageError> {
        let accounts = self.with_retries("load", || read_once(&self.path)).await?;
        check_integrity(&accounts, self.pin_policy)?;
        Ok(accounts)
    }

    async fn write_snapshot(&self, accounts: &[Account]) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec_pretty(accounts)?;
        self.with_retries("save", || write_once(&self.path, &bytes))
            .await?;

        tracing::debug!(path = %self.path.display(), accounts = accounts.len(), "snapshot saved");
        Ok(())
    }

    /// Run `op`, retrying transient I/O failures up to `self.retries` extra times.
    async fn with_retries<T, F, Fut>(&self, what: &str, mut op: F) -> Result<T, StorageError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, StorageError>>,
    {
        let mut attempt = 0;
        loop {
            match op().await {
                Err(err) if err.is_transient() && attempt < self.retries => {
                    attempt += 1;
                    tracing::warn!(
                        path = %self.path.display(),
                        attempt,
                        error = %err,
                        "snapshot {what} failed, retrying"
                    );
                    tokio::time::sleep(RETRY_BACKOFF * attempt).await;
                }
                result => return result,
            }
        }
    }
}

/// An open read-modify-write cycle over the snapshot.
pub struct StoreTransaction<'a> {
    store: &'a AccountStore,
    _guard: RwLockWriteGuard<'a, ()>,
    accounts: Vec<Account>,
}

impl StoreTransaction<'_> {
    pub fn contains(&self, account_number: &str) -> bool {
        self.accounts
            .iter()
            .any(|a| a.account_number == account_number)
    }

    pub fn find_by_credentials_mut(
        &mut self,
        account_number: &str,
        pin: &str,
    ) -> Option<&mut Account> {
        position(&self.accounts, self.store.pin_policy, account_number, pin)
            .map(|i| &mut self.accounts[i])
    }

    /// Append a new account, refusing a duplicate account number.
    pub fn insert(&mut self, account: Account) -> Result<(), StorageError> {
        if self.contains(&account.account_number) {
            return Err(StorageError::DuplicateAccountNumber(account.account_number));
        }
        self.accounts.push(account);
        Ok(())
    }

    /// Remove and return the account matching the credentials, if any.
    pub fn remove_by_credentials(&mut self, account_number: &str, pin: &str) -> Option<Account> {
        position(&self.accounts, self.store.pin_policy, account_number, pin)
            .map(|i| self.accounts.remove(i))
    }

    /// Persist the modified collection and release the write lock.
    pub async fn commit(self) -> Result<(), StorageError> {
        self.store.write_snapshot(&self.accounts).await
    }
}

fn position(
    accounts: &[Account],
    policy: PinPolicy,
    account_number: &str,
    pin: &str,
) -> Option<usize> {
    accounts
        .iter()
        .position(|a| a.account_number == account_number && policy.verify(a, pin))
}

async fn read_once(path: &Path) -> Result<Vec<Account>, StorageError> {
    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(err.into()),
    };
    Ok(serde_json::from_slice(&bytes)?)
}

async fn write_once(path: &Path, bytes: &[u8]) -> Result<(), StorageError> {
    if let Some(dir) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(dir).await?;
    }

    let tmp = temp_path(path);
    let result = async {
        let mut file = fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.sync_all().await?;
        fs::rename(&tmp, path).await
    }
    .await;

    if result.is_err() {
        let _ = fs::remove_file(&tmp).await;
    }
    Ok(result?)
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "snapshot".to_string());
    path.with_file_name(format!(".{name}.{}.tmp", Uuid::new_v4()))
}

/// Every account must be fully populated, every field must have its fixed
/// format, and account numbers must be unique.
fn check_integrity(accounts: &[Account], policy: PinPolicy) -> Result<(), StorageError> {
    let mut seen = HashSet::with_capacity(accounts.len());
    for account in accounts {
        let number = &account.account_number;
        let corrupt = |what: &str| StorageError::Corrupt(format!("account {number:?} {what}"));

        if account.name.trim().is_empty() || account.email.trim().is_empty() {
            return Err(corrupt("has an empty name or email"));
        }
        if !account_number::is_well_formed(number) {
            return Err(corrupt("has a malformed account number"));
        }
        if !digits::is_digits(&account.phone, PHONE_LEN) {
            return Err(corrupt("has a phone number that is not 10 digits"));
        }
        let pin_ok = match policy {
            PinPolicy::Plaintext => digits::is_digits(&account.pin, PIN_LEN),
            PinPolicy::Sha256 => {
                account.pin.len() == 64 && account.pin.bytes().all(|b| b.is_ascii_hexdigit())
            }
        };
        if !pin_ok {
            return Err(corrupt("has a PIN that does not match the PIN policy"));
        }
        if !seen.insert(number.as_str()) {
            return Err(StorageError::DuplicateAccountNumber(number.clone()));
        }
    }
    Ok(())
}
