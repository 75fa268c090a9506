//! Application configuration management.
//!
//! This module handles loading configuration from environment variables.
//! It uses the `envy` crate to deserialize environment variables into a type-safe struct.

use std::path::PathBuf;

use serde::Deserialize;

use crate::models::account::PinPolicy;

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `DATA_FILE` (optional): snapshot path, defaults to `database.json`
/// - `SERVER_PORT` (optional): HTTP server port, defaults to 3000
/// - `DEPOSIT_LIMIT` (optional): single-transaction deposit cap, defaults to 10000
/// - `STORAGE_RETRIES` (optional): extra attempts for failed snapshot I/O, defaults to 3
/// - `ACCOUNT_NUMBER_ATTEMPTS` (optional): draws before giving up on a unique number, defaults to 16
/// - `PIN_POLICY` (optional): `plaintext` or `sha256`, defaults to `plaintext`
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,

    #[serde(default = "default_port")]
    pub server_port: u16,

    #[serde(default = "default_deposit_limit")]
    pub deposit_limit: u64,

    #[serde(default = "default_storage_retries")]
    pub storage_retries: u32,

    #[serde(default = "default_account_number_attempts")]
    pub account_number_attempts: u32,

    #[serde(default)]
    pub pin_policy: PinPolicy,
}

fn default_data_file() -> PathBuf {
    PathBuf::from("database.json")
}

/// Default port if SERVER_PORT environment variable is not set.
fn default_port() -> u16 {
    3000
}

fn default_deposit_limit() -> u64 {
    10_000
}

fn default_storage_retries() -> u32 {
    3
}

fn default_account_number_attempts() -> u32 {
    16
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            server_port: default_port(),
            deposit_limit: default_deposit_limit(),
            storage_retries: default_storage_retries(),
            account_number_attempts: default_account_number_attempts(),
            pin_policy: PinPolicy::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// This method first attempts to load a `.env` file (which is optional),
    /// then reads environment variables and deserializes them into a Config struct.
    ///
    /// # Errors
    ///
    /// Returns an error if an environment variable value cannot be parsed into
    /// its expected type (e.g. `PIN_POLICY=md5`).
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();

        // Field names are converted automatically: data_file -> DATA_FILE
        Self::from_vars(std::env::vars())
    }

    /// Build configuration from an explicit set of key/value pairs.
    pub fn from_vars<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter::<_, Config>(vars)
    }
}
