//! Fixed-width digit strings (phone numbers, PINs).
//!
//! Older snapshots stored these fields as JSON integers, which silently
//! dropped leading zeros. They are held as strings now; the deserializers here
//! accept both forms and pad integers back to their fixed width.

use serde::{Deserialize, Deserializer};

pub const PHONE_LEN: usize = 10;
pub const PIN_LEN: usize = 4;

/// True when `value` is exactly `len` ASCII digits.
pub fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.bytes().all(|b| b.is_ascii_digit())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDigits {
    Text(String),
    Number(u64),
}

fn padded<'de, D>(deserializer: D, width: usize) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawDigits::deserialize(deserializer)? {
        RawDigits::Text(text) => text,
        RawDigits::Number(n) => format!("{n:0width$}"),
    })
}

pub fn phone<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    padded(deserializer, PHONE_LEN)
}

/// Sealed pins under the sha256 policy are hex strings and pass through untouched.
pub fn pin<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    padded(deserializer, PIN_LEN)
}
