//! Data models representing persisted records and API payloads.

/// Account record, PIN policy and request/response bodies
pub mod account;
/// Fixed-width digit fields and their legacy decoding
pub mod digits;
