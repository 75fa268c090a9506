//! Business logic services.
//!
//! Services contain the business rules, separated from HTTP handlers.
//! They handle validation, credential checks and store transactions.

pub mod account_number;
pub mod account_service;
pub mod validation;
