//! Balance consistency rules.
//!
//! This module implements the pure half of the ledger:
//! - Domain enums for transactions and accounts
//! - Balance deltas for status transitions
//! - Transfer validation
//! - Schedule (recurrence and installment) checks
//!
//! Repositories apply the resulting deltas inside a single store transaction.

pub mod balance;
pub mod error;
pub mod recurrence;
pub mod transfer;
pub mod types;
pub mod validation;

#[cfg(test)]
mod props;

pub use balance::{signed_amount, status_change_delta};
pub use error::LedgerError;
pub use recurrence::{next_occurrence, upcoming_occurrence};
pub use transfer::{ensure_sufficient_funds, validate_transfer_request};
pub use types::{AccountType, PaymentMethod, RecurrenceFrequency, TransactionStatus, TransactionType};
pub use validation::{Schedule, validate_schedule};
