//! Ledger error types for transfers and balance mutations.

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Amount must be strictly positive.
    #[error("Amount must be positive")]
    NonPositiveAmount,

    /// Source and destination accounts are the same.
    #[error("Source and destination accounts must be different")]
    SameAccount,

    /// Transfer endpoint missing or owned by someone else.
    #[error("Account not found: {0}")]
    AccountNotFound(Uuid),

    /// A recurring transaction needs a frequency.
    #[error("Recurring transactions require a recurrence frequency")]
    MissingRecurrenceFrequency,

    /// Recurrence end precedes the first occurrence.
    #[error("Recurrence end must not be before the transaction date")]
    RecurrenceEndBeforeStart,

    /// Installment number outside `1..=installments`.
    #[error("Installment {number} is outside 1..={total}")]
    InstallmentOutOfRange {
        /// Installment number.
        number: i32,
        /// Total installments.
        total: i32,
    },

    /// Source balance does not cover the transfer.
    #[error("Insufficient funds: available {available}, requested {requested}")]
    InsufficientFunds {
        /// Current source balance.
        available: Decimal,
        /// Requested amount.
        requested: Decimal,
    },
}
