//! Ledger domain types.
//!
//! Closed sets used by transactions, accounts and recurrence rules. All of
//! them serialize to the SCREAMING_SNAKE_CASE names clients send and the
//! database stores.

use serde::{Deserialize, Serialize};

/// Whether a transaction brings money in or takes it out.
///
/// The stored amount is always positive; the sign is implied by the type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    /// Money received.
    Income,
    /// Money spent.
    Expense,
}

/// Transaction lifecycle state. Only `Paid` affects account balances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    /// Settled.
    #[default]
    Paid,
    /// Expected but not settled.
    Pending,
    /// Planned for a future date.
    Scheduled,
}

impl TransactionStatus {
    /// Returns true if the transaction counts against account balances.
    #[must_use]
    pub const fn is_paid(self) -> bool {
        matches!(self, Self::Paid)
    }
}

/// How a transaction was paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    /// Cash.
    Cash,
    /// PIX instant payment.
    Pix,
    /// Debit card.
    DebitCard,
    /// Credit card.
    CreditCard,
    /// Boleto bancário.
    BankSlip,
    /// Bank transfer.
    Transfer,
    /// Anything else, and the fallback for unset values.
    Other,
}

impl PaymentMethod {
    /// Returns the wire name of the method.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "CASH",
            Self::Pix => "PIX",
            Self::DebitCard => "DEBIT_CARD",
            Self::CreditCard => "CREDIT_CARD",
            Self::BankSlip => "BANK_SLIP",
            Self::Transfer => "TRANSFER",
            Self::Other => "OTHER",
        }
    }
}

/// How often a recurring transaction repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecurrenceFrequency {
    /// Every day.
    Daily,
    /// Every week.
    Weekly,
    /// Every month, same day (clamped to month end).
    Monthly,
    /// Every year, same day (Feb 29 clamps to Feb 28).
    Yearly,
}

/// Kind of bank account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountType {
    /// Checking account.
    Checking,
    /// Savings account.
    Savings,
    /// Investment account.
    Investment,
}
