//! Account balance effects of transaction status changes.
//!
//! A transaction linked to a bank account moves that account's balance only
//! when it crosses the PAID boundary:
//!
//! | old      | new      | effect                       |
//! |----------|----------|------------------------------|
//! | non-PAID | PAID     | +amount income, -amount expense |
//! | PAID     | non-PAID | the reverse                  |
//! | anything else       | none                         |

use rust_decimal::Decimal;

use super::types::{TransactionStatus, TransactionType};

/// Returns the signed balance contribution of a PAID transaction.
#[must_use]
pub fn signed_amount(transaction_type: TransactionType, amount: Decimal) -> Decimal {
    match transaction_type {
        TransactionType::Income => amount,
        TransactionType::Expense => -amount,
    }
}

/// Computes the balance delta caused by moving a transaction from `old` to `new`.
///
/// Returns `None` when the change does not touch the balance.
#[must_use]
pub fn status_change_delta(
    transaction_type: TransactionType,
    amount: Decimal,
    old: TransactionStatus,
    new: TransactionStatus,
) -> Option<Decimal> {
    match (old.is_paid(), new.is_paid()) {
        (false, true) => Some(signed_amount(transaction_type, amount)),
        (true, false) => Some(-signed_amount(transaction_type, amount)),
        _ => None,
    }
}
