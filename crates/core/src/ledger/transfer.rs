//! Transfer validation between two accounts of the same owner.

use rust_decimal::Decimal;
use lyvinx_shared::types::AccountId;

use super::error::LedgerError;

/// Checks the parts of a transfer that need no account data.
///
/// # Errors
///
/// `SameAccount` when both ids match, `NonPositiveAmount` when amount <= 0.
pub fn validate_transfer_request(
    from: AccountId,
    to: AccountId,
    amount: Decimal,
) -> Result<(), LedgerError> {
    if from == to {
        return Err(LedgerError::SameAccount);
    }
    if amount <= Decimal::ZERO {
        return Err(LedgerError::NonPositiveAmount);
    }
    Ok(())
}

/// Checks that the source balance covers the amount.
///
/// Must be evaluated against a balance read under the same store transaction
/// that applies the transfer.
///
/// # Errors
///
/// `InsufficientFunds` when `available < amount`.
pub fn ensure_sufficient_funds(available: Decimal, amount: Decimal) -> Result<(), LedgerError> {
    if available < amount {
        return Err(LedgerError::InsufficientFunds {
            available,
            requested: amount,
        });
    }
    Ok(())
}
