//! Percentage helper shared by budgets, goals and reports.

use rust_decimal::Decimal;

/// Returns `value / total * 100`, or zero when `total` is zero.
///
/// The result is not rounded; callers round for presentation so threshold
/// checks see the exact ratio.
#[must_use]
pub fn calculate_percentage(value: Decimal, total: Decimal) -> Decimal {
    if total.is_zero() {
        return Decimal::ZERO;
    }
    value / total * Decimal::ONE_HUNDRED
}
