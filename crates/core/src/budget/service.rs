//! Budget service for usage and alert calculation.

use rust_decimal::Decimal;

use super::error::BudgetError;
use super::types::{BudgetAlert, BudgetUsage};
use crate::percent::calculate_percentage;

const WARNING_AT: Decimal = Decimal::from_parts(70, 0, 0, false, 0);
const DANGER_AT: Decimal = Decimal::from_parts(90, 0, 0, false, 0);

/// Budget service for business logic.
pub struct BudgetService;

impl BudgetService {
    /// Maps a spent percentage onto an alert level.
    ///
    /// exceeded at >= 100, danger at >= 90, warning at >= 70, none otherwise.
    #[must_use]
    pub fn alert_for(percentage: Decimal) -> BudgetAlert {
        if percentage >= Decimal::ONE_HUNDRED {
            BudgetAlert::Exceeded
        } else if percentage >= DANGER_AT {
            BudgetAlert::Danger
        } else if percentage >= WARNING_AT {
            BudgetAlert::Warning
        } else {
            BudgetAlert::None
        }
    }

    /// Computes usage for a limit and the re-aggregated spent amount.
    #[must_use]
    pub fn usage(limit: Decimal, spent: Decimal) -> BudgetUsage {
        let percentage = calculate_percentage(spent, limit);
        BudgetUsage {
            limit,
            spent,
            remaining: limit - spent,
            percentage: percentage.round_dp(2),
            alert: Self::alert_for(percentage),
        }
    }

    /// Validates a budget limit.
    ///
    /// # Errors
    ///
    /// `NonPositiveLimit` when `limit <= 0`.
    pub fn validate_limit(limit: Decimal) -> Result<(), BudgetError> {
        if limit <= Decimal::ZERO {
            return Err(BudgetError::NonPositiveLimit);
        }
        Ok(())
    }
}
