//! Goal progress and contribution rules.

use rust_decimal::Decimal;

use super::error::GoalError;
use super::types::{ContributionOutcome, GoalStatus};
use crate::percent::calculate_percentage;

/// Goal service for business logic.
pub struct GoalService;

impl GoalService {
    /// Progress towards the target in percent, clamped to 100, 0 for a zero target.
    #[must_use]
    pub fn progress(current: Decimal, target: Decimal) -> Decimal {
        calculate_percentage(current, target)
            .min(Decimal::ONE_HUNDRED)
            .round_dp(2)
    }

    /// Validates the amounts of a new or edited goal.
    ///
    /// # Errors
    ///
    /// `NonPositiveTarget` or `NegativeCurrentAmount`.
    pub fn validate_amounts(target: Decimal, current: Decimal) -> Result<(), GoalError> {
        if target <= Decimal::ZERO {
            return Err(GoalError::NonPositiveTarget);
        }
        if current < Decimal::ZERO {
            return Err(GoalError::NegativeCurrentAmount);
        }
        Ok(())
    }

    /// Rejects direct edits into COMPLETED.
    ///
    /// # Errors
    ///
    /// `CompletionIsDerived` for `GoalStatus::Completed`.
    pub fn validate_status_edit(status: GoalStatus) -> Result<(), GoalError> {
        match status {
            GoalStatus::Completed => Err(GoalError::CompletionIsDerived),
            GoalStatus::InProgress | GoalStatus::Cancelled => Ok(()),
        }
    }

    /// Applies a contribution. The goal completes exactly when the new current
    /// amount reaches the target; otherwise the status is left unchanged.
    ///
    /// # Errors
    ///
    /// `NonPositiveContribution` when `amount <= 0`.
    pub fn contribute(
        current: Decimal,
        target: Decimal,
        status: GoalStatus,
        amount: Decimal,
    ) -> Result<ContributionOutcome, GoalError> {
        if amount <= Decimal::ZERO {
            return Err(GoalError::NonPositiveContribution);
        }
        let current_amount = current + amount;
        let status = if current_amount >= target {
            GoalStatus::Completed
        } else {
            status
        };
        Ok(ContributionOutcome {
            current_amount,
            status,
        })
    }
}
