//! Goal error types.

use thiserror::Error;

/// Goal-related errors.
#[derive(Debug, Error)]
pub enum GoalError {
    /// Target must be strictly positive.
    #[error("Target amount must be positive")]
    NonPositiveTarget,

    /// Current amount cannot be negative.
    #[error("Current amount cannot be negative")]
    NegativeCurrentAmount,

    /// Contribution must be strictly positive.
    #[error("Contribution amount must be positive")]
    NonPositiveContribution,

    /// COMPLETED is reached through contributions only.
    #[error("Goal status cannot be set to COMPLETED directly")]
    CompletionIsDerived,
}
