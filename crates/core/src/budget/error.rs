//! Budget error types.

use thiserror::Error;

/// Budget-related errors.
#[derive(Debug, Error)]
pub enum BudgetError {
    /// Month outside 1..=12.
    #[error("Invalid month: {0}")]
    InvalidMonth(u32),

    /// Year outside the supported window.
    #[error("Year must be between 2020 and 2100, got {0}")]
    InvalidYear(i32),

    /// Limit must be strictly positive.
    #[error("Budget limit must be positive")]
    NonPositiveLimit,
}
