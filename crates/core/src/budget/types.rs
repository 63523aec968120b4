//! Budget data types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::BudgetError;

/// First year a budget may target.
pub const MIN_BUDGET_YEAR: i32 = 2020;
/// Last year a budget may target.
pub const MAX_BUDGET_YEAR: i32 = 2100;

/// Alert level derived from how much of the limit has been spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetAlert {
    /// Below 70%.
    None,
    /// At least 70%.
    Warning,
    /// At least 90%.
    Danger,
    /// At least 100%.
    Exceeded,
}

/// A validated (month, year) budget key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BudgetPeriod {
    month: u32,
    year: i32,
}

impl BudgetPeriod {
    /// Creates a period, checking month and year bounds.
    ///
    /// # Errors
    ///
    /// `InvalidMonth` or `InvalidYear` when out of range.
    pub fn new(month: u32, year: i32) -> Result<Self, BudgetError> {
        if !(1..=12).contains(&month) {
            return Err(BudgetError::InvalidMonth(month));
        }
        if !(MIN_BUDGET_YEAR..=MAX_BUDGET_YEAR).contains(&year) {
            return Err(BudgetError::InvalidYear(year));
        }
        Ok(Self { month, year })
    }

    /// Month, 1-based.
    #[must_use]
    pub const fn month(self) -> u32 {
        self.month
    }

    /// Calendar year.
    #[must_use]
    pub const fn year(self) -> i32 {
        self.year
    }
}

/// Live usage figures for one budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetUsage {
    /// Monthly limit.
    pub limit: Decimal,
    /// Amount spent (PAID expenses in the category and month).
    pub spent: Decimal,
    /// `limit - spent`, negative when over budget.
    pub remaining: Decimal,
    /// `spent / limit * 100` rounded to 2 places, 0 when the limit is 0.
    pub percentage: Decimal,
    /// Alert level computed from the unrounded percentage.
    pub alert: BudgetAlert,
}
