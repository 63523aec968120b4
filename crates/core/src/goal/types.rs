//! Goal data types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Goal lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GoalStatus {
    /// Accepting contributions.
    #[default]
    InProgress,
    /// Current amount reached the target.
    Completed,
    /// Abandoned by the owner.
    Cancelled,
}

/// Result of applying a contribution to a goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContributionOutcome {
    /// Current amount after the contribution.
    pub current_amount: Decimal,
    /// Status after the contribution.
    pub status: GoalStatus,
}
