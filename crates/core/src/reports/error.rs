//! Report error types.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Start date after end date.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        /// Start date.
        start: NaiveDate,
        /// End date.
        end: NaiveDate,
    },

    /// Month outside 1..=12 or an unrepresentable year.
    #[error("Invalid month {month}/{year}")]
    InvalidMonth {
        /// Month, 1-based.
        month: u32,
        /// Calendar year.
        year: i32,
    },

    /// Evolution window must cover at least one month.
    #[error("Evolution window must be between 1 and {max} months, got {got}")]
    InvalidWindow {
        /// Requested months.
        got: u32,
        /// Largest accepted window.
        max: u32,
    },
}
