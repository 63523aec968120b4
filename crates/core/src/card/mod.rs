//! Credit card invoice periods.

use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;
use thiserror::Error;

/// Length of an invoice window ending on the closing date.
pub const INVOICE_WINDOW_DAYS: u64 = 30;

/// Card-related errors.
#[derive(Debug, Error)]
pub enum CardError {
    /// Day of month outside 1..=31.
    #[error("Day of month must be between 1 and 31, got {0}")]
    InvalidDay(u32),

    /// Month outside 1..=12 or an unrepresentable date.
    #[error("Invalid invoice month {month}/{year}")]
    InvalidMonth {
        /// Month, 1-based.
        month: u32,
        /// Calendar year.
        year: i32,
    },

    /// Last digits must be exactly four ASCII digits.
    #[error("Last digits must be exactly 4 digits")]
    InvalidLastDigits,
}

/// Date window and due date of one card invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoicePeriod {
    /// First day included.
    pub start: NaiveDate,
    /// Closing date, last day included.
    pub closing: NaiveDate,
    /// Payment due date.
    pub due: NaiveDate,
}

impl InvoicePeriod {
    /// Whether `date` falls inside the invoice window.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        (self.start..=self.closing).contains(&date)
    }
}

/// Validates a closing or due day.
///
/// # Errors
///
/// `InvalidDay` outside 1..=31.
pub fn validate_day(day: u32) -> Result<(), CardError> {
    if (1..=31).contains(&day) {
        Ok(())
    } else {
        Err(CardError::InvalidDay(day))
    }
}

/// Validates the last four card digits.
///
/// # Errors
///
/// `InvalidLastDigits` unless exactly four ASCII digits.
pub fn validate_last_digits(value: &str) -> Result<(), CardError> {
    if value.len() == 4 && value.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(CardError::InvalidLastDigits)
    }
}

/// Builds `day` of the given month, clamping to the month's last day.
fn clamped_date(year: i32, month: u32, day: u32) -> Result<NaiveDate, CardError> {
    let first =
        NaiveDate::from_ymd_opt(year, month, 1).ok_or(CardError::InvalidMonth { month, year })?;
    let last_day = first
        .checked_add_months(chrono::Months::new(1))
        .and_then(|next| next.pred_opt())
        .map_or(31, |last| last.day());
    NaiveDate::from_ymd_opt(year, month, day.min(last_day))
        .ok_or(CardError::InvalidMonth { month, year })
}

/// Computes the invoice window for a card in (`month`, `year`).
///
/// The closing date is `closing_day` of that month, clamped to the month's
/// length; the window spans the 30 days before it, inclusive. The due date is
/// `due_day` of the same month, clamped the same way.
///
/// # Errors
///
/// `InvalidDay` or `InvalidMonth` for out-of-range input.
pub fn invoice_period(
    closing_day: u32,
    due_day: u32,
    month: u32,
    year: i32,
) -> Result<InvoicePeriod, CardError> {
    validate_day(closing_day)?;
    validate_day(due_day)?;
    let closing = clamped_date(year, month, closing_day)?;
    let due = clamped_date(year, month, due_day)?;
    let start = closing
        .checked_sub_days(Days::new(INVOICE_WINDOW_DAYS))
        .ok_or(CardError::InvalidMonth { month, year })?;
    Ok(InvoicePeriod {
        start,
        closing,
        due,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_invoice_window() {
        let period = invoice_period(10, 20, 3, 2024).unwrap();
        assert_eq!(period.closing, d(2024, 3, 10));
        assert_eq!(period.start, d(2024, 2, 9));
        assert_eq!(period.due, d(2024, 3, 20));
        assert!(period.contains(d(2024, 2, 9)));
        assert!(period.contains(d(2024, 3, 10)));
        assert!(!period.contains(d(2024, 3, 11)));
    }

    #[test]
    fn test_days_clamp_to_month_end() {
        let period = invoice_period(31, 30, 2, 2023).unwrap();
        assert_eq!(period.closing, d(2023, 2, 28));
        assert_eq!(period.due, d(2023, 2, 28));
    }

    #[test]
    fn test_invalid_input() {
        assert!(matches!(
            invoice_period(0, 10, 1, 2024),
            Err(CardError::InvalidDay(0))
        ));
        assert!(matches!(
            invoice_period(5, 10, 13, 2024),
            Err(CardError::InvalidMonth { .. })
        ));
    }

    #[test]
    fn test_last_digits() {
        assert!(validate_last_digits("1234").is_ok());
        assert!(validate_last_digits("123").is_err());
        assert!(validate_last_digits("12a4").is_err());
    }
}
