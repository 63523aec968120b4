//! Recurrence date arithmetic.

use chrono::{Days, Months, NaiveDate};

use super::types::RecurrenceFrequency;

/// Returns the next occurrence after `date`, or `None` past the calendar range.
///
/// Monthly and yearly steps clamp to the last day of the target month, so
/// Jan 31 is followed by Feb 28 (or 29).
#[must_use]
pub fn next_occurrence(date: NaiveDate, frequency: RecurrenceFrequency) -> Option<NaiveDate> {
    match frequency {
        RecurrenceFrequency::Daily => date.checked_add_days(Days::new(1)),
        RecurrenceFrequency::Weekly => date.checked_add_days(Days::new(7)),
        RecurrenceFrequency::Monthly => date.checked_add_months(Months::new(1)),
        RecurrenceFrequency::Yearly => date.checked_add_months(Months::new(12)),
    }
}

/// Like [`next_occurrence`] but returns `None` once the series has ended.
#[must_use]
pub fn upcoming_occurrence(
    date: NaiveDate,
    frequency: RecurrenceFrequency,
    end: Option<NaiveDate>,
) -> Option<NaiveDate> {
    next_occurrence(date, frequency).filter(|next| end.is_none_or(|end| *next <= end))
}
