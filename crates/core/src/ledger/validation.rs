//! Consistency checks for transaction schedules.

use chrono::NaiveDate;

use super::error::LedgerError;
use super::types::RecurrenceFrequency;

/// Recurrence and installment settings of a transaction.
#[derive(Debug, Clone, Copy, Default)]
pub struct Schedule {
    /// Whether the transaction repeats.
    pub is_recurring: bool,
    /// Repetition frequency.
    pub frequency: Option<RecurrenceFrequency>,
    /// Last date the series may produce.
    pub recurrence_end: Option<NaiveDate>,
    /// Total number of installments.
    pub installments: Option<i32>,
    /// This transaction's installment number.
    pub installment_number: Option<i32>,
}

/// Validates a schedule against the transaction date.
///
/// # Errors
///
/// Returns the first inconsistency found.
pub fn validate_schedule(date: NaiveDate, schedule: &Schedule) -> Result<(), LedgerError> {
    if schedule.is_recurring && schedule.frequency.is_none() {
        return Err(LedgerError::MissingRecurrenceFrequency);
    }
    if let Some(end) = schedule.recurrence_end {
        if end < date {
            return Err(LedgerError::RecurrenceEndBeforeStart);
        }
    }
    if let (Some(number), Some(total)) = (schedule.installment_number, schedule.installments) {
        if number < 1 || number > total {
            return Err(LedgerError::InstallmentOutOfRange { number, total });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 10).unwrap()
    }

    #[test]
    fn test_plain_transaction_is_valid() {
        assert!(validate_schedule(date(), &Schedule::default()).is_ok());
    }

    #[test]
    fn test_recurring_requires_frequency() {
        let schedule = Schedule {
            is_recurring: true,
            ..Schedule::default()
        };
        assert!(matches!(
            validate_schedule(date(), &schedule),
            Err(LedgerError::MissingRecurrenceFrequency)
        ));
    }

    #[test]
    fn test_recurrence_end_before_date() {
        let schedule = Schedule {
            is_recurring: true,
            frequency: Some(RecurrenceFrequency::Monthly),
            recurrence_end: NaiveDate::from_ymd_opt(2024, 5, 9),
            ..Schedule::default()
        };
        assert!(matches!(
            validate_schedule(date(), &schedule),
            Err(LedgerError::RecurrenceEndBeforeStart)
        ));
    }

    #[test]
    fn test_installment_out_of_range() {
        let schedule = Schedule {
            installments: Some(3),
            installment_number: Some(4),
            ..Schedule::default()
        };
        assert!(matches!(
            validate_schedule(date(), &schedule),
            Err(LedgerError::InstallmentOutOfRange { number: 4, total: 3 })
        ));
    }
}
