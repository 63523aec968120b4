//! Calendar periods used by reports.

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use super::error::ReportError;

const PT_BR_MONTHS: [&str; 12] = [
    "jan", "fev", "mar", "abr", "mai", "jun", "jul", "ago", "set", "out", "nov", "dez",
];

/// A calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    /// Calendar year.
    pub year: i32,
    /// Month, 1-based.
    pub month: u32,
}

impl YearMonth {
    /// Creates a validated month.
    ///
    /// # Errors
    ///
    /// `InvalidMonth` outside 1..=12 or for years chrono cannot represent.
    pub fn new(year: i32, month: u32) -> Result<Self, ReportError> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(|_| Self { year, month })
            .ok_or(ReportError::InvalidMonth { month, year })
    }

    /// The month containing `date`.
    #[must_use]
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// First day of the month.
    #[must_use]
    pub fn first_day(self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// Last day of the month.
    #[must_use]
    pub fn last_day(self) -> NaiveDate {
        self.first_day()
            .checked_add_months(Months::new(1))
            .and_then(|d| d.pred_opt())
            .unwrap_or(NaiveDate::MAX)
    }

    /// The month `n` months before this one.
    #[must_use]
    pub fn minus_months(self, n: u32) -> Self {
        self.first_day()
            .checked_sub_months(Months::new(n))
            .map_or(self, Self::of)
    }

    /// `mmm/yy` label with pt-BR month abbreviations, e.g. `fev/24`.
    #[must_use]
    pub fn label(self) -> String {
        let idx = usize::try_from(self.month.saturating_sub(1)).unwrap_or(0) % 12;
        format!("{}/{:02}", PT_BR_MONTHS[idx], self.year.rem_euclid(100))
    }

    /// The full month as a date range.
    #[must_use]
    pub fn range(self) -> DateRange {
        DateRange {
            start: self.first_day(),
            end: self.last_day(),
        }
    }

    /// `count` consecutive months ending at (and including) `self`, oldest first.
    #[must_use]
    pub fn trailing(self, count: u32) -> Vec<Self> {
        (0..count).rev().map(|i| self.minus_months(i)).collect()
    }
}

/// Inclusive date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// First day included.
    pub start: NaiveDate,
    /// Last day included.
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a range, rejecting `start > end`.
    ///
    /// # Errors
    ///
    /// `InvalidDateRange` when inverted.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ReportError> {
        if start > end {
            return Err(ReportError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Whether `date` lies inside the range.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        (self.start..=self.end).contains(&date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_month_range() {
        let range = YearMonth::new(2024, 2).unwrap().range();
        assert_eq!(range.start, d(2024, 2, 1));
        assert_eq!(range.end, d(2024, 2, 29));

        let december = YearMonth::new(2023, 12).unwrap().range();
        assert_eq!(december.end, d(2023, 12, 31));
    }

    #[test]
    fn test_invalid_month() {
        assert!(YearMonth::new(2024, 0).is_err());
        assert!(YearMonth::new(2024, 13).is_err());
    }

    #[test]
    fn test_label() {
        assert_eq!(YearMonth::new(2024, 2).unwrap().label(), "fev/24");
        assert_eq!(YearMonth::new(2009, 12).unwrap().label(), "dez/09");
    }

    #[test]
    fn test_trailing_crosses_year_boundary() {
        let months = YearMonth::new(2024, 2).unwrap().trailing(4);
        let expected: Vec<_> = [(2023, 11), (2023, 12), (2024, 1), (2024, 2)]
            .into_iter()
            .map(|(year, month)| YearMonth { year, month })
            .collect();
        assert_eq!(months, expected);
    }

    #[test]
    fn test_date_range() {
        assert!(DateRange::new(d(2024, 3, 2), d(2024, 3, 1)).is_err());
        let range = DateRange::new(d(2024, 3, 1), d(2024, 3, 1)).unwrap();
        assert!(range.contains(d(2024, 3, 1)));
        assert!(!range.contains(d(2024, 3, 2)));
    }
}
