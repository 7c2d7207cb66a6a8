//! Calendar date without a timezone.

use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// A plain `{year, month, day}` date.
///
/// Fields are kept exactly as parsed so a table with a typo still produces
/// a transaction the reviewer can see. Ordering is lexicographic over
/// (year, month, day), which the field order of the derive gives us.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Date {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl Date {
    /// Creates a date from its parts.
    pub fn new(year: i32, month: u32, day: u32) -> Self {
        Date { year, month, day }
    }

    /// Returns `true` if the month and day are within their nominal ranges.
    pub fn is_plausible(&self) -> bool {
        (1..=12).contains(&self.month) && (1..=31).contains(&self.day)
    }

    /// Number of days from `other` to `self` on the proleptic Gregorian calendar.
    ///
    /// Positive when `self` is later.
    pub fn days_since(&self, other: &Date) -> i64 {
        match (self.to_naive(), other.to_naive()) {
            (Some(a), Some(b)) => (a - b).num_days(),
            // Only reachable for years outside chrono's range.
            _ => {
                let approx = |d: &Date| {
                    i64::from(d.year) * 365 + i64::from(d.month) * 31 + i64::from(d.day)
                };
                approx(self) - approx(other)
            }
        }
    }

    /// Converts to a chrono date, rolling over months and days that are out
    /// of range (month 13 is January of the next year, day 0 is the last day
    /// of the previous month).
    fn to_naive(self) -> Option<NaiveDate> {
        let start = NaiveDate::from_ymd_opt(self.year, 1, 1)?;
        let with_months = match self.month {
            0 => start.checked_sub_months(Months::new(1))?,
            m => start.checked_add_months(Months::new(m - 1))?,
        };
        match self.day {
            0 => with_months.checked_sub_days(Days::new(1)),
            d => with_months.checked_add_days(Days::new(u64::from(d) - 1)),
        }
    }
}

impl From<NaiveDate> for Date {
    fn from(date: NaiveDate) -> Self {
        use chrono::Datelike;
        Date::new(date.year(), date.month(), date.day())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_is_lexicographic() {
        assert!(Date::new(2024, 1, 31) < Date::new(2024, 2, 1));
        assert!(Date::new(2023, 12, 31) < Date::new(2024, 1, 1));
        assert!(Date::new(2024, 3, 5) > Date::new(2024, 3, 4));
    }

    #[test]
    fn test_days_since_crosses_month_lengths() {
        assert_eq!(Date::new(2024, 3, 1).days_since(&Date::new(2024, 2, 28)), 2);
        assert_eq!(Date::new(2023, 3, 1).days_since(&Date::new(2023, 2, 28)), 1);
        assert_eq!(Date::new(2024, 1, 1).days_since(&Date::new(2023, 12, 25)), 7);
        assert_eq!(Date::new(2024, 1, 1).days_since(&Date::new(2024, 1, 3)), -2);
    }

    #[test]
    fn test_out_of_range_parts_roll_over() {
        assert_eq!(Date::new(2023, 13, 1).days_since(&Date::new(2024, 1, 1)), 0);
        assert_eq!(Date::new(2024, 3, 0).days_since(&Date::new(2024, 2, 29)), 0);
        assert_eq!(Date::new(2024, 1, 32).days_since(&Date::new(2024, 2, 1)), 0);
    }

    #[test]
    fn test_plausibility() {
        assert!(Date::new(2024, 2, 29).is_plausible());
        assert!(!Date::new(2024, 13, 1).is_plausible());
        assert!(!Date::new(2024, 1, 0).is_plausible());
    }
}
