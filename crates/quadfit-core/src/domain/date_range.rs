use std::fmt::{Display, Formatter};

use time::{Date, Duration, Month};

use crate::ValidationError;

/// Inclusive range of calendar days used to request daily history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    start: Date,
    end: Date,
}

impl DateRange {
    pub fn new(start: Date, end: Date) -> Result<Self, ValidationError> {
        if start > end {
            return Err(ValidationError::InvalidDateRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// `[today - 1 calendar month, today]`.
    ///
    /// January wraps to December of the previous year and the day is clamped
    /// to the length of the target month, so 31 March maps to the last day of
    /// February.
    pub fn trailing_month(today: Date) -> Self {
        Self {
            start: one_month_before(today),
            end: today,
        }
    }

    pub const fn start(&self) -> Date {
        self.start
    }

    pub const fn end(&self) -> Date {
        self.end
    }

    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }

    /// Unix timestamp of the first instant of `start`, UTC.
    pub fn start_timestamp(&self) -> i64 {
        self.start.midnight().assume_utc().unix_timestamp()
    }

    /// Unix timestamp of the first instant after `end`, UTC.
    pub fn end_timestamp_exclusive(&self) -> i64 {
        (self.end.midnight().assume_utc() + Duration::DAY).unix_timestamp()
    }
}

impl Display for DateRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

fn one_month_before(date: Date) -> Date {
    let (year, month) = match date.month() {
        Month::January => (date.year() - 1, Month::December),
        other => (date.year(), other.previous()),
    };
    let day = date.day().min(month.length(year));

    Date::from_calendar_date(year, month, day).expect("clamped day must be a valid calendar date")
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::*;

    #[test]
    fn trailing_month_keeps_day_of_month() {
        let range = DateRange::trailing_month(date!(2024 - 06 - 15));
        assert_eq!(range.start(), date!(2024 - 05 - 15));
        assert_eq!(range.end(), date!(2024 - 06 - 15));
    }

    #[test]
    fn trailing_month_wraps_january_into_previous_year() {
        let range = DateRange::trailing_month(date!(2025 - 01 - 10));
        assert_eq!(range.start(), date!(2024 - 12 - 10));
    }

    #[test]
    fn trailing_month_clamps_to_short_months() {
        assert_eq!(
            DateRange::trailing_month(date!(2023 - 03 - 31)).start(),
            date!(2023 - 02 - 28)
        );
        assert_eq!(
            DateRange::trailing_month(date!(2024 - 03 - 31)).start(),
            date!(2024 - 02 - 29)
        );
        assert_eq!(
            DateRange::trailing_month(date!(2024 - 05 - 31)).start(),
            date!(2024 - 04 - 30)
        );
    }

    #[test]
    fn timestamps_cover_whole_end_day() {
        let range = DateRange::new(date!(1970 - 01 - 01), date!(1970 - 01 - 02)).expect("range");
        assert_eq!(range.start_timestamp(), 0);
        assert_eq!(range.end_timestamp_exclusive(), 2 * 86_400);
    }

    #[test]
    fn rejects_inverted_range() {
        let err = DateRange::new(date!(2024 - 02 - 01), date!(2024 - 01 - 01)).expect_err("inverted");
        assert!(matches!(err, ValidationError::InvalidDateRange { .. }));
    }

    #[test]
    fn contains_is_inclusive() {
        let range = DateRange::trailing_month(date!(2024 - 06 - 15));
        assert!(range.contains(date!(2024 - 05 - 15)));
        assert!(range.contains(date!(2024 - 06 - 15)));
        assert!(!range.contains(date!(2024 - 06 - 16)));
    }
}
