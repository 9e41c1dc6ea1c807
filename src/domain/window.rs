//! Month windows: every occurrence of one calendar month across a span of years.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::Month;

/// Inclusive span of years a month query covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    #[must_use]
    pub const fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub const fn single(year: i32) -> Self {
        Self {
            start: year,
            end: year,
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start > self.end
    }
}

/// Half-open UTC interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }
}

/// The set of date ranges matched by a month query, one per year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthWindow {
    ranges: Vec<DateRange>,
}

impl MonthWindow {
    /// Builds the window for `month` in every year of `years`.
    ///
    /// Returns `None` if the year range is empty or a boundary date cannot be
    /// represented.
    #[must_use]
    pub fn new(month: Month, years: YearRange) -> Option<Self> {
        if years.is_empty() {
            return None;
        }

        let ranges = (years.start..=years.end)
            .map(|year| month_range(year, month))
            .collect::<Option<Vec<_>>>()?;

        Some(Self { ranges })
    }

    #[must_use]
    pub fn ranges(&self) -> &[DateRange] {
        &self.ranges
    }

    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.ranges.iter().any(|range| range.contains(instant))
    }
}

fn month_start(year: i32, month: Month) -> Option<DateTime<Utc>> {
    NaiveDate::from_ymd_opt(year, month.number(), 1)?
        .and_hms_opt(0, 0, 0)
        .map(|naive| naive.and_utc())
}

fn month_range(year: i32, month: Month) -> Option<DateRange> {
    let start = month_start(year, month)?;
    let (next, rolled_over) = month.next();
    let next_year = if rolled_over { year + 1 } else { year };
    let end = month_start(next_year, next)?;
    Some(DateRange { start, end })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn month(n: u32) -> Month {
        Month::new(n).unwrap()
    }

    #[test]
    fn one_range_per_year() {
        let window = MonthWindow::new(month(3), YearRange::new(2020, 2022)).unwrap();
        assert_eq!(window.ranges().len(), 3);
        assert_eq!(
            window.ranges()[0].start,
            Utc.with_ymd_and_hms(2020, 3, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(
            window.ranges()[2].end,
            Utc.with_ymd_and_hms(2022, 4, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn december_ends_in_next_january() {
        let window = MonthWindow::new(month(12), YearRange::single(2021)).unwrap();
        assert_eq!(
            window.ranges()[0].end,
            Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn boundaries_are_half_open() {
        let window = MonthWindow::new(month(3), YearRange::single(2021)).unwrap();

        assert!(window.contains(Utc.with_ymd_and_hms(2021, 3, 1, 0, 0, 0).unwrap()));
        assert!(window.contains(Utc.with_ymd_and_hms(2021, 3, 31, 23, 59, 59).unwrap()));
        assert!(!window.contains(Utc.with_ymd_and_hms(2021, 4, 1, 0, 0, 0).unwrap()));
        assert!(!window.contains(Utc.with_ymd_and_hms(2021, 2, 28, 23, 59, 59).unwrap()));
    }

    #[test]
    fn years_outside_range_do_not_match() {
        let window = MonthWindow::new(month(3), YearRange::new(2020, 2022)).unwrap();
        assert!(!window.contains(Utc.with_ymd_and_hms(2019, 3, 15, 0, 0, 0).unwrap()));
        assert!(!window.contains(Utc.with_ymd_and_hms(2023, 3, 15, 0, 0, 0).unwrap()));
    }

    #[test]
    fn reversed_range_is_rejected() {
        assert!(MonthWindow::new(month(1), YearRange::new(2022, 2020)).is_none());
    }
}
