//! Domain types for sale-record queries.
//!
//! Month selection is validated once at the edge and then carried around as
//! strongly typed values so the query layer never sees a raw integer.

pub mod buckets;
pub mod window;

use serde::Serialize;
use std::fmt;

pub use buckets::{PRICE_BUCKETS, PriceBucket, PriceHistogram};
pub use window::{MonthWindow, YearRange};

/// Earliest year accepted for an explicit `year` selection.
pub const MIN_YEAR: i32 = 1970;

/// Latest year accepted for an explicit `year` selection.
pub const MAX_YEAR: i32 = 9999;

/// A calendar month, 1 (January) through 12 (December).
///
/// # Examples
///
/// ```rust
/// use salesboard::domain::Month;
///
/// let march = Month::new(3).unwrap();
/// assert_eq!(march.number(), 3);
/// assert!(Month::new(13).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Month(u32);

impl Month {
    /// Returns `None` unless `number` is within 1..=12.
    #[must_use]
    pub const fn new(number: u32) -> Option<Self> {
        if number >= 1 && number <= 12 {
            Some(Self(number))
        } else {
            None
        }
    }

    #[must_use]
    pub const fn number(&self) -> u32 {
        self.0
    }

    /// The month after this one, and whether the year rolls over.
    #[must_use]
    pub const fn next(&self) -> (Self, bool) {
        if self.0 == 12 {
            (Self(1), true)
        } else {
            (Self(self.0 + 1), false)
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A month query: the calendar month plus an optional explicit year.
///
/// Without a year the month is looked up across the configured historical
/// [`YearRange`]; with one, only that year's month is considered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthSelection {
    pub month: Month,
    pub year: Option<i32>,
}

impl MonthSelection {
    #[must_use]
    pub const fn new(month: Month) -> Self {
        Self { month, year: None }
    }

    #[must_use]
    pub const fn in_year(month: Month, year: i32) -> Self {
        Self {
            month,
            year: Some(year),
        }
    }

    /// Resolves the selection into concrete date ranges.
    ///
    /// Returns `None` when the resulting window would be empty.
    #[must_use]
    pub fn window(&self, default_years: YearRange) -> Option<MonthWindow> {
        let years = match self.year {
            Some(year) => YearRange::single(year),
            None => default_years,
        };
        MonthWindow::new(self.month, years)
    }
}
