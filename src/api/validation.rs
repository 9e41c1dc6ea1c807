//! Query-string validation. Every check here runs before any store access.

use super::ApiError;
use crate::domain::{MAX_YEAR, MIN_YEAR, Month, MonthSelection};

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_PER_PAGE: u64 = 10;
pub const MAX_PER_PAGE: u64 = 100;

/// Treats absent and blank parameters alike.
fn present(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

pub fn validate_month(raw: Option<&str>) -> Result<Month, ApiError> {
    let raw = present(raw).ok_or_else(|| ApiError::validation("month is required"))?;

    raw.parse::<u32>()
        .ok()
        .and_then(Month::new)
        .ok_or_else(|| {
            ApiError::validation(format!(
                "Invalid month: {}. Month must be an integer between 1 and 12",
                raw
            ))
        })
}

pub fn validate_year(raw: Option<&str>) -> Result<Option<i32>, ApiError> {
    let Some(raw) = present(raw) else {
        return Ok(None);
    };

    match raw.parse::<i32>() {
        Ok(year) if (MIN_YEAR..=MAX_YEAR).contains(&year) => Ok(Some(year)),
        _ => Err(ApiError::validation(format!(
            "Invalid year: {}. Year must be between {} and {}",
            raw, MIN_YEAR, MAX_YEAR
        ))),
    }
}

/// A required month with an optional year.
pub fn validate_month_selection(
    month: Option<&str>,
    year: Option<&str>,
) -> Result<MonthSelection, ApiError> {
    let month = validate_month(month)?;
    Ok(match validate_year(year)? {
        Some(year) => MonthSelection::in_year(month, year),
        None => MonthSelection::new(month),
    })
}

/// Like [`validate_month_selection`] but a missing month means "no month
/// filter". A year without a month is rejected.
pub fn validate_optional_month_selection(
    month: Option<&str>,
    year: Option<&str>,
) -> Result<Option<MonthSelection>, ApiError> {
    if present(month).is_none() {
        if present(year).is_some() {
            return Err(ApiError::validation("year requires month"));
        }
        return Ok(None);
    }

    validate_month_selection(month, year).map(Some)
}

pub fn validate_page(raw: Option<&str>) -> Result<u64, ApiError> {
    let Some(raw) = present(raw) else {
        return Ok(DEFAULT_PAGE);
    };

    match raw.parse::<u64>() {
        Ok(page) if page >= 1 => Ok(page),
        _ => Err(ApiError::validation(format!(
            "Invalid page: {}. Page must be a positive integer",
            raw
        ))),
    }
}

pub fn validate_per_page(raw: Option<&str>) -> Result<u64, ApiError> {
    let Some(raw) = present(raw) else {
        return Ok(DEFAULT_PER_PAGE);
    };

    match raw.parse::<u64>() {
        Ok(per_page) if (1..=MAX_PER_PAGE).contains(&per_page) => Ok(per_page),
        _ => Err(ApiError::validation(format!(
            "Invalid perPage: {}. perPage must be between 1 and {}",
            raw, MAX_PER_PAGE
        ))),
    }
}
