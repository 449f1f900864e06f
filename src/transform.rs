use jiff::civil::Date;

use crate::{
    error::TransformError,
    models::{DATE_ADDED, DURATION, RELEASE_YEAR, RawRow, TITLE, Title},
};

/// Seasons have no runtime in the catalog, so each counts as one hour.
pub const MINUTES_PER_SEASON: i32 = 60;

const DATE_FORMATS: [&str; 3] = ["%B %d, %Y", "%b %d, %Y", "%Y-%m-%d"];

pub fn transform_row(row: &RawRow, current_year: i32) -> Result<Title, TransformError> {
    let title = field(row, TITLE)?.trim().to_string();
    let duration = parse_duration(field(row, DURATION)?)?;
    let date_added = parse_date_added(field(row, DATE_ADDED)?)?;
    let release_year = parse_release_year(field(row, RELEASE_YEAR)?)?;

    Ok(Title {
        title,
        duration,
        date_added,
        release_year,
        content_age: content_age(current_year, release_year),
        fields: row.passthrough(),
    })
}

/// `"90 min"` -> 90, `"2 Seasons"` -> 120.
pub fn parse_duration(raw: &str) -> Result<i32, TransformError> {
    let invalid = || TransformError::InvalidDuration(raw.to_string());

    let amount: i32 = raw.split_whitespace().next().ok_or_else(invalid)?.parse().map_err(|_| invalid())?;

    if raw.contains("Season") {
        amount.checked_mul(MINUTES_PER_SEASON).ok_or_else(invalid)
    } else {
        Ok(amount)
    }
}

/// Blank means the catalog never recorded a date.
pub fn parse_date_added(raw: &str) -> Result<Option<Date>, TransformError> {
    let value = raw.trim();
    if value.is_empty() {
        return Ok(None);
    }

    DATE_FORMATS[1..]
        .iter()
        .fold(Date::strptime(DATE_FORMATS[0], value), |parsed, format| {
            parsed.or_else(|_| Date::strptime(format, value))
        })
        .map(Some)
        .map_err(|source| TransformError::InvalidDate { value: raw.to_string(), source })
}

pub fn parse_release_year(raw: &str) -> Result<i32, TransformError> {
    raw.trim().parse().map_err(|_| TransformError::InvalidReleaseYear(raw.to_string()))
}

/// Negative for titles released after `current_year`.
pub fn content_age(current_year: i32, release_year: i32) -> i32 {
    current_year - release_year
}

fn field<'a>(row: &'a RawRow, column: &'static str) -> Result<&'a str, TransformError> {
    row.get(column).ok_or(TransformError::MissingField(column))
}
