//! Field validation shared by the store and the API.

use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

/// Lowest planning year accepted for a schedule.
pub const MIN_YEAR: i64 = 2020;

/// Highest planning year accepted for a schedule.
pub const MAX_YEAR: i64 = 2100;

/// A field failed validation. The message is shown to users as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Result alias for validation helpers.
pub type Validated<T> = std::result::Result<T, ValidationError>;

/// Trims `value` and checks it is non-empty and at most `max` characters.
pub fn required_text(field: &str, value: &str, max: usize) -> Validated<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.chars().count() > max {
        return Err(ValidationError(format!(
            "{field} is required and must be 1-{max} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Checks an optional free-text field against a length limit.
pub fn optional_text(field: &str, value: Option<String>, max: usize) -> Validated<Option<String>> {
    match value {
        Some(v) if v.chars().count() > max => Err(ValidationError(format!(
            "{field} must be at most {max} characters"
        ))),
        other => Ok(other),
    }
}

/// Validates a zero-based month index.
pub fn month(field: &str, value: i64) -> Validated<u8> {
    if !(0..=11).contains(&value) {
        return Err(ValidationError(format!("{field} must be 0-11")));
    }
    Ok(value as u8)
}

/// Validates a planning year.
pub fn year(value: i64) -> Validated<i32> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&value) {
        return Err(ValidationError(format!(
            "year must be between {MIN_YEAR} and {MAX_YEAR}"
        )));
    }
    Ok(value as i32)
}

/// Checks the schedule ordering invariant.
pub fn month_span(start_month: u8, end_month: u8) -> Validated<()> {
    if start_month > end_month {
        return Err(ValidationError::new("Start month must be <= end month"));
    }
    Ok(())
}

/// Validates a `#RRGGBB` colour.
pub fn hex_color(value: &str) -> Validated<String> {
    static HEX: OnceLock<Regex> = OnceLock::new();
    let re = HEX.get_or_init(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("static regex"));
    let trimmed = value.trim();
    if !re.is_match(trimmed) {
        return Err(ValidationError::new(
            "Color must be a valid hex color (e.g., #FF5733)",
        ));
    }
    Ok(trimmed.to_string())
}
