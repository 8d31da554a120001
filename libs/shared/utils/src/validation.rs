use chrono::{NaiveDate, NaiveTime};

use shared_models::error::AppError;

/// Runs after deserialization and before any handler logic.
pub trait Validate {
    fn validate(&self) -> Result<(), AppError>;
}

/// Calendar date in `YYYY-MM-DD` form.
pub fn parse_date(field: &str, value: &str) -> Result<NaiveDate, AppError> {
    let parsed = if value.len() == 10 {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
    } else {
        None
    };

    parsed.ok_or_else(|| {
        AppError::ValidationError(format!("{} must be a valid date in YYYY-MM-DD format, got '{}'", field, value))
    })
}

/// 24-hour time in `HH:MM` form. Slots are matched on the exact string, so
/// `9:00` is rejected rather than silently missing `09:00`.
pub fn parse_time(field: &str, value: &str) -> Result<NaiveTime, AppError> {
    let parsed = if value.len() == 5 {
        NaiveTime::parse_from_str(value, "%H:%M").ok()
    } else {
        None
    };

    parsed.ok_or_else(|| {
        AppError::ValidationError(format!("{} must be a valid time in HH:MM format, got '{}'", field, value))
    })
}

pub fn require_non_blank(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::ValidationError(format!("{} must not be empty", field)));
    }
    Ok(())
}

pub fn require_range(field: &str, value: i64, min: i64, max: i64) -> Result<(), AppError> {
    if value < min || value > max {
        return Err(AppError::ValidationError(format!(
            "{} must be between {} and {}, got {}",
            field, min, max, value
        )));
    }
    Ok(())
}
