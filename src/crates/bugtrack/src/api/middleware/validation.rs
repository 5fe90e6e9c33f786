//! Request validation utilities
//!
//! All failures are [`ApiError::ValidationError`] (422).

use crate::api::error::{ApiError, ApiResult};
use crate::db::models::{MAX_SEVERITY, MIN_SEVERITY};

/// Longest accepted bug title, in characters
pub const MAX_TITLE_LEN: usize = 255;

/// Longest accepted username, in characters
pub const MAX_USERNAME_LEN: usize = 64;

/// Validate that a required string field is not blank
pub fn validate_not_empty(value: &str, field_name: &str) -> ApiResult<()> {
    if value.trim().is_empty() {
        return Err(ApiError::ValidationError(format!("{} cannot be empty", field_name)));
    }
    Ok(())
}

/// Validate string length in characters
pub fn validate_string_length(value: &str, field_name: &str, min: usize, max: usize) -> ApiResult<()> {
    let len = value.chars().count();
    if len < min || len > max {
        return Err(ApiError::ValidationError(format!(
            "{} must be between {} and {} characters",
            field_name, min, max
        )));
    }
    Ok(())
}

/// Validate a bug title
pub fn validate_title(title: &str) -> ApiResult<()> {
    validate_not_empty(title, "title")?;
    validate_string_length(title.trim(), "title", 1, MAX_TITLE_LEN)
}

/// Validate a severity level
pub fn validate_severity(severity: u8) -> ApiResult<()> {
    if !(MIN_SEVERITY..=MAX_SEVERITY).contains(&severity) {
        return Err(ApiError::ValidationError(format!(
            "severity must be between {} and {}",
            MIN_SEVERITY, MAX_SEVERITY
        )));
    }
    Ok(())
}

/// Validate a username: no whitespace, bounded length
pub fn validate_username(username: &str) -> ApiResult<()> {
    validate_not_empty(username, "username")?;
    validate_string_length(username.trim(), "username", 1, MAX_USERNAME_LEN)?;
    if username.trim().chars().any(char::is_whitespace) {
        return Err(ApiError::ValidationError(
            "username cannot contain whitespace".to_string(),
        ));
    }
    Ok(())
}
