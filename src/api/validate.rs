//! Client-side input checks run before a write reaches the backend

use crate::error::ValidationError;
use regex::Regex;
use std::sync::LazyLock;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\w\-.]+@([\w-]+\.)+[\w-]{2,}$").expect("email pattern is valid")
});

/// Trimmed, non-empty text
pub fn required(field: &'static str, input: &str) -> Result<String, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    Ok(trimmed.to_string())
}

/// Positive whole number typed by the user
pub fn positive_number(field: &'static str, input: &str) -> Result<u32, ValidationError> {
    let trimmed = required(field, input)?;
    match trimmed.parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ValidationError::NotANumber {
            field,
            value: trimmed,
        }),
    }
}

/// Reject `value` if it is already among `existing`
pub fn unique(
    field: &'static str,
    value: u32,
    mut existing: impl Iterator<Item = u32>,
) -> Result<u32, ValidationError> {
    if existing.any(|n| n == value) {
        return Err(ValidationError::Duplicate { field, value });
    }
    Ok(value)
}

/// Syntactically plausible email address
pub fn email(input: &str) -> Result<String, ValidationError> {
    let trimmed = required("email", input)?;
    if !EMAIL_PATTERN.is_match(&trimmed) {
        return Err(ValidationError::InvalidEmail(trimmed));
    }
    Ok(trimmed)
}
