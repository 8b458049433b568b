//! Form-field normalization shared by all resources.

use crate::error::{DomainError, DomainResult};

/// A required text field: trimmed, and whitespace-only counts as missing.
pub fn required(field: &str, value: &str) -> DomainResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::required(field));
    }
    Ok(trimmed.to_string())
}

/// An optional free-text field (description, address).
///
/// Blank input becomes `None`; non-blank input is kept as submitted so
/// multi-line text survives untouched.
pub fn optional(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// An optional single-line field (image URL, location reference): trimmed,
/// blank becomes `None`.
pub fn optional_trimmed(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
