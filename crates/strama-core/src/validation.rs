//! Input validation for console forms and filters
//!
//! Validates instance names and filter values before they reach the
//! control plane. Failing values surface as inline form errors, never
//! as user-visible panics.

use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum instance name length accepted by the control plane
pub const MAX_INSTANCE_NAME_LENGTH: usize = 32;

/// Maximum length for a single filter value
pub const MAX_FILTER_VALUE_LENGTH: usize = 64;

/// Instance names: lowercase alphanumeric and hyphens, must start with a
/// letter and must not end with a hyphen
static INSTANCE_NAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z]([a-z0-9-]*[a-z0-9])?$").unwrap());

/// Filter values: alphanumeric plus dot, underscore, hyphen and the `%`
/// wildcard used by partial matches
static FILTER_VALUE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9._%-]+$").unwrap());

/// Validation error type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Name is empty
    EmptyName,
    /// Name is too long
    NameTooLong { len: usize, max: usize },
    /// Name contains invalid characters
    InvalidName { name: String, reason: &'static str },
    /// Filter value is empty
    EmptyValue,
    /// Filter value is too long
    ValueTooLong { len: usize, max: usize },
    /// Filter value contains invalid characters
    InvalidValue { value: String, reason: &'static str },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Name cannot be empty"),
            Self::NameTooLong { len, max } => {
                write!(f, "Name too long: {} chars (max: {})", len, max)
            }
            Self::InvalidName { name, reason } => {
                write!(f, "Invalid name '{}': {}", name, reason)
            }
            Self::EmptyValue => write!(f, "Filter value cannot be empty"),
            Self::ValueTooLong { len, max } => {
                write!(f, "Filter value too long: {} chars (max: {})", len, max)
            }
            Self::InvalidValue { value, reason } => {
                write!(f, "Invalid filter value '{}': {}", value, reason)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate an instance name before submission.
///
/// Names follow cluster naming conventions:
/// - Must start with a lowercase letter
/// - Can contain lowercase alphanumerics and hyphens
/// - Must not end with a hyphen
/// - Maximum 32 characters
pub fn validate_instance_name(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }

    if name.len() > MAX_INSTANCE_NAME_LENGTH {
        return Err(ValidationError::NameTooLong {
            len: name.len(),
            max: MAX_INSTANCE_NAME_LENGTH,
        });
    }

    if !INSTANCE_NAME_REGEX.is_match(name) {
        return Err(ValidationError::InvalidName {
            name: name.to_string(),
            reason: "must start with a lowercase letter and contain only lowercase alphanumerics and hyphens",
        });
    }

    Ok(())
}

/// Validate a candidate text-filter value before it is committed.
pub fn validate_filter_value(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::EmptyValue);
    }

    if value.len() > MAX_FILTER_VALUE_LENGTH {
        return Err(ValidationError::ValueTooLong {
            len: value.len(),
            max: MAX_FILTER_VALUE_LENGTH,
        });
    }

    if !FILTER_VALUE_REGEX.is_match(value) {
        return Err(ValidationError::InvalidValue {
            value: value.to_string(),
            reason: "must contain only alphanumerics, dots, underscores, hyphens and %",
        });
    }

    Ok(())
}

/// Sanitize a server-supplied string for safe logging (strip control
/// characters, truncate).
pub fn sanitize_for_log(s: &str, max_len: usize) -> String {
    let mut chars = s.chars().filter(|c| !c.is_control());
    let sanitized: String = chars.by_ref().take(max_len).collect();

    // Ellipsis only when sanitized content was actually cut off, so
    // stripped control characters and multibyte encodings never count
    // toward the cap.
    if chars.next().is_some() {
        format!("{}...", sanitized)
    } else {
        sanitized
    }
}
