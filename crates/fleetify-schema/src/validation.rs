//! SQL identifier validation.
//!
//! Table names arrive from the command line and are substituted into
//! generated SQL text and seed `INSERT` statements, so they are checked
//! against a conservative allow-list first.
//!
//! # Validation Rules
//!
//! - First character: ASCII letter or underscore
//! - Remaining characters: ASCII letters, digits or underscores
//! - Length between 1 and [`IDENTIFIER_MAX_LEN`] bytes

use crate::error::SchemaError;

/// Longest identifier PostgreSQL keeps without truncation.
pub const IDENTIFIER_MAX_LEN: usize = 63;

/// Returns `true` when `value` is a plain unquoted SQL identifier.
///
/// # Examples
///
/// ```
/// use fleetify_schema::is_valid_identifier;
///
/// assert!(is_valid_identifier("purchasing_details"));
/// assert!(is_valid_identifier("_audit"));
/// assert!(!is_valid_identifier("1items"));
/// assert!(!is_valid_identifier("items; DROP TABLE users"));
/// assert!(!is_valid_identifier(""));
/// ```
#[must_use]
pub fn is_valid_identifier(value: &str) -> bool {
    if value.is_empty() || value.len() > IDENTIFIER_MAX_LEN {
        return false;
    }
    let mut chars = value.chars();
    let first_ok = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    first_ok && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Validates an identifier, returning it unchanged on success.
///
/// # Errors
///
/// Returns [`SchemaError::InvalidIdentifier`] when the value fails
/// [`is_valid_identifier`].
pub fn validate_identifier(value: &str) -> Result<&str, SchemaError> {
    if is_valid_identifier(value) {
        Ok(value)
    } else {
        Err(SchemaError::InvalidIdentifier {
            value: value.to_owned(),
        })
    }
}
