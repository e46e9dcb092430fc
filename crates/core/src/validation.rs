//! DTO validation helpers.
//!
//! Request DTOs derive [`validator::Validate`]; this module turns the derive's
//! error tree into a [`CoreError::Validation`] and provides the custom field
//! and schema checks the DTOs reference by path.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::CoreError;
use crate::types::Timestamp;

/// Machine keys (configuration keys, setting keys): lowercase, starting with a
/// letter, then letters, digits, `_`, `.` or `-`.
static KEY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z][a-z0-9_.\-]{0,127}$").unwrap_or_else(|e| panic!("bad key pattern: {e}"))
});

/// Run the derived validation of a DTO.
pub fn validate_dto<T: Validate>(dto: &T) -> Result<(), CoreError> {
    dto.validate()
        .map_err(|errors| CoreError::Validation(describe(&errors)))
}

/// Flatten a validation error tree into a stable `field: message; ...` string.
pub fn describe(errors: &ValidationErrors) -> String {
    let mut parts: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            let field = if field == "__all__" {
                "request".to_string()
            } else {
                field.to_string()
            };
            errs.iter()
                .map(move |e| {
                    let message = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string());
                    format!("{field}: {message}")
                })
                .collect::<Vec<_>>()
        })
        .collect();
    parts.sort();
    parts.join("; ")
}

/// Report a failed check on a stored row in the same `field: message` form
/// as [`describe`].
pub fn check_field(field: &str, result: Result<(), ValidationError>) -> Result<(), CoreError> {
    result.map_err(|e| {
        let message = e
            .message
            .map(|m| m.to_string())
            .unwrap_or_else(|| e.code.to_string());
        CoreError::field(field, message)
    })
}

fn error(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

// ---------------------------------------------------------------------------
// Field checks (`#[validate(custom(function = ...))]`)
// ---------------------------------------------------------------------------

/// Reject empty or whitespace-only text.
pub fn non_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(error("blank", "must not be blank"));
    }
    Ok(())
}

/// Require a machine key shape (see [`KEY_PATTERN`]).
pub fn machine_key(value: &str) -> Result<(), ValidationError> {
    if !KEY_PATTERN.is_match(value) {
        return Err(error(
            "key_format",
            "must be lowercase, start with a letter and contain only [a-z0-9_.-]",
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Cross-field checks (`#[validate(schema(function = ...))]` helpers)
// ---------------------------------------------------------------------------

/// Require `end` to fall strictly after `start`.
pub fn ordered_window(start: Timestamp, end: Timestamp) -> Result<(), ValidationError> {
    if end <= start {
        return Err(error("window", "end must be after start"));
    }
    Ok(())
}
