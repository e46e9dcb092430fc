//! Local answers for a [`Connection`](crate::Connection) in simulate mode.
//!
//! Request bodies are validated exactly as the server would; a failure is
//! reported as the same 400 [`HttpFailure`] a live server returns.

use std::collections::BTreeMap;

use commons_core::error::CoreError;
use commons_core::pagination::{PageRequest, PageWindow};
use commons_core::validation::validate_dto;
use serde_json::json;
use validator::Validate;

use crate::error::{ClientError, HttpFailure};

/// A 400 failure in the server's `{ error, code }` shape.
pub fn validation_failure(message: impl Into<String>) -> ClientError {
    let mut headers = BTreeMap::new();
    headers.insert("content-type".to_string(), "application/json".to_string());
    ClientError::Http(HttpFailure::new(
        400,
        headers,
        json!({ "error": message.into(), "code": "VALIDATION_ERROR" }),
    ))
}

fn reject(err: CoreError) -> ClientError {
    match err {
        CoreError::Validation(message) => validation_failure(message),
        other => validation_failure(other.to_string()),
    }
}

/// Run the DTO's derived validation.
pub fn check_body<T: Validate>(body: &T) -> Result<(), ClientError> {
    validate_dto(body).map_err(reject)
}

/// Resolve paging input with the server's bounds.
pub fn check_paging(request: PageRequest) -> Result<PageWindow, ClientError> {
    request.resolve().map_err(reject)
}
