//! The error taxonomy every layer reports in.
//!
//! Four kinds reach API callers: validation, authorization (split into
//! [`Unauthorized`](CoreError::Unauthorized) and
//! [`Forbidden`](CoreError::Forbidden)), not-found and conflict.
//! [`Internal`](CoreError::Internal) never leaves the server with its detail.

use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// No row with this id, or a soft-deleted one where a live row is required.
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// A request DTO, paging value or stored-row invariant was rejected.
    /// The message lists `field: reason` pairs.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A unique key is already held by another live row.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Missing or unverifiable bearer token on an admin-scoped resource.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Valid token without the `admin` role.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// A validation failure pinned to one field, rendered `field: message`.
    pub fn field(field: &str, message: impl std::fmt::Display) -> Self {
        Self::Validation(format!("{field}: {message}"))
    }

    /// Stable machine-readable code sent in the `code` member of error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}
