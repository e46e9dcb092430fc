use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use commons_core::error::CoreError;
use commons_db::StoreError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and [`StoreError`] for storage
/// failures, and adds HTTP-specific variants. Implements [`IntoResponse`] to
/// produce consistent `{ "error", "code" }` JSON bodies.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `commons_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// An error from either storage backend.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => classify_core_error(core),

            // --- Storage errors ---
            AppError::Store(store) => match store {
                StoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                StoreError::Rejected(core) => classify_core_error(core),
                StoreError::Database(err) => classify_sqlx_error(err),
                StoreError::Encode(err) => internal("Row encoding error", &err.to_string()),
                StoreError::Internal(msg) => internal("Storage error", msg),
            },

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => internal("Internal error", msg),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn classify_core_error(core: &CoreError) -> (StatusCode, &'static str, String) {
    match core {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            core.code(),
            format!("{entity} with id {id} not found"),
        ),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, core.code(), msg.clone()),
        CoreError::Conflict(msg) => (StatusCode::CONFLICT, core.code(), msg.clone()),
        CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, core.code(), msg.clone()),
        CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, core.code(), msg.clone()),
        CoreError::Internal(msg) => internal("Internal core error", msg),
    }
}

/// Log the real cause and hand back a sanitized 500.
fn internal(context: &'static str, detail: &str) -> (StatusCode, &'static str, String) {
    tracing::error!(error = %detail, "{context}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

/// Classify a sqlx error that survived the storage layer.
///
/// Unique violations were already turned into [`StoreError::Conflict`], so
/// only `RowNotFound` gets a non-500 status here.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        other => internal("Database error", &other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Extractor rejections
// ---------------------------------------------------------------------------

impl From<JsonRejection> for AppError {
    /// Malformed or mistyped bodies are validation failures; anything else
    /// about the body (content type, size) is a plain bad request.
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(_) | JsonRejection::JsonSyntaxError(_) => {
                AppError::Core(CoreError::Validation(rejection.body_text()))
            }
            other => AppError::BadRequest(other.body_text()),
        }
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(format!("Invalid path parameter: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Core(CoreError::Validation(rejection.body_text()))
    }
}
