use std::collections::BTreeMap;

use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};

/// A non-2xx response, normalized.
///
/// `data` holds the decoded JSON error body when there is one
/// (`{ "error", "code" }` from the server), the raw text otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpFailure {
    /// Always `false`.
    pub success: bool,
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    pub data: serde_json::Value,
}

impl HttpFailure {
    pub fn new(status: u16, headers: BTreeMap<String, String>, data: serde_json::Value) -> Self {
        Self {
            success: false,
            status,
            headers,
            data,
        }
    }

    /// The server's error code (`"NOT_FOUND"`, `"CONFLICT"`, ...), if present.
    pub fn code(&self) -> Option<&str> {
        self.data.get("code").and_then(|c| c.as_str())
    }

    /// The human-readable error message, if present.
    pub fn message(&self) -> Option<&str> {
        self.data.get("error").and_then(|m| m.as_str())
    }
}

/// Flatten response headers; values that are not visible ASCII are skipped.
pub(crate) fn header_map(headers: &HeaderMap) -> BTreeMap<String, String> {
    headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect()
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP {}: {}", .0.status, .0.message().unwrap_or("request failed"))]
    Http(HttpFailure),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid header: {0}")]
    InvalidHeader(String),
}

impl ClientError {
    /// The normalized failure, for HTTP-level errors.
    pub fn as_http(&self) -> Option<&HttpFailure> {
        match self {
            ClientError::Http(failure) => Some(failure),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        self.as_http().map(|f| f.status)
    }
}
