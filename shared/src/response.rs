//! API Response types
//!
//! Every backend endpoint wraps its payload in the same envelope:
//! ```json
//! {
//!     "status": "OK",
//!     "message": "Reports loaded",
//!     "data": [ ... ]
//! }
//! ```
//! `message` is present on errors and informational replies, `data` only
//! when the call returns something.

use serde::{Deserialize, Serialize};

/// Envelope status as sent by the backend.
///
/// Only `OK`, `CREATED` and `UNAUTHORIZED` carry meaning on the client;
/// every other string is a generic failure whose message is shown verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ResponseStatus {
    Ok,
    Created,
    Unauthorized,
    Other(String),
}

impl ResponseStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Ok => "OK",
            Self::Created => "CREATED",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Other(s) => s,
        }
    }

    /// `OK` or `CREATED`
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Ok | Self::Created)
    }
}

impl From<String> for ResponseStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "OK" => Self::Ok,
            "CREATED" => Self::Created,
            "UNAUTHORIZED" => Self::Unauthorized,
            _ => Self::Other(s),
        }
    }
}

impl From<ResponseStatus> for String {
    fn from(status: ResponseStatus) -> Self {
        match status {
            ResponseStatus::Other(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for ResponseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unified API response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Response status (OK / CREATED / UNAUTHORIZED / anything else)
    pub status: ResponseStatus,
    /// Human-readable message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Response data (optional)
    #[serde(default = "Option::default", skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Create a successful response
    pub fn ok(data: T) -> Self {
        Self {
            status: ResponseStatus::Ok,
            message: None,
            data: Some(data),
        }
    }

    /// Create a `CREATED` response
    pub fn created(data: Option<T>) -> Self {
        Self {
            status: ResponseStatus::Created,
            message: None,
            data,
        }
    }

    /// Create an error response
    pub fn error(status: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::from(status.into()),
            message: Some(message.into()),
            data: None,
        }
    }

    /// Message text, or a fallback when the backend sent none
    pub fn message_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.message.as_deref().unwrap_or(fallback)
    }
}
