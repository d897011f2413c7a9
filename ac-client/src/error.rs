//! Client error types

use thiserror::Error;

use crate::token::TokenError;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed (connection refused, TLS failure, timeout)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Bearer token could not be decoded
    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    /// Backend answered `UNAUTHORIZED`
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// No token in the session, nothing was sent
    #[error("Authentication required")]
    NotAuthenticated,

    /// Any other envelope status; message is the backend's text
    #[error("{message}")]
    Api { status: String, message: String },

    /// Partial update with no fields, nothing was sent
    #[error("No changes to save")]
    EmptyUpdate,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Coarse error classes the UI reacts to differently
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Network/transport failure, shown as a connection error dialog
    Transport,
    /// Unexpected JSON shape or missing field
    MalformedResponse,
    /// Client-side validation, request never sent
    Validation,
    /// Unauthorized or no token, shown as an access-request prompt
    Authorization,
    /// Backend returned a failure status with a message
    Backend,
}

impl ClientError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ClientError::Http(e) if e.is_decode() => ErrorCategory::MalformedResponse,
            ClientError::Http(_) | ClientError::Config(_) => ErrorCategory::Transport,
            ClientError::InvalidResponse(_)
            | ClientError::Serialization(_)
            | ClientError::Token(_) => ErrorCategory::MalformedResponse,
            ClientError::Unauthorized(_) | ClientError::NotAuthenticated => {
                ErrorCategory::Authorization
            }
            ClientError::EmptyUpdate => ErrorCategory::Validation,
            ClientError::Api { .. } => ErrorCategory::Backend,
        }
    }

    pub fn is_authorization(&self) -> bool {
        self.category() == ErrorCategory::Authorization
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
