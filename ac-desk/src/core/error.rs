//! Desk error type
//!
//! Every command returns `Result<_, DeskError>`; [`DeskError::user_message`]
//! is the text the UI puts in front of the user.

use ac_client::{ACCESS_REQUEST_MESSAGE, Capability, ClientError, ErrorCategory};
use thiserror::Error;

use crate::forms::{ChangeSetError, ReportFormError};

pub const CONNECTION_ERROR_MESSAGE: &str =
    "Could not reach the server. Check the connection and try again.";
pub const RESPONSE_ERROR_MESSAGE: &str = "Error processing the server response.";

#[derive(Debug, Error)]
pub enum DeskError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Form(#[from] ReportFormError),

    #[error(transparent)]
    ChangeSet(#[from] ChangeSetError),

    /// Rejected credentials; carries the backend's message
    #[error("{0}")]
    LoginFailed(String),

    /// Local permission gate refused the action
    #[error("Not permitted: {0:?}")]
    NotPermitted(Capability),

    /// Destructive action without explicit confirmation
    #[error("Confirm the action before continuing.")]
    ConfirmationRequired,

    #[error("{0}")]
    InvalidInput(String),
}

impl DeskError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            DeskError::Client(e) => e.category(),
            DeskError::LoginFailed(_) | DeskError::NotPermitted(_) => ErrorCategory::Authorization,
            DeskError::Form(_)
            | DeskError::ChangeSet(_)
            | DeskError::ConfirmationRequired
            | DeskError::InvalidInput(_) => ErrorCategory::Validation,
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            DeskError::LoginFailed(message) => message.clone(),
            _ => match self.category() {
                ErrorCategory::Transport => CONNECTION_ERROR_MESSAGE.to_string(),
                ErrorCategory::MalformedResponse => RESPONSE_ERROR_MESSAGE.to_string(),
                ErrorCategory::Authorization => ACCESS_REQUEST_MESSAGE.to_string(),
                ErrorCategory::Validation | ErrorCategory::Backend => self.to_string(),
            },
        }
    }
}

pub type DeskResult<T> = Result<T, DeskError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_follow_category() {
        let backend = DeskError::from(ClientError::Api {
            status: "CONFLICT".into(),
            message: "Report already closed".into(),
        });
        assert_eq!(backend.user_message(), "Report already closed");

        let malformed = DeskError::from(ClientError::InvalidResponse("no data".into()));
        assert_eq!(malformed.user_message(), RESPONSE_ERROR_MESSAGE);

        let unauthorized = DeskError::from(ClientError::Unauthorized("expired".into()));
        assert_eq!(unauthorized.user_message(), ACCESS_REQUEST_MESSAGE);
        assert_eq!(
            DeskError::from(ClientError::NotAuthenticated).user_message(),
            ACCESS_REQUEST_MESSAGE
        );

        let form = DeskError::from(ReportFormError::InvalidTime);
        assert_eq!(form.category(), ErrorCategory::Validation);
        assert_eq!(form.user_message(), ReportFormError::InvalidTime.to_string());
    }

    #[test]
    fn login_failure_is_verbatim() {
        let err = DeskError::LoginFailed("Invalid username or password".into());
        assert_eq!(err.user_message(), "Invalid username or password");
        assert_eq!(err.category(), ErrorCategory::Authorization);
    }
}
