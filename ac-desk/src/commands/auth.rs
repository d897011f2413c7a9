//! Login / logout

use ac_client::ClientError;

use crate::core::{Desk, DeskError, DeskResult};
use crate::views::MainView;

/// Log in and describe the main window the user gets.
///
/// Rejected credentials come back as [`DeskError::LoginFailed`] carrying
/// the backend's message.
pub async fn login(desk: &Desk, username: &str, password: &str) -> DeskResult<MainView> {
    if username.trim().is_empty() || password.is_empty() {
        return Err(DeskError::InvalidInput(
            "Enter a username and a password.".into(),
        ));
    }

    match desk.gateway().login(username, password).await {
        Ok(outcome) => {
            tracing::info!(username = %outcome.username, "Login succeeded");
            Ok(main_view(desk))
        }
        Err(ClientError::Unauthorized(message)) | Err(ClientError::Api { message, .. }) => {
            tracing::warn!(username, "Login rejected");
            Err(DeskError::LoginFailed(message))
        }
        Err(e) => {
            tracing::error!(username, error = %e, "Login failed");
            Err(e.into())
        }
    }
}

/// Main window for the current session
pub fn main_view(desk: &Desk) -> MainView {
    MainView::new(desk.session().username(), &desk.permissions())
}

/// Drop in-flight requests and clear the session.
pub fn logout(desk: &Desk) {
    desk.dispatcher().cancel_all();
    desk.gateway().logout();
}
