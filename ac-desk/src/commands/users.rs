//! Admin screen

use ac_client::Capability;
use shared::models::{AccessGroup, User};
use shared::types::UserId;

use crate::core::{Desk, DeskError, DeskResult};
use crate::forms::{UserEdit, build_user_change_set};
use crate::views::UpdateOutcome;

pub async fn load_users(desk: &Desk) -> DeskResult<Vec<User>> {
    desk.require(Capability::AdministerUsers)?;
    Ok(desk.gateway().list_users().await?)
}

/// Catalog for the user editor's group picker
pub async fn load_access_groups(desk: &Desk) -> DeskResult<Vec<AccessGroup>> {
    desk.require(Capability::AdministerUsers)?;
    Ok(desk.gateway().list_access_groups().await?)
}

/// Deletion needs the caller to pass the user's explicit confirmation.
pub async fn delete_user(desk: &Desk, id: UserId, confirmed: bool) -> DeskResult<()> {
    desk.require(Capability::AdministerUsers)?;
    if !confirmed {
        return Err(DeskError::ConfirmationRequired);
    }
    desk.gateway().delete_user(id).await?;
    Ok(())
}

pub async fn register_user(desk: &Desk, username: &str, password: &str) -> DeskResult<()> {
    desk.require(Capability::AdministerUsers)?;
    if username.trim().is_empty() || password.is_empty() {
        return Err(DeskError::InvalidInput(
            "Enter a username and a password.".into(),
        ));
    }
    desk.gateway().register(username, password).await?;
    Ok(())
}

pub async fn update_password(desk: &Desk, id: UserId, new_password: &str) -> DeskResult<()> {
    desk.require(Capability::AdministerUsers)?;
    if new_password.is_empty() {
        return Err(DeskError::InvalidInput("Enter the new password.".into()));
    }
    desk.gateway().update_password(id, new_password).await?;
    Ok(())
}

/// Diff the editor against the loaded user and send only the changes.
///
/// Nothing is sent when the numbers don't parse or nothing changed.
pub async fn save_user_edit(
    desk: &Desk,
    original: &User,
    edit: &UserEdit,
    catalog: &[AccessGroup],
) -> DeskResult<UpdateOutcome> {
    desk.require(Capability::AdministerUsers)?;
    let id = original
        .id
        .ok_or_else(|| DeskError::InvalidInput("The user has no id.".into()))?;

    let changes = build_user_change_set(original, edit, catalog)?;
    if changes.is_empty() {
        tracing::debug!(user_id = id, "No user changes to save");
        return Ok(UpdateOutcome::NoChanges);
    }
    desk.gateway().update_user(id, changes.as_json()).await?;
    Ok(UpdateOutcome::Saved {
        fields: changes.len(),
    })
}
