//! Results delivered to the UI thread
//!
//! Every background request finishes as exactly one [`DeskEvent`] (unless
//! it was superseded or cancelled). The UI renders `Ok` values and shows
//! [`DeskError::user_message`] for errors.

use shared::models::{AccessGroup, User};
use shared::types::{ReportId, UserId};

use crate::core::{DeskError, DeskResult};
use crate::views::{AgentOption, MainView, ReportDetails, ReportListing, UpdateOutcome};

#[derive(Debug)]
pub enum DeskEvent {
    LoggedIn(DeskResult<MainView>),
    ReportSubmitted(DeskResult<()>),
    ReportsLoaded(DeskResult<ReportListing>),
    ReportOpened(DeskResult<ReportDetails>),
    AgentsLoaded(DeskResult<Vec<AgentOption>>),
    AgentAssigned {
        report_id: ReportId,
        result: DeskResult<()>,
    },
    ReportUpdated {
        report_id: ReportId,
        result: DeskResult<UpdateOutcome>,
    },
    UsersLoaded(DeskResult<Vec<User>>),
    UserRegistered(DeskResult<()>),
    UserUpdated {
        user_id: UserId,
        result: DeskResult<UpdateOutcome>,
    },
    UserDeleted {
        user_id: UserId,
        result: DeskResult<()>,
    },
    AccessGroupsLoaded(DeskResult<Vec<AccessGroup>>),
}

impl DeskEvent {
    /// The failure carried by this event, if any
    pub fn error(&self) -> Option<&DeskError> {
        match self {
            DeskEvent::LoggedIn(r) => r.as_ref().err(),
            DeskEvent::ReportSubmitted(r)
            | DeskEvent::UserRegistered(r)
            | DeskEvent::AgentAssigned { result: r, .. }
            | DeskEvent::UserDeleted { result: r, .. } => r.as_ref().err(),
            DeskEvent::ReportsLoaded(r) => r.as_ref().err(),
            DeskEvent::ReportOpened(r) => r.as_ref().err(),
            DeskEvent::AgentsLoaded(r) => r.as_ref().err(),
            DeskEvent::ReportUpdated { result, .. } | DeskEvent::UserUpdated { result, .. } => {
                result.as_ref().err()
            }
            DeskEvent::UsersLoaded(r) => r.as_ref().err(),
            DeskEvent::AccessGroupsLoaded(r) => r.as_ref().err(),
        }
    }

    /// Dialog text for a failed request
    pub fn error_message(&self) -> Option<String> {
        self.error().map(DeskError::user_message)
    }
}
