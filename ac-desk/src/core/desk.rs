//! Desk shell
//!
//! Owns the gateway (and through it the session) plus the dispatcher. A GUI
//! calls the `start_*` methods from its event loop; each one returns at
//! once and the result arrives later as a [`DeskEvent`] on [`UiEvents`].

use std::sync::Arc;

use ac_client::{Capability, Gateway, GatewayClient, Permissions, SharedSession};
use shared::models::{AccessGroup, Report, ReportFilter, User};
use shared::types::{ReportId, UserId};

use super::config::DeskConfig;
use super::dispatch::{Dispatcher, RequestKey, UiEvents};
use super::error::{DeskError, DeskResult};
use crate::commands::{auth, reports, users};
use crate::events::DeskEvent;
use crate::forms::{ReportEdit, ReportForm, UserEdit};
use crate::views::UpdateOutcome;

#[derive(Clone)]
pub struct Desk {
    gateway: Arc<dyn Gateway>,
    dispatcher: Dispatcher<DeskEvent>,
}

impl std::fmt::Debug for Desk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Desk")
            .field("authenticated", &self.session().is_authenticated())
            .finish_non_exhaustive()
    }
}

impl Desk {
    pub fn new(gateway: Arc<dyn Gateway>) -> (Self, UiEvents<DeskEvent>) {
        let (dispatcher, events) = Dispatcher::new();
        (
            Self {
                gateway,
                dispatcher,
            },
            events,
        )
    }

    /// HTTP gateway with a fresh session
    pub fn connect(config: &DeskConfig) -> DeskResult<(Self, UiEvents<DeskEvent>)> {
        let gateway = GatewayClient::new(&config.client_config(), SharedSession::new())?;
        tracing::info!(server = gateway.base_url(), "Desk connected");
        Ok(Self::new(Arc::new(gateway)))
    }

    pub fn gateway(&self) -> &dyn Gateway {
        self.gateway.as_ref()
    }

    pub fn session(&self) -> &SharedSession {
        self.gateway.session()
    }

    pub fn permissions(&self) -> Permissions {
        Permissions::from_session(&self.session().snapshot())
    }

    pub fn require(&self, capability: Capability) -> DeskResult<()> {
        if self.permissions().allows(capability) {
            Ok(())
        } else {
            tracing::debug!(?capability, "Action refused by permission gate");
            Err(DeskError::NotPermitted(capability))
        }
    }

    pub fn dispatcher(&self) -> &Dispatcher<DeskEvent> {
        &self.dispatcher
    }

    /// Whether the control that starts `key` should be disabled
    pub fn is_busy(&self, key: RequestKey) -> bool {
        self.dispatcher.is_in_flight(key)
    }

    pub fn logout(&self) {
        auth::logout(self);
    }

    fn run<F, Fut>(&self, key: RequestKey, job: F)
    where
        F: FnOnce(Desk) -> Fut,
        Fut: std::future::Future<Output = DeskEvent> + Send + 'static,
    {
        self.dispatcher.spawn(key, job(self.clone()));
    }

    // ========== Auth ==========

    pub fn start_login(&self, username: String, password: String) {
        self.run(RequestKey::Login, |desk| async move {
            DeskEvent::LoggedIn(auth::login(&desk, &username, &password).await)
        });
    }

    // ========== Reports ==========

    /// Validation runs here, on the caller's thread: an invalid form is
    /// returned at once and nothing is dispatched. Clear the form when
    /// `ReportSubmitted(Ok)` arrives.
    pub fn start_submit_report(&self, form: &ReportForm) -> DeskResult<()> {
        let report = form.to_submission()?;
        self.run(RequestKey::SubmitReport, |desk| async move {
            DeskEvent::ReportSubmitted(reports::send_report(&desk, &report).await)
        });
        Ok(())
    }

    pub fn start_load_reports(&self) {
        self.run(RequestKey::LoadReports, |desk| async move {
            DeskEvent::ReportsLoaded(reports::load_reports(&desk).await)
        });
    }

    /// Shares the slot with [`Desk::start_load_reports`]: the newest query wins.
    pub fn start_filter_reports(&self, filter: ReportFilter) {
        self.run(RequestKey::LoadReports, |desk| async move {
            DeskEvent::ReportsLoaded(reports::filter_reports(&desk, &filter).await)
        });
    }

    /// Clear the filter form and reload everything.
    pub fn reset_filter(&self, filter: &mut ReportFilter) {
        *filter = ReportFilter::default();
        self.start_load_reports();
    }

    pub fn start_open_report(&self, id: ReportId) {
        self.run(RequestKey::OpenReport, |desk| async move {
            DeskEvent::ReportOpened(reports::open_report(&desk, id).await)
        });
    }

    pub fn start_load_agents(&self) {
        self.run(RequestKey::LoadAgents, |desk| async move {
            DeskEvent::AgentsLoaded(reports::load_agents(&desk).await)
        });
    }

    pub fn start_assign_agent(&self, report_id: ReportId, agent_id: UserId) {
        self.run(RequestKey::AssignReport(report_id), |desk| async move {
            DeskEvent::AgentAssigned {
                report_id,
                result: reports::assign_agent(&desk, report_id, agent_id).await,
            }
        });
    }

    pub fn start_take_to_work(&self, report_id: ReportId) {
        self.run(RequestKey::ReportStatus(report_id), |desk| async move {
            DeskEvent::ReportUpdated {
                report_id,
                result: reports::take_to_work(&desk, report_id).await,
            }
        });
    }

    pub fn start_close_report(&self, report_id: ReportId) {
        self.run(RequestKey::ReportStatus(report_id), |desk| async move {
            DeskEvent::ReportUpdated {
                report_id,
                result: reports::close_report(&desk, report_id).await,
            }
        });
    }

    pub fn start_save_solution(&self, report_id: ReportId, solution: String) {
        self.run(RequestKey::SaveSolution(report_id), |desk| async move {
            DeskEvent::ReportUpdated {
                report_id,
                result: reports::save_solution(&desk, report_id, &solution).await,
            }
        });
    }

    pub fn start_save_report_edit(&self, original: Report, edit: ReportEdit) -> DeskResult<()> {
        let report_id = original
            .id
            .ok_or_else(|| DeskError::InvalidInput("The report has no id.".into()))?;
        self.run(RequestKey::EditReport(report_id), |desk| async move {
            DeskEvent::ReportUpdated {
                report_id,
                result: reports::save_report_edit(&desk, &original, &edit).await,
            }
        });
        Ok(())
    }

    // ========== Users ==========

    pub fn start_load_users(&self) {
        self.run(RequestKey::LoadUsers, |desk| async move {
            DeskEvent::UsersLoaded(users::load_users(&desk).await)
        });
    }

    pub fn start_load_access_groups(&self) {
        self.run(RequestKey::LoadAccessGroups, |desk| async move {
            DeskEvent::AccessGroupsLoaded(users::load_access_groups(&desk).await)
        });
    }

    pub fn start_register_user(&self, username: String, password: String) {
        self.run(RequestKey::RegisterUser, |desk| async move {
            DeskEvent::UserRegistered(users::register_user(&desk, &username, &password).await)
        });
    }

    pub fn start_update_password(&self, user_id: UserId, new_password: String) {
        self.run(RequestKey::UpdatePassword(user_id), |desk| async move {
            DeskEvent::UserUpdated {
                user_id,
                result: users::update_password(&desk, user_id, &new_password)
                    .await
                    .map(|()| UpdateOutcome::Saved { fields: 1 }),
            }
        });
    }

    pub fn start_delete_user(&self, user_id: UserId, confirmed: bool) {
        self.run(RequestKey::DeleteUser(user_id), |desk| async move {
            DeskEvent::UserDeleted {
                user_id,
                result: users::delete_user(&desk, user_id, confirmed).await,
            }
        });
    }

    pub fn start_save_user(
        &self,
        original: User,
        edit: UserEdit,
        catalog: Vec<AccessGroup>,
    ) -> DeskResult<()> {
        let user_id = original
            .id
            .ok_or_else(|| DeskError::InvalidInput("The user has no id.".into()))?;
        self.run(RequestKey::SaveUser(user_id), |desk| async move {
            DeskEvent::UserUpdated {
                user_id,
                result: users::save_user_edit(&desk, &original, &edit, &catalog).await,
            }
        });
        Ok(())
    }
}
