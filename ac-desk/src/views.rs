//! View-models the GUI layer binds to

use ac_client::{ACCESS_REQUEST_MESSAGE, Capability, Group, Permissions, Screen};
use shared::models::{Report, User};
use shared::types::UserId;

use crate::forms::ReportEdit;

/// Main window after login
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MainView {
    pub username: Option<String>,
    /// Tabs to show, in order
    pub screens: Vec<Screen>,
    /// Shown instead of the tabs when the user has no tab group
    pub access_message: Option<&'static str>,
}

impl MainView {
    pub fn new(username: Option<String>, permissions: &Permissions) -> Self {
        Self {
            username,
            screens: permissions.visible_screens(),
            access_message: permissions
                .needs_access_request()
                .then_some(ACCESS_REQUEST_MESSAGE),
        }
    }
}

/// Entry of the assign-agent picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentOption {
    pub id: UserId,
    pub label: String,
}

/// Agents that may take a report: users holding SolveReport, with an id.
pub fn agents_for_assignment(users: &[User]) -> Vec<AgentOption> {
    users
        .iter()
        .filter(|u| u.has_group(Group::SolveReport.as_str()))
        .filter_map(|u| {
            u.id.map(|id| AgentOption {
                id,
                label: u.display_label(),
            })
        })
        .collect()
}

/// Review tab contents
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportListing {
    pub reports: Vec<Report>,
    /// The "assigned to" column is only shown to users who can assign.
    pub show_assignee_column: bool,
    pub can_assign: bool,
    /// Filled only when `can_assign`
    pub agents: Vec<AgentOption>,
}

impl ReportListing {
    pub fn count(&self) -> usize {
        self.reports.len()
    }
}

/// Report details dialog
#[derive(Debug, Clone, PartialEq)]
pub struct ReportDetails {
    pub report: Report,
    pub edit: ReportEdit,
    pub can_edit_all: bool,
    /// Take to work, close and save solution
    pub can_work: bool,
    pub can_assign: bool,
}

impl ReportDetails {
    pub fn new(report: Report, permissions: &Permissions) -> Self {
        Self {
            edit: ReportEdit::from_report(&report),
            report,
            can_edit_all: permissions.allows(Capability::EditAllReportFields),
            can_work: can_work_reports(permissions),
            can_assign: permissions.allows(Capability::AssignAgentToReport),
        }
    }
}

pub fn can_work_reports(permissions: &Permissions) -> bool {
    permissions.allows(Capability::EditSolutionOnly)
        || permissions.allows(Capability::EditAllReportFields)
}

/// Result of a save
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Saved { fields: usize },
    /// Empty change-set; nothing was sent
    NoChanges,
}

impl UpdateOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            UpdateOutcome::Saved { .. } => "Changes saved.",
            UpdateOutcome::NoChanges => "No changes to save.",
        }
    }
}

#[cfg(test)]
mod tests {
    use shared::models::AccessGroup;

    use super::*;

    fn user(id: Option<i64>, username: &str, groups: &[&str]) -> User {
        User {
            id,
            username: username.into(),
            last_name: Some("Sidorov".into()),
            first_name: Some("Petr".into()),
            groups: groups
                .iter()
                .enumerate()
                .map(|(i, g)| AccessGroup::new(i as i64, *g))
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn only_solvers_with_ids_are_agents() {
        let users = vec![
            user(Some(1), "solver", &["ViewReport", "SolveReport"]),
            user(Some(2), "viewer", &["ViewReport"]),
            user(None, "ghost", &["SolveReport"]),
        ];
        assert_eq!(
            agents_for_assignment(&users),
            vec![AgentOption {
                id: 1,
                label: "Sidorov Petr (solver)".into()
            }]
        );
    }

    #[test]
    fn main_view_for_creator_hides_admin() {
        let perms = Permissions::from_groups(["CreateReport"]);
        let view = MainView::new(Some("inspector".into()), &perms);
        assert_eq!(view.screens, vec![Screen::CreateReport]);
        assert_eq!(view.access_message, None);

        let nobody = MainView::new(None, &Permissions::from_groups(Vec::<String>::new()));
        assert!(nobody.screens.is_empty());
        assert_eq!(nobody.access_message, Some(ACCESS_REQUEST_MESSAGE));
    }

    #[test]
    fn details_flags_follow_groups() {
        let solver = ReportDetails::new(Report::default(), &Permissions::from_groups(["SolveReport"]));
        assert!(solver.can_work);
        assert!(!solver.can_edit_all);
        assert!(!solver.can_assign);

        let chief = ReportDetails::new(
            Report::default(),
            &Permissions::from_groups(["AccessToAllReports", "AssignProcessReport"]),
        );
        assert!(chief.can_work && chief.can_edit_all && chief.can_assign);
    }
}
