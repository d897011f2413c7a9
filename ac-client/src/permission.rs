//! Permission gate
//!
//! Maps the session's group set to enabled screens and actions. Groups are
//! flat tags; a capability is granted when the user holds ANY of its
//! required groups.

use std::collections::BTreeSet;

use crate::session::Session;

/// Group tags the client knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Group {
    CreateReport,
    ViewReport,
    AccessToAllReports,
    ManageUserGroups,
    AssignProcessReport,
    SolveReport,
}

impl Group {
    pub const ALL: [Group; 6] = [
        Group::CreateReport,
        Group::ViewReport,
        Group::AccessToAllReports,
        Group::ManageUserGroups,
        Group::AssignProcessReport,
        Group::SolveReport,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Group::CreateReport => "CreateReport",
            Group::ViewReport => "ViewReport",
            Group::AccessToAllReports => "AccessToAllReports",
            Group::ManageUserGroups => "ManageUserGroups",
            Group::AssignProcessReport => "AssignProcessReport",
            Group::SolveReport => "SolveReport",
        }
    }
}

impl std::fmt::Display for Group {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Gated actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    CreateReport,
    ReviewReports,
    AdministerUsers,
    AssignAgentToReport,
    EditAllReportFields,
    EditSolutionOnly,
}

impl Capability {
    pub const ALL: [Capability; 6] = [
        Capability::CreateReport,
        Capability::ReviewReports,
        Capability::AdministerUsers,
        Capability::AssignAgentToReport,
        Capability::EditAllReportFields,
        Capability::EditSolutionOnly,
    ];

    /// Holding any one of these grants the capability.
    pub fn required_groups(self) -> &'static [Group] {
        match self {
            Capability::CreateReport => &[Group::CreateReport],
            Capability::ReviewReports => &[Group::ViewReport, Group::AccessToAllReports],
            Capability::AdministerUsers => &[Group::ManageUserGroups],
            Capability::AssignAgentToReport => &[Group::AssignProcessReport],
            Capability::EditAllReportFields => &[Group::AccessToAllReports],
            Capability::EditSolutionOnly => &[Group::SolveReport],
        }
    }
}

/// Main window tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    CreateReport,
    ReviewReports,
    Admin,
}

impl Screen {
    pub const ALL: [Screen; 3] = [Screen::CreateReport, Screen::ReviewReports, Screen::Admin];

    pub fn capability(self) -> Capability {
        match self {
            Screen::CreateReport => Capability::CreateReport,
            Screen::ReviewReports => Capability::ReviewReports,
            Screen::Admin => Capability::AdministerUsers,
        }
    }
}

/// Groups that make at least one tab meaningful. A user with none of
/// them gets the "request access" message.
const TAB_GROUPS: [Group; 3] = [Group::CreateReport, Group::ViewReport, Group::ManageUserGroups];

/// Message shown instead of an empty main window
pub const ACCESS_REQUEST_MESSAGE: &str = "Request access from your administrator.";

/// Exact-membership check of a capability against a group set
pub fn is_granted<S: AsRef<str>>(groups: &[S], capability: Capability) -> bool {
    capability
        .required_groups()
        .iter()
        .any(|g| groups.iter().any(|held| held.as_ref() == g.as_str()))
}

/// Capability flags evaluated once from a group set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permissions {
    groups: BTreeSet<String>,
}

impl Permissions {
    pub fn from_groups<I, S>(groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            groups: groups.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_session(session: &Session) -> Self {
        Self {
            groups: session.groups().clone(),
        }
    }

    fn holds(&self, group: Group) -> bool {
        self.groups.contains(group.as_str())
    }

    pub fn allows(&self, capability: Capability) -> bool {
        capability.required_groups().iter().any(|g| self.holds(*g))
    }

    /// Tabs to show, in display order. Others are removed, not disabled.
    pub fn visible_screens(&self) -> Vec<Screen> {
        Screen::ALL
            .into_iter()
            .filter(|s| self.allows(s.capability()))
            .collect()
    }

    pub fn is_screen_visible(&self, screen: Screen) -> bool {
        self.allows(screen.capability())
    }

    pub fn needs_access_request(&self) -> bool {
        !TAB_GROUPS.iter().any(|g| self.holds(*g))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every subset of the six known groups
    fn all_group_sets() -> Vec<Vec<Group>> {
        (0u32..(1 << Group::ALL.len()))
            .map(|mask| {
                Group::ALL
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| mask & (1 << i) != 0)
                    .map(|(_, g)| *g)
                    .collect()
            })
            .collect()
    }

    #[test]
    fn truth_table_over_all_group_sets() {
        for set in all_group_sets() {
            let names: Vec<&str> = set.iter().map(|g| g.as_str()).collect();
            let perms = Permissions::from_groups(names.iter().copied());
            let has = |g: Group| set.contains(&g);

            let expected = [
                (Capability::CreateReport, has(Group::CreateReport)),
                (
                    Capability::ReviewReports,
                    has(Group::ViewReport) || has(Group::AccessToAllReports),
                ),
                (Capability::AdministerUsers, has(Group::ManageUserGroups)),
                (Capability::AssignAgentToReport, has(Group::AssignProcessReport)),
                (Capability::EditAllReportFields, has(Group::AccessToAllReports)),
                (Capability::EditSolutionOnly, has(Group::SolveReport)),
            ];
            for (cap, want) in expected {
                assert_eq!(perms.allows(cap), want, "{cap:?} for {names:?}");
                assert_eq!(is_granted(&names, cap), want, "{cap:?} for {names:?}");
            }
        }
    }

    #[test]
    fn unknown_and_case_variant_groups_grant_nothing() {
        let perms = Permissions::from_groups(["createreport", "Admin", "VIEWREPORT"]);
        for cap in Capability::ALL {
            assert!(!perms.allows(cap));
        }
        assert!(perms.needs_access_request());
        assert!(perms.visible_screens().is_empty());
    }

    #[test]
    fn screens_follow_capabilities() {
        let perms = Permissions::from_groups(["CreateReport"]);
        assert_eq!(perms.visible_screens(), vec![Screen::CreateReport]);
        assert!(!perms.is_screen_visible(Screen::Admin));
        assert!(!perms.needs_access_request());

        let reviewer = Permissions::from_groups(["AccessToAllReports", "ManageUserGroups"]);
        assert_eq!(
            reviewer.visible_screens(),
            vec![Screen::ReviewReports, Screen::Admin]
        );
    }

    #[test]
    fn access_request_only_without_tab_groups() {
        // AccessToAllReports shows the review tab but is not a tab group
        assert!(Permissions::from_groups(["SolveReport"]).needs_access_request());
        assert!(Permissions::from_groups(["AccessToAllReports"]).needs_access_request());
        assert!(!Permissions::from_groups(["ViewReport"]).needs_access_request());
        assert!(!Permissions::from_groups(["ManageUserGroups"]).needs_access_request());
        assert!(Permissions::from_groups(Vec::<String>::new()).needs_access_request());
    }

    #[test]
    fn from_session_tracks_logout() {
        let mut session = Session::new();
        session.login("a.b.c", "u", vec!["ManageUserGroups".to_string()]);
        assert!(Permissions::from_session(&session).allows(Capability::AdministerUsers));
        session.logout();
        let perms = Permissions::from_session(&session);
        for cap in Capability::ALL {
            assert!(!perms.allows(cap));
        }
    }
}
