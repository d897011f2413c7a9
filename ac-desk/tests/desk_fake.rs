//! Desk commands over an in-memory gateway

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use ac_client::{
    Capability, ClientError, ClientResult, Gateway, LoginOutcome, PatchBody, SharedSession,
};
use ac_desk_lib::commands::{reports, users};
use ac_desk_lib::forms::{ReportEdit, UserEdit};
use ac_desk_lib::views::UpdateOutcome;
use ac_desk_lib::{Desk, DeskError, DeskEvent, RequestKey};
use async_trait::async_trait;
use serde_json::{Value, json};
use shared::models::{
    AccessGroup, NewReport, Report, ReportFilter, ReportStatus, User,
};
use shared::types::{ReportId, UserId};

#[derive(Default)]
struct FakeGateway {
    session: SharedSession,
    calls: Mutex<Vec<(String, Value)>>,
    agents_down: AtomicBool,
}

impl FakeGateway {
    fn record(&self, call: &str, payload: Value) {
        self.calls.lock().unwrap().push((call.to_string(), payload));
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(c, _)| c.clone()).collect()
    }

    fn payload(&self, call: &str) -> Option<Value> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .find(|(c, _)| c == call)
            .map(|(_, p)| p.clone())
    }
}

fn user(id: i64, username: &str, groups: &[&str]) -> User {
    User {
        id: Some(id),
        username: username.into(),
        last_name: Some("Petrov".into()),
        first_name: Some("Ivan".into()),
        groups: groups
            .iter()
            .enumerate()
            .map(|(i, g)| AccessGroup::new(i as i64 + 1, *g))
            .collect(),
        ..Default::default()
    }
}

fn report(id: ReportId) -> Report {
    Report {
        id: Some(id),
        incident_date: Some("2024-10-10".into()),
        incident_time: Some("09:30".into()),
        incident_location: Some("Warehouse".into()),
        status: Some(ReportStatus::New),
        ..Default::default()
    }
}

#[async_trait]
impl Gateway for FakeGateway {
    fn session(&self) -> &SharedSession {
        &self.session
    }

    async fn login(&self, username: &str, _password: &str) -> ClientResult<LoginOutcome> {
        self.record("login", json!(username));
        Ok(LoginOutcome {
            username: username.to_string(),
            groups: Vec::new(),
        })
    }

    async fn register(&self, username: &str, _password: &str) -> ClientResult<()> {
        self.record("register", json!(username));
        Ok(())
    }

    async fn update_password(&self, user_id: UserId, _new_password: &str) -> ClientResult<()> {
        self.record("update_password", json!(user_id));
        Ok(())
    }

    async fn list_reports(&self) -> ClientResult<Vec<Report>> {
        self.record("list_reports", Value::Null);
        Ok(vec![report(1), report(2)])
    }

    async fn create_report(&self, report: &NewReport) -> ClientResult<()> {
        self.record("create_report", json!(report));
        Ok(())
    }

    async fn filter_reports(&self, filter: &ReportFilter) -> ClientResult<Vec<Report>> {
        self.record("filter_reports", json!(filter.to_query_pairs()));
        tokio::time::sleep(Duration::from_millis(200)).await;
        Ok(vec![report(9)])
    }

    async fn get_report(&self, id: ReportId) -> ClientResult<Report> {
        self.record("get_report", json!(id));
        Ok(report(id))
    }

    async fn update_report(&self, id: ReportId, changes: &PatchBody) -> ClientResult<()> {
        self.record("update_report", json!({"id": id, "body": changes}));
        Ok(())
    }

    async fn set_report_status(&self, id: ReportId, status: ReportStatus) -> ClientResult<()> {
        self.record("set_report_status", json!({"id": id, "status": status}));
        Ok(())
    }

    async fn save_report_solution(&self, id: ReportId, solution: &str) -> ClientResult<()> {
        self.record("save_report_solution", json!({"id": id, "solution": solution}));
        Ok(())
    }

    async fn assign_report(&self, id: ReportId, agent_id: UserId) -> ClientResult<()> {
        self.record("assign_report", json!({"id": id, "agent": agent_id}));
        Ok(())
    }

    async fn list_users(&self) -> ClientResult<Vec<User>> {
        self.record("list_users", Value::Null);
        Ok(vec![user(1, "admin", &["ManageUserGroups"])])
    }

    async fn list_agents(&self) -> ClientResult<Vec<User>> {
        self.record("list_agents", Value::Null);
        if self.agents_down.load(Ordering::SeqCst) {
            return Err(ClientError::Api {
                status: "INTERNAL_SERVER_ERROR".into(),
                message: "agents down".into(),
            });
        }
        Ok(vec![
            user(3, "solver", &["ViewReport", "SolveReport"]),
            user(4, "viewer", &["ViewReport"]),
            User {
                id: None,
                ..user(0, "ghost", &["SolveReport"])
            },
        ])
    }

    async fn update_user(&self, id: UserId, changes: &PatchBody) -> ClientResult<()> {
        if changes.is_empty() {
            return Err(ClientError::EmptyUpdate);
        }
        self.record("update_user", json!({"id": id, "body": changes}));
        Ok(())
    }

    async fn delete_user(&self, id: UserId) -> ClientResult<()> {
        self.record("delete_user", json!(id));
        Ok(())
    }

    async fn list_access_groups(&self) -> ClientResult<Vec<AccessGroup>> {
        self.record("list_access_groups", Value::Null);
        Ok(vec![
            AccessGroup::new(1, "CreateReport"),
            AccessGroup::new(2, "ViewReport"),
            AccessGroup::new(6, "SolveReport"),
        ])
    }
}

fn desk_with(groups: &[&str]) -> (Desk, Arc<FakeGateway>, ac_desk_lib::UiEvents<DeskEvent>) {
    let gateway = Arc::new(FakeGateway::default());
    gateway.session.login(
        "a.b.c",
        "tester",
        groups.iter().map(|g| g.to_string()).collect(),
    );
    let (desk, events) = Desk::new(gateway.clone());
    (desk, gateway, events)
}

#[tokio::test]
async fn unchanged_user_edit_is_never_sent() {
    let (desk, gateway, _events) = desk_with(&["ManageUserGroups"]);
    let original = user(12, "ivanov", &["CreateReport", "ViewReport"]);
    let catalog = gateway.list_access_groups().await.unwrap();

    let edit = UserEdit::from_user(&original);
    let outcome = users::save_user_edit(&desk, &original, &edit, &catalog)
        .await
        .unwrap();

    assert_eq!(outcome, UpdateOutcome::NoChanges);
    assert!(!gateway.calls().contains(&"update_user".to_string()));
}

#[tokio::test]
async fn user_edit_sends_only_changed_fields() {
    let (desk, gateway, _events) = desk_with(&["ManageUserGroups"]);
    let original = user(12, "ivanov", &["CreateReport"]);
    let catalog = gateway.list_access_groups().await.unwrap();

    let mut edit = UserEdit::from_user(&original);
    edit.email = "ivanov@example.org".into();
    edit.add_group("SolveReport");
    let outcome = users::save_user_edit(&desk, &original, &edit, &catalog)
        .await
        .unwrap();

    assert_eq!(outcome, UpdateOutcome::Saved { fields: 2 });
    let sent = gateway.payload("update_user").unwrap();
    assert_eq!(sent["id"], 12);
    assert_eq!(sent["body"]["email"], "ivanov@example.org");
    assert_eq!(
        sent["body"]["groups"],
        json!([{"id": 1, "name": "CreateReport"}, {"id": 6, "name": "SolveReport"}])
    );
    assert_eq!(sent["body"].as_object().unwrap().len(), 2);
}

#[tokio::test]
async fn bad_salary_aborts_the_save() {
    let (desk, gateway, _events) = desk_with(&["ManageUserGroups"]);
    let original = user(12, "ivanov", &[]);
    let mut edit = UserEdit::from_user(&original);
    edit.salary = "a lot".into();

    let err = users::save_user_edit(&desk, &original, &edit, &[])
        .await
        .unwrap_err();
    assert!(matches!(err, DeskError::ChangeSet(_)));
    assert!(gateway.calls().is_empty());
}

#[tokio::test]
async fn unchanged_report_edit_is_never_sent() {
    let (desk, gateway, _events) = desk_with(&["AccessToAllReports"]);
    let original = report(5);
    let edit = ReportEdit::from_report(&original);

    let outcome = reports::save_report_edit(&desk, &original, &edit)
        .await
        .unwrap();
    assert_eq!(outcome, UpdateOutcome::NoChanges);
    assert!(gateway.calls().is_empty());
}

#[tokio::test]
async fn delete_needs_confirmation() {
    let (desk, gateway, _events) = desk_with(&["ManageUserGroups"]);

    let err = users::delete_user(&desk, 7, false).await.unwrap_err();
    assert!(matches!(err, DeskError::ConfirmationRequired));
    assert!(gateway.calls().is_empty());

    users::delete_user(&desk, 7, true).await.unwrap();
    assert_eq!(gateway.payload("delete_user"), Some(json!(7)));
}

#[tokio::test]
async fn admin_actions_are_gated_locally() {
    let (desk, gateway, _events) = desk_with(&["CreateReport"]);

    let err = users::load_users(&desk).await.unwrap_err();
    assert!(matches!(err, DeskError::NotPermitted(Capability::AdministerUsers)));
    assert!(users::register_user(&desk, "new", "pw").await.is_err());
    assert!(reports::assign_agent(&desk, 1, 3).await.is_err());
    assert!(gateway.calls().is_empty());
}

#[tokio::test]
async fn agent_picker_lists_solvers_with_ids() {
    let (desk, _gateway, _events) = desk_with(&["AssignProcessReport"]);

    let agents = reports::load_agents(&desk).await.unwrap();
    assert_eq!(agents.len(), 1);
    assert_eq!(agents[0].id, 3);
}

#[tokio::test]
async fn listing_fetches_agents_only_for_assigners() {
    let (desk, gateway, _events) = desk_with(&["ViewReport"]);
    let listing = reports::load_reports(&desk).await.unwrap();
    assert_eq!(listing.count(), 2);
    assert!(!listing.show_assignee_column);
    assert!(!gateway.calls().contains(&"list_agents".to_string()));

    let (desk, gateway, _events) = desk_with(&["ViewReport", "AssignProcessReport"]);
    let listing = reports::load_reports(&desk).await.unwrap();
    assert!(listing.show_assignee_column);
    assert_eq!(listing.agents.len(), 1);
    assert!(gateway.calls().contains(&"list_agents".to_string()));
}

#[tokio::test]
async fn failed_agent_fetch_keeps_the_reports() {
    let (desk, gateway, _events) = desk_with(&["ViewReport", "AssignProcessReport"]);
    gateway.agents_down.store(true, Ordering::SeqCst);

    let listing = reports::load_reports(&desk).await.unwrap();
    assert_eq!(listing.count(), 2);
    assert!(listing.show_assignee_column);
    assert!(listing.agents.is_empty());
    assert!(gateway.calls().contains(&"list_agents".to_string()));

    // the dedicated picker request still reports the failure
    let err = reports::load_agents(&desk).await.unwrap_err();
    assert_eq!(err.user_message(), "agents down");
}

#[tokio::test]
async fn empty_filter_loads_everything() {
    let (desk, gateway, _events) = desk_with(&["ViewReport"]);
    let filter = ReportFilter {
        incident_location: Some("   ".into()),
        ..Default::default()
    };
    reports::filter_reports(&desk, &filter).await.unwrap();
    assert_eq!(gateway.calls(), vec!["list_reports".to_string()]);
}

#[tokio::test]
async fn status_actions_send_the_target_status() {
    let (desk, gateway, _events) = desk_with(&["SolveReport"]);

    reports::take_to_work(&desk, 4).await.unwrap();
    assert_eq!(
        gateway.payload("set_report_status"),
        Some(json!({"id": 4, "status": "IN_PROGRESS"}))
    );

    let outcome = reports::save_solution(&desk, 4, "Dismissed").await.unwrap();
    assert_eq!(outcome.message(), "Changes saved.");
}

#[tokio::test]
async fn newer_listing_request_supersedes_older_one() {
    let (desk, _gateway, mut events) = desk_with(&["ViewReport"]);

    desk.start_filter_reports(ReportFilter {
        incident_location: Some("Port".into()),
        ..Default::default()
    });
    desk.start_load_reports();

    let event = tokio::time::timeout(Duration::from_secs(5), events.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(event.key, RequestKey::LoadReports);
    match event.payload {
        DeskEvent::ReportsLoaded(Ok(listing)) => assert_eq!(listing.count(), 2),
        other => panic!("unexpected event: {other:?}"),
    }

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(events.drain().is_empty());
    assert!(!desk.is_busy(RequestKey::LoadReports));
}

#[tokio::test]
async fn delete_without_confirmation_arrives_as_error_event() {
    let (desk, gateway, mut events) = desk_with(&["ManageUserGroups"]);

    desk.start_delete_user(7, false);
    let event = tokio::time::timeout(Duration::from_secs(5), events.recv())
        .await
        .unwrap()
        .unwrap();
    match event.payload {
        DeskEvent::UserDeleted { user_id, result } => {
            assert_eq!(user_id, 7);
            assert!(matches!(result, Err(DeskError::ConfirmationRequired)));
        }
        other => panic!("unexpected event: {other:?}"),
    }
    assert!(gateway.calls().is_empty());
}

async fn next_events(
    events: &mut ac_desk_lib::UiEvents<DeskEvent>,
    count: usize,
) -> Vec<DeskEvent> {
    let mut out = Vec::new();
    for _ in 0..count {
        let event = tokio::time::timeout(Duration::from_secs(5), events.recv())
            .await
            .unwrap()
            .unwrap();
        out.push(event.payload);
    }
    out
}

#[tokio::test]
async fn different_user_actions_do_not_cancel_each_other() {
    let (desk, gateway, mut events) = desk_with(&["ManageUserGroups"]);
    let original = user(12, "ivanov", &["CreateReport"]);
    let mut edit = UserEdit::from_user(&original);
    edit.email = "ivanov@example.org".into();

    desk.start_save_user(original, edit, Vec::new()).unwrap();
    desk.start_update_password(12, "n3w-pass".into());

    let delivered = next_events(&mut events, 2).await;
    let outcomes: Vec<_> = delivered
        .iter()
        .map(|e| match e {
            DeskEvent::UserUpdated { user_id, result } => (*user_id, *result.as_ref().unwrap()),
            other => panic!("unexpected event: {other:?}"),
        })
        .collect();
    assert!(outcomes.contains(&(12, UpdateOutcome::Saved { fields: 1 })));
    assert_eq!(outcomes.len(), 2);

    let calls = gateway.calls();
    assert!(calls.contains(&"update_user".to_string()));
    assert!(calls.contains(&"update_password".to_string()));
    assert_eq!(gateway.payload("update_user").unwrap()["body"]["email"], "ivanov@example.org");
}

#[tokio::test]
async fn assign_then_close_sends_both() {
    let (desk, gateway, mut events) =
        desk_with(&["ViewReport", "AssignProcessReport", "SolveReport"]);

    desk.start_assign_agent(4, 3);
    desk.start_close_report(4);

    let delivered = next_events(&mut events, 2).await;
    assert!(delivered.iter().any(|e| matches!(
        e,
        DeskEvent::AgentAssigned { report_id: 4, result: Ok(()) }
    )));
    assert!(delivered.iter().any(|e| matches!(
        e,
        DeskEvent::ReportUpdated { report_id: 4, result: Ok(UpdateOutcome::Saved { .. }) }
    )));

    assert_eq!(
        gateway.payload("assign_report"),
        Some(json!({"id": 4, "agent": 3}))
    );
    assert_eq!(
        gateway.payload("set_report_status"),
        Some(json!({"id": 4, "status": "CLOSED"}))
    );
}

#[tokio::test]
async fn repeated_status_change_keeps_only_the_latest() {
    let (desk, gateway, mut events) = desk_with(&["SolveReport"]);

    desk.start_take_to_work(4);
    desk.start_close_report(4);

    let delivered = next_events(&mut events, 1).await;
    assert!(matches!(
        delivered[0],
        DeskEvent::ReportUpdated { report_id: 4, result: Ok(_) }
    ));
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(events.drain().is_empty());
    assert_eq!(
        gateway.calls().last().map(String::as_str),
        Some("set_report_status")
    );
}
