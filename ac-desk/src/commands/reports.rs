//! Report screens: submit, review, details

use ac_client::Capability;
use futures::future::{OptionFuture, join};
use shared::models::{NewReport, Report, ReportFilter, ReportStatus};
use shared::types::{ReportId, UserId};

use crate::core::{Desk, DeskError, DeskResult};
use crate::forms::{ReportEdit, ReportForm, build_report_change_set};
use crate::views::{
    AgentOption, ReportDetails, ReportListing, UpdateOutcome, agents_for_assignment,
    can_work_reports,
};

/// Validate, then send. An invalid form never reaches the network.
pub async fn submit_report(desk: &Desk, form: &ReportForm) -> DeskResult<()> {
    let report = form.to_submission()?;
    send_report(desk, &report).await
}

/// Send an already validated report.
pub async fn send_report(desk: &Desk, report: &NewReport) -> DeskResult<()> {
    desk.require(Capability::CreateReport)?;
    desk.gateway().create_report(report).await?;
    Ok(())
}

/// All reports visible to the user
pub async fn load_reports(desk: &Desk) -> DeskResult<ReportListing> {
    listing(desk, None).await
}

/// Reports matching `filter`; an empty filter lists everything.
pub async fn filter_reports(desk: &Desk, filter: &ReportFilter) -> DeskResult<ReportListing> {
    if filter.is_empty() {
        return load_reports(desk).await;
    }
    listing(desk, Some(filter)).await
}

/// Reports plus, for assigners, the agent picker. The two are fetched
/// concurrently; a failed agent fetch leaves the picker empty.
async fn listing(desk: &Desk, filter: Option<&ReportFilter>) -> DeskResult<ReportListing> {
    let permissions = desk.permissions();
    let can_assign = permissions.allows(Capability::AssignAgentToReport);
    let gateway = desk.gateway();

    let reports = async {
        match filter {
            Some(f) => gateway.filter_reports(f).await,
            None => gateway.list_reports().await,
        }
    };
    let agents: OptionFuture<_> = can_assign.then(|| gateway.list_agents()).into();
    let (reports, agents) = join(reports, agents).await;
    let reports = reports?;

    let agents = match agents {
        Some(Ok(users)) => agents_for_assignment(&users),
        Some(Err(e)) => {
            tracing::warn!(error = %e, "Agent list unavailable, picker left empty");
            Vec::new()
        }
        None => Vec::new(),
    };

    tracing::debug!(count = reports.len(), filtered = filter.is_some(), "Reports loaded");
    Ok(ReportListing {
        reports,
        show_assignee_column: can_assign,
        can_assign,
        agents,
    })
}

pub async fn open_report(desk: &Desk, id: ReportId) -> DeskResult<ReportDetails> {
    let report = desk.gateway().get_report(id).await?;
    Ok(ReportDetails::new(report, &desk.permissions()))
}

/// Agent picker entries (users holding SolveReport)
pub async fn load_agents(desk: &Desk) -> DeskResult<Vec<AgentOption>> {
    desk.require(Capability::AssignAgentToReport)?;
    let users = desk.gateway().list_agents().await?;
    Ok(agents_for_assignment(&users))
}

pub async fn assign_agent(desk: &Desk, report_id: ReportId, agent_id: UserId) -> DeskResult<()> {
    desk.require(Capability::AssignAgentToReport)?;
    desk.gateway().assign_report(report_id, agent_id).await?;
    Ok(())
}

fn require_work(desk: &Desk) -> DeskResult<()> {
    if can_work_reports(&desk.permissions()) {
        Ok(())
    } else {
        Err(DeskError::NotPermitted(Capability::EditSolutionOnly))
    }
}

/// Move to IN_PROGRESS
pub async fn take_to_work(desk: &Desk, id: ReportId) -> DeskResult<UpdateOutcome> {
    set_status(desk, id, ReportStatus::InProgress).await
}

/// Move to CLOSED
pub async fn close_report(desk: &Desk, id: ReportId) -> DeskResult<UpdateOutcome> {
    set_status(desk, id, ReportStatus::Closed).await
}

async fn set_status(desk: &Desk, id: ReportId, status: ReportStatus) -> DeskResult<UpdateOutcome> {
    require_work(desk)?;
    desk.gateway().set_report_status(id, status).await?;
    Ok(UpdateOutcome::Saved { fields: 1 })
}

pub async fn save_solution(desk: &Desk, id: ReportId, solution: &str) -> DeskResult<UpdateOutcome> {
    require_work(desk)?;
    desk.gateway().save_report_solution(id, solution).await?;
    Ok(UpdateOutcome::Saved { fields: 1 })
}

/// Send only the fields changed in the details editor.
pub async fn save_report_edit(
    desk: &Desk,
    original: &Report,
    edit: &ReportEdit,
) -> DeskResult<UpdateOutcome> {
    desk.require(Capability::EditAllReportFields)?;
    let id = original
        .id
        .ok_or_else(|| DeskError::InvalidInput("The report has no id.".into()))?;

    let changes = build_report_change_set(original, edit)?;
    if changes.is_empty() {
        tracing::debug!(report_id = id, "No report changes to save");
        return Ok(UpdateOutcome::NoChanges);
    }
    desk.gateway().update_report(id, changes.as_json()).await?;
    tracing::info!(report_id = id, fields = changes.len(), "Report updated");
    Ok(UpdateOutcome::Saved {
        fields: changes.len(),
    })
}
