//! Report Model (incident reports)

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::{ReportId, UserId, string_or_number};

/// Report status.
///
/// Open string enum: the UI offers `NEW`, `IN_PROGRESS` and `CLOSED`, but
/// any other value coming from the backend is kept as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ReportStatus {
    New,
    InProgress,
    Closed,
    Other(String),
}

impl ReportStatus {
    /// Values offered by the status filter
    pub const FILTER_OPTIONS: [ReportStatus; 3] =
        [ReportStatus::New, ReportStatus::InProgress, ReportStatus::Closed];

    pub fn as_str(&self) -> &str {
        match self {
            Self::New => "NEW",
            Self::InProgress => "IN_PROGRESS",
            Self::Closed => "CLOSED",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for ReportStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "NEW" => Self::New,
            "IN_PROGRESS" => Self::InProgress,
            "CLOSED" => Self::Closed,
            _ => Self::Other(s),
        }
    }
}

impl From<&str> for ReportStatus {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl From<ReportStatus> for String {
    fn from(status: ReportStatus) -> Self {
        match status {
            ReportStatus::Other(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Report entity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: Option<ReportId>,
    pub date_submitted: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub reporter_id: Option<String>,
    pub incident_date: Option<String>,
    pub incident_time: Option<String>,
    pub incident_location: Option<String>,
    pub involved_persons: Option<String>,
    pub description: Option<String>,
    pub evidence_description: Option<String>,
    pub witnesses: Option<String>,
    pub status: Option<ReportStatus>,
    /// Assigned agent id
    #[serde(default, deserialize_with = "string_or_number")]
    pub assigned_to: Option<String>,
    /// Assigned agent display name
    pub assigned_to_full_name: Option<String>,
    pub last_updated: Option<String>,
    pub solution: Option<String>,
}

/// Create report payload (`POST /api/reports`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReport {
    pub incident_date: NaiveDate,
    /// `HH:MM`
    pub incident_time: String,
    pub incident_location: String,
    pub involved_persons: String,
    pub description: String,
    pub evidence_description: String,
    pub witnesses: String,
}

/// Status transition payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportStatusUpdate {
    pub status: ReportStatus,
}

/// Solution text payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSolutionUpdate {
    pub solution: String,
}

/// Report filter (`GET /api/reports/filter`)
///
/// Blank text values and unset fields are left out of the query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportFilter {
    pub reporter_id: Option<String>,
    pub start_incident_date: Option<NaiveDate>,
    pub end_incident_date: Option<NaiveDate>,
    pub incident_location: Option<String>,
    pub involved_persons: Option<String>,
    pub status: Option<ReportStatus>,
    pub assigned_to: Option<UserId>,
}

impl ReportFilter {
    /// Query parameters in a stable order
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        fn text(out: &mut Vec<(&'static str, String)>, key: &'static str, v: &Option<String>) {
            if let Some(v) = v
                && !v.trim().is_empty()
            {
                out.push((key, v.clone()));
            }
        }

        let mut out = Vec::new();
        text(&mut out, "reporterId", &self.reporter_id);
        if let Some(d) = self.start_incident_date {
            out.push(("startIncidentDate", d.to_string()));
        }
        if let Some(d) = self.end_incident_date {
            out.push(("endIncidentDate", d.to_string()));
        }
        text(&mut out, "incidentLocation", &self.incident_location);
        text(&mut out, "involvedPersons", &self.involved_persons);
        if let Some(s) = &self.status {
            out.push(("status", s.to_string()));
        }
        if let Some(id) = self.assigned_to {
            out.push(("assignedTo", id.to_string()));
        }
        out
    }

    pub fn is_empty(&self) -> bool {
        self.to_query_pairs().is_empty()
    }
}
