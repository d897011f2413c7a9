//! Report details editor (full-field edit for reviewers with access to
//! all reports)

use shared::models::Report;

use super::changeset::{ChangeSet, FieldKind, FieldSpec, FieldValue, diff_fields};
use super::validation::{ReportFormError, is_valid_incident_time};

macro_rules! report_text {
    ($name:literal, $field:ident) => {
        FieldSpec {
            name: $name,
            kind: FieldKind::Text,
            read: |r: &Report| FieldValue::text(r.$field.as_deref()),
        }
    };
}

pub const REPORT_FIELDS: &[FieldSpec<Report>] = &[
    report_text!("incidentDate", incident_date),
    report_text!("incidentTime", incident_time),
    report_text!("incidentLocation", incident_location),
    report_text!("involvedPersons", involved_persons),
    report_text!("description", description),
    report_text!("evidenceDescription", evidence_description),
    report_text!("witnesses", witnesses),
    report_text!("solution", solution),
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportEdit {
    pub incident_date: String,
    pub incident_time: String,
    pub incident_location: String,
    pub involved_persons: String,
    pub description: String,
    pub evidence_description: String,
    pub witnesses: String,
    pub solution: String,
}

fn optional(v: &str) -> Option<String> {
    (!v.is_empty()).then(|| v.to_string())
}

impl ReportEdit {
    pub fn from_report(report: &Report) -> Self {
        let owned = |v: &Option<String>| v.clone().unwrap_or_default();
        Self {
            incident_date: owned(&report.incident_date),
            incident_time: owned(&report.incident_time),
            incident_location: owned(&report.incident_location),
            involved_persons: owned(&report.involved_persons),
            description: owned(&report.description),
            evidence_description: owned(&report.evidence_description),
            witnesses: owned(&report.witnesses),
            solution: owned(&report.solution),
        }
    }

    fn apply_to(&self, original: &Report) -> Report {
        Report {
            incident_date: optional(&self.incident_date),
            incident_time: optional(&self.incident_time),
            incident_location: optional(&self.incident_location),
            involved_persons: optional(&self.involved_persons),
            description: optional(&self.description),
            evidence_description: optional(&self.evidence_description),
            witnesses: optional(&self.witnesses),
            solution: optional(&self.solution),
            ..original.clone()
        }
    }
}

/// Minimal update for the report editor. A non-empty time must be `HH:MM`.
pub fn build_report_change_set(
    original: &Report,
    edit: &ReportEdit,
) -> Result<ChangeSet, ReportFormError> {
    if !edit.incident_time.is_empty() && !is_valid_incident_time(&edit.incident_time) {
        return Err(ReportFormError::InvalidTime);
    }
    Ok(diff_fields(REPORT_FIELDS, original, &edit.apply_to(original)))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn report() -> Report {
        Report {
            id: Some(5),
            incident_date: Some("2024-10-10".into()),
            incident_time: Some("09:30".into()),
            incident_location: Some("Customs post".into()),
            description: Some("Bribe for clearance".into()),
            ..Default::default()
        }
    }

    #[test]
    fn diff_covers_only_edited_fields() {
        let original = report();
        let mut edit = ReportEdit::from_report(&original);
        assert!(build_report_change_set(&original, &edit).unwrap().is_empty());

        edit.incident_location = "Customs post 3".into();
        edit.description.clear();
        edit.witnesses = "Driver".into();
        let changes = build_report_change_set(&original, &edit).unwrap();
        assert_eq!(
            serde_json::Value::Object(changes.into_json()),
            json!({
                "incidentLocation": "Customs post 3",
                "description": null,
                "witnesses": "Driver",
            })
        );
    }

    #[test]
    fn bad_time_is_rejected() {
        let original = report();
        let mut edit = ReportEdit::from_report(&original);
        edit.incident_time = "9:30".into();
        assert_eq!(
            build_report_change_set(&original, &edit),
            Err(ReportFormError::InvalidTime)
        );
    }
}
