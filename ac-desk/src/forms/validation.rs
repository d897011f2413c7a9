//! Incident report form validation
//!
//! Rules run in a fixed order and stop at the first violation, so the user
//! only ever sees one message at a time. Evidence and witnesses are
//! optional and never checked.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use shared::models::NewReport;
use thiserror::Error;

/// `H?H:MM`, hour 0-23, minute 00-59
static TIME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([01]?[0-9]|2[0-3]):[0-5][0-9]$").expect("static time pattern")
});

/// Complete time text is always `HH:MM`
const TIME_LEN: usize = 5;

/// Report form as the user typed it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportForm {
    pub incident_date: Option<NaiveDate>,
    pub incident_time: String,
    pub incident_location: String,
    pub involved_persons: String,
    pub description: String,
    pub evidence_description: String,
    pub witnesses: String,
}

/// First failing rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ReportFormError {
    #[error("Select the incident date.")]
    MissingDate,
    #[error("Enter a valid incident time in HH:MM format (for example 09:30 or 14:45).")]
    InvalidTime,
    #[error("Enter the incident location.")]
    MissingLocation,
    #[error("List the persons involved.")]
    MissingInvolvedPersons,
    #[error("Add a description of the incident.")]
    MissingDescription,
}

/// Exactly `HH:MM` with HH in 00-23 and MM in 00-59.
///
/// The pattern alone would admit a one-digit hour; the length check
/// rejects it.
pub fn is_valid_incident_time(text: &str) -> bool {
    text.len() == TIME_LEN && TIME_PATTERN.is_match(text)
}

pub fn validate_report_form(form: &ReportForm) -> Result<(), ReportFormError> {
    if form.incident_date.is_none() {
        return Err(ReportFormError::MissingDate);
    }
    if !is_valid_incident_time(&form.incident_time) {
        return Err(ReportFormError::InvalidTime);
    }
    if form.incident_location.is_empty() {
        return Err(ReportFormError::MissingLocation);
    }
    if form.involved_persons.is_empty() {
        return Err(ReportFormError::MissingInvolvedPersons);
    }
    if form.description.is_empty() {
        return Err(ReportFormError::MissingDescription);
    }
    Ok(())
}

impl ReportForm {
    /// Validate and build the create-report payload.
    pub fn to_submission(&self) -> Result<NewReport, ReportFormError> {
        validate_report_form(self)?;
        let incident_date = self.incident_date.ok_or(ReportFormError::MissingDate)?;
        Ok(NewReport {
            incident_date,
            incident_time: self.incident_time.clone(),
            incident_location: self.incident_location.clone(),
            involved_persons: self.involved_persons.clone(),
            description: self.description.clone(),
            evidence_description: self.evidence_description.clone(),
            witnesses: self.witnesses.clone(),
        })
    }

    /// Consuming variant of [`ReportForm::to_submission`]
    pub fn into_submission(self) -> Result<NewReport, ReportFormError> {
        self.to_submission()
    }

    /// Reset every field after a successful submission.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Live input mask for the incident time field
pub struct TimeInputMask;

impl TimeInputMask {
    /// Text after typing `inserted` at the end of `current`, or `None` when
    /// the keystroke is rejected.
    ///
    /// Only digits and `:` are accepted. A `:` is appended when a single
    /// typed digit makes the text two characters long; pasted text is not
    /// completed. Results longer than `HH:MM` are rejected. Clearing
    /// the field is always allowed.
    pub fn apply(current: &str, inserted: &str) -> Option<String> {
        let mut next = format!("{current}{inserted}");
        if next.is_empty() {
            return Some(next);
        }
        if !next.chars().all(|c| c.is_ascii_digit() || c == ':') {
            return None;
        }
        let typed_digit = inserted.len() == 1 && inserted.chars().all(|c| c.is_ascii_digit());
        if next.len() == 2 && typed_digit {
            next.push(':');
        }
        if next.len() > TIME_LEN {
            return None;
        }
        Some(next)
    }
}
