//! User Model (employees managed by the admin screen)

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::AccessGroup;
use crate::types::{UserId, lenient_date};

/// User entity.
///
/// `password` is write-only: accepted from the backend if present but
/// never serialized back or shown.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Option<UserId>,
    #[serde(default)]
    pub username: String,
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
    #[serde(default)]
    pub groups: Vec<AccessGroup>,

    pub employee_id: Option<String>,
    pub last_name: Option<String>,
    pub first_name: Option<String>,
    pub middle_name: Option<String>,

    #[serde(default, deserialize_with = "lenient_date")]
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,

    pub passport_series: Option<String>,
    pub passport_number: Option<String>,

    pub address: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,

    pub position: Option<String>,
    pub department: Option<String>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub hire_date: Option<NaiveDate>,
    pub contract_type: Option<String>,
    pub salary: Option<f64>,

    pub education: Option<String>,
    pub work_experience: Option<String>,
    pub skills: Option<String>,

    pub marital_status: Option<String>,
    pub number_of_children: Option<i64>,
    pub military_service_info: Option<String>,

    pub inn: Option<String>,
    pub snils: Option<String>,

    pub qualification_upgrade: Option<String>,
    pub awards: Option<String>,
    pub disciplinary_actions: Option<String>,
    pub attestation_results: Option<String>,

    pub medical_exam_results: Option<String>,
    pub bank_details: Option<String>,
    pub emergency_contact: Option<String>,
    pub notes: Option<String>,

    pub is_fired: Option<bool>,
}

impl User {
    /// "Last First Middle", skipping missing parts. Empty when no part is set.
    pub fn full_name(&self) -> String {
        [&self.last_name, &self.first_name, &self.middle_name]
            .into_iter()
            .filter_map(|p| p.as_deref())
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Label used by agent pickers: `"Full Name (username)"`
    pub fn display_label(&self) -> String {
        format!("{} ({})", self.full_name(), self.username)
    }

    pub fn has_group(&self, name: &str) -> bool {
        self.groups.iter().any(|g| g.name == name)
    }

    /// Group names in list order
    pub fn group_names(&self) -> Vec<String> {
        self.groups.iter().map(|g| g.name.clone()).collect()
    }
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("groups", &self.groups)
            .field("full_name", &self.full_name())
            .field("is_fired", &self.is_fired)
            .finish_non_exhaustive()
    }
}
