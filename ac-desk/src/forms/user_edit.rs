//! User editor state and its change-set

use chrono::NaiveDate;
use shared::models::{AccessGroup, User};

use super::changeset::{ChangeSet, ChangeSetError, FieldKind, FieldSpec, FieldValue, diff_fields};

macro_rules! text_field {
    ($name:literal, $field:ident) => {
        FieldSpec {
            name: $name,
            kind: FieldKind::Text,
            read: |u: &User| FieldValue::text(u.$field.as_deref()),
        }
    };
}

/// Every field the user editor may change, in form order
pub const USER_FIELDS: &[FieldSpec<User>] = &[
    FieldSpec {
        name: "username",
        kind: FieldKind::Text,
        read: |u: &User| FieldValue::text(Some(&u.username)),
    },
    text_field!("lastName", last_name),
    text_field!("firstName", first_name),
    text_field!("middleName", middle_name),
    FieldSpec {
        name: "dateOfBirth",
        kind: FieldKind::Date,
        read: |u: &User| FieldValue::date(u.date_of_birth),
    },
    text_field!("gender", gender),
    text_field!("email", email),
    text_field!("phoneNumber", phone_number),
    text_field!("address", address),
    text_field!("employeeId", employee_id),
    text_field!("position", position),
    text_field!("department", department),
    FieldSpec {
        name: "hireDate",
        kind: FieldKind::Date,
        read: |u: &User| FieldValue::date(u.hire_date),
    },
    text_field!("contractType", contract_type),
    FieldSpec {
        name: "salary",
        kind: FieldKind::Number,
        read: |u: &User| FieldValue::number(u.salary),
    },
    text_field!("passportSeries", passport_series),
    text_field!("passportNumber", passport_number),
    text_field!("maritalStatus", marital_status),
    FieldSpec {
        name: "numberOfChildren",
        kind: FieldKind::Integer,
        read: |u: &User| FieldValue::integer(u.number_of_children),
    },
    text_field!("militaryServiceInfo", military_service_info),
    FieldSpec {
        name: "isFired",
        kind: FieldKind::Bool,
        // unchecked box and missing flag are the same state
        read: |u: &User| FieldValue::Bool(u.is_fired.unwrap_or(false)),
    },
    text_field!("inn", inn),
    text_field!("snils", snils),
    text_field!("education", education),
    text_field!("workExperience", work_experience),
    text_field!("skills", skills),
    text_field!("qualificationUpgrade", qualification_upgrade),
    text_field!("awards", awards),
    text_field!("disciplinaryActions", disciplinary_actions),
    text_field!("attestationResults", attestation_results),
    text_field!("medicalExamResults", medical_exam_results),
    text_field!("bankDetails", bank_details),
    text_field!("emergencyContact", emergency_contact),
    text_field!("notes", notes),
    FieldSpec {
        name: "groups",
        kind: FieldKind::Groups,
        read: |u: &User| FieldValue::groups(&u.groups),
    },
];

/// Editor form state. Numeric fields stay raw text until save.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserEdit {
    pub username: String,
    pub last_name: String,
    pub first_name: String,
    pub middle_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub email: String,
    pub phone_number: String,
    pub address: String,
    pub employee_id: String,
    pub position: String,
    pub department: String,
    pub hire_date: Option<NaiveDate>,
    pub contract_type: String,
    pub salary: String,
    pub passport_series: String,
    pub passport_number: String,
    pub marital_status: String,
    pub number_of_children: String,
    pub military_service_info: String,
    pub is_fired: bool,
    pub inn: String,
    pub snils: String,
    pub education: String,
    pub work_experience: String,
    pub skills: String,
    pub qualification_upgrade: String,
    pub awards: String,
    pub disciplinary_actions: String,
    pub attestation_results: String,
    pub medical_exam_results: String,
    pub bank_details: String,
    pub emergency_contact: String,
    pub notes: String,
    /// Group names in list order
    pub groups: Vec<String>,
}

fn owned(v: &Option<String>) -> String {
    v.clone().unwrap_or_default()
}

fn optional(v: &str) -> Option<String> {
    (!v.is_empty()).then(|| v.to_string())
}

fn parse_number<T: std::str::FromStr>(
    field: &'static str,
    input: &str,
) -> Result<Option<T>, ChangeSetError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse()
        .map(Some)
        .map_err(|_| ChangeSetError::InvalidNumber {
            field,
            input: input.to_string(),
        })
}

impl UserEdit {
    /// Pre-fill the editor from a loaded user.
    pub fn from_user(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            last_name: owned(&user.last_name),
            first_name: owned(&user.first_name),
            middle_name: owned(&user.middle_name),
            date_of_birth: user.date_of_birth,
            gender: user.gender.clone(),
            email: owned(&user.email),
            phone_number: owned(&user.phone_number),
            address: owned(&user.address),
            employee_id: owned(&user.employee_id),
            position: owned(&user.position),
            department: owned(&user.department),
            hire_date: user.hire_date,
            contract_type: owned(&user.contract_type),
            salary: user.salary.map(|s| s.to_string()).unwrap_or_default(),
            passport_series: owned(&user.passport_series),
            passport_number: owned(&user.passport_number),
            marital_status: owned(&user.marital_status),
            number_of_children: user
                .number_of_children
                .map(|n| n.to_string())
                .unwrap_or_default(),
            military_service_info: owned(&user.military_service_info),
            is_fired: user.is_fired.unwrap_or(false),
            inn: owned(&user.inn),
            snils: owned(&user.snils),
            education: owned(&user.education),
            work_experience: owned(&user.work_experience),
            skills: owned(&user.skills),
            qualification_upgrade: owned(&user.qualification_upgrade),
            awards: owned(&user.awards),
            disciplinary_actions: owned(&user.disciplinary_actions),
            attestation_results: owned(&user.attestation_results),
            medical_exam_results: owned(&user.medical_exam_results),
            bank_details: owned(&user.bank_details),
            emergency_contact: owned(&user.emergency_contact),
            notes: owned(&user.notes),
            groups: user.group_names(),
        }
    }

    /// Add a group from the catalog picker; duplicates are ignored.
    pub fn add_group(&mut self, name: &str) {
        if !self.groups.iter().any(|g| g == name) {
            self.groups.push(name.to_string());
        }
    }

    pub fn remove_group(&mut self, name: &str) {
        self.groups.retain(|g| g != name);
    }

    /// The edited user as a full entity.
    ///
    /// Numeric fields are parsed first; a parse failure aborts. Group ids
    /// come from `catalog`.
    pub fn to_user(&self, original: &User, catalog: &[AccessGroup]) -> Result<User, ChangeSetError> {
        let salary = parse_number::<f64>("salary", &self.salary)?;
        let number_of_children = parse_number::<i64>("numberOfChildren", &self.number_of_children)?;

        Ok(User {
            id: original.id,
            username: self.username.clone(),
            password: None,
            groups: self
                .groups
                .iter()
                .map(|name| AccessGroup::resolve(name, catalog))
                .collect(),
            employee_id: optional(&self.employee_id),
            last_name: optional(&self.last_name),
            first_name: optional(&self.first_name),
            middle_name: optional(&self.middle_name),
            date_of_birth: self.date_of_birth,
            gender: self.gender.clone(),
            passport_series: optional(&self.passport_series),
            passport_number: optional(&self.passport_number),
            address: optional(&self.address),
            phone_number: optional(&self.phone_number),
            email: optional(&self.email),
            position: optional(&self.position),
            department: optional(&self.department),
            hire_date: self.hire_date,
            contract_type: optional(&self.contract_type),
            salary,
            education: optional(&self.education),
            work_experience: optional(&self.work_experience),
            skills: optional(&self.skills),
            marital_status: optional(&self.marital_status),
            number_of_children,
            military_service_info: optional(&self.military_service_info),
            inn: optional(&self.inn),
            snils: optional(&self.snils),
            qualification_upgrade: optional(&self.qualification_upgrade),
            awards: optional(&self.awards),
            disciplinary_actions: optional(&self.disciplinary_actions),
            attestation_results: optional(&self.attestation_results),
            medical_exam_results: optional(&self.medical_exam_results),
            bank_details: optional(&self.bank_details),
            emergency_contact: optional(&self.emergency_contact),
            notes: optional(&self.notes),
            is_fired: Some(self.is_fired),
        })
    }
}

/// Minimal update for the user editor.
pub fn build_user_change_set(
    original: &User,
    edit: &UserEdit,
    catalog: &[AccessGroup],
) -> Result<ChangeSet, ChangeSetError> {
    let edited = edit.to_user(original, catalog)?;
    Ok(diff_fields(USER_FIELDS, original, &edited))
}
