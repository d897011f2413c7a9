//! Form state, validation and partial-update construction

pub mod changeset;
pub mod report_edit;
pub mod user_edit;
pub mod validation;

pub use changeset::{ChangeSet, ChangeSetError, FieldKind, FieldSpec, FieldValue, diff_fields};
pub use report_edit::{REPORT_FIELDS, ReportEdit, build_report_change_set};
pub use user_edit::{USER_FIELDS, UserEdit, build_user_change_set};
pub use validation::{
    ReportForm, ReportFormError, TimeInputMask, is_valid_incident_time, validate_report_form,
};
