//! Partial-update construction
//!
//! An entity type declares its editable fields once, as a static table of
//! [`FieldSpec`] rows. [`diff_fields`] walks that table over the original
//! snapshot and the edited copy and keeps only the fields whose values
//! differ.
//!
//! There is no version token: the diff is computed against the editor's
//! own snapshot and the last writer of each field wins.

use chrono::NaiveDate;
use serde_json::{Map, Value, json};
use shared::models::AccessGroup;
use thiserror::Error;

/// Declared type of an editable field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    Integer,
    Bool,
    Date,
    Groups,
}

/// Comparable value of one field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Empty,
    Text(String),
    Number(f64),
    Integer(i64),
    Bool(bool),
    Date(NaiveDate),
    Groups(Vec<AccessGroup>),
}

impl FieldValue {
    /// Absent and blank text are the same: empty.
    pub fn text(value: Option<&str>) -> Self {
        match value {
            Some(v) if !v.is_empty() => FieldValue::Text(v.to_string()),
            _ => FieldValue::Empty,
        }
    }

    pub fn number(value: Option<f64>) -> Self {
        value.map_or(FieldValue::Empty, FieldValue::Number)
    }

    pub fn integer(value: Option<i64>) -> Self {
        value.map_or(FieldValue::Empty, FieldValue::Integer)
    }

    pub fn date(value: Option<NaiveDate>) -> Self {
        value.map_or(FieldValue::Empty, FieldValue::Date)
    }

    pub fn groups(value: &[AccessGroup]) -> Self {
        if value.is_empty() {
            FieldValue::Empty
        } else {
            FieldValue::Groups(value.to_vec())
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, FieldValue::Empty)
    }

    fn matches_kind(&self, kind: FieldKind) -> bool {
        matches!(
            (self, kind),
            (FieldValue::Empty, _)
                | (FieldValue::Text(_), FieldKind::Text)
                | (FieldValue::Number(_), FieldKind::Number)
                | (FieldValue::Integer(_), FieldKind::Integer)
                | (FieldValue::Bool(_), FieldKind::Bool)
                | (FieldValue::Date(_), FieldKind::Date)
                | (FieldValue::Groups(_), FieldKind::Groups)
        )
    }

    /// Exact equality; group lists compare by name, in order.
    fn same_as(&self, other: &FieldValue) -> bool {
        match (self, other) {
            (FieldValue::Groups(a), FieldValue::Groups(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.name == y.name)
            }
            _ => self == other,
        }
    }

    /// Wire form. Empty becomes an explicit `null` (clear the field).
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Empty => Value::Null,
            FieldValue::Text(s) => Value::String(s.clone()),
            FieldValue::Number(n) => json!(n),
            FieldValue::Integer(n) => json!(n),
            FieldValue::Bool(b) => Value::Bool(*b),
            // Backend stores instants; a picked date means midnight UTC.
            FieldValue::Date(d) => Value::String(format!("{}T00:00:00Z", d.format("%Y-%m-%d"))),
            FieldValue::Groups(groups) => Value::Array(
                groups
                    .iter()
                    .map(|g| match g.id {
                        Some(id) => json!({ "id": id, "name": g.name }),
                        None => json!({ "name": g.name }),
                    })
                    .collect(),
            ),
        }
    }
}

/// One editable field of `T`
pub struct FieldSpec<T> {
    /// Wire name in the update payload
    pub name: &'static str,
    pub kind: FieldKind,
    pub read: fn(&T) -> FieldValue,
}

impl<T> std::fmt::Debug for FieldSpec<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldSpec")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish()
    }
}

/// Field name → new value. `null` means "clear this field".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeSet {
    fields: Map<String, Value>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.fields.insert(name.into(), value);
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn as_json(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_json(self) -> Map<String, Value> {
        self.fields
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChangeSetError {
    #[error("Invalid value for {field}: {input:?}")]
    InvalidNumber { field: &'static str, input: String },
}

/// Structural diff of `edited` against `original` over `table`.
///
/// A field is included iff its values differ. Both-empty is never a
/// change; set-to-empty is included as `null`.
pub fn diff_fields<T>(table: &[FieldSpec<T>], original: &T, edited: &T) -> ChangeSet {
    let mut changes = ChangeSet::new();
    for field in table {
        let before = (field.read)(original);
        let after = (field.read)(edited);
        debug_assert!(after.matches_kind(field.kind), "{} reads as {:?}", field.name, after);
        if before.is_empty() && after.is_empty() {
            continue;
        }
        if !before.same_as(&after) {
            changes.insert(field.name, after.to_json());
        }
    }
    changes
}
