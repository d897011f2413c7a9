//! Access Group Model

use serde::{Deserialize, Serialize};

/// Access group as exchanged with the backend (id + name).
///
/// The session only caches the flat names; this is the canonical form
/// used by the user editor and the group catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
}

impl AccessGroup {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            name: name.into(),
        }
    }

    /// Resolve a group name against a catalog; unknown names keep `id: None`
    pub fn resolve(name: &str, catalog: &[AccessGroup]) -> Self {
        catalog
            .iter()
            .find(|g| g.name == name)
            .cloned()
            .unwrap_or_else(|| Self {
                id: None,
                name: name.to_string(),
            })
    }
}
