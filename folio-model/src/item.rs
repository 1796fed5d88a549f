use chrono::{DateTime, Utc};
use folio_types::{ItemId, MenuId, ProjectId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A validated document body: field key to normalized value.
///
/// Always partial relative to the menu schema. Unknown keys are ignored by
/// the engine, never treated as errors.
pub type Document = serde_json::Map<String, Value>;

/// A document instance conforming to a menu's field schema.
///
/// Items form a hierarchy via `parent_id`. The `subject`/`subject_id` pair
/// optionally links an item to an external record (e.g. a content entry).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub project_id: ProjectId,
    pub menu_id: MenuId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<ItemId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_id: Option<String>,
    #[serde(default)]
    pub doc: Document,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_by: String,
}

impl Item {
    /// Extracts a string field value from `doc`.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.doc.get(key).and_then(|v| v.as_str())
    }

    /// Extracts a numeric field value from `doc`.
    #[must_use]
    pub fn get_number(&self, key: &str) -> Option<f64> {
        self.doc.get(key).and_then(|v| v.as_f64())
    }
}
