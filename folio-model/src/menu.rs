use crate::FieldSchema;
use chrono::{DateTime, Utc};
use folio_types::{MenuId, ProjectId};
use serde::{Deserialize, Serialize};

/// A tenant-defined schema plus metadata, analogous to a content type.
///
/// The `handle` is the URL-safe name, unique within a project. `fields`
/// is the ordered field schema the document engine validates items against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Menu {
    pub id: MenuId,
    pub project_id: ProjectId,
    pub title: String,
    pub handle: String,
    #[serde(default)]
    pub fields: Vec<FieldSchema>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_by: String,
}

impl Menu {
    /// Looks a field schema up by key.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.key == key)
    }
}
