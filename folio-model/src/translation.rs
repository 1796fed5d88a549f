use crate::Document;
use chrono::{DateTime, Utc};
use folio_types::{MenuId, ProjectId, TranslationId};
use serde::{Deserialize, Serialize};

/// Per-language field values for an item.
///
/// `value` maps field keys to translated values — a string for scalar
/// fields, a list of strings for list fields. The engine validates the map
/// shape only; which keys are meaningful is up to the menu schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Translation {
    pub id: TranslationId,
    pub project_id: ProjectId,
    pub menu_id: MenuId,
    pub subject_id: String,
    pub subject: String,
    pub lang: String,
    #[serde(default)]
    pub value: Document,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_by: String,
}
