//! Translation flows: shape-validate the value map, then upsert.

use crate::error::ServiceResult;
use crate::reply::ServiceReply;
use chrono::Utc;
use folio_engine::{FieldError, PathSegment};
use folio_engine::validators::{
    ArrayOptions, ElementRules, StringOptions, validate_array, validate_string,
};
use folio_model::{Document, Translation};
use folio_store::{Database, TranslationStore};
use folio_types::{MenuId, ProjectId, TranslationId};
use serde_json::Value;

/// Upsert and query per-language translation records.
///
/// Translation values are free-form relative to the menu schema: each key
/// must carry a string or a list of strings, nothing else is checked.
pub struct TranslationService {
    translations: TranslationStore,
}

impl TranslationService {
    #[must_use]
    pub fn new(db: &Database) -> Self {
        Self {
            translations: db.translations(),
        }
    }

    /// Validates and writes the translation for one (subject, language)
    /// pair, replacing any previous value.
    pub async fn upsert_translation(
        &self,
        project_id: ProjectId,
        menu_id: MenuId,
        subject_id: &str,
        lang: &str,
        value: &Document,
        actor: &str,
    ) -> ServiceResult<ServiceReply<Translation>> {
        let mut errors = Vec::new();

        if lang.trim().is_empty() {
            errors.push(FieldError::new(["lang"], "Value is required"));
        }
        if subject_id.trim().is_empty() {
            errors.push(FieldError::new(["subject_id"], "Value is required"));
        }

        let mut normalized = Document::new();
        for (key, raw) in value {
            validate_entry(key, raw, &mut errors, &mut normalized);
        }

        if !errors.is_empty() {
            return Ok(ServiceReply::invalid(errors));
        }

        let now = Utc::now();
        let translation = Translation {
            id: TranslationId::new(),
            project_id,
            menu_id,
            subject_id: subject_id.to_string(),
            subject: "content".to_string(),
            lang: lang.to_string(),
            value: normalized,
            created_at: now,
            updated_at: now,
            created_by: actor.to_string(),
            updated_by: actor.to_string(),
        };
        self.translations.upsert(&translation)?;

        let persisted = self
            .translations
            .get(project_id, menu_id, subject_id, lang)?;
        Ok(ServiceReply::ok(persisted))
    }

    pub fn get_translation(
        &self,
        project_id: ProjectId,
        menu_id: MenuId,
        subject_id: &str,
        lang: &str,
    ) -> ServiceResult<Translation> {
        Ok(self
            .translations
            .get(project_id, menu_id, subject_id, lang)?)
    }

    pub fn list_translations(
        &self,
        project_id: ProjectId,
        menu_id: MenuId,
        subject_id: &str,
    ) -> ServiceResult<Vec<Translation>> {
        Ok(self
            .translations
            .list_for_subject(project_id, menu_id, subject_id)?)
    }
}

/// One value-map entry: a string, or a list of strings.
///
/// Errors land at `[key]` for the value itself and `[key, index]` for a
/// failing list element.
fn validate_entry(key: &str, raw: &Value, errors: &mut Vec<FieldError>, out: &mut Document) {
    if let Value::Array(_) = raw {
        let opts = ArrayOptions {
            element: Some(ElementRules::Text(StringOptions::default())),
            ..ArrayOptions::default()
        };
        let result = validate_array(Some(raw), &opts);
        if let Some(msg) = result.field_errors.into_iter().next() {
            errors.push(FieldError::new([key], msg));
            return;
        }
        for (index, slot) in result.element_errors.iter().enumerate() {
            if let Some(msg) = slot {
                errors.push(FieldError::new(
                    [PathSegment::from(key), PathSegment::from(index)],
                    msg.clone(),
                ));
            }
        }
        if result.element_errors.iter().all(Option::is_none)
            && let Some(entries) = result.value
        {
            out.insert(key.to_string(), Value::Array(entries));
        }
        return;
    }

    let (errs, value) = validate_string(Some(raw), &StringOptions::default());
    if let Some(msg) = errs.into_iter().next() {
        errors.push(FieldError::new([key], msg));
    } else if let Some(value) = value {
        out.insert(key.to_string(), Value::String(value));
    }
}
