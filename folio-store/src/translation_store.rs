//! Persistent storage for per-language translation records.

use crate::error::{StoreError, StoreResult};
use crate::menu_store::{parse_id, parse_timestamp};
use folio_model::Translation;
use folio_types::{MenuId, ProjectId, TranslationId};
use rusqlite::{Connection, Row, params};
use std::sync::{Arc, Mutex};

/// Access to the `translations` table. One record per
/// (project, menu, subject, language); writes are upserts.
pub struct TranslationStore {
    conn: Arc<Mutex<Connection>>,
}

type TranslationRow = (
    String,
    String,
    String,
    String,
    String,
    String,
    String,
    String,
    String,
    String,
    String,
);

impl TranslationStore {
    pub(crate) fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// Inserts or replaces the translation for its scope.
    pub fn upsert(&self, translation: &Translation) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO translations (id, project_id, menu_id, subject_id, subject, lang, value, created_at, updated_at, created_by, updated_by)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
             ON CONFLICT(project_id, menu_id, subject_id, lang)
             DO UPDATE SET subject = ?5, value = ?7, updated_at = ?9, updated_by = ?11",
            params![
                translation.id.to_string(),
                translation.project_id.to_string(),
                translation.menu_id.to_string(),
                translation.subject_id,
                translation.subject,
                translation.lang,
                serde_json::to_string(&translation.value)?,
                translation.created_at.to_rfc3339(),
                translation.updated_at.to_rfc3339(),
                translation.created_by,
                translation.updated_by,
            ],
        )?;
        Ok(())
    }

    /// Point lookup by scope.
    pub fn get(
        &self,
        project_id: ProjectId,
        menu_id: MenuId,
        subject_id: &str,
        lang: &str,
    ) -> StoreResult<Translation> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, project_id, menu_id, subject_id, subject, lang, value, created_at, updated_at, created_by, updated_by
             FROM translations
             WHERE project_id = ?1 AND menu_id = ?2 AND subject_id = ?3 AND lang = ?4",
        )?;
        let row = stmt
            .query_row(
                params![
                    project_id.to_string(),
                    menu_id.to_string(),
                    subject_id,
                    lang
                ],
                read_row,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => {
                    StoreError::NotFound(format!("translation {subject_id}/{lang}"))
                }
                other => StoreError::Database(other),
            })?;
        decode_row(row)
    }

    /// Lists all translations for a subject across languages.
    pub fn list_for_subject(
        &self,
        project_id: ProjectId,
        menu_id: MenuId,
        subject_id: &str,
    ) -> StoreResult<Vec<Translation>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, project_id, menu_id, subject_id, subject, lang, value, created_at, updated_at, created_by, updated_by
             FROM translations
             WHERE project_id = ?1 AND menu_id = ?2 AND subject_id = ?3
             ORDER BY lang",
        )?;
        let rows = stmt.query_map(
            params![project_id.to_string(), menu_id.to_string(), subject_id],
            read_row,
        )?;

        let mut translations = Vec::new();
        for row in rows {
            translations.push(decode_row(row?)?);
        }
        Ok(translations)
    }

    /// Deletes a translation by id.
    pub fn delete(&self, project_id: ProjectId, id: TranslationId) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();
        let changed = conn.execute(
            "DELETE FROM translations WHERE id = ?1 AND project_id = ?2",
            params![id.to_string(), project_id.to_string()],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound(format!("translation {id}")));
        }
        Ok(())
    }
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<TranslationRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
        row.get(7)?,
        row.get(8)?,
        row.get(9)?,
        row.get(10)?,
    ))
}

fn decode_row(row: TranslationRow) -> StoreResult<Translation> {
    let (
        id,
        project_id,
        menu_id,
        subject_id,
        subject,
        lang,
        value,
        created_at,
        updated_at,
        created_by,
        updated_by,
    ) = row;
    Ok(Translation {
        id: parse_id(&id, "translation id")?,
        project_id: parse_id(&project_id, "project id")?,
        menu_id: parse_id(&menu_id, "menu id")?,
        subject_id,
        subject,
        lang,
        value: serde_json::from_str(&value)?,
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
        created_by,
        updated_by,
    })
}
