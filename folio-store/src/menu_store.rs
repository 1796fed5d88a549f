//! Persistent storage for menus (tenant-defined field schemas).

use crate::error::{StoreError, StoreResult};
use crate::params::Parameters;
use chrono::{DateTime, Utc};
use folio_model::Menu;
use folio_types::{MenuId, ProjectId};
use rusqlite::{Connection, Row, params};
use std::sync::{Arc, Mutex};

/// CRUD access to the `menus` table, always scoped by project.
pub struct MenuStore {
    conn: Arc<Mutex<Connection>>,
}

type MenuRow = (
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

impl MenuStore {
    pub(crate) fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// Inserts a new menu.
    pub fn insert(&self, menu: &Menu) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO menus (id, project_id, title, handle, fields, created_at, updated_at, created_by, updated_by)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                menu.id.to_string(),
                menu.project_id.to_string(),
                menu.title,
                menu.handle,
                serde_json::to_string(&menu.fields)?,
                menu.created_at.to_rfc3339(),
                menu.updated_at.to_rfc3339(),
                menu.created_by,
                menu.updated_by,
            ],
        )?;
        Ok(())
    }

    /// Updates an existing menu in place.
    pub fn update(&self, menu: &Menu) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();
        let changed = conn.execute(
            "UPDATE menus SET title = ?3, handle = ?4, fields = ?5, updated_at = ?6, updated_by = ?7
             WHERE id = ?1 AND project_id = ?2",
            params![
                menu.id.to_string(),
                menu.project_id.to_string(),
                menu.title,
                menu.handle,
                serde_json::to_string(&menu.fields)?,
                menu.updated_at.to_rfc3339(),
                menu.updated_by,
            ],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound(format!("menu {}", menu.id)));
        }
        Ok(())
    }

    /// Point lookup by id within a project.
    pub fn get(&self, project_id: ProjectId, id: MenuId) -> StoreResult<Menu> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, project_id, title, handle, fields, created_at, updated_at, created_by, updated_by
             FROM menus WHERE id = ?1 AND project_id = ?2",
        )?;
        let row = stmt
            .query_row(params![id.to_string(), project_id.to_string()], read_row)
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => {
                    StoreError::NotFound(format!("menu {id}"))
                }
                other => StoreError::Database(other),
            })?;
        decode_row(row)
    }

    /// Lists menus for a project, newest-id-last, honoring paging parameters.
    pub fn list(&self, project_id: ProjectId, parameters: &Parameters) -> StoreResult<Vec<Menu>> {
        let conn = self.conn.lock().unwrap();
        let mut sql = String::from(
            "SELECT id, project_id, title, handle, fields, created_at, updated_at, created_by, updated_by
             FROM menus WHERE project_id = ?1",
        );
        let mut args: Vec<String> = vec![project_id.to_string()];

        if let Some(since) = &parameters.since_id {
            args.push(since.clone());
            sql.push_str(&format!(" AND id > ?{}", args.len()));
        }
        if let Some(ids) = &parameters.ids
            && !ids.is_empty()
        {
            let placeholders: Vec<String> = ids
                .iter()
                .map(|id| {
                    args.push(id.clone());
                    format!("?{}", args.len())
                })
                .collect();
            sql.push_str(&format!(" AND id IN ({})", placeholders.join(", ")));
        }
        sql.push_str(&format!(
            " ORDER BY id LIMIT {} OFFSET {}",
            parameters.effective_limit(),
            parameters.offset()
        ));

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(rusqlite::params_from_iter(args.iter()), read_row)?;

        let mut menus = Vec::new();
        for row in rows {
            menus.push(decode_row(row?)?);
        }
        Ok(menus)
    }

    /// Number of menus in a project.
    pub fn count(&self, project_id: ProjectId) -> StoreResult<usize> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM menus WHERE project_id = ?1",
            params![project_id.to_string()],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Deletes a menu.
    pub fn delete(&self, project_id: ProjectId, id: MenuId) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();
        let changed = conn.execute(
            "DELETE FROM menus WHERE id = ?1 AND project_id = ?2",
            params![id.to_string(), project_id.to_string()],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound(format!("menu {id}")));
        }
        Ok(())
    }

    /// Whether another menu in the project already uses this handle.
    pub fn handle_exists(
        &self,
        project_id: ProjectId,
        handle: &str,
        exclude: Option<MenuId>,
    ) -> StoreResult<bool> {
        let conn = self.conn.lock().unwrap();
        let exists: i64 = match exclude {
            Some(id) => conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM menus WHERE project_id = ?1 AND handle = ?2 AND id <> ?3)",
                params![project_id.to_string(), handle, id.to_string()],
                |row| row.get(0),
            )?,
            None => conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM menus WHERE project_id = ?1 AND handle = ?2)",
                params![project_id.to_string(), handle],
                |row| row.get(0),
            )?,
        };
        Ok(exists != 0)
    }
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<MenuRow> {
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
    ))
}

fn decode_row(row: MenuRow) -> StoreResult<Menu> {
    let (id, project_id, title, handle, fields, created_at, updated_at, created_by, updated_by) =
        row;
    Ok(Menu {
        id: parse_id(&id, "menu id")?,
        project_id: parse_id(&project_id, "project id")?,
        title,
        handle,
        fields: serde_json::from_str(&fields)?,
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
        created_by,
        updated_by,
    })
}

pub(crate) fn parse_id<T: std::str::FromStr>(raw: &str, what: &str) -> StoreResult<T> {
    raw.parse()
        .map_err(|_| StoreError::InvalidData(format!("invalid {what}: {raw}")))
}

pub(crate) fn parse_timestamp(raw: &str) -> StoreResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| StoreError::InvalidData(format!("invalid timestamp: {raw}")))
}
