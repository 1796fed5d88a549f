//! Persistent storage for items (documents), scoped by project and menu.

use crate::error::{StoreError, StoreResult};
use crate::menu_store::{parse_id, parse_timestamp};
use crate::params::Parameters;
use folio_model::Item;
use folio_types::{ItemId, MenuId, ProjectId};
use rusqlite::{Connection, Row, params};
use std::sync::{Arc, Mutex};

/// CRUD access to the `items` table.
pub struct ItemStore {
    conn: Arc<Mutex<Connection>>,
}

type ItemRow = (
    String,
    String,
    String,
    Option<String>,
    Option<String>,
    Option<String>,
    String,
    String,
    String,
    String,
    String,
);

const SELECT_COLUMNS: &str = "id, project_id, menu_id, parent_id, subject, subject_id, doc, \
     created_at, updated_at, created_by, updated_by";

impl ItemStore {
    pub(crate) fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// Inserts a new item.
    pub fn insert(&self, item: &Item) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO items (id, project_id, menu_id, parent_id, subject, subject_id, doc, created_at, updated_at, created_by, updated_by)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                item.id.to_string(),
                item.project_id.to_string(),
                item.menu_id.to_string(),
                item.parent_id.map(|id| id.to_string()),
                item.subject,
                item.subject_id,
                serde_json::to_string(&item.doc)?,
                item.created_at.to_rfc3339(),
                item.updated_at.to_rfc3339(),
                item.created_by,
                item.updated_by,
            ],
        )?;
        Ok(())
    }

    /// Updates an existing item in place.
    pub fn update(&self, item: &Item) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();
        let changed = conn.execute(
            "UPDATE items SET parent_id = ?4, subject = ?5, subject_id = ?6, doc = ?7, updated_at = ?8, updated_by = ?9
             WHERE id = ?1 AND project_id = ?2 AND menu_id = ?3",
            params![
                item.id.to_string(),
                item.project_id.to_string(),
                item.menu_id.to_string(),
                item.parent_id.map(|id| id.to_string()),
                item.subject,
                item.subject_id,
                serde_json::to_string(&item.doc)?,
                item.updated_at.to_rfc3339(),
                item.updated_by,
            ],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound(format!("item {}", item.id)));
        }
        Ok(())
    }

    /// Point lookup by id within a project+menu scope.
    pub fn get(&self, project_id: ProjectId, menu_id: MenuId, id: ItemId) -> StoreResult<Item> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM items WHERE id = ?1 AND project_id = ?2 AND menu_id = ?3"
        ))?;
        let row = stmt
            .query_row(
                params![id.to_string(), project_id.to_string(), menu_id.to_string()],
                read_row,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound(format!("item {id}")),
                other => StoreError::Database(other),
            })?;
        decode_row(row)
    }

    /// Lists items in a menu, id-ascending, honoring paging parameters.
    pub fn list(
        &self,
        project_id: ProjectId,
        menu_id: MenuId,
        parameters: &Parameters,
    ) -> StoreResult<Vec<Item>> {
        let conn = self.conn.lock().unwrap();
        let mut sql =
            format!("SELECT {SELECT_COLUMNS} FROM items WHERE project_id = ?1 AND menu_id = ?2");
        let mut args: Vec<String> = vec![project_id.to_string(), menu_id.to_string()];

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

        let mut items = Vec::new();
        for row in rows {
            items.push(decode_row(row?)?);
        }
        Ok(items)
    }

    /// Number of items in a menu.
    pub fn count(&self, project_id: ProjectId, menu_id: MenuId) -> StoreResult<usize> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM items WHERE project_id = ?1 AND menu_id = ?2",
            params![project_id.to_string(), menu_id.to_string()],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Deletes an item.
    pub fn delete(&self, project_id: ProjectId, menu_id: MenuId, id: ItemId) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();
        let changed = conn.execute(
            "DELETE FROM items WHERE id = ?1 AND project_id = ?2 AND menu_id = ?3",
            params![id.to_string(), project_id.to_string(), menu_id.to_string()],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound(format!("item {id}")));
        }
        Ok(())
    }

    /// Resolves a candidate parent id to an existing item in the same
    /// scope, or `None` when the parent does not exist.
    pub fn resolve_parent(
        &self,
        project_id: ProjectId,
        menu_id: MenuId,
        parent_id: Option<ItemId>,
    ) -> StoreResult<Option<ItemId>> {
        let Some(parent_id) = parent_id else {
            return Ok(None);
        };
        match self.get(project_id, menu_id, parent_id) {
            Ok(parent) => Ok(Some(parent.id)),
            Err(StoreError::NotFound(_)) => Ok(None),
            Err(other) => Err(other),
        }
    }
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<ItemRow> {
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

fn decode_row(row: ItemRow) -> StoreResult<Item> {
    let (
        id,
        project_id,
        menu_id,
        parent_id,
        subject,
        subject_id,
        doc,
        created_at,
        updated_at,
        created_by,
        updated_by,
    ) = row;
    Ok(Item {
        id: parse_id(&id, "item id")?,
        project_id: parse_id(&project_id, "project id")?,
        menu_id: parse_id(&menu_id, "menu id")?,
        parent_id: parent_id
            .map(|p| parse_id(&p, "parent id"))
            .transpose()?,
        subject,
        subject_id,
        doc: serde_json::from_str(&doc)?,
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
        created_by,
        updated_by,
    })
}
