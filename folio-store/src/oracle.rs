//! SQL-backed implementations of the engine's uniqueness oracle.
//!
//! Two scopes exist: document fields (keys prefixed `doc.`, answered via
//! `json_extract` over the items table) and menu handles (project-scoped
//! column lookup). Query failures degrade to [`Uniqueness::Unknown`] so a
//! broken check never blocks a write.

use crate::menu_store::MenuStore;
use async_trait::async_trait;
use folio_engine::{UniqueScope, Uniqueness, UniquenessOracle};
use folio_types::MenuId;
use rusqlite::{Connection, params_from_iter};
use std::sync::{Arc, Mutex};
use tracing::warn;

/// Answers uniqueness questions for item document fields.
pub struct SqlItemUniquenessOracle {
    conn: Arc<Mutex<Connection>>,
}

impl SqlItemUniquenessOracle {
    pub(crate) fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn count_conflicts(&self, value: &str, scope: &UniqueScope) -> rusqlite::Result<i64> {
        let field = scope.key.strip_prefix("doc.").unwrap_or(&scope.key);
        let menu_id = match scope.menu_id {
            Some(id) => id,
            // Document fields are always menu scoped; no menu means no
            // population to conflict with.
            None => return Ok(0),
        };

        let mut sql = String::from(
            "SELECT COUNT(*) FROM items
             WHERE project_id = ? AND menu_id = ? AND json_extract(doc, ?) = ?",
        );
        let path = format!("$.{field}");
        let mut params: Vec<String> = vec![
            scope.project_id.to_string(),
            menu_id.to_string(),
            path,
            value.to_owned(),
        ];
        if let Some(exclude) = scope.exclude_id {
            sql.push_str(" AND id != ?");
            params.push(exclude.to_string());
        }

        let conn = self.conn.lock().unwrap();
        conn.query_row(&sql, params_from_iter(params), |row| row.get(0))
    }
}

#[async_trait]
impl UniquenessOracle for SqlItemUniquenessOracle {
    async fn check_unique(&self, value: Option<&str>, scope: &UniqueScope) -> Uniqueness {
        // Absent values never conflict; the required rule handles absence.
        let Some(value) = value else {
            return Uniqueness::Unique;
        };
        match self.count_conflicts(value, scope) {
            Ok(0) => Uniqueness::Unique,
            Ok(_) => Uniqueness::Conflict,
            Err(error) => {
                warn!(key = %scope.key, %error, "uniqueness lookup failed");
                Uniqueness::Unknown
            }
        }
    }
}

/// Answers uniqueness questions for menu handles within a project.
pub struct MenuHandleOracle {
    menus: MenuStore,
}

impl MenuHandleOracle {
    pub(crate) fn new(menus: MenuStore) -> Self {
        Self { menus }
    }
}

#[async_trait]
impl UniquenessOracle for MenuHandleOracle {
    async fn check_unique(&self, value: Option<&str>, scope: &UniqueScope) -> Uniqueness {
        let Some(value) = value else {
            return Uniqueness::Unique;
        };
        let exclude = scope.exclude_id.map(MenuId::from_uuid);
        match self.menus.handle_exists(scope.project_id, value, exclude) {
            Ok(true) => Uniqueness::Conflict,
            Ok(false) => Uniqueness::Unique,
            Err(error) => {
                warn!(%error, "handle uniqueness lookup failed");
                Uniqueness::Unknown
            }
        }
    }
}
