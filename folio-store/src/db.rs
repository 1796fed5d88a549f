//! Shared SQLite handle and schema bootstrap.

use crate::error::StoreResult;
use crate::item_store::ItemStore;
use crate::menu_store::MenuStore;
use crate::oracle::{MenuHandleOracle, SqlItemUniquenessOracle};
use crate::translation_store::TranslationStore;
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// A Folio database: one SQLite file holding menus, items and translations.
///
/// Stores hand out cheap clones of the shared connection. Last-write-wins;
/// no transactions span the validate-then-persist sequence (the uniqueness
/// check-then-write race is an accepted gap, see DESIGN.md).
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Opens (or creates) a database at the given path.
    pub fn open(path: &Path) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.init_schema()?;
        Ok(db)
    }

    /// Opens an in-memory database (for testing).
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.init_schema()?;
        Ok(db)
    }

    fn init_schema(&self) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS menus (
                id TEXT PRIMARY KEY,
                project_id TEXT NOT NULL,
                title TEXT NOT NULL,
                handle TEXT NOT NULL,
                fields TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                created_by TEXT NOT NULL,
                updated_by TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_menus_project ON menus(project_id);
            CREATE INDEX IF NOT EXISTS idx_menus_handle ON menus(project_id, handle);

            CREATE TABLE IF NOT EXISTS items (
                id TEXT PRIMARY KEY,
                project_id TEXT NOT NULL,
                menu_id TEXT NOT NULL,
                parent_id TEXT,
                subject TEXT,
                subject_id TEXT,
                doc TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                created_by TEXT NOT NULL,
                updated_by TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_items_scope ON items(project_id, menu_id);

            CREATE TABLE IF NOT EXISTS translations (
                id TEXT PRIMARY KEY,
                project_id TEXT NOT NULL,
                menu_id TEXT NOT NULL,
                subject_id TEXT NOT NULL,
                subject TEXT NOT NULL,
                lang TEXT NOT NULL,
                value TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                created_by TEXT NOT NULL,
                updated_by TEXT NOT NULL,
                UNIQUE(project_id, menu_id, subject_id, lang)
            );
            ",
        )?;
        Ok(())
    }

    /// A menu store over this database.
    #[must_use]
    pub fn menus(&self) -> MenuStore {
        MenuStore::new(Arc::clone(&self.conn))
    }

    /// An item store over this database.
    #[must_use]
    pub fn items(&self) -> ItemStore {
        ItemStore::new(Arc::clone(&self.conn))
    }

    /// A translation store over this database.
    #[must_use]
    pub fn translations(&self) -> TranslationStore {
        TranslationStore::new(Arc::clone(&self.conn))
    }

    /// A uniqueness oracle over item document fields.
    #[must_use]
    pub fn item_oracle(&self) -> SqlItemUniquenessOracle {
        SqlItemUniquenessOracle::new(Arc::clone(&self.conn))
    }

    /// A uniqueness oracle over menu handles.
    #[must_use]
    pub fn handle_oracle(&self) -> MenuHandleOracle {
        MenuHandleOracle::new(self.menus())
    }
}
