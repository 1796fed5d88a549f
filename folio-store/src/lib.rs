//! SQLite persistence for Folio menus, items and translations.
//!
//! One [`Database`] wraps a single connection; per-entity stores
//! ([`MenuStore`], [`ItemStore`], [`TranslationStore`]) clone the shared
//! handle. The SQL-backed uniqueness oracles the validation engine consults
//! also live here.

mod db;
mod error;
mod item_store;
mod menu_store;
mod oracle;
mod params;
mod translation_store;

pub use db::Database;
pub use error::{StoreError, StoreResult};
pub use item_store::ItemStore;
pub use menu_store::MenuStore;
pub use oracle::{MenuHandleOracle, SqlItemUniquenessOracle};
pub use params::Parameters;
pub use translation_store::TranslationStore;
