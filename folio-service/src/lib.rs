//! Validate-then-persist flows for Folio.
//!
//! Each service wires the document engine (or the schema meta-validator)
//! in front of the SQLite store, mirroring one REST controller:
//! - [`ItemService`] — create/update items through the field engine
//! - [`MenuService`] — create/update menus through the meta-validator
//! - [`TranslationService`] — upsert per-language value maps
//!
//! Mutations return a [`ServiceReply`]: persisted data on success, the
//! engine's path-addressed errors on rejection. Infrastructure failures
//! surface as [`ServiceError`].

mod error;
mod item;
mod menu;
mod reply;
mod translation;

pub use error::{ServiceError, ServiceResult};
pub use item::ItemService;
pub use menu::MenuService;
pub use reply::ServiceReply;
pub use translation::TranslationService;
