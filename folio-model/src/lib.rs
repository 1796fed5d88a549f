//! Content model for Folio.
//!
//! Defines the types that all Folio subsystems depend on:
//! - [`Menu`] — a tenant-defined schema: a named, ordered list of typed fields
//! - [`FieldSchema`] / [`FieldType`] — one typed slot in a menu's schema
//! - [`ValidationRule`] / [`RuleCode`] / [`RuleKind`] — constraints attached to a field
//! - [`Item`] — a document instance conforming to a menu, optionally parented
//! - [`Translation`] — per-language field values for an item
//!
//! These types are consumed by the document field engine, the store and the
//! service layer. They carry no validation logic themselves; the engine in
//! `folio-engine` interprets them.

mod field;
mod item;
mod menu;
mod translation;

pub use field::{FieldSchema, FieldType, RuleCode, RuleKind, ValidationRule};
pub use item::{Document, Item};
pub use menu::Menu;
pub use translation::Translation;
