//! Dynamic document field engine for Folio.
//!
//! Given a runtime-defined field schema and a partially-specified input
//! document, the engine validates, coerces and normalizes every declared
//! field, enforces cross-record uniqueness through an oracle, derives slugs
//! for handle fields, and produces structured, path-addressed errors:
//! - [`Engine`] — the orchestrator; one instance serves create and update
//! - [`validators`] — the pure scalar primitives the engine composes
//! - [`meta`] — the same discipline applied to menu *schema* edits
//! - [`UniquenessOracle`] / [`FileReferenceResolver`] — collaborator seams
//!
//! Validation failures are data ([`FieldError`] values inside a
//! [`ValidationReport`]), never `Err`; `Err` is reserved for infrastructure
//! failures ([`EngineError`]).

mod dispatch;
mod engine;
mod error;
mod oracle;
mod rules;
mod slug;

pub mod meta;
pub mod validators;

pub use engine::{
    DocumentPatch, Engine, Mode, ValidationContext, ValidationReport, collect_file_references,
};
pub use error::{EngineError, EngineResult, FieldError, PathSegment};
pub use oracle::{
    FileReference, FileReferenceResolver, ResolverError, UniqueScope, Uniqueness, UniquenessOracle,
};
pub use rules::RuleSet;
pub use slug::slugify;
