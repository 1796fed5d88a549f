//! Core type definitions for Folio.
//!
//! This crate defines the fundamental, schema-agnostic types used throughout
//! the content backend:
//! - Project, menu, item and translation identifiers (UUID v7)
//!
//! Everything schema-specific (field types, validation rules, documents)
//! belongs in `folio-model`, not here.

mod ids;

pub use ids::{ItemId, MenuId, ProjectId, TranslationId};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid UUID: {0}")]
    InvalidUuid(#[from] uuid::Error),
}
