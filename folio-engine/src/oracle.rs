//! External collaborator seams: uniqueness checks and file references.
//!
//! The engine consults these during a validation pass but never persists
//! through them; concrete implementations live in `folio-store` (SQL) and
//! in test stubs.

use async_trait::async_trait;
use folio_types::{MenuId, ProjectId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Tri-state answer to "does another record already have this value".
///
/// `Unknown` means the oracle itself failed; the engine treats that as a
/// pass, preferring availability over strict correctness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Uniqueness {
    Unique,
    Conflict,
    Unknown,
}

/// The scope of one uniqueness question.
///
/// Constructed per unique-constrained field per validation pass and
/// discarded once answered. `menu_id` is `None` for project-scoped checks
/// (menu handles); `exclude_id` is the record being updated, so it does not
/// conflict with itself.
#[derive(Debug, Clone)]
pub struct UniqueScope {
    pub project_id: ProjectId,
    pub menu_id: Option<MenuId>,
    /// Document path of the checked value, e.g. `doc.title` or `handle`.
    pub key: String,
    pub exclude_id: Option<Uuid>,
}

/// Abstraction over a cross-record uniqueness lookup.
#[async_trait]
pub trait UniquenessOracle: Send + Sync {
    async fn check_unique(&self, value: Option<&str>, scope: &UniqueScope) -> Uniqueness;
}

/// Resolved metadata for an opaque file reference id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileReference {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

/// Error from the file reference resolver service.
#[derive(Debug, thiserror::Error)]
#[error("file reference resolution failed: {0}")]
pub struct ResolverError(pub String);

/// Resolves opaque file reference ids to renderable metadata.
///
/// Invoked once per document batch by the service layer; the engine only
/// collects the ids (file_reference fields are string-validated, their
/// existence is never checked at validation time).
#[async_trait]
pub trait FileReferenceResolver: Send + Sync {
    async fn resolve(
        &self,
        project_id: ProjectId,
        ids: &[String],
    ) -> Result<Vec<FileReference>, ResolverError>;
}
