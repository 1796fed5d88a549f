//! Service-level error types.

use folio_engine::{EngineError, ResolverError};
use folio_store::StoreError;

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Infrastructure failures surfaced by a flow.
///
/// Document-level problems never end up here; they travel as data inside
/// [`crate::ServiceReply::user_errors`].
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Resolver(#[from] ResolverError),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}
