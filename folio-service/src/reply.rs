//! The common reply envelope for mutation flows.

use folio_engine::FieldError;
use serde::Serialize;

/// Outcome of a validate-then-persist flow.
///
/// Exactly one of the two halves is populated: `data` on success,
/// `user_errors` when validation rejected the input. Both empty never
/// happens; both populated never happens.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceReply<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub user_errors: Vec<FieldError>,
}

impl<T> ServiceReply<T> {
    /// A successful reply carrying the persisted record.
    #[must_use]
    pub fn ok(data: T) -> Self {
        Self {
            data: Some(data),
            user_errors: Vec::new(),
        }
    }

    /// A rejection carrying the validation errors; nothing was persisted.
    #[must_use]
    pub fn invalid(user_errors: Vec<FieldError>) -> Self {
        Self {
            data: None,
            user_errors,
        }
    }

    /// True when the flow persisted its record.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.data.is_some()
    }
}
