//! Error types for the document field engine.
//!
//! Two distinct classes, deliberately kept apart:
//! - [`FieldError`] — a user/document error, addressed by field path and
//!   returned as *data* inside a [`ValidationReport`]. Never raised through
//!   `Result`.
//! - [`EngineError`] — an infrastructure failure (malformed schema rule),
//!   which aborts the whole validation pass.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Infrastructure failures distinct from document-level errors.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A stored validation rule cannot be interpreted, e.g. a `regex` rule
    /// whose pattern does not compile.
    #[error("invalid rule on field '{field}': {reason}")]
    InvalidRule { field: String, reason: String },
}

/// One segment of a field error path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => f.write_str(key),
            Self::Index(index) => write!(f, "{index}"),
        }
    }
}

/// A path-addressed, self-describing document error.
///
/// Paths follow input structure: `["doc", key]` for a scalar field,
/// `["doc", key, index]` for a list element, `["doc", key, index, subkey]`
/// for a composite sub-field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub path: Vec<PathSegment>,
    pub message: String,
}

impl FieldError {
    /// Creates an error from path segments and a message.
    pub fn new<P, S>(path: P, message: impl Into<String>) -> Self
    where
        P: IntoIterator<Item = S>,
        S: Into<PathSegment>,
    {
        Self {
            path: path.into_iter().map(Into::into).collect(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, seg) in self.path.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{seg}")?;
        }
        write!(f, ": {}", self.message)
    }
}
