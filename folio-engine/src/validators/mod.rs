//! Scalar validators — the pure primitives the engine composes.
//!
//! Each validator takes the raw JSON value (if any) and a type-specific
//! option set, and returns both an error list and a best-effort normalized
//! value, even on failure, so callers can still inspect a partial value
//! without re-deriving it.
//!
//! `None` raw means the key was absent from the input; `Some(Value::Null)`
//! is an explicit null. Both fail a `required` check.

mod array;
mod date;
mod number;
mod string;

pub use array::{ArrayOptions, ArrayResult, ElementRules, validate_array};
pub use date::{DateOptions, DateTimeOptions, validate_date, validate_datetime};
pub use number::{NumberOptions, validate_number};
pub use string::{StringOptions, validate_string};

/// Fixed diagnostic messages shared with API clients.
pub mod messages {
    pub const REQUIRED: &str = "Value is required";
    pub const UNIQUE: &str = "Value must be unique";
    pub const URL_SCHEME: &str = "Value cannot have an empty scheme (protocol), must include one of the following URL schemes: [\"http\", \"https\", \"mailto\", \"sms\", \"tel\"].";
}

/// Checks presence: absent key or explicit null both count as missing.
pub(crate) fn is_missing(raw: Option<&serde_json::Value>) -> bool {
    matches!(raw, None | Some(serde_json::Value::Null))
}
