use super::{is_missing, messages};
use regex::Regex;
use serde_json::Value;

/// Options for [`validate_string`].
#[derive(Debug, Default, Clone)]
pub struct StringOptions {
    pub required: bool,
    pub min: Option<usize>,
    pub max: Option<usize>,
    /// Pattern plus an optional custom message shown instead of the generic one.
    pub regex: Option<(Regex, Option<String>)>,
    pub choices: Option<Vec<String>>,
}

/// Validates and normalizes a string value.
///
/// Returns the trimmed string (best-effort, even when checks fail) or `None`
/// when the input is missing or not a string.
pub fn validate_string(raw: Option<&Value>, opts: &StringOptions) -> (Vec<String>, Option<String>) {
    let mut errors = Vec::new();

    if is_missing(raw) {
        if opts.required {
            errors.push(messages::REQUIRED.to_string());
        }
        return (errors, None);
    }

    let Some(Value::String(s)) = raw else {
        errors.push("Value must be a string".to_string());
        return (errors, None);
    };

    let value = s.trim().to_string();

    if value.is_empty() {
        if opts.required {
            errors.push(messages::REQUIRED.to_string());
        }
        return (errors, Some(value));
    }

    let len = value.chars().count();
    if let Some(min) = opts.min
        && len < min
    {
        errors.push(format!("Value must be at least {min} characters"));
    }
    if let Some(max) = opts.max
        && len > max
    {
        errors.push(format!("Value must be no more than {max} characters"));
    }

    if let Some((pattern, message)) = &opts.regex
        && !pattern.is_match(&value)
    {
        errors.push(
            message
                .clone()
                .unwrap_or_else(|| "Value format is invalid".to_string()),
        );
    }

    if let Some(choices) = &opts.choices
        && !choices.iter().any(|c| c == &value)
    {
        errors.push(format!("Value must be one of: {}", choices.join(", ")));
    }

    (errors, Some(value))
}
