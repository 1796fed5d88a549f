use super::{is_missing, messages};
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;

/// Options for [`validate_date`].
#[derive(Debug, Default, Clone, Copy)]
pub struct DateOptions {
    pub required: bool,
    pub min: Option<NaiveDate>,
    pub max: Option<NaiveDate>,
}

/// Options for [`validate_datetime`].
#[derive(Debug, Default, Clone, Copy)]
pub struct DateTimeOptions {
    pub required: bool,
    pub min: Option<DateTime<Utc>>,
    pub max: Option<DateTime<Utc>>,
}

/// Validates a calendar date (`YYYY-MM-DD`).
///
/// Normalizes to the canonical ISO 8601 form; bounds compare as calendar
/// values, not strings.
pub fn validate_date(raw: Option<&Value>, opts: &DateOptions) -> (Vec<String>, Option<String>) {
    let mut errors = Vec::new();

    if is_missing(raw) {
        if opts.required {
            errors.push(messages::REQUIRED.to_string());
        }
        return (errors, None);
    }

    let parsed = match raw {
        Some(Value::String(s)) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok(),
        _ => None,
    };
    let Some(date) = parsed else {
        errors.push("Value must be a valid date (YYYY-MM-DD)".to_string());
        return (errors, None);
    };

    if let Some(min) = opts.min
        && date < min
    {
        errors.push(format!("Value must be on or after {min}"));
    }
    if let Some(max) = opts.max
        && date > max
    {
        errors.push(format!("Value must be on or before {max}"));
    }

    (errors, Some(date.to_string()))
}

/// Validates a date-time (RFC 3339).
///
/// Normalizes to UTC RFC 3339; bounds compare as instants.
pub fn validate_datetime(
    raw: Option<&Value>,
    opts: &DateTimeOptions,
) -> (Vec<String>, Option<String>) {
    let mut errors = Vec::new();

    if is_missing(raw) {
        if opts.required {
            errors.push(messages::REQUIRED.to_string());
        }
        return (errors, None);
    }

    let parsed = match raw {
        Some(Value::String(s)) => DateTime::parse_from_rfc3339(s.trim())
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        _ => None,
    };
    let Some(datetime) = parsed else {
        errors.push("Value must be a valid date and time (RFC 3339)".to_string());
        return (errors, None);
    };

    if let Some(min) = opts.min
        && datetime < min
    {
        errors.push(format!("Value must be on or after {}", min.to_rfc3339()));
    }
    if let Some(max) = opts.max
        && datetime > max
    {
        errors.push(format!("Value must be on or before {}", max.to_rfc3339()));
    }

    (errors, Some(datetime.to_rfc3339()))
}
