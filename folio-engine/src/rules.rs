//! Typed view over a field's ordered validation rules.
//!
//! The stored form is a list of `{code, type, value}` records; the engine
//! never consumes that shape directly. [`RuleSet`] decodes each payload to
//! its native type on access; malformed payloads read as absent.

use crate::error::{EngineError, EngineResult};
use chrono::{DateTime, NaiveDate, Utc};
use folio_model::{RuleCode, ValidationRule};
use regex::Regex;
use serde_json::Value;

/// Borrowing accessor over a field's validation rules.
#[derive(Debug, Clone, Copy)]
pub struct RuleSet<'a> {
    rules: &'a [ValidationRule],
    field_key: &'a str,
}

impl<'a> RuleSet<'a> {
    /// Wraps a field's rule list.
    #[must_use]
    pub fn new(field_key: &'a str, rules: &'a [ValidationRule]) -> Self {
        Self { rules, field_key }
    }

    fn value_of(&self, code: RuleCode) -> Option<&'a Value> {
        self.rules.iter().find(|r| r.code == code).map(|r| &r.value)
    }

    fn flag(&self, code: RuleCode) -> bool {
        self.value_of(code).and_then(Value::as_bool).unwrap_or(false)
    }

    /// Whether the field must be present and non-empty.
    #[must_use]
    pub fn required(&self) -> bool {
        self.flag(RuleCode::Required)
    }

    /// Whether the field value must be unique across sibling records.
    #[must_use]
    pub fn unique(&self) -> bool {
        self.flag(RuleCode::Unique)
    }

    /// Whether slug derivation should transliterate. Decoded for schema
    /// validation; no handler consumes it yet.
    #[must_use]
    pub fn transliteration(&self) -> bool {
        self.flag(RuleCode::Transliteration)
    }

    /// Allowed values for choice-constrained fields.
    #[must_use]
    pub fn choices(&self) -> Option<Vec<String>> {
        let items = self.value_of(RuleCode::Choices)?.as_array()?;
        Some(
            items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
        )
    }

    /// Numeric lower bound.
    #[must_use]
    pub fn min_number(&self) -> Option<f64> {
        self.value_of(RuleCode::Min).and_then(Value::as_f64)
    }

    /// Numeric upper bound.
    #[must_use]
    pub fn max_number(&self) -> Option<f64> {
        self.value_of(RuleCode::Max).and_then(Value::as_f64)
    }

    /// Lower length bound for string-valued fields.
    #[must_use]
    pub fn min_len(&self) -> Option<usize> {
        self.min_number().map(|n| n.max(0.0) as usize)
    }

    /// Upper length bound for string-valued fields.
    #[must_use]
    pub fn max_len(&self) -> Option<usize> {
        self.max_number().map(|n| n.max(0.0) as usize)
    }

    /// Calendar lower bound for `date` fields.
    #[must_use]
    pub fn min_date(&self) -> Option<NaiveDate> {
        self.value_of(RuleCode::Min).and_then(decode_date)
    }

    /// Calendar upper bound for `date` fields.
    #[must_use]
    pub fn max_date(&self) -> Option<NaiveDate> {
        self.value_of(RuleCode::Max).and_then(decode_date)
    }

    /// Instant lower bound for `date_time` fields.
    #[must_use]
    pub fn min_datetime(&self) -> Option<DateTime<Utc>> {
        self.value_of(RuleCode::Min).and_then(decode_datetime)
    }

    /// Instant upper bound for `date_time` fields.
    #[must_use]
    pub fn max_datetime(&self) -> Option<DateTime<Utc>> {
        self.value_of(RuleCode::Max).and_then(decode_datetime)
    }

    /// Maximum decimal places for numeric fields.
    #[must_use]
    pub fn max_precision(&self) -> Option<u32> {
        self.value_of(RuleCode::MaxPrecision)
            .and_then(Value::as_u64)
            .map(|n| n as u32)
    }

    /// Sibling field key for slug derivation.
    #[must_use]
    pub fn field_reference(&self) -> Option<&'a str> {
        self.value_of(RuleCode::FieldReference).and_then(Value::as_str)
    }

    /// Compiled pattern rule. A pattern that does not compile is a schema
    /// defect, not a document error.
    pub fn regex(&self) -> EngineResult<Option<(Regex, Option<String>)>> {
        let Some(value) = self.value_of(RuleCode::Regex) else {
            return Ok(None);
        };
        let Some(pattern) = value.as_str() else {
            return Ok(None);
        };
        let compiled = Regex::new(pattern).map_err(|e| EngineError::InvalidRule {
            field: self.field_key.to_string(),
            reason: format!("regex '{pattern}' does not compile: {e}"),
        })?;
        Ok(Some((compiled, None)))
    }
}

fn decode_date(value: &Value) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.as_str()?.trim(), "%Y-%m-%d").ok()
}

fn decode_datetime(value: &Value) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value.as_str()?.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
