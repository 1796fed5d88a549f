//! Field-definition validation — a meta-instance of the engine discipline.
//!
//! A menu edit replaces the whole field list atomically, so the submitted
//! list is validated against itself (duplicate keys are scanned within the
//! candidate list, not the stored one) using the same scalar primitives and
//! the same path-addressed error shape as document validation.

use crate::error::{FieldError, PathSegment};
use crate::oracle::{UniqueScope, Uniqueness, UniquenessOracle};
use crate::validators::{StringOptions, validate_string};
use chrono::{DateTime, NaiveDate};
use folio_model::{FieldSchema, FieldType, RuleCode, RuleKind, ValidationRule};
use folio_types::{MenuId, ProjectId};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::LazyLock;
use tracing::debug;

/// `^[a-z0-9_-]+$` — field keys and menu handles.
static IDENT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^[a-z0-9_-]+$").expect("static pattern"));

const IDENT_MESSAGE: &str = "Value can’t include spaces or special characters (i.e. $ # !)";
const HANDLE_MESSAGE: &str = "Handle can’t include spaces or special characters (i.e. $ # !)";

/// Configurable caps on a menu's schema.
#[derive(Debug, Clone, Copy)]
pub struct MenuLimits {
    /// Maximum number of fields per menu.
    pub max_fields: usize,
}

impl Default for MenuLimits {
    fn default() -> Self {
        Self { max_fields: 10 }
    }
}

/// A submitted validation rule, before code/kind are checked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleDraft {
    pub code: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub value: Value,
}

/// A submitted field definition, before type tags are checked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDraft {
    #[serde(default)]
    pub key: String,
    #[serde(rename = "type", default)]
    pub field_type: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub validations: Vec<RuleDraft>,
    #[serde(default)]
    pub system: bool,
}

/// Validates an edited field schema list.
///
/// Returns the error list and the best-effort decoded schemas; callers use
/// the schemas only when the error list is empty. Unknown type tags are
/// rejected here — unlike document validation, which skips them — so new
/// schemas cannot introduce tags the engine cannot dispatch on.
#[must_use]
pub fn validate_field_definitions(
    drafts: &[FieldDraft],
    limits: &MenuLimits,
) -> (Vec<FieldError>, Vec<FieldSchema>) {
    let mut errors = Vec::new();
    let mut schemas = Vec::with_capacity(drafts.len());

    if drafts.len() > limits.max_fields {
        errors.push(FieldError::new(
            ["fields"],
            format!("Menu can have no more than {} fields", limits.max_fields),
        ));
    }

    for (i, draft) in drafts.iter().enumerate() {
        validate_key(i, draft, drafts, &mut errors);
        validate_name_and_description(i, draft, &mut errors);

        let field_type = FieldType::from(draft.field_type.clone());
        if !field_type.is_known() {
            errors.push(FieldError::new(
                field_path(i, "type"),
                format!("Unknown field type '{}'", draft.field_type),
            ));
        }

        let mut rules = Vec::with_capacity(draft.validations.len());
        for (r, rule) in draft.validations.iter().enumerate() {
            if let Some(decoded) = validate_rule(i, r, rule, &mut errors) {
                rules.push(decoded);
            }
        }

        schemas.push(FieldSchema {
            key: draft.key.trim().to_string(),
            field_type,
            name: draft.name.trim().to_string(),
            description: draft.description.clone(),
            validations: rules,
            system: draft.system,
        });
    }

    debug!(fields = drafts.len(), errors = errors.len(), "field definitions validated");
    (errors, schemas)
}

fn validate_key(i: usize, draft: &FieldDraft, all: &[FieldDraft], errors: &mut Vec<FieldError>) {
    let opts = StringOptions {
        required: true,
        min: Some(3),
        max: Some(64),
        regex: Some((IDENT_PATTERN.clone(), Some(IDENT_MESSAGE.to_string()))),
        ..StringOptions::default()
    };
    let raw = Value::String(draft.key.clone());
    let (errs, _) = validate_string(Some(&raw), &opts);
    if let Some(msg) = errs.into_iter().next() {
        errors.push(FieldError::new(field_path(i, "key"), msg));
    }

    // The whole list replaces the stored one atomically, so duplicates are
    // scanned within the submitted list only.
    if all[..i].iter().any(|other| other.key == draft.key) {
        errors.push(FieldError::new(field_path(i, "key"), "Key must be unique"));
    }
}

fn validate_name_and_description(i: usize, draft: &FieldDraft, errors: &mut Vec<FieldError>) {
    let name = Value::String(draft.name.clone());
    let (errs, _) = validate_string(
        Some(&name),
        &StringOptions {
            required: true,
            max: Some(255),
            ..StringOptions::default()
        },
    );
    if let Some(msg) = errs.into_iter().next() {
        errors.push(FieldError::new(field_path(i, "name"), msg));
    }

    if let Some(description) = &draft.description {
        let value = Value::String(description.clone());
        let (errs, _) = validate_string(
            Some(&value),
            &StringOptions {
                max: Some(100),
                ..StringOptions::default()
            },
        );
        if let Some(msg) = errs.into_iter().next() {
            errors.push(FieldError::new(field_path(i, "description"), msg));
        }
    }
}

/// Checks one submitted rule and decodes its payload by code; the payload's
/// expected shape depends on the code, with date-aware branching for bounds
/// on date-kinded rules.
fn validate_rule(
    i: usize,
    r: usize,
    rule: &RuleDraft,
    errors: &mut Vec<FieldError>,
) -> Option<ValidationRule> {
    let Some(code) = RuleCode::parse(&rule.code) else {
        errors.push(FieldError::new(
            rule_path(i, r),
            format!("Unknown validation code '{}'", rule.code),
        ));
        return None;
    };
    let Some(kind) = RuleKind::parse(&rule.kind) else {
        errors.push(FieldError::new(
            rule_path(i, r),
            format!("Unknown validation type '{}'", rule.kind),
        ));
        return None;
    };

    let shape_error = match code {
        RuleCode::Required | RuleCode::Unique | RuleCode::Transliteration => {
            (!rule.value.is_boolean()).then_some("Value must be a boolean")
        }
        RuleCode::Min | RuleCode::Max => match kind {
            RuleKind::Date => (!decode_date_literal(&rule.value))
                .then_some("Value must be a valid date (YYYY-MM-DD)"),
            RuleKind::DateTime => (!decode_datetime_literal(&rule.value))
                .then_some("Value must be a valid date and time (RFC 3339)"),
            _ => rule.value.as_f64().is_none().then_some("Value must be a number"),
        },
        RuleCode::MaxPrecision => rule
            .value
            .as_u64()
            .is_none()
            .then_some("Value must be a whole number"),
        RuleCode::Regex => match rule.value.as_str() {
            Some(pattern) if Regex::new(pattern).is_ok() => None,
            _ => Some("Value must be a valid pattern"),
        },
        RuleCode::FieldReference => (!rule.value.is_string()).then_some("Value must be a field key"),
        RuleCode::Choices => {
            let all_strings = rule
                .value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_string));
            (!all_strings).then_some("Value must be a list of strings")
        }
    };

    if let Some(msg) = shape_error {
        errors.push(FieldError::new(rule_path(i, r), msg));
        return None;
    }

    Some(ValidationRule::new(code, kind, rule.value.clone()))
}

/// Validates a menu title: required, 3–255 characters.
#[must_use]
pub fn validate_menu_title(raw: Option<&Value>) -> (Vec<FieldError>, Option<String>) {
    let opts = StringOptions {
        required: true,
        min: Some(3),
        max: Some(255),
        ..StringOptions::default()
    };
    let (errs, value) = validate_string(raw, &opts);
    let errors = errs
        .into_iter()
        .take(1)
        .map(|msg| FieldError::new(["title"], msg))
        .collect();
    (errors, value)
}

/// Validates a menu handle and checks its uniqueness within the project.
pub async fn validate_menu_handle(
    raw: Option<&Value>,
    project_id: ProjectId,
    exclude: Option<MenuId>,
    oracle: &dyn UniquenessOracle,
) -> (Vec<FieldError>, Option<String>) {
    let mut errors = Vec::new();

    let opts = StringOptions {
        required: true,
        min: Some(3),
        max: Some(255),
        regex: Some((IDENT_PATTERN.clone(), Some(HANDLE_MESSAGE.to_string()))),
        ..StringOptions::default()
    };
    let (errs, value) = validate_string(raw, &opts);
    if let Some(msg) = errs.into_iter().next() {
        errors.push(FieldError::new(["handle"], msg));
    }

    let scope = UniqueScope {
        project_id,
        menu_id: None,
        key: "handle".to_string(),
        exclude_id: exclude.map(|id| id.as_uuid()),
    };
    match oracle.check_unique(value.as_deref(), &scope).await {
        Uniqueness::Conflict => {
            errors.push(FieldError::new(["handle"], "Handle must be unique"));
        }
        Uniqueness::Unknown => {
            debug!("handle uniqueness indeterminate, treating as pass");
        }
        Uniqueness::Unique => {}
    }

    (errors, value)
}

fn field_path(i: usize, attr: &str) -> Vec<PathSegment> {
    vec!["fields".into(), i.into(), attr.into()]
}

fn rule_path(i: usize, r: usize) -> Vec<PathSegment> {
    vec!["fields".into(), i.into(), "validations".into(), r.into()]
}

fn decode_date_literal(value: &Value) -> bool {
    value
        .as_str()
        .is_some_and(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").is_ok())
}

fn decode_datetime_literal(value: &Value) -> bool {
    value
        .as_str()
        .is_some_and(|s| DateTime::parse_from_rfc3339(s.trim()).is_ok())
}
