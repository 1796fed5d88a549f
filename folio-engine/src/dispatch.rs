//! Per-field type dispatch: maps a field's type tag to its coercion and
//! validation procedure.
//!
//! Dispatch is by exact tag on the closed [`FieldType`] enum. Unrecognized
//! tags are skipped silently — no error, no output field — so existing
//! deployments tolerate schema evolution. Only the first validator message
//! per scalar field is reported; list fields report one message per
//! offending element.

use crate::engine::ValidationContext;
use crate::error::{EngineResult, FieldError};
use crate::oracle::{UniqueScope, Uniqueness, UniquenessOracle};
use crate::rules::RuleSet;
use crate::slug::slugify;
use crate::validators::{
    ArrayOptions, ArrayResult, DateOptions, DateTimeOptions, ElementRules, NumberOptions,
    StringOptions, messages, validate_array, validate_date, validate_datetime, validate_number,
    validate_string,
};
use folio_model::{Document, FieldSchema, FieldType};
use serde_json::Value;
use std::sync::LazyLock;
use tracing::debug;

/// URL values must carry one of these schemes as a prefix.
static URL_SCHEME: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new("^(http|https|mailto|sms|tel):").expect("static pattern"));

/// Money composites carry at most this many currency entries.
const MONEY_MAX_ENTRIES: usize = 3;

pub(crate) struct FieldCx<'a> {
    pub oracle: &'a dyn UniquenessOracle,
    pub ctx: &'a ValidationContext,
}

impl FieldCx<'_> {
    fn doc_scope(&self, key: &str) -> UniqueScope {
        UniqueScope {
            project_id: self.ctx.project_id,
            menu_id: Some(self.ctx.menu_id),
            key: format!("doc.{key}"),
            exclude_id: self.ctx.item_id.map(|id| id.as_uuid()),
        }
    }
}

/// Validates one declared field of the input document.
///
/// Appends path-addressed errors and writes the normalized value into `out`
/// when it is present. `doc_input` is the full raw sub-document, needed for
/// `field_reference` sibling lookups.
pub(crate) async fn validate_field(
    field: &FieldSchema,
    raw: Option<&Value>,
    doc_input: &Document,
    cx: &FieldCx<'_>,
    errors: &mut Vec<FieldError>,
    out: &mut Document,
) -> EngineResult<()> {
    let rules = RuleSet::new(&field.key, &field.validations);

    match &field.field_type {
        FieldType::SingleLineText
        | FieldType::MultiLineText
        | FieldType::RichText
        | FieldType::Color
        | FieldType::FileReference => {
            text_field(field, raw, &rules, cx, errors, out, false).await?;
        }
        FieldType::Url => {
            text_field(field, raw, &rules, cx, errors, out, true).await?;
        }
        FieldType::Boolean => {
            // Booleans are stored as the strings "true"/"false", so they
            // validate as constrained strings, not JSON booleans.
            let opts = StringOptions {
                required: rules.required(),
                choices: Some(vec!["true".to_string(), "false".to_string()]),
                ..StringOptions::default()
            };
            let (errs, value) = validate_string(raw, &opts);
            push_first(errors, &field.key, errs);
            write_string(out, &field.key, value);
        }
        FieldType::NumberInteger
        | FieldType::NumberDecimal
        | FieldType::Dimension
        | FieldType::Volume
        | FieldType::Weight => {
            let opts = NumberOptions {
                required: rules.required(),
                min: rules.min_number(),
                max: rules.max_number(),
                max_precision: rules.max_precision(),
            };
            let (errs, value) = validate_number(raw, &opts);
            push_first(errors, &field.key, errs);
            if let Some(n) = value.and_then(serde_json::Number::from_f64) {
                out.insert(field.key.clone(), Value::Number(n));
            }
        }
        FieldType::Date => {
            let opts = DateOptions {
                required: rules.required(),
                min: rules.min_date(),
                max: rules.max_date(),
            };
            let (errs, value) = validate_date(raw, &opts);
            push_first(errors, &field.key, errs);
            write_string(out, &field.key, value);
        }
        FieldType::DateTime => {
            let opts = DateTimeOptions {
                required: rules.required(),
                min: rules.min_datetime(),
                max: rules.max_datetime(),
            };
            let (errs, value) = validate_datetime(raw, &opts);
            push_first(errors, &field.key, errs);
            write_string(out, &field.key, value);
        }
        FieldType::ListSingleLineText | FieldType::ListFileReference | FieldType::ListColor => {
            let element = ElementRules::Text(string_options(&rules, false)?);
            list_field(field, raw, &rules, element, errors, out, false);
        }
        FieldType::ListUrl => {
            let element = ElementRules::Text(string_options(&rules, false)?);
            list_field(field, raw, &rules, element, errors, out, true);
        }
        FieldType::ListNumberInteger | FieldType::ListNumberDecimal => {
            let element = ElementRules::Number(NumberOptions {
                required: false,
                min: rules.min_number(),
                max: rules.max_number(),
                max_precision: rules.max_precision(),
            });
            list_field(field, raw, &rules, element, errors, out, false);
        }
        FieldType::ListDate => {
            let element = ElementRules::Date(DateOptions {
                required: false,
                min: rules.min_date(),
                max: rules.max_date(),
            });
            list_field(field, raw, &rules, element, errors, out, false);
        }
        FieldType::ListDateTime => {
            let element = ElementRules::DateTime(DateTimeOptions {
                required: false,
                min: rules.min_datetime(),
                max: rules.max_datetime(),
            });
            list_field(field, raw, &rules, element, errors, out, false);
        }
        FieldType::Money => {
            money_field(field, raw, &rules, errors, out);
        }
        FieldType::UrlHandle => {
            url_handle_field(field, raw, doc_input, &rules, cx, errors, out).await?;
        }
        FieldType::Other(tag) => {
            debug!(field = %field.key, %tag, "skipping field with unrecognized type tag");
        }
    }

    Ok(())
}

/// Text family handler; runs the uniqueness oracle when the field opts in,
/// and the URL scheme check when asked.
async fn text_field(
    field: &FieldSchema,
    raw: Option<&Value>,
    rules: &RuleSet<'_>,
    cx: &FieldCx<'_>,
    errors: &mut Vec<FieldError>,
    out: &mut Document,
    check_scheme: bool,
) -> EngineResult<()> {
    let opts = string_options(rules, rules.required())?;
    let (errs, value) = validate_string(raw, &opts);

    if check_scheme
        && let Some(v) = &value
        && !v.is_empty()
        && !URL_SCHEME.is_match(v)
    {
        errors.push(FieldError::new(
            ["doc", field.key.as_str()],
            messages::URL_SCHEME,
        ));
    }

    if rules.unique() {
        let scope = cx.doc_scope(&field.key);
        match cx.oracle.check_unique(value.as_deref(), &scope).await {
            Uniqueness::Conflict => {
                errors.push(FieldError::new(["doc", field.key.as_str()], messages::UNIQUE));
            }
            Uniqueness::Unknown => {
                debug!(field = %field.key, "uniqueness indeterminate, treating as pass");
            }
            Uniqueness::Unique => {}
        }
    }

    push_first(errors, &field.key, errs);
    write_string(out, &field.key, value);
    Ok(())
}

/// List family handler: required-ness is hoisted to the array level, the
/// remaining options belong to the elements.
fn list_field(
    field: &FieldSchema,
    raw: Option<&Value>,
    rules: &RuleSet<'_>,
    element: ElementRules,
    errors: &mut Vec<FieldError>,
    out: &mut Document,
    check_scheme: bool,
) {
    let opts = ArrayOptions {
        required: rules.required(),
        max: None,
        unique_elements: false,
        element: Some(element),
    };
    let result = validate_array(raw, &opts);

    if check_scheme && let Some(entries) = &result.value {
        for (i, entry) in entries.iter().enumerate() {
            if let Some(v) = entry.as_str()
                && !URL_SCHEME.is_match(v)
            {
                errors.push(FieldError::new(
                    vec![
                        "doc".into(),
                        field.key.as_str().into(),
                        crate::error::PathSegment::Index(i),
                    ],
                    messages::URL_SCHEME,
                ));
            }
        }
    }

    push_list_errors(errors, &field.key, &result);
    if let Some(entries) = result.value {
        out.insert(field.key.clone(), Value::Array(entries));
    }
}

/// Fixed-shape composite: at most three `{amount, currencyCode}` entries;
/// the array length error and the per-entry sub-field errors are
/// independent.
fn money_field(
    field: &FieldSchema,
    raw: Option<&Value>,
    rules: &RuleSet<'_>,
    errors: &mut Vec<FieldError>,
    out: &mut Document,
) {
    let required = rules.required();
    let opts = ArrayOptions {
        required,
        max: Some(MONEY_MAX_ENTRIES),
        unique_elements: false,
        element: None,
    };
    let result = validate_array(raw, &opts);

    if let Some(msg) = result.field_errors.first() {
        errors.push(FieldError::new(["doc", field.key.as_str()], msg.clone()));
    }

    if let Some(entries) = &result.value {
        for (i, entry) in entries.iter().enumerate() {
            let amount = entry.get("amount");
            let currency = entry.get("currencyCode");

            let (amount_errs, _) = validate_number(
                amount,
                &NumberOptions {
                    required,
                    ..NumberOptions::default()
                },
            );
            if let Some(msg) = amount_errs.into_iter().next() {
                errors.push(FieldError::new(
                    vec![
                        crate::error::PathSegment::from("doc"),
                        field.key.as_str().into(),
                        i.into(),
                        "amount".into(),
                    ],
                    msg,
                ));
            }

            let (currency_errs, _) = validate_string(
                currency,
                &StringOptions {
                    required,
                    ..StringOptions::default()
                },
            );
            if let Some(msg) = currency_errs.into_iter().next() {
                errors.push(FieldError::new(
                    vec![
                        crate::error::PathSegment::from("doc"),
                        field.key.as_str().into(),
                        i.into(),
                        "currencyCode".into(),
                    ],
                    msg,
                ));
            }
        }
    }

    if let Some(entries) = result.value {
        out.insert(field.key.clone(), Value::Array(entries));
    }
}

/// Slug handler: derive from the referenced sibling when the raw value is
/// empty, then validate as required and always check uniqueness.
async fn url_handle_field(
    field: &FieldSchema,
    raw: Option<&Value>,
    doc_input: &Document,
    rules: &RuleSet<'_>,
    cx: &FieldCx<'_>,
    errors: &mut Vec<FieldError>,
    out: &mut Document,
) -> EngineResult<()> {
    let supplied = raw
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    let handle = supplied.or_else(|| {
        let referenced = doc_input.get(rules.field_reference()?)?.as_str()?;
        Some(slugify(referenced))
    });

    // Required regardless of the field's own rules: a handle must exist
    // once the field is touched.
    let opts = StringOptions {
        required: true,
        ..string_options(rules, true)?
    };
    let candidate = handle.map(Value::String);
    let (errs, value) = validate_string(candidate.as_ref(), &opts);

    // Uniqueness is implicit for this type, not opt-in.
    let scope = cx.doc_scope(&field.key);
    match cx.oracle.check_unique(value.as_deref(), &scope).await {
        Uniqueness::Conflict => {
            errors.push(FieldError::new(["doc", field.key.as_str()], messages::UNIQUE));
        }
        Uniqueness::Unknown => {
            debug!(field = %field.key, "uniqueness indeterminate, treating as pass");
        }
        Uniqueness::Unique => {}
    }

    push_first(errors, &field.key, errs);
    write_string(out, &field.key, value);
    Ok(())
}

fn string_options(rules: &RuleSet<'_>, required: bool) -> EngineResult<StringOptions> {
    Ok(StringOptions {
        required,
        min: rules.min_len(),
        max: rules.max_len(),
        regex: rules.regex()?,
        choices: rules.choices(),
    })
}

/// Scalar fields report only the first validator message.
fn push_first(errors: &mut Vec<FieldError>, key: &str, errs: Vec<String>) {
    if let Some(msg) = errs.into_iter().next() {
        errors.push(FieldError::new(["doc", key], msg));
    }
}

/// List fields report per-element errors when entries were evaluated, and a
/// single field-level error otherwise.
fn push_list_errors(errors: &mut Vec<FieldError>, key: &str, result: &ArrayResult) {
    let has_entries = result.value.as_ref().is_some_and(|v| !v.is_empty());
    if has_entries {
        for (i, slot) in result.element_errors.iter().enumerate() {
            if let Some(msg) = slot {
                errors.push(FieldError::new(
                    vec![
                        crate::error::PathSegment::from("doc"),
                        key.into(),
                        i.into(),
                    ],
                    msg.clone(),
                ));
            }
        }
    } else if let Some(msg) = result.field_errors.first() {
        errors.push(FieldError::new(["doc", key], msg.clone()));
    }
}

fn write_string(out: &mut Document, key: &str, value: Option<String>) {
    if let Some(v) = value {
        out.insert(key.to_string(), Value::String(v));
    }
}
