use super::{
    DateOptions, DateTimeOptions, NumberOptions, StringOptions, is_missing, messages,
    validate_date, validate_datetime, validate_number, validate_string,
};
use serde_json::Value;

/// Element validation: the scalar kind applied to each entry.
#[derive(Debug, Clone)]
pub enum ElementRules {
    Text(StringOptions),
    Number(NumberOptions),
    Date(DateOptions),
    DateTime(DateTimeOptions),
}

/// Options for [`validate_array`].
#[derive(Debug, Default, Clone)]
pub struct ArrayOptions {
    pub required: bool,
    pub max: Option<usize>,
    /// Reject arrays with duplicate entries.
    pub unique_elements: bool,
    pub element: Option<ElementRules>,
}

/// Outcome of validating an array value.
///
/// `field_errors` concern the array itself (missing, too long, duplicates);
/// `element_errors` align with `value` by index, `None` slots meaning the
/// element passed. Callers skip the `None` slots rather than assuming a
/// dense error list.
#[derive(Debug, Default, Clone)]
pub struct ArrayResult {
    pub field_errors: Vec<String>,
    pub element_errors: Vec<Option<String>>,
    pub value: Option<Vec<Value>>,
}

impl ArrayResult {
    /// True when neither the array nor any element failed.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.field_errors.is_empty() && self.element_errors.iter().all(Option::is_none)
    }
}

/// Validates an array and, when element rules are given, each entry.
///
/// Best-effort: normalized elements replace raw ones where normalization
/// succeeded, raw values are kept otherwise, so the parallel error list
/// stays aligned.
pub fn validate_array(raw: Option<&Value>, opts: &ArrayOptions) -> ArrayResult {
    let mut result = ArrayResult::default();

    if is_missing(raw) {
        if opts.required {
            result.field_errors.push(messages::REQUIRED.to_string());
        }
        return result;
    }

    let Some(Value::Array(entries)) = raw else {
        result.field_errors.push("Value must be a list".to_string());
        return result;
    };

    if entries.is_empty() && opts.required {
        result.field_errors.push(messages::REQUIRED.to_string());
    }

    if let Some(max) = opts.max
        && entries.len() > max
    {
        result
            .field_errors
            .push(format!("Value must have no more than {max} entries"));
    }

    if opts.unique_elements {
        let mut seen: Vec<&Value> = Vec::with_capacity(entries.len());
        if entries.iter().any(|e| {
            if seen.contains(&e) {
                true
            } else {
                seen.push(e);
                false
            }
        }) {
            result
                .field_errors
                .push("Value entries must be unique".to_string());
        }
    }

    let mut normalized = Vec::with_capacity(entries.len());
    for entry in entries {
        let (errors, value) = match &opts.element {
            Some(ElementRules::Text(o)) => {
                let (e, v) = validate_string(Some(entry), o);
                (e, v.map(Value::String))
            }
            Some(ElementRules::Number(o)) => {
                let (e, v) = validate_number(Some(entry), o);
                (e, v.and_then(|n| serde_json::Number::from_f64(n).map(Value::Number)))
            }
            Some(ElementRules::Date(o)) => {
                let (e, v) = validate_date(Some(entry), o);
                (e, v.map(Value::String))
            }
            Some(ElementRules::DateTime(o)) => {
                let (e, v) = validate_datetime(Some(entry), o);
                (e, v.map(Value::String))
            }
            None => (Vec::new(), None),
        };
        result.element_errors.push(errors.into_iter().next());
        normalized.push(value.unwrap_or_else(|| entry.clone()));
    }

    result.value = Some(normalized);
    result
}
