use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// One typed, named slot in a menu's schema.
///
/// The `key` is the immutable identifier the document engine uses to look
/// values up in an item's `doc` map. Validation rules are ordered; the
/// engine reduces them into a typed rule set before dispatching.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSchema {
    pub key: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub validations: Vec<ValidationRule>,
    /// Built-in fields carry `system = true` and cannot be deleted.
    #[serde(default)]
    pub system: bool,
}

impl FieldSchema {
    /// Creates a field with no validation rules.
    #[must_use]
    pub fn new(key: impl Into<String>, field_type: FieldType, name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            field_type,
            name: name.into(),
            description: None,
            validations: Vec::new(),
            system: false,
        }
    }

    /// Appends a validation rule, preserving declaration order.
    #[must_use]
    pub fn with_rule(mut self, rule: ValidationRule) -> Self {
        self.validations.push(rule);
        self
    }
}

/// The type tag of a field, driving validator dispatch.
///
/// Stored schemas may carry tags this build does not know about
/// ([`FieldType::Other`]); the document engine skips those silently so older
/// deployments keep working against newer schemas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    SingleLineText,
    MultiLineText,
    RichText,
    Color,
    FileReference,
    Boolean,
    NumberInteger,
    NumberDecimal,
    Dimension,
    Volume,
    Weight,
    DateTime,
    Date,
    Money,
    Url,
    UrlHandle,
    ListSingleLineText,
    ListNumberInteger,
    ListNumberDecimal,
    ListDateTime,
    ListDate,
    ListFileReference,
    ListColor,
    ListUrl,
    /// Unrecognized tag, preserved verbatim for round-tripping.
    Other(String),
}

impl FieldType {
    /// The wire tag for this type.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::SingleLineText => "single_line_text",
            Self::MultiLineText => "multi_line_text",
            Self::RichText => "rich_text",
            Self::Color => "color",
            Self::FileReference => "file_reference",
            Self::Boolean => "boolean",
            Self::NumberInteger => "number_integer",
            Self::NumberDecimal => "number_decimal",
            Self::Dimension => "dimension",
            Self::Volume => "volume",
            Self::Weight => "weight",
            Self::DateTime => "date_time",
            Self::Date => "date",
            Self::Money => "money",
            Self::Url => "url",
            Self::UrlHandle => "url_handle",
            Self::ListSingleLineText => "list.single_line_text",
            Self::ListNumberInteger => "list.number_integer",
            Self::ListNumberDecimal => "list.number_decimal",
            Self::ListDateTime => "list.date_time",
            Self::ListDate => "list.date",
            Self::ListFileReference => "list.file_reference",
            Self::ListColor => "list.color",
            Self::ListUrl => "list.url",
            Self::Other(tag) => tag,
        }
    }

    /// Whether this is a tag the current build can dispatch on.
    #[must_use]
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<String> for FieldType {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "single_line_text" => Self::SingleLineText,
            "multi_line_text" => Self::MultiLineText,
            "rich_text" => Self::RichText,
            "color" => Self::Color,
            "file_reference" => Self::FileReference,
            "boolean" => Self::Boolean,
            "number_integer" => Self::NumberInteger,
            "number_decimal" => Self::NumberDecimal,
            "dimension" => Self::Dimension,
            "volume" => Self::Volume,
            "weight" => Self::Weight,
            "date_time" => Self::DateTime,
            "date" => Self::Date,
            "money" => Self::Money,
            "url" => Self::Url,
            "url_handle" => Self::UrlHandle,
            "list.single_line_text" => Self::ListSingleLineText,
            "list.number_integer" => Self::ListNumberInteger,
            "list.number_decimal" => Self::ListNumberDecimal,
            "list.date_time" => Self::ListDateTime,
            "list.date" => Self::ListDate,
            "list.file_reference" => Self::ListFileReference,
            "list.color" => Self::ListColor,
            "list.url" => Self::ListUrl,
            _ => Self::Other(tag),
        }
    }
}

impl From<FieldType> for String {
    fn from(ft: FieldType) -> Self {
        ft.as_str().to_string()
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The constraint kind of a validation rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleCode {
    Required,
    Unique,
    Choices,
    Max,
    Min,
    Regex,
    MaxPrecision,
    FieldReference,
    Transliteration,
}

impl RuleCode {
    /// The wire tag for this code.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Unique => "unique",
            Self::Choices => "choices",
            Self::Max => "max",
            Self::Min => "min",
            Self::Regex => "regex",
            Self::MaxPrecision => "max_precision",
            Self::FieldReference => "field_reference",
            Self::Transliteration => "transliteration",
        }
    }

    /// Parses a wire tag; `None` for unknown codes.
    #[must_use]
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "required" => Some(Self::Required),
            "unique" => Some(Self::Unique),
            "choices" => Some(Self::Choices),
            "max" => Some(Self::Max),
            "min" => Some(Self::Min),
            "regex" => Some(Self::Regex),
            "max_precision" => Some(Self::MaxPrecision),
            "field_reference" => Some(Self::FieldReference),
            "transliteration" => Some(Self::Transliteration),
            _ => None,
        }
    }
}

/// The primitive kind a rule's value is interpreted as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    Checkbox,
    Text,
    Number,
    DateTime,
    Date,
    #[serde(rename = "list.text")]
    ListText,
}

impl RuleKind {
    /// The wire tag for this kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Checkbox => "checkbox",
            Self::Text => "text",
            Self::Number => "number",
            Self::DateTime => "date_time",
            Self::Date => "date",
            Self::ListText => "list.text",
        }
    }

    /// Parses a wire tag; `None` for unknown kinds.
    #[must_use]
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "checkbox" => Some(Self::Checkbox),
            "text" => Some(Self::Text),
            "number" => Some(Self::Number),
            "date_time" => Some(Self::DateTime),
            "date" => Some(Self::Date),
            "list.text" => Some(Self::ListText),
            _ => None,
        }
    }

    /// Whether min/max bounds on this kind compare as calendar values.
    #[must_use]
    pub fn is_date_kind(&self) -> bool {
        matches!(self, Self::Date | Self::DateTime)
    }
}

/// A constraint attached to a field.
///
/// `value`'s shape is determined by `code`: bool for
/// `required`/`unique`/`transliteration`, number or date literal for
/// `min`/`max`, number for `max_precision`, string for
/// `regex`/`field_reference`, array of strings for `choices`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationRule {
    pub code: RuleCode,
    #[serde(rename = "type")]
    pub kind: RuleKind,
    pub value: Value,
}

impl ValidationRule {
    /// Creates a rule from parts.
    #[must_use]
    pub fn new(code: RuleCode, kind: RuleKind, value: Value) -> Self {
        Self { code, kind, value }
    }

    /// Shorthand for a `required` rule.
    #[must_use]
    pub fn required(on: bool) -> Self {
        Self::new(RuleCode::Required, RuleKind::Checkbox, Value::Bool(on))
    }

    /// Shorthand for a `unique` rule.
    #[must_use]
    pub fn unique(on: bool) -> Self {
        Self::new(RuleCode::Unique, RuleKind::Checkbox, Value::Bool(on))
    }

    /// Shorthand for a numeric `min` bound.
    #[must_use]
    pub fn min(value: f64) -> Self {
        Self::new(RuleCode::Min, RuleKind::Number, json_number(value))
    }

    /// Shorthand for a numeric `max` bound.
    #[must_use]
    pub fn max(value: f64) -> Self {
        Self::new(RuleCode::Max, RuleKind::Number, json_number(value))
    }

    /// Shorthand for a `choices` rule.
    #[must_use]
    pub fn choices(values: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let items = values.into_iter().map(|v| Value::String(v.into())).collect();
        Self::new(RuleCode::Choices, RuleKind::ListText, Value::Array(items))
    }

    /// Shorthand for a `regex` rule.
    #[must_use]
    pub fn regex(pattern: impl Into<String>) -> Self {
        Self::new(RuleCode::Regex, RuleKind::Text, Value::String(pattern.into()))
    }

    /// Shorthand for a `field_reference` rule pointing at a sibling key.
    #[must_use]
    pub fn field_reference(key: impl Into<String>) -> Self {
        Self::new(
            RuleCode::FieldReference,
            RuleKind::Text,
            Value::String(key.into()),
        )
    }

    /// Shorthand for a `max_precision` rule.
    #[must_use]
    pub fn max_precision(digits: u32) -> Self {
        Self::new(
            RuleCode::MaxPrecision,
            RuleKind::Number,
            Value::Number(digits.into()),
        )
    }

    /// Shorthand for a `transliteration` rule.
    #[must_use]
    pub fn transliteration(on: bool) -> Self {
        Self::new(RuleCode::Transliteration, RuleKind::Checkbox, Value::Bool(on))
    }
}

fn json_number(value: f64) -> Value {
    serde_json::Number::from_f64(value).map_or(Value::Null, Value::Number)
}
