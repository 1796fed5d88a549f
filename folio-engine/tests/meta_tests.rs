use async_trait::async_trait;
use folio_engine::meta::{
    FieldDraft, MenuLimits, RuleDraft, validate_field_definitions, validate_menu_handle,
    validate_menu_title,
};
use folio_engine::{FieldError, PathSegment, UniqueScope, Uniqueness, UniquenessOracle};
use folio_model::{RuleCode, RuleKind};
use folio_types::ProjectId;
use serde_json::{Value, json};

fn draft(key: &str, field_type: &str, name: &str) -> FieldDraft {
    FieldDraft {
        key: key.to_string(),
        field_type: field_type.to_string(),
        name: name.to_string(),
        description: None,
        validations: Vec::new(),
        system: false,
    }
}

fn rule(code: &str, kind: &str, value: Value) -> RuleDraft {
    RuleDraft {
        code: code.to_string(),
        kind: kind.to_string(),
        value,
    }
}

fn message_at<'a>(errors: &'a [FieldError], path: &[PathSegment]) -> Option<&'a str> {
    errors
        .iter()
        .find(|e| e.path == path)
        .map(|e| e.message.as_str())
}

fn field_path(i: usize, attr: &str) -> Vec<PathSegment> {
    vec!["fields".into(), i.into(), attr.into()]
}

fn rule_path(i: usize, r: usize) -> Vec<PathSegment> {
    vec!["fields".into(), i.into(), "validations".into(), r.into()]
}

// ── Field definitions ─────────────────────────────────────────────

#[test]
fn valid_definitions_decode_cleanly() {
    let mut title = draft("title", "single_line_text", "Title");
    title.validations = vec![
        rule("required", "checkbox", json!(true)),
        rule("max", "number", json!(80)),
    ];
    let drafts = vec![title, draft("body", "rich_text", "Body")];

    let (errors, schemas) = validate_field_definitions(&drafts, &MenuLimits::default());
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");
    assert_eq!(schemas.len(), 2);
    assert_eq!(schemas[0].validations.len(), 2);
    assert_eq!(schemas[0].validations[0].code, RuleCode::Required);
    assert_eq!(schemas[0].validations[1].kind, RuleKind::Number);
}

#[test]
fn too_many_fields_is_a_list_level_error() {
    let drafts: Vec<FieldDraft> = (0..11)
        .map(|i| draft(&format!("field-{i:02}"), "single_line_text", "F"))
        .collect();
    let (errors, _) = validate_field_definitions(&drafts, &MenuLimits::default());
    assert_eq!(
        message_at(&errors, &[PathSegment::from("fields")]),
        Some("Menu can have no more than 10 fields")
    );
}

#[test]
fn custom_limits_override_the_cap() {
    let drafts: Vec<FieldDraft> = (0..11)
        .map(|i| draft(&format!("field-{i:02}"), "single_line_text", "F"))
        .collect();
    let (errors, _) = validate_field_definitions(&drafts, &MenuLimits { max_fields: 20 });
    assert!(errors.is_empty());
}

#[test]
fn key_character_and_length_rules() {
    let drafts = vec![
        draft("Bad Key!", "single_line_text", "Bad"),
        draft("ok", "single_line_text", "Short"),
    ];
    let (errors, _) = validate_field_definitions(&drafts, &MenuLimits::default());

    assert_eq!(
        message_at(&errors, &field_path(0, "key")),
        Some("Value can’t include spaces or special characters (i.e. $ # !)")
    );
    assert_eq!(
        message_at(&errors, &field_path(1, "key")),
        Some("Value must be at least 3 characters")
    );
}

#[test]
fn duplicate_keys_are_rejected() {
    let drafts = vec![
        draft("title", "single_line_text", "Title"),
        draft("title", "rich_text", "Also title"),
    ];
    let (errors, _) = validate_field_definitions(&drafts, &MenuLimits::default());
    assert_eq!(
        message_at(&errors, &field_path(1, "key")),
        Some("Key must be unique")
    );
    // Only the later occurrence is flagged.
    assert!(message_at(&errors, &field_path(0, "key")).is_none());
}

#[test]
fn unknown_type_tags_are_rejected_in_schema_edits() {
    let drafts = vec![draft("future", "holographic_text", "Future")];
    let (errors, _) = validate_field_definitions(&drafts, &MenuLimits::default());
    assert_eq!(
        message_at(&errors, &field_path(0, "type")),
        Some("Unknown field type 'holographic_text'")
    );
}

#[test]
fn missing_name_is_required() {
    let drafts = vec![draft("title", "single_line_text", "")];
    let (errors, _) = validate_field_definitions(&drafts, &MenuLimits::default());
    assert_eq!(
        message_at(&errors, &field_path(0, "name")),
        Some("Value is required")
    );
}

#[test]
fn long_description_is_rejected() {
    let mut d = draft("title", "single_line_text", "Title");
    d.description = Some("x".repeat(101));
    let (errors, _) = validate_field_definitions(&[d], &MenuLimits::default());
    assert_eq!(
        message_at(&errors, &field_path(0, "description")),
        Some("Value must be no more than 100 characters")
    );
}

// ── Rule payload shapes ───────────────────────────────────────────

#[test]
fn rule_payload_shapes_are_checked_by_code() {
    let mut d = draft("title", "single_line_text", "Title");
    d.validations = vec![
        rule("required", "checkbox", json!("yes")),
        rule("max_precision", "number", json!(2.5)),
        rule("regex", "text", json!("([unclosed")),
        rule("field_reference", "text", json!(7)),
        rule("choices", "list.text", json!(["a", 2])),
    ];
    let (errors, schemas) = validate_field_definitions(&[d], &MenuLimits::default());

    assert_eq!(
        message_at(&errors, &rule_path(0, 0)),
        Some("Value must be a boolean")
    );
    assert_eq!(
        message_at(&errors, &rule_path(0, 1)),
        Some("Value must be a whole number")
    );
    assert_eq!(
        message_at(&errors, &rule_path(0, 2)),
        Some("Value must be a valid pattern")
    );
    assert_eq!(
        message_at(&errors, &rule_path(0, 3)),
        Some("Value must be a field key")
    );
    assert_eq!(
        message_at(&errors, &rule_path(0, 4)),
        Some("Value must be a list of strings")
    );
    // Broken rules are dropped from the decoded schema.
    assert!(schemas[0].validations.is_empty());
}

#[test]
fn min_max_bounds_are_date_aware() {
    let mut d = draft("when", "date", "When");
    d.validations = vec![
        rule("min", "date", json!("2024-01-01")),
        rule("max", "date", json!("not a date")),
        rule("min", "date_time", json!("2024-01-01T00:00:00Z")),
        rule("max", "number", json!("NaN-ish")),
    ];
    let (errors, schemas) = validate_field_definitions(&[d], &MenuLimits::default());

    assert!(message_at(&errors, &rule_path(0, 0)).is_none());
    assert_eq!(
        message_at(&errors, &rule_path(0, 1)),
        Some("Value must be a valid date (YYYY-MM-DD)")
    );
    assert!(message_at(&errors, &rule_path(0, 2)).is_none());
    assert_eq!(
        message_at(&errors, &rule_path(0, 3)),
        Some("Value must be a number")
    );
    assert_eq!(schemas[0].validations.len(), 2);
}

#[test]
fn unknown_codes_and_kinds_are_rejected() {
    let mut d = draft("title", "single_line_text", "Title");
    d.validations = vec![
        rule("sideways", "checkbox", json!(true)),
        rule("required", "toggle", json!(true)),
    ];
    let (errors, _) = validate_field_definitions(&[d], &MenuLimits::default());
    assert_eq!(
        message_at(&errors, &rule_path(0, 0)),
        Some("Unknown validation code 'sideways'")
    );
    assert_eq!(
        message_at(&errors, &rule_path(0, 1)),
        Some("Unknown validation type 'toggle'")
    );
}

// ── Title and handle ──────────────────────────────────────────────

#[test]
fn title_is_required_and_bounded() {
    let (errors, _) = validate_menu_title(None);
    assert_eq!(
        message_at(&errors, &[PathSegment::from("title")]),
        Some("Value is required")
    );

    let short = json!("ab");
    let (errors, _) = validate_menu_title(Some(&short));
    assert_eq!(
        message_at(&errors, &[PathSegment::from("title")]),
        Some("Value must be at least 3 characters")
    );

    let ok = json!("  Pages  ");
    let (errors, value) = validate_menu_title(Some(&ok));
    assert!(errors.is_empty());
    assert_eq!(value.as_deref(), Some("Pages"));
}

struct Always(Uniqueness);

#[async_trait]
impl UniquenessOracle for Always {
    async fn check_unique(&self, _value: Option<&str>, _scope: &UniqueScope) -> Uniqueness {
        self.0
    }
}

#[tokio::test]
async fn handle_rejects_special_characters() {
    let raw = json!("Has Spaces");
    let (errors, _) =
        validate_menu_handle(Some(&raw), ProjectId::new(), None, &Always(Uniqueness::Unique))
            .await;
    assert_eq!(
        message_at(&errors, &[PathSegment::from("handle")]),
        Some("Handle can’t include spaces or special characters (i.e. $ # !)")
    );
}

#[tokio::test]
async fn handle_conflict_reports_handle_must_be_unique() {
    let raw = json!("pages");
    let (errors, value) =
        validate_menu_handle(Some(&raw), ProjectId::new(), None, &Always(Uniqueness::Conflict))
            .await;
    assert_eq!(
        message_at(&errors, &[PathSegment::from("handle")]),
        Some("Handle must be unique")
    );
    assert_eq!(value.as_deref(), Some("pages"));
}

#[tokio::test]
async fn handle_unknown_uniqueness_passes() {
    let raw = json!("pages");
    let (errors, _) =
        validate_menu_handle(Some(&raw), ProjectId::new(), None, &Always(Uniqueness::Unknown))
            .await;
    assert!(errors.is_empty());
}
