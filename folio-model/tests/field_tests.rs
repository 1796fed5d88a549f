use folio_model::{FieldSchema, FieldType, Menu, RuleCode, RuleKind, ValidationRule};
use folio_types::{MenuId, ProjectId};
use pretty_assertions::assert_eq;
use serde_json::json;

// ── FieldType tags ────────────────────────────────────────────────

#[test]
fn field_type_serializes_to_wire_tags() {
    assert_eq!(
        serde_json::to_value(FieldType::SingleLineText).unwrap(),
        json!("single_line_text")
    );
    assert_eq!(
        serde_json::to_value(FieldType::ListNumberDecimal).unwrap(),
        json!("list.number_decimal")
    );
    assert_eq!(
        serde_json::to_value(FieldType::UrlHandle).unwrap(),
        json!("url_handle")
    );
}

#[test]
fn field_type_deserializes_known_tags() {
    let ft: FieldType = serde_json::from_value(json!("money")).unwrap();
    assert_eq!(ft, FieldType::Money);
    assert!(ft.is_known());

    let list: FieldType = serde_json::from_value(json!("list.date_time")).unwrap();
    assert_eq!(list, FieldType::ListDateTime);
}

#[test]
fn unknown_tag_round_trips_verbatim() {
    let ft: FieldType = serde_json::from_value(json!("holographic_text")).unwrap();
    assert_eq!(ft, FieldType::Other("holographic_text".to_string()));
    assert!(!ft.is_known());
    assert_eq!(serde_json::to_value(ft).unwrap(), json!("holographic_text"));
}

#[test]
fn all_known_tags_round_trip() {
    let tags = [
        "single_line_text",
        "multi_line_text",
        "rich_text",
        "color",
        "file_reference",
        "boolean",
        "number_integer",
        "number_decimal",
        "dimension",
        "volume",
        "weight",
        "date_time",
        "date",
        "money",
        "url",
        "url_handle",
        "list.single_line_text",
        "list.number_integer",
        "list.number_decimal",
        "list.date_time",
        "list.date",
        "list.file_reference",
        "list.color",
        "list.url",
    ];
    for tag in tags {
        let ft = FieldType::from(tag.to_string());
        assert!(ft.is_known(), "tag {tag} should be known");
        assert_eq!(ft.as_str(), tag);
    }
}

// ── Validation rules ──────────────────────────────────────────────

#[test]
fn rule_shorthands_carry_the_expected_shape() {
    let required = ValidationRule::required(true);
    assert_eq!(required.code, RuleCode::Required);
    assert_eq!(required.kind, RuleKind::Checkbox);
    assert_eq!(required.value, json!(true));

    let min = ValidationRule::min(2.0);
    assert_eq!(min.code, RuleCode::Min);
    assert_eq!(min.kind, RuleKind::Number);
    assert_eq!(min.value, json!(2.0));

    let choices = ValidationRule::choices(["a", "b"]);
    assert_eq!(choices.code, RuleCode::Choices);
    assert_eq!(choices.kind, RuleKind::ListText);
    assert_eq!(choices.value, json!(["a", "b"]));
}

#[test]
fn rule_code_parse_rejects_unknown() {
    assert_eq!(RuleCode::parse("max_precision"), Some(RuleCode::MaxPrecision));
    assert_eq!(RuleCode::parse("sideways"), None);
}

#[test]
fn rule_kind_list_text_tag() {
    assert_eq!(
        serde_json::to_value(RuleKind::ListText).unwrap(),
        json!("list.text")
    );
    let kind: RuleKind = serde_json::from_value(json!("list.text")).unwrap();
    assert_eq!(kind, RuleKind::ListText);
}

#[test]
fn rule_serializes_kind_under_type_key() {
    let rule = ValidationRule::required(true);
    let value = serde_json::to_value(&rule).unwrap();
    assert_eq!(
        value,
        json!({"code": "required", "type": "checkbox", "value": true})
    );
}

// ── Schemas and menus ─────────────────────────────────────────────

#[test]
fn field_schema_serializes_type_key() {
    let schema = FieldSchema::new("title", FieldType::SingleLineText, "Title")
        .with_rule(ValidationRule::required(true));
    let value = serde_json::to_value(&schema).unwrap();
    assert_eq!(value["type"], json!("single_line_text"));
    assert_eq!(value["key"], json!("title"));
    assert_eq!(value["validations"][0]["code"], json!("required"));
}

#[test]
fn menu_field_lookup_by_key() {
    let now = chrono::Utc::now();
    let menu = Menu {
        id: MenuId::new(),
        project_id: ProjectId::new(),
        title: "Pages".into(),
        handle: "pages".into(),
        fields: vec![
            FieldSchema::new("title", FieldType::SingleLineText, "Title"),
            FieldSchema::new("body", FieldType::RichText, "Body"),
        ],
        created_at: now,
        updated_at: now,
        created_by: "seed".into(),
        updated_by: "seed".into(),
    };
    assert_eq!(menu.field("body").map(|f| f.name.as_str()), Some("Body"));
    assert!(menu.field("missing").is_none());
}
