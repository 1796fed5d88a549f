use chrono::Utc;
use folio_engine::{FieldError, PathSegment};
use folio_model::{Document, FieldSchema, FieldType, Menu, ValidationRule};
use folio_service::{ItemService, MenuService, TranslationService};
use folio_store::Database;
use folio_types::{MenuId, ProjectId};
use pretty_assertions::assert_eq;
use serde_json::json;

fn doc(value: serde_json::Value) -> Document {
    match value {
        serde_json::Value::Object(map) => map,
        other => panic!("expected an object, got {other}"),
    }
}

fn seed_menu(db: &Database, project_id: ProjectId) -> Menu {
    let now = Utc::now();
    let menu = Menu {
        id: MenuId::new(),
        project_id,
        title: "Pages".into(),
        handle: "pages".into(),
        fields: vec![
            FieldSchema::new("title", FieldType::SingleLineText, "Title")
                .with_rule(ValidationRule::required(true))
                .with_rule(ValidationRule::unique(true)),
            FieldSchema::new("summary", FieldType::MultiLineText, "Summary"),
            FieldSchema::new("slug", FieldType::UrlHandle, "Slug")
                .with_rule(ValidationRule::field_reference("title")),
        ],
        created_at: now,
        updated_at: now,
        created_by: "seed".into(),
        updated_by: "seed".into(),
    };
    db.menus().insert(&menu).unwrap();
    menu
}

fn error_at(errors: &[FieldError], path: &[&str]) -> Option<String> {
    let want: Vec<PathSegment> = path.iter().map(|s| PathSegment::from(*s)).collect();
    errors
        .iter()
        .find(|e| e.path == want)
        .map(|e| e.message.clone())
}

// ── Items ─────────────────────────────────────────────────────────

#[tokio::test]
async fn create_item_persists_and_derives_slug() {
    let db = Database::open_in_memory().unwrap();
    let project = ProjectId::new();
    let menu = seed_menu(&db, project);
    let service = ItemService::new(&db);

    let input = doc(json!({"doc": {"title": "Hello World!", "summary": "greeting"}}));
    let reply = service
        .create_item(project, menu.id, &input, "alice")
        .await
        .unwrap();

    assert!(reply.is_ok(), "unexpected errors: {:?}", reply.user_errors);
    let item = reply.data.unwrap();
    assert_eq!(item.get_str("title"), Some("Hello World!"));
    assert_eq!(item.get_str("summary"), Some("greeting"));
    assert_eq!(item.get_str("slug"), Some("hello-world"));
    assert_eq!(db.items().count(project, menu.id).unwrap(), 1);
}

#[tokio::test]
async fn create_item_rejects_missing_required_field() {
    let db = Database::open_in_memory().unwrap();
    let project = ProjectId::new();
    let menu = seed_menu(&db, project);
    let service = ItemService::new(&db);

    let input = doc(json!({"doc": {"summary": "no title"}}));
    let reply = service
        .create_item(project, menu.id, &input, "alice")
        .await
        .unwrap();

    assert!(!reply.is_ok());
    assert_eq!(
        error_at(&reply.user_errors, &["doc", "title"]),
        Some("Value is required".to_string())
    );
    assert_eq!(db.items().count(project, menu.id).unwrap(), 0);
}

#[tokio::test]
async fn create_item_enforces_uniqueness() {
    let db = Database::open_in_memory().unwrap();
    let project = ProjectId::new();
    let menu = seed_menu(&db, project);
    let service = ItemService::new(&db);

    let input = doc(json!({"doc": {"title": "Taken"}}));
    assert!(
        service
            .create_item(project, menu.id, &input, "alice")
            .await
            .unwrap()
            .is_ok()
    );

    let reply = service
        .create_item(project, menu.id, &input, "alice")
        .await
        .unwrap();
    assert_eq!(
        error_at(&reply.user_errors, &["doc", "title"]),
        Some("Value must be unique".to_string())
    );
}

#[tokio::test]
async fn update_item_patches_only_present_keys() {
    let db = Database::open_in_memory().unwrap();
    let project = ProjectId::new();
    let menu = seed_menu(&db, project);
    let service = ItemService::new(&db);

    let input = doc(json!({"doc": {"title": "Original", "summary": "keep me"}}));
    let created = service
        .create_item(project, menu.id, &input, "alice")
        .await
        .unwrap()
        .data
        .unwrap();

    let patch = doc(json!({"doc": {"summary": "changed"}}));
    let reply = service
        .update_item(project, menu.id, created.id, &patch, "bob")
        .await
        .unwrap();

    let item = reply.data.unwrap();
    assert_eq!(item.get_str("title"), Some("Original"));
    assert_eq!(item.get_str("summary"), Some("changed"));
    assert_eq!(item.updated_by, "bob");
    assert_eq!(item.created_by, "alice");
}

#[tokio::test]
async fn update_item_does_not_conflict_with_itself() {
    let db = Database::open_in_memory().unwrap();
    let project = ProjectId::new();
    let menu = seed_menu(&db, project);
    let service = ItemService::new(&db);

    let input = doc(json!({"doc": {"title": "Stable"}}));
    let created = service
        .create_item(project, menu.id, &input, "alice")
        .await
        .unwrap()
        .data
        .unwrap();

    // Re-submitting the same unique value for the same record passes.
    let reply = service
        .update_item(project, menu.id, created.id, &input, "alice")
        .await
        .unwrap();
    assert!(reply.is_ok(), "unexpected errors: {:?}", reply.user_errors);
}

#[tokio::test]
async fn create_item_links_existing_parent_and_drops_missing() {
    let db = Database::open_in_memory().unwrap();
    let project = ProjectId::new();
    let menu = seed_menu(&db, project);
    let service = ItemService::new(&db);

    let parent = service
        .create_item(project, menu.id, &doc(json!({"doc": {"title": "Parent"}})), "alice")
        .await
        .unwrap()
        .data
        .unwrap();

    let child_input = doc(json!({
        "parent_id": parent.id.to_string(),
        "doc": {"title": "Child"}
    }));
    let child = service
        .create_item(project, menu.id, &child_input, "alice")
        .await
        .unwrap()
        .data
        .unwrap();
    assert_eq!(child.parent_id, Some(parent.id));

    let orphan_input = doc(json!({
        "parent_id": "not-a-uuid",
        "doc": {"title": "Orphan"}
    }));
    let orphan = service
        .create_item(project, menu.id, &orphan_input, "alice")
        .await
        .unwrap()
        .data
        .unwrap();
    assert_eq!(orphan.parent_id, None);
}

#[tokio::test]
async fn file_references_resolve_in_one_batch() {
    use folio_engine::{FileReference, FileReferenceResolver, ResolverError};

    struct StubResolver;

    #[async_trait::async_trait]
    impl FileReferenceResolver for StubResolver {
        async fn resolve(
            &self,
            _project_id: ProjectId,
            ids: &[String],
        ) -> Result<Vec<FileReference>, ResolverError> {
            Ok(ids
                .iter()
                .map(|id| FileReference {
                    id: id.clone(),
                    url: Some(format!("https://files.example/{id}")),
                    content_type: None,
                    alt: None,
                })
                .collect())
        }
    }

    let db = Database::open_in_memory().unwrap();
    let project = ProjectId::new();
    let now = Utc::now();
    let menu = Menu {
        id: MenuId::new(),
        project_id: project,
        title: "Media".into(),
        handle: "media".into(),
        fields: vec![
            FieldSchema::new("hero", FieldType::FileReference, "Hero"),
            FieldSchema::new("gallery", FieldType::ListFileReference, "Gallery"),
        ],
        created_at: now,
        updated_at: now,
        created_by: "seed".into(),
        updated_by: "seed".into(),
    };
    db.menus().insert(&menu).unwrap();

    let service = ItemService::new(&db);
    let input = doc(json!({"doc": {"hero": "file-1", "gallery": ["file-2", "file-3"]}}));
    let item = service
        .create_item(project, menu.id, &input, "alice")
        .await
        .unwrap()
        .data
        .unwrap();

    let refs = service
        .resolve_file_references(project, menu.id, item.id, &StubResolver)
        .await
        .unwrap();
    let ids: Vec<&str> = refs.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["file-1", "file-2", "file-3"]);
}

// ── Menus ─────────────────────────────────────────────────────────

#[tokio::test]
async fn create_menu_roundtrip() {
    let db = Database::open_in_memory().unwrap();
    let project = ProjectId::new();
    let service = MenuService::new(&db);

    let input = doc(json!({
        "title": "Blog posts",
        "handle": "blog-posts",
        "fields": [
            {"key": "title", "type": "single_line_text", "name": "Title",
             "validations": [{"code": "required", "type": "checkbox", "value": true}]}
        ]
    }));
    let reply = service.create_menu(project, &input, "alice").await.unwrap();

    assert!(reply.is_ok(), "unexpected errors: {:?}", reply.user_errors);
    let menu = reply.data.unwrap();
    assert_eq!(menu.handle, "blog-posts");
    assert_eq!(menu.fields.len(), 1);
    assert_eq!(menu.fields[0].key, "title");
}

#[tokio::test]
async fn create_menu_rejects_duplicate_handle() {
    let db = Database::open_in_memory().unwrap();
    let project = ProjectId::new();
    seed_menu(&db, project);
    let service = MenuService::new(&db);

    let input = doc(json!({"title": "Also pages", "handle": "pages"}));
    let reply = service.create_menu(project, &input, "alice").await.unwrap();
    assert_eq!(
        error_at(&reply.user_errors, &["handle"]),
        Some("Handle must be unique".to_string())
    );
    assert_eq!(db.menus().count(project).unwrap(), 1);
}

#[tokio::test]
async fn create_menu_rejects_bad_schema() {
    let db = Database::open_in_memory().unwrap();
    let project = ProjectId::new();
    let service = MenuService::new(&db);

    let input = doc(json!({
        "title": "Broken",
        "handle": "broken",
        "fields": [{"key": "Bad Key!", "type": "single_line_text", "name": "Bad"}]
    }));
    let reply = service.create_menu(project, &input, "alice").await.unwrap();
    assert!(!reply.is_ok());
    assert!(
        reply
            .user_errors
            .iter()
            .any(|e| e.path.first() == Some(&PathSegment::from("fields")))
    );
}

#[tokio::test]
async fn update_menu_patches_title_only() {
    let db = Database::open_in_memory().unwrap();
    let project = ProjectId::new();
    let menu = seed_menu(&db, project);
    let service = MenuService::new(&db);

    let input = doc(json!({"title": "Renamed"}));
    let reply = service
        .update_menu(project, menu.id, &input, "bob")
        .await
        .unwrap();

    let updated = reply.data.unwrap();
    assert_eq!(updated.title, "Renamed");
    assert_eq!(updated.handle, "pages");
    assert_eq!(updated.fields.len(), menu.fields.len());
}

#[tokio::test]
async fn update_menu_allows_keeping_own_handle() {
    let db = Database::open_in_memory().unwrap();
    let project = ProjectId::new();
    let menu = seed_menu(&db, project);
    let service = MenuService::new(&db);

    let input = doc(json!({"handle": "pages"}));
    let reply = service
        .update_menu(project, menu.id, &input, "bob")
        .await
        .unwrap();
    assert!(reply.is_ok(), "unexpected errors: {:?}", reply.user_errors);
}

// ── Translations ──────────────────────────────────────────────────

#[tokio::test]
async fn upsert_translation_roundtrip() {
    let db = Database::open_in_memory().unwrap();
    let project = ProjectId::new();
    let menu = seed_menu(&db, project);
    let service = TranslationService::new(&db);

    let value = doc(json!({"title": "Bonjour", "tags": ["un", "deux"]}));
    let reply = service
        .upsert_translation(project, menu.id, "entry-1", "fr", &value, "alice")
        .await
        .unwrap();

    assert!(reply.is_ok(), "unexpected errors: {:?}", reply.user_errors);
    let translation = reply.data.unwrap();
    assert_eq!(translation.lang, "fr");
    assert_eq!(translation.value.get("title"), Some(&json!("Bonjour")));
    assert_eq!(translation.value.get("tags"), Some(&json!(["un", "deux"])));
}

#[tokio::test]
async fn upsert_translation_rejects_non_string_values() {
    let db = Database::open_in_memory().unwrap();
    let project = ProjectId::new();
    let menu = seed_menu(&db, project);
    let service = TranslationService::new(&db);

    let value = doc(json!({"title": 42}));
    let reply = service
        .upsert_translation(project, menu.id, "entry-1", "fr", &value, "alice")
        .await
        .unwrap();
    assert_eq!(
        error_at(&reply.user_errors, &["title"]),
        Some("Value must be a string".to_string())
    );
}

#[tokio::test]
async fn upsert_translation_addresses_list_elements() {
    let db = Database::open_in_memory().unwrap();
    let project = ProjectId::new();
    let menu = seed_menu(&db, project);
    let service = TranslationService::new(&db);

    let value = doc(json!({"tags": ["fine", 7]}));
    let reply = service
        .upsert_translation(project, menu.id, "entry-1", "fr", &value, "alice")
        .await
        .unwrap();

    let want = vec![PathSegment::from("tags"), PathSegment::from(1usize)];
    assert!(reply.user_errors.iter().any(|e| e.path == want));
}

#[tokio::test]
async fn upsert_translation_requires_lang() {
    let db = Database::open_in_memory().unwrap();
    let project = ProjectId::new();
    let menu = seed_menu(&db, project);
    let service = TranslationService::new(&db);

    let value = doc(json!({"title": "Hola"}));
    let reply = service
        .upsert_translation(project, menu.id, "entry-1", "", &value, "alice")
        .await
        .unwrap();
    assert_eq!(
        error_at(&reply.user_errors, &["lang"]),
        Some("Value is required".to_string())
    );
}

#[tokio::test]
async fn upsert_translation_replaces_previous_value() {
    let db = Database::open_in_memory().unwrap();
    let project = ProjectId::new();
    let menu = seed_menu(&db, project);
    let service = TranslationService::new(&db);

    let first = doc(json!({"title": "Bonjour"}));
    service
        .upsert_translation(project, menu.id, "entry-1", "fr", &first, "alice")
        .await
        .unwrap();

    let second = doc(json!({"title": "Salut"}));
    service
        .upsert_translation(project, menu.id, "entry-1", "fr", &second, "bob")
        .await
        .unwrap();

    let stored = service
        .get_translation(project, menu.id, "entry-1", "fr")
        .unwrap();
    assert_eq!(stored.value.get("title"), Some(&json!("Salut")));
    assert_eq!(service.list_translations(project, menu.id, "entry-1").unwrap().len(), 1);
}
