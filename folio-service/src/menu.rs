//! Menu flows: meta-validate the schema edit, then persist.

use crate::error::{ServiceError, ServiceResult};
use crate::reply::ServiceReply;
use chrono::Utc;
use folio_engine::meta::{
    FieldDraft, MenuLimits, validate_field_definitions, validate_menu_handle, validate_menu_title,
};
use folio_model::{Document, Menu};
use folio_store::{Database, MenuHandleOracle, MenuStore, Parameters};
use folio_types::{MenuId, ProjectId};

/// Create, update and query menus within a project.
pub struct MenuService {
    menus: MenuStore,
    oracle: MenuHandleOracle,
    limits: MenuLimits,
}

impl MenuService {
    #[must_use]
    pub fn new(db: &Database) -> Self {
        Self {
            menus: db.menus(),
            oracle: db.handle_oracle(),
            limits: MenuLimits::default(),
        }
    }

    /// Overrides the default schema caps.
    #[must_use]
    pub fn with_limits(mut self, limits: MenuLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Validates and creates a menu.
    ///
    /// Recognized input keys: `title`, `handle`, `fields`. The handle must
    /// be unique within the project.
    pub async fn create_menu(
        &self,
        project_id: ProjectId,
        input: &Document,
        actor: &str,
    ) -> ServiceResult<ServiceReply<Menu>> {
        let drafts = decode_drafts(input)?;
        let (mut errors, fields) = validate_field_definitions(&drafts, &self.limits);

        let (title_errors, title) = validate_menu_title(input.get("title"));
        errors.extend(title_errors);

        let (handle_errors, handle) =
            validate_menu_handle(input.get("handle"), project_id, None, &self.oracle).await;
        errors.extend(handle_errors);

        if !errors.is_empty() {
            return Ok(ServiceReply::invalid(errors));
        }

        let now = Utc::now();
        let menu = Menu {
            id: MenuId::new(),
            project_id,
            title: title.unwrap_or_default(),
            handle: handle.unwrap_or_default(),
            fields,
            created_at: now,
            updated_at: now,
            created_by: actor.to_string(),
            updated_by: actor.to_string(),
        };
        self.menus.insert(&menu)?;

        let persisted = self.menus.get(project_id, menu.id)?;
        Ok(ServiceReply::ok(persisted))
    }

    /// Validates and updates a menu in place.
    ///
    /// A PATCH: only `title`, `handle` and `fields` keys present in the
    /// input are re-validated and written. The menu is excluded from its
    /// own handle uniqueness check.
    pub async fn update_menu(
        &self,
        project_id: ProjectId,
        menu_id: MenuId,
        input: &Document,
        actor: &str,
    ) -> ServiceResult<ServiceReply<Menu>> {
        let mut menu = self.menus.get(project_id, menu_id)?;
        let mut errors = Vec::new();

        let mut title = None;
        if input.contains_key("title") {
            let (title_errors, value) = validate_menu_title(input.get("title"));
            errors.extend(title_errors);
            title = value;
        }

        let mut handle = None;
        if input.contains_key("handle") {
            let (handle_errors, value) = validate_menu_handle(
                input.get("handle"),
                project_id,
                Some(menu_id),
                &self.oracle,
            )
            .await;
            errors.extend(handle_errors);
            handle = value;
        }

        let mut fields = None;
        if input.contains_key("fields") {
            let drafts = decode_drafts(input)?;
            let (field_errors, schemas) = validate_field_definitions(&drafts, &self.limits);
            errors.extend(field_errors);
            fields = Some(schemas);
        }

        if !errors.is_empty() {
            return Ok(ServiceReply::invalid(errors));
        }

        if let Some(title) = title {
            menu.title = title;
        }
        if let Some(handle) = handle {
            menu.handle = handle;
        }
        if let Some(fields) = fields {
            menu.fields = fields;
        }
        menu.updated_at = Utc::now();
        menu.updated_by = actor.to_string();
        self.menus.update(&menu)?;

        let persisted = self.menus.get(project_id, menu_id)?;
        Ok(ServiceReply::ok(persisted))
    }

    pub fn get_menu(&self, project_id: ProjectId, menu_id: MenuId) -> ServiceResult<Menu> {
        Ok(self.menus.get(project_id, menu_id)?)
    }

    pub fn list_menus(
        &self,
        project_id: ProjectId,
        parameters: &Parameters,
    ) -> ServiceResult<Vec<Menu>> {
        Ok(self.menus.list(project_id, parameters)?)
    }

    pub fn count_menus(&self, project_id: ProjectId) -> ServiceResult<usize> {
        Ok(self.menus.count(project_id)?)
    }

    pub fn delete_menu(&self, project_id: ProjectId, menu_id: MenuId) -> ServiceResult<()> {
        Ok(self.menus.delete(project_id, menu_id)?)
    }
}

/// Decodes the `fields` input key into drafts, tolerating absence.
fn decode_drafts(input: &Document) -> ServiceResult<Vec<FieldDraft>> {
    match input.get("fields") {
        None => Ok(Vec::new()),
        Some(value) => serde_json::from_value(value.clone())
            .map_err(|e| ServiceError::InvalidInput(format!("malformed fields list: {e}"))),
    }
}
