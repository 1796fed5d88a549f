//! Item flows: validate a document against its menu, then persist.

use crate::error::ServiceResult;
use crate::reply::ServiceReply;
use chrono::Utc;
use folio_engine::{
    Engine, FileReference, FileReferenceResolver, Mode, ValidationContext, collect_file_references,
};
use folio_model::{Document, Item};
use folio_store::{Database, ItemStore, MenuStore, Parameters};
use folio_types::{ItemId, MenuId, ProjectId};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Create, update and query items within a menu.
///
/// Every mutation runs the document engine first and persists only when
/// the report carries no errors; rejected input leaves the store untouched.
pub struct ItemService {
    menus: MenuStore,
    items: ItemStore,
    engine: Engine,
}

impl ItemService {
    #[must_use]
    pub fn new(db: &Database) -> Self {
        Self {
            menus: db.menus(),
            items: db.items(),
            engine: Engine::new(Arc::new(db.item_oracle())),
        }
    }

    /// Validates and creates an item.
    ///
    /// Create is PUT-with-defaults: the full schema is evaluated even when
    /// the input document is sparse, so absent required fields reject the
    /// whole request.
    pub async fn create_item(
        &self,
        project_id: ProjectId,
        menu_id: MenuId,
        input: &Document,
        actor: &str,
    ) -> ServiceResult<ServiceReply<Item>> {
        let menu = self.menus.get(project_id, menu_id)?;

        // Guarantee a doc body so every schema field gets evaluated.
        let mut body = input.clone();
        if !body.contains_key("doc") {
            body.insert("doc".to_string(), Value::Object(Document::new()));
        }

        let ctx = ValidationContext {
            project_id,
            menu_id,
            item_id: None,
        };
        let report = self
            .engine
            .validate(&menu.fields, &body, Mode::Create, &ctx)
            .await?;
        if !report.is_valid() {
            return Ok(ServiceReply::invalid(report.errors));
        }

        let parent_id = self.resolve_parent(project_id, menu_id, input)?;
        let now = Utc::now();
        let item = Item {
            id: ItemId::new(),
            project_id,
            menu_id,
            parent_id,
            subject: report.output.subject,
            subject_id: report.output.subject_id,
            doc: report.output.doc.unwrap_or_default(),
            created_at: now,
            updated_at: now,
            created_by: actor.to_string(),
            updated_by: actor.to_string(),
        };
        self.items.insert(&item)?;

        let persisted = self.items.get(project_id, menu_id, item.id)?;
        Ok(ServiceReply::ok(persisted))
    }

    /// Validates and updates an item in place.
    ///
    /// Update is a PATCH: only keys present in the input are re-validated
    /// and written; everything else keeps its stored value. The item is
    /// excluded from its own uniqueness checks.
    pub async fn update_item(
        &self,
        project_id: ProjectId,
        menu_id: MenuId,
        item_id: ItemId,
        input: &Document,
        actor: &str,
    ) -> ServiceResult<ServiceReply<Item>> {
        let menu = self.menus.get(project_id, menu_id)?;
        let mut item = self.items.get(project_id, menu_id, item_id)?;

        let ctx = ValidationContext {
            project_id,
            menu_id,
            item_id: Some(item_id),
        };
        let report = self
            .engine
            .validate(&menu.fields, input, Mode::Update, &ctx)
            .await?;
        if !report.is_valid() {
            return Ok(ServiceReply::invalid(report.errors));
        }

        if let Some(doc) = report.output.doc {
            for (key, value) in doc {
                item.doc.insert(key, value);
            }
        }
        if report.output.subject.is_some() {
            item.subject = report.output.subject;
        }
        if report.output.subject_id.is_some() {
            item.subject_id = report.output.subject_id;
        }
        if input.contains_key("parent_id") {
            item.parent_id = self.resolve_parent(project_id, menu_id, input)?;
        }
        item.updated_at = Utc::now();
        item.updated_by = actor.to_string();
        self.items.update(&item)?;

        let persisted = self.items.get(project_id, menu_id, item_id)?;
        Ok(ServiceReply::ok(persisted))
    }

    pub fn get_item(
        &self,
        project_id: ProjectId,
        menu_id: MenuId,
        item_id: ItemId,
    ) -> ServiceResult<Item> {
        Ok(self.items.get(project_id, menu_id, item_id)?)
    }

    pub fn list_items(
        &self,
        project_id: ProjectId,
        menu_id: MenuId,
        parameters: &Parameters,
    ) -> ServiceResult<Vec<Item>> {
        Ok(self.items.list(project_id, menu_id, parameters)?)
    }

    pub fn count_items(&self, project_id: ProjectId, menu_id: MenuId) -> ServiceResult<usize> {
        Ok(self.items.count(project_id, menu_id)?)
    }

    pub fn delete_item(
        &self,
        project_id: ProjectId,
        menu_id: MenuId,
        item_id: ItemId,
    ) -> ServiceResult<()> {
        Ok(self.items.delete(project_id, menu_id, item_id)?)
    }

    /// Resolves an item's file reference ids to renderable metadata, in one
    /// batched resolver call for the whole document.
    pub async fn resolve_file_references(
        &self,
        project_id: ProjectId,
        menu_id: MenuId,
        item_id: ItemId,
        resolver: &dyn FileReferenceResolver,
    ) -> ServiceResult<Vec<FileReference>> {
        let menu = self.menus.get(project_id, menu_id)?;
        let item = self.items.get(project_id, menu_id, item_id)?;
        let ids = collect_file_references(&menu.fields, &item.doc);
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        Ok(resolver.resolve(project_id, &ids).await?)
    }

    /// Extracts and resolves a candidate parent id from the input.
    /// Unparseable or nonexistent parents are dropped, never errors.
    fn resolve_parent(
        &self,
        project_id: ProjectId,
        menu_id: MenuId,
        input: &Document,
    ) -> ServiceResult<Option<ItemId>> {
        let Some(raw) = input.get("parent_id").and_then(Value::as_str) else {
            return Ok(None);
        };
        let Ok(candidate) = ItemId::parse(raw) else {
            debug!(parent = raw, "dropping unparseable parent id");
            return Ok(None);
        };
        Ok(self
            .items
            .resolve_parent(project_id, menu_id, Some(candidate))?)
    }
}
