//! The document field engine — the core orchestrator.
//!
//! Given a menu's field schema and a partially-specified input document,
//! validates and normalizes every declared field, consults the uniqueness
//! oracle where fields demand it, and accumulates path-addressed errors.
//! One engine serves both create and update; [`Mode`] only changes how an
//! absent key is treated, never the per-type rules.

use crate::dispatch::{FieldCx, validate_field};
use crate::error::{EngineResult, FieldError};
use crate::oracle::UniquenessOracle;
use crate::validators::{StringOptions, validate_string};
use folio_model::{Document, FieldSchema, FieldType};
use folio_types::{ItemId, MenuId, ProjectId};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// How absence is treated during a validation pass.
///
/// Create is PUT-with-defaults: every schema field is evaluated, so absent
/// values still trip `required` rules. Update is PATCH: only keys present
/// in the input document are touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Create,
    Update,
}

/// Request-scoped identity of a validation pass.
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext {
    pub project_id: ProjectId,
    pub menu_id: MenuId,
    /// The record being updated; excluded from its own uniqueness checks.
    pub item_id: Option<ItemId>,
}

/// The sanitized output of a validation pass.
///
/// Each part is `Some` only when the corresponding key was declared in the
/// input; absence means "leave the stored value untouched".
#[derive(Debug, Clone, Default)]
pub struct DocumentPatch {
    pub subject: Option<String>,
    pub subject_id: Option<String>,
    pub doc: Option<Document>,
}

/// Validation outcome: errors as data plus the sanitized document.
///
/// Callers persist `output` only when `errors` is empty.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub errors: Vec<FieldError>,
    pub output: DocumentPatch,
}

impl ValidationReport {
    /// True when the pass produced no document errors.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// The document field engine.
///
/// Stateless between invocations; schema and document are request-scoped
/// inputs, so one engine instance serves all tenants.
pub struct Engine {
    oracle: Arc<dyn UniquenessOracle>,
}

impl Engine {
    /// Creates an engine over the given uniqueness oracle.
    #[must_use]
    pub fn new(oracle: Arc<dyn UniquenessOracle>) -> Self {
        Self { oracle }
    }

    /// Validates a partial input document against a menu's field schema.
    ///
    /// The input is the raw request body: recognized top-level keys are
    /// `subject`, `subject_id` and `doc`. Unknown document keys are
    /// ignored; fields are evaluated in schema declaration order, which is
    /// also the error-reporting order.
    ///
    /// User errors land in the report; only infrastructure failures (a
    /// schema rule that cannot be interpreted) surface as `Err`.
    pub async fn validate(
        &self,
        fields: &[FieldSchema],
        input: &Document,
        mode: Mode,
        ctx: &ValidationContext,
    ) -> EngineResult<ValidationReport> {
        let mut report = ValidationReport::default();
        debug!(
            project = %ctx.project_id,
            menu = %ctx.menu_id,
            ?mode,
            fields = fields.len(),
            "validating document"
        );

        self.validate_attributes(input, &mut report);
        self.validate_doc(fields, input, mode, ctx, &mut report).await?;

        debug!(errors = report.errors.len(), "validation finished");
        Ok(report)
    }

    /// Fixed top-level attributes, validated independently of the schema.
    /// Only touched when present and non-null in the input.
    fn validate_attributes(&self, input: &Document, report: &mut ValidationReport) {
        if let Some(subject) = input.get("subject")
            && !subject.is_null()
        {
            let opts = StringOptions {
                choices: Some(vec!["content".to_string()]),
                ..StringOptions::default()
            };
            let (errs, value) = validate_string(Some(subject), &opts);
            if let Some(msg) = errs.into_iter().next() {
                report.errors.push(FieldError::new(["subject"], msg));
            }
            report.output.subject = value;
        }

        if let Some(subject_id) = input.get("subject_id")
            && !subject_id.is_null()
        {
            let (errs, value) = validate_string(Some(subject_id), &StringOptions::default());
            if let Some(msg) = errs.into_iter().next() {
                report.errors.push(FieldError::new(["subject_id"], msg));
            }
            report.output.subject_id = value;
        }
    }

    async fn validate_doc(
        &self,
        fields: &[FieldSchema],
        input: &Document,
        mode: Mode,
        ctx: &ValidationContext,
        report: &mut ValidationReport,
    ) -> EngineResult<()> {
        // A declared doc key, even an empty or null one, means the caller
        // is addressing the document body.
        let Some(doc_value) = input.get("doc") else {
            return Ok(());
        };
        let mut out = Document::new();

        if let Value::Object(doc_input) = doc_value {
            let cx = FieldCx {
                oracle: self.oracle.as_ref(),
                ctx,
            };
            for field in fields {
                let raw = doc_input.get(&field.key);
                if mode == Mode::Update && raw.is_none() {
                    // PATCH semantics: untouched fields are not re-checked.
                    continue;
                }
                validate_field(field, raw, doc_input, &cx, &mut report.errors, &mut out).await?;
            }
        }

        report.output.doc = Some(out);
        Ok(())
    }
}

/// Collects the opaque file reference ids of a validated document, for one
/// batched resolver call. Existence of the referenced files is never
/// checked at validation time.
#[must_use]
pub fn collect_file_references(fields: &[FieldSchema], doc: &Document) -> Vec<String> {
    let mut ids = Vec::new();
    for field in fields {
        match &field.field_type {
            FieldType::FileReference => {
                if let Some(id) = doc.get(&field.key).and_then(Value::as_str) {
                    ids.push(id.to_string());
                }
            }
            FieldType::ListFileReference => {
                if let Some(entries) = doc.get(&field.key).and_then(Value::as_array) {
                    ids.extend(
                        entries
                            .iter()
                            .filter_map(Value::as_str)
                            .map(str::to_string),
                    );
                }
            }
            _ => {}
        }
    }
    ids
}
