//! Step-level validation — fields plus required-document gating.

use crate::error::ValidationError;
use crate::field;
use std::collections::BTreeMap;
use veriflow_types::{DocumentRecord, DocumentType, FormData, StepDefinition, UploadStatus};

/// Everything wrong with a step, keyed by field id (or `doc_<type>` for
/// document failures). Empty map ⇔ the step is valid.
pub type ValidationErrors = BTreeMap<String, ValidationError>;

/// Validates a whole step: every field and every required document.
///
/// Unlike [`field::validate`], nothing short-circuits — the map reports
/// everything still wrong so the UI can show it all in one pass.
pub struct StepValidator;

impl StepValidator {
    /// Key under which a document failure is reported.
    pub fn document_key(document_type: &DocumentType) -> String {
        format!("doc_{document_type}")
    }

    pub fn validate_step(
        &self,
        step: &StepDefinition,
        form_data: &FormData,
        documents: &BTreeMap<DocumentType, DocumentRecord>,
    ) -> ValidationErrors {
        let mut errors = ValidationErrors::new();

        for field_def in &step.fields {
            let value = form_data.get(&field_def.id).map(String::as_str);
            if let Some(error) = field::validate(field_def, value) {
                errors.insert(field_def.id.clone(), error);
            }
        }

        for document_type in &step.required_documents {
            let key = Self::document_key(document_type);
            match documents.get(document_type) {
                None => {
                    errors.insert(key, ValidationError::MissingDocument);
                }
                Some(record) if record.upload_status != UploadStatus::Success => {
                    errors.insert(key, ValidationError::DocumentNotReady);
                }
                Some(_) => {}
            }
        }

        errors
    }

    /// Whether a step currently passes validation.
    pub fn is_valid(
        &self,
        step: &StepDefinition,
        form_data: &FormData,
        documents: &BTreeMap<DocumentType, DocumentRecord>,
    ) -> bool {
        self.validate_step(step, form_data, documents).is_empty()
    }
}
