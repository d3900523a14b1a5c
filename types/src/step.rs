//! Step definitions — one screen/phase of the verification flow.

use crate::document::DocumentType;
use crate::field::FieldDefinition;
use serde::{Deserialize, Serialize};

/// Progress state of one step within a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    /// Not yet reached (or abandoned by backward navigation).
    Pending,
    /// The step the user is working on. Exactly one step is `Current`
    /// unless the whole session is verified.
    Current,
    /// Submitted and validated.
    Completed,
    /// The terminal status of the last step; ends the session.
    Verified,
}

impl StepStatus {
    /// Whether this step counts toward the derived verification level.
    pub fn is_complete(&self) -> bool {
        matches!(self, StepStatus::Completed | StepStatus::Verified)
    }
}

/// One phase of the verification flow, bundling fields and the document
/// types that must reach a successful upload before the step can complete.
///
/// Immutable configuration, like [`FieldDefinition`].
#[derive(Clone, Debug)]
pub struct StepDefinition {
    /// Stable identifier; key into the session's step statuses.
    pub id: String,
    /// Display name, carried as opaque data for the UI layer.
    pub title: String,
    /// Position in the flow. Unique; defines the sequence.
    pub order: u32,
    /// Verification tier this step belongs to (1..=3).
    pub level: u8,
    /// Required steps gate forward navigation; optional steps can be
    /// skipped over.
    pub required: bool,
    pub fields: Vec<FieldDefinition>,
    pub required_documents: Vec<DocumentType>,
}

impl StepDefinition {
    pub fn new(id: impl Into<String>, title: impl Into<String>, order: u32, level: u8) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            order,
            level,
            required: true,
            fields: Vec::new(),
            required_documents: Vec::new(),
        }
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn with_fields(mut self, fields: Vec<FieldDefinition>) -> Self {
        self.fields = fields;
        self
    }

    pub fn with_documents(mut self, documents: Vec<DocumentType>) -> Self {
        self.required_documents = documents;
        self
    }
}
