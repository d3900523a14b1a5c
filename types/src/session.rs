//! The mutable session owned by the controller.
//!
//! Everything the verification flow knows about one user's attempt lives
//! here: per-step statuses, the merged form data, per-document upload
//! records, and the dirty/last-saved bookkeeping the draft layer maintains.
//! Only the session controller mutates this; the UI layer reads snapshots.

use crate::document::{DocumentRecord, DocumentType};
use crate::step::{StepDefinition, StepStatus};
use crate::time::Timestamp;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Form field values keyed by field id.
///
/// Ordered so serialized payloads are byte-stable and value comparison
/// against the last persisted snapshot is deterministic.
pub type FormData = BTreeMap<String, String>;

/// In-progress verification state for a single user attempt.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VerificationSession {
    /// Status per step id. Exactly one step is `Current` unless the
    /// session is verified.
    pub step_statuses: BTreeMap<String, StepStatus>,
    /// Index of the step whose status is `Current`.
    pub current_step_index: usize,
    pub form_data: FormData,
    /// One record per document type the user has interacted with.
    pub documents: BTreeMap<DocumentType, DocumentRecord>,
    /// True iff the persisted projection (`form_data`,
    /// `current_step_index`) differs from the last successful save.
    pub dirty: bool,
    pub last_saved_at: Option<Timestamp>,
}

impl VerificationSession {
    /// A fresh session: step 0 is `Current`, everything else `Pending`.
    pub fn fresh(definitions: &[StepDefinition]) -> Self {
        let step_statuses = definitions
            .iter()
            .enumerate()
            .map(|(i, def)| {
                let status = if i == 0 {
                    StepStatus::Current
                } else {
                    StepStatus::Pending
                };
                (def.id.clone(), status)
            })
            .collect();

        Self {
            step_statuses,
            current_step_index: 0,
            form_data: FormData::new(),
            documents: BTreeMap::new(),
            dirty: false,
            last_saved_at: None,
        }
    }

    /// A session rehydrated from a restored draft: steps before the saved
    /// index are `Completed`, the saved index is `Current`, the rest are
    /// `Pending`. The caller has already bounds-checked the index.
    pub fn restored(
        definitions: &[StepDefinition],
        form_data: FormData,
        current_step_index: usize,
        saved_at: Timestamp,
    ) -> Self {
        let step_statuses = definitions
            .iter()
            .enumerate()
            .map(|(i, def)| {
                let status = if i < current_step_index {
                    StepStatus::Completed
                } else if i == current_step_index {
                    StepStatus::Current
                } else {
                    StepStatus::Pending
                };
                (def.id.clone(), status)
            })
            .collect();

        Self {
            step_statuses,
            current_step_index,
            form_data,
            documents: BTreeMap::new(),
            dirty: false,
            last_saved_at: Some(saved_at),
        }
    }

    /// Merge submitted values into the form data. Returns whether anything
    /// actually changed.
    pub fn merge_form_data(&mut self, data: FormData) -> bool {
        let mut changed = false;
        for (field_id, value) in data {
            if self.form_data.get(&field_id) != Some(&value) {
                self.form_data.insert(field_id, value);
                changed = true;
            }
        }
        changed
    }

    pub fn status_of(&self, step_id: &str) -> Option<StepStatus> {
        self.step_statuses.get(step_id).copied()
    }

    /// Number of steps that have been completed or verified.
    pub fn completed_count(&self) -> usize {
        self.step_statuses
            .values()
            .filter(|s| s.is_complete())
            .count()
    }

    /// Terminal state: every step complete and the last one verified.
    pub fn is_verified(&self, definitions: &[StepDefinition]) -> bool {
        definitions
            .last()
            .and_then(|def| self.status_of(&def.id))
            .map(|status| status == StepStatus::Verified)
            .unwrap_or(false)
    }
}
