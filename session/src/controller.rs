//! The session controller — orchestrates validation, sequencing,
//! documents and drafts behind one object.

use crate::config::SessionConfig;
use crate::error::SessionError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use veriflow_documents::{DocumentEvent, DocumentUploadTracker, UploadTransport};
use veriflow_drafts::{restore, DraftEvent, DraftPersistenceManager};
use veriflow_sequencer::{CompletionOutcome, StepSequencer};
use veriflow_store::DraftStore;
use veriflow_types::{
    DocumentRecord, DocumentType, FileDescriptor, FormData, StepDefinition, StepStatus, Timestamp,
    VerificationSession,
};
use veriflow_validation::{StepValidator, ValidationErrors};

/// Clears the submission-in-flight flag when the submission finishes,
/// whichever way it finishes.
struct SubmitGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> SubmitGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, SessionError> {
        if flag
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(SessionError::SubmissionInFlight);
        }
        Ok(Self { flag })
    }
}

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// The sole object the UI layer talks to.
///
/// Owns the mutable [`VerificationSession`]; every mutation flows through
/// here. The UI is a read-only subscriber: it reads accessors and listens
/// on the event receivers.
pub struct VerificationSessionController {
    session: Arc<Mutex<VerificationSession>>,
    definitions: Arc<Vec<StepDefinition>>,
    sequencer: StepSequencer,
    validator: StepValidator,
    documents: DocumentUploadTracker,
    drafts: DraftPersistenceManager,
    alive: Arc<AtomicBool>,
    submitting: AtomicBool,
    document_events: Mutex<Option<mpsc::UnboundedReceiver<DocumentEvent>>>,
    draft_events: Mutex<Option<mpsc::UnboundedReceiver<DraftEvent>>>,
}

impl VerificationSessionController {
    /// Restore the session from a persisted draft, or start fresh when no
    /// usable draft exists. Restoration failures are never fatal.
    pub async fn restore_or_init(
        config: SessionConfig,
        store: Arc<dyn DraftStore>,
        transport: Arc<dyn UploadTransport>,
    ) -> Self {
        let definitions = Arc::new(config.steps);
        let params = config.params;

        let state = match restore(store.as_ref(), definitions.len()).await {
            Some(snapshot) => {
                tracing::info!(
                    step = snapshot.current_step_index,
                    fields = snapshot.form_data.len(),
                    "restored draft session"
                );
                VerificationSession::restored(
                    &definitions,
                    snapshot.form_data,
                    snapshot.current_step_index,
                    snapshot.saved_at,
                )
            }
            None => {
                tracing::info!("starting fresh verification session");
                VerificationSession::fresh(&definitions)
            }
        };

        let session = Arc::new(Mutex::new(state));
        let alive = Arc::new(AtomicBool::new(true));
        let (document_tx, document_rx) = mpsc::unbounded_channel();
        let (draft_tx, draft_rx) = mpsc::unbounded_channel();

        let documents = DocumentUploadTracker::new(
            transport,
            Arc::clone(&session),
            params.clone(),
            Arc::clone(&alive),
            document_tx,
        );
        let (drafts, _writer) = DraftPersistenceManager::spawn(
            Arc::clone(&session),
            Arc::clone(&definitions),
            store,
            params.debounce(),
            Arc::clone(&alive),
            draft_tx,
        );
        let sequencer = StepSequencer::new(Arc::clone(&definitions), params.level_thresholds);

        Self {
            session,
            definitions,
            sequencer,
            validator: StepValidator,
            documents,
            drafts,
            alive,
            submitting: AtomicBool::new(false),
            document_events: Mutex::new(Some(document_rx)),
            draft_events: Mutex::new(Some(draft_rx)),
        }
    }

    /// Submit the current step: merge `data`, validate, advance, persist.
    ///
    /// Atomic with respect to step state: a validation failure returns the
    /// error map untouched; a persistence failure rolls the advance back.
    /// Only one submission can be in flight at a time.
    pub async fn submit_step(&self, data: FormData) -> Result<CompletionOutcome, SessionError> {
        let _guard = SubmitGuard::acquire(&self.submitting)?;

        let (saved_statuses, saved_index, outcome) = {
            let mut session = self.session.lock().expect("session lock poisoned");
            if session.is_verified(&self.definitions) {
                return Err(SessionError::AlreadyVerified);
            }
            if session.merge_form_data(data) {
                session.dirty = true;
            }

            let step = &self.definitions[session.current_step_index];
            let errors =
                self.validator
                    .validate_step(step, &session.form_data, &session.documents);
            if !errors.is_empty() {
                return Err(SessionError::Validation(errors));
            }

            let saved_statuses = session.step_statuses.clone();
            let saved_index = session.current_step_index;
            let outcome = self.sequencer.mark_completed(&mut session)?;
            // The persisted projection changed with the advance.
            session.dirty = true;
            (saved_statuses, saved_index, outcome)
        };

        match self.drafts.save_now().await {
            Ok(()) => {
                tracing::info!(
                    step = %outcome.step_id,
                    level = outcome.level,
                    verified = outcome.session_verified,
                    "step completed"
                );
                Ok(outcome)
            }
            Err(e) => {
                if self.alive.load(Ordering::SeqCst) {
                    let mut session = self.session.lock().expect("session lock poisoned");
                    session.step_statuses = saved_statuses;
                    session.current_step_index = saved_index;
                    session.dirty = true;
                }
                Err(SessionError::Submission(e))
            }
        }
    }

    /// Merge edits into the draft and schedule a debounced autosave.
    /// Rapid successive calls coalesce into one write.
    pub fn save_draft(&self, data: FormData) {
        if !self.alive.load(Ordering::SeqCst) {
            return;
        }
        {
            let mut session = self.session.lock().expect("session lock poisoned");
            if session.is_verified(&self.definitions) {
                return;
            }
            if session.merge_form_data(data) {
                session.dirty = true;
            }
        }
        self.drafts.schedule_autosave();
    }

    /// Navigate to another step. Illegal jumps are rejected without any
    /// state mutation.
    pub fn go_to(&self, index: usize) -> Result<(), SessionError> {
        let moved = {
            let mut session = self.session.lock().expect("session lock poisoned");
            let from = session.current_step_index;
            self.sequencer.go_to(&mut session, index)?;
            if session.current_step_index != from {
                session.dirty = true;
                true
            } else {
                false
            }
        };
        if moved {
            self.drafts.schedule_autosave();
        }
        Ok(())
    }

    /// Start uploading a picked file for a document type.
    pub fn upload_document(
        &self,
        document_type: DocumentType,
        descriptor: FileDescriptor,
    ) -> Result<(), SessionError> {
        Ok(self.documents.select_file(document_type, descriptor)?)
    }

    /// Retry a failed upload with its original file.
    pub fn retry_upload(&self, document_type: DocumentType) -> Result<(), SessionError> {
        Ok(self.documents.retry(document_type)?)
    }

    /// Clear a finished upload so a new file can be selected.
    pub fn remove_document(&self, document_type: DocumentType) -> Result<(), SessionError> {
        Ok(self.documents.remove(document_type)?)
    }

    /// Everything still wrong with the current step. The UI re-queries
    /// this after a document upload lands.
    pub fn validate_current_step(&self) -> ValidationErrors {
        let session = self.session.lock().expect("session lock poisoned");
        let step = &self.definitions[session.current_step_index];
        self.validator
            .validate_step(step, &session.form_data, &session.documents)
    }

    /// Tear the session down: pending timers are cleared and any late
    /// save/upload completions are dropped instead of mutating a disposed
    /// session.
    pub fn shutdown(&self) {
        tracing::info!("verification session shutting down");
        self.alive.store(false, Ordering::SeqCst);
        self.drafts.shutdown();
        self.documents.abort_all();
    }

    // ── Read accessors ─────────────────────────────────────────────────

    pub fn current_step_index(&self) -> usize {
        self.session
            .lock()
            .expect("session lock poisoned")
            .current_step_index
    }

    pub fn current_step_id(&self) -> String {
        let index = self.current_step_index();
        self.definitions[index].id.clone()
    }

    pub fn step_status(&self, step_id: &str) -> Option<StepStatus> {
        self.session
            .lock()
            .expect("session lock poisoned")
            .status_of(step_id)
    }

    pub fn form_value(&self, field_id: &str) -> Option<String> {
        self.session
            .lock()
            .expect("session lock poisoned")
            .form_data
            .get(field_id)
            .cloned()
    }

    pub fn document(&self, document_type: &DocumentType) -> Option<DocumentRecord> {
        self.session
            .lock()
            .expect("session lock poisoned")
            .documents
            .get(document_type)
            .cloned()
    }

    /// The verification level unlocked so far.
    pub fn derived_level(&self) -> u8 {
        let completed = self
            .session
            .lock()
            .expect("session lock poisoned")
            .completed_count();
        self.sequencer.derived_level(completed)
    }

    pub fn is_verified(&self) -> bool {
        self.session
            .lock()
            .expect("session lock poisoned")
            .is_verified(&self.definitions)
    }

    /// Whether there are changes not yet persisted (for an "unsaved
    /// changes" indicator).
    pub fn is_dirty(&self) -> bool {
        self.session.lock().expect("session lock poisoned").dirty
    }

    pub fn last_saved_at(&self) -> Option<Timestamp> {
        self.session
            .lock()
            .expect("session lock poisoned")
            .last_saved_at
    }

    pub fn step_count(&self) -> usize {
        self.definitions.len()
    }

    /// Take the document event receiver. Yields `None` after the first
    /// call — there is one subscriber.
    pub fn document_events(&self) -> Option<mpsc::UnboundedReceiver<DocumentEvent>> {
        self.document_events
            .lock()
            .expect("events lock poisoned")
            .take()
    }

    /// Take the draft event receiver. Yields `None` after the first call.
    pub fn draft_events(&self) -> Option<mpsc::UnboundedReceiver<DraftEvent>> {
        self.draft_events
            .lock()
            .expect("events lock poisoned")
            .take()
    }
}
