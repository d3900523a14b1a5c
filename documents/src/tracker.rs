//! The per-document upload state machine.

use crate::error::UploadError;
use crate::transport::{TransportError, UploadTransport};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use veriflow_types::{
    DocumentRecord, DocumentType, FileDescriptor, SessionParams, Timestamp, UploadStatus,
    VerificationSession,
};

/// Notifications for the UI layer. A document reaching `Uploaded` may
/// unblock a step, whose validity the UI should re-query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DocumentEvent {
    Progress {
        document_type: DocumentType,
        percent: u8,
    },
    Uploaded {
        document_type: DocumentType,
        at: Timestamp,
    },
    Failed {
        document_type: DocumentType,
        reason: String,
    },
}

/// Drives document uploads and owns their lifecycle transitions.
///
/// The records themselves live in the session's `documents` map; the
/// tracker is the only writer. One task per document type; a liveness
/// flag shared with the session controller gates every mutation so
/// results arriving after teardown are dropped, not applied.
pub struct DocumentUploadTracker {
    transport: Arc<dyn UploadTransport>,
    session: Arc<Mutex<VerificationSession>>,
    params: SessionParams,
    alive: Arc<AtomicBool>,
    events: mpsc::UnboundedSender<DocumentEvent>,
    tasks: Arc<Mutex<HashMap<DocumentType, JoinHandle<()>>>>,
}

impl DocumentUploadTracker {
    pub fn new(
        transport: Arc<dyn UploadTransport>,
        session: Arc<Mutex<VerificationSession>>,
        params: SessionParams,
        alive: Arc<AtomicBool>,
        events: mpsc::UnboundedSender<DocumentEvent>,
    ) -> Self {
        Self {
            transport,
            session,
            params,
            alive,
            events,
            tasks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Accept a picked file and start uploading it.
    ///
    /// Rejected files (too large, MIME not allow-listed) cause no state
    /// transition at all: the record stays wherever it was. Only legal
    /// when the document has no active or finished upload.
    pub fn select_file(
        &self,
        document_type: DocumentType,
        descriptor: FileDescriptor,
    ) -> Result<(), UploadError> {
        if descriptor.size_bytes > self.params.max_document_bytes {
            return Err(UploadError::FileTooLarge {
                size_bytes: descriptor.size_bytes,
                max_bytes: self.params.max_document_bytes,
            });
        }
        if !self.params.accepts_mime(&descriptor.mime_type) {
            return Err(UploadError::UnsupportedMimeType(descriptor.mime_type));
        }

        {
            let mut session = self.session.lock().expect("session lock poisoned");
            let record = session
                .documents
                .entry(document_type.clone())
                .or_insert_with(|| DocumentRecord::new(document_type.clone()));

            match record.upload_status {
                UploadStatus::Idle => {}
                UploadStatus::Uploading => {
                    return Err(UploadError::UploadInProgress(document_type));
                }
                status => {
                    return Err(UploadError::SelectNotAllowed {
                        document_type,
                        status,
                    });
                }
            }

            record.upload_status = UploadStatus::Uploading;
            record.progress = 0;
            record.error = None;
            record.uploaded_at = None;
            record.descriptor = Some(descriptor.clone());
        }

        tracing::debug!(document = %document_type, file = %descriptor.file_name, "starting upload");
        self.spawn_upload(document_type, descriptor);
        Ok(())
    }

    /// Restart a failed upload with the original file descriptor.
    pub fn retry(&self, document_type: DocumentType) -> Result<(), UploadError> {
        let descriptor = {
            let mut session = self.session.lock().expect("session lock poisoned");
            let record = session
                .documents
                .get_mut(&document_type)
                .ok_or_else(|| UploadError::UnknownDocument(document_type.clone()))?;

            if record.upload_status != UploadStatus::Error {
                return Err(UploadError::RetryNotAllowed {
                    document_type: document_type.clone(),
                    status: record.upload_status,
                });
            }
            let Some(descriptor) = record.descriptor.clone() else {
                return Err(UploadError::UnknownDocument(document_type.clone()));
            };

            record.upload_status = UploadStatus::Uploading;
            record.progress = 0;
            record.error = None;
            descriptor
        };

        tracing::debug!(document = %document_type, "retrying upload");
        self.spawn_upload(document_type, descriptor);
        Ok(())
    }

    /// Clear a finished (success or error) upload back to `Idle` so a new
    /// file can be selected.
    pub fn remove(&self, document_type: DocumentType) -> Result<(), UploadError> {
        let mut session = self.session.lock().expect("session lock poisoned");
        let record = session
            .documents
            .get_mut(&document_type)
            .ok_or_else(|| UploadError::UnknownDocument(document_type.clone()))?;

        match record.upload_status {
            UploadStatus::Success | UploadStatus::Error => {
                *record = DocumentRecord::new(document_type);
                Ok(())
            }
            status => Err(UploadError::RemoveNotAllowed {
                document_type,
                status,
            }),
        }
    }

    /// Abort every running upload task. Called on session teardown, after
    /// the liveness flag has been flipped.
    pub fn abort_all(&self) {
        let mut tasks = self.tasks.lock().expect("tasks lock poisoned");
        for (document_type, task) in tasks.drain() {
            tracing::debug!(document = %document_type, "aborting upload task");
            task.abort();
        }
    }

    fn spawn_upload(&self, document_type: DocumentType, descriptor: FileDescriptor) {
        let transport = Arc::clone(&self.transport);
        let session = Arc::clone(&self.session);
        let alive = Arc::clone(&self.alive);
        let events = self.events.clone();
        let tasks = Arc::clone(&self.tasks);
        let ty = document_type.clone();

        let handle = tokio::spawn(async move {
            run_upload(transport, &session, &alive, &events, &ty, descriptor).await;
            tasks.lock().expect("tasks lock poisoned").remove(&ty);
        });

        self.tasks
            .lock()
            .expect("tasks lock poisoned")
            .insert(document_type, handle);
    }
}

async fn run_upload(
    transport: Arc<dyn UploadTransport>,
    session: &Mutex<VerificationSession>,
    alive: &AtomicBool,
    events: &mpsc::UnboundedSender<DocumentEvent>,
    document_type: &DocumentType,
    descriptor: FileDescriptor,
) {
    let (progress_tx, mut progress_rx) = mpsc::unbounded_channel();
    let mut upload = transport.upload(&descriptor, progress_tx);
    let mut progress_open = true;

    loop {
        tokio::select! {
            event = progress_rx.recv(), if progress_open => match event {
                Some(percent) => {
                    if apply_progress(session, alive, events, document_type, percent) {
                        return;
                    }
                }
                None => progress_open = false,
            },
            result = &mut upload => {
                finish_upload(session, alive, events, document_type, result);
                return;
            }
        }
    }
}

/// Apply one progress event. Returns true once the upload is finalized
/// (progress reached 100) or the session is gone.
fn apply_progress(
    session: &Mutex<VerificationSession>,
    alive: &AtomicBool,
    events: &mpsc::UnboundedSender<DocumentEvent>,
    document_type: &DocumentType,
    percent: u8,
) -> bool {
    if !alive.load(Ordering::SeqCst) {
        return true;
    }

    let mut session = session.lock().expect("session lock poisoned");
    let Some(record) = session.documents.get_mut(document_type) else {
        return true;
    };
    if record.upload_status != UploadStatus::Uploading {
        return true;
    }

    // Progress never regresses; a stale event is clamped to the high-water mark.
    let clamped = percent.min(100).max(record.progress);
    record.progress = clamped;

    if clamped == 100 {
        let at = Timestamp::now();
        record.upload_status = UploadStatus::Success;
        record.error = None;
        record.uploaded_at = Some(at);
        drop(session);
        let _ = events.send(DocumentEvent::Uploaded {
            document_type: document_type.clone(),
            at,
        });
        return true;
    }

    drop(session);
    let _ = events.send(DocumentEvent::Progress {
        document_type: document_type.clone(),
        percent: clamped,
    });
    false
}

fn finish_upload(
    session: &Mutex<VerificationSession>,
    alive: &AtomicBool,
    events: &mpsc::UnboundedSender<DocumentEvent>,
    document_type: &DocumentType,
    result: Result<(), TransportError>,
) {
    if !alive.load(Ordering::SeqCst) {
        return;
    }

    let mut session = session.lock().expect("session lock poisoned");
    let Some(record) = session.documents.get_mut(document_type) else {
        return;
    };
    // Progress 100 already finalized this record; a late transport result
    // (including an error) no longer changes it.
    if record.upload_status != UploadStatus::Uploading {
        return;
    }

    match result {
        Ok(()) => {
            let at = Timestamp::now();
            record.upload_status = UploadStatus::Success;
            record.progress = 100;
            record.error = None;
            record.uploaded_at = Some(at);
            drop(session);
            let _ = events.send(DocumentEvent::Uploaded {
                document_type: document_type.clone(),
                at,
            });
        }
        Err(TransportError(reason)) => {
            record.upload_status = UploadStatus::Error;
            record.error = Some(reason.clone());
            drop(session);
            tracing::debug!(document = %document_type, %reason, "upload failed");
            let _ = events.send(DocumentEvent::Failed {
                document_type: document_type.clone(),
                reason,
            });
        }
    }
}
