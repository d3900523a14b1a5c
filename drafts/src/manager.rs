//! The debounced, serialized draft writer.

use crate::error::DraftSaveError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use veriflow_store::{
    DraftSnapshot, DraftStore, KEY_AUTOSAVE_TIMESTAMP, KEY_CURRENT_STEP, KEY_FORM_DATA,
    KEY_SUBMISSION_STATUS, SUBMISSION_COMPLETE,
};
use veriflow_types::{StepDefinition, Timestamp, VerificationSession};

/// Notifications about draft persistence, for an "unsaved changes"
/// indicator. Failures are informational — the engine retries on its own.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DraftEvent {
    Saved { at: Timestamp },
    SaveFailed { reason: String },
}

enum Command {
    Schedule,
    Flush(oneshot::Sender<Result<(), DraftSaveError>>),
    Shutdown,
}

/// Debounced/manual persistence of session snapshots.
///
/// `schedule_autosave` resets the debounce timer; when the timer fires
/// uninterrupted, a save happens iff the session is dirty. `save_now`
/// cancels the pending timer and saves immediately. Either way the single
/// writer task performs the write, capturing the session's current
/// projection at write time.
pub struct DraftPersistenceManager {
    tx: mpsc::UnboundedSender<Command>,
}

impl DraftPersistenceManager {
    /// Start the writer task. The returned handle finishes once
    /// [`DraftPersistenceManager::shutdown`] is called or the manager is
    /// dropped.
    pub fn spawn(
        session: Arc<Mutex<VerificationSession>>,
        definitions: Arc<Vec<StepDefinition>>,
        store: Arc<dyn DraftStore>,
        debounce: Duration,
        alive: Arc<AtomicBool>,
        events: mpsc::UnboundedSender<DraftEvent>,
    ) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let writer = Writer {
            session,
            definitions,
            store,
            debounce,
            alive,
            events,
        };
        let handle = tokio::spawn(writer.run(rx));
        (Self { tx }, handle)
    }

    /// Reset the debounce timer. Rapid successive calls coalesce into one
    /// write when the timer finally fires.
    pub fn schedule_autosave(&self) {
        let _ = self.tx.send(Command::Schedule);
    }

    /// Cancel any pending debounce and save immediately.
    ///
    /// Returns the save outcome so the submission path can react; other
    /// callers may ignore it (the session stays dirty and retries). After
    /// teardown this resolves `Ok` without writing.
    pub async fn save_now(&self) -> Result<(), DraftSaveError> {
        let (ack_tx, ack_rx) = oneshot::channel();
        if self.tx.send(Command::Flush(ack_tx)).is_err() {
            return Ok(());
        }
        ack_rx.await.unwrap_or(Ok(()))
    }

    /// Stop the writer task, dropping any pending debounce.
    pub fn shutdown(&self) {
        let _ = self.tx.send(Command::Shutdown);
    }
}

struct Writer {
    session: Arc<Mutex<VerificationSession>>,
    definitions: Arc<Vec<StepDefinition>>,
    store: Arc<dyn DraftStore>,
    debounce: Duration,
    alive: Arc<AtomicBool>,
    events: mpsc::UnboundedSender<DraftEvent>,
}

impl Writer {
    async fn run(self, mut rx: mpsc::UnboundedReceiver<Command>) {
        let mut deadline: Option<Instant> = None;

        loop {
            // `deadline` is Copy; the timer owns its own copy so the select
            // arms below are free to reassign it.
            let timer = async move {
                match deadline {
                    Some(at) => tokio::time::sleep_until(at).await,
                    None => std::future::pending::<()>().await,
                }
            };

            tokio::select! {
                cmd = rx.recv() => match cmd {
                    Some(Command::Schedule) => {
                        deadline = Some(Instant::now() + self.debounce);
                    }
                    Some(Command::Flush(ack)) => {
                        deadline = None;
                        let _ = ack.send(self.save().await);
                    }
                    Some(Command::Shutdown) | None => break,
                },
                _ = timer => {
                    deadline = None;
                    let _ = self.save().await;
                }
            }
        }
    }

    /// Perform one save if the session is dirty. No-op on a clean session
    /// or after teardown.
    async fn save(&self) -> Result<(), DraftSaveError> {
        if !self.alive.load(Ordering::SeqCst) {
            return Ok(());
        }

        let (snapshot, mark_complete) = {
            let session = self.session.lock().expect("session lock poisoned");
            if !session.dirty {
                return Ok(());
            }
            let snapshot = DraftSnapshot {
                form_data: session.form_data.clone(),
                current_step_index: session.current_step_index,
                saved_at: Timestamp::now(),
            };
            (snapshot, session.is_verified(&self.definitions))
        };

        let payload = serde_json::to_string(&snapshot.form_data)
            .map_err(|e| DraftSaveError::Serialize(e.to_string()))?;

        let written: Result<(), veriflow_store::StoreError> = async {
            self.store.put(KEY_FORM_DATA, &payload).await?;
            self.store
                .put(KEY_CURRENT_STEP, &snapshot.current_step_index.to_string())
                .await?;
            self.store
                .put(
                    KEY_AUTOSAVE_TIMESTAMP,
                    &snapshot.saved_at.as_millis().to_string(),
                )
                .await?;
            if mark_complete {
                self.store
                    .put(KEY_SUBMISSION_STATUS, SUBMISSION_COMPLETE)
                    .await?;
            }
            Ok(())
        }
        .await;

        match written {
            Ok(()) => {
                if self.alive.load(Ordering::SeqCst) {
                    let mut session = self.session.lock().expect("session lock poisoned");
                    // Edits racing the write keep the session dirty; only a
                    // still-matching projection is considered persisted.
                    if session.form_data == snapshot.form_data
                        && session.current_step_index == snapshot.current_step_index
                    {
                        session.dirty = false;
                        session.last_saved_at = Some(snapshot.saved_at);
                    }
                }
                tracing::debug!(at = %snapshot.saved_at, "draft saved");
                let _ = self.events.send(DraftEvent::Saved {
                    at: snapshot.saved_at,
                });
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "draft save failed; will retry on next trigger");
                let _ = self.events.send(DraftEvent::SaveFailed {
                    reason: e.to_string(),
                });
                Err(DraftSaveError::Store(e))
            }
        }
    }
}
