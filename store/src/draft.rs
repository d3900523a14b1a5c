//! The draft store trait and the snapshot it persists.

use crate::StoreError;
use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};
use veriflow_types::{FormData, Timestamp};

/// Store key holding the serialized form data (JSON object).
pub const KEY_FORM_DATA: &str = "verification_data";
/// Store key holding the current step index (integer as string).
pub const KEY_CURRENT_STEP: &str = "current_step";
/// Store key holding the last save time (epoch milliseconds as string).
pub const KEY_AUTOSAVE_TIMESTAMP: &str = "autosave_timestamp";
/// Store key marking a finished verification.
pub const KEY_SUBMISSION_STATUS: &str = "submission_status";
/// Value written under [`KEY_SUBMISSION_STATUS`] once the terminal step is
/// verified.
pub const SUBMISSION_COMPLETE: &str = "complete";

/// The sole unit persisted to the external store.
///
/// Spread across [`KEY_FORM_DATA`], [`KEY_CURRENT_STEP`] and
/// [`KEY_AUTOSAVE_TIMESTAMP`] on write; reassembled on restore.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftSnapshot {
    pub form_data: FormData,
    pub current_step_index: usize,
    pub saved_at: Timestamp,
}

/// An opaque, asynchronous key/value store for draft state.
///
/// Injected by the host; the engine never assumes anything about the
/// backend beyond these two operations. Implementations must be safe to
/// call from the engine's background tasks.
pub trait DraftStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> BoxFuture<'_, Result<Option<String>, StoreError>>;

    /// Store `value` under `key`, replacing any previous value.
    fn put<'a>(&'a self, key: &'a str, value: &'a str) -> BoxFuture<'a, Result<(), StoreError>>;
}
