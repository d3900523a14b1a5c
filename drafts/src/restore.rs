//! Draft restoration — never fatal.
//!
//! Any missing, unparseable, or out-of-range draft is treated as "no draft
//! available": the caller starts a fresh session. A draft belonging to a
//! finished verification is likewise refused; re-verification starts over.

use veriflow_store::{
    DraftSnapshot, DraftStore, KEY_AUTOSAVE_TIMESTAMP, KEY_CURRENT_STEP, KEY_FORM_DATA,
    KEY_SUBMISSION_STATUS, SUBMISSION_COMPLETE,
};
use veriflow_types::{FormData, Timestamp};

/// Read the persisted draft, if a usable one exists.
///
/// `step_count` bounds-checks the restored step index against the current
/// step definitions — a draft saved under an older flow layout is dropped
/// rather than restored somewhere undefined.
pub async fn restore(store: &dyn DraftStore, step_count: usize) -> Option<DraftSnapshot> {
    let submission_status = match store.get(KEY_SUBMISSION_STATUS).await {
        Ok(status) => status,
        Err(e) => {
            tracing::warn!(error = %e, "draft store unreadable; starting fresh");
            return None;
        }
    };
    if submission_status.as_deref() == Some(SUBMISSION_COMPLETE) {
        tracing::info!("previous verification already complete; starting fresh");
        return None;
    }

    let payload = match store.get(KEY_FORM_DATA).await {
        Ok(Some(payload)) => payload,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(error = %e, "draft store unreadable; starting fresh");
            return None;
        }
    };
    let form_data: FormData = match serde_json::from_str(&payload) {
        Ok(form_data) => form_data,
        Err(e) => {
            tracing::warn!(error = %e, "stored form data is corrupt; starting fresh");
            return None;
        }
    };

    let current_step_index = match store.get(KEY_CURRENT_STEP).await {
        Ok(Some(raw)) => match raw.parse::<usize>() {
            Ok(index) => index,
            Err(_) => {
                tracing::warn!(raw = %raw, "stored step index is corrupt; starting fresh");
                return None;
            }
        },
        // Form data without a step index means a save died halfway through.
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(error = %e, "draft store unreadable; starting fresh");
            return None;
        }
    };
    if current_step_index >= step_count {
        tracing::warn!(
            current_step_index,
            step_count,
            "stored step index is out of bounds; starting fresh"
        );
        return None;
    }

    let saved_at = store
        .get(KEY_AUTOSAVE_TIMESTAMP)
        .await
        .ok()
        .flatten()
        .and_then(|raw| raw.parse::<u64>().ok())
        .map(Timestamp::new)
        .unwrap_or(Timestamp::EPOCH);

    Some(DraftSnapshot {
        form_data,
        current_step_index,
        saved_at,
    })
}
