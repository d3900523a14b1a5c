//! Engine parameters — the tunable values of the verification flow.
//!
//! Every field has a serde default so hosts can configure only what they
//! care about (typically from a TOML file, see the session crate).

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tunable parameters for one verification session.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionParams {
    /// Quiet period after the last edit before an autosave fires (ms).
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Maximum accepted document size in bytes.
    #[serde(default = "default_max_document_bytes")]
    pub max_document_bytes: u64,

    /// MIME types accepted for document upload.
    #[serde(default = "default_allowed_mime_types")]
    pub allowed_mime_types: Vec<String>,

    /// Completed-step counts at which verification levels 1..=N unlock.
    /// Ascending; crossing `level_thresholds[i]` grants level `i + 1`.
    /// The deployed flows disagree on the table, so it is configuration,
    /// not a constant.
    #[serde(default = "default_level_thresholds")]
    pub level_thresholds: Vec<u32>,
}

impl SessionParams {
    /// The debounce delay as a [`Duration`].
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Whether a MIME type is on the allow list.
    pub fn accepts_mime(&self, mime: &str) -> bool {
        self.allowed_mime_types.iter().any(|m| m == mime)
    }
}

impl Default for SessionParams {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            max_document_bytes: default_max_document_bytes(),
            allowed_mime_types: default_allowed_mime_types(),
            level_thresholds: default_level_thresholds(),
        }
    }
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_debounce_ms() -> u64 {
    1_500
}

fn default_max_document_bytes() -> u64 {
    5 * 1024 * 1024
}

fn default_allowed_mime_types() -> Vec<String> {
    vec![
        "image/jpeg".to_string(),
        "image/png".to_string(),
        "application/pdf".to_string(),
    ]
}

fn default_level_thresholds() -> Vec<u32> {
    vec![2, 4, 5]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let params = SessionParams::default();
        assert_eq!(params.debounce(), Duration::from_millis(1_500));
        assert_eq!(params.max_document_bytes, 5 * 1024 * 1024);
        assert!(params.accepts_mime("image/png"));
        assert!(!params.accepts_mime("application/zip"));
        assert_eq!(params.level_thresholds, vec![2, 4, 5]);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let params: SessionParams = serde_json::from_str(r#"{"debounce_ms": 200}"#).unwrap();
        assert_eq!(params.debounce_ms, 200);
        assert_eq!(params.level_thresholds, vec![2, 4, 5]);
    }
}
