//! Document types — the upload lifecycle state for one required document.

use crate::time::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A document category tag, e.g. `utility_bill` or `passport`.
///
/// The set of types is open — step definitions name the tags they require,
/// and the session keeps one [`DocumentRecord`] per tag.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DocumentType(String);

impl DocumentType {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for DocumentType {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

/// The file a user picked for upload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDescriptor {
    pub file_name: String,
    /// MIME type as reported by the picker, e.g. `image/jpeg`.
    pub mime_type: String,
    pub size_bytes: u64,
    /// Platform-specific locator (content URI, file path, ...). Opaque to
    /// the engine; only the upload transport interprets it.
    pub uri: String,
}

/// Upload lifecycle states.
///
/// Legal transitions: `Idle → Uploading → Success`, `Uploading → Error`,
/// `Error → Uploading` (retry), `Success | Error → Idle` (remove).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadStatus {
    Idle,
    Uploading,
    Success,
    Error,
}

/// Upload state for one document type within a session.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub document_type: DocumentType,
    pub upload_status: UploadStatus,
    /// Monotonically non-decreasing 0..=100 while uploading; frozen at its
    /// last value on failure.
    pub progress: u8,
    /// Transport failure message, set only in [`UploadStatus::Error`].
    pub error: Option<String>,
    pub uploaded_at: Option<Timestamp>,
    /// The accepted file, kept so a retry reuses the original descriptor.
    pub descriptor: Option<FileDescriptor>,
}

impl DocumentRecord {
    /// A fresh record in the `Idle` state.
    pub fn new(document_type: DocumentType) -> Self {
        Self {
            document_type,
            upload_status: UploadStatus::Idle,
            progress: 0,
            error: None,
            uploaded_at: None,
            descriptor: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.upload_status == UploadStatus::Success
    }
}
