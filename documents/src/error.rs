use thiserror::Error;
use veriflow_types::{DocumentType, UploadStatus};

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("file is too large: {size_bytes} bytes, limit is {max_bytes}")]
    FileTooLarge { size_bytes: u64, max_bytes: u64 },

    #[error("file type {0} is not accepted")]
    UnsupportedMimeType(String),

    #[error("an upload for {0} is already in progress")]
    UploadInProgress(DocumentType),

    #[error("{document_type} already has an upload ({status:?}); remove it first")]
    SelectNotAllowed {
        document_type: DocumentType,
        status: UploadStatus,
    },

    #[error("retry is only legal from the error state; {document_type} is {status:?}")]
    RetryNotAllowed {
        document_type: DocumentType,
        status: UploadStatus,
    },

    #[error("remove is only legal after success or error; {document_type} is {status:?}")]
    RemoveNotAllowed {
        document_type: DocumentType,
        status: UploadStatus,
    },

    #[error("no upload record for {0}")]
    UnknownDocument(DocumentType),
}
