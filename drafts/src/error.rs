use thiserror::Error;
use veriflow_store::StoreError;

#[derive(Debug, Error)]
pub enum DraftSaveError {
    #[error("draft store write failed: {0}")]
    Store(#[from] StoreError),

    #[error("could not serialize form data: {0}")]
    Serialize(String),
}
