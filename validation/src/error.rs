use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single validation failure for a field or required document.
///
/// These are recoverable values rendered inline by the UI, not faults;
/// nothing here is ever logged as an error.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Error)]
#[serde(rename_all = "snake_case", tag = "code", content = "detail")]
pub enum ValidationError {
    #[error("this field is required")]
    Required,

    #[error("invalid format")]
    InvalidFormat,

    #[error("must be at least {0} characters")]
    TooShort(usize),

    #[error("must be at most {0} characters")]
    TooLong(usize),

    #[error("must be a number")]
    NotANumber,

    #[error("must be at least {0}")]
    BelowMinimum(f64),

    #[error("must be at most {0}")]
    AboveMaximum(f64),

    #[error("{0}")]
    Custom(String),

    #[error("document is required")]
    MissingDocument,

    #[error("document upload is not complete")]
    DocumentNotReady,
}
