//! Fundamental types for the veriflow verification engine.
//!
//! The engine drives a multi-step identity-verification (KYC) flow:
//! steps bundle typed fields and required documents, a session tracks the
//! user's progress through them, and drafts of in-progress form state are
//! persisted between app launches. This crate defines the data model only;
//! the behavior lives in the sibling crates.

pub mod document;
pub mod field;
pub mod params;
pub mod session;
pub mod step;
pub mod time;

pub use document::{DocumentRecord, DocumentType, FileDescriptor, UploadStatus};
pub use field::{CustomRule, FieldDefinition, FieldType, ValidationRules};
pub use params::SessionParams;
pub use session::{FormData, VerificationSession};
pub use step::{StepDefinition, StepStatus};
pub use time::Timestamp;
