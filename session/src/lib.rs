//! The verification session controller — the engine's public API.
//!
//! The UI layer talks to [`VerificationSessionController`] and nothing
//! else: it submits field edits, asks to advance, starts document uploads,
//! and reads session state back. The controller owns the mutable
//! [`veriflow_types::VerificationSession`] and composes the sequencer,
//! validators, upload tracker and draft persistence behind one object.
//!
//! All I/O dependencies (draft store, upload transport) are injected, so
//! the whole engine runs against in-memory fakes in tests.

pub mod config;
pub mod controller;
pub mod error;
pub mod logging;

pub use config::{ConfigError, SessionConfig};
pub use controller::VerificationSessionController;
pub use error::SessionError;
pub use logging::{init_logging, LogFormat};

pub use veriflow_documents::DocumentEvent;
pub use veriflow_drafts::DraftEvent;
pub use veriflow_sequencer::CompletionOutcome;
pub use veriflow_validation::ValidationErrors;
