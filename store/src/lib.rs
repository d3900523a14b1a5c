//! Abstract draft storage for the verification engine.
//!
//! The engine persists drafts through an opaque, injected key/value store
//! (a mobile host typically backs this with its platform storage; tests
//! use the in-memory nullable). The rest of the codebase depends only on
//! the [`DraftStore`] trait.

pub mod draft;
pub mod error;

pub use draft::{
    DraftSnapshot, DraftStore, KEY_AUTOSAVE_TIMESTAMP, KEY_CURRENT_STEP, KEY_FORM_DATA,
    KEY_SUBMISSION_STATUS, SUBMISSION_COMPLETE,
};
pub use error::StoreError;
