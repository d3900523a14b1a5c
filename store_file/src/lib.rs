//! JSON-file storage backend for the verification engine.
//!
//! Implements [`DraftStore`] over a single JSON object file. Intended for
//! hosts without a platform key/value store (desktop builds, local
//! development); mobile hosts inject their own backend instead.

pub mod file_store;

pub use file_store::FileStore;

pub use veriflow_store::{DraftStore, StoreError};
