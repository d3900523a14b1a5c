//! Draft persistence — debounced autosave, immediate save, restore.
//!
//! All store writes flow through one background writer task, so writes are
//! serialized by construction and the snapshot written is always captured
//! from the live session at write time: the last request's data is what
//! lands, never a stale overwrite. Save failures are absorbed (the session
//! stays dirty and the next trigger retries); restore failures fall back to
//! a fresh session.

pub mod error;
pub mod manager;
pub mod restore;

pub use error::DraftSaveError;
pub use manager::{DraftEvent, DraftPersistenceManager};
pub use restore::restore;
