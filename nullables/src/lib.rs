//! Nullable infrastructure for deterministic testing.
//!
//! The engine's external dependencies (draft store, upload transport) are
//! abstracted behind traits. This crate provides test-friendly
//! implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically (scripted failures, stalls)
//! - Never touch the filesystem or network
//!
//! Usage: inject nullables in place of real implementations in tests.

pub mod store;
pub mod transport;

pub use store::NullDraftStore;
pub use transport::{NullTransport, UploadPlan};
