//! Field and step validation.
//!
//! Two deliberately different shapes:
//! - [`field::validate`] stops at the **first** failing rule — inline
//!   feedback wants one message per field.
//! - [`StepValidator`] always checks **everything** — step-level feedback
//!   must show the user all remaining problems in one pass.

pub mod error;
pub mod field;
pub mod step;

pub use error::ValidationError;
pub use step::{StepValidator, ValidationErrors};
