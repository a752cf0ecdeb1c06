//! Form models
//!
//! Local state of the create/edit screens. Validation is limited to what
//! the console checks before submitting; the server re-validates everything.

pub mod chips;
pub mod document;
pub mod user;

use thiserror::Error;

pub use chips::{ChipRejection, KeywordChip, KeywordChips, ReferenceChips, split_chip_input};
pub use document::DocumentForm;
pub use user::UserForm;

/// A single failed field rule
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error("{0} is not a valid email address")]
    InvalidEmail(&'static str),

    #[error("{field} must be at least {min} characters")]
    TooShort { field: &'static str, min: usize },

    #[error("{0} does not match")]
    Mismatch(&'static str),
}

impl FieldError {
    /// Name of the offending field
    pub fn field(&self) -> &'static str {
        match self {
            FieldError::Required(field)
            | FieldError::InvalidEmail(field)
            | FieldError::Mismatch(field) => field,
            FieldError::TooShort { field, .. } => field,
        }
    }
}

fn require_text(errors: &mut Vec<FieldError>, field: &'static str, value: &str) {
    if value.trim().is_empty() {
        errors.push(FieldError::Required(field));
    }
}

fn required<T>(errors: &mut Vec<FieldError>, field: &'static str, value: Option<T>) -> Option<T> {
    if value.is_none() {
        errors.push(FieldError::Required(field));
    }
    value
}

/// Trimmed text, or `None` when blank
fn optional_text(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}
