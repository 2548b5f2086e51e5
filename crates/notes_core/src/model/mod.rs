//! Domain records for users, notes lists and notes items.
//!
//! # Responsibility
//! - Define the read models returned by stores and services.
//! - Define create inputs and partial-update patches with their validation.
//!
//! # Invariants
//! - Titles are required and non-blank on creation.
//! - A patch carries at least one present field before it reaches SQL.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod item;
pub mod list;
pub mod user;

/// Backend-assigned identifier of a user row.
pub type UserId = i64;
/// Backend-assigned identifier of a notes list row.
pub type ListId = i64;
/// Backend-assigned identifier of a notes item row.
pub type ItemId = i64;

/// Caller input that fails a precondition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotesValidationError {
    /// Title is missing or blank.
    EmptyTitle,
    /// Patch has no present field.
    EmptyPatch,
    /// A required registration field is blank.
    EmptyField(&'static str),
}

impl Display for NotesValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title must not be blank"),
            Self::EmptyPatch => write!(f, "update input did not provide any value"),
            Self::EmptyField(field) => write!(f, "`{field}` must not be blank"),
        }
    }
}

impl Error for NotesValidationError {}

pub(crate) fn validate_title(title: &str) -> Result<(), NotesValidationError> {
    if title.trim().is_empty() {
        return Err(NotesValidationError::EmptyTitle);
    }
    Ok(())
}
