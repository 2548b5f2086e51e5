//! Notes list records and inputs.

use super::{validate_title, ListId, NotesValidationError};
use serde::{Deserialize, Serialize};

/// Notes list visible to its owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotesList {
    pub id: ListId,
    pub title: String,
    pub description: Option<String>,
}

/// Create input for a notes list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewNotesList {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl NewNotesList {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn validate(&self) -> Result<(), NotesValidationError> {
        validate_title(&self.title)
    }
}

/// Partial update for a notes list. `None` leaves the column unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl ListPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none()
    }

    /// Requires at least one present field and a non-blank title when set.
    pub fn validate(&self) -> Result<(), NotesValidationError> {
        if self.is_empty() {
            return Err(NotesValidationError::EmptyPatch);
        }
        if let Some(title) = self.title.as_deref() {
            validate_title(title)?;
        }
        Ok(())
    }
}
