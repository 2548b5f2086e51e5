//! Notes item records and inputs.

use super::{validate_title, ItemId, NotesValidationError};
use serde::{Deserialize, Serialize};

/// Notes item reachable through its parent list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotesItem {
    pub id: ItemId,
    pub title: String,
    pub description: Option<String>,
    pub archived: bool,
}

/// Create input for a notes item. `archived` defaults to `false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewNotesItem {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub archived: bool,
}

impl NewNotesItem {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            archived: false,
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

/// Partial update for a notes item. `None` leaves the column unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub archived: Option<bool>,
}

impl ItemPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.archived.is_none()
    }

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
