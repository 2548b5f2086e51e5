//! User credential records.

use super::{NotesValidationError, UserId};
use serde::{Deserialize, Serialize};

/// Persisted user row.
///
/// `password_digest` is whatever the configured credential hasher produced;
/// it is never serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub handle: String,
    #[serde(skip_serializing, default)]
    pub password_digest: String,
}

/// Insert payload for the user store. The digest is already hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub handle: String,
    pub password_digest: String,
}

/// Registration input as received from the caller.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SignUp {
    pub name: String,
    pub handle: String,
    pub password: String,
}

impl SignUp {
    pub fn new(
        name: impl Into<String>,
        handle: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            handle: handle.into(),
            password: password.into(),
        }
    }

    /// Rejects blank name, handle or password.
    pub fn validate(&self) -> Result<(), NotesValidationError> {
        for (field, value) in [
            ("name", self.name.as_str()),
            ("handle", self.handle.as_str()),
            ("password", self.password.as_str()),
        ] {
            if value.trim().is_empty() {
                return Err(NotesValidationError::EmptyField(field));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::SignUp;
    use crate::model::NotesValidationError;

    #[test]
    fn sign_up_rejects_blank_fields_in_declaration_order() {
        let err = SignUp::new("Ada", "  ", "").validate().unwrap_err();
        assert_eq!(err, NotesValidationError::EmptyField("handle"));
    }

    #[test]
    fn user_serialization_omits_digest() {
        let user = super::User {
            id: 1,
            name: "Ada".to_string(),
            handle: "ada".to_string(),
            password_digest: "secret-digest".to_string(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret-digest"));
    }
}
