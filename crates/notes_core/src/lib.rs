//! Core of the multi-tenant notes backend.
//! Owns persistence, ownership scoping and token auth; the request layer only
//! calls into `Services`.

pub mod auth;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use auth::{
    Argon2Hasher, CredentialError, CredentialHasher, SaltedDigestHasher, TokenClaims, TokenError,
    TokenSigner,
};
pub use crate::config::{HasherKind, Settings};
pub use db::{open_db, open_db_in_memory, DbError};
pub use logging::{default_log_level, init_logging, init_logging_from, logging_status};
pub use model::item::{ItemPatch, NewNotesItem, NotesItem};
pub use model::list::{ListPatch, NewNotesList, NotesList};
pub use model::user::{SignUp, User};
pub use model::{ItemId, ListId, NotesValidationError, UserId};
pub use repo::{RepoError, RepoResult, Repositories};
pub use service::{ServiceError, ServiceResult, Services};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
