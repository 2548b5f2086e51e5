//! Use-case services over the stores.
//!
//! # Responsibility
//! - Validate caller input before delegating to repositories.
//! - Enforce cross-entity invariants (items only under owned lists).
//! - Translate store outcomes into the caller-facing error taxonomy.
//!
//! # Invariants
//! - Missing rows and zero-row mutations surface as `*NotFound`.
//! - Login failures never reveal whether the handle exists.

use crate::auth::{CredentialError, CredentialHasher, TokenError, TokenSigner};
use crate::model::{ItemId, ListId, NotesValidationError};
use crate::repo::{
    RepoError, Repositories, SqliteItemRepository, SqliteListRepository, SqliteUserRepository,
};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

pub mod auth_service;
pub mod item_service;
pub mod list_service;

pub use auth_service::AuthService;
pub use item_service::ItemService;
pub use list_service::ListService;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Caller-facing error for every service operation.
#[derive(Debug)]
pub enum ServiceError {
    /// Input failed a precondition; nothing was written.
    Validation(NotesValidationError),
    /// List missing or not owned by the caller.
    ListNotFound(ListId),
    /// Item missing or not reachable by the caller.
    ItemNotFound(ItemId),
    /// Registration handle already taken.
    DuplicateHandle(String),
    /// Unknown handle or wrong password.
    InvalidCredentials,
    /// Token rejected or could not be issued.
    Token(TokenError),
    /// Credential hashing backend failure.
    Credential(CredentialError),
    /// Lower-level persistence failure.
    Persistence(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "validation failed: {err}"),
            Self::ListNotFound(id) => write!(f, "notes list not found: {id}"),
            Self::ItemNotFound(id) => write!(f, "notes item not found: {id}"),
            Self::DuplicateHandle(handle) => write!(f, "handle already registered: `{handle}`"),
            Self::InvalidCredentials => write!(f, "invalid handle or password"),
            Self::Token(err) => write!(f, "{err}"),
            Self::Credential(err) => write!(f, "{err}"),
            Self::Persistence(err) => write!(f, "persistence failure: {err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Token(err) => Some(err),
            Self::Credential(err) => Some(err),
            Self::Persistence(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::DuplicateHandle(handle) => Self::DuplicateHandle(handle),
            other => Self::Persistence(other),
        }
    }
}

impl From<NotesValidationError> for ServiceError {
    fn from(value: NotesValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<TokenError> for ServiceError {
    fn from(value: TokenError) -> Self {
        Self::Token(value)
    }
}

impl From<CredentialError> for ServiceError {
    fn from(value: CredentialError) -> Self {
        Self::Credential(value)
    }
}

/// All services wired over one set of repositories.
///
/// Built once at process start and handed to the request layer by reference.
pub struct Services<'conn, H: CredentialHasher> {
    pub auth: AuthService<SqliteUserRepository<'conn>, H>,
    pub lists: ListService<SqliteListRepository<'conn>>,
    pub items: ItemService<SqliteItemRepository<'conn>, SqliteListRepository<'conn>>,
}

impl<'conn, H: CredentialHasher> Services<'conn, H> {
    pub fn new(
        repos: Repositories<'conn>,
        hasher: H,
        signer: TokenSigner,
        token_ttl: Duration,
    ) -> Self {
        Self {
            auth: AuthService::new(repos.users, hasher, signer, token_ttl),
            lists: ListService::new(repos.lists),
            items: ItemService::new(repos.items, repos.lists),
        }
    }
}
