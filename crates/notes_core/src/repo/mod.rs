//! Ownership-scoped persistence over SQLite.
//!
//! # Responsibility
//! - Define one repository contract per concern (users, lists, items).
//! - Keep join predicates and transactions inside the persistence boundary.
//!
//! # Invariants
//! - Lists are reached only through `users_lists`; items only through
//!   `users_lists` and `lists_items`.
//! - Multi-row creates commit entity and relation rows together or not at all.
//! - Mutations report affected rows; callers decide what zero means.

use crate::db::migrations::latest_version;
use crate::db::{schema_version, DbError};
use crate::model::NotesValidationError;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod item_repo;
pub mod list_repo;
pub mod patch;
pub mod user_repo;

pub use item_repo::{ItemRepository, SqliteItemRepository};
pub use list_repo::{ListRepository, SqliteListRepository};
pub use user_repo::{SqliteUserRepository, UserRepository};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error shared by all stores.
#[derive(Debug)]
pub enum RepoError {
    /// Input rejected before any write.
    Validation(NotesValidationError),
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// `users.handle` already taken.
    DuplicateHandle(String),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Persisted row cannot be converted to a read model.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::DuplicateHandle(handle) => write!(f, "handle already registered: `{handle}`"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "repository requires table `{table}`")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<NotesValidationError> for RepoError {
    fn from(value: NotesValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// One store handle per concern, all borrowing the same connection.
#[derive(Clone, Copy)]
pub struct Repositories<'conn> {
    pub users: SqliteUserRepository<'conn>,
    pub lists: SqliteListRepository<'conn>,
    pub items: SqliteItemRepository<'conn>,
}

impl<'conn> Repositories<'conn> {
    /// Builds every store after checking the connection once.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, ALL_TABLES)?;
        Ok(Self {
            users: SqliteUserRepository::from_ready(conn),
            lists: SqliteListRepository::from_ready(conn),
            items: SqliteItemRepository::from_ready(conn),
        })
    }
}

const ALL_TABLES: &[&str] = &[
    "users",
    "notes_lists",
    "users_lists",
    "notes_items",
    "lists_items",
];

pub(crate) fn ensure_connection_ready(
    conn: &Connection,
    tables: &[&'static str],
) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = schema_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for &table in tables {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
    }
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

pub(crate) fn parse_archived(value: i64) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid archived value `{other}` in notes_items.archived"
        ))),
    }
}
