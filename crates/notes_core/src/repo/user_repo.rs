//! User credential store.
//!
//! # Invariants
//! - `handle` is unique; a conflicting insert surfaces as
//!   `RepoError::DuplicateHandle`, never as a raw constraint error.

use super::{ensure_connection_ready, RepoError, RepoResult};
use crate::model::user::{NewUser, User};
use crate::model::UserId;
use log::{debug, warn};
use rusqlite::{params, Connection, OptionalExtension, Row};

const USER_SELECT_SQL: &str = "SELECT id, name, handle, password_digest FROM users";

/// Repository interface for user rows.
pub trait UserRepository {
    /// Inserts one user and returns its id.
    fn create_user(&self, user: &NewUser) -> RepoResult<UserId>;
    /// Loads a user by login handle.
    fn find_by_handle(&self, handle: &str) -> RepoResult<Option<User>>;
    /// Loads a user by id.
    fn get_user(&self, id: UserId) -> RepoResult<Option<User>>;
}

/// SQLite-backed user store.
#[derive(Clone, Copy)]
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    /// Creates the store from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["users"])?;
        Ok(Self::from_ready(conn))
    }

    pub(crate) fn from_ready(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn create_user(&self, user: &NewUser) -> RepoResult<UserId> {
        let inserted = self.conn.execute(
            "INSERT INTO users (name, handle, password_digest) VALUES (?1, ?2, ?3);",
            params![
                user.name.as_str(),
                user.handle.as_str(),
                user.password_digest.as_str()
            ],
        );

        match inserted.map_err(RepoError::from) {
            Ok(_) => {
                let id = self.conn.last_insert_rowid();
                debug!("event=user_create module=repo status=ok user_id={id}");
                Ok(id)
            }
            Err(RepoError::Db(err)) if err.is_unique_violation() => {
                warn!("event=user_create module=repo status=error error_code=duplicate_handle");
                Err(RepoError::DuplicateHandle(user.handle.clone()))
            }
            Err(err) => Err(err),
        }
    }

    fn find_by_handle(&self, handle: &str) -> RepoResult<Option<User>> {
        let user = self
            .conn
            .query_row(
                &format!("{USER_SELECT_SQL} WHERE handle = ?1;"),
                [handle],
                parse_user_row,
            )
            .optional()?;
        Ok(user)
    }

    fn get_user(&self, id: UserId) -> RepoResult<Option<User>> {
        let user = self
            .conn
            .query_row(
                &format!("{USER_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_user_row,
            )
            .optional()?;
        Ok(user)
    }
}

fn parse_user_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get("id")?,
        name: row.get("name")?,
        handle: row.get("handle")?,
        password_digest: row.get("password_digest")?,
    })
}
