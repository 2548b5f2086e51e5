//! Notes list store scoped by ownership.
//!
//! # Responsibility
//! - Create lists together with their `users_lists` ownership row.
//! - Read, patch and delete lists only through the ownership join.
//!
//! # Invariants
//! - `create_list` validates the title before opening a transaction.
//! - Every read/mutation filters on both `user_id` and `list_id`; a list owned
//!   by someone else is indistinguishable from a missing one.

use super::patch::UpdateBuilder;
use super::{ensure_connection_ready, RepoResult};
use crate::model::list::{ListPatch, NewNotesList, NotesList};
use crate::model::{ListId, NotesValidationError, UserId};
use log::{debug, error};
use rusqlite::types::Value;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};

const OWNED_LIST_SELECT_SQL: &str = "SELECT nl.id, nl.title, nl.description
FROM notes_lists nl
INNER JOIN users_lists ul ON ul.list_id = nl.id";

const OWNED_LIST_FILTER: &str = "id = ? AND EXISTS (
    SELECT 1
    FROM users_lists ul
    WHERE ul.list_id = notes_lists.id
      AND ul.user_id = ?
)";

/// Repository interface for owner-scoped list operations.
pub trait ListRepository {
    /// Creates a list owned by `owner_id` and returns its id.
    fn create_list(&self, owner_id: UserId, list: &NewNotesList) -> RepoResult<ListId>;
    /// Returns every list owned by `owner_id`, ordered by id.
    fn list_lists(&self, owner_id: UserId) -> RepoResult<Vec<NotesList>>;
    /// Loads one list if `owner_id` owns it.
    fn get_list(&self, owner_id: UserId, list_id: ListId) -> RepoResult<Option<NotesList>>;
    /// Applies the present patch fields. Returns affected rows.
    fn update_list(&self, owner_id: UserId, list_id: ListId, patch: &ListPatch)
        -> RepoResult<usize>;
    /// Deletes one owned list. Returns affected rows.
    fn delete_list(&self, owner_id: UserId, list_id: ListId) -> RepoResult<usize>;
}

/// SQLite-backed list store.
#[derive(Clone, Copy)]
pub struct SqliteListRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteListRepository<'conn> {
    /// Creates the store from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["notes_lists", "users_lists"])?;
        Ok(Self::from_ready(conn))
    }

    pub(crate) fn from_ready(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ListRepository for SqliteListRepository<'_> {
    fn create_list(&self, owner_id: UserId, list: &NewNotesList) -> RepoResult<ListId> {
        list.validate()?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        match insert_owned_list(&tx, owner_id, list) {
            Ok(list_id) => {
                tx.commit()?;
                debug!("event=list_create module=repo status=ok list_id={list_id}");
                Ok(list_id)
            }
            Err(err) => {
                // Dropping `tx` rolls back the entity row.
                error!("event=list_create module=repo status=error rollback=true error={err}");
                Err(err)
            }
        }
    }

    fn list_lists(&self, owner_id: UserId) -> RepoResult<Vec<NotesList>> {
        let mut stmt = self.conn.prepare(&format!(
            "{OWNED_LIST_SELECT_SQL}
             WHERE ul.user_id = ?1
             ORDER BY nl.id ASC;"
        ))?;
        let lists = stmt
            .query_map([owner_id], parse_list_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(lists)
    }

    fn get_list(&self, owner_id: UserId, list_id: ListId) -> RepoResult<Option<NotesList>> {
        let list = self
            .conn
            .query_row(
                &format!(
                    "{OWNED_LIST_SELECT_SQL}
                     WHERE ul.user_id = ?1
                       AND ul.list_id = ?2;"
                ),
                params![owner_id, list_id],
                parse_list_row,
            )
            .optional()?;
        Ok(list)
    }

    fn update_list(
        &self,
        owner_id: UserId,
        list_id: ListId,
        patch: &ListPatch,
    ) -> RepoResult<usize> {
        patch.validate()?;
        let builder = UpdateBuilder::new("notes_lists")
            .set_if_present("title", patch.title.clone())
            .set_if_present("description", patch.description.clone());
        let columns = builder.columns();
        let (sql, values) = builder
            .build(
                OWNED_LIST_FILTER,
                vec![Value::Integer(list_id), Value::Integer(owner_id)],
            )
            .ok_or(NotesValidationError::EmptyPatch)?;

        let changed = self
            .conn
            .execute(&sql, rusqlite::params_from_iter(values))?;
        debug!(
            "event=list_update module=repo status=ok list_id={list_id} columns={} affected={changed}",
            columns.join(",")
        );
        Ok(changed)
    }

    fn delete_list(&self, owner_id: UserId, list_id: ListId) -> RepoResult<usize> {
        let changed = self.conn.execute(
            "DELETE FROM notes_lists
             WHERE id = ?2
               AND id IN (
                   SELECT list_id
                   FROM users_lists
                   WHERE user_id = ?1
               );",
            params![owner_id, list_id],
        )?;
        debug!("event=list_delete module=repo status=ok list_id={list_id} affected={changed}");
        Ok(changed)
    }
}

fn insert_owned_list(
    tx: &Transaction<'_>,
    owner_id: UserId,
    list: &NewNotesList,
) -> RepoResult<ListId> {
    tx.execute(
        "INSERT INTO notes_lists (title, description) VALUES (?1, ?2);",
        params![list.title.as_str(), list.description.as_deref()],
    )?;
    let list_id = tx.last_insert_rowid();
    tx.execute(
        "INSERT INTO users_lists (user_id, list_id) VALUES (?1, ?2);",
        params![owner_id, list_id],
    )?;
    Ok(list_id)
}

fn parse_list_row(row: &Row<'_>) -> rusqlite::Result<NotesList> {
    Ok(NotesList {
        id: row.get("id")?,
        title: row.get("title")?,
        description: row.get("description")?,
    })
}
