//! Notes item store scoped through list ownership.
//!
//! # Responsibility
//! - Create items together with their `lists_items` membership row.
//! - Read, patch and delete items only through
//!   `users_lists` → `lists_items`.
//!
//! # Invariants
//! - `create_item` trusts the given `list_id`; callers check list ownership.
//! - There is no item-level ownership: an item is reachable only by the owner
//!   of its parent list.

use super::patch::UpdateBuilder;
use super::{ensure_connection_ready, parse_archived, RepoResult};
use crate::model::item::{ItemPatch, NewNotesItem, NotesItem};
use crate::model::{ItemId, ListId, NotesValidationError, UserId};
use log::{debug, error};
use rusqlite::types::Value;
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};

const OWNED_ITEM_SELECT_SQL: &str = "SELECT ni.id, ni.title, ni.description, ni.archived
FROM notes_items ni
INNER JOIN lists_items li ON li.item_id = ni.id
INNER JOIN users_lists ul ON ul.list_id = li.list_id";

const OWNED_ITEM_FILTER: &str = "id = ? AND EXISTS (
    SELECT 1
    FROM lists_items li
    INNER JOIN users_lists ul ON ul.list_id = li.list_id
    WHERE li.item_id = notes_items.id
      AND ul.user_id = ?
)";

/// Repository interface for items reached through list ownership.
pub trait ItemRepository {
    /// Creates an item inside `list_id` and returns its id.
    fn create_item(&self, list_id: ListId, item: &NewNotesItem) -> RepoResult<ItemId>;
    /// Returns items of one list owned by `owner_id`, ordered by id.
    fn list_items(&self, owner_id: UserId, list_id: ListId) -> RepoResult<Vec<NotesItem>>;
    /// Loads one item if its list is owned by `owner_id`.
    fn get_item(&self, owner_id: UserId, item_id: ItemId) -> RepoResult<Option<NotesItem>>;
    /// Applies the present patch fields. Returns affected rows.
    fn update_item(&self, owner_id: UserId, item_id: ItemId, patch: &ItemPatch)
        -> RepoResult<usize>;
    /// Deletes one reachable item. Returns affected rows.
    fn delete_item(&self, owner_id: UserId, item_id: ItemId) -> RepoResult<usize>;
}

/// SQLite-backed item store.
#[derive(Clone, Copy)]
pub struct SqliteItemRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteItemRepository<'conn> {
    /// Creates the store from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["notes_items", "lists_items", "users_lists"])?;
        Ok(Self::from_ready(conn))
    }

    pub(crate) fn from_ready(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ItemRepository for SqliteItemRepository<'_> {
    fn create_item(&self, list_id: ListId, item: &NewNotesItem) -> RepoResult<ItemId> {
        item.validate()?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        match insert_member_item(&tx, list_id, item) {
            Ok(item_id) => {
                tx.commit()?;
                debug!(
                    "event=item_create module=repo status=ok list_id={list_id} item_id={item_id}"
                );
                Ok(item_id)
            }
            Err(err) => {
                error!(
                    "event=item_create module=repo status=error rollback=true list_id={list_id} error={err}"
                );
                Err(err)
            }
        }
    }

    fn list_items(&self, owner_id: UserId, list_id: ListId) -> RepoResult<Vec<NotesItem>> {
        let mut stmt = self.conn.prepare(&format!(
            "{OWNED_ITEM_SELECT_SQL}
             WHERE li.list_id = ?1
               AND ul.user_id = ?2
             ORDER BY ni.id ASC;"
        ))?;
        let mut rows = stmt.query(params![list_id, owner_id])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_item_row(row)?);
        }
        Ok(items)
    }

    fn get_item(&self, owner_id: UserId, item_id: ItemId) -> RepoResult<Option<NotesItem>> {
        let mut stmt = self.conn.prepare(&format!(
            "{OWNED_ITEM_SELECT_SQL}
             WHERE ni.id = ?1
               AND ul.user_id = ?2
             LIMIT 1;"
        ))?;
        let mut rows = stmt.query(params![item_id, owner_id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_item_row(row)?));
        }
        Ok(None)
    }

    fn update_item(
        &self,
        owner_id: UserId,
        item_id: ItemId,
        patch: &ItemPatch,
    ) -> RepoResult<usize> {
        patch.validate()?;
        let builder = UpdateBuilder::new("notes_items")
            .set_if_present("title", patch.title.clone())
            .set_if_present("description", patch.description.clone())
            .set_if_present("archived", patch.archived);
        let columns = builder.columns();
        let (sql, values) = builder
            .build(
                OWNED_ITEM_FILTER,
                vec![Value::Integer(item_id), Value::Integer(owner_id)],
            )
            .ok_or(NotesValidationError::EmptyPatch)?;

        let changed = self
            .conn
            .execute(&sql, rusqlite::params_from_iter(values))?;
        debug!(
            "event=item_update module=repo status=ok item_id={item_id} columns={} affected={changed}",
            columns.join(",")
        );
        Ok(changed)
    }

    fn delete_item(&self, owner_id: UserId, item_id: ItemId) -> RepoResult<usize> {
        let changed = self.conn.execute(
            "DELETE FROM notes_items
             WHERE id = ?2
               AND id IN (
                   SELECT li.item_id
                   FROM lists_items li
                   INNER JOIN users_lists ul ON ul.list_id = li.list_id
                   WHERE ul.user_id = ?1
               );",
            params![owner_id, item_id],
        )?;
        debug!("event=item_delete module=repo status=ok item_id={item_id} affected={changed}");
        Ok(changed)
    }
}

fn insert_member_item(
    tx: &Transaction<'_>,
    list_id: ListId,
    item: &NewNotesItem,
) -> RepoResult<ItemId> {
    tx.execute(
        "INSERT INTO notes_items (title, description, archived) VALUES (?1, ?2, ?3);",
        params![
            item.title.as_str(),
            item.description.as_deref(),
            item.archived
        ],
    )?;
    let item_id = tx.last_insert_rowid();
    tx.execute(
        "INSERT INTO lists_items (list_id, item_id) VALUES (?1, ?2);",
        params![list_id, item_id],
    )?;
    Ok(item_id)
}

fn parse_item_row(row: &Row<'_>) -> RepoResult<NotesItem> {
    Ok(NotesItem {
        id: row.get("id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        archived: parse_archived(row.get("archived")?)?,
    })
}
