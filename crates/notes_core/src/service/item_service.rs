//! Notes item use-cases.
//!
//! # Invariants
//! - `create` checks that the caller owns the target list before the item
//!   store is touched; the item store itself trusts the list id.
//! - Other operations rely on the item store's ownership join.

use super::{ServiceError, ServiceResult};
use crate::model::item::{ItemPatch, NewNotesItem, NotesItem};
use crate::model::{ItemId, ListId, UserId};
use crate::repo::{ItemRepository, ListRepository};
use log::warn;

/// Item service facade over the item and list stores.
pub struct ItemService<I: ItemRepository, L: ListRepository> {
    items: I,
    lists: L,
}

impl<I: ItemRepository, L: ListRepository> ItemService<I, L> {
    pub fn new(items: I, lists: L) -> Self {
        Self { items, lists }
    }

    /// Creates an item under a list owned by `owner_id`.
    pub fn create(
        &self,
        owner_id: UserId,
        list_id: ListId,
        item: &NewNotesItem,
    ) -> ServiceResult<ItemId> {
        if self.lists.get_list(owner_id, list_id)?.is_none() {
            warn!(
                "event=item_create module=service status=error error_code=list_not_owned list_id={list_id}"
            );
            return Err(ServiceError::ListNotFound(list_id));
        }
        Ok(self.items.create_item(list_id, item)?)
    }

    /// Returns the items of one owned list; empty when the list is not owned.
    pub fn get_all(&self, owner_id: UserId, list_id: ListId) -> ServiceResult<Vec<NotesItem>> {
        Ok(self.items.list_items(owner_id, list_id)?)
    }

    pub fn get_by_id(&self, owner_id: UserId, item_id: ItemId) -> ServiceResult<NotesItem> {
        self.items
            .get_item(owner_id, item_id)?
            .ok_or(ServiceError::ItemNotFound(item_id))
    }

    /// Applies a partial update; at least one field must be present.
    pub fn update(&self, owner_id: UserId, item_id: ItemId, patch: &ItemPatch) -> ServiceResult<()> {
        patch.validate()?;
        match self.items.update_item(owner_id, item_id, patch)? {
            0 => Err(ServiceError::ItemNotFound(item_id)),
            _ => Ok(()),
        }
    }

    pub fn delete(&self, owner_id: UserId, item_id: ItemId) -> ServiceResult<()> {
        match self.items.delete_item(owner_id, item_id)? {
            0 => Err(ServiceError::ItemNotFound(item_id)),
            _ => Ok(()),
        }
    }
}
