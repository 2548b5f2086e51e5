//! Notes list use-cases.
//!
//! # Invariants
//! - Update patches are validated before any SQL is built.
//! - A list that is missing or owned by someone else is `ListNotFound` for
//!   reads, updates and deletes alike.

use super::{ServiceError, ServiceResult};
use crate::model::list::{ListPatch, NewNotesList, NotesList};
use crate::model::{ListId, UserId};
use crate::repo::ListRepository;

/// List service facade over a list store.
pub struct ListService<L: ListRepository> {
    repo: L,
}

impl<L: ListRepository> ListService<L> {
    pub fn new(repo: L) -> Self {
        Self { repo }
    }

    /// Creates a list owned by `owner_id`.
    pub fn create(&self, owner_id: UserId, list: &NewNotesList) -> ServiceResult<ListId> {
        Ok(self.repo.create_list(owner_id, list)?)
    }

    /// Returns every list owned by `owner_id`.
    pub fn get_all(&self, owner_id: UserId) -> ServiceResult<Vec<NotesList>> {
        Ok(self.repo.list_lists(owner_id)?)
    }

    pub fn get_by_id(&self, owner_id: UserId, list_id: ListId) -> ServiceResult<NotesList> {
        self.repo
            .get_list(owner_id, list_id)?
            .ok_or(ServiceError::ListNotFound(list_id))
    }

    /// Applies a partial update; at least one field must be present.
    pub fn update(&self, owner_id: UserId, list_id: ListId, patch: &ListPatch) -> ServiceResult<()> {
        patch.validate()?;
        match self.repo.update_list(owner_id, list_id, patch)? {
            0 => Err(ServiceError::ListNotFound(list_id)),
            _ => Ok(()),
        }
    }

    pub fn delete(&self, owner_id: UserId, list_id: ListId) -> ServiceResult<()> {
        match self.repo.delete_list(owner_id, list_id)? {
            0 => Err(ServiceError::ListNotFound(list_id)),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ListService;
    use crate::model::list::{ListPatch, NewNotesList, NotesList};
    use crate::model::{ListId, NotesValidationError, UserId};
    use crate::repo::{ListRepository, RepoResult};
    use crate::service::ServiceError;
    use std::cell::Cell;

    /// Store double that counts calls and never matches any row.
    #[derive(Default)]
    struct CountingListRepo {
        updates: Cell<usize>,
    }

    impl ListRepository for &CountingListRepo {
        fn create_list(&self, _: UserId, _: &NewNotesList) -> RepoResult<ListId> {
            Ok(1)
        }

        fn list_lists(&self, _: UserId) -> RepoResult<Vec<NotesList>> {
            Ok(Vec::new())
        }

        fn get_list(&self, _: UserId, _: ListId) -> RepoResult<Option<NotesList>> {
            Ok(None)
        }

        fn update_list(&self, _: UserId, _: ListId, _: &ListPatch) -> RepoResult<usize> {
            self.updates.set(self.updates.get() + 1);
            Ok(0)
        }

        fn delete_list(&self, _: UserId, _: ListId) -> RepoResult<usize> {
            Ok(0)
        }
    }

    #[test]
    fn empty_patch_fails_before_reaching_store() {
        let repo = CountingListRepo::default();
        let service = ListService::new(&repo);

        let err = service.update(1, 1, &ListPatch::default()).unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Validation(NotesValidationError::EmptyPatch)
        ));
        assert_eq!(repo.updates.get(), 0);
    }

    #[test]
    fn zero_affected_rows_surface_as_not_found() {
        let repo = CountingListRepo::default();
        let service = ListService::new(&repo);
        let patch = ListPatch {
            title: Some("renamed".to_string()),
            description: None,
        };

        assert!(matches!(
            service.update(1, 5, &patch),
            Err(ServiceError::ListNotFound(5))
        ));
        assert_eq!(repo.updates.get(), 1);
        assert!(matches!(
            service.delete(1, 5),
            Err(ServiceError::ListNotFound(5))
        ));
        assert!(matches!(
            service.get_by_id(1, 5),
            Err(ServiceError::ListNotFound(5))
        ));
    }
}
