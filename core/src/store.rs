//! List store trait and related types.
//!
//! This module defines the persistence abstraction for per-user list
//! documents: collection-scoped CRUD over the logical path
//! `users/{user}/lists`, with whole-document overwrites guarded by an
//! optimistic [`Revision`] token.
//!
//! # Design
//!
//! The trait is deliberately minimal. It provides exactly what the
//! synchronization layer needs:
//!
//! - Load the entire collection for a user
//! - Create a document from a [`ListDraft`] (the store assigns the id)
//! - Overwrite a document wholesale, compare-and-swap on its revision
//! - Delete a document by id
//!
//! Each call is atomic at single-document granularity; there are no
//! partial-success semantics. Sub-entity (todo-level) changes have no
//! persistence path of their own - every todo mutation rewrites its whole
//! parent document through [`ListStore::overwrite`].
//!
//! # Implementations
//!
//! - `MemoryListStore` (in `listsync-testing`): deterministic in-memory
//!   implementation with failure injection
//!
//! # Dyn Compatibility
//!
//! This trait uses explicit `Pin<Box<dyn Future>>` returns instead of
//! `async fn` to enable trait object usage (`Arc<dyn ListStore>`).

use crate::types::{ListDraft, ListId, Revision, TodoList, UserId};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Errors that can occur during list store operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store could not be reached.
    #[error("Store unreachable: {0}")]
    Unavailable(String),

    /// The store rejected the call for this user.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// No document with this id exists in the user's collection.
    #[error("List not found: {0}")]
    NotFound(ListId),

    /// Optimistic concurrency conflict: the presented revision does not
    /// match the stored one. Another writer got there first; the caller
    /// should reload and retry deliberately rather than overwrite blindly.
    #[error("Revision conflict on {list_id}: expected {expected}, found {actual}")]
    RevisionConflict {
        /// The document where the conflict occurred.
        list_id: ListId,
        /// The revision the writer presented.
        expected: Revision,
        /// The revision actually stored.
        actual: Revision,
    },

    /// The document could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl StoreError {
    /// Whether this error is a connectivity-class failure, as opposed to a
    /// semantic rejection like a revision conflict.
    #[must_use]
    pub const fn is_connectivity(&self) -> bool {
        matches!(
            self,
            Self::Unavailable(_) | Self::PermissionDenied(_) | Self::Serialization(_)
        )
    }
}

/// Per-user persistence for list documents.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to be safely shared across async
/// tasks.
///
/// # Ordering
///
/// [`ListStore::list_all`] returns documents in store-defined order. Callers
/// must not assume any particular ordering; none is specified here.
pub trait ListStore: Send + Sync {
    /// Load every list document owned by `user`.
    ///
    /// Returns an empty vector for a user with no lists (not an error - new
    /// users start empty).
    ///
    /// # Errors
    ///
    /// - [`StoreError::Unavailable`]: connectivity failure
    /// - [`StoreError::PermissionDenied`]: the store rejected the caller
    /// - [`StoreError::Serialization`]: a stored document failed to decode
    fn list_all(
        &self,
        user: &UserId,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<TodoList>, StoreError>> + Send + '_>>;

    /// Persist a new list document and return its store-assigned id.
    ///
    /// The created document starts at [`Revision::new`]`(0)`.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Unavailable`]: connectivity failure
    /// - [`StoreError::PermissionDenied`]: the store rejected the caller
    fn create(
        &self,
        user: &UserId,
        draft: ListDraft,
    ) -> Pin<Box<dyn Future<Output = Result<ListId, StoreError>> + Send + '_>>;

    /// Overwrite the document keyed by `list.id` with `list`, wholesale.
    ///
    /// The write succeeds only if `list.revision` matches the stored
    /// revision; on success the stored document carries the returned, newly
    /// advanced revision.
    ///
    /// # Errors
    ///
    /// - [`StoreError::NotFound`]: no document with this id
    /// - [`StoreError::RevisionConflict`]: stale revision (concurrent write
    ///   detected)
    /// - [`StoreError::Unavailable`]: connectivity failure
    fn overwrite(
        &self,
        user: &UserId,
        list: &TodoList,
    ) -> Pin<Box<dyn Future<Output = Result<Revision, StoreError>> + Send + '_>>;

    /// Remove the document keyed by `id`, todos and all.
    ///
    /// # Errors
    ///
    /// - [`StoreError::NotFound`]: no document with this id
    /// - [`StoreError::Unavailable`]: connectivity failure
    fn delete(
        &self,
        user: &UserId,
        id: &ListId,
    ) -> Pin<Box<dyn Future<Output = Result<(), StoreError>> + Send + '_>>;
}
