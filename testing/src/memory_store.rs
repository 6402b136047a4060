//! Deterministic in-memory list store.
//!
//! [`MemoryListStore`] implements [`ListStore`] against a `HashMap`, with
//! store-assigned ids, revision compare-and-swap, and a switch for
//! simulating connectivity loss. Documents for one user keep insertion
//! order, which stands in for the remote store's unspecified ordering.

use listsync_core::store::{ListStore, StoreError};
use listsync_core::types::{ListDraft, ListId, Revision, TodoList, UserId};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;
use uuid::Uuid;

/// In-memory [`ListStore`] for tests and demos.
///
/// # Failure Injection
///
/// [`MemoryListStore::set_offline`] makes every subsequent call fail with
/// [`StoreError::Unavailable`] until switched back, for exercising the
/// "store unreachable" paths deterministically.
#[derive(Debug, Default)]
pub struct MemoryListStore {
    documents: Mutex<HashMap<UserId, Vec<TodoList>>>,
    offline: AtomicBool,
}

impl MemoryListStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate (or clear) a connectivity failure.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::Release);
    }

    /// The documents currently stored for `user`, in insertion order.
    ///
    /// Bypasses the offline switch; this is for test assertions, not a
    /// store operation.
    pub async fn stored(&self, user: &UserId) -> Vec<TodoList> {
        let docs = self.documents.lock().await;
        docs.get(user).cloned().unwrap_or_default()
    }

    /// Insert a document directly, as if another device had created it.
    ///
    /// Bypasses the offline switch. Returns the assigned id.
    pub async fn seed(&self, user: &UserId, draft: ListDraft) -> ListId {
        let id = ListId::new(Uuid::new_v4().to_string());
        let list = TodoList::new(
            id.clone(),
            Revision::default(),
            draft.name,
            draft.color,
            draft.todos,
        );
        let mut docs = self.documents.lock().await;
        docs.entry(user.clone()).or_default().push(list);
        id
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::Acquire) {
            return Err(StoreError::Unavailable("network is offline".to_string()));
        }
        Ok(())
    }
}

impl ListStore for MemoryListStore {
    fn list_all(
        &self,
        user: &UserId,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<TodoList>, StoreError>> + Send + '_>> {
        let user = user.clone();
        Box::pin(async move {
            self.check_online()?;
            let docs = self.documents.lock().await;
            Ok(docs.get(&user).cloned().unwrap_or_default())
        })
    }

    fn create(
        &self,
        user: &UserId,
        draft: ListDraft,
    ) -> Pin<Box<dyn Future<Output = Result<ListId, StoreError>> + Send + '_>> {
        let user = user.clone();
        Box::pin(async move {
            self.check_online()?;
            let id = ListId::new(Uuid::new_v4().to_string());
            let list = TodoList::new(
                id.clone(),
                Revision::default(),
                draft.name,
                draft.color,
                draft.todos,
            );
            let mut docs = self.documents.lock().await;
            docs.entry(user).or_default().push(list);
            Ok(id)
        })
    }

    fn overwrite(
        &self,
        user: &UserId,
        list: &TodoList,
    ) -> Pin<Box<dyn Future<Output = Result<Revision, StoreError>> + Send + '_>> {
        let user = user.clone();
        let list = list.clone();
        Box::pin(async move {
            self.check_online()?;
            let mut docs = self.documents.lock().await;
            let entry = docs
                .get_mut(&user)
                .and_then(|lists| lists.iter_mut().find(|l| l.id == list.id))
                .ok_or_else(|| StoreError::NotFound(list.id.clone()))?;

            if entry.revision != list.revision {
                return Err(StoreError::RevisionConflict {
                    list_id: list.id.clone(),
                    expected: list.revision,
                    actual: entry.revision,
                });
            }

            let revision = list.revision.next();
            *entry = TodoList {
                revision,
                ..list
            };
            Ok(revision)
        })
    }

    fn delete(
        &self,
        user: &UserId,
        id: &ListId,
    ) -> Pin<Box<dyn Future<Output = Result<(), StoreError>> + Send + '_>> {
        let user = user.clone();
        let id = id.clone();
        Box::pin(async move {
            self.check_online()?;
            let mut docs = self.documents.lock().await;
            let lists = docs
                .get_mut(&user)
                .ok_or_else(|| StoreError::NotFound(id.clone()))?;
            let position = lists
                .iter()
                .position(|l| l.id == id)
                .ok_or_else(|| StoreError::NotFound(id.clone()))?;
            lists.remove(position);
            Ok(())
        })
    }
}
