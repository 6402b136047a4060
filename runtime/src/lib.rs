//! # Listsync Runtime
//!
//! The synchronization controller: the imperative shell around the pure
//! mutation engine in `listsync-core`.
//!
//! [`SyncController`] owns the authoritative in-memory snapshot of all lists
//! for one signed-in user and serializes every mutation through
//! persist-then-reconcile:
//!
//! 1. An operation is validated (and, for todo-level commands, applied to a
//!    clone of the snapshot entry by the pure engine)
//! 2. The whole list document is persisted through
//!    [`listsync_core::store::ListStore`]
//! 3. Only after the store accepts the write is the snapshot updated
//!
//! A failed operation therefore never mutates the snapshot, and a successful
//! one leaves the snapshot consistent with what was persisted.
//!
//! ## Concurrency
//!
//! Mutations of the same list are serialized through a per-list async lock,
//! so overlapping updates apply in submission order instead of racing on a
//! shared pre-mutation value. Mutations of different lists proceed
//! concurrently. Revision tokens on every document turn any write the locks
//! cannot see (another device, a stale caller-held value) into a detected
//! [`listsync_core::store::StoreError::RevisionConflict`] instead of a
//! silent lost update.
//!
//! ## Example
//!
//! ```ignore
//! use listsync_runtime::{SyncController, SyncEnvironment};
//!
//! let controller = SyncController::initialize(env).await?;
//! controller.refresh().await?;
//! controller.create_list("Groceries", Color::default()).await?;
//!
//! let id = controller.lists().await[0].id.clone();
//! controller.add_todo(&id, "Milk").await?;
//! controller.toggle_todo(&id, 0).await?;
//! ```

use listsync_core::engine::{Applied, ListMutator, MutationError, MutatorEnvironment, TodoCommand};
use listsync_core::environment::Clock;
use listsync_core::identity::{AuthError, IdentityProvider};
use listsync_core::store::{ListStore, StoreError};
use listsync_core::types::{Color, ListDraft, ListId, TodoList, UserId};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};

/// Errors surfaced by [`SyncController`] operations.
///
/// Every operation returns a scoped `Result` instead of terminating the
/// session; the guarantee that a failure never leaves the snapshot
/// inconsistent is kept by mutating the snapshot only after the store
/// accepts a write.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// Identity bootstrap failed; there is no degraded or offline mode.
    #[error("Authentication failed: {0}")]
    Auth(#[from] AuthError),

    /// A store call failed or was rejected.
    #[error("Store operation failed: {0}")]
    Store(#[from] StoreError),

    /// The pure mutation engine rejected a todo-level command.
    #[error("Mutation rejected: {0}")]
    Mutation(#[from] MutationError),

    /// A list cannot be created with an empty name.
    #[error("List name cannot be empty")]
    EmptyListName,

    /// The addressed list is not in the current snapshot.
    #[error("No list with id {0} in the current snapshot")]
    UnknownList(ListId),
}

impl SyncError {
    /// The single user-facing message for this error.
    ///
    /// Connectivity-class failures all collapse to one notice, matching the
    /// one-message behavior the presentation layer expects; semantic
    /// rejections get their own short texts. Causes stay distinguishable in
    /// logs and in the error value itself.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Auth(_) => "Check your internet connection.",
            Self::Store(store) => {
                if store.is_connectivity() {
                    "Check your internet connection."
                } else {
                    match store {
                        StoreError::RevisionConflict { .. } => {
                            "This list changed elsewhere. Refresh and try again."
                        }
                        _ => "Something went wrong. Please refresh.",
                    }
                }
            }
            Self::Mutation(MutationError::EmptyTitle) => "A todo needs a title.",
            Self::Mutation(MutationError::TitleTooLong { .. }) => "That title is too long.",
            Self::Mutation(MutationError::IndexOutOfBounds { .. }) | Self::UnknownList(_) => {
                "Something went wrong. Please refresh."
            }
            Self::EmptyListName => "A list needs a name.",
        }
    }
}

/// Injected dependencies for the controller.
///
/// Everything external arrives here, explicitly: who we are
/// ([`IdentityProvider`]), where documents live ([`ListStore`]), and what
/// time it is ([`Clock`]). No ambient lookups.
#[derive(Clone)]
pub struct SyncEnvironment {
    /// Issues the anonymous user identity at session start.
    pub identity: Arc<dyn IdentityProvider>,
    /// Per-user list document persistence.
    pub store: Arc<dyn ListStore>,
    /// Clock for stamping todo mutations.
    pub clock: Arc<dyn Clock>,
}

impl SyncEnvironment {
    /// Creates a new `SyncEnvironment`.
    #[must_use]
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        store: Arc<dyn ListStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            identity,
            store,
            clock,
        }
    }
}

/// Owns the in-memory snapshot of one user's lists and mediates every
/// mutation through the store.
///
/// The snapshot is exclusively owned here; readers get clones via
/// [`SyncController::lists`] or a borrowed view via
/// [`SyncController::with_lists`]. Snapshot order is whatever the store
/// returned from the last full reload - no client-side ordering is applied.
pub struct SyncController {
    user: UserId,
    store: Arc<dyn ListStore>,
    mutator: ListMutator,
    mutator_env: MutatorEnvironment,
    lists: RwLock<Vec<TodoList>>,
    /// Per-list write serialization. Entries are created on first use and
    /// dropped when the list is deleted.
    write_locks: Mutex<HashMap<ListId, Arc<Mutex<()>>>>,
}

impl SyncController {
    /// Establish the user session and build a controller with an empty
    /// snapshot.
    ///
    /// Callers trigger [`SyncController::refresh`] for the first load.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Auth`] if the identity provider cannot issue an
    /// identity; there is no degraded mode without one.
    #[tracing::instrument(skip(env), name = "sync_initialize")]
    pub async fn initialize(env: SyncEnvironment) -> Result<Self, SyncError> {
        let user = env.identity.sign_in_anonymously().await?;
        tracing::info!(user = %user, "session established");

        Ok(Self {
            user,
            store: env.store,
            mutator: ListMutator::new(),
            mutator_env: MutatorEnvironment::new(env.clock),
            lists: RwLock::new(Vec::new()),
            write_locks: Mutex::new(HashMap::new()),
        })
    }

    /// The signed-in user this controller is scoped to.
    #[must_use]
    pub const fn user(&self) -> &UserId {
        &self.user
    }

    /// Read the snapshot through a borrowing accessor.
    pub async fn with_lists<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&[TodoList]) -> T,
    {
        let lists = self.lists.read().await;
        f(&lists)
    }

    /// A clone of the current snapshot.
    pub async fn lists(&self) -> Vec<TodoList> {
        self.with_lists(<[TodoList]>::to_vec).await
    }

    /// Fetch the entire collection and replace the snapshot wholesale.
    ///
    /// No incremental diffing: the result of the read wins over anything the
    /// snapshot held, in whatever order the store returned
    /// (last-reload-wins).
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Store`] on any store failure; the snapshot keeps
    /// its previous contents.
    #[tracing::instrument(skip(self), fields(user = %self.user), name = "sync_refresh")]
    pub async fn refresh(&self) -> Result<(), SyncError> {
        let fresh = self.store.list_all(&self.user).await?;
        tracing::debug!(count = fresh.len(), "snapshot replaced");

        let mut lists = self.lists.write().await;
        *lists = fresh;
        Ok(())
    }

    /// Create a list with an empty todo sequence, then reload.
    ///
    /// The full reload (rather than a local insert) is how the snapshot
    /// picks up the store-assigned id.
    ///
    /// # Errors
    ///
    /// - [`SyncError::EmptyListName`]: name is empty after trimming
    /// - [`SyncError::Store`]: the store rejected or was unreachable; the
    ///   snapshot is untouched
    #[tracing::instrument(skip(self, name), fields(user = %self.user), name = "sync_create_list")]
    pub async fn create_list(
        &self,
        name: impl Into<String>,
        color: Color,
    ) -> Result<(), SyncError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(SyncError::EmptyListName);
        }

        let id = self.store.create(&self.user, ListDraft::new(name, color)).await?;
        tracing::info!(list = %id, "list created");

        self.refresh().await
    }

    /// Persist `list` as a whole-document overwrite keyed by `list.id`, then
    /// reconcile the snapshot entry in place.
    ///
    /// This is the only durable path for todo-level changes; the entire
    /// parent document is rewritten on every one of them. The write carries
    /// `list.revision` as its concurrency token.
    ///
    /// # Errors
    ///
    /// - [`SyncError::Store`] with
    ///   [`StoreError::RevisionConflict`]: `list` was stale; reload and
    ///   reapply deliberately
    /// - [`SyncError::Store`] with [`StoreError::NotFound`]: the list no
    ///   longer exists
    ///
    /// On any error the snapshot is untouched.
    #[tracing::instrument(skip(self, list), fields(user = %self.user, list = %list.id), name = "sync_update_list")]
    pub async fn update_list(&self, list: TodoList) -> Result<(), SyncError> {
        let lock = self.write_lock(&list.id).await;
        let _guard = lock.lock().await;
        self.persist_and_reconcile(list).await
    }

    /// Delete the list document by id and drop it from the snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Store`] on store failure; the snapshot is
    /// untouched.
    #[tracing::instrument(skip(self), fields(user = %self.user, list = %id), name = "sync_delete_list")]
    pub async fn delete_list(&self, id: &ListId) -> Result<(), SyncError> {
        let lock = self.write_lock(id).await;
        {
            let _guard = lock.lock().await;
            self.store.delete(&self.user, id).await?;
            tracing::info!("list deleted");

            let mut lists = self.lists.write().await;
            lists.retain(|l| l.id != *id);
        }
        self.write_locks.lock().await.remove(id);
        Ok(())
    }

    /// Flip completion on the todo at `index` in list `id` and persist.
    ///
    /// # Errors
    ///
    /// - [`SyncError::UnknownList`]: `id` is not in the snapshot
    /// - [`SyncError::Mutation`]: `index` is out of range (caller defect)
    /// - [`SyncError::Store`]: persistence failed; the snapshot is untouched
    pub async fn toggle_todo(&self, id: &ListId, index: usize) -> Result<(), SyncError> {
        self.mutate_todos(id, TodoCommand::Toggle { index }).await
    }

    /// Append a todo titled `title` to list `id` and persist.
    ///
    /// A title the list already contains is silently rejected: the snapshot
    /// stays as it is and no store round-trip happens.
    ///
    /// # Errors
    ///
    /// - [`SyncError::UnknownList`]: `id` is not in the snapshot
    /// - [`SyncError::Mutation`]: the title is empty or too long
    /// - [`SyncError::Store`]: persistence failed; the snapshot is untouched
    pub async fn add_todo(
        &self,
        id: &ListId,
        title: impl Into<String>,
    ) -> Result<(), SyncError> {
        self.mutate_todos(
            id,
            TodoCommand::Add {
                title: title.into(),
            },
        )
        .await
    }

    /// Remove the todo at `index` from list `id` and persist.
    ///
    /// # Errors
    ///
    /// - [`SyncError::UnknownList`]: `id` is not in the snapshot
    /// - [`SyncError::Mutation`]: `index` is out of range (caller defect)
    /// - [`SyncError::Store`]: persistence failed; the snapshot is untouched
    pub async fn remove_todo(&self, id: &ListId, index: usize) -> Result<(), SyncError> {
        self.mutate_todos(id, TodoCommand::Remove { index }).await
    }

    /// Apply a todo-level command under the list's write lock:
    /// clone the snapshot entry, run the pure engine, persist, reconcile.
    #[tracing::instrument(skip(self, command), fields(user = %self.user, list = %id), name = "sync_mutate_todos")]
    async fn mutate_todos(&self, id: &ListId, command: TodoCommand) -> Result<(), SyncError> {
        let lock = self.write_lock(id).await;
        let _guard = lock.lock().await;

        let mut list = self
            .with_lists(|lists| lists.iter().find(|l| l.id == *id).cloned())
            .await
            .ok_or_else(|| SyncError::UnknownList(id.clone()))?;

        match self.mutator.apply(&mut list, command, &self.mutator_env)? {
            Applied::Unchanged => {
                tracing::debug!("command was a no-op, skipping persistence");
                Ok(())
            }
            Applied::Changed => self.persist_and_reconcile(list).await,
        }
    }

    /// Overwrite the document and, on success, replace the snapshot entry
    /// with the persisted value at its advanced revision.
    ///
    /// Callers must hold the list's write lock.
    async fn persist_and_reconcile(&self, mut list: TodoList) -> Result<(), SyncError> {
        let revision = self.store.overwrite(&self.user, &list).await?;
        list.revision = revision;
        tracing::debug!(list = %list.id, revision = %revision, "list persisted");

        let mut lists = self.lists.write().await;
        if let Some(entry) = lists.iter_mut().find(|l| l.id == list.id) {
            *entry = list;
        }
        Ok(())
    }

    /// The serialization lock for one list, created on first use.
    async fn write_lock(&self, id: &ListId) -> Arc<Mutex<()>> {
        let mut locks = self.write_locks.lock().await;
        locks
            .entry(id.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}
