//! # Listsync Core
//!
//! Domain types and pure logic for per-user todo-list synchronization.
//!
//! This crate provides the I/O-free half of the system:
//!
//! - **Types**: [`types::TodoList`], [`types::TodoItem`], [`types::ListDraft`]
//!   and the strong identifier/revision newtypes
//! - **Mutation engine**: [`engine::ListMutator`], pure transforms over a
//!   list's todo sequence (toggle, add with duplicate-title rejection,
//!   remove by position)
//! - **Environment traits**: [`environment::Clock`],
//!   [`identity::IdentityProvider`], [`store::ListStore`] - every external
//!   capability behind a trait, injected explicitly
//!
//! The async runtime that owns the in-memory snapshot and drives
//! persist-then-reconcile lives in `listsync-runtime`; deterministic mocks
//! and test harnesses live in `listsync-testing`.
//!
//! ## Architecture Principles
//!
//! - Functional core, imperative shell
//! - Explicit dependencies (no ambient session or clock lookups)
//! - Whole-document persistence with optimistic revision tokens
//!
//! ## Example
//!
//! ```
//! use listsync_core::engine::{Applied, ListMutator, MutatorEnvironment, TodoCommand};
//! use listsync_core::environment::SystemClock;
//! use listsync_core::types::{Color, ListId, Revision, TodoList};
//! use std::sync::Arc;
//!
//! let env = MutatorEnvironment::new(Arc::new(SystemClock));
//! let mutator = ListMutator::new();
//! let mut list = TodoList::new(
//!     ListId::new("abc123"),
//!     Revision::default(),
//!     "Groceries".to_string(),
//!     Color::default(),
//!     Vec::new(),
//! );
//!
//! let applied = mutator
//!     .apply(&mut list, TodoCommand::Add { title: "Milk".to_string() }, &env)
//!     .unwrap();
//! assert_eq!(applied, Applied::Changed);
//! assert_eq!(list.todos.len(), 1);
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};

pub mod engine;
pub mod environment;
pub mod identity;
pub mod store;
pub mod types;

pub use engine::{Applied, ListMutator, MutationError, MutatorEnvironment, TodoCommand};
pub use environment::{Clock, SystemClock};
pub use identity::{AuthError, IdentityProvider};
pub use store::{ListStore, StoreError};
pub use types::{Color, ListDraft, ListId, Revision, TodoItem, TodoList, UserId};
