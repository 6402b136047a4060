//! # Listsync Testing
//!
//! Testing utilities and mocks for the listsync workspace.
//!
//! This crate provides:
//! - Mock implementations of the environment traits (`Clock`,
//!   `IdentityProvider`, `ListStore`)
//! - A deterministic in-memory list store with failure injection
//! - A fluent Given-When-Then harness for the mutation engine
//!
//! ## Example
//!
//! ```ignore
//! use listsync_testing::mocks::{test_clock, MemoryListStore, StaticIdentity};
//! use listsync_runtime::{SyncController, SyncEnvironment};
//!
//! #[tokio::test]
//! async fn creates_a_list() {
//!     let env = SyncEnvironment::new(
//!         Arc::new(StaticIdentity::new(UserId::new("user-1"))),
//!         Arc::new(MemoryListStore::new()),
//!         Arc::new(test_clock()),
//!     );
//!     let controller = SyncController::initialize(env).await.unwrap();
//!     controller.create_list("Groceries", Color::default()).await.unwrap();
//!     assert_eq!(controller.lists().await.len(), 1);
//! }
//! ```

mod memory_store;

/// Mock implementations of the environment traits.
pub mod mocks {
    use chrono::{DateTime, Utc};
    use listsync_core::environment::Clock;
    use listsync_core::identity::{AuthError, IdentityProvider};
    use listsync_core::types::UserId;
    use std::future::Future;
    use std::pin::Pin;

    pub use crate::memory_store::MemoryListStore;

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use listsync_testing::mocks::FixedClock;
    /// use listsync_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }

    /// Identity provider that always signs in as the same user.
    #[derive(Debug, Clone)]
    pub struct StaticIdentity {
        user: UserId,
    }

    impl StaticIdentity {
        /// Creates a provider that issues `user` on every sign-in.
        #[must_use]
        pub const fn new(user: UserId) -> Self {
            Self { user }
        }
    }

    impl IdentityProvider for StaticIdentity {
        fn sign_in_anonymously(
            &self,
        ) -> Pin<Box<dyn Future<Output = Result<UserId, AuthError>> + Send + '_>> {
            let user = self.user.clone();
            Box::pin(async move { Ok(user) })
        }
    }

    /// Identity provider that always fails, for exercising the
    /// no-session-without-identity path.
    #[derive(Debug, Clone)]
    pub struct FailingIdentity {
        reason: String,
    }

    impl FailingIdentity {
        /// Creates a provider that fails with `reason`.
        #[must_use]
        pub fn new(reason: impl Into<String>) -> Self {
            Self {
                reason: reason.into(),
            }
        }
    }

    impl IdentityProvider for FailingIdentity {
        fn sign_in_anonymously(
            &self,
        ) -> Pin<Box<dyn Future<Output = Result<UserId, AuthError>> + Send + '_>> {
            let reason = self.reason.clone();
            Box::pin(async move { Err(AuthError::Unavailable(reason)) })
        }
    }
}

/// Builders for common test fixtures.
pub mod helpers {
    use chrono::{TimeZone, Utc};
    use listsync_core::types::{Color, ListId, Revision, TodoItem, TodoList};

    /// Build a list value with the given todo titles, all uncompleted.
    ///
    /// # Panics
    ///
    /// Never panics: the fixture timestamp is a valid calendar date.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn list_named(name: &str, titles: &[&str]) -> TodoList {
        let created = Utc
            .with_ymd_and_hms(2024, 12, 31, 0, 0, 0)
            .single()
            .expect("fixture timestamp should always resolve");
        TodoList::new(
            ListId::new("test-list"),
            Revision::default(),
            name.to_string(),
            Color::default(),
            titles
                .iter()
                .map(|t| TodoItem::new((*t).to_string(), created))
                .collect(),
        )
    }
}

// Re-export commonly used items
pub use mocks::{FailingIdentity, FixedClock, MemoryListStore, StaticIdentity, test_clock};
pub use mutation_test::{assertions, MutationTest};
