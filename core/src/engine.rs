//! Pure mutation engine for a list's todo sequence.
//!
//! [`ListMutator`] applies a [`TodoCommand`] to a [`TodoList`] value:
//! validate first, then mutate in place. Nothing here touches the store -
//! the caller is responsible for persisting the resulting list. Keeping
//! these transforms pure isolates the one piece of business logic (the
//! duplicate-title rule and index-based addressing) from I/O, which makes it
//! the natural unit for testing without a backend.

use crate::environment::Clock;
use crate::types::{TodoItem, TodoList};
use std::sync::Arc;
use thiserror::Error;

/// Longest accepted todo title, in characters.
pub const MAX_TITLE_LEN: usize = 500;

/// Errors that can occur while applying a [`TodoCommand`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MutationError {
    /// The command addressed a position outside the todo sequence.
    ///
    /// Indices are derived from rendering the same sequence being mutated,
    /// so this is a caller defect rather than a runtime condition to
    /// recover from.
    #[error("Todo index {index} out of bounds for list of length {len}")]
    IndexOutOfBounds {
        /// The offending index.
        index: usize,
        /// The length of the todo sequence at the time of the call.
        len: usize,
    },

    /// The title was empty after trimming whitespace.
    #[error("Todo title cannot be empty")]
    EmptyTitle,

    /// The title exceeded [`MAX_TITLE_LEN`].
    #[error("Todo title too long ({len} chars, max {max})")]
    TitleTooLong {
        /// Length of the rejected title.
        len: usize,
        /// The accepted maximum.
        max: usize,
    },
}

/// A todo-level operation on one list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TodoCommand {
    /// Flip `completed` on the todo at `index`.
    Toggle {
        /// Position of the todo in the list's sequence.
        index: usize,
    },
    /// Append a new, uncompleted todo unless the title is already taken.
    Add {
        /// Title for the new todo.
        title: String,
    },
    /// Remove the todo at `index` by position.
    Remove {
        /// Position of the todo in the list's sequence.
        index: usize,
    },
}

/// Whether applying a command changed the list.
///
/// An [`TodoCommand::Add`] with a title the list already contains is
/// silently rejected: the list is structurally untouched and the caller can
/// skip persisting it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Applied {
    /// The list value changed and should be persisted.
    Changed,
    /// The command was a no-op; the list is exactly as it was.
    Unchanged,
}

/// Environment dependencies for the mutation engine.
#[derive(Clone)]
pub struct MutatorEnvironment {
    /// Clock for stamping todo creation and completion times.
    pub clock: Arc<dyn Clock>,
}

impl MutatorEnvironment {
    /// Creates a new `MutatorEnvironment`.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }
}

/// Applies todo-level commands to list values.
#[derive(Clone, Debug, Default)]
pub struct ListMutator;

impl ListMutator {
    /// Creates a new `ListMutator`.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn validate_index(list: &TodoList, index: usize) -> Result<(), MutationError> {
        if index >= list.todos.len() {
            return Err(MutationError::IndexOutOfBounds {
                index,
                len: list.todos.len(),
            });
        }
        Ok(())
    }

    fn validate_title(title: &str) -> Result<(), MutationError> {
        if title.trim().is_empty() {
            return Err(MutationError::EmptyTitle);
        }
        if title.chars().count() > MAX_TITLE_LEN {
            return Err(MutationError::TitleTooLong {
                len: title.chars().count(),
                max: MAX_TITLE_LEN,
            });
        }
        Ok(())
    }

    /// Apply `command` to `list` in place.
    ///
    /// Returns [`Applied::Unchanged`] for a duplicate-title add; every other
    /// successful application returns [`Applied::Changed`]. On error the
    /// list is untouched.
    ///
    /// # Errors
    ///
    /// - [`MutationError::IndexOutOfBounds`]: `Toggle`/`Remove` addressed a
    ///   position outside the sequence
    /// - [`MutationError::EmptyTitle`] / [`MutationError::TitleTooLong`]:
    ///   `Add` carried an unacceptable title
    pub fn apply(
        &self,
        list: &mut TodoList,
        command: TodoCommand,
        env: &MutatorEnvironment,
    ) -> Result<Applied, MutationError> {
        match command {
            TodoCommand::Toggle { index } => {
                Self::validate_index(list, index)?;
                if list.todos[index].completed {
                    list.todos[index].reopen();
                } else {
                    list.todos[index].complete(env.clock.now());
                }
                Ok(Applied::Changed)
            }
            TodoCommand::Add { title } => {
                Self::validate_title(&title)?;
                if list.contains_title(&title) {
                    return Ok(Applied::Unchanged);
                }
                list.todos.push(TodoItem::new(title, env.clock.now()));
                Ok(Applied::Changed)
            }
            TodoCommand::Remove { index } => {
                Self::validate_index(list, index)?;
                list.todos.remove(index);
                Ok(Applied::Changed)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{Color, ListId, Revision};
    use chrono::{DateTime, TimeZone, Utc};

    struct TestClock(DateTime<Utc>);

    impl Clock for TestClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    fn test_env() -> MutatorEnvironment {
        let time = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).single().unwrap();
        MutatorEnvironment::new(Arc::new(TestClock(time)))
    }

    fn groceries(titles: &[&str]) -> TodoList {
        let now = Utc.with_ymd_and_hms(2024, 12, 31, 0, 0, 0).single().unwrap();
        TodoList::new(
            ListId::new("abc123"),
            Revision::default(),
            "Groceries".to_string(),
            Color::default(),
            titles
                .iter()
                .map(|t| TodoItem::new((*t).to_string(), now))
                .collect(),
        )
    }

    #[test]
    fn toggle_completes_then_reopens() {
        let env = test_env();
        let mutator = ListMutator::new();
        let mut list = groceries(&["Milk"]);

        let applied = mutator
            .apply(&mut list, TodoCommand::Toggle { index: 0 }, &env)
            .unwrap();
        assert_eq!(applied, Applied::Changed);
        assert!(list.todos[0].completed);
        assert!(list.todos[0].completed_at.is_some());

        mutator
            .apply(&mut list, TodoCommand::Toggle { index: 0 }, &env)
            .unwrap();
        assert!(!list.todos[0].completed);
        assert_eq!(list.todos[0].completed_at, None);
    }

    #[test]
    fn toggle_out_of_range_is_an_error() {
        let env = test_env();
        let mut list = groceries(&["Milk"]);
        let err = ListMutator::new()
            .apply(&mut list, TodoCommand::Toggle { index: 1 }, &env)
            .unwrap_err();
        assert_eq!(err, MutationError::IndexOutOfBounds { index: 1, len: 1 });
        assert_eq!(list, groceries(&["Milk"]));
    }

    #[test]
    fn add_appends_uncompleted_todo() {
        let env = test_env();
        let mut list = groceries(&[]);
        let applied = ListMutator::new()
            .apply(
                &mut list,
                TodoCommand::Add {
                    title: "Milk".to_string(),
                },
                &env,
            )
            .unwrap();
        assert_eq!(applied, Applied::Changed);
        assert_eq!(list.todos.len(), 1);
        assert_eq!(list.todos[0].title, "Milk");
        assert!(!list.todos[0].completed);
    }

    #[test]
    fn add_duplicate_title_is_a_structural_no_op() {
        let env = test_env();
        let mutator = ListMutator::new();
        let mut list = groceries(&[]);

        mutator
            .apply(
                &mut list,
                TodoCommand::Add {
                    title: "Milk".to_string(),
                },
                &env,
            )
            .unwrap();
        let before = list.clone();

        let applied = mutator
            .apply(
                &mut list,
                TodoCommand::Add {
                    title: "Milk".to_string(),
                },
                &env,
            )
            .unwrap();
        assert_eq!(applied, Applied::Unchanged);
        assert_eq!(list, before);
        assert_eq!(list.todos.len(), 1);
    }

    #[test]
    fn add_rejects_blank_titles() {
        let env = test_env();
        let mut list = groceries(&[]);
        let err = ListMutator::new()
            .apply(
                &mut list,
                TodoCommand::Add {
                    title: "   ".to_string(),
                },
                &env,
            )
            .unwrap_err();
        assert_eq!(err, MutationError::EmptyTitle);
        assert!(list.todos.is_empty());
    }

    #[test]
    fn add_rejects_oversized_titles() {
        let env = test_env();
        let mut list = groceries(&[]);
        let err = ListMutator::new()
            .apply(
                &mut list,
                TodoCommand::Add {
                    title: "x".repeat(MAX_TITLE_LEN + 1),
                },
                &env,
            )
            .unwrap_err();
        assert!(matches!(err, MutationError::TitleTooLong { .. }));
    }

    #[test]
    fn remove_deletes_by_position() {
        let env = test_env();
        let mut list = groceries(&["Milk", "Eggs", "Bread"]);
        ListMutator::new()
            .apply(&mut list, TodoCommand::Remove { index: 1 }, &env)
            .unwrap();
        assert_eq!(list.todos.len(), 2);
        assert!(!list.contains_title("Eggs"));
        assert_eq!(list.todos[0].title, "Milk");
        assert_eq!(list.todos[1].title, "Bread");
    }

    #[test]
    fn remove_out_of_range_is_an_error() {
        let env = test_env();
        let mut list = groceries(&[]);
        let err = ListMutator::new()
            .apply(&mut list, TodoCommand::Remove { index: 0 }, &env)
            .unwrap_err();
        assert_eq!(err, MutationError::IndexOutOfBounds { index: 0, len: 0 });
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;
        use std::collections::HashSet;

        fn arb_list() -> impl Strategy<Value = TodoList> {
            (
                proptest::collection::hash_set("[a-z]{1,8}", 1..8),
                proptest::collection::vec(any::<bool>(), 8),
            )
                .prop_map(|(titles, flags)| {
                    let now = Utc.with_ymd_and_hms(2024, 12, 31, 0, 0, 0).single().unwrap();
                    let todos = titles
                        .into_iter()
                        .zip(flags)
                        .map(|(title, completed)| {
                            let mut item = TodoItem::new(title, now);
                            if completed {
                                item.complete(now);
                            }
                            item
                        })
                        .collect();
                    TodoList::new(
                        ListId::new("abc123"),
                        Revision::default(),
                        "Groceries".to_string(),
                        Color::default(),
                        todos,
                    )
                })
        }

        proptest! {
            /// Double toggle restores the completion flag (involution).
            #[test]
            fn toggle_twice_restores_completed(list in arb_list(), raw_index in 0usize..8) {
                let env = test_env();
                let mutator = ListMutator::new();
                let index = raw_index % list.todos.len();
                let before = list.todos[index].completed;

                let mut working = list;
                mutator.apply(&mut working, TodoCommand::Toggle { index }, &env).unwrap();
                prop_assert_eq!(working.todos[index].completed, !before);
                mutator.apply(&mut working, TodoCommand::Toggle { index }, &env).unwrap();
                prop_assert_eq!(working.todos[index].completed, before);
            }

            /// A fresh title grows the sequence by one, at the end, uncompleted.
            #[test]
            fn add_fresh_title_appends(list in arb_list(), title in "[A-Z][a-z]{1,8}") {
                prop_assume!(!list.contains_title(&title));
                let env = test_env();
                let before_len = list.todos.len();

                let mut working = list;
                let applied = ListMutator::new()
                    .apply(&mut working, TodoCommand::Add { title: title.clone() }, &env)
                    .unwrap();
                prop_assert_eq!(applied, Applied::Changed);
                prop_assert_eq!(working.todos.len(), before_len + 1);
                let last = &working.todos[before_len];
                prop_assert_eq!(&last.title, &title);
                prop_assert!(!last.completed);
            }

            /// A present title leaves the list structurally identical.
            #[test]
            fn add_present_title_is_identity(list in arb_list(), raw_index in 0usize..8) {
                let env = test_env();
                let index = raw_index % list.todos.len();
                let title = list.todos[index].title.clone();
                let before = list.clone();

                let mut working = list;
                let applied = ListMutator::new()
                    .apply(&mut working, TodoCommand::Add { title }, &env)
                    .unwrap();
                prop_assert_eq!(applied, Applied::Unchanged);
                prop_assert_eq!(working, before);
            }

            /// Removal shrinks the sequence by one and drops that identity.
            #[test]
            fn remove_drops_exactly_one(list in arb_list(), raw_index in 0usize..8) {
                let env = test_env();
                let index = raw_index % list.todos.len();
                let removed_title = list.todos[index].title.clone();
                let before_len = list.todos.len();

                let mut working = list;
                ListMutator::new()
                    .apply(&mut working, TodoCommand::Remove { index }, &env)
                    .unwrap();
                prop_assert_eq!(working.todos.len(), before_len - 1);
                // Titles are unique within a list, so absence of the title
                // means the removed identity is gone.
                prop_assert!(!working.contains_title(&removed_title));
            }

            /// Titles stay unique under any accepted command.
            #[test]
            fn titles_stay_unique(list in arb_list(), title in "[a-z]{1,8}") {
                let env = test_env();
                let mut working = list;
                let _ = ListMutator::new()
                    .apply(&mut working, TodoCommand::Add { title }, &env)
                    .unwrap();
                let mut seen = HashSet::new();
                for todo in &working.todos {
                    prop_assert!(seen.insert(todo.title.clone()));
                }
            }
        }
    }
}
