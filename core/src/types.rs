//! Domain types for per-user todo lists.
//!
//! A user owns a collection of [`TodoList`] documents. Each list carries a
//! display name, a color drawn from a palette, and an insertion-ordered
//! sequence of [`TodoItem`]s. Lists are persisted as whole documents keyed by
//! a store-assigned [`ListId`] and guarded by a [`Revision`] token for
//! optimistic concurrency.
//!
//! A list that has not been persisted yet has no id. That transient state is
//! its own type, [`ListDraft`], so an unpersisted list can never be passed to
//! an operation that requires an id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error type for [`UserId`] parsing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid user ID: {0}")]
pub struct ParseUserIdError(String);

/// Opaque identifier for a signed-in user.
///
/// Issued once by the identity provider at session start. Every store
/// operation is namespaced by it: a list belongs to exactly one user by
/// virtue of living under that user's collection.
///
/// # Validation
///
/// - `FromStr::from_str()`: Validates input (rejects empty strings)
/// - `From::from()` and `new()`: No validation (for internal use with trusted input)
///
/// # Examples
///
/// ```
/// use listsync_core::types::UserId;
///
/// let user = UserId::new("anon-4f2c");
/// assert_eq!(user.as_str(), "anon-4f2c");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(String);

impl UserId {
    /// Create a new `UserId` from a string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the user ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert the `UserId` into its inner `String`.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = ParseUserIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ParseUserIdError("User ID cannot be empty".to_string()));
        }
        Ok(Self(s.to_string()))
    }
}

impl From<String> for UserId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Store-assigned identifier for a persisted todo list.
///
/// Assigned by the list store on creation and immutable thereafter. A list
/// without an id does not exist as a `TodoList` at all; see [`ListDraft`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListId(String);

impl ListId {
    /// Create a new `ListId` from a string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the list ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert the `ListId` into its inner `String`.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ListId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ListId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Optimistic concurrency token for a list document.
///
/// Starts at 0 when the document is created and advances by exactly one on
/// every successful overwrite. An overwrite that presents a stale revision is
/// rejected by the store, turning a silent lost update into a detected
/// conflict.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Revision(u64);

impl Revision {
    /// Create a revision from a raw counter value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// The raw counter value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// The revision that follows this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error type for [`Color`] parsing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid color: {0}")]
pub struct ParseColorError(String);

/// A list color in `#RRGGBB` form.
///
/// Construction validates the format; [`Color::palette`] is the fixed set of
/// choices presentation layers offer when creating a list. Any well-formed
/// hex color round-trips through serialization unchanged.
///
/// # Examples
///
/// ```
/// use listsync_core::types::Color;
///
/// let teal = Color::from_hex("#24A6D9").unwrap();
/// assert_eq!(teal.as_hex(), "#24A6D9");
/// assert!(Color::from_hex("teal").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(String);

/// The default palette offered when creating a list.
const PALETTE_HEX: [&str; 7] = [
    "#5CD859", "#24A6D9", "#595BD9", "#8022D9", "#D159D8", "#D85963", "#D88559",
];

impl Color {
    /// Parse a color from `#RRGGBB` notation.
    ///
    /// # Errors
    ///
    /// Returns [`ParseColorError`] if the input is not a `#` followed by six
    /// hexadecimal digits.
    pub fn from_hex(hex: &str) -> Result<Self, ParseColorError> {
        let digits = hex
            .strip_prefix('#')
            .ok_or_else(|| ParseColorError(format!("expected leading '#' in {hex:?}")))?;
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ParseColorError(format!(
                "expected six hex digits in {hex:?}"
            )));
        }
        Ok(Self(hex.to_ascii_uppercase()))
    }

    /// The color in `#RRGGBB` notation.
    #[must_use]
    pub fn as_hex(&self) -> &str {
        &self.0
    }

    /// The fixed palette of list colors, in presentation order.
    ///
    /// # Panics
    ///
    /// Never panics: every palette entry is well-formed hex.
    #[must_use]
    #[allow(clippy::missing_panics_doc, clippy::unwrap_used)]
    pub fn palette() -> Vec<Self> {
        PALETTE_HEX
            .iter()
            .map(|hex| Self::from_hex(hex).unwrap())
            .collect()
    }
}

impl Default for Color {
    /// The first palette entry, matching the pre-selected swatch in the
    /// list-creation flow.
    fn default() -> Self {
        Self(PALETTE_HEX[0].to_string())
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Color {
    type Error = ParseColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.0
    }
}

/// A single todo item inside a list.
///
/// Items have no identity of their own beyond their position and title inside
/// the owning list; they are created, toggled, and removed only through
/// list-level operations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    /// Title of the todo. Unique within the owning list.
    pub title: String,
    /// Whether the todo is completed.
    pub completed: bool,
    /// When the todo was created.
    pub created_at: DateTime<Utc>,
    /// When the todo was completed (if completed).
    pub completed_at: Option<DateTime<Utc>>,
}

impl TodoItem {
    /// Creates a new, uncompleted todo item.
    #[must_use]
    pub const fn new(title: String, created_at: DateTime<Utc>) -> Self {
        Self {
            title,
            completed: false,
            created_at,
            completed_at: None,
        }
    }

    /// Marks the todo as completed.
    pub fn complete(&mut self, completed_at: DateTime<Utc>) {
        self.completed = true;
        self.completed_at = Some(completed_at);
    }

    /// Marks the todo as not completed.
    pub fn reopen(&mut self) {
        self.completed = false;
        self.completed_at = None;
    }
}

/// A persisted, named, colored collection of todos owned by one user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoList {
    /// Store-assigned identifier.
    pub id: ListId,
    /// Optimistic concurrency token; see [`Revision`].
    pub revision: Revision,
    /// Display name. Non-empty.
    pub name: String,
    /// List color.
    pub color: Color,
    /// Todos in insertion order.
    pub todos: Vec<TodoItem>,
}

impl TodoList {
    /// Assemble a list from its parts.
    #[must_use]
    pub const fn new(
        id: ListId,
        revision: Revision,
        name: String,
        color: Color,
        todos: Vec<TodoItem>,
    ) -> Self {
        Self {
            id,
            revision,
            name,
            color,
            todos,
        }
    }

    /// Number of completed todos.
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.todos.iter().filter(|t| t.completed).count()
    }

    /// Number of todos still open.
    #[must_use]
    pub fn remaining_count(&self) -> usize {
        self.todos.len() - self.completed_count()
    }

    /// Whether any todo already carries this exact title.
    #[must_use]
    pub fn contains_title(&self, title: &str) -> bool {
        self.todos.iter().any(|t| t.title == title)
    }
}

/// A list that has not been persisted yet.
///
/// Drafts have no id and no revision; the store assigns both on creation.
/// This is the only input type [`crate::store::ListStore::create`] accepts,
/// which makes "update or delete an unpersisted list" unrepresentable.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListDraft {
    /// Display name for the new list.
    pub name: String,
    /// Color for the new list.
    pub color: Color,
    /// Initial todos. Empty in the normal creation flow.
    pub todos: Vec<TodoItem>,
}

impl ListDraft {
    /// Creates a draft with an empty todo sequence.
    #[must_use]
    pub const fn new(name: String, color: Color) -> Self {
        Self {
            name,
            color,
            todos: Vec::new(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn user_id_rejects_empty_on_parse() {
        assert!("".parse::<UserId>().is_err());
        assert_eq!("u1".parse::<UserId>().unwrap(), UserId::new("u1"));
    }

    #[test]
    fn revision_next_advances_by_one() {
        let rev = Revision::default();
        assert_eq!(rev.get(), 0);
        assert_eq!(rev.next(), Revision::new(1));
    }

    #[test]
    fn color_parses_and_normalizes_case() {
        let color = Color::from_hex("#d85963").unwrap();
        assert_eq!(color.as_hex(), "#D85963");
    }

    #[test]
    fn color_rejects_malformed_input() {
        assert!(Color::from_hex("D85963").is_err());
        assert!(Color::from_hex("#D8596").is_err());
        assert!(Color::from_hex("#D8596Z").is_err());
    }

    #[test]
    fn color_palette_has_seven_distinct_entries() {
        let palette = Color::palette();
        assert_eq!(palette.len(), 7);
        for (i, a) in palette.iter().enumerate() {
            for b in &palette[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert_eq!(Color::default(), palette[0]);
    }

    #[test]
    fn color_serde_round_trips_as_hex_string() {
        let color = Color::from_hex("#FF0000").unwrap();
        let json = serde_json::to_string(&color).unwrap();
        assert_eq!(json, "\"#FF0000\"");
        let back: Color = serde_json::from_str(&json).unwrap();
        assert_eq!(back, color);
    }

    #[test]
    fn color_serde_rejects_malformed_string() {
        assert!(serde_json::from_str::<Color>("\"red\"").is_err());
    }

    #[test]
    fn todo_item_complete_and_reopen() {
        let created = Utc::now();
        let mut item = TodoItem::new("Milk".to_string(), created);
        assert!(!item.completed);
        assert_eq!(item.completed_at, None);

        let completed = Utc::now();
        item.complete(completed);
        assert!(item.completed);
        assert_eq!(item.completed_at, Some(completed));

        item.reopen();
        assert!(!item.completed);
        assert_eq!(item.completed_at, None);
    }

    #[test]
    fn list_counts_stay_consistent() {
        let now = Utc::now();
        let mut list = TodoList::new(
            ListId::new("l1"),
            Revision::default(),
            "Groceries".to_string(),
            Color::default(),
            vec![
                TodoItem::new("Milk".to_string(), now),
                TodoItem::new("Eggs".to_string(), now),
            ],
        );
        assert_eq!(list.completed_count(), 0);
        assert_eq!(list.remaining_count(), 2);

        list.todos[0].complete(now);
        assert_eq!(list.completed_count(), 1);
        assert_eq!(list.remaining_count(), 1);
        assert_eq!(list.completed_count() + list.remaining_count(), list.todos.len());
    }

    #[test]
    fn draft_starts_with_no_todos() {
        let draft = ListDraft::new("Groceries".to_string(), Color::default());
        assert!(draft.todos.is_empty());
    }

    #[test]
    fn list_document_serde_round_trip() {
        let list = TodoList::new(
            ListId::new("abc123"),
            Revision::new(3),
            "Groceries".to_string(),
            Color::from_hex("#FF0000").unwrap(),
            vec![TodoItem::new("Milk".to_string(), Utc::now())],
        );
        let json = serde_json::to_string(&list).unwrap();
        let back: TodoList = serde_json::from_str(&json).unwrap();
        assert_eq!(back, list);
    }
}
