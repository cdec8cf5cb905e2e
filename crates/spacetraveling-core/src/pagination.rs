//! Cursor-driven page accumulation.
//!
//! A [`PaginationState`] holds every item fetched so far, in API order, and
//! the cursor of the next page. New pages are appended with
//! [`PaginationState::merge`]; there is no dedup pass and no re-sorting.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Opaque token identifying the next page of results.
///
/// Never empty: blank tokens are treated as "no next page".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
    /// Wrap a raw token. Returns `None` for empty or whitespace-only input.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            None
        } else {
            Some(Self(raw))
        }
    }

    /// Normalize an optional raw token.
    pub fn from_optional(raw: Option<String>) -> Option<Self> {
        raw.and_then(Self::new)
    }

    /// The raw token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn deserialize_cursor<'de, D>(deserializer: D) -> Result<Option<Cursor>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(Cursor::from_optional(raw))
}

/// One page of results as returned by a content source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items in API order.
    pub items: Vec<T>,

    /// Cursor of the following page, `None` on the last page.
    #[serde(default, deserialize_with = "deserialize_cursor")]
    pub next_cursor: Option<Cursor>,
}

impl<T> Page<T> {
    /// Create a page.
    pub fn new(items: Vec<T>, next_cursor: Option<Cursor>) -> Self {
        Self { items, next_cursor }
    }

    /// Create a terminal page.
    pub fn last(items: Vec<T>) -> Self {
        Self::new(items, None)
    }

    /// Convert every item, keeping the cursor.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            next_cursor: self.next_cursor,
        }
    }
}

/// Accumulated items plus the cursor to the next page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationState<T> {
    items: Vec<T>,
    next_cursor: Option<Cursor>,
}

impl<T> Default for PaginationState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            next_cursor: None,
        }
    }
}

impl<T> PaginationState<T> {
    /// Start from the first page.
    pub fn seed(first: Page<T>) -> Self {
        Self {
            items: first.items,
            next_cursor: first.next_cursor,
        }
    }

    /// Append `page` to the accumulated items and take over its cursor.
    #[must_use]
    pub fn merge(mut self, page: Page<T>) -> Self {
        self.items.extend(page.items);
        self.next_cursor = page.next_cursor;
        self
    }

    /// Items fetched so far.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Cursor of the next page.
    pub fn next_cursor(&self) -> Option<&Cursor> {
        self.next_cursor.as_ref()
    }

    /// Whether another page can be fetched.
    pub fn has_more(&self) -> bool {
        self.next_cursor.is_some()
    }

    /// Number of accumulated items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether no items were fetched.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Consume the state, returning the items.
    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cursor(raw: &str) -> Option<Cursor> {
        Cursor::new(raw)
    }

    #[test]
    fn test_merge_appends_and_replaces_cursor() {
        let state = PaginationState::seed(Page::new(vec!["A"], cursor("p2")));
        assert!(state.has_more());

        let state = state.merge(Page::last(vec!["B"]));

        assert_eq!(state.items(), ["A", "B"]);
        assert!(state.next_cursor().is_none());
        assert!(!state.has_more());
    }

    #[test]
    fn test_merge_keeps_duplicates_and_order() {
        let state = PaginationState::seed(Page::new(vec![3, 1], cursor("p2")))
            .merge(Page::new(vec![1, 2], cursor("p3")))
            .merge(Page::last(vec![0]));

        assert_eq!(state.items(), [3, 1, 1, 2, 0]);
    }

    #[test]
    fn test_length_is_sum_of_page_sizes() {
        let sizes = [2usize, 0, 5, 1, 3];
        let mut state = PaginationState::<usize>::default();
        for (n, size) in sizes.iter().enumerate() {
            state = state.merge(Page::new((0..*size).collect(), cursor(&format!("p{n}"))));
        }

        assert_eq!(state.len(), sizes.iter().sum::<usize>());
    }

    #[test]
    fn test_empty_cursor_is_terminal() {
        assert!(Cursor::new("").is_none());
        assert!(Cursor::new("   ").is_none());
        assert!(Cursor::from_optional(None).is_none());

        let page: Page<u8> = serde_json::from_str(r#"{"items":[],"next_cursor":""}"#).unwrap();
        assert!(page.next_cursor.is_none());
    }

    #[test]
    fn test_page_deserializes_missing_and_null_cursor() {
        let missing: Page<u8> = serde_json::from_str(r#"{"items":[1]}"#).unwrap();
        assert!(missing.next_cursor.is_none());

        let null: Page<u8> = serde_json::from_str(r#"{"items":[1],"next_cursor":null}"#).unwrap();
        assert!(null.next_cursor.is_none());

        let some: Page<u8> =
            serde_json::from_str(r#"{"items":[1],"next_cursor":"https://x/p2"}"#).unwrap();
        assert_eq!(some.next_cursor.unwrap().as_str(), "https://x/p2");
    }

    #[test]
    fn test_page_map_keeps_cursor() {
        let page = Page::new(vec![1, 2], cursor("p2")).map(|n| n * 10);
        assert_eq!(page.items, vec![10, 20]);
        assert_eq!(page.next_cursor, cursor("p2"));
    }
}
