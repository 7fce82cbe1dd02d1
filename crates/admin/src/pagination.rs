//! Search and pagination for the dashboard tables.
//!
//! Tables are filtered client-side by a case-insensitive substring search
//! and shown ten rows at a time. Page numbers start at 1.

use serde::Serialize;

/// Rows per table page.
pub const PAGE_SIZE: usize = 10;

/// A row type that can be matched by the table search box.
pub trait Searchable {
    /// Whether the row matches `needle`, which is already lowercased and
    /// non-empty.
    fn matches(&self, needle: &str) -> bool;
}

/// Case-insensitive substring test used by [`Searchable`] impls.
#[must_use]
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// One page of filtered rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    /// Rows on this page, at most [`PAGE_SIZE`].
    pub items: Vec<T>,
    /// Requested page number (1-based).
    pub page: usize,
    /// Number of pages of the filtered rows.
    pub total_pages: usize,
    /// Number of rows matching the search.
    pub total_items: usize,
}

impl<T> Page<T> {
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.page > 1
    }

    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Filter `items` by `term` and cut out page `page`.
///
/// A blank term matches every row. A page outside `1..=total_pages` yields
/// an empty page that still reports the totals.
#[must_use]
pub fn filter_and_paginate<T>(items: &[T], term: &str, page: usize) -> Page<T>
where
    T: Searchable + Clone,
{
    let needle = term.trim().to_lowercase();
    let filtered: Vec<&T> = items
        .iter()
        .filter(|item| needle.is_empty() || item.matches(&needle))
        .collect();

    let total_items = filtered.len();
    let total_pages = total_items.div_ceil(PAGE_SIZE);

    let items = match page.checked_sub(1) {
        Some(index) => filtered
            .into_iter()
            .skip(index.saturating_mul(PAGE_SIZE))
            .take(PAGE_SIZE)
            .cloned()
            .collect(),
        None => Vec::new(),
    };

    Page {
        items,
        page,
        total_pages,
        total_items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Row(String);

    impl Searchable for Row {
        fn matches(&self, needle: &str) -> bool {
            contains_ignore_case(&self.0, needle)
        }
    }

    fn rows(n: usize) -> Vec<Row> {
        (1..=n).map(|i| Row(format!("Item {i}"))).collect()
    }

    #[test]
    fn test_first_and_last_page() {
        let rows = rows(25);

        let first = filter_and_paginate(&rows, "", 1);
        assert_eq!(first.items.len(), 10);
        assert_eq!(first.items[0], Row("Item 1".to_string()));
        assert_eq!(first.total_pages, 3);
        assert_eq!(first.total_items, 25);
        assert!(!first.has_previous());
        assert!(first.has_next());

        let last = filter_and_paginate(&rows, "", 3);
        assert_eq!(last.items.len(), 5);
        assert_eq!(last.items[0], Row("Item 21".to_string()));
        assert!(last.has_previous());
        assert!(!last.has_next());
    }

    #[test]
    fn test_out_of_range_pages_are_empty() {
        let rows = rows(12);
        assert!(filter_and_paginate(&rows, "", 0).items.is_empty());
        let beyond = filter_and_paginate(&rows, "", 3);
        assert!(beyond.items.is_empty());
        assert_eq!(beyond.total_pages, 2);
        assert!(filter_and_paginate(&rows, "", usize::MAX).items.is_empty());
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let rows = vec![
            Row("MacBook Pro".to_string()),
            Row("iPhone".to_string()),
            Row("Magic Mouse".to_string()),
        ];
        let page = filter_and_paginate(&rows, "  MAC ", 1);
        assert_eq!(page.total_items, 1);
        assert_eq!(page.items[0].0, "MacBook Pro");

        let page = filter_and_paginate(&rows, "ma", 1);
        assert_eq!(page.total_items, 2);
    }

    #[test]
    fn test_no_rows() {
        let page = filter_and_paginate::<Row>(&[], "x", 1);
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 0);
        assert!(!page.has_next());
    }
}
