//! Page model.

use serde::{Deserialize, Serialize};

/// One page of items plus its position in the ordered source.
///
/// `bottom_index` and `top_index` are 1-based and inclusive. For any page with
/// items, `top_index - bottom_index + 1 == items.len()`. A source with no
/// items produces `Page::default()`, where every numeric field is zero.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items in this page, in source order
    pub items: Vec<T>,
    /// Position of the first item
    pub bottom_index: u64,
    /// Position of the last item
    pub top_index: u64,
    /// Requested page size (the last page may hold fewer items)
    pub page_size: u64,
    /// 1-based page number
    pub page_number: u64,
    /// Number of pages in the source
    pub total_pages: u64,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            bottom_index: 0,
            top_index: 0,
            page_size: 0,
            page_number: 0,
            total_pages: 0,
        }
    }
}

impl<T> Page<T> {
    /// Returns true if a page follows this one.
    pub fn has_next(&self) -> bool {
        self.page_number < self.total_pages
    }

    /// Returns the next page number, or the last page number if there is none.
    pub fn next(&self) -> u64 {
        if self.has_next() {
            self.page_number + 1
        } else {
            self.total_pages
        }
    }

    /// Returns true if a page precedes this one.
    pub fn has_previous(&self) -> bool {
        self.page_number > 1
    }

    /// Returns the previous page number, or 1 if there is none.
    pub fn previous(&self) -> u64 {
        if self.has_previous() {
            self.page_number - 1
        } else {
            1
        }
    }

    /// Returns true if the page holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the number of items in the page.
    pub fn len(&self) -> usize {
        self.items.len()
    }
}
