//! # Pagination
//!
//! Page/page-size tracking with one rule that matters: the current page is never left
//! pointing past the end of the filtered collection.

use serde::{Deserialize, Serialize};

/// One page of a filtered collection, ready for the table and the pagination bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

/// Current page (1-based) and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageState {
    pub page: usize,
    pub page_size: usize,
}

#[derive(Debug, Clone)]
pub struct PaginationController {
    state: PageState,
    total_items: usize,
}

impl PaginationController {
    /// A size of zero is raised to one.
    pub fn new(page_size: usize) -> Self {
        Self {
            state: PageState {
                page: 1,
                page_size: page_size.max(1),
            },
            total_items: 0,
        }
    }

    pub fn state(&self) -> PageState {
        self.state
    }

    pub fn page(&self) -> usize {
        self.state.page
    }

    pub fn page_size(&self) -> usize {
        self.state.page_size
    }

    pub fn total_items(&self) -> usize {
        self.total_items
    }

    pub fn total_pages(&self) -> usize {
        pages_for(self.total_items, self.state.page_size).max(1)
    }

    /// Navigate to `n`. Out-of-range requests (from a stale pagination bar) are ignored.
    ///
    /// Returns whether the request was accepted.
    pub fn set_page(&mut self, n: usize) -> bool {
        if n < 1 || n > self.total_pages() {
            return false;
        }
        self.state.page = n;
        true
    }

    /// Change density. Always returns to the first page.
    pub fn set_page_size(&mut self, n: usize) {
        self.state.page_size = n.max(1);
        self.state.page = 1;
    }

    /// Record the new filtered length and pull the page back to 1 if it now dangles.
    pub fn reconcile(&mut self, filtered_len: usize) {
        self.total_items = filtered_len;
        if self.state.page > pages_for(filtered_len, self.state.page_size) {
            self.state.page = 1;
        }
    }

    /// 1-based index of the first row on the page, or 0 when there are no rows.
    pub fn start_item(&self) -> usize {
        if self.total_items == 0 {
            0
        } else {
            (self.state.page - 1) * self.state.page_size + 1
        }
    }

    /// 1-based index of the last row on the page, or 0 when there are no rows.
    pub fn end_item(&self) -> usize {
        if self.total_items == 0 {
            0
        } else {
            (self.state.page * self.state.page_size).min(self.total_items)
        }
    }

    /// Reconcile against `filtered` and cut out the current page.
    pub fn slice<T: Clone>(&mut self, filtered: &[T]) -> Page<T> {
        self.reconcile(filtered.len());
        let offset = (self.state.page - 1) * self.state.page_size;
        let items = filtered
            .iter()
            .skip(offset)
            .take(self.state.page_size)
            .cloned()
            .collect();
        Page {
            items,
            page: self.state.page,
            total_pages: self.total_pages(),
            total_items: self.total_items,
        }
    }
}

impl Default for PaginationController {
    fn default() -> Self {
        Self::new(10)
    }
}

fn pages_for(total_items: usize, page_size: usize) -> usize {
    total_items.div_ceil(page_size.max(1))
}
