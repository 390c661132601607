use super::{Catalog, PageStatus};
use crate::models::entry::DEFAULT_CATEGORY;

/// Host-side browsing position: the current category and page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigator {
    category: String,
    page: usize,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(DEFAULT_CATEGORY)
    }
}

impl Navigator {
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            page: 1,
        }
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn page(&self) -> usize {
        self.page
    }

    /// Switching category always starts again at page 1.
    pub fn switch_category(&mut self, category: impl Into<String>) {
        self.category = category.into();
        self.page = 1;
    }

    /// Advances only when the next page has entries. Returns whether it moved.
    pub fn next_page(&mut self, catalog: &Catalog) -> bool {
        if catalog.has_next_page(self.page, &self.category) {
            self.page += 1;
            true
        } else {
            false
        }
    }

    /// Goes back one page, never below page 1. Returns whether it moved.
    pub fn previous_page(&mut self) -> bool {
        if self.page > 1 {
            self.page -= 1;
            true
        } else {
            false
        }
    }

    pub fn status<'a>(&self, catalog: &'a Catalog) -> PageStatus<'a> {
        catalog.page_status(self.page, &self.category)
    }

    pub fn has_next_page(&self, catalog: &Catalog) -> bool {
        catalog.has_next_page(self.page, &self.category)
    }

    /// Moves to the category and page showing the entry titled `title`.
    /// Leaves the position alone when no entry has that title.
    pub fn open_entry(&mut self, catalog: &Catalog, title: &str) -> bool {
        let Some(entry) = catalog.find_by_title(title) else {
            return false;
        };
        let Some(page) = catalog.page_of(entry) else {
            return false;
        };
        self.category = entry.category.clone();
        self.page = page;
        true
    }
}
