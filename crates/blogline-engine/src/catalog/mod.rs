//! The parsed catalog and the views served from it.

pub mod cache;
pub mod navigator;
pub mod source;

use serde::{Deserialize, Serialize};

use crate::models::Entry;
use crate::parsing::{DEFAULT_NO_REASON, ParseOptions, ParseWarning, parse_corpus};

pub use cache::{CatalogCache, CatalogError};
pub use navigator::Navigator;
pub use source::{CorpusSource, FileSource, TextSource};

/// Entries per page in the reference deployment.
pub const DEFAULT_PAGE_SIZE: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSettings {
    pub page_size: usize,
    pub no_reason_text: String,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            no_reason_text: DEFAULT_NO_REASON.to_string(),
        }
    }
}

/// Every entry of one corpus load, in corpus order. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<Entry>,
    page_size: usize,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(vec![], DEFAULT_PAGE_SIZE)
    }
}

/// A sorted, size-bounded slice of one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<'a> {
    pub number: usize,
    pub entries: Vec<&'a Entry>,
}

impl Page<'_> {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// What the host should show for a page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageStatus<'a> {
    Ready(Page<'a>),
    /// The category has no entries at all.
    NoEntries,
    /// The category has entries, but not this many pages.
    PastEnd,
}

#[derive(Debug, Default)]
pub struct LoadReport {
    pub catalog: Catalog,
    pub warnings: Vec<ParseWarning>,
}

impl Catalog {
    pub fn new(entries: Vec<Entry>, page_size: usize) -> Self {
        Self {
            entries,
            page_size: page_size.max(1),
        }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Category tags in order of first appearance.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = vec![];
        for entry in &self.entries {
            if !seen.contains(&entry.category.as_str()) {
                seen.push(&entry.category);
            }
        }
        seen
    }

    /// Entries of `category`, newest first. Equal timestamps keep corpus order.
    fn sorted(&self, category: &str) -> Vec<&Entry> {
        let mut entries: Vec<&Entry> = self
            .entries
            .iter()
            .filter(|entry| entry.category == category)
            .collect();
        entries.sort_by(|a, b| {
            b.timestamp
                .cmp(&a.timestamp)
                .then_with(|| a.index.cmp(&b.index))
        });
        entries
    }

    /// Page `number` (1-based) of `category`. Empty past the end, and for
    /// page 0.
    pub fn get_page(&self, number: usize, category: &str) -> Page<'_> {
        let entries = match number.checked_sub(1) {
            Some(skip) => self
                .sorted(category)
                .into_iter()
                .skip(skip.saturating_mul(self.page_size))
                .take(self.page_size)
                .collect(),
            None => vec![],
        };

        Page { number, entries }
    }

    pub fn has_next_page(&self, number: usize, category: &str) -> bool {
        !self.get_page(number.saturating_add(1), category).is_empty()
    }

    pub fn page_count(&self, category: &str) -> usize {
        let count = self
            .entries
            .iter()
            .filter(|entry| entry.category == category)
            .count();
        count.div_ceil(self.page_size)
    }

    pub fn page_status(&self, number: usize, category: &str) -> PageStatus<'_> {
        let page = self.get_page(number, category);
        if !page.is_empty() {
            PageStatus::Ready(page)
        } else if self.entries.iter().any(|entry| entry.category == category) {
            PageStatus::PastEnd
        } else {
            PageStatus::NoEntries
        }
    }

    /// Looks up an entry by exact title, as used for cross-reference
    /// navigation.
    pub fn find_by_title(&self, title: &str) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.title == title)
    }

    /// The page of its own category that shows `entry`.
    pub fn page_of(&self, entry: &Entry) -> Option<usize> {
        self.sorted(&entry.category)
            .iter()
            .position(|e| e.index == entry.index)
            .map(|position| position / self.page_size + 1)
    }
}

/// Parses `raw` into a catalog, counting undated entries back from now.
pub fn load_catalog(raw: &str, settings: &CatalogSettings) -> LoadReport {
    let options = ParseOptions {
        no_reason_text: settings.no_reason_text.clone(),
        ..ParseOptions::default()
    };
    load_catalog_with(raw, settings, &options)
}

pub fn load_catalog_with(
    raw: &str,
    settings: &CatalogSettings,
    options: &ParseOptions,
) -> LoadReport {
    let parsed = parse_corpus(raw, options);
    log::info!(
        "Loaded {} entries ({} warnings)",
        parsed.entries.len(),
        parsed.warnings.len()
    );

    LoadReport {
        catalog: Catalog::new(parsed.entries, settings.page_size),
        warnings: parsed.warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{NOW, corpus, load, titles};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn alpha_beta() -> Catalog {
        load(&corpus(&[
            "[POST]\ntitle: Alpha\ntype: current\n\nFirst.",
            "[POST]\ntitle: Beta\ntype: archived\ndate: 2023-01-01\n\nSecond.",
        ]))
    }

    fn numbered(count: usize) -> Catalog {
        let sections: Vec<String> = (0..count)
            .map(|i| format!("[POST]\ntitle: Post {i}\n\nBody {i}"))
            .collect();
        let sections: Vec<&str> = sections.iter().map(String::as_str).collect();
        load(&corpus(&sections))
    }

    #[test]
    fn filters_by_category() {
        let catalog = alpha_beta();
        assert_eq!(titles(&catalog.get_page(1, "current")), vec!["Alpha"]);
        assert_eq!(titles(&catalog.get_page(1, "archived")), vec!["Beta"]);
        assert!(catalog.get_page(2, "current").is_empty());
        assert!(catalog.get_page(1, "Current").is_empty());
    }

    #[test]
    fn undated_entries_sort_by_corpus_order() {
        let catalog = numbered(3);
        assert_eq!(
            titles(&catalog.get_page(1, "current")),
            vec!["Post 0", "Post 1", "Post 2"]
        );
    }

    #[test]
    fn explicit_dates_sort_newest_first_and_ties_keep_corpus_order() {
        let catalog = load(&corpus(&[
            "[POST]\ntitle: Old\ndate: 2020-01-01\n\nx",
            "[POST]\ntitle: Tie A\ndate: 2022-06-01\n\nx",
            "[POST]\ntitle: New\ndate: 2023-01-01\n\nx",
            "[POST]\ntitle: Tie B\ndate: 2022-06-01\n\nx",
        ]));
        let catalog = Catalog::new(catalog.entries().to_vec(), 10);
        assert_eq!(
            titles(&catalog.get_page(1, "current")),
            vec!["New", "Tie A", "Tie B", "Old"]
        );
    }

    #[test]
    fn dated_and_undated_entries_interleave_by_timestamp() {
        // Undated entries count back from NOW, far after 2020.
        let catalog = load(&corpus(&[
            "[POST]\ntitle: Dated\ndate: 2020-01-01\n\nx",
            "[POST]\ntitle: Undated\n\nx",
        ]));
        assert_eq!(titles(&catalog.get_page(1, "current")), vec!["Undated", "Dated"]);
        assert!(catalog.entries()[1].timestamp < NOW);
    }

    #[rstest]
    #[case(1, vec!["Post 0", "Post 1", "Post 2"])]
    #[case(2, vec!["Post 3", "Post 4", "Post 5"])]
    #[case(3, vec!["Post 6"])]
    #[case(4, vec![])]
    #[case(0, vec![])]
    fn paginates_in_pages_of_three(#[case] number: usize, #[case] expected: Vec<&str>) {
        let catalog = numbered(7);
        assert_eq!(titles(&catalog.get_page(number, "current")), expected);
    }

    #[test]
    fn has_next_page_looks_one_page_ahead() {
        let catalog = numbered(4);
        assert!(catalog.has_next_page(1, "current"));
        assert!(!catalog.has_next_page(2, "current"));
        assert!(!catalog.has_next_page(1, "archived"));
    }

    #[test]
    fn get_page_is_idempotent() {
        let catalog = numbered(5);
        assert_eq!(catalog.get_page(2, "current"), catalog.get_page(2, "current"));
    }

    #[test]
    fn page_count_rounds_up() {
        let catalog = numbered(7);
        assert_eq!(catalog.page_count("current"), 3);
        assert_eq!(catalog.page_count("archived"), 0);
    }

    #[test]
    fn page_status_distinguishes_empty_category_from_past_end() {
        let catalog = alpha_beta();
        assert!(matches!(catalog.page_status(1, "current"), PageStatus::Ready(_)));
        assert_eq!(catalog.page_status(2, "current"), PageStatus::PastEnd);
        assert_eq!(catalog.page_status(1, "drafts"), PageStatus::NoEntries);
    }

    #[test]
    fn categories_in_first_appearance_order() {
        let catalog = load(&corpus(&[
            "[POST]\ntitle: A\ntype: archived\n\nx",
            "[POST]\ntitle: B\n\nx",
            "[POST]\ntitle: C\ntype: archived\n\nx",
        ]));
        assert_eq!(catalog.categories(), vec!["archived", "current"]);
    }

    #[test]
    fn zero_page_size_is_clamped() {
        let catalog = Catalog::new(numbered(2).entries().to_vec(), 0);
        assert_eq!(catalog.page_size(), 1);
        assert_eq!(titles(&catalog.get_page(2, "current")), vec!["Post 1"]);
    }

    #[test]
    fn load_catalog_reports_warnings() {
        let report = load_catalog(
            &corpus(&["[POST]\ntitle: Fine\n\nx", "missing header"]),
            &CatalogSettings::default(),
        );
        assert_eq!(report.catalog.len(), 1);
        assert_eq!(report.warnings, vec![ParseWarning::MissingHeader { section: 1 }]);
    }

    #[test]
    fn default_catalog_is_empty_with_default_page_size() {
        let catalog = Catalog::default();
        assert_eq!(catalog.page_size(), DEFAULT_PAGE_SIZE);
        assert_eq!(catalog.page_count("current"), 0);
        assert!(!catalog.has_next_page(1, "current"));
        assert_eq!(catalog.page_status(1, "current"), PageStatus::NoEntries);

        let report = LoadReport::default();
        assert_eq!(report.catalog.page_count("current"), 0);
    }

    #[test]
    fn page_of_locates_entry_in_sorted_category() {
        let catalog = numbered(5);
        let oldest = catalog.find_by_title("Post 4").unwrap();
        let newest = catalog.find_by_title("Post 0").unwrap();
        assert_eq!(catalog.page_of(oldest), Some(2));
        assert_eq!(catalog.page_of(newest), Some(1));
    }

    #[test]
    fn find_by_title_is_exact() {
        let catalog = alpha_beta();
        assert_eq!(catalog.find_by_title("Beta").map(|e| e.index), Some(1));
        assert!(catalog.find_by_title("beta").is_none());
    }
}
