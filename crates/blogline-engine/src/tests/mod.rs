use std::path::PathBuf;

use tempfile::TempDir;

use crate::catalog::{Catalog, CatalogSettings, Page, load_catalog_with};
use crate::models::{Entry, LinkTable};
use crate::parsing::{DEFAULT_NO_REASON, ParseOptions, SECTION_SEPARATOR};

/// 2025-01-01T00:00:00Z, the reference time used by tests.
pub const NOW: i64 = 1_735_689_600_000;

pub fn options_at(reference_now: i64) -> ParseOptions {
    ParseOptions {
        reference_now,
        no_reason_text: DEFAULT_NO_REASON.to_string(),
    }
}

/// Joins sections with separator lines, the way authors write the corpus.
pub fn corpus(sections: &[&str]) -> String {
    sections.join(&format!("\n{SECTION_SEPARATOR}\n"))
}

/// Loads a catalog with default settings, counting back from [`NOW`].
pub fn load(text: &str) -> Catalog {
    load_catalog_with(text, &CatalogSettings::default(), &options_at(NOW)).catalog
}

pub fn titles<'a>(page: &Page<'a>) -> Vec<&'a str> {
    page.entries.iter().map(|entry| entry.title.as_str()).collect()
}

pub fn entry_titled(title: &str, index: usize) -> Entry {
    Entry {
        title: title.to_string(),
        category: "current".to_string(),
        date: String::new(),
        timestamp: NOW,
        content: String::new(),
        links: LinkTable::new(),
        index,
    }
}

pub fn create_test_corpus_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp directory")
}

pub fn create_test_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let file_path = dir.path().join(name);
    std::fs::write(&file_path, content).expect("Failed to write test file");
    file_path
}
