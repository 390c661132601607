use std::sync::Arc;

use crate::parsing::{ParseOptions, ParseWarning};

use super::{Catalog, CatalogSettings, CorpusSource, Page, load_catalog_with};

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to fetch corpus from {0}: {1}")]
    Fetch(String, anyhow::Error),

    #[error("Catalog has not been loaded")]
    NotLoaded,
}

/// Single-writer cache of the parsed catalog.
///
/// The catalog is built on first access and kept until [`invalidate`] or
/// [`reload`] is called. A failed load leaves the cache empty.
///
/// [`invalidate`]: CatalogCache::invalidate
/// [`reload`]: CatalogCache::reload
pub struct CatalogCache<S: CorpusSource> {
    source: S,
    settings: CatalogSettings,
    /// Fixed reference time for undated entries; `None` means "now" at load.
    reference_now: Option<i64>,
    catalog: Option<Arc<Catalog>>,
    warnings: Vec<ParseWarning>,
}

impl<S: CorpusSource> CatalogCache<S> {
    pub fn new(source: S, settings: CatalogSettings) -> Self {
        Self {
            source,
            settings,
            reference_now: None,
            catalog: None,
            warnings: vec![],
        }
    }

    /// Pins the reference time used to date undated entries.
    pub fn with_reference_now(mut self, reference_now: i64) -> Self {
        self.reference_now = Some(reference_now);
        self
    }

    /// Returns the cached catalog, loading it from the source if needed.
    pub fn catalog(&mut self) -> Result<Arc<Catalog>, CatalogError> {
        if let Some(catalog) = &self.catalog {
            return Ok(Arc::clone(catalog));
        }
        self.load()
    }

    /// The cached catalog, without triggering a load.
    pub fn cached(&self) -> Option<&Arc<Catalog>> {
        self.catalog.as_ref()
    }

    /// Warnings from the most recent successful load.
    pub fn warnings(&self) -> &[ParseWarning] {
        &self.warnings
    }

    pub fn invalidate(&mut self) {
        if self.catalog.take().is_some() {
            log::debug!("Invalidated catalog for {}", self.source.describe());
        }
        self.warnings.clear();
    }

    /// Discards the cached catalog and loads a fresh one.
    pub fn reload(&mut self) -> Result<Arc<Catalog>, CatalogError> {
        self.invalidate();
        log::info!("Reloading corpus from {}", self.source.describe());
        self.load()
    }

    pub fn get_page(&self, number: usize, category: &str) -> Result<Page<'_>, CatalogError> {
        let catalog = self.catalog.as_deref().ok_or(CatalogError::NotLoaded)?;
        Ok(catalog.get_page(number, category))
    }

    pub fn has_next_page(&self, number: usize, category: &str) -> Result<bool, CatalogError> {
        let catalog = self.catalog.as_deref().ok_or(CatalogError::NotLoaded)?;
        Ok(catalog.has_next_page(number, category))
    }

    fn load(&mut self) -> Result<Arc<Catalog>, CatalogError> {
        log::debug!("Fetching corpus from {}", self.source.describe());
        let raw = self
            .source
            .fetch()
            .map_err(|e| CatalogError::Fetch(self.source.describe(), e))?;

        let mut options = ParseOptions {
            no_reason_text: self.settings.no_reason_text.clone(),
            ..ParseOptions::default()
        };
        if let Some(reference_now) = self.reference_now {
            options.reference_now = reference_now;
        }

        let report = load_catalog_with(&raw, &self.settings, &options);
        let catalog = Arc::new(report.catalog);
        self.catalog = Some(Arc::clone(&catalog));
        self.warnings = report.warnings;
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{FileSource, TextSource};
    use crate::tests::{NOW, corpus, create_test_corpus_dir, create_test_file, titles};
    use pretty_assertions::assert_eq;

    /// Counts fetches and can be told to fail.
    struct FlakySource {
        text: String,
        fetches: usize,
        fail: bool,
    }

    impl CorpusSource for FlakySource {
        fn describe(&self) -> String {
            "flaky".to_string()
        }

        fn fetch(&mut self) -> anyhow::Result<String> {
            self.fetches += 1;
            if self.fail {
                anyhow::bail!("network unreachable");
            }
            Ok(self.text.clone())
        }
    }

    fn flaky(text: &str) -> FlakySource {
        FlakySource {
            text: text.to_string(),
            fetches: 0,
            fail: false,
        }
    }

    #[test]
    fn loads_once_and_reuses_the_catalog() {
        let mut cache = CatalogCache::new(
            flaky(&corpus(&["[POST]\ntitle: One\n\nx"])),
            CatalogSettings::default(),
        );

        let first = cache.catalog().unwrap();
        let second = cache.catalog().unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.source.fetches, 1);
    }

    #[test]
    fn pages_require_a_loaded_catalog() {
        let cache = CatalogCache::new(TextSource(String::new()), CatalogSettings::default());
        assert!(matches!(cache.get_page(1, "current"), Err(CatalogError::NotLoaded)));
        assert!(matches!(cache.has_next_page(1, "current"), Err(CatalogError::NotLoaded)));
    }

    #[test]
    fn invalidate_forces_a_fresh_fetch() {
        let mut cache = CatalogCache::new(
            flaky(&corpus(&["[POST]\ntitle: Before\n\nx"])),
            CatalogSettings::default(),
        )
        .with_reference_now(NOW);
        cache.catalog().unwrap();

        cache.source.text = corpus(&["[POST]\ntitle: After\n\nx"]);
        cache.invalidate();
        assert!(cache.cached().is_none());

        let catalog = cache.catalog().unwrap();
        assert_eq!(titles(&catalog.get_page(1, "current")), vec!["After"]);
        assert_eq!(cache.source.fetches, 2);
    }

    #[test]
    fn failed_reload_leaves_cache_empty() {
        let mut cache = CatalogCache::new(
            flaky(&corpus(&["[POST]\ntitle: Kept?\n\nx"])),
            CatalogSettings::default(),
        );
        cache.catalog().unwrap();

        cache.source.fail = true;
        let err = cache.reload().unwrap_err();

        assert!(matches!(err, CatalogError::Fetch(..)));
        assert!(err.to_string().contains("network unreachable"));
        assert!(cache.cached().is_none());
    }

    #[test]
    fn warnings_are_kept_from_last_load() {
        let mut cache = CatalogCache::new(
            TextSource(corpus(&["[POST]\ntitle: Good\n\nx", "[POST]\n\nno title"])),
            CatalogSettings::default(),
        );
        cache.catalog().unwrap();
        assert_eq!(cache.warnings(), &[ParseWarning::MissingTitle { section: 1 }]);

        cache.invalidate();
        assert!(cache.warnings().is_empty());
    }

    #[test]
    fn missing_file_is_a_fetch_error() {
        let dir = create_test_corpus_dir();
        let mut cache = CatalogCache::new(
            FileSource::new(dir.path().join("entries.txt")),
            CatalogSettings::default(),
        );

        let err = cache.catalog().unwrap_err();
        assert!(matches!(err, CatalogError::Fetch(..)));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn reads_corpus_from_file() {
        let dir = create_test_corpus_dir();
        let path = create_test_file(&dir, "entries.txt", &corpus(&["[POST]\ntitle: On Disk\n\nx"]));
        let mut cache = CatalogCache::new(FileSource::new(path), CatalogSettings::default());

        let catalog = cache.catalog().unwrap();
        assert_eq!(catalog.entries()[0].title, "On Disk");
    }

    #[test]
    fn settings_flow_into_the_catalog() {
        let settings = CatalogSettings {
            page_size: 1,
            no_reason_text: "Later".to_string(),
        };
        let mut cache = CatalogCache::new(
            TextSource(corpus(&[
                "[POST]\ntitle: A\n\nx\n--Links--\nSoon*-",
                "[POST]\ntitle: B\n\nx",
            ])),
            settings,
        )
        .with_reference_now(NOW);

        let catalog = cache.catalog().unwrap();
        assert_eq!(catalog.page_size(), 1);
        assert_eq!(titles(&cache.get_page(2, "current").unwrap()), vec!["B"]);
        assert_eq!(catalog.entries()[0].links.get("Soon*").unwrap().value, "Later");
    }
}
