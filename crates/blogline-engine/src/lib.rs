pub mod catalog;
pub mod io;
pub mod models;
pub mod parsing;
pub mod render;
pub mod resolve;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use catalog::{
    Catalog, CatalogCache, CatalogError, CatalogSettings, CorpusSource, FileSource, LoadReport,
    Navigator, Page, PageStatus, TextSource, load_catalog, load_catalog_with,
};
pub use io::IoError;
pub use models::{Entry, LinkKey, LinkTable, LinkTarget};
pub use parsing::{ParseOptions, ParseWarning};
pub use render::{DisplayModel, ResourceAction, ResourceControl, render_entry, render_page};
pub use resolve::{Fragment, resolve_references};
