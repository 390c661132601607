use serde::Serialize;

use super::link::LinkTable;

/// Category assigned to entries that carry no `type:` line.
pub const DEFAULT_CATEGORY: &str = "current";

/// One parsed post from the corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    /// Never empty; sections without a title are dropped by the parser.
    pub title: String,
    /// Category tag from the `type:` line.
    pub category: String,
    /// Author-supplied date text, verbatim. May be empty.
    pub date: String,
    /// Milliseconds since the Unix epoch, explicit or derived from corpus order.
    pub timestamp: i64,
    /// Trimmed body text, still containing inline reference markers.
    pub content: String,
    pub links: LinkTable,
    /// Position of the section in the corpus, counting dropped sections too.
    pub index: usize,
}
