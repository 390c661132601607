//! Corpus parsing: sections, metadata, bodies and link blocks.
//!
//! The corpus is a sequence of sections separated by a line of
//! [`SECTION_SEPARATOR`]. Each section looks like:
//!
//! ```text
//! [POST]
//! title: Hello
//! type: current
//! date: 2024-01-05
//!
//! Body text with Inline Tokens* in it.
//! --Links--
//! Inline Tokens*=https://example.com/
//! ```
//!
//! Malformed sections are dropped with a [`ParseWarning`]; parsing never fails.

pub mod dates;
pub mod entries;
pub mod links;

use chrono::Utc;

use crate::models::Entry;

pub use dates::{DAY_MS, derived_timestamp, parse_date};
pub use entries::parse_section;
pub use links::parse_link_line;

/// Line separating two sections.
pub const SECTION_SEPARATOR: &str = "-------------";
/// Line opening the metadata block of a section.
pub const POST_HEADER: &str = "[POST]";
/// Line opening the link block after the body.
pub const LINKS_HEADER: &str = "--Links--";
/// Reason shown for a disabled link that does not give one.
pub const DEFAULT_NO_REASON: &str = "No reason given";

/// A recoverable problem found while parsing. The offending section is
/// skipped (or, for dates, falls back to corpus ordering).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseWarning {
    #[error("No {POST_HEADER} header found in section {section}")]
    MissingHeader { section: usize },

    #[error("No title found in section {section}")]
    MissingTitle { section: usize },

    #[error("Unparseable date {date:?} in section {section}, falling back to corpus order")]
    InvalidDate { section: usize, date: String },
}

#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Epoch milliseconds that undated entries count back from.
    pub reference_now: i64,
    pub no_reason_text: String,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            reference_now: Utc::now().timestamp_millis(),
            no_reason_text: DEFAULT_NO_REASON.to_string(),
        }
    }
}

#[derive(Debug, Default)]
pub struct ParsedCorpus {
    pub entries: Vec<Entry>,
    pub warnings: Vec<ParseWarning>,
}

/// Splits the corpus into sections, numbering the non-blank ones from 0.
pub fn split_sections(text: &str) -> Vec<Vec<&str>> {
    let mut sections = vec![];
    let mut current = vec![];

    for line in text.lines() {
        if line.trim() == SECTION_SEPARATOR {
            sections.push(std::mem::take(&mut current));
        } else {
            current.push(line);
        }
    }
    sections.push(current);

    sections
        .into_iter()
        .filter(|lines| lines.iter().any(|line| !line.trim().is_empty()))
        .collect()
}

/// Parses a whole corpus into entries, in corpus order.
pub fn parse_corpus(text: &str, options: &ParseOptions) -> ParsedCorpus {
    let mut parsed = ParsedCorpus::default();

    for (index, lines) in split_sections(text).iter().enumerate() {
        if let Some(entry) = parse_section(lines, index, options, &mut parsed.warnings) {
            parsed.entries.push(entry);
        }
    }

    parsed
}
