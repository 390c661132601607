//! Inline reference resolution.
//!
//! Marked tokens in an entry body are resolved, in order, against the
//! entry's own link table, then against the titles of other entries. Link
//! keys that the token pass did not use get a second chance through a
//! literal whole-word search of the remaining plain text.

pub mod tokens;

use std::collections::HashSet;

use serde::Serialize;

use crate::models::{Entry, LinkKey, LinkTable, MARKER};

pub use tokens::{Segment, Token, tokenize};

/// A resolved piece of an entry body. Text is kept unescaped; escaping
/// happens when the fragments are turned into markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum Fragment {
    Text(String),
    /// A reference to one of the entry's own links.
    LinkRef {
        key: String,
        anchor_id: String,
        text: String,
    },
    /// A reference to another entry, by title.
    CrossRef { title: String, text: String },
}

impl Fragment {
    fn link_ref(key: &LinkKey, text: &str) -> Self {
        Fragment::LinkRef {
            key: key.as_str().to_string(),
            anchor_id: key.anchor_id(),
            text: text.to_string(),
        }
    }

    /// The original body text this fragment covers.
    pub fn text(&self) -> &str {
        match self {
            Fragment::Text(text)
            | Fragment::LinkRef { text, .. }
            | Fragment::CrossRef { text, .. } => text,
        }
    }
}

/// Resolves the references in `body` against the entry's `links` and the
/// full `catalog`.
pub fn resolve_references(body: &str, links: &LinkTable, catalog: &[Entry]) -> Vec<Fragment> {
    let mut fragments = vec![];
    let mut consumed = HashSet::new();

    for segment in tokenize(body) {
        match segment {
            Segment::Text(text) => push_text(&mut fragments, text),
            Segment::Token(token) => {
                if let Some(key) = find_local_key(links, &token) {
                    consumed.insert(key.as_str());
                    fragments.push(Fragment::link_ref(key, token.text));
                } else if let Some(entry) = find_cross_reference(catalog, token.phrase) {
                    fragments.push(Fragment::CrossRef {
                        title: entry.title.clone(),
                        text: token.text.to_string(),
                    });
                } else {
                    push_text(&mut fragments, token.text);
                }
            }
        }
    }

    for key in links.keys() {
        if !consumed.contains(key.as_str()) {
            fragments = substitute_key(fragments, key);
        }
    }

    fragments
}

/// Finds the local key a token refers to: the first key, in link block
/// order, with the same marker count whose label starts with the token's
/// phrase. A token never resolves to a key with a different marker count.
fn find_local_key<'a>(links: &'a LinkTable, token: &Token<'_>) -> Option<&'a LinkKey> {
    links
        .keys()
        .find(|key| key.markers() == token.markers && key.label().starts_with(token.phrase))
}

/// First entry, in corpus order, whose title contains the phrase or is
/// contained in it, ignoring case.
fn find_cross_reference<'a>(catalog: &'a [Entry], phrase: &str) -> Option<&'a Entry> {
    let phrase = phrase.to_lowercase();
    catalog.iter().find(|entry| {
        let title = entry.title.to_lowercase();
        title.contains(&phrase) || phrase.contains(&title)
    })
}

fn push_text(fragments: &mut Vec<Fragment>, text: &str) {
    if text.is_empty() {
        return;
    }
    match fragments.last_mut() {
        Some(Fragment::Text(last)) => last.push_str(text),
        _ => fragments.push(Fragment::Text(text.to_string())),
    }
}

/// Wraps every whole-word occurrence of `key` found in plain text
/// fragments. Fragments already wrapped are left alone.
fn substitute_key(fragments: Vec<Fragment>, key: &LinkKey) -> Vec<Fragment> {
    let mut out = Vec::with_capacity(fragments.len());

    for fragment in fragments {
        let Fragment::Text(text) = fragment else {
            out.push(fragment);
            continue;
        };

        let needle = key.as_str();
        let mut last = 0;
        let mut search = 0;
        while let Some(offset) = text[search..].find(needle) {
            let start = search + offset;
            let end = start + needle.len();
            if is_whole_word(&text, start, end) {
                push_text(&mut out, &text[last..start]);
                out.push(Fragment::link_ref(key, needle));
                last = end;
                search = end;
            } else {
                search = start + text[start..].chars().next().map_or(1, char::len_utf8);
            }
        }
        push_text(&mut out, &text[last..]);
    }

    out
}

fn is_whole_word(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();

    let clean_before = before.is_none_or(|c| !is_identifier_char(c) && c != MARKER);
    let clean_after = after.is_none_or(|c| !is_identifier_char(c) && c != MARKER);
    clean_before && clean_after
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
