use serde::{Serialize, Serializer};

/// The repeatable character that suffixes reference tokens and link keys.
pub const MARKER: char = '*';

/// Separator substituted for every non-alphanumeric character when a key
/// is turned into an element identifier.
const ID_SEPARATOR: char = '-';

/// A link table key: a display label followed by one or more markers.
///
/// The marker count is part of the identity, so `Foo*` and `Foo**` are
/// different keys and may point at different targets within one entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LinkKey {
    key: String,
    label_len: usize,
}

impl LinkKey {
    /// Builds a key from a label and a marker count.
    ///
    /// Returns `None` when the label is empty, contains a marker, or no
    /// markers were given.
    pub fn new(label: &str, markers: usize) -> Option<Self> {
        if label.is_empty() || markers == 0 || label.contains(MARKER) {
            return None;
        }

        let mut key = String::with_capacity(label.len() + markers);
        key.push_str(label);
        key.extend(std::iter::repeat_n(MARKER, markers));

        Some(Self {
            key,
            label_len: label.len(),
        })
    }

    /// Splits raw key text such as `Setup Guide**` into label and markers.
    pub fn parse(raw: &str) -> Option<Self> {
        let label = raw.trim_end_matches(MARKER);
        Self::new(label, raw.len() - label.len())
    }

    /// Full key text, markers included.
    pub fn as_str(&self) -> &str {
        &self.key
    }

    /// The label without its trailing markers.
    pub fn label(&self) -> &str {
        &self.key[..self.label_len]
    }

    pub fn markers(&self) -> usize {
        self.key.len() - self.label_len
    }

    /// Identifier fragment shared by inline reference anchors and resource
    /// controls. Both sides must use this exact derivation.
    pub fn anchor_id(&self) -> String {
        self.key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c
                } else {
                    ID_SEPARATOR
                }
            })
            .collect()
    }
}

impl std::fmt::Display for LinkKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.key)
    }
}

impl Serialize for LinkKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.key)
    }
}

/// Where a link points: a URL, or the reason it is not available yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkTarget {
    pub disabled: bool,
    pub value: String,
}

impl LinkTarget {
    pub fn enabled(url: impl Into<String>) -> Self {
        Self {
            disabled: false,
            value: url.into(),
        }
    }

    pub fn disabled(reason: impl Into<String>) -> Self {
        Self {
            disabled: true,
            value: reason.into(),
        }
    }
}

/// Per-entry link table.
///
/// Keys are unique. Iteration follows the order the keys first appeared in
/// the link block, which decides which key wins when several share a prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LinkTable {
    links: Vec<(LinkKey, LinkTarget)>,
}

impl LinkTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a link. A repeated key replaces the earlier target but keeps
    /// its original position.
    pub fn insert(&mut self, key: LinkKey, target: LinkTarget) {
        match self.links.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => *slot = target,
            None => self.links.push((key, target)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&LinkTarget> {
        self.links
            .iter()
            .find(|(existing, _)| existing.as_str() == key)
            .map(|(_, target)| target)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&LinkKey, &LinkTarget)> {
        self.links.iter().map(|(key, target)| (key, target))
    }

    pub fn keys(&self) -> impl Iterator<Item = &LinkKey> {
        self.links.iter().map(|(key, _)| key)
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

impl FromIterator<(LinkKey, LinkTarget)> for LinkTable {
    fn from_iter<I: IntoIterator<Item = (LinkKey, LinkTarget)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (key, target) in iter {
            table.insert(key, target);
        }
        table
    }
}
