//! Display models for a page of entries.
//!
//! Rendering is a pure function from entries to plain data; [`html`] turns
//! that data into escaped markup for hosts that want it.

pub mod html;

use chrono::{DateTime, SecondsFormat};
use serde::Serialize;

use crate::catalog::{Catalog, Page};
use crate::models::{Entry, LinkKey, LinkTarget};
use crate::resolve::{Fragment, resolve_references};

/// Everything a host needs to display one entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayModel {
    pub index: usize,
    /// The author's date text, or the derived timestamp as `January 5, 2024`.
    pub date_label: String,
    /// Machine readable timestamp (RFC 3339, UTC, millisecond precision).
    pub datetime: String,
    pub category: String,
    pub title: String,
    pub body: Vec<Fragment>,
    /// One control per link, in link block order. Empty when the entry has
    /// no links, in which case no resources block is shown.
    pub resources: Vec<ResourceControl>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceControl {
    /// Element id, `link-` plus the key's anchor id.
    pub id: String,
    pub key: String,
    /// The key without its trailing markers.
    pub label: String,
    pub action: ResourceAction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResourceAction {
    /// Open the URL in a new browsing context.
    Open { url: String },
    /// Tell the reader why the link is not available.
    ShowReason { reason: String },
}

/// Prefix of the ids given to resource controls.
pub const CONTROL_ID_PREFIX: &str = "link-";
/// Prefix of the ids given to inline link references.
pub const MARKER_ID_PREFIX: &str = "marker-";

pub fn control_id(key: &LinkKey) -> String {
    format!("{CONTROL_ID_PREFIX}{}", key.anchor_id())
}

pub fn render_entry(entry: &Entry, catalog: &Catalog) -> DisplayModel {
    let when = DateTime::from_timestamp_millis(entry.timestamp);

    let date_label = if entry.date.is_empty() {
        when.map(|dt| dt.format("%B %-d, %Y").to_string())
            .unwrap_or_default()
    } else {
        entry.date.clone()
    };

    DisplayModel {
        index: entry.index,
        date_label,
        datetime: when
            .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
            .unwrap_or_default(),
        category: entry.category.clone(),
        title: entry.title.clone(),
        body: resolve_references(&entry.content, &entry.links, catalog.entries()),
        resources: entry
            .links
            .iter()
            .map(|(key, target)| resource_control(key, target))
            .collect(),
    }
}

pub fn render_page(page: &Page<'_>, catalog: &Catalog) -> Vec<DisplayModel> {
    page.entries
        .iter()
        .map(|entry| render_entry(entry, catalog))
        .collect()
}

fn resource_control(key: &LinkKey, target: &LinkTarget) -> ResourceControl {
    let action = if target.disabled {
        ResourceAction::ShowReason {
            reason: target.value.clone(),
        }
    } else {
        ResourceAction::Open {
            url: target.value.clone(),
        }
    };

    ResourceControl {
        id: control_id(key),
        key: key.as_str().to_string(),
        label: key.label().to_string(),
        action,
    }
}
