use crate::models::{Entry, LinkTable, entry::DEFAULT_CATEGORY};

use super::{
    LINKS_HEADER, POST_HEADER, ParseOptions, ParseWarning,
    dates::{derived_timestamp, parse_date},
    links::parse_link_line,
};

#[derive(Debug, Default)]
struct Metadata {
    title: String,
    category: Option<String>,
    date: String,
}

/// Builds one [`Entry`] from the lines of a section.
///
/// Returns `None`, after recording a warning, when the section has no
/// `[POST]` header or no title.
pub fn parse_section(
    lines: &[&str],
    index: usize,
    options: &ParseOptions,
    warnings: &mut Vec<ParseWarning>,
) -> Option<Entry> {
    let Some(header) = lines.iter().position(|line| line.trim() == POST_HEADER) else {
        warn(warnings, ParseWarning::MissingHeader { section: index });
        return None;
    };

    let (meta, body_start) = read_metadata(lines, header + 1);
    if meta.title.is_empty() {
        warn(warnings, ParseWarning::MissingTitle { section: index });
        return None;
    }

    let body = lines.get(body_start..).unwrap_or_default();
    let (content, links) = match body.iter().position(|line| line.trim() == LINKS_HEADER) {
        Some(split) => (
            &body[..split],
            read_links(&body[split + 1..], &options.no_reason_text),
        ),
        None => (body, LinkTable::new()),
    };

    let timestamp = if meta.date.is_empty() {
        derived_timestamp(options.reference_now, index)
    } else {
        parse_date(&meta.date).unwrap_or_else(|| {
            warn(
                warnings,
                ParseWarning::InvalidDate {
                    section: index,
                    date: meta.date.clone(),
                },
            );
            derived_timestamp(options.reference_now, index)
        })
    };

    Some(Entry {
        title: meta.title,
        category: meta
            .category
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
        date: meta.date,
        timestamp,
        content: content.join("\n").trim().to_string(),
        links,
        index,
    })
}

/// Reads `key: value` lines up to the first blank line. Returns the
/// metadata and the line index where the body starts.
fn read_metadata(lines: &[&str], start: usize) -> (Metadata, usize) {
    let mut meta = Metadata::default();

    for (offset, line) in lines.iter().skip(start).enumerate() {
        let line = line.trim();
        if line.is_empty() {
            return (meta, start + offset + 1);
        }

        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim().to_string();
        match key.trim() {
            "title" => meta.title = value,
            "type" if !value.is_empty() => meta.category = Some(value),
            "date" => meta.date = value,
            _ => {}
        }
    }

    (meta, lines.len())
}

fn read_links(lines: &[&str], no_reason_text: &str) -> LinkTable {
    lines
        .iter()
        .filter_map(|line| parse_link_line(line, no_reason_text))
        .collect()
}

fn warn(warnings: &mut Vec<ParseWarning>, warning: ParseWarning) {
    log::warn!("{warning}");
    warnings.push(warning);
}
