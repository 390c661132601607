use std::sync::LazyLock;

use regex::Regex;

use crate::models::{LinkKey, LinkTarget};

/// `<text><markers>-<reason>`; the reason may be empty.
static DISABLED_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^*]+)(\*+)-(.*)$").expect("disabled link pattern compiles"));

/// `<text><markers>=<url>`.
static ENABLED_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^*]+)(\*+)=(.*)$").expect("enabled link pattern compiles"));

/// Parses one line of a `--Links--` block.
///
/// The disabled form is tried before the enabled one. Lines matching
/// neither, and enabled lines with an empty URL, are not link lines and
/// yield `None`. The key keeps its markers so `Foo*` and `Foo**` stay
/// distinct.
pub fn parse_link_line(line: &str, no_reason_text: &str) -> Option<(LinkKey, LinkTarget)> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    if let Some(caps) = DISABLED_LINE.captures(line) {
        let key = LinkKey::new(&caps[1], caps[2].len())?;
        let reason = match &caps[3] {
            "" => no_reason_text,
            reason => reason,
        };
        return Some((key, LinkTarget::disabled(reason)));
    }

    if let Some(caps) = ENABLED_LINE.captures(line) {
        let url = caps[3].trim();
        if url.is_empty() {
            return None;
        }
        let key = LinkKey::new(&caps[1], caps[2].len())?;
        return Some((key, LinkTarget::enabled(url)));
    }

    None
}
