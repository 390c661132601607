use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};

use super::{CONTROL_ID_PREFIX, DisplayModel, MARKER_ID_PREFIX, ResourceAction, ResourceControl};
use crate::resolve::Fragment;

const LINK_ICON: &str = "📎";

/// Markup for a resolved body. Original text is escaped before it is
/// wrapped, so wrapper markup is never escaped twice.
pub fn body_html(fragments: &[Fragment]) -> String {
    let mut out = String::new();

    for fragment in fragments {
        match fragment {
            Fragment::Text(t) => out.push_str(&text(t)),
            Fragment::LinkRef {
                key,
                anchor_id,
                text: shown,
            } => out.push_str(&format!(
                r#"<span class="asterisk-link" data-target="{}" id="{MARKER_ID_PREFIX}{anchor_id}">{}</span>"#,
                attr(key),
                text(shown),
            )),
            Fragment::CrossRef { title, text: shown } => out.push_str(&format!(
                r#"<span class="cross-reference" data-post-title="{title}" title="Cross-reference to: {title}">{}</span>"#,
                text(shown),
                title = attr(title),
            )),
        }
    }

    out
}

/// Markup for the resources block; empty when there are no controls.
pub fn resources_html(resources: &[ResourceControl]) -> String {
    if resources.is_empty() {
        return String::new();
    }

    let buttons: String = resources.iter().map(control_html).collect();
    format!(
        r#"<div class="blog-post-resources"><h3>Resources</h3><div class="resource-buttons">{buttons}</div></div>"#
    )
}

fn control_html(control: &ResourceControl) -> String {
    debug_assert!(control.id.starts_with(CONTROL_ID_PREFIX));

    let inner = format!(
        r#"<span class="link-icon">{LINK_ICON}</span><span class="link-text">{}</span>"#,
        text(&control.label)
    );
    match &control.action {
        ResourceAction::Open { url } => format!(
            r#"<a href="{}" class="link-button" id="{}" target="_blank" rel="noopener">{inner}</a>"#,
            attr(url),
            attr(&control.id),
        ),
        ResourceAction::ShowReason { reason } => format!(
            r#"<button class="link-button" id="{}" data-disabled="true" data-reason="{}">{inner}</button>"#,
            attr(&control.id),
            attr(reason),
        ),
    }
}

impl DisplayModel {
    /// The entry as an `<article>` element.
    pub fn to_html(&self) -> String {
        format!(
            concat!(
                r#"<article class="blog-post" data-post-index="{index}">"#,
                r#"<div class="blog-post-meta">"#,
                r#"<time datetime="{datetime}">{date}</time>"#,
                r#"<span class="post-type" data-type="{category_attr}">{category}</span>"#,
                "</div>",
                r#"<h2 class="blog-post-title">{title}</h2>"#,
                r#"<div class="blog-post-content">{body}</div>"#,
                "{resources}",
                "</article>"
            ),
            index = self.index,
            datetime = attr(&self.datetime),
            date = text(&self.date_label),
            category_attr = attr(&self.category),
            category = text(&self.category),
            title = text(&self.title),
            body = body_html(&self.body),
            resources = resources_html(&self.resources),
        )
    }
}

/// All entries of a page, concatenated.
pub fn page_html(models: &[DisplayModel]) -> String {
    models.iter().map(DisplayModel::to_html).collect()
}
