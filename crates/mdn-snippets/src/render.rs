//! Placeholder resolution in rendered HTML.

use std::sync::LazyLock;

use mdn_markdown::Markdown;
use regex::{Captures, Regex};

use crate::catalog::SnippetCatalog;

/// Loose placeholder shape. Matches across newlines, shortest first.
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{\{<.*?>\}\}").unwrap());

/// HTML emitted in place of a document that failed to convert.
pub const INVALID_MARKDOWN_HTML: &str = "<!-- Error: Markdown is not valid -->";

/// Replace `{{< name >}}` placeholders in `html` with snippet content.
///
/// Unknown names are left as written. In emails, snippets not flagged
/// `render_in_emails` are replaced by nothing. The scan is purely textual, so
/// placeholders inside code blocks are substituted too.
pub fn render_snippets(html: &str, catalog: &SnippetCatalog, is_email: bool) -> String {
    PLACEHOLDER
        .replace_all(html, |caps: &Captures<'_>| {
            let raw = &caps[0];
            let Some(name) = placeholder_name(raw) else {
                return raw.to_owned();
            };

            match catalog.get(name) {
                Some(snippet) if snippet.render_in_emails || !is_email => snippet.content.clone(),
                Some(_) => String::new(),
                None => {
                    tracing::debug!(name, "unknown snippet left unresolved");
                    raw.to_owned()
                }
            }
        })
        .into_owned()
}

/// First whitespace-delimited token after `{{<`.
///
/// A tag written without spaces keeps its delimiter in the token
/// (`{{<sub>}}` gives `sub>}}`), so it never matches a valid name.
fn placeholder_name(raw: &str) -> Option<&str> {
    raw.strip_prefix("{{<")?.split_whitespace().next()
}

/// Render `markdown` as a page and resolve snippets.
///
/// Never fails: a conversion error is logged and replaced by
/// [`INVALID_MARKDOWN_HTML`].
pub fn render_markdown(
    engine: &Markdown,
    markdown: &str,
    base_url: &str,
    catalog: &SnippetCatalog,
    is_email: bool,
) -> String {
    let html = match engine.to_html_page(markdown, base_url) {
        Ok(html) => html,
        Err(e) => {
            tracing::warn!(error = %e, "markdown conversion failed");
            INVALID_MARKDOWN_HTML.to_owned()
        }
    };

    if html.contains("{{<") && !catalog.is_empty() {
        render_snippets(&html, catalog, is_email)
    } else {
        html
    }
}
