//! Plain-text page descriptions derived from rendered HTML.

use std::sync::LazyLock;

use regex::Regex;

use crate::catalog::SnippetCatalog;
use crate::render::render_snippets;

/// Words kept by default.
pub const DEFAULT_DESCRIPTION_WORDS: usize = 30;

/// Markup removed before counting words. Script and style bodies go with
/// their tags.
static MARKUP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b.*?</script>|<style\b.*?</style>|<!--.*?-->|<[^>]*>").unwrap()
});

/// Summarize `html` as its first `max_words` words of text.
///
/// Snippets are resolved in page mode first so that placeholders never leak
/// into the summary.
pub fn description_from_html(html: &str, catalog: &SnippetCatalog, max_words: usize) -> String {
    let resolved;
    let html = if html.contains("{{<") && !catalog.is_empty() {
        resolved = render_snippets(html, catalog, false);
        resolved.as_str()
    } else {
        html
    };

    let text = MARKUP.replace_all(html, "");
    let text = html_escape::decode_html_entities(&text);
    text.split_whitespace()
        .take(max_words)
        .collect::<Vec<_>>()
        .join(" ")
}
