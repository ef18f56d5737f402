//! String-level HTML post-processing.

use std::borrow::Cow;
use std::sync::LazyLock;

use quick_xml::Writer;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use regex::Regex;

use crate::error::MarkdownError;

/// Email-only content wrappers. Both spellings are accepted.
static NEWSLETTER_TAGS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<md-newsletter>.*?</md-newsletter>|<mdn-newsletter>.*?</mdn-newsletter>")
        .unwrap()
});

/// Remove `<md-newsletter>` / `<mdn-newsletter>` blocks and their content.
///
/// Matching is case-sensitive and non-greedy across lines, so each opening
/// tag pairs with the nearest closing tag.
#[must_use]
pub fn remove_newsletter_tags(html: &str) -> String {
    NEWSLETTER_TAGS.replace_all(html, "").into_owned()
}

/// Prefix site-relative `href` of `<a>` and `src` of `<img>` with `base_url`.
///
/// Everything else is written back as read. The input must be well-formed
/// (XHTML-compatible) markup; mismatched tags fail with
/// [`MarkdownError::HtmlInvalid`].
pub fn rewrite_html_links_and_images(base_url: &str, html: &str) -> Result<String, MarkdownError> {
    let mut reader = Reader::from_str(html);
    reader.config_mut().trim_text(false);
    let mut writer = Writer::new(Vec::with_capacity(html.len()));

    loop {
        let event = match reader.read_event().map_err(invalid)? {
            Event::Eof => break,
            Event::Start(e) => match rewrite_element(base_url, &e)? {
                Some(rewritten) => Event::Start(rewritten),
                None => Event::Start(e),
            },
            Event::Empty(e) => match rewrite_element(base_url, &e)? {
                Some(rewritten) => Event::Empty(rewritten),
                None => Event::Empty(e),
            },
            other => other,
        };
        writer.write_event(event).map_err(invalid)?;
    }

    String::from_utf8(writer.into_inner()).map_err(invalid)
}

/// Rebuild an `<a>` or `<img>` start tag with its URL attribute prefixed.
/// Returns `None` for other elements.
fn rewrite_element(
    base_url: &str,
    element: &BytesStart<'_>,
) -> Result<Option<BytesStart<'static>>, MarkdownError> {
    let (tag, url_attribute): (&'static str, &[u8]) = match element.name().as_ref() {
        b"a" => ("a", b"href"),
        b"img" => ("img", b"src"),
        _ => return Ok(None),
    };

    let mut rewritten = BytesStart::new(tag);
    for attr in element.html_attributes() {
        let attr = attr.map_err(invalid)?;
        if attr.key.as_ref() == url_attribute && attr.value.starts_with(b"/") {
            let mut value = base_url.as_bytes().to_vec();
            value.extend_from_slice(&attr.value);
            rewritten.push_attribute(Attribute {
                key: attr.key,
                value: Cow::Owned(value),
            });
        } else {
            rewritten.push_attribute(attr);
        }
    }
    Ok(Some(rewritten))
}

fn invalid(err: impl std::fmt::Display) -> MarkdownError {
    MarkdownError::HtmlInvalid(err.to_string())
}
