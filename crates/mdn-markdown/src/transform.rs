//! Tree transforms applied between parsing and rendering.

use pulldown_cmark::{CowStr, Event, Tag};

use crate::ast::{Document, NodeKind};

/// A pass that mutates the parsed document before rendering.
pub trait AstTransformer {
    fn transform(&self, doc: &mut Document<'_>);
}

/// Absolutizes site-relative link and image destinations.
///
/// A destination whose first non-whitespace character is `/` is replaced by
/// `base_url` followed by the destination. No URL parsing or normalization
/// happens: a base URL ending in `/` produces `//` in the result, and
/// destinations that do not start with `/` are never touched, so applying the
/// rewrite twice changes nothing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UrlRewrite {
    pub base_url: String,
    pub images: bool,
    pub links: bool,
}

impl UrlRewrite {
    /// Page rendering: images only. Links stay site-relative for navigation.
    pub fn page(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            images: true,
            links: false,
        }
    }

    /// Email rendering: every reference must be absolute.
    pub fn email(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            images: true,
            links: true,
        }
    }

    /// Rewritten form of `dest`, or `None` when it is left alone.
    #[must_use]
    pub fn rewrite(&self, dest: &str) -> Option<String> {
        dest.trim_start()
            .starts_with('/')
            .then(|| format!("{}{dest}", self.base_url))
    }

    fn rewrite_in_place(&self, dest: &mut CowStr<'_>) {
        if let Some(rewritten) = self.rewrite(dest) {
            *dest = rewritten.into();
        }
    }
}

impl AstTransformer for UrlRewrite {
    fn transform(&self, doc: &mut Document<'_>) {
        for id in doc.walk(doc.root()) {
            let NodeKind::Markdown(block) = &mut doc.node_mut(id).kind else {
                continue;
            };
            for event in &mut block.events {
                match event {
                    Event::Start(Tag::Image { dest_url, .. }) if self.images => {
                        self.rewrite_in_place(dest_url);
                    }
                    Event::Start(Tag::Link { dest_url, .. }) if self.links => {
                        self.rewrite_in_place(dest_url);
                    }
                    _ => {}
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockParserRegistry;
    use crate::context::ParseContext;
    use crate::inline::parse_runs;

    fn destinations(source: &str, rewrite: &UrlRewrite) -> Vec<String> {
        let mut ctx = ParseContext::new();
        let mut doc = BlockParserRegistry::default().parse(source, &mut ctx);
        parse_runs(&mut doc, source);
        rewrite.transform(&mut doc);

        let mut out = Vec::new();
        for id in doc.walk(doc.root()) {
            if let NodeKind::Markdown(block) = &doc.node(id).kind {
                for event in &block.events {
                    match event {
                        Event::Start(Tag::Link { dest_url, .. } | Tag::Image { dest_url, .. }) => {
                            out.push(dest_url.to_string());
                        }
                        _ => {}
                    }
                }
            }
        }
        out
    }

    const SOURCE: &str = "[a](/b) ![a](/c)\n";

    #[test]
    fn test_page_rewrites_images_only() {
        assert_eq!(
            destinations(SOURCE, &UrlRewrite::page("https://example.com")),
            vec!["/b", "https://example.com/c"]
        );
    }

    #[test]
    fn test_email_rewrites_links_and_images() {
        assert_eq!(
            destinations(SOURCE, &UrlRewrite::email("https://example.com")),
            vec!["https://example.com/b", "https://example.com/c"]
        );
    }

    #[test]
    fn test_absolute_destinations_untouched() {
        let rewrite = UrlRewrite::email("https://example.com");
        assert_eq!(rewrite.rewrite("https://other.org/x"), None);
        assert_eq!(rewrite.rewrite("relative/path"), None);
        assert_eq!(rewrite.rewrite("#anchor"), None);
    }

    #[test]
    fn test_rewrite_is_idempotent() {
        let rewrite = UrlRewrite::email("https://example.com");
        let once = rewrite.rewrite("/a").unwrap();
        assert_eq!(rewrite.rewrite(&once), None);
    }

    #[test]
    fn test_trailing_slash_base_is_not_normalized() {
        let rewrite = UrlRewrite::page("https://example.com/");
        assert_eq!(
            rewrite.rewrite("/c").as_deref(),
            Some("https://example.com//c")
        );
    }

    #[test]
    fn test_rewrite_inside_snippet() {
        let source = "{{< box >}}\n![x](/img.png)\n{{< /box >}}\n";
        assert_eq!(
            destinations(source, &UrlRewrite::page("https://example.com")),
            vec!["https://example.com/img.png"]
        );
    }
}
