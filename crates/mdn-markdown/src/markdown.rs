//! Conversion entry points.

use std::sync::LazyLock;

use crate::ast::Document;
use crate::block::BlockParserRegistry;
use crate::context::{Frontmatter, ParseContext};
use crate::error::{FrontmatterError, MarkdownError};
use crate::html::remove_newsletter_tags;
use crate::inline::parse_runs;
use crate::render::{DEFAULT_THEME, Highlighter, HtmlRenderer, RenderOptions};
use crate::transform::{AstTransformer, UrlRewrite};

/// Engine configuration, fixed at construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MarkdownOptions {
    /// Bundled syntect theme used for fenced code.
    pub highlight_theme: String,
    /// Give headings slug ids.
    pub heading_ids: bool,
    /// Render soft line breaks as `<br />`.
    pub hard_wraps: bool,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            highlight_theme: DEFAULT_THEME.to_owned(),
            heading_ids: true,
            hard_wraps: true,
        }
    }
}

/// Result of a conversion: the HTML and the parse context it produced.
#[derive(Debug)]
pub struct Conversion {
    pub html: String,
    pub context: ParseContext,
}

impl Conversion {
    /// Frontmatter extracted during the conversion.
    pub fn frontmatter(&self) -> Result<&Frontmatter, FrontmatterError> {
        crate::context::get_frontmatter(&self.context)
    }
}

/// Markdown to HTML engine.
///
/// Holds only read-only configuration, so one engine can serve any number of
/// conversions, including from several threads at once.
pub struct Markdown {
    registry: BlockParserRegistry,
    highlighter: Highlighter,
    render: RenderOptions,
}

impl Markdown {
    /// Build an engine with the default block parsers.
    pub fn new(options: &MarkdownOptions) -> Result<Self, MarkdownError> {
        Self::with_registry(options, BlockParserRegistry::default())
    }

    /// Build an engine with a custom set of block parsers.
    pub fn with_registry(
        options: &MarkdownOptions,
        registry: BlockParserRegistry,
    ) -> Result<Self, MarkdownError> {
        Ok(Self {
            registry,
            highlighter: Highlighter::new(&options.highlight_theme)?,
            render: RenderOptions {
                heading_ids: options.heading_ids,
                hard_wraps: options.hard_wraps,
                ..RenderOptions::default()
            },
        })
    }

    /// Run the block and inline phases without rendering.
    pub fn parse<'a>(&self, markdown: &'a str, ctx: &mut ParseContext) -> Document<'a> {
        let mut doc = self.registry.parse(markdown, ctx);
        parse_runs(&mut doc, markdown);
        doc
    }

    /// Full pipeline: parse, rewrite URLs, render.
    pub fn convert(&self, markdown: &str, rewrite: &UrlRewrite) -> Result<Conversion, MarkdownError> {
        let mut context = ParseContext::new();
        let mut doc = self.parse(markdown, &mut context);
        rewrite.transform(&mut doc);

        let html = HtmlRenderer::new(&self.highlighter, self.render).render(&doc, markdown)?;
        tracing::trace!(input = markdown.len(), output = html.len(), "converted markdown");
        Ok(Conversion { html, context })
    }

    /// Extract frontmatter without rendering.
    pub fn parse_frontmatter(&self, markdown: &str) -> Result<Frontmatter, FrontmatterError> {
        let mut context = ParseContext::new();
        self.registry.parse(markdown, &mut context);
        context.into_frontmatter()
    }

    /// Render for a web page.
    ///
    /// Only images are made absolute; links stay site-relative. Newsletter-only
    /// blocks are removed.
    pub fn to_html_page(&self, markdown: &str, base_url: &str) -> Result<String, MarkdownError> {
        let conversion = self.convert(markdown, &UrlRewrite::page(base_url))?;
        Ok(remove_newsletter_tags(&conversion.html))
    }

    /// Render for an email. Links and images are made absolute and newsletter
    /// blocks are kept.
    pub fn to_html_email(&self, base_url: &str, markdown: &str) -> Result<String, MarkdownError> {
        Ok(self.convert(markdown, &UrlRewrite::email(base_url))?.html)
    }
}

impl Default for Markdown {
    fn default() -> Self {
        Self {
            registry: BlockParserRegistry::default(),
            highlighter: Highlighter::default(),
            render: RenderOptions::default(),
        }
    }
}

static DEFAULT_ENGINE: LazyLock<Markdown> = LazyLock::new(Markdown::default);

/// Render `markdown` for a web page with the default engine.
pub fn to_html_page(markdown: &str, base_url: &str) -> Result<String, MarkdownError> {
    DEFAULT_ENGINE.to_html_page(markdown, base_url)
}

/// Render `markdown` for an email with the default engine.
pub fn to_html_email(base_url: &str, markdown: &str) -> Result<String, MarkdownError> {
    DEFAULT_ENGINE.to_html_email(base_url, markdown)
}
