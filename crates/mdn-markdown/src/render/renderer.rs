//! Event-driven HTML writer.

use std::fmt::{self, Write};
use std::sync::LazyLock;

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Tag, TagEnd, TextMergeStream};
use regex::Regex;

use super::highlight::Highlighter;
use super::state::{
    CodeBlockState, FootnoteState, HeadingState, ImageState, TableState, escape_html,
};
use super::RenderOptions;
use crate::ast::{Document, NodeId, NodeKind};

/// Bare URLs turned into links outside of links and code.
static BARE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:https?://|www\.)[^\s<>]*[^\s<>.,:;!?*_~'")\]]"#).unwrap()
});

/// Inline `{{< name >}}` placeholders, kept unescaped for later substitution.
static SNIPPET_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{<[^\n]*?>\}\}").unwrap());

/// Comments inside raw HTML blocks. An unterminated one runs to the end.
static HTML_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?(?:-->|\z)").unwrap());

/// Renders a parsed [`Document`] to HTML.
///
/// One renderer is used for the whole document, so heading ids and footnote
/// numbers are unique across every markdown run.
pub struct HtmlRenderer<'h> {
    highlighter: &'h Highlighter,
    options: RenderOptions,
    out: String,
    code: CodeBlockState,
    table: TableState,
    image: ImageState,
    heading: HeadingState,
    footnotes: FootnoteState,
    pending_image: Vec<(String, String)>,
    link_depth: usize,
    /// Raw HTML block being collected.
    html_block: Option<String>,
}

impl<'h> HtmlRenderer<'h> {
    pub fn new(highlighter: &'h Highlighter, options: RenderOptions) -> Self {
        Self {
            highlighter,
            options,
            out: String::with_capacity(4096),
            code: CodeBlockState::default(),
            table: TableState::default(),
            image: ImageState::default(),
            heading: HeadingState::default(),
            footnotes: FootnoteState::default(),
            pending_image: Vec::new(),
            link_depth: 0,
            html_block: None,
        }
    }

    /// Render the attached tree and return the HTML.
    pub fn render(mut self, doc: &Document<'_>, source: &str) -> Result<String, fmt::Error> {
        self.node(doc, doc.root(), source)?;
        self.footnotes.write_list(&mut self.out)?;
        Ok(self.out)
    }

    fn node(&mut self, doc: &Document<'_>, id: NodeId, source: &str) -> fmt::Result {
        match &doc.node(id).kind {
            NodeKind::Document => {}
            NodeKind::Markdown(block) => {
                for event in TextMergeStream::new(block.events.iter().cloned()) {
                    self.event(event)?;
                }
            }
            NodeKind::Snippet(snippet) => {
                self.out.push_str(&snippet.raw_open_tag);
                self.out.push('\n');
            }
            NodeKind::HtmlComment(_) => return Ok(()),
            NodeKind::BlockQuote => {
                self.out.push_str("<blockquote>\n");
                for &child in doc.children(id) {
                    self.node(doc, child, source)?;
                }
                self.out.push_str("</blockquote>\n");
                return Ok(());
            }
            NodeKind::TextBlock => {
                // Frontmatter that failed to parse is shown as-is.
                let lines: Vec<&str> = doc
                    .node(id)
                    .lines()
                    .iter()
                    .filter_map(|segment| source.get(segment.clone()))
                    .map(str::trim_end)
                    .collect();
                writeln!(self.out, "<p>{}</p>", escape_html(&lines.join("\n")))?;
            }
        }

        for &child in doc.children(id) {
            self.node(doc, child, source)?;
        }
        Ok(())
    }

    fn event(&mut self, event: Event<'_>) -> fmt::Result {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.inline_code(&code),
            Event::Html(html) => {
                match &mut self.html_block {
                    Some(block) => block.push_str(&html),
                    None => self.push_inline(&html),
                }
                Ok(())
            }
            Event::InlineHtml(html) => {
                if self.image.is_active() || is_comment(&html) {
                    return Ok(());
                }
                self.push_inline(&html);
                Ok(())
            }
            Event::SoftBreak => {
                if self.image.is_active() {
                    self.image.push_str(" ");
                } else if self.options.hard_wraps {
                    self.push_inline("<br />\n");
                } else {
                    self.push_inline("\n");
                }
                Ok(())
            }
            Event::HardBreak => {
                self.push_inline("<br />\n");
                Ok(())
            }
            Event::Rule => {
                self.out.push_str("<hr />\n");
                Ok(())
            }
            Event::TaskListMarker(checked) => {
                self.out.push_str(if checked {
                    r#"<input checked="" disabled="" type="checkbox" /> "#
                } else {
                    r#"<input disabled="" type="checkbox" /> "#
                });
                Ok(())
            }
            Event::FootnoteReference(label) => self.footnote_reference(&label),
            Event::InlineMath(math) | Event::DisplayMath(math) => self.text(&math),
        }
    }

    /// Write inline content to the heading buffer when inside a heading.
    fn push_inline(&mut self, content: &str) {
        if self.heading.is_active() {
            self.heading.html_buffer().push_str(content);
        } else {
            self.out.push_str(content);
        }
    }

    fn start_tag(&mut self, tag: Tag<'_>) -> fmt::Result {
        if self.image.is_active() {
            if let Tag::Image { .. } = tag {
                self.image.start();
            }
            return Ok(());
        }

        match tag {
            Tag::Paragraph => self.out.push_str("<p>"),
            Tag::Heading { level, .. } => self.heading.start_heading(heading_level_to_num(level)),
            Tag::BlockQuote(_) => self.out.push_str("<blockquote>\n"),
            Tag::CodeBlock(kind) => {
                let language = match kind {
                    CodeBlockKind::Fenced(info) => info
                        .split_whitespace()
                        .next()
                        .map(str::to_owned),
                    CodeBlockKind::Indented => None,
                };
                self.code.start(language);
            }
            Tag::List(Some(1)) => self.out.push_str("<ol>\n"),
            Tag::List(Some(start)) => writeln!(self.out, r#"<ol start="{start}">"#)?,
            Tag::List(None) => self.out.push_str("<ul>\n"),
            Tag::Item => self.out.push_str("<li>"),
            Tag::FootnoteDefinition(label) => {
                self.footnotes.start_definition(&label, &mut self.out);
            }
            Tag::Table(alignments) => {
                self.table.start(alignments);
                self.out.push_str("<table>\n");
            }
            Tag::TableHead => {
                self.table.start_head();
                self.out.push_str("<thead>\n<tr>\n");
            }
            Tag::TableRow => {
                if self.table.start_row() {
                    self.out.push_str("<tbody>\n");
                }
                self.out.push_str("<tr>\n");
            }
            Tag::TableCell => {
                let align = self.table.current_alignment_style();
                let cell = if self.table.is_in_head() { "th" } else { "td" };
                write!(self.out, "<{cell}{align}>")?;
            }
            Tag::Emphasis => self.push_inline("<em>"),
            Tag::Strong => self.push_inline("<strong>"),
            Tag::Strikethrough => self.push_inline("<del>"),
            Tag::Superscript => self.push_inline("<sup>"),
            Tag::Subscript => self.push_inline("<sub>"),
            Tag::Link {
                dest_url, title, ..
            } => {
                self.link_depth += 1;
                let mut link = format!(r#"<a href="{}""#, escape_html(&dest_url));
                if !title.is_empty() {
                    write!(link, r#" title="{}""#, escape_html(&title))?;
                }
                link.push('>');
                self.push_inline(&link);
            }
            Tag::Image {
                dest_url, title, ..
            } => {
                self.image.start();
                self.pending_image
                    .push((dest_url.to_string(), title.to_string()));
            }
            Tag::HtmlBlock => self.html_block = Some(String::new()),
            Tag::MetadataBlock(_) => {}
            Tag::DefinitionList => self.out.push_str("<dl>\n"),
            Tag::DefinitionListTitle => self.out.push_str("<dt>"),
            Tag::DefinitionListDefinition => self.out.push_str("<dd>"),
        }
        Ok(())
    }

    fn end_tag(&mut self, tag: TagEnd) -> fmt::Result {
        if self.image.is_active() {
            if tag == TagEnd::Image {
                self.end_image()?;
            }
            return Ok(());
        }

        match tag {
            TagEnd::Paragraph => self.out.push_str("</p>\n"),
            TagEnd::Heading(_) => {
                if let Some((level, id, html)) = self.heading.complete_heading() {
                    if self.options.heading_ids {
                        writeln!(self.out, r#"<h{level} id="{id}">{}</h{level}>"#, html.trim())?;
                    } else {
                        writeln!(self.out, "<h{level}>{}</h{level}>", html.trim())?;
                    }
                }
            }
            TagEnd::BlockQuote(_) => self.out.push_str("</blockquote>\n"),
            TagEnd::CodeBlock => self.end_code_block()?,
            TagEnd::List(ordered) => self
                .out
                .push_str(if ordered { "</ol>\n" } else { "</ul>\n" }),
            TagEnd::Item => self.out.push_str("</li>\n"),
            TagEnd::FootnoteDefinition => self.footnotes.end_definition(&mut self.out),
            TagEnd::Table => {
                if self.table.has_body() {
                    self.out.push_str("</tbody>\n");
                }
                self.out.push_str("</table>\n");
            }
            TagEnd::TableHead => {
                self.out.push_str("</tr>\n</thead>\n");
                self.table.end_head();
            }
            TagEnd::TableRow => self.out.push_str("</tr>\n"),
            TagEnd::TableCell => {
                self.out.push_str(if self.table.is_in_head() {
                    "</th>\n"
                } else {
                    "</td>\n"
                });
                self.table.next_cell();
            }
            TagEnd::Emphasis => self.push_inline("</em>"),
            TagEnd::Strong => self.push_inline("</strong>"),
            TagEnd::Strikethrough => self.push_inline("</del>"),
            TagEnd::Superscript => self.push_inline("</sup>"),
            TagEnd::Subscript => self.push_inline("</sub>"),
            TagEnd::Link => {
                self.link_depth = self.link_depth.saturating_sub(1);
                self.push_inline("</a>");
            }
            TagEnd::Image => self.end_image()?,
            TagEnd::HtmlBlock => self.end_html_block(),
            TagEnd::MetadataBlock(_) => {}
            TagEnd::DefinitionList => self.out.push_str("</dl>\n"),
            TagEnd::DefinitionListTitle => self.out.push_str("</dt>\n"),
            TagEnd::DefinitionListDefinition => self.out.push_str("</dd>\n"),
        }
        Ok(())
    }

    /// Write a raw HTML block without its comments.
    fn end_html_block(&mut self) {
        let Some(html) = self.html_block.take() else {
            return;
        };
        let kept = HTML_COMMENT.replace_all(&html, "");
        if !kept.trim().is_empty() {
            self.out.push_str(&kept);
        }
    }

    fn end_image(&mut self) -> fmt::Result {
        let Some(alt) = self.image.end() else {
            return Ok(());
        };
        let Some((src, title)) = self.pending_image.pop() else {
            return Ok(());
        };

        let mut img = format!(
            r#"<img src="{}" alt="{}""#,
            escape_html(&src),
            escape_html(&alt)
        );
        if !title.is_empty() {
            write!(img, r#" title="{}""#, escape_html(&title))?;
        }
        img.push_str(" />");
        self.push_inline(&img);
        Ok(())
    }

    fn end_code_block(&mut self) -> fmt::Result {
        let (language, content) = self.code.end();
        let highlighted = language
            .as_deref()
            .and_then(|lang| self.highlighter.highlight(lang, &content));

        match (highlighted, language) {
            (Some(html), _) => self.out.push_str(&html),
            (None, Some(lang)) => writeln!(
                self.out,
                r#"<pre><code class="language-{}">{}</code></pre>"#,
                escape_html(&lang),
                escape_html(&content)
            )?,
            (None, None) => writeln!(self.out, "<pre><code>{}</code></pre>", escape_html(&content))?,
        }
        Ok(())
    }

    fn text(&mut self, text: &str) -> fmt::Result {
        if self.code.is_active() {
            self.code.push_str(text);
            return Ok(());
        }
        if self.image.is_active() {
            self.image.push_str(text);
            return Ok(());
        }
        if self.heading.is_active() {
            self.heading.push_text(text);
        }

        let mut html = String::with_capacity(text.len());
        let mut last = 0;
        for placeholder in SNIPPET_PLACEHOLDER.find_iter(text) {
            html.push_str(&self.escape_text(&text[last..placeholder.start()])?);
            html.push_str(placeholder.as_str());
            last = placeholder.end();
        }
        html.push_str(&self.escape_text(&text[last..])?);
        self.push_inline(&html);
        Ok(())
    }

    fn escape_text(&self, text: &str) -> Result<String, fmt::Error> {
        if self.options.linkify && self.link_depth == 0 {
            linkify(text)
        } else {
            Ok(escape_html(text))
        }
    }

    fn inline_code(&mut self, code: &str) -> fmt::Result {
        if self.image.is_active() {
            self.image.push_str(code);
            return Ok(());
        }
        if self.heading.is_active() {
            self.heading.push_text(code);
        }
        self.push_inline(&format!("<code>{}</code>", escape_html(code)));
        Ok(())
    }

    fn footnote_reference(&mut self, label: &str) -> fmt::Result {
        let (n, first) = self.footnotes.reference(label);
        let id = if first {
            format!(r#" id="fnref:{n}""#)
        } else {
            String::new()
        };
        let html = format!(
            r##"<sup{id}><a href="#fn:{n}" class="footnote-ref" role="doc-noteref">{n}</a></sup>"##
        );
        self.push_inline(&html);
        Ok(())
    }
}

/// Escape `text`, turning bare URLs into links.
fn linkify(text: &str) -> Result<String, fmt::Error> {
    let mut html = String::with_capacity(text.len());
    let mut last = 0;
    for url in BARE_URL.find_iter(text) {
        html.push_str(&escape_html(&text[last..url.start()]));
        let href = if url.as_str().starts_with("www.") {
            format!("http://{}", url.as_str())
        } else {
            url.as_str().to_owned()
        };
        write!(
            html,
            r#"<a href="{}">{}</a>"#,
            escape_html(&href),
            escape_html(url.as_str())
        )?;
        last = url.end();
    }
    html.push_str(&escape_html(&text[last..]));
    Ok(html)
}

fn is_comment(html: &str) -> bool {
    html.starts_with("<!--") && html.trim_end().ends_with("-->")
}

fn heading_level_to_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockParserRegistry;
    use crate::context::ParseContext;
    use crate::inline::parse_runs;
    use pretty_assertions::assert_eq;

    fn render_with(source: &str, options: RenderOptions) -> String {
        let mut ctx = ParseContext::new();
        let mut doc = BlockParserRegistry::default().parse(source, &mut ctx);
        parse_runs(&mut doc, source);
        let highlighter = Highlighter::default();
        HtmlRenderer::new(&highlighter, options)
            .render(&doc, source)
            .unwrap()
    }

    fn render(source: &str) -> String {
        render_with(source, RenderOptions::default())
    }

    #[test]
    fn test_paragraph() {
        assert_eq!(render("Hello, world!"), "<p>Hello, world!</p>\n");
    }

    #[test]
    fn test_heading_ids() {
        assert_eq!(
            render("# Hello\n\n## Hello\n"),
            "<h1 id=\"hello\">Hello</h1>\n<h2 id=\"hello-1\">Hello</h2>\n"
        );
    }

    #[test]
    fn test_heading_ids_disabled() {
        let options = RenderOptions {
            heading_ids: false,
            ..RenderOptions::default()
        };
        assert_eq!(render_with("# Hello", options), "<h1>Hello</h1>\n");
    }

    #[test]
    fn test_heading_with_inline_code() {
        assert_eq!(
            render("## Install `npm`"),
            "<h2 id=\"install-npm\">Install <code>npm</code></h2>\n"
        );
    }

    #[test]
    fn test_hard_wraps() {
        assert_eq!(render("one\ntwo"), "<p>one<br />\ntwo</p>\n");
    }

    #[test]
    fn test_soft_wraps() {
        let options = RenderOptions {
            hard_wraps: false,
            ..RenderOptions::default()
        };
        assert_eq!(render_with("one\ntwo", options), "<p>one\ntwo</p>\n");
    }

    #[test]
    fn test_void_elements_self_closing() {
        let html = render("![Alt](/a.png \"T\")\n\n---\n");
        assert_eq!(
            html,
            "<p><img src=\"/a.png\" alt=\"Alt\" title=\"T\" /></p>\n<hr />\n"
        );
    }

    #[test]
    fn test_strikethrough() {
        assert_eq!(render("~~gone~~"), "<p><del>gone</del></p>\n");
    }

    #[test]
    fn test_table() {
        assert_eq!(
            render("| A | B |\n|:--|---|\n| 1 | 2 |\n"),
            "<table>\n<thead>\n<tr>\n<th style=\"text-align:left\">A</th>\n<th>B</th>\n</tr>\n</thead>\n<tbody>\n<tr>\n<td style=\"text-align:left\">1</td>\n<td>2</td>\n</tr>\n</tbody>\n</table>\n"
        );
    }

    #[test]
    fn test_task_list() {
        let html = render("- [x] done\n- [ ] todo\n");
        assert!(html.contains(r#"<li><input checked="" disabled="" type="checkbox" /> done</li>"#));
        assert!(html.contains(r#"<li><input disabled="" type="checkbox" /> todo</li>"#));
    }

    #[test]
    fn test_raw_html_passthrough() {
        assert_eq!(
            render("<div class=\"x\">\n<b>hi</b>\n</div>\n"),
            "<div class=\"x\">\n<b>hi</b>\n</div>\n"
        );
    }

    #[test]
    fn test_linkify() {
        assert_eq!(
            render("See https://example.com/a. Or www.example.org"),
            "<p>See <a href=\"https://example.com/a\">https://example.com/a</a>. Or <a href=\"http://www.example.org\">www.example.org</a></p>\n"
        );
    }

    #[test]
    fn test_no_linkify_inside_link_or_code() {
        assert_eq!(
            render("[https://a.com](https://b.com) `https://c.com`"),
            "<p><a href=\"https://b.com\">https://a.com</a> <code>https://c.com</code></p>\n"
        );
    }

    #[test]
    fn test_code_block_highlighted() {
        let html = render("```rust\nfn main() {}\n```\n");
        assert!(html.starts_with("<pre style=\""));
    }

    #[test]
    fn test_code_block_unknown_language() {
        assert_eq!(
            render("```nope\n<x>\n```\n"),
            "<pre><code class=\"language-nope\">&lt;x&gt;\n</code></pre>\n"
        );
    }

    #[test]
    fn test_footnotes() {
        let html = render("Text[^1].\n\n[^1]: The note.\n");
        assert_eq!(
            html,
            "<p>Text<sup id=\"fnref:1\"><a href=\"#fn:1\" class=\"footnote-ref\" role=\"doc-noteref\">1</a></sup>.</p>\n\
             <div class=\"footnotes\" role=\"doc-endnotes\">\n<hr />\n<ol>\n\
             <li id=\"fn:1\">\n<p>The note.&#160;<a href=\"#fnref:1\" class=\"footnote-backref\" role=\"doc-backlink\">&#x21a9;&#xfe0e;</a></p>\n</li>\n\
             </ol>\n</div>\n"
        );
    }

    #[test]
    fn test_snippet_node_emits_open_tag() {
        assert_eq!(
            render("{{< note >}}\nInside\n{{< /note >}}\n"),
            "{{< note >}}\n<p>Inside</p>\n"
        );
    }

    #[test]
    fn test_inline_placeholder_kept_unescaped() {
        assert_eq!(
            render("Hello {{< name >}} & <3"),
            "<p>Hello {{< name >}} &amp; &lt;3</p>\n"
        );
    }

    #[test]
    fn test_placeholder_in_code_escaped() {
        assert_eq!(
            render("`{{< name >}}`"),
            "<p><code>{{&lt; name &gt;}}</code></p>\n"
        );
    }

    #[test]
    fn test_comment_emits_nothing() {
        assert_eq!(
            render("<!-- c -->\n# Hello\n"),
            "<h1 id=\"hello\">Hello</h1>\n"
        );
    }

    #[test]
    fn test_block_quote() {
        assert_eq!(
            render("> # Title\n> text\nlazy\n\nafter\n"),
            "<blockquote>\n<h1 id=\"title\">Title</h1>\n<p>text<br />\nlazy</p>\n</blockquote>\n<p>after</p>\n"
        );
    }

    #[test]
    fn test_comment_in_quote_emits_nothing() {
        assert_eq!(
            render("> <!-- secret -->\n> text\n"),
            "<blockquote>\n<p>text</p>\n</blockquote>\n"
        );
    }

    #[test]
    fn test_comment_in_list_item_removed() {
        let html = render("- <!-- secret -->\n- shown\n");
        assert!(!html.contains("secret"));
        assert!(html.contains("shown"));
    }

    #[test]
    fn test_comment_after_paragraph_removed() {
        assert_eq!(render("text\n<!-- c -->\n"), "<p>text</p>\n");
    }

    #[test]
    fn test_html_block_keeps_markup_around_comment() {
        assert_eq!(
            render("<div>\n<!-- c -->\n<b>x</b>\n</div>\n"),
            "<div>\n\n<b>x</b>\n</div>\n"
        );
    }

    #[test]
    fn test_inline_comment_removed() {
        assert_eq!(render("a <!-- c --> b"), "<p>a  b</p>\n");
    }

    #[test]
    fn test_footnote_defined_outside_snippet() {
        assert_eq!(
            render("{{< box >}}\nSee[^n].\n{{< /box >}}\n\n[^n]: the note\n"),
            "{{< box >}}\n<p>See<sup id=\"fnref:1\"><a href=\"#fn:1\" class=\"footnote-ref\" role=\"doc-noteref\">1</a></sup>.</p>\n\
             <div class=\"footnotes\" role=\"doc-endnotes\">\n<hr />\n<ol>\n\
             <li id=\"fn:1\">\n<p>the note&#160;<a href=\"#fnref:1\" class=\"footnote-backref\" role=\"doc-backlink\">&#x21a9;&#xfe0e;</a></p>\n</li>\n\
             </ol>\n</div>\n"
        );
    }

    #[test]
    fn test_invalid_frontmatter_rendered_escaped() {
        assert_eq!(
            render("---\na: [\n---\ntext\n"),
            "<p>a: [</p>\n<p>text</p>\n"
        );
    }
}
