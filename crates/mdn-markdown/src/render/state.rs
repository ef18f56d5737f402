//! State tracked while walking the event stream.

use std::collections::{HashMap, HashSet};
use std::fmt::{self, Write};

use pulldown_cmark::Alignment;

/// Code block being collected for highlighting.
#[derive(Default)]
pub(crate) struct CodeBlockState {
    active: bool,
    language: Option<String>,
    buffer: String,
}

impl CodeBlockState {
    pub(crate) fn start(&mut self, language: Option<String>) {
        self.active = true;
        self.language = language;
        self.buffer.clear();
    }

    /// End the current code block and return (language, content).
    pub(crate) fn end(&mut self) -> (Option<String>, String) {
        self.active = false;
        (self.language.take(), std::mem::take(&mut self.buffer))
    }

    pub(crate) fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn push_str(&mut self, text: &str) {
        self.buffer.push_str(text);
    }
}

/// Position inside a table.
#[derive(Default)]
pub(crate) struct TableState {
    in_head: bool,
    alignments: Vec<Alignment>,
    cell_index: usize,
    body_open: bool,
}

impl TableState {
    pub(crate) fn start(&mut self, alignments: Vec<Alignment>) {
        self.alignments = alignments;
        self.in_head = false;
        self.cell_index = 0;
        self.body_open = false;
    }

    pub(crate) fn start_head(&mut self) {
        self.in_head = true;
        self.cell_index = 0;
    }

    pub(crate) fn end_head(&mut self) {
        self.in_head = false;
    }

    /// Start a body row. Returns `true` for the first one, which opens `<tbody>`.
    pub(crate) fn start_row(&mut self) -> bool {
        self.cell_index = 0;
        !std::mem::replace(&mut self.body_open, true)
    }

    pub(crate) fn next_cell(&mut self) {
        self.cell_index += 1;
    }

    pub(crate) fn is_in_head(&self) -> bool {
        self.in_head
    }

    pub(crate) fn has_body(&self) -> bool {
        self.body_open
    }

    pub(crate) fn current_alignment_style(&self) -> &'static str {
        match self.alignments.get(self.cell_index) {
            Some(Alignment::Left) => r#" style="text-align:left""#,
            Some(Alignment::Center) => r#" style="text-align:center""#,
            Some(Alignment::Right) => r#" style="text-align:right""#,
            Some(Alignment::None) | None => "",
        }
    }
}

/// Alt text capture for images. Images nest, so only the outermost one
/// collects text.
#[derive(Default)]
pub(crate) struct ImageState {
    depth: usize,
    alt_text: String,
}

impl ImageState {
    pub(crate) fn start(&mut self) {
        if self.depth == 0 {
            self.alt_text.clear();
        }
        self.depth += 1;
    }

    /// Leave an image. Returns the alt text when the outermost image closes.
    pub(crate) fn end(&mut self) -> Option<String> {
        self.depth = self.depth.saturating_sub(1);
        (self.depth == 0).then(|| std::mem::take(&mut self.alt_text))
    }

    pub(crate) fn is_active(&self) -> bool {
        self.depth > 0
    }

    pub(crate) fn push_str(&mut self, text: &str) {
        self.alt_text.push_str(text);
    }
}

/// Heading capture and id generation.
#[derive(Default)]
pub(crate) struct HeadingState {
    current_level: Option<u8>,
    /// Plain text, used for the slug.
    text: String,
    /// Inline HTML of the heading.
    html: String,
    id_counts: HashMap<String, usize>,
    used_ids: HashSet<String>,
}

impl HeadingState {
    pub(crate) fn is_active(&self) -> bool {
        self.current_level.is_some()
    }

    pub(crate) fn start_heading(&mut self, level: u8) {
        self.current_level = Some(level);
        self.text.clear();
        self.html.clear();
    }

    /// Finish the heading. Returns (level, id, html).
    pub(crate) fn complete_heading(&mut self) -> Option<(u8, String, String)> {
        let level = self.current_level.take()?;
        let text = std::mem::take(&mut self.text);
        let html = std::mem::take(&mut self.html);
        let id = self.generate_id(&text);
        Some((level, id, html))
    }

    fn generate_id(&mut self, text: &str) -> String {
        let mut base_id = slugify(text);
        if base_id.is_empty() {
            base_id = "heading".to_owned();
        }
        let mut id = base_id.clone();
        while self.used_ids.contains(&id) {
            let count = self.id_counts.entry(base_id.clone()).or_default();
            *count += 1;
            id = format!("{base_id}-{count}");
        }
        self.used_ids.insert(id.clone());
        id
    }

    pub(crate) fn push_text(&mut self, text: &str) {
        self.text.push_str(text);
    }

    pub(crate) fn html_buffer(&mut self) -> &mut String {
        &mut self.html
    }
}

/// Footnote numbering and collected definitions.
///
/// Numbers are assigned in order of first reference. Definitions are rendered
/// into their own buffer and emitted together at the end of the document;
/// definitions that are never referenced are dropped.
#[derive(Default)]
pub(crate) struct FootnoteState {
    numbers: HashMap<String, usize>,
    order: Vec<String>,
    definitions: HashMap<String, String>,
    /// Label and the suspended document output while a definition is open.
    capture: Option<(String, String)>,
}

impl FootnoteState {
    /// Number for a reference, and whether this is its first use.
    pub(crate) fn reference(&mut self, label: &str) -> (usize, bool) {
        if let Some(&n) = self.numbers.get(label) {
            return (n, false);
        }
        self.order.push(label.to_owned());
        let n = self.order.len();
        self.numbers.insert(label.to_owned(), n);
        (n, true)
    }

    /// Redirect `out` into a fresh buffer for the definition body.
    pub(crate) fn start_definition(&mut self, label: &str, out: &mut String) {
        let saved = std::mem::take(out);
        self.capture = Some((label.to_owned(), saved));
    }

    /// Store the definition body and restore the document output.
    pub(crate) fn end_definition(&mut self, out: &mut String) {
        if let Some((label, saved)) = self.capture.take() {
            let body = std::mem::replace(out, saved);
            self.definitions.entry(label).or_insert(body);
        }
    }

    /// Write the trailing footnote list, if anything was referenced.
    pub(crate) fn write_list(&self, out: &mut String) -> fmt::Result {
        let referenced: Vec<(usize, &str)> = self
            .order
            .iter()
            .enumerate()
            .filter_map(|(i, label)| Some((i + 1, self.definitions.get(label)?.as_str())))
            .collect();
        if referenced.is_empty() {
            return Ok(());
        }

        out.push_str("<div class=\"footnotes\" role=\"doc-endnotes\">\n<hr />\n<ol>\n");
        for (n, body) in referenced {
            let backref = format!(
                "&#160;<a href=\"#fnref:{n}\" class=\"footnote-backref\" role=\"doc-backlink\">&#x21a9;&#xfe0e;</a>"
            );
            writeln!(out, "<li id=\"fn:{n}\">")?;
            match body.strip_suffix("</p>\n") {
                Some(head) => writeln!(out, "{head}{backref}</p>")?,
                None => writeln!(out, "{body}{backref}")?,
            }
            out.push_str("</li>\n");
        }
        out.push_str("</ol>\n</div>\n");
        Ok(())
    }
}

/// Convert text to a URL-safe slug.
///
/// Lowercases ASCII alphanumerics, collapses whitespace, dashes and
/// underscores into single dashes and drops everything else.
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut result = String::new();
    let mut last_was_dash = true;

    for c in text.trim().chars() {
        if c.is_ascii_alphanumeric() {
            result.push(c.to_ascii_lowercase());
            last_was_dash = false;
        } else if !last_was_dash && (c.is_whitespace() || c == '-' || c == '_') {
            result.push('-');
            last_was_dash = true;
        }
    }

    if result.ends_with('-') {
        result.pop();
    }
    result
}

/// Escape HTML special characters.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            _ => result.push(c),
        }
    }
    result
}
