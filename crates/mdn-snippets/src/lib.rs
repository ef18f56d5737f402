//! Named HTML snippets resolved in rendered markdown.
//!
//! Snippet placeholders (`{{< name >}}`) survive markdown rendering as
//! literal text. This crate resolves them against a caller-supplied
//! [`SnippetCatalog`] in a second, string-level pass:
//!
//! ```
//! use mdn_markdown::Markdown;
//! use mdn_snippets::{Snippet, SnippetCatalog, render_markdown};
//!
//! let catalog = SnippetCatalog::new(&[Snippet::new("cta", "<b>Subscribe</b>", false)]);
//! let html = render_markdown(&Markdown::default(), "{{< cta >}}\n{{< /cta >}}", "", &catalog, false);
//! assert_eq!(html, "<b>Subscribe</b>\n");
//! ```

mod catalog;
mod description;
mod render;

pub use catalog::{
    CONTENT_MAX_LENGTH, CONTENT_MIN_LENGTH, NAME_MAX_LENGTH, NAME_MIN_LENGTH, RESERVED_NAMES,
    Snippet, SnippetCatalog, SnippetError, validate_snippet_content, validate_snippet_name,
};
pub use description::{DEFAULT_DESCRIPTION_WORDS, description_from_html};
pub use render::{INVALID_MARKDOWN_HTML, render_markdown, render_snippets};
