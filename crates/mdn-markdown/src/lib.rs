//! Extensible markdown to HTML conversion for web pages and emails.
//!
//! Conversion runs in four phases:
//!
//! 1. **Block phase**: a [`BlockParserRegistry`] scans the source line by line
//!    and builds a [`Document`] tree. Registered parsers recognise
//!    frontmatter, block quotes, HTML comments and `{{< name >}}` snippet
//!    wrappers; every other line is collected into markdown runs.
//! 2. **Inline phase**: each markdown run is parsed with `pulldown-cmark`
//!    (tables, strikethrough, task lists, footnotes). Link reference
//!    definitions and footnotes resolve across runs.
//! 3. **Transform phase**: [`AstTransformer`]s mutate the tree. The built-in
//!    [`UrlRewrite`] makes site-relative URLs absolute.
//! 4. **Render phase**: [`HtmlRenderer`] writes goldmark-style HTML with
//!    syntax-highlighted code blocks.
//!
//! # Example
//!
//! ```
//! use mdn_markdown::Markdown;
//!
//! let engine = Markdown::default();
//! let html = engine
//!     .to_html_page("![logo](/logo.png)", "https://example.com")
//!     .unwrap();
//! assert_eq!(
//!     html,
//!     "<p><img src=\"https://example.com/logo.png\" alt=\"logo\" /></p>\n"
//! );
//! ```

pub mod ast;
pub mod block;
mod context;
mod error;
mod html;
mod inline;
mod markdown;
pub mod render;
mod transform;

pub use ast::{Document, NodeId, NodeKind};
pub use block::{BlockParser, BlockParserRegistry, BlockState, Prioritized};
pub use context::{Frontmatter, ParseContext, get_frontmatter, trim_frontmatter};
pub use error::{FrontmatterError, MarkdownError};
pub use html::{remove_newsletter_tags, rewrite_html_links_and_images};
pub use inline::parser_options;
pub use markdown::{Conversion, Markdown, MarkdownOptions, to_html_email, to_html_page};
pub use render::{DEFAULT_THEME, Highlighter, HtmlRenderer, RenderOptions};
pub use transform::{AstTransformer, UrlRewrite};
