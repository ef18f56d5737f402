//! HTML rendering of parsed documents.
//!
//! The output follows the conventions of goldmark-style renderers: block
//! elements end with a newline, void elements are self-closing
//! (`<br />`, `<hr />`, `<img ... />`) and raw HTML is passed through
//! untouched. Content is author-trusted; nothing is sanitized here.

mod highlight;
mod renderer;
mod state;

pub use highlight::{DEFAULT_THEME, Highlighter};
pub use renderer::HtmlRenderer;
pub use state::{escape_html, slugify};

/// Switches for optional rendering behaviour.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderOptions {
    /// Give headings slug ids (`hello`, `hello-1`, ...).
    pub heading_ids: bool,
    /// Render soft line breaks as `<br />`.
    pub hard_wraps: bool,
    /// Turn bare `http(s)://` and `www.` URLs into links.
    pub linkify: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            heading_ids: true,
            hard_wraps: true,
            linkify: true,
        }
    }
}
