//! Error types for markdown conversion.

/// Error returned by the conversion pipeline.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum MarkdownError {
    /// The renderer failed to produce HTML for the document.
    #[error("markdown is not valid: {0}")]
    MarkdownInvalid(String),

    /// The HTML given to the link/image post-processor is malformed.
    #[error("HTML is not valid: {0}")]
    HtmlInvalid(String),

    /// The configured highlighting theme does not exist.
    #[error("unknown highlighting theme: {0}")]
    UnknownTheme(String),
}

impl From<std::fmt::Error> for MarkdownError {
    fn from(err: std::fmt::Error) -> Self {
        Self::MarkdownInvalid(err.to_string())
    }
}

/// Error returned when frontmatter metadata cannot be retrieved.
///
/// [`Missing`](Self::Missing) is expected for plain documents and callers
/// should fall back to [`Frontmatter::empty`](crate::Frontmatter::empty).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FrontmatterError {
    /// The document does not start with a `---` delimited block.
    #[error("frontmatter is missing")]
    Missing,

    /// The delimited block exists but is not a valid YAML mapping.
    #[error("invalid frontmatter: {0}")]
    Parse(String),
}
