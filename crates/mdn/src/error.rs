//! CLI error types.

use mdn_config::ConfigError;
use mdn_markdown::{FrontmatterError, MarkdownError};
use mdn_snippets::SnippetError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Markdown(#[from] MarkdownError),

    #[error("{0}")]
    Frontmatter(#[from] FrontmatterError),

    #[error("{0}")]
    Snippet(#[from] SnippetError),

    #[error("{0}")]
    Json(#[from] serde_json::Error),
}
