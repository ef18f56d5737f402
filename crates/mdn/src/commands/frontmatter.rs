//! `mdn frontmatter` command implementation.

use std::path::PathBuf;

use clap::Args;
use mdn_markdown::{Frontmatter, FrontmatterError, Markdown};

use super::{read_input, write_output};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the frontmatter command.
#[derive(Args, Debug)]
pub(crate) struct FrontmatterArgs {
    /// Markdown file to read (`-` for stdin).
    input: PathBuf,

    /// Fail when the document has no frontmatter.
    #[arg(long)]
    require: bool,
}

impl FrontmatterArgs {
    /// Execute the frontmatter command.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let markdown = read_input(&self.input)?;
        let frontmatter = extract(&markdown, self.require)?.unwrap_or_else(|| {
            Output::new().no_frontmatter(&self.input);
            Frontmatter::empty()
        });
        let json = serde_json::to_string_pretty(&frontmatter)?;
        write_output(None, &json)
    }
}

/// Frontmatter of `markdown`, or `None` when it has none and `require` is
/// false.
fn extract(markdown: &str, require: bool) -> Result<Option<Frontmatter>, CliError> {
    match Markdown::default().parse_frontmatter(markdown) {
        Ok(frontmatter) => Ok(Some(frontmatter)),
        Err(FrontmatterError::Missing) if !require => Ok(None),
        Err(e) => Err(e.into()),
    }
}
