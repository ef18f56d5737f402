//! `mdn describe` command implementation.

use std::path::PathBuf;

use clap::Args;
use mdn_snippets::description_from_html;

use super::{ConfigArgs, read_input, write_output};
use crate::error::CliError;

/// Arguments for the describe command.
#[derive(Args, Debug)]
pub(crate) struct DescribeArgs {
    /// Markdown file to summarize (`-` for stdin).
    input: PathBuf,

    #[command(flatten)]
    config: ConfigArgs,
}

impl DescribeArgs {
    /// Execute the describe command.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let session = self.config.load()?;
        let markdown = read_input(&self.input)?;
        let html = session
            .engine
            .to_html_page(&markdown, &session.config.site.base_url)?;
        let description = description_from_html(
            &html,
            &session.catalog,
            session.config.description.max_words,
        );
        write_output(None, &description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_uses_configured_word_count() {
        let tmp = tempfile::tempdir().unwrap();
        let config_path = tmp.path().join("mdn.toml");
        std::fs::write(&config_path, "[description]\nmax_words = 2\n").unwrap();
        let input = tmp.path().join("post.md");
        std::fs::write(&input, "# Title\n\nFirst words here").unwrap();

        let args = DescribeArgs {
            input,
            config: ConfigArgs {
                config: Some(config_path),
                base_url: None,
                theme: None,
                snippets: None,
                max_words: None,
            },
        };
        assert!(args.execute().is_ok());
    }
}
