//! `mdn render` command implementation.

use std::path::PathBuf;

use clap::Args;
use mdn_snippets::{render_markdown, render_snippets};

use super::{ConfigArgs, read_input, write_output};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args, Debug)]
pub(crate) struct RenderArgs {
    /// Markdown file to convert (`-` for stdin).
    input: PathBuf,

    /// Render for an email instead of a web page.
    #[arg(long)]
    email: bool,

    /// Write HTML to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[command(flatten)]
    config: ConfigArgs,
}

impl RenderArgs {
    /// Execute the render command.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let session = self.config.load()?;
        let markdown = read_input(&self.input)?;
        let base_url = &session.config.site.base_url;

        let html = if self.email {
            let html = session.engine.to_html_email(base_url, &markdown)?;
            if html.contains("{{<") && !session.catalog.is_empty() {
                render_snippets(&html, &session.catalog, true)
            } else {
                html
            }
        } else {
            render_markdown(&session.engine, &markdown, base_url, &session.catalog, false)
        };

        write_output(self.output.as_deref(), &html)?;
        if let Some(path) = &self.output {
            Output::new().rendered(path, self.email, html.len());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn args(input: PathBuf, output: PathBuf, email: bool) -> RenderArgs {
        let dir = input.parent().unwrap().to_path_buf();
        RenderArgs {
            input,
            email,
            output: Some(output),
            config: ConfigArgs {
                config: Some(dir.join("mdn.toml")),
                base_url: None,
                theme: None,
                snippets: None,
                max_words: None,
            },
        }
    }

    fn setup() -> tempfile::TempDir {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(
            tmp.path().join("mdn.toml"),
            "[site]\nbase_url = \"https://example.com\"\n[snippets]\nfile = \"snippets.toml\"\n",
        )
        .unwrap();
        std::fs::write(
            tmp.path().join("snippets.toml"),
            "[[snippet]]\nname = \"cta\"\ncontent = \"<b>Join</b>\"\n",
        )
        .unwrap();
        std::fs::write(
            tmp.path().join("post.md"),
            "[home](/)\n![logo](/logo.png)\n\n{{< cta >}}\n{{< /cta >}}\n",
        )
        .unwrap();
        tmp
    }

    #[test]
    fn test_render_page() {
        let tmp = setup();
        let out = tmp.path().join("page.html");
        args(tmp.path().join("post.md"), out.clone(), false)
            .execute()
            .unwrap();

        assert_eq!(
            std::fs::read_to_string(out).unwrap(),
            "<p><a href=\"/\">home</a><br />\n<img src=\"https://example.com/logo.png\" alt=\"logo\" /></p>\n<b>Join</b>\n"
        );
    }

    #[test]
    fn test_render_email() {
        let tmp = setup();
        let out = tmp.path().join("email.html");
        args(tmp.path().join("post.md"), out.clone(), true)
            .execute()
            .unwrap();

        assert_eq!(
            std::fs::read_to_string(out).unwrap(),
            "<p><a href=\"https://example.com/\">home</a><br />\n<img src=\"https://example.com/logo.png\" alt=\"logo\" /></p>\n\n"
        );
    }
}
