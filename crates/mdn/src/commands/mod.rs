//! CLI command implementations.

mod describe;
mod frontmatter;
mod render;
pub(crate) mod themes;

pub(crate) use describe::DescribeArgs;
pub(crate) use frontmatter::FrontmatterArgs;
pub(crate) use render::RenderArgs;

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use clap::Args;
use mdn_config::{CliSettings, Config};
use mdn_markdown::Markdown;
use mdn_snippets::SnippetCatalog;

use crate::error::CliError;

/// Options shared by commands that convert documents.
#[derive(Args, Debug)]
pub(crate) struct ConfigArgs {
    /// Path to configuration file (default: auto-discover mdn.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Base URL for site-relative links and images (overrides config).
    #[arg(long, env = "MDN_BASE_URL")]
    base_url: Option<String>,

    /// Syntax highlighting theme (overrides config).
    #[arg(long)]
    theme: Option<String>,

    /// TOML file of `[[snippet]]` entries (overrides config).
    #[arg(long)]
    snippets: Option<PathBuf>,

    /// Words kept by `describe` (overrides config).
    #[arg(long)]
    max_words: Option<usize>,
}

/// Loaded configuration with the engine and snippets it describes.
pub(crate) struct Session {
    pub config: Config,
    pub engine: Markdown,
    pub catalog: SnippetCatalog,
}

impl ConfigArgs {
    pub(crate) fn load(self) -> Result<Session, CliError> {
        let settings = CliSettings {
            base_url: self.base_url,
            highlight_theme: self.theme,
            snippets_file: self.snippets,
            max_words: self.max_words,
        };
        let config = Config::load(self.config.as_deref(), Some(&settings))?;
        let engine = Markdown::new(&config.render.markdown_options())?;
        let catalog = match &config.snippets.file {
            Some(path) => load_catalog(path)?,
            None => SnippetCatalog::default(),
        };

        tracing::info!(
            config = ?config.config_path,
            snippets = catalog.len(),
            "configuration loaded"
        );
        Ok(Session {
            config,
            engine,
            catalog,
        })
    }
}

/// Read and validate a snippets file.
fn load_catalog(path: &Path) -> Result<SnippetCatalog, CliError> {
    let source = std::fs::read_to_string(path)?;
    let catalog = SnippetCatalog::from_toml(&source)?;
    catalog.validate()?;
    Ok(catalog)
}

/// Read a document from a file, or from stdin when `path` is `-`.
pub(crate) fn read_input(path: &Path) -> Result<String, CliError> {
    if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin().lock().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        Ok(std::fs::read_to_string(path)?)
    }
}

/// Write a command result to a file, or to stdout when no file is given.
pub(crate) fn write_output(path: Option<&Path>, content: &str) -> Result<(), CliError> {
    match path {
        Some(path) => std::fs::write(path, content)?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            if !content.ends_with('\n') {
                writeln!(stdout)?;
            }
        }
    }
    Ok(())
}
