//! Configuration management for mdn.
//!
//! Parses `mdn.toml` with serde and discovers it in the current directory or
//! its parents. CLI settings are applied on top via [`CliSettings`].
//!
//! ```toml
//! [site]
//! base_url = "https://${SITE_DOMAIN:-example.com}"
//!
//! [render]
//! highlight_theme = "base16-ocean.dark"
//! heading_ids = true
//! hard_wraps = true
//!
//! [snippets]
//! file = "snippets.toml"
//!
//! [description]
//! max_words = 30
//! ```
//!
//! `site.base_url` supports `${VAR}` and `${VAR:-default}` expansion.

mod expand;

use std::path::{Path, PathBuf};

use mdn_markdown::{DEFAULT_THEME, MarkdownOptions};
use mdn_snippets::DEFAULT_DESCRIPTION_WORDS;
use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "mdn.toml";

/// CLI settings that override configuration file values.
#[derive(Debug, Default)]
pub struct CliSettings {
    pub base_url: Option<String>,
    pub highlight_theme: Option<String>,
    pub snippets_file: Option<PathBuf>,
    pub max_words: Option<usize>,
}

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub render: RenderConfig,
    pub snippets: SnippetsConfig,
    pub description: DescriptionConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// `[site]` section.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Prefix for site-relative URLs. Empty leaves URLs relative.
    pub base_url: String,
}

/// `[render]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub highlight_theme: String,
    pub heading_ids: bool,
    pub hard_wraps: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            highlight_theme: DEFAULT_THEME.to_owned(),
            heading_ids: true,
            hard_wraps: true,
        }
    }
}

impl RenderConfig {
    /// Engine options for this section.
    pub fn markdown_options(&self) -> MarkdownOptions {
        MarkdownOptions {
            highlight_theme: self.highlight_theme.clone(),
            heading_ids: self.heading_ids,
            hard_wraps: self.hard_wraps,
        }
    }
}

/// `[snippets]` section.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SnippetsConfig {
    /// TOML file of `[[snippet]]` entries, relative to the config file.
    pub file: Option<PathBuf>,
}

/// `[description]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DescriptionConfig {
    pub max_words: usize,
}

impl Default for DescriptionConfig {
    fn default() -> Self {
        Self {
            max_words: DEFAULT_DESCRIPTION_WORDS,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar { field: String, message: String },
}

impl Config {
    /// Load configuration with optional CLI settings.
    ///
    /// An explicit `config_path` must exist. Without one, `mdn.toml` is
    /// searched for in the current directory and its parents, falling back to
    /// defaults. CLI settings take precedence over file values.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let discovered = match config_path {
            Some(path) if !path.exists() => return Err(ConfigError::NotFound(path.to_path_buf())),
            Some(path) => Some(path.to_path_buf()),
            None => std::env::current_dir().ok().and_then(|cwd| discover_config(&cwd)),
        };

        let mut config = match discovered {
            Some(path) => Self::load_from_file(&path)?,
            None => Self::default(),
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(base_url) = &settings.base_url {
            self.site.base_url.clone_from(base_url);
        }
        if let Some(theme) = &settings.highlight_theme {
            self.render.highlight_theme.clone_from(theme);
        }
        if let Some(file) = &settings.snippets_file {
            self.snippets.file = Some(file.clone());
        }
        if let Some(max_words) = settings.max_words {
            self.description.max_words = max_words;
        }
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.site.base_url = expand::expand_env(&config.site.base_url, "site.base_url")?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        if let Some(file) = &config.snippets.file {
            config.snippets.file = Some(config_dir.join(file));
        }
        config.config_path = Some(path.to_path_buf());

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base_url = &self.site.base_url;
        if !base_url.is_empty() && !base_url.starts_with("http://") && !base_url.starts_with("https://")
        {
            return Err(ConfigError::Validation(
                "site.base_url must start with http:// or https://".to_owned(),
            ));
        }
        if self.render.highlight_theme.is_empty() {
            return Err(ConfigError::Validation(
                "render.highlight_theme cannot be empty".to_owned(),
            ));
        }
        if self.description.max_words == 0 {
            return Err(ConfigError::Validation(
                "description.max_words must be greater than 0".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Search for the config file in `start` and its parents.
fn discover_config(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let candidate = current.join(CONFIG_FILENAME);
        if candidate.exists() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}
