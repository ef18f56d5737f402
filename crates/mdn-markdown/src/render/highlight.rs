//! Syntax highlighting for fenced code blocks.

use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use crate::error::MarkdownError;

/// Theme used when none is configured.
pub const DEFAULT_THEME: &str = "base16-ocean.dark";

/// Highlights code with a fixed theme, emitting inline styles.
pub struct Highlighter {
    syntaxes: SyntaxSet,
    theme: Theme,
}

impl Highlighter {
    /// Load the bundled syntaxes and the named bundled theme.
    pub fn new(theme_name: &str) -> Result<Self, MarkdownError> {
        let mut themes = ThemeSet::load_defaults();
        let theme = themes
            .themes
            .remove(theme_name)
            .ok_or_else(|| MarkdownError::UnknownTheme(theme_name.to_owned()))?;

        Ok(Self {
            syntaxes: SyntaxSet::load_defaults_newlines(),
            theme,
        })
    }

    /// Names of the bundled themes.
    #[must_use]
    pub fn theme_names() -> Vec<String> {
        let mut names: Vec<String> = ThemeSet::load_defaults().themes.into_keys().collect();
        names.sort();
        names
    }

    /// Highlight `code` as `language`.
    ///
    /// Returns `None` for unknown languages and on highlighting errors; the
    /// caller then falls back to a plain code block.
    #[must_use]
    pub fn highlight(&self, language: &str, code: &str) -> Option<String> {
        let syntax = self.syntaxes.find_syntax_by_token(language)?;
        match highlighted_html_for_string(code, &self.syntaxes, syntax, &self.theme) {
            Ok(html) => Some(html),
            Err(e) => {
                tracing::debug!(language, error = %e, "highlighting failed, using plain code block");
                None
            }
        }
    }
}

impl Default for Highlighter {
    fn default() -> Self {
        let mut themes = ThemeSet::load_defaults();
        Self {
            syntaxes: SyntaxSet::load_defaults_newlines(),
            theme: themes.themes.remove(DEFAULT_THEME).unwrap_or_default(),
        }
    }
}
