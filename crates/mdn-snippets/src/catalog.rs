//! Registered snippets and their validation rules.

use std::collections::HashMap;

use serde::Deserialize;

/// Minimum snippet name length in bytes.
pub const NAME_MIN_LENGTH: usize = 2;
/// Maximum snippet name length in bytes.
pub const NAME_MAX_LENGTH: usize = 42;
/// Minimum snippet content length in bytes.
pub const CONTENT_MIN_LENGTH: usize = 1;
/// Maximum snippet content length in bytes.
pub const CONTENT_MAX_LENGTH: usize = 5_000;

const NAME_ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz0123456789-_";

/// Names reserved for built-in embeds.
pub const RESERVED_NAMES: &[&str] = &[
    "youtube",
    "gallery",
    "tweet",
    "subscribe",
    "form",
    "vimeo",
    "video",
];

/// Snippet error.
#[derive(Debug, thiserror::Error)]
pub enum SnippetError {
    /// Name violates the naming rules.
    #[error("Snippet name is not valid: {0}")]
    InvalidName(String),
    /// Content is empty or too large.
    #[error("Snippet content is not valid: {0}")]
    InvalidContent(String),
    /// Catalogue file could not be parsed.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// A caller-registered HTML fragment.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Snippet {
    /// Lookup key used in `{{< name >}}` placeholders.
    pub name: String,
    /// Pre-sanitized HTML inserted verbatim.
    pub content: String,
    /// Whether the snippet is rendered in emails. Dropped otherwise.
    #[serde(default)]
    pub render_in_emails: bool,
}

impl Snippet {
    pub fn new(name: impl Into<String>, content: impl Into<String>, render_in_emails: bool) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            render_in_emails,
        }
    }

    /// Check name and content against the registration rules.
    pub fn validate(&self) -> Result<(), SnippetError> {
        validate_snippet_name(&self.name)?;
        validate_snippet_content(&self.content)
    }
}

/// Name-keyed set of snippets for one conversion.
///
/// When several snippets share a name the last one wins.
#[derive(Clone, Debug, Default)]
pub struct SnippetCatalog {
    snippets: HashMap<String, Snippet>,
}

#[derive(Deserialize)]
struct CatalogFile {
    #[serde(default)]
    snippet: Vec<Snippet>,
}

impl SnippetCatalog {
    /// Build a catalogue from a slice of snippets.
    pub fn new(snippets: &[Snippet]) -> Self {
        snippets.iter().cloned().collect()
    }

    /// Parse a TOML document made of `[[snippet]]` tables.
    ///
    /// ```toml
    /// [[snippet]]
    /// name = "cta"
    /// content = "<a href=\"/subscribe\">Subscribe</a>"
    /// render_in_emails = true
    /// ```
    pub fn from_toml(source: &str) -> Result<Self, SnippetError> {
        let file: CatalogFile = toml::from_str(source)?;
        Ok(file.snippet.into_iter().collect())
    }

    pub fn get(&self, name: &str) -> Option<&Snippet> {
        self.snippets.get(name)
    }

    pub fn len(&self) -> usize {
        self.snippets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snippets.is_empty()
    }

    /// Validate every snippet, returning the first failure.
    pub fn validate(&self) -> Result<(), SnippetError> {
        let mut names: Vec<&String> = self.snippets.keys().collect();
        names.sort();
        for name in names {
            self.snippets[name].validate()?;
        }
        Ok(())
    }
}

impl FromIterator<Snippet> for SnippetCatalog {
    fn from_iter<I: IntoIterator<Item = Snippet>>(iter: I) -> Self {
        Self {
            snippets: iter
                .into_iter()
                .map(|snippet| (snippet.name.clone(), snippet))
                .collect(),
        }
    }
}

/// Check a snippet name against the registration rules.
pub fn validate_snippet_name(name: &str) -> Result<(), SnippetError> {
    let invalid = |reason: &str| Err(SnippetError::InvalidName(format!("{name:?} {reason}")));

    if name.len() < NAME_MIN_LENGTH || name.len() > NAME_MAX_LENGTH {
        return invalid(&format!(
            "must be between {NAME_MIN_LENGTH} and {NAME_MAX_LENGTH} characters"
        ));
    }
    if name.starts_with("mdninja") || name.starts_with("markdown_ninja") {
        return invalid("uses a reserved prefix");
    }
    if RESERVED_NAMES.contains(&name) {
        return invalid("is reserved");
    }
    if !name.chars().all(|c| NAME_ALPHABET.contains(c)) {
        return invalid("may only contain a-z, 0-9, '-' and '_'");
    }
    if name.contains("--") || name.contains("__") {
        return invalid("cannot contain repeated separators");
    }
    if name.starts_with(['-', '_']) || name.ends_with(['-', '_']) {
        return invalid("cannot start or end with a separator");
    }
    Ok(())
}

/// Check snippet content length.
pub fn validate_snippet_content(content: &str) -> Result<(), SnippetError> {
    if content.len() < CONTENT_MIN_LENGTH || content.len() > CONTENT_MAX_LENGTH {
        return Err(SnippetError::InvalidContent(format!(
            "must be between {CONTENT_MIN_LENGTH} and {CONTENT_MAX_LENGTH} bytes, got {}",
            content.len()
        )));
    }
    Ok(())
}
