//! Per-conversion parse state and frontmatter retrieval.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::FrontmatterError;

/// Leading metadata block of a document.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Frontmatter {
    /// Trimmed text between the `---` delimiters.
    pub source: String,
    /// Parsed YAML mapping.
    pub data: HashMap<String, serde_json::Value>,
}

impl Frontmatter {
    /// Frontmatter with no source and no data.
    ///
    /// Callers use this as the default when a document has none.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse trimmed frontmatter text.
    ///
    /// Empty text yields an empty mapping. Anything that is not a YAML mapping
    /// with string keys is rejected.
    pub(crate) fn from_source(source: String) -> Result<Self, FrontmatterError> {
        if source.is_empty() {
            return Ok(Self::empty());
        }

        let data = serde_yaml::from_str(&source)
            .map_err(|e| FrontmatterError::Parse(format!("Invalid YAML: {e}")))?;
        Ok(Self { source, data })
    }

    /// Look up a top-level string value.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(serde_json::Value::as_str)
    }
}

/// Scratch state for a single parse.
///
/// Created fresh for every conversion and passed explicitly to block parsers.
/// Never shared between documents.
#[derive(Debug, Default)]
pub struct ParseContext {
    frontmatter: Option<Result<Frontmatter, FrontmatterError>>,
}

impl ParseContext {
    /// Create an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of parsing a frontmatter block.
    pub fn set_frontmatter(&mut self, result: Result<Frontmatter, FrontmatterError>) {
        self.frontmatter = Some(result);
    }

    /// Consume the context and return the frontmatter outcome.
    pub fn into_frontmatter(self) -> Result<Frontmatter, FrontmatterError> {
        self.frontmatter.unwrap_or(Err(FrontmatterError::Missing))
    }
}

/// Retrieve the frontmatter recorded during a parse.
///
/// Fails with [`FrontmatterError::Missing`] when the document had no
/// frontmatter block, or with the stored parse error when the block was
/// present but invalid.
pub fn get_frontmatter(ctx: &ParseContext) -> Result<&Frontmatter, FrontmatterError> {
    match &ctx.frontmatter {
        None => Err(FrontmatterError::Missing),
        Some(Ok(frontmatter)) => Ok(frontmatter),
        Some(Err(err)) => Err(err.clone()),
    }
}

/// Strip a leading frontmatter block from `markdown`.
///
/// `source` is the [`Frontmatter::source`] extracted from the same document.
/// Delimiter characters and whitespace around the block are skipped as well,
/// so the result starts at the first character of the body.
#[must_use]
pub fn trim_frontmatter<'a>(markdown: &'a str, source: &str) -> &'a str {
    let body = skip_delimiters(markdown);
    let body = body.strip_prefix(source).unwrap_or(body);
    skip_delimiters(body)
}

fn skip_delimiters(text: &str) -> &str {
    text.trim_start_matches(|c: char| c == '+' || c == '-' || c.is_whitespace())
}
