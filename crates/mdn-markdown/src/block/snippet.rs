//! `{{< name >}} ... {{< /name >}}` containers.

use std::ops::Range;

use super::{BlockParser, BlockReader, BlockState, indentation};
use crate::ast::{Document, NodeId, NodeKind, Snippet};
use crate::context::ParseContext;

const OPEN_DELIMITER: &str = "{{<";
const CLOSE_DELIMITER: &str = ">}}";

/// A snippet tag found at the start of a line.
#[derive(Debug, PartialEq, Eq)]
struct SnippetTag {
    /// Byte range of the name within the scanned text.
    name: Range<usize>,
    /// Byte offset just past `>}}`.
    end: usize,
    is_close: bool,
}

/// Scan a snippet tag at the start of `text`.
///
/// The tag is `{{<`, optional whitespace, an optional `/`, then a name that
/// ends at whitespace or `>}}`. Anything between the name and `>}}` is kept
/// in the raw tag but otherwise ignored. The tag must end on the same line.
fn parse_tag(text: &str) -> Option<SnippetTag> {
    let rest = text.strip_prefix(OPEN_DELIMITER)?;
    let mut pos = OPEN_DELIMITER.len();

    let trimmed = rest.trim_start();
    pos += rest.len() - trimmed.len();
    if trimmed.is_empty() {
        return None;
    }

    let is_close = trimmed.starts_with('/');
    if is_close {
        pos += 1;
    }

    let name_start = pos;
    let mut name_end = None;
    for (offset, c) in text[pos..].char_indices() {
        let at = pos + offset;
        if text[at..].starts_with(CLOSE_DELIMITER) {
            let name_end = name_end.unwrap_or(at);
            return Some(SnippetTag {
                name: name_start..name_end,
                end: at + CLOSE_DELIMITER.len(),
                is_close,
            });
        }
        if c == '\n' {
            return None;
        }
        if name_end.is_none() && c.is_whitespace() {
            name_end = Some(at);
        }
    }
    None
}

/// Parses named snippet containers.
///
/// The opening tag becomes a [`Snippet`] node and everything up to the close
/// tag with the same name is parsed as its children, so snippets can wrap
/// arbitrary block content including other snippets. The close tag is only
/// recognised at the start of a line.
pub struct SnippetParser;

impl BlockParser for SnippetParser {
    fn trigger(&self) -> &[u8] {
        b"{"
    }

    fn open<'a>(
        &self,
        reader: &mut BlockReader<'a>,
        _ctx: &mut ParseContext,
    ) -> Option<(NodeKind<'a>, BlockState)> {
        let line = reader.peek_line()?;
        let (_, indent) = indentation(line);
        let text = &line[indent..];

        let tag = parse_tag(text)?;
        if tag.is_close || tag.name.is_empty() {
            return None;
        }

        let snippet = Snippet {
            name: text[tag.name.clone()].to_owned(),
            raw_open_tag: text[..tag.end].to_owned(),
        };
        tracing::trace!(name = %snippet.name, "opened snippet");
        reader.advance(indent + tag.end);

        Some((NodeKind::Snippet(snippet), BlockState::ContinueWithChildren))
    }

    fn continue_block(
        &self,
        doc: &mut Document<'_>,
        node: NodeId,
        reader: &mut BlockReader<'_>,
        _ctx: &mut ParseContext,
    ) -> BlockState {
        let Some(line) = reader.peek_line() else {
            return BlockState::ContinueWithChildren;
        };
        let (_, indent) = indentation(line);
        let text = &line[indent..];

        let Some(tag) = parse_tag(text).filter(|tag| tag.is_close) else {
            return BlockState::ContinueWithChildren;
        };
        let NodeKind::Snippet(snippet) = &doc.node(node).kind else {
            return BlockState::ContinueWithChildren;
        };
        if text[tag.name] != *snippet.name {
            return BlockState::ContinueWithChildren;
        }

        reader.advance(indent + tag.end);
        BlockState::Close
    }

    fn can_interrupt_paragraph(&self) -> bool {
        true
    }

    fn can_accept_indented_line(&self) -> bool {
        true
    }
}
