//! Raw `<!-- ... -->` comments.

use super::{BlockParser, BlockReader, BlockState, indentation};
use crate::ast::{Document, HtmlComment, NodeId, NodeKind};
use crate::context::ParseContext;

const COMMENT_OPEN: &str = "<!--";
const COMMENT_CLOSE: &str = "-->";

/// Captures HTML comments so they never reach the output.
///
/// A comment may span lines. An unterminated comment swallows the rest of
/// the document.
pub struct HtmlCommentParser;

impl BlockParser for HtmlCommentParser {
    fn trigger(&self) -> &[u8] {
        b"<"
    }

    fn open<'a>(
        &self,
        reader: &mut BlockReader<'a>,
        _ctx: &mut ParseContext,
    ) -> Option<(NodeKind<'a>, BlockState)> {
        let line = reader.peek_line()?;
        let (_, indent) = indentation(line);
        if !line[indent..].starts_with(COMMENT_OPEN) {
            return None;
        }

        let start = reader.position() + indent + COMMENT_OPEN.len();
        let rest = &reader.source()[start..];
        let (content, consumed) = match rest.find(COMMENT_CLOSE) {
            Some(end) => (&rest[..end], end + COMMENT_CLOSE.len()),
            None => (rest, rest.len()),
        };

        reader.advance(indent + COMMENT_OPEN.len() + consumed);
        let comment = HtmlComment {
            content: content.to_owned(),
        };
        Some((NodeKind::HtmlComment(comment), BlockState::Close))
    }

    fn continue_block(
        &self,
        _doc: &mut Document<'_>,
        _node: NodeId,
        _reader: &mut BlockReader<'_>,
        _ctx: &mut ParseContext,
    ) -> BlockState {
        BlockState::Close
    }

    fn can_accept_indented_line(&self) -> bool {
        true
    }
}
