//! `>` block quotes.
//!
//! Quotes are taken out of the base grammar so that every other block parser
//! also sees quoted lines: a comment or snippet inside a quote is parsed the
//! same way as at the top level.

use super::{BlockParser, BlockReader, BlockState, indentation};
use crate::ast::{Document, NodeId, NodeKind};
use crate::context::ParseContext;

/// Length of the quote marker at the start of `line`: indentation, `>` and
/// one optional space or tab.
fn marker_len(line: &str) -> Option<usize> {
    let (columns, indent) = indentation(line);
    if columns >= 4 || line.as_bytes().get(indent) != Some(&b'>') {
        return None;
    }
    let after = indent + 1;
    match line.as_bytes().get(after) {
        Some(b' ' | b'\t') => Some(after + 1),
        _ => Some(after),
    }
}

/// Parses `>` block quotes.
///
/// Each line of the quote has its marker stripped and the rest is parsed as
/// nested content. A line without the marker ends the quote unless it lazily
/// continues a quoted paragraph.
pub struct BlockQuoteParser;

impl BlockParser for BlockQuoteParser {
    fn trigger(&self) -> &[u8] {
        b">"
    }

    fn open<'a>(
        &self,
        reader: &mut BlockReader<'a>,
        _ctx: &mut ParseContext,
    ) -> Option<(NodeKind<'a>, BlockState)> {
        let len = marker_len(reader.peek_line()?)?;
        reader.advance(len);
        Some((NodeKind::BlockQuote, BlockState::ContinueWithChildren))
    }

    fn continue_block(
        &self,
        _doc: &mut Document<'_>,
        _node: NodeId,
        reader: &mut BlockReader<'_>,
        _ctx: &mut ParseContext,
    ) -> BlockState {
        match reader.peek_line().and_then(marker_len) {
            Some(len) => {
                reader.advance(len);
                BlockState::ContinueWithChildren
            }
            None => BlockState::Close,
        }
    }

    fn can_interrupt_paragraph(&self) -> bool {
        true
    }

    fn allows_lazy_continuation(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{BlockParserRegistry, HtmlCommentParser, Prioritized, SnippetParser};

    fn dump(source: &str) -> String {
        let registry = BlockParserRegistry::empty()
            .with_parser(Prioritized::new(BlockQuoteParser, 0))
            .with_parser(Prioritized::new(HtmlCommentParser, 0))
            .with_parser(Prioritized::new(SnippetParser, 0));
        let mut ctx = ParseContext::new();
        registry.parse(source, &mut ctx).dump(source)
    }

    #[test]
    fn test_marker_len() {
        assert_eq!(marker_len("> a"), Some(2));
        assert_eq!(marker_len(">a"), Some(1));
        assert_eq!(marker_len("   > a"), Some(5));
        assert_eq!(marker_len("    > a"), None);
        assert_eq!(marker_len("a > b"), None);
    }

    #[test]
    fn test_quote_strips_markers() {
        assert_eq!(
            dump("> one\n> two\n\nafter\n"),
            "Document\n  BlockQuote\n    Markdown source=\"one\\ntwo\\n\"\n  Markdown source=\"\\nafter\\n\"\n"
        );
    }

    #[test]
    fn test_lazy_continuation() {
        assert_eq!(
            dump("> one\ntwo\n"),
            "Document\n  BlockQuote\n    Markdown source=\"one\\ntwo\\n\"\n"
        );
    }

    #[test]
    fn test_no_lazy_continuation_after_blank_quote_line() {
        assert_eq!(
            dump("> one\n>\ntwo\n"),
            "Document\n  BlockQuote\n    Markdown source=\"one\\n\\n\"\n  Markdown source=\"two\\n\"\n"
        );
    }

    #[test]
    fn test_nested_quotes() {
        assert_eq!(
            dump("> > inner\n> outer\n"),
            "Document\n  BlockQuote\n    BlockQuote\n      Markdown source=\"inner\\nouter\\n\"\n"
        );
    }

    #[test]
    fn test_comment_inside_quote() {
        assert_eq!(
            dump("> <!-- secret -->\n> text\n"),
            "Document\n  BlockQuote\n    HtmlComment content=\" secret \"\n    Markdown source=\"text\\n\"\n"
        );
    }

    #[test]
    fn test_snippet_inside_quote() {
        assert_eq!(
            dump("> {{< a >}}\n> x\n> {{< /a >}}\n"),
            "Document\n  BlockQuote\n    Snippet name=\"a\"\n      Markdown source=\"x\\n\"\n"
        );
    }

    #[test]
    fn test_quote_not_opened_in_fence() {
        assert_eq!(
            dump("```\n> code\n```\n"),
            "Document\n  Markdown source=\"```\\n> code\\n```\\n\"\n"
        );
    }
}
