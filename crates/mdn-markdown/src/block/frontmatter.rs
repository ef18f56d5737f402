//! Leading `---` metadata block.

use super::{BlockParser, BlockReader, BlockState};
use crate::ast::{Document, NodeId, NodeKind};
use crate::context::{Frontmatter, ParseContext};

const DELIMITER: &str = "---";

/// Captures a YAML block delimited by `---` lines at the very top of a
/// document.
///
/// A block that parses is removed from the tree and published through the
/// [`ParseContext`]. A block that fails to parse stays in the tree so its raw
/// text is rendered, and the context holds the error instead.
pub struct FrontmatterParser;

fn is_delimiter(line: &str) -> bool {
    line.trim() == DELIMITER
}

impl BlockParser for FrontmatterParser {
    fn trigger(&self) -> &[u8] {
        b"+-"
    }

    fn open<'a>(
        &self,
        reader: &mut BlockReader<'a>,
        _ctx: &mut ParseContext,
    ) -> Option<(NodeKind<'a>, BlockState)> {
        if reader.line_number() != 0 || reader.line_offset() != 0 {
            return None;
        }
        if !is_delimiter(reader.peek_line()?) {
            return None;
        }

        reader.advance_line();
        Some((NodeKind::TextBlock, BlockState::Continue))
    }

    fn continue_block(
        &self,
        doc: &mut Document<'_>,
        node: NodeId,
        reader: &mut BlockReader<'_>,
        _ctx: &mut ParseContext,
    ) -> BlockState {
        let Some(line) = reader.peek_line() else {
            return BlockState::Close;
        };

        if is_delimiter(line) {
            reader.advance_line();
            return BlockState::Close;
        }

        let start = reader.position();
        doc.node_mut(node).push_line(start..start + line.len());
        BlockState::Continue
    }

    fn close(
        &self,
        doc: &mut Document<'_>,
        node: NodeId,
        reader: &BlockReader<'_>,
        ctx: &mut ParseContext,
    ) {
        let source = reader.source();
        let text: String = doc
            .node(node)
            .lines()
            .iter()
            .filter_map(|segment| source.get(segment.clone()))
            .collect();

        let result = Frontmatter::from_source(text.trim().to_owned());
        match &result {
            Ok(_) => {
                if let Some(parent) = doc.parent(node) {
                    doc.remove_child(parent, node);
                }
            }
            Err(e) => tracing::debug!(error = %e, "keeping invalid frontmatter in document"),
        }
        ctx.set_frontmatter(result);
    }
}
