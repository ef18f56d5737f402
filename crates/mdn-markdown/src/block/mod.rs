//! Pluggable block-level grammar.
//!
//! A [`BlockParserRegistry`] splits the source into blocks claimed by
//! registered [`BlockParser`]s and runs of ordinary markdown. Parsers are
//! offered each new block start in priority order; the first one whose
//! trigger byte matches and whose [`open`](BlockParser::open) succeeds owns
//! the block until it returns [`BlockState::Close`].
//!
//! Lines no parser claims are collected into runs of base-grammar content on
//! the innermost open container. A run becomes a [`NodeKind::Markdown`] node
//! when a parser claims a line or the container closes; its events are filled
//! in later by the inline phase.
//!
//! Parsers are never offered lines inside fenced code or indented into a
//! list item; that content belongs to the base grammar.

mod comment;
mod fence;
mod frontmatter;
mod quote;
mod reader;
mod snippet;

use std::ops::Range;

pub use comment::HtmlCommentParser;
pub use frontmatter::FrontmatterParser;
pub use quote::BlockQuoteParser;
pub use reader::{BlockReader, Checkpoint, indentation, is_blank};
pub use snippet::SnippetParser;

use crate::ast::{Document, MarkdownBlock, NodeId, NodeKind};
use crate::context::ParseContext;
use fence::{LineTracker, continues_paragraph};

/// What an open block wants after handling a line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockState {
    /// Keep the block open. The block consumed the line itself.
    Continue,
    /// Keep the block open and parse the line as nested content.
    ContinueWithChildren,
    /// Finalize the block.
    Close,
}

/// A block-level grammar rule.
///
/// Implementations are stateless; per-block state lives in the node they
/// create and per-document state in the [`ParseContext`].
pub trait BlockParser: Send + Sync {
    /// Bytes that may start a block of this kind, checked against the first
    /// non-indentation byte of the line.
    fn trigger(&self) -> &[u8];

    /// Try to start a block at the reader position.
    ///
    /// Returns `None` to decline; the driver then restores the reader. On
    /// success the reader must have moved past whatever the parser consumed.
    fn open<'a>(
        &self,
        reader: &mut BlockReader<'a>,
        ctx: &mut ParseContext,
    ) -> Option<(NodeKind<'a>, BlockState)>;

    /// Offer the next line to an open block.
    fn continue_block(
        &self,
        doc: &mut Document<'_>,
        node: NodeId,
        reader: &mut BlockReader<'_>,
        ctx: &mut ParseContext,
    ) -> BlockState;

    /// Finalize a block. Called exactly once per opened block.
    fn close(
        &self,
        _doc: &mut Document<'_>,
        _node: NodeId,
        _reader: &BlockReader<'_>,
        _ctx: &mut ParseContext,
    ) {
    }

    /// Whether the block may start while a paragraph is in progress.
    fn can_interrupt_paragraph(&self) -> bool {
        false
    }

    /// Whether the block may start on a line indented by four or more columns.
    fn can_accept_indented_line(&self) -> bool {
        false
    }

    /// Whether a line this block rejects may still continue a paragraph
    /// open inside it, as with `>` quotes.
    fn allows_lazy_continuation(&self) -> bool {
        false
    }
}

/// A parser with its priority. Higher priorities are tried first.
pub struct Prioritized {
    parser: Box<dyn BlockParser>,
    priority: i32,
}

impl Prioritized {
    /// Wrap a parser with a priority.
    pub fn new(parser: impl BlockParser + 'static, priority: i32) -> Self {
        Self {
            parser: Box::new(parser),
            priority,
        }
    }
}

/// Ordered set of block parsers and the driver that runs them.
pub struct BlockParserRegistry {
    parsers: Vec<Prioritized>,
}

impl Default for BlockParserRegistry {
    /// Registry with the frontmatter, block quote, HTML comment and snippet
    /// parsers.
    fn default() -> Self {
        Self::empty()
            .with_parser(Prioritized::new(FrontmatterParser, 0))
            .with_parser(Prioritized::new(BlockQuoteParser, 0))
            .with_parser(Prioritized::new(HtmlCommentParser, 0))
            .with_parser(Prioritized::new(SnippetParser, 0))
    }
}

impl BlockParserRegistry {
    /// Registry with no parsers; every line is ordinary markdown.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            parsers: Vec::new(),
        }
    }

    /// Add a parser. Ties in priority keep registration order.
    #[must_use]
    pub fn with_parser(mut self, parser: Prioritized) -> Self {
        self.register(parser);
        self
    }

    /// Add a parser in place.
    pub fn register(&mut self, parser: Prioritized) {
        self.parsers.push(parser);
        self.parsers.sort_by_key(|p| std::cmp::Reverse(p.priority));
    }

    /// Number of registered parsers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.parsers.len()
    }

    /// True if no parser is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parsers.is_empty()
    }

    /// Run the block phase over `source`.
    ///
    /// The returned document holds `Markdown` nodes whose events are still
    /// empty.
    pub fn parse<'a>(&self, source: &'a str, ctx: &mut ParseContext) -> Document<'a> {
        let mut driver = Driver {
            parsers: &self.parsers,
            doc: Document::new(),
            reader: BlockReader::new(source),
            stack: Vec::new(),
            ctx,
        };
        let root = driver.doc.root();
        driver.stack.push(OpenBlock::new(root, None));

        while !driver.reader.is_eof() {
            driver.process_line();
        }
        driver.close_from(1);
        driver.flush_run(0);

        driver.doc
    }
}

/// Lines accumulated for the base grammar.
struct Run {
    segments: Vec<Range<usize>>,
    tracker: LineTracker,
}

struct OpenBlock {
    node: NodeId,
    /// Index into the registry; `None` for the document root.
    parser: Option<usize>,
    run: Option<Run>,
}

impl OpenBlock {
    fn new(node: NodeId, parser: Option<usize>) -> Self {
        Self {
            node,
            parser,
            run: None,
        }
    }
}

struct Driver<'r, 'a, 'c> {
    parsers: &'r [Prioritized],
    doc: Document<'a>,
    reader: BlockReader<'a>,
    stack: Vec<OpenBlock>,
    ctx: &'c mut ParseContext,
}

impl Driver<'_, '_, '_> {
    fn process_line(&mut self) {
        let parsers = self.parsers;
        let line_number = self.reader.line_number();

        let mut depth = 1;
        while depth < self.stack.len() {
            let block = &self.stack[depth];
            let Some(index) = block.parser else {
                depth += 1;
                continue;
            };
            let node = block.node;
            let parser = &parsers[index].parser;

            match parser.continue_block(&mut self.doc, node, &mut self.reader, self.ctx) {
                BlockState::ContinueWithChildren => depth += 1,
                BlockState::Continue => {
                    if self.reader.line_number() == line_number {
                        self.reader.advance_line();
                    }
                    return;
                }
                BlockState::Close => {
                    if parser.allows_lazy_continuation() && self.lazy_continuation(line_number) {
                        return;
                    }
                    self.close_from(depth);
                    if !self.rest_of_line_pending(line_number) {
                        return;
                    }
                    break;
                }
            }
        }

        self.open_blocks();
    }

    /// Try to open new blocks at the reader position, falling back to the
    /// innermost container's run.
    fn open_blocks(&mut self) {
        loop {
            let line_number = self.reader.line_number();
            let Some(line) = self.reader.peek_line() else {
                return;
            };
            let top = self.stack.len() - 1;

            if !is_blank(line)
                && let Some(state) = self.try_open(line, top)
            {
                if state == BlockState::Continue {
                    if self.reader.line_number() == line_number {
                        self.reader.advance_line();
                    }
                    return;
                }
                if !self.rest_of_line_pending(line_number) {
                    return;
                }
                continue;
            }

            self.accumulate(top, line);
            self.reader.advance_line();
            return;
        }
    }

    fn try_open(&mut self, line: &str, top: usize) -> Option<BlockState> {
        let (in_fence, in_paragraph, in_list_item) =
            self.stack[top]
                .run
                .as_ref()
                .map_or((false, false, false), |run| {
                    (
                        run.tracker.in_fence(),
                        run.tracker.in_paragraph(),
                        run.tracker.in_list_item(line),
                    )
                });
        if in_fence || in_list_item {
            return None;
        }

        let (columns, indent) = indentation(line);
        let first = *line.as_bytes().get(indent)?;

        let parsers = self.parsers;
        for (index, entry) in parsers.iter().enumerate() {
            let parser = &entry.parser;
            if !parser.trigger().contains(&first)
                || (columns >= 4 && !parser.can_accept_indented_line())
                || (in_paragraph && !parser.can_interrupt_paragraph())
            {
                continue;
            }

            let checkpoint = self.reader.checkpoint();
            let Some((kind, state)) = parser.open(&mut self.reader, self.ctx) else {
                self.reader.restore(checkpoint);
                continue;
            };

            self.flush_run(top);
            let node = self.doc.append_child(self.stack[top].node, kind);
            tracing::trace!(
                position = checkpoint.position(),
                parser = index,
                ?state,
                "opened block"
            );

            if state == BlockState::Close {
                parser.close(&mut self.doc, node, &self.reader, self.ctx);
            } else {
                self.stack.push(OpenBlock::new(node, Some(index)));
            }

            if self.reader.position() == checkpoint.position() {
                self.reader.advance_line();
            }
            return Some(state);
        }

        None
    }

    /// Append the current line to the innermost run if it lazily continues
    /// that run's open paragraph. Returns `true` when the line was consumed.
    fn lazy_continuation(&mut self, line_number: usize) -> bool {
        if self.reader.line_number() != line_number {
            return false;
        }
        let top = self.stack.len() - 1;
        let Some(run) = &self.stack[top].run else {
            return false;
        };
        if !run.tracker.in_paragraph() || run.tracker.in_fence() {
            return false;
        }
        let Some(line) = self.reader.peek_line() else {
            return false;
        };
        if !continues_paragraph(line) {
            return false;
        }
        let (_, indent) = indentation(line);
        if let Some(&first) = line.as_bytes().get(indent)
            && self.parsers.iter().any(|entry| {
                entry.parser.can_interrupt_paragraph() && entry.parser.trigger().contains(&first)
            })
        {
            return false;
        }

        self.accumulate(top, line);
        self.reader.advance_line();
        true
    }

    /// After a block opened or closed mid-line, decide whether the rest of
    /// the line still needs processing. Consumes blank remainders.
    fn rest_of_line_pending(&mut self, line_number: usize) -> bool {
        if self.reader.is_eof() {
            return false;
        }
        if self.reader.line_offset() == 0 {
            return self.reader.line_number() == line_number;
        }
        match self.reader.peek_line() {
            Some(rest) if !is_blank(rest) => true,
            _ => {
                self.reader.advance_line();
                false
            }
        }
    }

    fn accumulate(&mut self, top: usize, line: &str) {
        let start = self.reader.position();
        let end = start + line.len();
        let run = self.stack[top].run.get_or_insert_with(|| Run {
            segments: Vec::new(),
            tracker: LineTracker::new(),
        });
        match run.segments.last_mut() {
            Some(last) if last.end == start => last.end = end,
            _ => run.segments.push(start..end),
        }
        run.tracker.update(line);
    }

    fn flush_run(&mut self, depth: usize) {
        let Some(run) = self.stack[depth].run.take() else {
            return;
        };
        let block = MarkdownBlock::new(run.segments);
        if is_blank(&block.text(self.reader.source())) {
            return;
        }
        self.doc
            .append_child(self.stack[depth].node, NodeKind::Markdown(block));
    }

    /// Close the block at `depth` and everything nested in it, innermost first.
    fn close_from(&mut self, depth: usize) {
        while self.stack.len() > depth.max(1) {
            let top = self.stack.len() - 1;
            self.flush_run(top);
            let Some(block) = self.stack.pop() else {
                return;
            };
            if let Some(index) = block.parser {
                let parsers = self.parsers;
                parsers[index]
                    .parser
                    .close(&mut self.doc, block.node, &self.reader, self.ctx);
                tracing::trace!(parser = index, "closed block");
            }
        }
    }
}
